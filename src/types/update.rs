use super::message::MESSAGE;
use super::{ApiType, Message, nested};
use crate::core::error::Error;
use crate::core::object::Object;
use crate::core::schema::{FieldDef, TypeDescriptor};

pub static UPDATE: TypeDescriptor = TypeDescriptor {
    name: "Update",
    fields: &[
        FieldDef::integer("update_id"),
        FieldDef::nested("message", &MESSAGE),
        FieldDef::nested("edited_message", &MESSAGE),
        FieldDef::nested("channel_post", &MESSAGE),
        FieldDef::nested("edited_channel_post", &MESSAGE),
    ],
    required: &["update_id"],
};

/// One entry of a `getUpdates` batch. At most one payload field is set.
#[derive(Clone, Debug, PartialEq)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
    pub edited_message: Option<Message>,
    pub channel_post: Option<Message>,
    pub edited_channel_post: Option<Message>,
}

impl Update {
    /// Whichever message the update carries.
    pub fn any_message(&self) -> Option<&Message> {
        self.message
            .as_ref()
            .or(self.edited_message.as_ref())
            .or(self.channel_post.as_ref())
            .or(self.edited_channel_post.as_ref())
    }
}

impl ApiType for Update {
    fn descriptor() -> &'static TypeDescriptor {
        &UPDATE
    }

    fn from_object(mut object: Object) -> Result<Self, Error> {
        let update_id = object.take_i64("updateId")?;
        Ok(Self {
            update_id: object.require("updateId", update_id)?,
            message: nested(&mut object, "message")?,
            edited_message: nested(&mut object, "editedMessage")?,
            channel_post: nested(&mut object, "channelPost")?,
            edited_channel_post: nested(&mut object, "editedChannelPost")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::Update;
    use crate::types::ApiType;
    use serde_json::json;

    #[test]
    fn update_batch_keeps_order_and_picks_message() {
        let updates = Update::many_from_response(&json!([
            {"update_id": 10, "message": {"message_id": 1, "date": 5, "chat": {"id": 1, "type": "private"}}},
            {"update_id": 11, "channel_post": {"message_id": 2, "date": 6, "chat": {"id": -5, "type": "channel"}}},
            {"update_id": 12, "poll": {"id": "p"}}
        ]))
        .expect("updates");
        let ids: Vec<_> = updates.iter().map(|u| u.update_id).collect();
        assert_eq!(ids, vec![10, 11, 12]);
        assert_eq!(updates[1].any_message().map(|m| m.chat.id), Some(-5));
        assert!(updates[2].any_message().is_none());
    }
}
