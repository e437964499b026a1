use super::user::USER;
use super::{ApiType, User, nested};
use crate::core::error::Error;
use crate::core::object::Object;
use crate::core::schema::{FieldDef, TypeDescriptor};

pub static CHAT_MEMBER: TypeDescriptor = TypeDescriptor {
    name: "ChatMember",
    fields: &[
        FieldDef::nested("user", &USER),
        FieldDef::string("status"),
        FieldDef::integer("until_date"),
        FieldDef::bool("can_be_edited"),
        FieldDef::bool("can_delete_messages"),
        FieldDef::bool("can_restrict_members"),
        FieldDef::bool("can_pin_messages"),
        FieldDef::bool("can_send_messages"),
    ],
    required: &["user", "status"],
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChatMember {
    pub user: User,
    /// `creator`, `administrator`, `member`, `restricted`, `left` or `kicked`.
    pub status: String,
    pub until_date: Option<i64>,
    pub can_be_edited: Option<bool>,
    pub can_delete_messages: Option<bool>,
    pub can_restrict_members: Option<bool>,
    pub can_pin_messages: Option<bool>,
    pub can_send_messages: Option<bool>,
}

impl ChatMember {
    pub fn is_admin(&self) -> bool {
        matches!(self.status.as_str(), "creator" | "administrator")
    }
}

impl ApiType for ChatMember {
    fn descriptor() -> &'static TypeDescriptor {
        &CHAT_MEMBER
    }

    fn from_object(mut object: Object) -> Result<Self, Error> {
        let user = nested::<User>(&mut object, "user")?;
        let status = object.take_string("status")?;
        Ok(Self {
            user: object.require("user", user)?,
            status: object.require("status", status)?,
            until_date: object.take_i64("untilDate")?,
            can_be_edited: object.take_bool("canBeEdited")?,
            can_delete_messages: object.take_bool("canDeleteMessages")?,
            can_restrict_members: object.take_bool("canRestrictMembers")?,
            can_pin_messages: object.take_bool("canPinMessages")?,
            can_send_messages: object.take_bool("canSendMessages")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::ChatMember;
    use crate::types::ApiType;
    use serde_json::json;

    #[test]
    fn administrators_list_builds_in_order() {
        let members = ChatMember::many_from_response(&json!([
            {"user": {"id": 1, "first_name": "Owner"}, "status": "creator"},
            {"user": {"id": 2, "first_name": "Mod"}, "status": "administrator", "can_pin_messages": true},
            {"user": {"id": 3, "first_name": "Guest"}, "status": "member"}
        ]))
        .expect("members");
        let admins: Vec<_> = members.iter().filter(|m| m.is_admin()).map(|m| m.user.id).collect();
        assert_eq!(admins, vec![1, 2]);
        assert_eq!(members[1].can_pin_messages, Some(true));
        assert_eq!(members[0].can_pin_messages, None);
    }
}
