use super::chat::CHAT;
use super::media::{CONTACT, PHOTO_SIZE};
use super::user::USER;
use super::{ApiType, Chat, Contact, PhotoSize, User, nested, nested_boxed, sequence};
use crate::core::error::{Error, ErrorKind};
use crate::core::object::Object;
use crate::core::schema::{FieldDef, TypeDescriptor};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

pub static MESSAGE_ENTITY: TypeDescriptor = TypeDescriptor {
    name: "MessageEntity",
    fields: &[
        FieldDef::string("type"),
        FieldDef::integer("offset"),
        FieldDef::integer("length"),
        FieldDef::string("url"),
        FieldDef::nested("user", &USER),
    ],
    required: &["type", "offset", "length"],
};

pub static MESSAGE: TypeDescriptor = TypeDescriptor {
    name: "Message",
    fields: &[
        FieldDef::id("message_id"),
        FieldDef::nested("from", &USER),
        FieldDef::integer("date"),
        FieldDef::nested("chat", &CHAT),
        FieldDef::nested("forward_from", &USER),
        FieldDef::integer("forward_date"),
        FieldDef::nested("reply_to_message", &MESSAGE),
        FieldDef::integer("edit_date"),
        FieldDef::string("author_signature"),
        FieldDef::string("text"),
        FieldDef::many("entities", &MESSAGE_ENTITY),
        FieldDef::string("caption"),
        FieldDef::many("photo", &PHOTO_SIZE),
        FieldDef::nested("contact", &CONTACT),
        FieldDef::many("new_chat_members", &USER),
        FieldDef::nested("left_chat_member", &USER),
        FieldDef::string("new_chat_title"),
        FieldDef::nested("pinned_message", &MESSAGE),
    ],
    required: &["message_id", "date", "chat"],
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MessageEntity {
    pub kind: String,
    /// Offset in UTF-16 code units.
    pub offset: i64,
    pub length: i64,
    pub url: Option<String>,
    pub user: Option<User>,
}

impl ApiType for MessageEntity {
    fn descriptor() -> &'static TypeDescriptor {
        &MESSAGE_ENTITY
    }

    fn from_object(mut object: Object) -> Result<Self, Error> {
        let kind = object.take_string("type")?;
        let offset = object.take_i64("offset")?;
        let length = object.take_i64("length")?;
        Ok(Self {
            kind: object.require("type", kind)?,
            offset: object.require("offset", offset)?,
            length: object.require("length", length)?,
            url: object.take_string("url")?,
            user: nested(&mut object, "user")?,
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Message {
    pub message_id: i64,
    pub from: Option<User>,
    /// Unix seconds.
    pub date: i64,
    pub chat: Box<Chat>,
    pub forward_from: Option<User>,
    pub forward_date: Option<i64>,
    pub reply_to_message: Option<Box<Message>>,
    pub edit_date: Option<i64>,
    pub author_signature: Option<String>,
    pub text: Option<String>,
    pub entities: Option<Vec<MessageEntity>>,
    pub caption: Option<String>,
    pub photo: Option<Vec<PhotoSize>>,
    pub contact: Option<Contact>,
    pub new_chat_members: Option<Vec<User>>,
    pub left_chat_member: Option<User>,
    pub new_chat_title: Option<String>,
    pub pinned_message: Option<Box<Message>>,
}

impl Message {
    pub fn date_rfc3339(&self) -> Result<String, Error> {
        let ts = OffsetDateTime::from_unix_timestamp(self.date).map_err(|err| {
            Error::new(ErrorKind::Usage)
                .with_message("message date out of range")
                .with_source(err)
        })?;
        ts.format(&Rfc3339).map_err(|err| {
            Error::new(ErrorKind::Internal)
                .with_message("timestamp format failed")
                .with_source(err)
        })
    }

    /// Text covered by the first `bot_command` entity, e.g. `/start`.
    pub fn command(&self) -> Option<String> {
        let text = self.text.as_deref()?;
        let entity = self
            .entities
            .as_ref()?
            .iter()
            .find(|entity| entity.kind == "bot_command")?;
        let units: Vec<u16> = text.encode_utf16().collect();
        let start = usize::try_from(entity.offset).ok()?;
        let end = start.checked_add(usize::try_from(entity.length).ok()?)?;
        String::from_utf16(units.get(start..end)?).ok()
    }
}

impl ApiType for Message {
    fn descriptor() -> &'static TypeDescriptor {
        &MESSAGE
    }

    fn from_object(mut object: Object) -> Result<Self, Error> {
        let message_id = object.take_i64("messageId")?;
        let date = object.take_i64("date")?;
        let chat = nested_boxed::<Chat>(&mut object, "chat")?;
        Ok(Self {
            message_id: object.require("messageId", message_id)?,
            from: nested(&mut object, "from")?,
            date: object.require("date", date)?,
            chat: object.require("chat", chat)?,
            forward_from: nested(&mut object, "forwardFrom")?,
            forward_date: object.take_i64("forwardDate")?,
            reply_to_message: nested_boxed(&mut object, "replyToMessage")?,
            edit_date: object.take_i64("editDate")?,
            author_signature: object.take_string("authorSignature")?,
            text: object.take_string("text")?,
            entities: sequence(&mut object, "entities")?,
            caption: object.take_string("caption")?,
            photo: sequence(&mut object, "photo")?,
            contact: nested(&mut object, "contact")?,
            new_chat_members: sequence(&mut object, "newChatMembers")?,
            left_chat_member: nested(&mut object, "leftChatMember")?,
            new_chat_title: object.take_string("newChatTitle")?,
            pinned_message: nested_boxed(&mut object, "pinnedMessage")?,
        })
    }
}
