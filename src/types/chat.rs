use super::media::CHAT_PHOTO;
use super::message::MESSAGE;
use super::{ApiType, ChatPhoto, Message, nested, nested_boxed};
use crate::api::{BotApi, ChatActions, RemoteInvoker};
use crate::core::error::Error;
use crate::core::object::Object;
use crate::core::schema::{FieldDef, TypeDescriptor};

pub static CHAT: TypeDescriptor = TypeDescriptor {
    name: "Chat",
    fields: &[
        FieldDef::id("id"),
        FieldDef::string("type"),
        FieldDef::string("title"),
        FieldDef::string("username"),
        FieldDef::string("first_name"),
        FieldDef::string("last_name"),
        FieldDef::bool("all_members_are_administrators"),
        FieldDef::nested("photo", &CHAT_PHOTO),
        FieldDef::string("description"),
        FieldDef::string("invite_link"),
        FieldDef::nested("pinned_message", &MESSAGE),
        FieldDef::string("sticker_set_name"),
        FieldDef::bool("can_set_sticker_set"),
    ],
    required: &["id", "type"],
};

/// A private chat, group, supergroup or channel.
#[derive(Clone, Debug, PartialEq)]
pub struct Chat {
    /// Fits in 52 bits; the wire may deliver it as a number or a string.
    pub id: i64,
    /// `private`, `group`, `supergroup` or `channel`.
    pub kind: String,
    pub title: Option<String>,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub all_members_are_administrators: Option<bool>,
    pub photo: Option<ChatPhoto>,
    pub description: Option<String>,
    pub invite_link: Option<String>,
    pub pinned_message: Option<Box<Message>>,
    pub sticker_set_name: Option<String>,
    pub can_set_sticker_set: Option<bool>,
}

impl Chat {
    pub fn is_private(&self) -> bool {
        self.kind == "private"
    }

    /// Chat-scoped operations bound to an explicit client.
    pub fn actions<'a, I: RemoteInvoker>(&'a self, api: &'a BotApi<I>) -> ChatActions<'a, I> {
        ChatActions::new(api, self.id)
    }
}

impl ApiType for Chat {
    fn descriptor() -> &'static TypeDescriptor {
        &CHAT
    }

    fn from_object(mut object: Object) -> Result<Self, Error> {
        let id = object.take_i64("id")?;
        let kind = object.take_string("type")?;
        Ok(Self {
            id: object.require("id", id)?,
            kind: object.require("type", kind)?,
            title: object.take_string("title")?,
            username: object.take_string("username")?,
            first_name: object.take_string("firstName")?,
            last_name: object.take_string("lastName")?,
            all_members_are_administrators: object.take_bool("allMembersAreAdministrators")?,
            photo: nested(&mut object, "photo")?,
            description: object.take_string("description")?,
            invite_link: object.take_string("inviteLink")?,
            pinned_message: nested_boxed(&mut object, "pinnedMessage")?,
            sticker_set_name: object.take_string("stickerSetName")?,
            can_set_sticker_set: object.take_bool("canSetStickerSet")?,
        })
    }
}
