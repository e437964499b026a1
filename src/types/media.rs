use super::ApiType;
use crate::core::error::Error;
use crate::core::object::Object;
use crate::core::schema::{FieldDef, TypeDescriptor};

pub static CHAT_PHOTO: TypeDescriptor = TypeDescriptor {
    name: "ChatPhoto",
    fields: &[FieldDef::string("small_file_id"), FieldDef::string("big_file_id")],
    required: &["small_file_id", "big_file_id"],
};

pub static PHOTO_SIZE: TypeDescriptor = TypeDescriptor {
    name: "PhotoSize",
    fields: &[
        FieldDef::string("file_id"),
        FieldDef::integer("width"),
        FieldDef::integer("height"),
        FieldDef::integer("file_size"),
    ],
    required: &["file_id", "width", "height"],
};

pub static CONTACT: TypeDescriptor = TypeDescriptor {
    name: "Contact",
    fields: &[
        FieldDef::string("phone_number"),
        FieldDef::string("first_name"),
        FieldDef::string("last_name"),
        FieldDef::id("user_id"),
    ],
    required: &["phone_number", "first_name"],
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChatPhoto {
    pub small_file_id: String,
    pub big_file_id: String,
}

impl ApiType for ChatPhoto {
    fn descriptor() -> &'static TypeDescriptor {
        &CHAT_PHOTO
    }

    fn from_object(mut object: Object) -> Result<Self, Error> {
        let small = object.take_string("smallFileId")?;
        let big = object.take_string("bigFileId")?;
        Ok(Self {
            small_file_id: object.require("smallFileId", small)?,
            big_file_id: object.require("bigFileId", big)?,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PhotoSize {
    pub file_id: String,
    pub width: i64,
    pub height: i64,
    pub file_size: Option<i64>,
}

impl ApiType for PhotoSize {
    fn descriptor() -> &'static TypeDescriptor {
        &PHOTO_SIZE
    }

    fn from_object(mut object: Object) -> Result<Self, Error> {
        let file_id = object.take_string("fileId")?;
        let width = object.take_i64("width")?;
        let height = object.take_i64("height")?;
        Ok(Self {
            file_id: object.require("fileId", file_id)?,
            width: object.require("width", width)?,
            height: object.require("height", height)?,
            file_size: object.take_i64("fileSize")?,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Contact {
    pub phone_number: String,
    pub first_name: String,
    pub last_name: Option<String>,
    pub user_id: Option<i64>,
}

impl ApiType for Contact {
    fn descriptor() -> &'static TypeDescriptor {
        &CONTACT
    }

    fn from_object(mut object: Object) -> Result<Self, Error> {
        let phone_number = object.take_string("phoneNumber")?;
        let first_name = object.take_string("firstName")?;
        Ok(Self {
            phone_number: object.require("phoneNumber", phone_number)?,
            first_name: object.require("firstName", first_name)?,
            last_name: object.take_string("lastName")?,
            user_id: object.take_i64("userId")?,
        })
    }
}
