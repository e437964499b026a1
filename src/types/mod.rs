//! Purpose: Concrete descriptors and typed structs for the bot protocol's objects.
//! Exports: `ApiType`, the domain structs, their descriptors, `ALL`, `registry`.
//! Role: Typed layer on top of the generic builder; no per-type parsing code.
//! Invariants: Each struct's `descriptor()` is the only schema its conversion trusts.
//! Invariants: `ALL` is closed under nested references and validates cleanly.

mod chat;
mod chat_member;
mod media;
mod message;
mod update;
mod user;

pub use chat::{CHAT, Chat};
pub use chat_member::{CHAT_MEMBER, ChatMember};
pub use media::{CHAT_PHOTO, CONTACT, ChatPhoto, Contact, PHOTO_SIZE, PhotoSize};
pub use message::{MESSAGE, MESSAGE_ENTITY, Message, MessageEntity};
pub use update::{UPDATE, Update};
pub use user::{USER, User, users_from_response};

use crate::core::builder::{build, build_many};
use crate::core::error::{Error, ErrorKind};
use crate::core::object::Object;
use crate::core::registry::Registry;
use crate::core::schema::TypeDescriptor;
use serde_json::Value;
use std::sync::OnceLock;

/// Every descriptor this crate declares.
pub static ALL: &[&TypeDescriptor] = &[
    &CHAT,
    &CHAT_MEMBER,
    &CHAT_PHOTO,
    &CONTACT,
    &MESSAGE,
    &MESSAGE_ENTITY,
    &PHOTO_SIZE,
    &UPDATE,
    &USER,
];

/// A domain struct materialized from its descriptor.
pub trait ApiType: Sized {
    fn descriptor() -> &'static TypeDescriptor;

    /// Moves fields out of an object built from `descriptor()`.
    fn from_object(object: Object) -> Result<Self, Error>;

    fn from_response(raw: &Value) -> Result<Self, Error> {
        Self::from_object(build(Self::descriptor(), raw)?)
    }

    fn many_from_response(raw: &Value) -> Result<Vec<Self>, Error> {
        build_many(Self::descriptor(), raw)?
            .into_iter()
            .map(Self::from_object)
            .collect()
    }
}

/// Process-wide registry over `ALL`, built on first use.
pub fn registry() -> Result<&'static Registry, Error> {
    static REGISTRY: OnceLock<Result<Registry, Error>> = OnceLock::new();
    REGISTRY
        .get_or_init(|| Registry::new(ALL))
        .as_ref()
        .map_err(|err| {
            Error::new(ErrorKind::Internal)
                .with_message(format!("built-in schema is invalid: {err}"))
        })
}

pub(crate) fn nested<T: ApiType>(object: &mut Object, name: &str) -> Result<Option<T>, Error> {
    object.take_object(name)?.map(T::from_object).transpose()
}

pub(crate) fn nested_boxed<T: ApiType>(
    object: &mut Object,
    name: &str,
) -> Result<Option<Box<T>>, Error> {
    Ok(nested(object, name)?.map(Box::new))
}

pub(crate) fn sequence<T: ApiType>(
    object: &mut Object,
    name: &str,
) -> Result<Option<Vec<T>>, Error> {
    object
        .take_sequence(name)?
        .map(|items| items.into_iter().map(T::from_object).collect())
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::{ALL, registry};
    use crate::core::validate::validate_descriptors;

    #[test]
    fn builtin_descriptors_validate() {
        let report = validate_descriptors(ALL);
        assert!(report.is_ok(), "{:?}", report.issues);
        assert_eq!(report.type_count, ALL.len());
    }

    #[test]
    fn registry_is_shared_and_complete() {
        let first = registry().expect("registry");
        let second = registry().expect("registry");
        assert!(std::ptr::eq(first, second));
        assert_eq!(first.len(), ALL.len());
        assert!(first.get("Chat").is_some());
        assert!(first.get("Update").is_some());
    }
}
