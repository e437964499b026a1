use super::ApiType;
use crate::core::builder::build_many;
use crate::core::error::Error;
use crate::core::object::Object;
use crate::core::schema::{FieldDef, TypeDescriptor};
use serde_json::Value;

pub static USER: TypeDescriptor = TypeDescriptor {
    name: "User",
    fields: &[
        FieldDef::id("id"),
        FieldDef::bool("is_bot"),
        FieldDef::string("first_name"),
        FieldDef::string("last_name"),
        FieldDef::string("username"),
        FieldDef::string("language_code"),
    ],
    required: &["id", "first_name"],
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub is_bot: Option<bool>,
    pub first_name: String,
    pub last_name: Option<String>,
    pub username: Option<String>,
    pub language_code: Option<String>,
}

impl User {
    /// `first last`, or just the first name.
    pub fn full_name(&self) -> String {
        match &self.last_name {
            Some(last) => format!("{} {last}", self.first_name),
            None => self.first_name.clone(),
        }
    }
}

impl ApiType for User {
    fn descriptor() -> &'static TypeDescriptor {
        &USER
    }

    fn from_object(mut object: Object) -> Result<Self, Error> {
        let id = object.take_i64("id")?;
        let first_name = object.take_string("firstName")?;
        Ok(Self {
            id: object.require("id", id)?,
            is_bot: object.take_bool("isBot")?,
            first_name: object.require("firstName", first_name)?,
            last_name: object.take_string("lastName")?,
            username: object.take_string("username")?,
            language_code: object.take_string("languageCode")?,
        })
    }
}

/// Builds a list of users, e.g. the members returned by a group query.
pub fn users_from_response(raw: &Value) -> Result<Vec<User>, Error> {
    build_many(&USER, raw)?
        .into_iter()
        .map(User::from_object)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{User, users_from_response};
    use crate::core::error::ErrorKind;
    use crate::types::ApiType;
    use serde_json::json;

    #[test]
    fn user_from_response_fills_optional_fields() {
        let user = User::from_response(&json!({
            "id": 10,
            "is_bot": false,
            "first_name": "Ada",
            "last_name": "Lovelace",
            "language_code": "en"
        }))
        .expect("user");
        assert_eq!(user.id, 10);
        assert_eq!(user.is_bot, Some(false));
        assert_eq!(user.username, None);
        assert_eq!(user.full_name(), "Ada Lovelace");
    }

    #[test]
    fn users_keep_input_order() {
        let users = users_from_response(&json!([
            {"id": 3, "first_name": "C"},
            {"id": "1", "first_name": "A"},
            {"id": 2, "first_name": "B"}
        ]))
        .expect("users");
        let ids: Vec<_> = users.iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn one_bad_user_fails_the_list() {
        let err = users_from_response(&json!([{"id": 1, "first_name": "A"}, {"id": 2}]))
            .expect_err("missing first_name");
        assert_eq!(err.kind(), ErrorKind::MissingRequiredField);
        assert_eq!(err.field(), Some("first_name"));
        assert_eq!(err.index(), Some(1));
    }
}
