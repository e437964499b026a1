//! Purpose: Immutable name -> descriptor registry built once at startup.
//! Exports: `Registry`.
//! Role: Lets callers (CLI, dynamic decoding) pick a descriptor by type name.
//! Invariants: Only validated descriptor sets become registries.
//! Invariants: Read-only after construction; shared freely across threads.

use super::builder::{build, build_many};
use super::error::{Error, ErrorKind};
use super::object::Object;
use super::schema::TypeDescriptor;
use super::validate::validate_descriptors;
use serde_json::Value;
use std::collections::BTreeMap;

#[derive(Debug)]
pub struct Registry {
    types: BTreeMap<&'static str, &'static TypeDescriptor>,
}

impl Registry {
    pub fn new(descriptors: &[&'static TypeDescriptor]) -> Result<Self, Error> {
        let report = validate_descriptors(descriptors);
        if !report.is_ok() {
            return Err(report.to_error());
        }
        let types = descriptors
            .iter()
            .map(|descriptor| (descriptor.name, *descriptor))
            .collect();
        Ok(Self { types })
    }

    pub fn get(&self, type_name: &str) -> Option<&'static TypeDescriptor> {
        self.types.get(type_name).copied()
    }

    pub fn lookup(&self, type_name: &str) -> Result<&'static TypeDescriptor, Error> {
        self.get(type_name).ok_or_else(|| {
            Error::new(ErrorKind::Usage)
                .with_message(format!("unknown type {type_name}"))
                .with_hint("Run `botschema types` to list known types.")
        })
    }

    /// Descriptors in name order.
    pub fn descriptors(&self) -> impl Iterator<Item = &'static TypeDescriptor> + '_ {
        self.types.values().copied()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn build(&self, type_name: &str, raw: &Value) -> Result<Object, Error> {
        build(self.lookup(type_name)?, raw)
    }

    pub fn build_many(&self, type_name: &str, raw: &Value) -> Result<Vec<Object>, Error> {
        build_many(self.lookup(type_name)?, raw)
    }
}

#[cfg(test)]
mod tests {
    use super::Registry;
    use crate::core::error::ErrorKind;
    use crate::core::schema::{FieldDef, TypeDescriptor};
    use serde_json::json;

    static TAG: TypeDescriptor = TypeDescriptor {
        name: "Tag",
        fields: &[FieldDef::string("label")],
        required: &["label"],
    };

    static POST: TypeDescriptor = TypeDescriptor {
        name: "Post",
        fields: &[FieldDef::id("id"), FieldDef::many("tags", &TAG)],
        required: &["id"],
    };

    #[test]
    fn lookup_and_build_by_name() {
        let registry = Registry::new(&[&POST, &TAG]).expect("registry");
        assert_eq!(registry.len(), 2);
        let names: Vec<_> = registry.descriptors().map(|d| d.name).collect();
        assert_eq!(names, vec!["Post", "Tag"]);

        let post = registry
            .build("Post", &json!({"id": 1, "tags": [{"label": "a"}]}))
            .expect("post");
        assert_eq!(post.type_name(), "Post");

        let tags = registry
            .build_many("Tag", &json!([{"label": "a"}, {"label": "b"}]))
            .expect("tags");
        assert_eq!(tags.len(), 2);
    }

    #[test]
    fn unknown_type_is_usage_error() {
        let registry = Registry::new(&[&TAG]).expect("registry");
        let err = registry.build("Nope", &json!({})).expect_err("unknown");
        assert_eq!(err.kind(), ErrorKind::Usage);
        assert!(err.hint().is_some());
    }

    #[test]
    fn incomplete_set_is_refused() {
        let err = Registry::new(&[&POST]).expect_err("missing Tag");
        assert_eq!(err.kind(), ErrorKind::Usage);
        assert_eq!(err.field(), Some("tags"));
    }
}
