//! Purpose: Declarative per-type schema: field map plus required field set.
//! Exports: `TypeDescriptor`, `FieldDef`, `FieldSpec`, `ScalarKind`.
//! Role: Immutable metadata consulted by the generic builder.
//! Invariants: Descriptors are `'static` values declared once and never mutated.
//! Invariants: Nested references are plain `&'static TypeDescriptor`, so cycles are allowed.

use std::fmt;

/// Primitive kinds a scalar field may declare.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum ScalarKind {
    String,
    /// Identifier: integer or numeric string, stored as `i64`.
    Id,
    Integer,
    Bool,
    Float,
    /// Opaque JSON; the only kind that keeps an explicit `null`.
    Any,
}

impl ScalarKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ScalarKind::String => "string",
            ScalarKind::Id => "id",
            ScalarKind::Integer => "integer",
            ScalarKind::Bool => "bool",
            ScalarKind::Float => "float",
            ScalarKind::Any => "any",
        }
    }

    pub fn allows_null(self) -> bool {
        matches!(self, ScalarKind::Any)
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy)]
pub enum FieldSpec {
    Scalar(ScalarKind),
    Nested(&'static TypeDescriptor),
    NestedSequence(&'static TypeDescriptor),
}

impl FieldSpec {
    pub fn nested_descriptor(&self) -> Option<&'static TypeDescriptor> {
        match self {
            FieldSpec::Scalar(_) => None,
            FieldSpec::Nested(descriptor) | FieldSpec::NestedSequence(descriptor) => {
                Some(descriptor)
            }
        }
    }

    pub fn allows_null(&self) -> bool {
        matches!(self, FieldSpec::Scalar(kind) if kind.allows_null())
    }

    /// Short label used in schema listings and error context.
    pub fn describe(&self) -> String {
        match self {
            FieldSpec::Scalar(kind) => kind.as_str().to_string(),
            FieldSpec::Nested(descriptor) => descriptor.name.to_string(),
            FieldSpec::NestedSequence(descriptor) => format!("[{}]", descriptor.name),
        }
    }
}

// Nested descriptors print by name only; a derived impl would recurse forever on cyclic schemas.
impl fmt::Debug for FieldSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldSpec::Scalar(kind) => write!(f, "Scalar({kind:?})"),
            FieldSpec::Nested(descriptor) => write!(f, "Nested({})", descriptor.name),
            FieldSpec::NestedSequence(descriptor) => {
                write!(f, "NestedSequence({})", descriptor.name)
            }
        }
    }
}

impl PartialEq for FieldSpec {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (FieldSpec::Scalar(a), FieldSpec::Scalar(b)) => a == b,
            (FieldSpec::Nested(a), FieldSpec::Nested(b))
            | (FieldSpec::NestedSequence(a), FieldSpec::NestedSequence(b)) => {
                std::ptr::eq(*a, *b)
            }
            _ => false,
        }
    }
}

impl Eq for FieldSpec {}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FieldDef {
    pub name: &'static str,
    pub spec: FieldSpec,
}

impl FieldDef {
    pub const fn scalar(name: &'static str, kind: ScalarKind) -> Self {
        Self {
            name,
            spec: FieldSpec::Scalar(kind),
        }
    }

    pub const fn string(name: &'static str) -> Self {
        Self::scalar(name, ScalarKind::String)
    }

    pub const fn id(name: &'static str) -> Self {
        Self::scalar(name, ScalarKind::Id)
    }

    pub const fn integer(name: &'static str) -> Self {
        Self::scalar(name, ScalarKind::Integer)
    }

    pub const fn bool(name: &'static str) -> Self {
        Self::scalar(name, ScalarKind::Bool)
    }

    pub const fn float(name: &'static str) -> Self {
        Self::scalar(name, ScalarKind::Float)
    }

    pub const fn any(name: &'static str) -> Self {
        Self::scalar(name, ScalarKind::Any)
    }

    pub const fn nested(name: &'static str, descriptor: &'static TypeDescriptor) -> Self {
        Self {
            name,
            spec: FieldSpec::Nested(descriptor),
        }
    }

    pub const fn many(name: &'static str, descriptor: &'static TypeDescriptor) -> Self {
        Self {
            name,
            spec: FieldSpec::NestedSequence(descriptor),
        }
    }
}

/// Schema of one domain shape.
///
/// `fields` is the field map keyed by protocol name, in declaration order.
/// `required` lists protocol names that must be present in every payload and
/// is checked in its own declaration order.
pub struct TypeDescriptor {
    pub name: &'static str,
    pub fields: &'static [FieldDef],
    pub required: &'static [&'static str],
}

impl TypeDescriptor {
    pub fn field(&self, protocol_name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|field| field.name == protocol_name)
    }

    pub fn is_required(&self, protocol_name: &str) -> bool {
        self.required.contains(&protocol_name)
    }
}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("name", &self.name)
            .field("fields", &self.fields)
            .field("required", &self.required)
            .finish()
    }
}

impl PartialEq for TypeDescriptor {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self, other) || self.name == other.name
    }
}

impl Eq for TypeDescriptor {}

#[cfg(test)]
mod tests {
    use super::{FieldDef, FieldSpec, ScalarKind, TypeDescriptor};

    static LEAF: TypeDescriptor = TypeDescriptor {
        name: "Leaf",
        fields: &[FieldDef::string("label")],
        required: &["label"],
    };

    static NODE: TypeDescriptor = TypeDescriptor {
        name: "Node",
        fields: &[
            FieldDef::id("id"),
            FieldDef::nested("leaf", &LEAF),
            FieldDef::many("children", &NODE),
            FieldDef::any("extra"),
        ],
        required: &["id"],
    };

    #[test]
    fn field_lookup_uses_protocol_names() {
        assert_eq!(NODE.field("id").map(|f| f.spec), Some(FieldSpec::Scalar(ScalarKind::Id)));
        assert!(NODE.field("missing").is_none());
        assert!(NODE.is_required("id"));
        assert!(!NODE.is_required("leaf"));
    }

    #[test]
    fn self_referencing_descriptor_prints_by_name() {
        let text = format!("{NODE:?}");
        assert!(text.contains("NestedSequence(Node)"));
        assert!(text.contains("Nested(Leaf)"));
    }

    #[test]
    fn describe_labels_each_spec() {
        let labels: Vec<_> = NODE.fields.iter().map(|f| f.spec.describe()).collect();
        assert_eq!(labels, vec!["id", "Leaf", "[Node]", "any"]);
        assert!(NODE.field("extra").expect("extra").spec.allows_null());
    }
}
