//! Purpose: Check a set of descriptors for schema invariants before use.
//! Exports: `ValidationReport`, `ValidationStatus`, `ValidationIssue`, `validate_descriptors`.
//! Role: Startup gate for the registry and the `schema` CLI diagnostics.
//! Invariants: Validation is read-only and reports every issue, not just the first.
//! Invariants: Issue codes are stable: `duplicate-field`, `undeclared-required`, `name-translation`, `unregistered-nested`, `duplicate-type`.

use super::error::{Error, ErrorKind};
use super::naming::is_round_trip;
use super::schema::TypeDescriptor;
use std::collections::HashSet;

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ValidationStatus {
    Ok,
    Invalid,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ValidationIssue {
    pub code: String,
    pub message: String,
    pub type_name: &'static str,
    pub field: Option<String>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ValidationReport {
    pub status: ValidationStatus,
    pub type_count: usize,
    pub issues: Vec<ValidationIssue>,
    pub issue_count: usize,
}

impl ValidationReport {
    pub fn ok(type_count: usize) -> Self {
        Self {
            status: ValidationStatus::Ok,
            type_count,
            issues: Vec::new(),
            issue_count: 0,
        }
    }

    pub fn set_issues(mut self, issues: Vec<ValidationIssue>) -> Self {
        self.issue_count = issues.len();
        self.issues = issues;
        self.status = if self.issue_count == 0 {
            ValidationStatus::Ok
        } else {
            ValidationStatus::Invalid
        };
        self
    }

    pub fn is_ok(&self) -> bool {
        self.status == ValidationStatus::Ok
    }

    pub fn to_error(&self) -> Error {
        let summary = self
            .issues
            .iter()
            .map(|issue| format!("{}: {}", issue.code, issue.message))
            .collect::<Vec<_>>()
            .join("; ");
        let mut err = Error::new(ErrorKind::Usage)
            .with_message(format!("invalid schema ({} issues): {summary}", self.issue_count));
        if let Some(first) = self.issues.first() {
            err = err.with_type(first.type_name);
            if let Some(field) = &first.field {
                err = err.with_field(field.clone());
            }
        }
        err
    }
}

pub fn validate_descriptors(descriptors: &[&'static TypeDescriptor]) -> ValidationReport {
    let mut issues = Vec::new();
    let mut type_names = HashSet::new();

    for descriptor in descriptors {
        if !type_names.insert(descriptor.name) {
            issues.push(issue(
                "duplicate-type",
                format!("type {} declared more than once", descriptor.name),
                descriptor,
                None,
            ));
        }

        let mut seen = HashSet::new();
        for field in descriptor.fields {
            if !seen.insert(field.name) {
                issues.push(issue(
                    "duplicate-field",
                    format!("field {} declared more than once", field.name),
                    descriptor,
                    Some(field.name),
                ));
            }
            if !is_round_trip(field.name) {
                issues.push(issue(
                    "name-translation",
                    format!("field {} does not survive domain name translation", field.name),
                    descriptor,
                    Some(field.name),
                ));
            }
            if let Some(nested) = field.spec.nested_descriptor() {
                if !descriptors.iter().any(|known| std::ptr::eq(*known, nested)) {
                    issues.push(issue(
                        "unregistered-nested",
                        format!("field {} refers to unregistered type {}", field.name, nested.name),
                        descriptor,
                        Some(field.name),
                    ));
                }
            }
        }

        for required in descriptor.required {
            if descriptor.field(required).is_none() {
                issues.push(issue(
                    "undeclared-required",
                    format!("required field {required} is not in the field map"),
                    descriptor,
                    Some(*required),
                ));
            }
        }
    }

    ValidationReport::ok(descriptors.len()).set_issues(issues)
}

fn issue(
    code: &str,
    message: String,
    descriptor: &TypeDescriptor,
    field: Option<&str>,
) -> ValidationIssue {
    ValidationIssue {
        code: code.to_string(),
        message,
        type_name: descriptor.name,
        field: field.map(str::to_string),
    }
}

#[cfg(test)]
mod tests {
    use super::{ValidationStatus, validate_descriptors};
    use crate::core::error::ErrorKind;
    use crate::core::schema::{FieldDef, TypeDescriptor};

    static ITEM: TypeDescriptor = TypeDescriptor {
        name: "Item",
        fields: &[FieldDef::id("id"), FieldDef::string("item_name")],
        required: &["id"],
    };

    static BROKEN: TypeDescriptor = TypeDescriptor {
        name: "Broken",
        fields: &[
            FieldDef::id("id"),
            FieldDef::id("id"),
            FieldDef::string("photo_2"),
            FieldDef::nested("orphan", &ORPHAN),
        ],
        required: &["id", "title"],
    };

    static ORPHAN: TypeDescriptor = TypeDescriptor {
        name: "Orphan",
        fields: &[],
        required: &[],
    };

    #[test]
    fn valid_set_reports_ok() {
        let report = validate_descriptors(&[&ITEM]);
        assert_eq!(report.status, ValidationStatus::Ok);
        assert_eq!(report.type_count, 1);
        assert!(report.issues.is_empty());
    }

    #[test]
    fn every_issue_is_reported() {
        let report = validate_descriptors(&[&ITEM, &BROKEN]);
        assert_eq!(report.status, ValidationStatus::Invalid);
        let codes: Vec<_> = report.issues.iter().map(|i| i.code.as_str()).collect();
        assert_eq!(
            codes,
            vec![
                "duplicate-field",
                "name-translation",
                "unregistered-nested",
                "undeclared-required"
            ]
        );
        assert_eq!(report.issue_count, 4);
        assert!(report.issues.iter().all(|i| i.type_name == "Broken"));
    }

    #[test]
    fn duplicate_type_names_are_rejected() {
        let report = validate_descriptors(&[&ITEM, &ITEM]);
        assert_eq!(report.issues[0].code, "duplicate-type");
    }

    #[test]
    fn report_converts_to_usage_error() {
        let report = validate_descriptors(&[&BROKEN, &ORPHAN]);
        let err = report.to_error();
        assert_eq!(err.kind(), ErrorKind::Usage);
        assert_eq!(err.type_name(), Some("Broken"));
        assert!(err.message().unwrap_or_default().contains("duplicate-field"));
    }
}
