//! Purpose: Single error model shared by the builder, transport, and CLI.
//! Exports: `Error`, `ErrorKind`, `to_exit_code`.
//! Role: Carries the build failure taxonomy plus transport/usage failures.
//! Invariants: Nested build failures keep the inner `Error` as `source()`.
//! Invariants: Context setters never change the kind of an error.

use std::error::Error as StdError;
use std::fmt;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    Internal,
    Usage,
    MissingRequiredField,
    TypeMismatch,
    NestedBuildFailure,
    ShapeMismatch,
    Remote,
    Io,
}

impl ErrorKind {
    /// True for the kinds produced while materializing a payload.
    pub fn is_build_failure(self) -> bool {
        matches!(
            self,
            ErrorKind::MissingRequiredField
                | ErrorKind::TypeMismatch
                | ErrorKind::NestedBuildFailure
                | ErrorKind::ShapeMismatch
        )
    }
}

#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    message: Option<String>,
    hint: Option<String>,
    type_name: Option<&'static str>,
    field: Option<String>,
    expected: Option<String>,
    actual: Option<String>,
    index: Option<usize>,
    status: Option<u16>,
    source: Option<Box<dyn StdError + Send + Sync>>,
}

impl Error {
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            message: None,
            hint: None,
            type_name: None,
            field: None,
            expected: None,
            actual: None,
            index: None,
            status: None,
            source: None,
        }
    }

    pub fn missing_field(type_name: &'static str, field: &str) -> Self {
        Self::new(ErrorKind::MissingRequiredField)
            .with_type(type_name)
            .with_field(field)
    }

    pub fn type_mismatch(
        type_name: &'static str,
        field: &str,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self::new(ErrorKind::TypeMismatch)
            .with_type(type_name)
            .with_field(field)
            .with_expected(expected)
            .with_actual(actual)
    }

    pub fn shape_mismatch(
        type_name: &'static str,
        field: &str,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self::new(ErrorKind::ShapeMismatch)
            .with_type(type_name)
            .with_field(field)
            .with_expected(expected)
            .with_actual(actual)
    }

    pub fn nested(type_name: &'static str, field: &str, inner: Error) -> Self {
        Self::new(ErrorKind::NestedBuildFailure)
            .with_type(type_name)
            .with_field(field)
            .with_source(inner)
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn hint(&self) -> Option<&str> {
        self.hint.as_deref()
    }

    /// Name of the descriptor being built when the failure happened.
    pub fn type_name(&self) -> Option<&'static str> {
        self.type_name
    }

    /// Protocol name of the offending field.
    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }

    pub fn expected(&self) -> Option<&str> {
        self.expected.as_deref()
    }

    pub fn actual(&self) -> Option<&str> {
        self.actual.as_deref()
    }

    pub fn index(&self) -> Option<usize> {
        self.index
    }

    pub fn status(&self) -> Option<u16> {
        self.status
    }

    /// Inner build failure wrapped by a `NestedBuildFailure`.
    pub fn nested_error(&self) -> Option<&Error> {
        self.source
            .as_ref()
            .and_then(|source| source.downcast_ref::<Error>())
    }

    /// Follows nested build failures down to the first non-nested cause.
    pub fn root_cause(&self) -> &Error {
        let mut current = self;
        while current.kind == ErrorKind::NestedBuildFailure {
            match current.nested_error() {
                Some(inner) => current = inner,
                None => break,
            }
        }
        current
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn with_type(mut self, type_name: &'static str) -> Self {
        self.type_name = Some(type_name);
        self
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    pub fn with_expected(mut self, expected: impl Into<String>) -> Self {
        self.expected = Some(expected.into());
        self
    }

    pub fn with_actual(mut self, actual: impl Into<String>) -> Self {
        self.actual = Some(actual.into());
        self
    }

    pub fn with_index(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_source(mut self, source: impl StdError + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.kind)?;
        if let Some(message) = &self.message {
            write!(f, ": {message}")?;
        }
        if let Some(type_name) = self.type_name {
            write!(f, " (type: {type_name})")?;
        }
        if let Some(field) = &self.field {
            write!(f, " (field: {field})")?;
        }
        match (&self.expected, &self.actual) {
            (Some(expected), Some(actual)) => write!(f, " (expected {expected}, got {actual})")?,
            (Some(expected), None) => write!(f, " (expected {expected})")?,
            (None, Some(actual)) => write!(f, " (got {actual})")?,
            (None, None) => {}
        }
        if let Some(index) = self.index {
            write!(f, " (index: {index})")?;
        }
        if let Some(status) = self.status {
            write!(f, " (status: {status})")?;
        }
        if let Some(inner) = self.nested_error() {
            write!(f, ": {inner}")?;
        }
        Ok(())
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|source| source.as_ref() as &(dyn StdError + 'static))
    }
}

pub fn to_exit_code(kind: ErrorKind) -> i32 {
    match kind {
        ErrorKind::Internal => 1,
        ErrorKind::Usage => 2,
        ErrorKind::MissingRequiredField => 3,
        ErrorKind::TypeMismatch => 4,
        ErrorKind::NestedBuildFailure => 5,
        ErrorKind::ShapeMismatch => 6,
        ErrorKind::Remote => 7,
        ErrorKind::Io => 8,
    }
}
