//! Non-fatal schema build diagnostics.
//!
//! Every recoverable condition hit while building a schema is pushed here
//! and mirrored to `tracing`, so callers can assert on the list instead of
//! scraping log output.

use serde::Serialize;
use tracing::{error, warn};

/// Category of a recoverable build condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DiagnosticKind {
    /// A column kind outside the supported set; the column was dropped.
    UnsupportedType,
    /// A second definition under an existing name; the first was kept.
    NameCollision,
    /// A name that is not a valid GraphQL identifier; it was dropped.
    InvalidName,
    /// No materialized source exists; `Query` got the sentinel field.
    EmptyQueryCapability,
}

impl DiagnosticKind {
    /// Returns the code used in logs and CLI output.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnsupportedType => "UNSUPPORTED_TYPE",
            Self::NameCollision => "NAME_COLLISION",
            Self::InvalidName => "INVALID_NAME",
            Self::EmptyQueryCapability => "EMPTY_QUERY_CAPABILITY",
        }
    }
}

impl std::fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// A single recorded diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
}

/// Ordered collection of diagnostics for one build.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a diagnostic and logs it.
    pub fn push(&mut self, kind: DiagnosticKind, message: impl Into<String>) {
        let message = message.into();
        match kind {
            DiagnosticKind::EmptyQueryCapability => {
                error!(code = kind.code(), "{message}");
            }
            _ => {
                warn!(code = kind.code(), "{message}");
            }
        }
        self.entries.push(Diagnostic { kind, message });
    }

    pub fn unsupported_type(&mut self, message: impl Into<String>) {
        self.push(DiagnosticKind::UnsupportedType, message);
    }

    /// Records that `name` was defined twice.
    pub fn name_collision(&mut self, name: &str) {
        self.push(DiagnosticKind::NameCollision, format!("{name} already exists."));
    }

    pub fn invalid_name(&mut self, name: &str) {
        self.push(
            DiagnosticKind::InvalidName,
            format!("`{name}` is not a valid GraphQL name"),
        );
    }

    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    /// Iterates over diagnostics of one kind.
    pub fn of_kind(&self, kind: DiagnosticKind) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter().filter(move |d| d.kind == kind)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_keeps_order() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.unsupported_type("type MAP is not supported");
        diagnostics.name_collision("ADDRESS");

        let kinds: Vec<_> = diagnostics.entries().iter().map(|d| d.kind).collect();
        assert_eq!(
            kinds,
            vec![DiagnosticKind::UnsupportedType, DiagnosticKind::NameCollision]
        );
        assert_eq!(diagnostics.entries()[1].message, "ADDRESS already exists.");
    }

    #[test]
    fn test_of_kind() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.unsupported_type("a");
        diagnostics.invalid_name("my-col");
        diagnostics.unsupported_type("b");

        assert_eq!(diagnostics.of_kind(DiagnosticKind::UnsupportedType).count(), 2);
        assert_eq!(diagnostics.of_kind(DiagnosticKind::InvalidName).count(), 1);
        assert_eq!(diagnostics.len(), 3);
    }

    #[test]
    fn test_codes() {
        assert_eq!(DiagnosticKind::NameCollision.to_string(), "NAME_COLLISION");
        assert_eq!(
            DiagnosticKind::EmptyQueryCapability.code(),
            "EMPTY_QUERY_CAPABILITY"
        );
    }
}
