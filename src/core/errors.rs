//! Parse errors for the version algebra and the lock-file document model.
//!
//! Parsing is fail-fast: the first error aborts the whole document, and the
//! error chain names the property, the entity being built and the operation
//! that was reading it.

use miette::Diagnostic as MietteDiagnostic;
use thiserror::Error;

use crate::core::framework::MonikerStyle;
use crate::util::diagnostic::{suggestions, Diagnostic};

/// Error raised while parsing lock-file text or algebra tokens.
#[derive(Debug, Error, MietteDiagnostic)]
pub enum ParseError {
    #[error("malformed document at line {line}, column {column}: {message}")]
    #[diagnostic(code(dotdeps::parse::syntax))]
    Syntax {
        line: usize,
        column: usize,
        message: String,
    },

    #[error("`{entity}` is missing required property `{property}` (in {operation})")]
    #[diagnostic(code(dotdeps::parse::missing_property))]
    MissingProperty {
        property: String,
        entity: &'static str,
        operation: &'static str,
    },

    #[error(
        "property `{property}` of `{entity}` should be {expected} but is {found} (in {operation})"
    )]
    #[diagnostic(code(dotdeps::parse::type_mismatch))]
    TypeMismatch {
        property: String,
        entity: &'static str,
        operation: &'static str,
        expected: &'static str,
        found: &'static str,
    },

    #[error("property `{property}` of `{entity}` matches several keys: {} (in {operation})", .candidates.join(", "))]
    #[diagnostic(code(dotdeps::parse::ambiguous_property))]
    AmbiguousProperty {
        property: String,
        entity: &'static str,
        operation: &'static str,
        candidates: Vec<String>,
    },

    #[error("invalid value for `{property}` of `{entity}`: {reason} (in {operation})")]
    #[diagnostic(code(dotdeps::parse::invalid_value))]
    InvalidValue {
        property: String,
        entity: &'static str,
        operation: &'static str,
        reason: String,
    },

    #[error("invalid version `{text}`: {reason}")]
    #[diagnostic(code(dotdeps::parse::invalid_version))]
    InvalidVersion { text: String, reason: String },

    #[error("invalid `name/version` text `{text}`: {reason}")]
    #[diagnostic(code(dotdeps::parse::invalid_versioned_text))]
    InvalidVersionedText { text: String, reason: String },

    #[error("invalid {style} framework moniker `{text}`: {reason}")]
    #[diagnostic(code(dotdeps::parse::invalid_framework))]
    InvalidFramework {
        text: String,
        style: MonikerStyle,
        reason: String,
    },

    #[error("invalid version constraint `{text}`: {reason}")]
    #[diagnostic(code(dotdeps::parse::invalid_constraint))]
    InvalidConstraint { text: String, reason: String },

    #[error("target `{framework}` references library `{key}` which is not in the library table")]
    #[diagnostic(code(dotdeps::parse::unresolved_library))]
    UnresolvedLibrary { key: String, framework: String },

    #[error("failed to parse {entity} `{key}`")]
    #[diagnostic(code(dotdeps::parse::entity))]
    Entity {
        entity: &'static str,
        key: String,
        #[source]
        source: Box<ParseError>,
    },
}

impl From<serde_json::Error> for ParseError {
    fn from(e: serde_json::Error) -> Self {
        ParseError::Syntax {
            line: e.line(),
            column: e.column(),
            message: e.to_string(),
        }
    }
}

impl ParseError {
    /// Wrap this error with the entity that was being constructed.
    pub fn in_entity(self, entity: &'static str, key: impl Into<String>) -> Self {
        ParseError::Entity {
            entity,
            key: key.into(),
            source: Box::new(self),
        }
    }

    /// The innermost error of an entity chain.
    pub fn root_cause(&self) -> &ParseError {
        match self {
            ParseError::Entity { source, .. } => source.root_cause(),
            other => other,
        }
    }

    /// Entity path leading to the root cause, outermost first.
    pub fn entity_path(&self) -> Vec<String> {
        let mut path = Vec::new();
        let mut current = self;
        while let ParseError::Entity { entity, key, source } = current {
            path.push(format!("{} `{}`", entity, key));
            current = source;
        }
        path
    }

    /// Convert to a user-facing diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let mut diag = Diagnostic::error(self.root_cause().to_string());

        for location in self.entity_path() {
            diag = diag.with_context(format!("while parsing {}", location));
        }

        match self.root_cause() {
            ParseError::UnresolvedLibrary { .. } => diag.with_suggestion(suggestions::RESTORE),
            ParseError::InvalidFramework { .. } => diag.with_suggestion(suggestions::FRAMEWORK),
            _ => diag
                .with_suggestion(suggestions::RESTORE)
                .with_suggestion(suggestions::REPORT_FORMAT),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_chain_formats_root_cause_and_path() {
        let err = ParseError::MissingProperty {
            property: "type".to_string(),
            entity: "LibraryEntry",
            operation: "LibraryEntry::from_value",
        }
        .in_entity("LibraryEntry", "Newtonsoft.Json/12.0.3")
        .in_entity("document", "project.assets.json");

        assert!(matches!(
            err.root_cause(),
            ParseError::MissingProperty { .. }
        ));
        assert_eq!(err.entity_path().len(), 2);

        let output = err.to_diagnostic().format(false);
        assert!(output.contains("missing required property `type`"));
        assert!(output.contains("LibraryEntry `Newtonsoft.Json/12.0.3`"));
        assert!(output.contains("  1. help: Run `dotnet restore`"));
    }
}
