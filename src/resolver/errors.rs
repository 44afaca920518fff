//! Graph-level errors and diagnostics.

use miette::Diagnostic as MietteDiagnostic;
use thiserror::Error;

use crate::util::diagnostic::{suggestions, Diagnostic};

/// Where a checked requirement came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequirementOrigin {
    /// `project.frameworks.<tfm>.dependencies`
    Declared,
    /// `projectFileDependencyGroups`
    Authored,
}

impl std::fmt::Display for RequirementOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequirementOrigin::Declared => write!(f, "declared dependency"),
            RequirementOrigin::Authored => write!(f, "project file dependency"),
        }
    }
}

/// Error while cross-referencing a framework's dependencies.
#[derive(Debug, Error, MietteDiagnostic)]
pub enum GraphError {
    #[error("no target section for framework `{framework}`")]
    #[diagnostic(code(dotdeps::graph::unknown_framework))]
    UnknownFramework { framework: String },

    #[error("framework `{framework}` is not declared by the project")]
    #[diagnostic(code(dotdeps::graph::undeclared_framework))]
    UndeclaredFramework { framework: String },

    #[error("{origin} `{name}` has no resolved library for `{framework}`")]
    #[diagnostic(code(dotdeps::graph::missing_library))]
    MissingLibrary {
        name: String,
        framework: String,
        origin: RequirementOrigin,
    },

    #[error("{origin} `{name} {requirement}` is not satisfied by resolved version {actual} for `{framework}`")]
    #[diagnostic(
        code(dotdeps::graph::constraint_violation),
        help("the lock file does not describe a self-consistent restore")
    )]
    ConstraintViolation {
        name: String,
        requirement: String,
        actual: String,
        framework: String,
        origin: RequirementOrigin,
    },
}

impl GraphError {
    /// Convert to a user-facing diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            GraphError::UnknownFramework { framework } => {
                Diagnostic::error(format!("no dependency graph for `{}`", framework))
                    .with_suggestion(suggestions::LIST_FRAMEWORKS)
                    .with_suggestion(suggestions::RESTORE)
            }

            GraphError::UndeclaredFramework { framework } => {
                Diagnostic::error(format!("project does not target `{}`", framework))
                    .with_suggestion(suggestions::LIST_FRAMEWORKS)
            }

            GraphError::MissingLibrary {
                name,
                framework,
                origin,
            } => Diagnostic::error(format!("`{}` was never resolved for `{}`", name, framework))
                .with_context(format!("required as a {}", origin))
                .with_suggestion(suggestions::RESTORE),

            GraphError::ConstraintViolation {
                name,
                requirement,
                actual,
                framework,
                origin,
            } => Diagnostic::error(format!("inconsistent lock file for `{}`", framework))
                .with_context(format!("{} requires {} {}", origin, name, requirement))
                .with_context(format!("lock file resolved {} {}", name, actual))
                .with_suggestion(suggestions::RESTORE),
        }
    }
}
