//! Core data structures for dotdeps.
//!
//! This module contains the leaf types used throughout dotdeps:
//! - Versions, library keys and version constraints
//! - Target framework monikers
//! - The loosely-typed value tree lock files are read into
//! - Parse errors

pub mod errors;
pub mod framework;
pub mod value;
pub mod version;

pub use errors::ParseError;
pub use framework::{FrameworkFamily, MonikerStyle, TargetFrameworkMoniker};
pub use value::{Lookup, Map, Value};
pub use version::{
    evaluate_constraint, DependencyRequirement, SemanticVersion, VersionConstraint,
    VersionRequirement, VersionedText,
};
