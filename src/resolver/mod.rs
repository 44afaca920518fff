//! Dependency graph resolution.
//!
//! The lock file already pins every version, so resolution here is a
//! cross-referencing pass: the declared and authored requirements of one
//! framework are checked against that framework's target section and the
//! library table. Nothing is fetched and no versions are chosen.

pub mod errors;
pub mod graph;

pub use errors::{GraphError, RequirementOrigin};
pub use graph::{
    fallback_candidates, resolve_framework_dependencies, resolve_with_fallback, DependencyGraph,
    FallbackPolicy, FrameworkResolution, ResolvedLibrary,
};
