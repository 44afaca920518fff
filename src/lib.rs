//! dotdeps - dependency closures and binary loading for .NET projects
//!
//! This crate reads a project's `project.assets.json` lock file into a
//! typed document, validates each target framework's dependency graph
//! against it, and loads the binaries a compilation of that framework
//! needs, reporting what loaded and what did not.

pub mod assets;
pub mod core;
pub mod loader;
pub mod ops;
pub mod resolver;
pub mod util;

/// Test utilities and mocks for dotdeps unit tests.
///
/// This module is only available when compiling with `--cfg test` or
/// running tests. It provides an in-memory loader context and lock-file
/// fixtures.
#[cfg(test)]
pub mod test_support;

pub use assets::ProjectAssetsDocument;
pub use core::{ParseError, SemanticVersion, TargetFrameworkMoniker, VersionedText};
pub use loader::{
    AssemblyName, CompilationReference, CompilationReferenceSet, LoadStatus, LoaderContext,
    ProbingLoaderContext,
};
pub use resolver::{resolve_framework_dependencies, DependencyGraph, GraphError};
