//! High-level operations.
//!
//! This module contains the implementation of dotdeps commands.

pub mod assets;
pub mod compile;

pub use assets::{diagnose, find_assets_file, load_assets, project_dir_for, LockFileContext};
pub use compile::{
    plan_references, probing_context, resolve_compilation, CompilationOutcome, CompilationRequest,
};
