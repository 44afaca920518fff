//! Lock file discovery and loading.

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use crate::assets::{ProjectAssetsDocument, ASSETS_FILE_NAME};
use crate::core::errors::ParseError;
use crate::resolver::GraphError;
use crate::util::diagnostic::Diagnostic;

/// Directory the package manager writes the lock file into.
pub const OUTPUT_DIR_NAME: &str = "obj";

/// Locate the lock file for `path`.
///
/// A file path is returned as is. For a directory, `<dir>/project.assets.json`
/// and then `<dir>/obj/project.assets.json` are tried.
pub fn find_assets_file(path: &Path) -> Result<PathBuf> {
    if path.is_file() {
        return Ok(path.to_path_buf());
    }
    if !path.is_dir() {
        bail!("`{}` does not exist", path.display());
    }

    let candidates = [
        path.join(ASSETS_FILE_NAME),
        path.join(OUTPUT_DIR_NAME).join(ASSETS_FILE_NAME),
    ];
    for candidate in &candidates {
        if candidate.is_file() {
            return Ok(candidate.clone());
        }
    }

    bail!(
        "could not find {} in `{}` or its `{}` directory",
        ASSETS_FILE_NAME,
        path.display(),
        OUTPUT_DIR_NAME
    )
}

/// Error context naming the lock file an operation failed on.
#[derive(Debug, Clone)]
pub struct LockFileContext {
    action: &'static str,
    path: PathBuf,
}

impl LockFileContext {
    pub fn new(action: &'static str, path: &Path) -> Self {
        LockFileContext {
            action,
            path: path.to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl fmt::Display for LockFileContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to {} lock file: {}", self.action, self.path.display())
    }
}

/// Diagnostic for `err` when it wraps a parse or graph error, located at
/// the lock file named by its [`LockFileContext`].
pub fn diagnose(err: &anyhow::Error) -> Option<Diagnostic> {
    let diag = match err.downcast_ref::<ParseError>() {
        Some(parse) => parse.to_diagnostic(),
        None => err.downcast_ref::<GraphError>()?.to_diagnostic(),
    };

    Some(match err.downcast_ref::<LockFileContext>() {
        Some(lock_file) => diag.with_location(lock_file.path()),
        None => diag,
    })
}

/// Read and parse the lock file at (or under) `path`.
pub fn load_assets(path: &Path) -> Result<ProjectAssetsDocument> {
    let path = find_assets_file(path)?;
    let text = std::fs::read_to_string(&path)
        .with_context(|| LockFileContext::new("read", &path))?;

    let doc = ProjectAssetsDocument::from_json_str(&text)
        .with_context(|| LockFileContext::new("parse", &path))?;

    tracing::info!(
        "Loaded {} ({} libraries, {} frameworks)",
        path.display(),
        doc.libraries().len(),
        doc.project_frameworks().len()
    );

    Ok(doc)
}

/// Project directory owning the lock file at `assets_path`.
///
/// The lock file normally lives in the project's `obj` directory.
pub fn project_dir_for(assets_path: &Path) -> PathBuf {
    let dir = assets_path.parent().unwrap_or_else(|| Path::new("."));
    match dir.file_name() {
        Some(name) if name == OUTPUT_DIR_NAME => {
            dir.parent().unwrap_or(dir).to_path_buf()
        }
        _ => dir.to_path_buf(),
    }
}
