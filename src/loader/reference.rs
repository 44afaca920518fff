//! A single binary to load, and its load state machine.
//!
//! A reference carries at most one path hint and one name hint. `load` tries
//! the path first, then the name, and settles into exactly one terminal
//! state. A terminal reference is never loaded again.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::loader::context::{LoadedBinary, LoaderContext};
use crate::loader::errors::{FailureFlags, LoadError, LoadStrategy};
use crate::loader::name::AssemblyName;

/// Where a reference is in its load lifecycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoadState {
    #[default]
    Unattempted,
    Succeeded,
    Failed,
}

impl LoadState {
    pub fn is_terminal(self) -> bool {
        self != LoadState::Unattempted
    }
}

impl fmt::Display for LoadState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadState::Unattempted => write!(f, "unattempted"),
            LoadState::Succeeded => write!(f, "succeeded"),
            LoadState::Failed => write!(f, "failed"),
        }
    }
}

/// One binary required for compilation.
#[derive(Debug)]
pub struct CompilationReference {
    name: Option<AssemblyName>,
    path: Option<PathBuf>,
    state: LoadState,
    failures: FailureFlags,
    path_error: Option<LoadError>,
    name_error: Option<LoadError>,
    binary: Option<LoadedBinary>,
    references: Vec<AssemblyName>,
    implicit: bool,
}

impl CompilationReference {
    /// A reference with the given hints. Either may be absent.
    pub fn new(name: Option<AssemblyName>, path: Option<PathBuf>) -> Self {
        CompilationReference {
            name,
            path,
            state: LoadState::Unattempted,
            failures: FailureFlags::empty(),
            path_error: None,
            name_error: None,
            binary: None,
            references: Vec::new(),
            implicit: false,
        }
    }

    pub fn from_name(name: AssemblyName) -> Self {
        Self::new(Some(name), None)
    }

    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self::new(None, Some(path.into()))
    }

    /// A name-only reference synthesized by transitive discovery.
    pub fn implicit(name: AssemblyName) -> Self {
        CompilationReference {
            implicit: true,
            ..Self::from_name(name)
        }
    }

    pub fn name(&self) -> Option<&AssemblyName> {
        self.name.as_ref()
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    pub fn is_succeeded(&self) -> bool {
        self.state == LoadState::Succeeded
    }

    pub fn is_failed(&self) -> bool {
        self.state == LoadState::Failed
    }

    pub fn failures(&self) -> FailureFlags {
        self.failures
    }

    /// Cause of the file path strategy failure, if it failed.
    pub fn path_error(&self) -> Option<&LoadError> {
        self.path_error.as_ref()
    }

    /// Cause of the assembly name strategy failure, if it failed.
    pub fn name_error(&self) -> Option<&LoadError> {
        self.name_error.as_ref()
    }

    pub fn binary(&self) -> Option<&LoadedBinary> {
        self.binary.as_ref()
    }

    /// Assemblies the loaded binary declares as references.
    pub fn references(&self) -> &[AssemblyName] {
        &self.references
    }

    /// Whether this reference was discovered rather than requested.
    pub fn is_implicit(&self) -> bool {
        self.implicit
    }

    /// Name used in load reports: the name hint, or the path's file stem.
    pub fn report_name(&self) -> Option<String> {
        match (&self.name, &self.path) {
            (Some(name), _) => Some(name.name().to_string()),
            (None, Some(path)) => AssemblyName::from_path(path).map(|n| n.name().to_string()),
            (None, None) => None,
        }
    }

    /// Whether `name` identifies this reference, ignoring case.
    pub fn matches(&self, name: &str) -> bool {
        self.report_name()
            .is_some_and(|own| own.eq_ignore_ascii_case(name))
    }

    /// Load the binary, path first, and return whether it succeeded.
    ///
    /// Calling `load` on a terminal reference returns the settled outcome
    /// without touching `context`.
    pub fn load<C: LoaderContext + ?Sized>(&mut self, context: &mut C) -> bool {
        if self.state.is_terminal() {
            return self.is_succeeded();
        }

        if let Some(path) = self.path.clone() {
            tracing::debug!("Loading {} from path", path.display());
            match context.load_from_path(&path) {
                Ok(binary) => {
                    if self.name.is_none() {
                        self.name = Some(binary.name().clone());
                    }
                    self.succeed(binary, context);
                    return true;
                }
                Err(e) => {
                    tracing::debug!("Path load of {} failed: {}", path.display(), e);
                    self.fail(LoadStrategy::FilePath, e);
                }
            }
        }

        if let Some(name) = self.name.clone() {
            tracing::debug!("Loading {} by name", name);
            match context.load_from_name(&name) {
                Ok(binary) => {
                    if self.path.is_none() {
                        self.path = Some(binary.location().to_path_buf());
                    }
                    self.succeed(binary, context);
                    return true;
                }
                Err(e) => {
                    tracing::debug!("Name load of {} failed: {}", name, e);
                    self.fail(LoadStrategy::AssemblyName, e);
                }
            }
        }

        self.state = LoadState::Failed;
        self.failures = FailureFlags::all();
        if self.path_error.is_none() {
            self.path_error = Some(LoadError::NoHint {
                strategy: LoadStrategy::FilePath,
            });
        }
        if self.name_error.is_none() {
            self.name_error = Some(LoadError::NoHint {
                strategy: LoadStrategy::AssemblyName,
            });
        }
        false
    }

    fn succeed<C: LoaderContext + ?Sized>(&mut self, binary: LoadedBinary, context: &C) {
        self.references = match context.referenced_assemblies(&binary) {
            Ok(references) => references,
            Err(e) => {
                tracing::warn!("Could not read references of {}: {}", binary.name(), e);
                Vec::new()
            }
        };
        tracing::debug!(
            "Loaded {} from {} ({} references)",
            binary.name(),
            binary.location().display(),
            self.references.len()
        );
        self.binary = Some(binary);
        self.state = LoadState::Succeeded;
    }

    fn fail(&mut self, strategy: LoadStrategy, error: LoadError) {
        self.failures |= strategy.flag();
        match strategy {
            LoadStrategy::FilePath => self.path_error = Some(error),
            LoadStrategy::AssemblyName => self.name_error = Some(error),
        }
    }
}
