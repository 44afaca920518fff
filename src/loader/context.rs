//! The loader contract.

use std::path::{Path, PathBuf};

use crate::loader::errors::LoadError;
use crate::loader::name::AssemblyName;

/// A binary that was loaded by a [`LoaderContext`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedBinary {
    name: AssemblyName,
    location: PathBuf,
}

impl LoadedBinary {
    pub fn new(name: AssemblyName, location: impl Into<PathBuf>) -> Self {
        LoadedBinary {
            name,
            location: location.into(),
        }
    }

    /// Identity of the loaded assembly.
    pub fn name(&self) -> &AssemblyName {
        &self.name
    }

    /// File the assembly was loaded from.
    pub fn location(&self) -> &Path {
        &self.location
    }
}

/// Host mechanism for locating and loading binaries.
///
/// A context is owned by exactly one resolution run and may cache what it
/// loads. Implementations must not share mutable state between instances.
pub trait LoaderContext {
    /// Resolve an assembly name to a binary, using whatever host
    /// dependency manifests and search paths the context knows about.
    fn load_from_name(&mut self, name: &AssemblyName) -> Result<LoadedBinary, LoadError>;

    /// Load the binary stored at `path`.
    fn load_from_path(&mut self, path: &Path) -> Result<LoadedBinary, LoadError>;

    /// Names of the assemblies `binary` itself declares as references.
    fn referenced_assemblies(&self, binary: &LoadedBinary)
        -> Result<Vec<AssemblyName>, LoadError>;
}

impl<C: LoaderContext + ?Sized> LoaderContext for Box<C> {
    fn load_from_name(&mut self, name: &AssemblyName) -> Result<LoadedBinary, LoadError> {
        (**self).load_from_name(name)
    }

    fn load_from_path(&mut self, path: &Path) -> Result<LoadedBinary, LoadError> {
        (**self).load_from_path(path)
    }

    fn referenced_assemblies(
        &self,
        binary: &LoadedBinary,
    ) -> Result<Vec<AssemblyName>, LoadError> {
        (**self).referenced_assemblies(binary)
    }
}
