//! Test utilities and mocks for dotdeps unit tests.
//!
//! This module provides an in-memory [`LoaderContext`] so the reference
//! state machine and resolution runs can be tested without real binaries,
//! an [`ImageReader`] over small text images for the file-system context,
//! and lock-file fixtures.
//!
//! # Example
//!
//! ```rust,ignore
//! use dotdeps::test_support::MockLoaderContext;
//!
//! #[test]
//! fn test_example() {
//!     let mut ctx = MockLoaderContext::new();
//!     ctx.add_binary("App", "/bin/App.dll", &["Newtonsoft.Json"]);
//!
//!     // Use the context in a CompilationReferenceSet...
//! }
//! ```

pub mod fixtures;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::loader::{
    AssemblyName, ImageMetadata, ImageReader, LoadError, LoadedBinary, LoaderContext,
};

// Re-export fixtures for convenience
pub use fixtures::*;

#[derive(Debug, Clone)]
struct MockBinary {
    name: String,
    location: PathBuf,
    references: Vec<String>,
    by_name: bool,
}

/// Mock loader context with registered binaries and call counters.
#[derive(Debug, Clone, Default)]
pub struct MockLoaderContext {
    binaries: HashMap<String, MockBinary>,
    paths: HashMap<PathBuf, String>,
    name_calls: Vec<String>,
    path_calls: Vec<PathBuf>,
}

impl MockLoaderContext {
    /// Create a context that knows no binaries.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a binary loadable both by name and by path.
    pub fn add_binary(
        &mut self,
        name: &str,
        location: impl Into<PathBuf>,
        references: &[&str],
    ) -> &mut Self {
        self.register(name, location.into(), references, true)
    }

    /// Register a binary that can only be loaded from its path.
    pub fn add_path_only(
        &mut self,
        name: &str,
        location: impl Into<PathBuf>,
        references: &[&str],
    ) -> &mut Self {
        self.register(name, location.into(), references, false)
    }

    fn register(
        &mut self,
        name: &str,
        location: PathBuf,
        references: &[&str],
        by_name: bool,
    ) -> &mut Self {
        let key = name.to_ascii_lowercase();
        self.paths.insert(location.clone(), key.clone());
        self.binaries.insert(
            key,
            MockBinary {
                name: name.to_string(),
                location,
                references: references.iter().map(|r| r.to_string()).collect(),
                by_name,
            },
        );
        self
    }

    /// Number of name lookups performed.
    pub fn name_loads(&self) -> usize {
        self.name_calls.len()
    }

    /// Number of path loads performed.
    pub fn path_loads(&self) -> usize {
        self.path_calls.len()
    }

    /// Names looked up, in call order.
    pub fn name_calls(&self) -> &[String] {
        &self.name_calls
    }

    fn loaded(binary: &MockBinary) -> LoadedBinary {
        LoadedBinary::new(AssemblyName::new(binary.name.as_str()), &binary.location)
    }
}

impl LoaderContext for MockLoaderContext {
    fn load_from_name(&mut self, name: &AssemblyName) -> Result<LoadedBinary, LoadError> {
        self.name_calls.push(name.name().to_string());
        match self.binaries.get(&name.key()) {
            Some(binary) if binary.by_name => Ok(Self::loaded(binary)),
            _ => Err(LoadError::NotFound {
                name: name.name().to_string(),
                searched: Vec::new(),
            }),
        }
    }

    fn load_from_path(&mut self, path: &Path) -> Result<LoadedBinary, LoadError> {
        self.path_calls.push(path.to_path_buf());
        match self.paths.get(path).and_then(|key| self.binaries.get(key)) {
            Some(binary) => Ok(Self::loaded(binary)),
            None => Err(LoadError::Io {
                path: path.to_path_buf(),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            }),
        }
    }

    fn referenced_assemblies(
        &self,
        binary: &LoadedBinary,
    ) -> Result<Vec<AssemblyName>, LoadError> {
        Ok(self
            .binaries
            .get(&binary.name().key())
            .map(|b| b.references.iter().map(AssemblyName::new).collect())
            .unwrap_or_default())
    }
}

/// Reads images written by [`write_fake_image`]: a header line, the
/// assembly's display name, then one referenced display name per line.
#[derive(Debug, Clone, Copy, Default)]
pub struct FakeImageReader;

impl ImageReader for FakeImageReader {
    fn read(&self, path: &Path) -> Result<ImageMetadata, LoadError> {
        let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let bad_image = |reason: String| LoadError::BadImage {
            path: path.to_path_buf(),
            reason,
        };

        let mut lines = text.lines();
        if lines.next() != Some(FAKE_IMAGE_HEADER) {
            return Err(bad_image("missing fake image header".to_string()));
        }
        let mut names = lines
            .filter(|line| !line.trim().is_empty())
            .map(|line| AssemblyName::parse(line).map_err(|e| bad_image(e.to_string())));
        let name = names
            .next()
            .ok_or_else(|| bad_image("image has no assembly name".to_string()))??;
        let references = names.collect::<Result<Vec<_>, _>>()?;

        Ok(ImageMetadata::new(name, references))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_loader_context() {
        let mut ctx = MockLoaderContext::new();
        ctx.add_binary("Lib", "/bin/Lib.dll", &["Dep"])
            .add_path_only("Hidden", "/bin/Hidden.dll", &[]);

        let lib = ctx.load_from_name(&AssemblyName::new("lib")).unwrap();
        assert_eq!(lib.location(), Path::new("/bin/Lib.dll"));
        assert_eq!(ctx.referenced_assemblies(&lib).unwrap().len(), 1);

        assert!(ctx.load_from_name(&AssemblyName::new("Hidden")).is_err());
        assert!(ctx.load_from_path(Path::new("/bin/Hidden.dll")).is_ok());
        assert!(ctx.load_from_path(Path::new("/bin/Other.dll")).is_err());

        assert_eq!(ctx.name_loads(), 2);
        assert_eq!(ctx.path_loads(), 2);
        assert_eq!(ctx.name_calls(), ["lib", "Hidden"]);
    }

    #[test]
    fn test_fake_image_reader() {
        let tmp = tempfile::TempDir::new().unwrap();
        let image = tmp.path().join("bin/App.dll");
        write_fake_image(&image, "App, Version=1.0.0.0", &["Lib, Version=2.0.0.0"]).unwrap();

        let metadata = FakeImageReader.read(&image).unwrap();
        assert_eq!(metadata.name().name(), "App");
        assert_eq!(metadata.references(), [AssemblyName::new("Lib")]);

        let text = tmp.path().join("Text.dll");
        std::fs::write(&text, "MZ but nothing else").unwrap();
        assert!(matches!(
            FakeImageReader.read(&text),
            Err(LoadError::BadImage { .. })
        ));
    }
}
