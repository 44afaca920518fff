//! File-system loader context.
//!
//! Name lookups consult the main binary's dependency manifest first: the
//! manifest's runtime asset is looked for next to the main binary, then under
//! each package folder. After that the probe directories are searched for
//! `<name>.dll`. Every candidate is opened and its metadata read; the
//! identity and references of a loaded binary come from that metadata.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::loader::context::{LoadedBinary, LoaderContext};
use crate::loader::errors::LoadError;
use crate::loader::image::{ImageReader, MetadataReader};
use crate::loader::manifest::DepsManifest;
use crate::loader::name::AssemblyName;

/// File extension of managed library images.
pub const ASSEMBLY_EXTENSION: &str = "dll";

/// A [`LoaderContext`] backed by the local file system.
#[derive(Debug, Default)]
pub struct ProbingLoaderContext<R = MetadataReader> {
    reader: R,
    main_binary: Option<PathBuf>,
    manifest: Option<DepsManifest>,
    package_folders: Vec<PathBuf>,
    probe_dirs: Vec<PathBuf>,
    recursive: bool,
    loaded: HashMap<String, LoadedBinary>,
    references: HashMap<PathBuf, Vec<AssemblyName>>,
}

impl ProbingLoaderContext {
    pub fn new() -> Self {
        Self::with_reader(MetadataReader)
    }
}

impl<R: ImageReader> ProbingLoaderContext<R> {
    /// A context reading images with `reader`.
    pub fn with_reader(reader: R) -> Self {
        ProbingLoaderContext {
            reader,
            main_binary: None,
            manifest: None,
            package_folders: Vec::new(),
            probe_dirs: Vec::new(),
            recursive: false,
            loaded: HashMap::new(),
            references: HashMap::new(),
        }
    }

    /// Use `path` as the main binary, reading its `.deps.json` when present.
    pub fn with_main_binary(mut self, path: impl Into<PathBuf>) -> Result<Self, LoadError> {
        let path = path.into();
        if let Some(manifest_path) = DepsManifest::path_for(&path) {
            if manifest_path.is_file() {
                let manifest = DepsManifest::load(&manifest_path)?;
                tracing::debug!(
                    "Using dependency manifest {} ({} libraries)",
                    manifest_path.display(),
                    manifest.libraries().len()
                );
                self.manifest = Some(manifest);
            }
        }
        self.main_binary = Some(path);
        Ok(self)
    }

    pub fn with_package_folder(mut self, folder: impl Into<PathBuf>) -> Self {
        self.package_folders.push(folder.into());
        self
    }

    pub fn with_probe_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.probe_dirs.push(dir.into());
        self
    }

    /// Search probe directories recursively.
    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    pub fn main_binary(&self) -> Option<&Path> {
        self.main_binary.as_deref()
    }

    pub fn manifest(&self) -> Option<&DepsManifest> {
        self.manifest.as_ref()
    }

    /// Candidate files for `name`, in lookup order.
    fn candidates(&self, name: &AssemblyName) -> Vec<PathBuf> {
        let mut candidates = Vec::new();

        if let Some(library) = self.manifest.as_ref().and_then(|m| m.find(name)) {
            let asset = library
                .runtime_asset(name)
                .map(PathBuf::from)
                .unwrap_or_else(|| {
                    PathBuf::from(format!("{}.{}", name.name(), ASSEMBLY_EXTENSION))
                });

            if let Some(dir) = self.main_binary.as_deref().and_then(Path::parent) {
                if let Some(file_name) = asset.file_name() {
                    candidates.push(dir.join(file_name));
                }
            }
            if let Some(relative) = library.path() {
                for folder in &self.package_folders {
                    candidates.push(folder.join(relative).join(&asset));
                }
            }
        }

        let file_name = format!("{}.{}", name.name(), ASSEMBLY_EXTENSION);
        let max_depth = if self.recursive { usize::MAX } else { 1 };
        for dir in &self.probe_dirs {
            let found = WalkDir::new(dir)
                .max_depth(max_depth)
                .into_iter()
                .filter_map(|e| e.ok())
                .filter(|e| e.file_type().is_file())
                .filter(|e| {
                    e.file_name()
                        .to_str()
                        .is_some_and(|f| f.eq_ignore_ascii_case(&file_name))
                })
                .map(|e| e.into_path());
            candidates.extend(found);
        }

        candidates
    }

    /// Read the image at `path`, checking it defines `expected` when given.
    fn open(
        &mut self,
        path: &Path,
        expected: Option<&AssemblyName>,
    ) -> Result<LoadedBinary, LoadError> {
        let (name, references) = self.reader.read(path)?.into_parts();

        if let Some(expected) = expected {
            if name != *expected {
                return Err(LoadError::BadImage {
                    path: path.to_path_buf(),
                    reason: format!("defines `{}`, not `{}`", name.name(), expected.name()),
                });
            }
        }

        self.references.insert(path.to_path_buf(), references);
        let binary = LoadedBinary::new(name, path);
        self.loaded
            .entry(binary.name().key())
            .or_insert_with(|| binary.clone());
        Ok(binary)
    }
}

impl<R: ImageReader> LoaderContext for ProbingLoaderContext<R> {
    fn load_from_name(&mut self, name: &AssemblyName) -> Result<LoadedBinary, LoadError> {
        if let Some(binary) = self.loaded.get(&name.key()) {
            return Ok(binary.clone());
        }

        let candidates = self.candidates(name);
        for candidate in &candidates {
            match self.open(candidate, Some(name)) {
                Ok(binary) => return Ok(binary),
                Err(e) => tracing::debug!("Skipping {}: {}", candidate.display(), e),
            }
        }

        Err(LoadError::NotFound {
            name: name.name().to_string(),
            searched: candidates,
        })
    }

    fn load_from_path(&mut self, path: &Path) -> Result<LoadedBinary, LoadError> {
        self.open(path, None)
    }

    fn referenced_assemblies(
        &self,
        binary: &LoadedBinary,
    ) -> Result<Vec<AssemblyName>, LoadError> {
        match self.references.get(binary.location()) {
            Some(references) => Ok(references.clone()),
            None => Ok(self.reader.read(binary.location())?.into_parts().1),
        }
    }
}
