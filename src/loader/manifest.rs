//! Host dependency manifests (`<app>.deps.json`).
//!
//! A manifest sits next to the application's main binary and lists, for the
//! runtime target it was built for, every library the application carries
//! and where its runtime assets live. Name lookups use it to find the file
//! behind an assembly name.

use std::path::{Path, PathBuf};

use crate::assets::property::{self, PropertyReader};
use crate::assets::ReferenceKind;
use crate::core::errors::ParseError;
use crate::core::value::Value;
use crate::core::version::VersionedText;
use crate::loader::errors::LoadError;
use crate::loader::name::AssemblyName;

/// Suffix replacing a main binary's extension to form its manifest path.
pub const MANIFEST_SUFFIX: &str = ".deps.json";

/// One library of the manifest's runtime target.
#[derive(Debug, Clone)]
pub struct ManifestLibrary {
    key: VersionedText,
    kind: ReferenceKind,
    path: Option<String>,
    runtime: Vec<String>,
}

impl ManifestLibrary {
    pub fn key(&self) -> &VersionedText {
        &self.key
    }

    pub fn name(&self) -> &str {
        self.key.name()
    }

    pub fn kind(&self) -> &ReferenceKind {
        &self.kind
    }

    /// Package-relative directory, present for package libraries.
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Runtime asset paths, relative to the package directory.
    pub fn runtime(&self) -> &[String] {
        &self.runtime
    }

    /// Whether this library provides the assembly `name`.
    pub fn provides(&self, name: &AssemblyName) -> bool {
        self.runtime_asset(name).is_some()
            || (self.runtime.is_empty() && self.key.matches_name(name.name()))
    }

    /// The runtime asset whose file stem is `name`.
    pub fn runtime_asset(&self, name: &AssemblyName) -> Option<&str> {
        self.runtime
            .iter()
            .find(|asset| {
                AssemblyName::from_path(Path::new(asset.as_str()))
                    .is_some_and(|stem| stem == *name)
            })
            .map(String::as_str)
    }
}

/// A parsed `.deps.json` manifest.
#[derive(Debug, Clone)]
pub struct DepsManifest {
    runtime_target: Option<String>,
    libraries: Vec<ManifestLibrary>,
}

impl DepsManifest {
    /// Manifest path of a main binary: `bin/App.dll` gives `bin/App.deps.json`.
    pub fn path_for(main_binary: &Path) -> Option<PathBuf> {
        let stem = main_binary.file_stem()?.to_str()?;
        Some(main_binary.with_file_name(format!("{}{}", stem, MANIFEST_SUFFIX)))
    }

    /// Read and parse the manifest at `path`.
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text).map_err(|source| LoadError::Manifest {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_json_str(text: &str) -> Result<Self, ParseError> {
        let raw = Value::from_json_str(text)?;
        Self::parse(&raw)
    }

    /// Build the manifest from a raw tree.
    ///
    /// The target named by `runtimeTarget.name` is used, or the first target
    /// when none is named.
    pub fn parse(raw: &Value) -> Result<Self, ParseError> {
        let reader = PropertyReader::for_value(raw, "DepsManifest", "DepsManifest::parse")?;

        let runtime_target = match reader.maybe::<&Value>("runtimeTarget")? {
            Some(target) => PropertyReader::for_value(target, "RuntimeTarget", "DepsManifest::parse")?
                .optional_string("name")?
                .map(str::to_string),
            None => None,
        };

        let targets = reader.map_property("targets")?;
        let selected = match runtime_target {
            Some(ref name) => targets.get(name).ok_or_else(|| {
                reader.invalid("runtimeTarget", format!("no target named `{}`", name))
            })?,
            None => match targets.iter().next() {
                Some((_, target)) => target,
                None => return Err(reader.invalid("targets", "no runtime target")),
            },
        };
        let selected = selected.as_map().ok_or_else(|| ParseError::TypeMismatch {
            property: "targets".to_string(),
            entity: "DepsManifest",
            operation: "DepsManifest::parse",
            expected: "a map",
            found: selected.kind(),
        })?;

        let descriptions = reader.optional_map("libraries")?;
        let libraries = property::parse_entries(selected, "ManifestLibrary", |key, value| {
            let key = VersionedText::parse(key)?;
            let entry = PropertyReader::for_value(value, "ManifestLibrary", "DepsManifest::parse")?;

            let description = descriptions
                .get(&key.to_string())
                .map(|d| PropertyReader::for_value(d, "ManifestLibrary", "DepsManifest::parse"))
                .transpose()?;
            let (kind, path) = match description {
                Some(d) => (
                    ReferenceKind::parse(d.optional_string("type")?.unwrap_or("package")),
                    d.optional_string("path")?.map(str::to_string),
                ),
                None => (ReferenceKind::Package, None),
            };

            Ok(ManifestLibrary {
                key,
                kind,
                path,
                runtime: property::key_list(entry.optional_map("runtime")?),
            })
        })?;

        Ok(DepsManifest {
            runtime_target,
            libraries,
        })
    }

    pub fn runtime_target(&self) -> Option<&str> {
        self.runtime_target.as_deref()
    }

    pub fn libraries(&self) -> &[ManifestLibrary] {
        &self.libraries
    }

    /// The library that provides assembly `name`.
    pub fn find(&self, name: &AssemblyName) -> Option<&ManifestLibrary> {
        self.libraries
            .iter()
            .find(|lib| lib.runtime_asset(name).is_some())
            .or_else(|| self.libraries.iter().find(|lib| lib.provides(name)))
    }
}
