//! Lock-file document model.
//!
//! [`ProjectAssetsDocument`] is the strict, typed view of a package
//! manager's `project.assets.json`. It is built once per read and is
//! immutable afterwards; a single malformed entry anywhere aborts the parse.
//!
//! Key names are preserved verbatim from the producing package manager.

pub mod group;
pub mod library;
pub mod log;
pub mod project;
pub mod property;
pub mod restore;
pub mod target;

use std::path::{Path, PathBuf};

pub use group::ProjectFileDependencyGroup;
pub use library::{LibraryEntry, LibraryTable, ReferenceKind};
pub use log::{LogLevel, RestoreLog};
pub use project::{DependencyTarget, FrameworkReference, PackageDependency, ProjectFrameworkSection};
pub use property::{FromValue, PropertyReader};
pub use restore::{ProjectReference, ProjectStyle, RestoreFrameworkSection, RestoreMetadata};
pub use target::{ReferenceInfo, TargetSection};

use crate::core::errors::ParseError;
use crate::core::framework::TargetFrameworkMoniker;
use crate::core::value::Value;
use crate::core::version::{SemanticVersion, VersionedText};

/// Conventional file name of the lock file inside the build output directory.
pub const ASSETS_FILE_NAME: &str = "project.assets.json";

/// The parsed lock file.
#[derive(Debug, Clone)]
pub struct ProjectAssetsDocument {
    version: i64,
    project_version: Option<SemanticVersion>,
    restore: RestoreMetadata,
    frameworks: Vec<ProjectFrameworkSection>,
    targets: Vec<TargetSection>,
    libraries: LibraryTable,
    dependency_groups: Vec<ProjectFileDependencyGroup>,
    package_folders: Vec<PathBuf>,
    logs: Vec<RestoreLog>,
}

impl ProjectAssetsDocument {
    /// Parse JSON text.
    pub fn from_json_str(text: &str) -> Result<Self, ParseError> {
        let raw = Value::from_json_str(text)?;
        Self::parse(&raw)
    }

    /// Build the document from a raw tree.
    ///
    /// Sections are read in order: version, restore metadata, project
    /// frameworks, targets, libraries, then the optional dependency groups,
    /// package folders and logs. Target entries must all exist in the
    /// library table.
    pub fn parse(raw: &Value) -> Result<Self, ParseError> {
        let reader = PropertyReader::for_value(raw, "ProjectAssetsDocument", "parse_document")?;

        let version = reader.required::<i64>("version")?;

        let project = PropertyReader::new(
            reader.map_property("project")?,
            "Project",
            "parse_document",
        );
        let project_version = project
            .maybe::<&str>("version")?
            .map(SemanticVersion::parse)
            .transpose()?;
        let restore = RestoreMetadata::from_value(project.required::<&Value>("restore")?)
            .map_err(|e| e.in_entity("RestoreMetadata", "project.restore"))?;
        let frameworks = property::parse_entries(
            project.optional_map("frameworks")?,
            "ProjectFrameworkSection",
            ProjectFrameworkSection::from_value,
        )?;

        let targets = property::parse_entries(
            reader.map_property("targets")?,
            "TargetSection",
            TargetSection::from_value,
        )?;

        let libraries = LibraryTable::new(property::parse_entries(
            reader.map_property("libraries")?,
            "LibraryEntry",
            LibraryEntry::from_value,
        )?);

        let dependency_groups = property::parse_entries(
            reader.optional_map("projectFileDependencyGroups")?,
            "ProjectFileDependencyGroup",
            ProjectFileDependencyGroup::from_value,
        )?;

        let package_folders = reader
            .optional_map("packageFolders")?
            .keys()
            .map(PathBuf::from)
            .collect();

        let logs = reader
            .optional_list("logs")?
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                RestoreLog::from_value(entry).map_err(|e| e.in_entity("RestoreLog", i.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let document = ProjectAssetsDocument {
            version,
            project_version,
            restore,
            frameworks,
            targets,
            libraries,
            dependency_groups,
            package_folders,
            logs,
        };
        document.check_integrity()?;

        tracing::debug!(
            "Parsed assets document: {} frameworks, {} targets, {} libraries",
            document.frameworks.len(),
            document.targets.len(),
            document.libraries.len()
        );

        Ok(document)
    }

    fn check_integrity(&self) -> Result<(), ParseError> {
        for target in &self.targets {
            for (key, _) in target.entries() {
                if !self.libraries.contains(key) {
                    return Err(ParseError::UnresolvedLibrary {
                        key: key.to_string(),
                        framework: target.key().to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Lock file format version.
    pub fn version(&self) -> i64 {
        self.version
    }

    pub fn project_version(&self) -> Option<&SemanticVersion> {
        self.project_version.as_ref()
    }

    pub fn restore(&self) -> &RestoreMetadata {
        &self.restore
    }

    pub fn project_frameworks(&self) -> &[ProjectFrameworkSection] {
        &self.frameworks
    }

    pub fn project_framework(
        &self,
        framework: &TargetFrameworkMoniker,
    ) -> Option<&ProjectFrameworkSection> {
        self.frameworks.iter().find(|f| f.framework() == framework)
    }

    /// Frameworks the project declares, in document order.
    pub fn frameworks(&self) -> impl Iterator<Item = &TargetFrameworkMoniker> {
        self.frameworks.iter().map(ProjectFrameworkSection::framework)
    }

    pub fn targets(&self) -> &[TargetSection] {
        &self.targets
    }

    /// The runtime-neutral target section for `framework`, falling back to
    /// the first runtime-specific one.
    pub fn target(&self, framework: &TargetFrameworkMoniker) -> Option<&TargetSection> {
        let mut candidates = self.targets.iter().filter(|t| t.framework() == framework);
        let first = candidates.next()?;
        if first.runtime_identifier().is_none() {
            return Some(first);
        }
        candidates
            .find(|t| t.runtime_identifier().is_none())
            .or(Some(first))
    }

    pub fn target_for_runtime(
        &self,
        framework: &TargetFrameworkMoniker,
        runtime_identifier: &str,
    ) -> Option<&TargetSection> {
        self.targets.iter().find(|t| {
            t.framework() == framework && t.runtime_identifier() == Some(runtime_identifier)
        })
    }

    pub fn libraries(&self) -> &LibraryTable {
        &self.libraries
    }

    pub fn library(&self, key: &VersionedText) -> Option<&LibraryEntry> {
        self.libraries.get(key)
    }

    pub fn dependency_groups(&self) -> &[ProjectFileDependencyGroup] {
        &self.dependency_groups
    }

    pub fn dependency_group(
        &self,
        framework: &TargetFrameworkMoniker,
    ) -> Option<&ProjectFileDependencyGroup> {
        self.dependency_groups
            .iter()
            .find(|g| g.framework() == Some(framework))
    }

    /// Package roots, in restore priority order.
    pub fn package_folders(&self) -> &[PathBuf] {
        &self.package_folders
    }

    /// Absolute directory of a package library, using the first package
    /// folder (or the restore packages path).
    pub fn package_directory(&self, library: &LibraryEntry) -> Option<PathBuf> {
        let relative = library.path()?;
        let root: &Path = self
            .package_folders
            .first()
            .map(PathBuf::as_path)
            .or_else(|| self.restore.packages_path())?;
        Some(root.join(relative))
    }

    pub fn logs(&self) -> &[RestoreLog] {
        &self.logs
    }
}

/// Parse a raw lock-file tree.
pub fn parse_document(raw: &Value) -> Result<ProjectAssetsDocument, ParseError> {
    ProjectAssetsDocument::parse(raw)
}
