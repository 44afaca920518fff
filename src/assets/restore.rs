//! Restore metadata: project identity and what was declared before resolution.

use std::path::{Path, PathBuf};

use crate::assets::property::{key_list, parse_entries, PropertyReader};
use crate::core::errors::ParseError;
use crate::core::framework::TargetFrameworkMoniker;
use crate::core::value::Value;

/// How the project declares its packages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectStyle {
    PackageReference,
    ProjectJson,
    DotnetCliTool,
    Standalone,
    Unknown(String),
}

impl ProjectStyle {
    pub fn parse(text: &str) -> Self {
        match text {
            "PackageReference" => ProjectStyle::PackageReference,
            "ProjectJson" => ProjectStyle::ProjectJson,
            "DotnetCliTool" => ProjectStyle::DotnetCliTool,
            "Standalone" => ProjectStyle::Standalone,
            other => ProjectStyle::Unknown(other.to_string()),
        }
    }
}

/// A project-to-project reference declared for one framework.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectReference {
    key: String,
    project_path: PathBuf,
}

impl ProjectReference {
    pub fn from_value(key: &str, value: &Value) -> Result<Self, ParseError> {
        let reader =
            PropertyReader::for_value(value, "ProjectReference", "ProjectReference::from_value")?;
        Ok(ProjectReference {
            key: key.to_string(),
            project_path: reader.required("projectPath")?,
        })
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn project_path(&self) -> &Path {
        &self.project_path
    }

    /// Project name as used for its library entry (`../Lib/Lib.csproj` is `Lib`).
    pub fn project_name(&self) -> Option<&str> {
        self.project_path.file_stem().and_then(|s| s.to_str())
    }
}

/// Project references declared for one framework in `restore.frameworks`.
#[derive(Debug, Clone, PartialEq)]
pub struct RestoreFrameworkSection {
    key: String,
    framework: TargetFrameworkMoniker,
    target_alias: Option<String>,
    project_references: Vec<ProjectReference>,
}

impl RestoreFrameworkSection {
    pub fn from_value(key: &str, value: &Value) -> Result<Self, ParseError> {
        let reader = PropertyReader::for_value(
            value,
            "RestoreFrameworkSection",
            "RestoreFrameworkSection::from_value",
        )?;

        Ok(RestoreFrameworkSection {
            key: key.to_string(),
            framework: TargetFrameworkMoniker::parse_any(key)?,
            target_alias: reader.maybe("targetAlias")?,
            project_references: parse_entries(
                reader.optional_map("projectReferences")?,
                "ProjectReference",
                ProjectReference::from_value,
            )?,
        })
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn framework(&self) -> &TargetFrameworkMoniker {
        &self.framework
    }

    pub fn target_alias(&self) -> Option<&str> {
        self.target_alias.as_deref()
    }

    pub fn project_references(&self) -> &[ProjectReference] {
        &self.project_references
    }
}

/// The `project.restore` section.
#[derive(Debug, Clone, PartialEq)]
pub struct RestoreMetadata {
    project_unique_name: String,
    project_name: Option<String>,
    project_path: PathBuf,
    packages_path: Option<PathBuf>,
    output_path: Option<PathBuf>,
    project_style: Option<ProjectStyle>,
    sources: Vec<String>,
    fallback_folders: Vec<PathBuf>,
    config_file_paths: Vec<PathBuf>,
    original_target_frameworks: Vec<String>,
    frameworks: Vec<RestoreFrameworkSection>,
}

impl RestoreMetadata {
    pub fn from_value(value: &Value) -> Result<Self, ParseError> {
        let reader =
            PropertyReader::for_value(value, "RestoreMetadata", "RestoreMetadata::from_value")?;

        let paths = |name: &str| -> Result<Vec<PathBuf>, ParseError> {
            Ok(reader
                .optional::<Vec<String>>(name)?
                .into_iter()
                .map(PathBuf::from)
                .collect())
        };

        Ok(RestoreMetadata {
            project_unique_name: reader.required("projectUniqueName")?,
            project_name: reader.maybe("projectName")?,
            project_path: reader.required("projectPath")?,
            packages_path: reader.maybe("packagesPath")?,
            output_path: reader.maybe("outputPath")?,
            project_style: reader.maybe::<&str>("projectStyle")?.map(ProjectStyle::parse),
            sources: key_list(reader.optional_map("sources")?),
            fallback_folders: paths("fallbackFolders")?,
            config_file_paths: paths("configFilePaths")?,
            original_target_frameworks: reader.optional("originalTargetFrameworks")?,
            frameworks: parse_entries(
                reader.optional_map("frameworks")?,
                "RestoreFrameworkSection",
                RestoreFrameworkSection::from_value,
            )?,
        })
    }

    pub fn project_unique_name(&self) -> &str {
        &self.project_unique_name
    }

    /// Declared project name, or the project file stem.
    pub fn project_name(&self) -> Option<&str> {
        self.project_name
            .as_deref()
            .or_else(|| self.project_path.file_stem().and_then(|s| s.to_str()))
    }

    pub fn project_path(&self) -> &Path {
        &self.project_path
    }

    pub fn packages_path(&self) -> Option<&Path> {
        self.packages_path.as_deref()
    }

    pub fn output_path(&self) -> Option<&Path> {
        self.output_path.as_deref()
    }

    pub fn project_style(&self) -> Option<&ProjectStyle> {
        self.project_style.as_ref()
    }

    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    pub fn fallback_folders(&self) -> &[PathBuf] {
        &self.fallback_folders
    }

    pub fn config_file_paths(&self) -> &[PathBuf] {
        &self.config_file_paths
    }

    pub fn original_target_frameworks(&self) -> &[String] {
        &self.original_target_frameworks
    }

    pub fn frameworks(&self) -> &[RestoreFrameworkSection] {
        &self.frameworks
    }

    pub fn framework(&self, framework: &TargetFrameworkMoniker) -> Option<&RestoreFrameworkSection> {
        self.frameworks.iter().find(|f| f.framework() == framework)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_restore_metadata() {
        let value = Value::from_json_str(
            r#"{
                "projectUniqueName": "/src/App/App.csproj",
                "projectName": "App",
                "projectPath": "/src/App/App.csproj",
                "packagesPath": "/home/u/.nuget/packages/",
                "outputPath": "/src/App/obj/",
                "projectStyle": "PackageReference",
                "fallbackFolders": ["/usr/share/dotnet/sdk/NuGetFallbackFolder"],
                "configFilePaths": ["/home/u/.nuget/NuGet/NuGet.Config"],
                "originalTargetFrameworks": ["netcoreapp3.1"],
                "sources": {"https://api.nuget.org/v3/index.json": {}},
                "frameworks": {
                    "netcoreapp3.1": {
                        "targetAlias": "netcoreapp3.1",
                        "projectReferences": {
                            "/src/Lib/Lib.csproj": {"projectPath": "/src/Lib/Lib.csproj"}
                        }
                    }
                }
            }"#,
        )
        .unwrap();

        let restore = RestoreMetadata::from_value(&value).unwrap();
        assert_eq!(restore.project_name(), Some("App"));
        assert_eq!(restore.project_style(), Some(&ProjectStyle::PackageReference));
        assert_eq!(restore.sources(), ["https://api.nuget.org/v3/index.json"]);
        assert_eq!(restore.fallback_folders().len(), 1);
        assert_eq!(restore.original_target_frameworks(), ["netcoreapp3.1"]);

        let tfm = TargetFrameworkMoniker::parse_any(".NETCoreApp,Version=v3.1").unwrap();
        let section = restore.framework(&tfm).unwrap();
        assert_eq!(section.project_references().len(), 1);
        assert_eq!(section.project_references()[0].project_name(), Some("Lib"));
    }

    #[test]
    fn test_restore_requires_project_identity() {
        let value = Value::from_json_str(r#"{"projectPath": "/src/App/App.csproj"}"#).unwrap();
        assert!(matches!(
            RestoreMetadata::from_value(&value),
            Err(ParseError::MissingProperty { ref property, .. }) if property == "projectUniqueName"
        ));
    }
}
