//! Per-framework declarations from the `project.frameworks` section.

use std::path::{Path, PathBuf};

use crate::assets::property::{parse_entries, PropertyReader};
use crate::core::errors::ParseError;
use crate::core::framework::{MonikerStyle, TargetFrameworkMoniker};
use crate::core::value::Value;
use crate::core::version::VersionRequirement;

/// What kind of thing a direct dependency refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DependencyTarget {
    Package,
    Project,
    Reference,
    Other(String),
}

impl DependencyTarget {
    pub fn parse(text: &str) -> Self {
        if text.eq_ignore_ascii_case("package") {
            DependencyTarget::Package
        } else if text.eq_ignore_ascii_case("project") {
            DependencyTarget::Project
        } else if text.eq_ignore_ascii_case("reference") {
            DependencyTarget::Reference
        } else {
            DependencyTarget::Other(text.to_string())
        }
    }
}

/// A direct package dependency declared for a framework.
#[derive(Debug, Clone, PartialEq)]
pub struct PackageDependency {
    name: String,
    version: Option<String>,
    requirement: VersionRequirement,
    target: Option<DependencyTarget>,
    auto_referenced: bool,
}

impl PackageDependency {
    /// Build from `"Name": "[1.0.0, )"` or `"Name": { "target": .., "version": .. }`.
    pub fn from_value(name: &str, value: &Value) -> Result<Self, ParseError> {
        let (version, target, auto_referenced) = match value {
            Value::String(version) => (Some(version.clone()), None, false),
            _ => {
                let reader = PropertyReader::for_value(
                    value,
                    "PackageDependency",
                    "PackageDependency::from_value",
                )?
                .case_insensitive();
                (
                    reader.maybe::<String>("version")?,
                    reader.maybe::<&str>("target")?.map(DependencyTarget::parse),
                    reader.optional_bool("autoReferenced")?,
                )
            }
        };

        let requirement = match &version {
            Some(range) => VersionRequirement::from_range(range)?,
            None => VersionRequirement::any(),
        };

        Ok(PackageDependency {
            name: name.to_string(),
            version,
            requirement,
            target,
            auto_referenced,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Version range text as declared.
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn requirement(&self) -> &VersionRequirement {
        &self.requirement
    }

    pub fn target(&self) -> Option<&DependencyTarget> {
        self.target.as_ref()
    }

    /// Implicitly added by the SDK rather than authored.
    pub fn is_auto_referenced(&self) -> bool {
        self.auto_referenced
    }
}

/// A shared framework reference (`Microsoft.AspNetCore.App`).
#[derive(Debug, Clone, PartialEq)]
pub struct FrameworkReference {
    name: String,
    private_assets: Option<String>,
}

impl FrameworkReference {
    pub fn from_value(name: &str, value: &Value) -> Result<Self, ParseError> {
        let reader = PropertyReader::for_value(
            value,
            "FrameworkReference",
            "FrameworkReference::from_value",
        )?;
        Ok(FrameworkReference {
            name: name.to_string(),
            private_assets: reader.maybe("privateAssets")?,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn private_assets(&self) -> Option<&str> {
        self.private_assets.as_deref()
    }
}

/// Declarations for one framework of the project.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectFrameworkSection {
    key: String,
    framework: TargetFrameworkMoniker,
    target_alias: Option<String>,
    dependencies: Vec<PackageDependency>,
    framework_references: Vec<FrameworkReference>,
    imports: Vec<TargetFrameworkMoniker>,
    asset_target_fallback: bool,
    warn: bool,
    runtime_identifier_graph_path: Option<PathBuf>,
}

impl ProjectFrameworkSection {
    pub fn from_value(key: &str, value: &Value) -> Result<Self, ParseError> {
        let reader = PropertyReader::for_value(
            value,
            "ProjectFrameworkSection",
            "ProjectFrameworkSection::from_value",
        )?;

        let imports = reader
            .optional_list("imports")?
            .iter()
            .map(|item| {
                let text = item
                    .as_str()
                    .ok_or_else(|| reader.invalid("imports", format!("{} is not a string", item)))?;
                TargetFrameworkMoniker::parse(text, MonikerStyle::Simple)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ProjectFrameworkSection {
            key: key.to_string(),
            framework: TargetFrameworkMoniker::parse_any(key)?,
            target_alias: reader.maybe("targetAlias")?,
            dependencies: parse_entries(
                reader.optional_map("dependencies")?,
                "PackageDependency",
                PackageDependency::from_value,
            )?,
            framework_references: parse_entries(
                reader.optional_map("frameworkReferences")?,
                "FrameworkReference",
                FrameworkReference::from_value,
            )?,
            imports,
            asset_target_fallback: reader.optional_bool("assetTargetFallback")?,
            warn: reader.optional_bool("warn")?,
            runtime_identifier_graph_path: reader.maybe("runtimeIdentifierGraphPath")?,
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

    pub fn dependencies(&self) -> &[PackageDependency] {
        &self.dependencies
    }

    pub fn framework_references(&self) -> &[FrameworkReference] {
        &self.framework_references
    }

    /// Fallback frameworks, in the order they should be tried.
    pub fn imports(&self) -> &[TargetFrameworkMoniker] {
        &self.imports
    }

    /// Whether `imports` are used as asset-target fallbacks.
    pub fn asset_target_fallback(&self) -> bool {
        self.asset_target_fallback
    }

    /// Whether fallback use is reported as a warning.
    pub fn warn(&self) -> bool {
        self.warn
    }

    pub fn runtime_identifier_graph_path(&self) -> Option<&Path> {
        self.runtime_identifier_graph_path.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::version::VersionConstraint;

    #[test]
    fn test_framework_section() {
        let value = Value::from_json_str(
            r#"{
                "targetAlias": "netcoreapp3.1",
                "imports": ["net461", "net462", "net47"],
                "assetTargetFallback": true,
                "warn": true,
                "dependencies": {
                    "Newtonsoft.Json": {"target": "Package", "version": "[12.0.3, )"},
                    "Legacy": "2.0.0",
                    "Microsoft.NETCore.App": {"suppressParent": "All", "target": "Package", "version": "[3.1.0, )", "autoReferenced": true}
                },
                "frameworkReferences": {"Microsoft.NETCore.App": {"privateAssets": "all"}},
                "runtimeIdentifierGraphPath": "/usr/share/dotnet/sdk/3.1.100/RuntimeIdentifierGraph.json"
            }"#,
        )
        .unwrap();

        let section = ProjectFrameworkSection::from_value("netcoreapp3.1", &value).unwrap();
        assert_eq!(section.imports().len(), 3);
        assert_eq!(section.imports()[0].short_folder_name(), "net461");
        assert!(section.asset_target_fallback());
        assert!(section.warn());
        assert_eq!(section.framework_references()[0].private_assets(), Some("all"));

        let deps = section.dependencies();
        assert_eq!(deps.len(), 3);
        assert_eq!(deps[0].target(), Some(&DependencyTarget::Package));
        assert_eq!(deps[0].requirement().constraint(), VersionConstraint::Minimum);
        assert_eq!(deps[1].version(), Some("2.0.0"));
        assert_eq!(deps[1].target(), None);
        assert!(deps[2].is_auto_referenced());
    }

    #[test]
    fn test_bad_import_fails() {
        let value = Value::from_json_str(r#"{"imports": ["net461", 7]}"#).unwrap();
        assert!(matches!(
            ProjectFrameworkSection::from_value("netcoreapp3.1", &value),
            Err(ParseError::InvalidValue { .. })
        ));

        let value = Value::from_json_str(r#"{"imports": ["notaframework"]}"#).unwrap();
        assert!(ProjectFrameworkSection::from_value("netcoreapp3.1", &value).is_err());
    }
}
