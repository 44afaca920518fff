//! Per-framework resolved dependency sets (the `targets` section).

use crate::assets::library::ReferenceKind;
use crate::assets::property::{key_list, parse_entries, PropertyReader};
use crate::core::errors::ParseError;
use crate::core::framework::TargetFrameworkMoniker;
use crate::core::value::{Map, Value};
use crate::core::version::{DependencyRequirement, VersionRequirement, VersionedText};

/// Placeholder asset written for packages that contribute nothing.
pub const EMPTY_ASSET_MARKER: &str = "_._";

/// One library as resolved for a framework.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceInfo {
    kind: ReferenceKind,
    framework: Option<String>,
    dependencies: Vec<DependencyRequirement>,
    compile: Vec<String>,
    runtime: Vec<String>,
    framework_assemblies: Vec<String>,
}

impl ReferenceInfo {
    pub fn from_value(value: &Value) -> Result<Self, ParseError> {
        let reader = PropertyReader::for_value(value, "ReferenceInfo", "ReferenceInfo::from_value")?;

        let dependencies = parse_entries(
            reader.optional_map("dependencies")?,
            "TargetDependency",
            |name, range| {
                let range = range.as_str().ok_or_else(|| {
                    reader.invalid("dependencies", format!("version of `{}` is not a string", name))
                })?;
                Ok(DependencyRequirement::new(
                    name,
                    VersionRequirement::from_range(range)?,
                ))
            },
        )?;

        Ok(ReferenceInfo {
            kind: ReferenceKind::parse(reader.optional::<&str>("type")?),
            framework: reader.maybe("framework")?,
            dependencies,
            compile: key_list(reader.optional_map("compile")?),
            runtime: key_list(reader.optional_map("runtime")?),
            framework_assemblies: reader.optional("frameworkAssemblies")?,
        })
    }

    pub fn kind(&self) -> &ReferenceKind {
        &self.kind
    }

    /// Framework a project reference was built for.
    pub fn framework(&self) -> Option<&str> {
        self.framework.as_deref()
    }

    pub fn dependencies(&self) -> &[DependencyRequirement] {
        &self.dependencies
    }

    /// Compile-time asset paths, placeholders included.
    pub fn compile(&self) -> &[String] {
        &self.compile
    }

    pub fn runtime(&self) -> &[String] {
        &self.runtime
    }

    pub fn framework_assemblies(&self) -> &[String] {
        &self.framework_assemblies
    }

    /// Compile assets that name a real file.
    pub fn compile_assemblies(&self) -> impl Iterator<Item = &str> {
        real_assets(&self.compile)
    }

    pub fn runtime_assemblies(&self) -> impl Iterator<Item = &str> {
        real_assets(&self.runtime)
    }
}

fn real_assets(assets: &[String]) -> impl Iterator<Item = &str> {
    assets
        .iter()
        .map(String::as_str)
        .filter(|path| !path.ends_with(EMPTY_ASSET_MARKER))
}

/// The resolved libraries for one framework, optionally runtime-specific.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetSection {
    key: String,
    framework: TargetFrameworkMoniker,
    runtime_identifier: Option<String>,
    entries: Vec<(VersionedText, ReferenceInfo)>,
}

impl TargetSection {
    /// Build from a `".NETCoreApp,Version=v3.1[/rid]": { ... }` entry.
    pub fn from_value(key: &str, value: &Value) -> Result<Self, ParseError> {
        let map = value.as_map().ok_or_else(|| ParseError::TypeMismatch {
            property: key.to_string(),
            entity: "TargetSection",
            operation: "TargetSection::from_value",
            expected: "a map",
            found: value.kind(),
        })?;

        let (moniker, runtime_identifier) = match key.split_once('/') {
            Some((moniker, rid)) => (moniker, Some(rid.to_string())),
            None => (key, None),
        };
        let framework = TargetFrameworkMoniker::parse_any(moniker)?;

        Ok(TargetSection {
            key: key.to_string(),
            framework,
            runtime_identifier,
            entries: Self::parse_libraries(map)?,
        })
    }

    fn parse_libraries(map: &Map) -> Result<Vec<(VersionedText, ReferenceInfo)>, ParseError> {
        parse_entries(map, "ReferenceInfo", |key, value| {
            Ok((VersionedText::parse(key)?, ReferenceInfo::from_value(value)?))
        })
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn framework(&self) -> &TargetFrameworkMoniker {
        &self.framework
    }

    pub fn runtime_identifier(&self) -> Option<&str> {
        self.runtime_identifier.as_deref()
    }

    pub fn entries(&self) -> impl Iterator<Item = (&VersionedText, &ReferenceInfo)> {
        self.entries.iter().map(|(key, info)| (key, info))
    }

    pub fn get(&self, key: &VersionedText) -> Option<&ReferenceInfo> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, info)| info)
    }

    /// The entry for library `name`, matched case-insensitively.
    pub fn find_by_name(&self, name: &str) -> Option<(&VersionedText, &ReferenceInfo)> {
        self.entries
            .iter()
            .find(|(key, _)| key.matches_name(name))
            .map(|(key, info)| (key, info))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::version::VersionConstraint;

    #[test]
    fn test_target_section() {
        let value = Value::from_json_str(
            r#"{
                "Newtonsoft.Json/12.0.3": {
                    "type": "package",
                    "dependencies": {"System.Runtime": "4.3.0"},
                    "compile": {"lib/netstandard2.0/Newtonsoft.Json.dll": {"related": ".xml"}},
                    "runtime": {"lib/netstandard2.0/Newtonsoft.Json.dll": {}}
                },
                "System.Runtime/4.3.0": {
                    "type": "package",
                    "compile": {"ref/netstandard1.5/System.Runtime.dll": {}},
                    "runtime": {"lib/netstandard1.0/_._": {}}
                }
            }"#,
        )
        .unwrap();

        let section = TargetSection::from_value(".NETCoreApp,Version=v3.1/win-x64", &value).unwrap();
        assert_eq!(section.runtime_identifier(), Some("win-x64"));
        assert_eq!(
            section.framework(),
            &TargetFrameworkMoniker::parse_any("netcoreapp3.1").unwrap()
        );
        assert_eq!(section.len(), 2);

        let (key, info) = section.find_by_name("newtonsoft.json").unwrap();
        assert_eq!(key.to_string(), "Newtonsoft.Json/12.0.3");
        assert_eq!(info.dependencies().len(), 1);
        assert_eq!(
            info.dependencies()[0].requirement().constraint(),
            VersionConstraint::Minimum
        );
        assert_eq!(
            info.compile_assemblies().collect::<Vec<_>>(),
            ["lib/netstandard2.0/Newtonsoft.Json.dll"]
        );

        let (_, runtime) = section.find_by_name("System.Runtime").unwrap();
        assert_eq!(runtime.runtime_assemblies().count(), 0);
    }

    #[test]
    fn test_bad_library_key_fails_whole_section() {
        let value = Value::from_json_str(r#"{"NoVersion": {"type": "package"}}"#).unwrap();
        let err = TargetSection::from_value("netcoreapp3.1", &value).unwrap_err();
        assert!(matches!(
            err.root_cause(),
            ParseError::InvalidVersionedText { .. }
        ));
    }
}
