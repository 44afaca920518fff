//! The library table: what actually got restored, independent of framework.

use std::collections::HashMap;
use std::fmt;

use crate::assets::property::PropertyReader;
use crate::core::errors::ParseError;
use crate::core::value::Value;
use crate::core::version::{SemanticVersion, VersionedText};

/// How a library was brought into the restore.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ReferenceKind {
    Package,
    Project,
    Other(String),
}

impl ReferenceKind {
    pub fn parse(text: &str) -> Self {
        if text.eq_ignore_ascii_case("package") {
            ReferenceKind::Package
        } else if text.eq_ignore_ascii_case("project") {
            ReferenceKind::Project
        } else {
            ReferenceKind::Other(text.to_string())
        }
    }

    pub fn is_package(&self) -> bool {
        matches!(self, ReferenceKind::Package)
    }

    pub fn is_project(&self) -> bool {
        matches!(self, ReferenceKind::Project)
    }
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReferenceKind::Package => write!(f, "package"),
            ReferenceKind::Project => write!(f, "project"),
            ReferenceKind::Other(kind) => write!(f, "{}", kind),
        }
    }
}

/// A resolved library identity from the `libraries` table.
#[derive(Debug, Clone, PartialEq)]
pub struct LibraryEntry {
    key: VersionedText,
    kind: ReferenceKind,
    sha512: Option<String>,
    path: Option<String>,
    msbuild_project: Option<String>,
    serviceable: bool,
    files: Vec<String>,
}

impl LibraryEntry {
    /// Build from a `"Name/Version": { ... }` entry.
    pub fn from_value(key: &str, value: &Value) -> Result<Self, ParseError> {
        let reader = PropertyReader::for_value(value, "LibraryEntry", "LibraryEntry::from_value")?;
        let key = VersionedText::parse(key)?;

        Ok(LibraryEntry {
            key,
            kind: ReferenceKind::parse(reader.string("type")?),
            sha512: reader.maybe("sha512")?,
            path: reader.maybe("path")?,
            msbuild_project: reader.maybe("msbuildProject")?,
            serviceable: reader.optional_bool("serviceable")?,
            files: reader.optional("files")?,
        })
    }

    pub fn key(&self) -> &VersionedText {
        &self.key
    }

    pub fn name(&self) -> &str {
        self.key.name()
    }

    pub fn version(&self) -> &SemanticVersion {
        self.key.version()
    }

    pub fn kind(&self) -> &ReferenceKind {
        &self.kind
    }

    pub fn sha512(&self) -> Option<&str> {
        self.sha512.as_deref()
    }

    /// Package folder relative path (`newtonsoft.json/12.0.3`) or project path.
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    pub fn msbuild_project(&self) -> Option<&str> {
        self.msbuild_project.as_deref()
    }

    pub fn is_serviceable(&self) -> bool {
        self.serviceable
    }

    pub fn files(&self) -> &[String] {
        &self.files
    }
}

/// Libraries keyed by `name/version`, in document order.
#[derive(Debug, Clone, Default)]
pub struct LibraryTable {
    entries: Vec<LibraryEntry>,
    index: HashMap<VersionedText, usize>,
}

impl LibraryTable {
    pub fn new(entries: Vec<LibraryEntry>) -> Self {
        let index = entries
            .iter()
            .enumerate()
            .map(|(i, entry)| (entry.key.clone(), i))
            .collect();
        LibraryTable { entries, index }
    }

    pub fn get(&self, key: &VersionedText) -> Option<&LibraryEntry> {
        self.index.get(key).map(|&i| &self.entries[i])
    }

    pub fn contains(&self, key: &VersionedText) -> bool {
        self.index.contains_key(key)
    }

    /// All versions of a library, matched case-insensitively.
    pub fn by_name<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a LibraryEntry> + 'a {
        self.entries.iter().filter(move |e| e.key.matches_name(name))
    }

    pub fn iter(&self) -> impl Iterator<Item = &LibraryEntry> {
        self.entries.iter()
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

    #[test]
    fn test_package_entry() {
        let value = Value::from_json_str(
            r#"{
                "sha512": "abc==",
                "type": "package",
                "path": "newtonsoft.json/12.0.3",
                "files": ["lib/netstandard2.0/Newtonsoft.Json.dll", "newtonsoft.json.nuspec"]
            }"#,
        )
        .unwrap();

        let entry = LibraryEntry::from_value("Newtonsoft.Json/12.0.3", &value).unwrap();
        assert_eq!(entry.name(), "Newtonsoft.Json");
        assert_eq!(entry.version(), &SemanticVersion::new(12, 0, 3));
        assert!(entry.kind().is_package());
        assert_eq!(entry.path(), Some("newtonsoft.json/12.0.3"));
        assert_eq!(entry.files().len(), 2);
    }

    #[test]
    fn test_missing_type_fails() {
        let value = Value::from_json_str(r#"{"path": "x"}"#).unwrap();
        assert!(matches!(
            LibraryEntry::from_value("X/1.0.0", &value),
            Err(ParseError::MissingProperty { .. })
        ));
    }

    #[test]
    fn test_table_lookup() {
        let project = Value::from_json_str(
            r#"{"type": "project", "path": "../Lib/Lib.csproj", "msbuildProject": "../Lib/Lib.csproj"}"#,
        )
        .unwrap();
        let entry = LibraryEntry::from_value("Lib/1.0.0", &project).unwrap();
        assert!(entry.kind().is_project());

        let table = LibraryTable::new(vec![entry]);
        let key = VersionedText::parse("Lib/1.0.0").unwrap();
        assert!(table.contains(&key));
        assert_eq!(table.by_name("lib").count(), 1);
        assert!(table
            .get(&VersionedText::parse("Lib/2.0.0").unwrap())
            .is_none());
    }
}
