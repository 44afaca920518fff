//! Assembly identities as written in display-name form.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::path::Path;
use std::str::FromStr;

use crate::core::errors::ParseError;
use crate::core::version::SemanticVersion;

/// An assembly name hint: simple name plus the optional identity parts of
/// `Name, Version=1.2.3.4, Culture=neutral, PublicKeyToken=...`.
///
/// Two names are equal when their simple names match ignoring ASCII case.
/// The version and culture are informational.
#[derive(Debug, Clone)]
pub struct AssemblyName {
    name: String,
    version: Option<SemanticVersion>,
    culture: Option<String>,
    public_key_token: Option<String>,
}

impl AssemblyName {
    pub fn new(name: impl Into<String>) -> Self {
        AssemblyName {
            name: name.into(),
            version: None,
            culture: None,
            public_key_token: None,
        }
    }

    pub fn with_version(mut self, version: SemanticVersion) -> Self {
        self.version = Some(version);
        self
    }

    /// Set the culture. `neutral` and empty cultures are dropped.
    pub fn with_culture(mut self, culture: &str) -> Self {
        if !culture.is_empty() && !culture.eq_ignore_ascii_case("neutral") {
            self.culture = Some(culture.to_string());
        }
        self
    }

    /// Parse a display name. Unknown `Key=Value` parts are ignored.
    pub fn parse(display_name: &str) -> Result<Self, ParseError> {
        let mut parts = display_name.split(',').map(str::trim);

        let name = parts.next().unwrap_or_default();
        if name.is_empty() {
            return Err(ParseError::InvalidValue {
                property: "name".to_string(),
                entity: "AssemblyName",
                operation: "AssemblyName::parse",
                reason: format!("`{}` has no simple name", display_name),
            });
        }

        let mut assembly = AssemblyName::new(name);
        for part in parts {
            let Some((key, value)) = part.split_once('=') else {
                continue;
            };
            let value = value.trim();
            match key.trim().to_ascii_lowercase().as_str() {
                "version" => assembly.version = Some(SemanticVersion::parse(value)?),
                "culture" => assembly = assembly.with_culture(value),
                "publickeytoken" if !value.eq_ignore_ascii_case("null") && !value.is_empty() => {
                    assembly.public_key_token = Some(value.to_ascii_lowercase())
                }
                _ => {}
            }
        }

        Ok(assembly)
    }

    /// Name of the assembly stored at `path`, taken from its file stem.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.file_stem()
            .and_then(|stem| stem.to_str())
            .filter(|stem| !stem.is_empty())
            .map(AssemblyName::new)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> Option<&SemanticVersion> {
        self.version.as_ref()
    }

    /// `None` for culture-neutral assemblies.
    pub fn culture(&self) -> Option<&str> {
        self.culture.as_deref()
    }

    pub fn public_key_token(&self) -> Option<&str> {
        self.public_key_token.as_deref()
    }

    /// Whether `name` is this assembly's simple name, ignoring case.
    pub fn matches(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }

    /// Lowercased simple name, used as a lookup key.
    pub fn key(&self) -> String {
        self.name.to_ascii_lowercase()
    }

    /// Full display name.
    pub fn display_name(&self) -> String {
        let mut out = self.name.clone();
        if let Some(ref version) = self.version {
            out.push_str(&format!(", Version={}", version));
        }
        out.push_str(&format!(
            ", Culture={}",
            self.culture.as_deref().unwrap_or("neutral")
        ));
        out.push_str(&format!(
            ", PublicKeyToken={}",
            self.public_key_token.as_deref().unwrap_or("null")
        ));
        out
    }
}

impl PartialEq for AssemblyName {
    fn eq(&self, other: &Self) -> bool {
        self.name.eq_ignore_ascii_case(&other.name)
    }
}

impl Eq for AssemblyName {}

impl Hash for AssemblyName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl fmt::Display for AssemblyName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.version {
            Some(ref version) => write!(f, "{} {}", self.name, version),
            None => write!(f, "{}", self.name),
        }
    }
}

impl FromStr for AssemblyName {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AssemblyName::parse(s)
    }
}
