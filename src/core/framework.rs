//! Target framework monikers.
//!
//! A moniker is written in one of two styles: the simple short form used in
//! project files (`netcoreapp3.1`, `net461`, `net6.0-windows`) or the explicit
//! form used as target keys (`.NETCoreApp,Version=v3.1`). Both normalize to
//! the same [`TargetFrameworkMoniker`].

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::core::errors::ParseError;
use crate::core::version::SemanticVersion;

static SIMPLE_MONIKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([a-z]+)(\d[\d.]*)(?:-([a-z][a-z0-9.]*))?$").expect("valid moniker regex")
});

/// Known runtime families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FrameworkFamily {
    NetCoreApp,
    NetStandard,
    NetFramework,
    NetPortable,
    Uap,
    MonoAndroid,
    XamarinIos,
    Tizen,
}

impl FrameworkFamily {
    const ALL: [FrameworkFamily; 8] = [
        FrameworkFamily::NetCoreApp,
        FrameworkFamily::NetStandard,
        FrameworkFamily::NetFramework,
        FrameworkFamily::NetPortable,
        FrameworkFamily::Uap,
        FrameworkFamily::MonoAndroid,
        FrameworkFamily::XamarinIos,
        FrameworkFamily::Tizen,
    ];

    /// Identifier used by the explicit style.
    pub fn explicit_name(&self) -> &'static str {
        match self {
            FrameworkFamily::NetCoreApp => ".NETCoreApp",
            FrameworkFamily::NetStandard => ".NETStandard",
            FrameworkFamily::NetFramework => ".NETFramework",
            FrameworkFamily::NetPortable => ".NETPortable",
            FrameworkFamily::Uap => "UAP",
            FrameworkFamily::MonoAndroid => "MonoAndroid",
            FrameworkFamily::XamarinIos => "Xamarin.iOS",
            FrameworkFamily::Tizen => "Tizen",
        }
    }

    /// Prefix used by the simple style.
    pub fn short_name(&self) -> &'static str {
        match self {
            FrameworkFamily::NetCoreApp => "netcoreapp",
            FrameworkFamily::NetStandard => "netstandard",
            FrameworkFamily::NetFramework => "net",
            FrameworkFamily::NetPortable => "portable",
            FrameworkFamily::Uap => "uap",
            FrameworkFamily::MonoAndroid => "monoandroid",
            FrameworkFamily::XamarinIos => "xamarinios",
            FrameworkFamily::Tizen => "tizen",
        }
    }

    fn from_explicit_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|family| family.explicit_name().eq_ignore_ascii_case(name))
    }

    fn from_short_name(name: &str, version: &SemanticVersion) -> Option<Self> {
        match name {
            // `net5.0` and later are .NETCoreApp
            "net" if version.major() >= 5 => Some(FrameworkFamily::NetCoreApp),
            _ => Self::ALL
                .into_iter()
                .find(|family| family.short_name() == name),
        }
    }
}

impl fmt::Display for FrameworkFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.explicit_name())
    }
}

/// Textual style of a moniker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MonikerStyle {
    /// `netcoreapp3.1`
    Simple,
    /// `.NETCoreApp,Version=v3.1`
    Explicit,
}

impl fmt::Display for MonikerStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MonikerStyle::Simple => write!(f, "simple"),
            MonikerStyle::Explicit => write!(f, "explicit"),
        }
    }
}

/// A framework family plus version, with an optional platform suffix.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TargetFrameworkMoniker {
    family: FrameworkFamily,
    version: SemanticVersion,
    platform: Option<String>,
}

impl TargetFrameworkMoniker {
    pub fn new(family: FrameworkFamily, version: SemanticVersion) -> Self {
        TargetFrameworkMoniker {
            family,
            version,
            platform: None,
        }
    }

    pub fn with_platform(mut self, platform: impl Into<String>) -> Self {
        self.platform = Some(platform.into());
        self
    }

    /// Parse `text` written in `style`.
    pub fn parse(text: &str, style: MonikerStyle) -> Result<Self, ParseError> {
        match style {
            MonikerStyle::Simple => Self::parse_simple(text),
            MonikerStyle::Explicit => Self::parse_explicit(text),
        }
    }

    /// Parse either style, choosing by shape.
    pub fn parse_any(text: &str) -> Result<Self, ParseError> {
        Self::parse(text, Self::detect_style(text))
    }

    /// Explicit monikers carry a `,Version=` component or a leading dot.
    pub fn detect_style(text: &str) -> MonikerStyle {
        let text = text.trim();
        if text.contains(',') || text.starts_with('.') {
            MonikerStyle::Explicit
        } else {
            MonikerStyle::Simple
        }
    }

    fn parse_simple(text: &str) -> Result<Self, ParseError> {
        let invalid = |reason: String| ParseError::InvalidFramework {
            text: text.to_string(),
            style: MonikerStyle::Simple,
            reason,
        };

        let lowered = text.trim().to_ascii_lowercase();
        let caps = SIMPLE_MONIKER
            .captures(&lowered)
            .ok_or_else(|| invalid("expected `<family><version>[-<platform>]`".to_string()))?;

        let prefix = &caps[1];
        let digits = &caps[2];
        let version = if digits.contains('.') {
            SemanticVersion::parse(digits)?
        } else {
            compact_version(digits).ok_or_else(|| invalid(format!("bad version `{}`", digits)))?
        };

        let family = FrameworkFamily::from_short_name(prefix, &version)
            .ok_or_else(|| invalid(format!("unknown framework family `{}`", prefix)))?;

        let mut moniker = TargetFrameworkMoniker::new(family, version);
        if let Some(platform) = caps.get(3) {
            moniker.platform = Some(platform.as_str().to_string());
        }
        Ok(moniker)
    }

    fn parse_explicit(text: &str) -> Result<Self, ParseError> {
        let invalid = |reason: String| ParseError::InvalidFramework {
            text: text.to_string(),
            style: MonikerStyle::Explicit,
            reason,
        };

        let mut parts = text.split(',').map(str::trim);
        let family_name = parts.next().unwrap_or_default();
        let family = FrameworkFamily::from_explicit_name(family_name)
            .ok_or_else(|| invalid(format!("unknown framework family `{}`", family_name)))?;

        let mut version = None;
        for part in parts {
            let Some((key, value)) = part.split_once('=') else {
                return Err(invalid(format!("expected `key=value`, found `{}`", part)));
            };
            if key.trim().eq_ignore_ascii_case("version") {
                let value = value.trim();
                let value = value
                    .strip_prefix(['v', 'V'])
                    .ok_or_else(|| invalid("version must start with `v`".to_string()))?;
                version = Some(SemanticVersion::parse(value)?);
            }
            // Profile and other components do not affect identity
        }

        let version = version.ok_or_else(|| invalid("missing `Version=` component".to_string()))?;
        Ok(TargetFrameworkMoniker::new(family, version))
    }

    pub fn family(&self) -> FrameworkFamily {
        self.family
    }

    pub fn version(&self) -> &SemanticVersion {
        &self.version
    }

    pub fn platform(&self) -> Option<&str> {
        self.platform.as_deref()
    }

    /// Render in the simple style.
    pub fn short_folder_name(&self) -> String {
        let v = &self.version;
        let version = match self.family {
            FrameworkFamily::NetCoreApp if v.major() >= 5 => format!("{}.{}", v.major(), v.minor()),
            FrameworkFamily::NetFramework => {
                if v.patch() == 0 {
                    format!("{}{}", v.major(), v.minor())
                } else {
                    format!("{}{}{}", v.major(), v.minor(), v.patch())
                }
            }
            _ if v.patch() == 0 => format!("{}.{}", v.major(), v.minor()),
            _ => format!("{}.{}.{}", v.major(), v.minor(), v.patch()),
        };

        let prefix = match self.family {
            FrameworkFamily::NetCoreApp if v.major() >= 5 => "net",
            family => family.short_name(),
        };

        match &self.platform {
            Some(platform) => format!("{}{}-{}", prefix, version, platform),
            None => format!("{}{}", prefix, version),
        }
    }
}

/// `461` is 4.6.1, `48` is 4.8.
fn compact_version(digits: &str) -> Option<SemanticVersion> {
    let parts: Vec<u64> = digits
        .chars()
        .map(|c| c.to_digit(10).map(u64::from))
        .collect::<Option<_>>()?;

    match parts.as_slice() {
        [major] => Some(SemanticVersion::new(*major, 0, 0)),
        [major, minor] => Some(SemanticVersion::new(*major, *minor, 0)),
        [major, minor, patch] => Some(SemanticVersion::new(*major, *minor, *patch)),
        [major, minor, patch, revision] => {
            Some(SemanticVersion::new(*major, *minor, *patch).with_revision(*revision))
        }
        _ => None,
    }
}

impl fmt::Display for TargetFrameworkMoniker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let v = &self.version;
        write!(f, "{},Version=v{}.{}", self.family, v.major(), v.minor())?;
        if v.patch() != 0 {
            write!(f, ".{}", v.patch())?;
        }
        if let Some(platform) = &self.platform {
            write!(f, " ({})", platform)?;
        }
        Ok(())
    }
}

impl FromStr for TargetFrameworkMoniker {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TargetFrameworkMoniker::parse_any(s)
    }
}
