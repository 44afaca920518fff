//! Version algebra: semantic versions, `name/version` keys and constraints.
//!
//! Lock files write versions in several shapes: canonical keys
//! (`Newtonsoft.Json/12.0.3`), interval ranges (`[12.0.3, )`), four-part
//! legacy versions (`4.0.0.0`) and moniker suffixes (`v3.1`). Everything is
//! funneled through [`SemanticVersion::parse`], which isolates the version
//! token before handing it to a strict parser.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use semver::{BuildMetadata, Prerelease};

use crate::core::errors::ParseError;

/// A `major.minor.patch[.revision][-pre][+build]` version.
///
/// The optional revision exists for legacy four-part versions; it orders
/// after patch and before the pre-release label.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SemanticVersion {
    major: u64,
    minor: u64,
    patch: u64,
    revision: Option<u64>,
    pre: Prerelease,
    build: BuildMetadata,
}

impl SemanticVersion {
    /// Create a release version.
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        SemanticVersion {
            major,
            minor,
            patch,
            revision: None,
            pre: Prerelease::EMPTY,
            build: BuildMetadata::EMPTY,
        }
    }

    /// Set the fourth version component.
    pub fn with_revision(mut self, revision: u64) -> Self {
        self.revision = Some(revision);
        self
    }

    /// Parse a version out of text that may carry extraneous characters.
    ///
    /// The first token containing a digit is isolated (brackets, commas,
    /// whitespace and leading letters such as `v` are dropped) and then
    /// parsed strictly. Fails when the text holds no digits.
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        let token = version_token(text).ok_or_else(|| ParseError::InvalidVersion {
            text: text.to_string(),
            reason: "no digits found".to_string(),
        })?;

        Self::parse_strict(token).map_err(|reason| ParseError::InvalidVersion {
            text: text.to_string(),
            reason,
        })
    }

    fn parse_strict(token: &str) -> Result<Self, String> {
        let (rest, build) = match token.split_once('+') {
            Some((rest, build)) => (rest, build),
            None => (token, ""),
        };
        let (core, pre) = match rest.split_once('-') {
            Some((core, pre)) => (core, pre),
            None => (rest, ""),
        };

        let parts = core
            .split('.')
            .map(|part| {
                part.parse::<u64>()
                    .map_err(|_| format!("`{}` is not a numeric version component", part))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let (major, minor, patch, revision) = match parts.as_slice() {
            [major] => (*major, 0, 0, None),
            [major, minor] => (*major, *minor, 0, None),
            [major, minor, patch] => (*major, *minor, *patch, None),
            [major, minor, patch, revision] => (*major, *minor, *patch, Some(*revision)),
            _ => return Err(format!("expected 1 to 4 components, found {}", parts.len())),
        };

        let pre = Prerelease::new(pre).map_err(|e| e.to_string())?;
        let build = BuildMetadata::new(build).map_err(|e| e.to_string())?;

        Ok(SemanticVersion {
            major,
            minor,
            patch,
            revision,
            pre,
            build,
        })
    }

    pub fn major(&self) -> u64 {
        self.major
    }

    pub fn minor(&self) -> u64 {
        self.minor
    }

    pub fn patch(&self) -> u64 {
        self.patch
    }

    pub fn revision(&self) -> Option<u64> {
        self.revision
    }

    /// Pre-release label, empty for release versions.
    pub fn pre(&self) -> &str {
        self.pre.as_str()
    }

    /// Build metadata, empty when absent.
    pub fn build(&self) -> &str {
        self.build.as_str()
    }

    pub fn is_prerelease(&self) -> bool {
        !self.pre.is_empty()
    }
}

/// Isolate the first version-shaped token of `text`.
fn version_token(text: &str) -> Option<&str> {
    text.split(|c: char| !(c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '+')))
        .find(|piece| piece.bytes().any(|b| b.is_ascii_digit()))
        .map(|piece| {
            piece
                .trim_start_matches(|c: char| !c.is_ascii_digit())
                .trim_end_matches(['.', '-', '+'])
        })
        .filter(|token| !token.is_empty())
}

impl Ord for SemanticVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.major
            .cmp(&other.major)
            .then_with(|| self.minor.cmp(&other.minor))
            .then_with(|| self.patch.cmp(&other.patch))
            .then_with(|| {
                self.revision
                    .unwrap_or(0)
                    .cmp(&other.revision.unwrap_or(0))
            })
            .then_with(|| self.pre.cmp(&other.pre))
            .then_with(|| self.build.cmp(&other.build))
            // keeps Ord consistent with Eq for `1.0.0` vs `1.0.0.0`
            .then_with(|| self.revision.cmp(&other.revision))
    }
}

impl PartialOrd for SemanticVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for SemanticVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if let Some(revision) = self.revision {
            write!(f, ".{}", revision)?;
        }
        if !self.pre.is_empty() {
            write!(f, "-{}", self.pre)?;
        }
        if !self.build.is_empty() {
            write!(f, "+{}", self.build)?;
        }
        Ok(())
    }
}

impl FromStr for SemanticVersion {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SemanticVersion::parse(s)
    }
}

impl From<semver::Version> for SemanticVersion {
    fn from(v: semver::Version) -> Self {
        SemanticVersion {
            major: v.major,
            minor: v.minor,
            patch: v.patch,
            revision: None,
            pre: v.pre,
            build: v.build,
        }
    }
}

/// A compact `name/version` pair, the key of the library table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VersionedText {
    name: String,
    version: SemanticVersion,
}

impl VersionedText {
    pub fn new(name: impl Into<String>, version: SemanticVersion) -> Self {
        VersionedText {
            name: name.into(),
            version,
        }
    }

    /// Parse `name/version`. Both halves must be non-empty and the second
    /// must be a version of at least three components with nothing around
    /// it, so accepted keys print back unchanged.
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        let invalid = |reason: &str| ParseError::InvalidVersionedText {
            text: text.to_string(),
            reason: reason.to_string(),
        };

        let parts: Vec<&str> = text.split('/').collect();
        let [name, version] = parts.as_slice() else {
            return Err(invalid("expected exactly one `/` separator"));
        };
        if name.trim().is_empty() || version.is_empty() {
            return Err(invalid("name and version must both be non-empty"));
        }

        let core = version.split(['-', '+']).next().unwrap_or(version);
        if core.split('.').count() < 3 {
            return Err(invalid("version must have at least three components"));
        }
        let version =
            SemanticVersion::parse_strict(version).map_err(|reason| ParseError::InvalidVersion {
                text: version.to_string(),
                reason,
            })?;
        Ok(VersionedText::new(*name, version))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &SemanticVersion {
        &self.version
    }

    /// Library ids are case-insensitive.
    pub fn matches_name(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }
}

impl fmt::Display for VersionedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.name, self.version)
    }
}

impl FromStr for VersionedText {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        VersionedText::parse(s)
    }
}

/// Comparison operator applied between an actual version and a bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VersionConstraint {
    EqualTo,
    Minimum,
    Maximum,
    GreaterThan,
    LessThan,
    Unconstrained,
}

impl VersionConstraint {
    /// Parse an infix operator token.
    pub fn from_operator(token: &str) -> Option<Self> {
        match token {
            "==" => Some(VersionConstraint::EqualTo),
            ">=" => Some(VersionConstraint::Minimum),
            "<=" => Some(VersionConstraint::Maximum),
            ">" => Some(VersionConstraint::GreaterThan),
            "<" => Some(VersionConstraint::LessThan),
            _ => None,
        }
    }

    pub fn operator(&self) -> Option<&'static str> {
        match self {
            VersionConstraint::EqualTo => Some("=="),
            VersionConstraint::Minimum => Some(">="),
            VersionConstraint::Maximum => Some("<="),
            VersionConstraint::GreaterThan => Some(">"),
            VersionConstraint::LessThan => Some("<"),
            VersionConstraint::Unconstrained => None,
        }
    }

    /// Check `actual` against `bound`.
    ///
    /// `Maximum` is strict (`actual < bound`) while `Minimum` is inclusive.
    pub fn evaluate(&self, actual: &SemanticVersion, bound: &SemanticVersion) -> bool {
        match self {
            VersionConstraint::EqualTo => actual == bound,
            VersionConstraint::Minimum => actual >= bound,
            VersionConstraint::GreaterThan => actual > bound,
            VersionConstraint::LessThan => actual < bound,
            VersionConstraint::Maximum => actual < bound,
            VersionConstraint::Unconstrained => true,
        }
    }
}

/// A constraint together with the version it bounds.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VersionRequirement {
    constraint: VersionConstraint,
    bound: Option<SemanticVersion>,
}

impl VersionRequirement {
    pub fn new(constraint: VersionConstraint, bound: SemanticVersion) -> Self {
        VersionRequirement {
            constraint,
            bound: Some(bound),
        }
    }

    /// A requirement every version satisfies.
    pub fn any() -> Self {
        VersionRequirement {
            constraint: VersionConstraint::Unconstrained,
            bound: None,
        }
    }

    /// Map interval notation onto the constraint algebra.
    ///
    /// `1.0` and `[1.0, )` are minimums, `[1.0]` is exact, `(1.0, )` is
    /// exclusive, `(, 2.0)` and `(, 2.0]` bound from above. A range with
    /// both bounds is checked against its lower bound only.
    pub fn from_range(text: &str) -> Result<Self, ParseError> {
        let trimmed = text.trim();
        if trimmed.is_empty() || trimmed == "*" {
            return Ok(VersionRequirement::any());
        }

        let open = trimmed.chars().next();
        let close = trimmed.chars().last();
        if !matches!(open, Some('[') | Some('(')) {
            let bound = SemanticVersion::parse(trimmed)?;
            return Ok(VersionRequirement::new(VersionConstraint::Minimum, bound));
        }

        let invalid = |reason: &str| ParseError::InvalidConstraint {
            text: text.to_string(),
            reason: reason.to_string(),
        };
        if !matches!(close, Some(']') | Some(')')) || trimmed.len() < 2 {
            return Err(invalid("unterminated interval"));
        }

        let inner = &trimmed[1..trimmed.len() - 1];
        let inclusive_low = open == Some('[');
        let inclusive_high = close == Some(']');

        match inner.split_once(',') {
            None => {
                if !(inclusive_low && inclusive_high) {
                    return Err(invalid("single-version interval must use `[..]`"));
                }
                let bound = SemanticVersion::parse(inner)?;
                Ok(VersionRequirement::new(VersionConstraint::EqualTo, bound))
            }
            Some((low, high)) => {
                let (low, high) = (low.trim(), high.trim());
                if !low.is_empty() {
                    let bound = SemanticVersion::parse(low)?;
                    let constraint = if inclusive_low {
                        VersionConstraint::Minimum
                    } else {
                        VersionConstraint::GreaterThan
                    };
                    Ok(VersionRequirement::new(constraint, bound))
                } else if !high.is_empty() {
                    let bound = SemanticVersion::parse(high)?;
                    let constraint = if inclusive_high {
                        VersionConstraint::Maximum
                    } else {
                        VersionConstraint::LessThan
                    };
                    Ok(VersionRequirement::new(constraint, bound))
                } else {
                    Ok(VersionRequirement::any())
                }
            }
        }
    }

    pub fn constraint(&self) -> VersionConstraint {
        self.constraint
    }

    pub fn bound(&self) -> Option<&SemanticVersion> {
        self.bound.as_ref()
    }

    /// Check whether `actual` satisfies this requirement.
    pub fn matches(&self, actual: &SemanticVersion) -> bool {
        match &self.bound {
            Some(bound) => self.constraint.evaluate(actual, bound),
            None => true,
        }
    }
}

impl fmt::Display for VersionRequirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.constraint.operator(), &self.bound) {
            (Some(op), Some(bound)) => write!(f, "{} {}", op, bound),
            _ => write!(f, "*"),
        }
    }
}

/// A dependency as authored: `Name >= 1.0.0`, or a bare `Name`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DependencyRequirement {
    name: String,
    requirement: VersionRequirement,
}

impl DependencyRequirement {
    pub fn new(name: impl Into<String>, requirement: VersionRequirement) -> Self {
        DependencyRequirement {
            name: name.into(),
            requirement,
        }
    }

    /// Parse `name op version` where `op` is one of `==`, `>=`, `<=`, `>`, `<`.
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        let invalid = |reason: &str| ParseError::InvalidConstraint {
            text: text.to_string(),
            reason: reason.to_string(),
        };

        let Some(op_start) = text.find(['<', '>', '=']) else {
            let name = text.trim();
            if name.is_empty() || name.contains(char::is_whitespace) {
                return Err(invalid("expected `name [operator version]`"));
            }
            return Ok(DependencyRequirement::new(name, VersionRequirement::any()));
        };

        let op_end = text[op_start..]
            .find(|c: char| !matches!(c, '<' | '>' | '='))
            .map(|offset| op_start + offset)
            .unwrap_or(text.len());
        let op = &text[op_start..op_end];
        let constraint =
            VersionConstraint::from_operator(op).ok_or_else(|| invalid("unknown operator"))?;

        let name = text[..op_start].trim();
        if name.is_empty() || name.contains(char::is_whitespace) {
            return Err(invalid("expected a single dependency name before the operator"));
        }
        let version = text[op_end..].trim();
        if version.is_empty() {
            return Err(invalid("missing version after operator"));
        }

        let bound = SemanticVersion::parse(version)?;
        Ok(DependencyRequirement::new(
            name,
            VersionRequirement::new(constraint, bound),
        ))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn requirement(&self) -> &VersionRequirement {
        &self.requirement
    }
}

impl fmt::Display for DependencyRequirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.requirement.bound() {
            Some(_) => write!(f, "{} {}", self.name, self.requirement),
            None => write!(f, "{}", self.name),
        }
    }
}

/// Evaluate `constraint` for `actual` against `bound`.
pub fn evaluate_constraint(
    constraint: VersionConstraint,
    actual: &SemanticVersion,
    bound: &SemanticVersion,
) -> bool {
    constraint.evaluate(actual, bound)
}
