//! Originally authored dependency text (`projectFileDependencyGroups`).

use crate::core::errors::ParseError;
use crate::core::framework::TargetFrameworkMoniker;
use crate::core::value::Value;
use crate::core::version::DependencyRequirement;

/// The dependencies a framework asked for, before resolution.
///
/// An empty key denotes the framework-agnostic group written by older
/// project styles.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectFileDependencyGroup {
    key: String,
    framework: Option<TargetFrameworkMoniker>,
    requirements: Vec<DependencyRequirement>,
}

impl ProjectFileDependencyGroup {
    pub fn from_value(key: &str, value: &Value) -> Result<Self, ParseError> {
        let items = value.as_list().ok_or_else(|| ParseError::TypeMismatch {
            property: key.to_string(),
            entity: "ProjectFileDependencyGroup",
            operation: "ProjectFileDependencyGroup::from_value",
            expected: "a list",
            found: value.kind(),
        })?;

        let framework = if key.trim().is_empty() {
            None
        } else {
            Some(TargetFrameworkMoniker::parse_any(key)?)
        };

        let requirements = items
            .iter()
            .map(|item| match item.as_str() {
                Some(text) => DependencyRequirement::parse(text),
                None => Err(ParseError::InvalidValue {
                    property: key.to_string(),
                    entity: "ProjectFileDependencyGroup",
                    operation: "ProjectFileDependencyGroup::from_value",
                    reason: format!("{} is not a dependency string", item),
                }),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ProjectFileDependencyGroup {
            key: key.to_string(),
            framework,
            requirements,
        })
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn framework(&self) -> Option<&TargetFrameworkMoniker> {
        self.framework.as_ref()
    }

    pub fn requirements(&self) -> &[DependencyRequirement] {
        &self.requirements
    }

    pub fn requirement(&self, name: &str) -> Option<&DependencyRequirement> {
        self.requirements
            .iter()
            .find(|r| r.name().eq_ignore_ascii_case(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::version::VersionConstraint;

    #[test]
    fn test_group() {
        let value =
            Value::from_json_str(r#"["Lib >= 1.0.0", "Newtonsoft.Json >= 12.0.3", "Tool"]"#)
                .unwrap();
        let group = ProjectFileDependencyGroup::from_value(".NETCoreApp,Version=v3.1", &value)
            .unwrap();

        assert!(group.framework().is_some());
        assert_eq!(group.requirements().len(), 3);
        assert_eq!(
            group
                .requirement("newtonsoft.json")
                .map(|r| r.requirement().constraint()),
            Some(VersionConstraint::Minimum)
        );
        assert_eq!(
            group.requirement("Tool").map(|r| r.requirement().constraint()),
            Some(VersionConstraint::Unconstrained)
        );
    }

    #[test]
    fn test_framework_agnostic_group() {
        let value = Value::from_json_str(r#"[]"#).unwrap();
        let group = ProjectFileDependencyGroup::from_value("", &value).unwrap();
        assert!(group.framework().is_none());
    }

    #[test]
    fn test_bad_operator_fails() {
        let value = Value::from_json_str(r#"["Lib ~> 1.0.0"]"#).unwrap();
        assert!(ProjectFileDependencyGroup::from_value("net461", &value).is_err());
    }
}
