//! Restore diagnostics recorded in the `logs` section.

use std::fmt;

use crate::assets::property::PropertyReader;
use crate::core::errors::ParseError;
use crate::core::value::Value;
use crate::util::diagnostic::{Diagnostic, Severity};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Verbose,
    Information,
    Minimal,
    Warning,
    Error,
}

impl LogLevel {
    pub fn parse(text: &str) -> Option<Self> {
        let level = match text.to_ascii_lowercase().as_str() {
            "debug" => LogLevel::Debug,
            "verbose" => LogLevel::Verbose,
            "information" => LogLevel::Information,
            "minimal" => LogLevel::Minimal,
            "warning" => LogLevel::Warning,
            "error" => LogLevel::Error,
            _ => return None,
        };
        Some(level)
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LogLevel::Debug => "debug",
            LogLevel::Verbose => "verbose",
            LogLevel::Information => "information",
            LogLevel::Minimal => "minimal",
            LogLevel::Warning => "warning",
            LogLevel::Error => "error",
        };
        f.write_str(s)
    }
}

impl From<LogLevel> for Severity {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => Severity::Error,
            LogLevel::Warning => Severity::Warning,
            _ => Severity::Note,
        }
    }
}

/// One message the package manager emitted during restore.
#[derive(Debug, Clone, PartialEq)]
pub struct RestoreLog {
    code: String,
    level: LogLevel,
    message: String,
    library_id: Option<String>,
    target_graphs: Vec<String>,
}

impl RestoreLog {
    pub fn from_value(value: &Value) -> Result<Self, ParseError> {
        let reader = PropertyReader::for_value(value, "RestoreLog", "RestoreLog::from_value")?;
        let level = reader.string("level")?;

        Ok(RestoreLog {
            code: reader.required("code")?,
            level: LogLevel::parse(level)
                .ok_or_else(|| reader.invalid("level", format!("unknown level `{}`", level)))?,
            message: reader.optional("message")?,
            library_id: reader.maybe("libraryId")?,
            target_graphs: reader.optional("targetGraphs")?,
        })
    }

    /// Restore message code, e.g. `NU1701`.
    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn level(&self) -> LogLevel {
        self.level
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn library_id(&self) -> Option<&str> {
        self.library_id.as_deref()
    }

    pub fn target_graphs(&self) -> &[String] {
        &self.target_graphs
    }

    /// Render as a diagnostic at the severity the package manager gave it.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let mut diag = Diagnostic::new(
            self.level.into(),
            format!("{}: {}", self.code, self.message),
        );
        if let Some(library) = &self.library_id {
            diag = diag.with_context(format!("for library {}", library));
        }
        for graph in &self.target_graphs {
            diag = diag.with_context(format!("in {}", graph));
        }
        diag
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_entry() {
        let value = Value::from_json_str(
            r#"{
                "code": "NU1701",
                "level": "Warning",
                "warningLevel": 1,
                "message": "Package 'Old 1.0.0' was restored using '.NETFramework,Version=v4.6.1'",
                "libraryId": "Old",
                "targetGraphs": [".NETCoreApp,Version=v3.1"]
            }"#,
        )
        .unwrap();

        let log = RestoreLog::from_value(&value).unwrap();
        assert_eq!(log.code(), "NU1701");
        assert_eq!(log.level(), LogLevel::Warning);
        assert_eq!(log.library_id(), Some("Old"));
        assert_eq!(log.target_graphs().len(), 1);
    }

    #[test]
    fn test_log_severity() {
        let value = Value::from_json_str(
            r#"{
                "code": "NU1603",
                "level": "Warning",
                "message": "System.Buffers 4.5.0 was not found",
                "libraryId": "System.Buffers",
                "targetGraphs": [".NETFramework,Version=v4.6.1"]
            }"#,
        )
        .unwrap();
        let output = RestoreLog::from_value(&value).unwrap().to_diagnostic().format(false);
        assert_eq!(
            output,
            "warning: NU1603: System.Buffers 4.5.0 was not found\n\
             \x20 → for library System.Buffers\n\
             \x20 → in .NETFramework,Version=v4.6.1\n"
        );

        for (level, severity) in [("Information", Severity::Note), ("Error", Severity::Error)] {
            let value = Value::from_json_str(&format!(
                r#"{{"code": "NU1000", "level": "{}"}}"#,
                level
            ))
            .unwrap();
            let diag = RestoreLog::from_value(&value).unwrap().to_diagnostic();
            assert_eq!(diag.severity(), severity);
        }
    }

    #[test]
    fn test_unknown_level() {
        let value = Value::from_json_str(r#"{"code": "NU1000", "level": "Loud"}"#).unwrap();
        assert!(matches!(
            RestoreLog::from_value(&value),
            Err(ParseError::InvalidValue { .. })
        ));
    }
}
