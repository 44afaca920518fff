//! User-friendly diagnostic messages.
//!
//! Errors name their root cause, the lock file they came from, and a
//! suggested fix. Restore logs recorded in the lock file are rendered the
//! same way at their own severity.

use std::fmt::{self, Write};
use std::path::{Path, PathBuf};

/// Common suggestion messages for consistent error handling.
pub mod suggestions {
    /// Suggestion when the lock file is inconsistent or stale.
    pub const RESTORE: &str = "help: Run `dotnet restore` to regenerate project.assets.json";

    /// Suggestion when a framework moniker cannot be parsed.
    pub const FRAMEWORK: &str =
        "help: Use a short moniker like `netcoreapp3.1` or `.NETCoreApp,Version=v3.1`";

    /// Suggestion when the document shape is not understood.
    pub const REPORT_FORMAT: &str =
        "help: Check that the file was produced by a supported NuGet version";

    /// Suggestion when a framework is not part of the lock file.
    pub const LIST_FRAMEWORKS: &str =
        "help: Run `dotdeps frameworks <assets>` to see available frameworks";

    /// Suggestion when no lock file is found.
    pub const NO_ASSETS: &str = "help: Pass the path to project.assets.json or a project directory";

    /// Suggestion when binaries fail to load.
    pub const LOAD_FAILED: &str = "help: Add search directories with `--probe <DIR>`";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Note,
    Warning,
    Error,
}

impl Severity {
    pub fn label(self) -> &'static str {
        match self {
            Severity::Note => "note",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }

    /// ANSI SGR parameters for the label.
    fn style(self) -> &'static str {
        match self {
            Severity::Note => "1;36",
            Severity::Warning => "1;33",
            Severity::Error => "1;31",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One message for the user, located in a lock file when known.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    severity: Severity,
    message: String,
    location: Option<PathBuf>,
    context: Vec<String>,
    suggestions: Vec<String>,
}

impl Diagnostic {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Diagnostic {
            severity,
            message: message.into(),
            location: None,
            context: Vec::new(),
            suggestions: Vec::new(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context.push(context.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    /// Attach the file the diagnostic refers to.
    pub fn with_location(mut self, path: impl Into<PathBuf>) -> Self {
        self.location = Some(path.into());
        self
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn location(&self) -> Option<&Path> {
        self.location.as_deref()
    }

    /// Render for a terminal. Only the severity label is colored.
    pub fn format(&self, color: bool) -> String {
        let label = if color {
            format!("\x1b[{}m{}\x1b[0m", self.severity.style(), self.severity)
        } else {
            self.severity.label().to_string()
        };

        let mut out = String::new();
        let _ = writeln!(out, "{}: {}", label, self.message);
        if let Some(path) = &self.location {
            let _ = writeln!(out, "  --> {}", path.display());
        }
        for line in &self.context {
            let _ = writeln!(out, "  → {}", line);
        }
        for (n, suggestion) in self.suggestions.iter().enumerate() {
            let _ = writeln!(out, "  {}. {}", n + 1, suggestion);
        }
        out
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format(false))
    }
}

/// Print a diagnostic to stderr.
pub fn emit(diagnostic: &Diagnostic, color: bool) {
    eprint!("{}", diagnostic.format(color));
}
