//! One resolution run over a set of compilation references.

use std::collections::HashSet;
use std::fmt;
use std::path::PathBuf;

use crate::loader::context::{LoadedBinary, LoaderContext};
use crate::loader::name::AssemblyName;
use crate::loader::reference::CompilationReference;

/// Outcome of one required name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
    /// Some reference with the name succeeded.
    Loaded,
    /// References with the name were attempted and all failed.
    FailedToLoad,
    /// No reference with the name was ever attempted.
    NotLoaded,
}

impl fmt::Display for LoadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadStatus::Loaded => write!(f, "loaded"),
            LoadStatus::FailedToLoad => write!(f, "failed to load"),
            LoadStatus::NotLoaded => write!(f, "not loaded"),
        }
    }
}

/// Status of one required name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadResult {
    pub name: String,
    pub status: LoadStatus,
}

/// Counts from one call to [`CompilationReferenceSet::resolve`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolutionSummary {
    pub explicit: usize,
    pub discovered: usize,
    pub succeeded: usize,
    pub failed: usize,
}

/// The references of one resolution run, with the loader context that
/// serves them.
///
/// The set owns its context, so no loader state outlives the run or leaks
/// into another one.
#[derive(Debug)]
pub struct CompilationReferenceSet<C> {
    context: C,
    references: Vec<CompilationReference>,
    transitive: bool,
}

impl<C: LoaderContext> CompilationReferenceSet<C> {
    pub fn new(context: C) -> Self {
        CompilationReferenceSet {
            context,
            references: Vec::new(),
            transitive: true,
        }
    }

    /// Enable or disable the transitive discovery pass.
    pub fn with_transitive(mut self, transitive: bool) -> Self {
        self.transitive = transitive;
        self
    }

    pub fn add(&mut self, reference: CompilationReference) {
        self.references.push(reference);
    }

    pub fn add_name(&mut self, name: AssemblyName) {
        self.add(CompilationReference::from_name(name));
    }

    pub fn add_path(&mut self, path: impl Into<PathBuf>) {
        self.add(CompilationReference::from_path(path));
    }

    pub fn references(&self) -> &[CompilationReference] {
        &self.references
    }

    pub fn context(&self) -> &C {
        &self.context
    }

    pub fn into_context(self) -> C {
        self.context
    }

    pub fn len(&self) -> usize {
        self.references.len()
    }

    pub fn is_empty(&self) -> bool {
        self.references.is_empty()
    }

    /// Load every explicit reference, then run one discovery pass.
    ///
    /// Discovery takes the union of names declared by the succeeded
    /// explicit references, drops the names already attempted in this run,
    /// and loads each remaining name as an implicit reference. Discovered
    /// references are not themselves expanded.
    pub fn resolve(&mut self) -> ResolutionSummary {
        let mut summary = ResolutionSummary::default();

        for reference in self.references.iter_mut().filter(|r| !r.is_implicit()) {
            summary.explicit += 1;
            if !reference.state().is_terminal() {
                reference.load(&mut self.context);
            }
        }

        if self.transitive {
            for name in self.undiscovered_names() {
                let mut reference = CompilationReference::implicit(name);
                if !reference.load(&mut self.context) {
                    tracing::warn!(
                        "Omitting transitive reference {}: not resolvable",
                        reference.report_name().unwrap_or_default()
                    );
                }
                self.references.push(reference);
            }
        }

        for reference in &self.references {
            if reference.is_implicit() {
                summary.discovered += 1;
            }
            if reference.is_succeeded() {
                summary.succeeded += 1;
            } else if reference.is_failed() {
                summary.failed += 1;
            }
        }

        tracing::info!(
            "Resolved {} references ({} discovered): {} loaded, {} failed",
            summary.explicit + summary.discovered,
            summary.discovered,
            summary.succeeded,
            summary.failed
        );

        summary
    }

    fn undiscovered_names(&self) -> Vec<AssemblyName> {
        let mut attempted: HashSet<String> = self
            .references
            .iter()
            .filter_map(|r| r.report_name())
            .map(|n| n.to_ascii_lowercase())
            .collect();

        let mut names = Vec::new();
        for reference in &self.references {
            if reference.is_implicit() || !reference.is_succeeded() {
                continue;
            }
            for name in reference.references() {
                if attempted.insert(name.key()) {
                    tracing::debug!("Discovered {} via {:?}", name, reference.report_name());
                    names.push(name.clone());
                }
            }
        }
        names
    }

    /// Binaries of every succeeded reference, deduplicated by assembly name.
    pub fn resolved_binaries(&self) -> Vec<&LoadedBinary> {
        let mut seen = HashSet::new();
        self.references
            .iter()
            .filter_map(CompilationReference::binary)
            .filter(|binary| seen.insert(binary.name().key()))
            .collect()
    }

    /// Status of each required name.
    pub fn load_results<S: AsRef<str>>(&self, required: &[S]) -> Vec<LoadResult> {
        required
            .iter()
            .map(|name| {
                let name = name.as_ref();
                let mut matching = self.references.iter().filter(|r| r.matches(name));
                let status = if matching.clone().any(CompilationReference::is_succeeded) {
                    LoadStatus::Loaded
                } else if matching.any(CompilationReference::is_failed) {
                    LoadStatus::FailedToLoad
                } else {
                    LoadStatus::NotLoaded
                };
                LoadResult {
                    name: name.to_string(),
                    status,
                }
            })
            .collect()
    }

    /// Report names of every attempted reference, in insertion order.
    pub fn attempted_names(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.references
            .iter()
            .filter(|r| r.state().is_terminal())
            .filter_map(CompilationReference::report_name)
            .filter(|n| seen.insert(n.to_ascii_lowercase()))
            .collect()
    }
}
