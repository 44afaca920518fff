//! Compilation reference planning and loading for one framework.
//!
//! The dependency closure of a framework becomes one compilation reference
//! per compile asset. Package assets get a path hint under the first package
//! folder and a name hint from the asset's file stem; project references get
//! a name hint only. Caller-supplied hints are appended before the run.

use std::collections::HashSet;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::assets::ProjectAssetsDocument;
use crate::core::framework::TargetFrameworkMoniker;
use crate::core::version::VersionedText;
use crate::loader::{
    AssemblyName, CompilationReference, CompilationReferenceSet, ImageReader, LoadResult,
    LoadedBinary, LoaderContext, ProbingLoaderContext, ResolutionSummary,
};
use crate::resolver::{DependencyGraph, FallbackPolicy};
use crate::util::config::LoaderConfig;

/// What to compile against.
#[derive(Debug, Clone)]
pub struct CompilationRequest {
    pub framework: TargetFrameworkMoniker,
    pub fallback: FallbackPolicy,
    /// Run the transitive discovery pass
    pub transitive: bool,
    /// Extra assembly name hints
    pub names: Vec<AssemblyName>,
    /// Extra file path hints
    pub paths: Vec<PathBuf>,
}

impl CompilationRequest {
    pub fn new(framework: TargetFrameworkMoniker) -> Self {
        CompilationRequest {
            framework,
            fallback: FallbackPolicy::Disabled,
            transitive: true,
            names: Vec::new(),
            paths: Vec::new(),
        }
    }
}

/// Result of one compilation resolution run.
#[derive(Debug)]
pub struct CompilationOutcome {
    /// Framework whose target section was used
    pub framework: TargetFrameworkMoniker,
    pub used_fallback: bool,
    /// Libraries of the dependency closure
    pub libraries: Vec<VersionedText>,
    pub binaries: Vec<LoadedBinary>,
    /// Status of every explicitly requested reference
    pub results: Vec<LoadResult>,
    pub summary: ResolutionSummary,
}

/// Compilation references for the dependency closure of `graph`.
pub fn plan_references(
    doc: &ProjectAssetsDocument,
    graph: &DependencyGraph<'_>,
) -> Vec<CompilationReference> {
    let mut references = Vec::new();

    for resolved in graph.closure() {
        let library = resolved.library;
        if library.kind().is_project() {
            references.push(CompilationReference::from_name(AssemblyName::new(
                library.name(),
            )));
            continue;
        }

        let directory = doc.package_directory(library);
        for asset in resolved.info.compile_assemblies() {
            let relative = PathBuf::from(asset);
            let name = AssemblyName::from_path(&relative);
            let path = directory.as_ref().map(|dir| dir.join(&relative));
            if name.is_none() && path.is_none() {
                continue;
            }
            references.push(CompilationReference::new(name, path));
        }
    }

    tracing::debug!("Planned {} compilation references", references.len());
    references
}

/// Resolve the framework's dependency graph and load its binaries.
pub fn resolve_compilation<C: LoaderContext>(
    doc: &ProjectAssetsDocument,
    request: &CompilationRequest,
    context: C,
) -> Result<CompilationOutcome> {
    let graph = DependencyGraph::build(doc, &request.framework, request.fallback)
        .with_context(|| format!("failed to resolve dependencies for `{}`", request.framework))?;

    let mut set = CompilationReferenceSet::new(context).with_transitive(request.transitive);
    for reference in plan_references(doc, &graph) {
        set.add(reference);
    }
    for name in &request.names {
        set.add_name(name.clone());
    }
    for path in &request.paths {
        set.add_path(path.clone());
    }

    let summary = set.resolve();

    let mut seen = HashSet::new();
    let required: Vec<String> = set
        .references()
        .iter()
        .filter(|r| !r.is_implicit())
        .filter_map(CompilationReference::report_name)
        .filter(|name| seen.insert(name.to_ascii_lowercase()))
        .collect();

    let resolution = graph.resolution();
    Ok(CompilationOutcome {
        framework: resolution.effective().clone(),
        used_fallback: resolution.used_fallback(),
        libraries: graph
            .closure()
            .iter()
            .map(|r| r.library.key().clone())
            .collect(),
        binaries: set.resolved_binaries().into_iter().cloned().collect(),
        results: set.load_results(&required),
        summary,
    })
}

/// A file-system loader context for `doc`, configured by `config`, that
/// reads images with `reader`.
///
/// Package folders from the configuration are searched after the lock
/// file's own.
pub fn probing_context<R: ImageReader>(
    doc: &ProjectAssetsDocument,
    config: &LoaderConfig,
    reader: R,
) -> Result<ProbingLoaderContext<R>> {
    let mut context = ProbingLoaderContext::with_reader(reader).recursive(config.recursive);

    for folder in doc.package_folders().iter().chain(&config.package_folders) {
        context = context.with_package_folder(folder);
    }
    for dir in &config.probe_dirs {
        context = context.with_probe_dir(dir);
    }
    if let Some(ref main) = config.main_binary {
        context = context
            .with_main_binary(main)
            .with_context(|| format!("failed to use main binary: {}", main.display()))?;
    }

    Ok(context)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::LoadStatus;
    use crate::test_support::{fixtures, FakeImageReader, MockLoaderContext};

    const JSON_DLL: &str =
        "/home/dev/.nuget/packages/newtonsoft.json/12.0.3/lib/netstandard2.0/Newtonsoft.Json.dll";

    fn doc() -> ProjectAssetsDocument {
        ProjectAssetsDocument::from_json_str(fixtures::TWO_FRAMEWORK_ASSETS).unwrap()
    }

    fn tfm(s: &str) -> TargetFrameworkMoniker {
        TargetFrameworkMoniker::parse_any(s).unwrap()
    }

    #[test]
    fn test_plan_uses_package_folder_and_skips_placeholders() {
        let doc = doc();

        let core = DependencyGraph::build(&doc, &tfm("netcoreapp3.1"), FallbackPolicy::Disabled)
            .unwrap();
        let planned = plan_references(&doc, &core);
        assert_eq!(planned.len(), 2);
        let json = planned
            .iter()
            .find(|r| r.matches("Newtonsoft.Json"))
            .unwrap();
        assert_eq!(json.path(), Some(std::path::Path::new(JSON_DLL)));
        let lib = planned.iter().find(|r| r.matches("Lib")).unwrap();
        assert!(lib.path().is_none());

        // System.Buffers only carries a `_._` compile placeholder
        let framework =
            DependencyGraph::build(&doc, &tfm("net461"), FallbackPolicy::Disabled).unwrap();
        let planned = plan_references(&doc, &framework);
        assert_eq!(planned.len(), 1);
        assert!(planned[0].matches("System.ValueTuple"));
    }

    #[test]
    fn test_resolve_compilation_reports_every_request() {
        let doc = doc();
        let mut ctx = MockLoaderContext::new();
        ctx.add_binary("Newtonsoft.Json", JSON_DLL, &["System.Runtime"]);
        ctx.add_binary("System.Runtime", "/shared/System.Runtime.dll", &[]);

        let mut request = CompilationRequest::new(tfm("netcoreapp3.1"));
        request.names.push(AssemblyName::new("Extra"));

        let outcome = resolve_compilation(&doc, &request, ctx).unwrap();

        assert!(!outcome.used_fallback);
        assert_eq!(outcome.libraries.len(), 2);
        let binaries: Vec<_> = outcome.binaries.iter().map(|b| b.name().name()).collect();
        assert_eq!(binaries, ["Newtonsoft.Json", "System.Runtime"]);

        let status = |name: &str| {
            outcome
                .results
                .iter()
                .find(|r| r.name == name)
                .map(|r| r.status)
        };
        assert_eq!(status("Newtonsoft.Json"), Some(LoadStatus::Loaded));
        assert_eq!(status("Lib"), Some(LoadStatus::FailedToLoad));
        assert_eq!(status("Extra"), Some(LoadStatus::FailedToLoad));
        assert_eq!(outcome.summary.discovered, 1);
    }

    #[test]
    fn test_graph_errors_abort_compilation() {
        let doc = doc();
        let request = CompilationRequest::new(tfm("netstandard2.0"));
        let err = resolve_compilation(&doc, &request, MockLoaderContext::new()).unwrap_err();
        assert!(err.to_string().contains("failed to resolve dependencies"));
        assert!(err.downcast_ref::<crate::resolver::GraphError>().is_some());
    }

    #[test]
    fn test_probing_context_from_config() {
        let doc = doc();
        let config = LoaderConfig {
            probe_dirs: vec![PathBuf::from("/opt/refs")],
            recursive: true,
            main_binary: None,
            package_folders: vec![PathBuf::from("/extra/packages")],
        };
        let context = probing_context(&doc, &config, FakeImageReader).unwrap();
        assert!(context.main_binary().is_none());
        assert!(context.manifest().is_none());
    }
}
