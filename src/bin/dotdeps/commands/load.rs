//! `dotdeps load` command

use anyhow::{bail, Context, Result};

use super::{config_for, parse_framework};
use crate::cli::LoadArgs;
use dotdeps::loader::{AssemblyName, LoadStatus, MetadataReader};
use dotdeps::ops::{
    find_assets_file, load_assets, probing_context, resolve_compilation, CompilationRequest,
    LockFileContext,
};
use dotdeps::resolver::FallbackPolicy;
use dotdeps::util::diagnostic::suggestions;

pub fn execute(args: LoadArgs) -> Result<()> {
    let path = find_assets_file(&args.assets)?;
    let doc = load_assets(&path)?;
    let framework = parse_framework(&args.framework)?;

    // Command line values extend or override the configuration files
    let mut config = config_for(&path)?;
    config.loader.probe_dirs.extend(args.probe);
    if args.recursive {
        config.loader.recursive = true;
    }
    if args.main.is_some() {
        config.loader.main_binary = args.main;
    }
    if args.fallback {
        config.resolve.fallback = true;
    }
    if args.no_transitive {
        config.resolve.transitive = false;
    }

    let mut request = CompilationRequest::new(framework);
    request.fallback = config.fallback_policy();
    request.transitive = config.resolve.transitive;
    request.names = args
        .names
        .iter()
        .map(|n| AssemblyName::parse(n))
        .collect::<Result<_, _>>()?;
    request.paths = args.paths;

    let context = probing_context(&doc, &config.loader, MetadataReader)?;
    let outcome = resolve_compilation(&doc, &request, context)
        .with_context(|| LockFileContext::new("check", &path))?;

    if outcome.used_fallback && request.fallback == FallbackPolicy::FirstImport {
        println!("using fallback framework {}", outcome.framework);
    }

    println!("Binaries:");
    for binary in &outcome.binaries {
        println!("  {} {}", binary.name(), binary.location().display());
    }

    println!("Results:");
    for result in &outcome.results {
        println!("  {}: {}", result.name, result.status);
    }

    let failed = outcome
        .results
        .iter()
        .filter(|r| r.status == LoadStatus::FailedToLoad)
        .count();
    if failed > 0 {
        bail!(
            "{} of {} references failed to load\n{}",
            failed,
            outcome.results.len(),
            suggestions::LOAD_FAILED
        );
    }

    Ok(())
}
