//! `dotdeps deps` command

use anyhow::{Context, Result};

use super::parse_framework;
use crate::cli::DepsArgs;
use dotdeps::ops::{find_assets_file, load_assets, LockFileContext};
use dotdeps::resolver::{DependencyGraph, FallbackPolicy};

pub fn execute(args: DepsArgs) -> Result<()> {
    let path = find_assets_file(&args.assets)?;
    let doc = load_assets(&path)?;
    let framework = parse_framework(&args.framework)?;

    let policy = if args.fallback {
        FallbackPolicy::FirstImport
    } else {
        FallbackPolicy::Disabled
    };
    let graph = DependencyGraph::build(&doc, &framework, policy)
        .with_context(|| LockFileContext::new("check", &path))?;

    let resolution = graph.resolution();
    if resolution.used_fallback() {
        println!(
            "{} (using fallback {})",
            resolution.requested(),
            resolution.effective()
        );
    } else {
        println!("{}", resolution.effective());
    }

    let libraries = if args.direct {
        graph.direct()
    } else {
        graph.closure()
    };

    for resolved in libraries {
        let library = resolved.library;
        println!(
            "  {} {} ({})",
            library.name(),
            library.version(),
            library.kind()
        );
        for dep in graph.dependencies_of(library.key()) {
            println!("      -> {}", dep.key());
        }
    }

    Ok(())
}
