//! Command implementations

pub mod deps;
pub mod frameworks;
pub mod load;

use std::path::Path;

use anyhow::{Context, Result};

use dotdeps::util::config::{self, Config};
use dotdeps::TargetFrameworkMoniker;

/// Parse a framework given on the command line, in either style.
pub fn parse_framework(text: &str) -> Result<TargetFrameworkMoniker> {
    TargetFrameworkMoniker::parse_any(text)
        .with_context(|| format!("invalid framework `{}`", text))
}

/// Configuration applying to the project that owns `assets`.
pub fn config_for(assets: &Path) -> Result<Config> {
    let assets = dotdeps::ops::find_assets_file(assets)?;
    Ok(config::load_for_project(&dotdeps::ops::project_dir_for(&assets)))
}
