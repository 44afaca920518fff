//! Configuration file support for dotdeps.
//!
//! dotdeps supports two configuration file locations:
//! - Global: `~/.dotdeps/config.toml` - User-wide defaults
//! - Project: `.dotdeps/config.toml` - Project-specific overrides
//!
//! Project config takes precedence over global config.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::resolver::FallbackPolicy;

/// Name of the per-user and per-project configuration directory.
pub const CONFIG_DIR_NAME: &str = ".dotdeps";

/// Effective dotdeps configuration, after layering the config files over
/// the defaults.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Binary loading settings
    pub loader: LoaderConfig,

    /// Graph resolution settings
    pub resolve: ResolveConfig,
}

/// Settings for the file-system loader context.
#[derive(Debug, Clone, Default)]
pub struct LoaderConfig {
    /// Directories searched for `<name>.dll` after the dependency manifest
    pub probe_dirs: Vec<PathBuf>,

    /// Search probe directories recursively
    pub recursive: bool,

    /// Main binary whose `<name>.deps.json` drives name resolution
    pub main_binary: Option<PathBuf>,

    /// Package roots consulted in addition to the lock file's own
    pub package_folders: Vec<PathBuf>,
}

/// Settings for dependency graph resolution.
#[derive(Debug, Clone)]
pub struct ResolveConfig {
    /// Retry with the first `imports` framework when a target section is empty
    pub fallback: bool,

    /// Load the references declared by loaded binaries
    pub transitive: bool,
}

impl Default for ResolveConfig {
    fn default() -> Self {
        ResolveConfig {
            fallback: false,
            transitive: true,
        }
    }
}

/// Contents of one config file. Keys the file leaves out are `None` and do
/// not override lower layers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    pub loader: LoaderSection,
    pub resolve: ResolveSection,
}

/// `[loader]` table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderSection {
    pub probe_dirs: Option<Vec<PathBuf>>,
    pub recursive: Option<bool>,
    pub main_binary: Option<PathBuf>,
    pub package_folders: Option<Vec<PathBuf>>,
}

/// `[resolve]` table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolveSection {
    pub fallback: Option<bool>,
    pub transitive: Option<bool>,
}

impl ConfigFile {
    /// Load a config file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load a config file, treating a missing or unreadable file as empty.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }
}

impl Config {
    /// Apply a config file on top of this configuration. Every key the file
    /// sets wins.
    pub fn merge(&mut self, file: ConfigFile) {
        let ConfigFile { loader, resolve } = file;

        if let Some(probe_dirs) = loader.probe_dirs {
            self.loader.probe_dirs = probe_dirs;
        }
        if let Some(recursive) = loader.recursive {
            self.loader.recursive = recursive;
        }
        if let Some(main_binary) = loader.main_binary {
            self.loader.main_binary = Some(main_binary);
        }
        if let Some(package_folders) = loader.package_folders {
            self.loader.package_folders = package_folders;
        }

        if let Some(fallback) = resolve.fallback {
            self.resolve.fallback = fallback;
        }
        if let Some(transitive) = resolve.transitive {
            self.resolve.transitive = transitive;
        }
    }

    /// Fallback policy selected by `[resolve] fallback`.
    pub fn fallback_policy(&self) -> FallbackPolicy {
        if self.resolve.fallback {
            FallbackPolicy::FirstImport
        } else {
            FallbackPolicy::Disabled
        }
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.dotdeps/config.toml)
/// 2. Global config (~/.dotdeps/config.toml)
/// 3. Defaults
pub fn load_config(global_path: &Path, project_path: &Path) -> Config {
    let mut config = Config::default();

    if global_path.exists() {
        config.merge(ConfigFile::load_or_default(global_path));
    }

    if project_path.exists() {
        config.merge(ConfigFile::load_or_default(project_path));
    }

    config
}

/// Load the merged configuration that applies to `project_root`.
pub fn load_for_project(project_root: &Path) -> Config {
    let project = project_config_path(project_root);
    match global_config_path() {
        Some(global) => load_config(&global, &project),
        None => load_config(Path::new(""), &project),
    }
}

/// Get the global dotdeps config directory (~/.dotdeps).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(CONFIG_DIR_NAME))
}

/// Get the global config path (~/.dotdeps/config.toml).
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("config.toml"))
}

/// Get the project config path (.dotdeps/config.toml).
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(CONFIG_DIR_NAME).join("config.toml")
}
