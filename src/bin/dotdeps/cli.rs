//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// dotdeps - Dependency closures and binary loading for .NET projects
#[derive(Parser)]
#[command(name = "dotdeps")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the target frameworks of a lock file
    Frameworks(FrameworksArgs),

    /// Print the validated dependency closure of a framework
    Deps(DepsArgs),

    /// Load the binaries a framework compiles against
    Load(LoadArgs),
}

#[derive(Args)]
pub struct FrameworksArgs {
    /// Path to project.assets.json, or a project directory
    pub assets: PathBuf,
}

#[derive(Args)]
pub struct DepsArgs {
    /// Path to project.assets.json, or a project directory
    pub assets: PathBuf,

    /// Target framework (e.g. netcoreapp3.1 or .NETCoreApp,Version=v3.1)
    #[arg(short, long)]
    pub framework: String,

    /// Retry with the first fallback framework when no assets were resolved
    #[arg(long)]
    pub fallback: bool,

    /// Only print direct dependencies
    #[arg(long)]
    pub direct: bool,
}

#[derive(Args)]
pub struct LoadArgs {
    /// Path to project.assets.json, or a project directory
    pub assets: PathBuf,

    /// Target framework (e.g. netcoreapp3.1 or .NETCoreApp,Version=v3.1)
    #[arg(short, long)]
    pub framework: String,

    /// Directory searched for `<name>.dll` (repeatable)
    #[arg(long = "probe", value_name = "DIR")]
    pub probe: Vec<PathBuf>,

    /// Search probe directories recursively
    #[arg(long)]
    pub recursive: bool,

    /// Main binary whose .deps.json drives name resolution
    #[arg(long = "main", value_name = "PATH", env = "DOTDEPS_MAIN_BINARY")]
    pub main: Option<PathBuf>,

    /// Extra assembly name to load (repeatable)
    #[arg(long = "name", value_name = "NAME")]
    pub names: Vec<String>,

    /// Extra binary path to load (repeatable)
    #[arg(long = "path", value_name = "PATH")]
    pub paths: Vec<PathBuf>,

    /// Retry with the first fallback framework when no assets were resolved
    #[arg(long)]
    pub fallback: bool,

    /// Skip loading the references declared by loaded binaries
    #[arg(long)]
    pub no_transitive: bool,
}
