//! Per-reference load failures.

use std::fmt;
use std::path::PathBuf;

use bitflags::bitflags;
use thiserror::Error;

use crate::core::errors::ParseError;

/// One of the two ways a reference can be loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStrategy {
    FilePath,
    AssemblyName,
}

impl LoadStrategy {
    /// The failure flag recorded when this strategy fails.
    pub fn flag(self) -> FailureFlags {
        match self {
            LoadStrategy::FilePath => FailureFlags::FILE_SYSTEM,
            LoadStrategy::AssemblyName => FailureFlags::ASSEMBLY_NAME,
        }
    }
}

impl fmt::Display for LoadStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadStrategy::FilePath => write!(f, "file path"),
            LoadStrategy::AssemblyName => write!(f, "assembly name"),
        }
    }
}

bitflags! {
    /// Strategies that failed for one reference.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct FailureFlags: u8 {
        /// Loading from the path hint failed
        const FILE_SYSTEM = 0x01;
        /// Loading from the assembly name hint failed
        const ASSEMBLY_NAME = 0x02;
    }
}

/// Why one load attempt failed.
///
/// Load errors never abort a resolution run; they are stored on the
/// reference that produced them.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("could not find assembly `{name}` ({} locations searched)", .searched.len())]
    NotFound { name: String, searched: Vec<PathBuf> },

    #[error("failed to read `{}`", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("`{}` is not a loadable image: {reason}", .path.display())]
    BadImage { path: PathBuf, reason: String },

    #[error("invalid dependency manifest `{}`", .path.display())]
    Manifest {
        path: PathBuf,
        #[source]
        source: ParseError,
    },

    #[error("no {strategy} hint to load from")]
    NoHint { strategy: LoadStrategy },
}
