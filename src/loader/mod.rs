//! Compilation reference loading.
//!
//! A [`CompilationReferenceSet`] takes the binaries a compilation needs,
//! each identified by an assembly name hint, a file path hint or both, and
//! loads them through a caller-owned [`LoaderContext`]. After the explicit
//! references settle, one discovery pass loads the assemblies they declare
//! as references. Failures are recorded per reference and never abort the
//! run.

pub mod context;
pub mod errors;
pub mod image;
pub mod manifest;
pub mod name;
pub mod probing;
pub mod reference;
pub mod set;

pub use context::{LoadedBinary, LoaderContext};
pub use errors::{FailureFlags, LoadError, LoadStrategy};
pub use image::{ImageMetadata, ImageReader, MetadataReader};
pub use manifest::{DepsManifest, ManifestLibrary};
pub use name::AssemblyName;
pub use probing::ProbingLoaderContext;
pub use reference::{CompilationReference, LoadState};
pub use set::{CompilationReferenceSet, LoadResult, LoadStatus, ResolutionSummary};
