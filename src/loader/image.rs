//! Assembly identity and references read from image metadata.
//!
//! A managed image carries its own identity in the `Assembly` table and the
//! assemblies it was compiled against in the `AssemblyRef` table. The host
//! loader context trusts these over file names and manifests.

use std::path::Path;

use dotscope::CilObject;

use crate::core::version::SemanticVersion;
use crate::loader::errors::LoadError;
use crate::loader::name::AssemblyName;

/// What a loader needs to know about one image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageMetadata {
    name: AssemblyName,
    references: Vec<AssemblyName>,
}

impl ImageMetadata {
    pub fn new(name: AssemblyName, references: Vec<AssemblyName>) -> Self {
        ImageMetadata { name, references }
    }

    /// Identity from the image's assembly manifest.
    pub fn name(&self) -> &AssemblyName {
        &self.name
    }

    /// Assemblies the image references, in table order.
    pub fn references(&self) -> &[AssemblyName] {
        &self.references
    }

    pub fn into_parts(self) -> (AssemblyName, Vec<AssemblyName>) {
        (self.name, self.references)
    }
}

/// Reads [`ImageMetadata`] from a file.
pub trait ImageReader {
    fn read(&self, path: &Path) -> Result<ImageMetadata, LoadError>;
}

/// Reads ECMA-335 metadata from PE images.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetadataReader;

impl ImageReader for MetadataReader {
    fn read(&self, path: &Path) -> Result<ImageMetadata, LoadError> {
        let bad_image = |reason: String| LoadError::BadImage {
            path: path.to_path_buf(),
            reason,
        };

        let file = std::fs::metadata(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        if !file.is_file() {
            return Err(bad_image("not a regular file".to_string()));
        }

        let object = CilObject::from_file(path).map_err(|e| bad_image(e.to_string()))?;
        let assembly = object
            .assembly()
            .ok_or_else(|| bad_image("image has no assembly manifest".to_string()))?;

        let name = identity(
            &assembly.name,
            [
                assembly.major_version,
                assembly.minor_version,
                assembly.build_number,
                assembly.revision_number,
            ],
            assembly.culture.as_deref(),
        );

        let references = object
            .refs_assembly()
            .iter()
            .map(|entry| {
                let reference = entry.value();
                identity(
                    &reference.name,
                    [
                        reference.major_version,
                        reference.minor_version,
                        reference.build_number,
                        reference.revision_number,
                    ],
                    reference.culture.as_deref(),
                )
            })
            .collect::<Vec<_>>();

        tracing::debug!(
            "Read {} from {} ({} references)",
            name.display_name(),
            path.display(),
            references.len()
        );
        Ok(ImageMetadata::new(name, references))
    }
}

/// Assembly name from metadata columns. Assembly versions always have four
/// parts.
fn identity(name: &str, version: [u32; 4], culture: Option<&str>) -> AssemblyName {
    let [major, minor, build, revision] = version.map(u64::from);
    AssemblyName::new(name)
        .with_version(SemanticVersion::new(major, minor, build).with_revision(revision))
        .with_culture(culture.unwrap_or_default())
}
