//! # Path Resolution Module
//!
//! Centralizza la logica di rimappatura dei path di destinazione.
//! Evita duplicazione tra walker e test.

use crate::error::MirrorError;
use std::path::{Path, PathBuf};

/// Utility per calcolare i path di destinazione in modo centralizzato
pub struct PathResolver;

impl PathResolver {
    /// Remap a path under the source root onto the destination root,
    /// preserving the relative hierarchy.
    pub fn resolve(
        input_path: &Path,
        source_root: &Path,
        dest_root: &Path,
    ) -> Result<PathBuf, MirrorError> {
        let relative = Self::relative_to(input_path, source_root)?;
        Ok(dest_root.join(relative))
    }

    /// The path of an entry relative to the source root.
    pub fn relative_to<'a>(
        input_path: &'a Path,
        source_root: &Path,
    ) -> Result<&'a Path, MirrorError> {
        input_path.strip_prefix(source_root).map_err(|_| {
            MirrorError::Traversal(format!(
                "entry {} is outside the source root {}",
                input_path.display(),
                source_root.display()
            ))
        })
    }
}
