//! # Metadata Preservation Module
//!
//! Questo modulo legge e riapplica i timestamp dei file.
//!
//! ## Responsabilità:
//! - Legge creation/modification/access time di un file sorgente
//! - Riapplica i timestamp al file di destinazione DOPO che il contenuto
//!   è stato scritto completamente
//! - Non fa mai fallire un item: gli errori di metadata vengono loggati
//!   dal chiamante e basta
//!
//! ## Limiti di piattaforma:
//! Il creation time viene letto dove il filesystem lo espone, ma su Linux
//! non esiste una syscall per impostarlo: la preservazione garantita copre
//! modification e access time, il creation time resta best-effort.

use crate::error::MirrorError;
use std::fs::{self, FileTimes};
use std::path::Path;
use std::time::SystemTime;

/// Timestamps captured from a source file.
#[derive(Debug, Clone, Copy)]
pub struct FileTimestamps {
    /// Creation time, where the platform reports one
    pub created: Option<SystemTime>,
    pub modified: SystemTime,
    pub accessed: Option<SystemTime>,
}

/// Reads and applies per-file timestamps.
pub struct MetadataPreserver;

impl MetadataPreserver {
    /// Read the timestamps of a file.
    pub fn read_timestamps(path: &Path) -> Result<FileTimestamps, MirrorError> {
        let metadata = fs::metadata(path)
            .map_err(|e| MirrorError::Metadata(format!("stat {}: {}", path.display(), e)))?;

        let modified = metadata
            .modified()
            .map_err(|e| MirrorError::Metadata(format!("mtime {}: {}", path.display(), e)))?;

        Ok(FileTimestamps {
            created: metadata.created().ok(),
            modified,
            accessed: metadata.accessed().ok(),
        })
    }

    /// Apply timestamps to a fully written destination file.
    ///
    /// Must be called only after the content write completed, so a failed
    /// write can never leave fresh timestamps on a stale file.
    pub fn apply_timestamps(path: &Path, timestamps: &FileTimestamps) -> Result<(), MirrorError> {
        let mut times = FileTimes::new().set_modified(timestamps.modified);
        if let Some(accessed) = timestamps.accessed {
            times = times.set_accessed(accessed);
        }

        let file = fs::File::options()
            .write(true)
            .open(path)
            .map_err(|e| MirrorError::Metadata(format!("open {}: {}", path.display(), e)))?;
        file.set_times(times)
            .map_err(|e| MirrorError::Metadata(format!("set times {}: {}", path.display(), e)))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tempfile::TempDir;

    #[test]
    fn test_read_and_apply_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("source.txt");
        let dest = temp_dir.path().join("dest.txt");
        fs::write(&source, b"content").unwrap();
        fs::write(&dest, b"content").unwrap();

        // Back-date the source so the two files start out different
        let old = SystemTime::now() - Duration::from_secs(86_400);
        let file = fs::File::options().write(true).open(&source).unwrap();
        file.set_times(FileTimes::new().set_modified(old)).unwrap();

        let stamps = MetadataPreserver::read_timestamps(&source).unwrap();
        MetadataPreserver::apply_timestamps(&dest, &stamps).unwrap();

        let dest_modified = fs::metadata(&dest).unwrap().modified().unwrap();
        let drift = dest_modified
            .duration_since(stamps.modified)
            .unwrap_or_else(|e| e.duration());
        // Allow for filesystem timestamp granularity
        assert!(drift < Duration::from_secs(2), "drift was {:?}", drift);
    }

    #[test]
    fn test_read_missing_file_is_metadata_error() {
        let err = MetadataPreserver::read_timestamps(Path::new("/no/such/file")).unwrap_err();
        assert!(matches!(err, MirrorError::Metadata(_)));
    }

    #[test]
    fn test_apply_to_missing_file_is_metadata_error() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("source.txt");
        fs::write(&source, b"content").unwrap();
        let stamps = MetadataPreserver::read_timestamps(&source).unwrap();

        let err =
            MetadataPreserver::apply_timestamps(temp_dir.path().join("gone.txt").as_path(), &stamps)
                .unwrap_err();
        assert!(matches!(err, MirrorError::Metadata(_)));
    }
}
