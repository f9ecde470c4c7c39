//! # Item Processing Module
//!
//! Questo modulo elabora un singolo task di mirroring, dall'inizio alla fine.
//!
//! ## Responsabilità:
//! - Elabora un `Task` in base alla classificazione del file:
//!   - **Image**: decode, consulto della resize policy, resample Lanczos3
//!     solo se le dimensioni cambiano, ri-encode JPEG a qualità fissa,
//!     scrittura atomica della destinazione
//!   - **Opaque**: copia byte-per-byte verso la destinazione
//! - Riapplica i timestamp sorgente DOPO la scrittura del contenuto (best-effort)
//! - Converte OGNI errore in un `TaskOutcome::Failed`: questo è il punto di
//!   isolamento che garantisce che un file corrotto non interrompa il run
//!
//! ## Scrittura atomica:
//! L'output delle immagini passa da un file temporaneo nella directory di
//! destinazione, poi viene promosso al nome finale. Un worker interrotto non
//! lascia mai un file di destinazione troncato.
//!
//! ## Stato:
//! Il processor è costruito da una `Config` esplicita e immutabile, nessuno
//! stato globale di processo. I worker lo condividono in sola lettura.

use crate::config::Config;
use crate::error::MirrorError;
use crate::metadata::MetadataPreserver;
use crate::task::{FileKind, ItemAction, Task, TaskOutcome};
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::GenericImageView;
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::{debug, warn};

/// Processes one task at a time: transcodes JPEG-class images, copies
/// everything else. Stateless apart from the immutable quality setting,
/// shared read-only across workers.
#[derive(Debug, Clone)]
pub struct ItemProcessor {
    jpeg_quality: u8,
}

impl ItemProcessor {
    pub fn new(config: &Config) -> Self {
        Self {
            jpeg_quality: config.jpeg_quality,
        }
    }

    /// Process a single task. Never panics outward and never returns an
    /// error: every failure becomes a `Failed` outcome for this item only.
    pub fn process(&self, task: Task) -> TaskOutcome {
        let result = match task.source.kind {
            FileKind::Image => self.transcode_image(&task),
            FileKind::Opaque => self.copy_opaque(&task),
        };

        match result {
            Ok(action) => {
                // Content is fully written, timestamps go on last
                self.preserve_metadata(&task);
                debug!(
                    "[OK] {} -> {}",
                    task.source.path.display(),
                    task.dest_path.display()
                );
                TaskOutcome::succeeded(task.source.path, action)
            }
            Err(error) => {
                debug!("[ERROR] {}: {}", task.source.path.display(), error);
                TaskOutcome::failed(task.source.path, error)
            }
        }
    }

    /// Decode, fit to the bound, re-encode at the configured quality and
    /// write atomically.
    fn transcode_image(&self, task: &Task) -> Result<ItemAction, MirrorError> {
        let bytes = fs::read(&task.source.path)?;
        let img = image::load_from_memory(&bytes).map_err(MirrorError::Decode)?;

        let (width, height) = img.dimensions();
        let (target_width, target_height) = task.bound.fit(width, height);

        if target_width == 0 || target_height == 0 {
            return Err(MirrorError::Resample(format!(
                "degenerate aspect ratio: {}x{} fits {}x{} as {}x{}",
                width,
                height,
                task.bound.max_width,
                task.bound.max_height,
                target_width,
                target_height
            )));
        }

        let resampled = (target_width, target_height) != (width, height);
        let img = if resampled {
            img.resize_exact(target_width, target_height, FilterType::Lanczos3)
        } else {
            img
        };

        // JPEG has no alpha, normalize to RGB before encoding
        let rgb = img.to_rgb8();
        let mut encoded = Vec::new();
        JpegEncoder::new_with_quality(&mut encoded, self.jpeg_quality)
            .encode_image(&rgb)
            .map_err(MirrorError::Encode)?;

        Self::write_atomic(&task.dest_path, &encoded)?;

        Ok(ItemAction::Transcoded { resampled })
    }

    /// Copy an opaque file verbatim.
    fn copy_opaque(&self, task: &Task) -> Result<ItemAction, MirrorError> {
        fs::copy(&task.source.path, &task.dest_path).map_err(MirrorError::Copy)?;
        Ok(ItemAction::Copied)
    }

    /// Write bytes through a temp file in the destination directory and
    /// promote it to the final name.
    fn write_atomic(dest: &Path, bytes: &[u8]) -> Result<(), MirrorError> {
        let dir = dest.parent().ok_or_else(|| {
            MirrorError::Write(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "destination path has no parent directory",
            ))
        })?;

        let mut temp = NamedTempFile::new_in(dir).map_err(MirrorError::Write)?;
        temp.write_all(bytes).map_err(MirrorError::Write)?;
        temp.persist(dest).map_err(|e| MirrorError::Write(e.error))?;
        Ok(())
    }

    /// Best-effort timestamp application. Failure is logged, the item stays
    /// successful.
    fn preserve_metadata(&self, task: &Task) {
        let timestamps = match task.source.timestamps {
            Some(ts) => Some(ts),
            // Discovery could not stat the file, retry here before giving up
            None => match MetadataPreserver::read_timestamps(&task.source.path) {
                Ok(ts) => Some(ts),
                Err(e) => {
                    warn!("{}", e);
                    None
                }
            },
        };

        if let Some(ts) = timestamps {
            if let Err(e) = MetadataPreserver::apply_timestamps(&task.dest_path, &ts) {
                warn!("{}", e);
            }
        }
    }
}
