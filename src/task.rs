//! # Task and Outcome Model Module
//!
//! Questo modulo definisce il modello dati del run di mirroring.
//!
//! ## Responsabilità:
//! - `SourceFile`: un file scoperto dal walker, immutabile dopo la discovery
//! - `Task`: accoppiamento file sorgente + path di destinazione + bound
//! - `TaskOutcome`: esito per-task, prodotto da un worker e consumato dal tally
//! - `RunTally`: contatori aggregati del run, aggiornati in un solo punto
//!
//! ## Invarianti:
//! - Ogni `SourceFile` scoperto produce esattamente un `Task` ed esattamente
//!   un `TaskOutcome` (1:1:1)
//! - Un `Task` viene consumato una sola volta da un solo worker, mai condiviso
//! - `TaskOutcome` non viene mai mutato dopo la creazione

use crate::error::MirrorError;
use crate::metadata::FileTimestamps;
use crate::resize::ResizeBound;
use std::path::{Path, PathBuf};

/// Classification of a discovered file, derived purely from its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// JPEG-class image (`.jpg` / `.jpeg`, case-insensitive): transcoded
    Image,
    /// Anything else: copied byte-for-byte
    Opaque,
}

/// A file discovered under the source root. Immutable once discovered.
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// Absolute path of the source file
    pub path: PathBuf,
    /// Path relative to the source root
    pub relative_path: PathBuf,
    /// Size in bytes at discovery time
    pub size: u64,
    /// Timestamps read at discovery time, best-effort
    pub timestamps: Option<FileTimestamps>,
    pub kind: FileKind,
}

/// One unit of work: a source file paired with its destination path and the
/// run's resize bound. Handed off to exactly one worker, never shared.
#[derive(Debug, Clone)]
pub struct Task {
    pub source: SourceFile,
    pub dest_path: PathBuf,
    pub bound: ResizeBound,
}

/// What the processor did with a successfully mirrored item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemAction {
    /// Opaque file copied verbatim
    Copied,
    /// Image decoded and re-encoded; `resampled` records whether the
    /// dimensions actually changed
    Transcoded { resampled: bool },
}

/// Per-task result, carrying the originating source path.
#[derive(Debug)]
pub struct TaskOutcome {
    pub source_path: PathBuf,
    pub kind: OutcomeKind,
}

#[derive(Debug)]
pub enum OutcomeKind {
    Succeeded(ItemAction),
    Failed(MirrorError),
}

impl TaskOutcome {
    pub fn succeeded(source_path: PathBuf, action: ItemAction) -> Self {
        Self {
            source_path,
            kind: OutcomeKind::Succeeded(action),
        }
    }

    pub fn failed(source_path: PathBuf, error: MirrorError) -> Self {
        Self {
            source_path,
            kind: OutcomeKind::Failed(error),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.kind, OutcomeKind::Succeeded(_))
    }
}

/// Aggregated counters for a whole run. The only mutable shared state of the
/// pipeline, updated exclusively through `record` at the coordinator's single
/// collection point.
#[derive(Debug, Default)]
pub struct RunTally {
    pub succeeded: usize,
    pub failed: usize,
    /// Opaque files copied verbatim
    pub copied: usize,
    /// Images resampled to new dimensions
    pub resized: usize,
    /// Images re-encoded without a dimension change
    pub reencoded: usize,
    /// Failing source paths with the error kind and message
    pub failures: Vec<(PathBuf, String)>,
}

impl RunTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one outcome into the tally.
    pub fn record(&mut self, outcome: &TaskOutcome) {
        match &outcome.kind {
            OutcomeKind::Succeeded(action) => {
                self.succeeded += 1;
                match action {
                    ItemAction::Copied => self.copied += 1,
                    ItemAction::Transcoded { resampled: true } => self.resized += 1,
                    ItemAction::Transcoded { resampled: false } => self.reencoded += 1,
                }
            }
            OutcomeKind::Failed(error) => {
                self.failed += 1;
                self.failures.push((
                    outcome.source_path.clone(),
                    format!("{}: {}", error.kind(), error),
                ));
            }
        }
    }

    /// Total number of recorded outcomes.
    pub fn total(&self) -> usize {
        self.succeeded + self.failed
    }

    pub fn format_summary(&self) -> String {
        format!(
            "Processed: {} files | Copied: {} | Resized: {} | Re-encoded: {} | Errors: {}",
            self.total(),
            self.copied,
            self.resized,
            self.reencoded,
            self.failed,
        )
    }
}

/// Classify a path by its extension, case-insensitive. Only `.jpg`/`.jpeg`
/// are transcoded; every other file is opaque, images in other formats
/// included.
pub fn classify(path: &Path) -> FileKind {
    match path.extension() {
        Some(ext) => {
            let ext_lower = ext.to_string_lossy().to_lowercase();
            if matches!(ext_lower.as_str(), "jpg" | "jpeg") {
                FileKind::Image
            } else {
                FileKind::Opaque
            }
        }
        None => FileKind::Opaque,
    }
}
