//! # Tree Mirror Orchestrator Module
//!
//! Questo è il modulo che orchestra l'intero run di mirroring.
//!
//! ## Responsabilità:
//! - Coordinamento: walker → worker pool → tally
//! - Il walker gira su un blocking task e alimenta il canale dei task
//!   mentre lo scheduler li consuma (streaming, mai materializzazione
//!   completa dell'albero)
//! - Un solo loop di raccolta drena il canale degli outcome: è l'unico
//!   punto che muta il `RunTally` e la progress bar
//! - Blocca finché ogni task scoperto ha un outcome registrato, poi
//!   verifica l'invariante scoperti == registrati
//!
//! ## Flusso di esecuzione:
//! 1. **Validazione**: config già validata alla costruzione
//! 2. **Walk**: discovery in streaming su blocking task
//! 3. **Dispatch**: worker pool con concorrenza bounded
//! 4. **Collection**: tally + progress in un punto seriale
//! 5. **Join**: barriera finale e report
//!
//! Un run con zero file scoperti è valido e riporta tally a zero. Un run
//! con fallimenti parziali NON è un errore: decidere cosa significhi il
//! tally spetta al chiamante.

use crate::config::Config;
use crate::mirror::walker::TreeWalker;
use crate::mirror::worker_pool::WorkerPool;
use crate::processor::ItemProcessor;
use crate::progress::ProgressManager;
use crate::task::{ItemAction, OutcomeKind, RunTally, TaskOutcome};
use anyhow::Result;
use std::path::Path;
use std::time::Instant;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

/// Depth of the walker-to-scheduler task queue. Keeps discovery lazy: a
/// full queue blocks the walker instead of buffering the whole tree.
const TASK_QUEUE_DEPTH: usize = 256;

/// Main orchestrator for a mirroring run
pub struct TreeMirror {
    config: Config,
}

impl TreeMirror {
    /// Create a new mirror runner with a validated configuration
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Mirror `source_root` into `dest_root` and return the final tally.
    pub async fn run(&self, source_root: &Path, dest_root: &Path) -> Result<RunTally> {
        let start_time = Instant::now();

        info!(
            "Mirroring {} -> {}",
            source_root.display(),
            dest_root.display()
        );
        self.log_configuration();

        let (task_tx, task_rx) = mpsc::channel(TASK_QUEUE_DEPTH);
        let (outcome_tx, mut outcome_rx) = mpsc::unbounded_channel();

        let walker = TreeWalker::new(source_root, dest_root, self.config.bound());
        let walk_handle = tokio::task::spawn_blocking(move || walker.walk(task_tx));

        let pool = WorkerPool::new(ItemProcessor::new(&self.config), self.config.workers);
        let pool_handle = tokio::spawn(pool.run(task_rx, outcome_tx));

        // Single collection point: the only writer of tally and progress.
        // The loop ends when the pool drops the last outcome sender, which
        // happens only after its join barrier.
        let progress = ProgressManager::new();
        let mut tally = RunTally::new();
        while let Some(outcome) = outcome_rx.recv().await {
            Self::report_outcome(&progress, &outcome);
            tally.record(&outcome);
        }

        let discovered = walk_handle.await??;
        pool_handle.await??;

        progress.finish(&tally.format_summary());

        if discovered != tally.total() {
            error!(
                "outcome count mismatch: {} discovered, {} recorded",
                discovered,
                tally.total()
            );
        }

        self.report_run(&tally, discovered, start_time.elapsed().as_secs_f64());
        Ok(tally)
    }

    /// Logga configurazione del run
    fn log_configuration(&self) {
        info!(
            "Resize bound: {}x{} (JPEG quality: {})",
            self.config.max_width, self.config.max_height, self.config.jpeg_quality
        );
        info!("Workers: {}", self.config.workers);
    }

    /// Aggiorna progress per un outcome (punto di raccolta seriale)
    fn report_outcome(progress: &ProgressManager, outcome: &TaskOutcome) {
        let name = outcome
            .source_path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();

        match &outcome.kind {
            OutcomeKind::Succeeded(ItemAction::Copied) => {
                progress.update(&format!("[OK] {}: copied", name));
            }
            OutcomeKind::Succeeded(ItemAction::Transcoded { resampled: true }) => {
                progress.update(&format!("[OK] {}: resized", name));
            }
            OutcomeKind::Succeeded(ItemAction::Transcoded { resampled: false }) => {
                progress.update(&format!("[OK] {}: re-encoded", name));
            }
            OutcomeKind::Failed(err) => {
                warn!("{}: {}", outcome.source_path.display(), err);
                progress.update(&format!("[ERROR] {}: {}", name, err.kind()));
            }
        }
    }

    /// Stampa statistiche finali
    fn report_run(&self, tally: &RunTally, discovered: usize, duration: f64) {
        info!("=== Mirror Complete ===");
        info!("Files discovered: {}", discovered);
        info!("Files succeeded: {}", tally.succeeded);
        info!(
            "  Copied: {} | Resized: {} | Re-encoded: {}",
            tally.copied, tally.resized, tally.reencoded
        );
        info!("Files failed: {}", tally.failed);
        for (path, reason) in &tally.failures {
            warn!("  {} ({})", path.display(), reason);
        }
        info!("Elapsed: {:.2}s", duration);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn write_test_jpeg(path: &Path, width: u32, height: u32) {
        let img = image::RgbImage::from_fn(width, height, |x, y| {
            image::Rgb([(x % 256) as u8, (y % 256) as u8, 64])
        });
        img.save_with_format(path, image::ImageFormat::Jpeg)
            .unwrap();
    }

    fn example_config(max: u32, workers: usize) -> Config {
        Config {
            max_width: max,
            max_height: max,
            workers,
            ..Default::default()
        }
    }

    /// Source tree {a.jpg oversized, b.txt, sub/c.jpeg within bound}
    fn build_example_tree(source: &Path) {
        write_test_jpeg(&source.join("a.jpg"), 400, 300);
        fs::write(source.join("b.txt"), b"plain text").unwrap();
        fs::create_dir(source.join("sub")).unwrap();
        write_test_jpeg(&source.join("sub").join("c.jpeg"), 50, 50);
    }

    #[tokio::test]
    async fn test_mirror_example_tree() {
        let source = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();
        build_example_tree(source.path());

        let mirror = TreeMirror::new(example_config(300, 4)).unwrap();
        let tally = mirror.run(source.path(), dest.path()).await.unwrap();

        assert_eq!(tally.succeeded, 3);
        assert_eq!(tally.failed, 0);
        assert_eq!(tally.copied, 1);
        assert_eq!(tally.resized, 1);
        assert_eq!(tally.reencoded, 1);

        // Oversized landscape pinned to the bound width
        assert_eq!(
            image::image_dimensions(dest.path().join("a.jpg")).unwrap(),
            (300, 225)
        );
        // Opaque file byte-identical
        assert_eq!(
            fs::read(dest.path().join("b.txt")).unwrap(),
            fs::read(source.path().join("b.txt")).unwrap()
        );
        // Within-bound image keeps its dimensions
        assert_eq!(
            image::image_dimensions(dest.path().join("sub").join("c.jpeg")).unwrap(),
            (50, 50)
        );
    }

    #[tokio::test]
    async fn test_one_corrupt_image_among_valid_files() {
        let source = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();
        for i in 0..10 {
            write_test_jpeg(&source.path().join(format!("ok_{i}.jpg")), 40, 30);
        }
        fs::write(source.path().join("corrupt.jpg"), b"not a jpeg at all").unwrap();

        let mirror = TreeMirror::new(example_config(3000, 4)).unwrap();
        let tally = mirror.run(source.path(), dest.path()).await.unwrap();

        assert_eq!(tally.total(), 11);
        assert_eq!(tally.succeeded, 10);
        assert_eq!(tally.failed, 1);
        assert_eq!(tally.failures.len(), 1);
        assert!(tally.failures[0].0.ends_with("corrupt.jpg"));
        assert!(tally.failures[0].1.starts_with("decode:"));

        // The run completed: every valid sibling was written
        for i in 0..10 {
            assert!(dest.path().join(format!("ok_{i}.jpg")).exists());
        }
        assert!(!dest.path().join("corrupt.jpg").exists());
    }

    #[tokio::test]
    async fn test_tally_is_stable_across_concurrency() {
        let source = TempDir::new().unwrap();
        build_example_tree(source.path());
        for i in 0..8 {
            fs::write(source.path().join(format!("extra_{i}.bin")), vec![i as u8; 64]).unwrap();
        }

        for workers in [1, 4, 64] {
            let dest = TempDir::new().unwrap();
            let mirror = TreeMirror::new(example_config(300, workers)).unwrap();
            let tally = mirror.run(source.path(), dest.path()).await.unwrap();

            assert_eq!(tally.total(), 11, "workers = {workers}");
            assert_eq!(tally.succeeded, 11, "workers = {workers}");
            assert_eq!(tally.failed, 0, "workers = {workers}");
        }
    }

    #[tokio::test]
    async fn test_empty_source_reports_zero_tally() {
        let source = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();

        let mirror = TreeMirror::new(example_config(3000, 4)).unwrap();
        let tally = mirror.run(source.path(), dest.path()).await.unwrap();

        assert_eq!(tally.total(), 0);
        assert_eq!(tally.failed, 0);
    }

    #[tokio::test]
    async fn test_empty_subdirectories_are_mirrored() {
        let source = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();
        fs::create_dir_all(source.path().join("only").join("dirs")).unwrap();

        let mirror = TreeMirror::new(example_config(3000, 2)).unwrap();
        let tally = mirror.run(source.path(), dest.path()).await.unwrap();

        assert_eq!(tally.total(), 0);
        assert!(dest.path().join("only").join("dirs").is_dir());
    }

    #[tokio::test]
    async fn test_mirror_is_repeatable() {
        let source = TempDir::new().unwrap();
        build_example_tree(source.path());

        let mirror = TreeMirror::new(example_config(300, 4)).unwrap();

        let dest_a = TempDir::new().unwrap();
        let tally_a = mirror.run(source.path(), dest_a.path()).await.unwrap();
        let dest_b = TempDir::new().unwrap();
        let tally_b = mirror.run(source.path(), dest_b.path()).await.unwrap();

        assert_eq!(tally_a.succeeded, tally_b.succeeded);
        assert_eq!(tally_a.failed, tally_b.failed);

        // Opaque outputs byte-identical across runs
        assert_eq!(
            fs::read(dest_a.path().join("b.txt")).unwrap(),
            fs::read(dest_b.path().join("b.txt")).unwrap()
        );
        // Image outputs dimensionally identical across runs
        assert_eq!(
            image::image_dimensions(dest_a.path().join("a.jpg")).unwrap(),
            image::image_dimensions(dest_b.path().join("a.jpg")).unwrap()
        );
    }

    #[tokio::test]
    async fn test_destination_root_is_created_if_absent() {
        let source = TempDir::new().unwrap();
        let dest_parent = TempDir::new().unwrap();
        let dest: PathBuf = dest_parent.path().join("not").join("yet").join("there");
        fs::write(source.path().join("f.txt"), b"x").unwrap();

        let mirror = TreeMirror::new(example_config(3000, 2)).unwrap();
        let tally = mirror.run(source.path(), &dest).await.unwrap();

        assert_eq!(tally.succeeded, 1);
        assert!(dest.join("f.txt").exists());
    }

    #[tokio::test]
    async fn test_rejects_invalid_config() {
        assert!(TreeMirror::new(Config {
            workers: 0,
            ..Default::default()
        })
        .is_err());
    }
}
