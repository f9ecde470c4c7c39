//! # Progress Tracking Module
//!
//! Questo modulo gestisce il feedback visivo del run di mirroring.
//!
//! ## Responsabilità:
//! - Spinner con contatore `indicatif` per feedback real-time
//! - Messaggi di stato per ogni file completato
//! - Riga di riepilogo finale
//!
//! Il totale dei file non è noto in anticipo perché il walker scopre i task
//! in streaming, quindi si usa uno spinner con posizione invece di una barra
//! con lunghezza fissa.
//!
//! ## Visual feedback:
//! ```text
//! ⠋ [00:02:15] 1523 files [OK] photo.jpg: resized 4000x3000 -> 3000x2250
//! ```

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Manages progress reporting for a mirroring run
#[derive(Clone)]
pub struct ProgressManager {
    bar: ProgressBar,
}

impl ProgressManager {
    /// Create a new progress manager
    pub fn new() -> Self {
        let bar = ProgressBar::new_spinner();

        bar.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {pos} files {msg}")
                .unwrap(),
        );

        bar.enable_steady_tick(Duration::from_millis(100));

        Self { bar }
    }

    /// Record one completed file with a status message
    pub fn update(&self, message: &str) {
        self.bar.inc(1);
        self.bar.set_message(message.to_string());
    }

    /// Set a custom message without incrementing
    pub fn set_message(&self, message: &str) {
        self.bar.set_message(message.to_string());
    }

    /// Finish with a final message
    pub fn finish(&self, message: &str) {
        self.bar.finish_with_message(message.to_string());
    }

    /// Number of files recorded so far
    pub fn position(&self) -> u64 {
        self.bar.position()
    }
}

impl Default for ProgressManager {
    fn default() -> Self {
        Self::new()
    }
}
