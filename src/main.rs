//! # Photo Mirror - Main Entry Point
//!
//! Questo è il punto di ingresso principale dell'applicazione.
//!
//! ## Responsabilità:
//! - Parsing degli argomenti della command line con `clap`
//! - Inizializzazione del sistema di logging con `tracing`
//! - Validazione degli input dell'utente
//! - Creazione della configurazione e avvio del mirror
//!
//! ## Flusso di esecuzione:
//! 1. Parsa gli argomenti CLI (sorgente, destinazione, bound, quality, workers)
//! 2. Configura il logging (INFO o DEBUG a seconda del flag verbose)
//! 3. Valida che la directory sorgente esista
//! 4. Crea un oggetto Config con tutti i parametri
//! 5. Istanzia TreeMirror e avvia il run
//!
//! ## Esempio di utilizzo:
//! ```bash
//! photo-mirror /path/to/photos /path/to/mirror --max-width 3000 --max-height 3000 --workers 8
//! ```

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, warn};

use photo_mirror::{Config, TreeMirror};

#[derive(Parser)]
#[command(name = "photo-mirror")]
#[command(about = "Mirror a directory tree, downscaling JPEG photos to a bounded resolution")]
struct Args {
    /// Source directory to mirror
    source_directory: PathBuf,

    /// Destination directory (created if absent)
    output_directory: PathBuf,

    /// Maximum output width for JPEG images
    #[arg(long, default_value = "3000")]
    max_width: u32,

    /// Maximum output height for JPEG images
    #[arg(long, default_value = "3000")]
    max_height: u32,

    /// JPEG re-encoding quality (1-100)
    #[arg(short, long, default_value = "85")]
    quality: u8,

    /// Number of parallel workers
    #[arg(short, long, default_value = "4")]
    workers: usize,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(if args.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    // Validate arguments
    if !args.source_directory.exists() {
        return Err(anyhow::anyhow!(
            "Source directory does not exist: {}",
            args.source_directory.display()
        ));
    }
    if !args.source_directory.is_dir() {
        return Err(anyhow::anyhow!(
            "Source path is not a directory: {}",
            args.source_directory.display()
        ));
    }

    let config = Config {
        max_width: args.max_width,
        max_height: args.max_height,
        jpeg_quality: args.quality,
        workers: args.workers,
    };

    let mirror = TreeMirror::new(config)?;
    let tally = mirror
        .run(&args.source_directory, &args.output_directory)
        .await?;

    if tally.failed > 0 {
        warn!(
            "{} of {} files failed, see the report above",
            tally.failed,
            tally.total()
        );
    } else {
        info!("All {} files mirrored", tally.total());
    }

    Ok(())
}
