//! # Photo Mirror Library
//!
//! Questo è il modulo principale della libreria che espone tutte le API pubbliche.
//!
//! ## Responsabilità:
//! - Definisce la struttura modulare dell'applicazione
//! - Espone i tipi e le funzioni principali tramite re-exports
//! - Fornisce un'interfaccia pulita per il main.rs e per altri consumatori
//!
//! ## Architettura dei moduli:
//! - `config`: Gestione configurazione e validazione parametri
//! - `error`: Tipi di errore custom per le diverse fasi della pipeline
//! - `task`: Modello dati (file scoperti, task, outcome, tally)
//! - `resize`: Policy pura di ridimensionamento con aspect ratio
//! - `metadata`: Preservazione timestamp sorgente → destinazione
//! - `processor`: Elaborazione del singolo item (transcode o copia)
//! - `mirror`: Orchestrazione (walker, worker pool, coordinatore)
//! - `progress`: Progress tracking
//!
//! ## Utilizzo:
//! ```rust,no_run
//! use photo_mirror::{Config, TreeMirror};
//! use std::path::Path;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = Config::default();
//! let mirror = TreeMirror::new(config)?;
//! let tally = mirror.run(Path::new("/photos"), Path::new("/mirror")).await?;
//! println!("{}", tally.format_summary());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod metadata;
pub mod mirror;
pub mod processor;
pub mod progress;
pub mod resize;
pub mod task;

pub use config::Config;
pub use error::MirrorError;
pub use mirror::TreeMirror;
pub use resize::{compute_target_size, ResizeBound};
pub use task::{RunTally, Task, TaskOutcome};
