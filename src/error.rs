//! # Error Types Module
//!
//! Questo modulo definisce tutti i tipi di errore custom dell'applicazione.
//!
//! ## Responsabilità:
//! - Definisce `MirrorError` enum per categorizzare tutti gli errori possibili
//! - Fornisce messaggi di errore descrittivi e strutturati
//! - Integra con `thiserror` per automatic error conversion
//!
//! ## Categorie di errori:
//! - `Io`: Errori di I/O generici (lettura sorgente, stat, etc.)
//! - `Traversal`: Entry non enumerabile durante la scansione (subtree skippato)
//! - `Decode`: Bytes JPEG corrotti o non supportati
//! - `Resample`: Ridimensionamento fallito o dimensioni target degeneri
//! - `Encode`: Ri-encoding JPEG fallito
//! - `Write`: Scrittura del file di destinazione fallita
//! - `Copy`: Copia byte-per-byte fallita
//! - `Metadata`: Lettura/applicazione timestamp fallita (mai fatale per l'item)
//! - `Worker`: Worker terminato in modo anomalo durante l'elaborazione
//!
//! ## Propagazione:
//! Gli errori per-file non attraversano mai il pool come panic o `Err`:
//! vengono convertiti in `TaskOutcome::Failed` dal processor e viaggiano
//! come dati fino al tally finale.

/// Custom error types for the mirroring pipeline
#[derive(thiserror::Error, Debug)]
pub enum MirrorError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Traversal error: {0}")]
    Traversal(String),

    #[error("Image decode error: {0}")]
    Decode(image::ImageError),

    #[error("Resample error: {0}")]
    Resample(String),

    #[error("Image encode error: {0}")]
    Encode(image::ImageError),

    #[error("Write error: {0}")]
    Write(std::io::Error),

    #[error("Copy error: {0}")]
    Copy(std::io::Error),

    #[error("Metadata preservation error: {0}")]
    Metadata(String),

    #[error("Worker failure: {0}")]
    Worker(String),
}

impl MirrorError {
    /// Short tag used in per-file failure reports
    pub fn kind(&self) -> &'static str {
        match self {
            MirrorError::Io(_) => "io",
            MirrorError::Traversal(_) => "traversal",
            MirrorError::Decode(_) => "decode",
            MirrorError::Resample(_) => "resample",
            MirrorError::Encode(_) => "encode",
            MirrorError::Write(_) => "write",
            MirrorError::Copy(_) => "copy",
            MirrorError::Metadata(_) => "metadata",
            MirrorError::Worker(_) => "worker",
        }
    }
}
