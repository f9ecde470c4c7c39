//! # Configuration Management Module
//!
//! Questo modulo gestisce tutta la configurazione dell'applicazione.
//!
//! ## Responsabilità:
//! - Definisce la struct `Config` con tutti i parametri del run di mirroring
//! - Fornisce validazione robusta dei parametri di input
//! - Supporta caricamento/salvataggio configurazione da/verso file JSON
//! - Fornisce valori di default sensati per tutti i parametri
//!
//! ## Parametri di configurazione:
//! - `max_width` / `max_height`: bound di ridimensionamento (default: 3000x3000)
//! - `jpeg_quality`: qualità di ri-encoding JPEG (1-100, default: 85)
//! - `workers`: numero di worker paralleli (default: 4)
//!
//! ## Validazione:
//! - Controlla che jpeg_quality sia 1-100
//! - Controlla che il bound abbia entrambi i lati > 0
//! - Controlla che workers sia > 0
//!
//! ## Esempio:
//! ```rust
//! use photo_mirror::Config;
//!
//! let config = Config {
//!     jpeg_quality: 85,
//!     workers: 8,
//!     ..Default::default()
//! };
//! config.validate().unwrap();
//! ```

use crate::resize::ResizeBound;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for a mirroring run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Maximum output width for transcoded images
    pub max_width: u32,
    /// Maximum output height for transcoded images
    pub max_height: u32,
    /// JPEG re-encoding quality (1-100)
    pub jpeg_quality: u8,
    /// Number of parallel workers
    pub workers: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_width: 3000,
            max_height: 3000,
            jpeg_quality: 85,
            workers: 4,
        }
    }
}

impl Config {
    /// The resize bound shared by every worker of the run
    pub fn bound(&self) -> ResizeBound {
        ResizeBound::new(self.max_width, self.max_height)
    }

    /// Validate configuration parameters
    pub fn validate(&self) -> Result<()> {
        if self.jpeg_quality == 0 || self.jpeg_quality > 100 {
            return Err(anyhow::anyhow!("JPEG quality must be between 1 and 100"));
        }

        if self.max_width == 0 || self.max_height == 0 {
            return Err(anyhow::anyhow!(
                "Resize bound must have positive width and height"
            ));
        }

        if self.workers == 0 {
            return Err(anyhow::anyhow!("Number of workers must be greater than 0"));
        }

        Ok(())
    }

    /// Load configuration from file
    pub async fn from_file(path: &PathBuf) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = tokio::fs::read_to_string(path).await?;
        let config: Config = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub async fn save_to_file(&self, path: &PathBuf) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        tokio::fs::write(path, content).await?;
        Ok(())
    }
}
