//! # Resize Policy Module
//!
//! Questo modulo contiene la regola numerica di ridimensionamento delle immagini.
//!
//! ## Responsabilità:
//! - Definisce `ResizeBound`, il vincolo (max_width, max_height) condiviso dal run
//! - Calcola le dimensioni di output preservando l'aspect ratio
//! - Garantisce che non avvenga MAI upscaling
//!
//! ## Regola:
//! - Se l'immagine sta già dentro il bound, le dimensioni restano invariate
//! - Altrimenti si ridimensiona sul lato lungo:
//!   - landscape (`aspect > 1`): larghezza = max_width, altezza = floor(max_width / aspect)
//!   - portrait o quadrata: altezza = max_height, larghezza = floor(max_height * aspect)
//!
//! ## Edge case:
//! Con aspect ratio estremi il floor può produrre una dimensione pari a 0.
//! È un output definito e permesso di questa policy: sta al chiamante
//! rifiutarlo esplicitamente prima del resampling.
//!
//! La policy è pura e sincrona: nessun I/O, nessun side effect.

use serde::{Deserialize, Serialize};

/// Maximum output dimensions for transcoded images, constant for a whole run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResizeBound {
    pub max_width: u32,
    pub max_height: u32,
}

impl ResizeBound {
    pub fn new(max_width: u32, max_height: u32) -> Self {
        Self {
            max_width,
            max_height,
        }
    }

    /// Compute the output dimensions for an image of the given size.
    pub fn fit(&self, width: u32, height: u32) -> (u32, u32) {
        compute_target_size(width, height, self.max_width, self.max_height)
    }
}

impl Default for ResizeBound {
    fn default() -> Self {
        Self::new(3000, 3000)
    }
}

/// Compute output dimensions that fit within the bound while preserving
/// aspect ratio. Images already within the bound are returned unchanged,
/// so this never upscales.
pub fn compute_target_size(
    original_width: u32,
    original_height: u32,
    max_width: u32,
    max_height: u32,
) -> (u32, u32) {
    if original_width <= max_width && original_height <= max_height {
        return (original_width, original_height);
    }

    let aspect_ratio = original_width as f64 / original_height as f64;

    if aspect_ratio > 1.0 {
        // Wider than tall: pin the width
        let new_height = (max_width as f64 / aspect_ratio).floor() as u32;
        (max_width, new_height)
    } else {
        // Taller than wide, or square: pin the height
        let new_width = (max_height as f64 * aspect_ratio).floor() as u32;
        (new_width, max_height)
    }
}
