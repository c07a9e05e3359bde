use thiserror::Error;

use crate::layers::{BandKey, BandSlot};

pub type Result<T> = std::result::Result<T, RampError>;

#[derive(Error, Debug)]
pub enum RampError {
    #[error("invalid colormap domain [{min}, {max}]: bounds must be finite with min < max")]
    InvalidDomain { min: f64, max: f64 },

    #[error("invalid number of color steps {0} (need at least 2)")]
    InvalidSteps(usize),

    #[error("unknown colormap {0}")]
    UnknownPalette(String),

    #[error("unknown spectral index {0}")]
    UnknownIndex(String),

    #[error("unknown band {0}")]
    UnknownBand(String),

    #[error("expression references band slot {0} but no layer is bound to it")]
    UnboundBand(BandSlot),

    #[error("no source configured for band {0}")]
    MissingBandSource(BandKey),

    #[error("IO error {0}")]
    IOError(#[from] std::io::Error),

    #[error("config RON error {0}")]
    RonError(#[from] ron::error::SpannedError),

    #[error("JSON serialization error {0}")]
    JsonError(#[from] serde_json::Error),
}
