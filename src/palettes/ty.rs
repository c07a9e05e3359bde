use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub(crate) use rgb::RGBA;

use crate::errors::RampError;

/// A colormap defined by RGB stops at increasing positions.
pub(crate) struct PaletteData {
    pub(crate) stops: Vec<PaletteStop>, // Invariant: length ≥ 2, t from 0 to 1
    pub(crate) typ: PaletteType,
}

/// One indexed stop: position `t` ∈ \[0, 1\] and its color (components
/// in \[0, 255\], alpha in \[0, 1\]).
#[derive(Clone, Copy, Debug)]
pub(crate) struct PaletteStop {
    pub(crate) t: f64,
    pub(crate) rgb: RGBA<f64>,
}

pub(crate) fn stop(t: f64, r: u8, g: u8, b: u8) -> PaletteStop {
    PaletteStop { t, rgb: RGBA { r: r as f64, g: g as f64, b: b as f64, a: 1. } }
}

/// Type of Palette.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PaletteType {
    /// Sequential color scheme, suited to ordered data that progress
    /// from low to high.  Lightness steps dominate the look of these
    /// schemes.
    Seq,
    /// Divergent (or multi-hue) color scheme.  They put emphasis on
    /// mid-range values and on both extremes with contrasting hues.
    Div,
}

/// Names of the colormaps offered for spectral-index rendering.
///
/// [`ColormapName::None`] is not a palette: it asks for the raw band
/// data to be displayed without any color mapping.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColormapName {
    None,
    #[default]
    Viridis,
    Jet,
    Rainbow,
    Portland,
    Bone,
    Plasma,
    Magma,
    Inferno,
}

impl ColormapName {
    /// All palettes, in the order a selector lists them.
    pub const ALL: [ColormapName; 8] = [
        Self::Viridis, Self::Jet, Self::Rainbow, Self::Portland,
        Self::Bone, Self::Plasma, Self::Magma, Self::Inferno,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Viridis => "viridis",
            Self::Jet => "jet",
            Self::Rainbow => "rainbow",
            Self::Portland => "portland",
            Self::Bone => "bone",
            Self::Plasma => "plasma",
            Self::Magma => "magma",
            Self::Inferno => "inferno",
        }
    }
}

impl fmt::Display for ColormapName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColormapName {
    type Err = RampError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        std::iter::once(ColormapName::None)
            .chain(ColormapName::ALL)
            .find(|c| c.as_str() == name)
            .ok_or_else(|| RampError::UnknownPalette(s.to_string()))
    }
}
