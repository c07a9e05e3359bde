//! Portal configuration, read from RON.
//!
//! ```text
//! PortalConfig(
//!     index: ndvi,
//!     default_layer: VIS,
//!     colormap: (palette: magma, steps: 12, reverse: true),
//! )
//! ```
//!
//! Every field is optional; `bands` defaults to the imager's GeoTIFFs.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::Result;
use crate::index::SpectralIndex;
use crate::layers::BandKey;
use crate::ramp::ColormapSettings;
use crate::state::{Action, ViewState};
use crate::style::BandTable;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PortalConfig {
    pub bands: BandTable,
    pub colormap: ColormapSettings,
    pub index: SpectralIndex,
    /// Layer shown when no index is selected.
    pub default_layer: BandKey,
}

impl Default for PortalConfig {
    fn default() -> Self {
        PortalConfig {
            bands: BandTable::default(),
            colormap: ColormapSettings::default(),
            index: SpectralIndex::None,
            default_layer: BandKey::VIS,
        }
    }
}

impl PortalConfig {
    pub fn from_ron_str(s: &str) -> Result<Self> {
        Ok(ron::from_str(s)?)
    }

    /// The view the portal opens with: the configured index with its
    /// canonical layers, and the configured colormap.  Out of range
    /// values (`steps`, `alpha`, an inverted domain) are brought back in
    /// range the same way the corresponding [`Action`]s would.
    pub fn initial_state(&self) -> ViewState {
        let cm = &self.colormap;
        let state = ViewState::new(ColormapSettings::default(), self.index, self.default_layer)
            .reduce(Action::SetPalette(cm.palette))
            .reduce(Action::SetMax(f64::INFINITY))
            .reduce(Action::SetMin(cm.min))
            .reduce(Action::SetMax(cm.max))
            .reduce(Action::SetSteps(cm.steps))
            .reduce(Action::SetAlpha(cm.alpha))
            .reduce(Action::SetBrightness(cm.brightness))
            .reduce(Action::SetContrast(cm.contrast))
            .reduce(Action::SetSaturation(cm.saturation))
            .reduce(Action::SetExposure(cm.exposure))
            .reduce(Action::SetHueShift(cm.hue_shift));
        if cm.reverse { state.reduce(Action::ToggleReverse) } else { state }
    }
}

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<PortalConfig> {
    let path = path.as_ref();
    let config = PortalConfig::from_ron_str(&fs::read_to_string(path)?)?;
    debug!(path = %path.display(), index = %config.index, "loaded portal config");
    Ok(config)
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::RampError;
    use crate::ColormapName;

    #[test]
    fn empty_config_is_default() {
        let config = PortalConfig::from_ron_str("()").unwrap();
        assert_eq!(config, PortalConfig::default());
        let state = config.initial_state();
        assert_eq!(state.layers.keys(), vec![BandKey::VIS]);
        assert_eq!(state.colormap, ColormapSettings::default());
    }

    #[test]
    fn partial_config() {
        let config = PortalConfig::from_ron_str(r#"
            PortalConfig(
                index: ndwi,
                default_layer: TIR1,
                colormap: (palette: magma, min: -0.5, max: 0.5, steps: 1, reverse: true, hueshift: 30.0),
            )
        "#).unwrap();
        assert_eq!(config.index, SpectralIndex::Ndwi);
        assert_eq!(config.colormap.palette, ColormapName::Magma);
        assert_eq!(config.colormap.alpha, 1.);

        let state = config.initial_state();
        assert_eq!(state.layers.keys(), vec![BandKey::SWIR, BandKey::MIR]);
        assert_eq!((state.colormap.min, state.colormap.max), (-0.5, 0.5));
        assert_eq!(state.colormap.steps, 2);
        assert!(state.colormap.reverse);
        assert_eq!(state.colormap.hue_shift, 30.);
    }

    #[test]
    fn band_overrides() {
        let config = PortalConfig::from_ron_str(r#"(
            bands: { VIS: (url: "file:///data/vis.tif", min: 0.0, max: 1023.0) },
        )"#).unwrap();
        assert_eq!(config.bands.get(BandKey::VIS).unwrap().max, 1023.);
        assert!(matches!(config.bands.get(BandKey::WV), Err(RampError::MissingBandSource(BandKey::WV))));
    }

    #[test]
    fn rejects_unknown_names() {
        assert!(matches!(PortalConfig::from_ron_str("(index: tasseledcap)"), Err(RampError::RonError(_))));
        assert!(matches!(load_config("/nonexistent/portal.ron"), Err(RampError::IOError(_))));
    }
}
