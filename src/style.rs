//! The document handed to the map host: one GeoTIFF source per band
//! slot and the per-pixel color expression.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{RampError, Result};
use crate::expr::Expression;
use crate::layers::{BandKey, BandSlot};
use crate::state::ViewState;

/// Where the data of a band lives and the raw value range used to
/// normalize it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BandSource {
    pub url: String,
    pub min: f64,
    pub max: f64,
}

impl BandSource {
    pub fn new(url: &str, min: f64, max: f64) -> Self {
        BandSource { url: url.to_string(), min, max }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BandTable(BTreeMap<BandKey, BandSource>);

const COG_BASE: &str = "https://somehowgetsplotted.s3.ap-south-1.amazonaws.com/somehowgetsplotted";

impl Default for BandTable {
    /// The imager's six optimized GeoTIFFs.
    fn default() -> Self {
        let cog = |name: &str| format!("{COG_BASE}/IMG_{name}_optimized.tif");
        BandTable(BTreeMap::from([
            (BandKey::MIR, BandSource::new(&cog("MIR"), 302., 996.)),
            (BandKey::SWIR, BandSource::new(&cog("SWIR"), 11., 551.)),
            (BandKey::TIR1, BandSource::new(&cog("TIR1"), 238., 961.)),
            (BandKey::TIR2, BandSource::new(&cog("TIR2"), 283., 945.)),
            (BandKey::VIS, BandSource::new(&cog("VIS"), 35., 493.)),
            (BandKey::WV, BandSource::new(&cog("WV"), 776., 998.)),
        ]))
    }
}

impl BandTable {
    pub fn get(&self, key: BandKey) -> Result<&BandSource> {
        self.0.get(&key).ok_or(RampError::MissingBandSource(key))
    }

    pub fn insert(&mut self, key: BandKey, source: BandSource) -> Option<BandSource> {
        self.0.insert(key, source)
    }

    pub fn keys(&self) -> impl Iterator<Item = BandKey> + '_ { self.0.keys().copied() }
}

/// One raster source of the host; `band` is the band within the file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SourceDescriptor {
    pub url: String,
    pub band: u32,
    pub min: f64,
    pub max: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RenderStyle {
    /// Source `k` provides band slot `k + 1`.
    pub sources: Vec<SourceDescriptor>,
    /// Absent when the raw bands are displayed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Expression>,
}

impl RenderStyle {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// The sources and color expression for `state`.
///
/// With a colormap, the index expression is interpolated over the color
/// stops and every slot it reads must be bound.  With
/// [`ColormapName::None`](crate::ColormapName::None) the first (up to
/// three) bound slots are shown as they are.
pub fn build_style(state: &ViewState, bands: &BandTable) -> Result<RenderStyle> {
    let binding = state.binding();
    let stops = state.color_stops()?;

    let (layers, color) = if stops.is_empty() {
        let top = (1..=3u8).take_while(|&n| binding.get(BandSlot(n)).is_some()).count() as u8;
        (binding.layers_up_to(top)?, None)
    } else {
        let expr = state.expression();
        binding.check(&expr)?;
        let top = expr.band_slots().into_iter().map(|s| s.0).max().unwrap_or(1);
        (binding.layers_up_to(top)?, Some(Expression::interpolate(expr, stops)))
    };

    let sources = layers.into_iter()
        .map(|layer| {
            let src = bands.get(layer.key)?;
            Ok(SourceDescriptor { url: src.url.clone(), band: 1, min: src.min, max: src.max })
        })
        .collect::<Result<Vec<_>>>()?;

    debug!(index = %state.index, n_sources = sources.len(), "built render style");
    Ok(RenderStyle { sources, color })
}
