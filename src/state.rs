//! The map view state and its reducer.
//!
//! Every change to what is rendered goes through [`ViewState::reduce`],
//! so a sequence of [`Action`]s fully describes a session.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::Result;
use crate::expr::Expression;
use crate::index::{expression_for, SpectralIndex, ValidRange};
use crate::layers::{derive_from_index, role_pins, BandBinding, BandKey, BandSlot, RenderArray};
use crate::ramp::{generate_color_stops, ColorStops, ColormapSettings};
use crate::ColormapName;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Action {
    AddLayer(BandKey),
    RemoveLayer(String),
    Reorder { from: usize, to: usize },
    SelectIndex(SpectralIndex),
    SetDefaultLayer(BandKey),
    /// Bind a slot to a layer id regardless of its position.
    PinSlot { slot: BandSlot, id: String },
    UnpinSlot(BandSlot),
    SetPalette(ColormapName),
    SetMin(f64),
    SetMax(f64),
    SetSteps(usize),
    ToggleReverse,
    SetAlpha(f64),
    SetBrightness(f64),
    SetContrast(f64),
    SetSaturation(f64),
    SetExposure(f64),
    SetHueShift(f64),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    pub colormap: ColormapSettings,
    pub index: SpectralIndex,
    pub default_layer: BandKey,
    pub layers: RenderArray,
    pub pins: BTreeMap<BandSlot, String>,
}

impl Default for ViewState {
    fn default() -> Self {
        ViewState::new(ColormapSettings::default(), SpectralIndex::None, BandKey::VIS)
    }
}

impl ViewState {
    /// A state whose layers are the canonical ones of `index`, with the
    /// slots of its expression pinned to their bands.  The colormap
    /// settings are kept as given.
    pub fn new(colormap: ColormapSettings, index: SpectralIndex, default_layer: BandKey) -> Self {
        let layers = derive_from_index(index, default_layer);
        let pins = role_pins(index, &layers);
        ViewState { colormap, index, default_layer, layers, pins }
    }

    /// A state with explicitly given layers.
    pub fn with_layers(mut self, layers: RenderArray) -> Self {
        self.layers = layers;
        self.pins.clear();
        self
    }

    pub fn reduce(mut self, action: Action) -> Self {
        debug!(?action, "view state action");
        match action {
            Action::AddLayer(key) => { self.layers.add_layer(key); }
            Action::RemoveLayer(id) => {
                self.layers.remove_layer(&id);
                self.pins.retain(|_, pinned| *pinned != id);
            }
            Action::Reorder { from, to } => self.layers.reorder(from, to),
            Action::SelectIndex(index) => {
                self.index = index;
                self.rederive();
            }
            Action::SetDefaultLayer(key) => {
                self.default_layer = key;
                self.rederive();
            }
            Action::PinSlot { slot, id } => {
                if slot.0 >= 1 && self.layers.get(&id).is_some() {
                    self.pins.insert(slot, id);
                }
            }
            Action::UnpinSlot(slot) => { self.pins.remove(&slot); }
            Action::SetPalette(palette) => self.colormap.palette = palette,
            Action::SetMin(x) => self.colormap.min = x.min(self.colormap.max),
            Action::SetMax(x) => self.colormap.max = x.max(self.colormap.min),
            Action::SetSteps(n) => self.colormap.steps = n.max(2),
            Action::ToggleReverse => self.colormap.reverse = !self.colormap.reverse,
            Action::SetAlpha(x) => self.colormap.alpha = x.clamp(0., 1.),
            Action::SetBrightness(x) => self.colormap.brightness = x,
            Action::SetContrast(x) => self.colormap.contrast = x,
            Action::SetSaturation(x) => self.colormap.saturation = x,
            Action::SetExposure(x) => self.colormap.exposure = x,
            Action::SetHueShift(x) => self.colormap.hue_shift = x,
        }
        self
    }

    /// Replace the layers and pins by the canonical ones of the current
    /// index and reset the colormap domain to the index's range.
    fn rederive(&mut self) {
        self.layers = derive_from_index(self.index, self.default_layer);
        self.pins = role_pins(self.index, &self.layers);
        let range = self.valid_range();
        self.colormap.min = range.min;
        self.colormap.max = range.max;
    }

    pub fn expression(&self) -> Expression { expression_for(self.index).0 }

    pub fn valid_range(&self) -> ValidRange { expression_for(self.index).1 }

    pub fn binding(&self) -> BandBinding { BandBinding::pinned(&self.layers, &self.pins) }

    pub fn color_stops(&self) -> Result<ColorStops> { generate_color_stops(&self.colormap) }
}
