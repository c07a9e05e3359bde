//! The render array: raster layers composited by the map host, and the
//! binding of expression band slots to those layers.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{RampError, Result};
use crate::expr::Expression;
use crate::index::SpectralIndex;

/// Bands of the imager, each backed by one cloud-optimized GeoTIFF.
#[allow(clippy::upper_case_acronyms)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BandKey { MIR, SWIR, TIR1, TIR2, VIS, WV }

impl BandKey {
    pub const ALL: [BandKey; 6] =
        [BandKey::MIR, BandKey::SWIR, BandKey::TIR1, BandKey::TIR2, BandKey::VIS, BandKey::WV];

    pub fn as_str(&self) -> &'static str {
        match self {
            BandKey::MIR => "MIR",
            BandKey::SWIR => "SWIR",
            BandKey::TIR1 => "TIR1",
            BandKey::TIR2 => "TIR2",
            BandKey::VIS => "VIS",
            BandKey::WV => "WV",
        }
    }
}

impl fmt::Display for BandKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for BandKey {
    type Err = RampError;

    fn from_str(s: &str) -> Result<Self> {
        let key = s.trim().to_ascii_uppercase();
        BandKey::ALL.into_iter()
            .find(|k| k.as_str() == key)
            .ok_or_else(|| RampError::UnknownBand(s.to_string()))
    }
}

/// 1-based position of a band as seen by an [`Expression`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BandSlot(pub u8);

impl fmt::Display for BandSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "B{}", self.0) }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerInstance {
    pub id: String,
    pub key: BandKey,
}

const ID_CHARS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// `layer-` followed by 9 random base-36 characters.
fn fresh_id() -> String {
    let mut rng = rand::rng();
    let suffix: String = (0..9).map(|_| ID_CHARS[rng.random_range(0..ID_CHARS.len())] as char).collect();
    format!("layer-{suffix}")
}

/// Ordered layers.  The order decides which layer feeds which band slot
/// unless a slot is pinned (see [`BandBinding`]).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RenderArray(Vec<LayerInstance>);

impl RenderArray {
    pub fn new() -> Self { Self::default() }

    pub fn from_keys(keys: &[BandKey]) -> Self {
        let mut layers = Self::new();
        for &key in keys {
            layers.add_layer(key);
        }
        layers
    }

    /// Append a layer for `key` and return its id.
    pub fn add_layer(&mut self, key: BandKey) -> String {
        let mut id = fresh_id();
        while self.position(&id).is_some() {
            id = fresh_id();
        }
        self.0.push(LayerInstance { id: id.clone(), key });
        id
    }

    /// Remove the layer `id`; unknown ids are ignored.
    pub fn remove_layer(&mut self, id: &str) -> bool {
        let n = self.0.len();
        self.0.retain(|layer| layer.id != id);
        n != self.0.len()
    }

    /// Move the layer at `from` to `to`, keeping the relative order of
    /// all others.  Out of range positions leave the array unchanged.
    pub fn reorder(&mut self, from: usize, to: usize) {
        if from >= self.0.len() || to >= self.0.len() {
            debug!(from, to, len = self.0.len(), "ignoring out of range layer move");
            return
        }
        let layer = self.0.remove(from);
        self.0.insert(to, layer);
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.0.iter().position(|layer| layer.id == id)
    }

    pub fn get(&self, id: &str) -> Option<&LayerInstance> {
        self.0.iter().find(|layer| layer.id == id)
    }

    pub fn keys(&self) -> Vec<BandKey> { self.0.iter().map(|layer| layer.key).collect() }

    pub fn len(&self) -> usize { self.0.len() }

    pub fn is_empty(&self) -> bool { self.0.is_empty() }

    pub fn iter(&self) -> std::slice::Iter<'_, LayerInstance> { self.0.iter() }

    pub fn as_slice(&self) -> &[LayerInstance] { &self.0 }
}

impl<'a> IntoIterator for &'a RenderArray {
    type Item = &'a LayerInstance;
    type IntoIter = std::slice::Iter<'a, LayerInstance>;

    fn into_iter(self) -> Self::IntoIter { self.0.iter() }
}

/// The canonical layers of `index`.  This replaces the whole render
/// array: layers added by hand are not kept.
pub fn derive_from_index(index: SpectralIndex, default_layer: BandKey) -> RenderArray {
    use BandKey::*;
    use SpectralIndex as S;
    let keys = match index {
        S::None => vec![default_layer],
        S::Ndvi | S::Evi | S::Savi | S::Msavi | S::Ndsi => vec![VIS, SWIR],
        S::Ndwi => vec![SWIR, MIR],
        S::Btt | S::Olr | S::CloudMask => vec![TIR1, TIR2],
        S::Uth | S::Amv | S::Wvc => vec![WV, TIR1],
        S::Nbr | S::Hillshade => vec![VIS, TIR1],
    };
    RenderArray::from_keys(&keys)
}

/// The band read by each slot of the expression of `index`.  Slots not
/// listed follow the render array order.
pub fn band_roles(index: SpectralIndex) -> Vec<(BandSlot, BandKey)> {
    use BandKey::*;
    use SpectralIndex as S;
    let roles: &[(u8, BandKey)] = match index {
        // B1 blue, B2 red, B3 near infrared
        S::Ndvi | S::Evi | S::Savi | S::Msavi => &[(1, VIS), (2, VIS), (3, SWIR)],
        S::Ndwi => &[(2, SWIR), (3, MIR)],
        S::Nbr => &[(1, VIS), (3, TIR1)],
        S::None | S::Ndsi | S::Hillshade | S::Btt | S::Olr | S::CloudMask
        | S::Uth | S::Amv | S::Wvc => &[],
    };
    roles.iter().map(|&(n, key)| (BandSlot(n), key)).collect()
}

/// Pins binding each role of `index` to the first layer of its band.
/// Roles whose band is not in `layers` stay positional.
pub fn role_pins(index: SpectralIndex, layers: &RenderArray) -> BTreeMap<BandSlot, String> {
    band_roles(index).into_iter()
        .filter_map(|(slot, key)| {
            layers.iter().find(|layer| layer.key == key).map(|layer| (slot, layer.id.clone()))
        })
        .collect()
}

/// Which layer feeds each band slot of an expression.
///
/// Slots follow the render array order (slot 1 is the first layer) unless
/// pinned to a layer id, in which case they follow that layer wherever it
/// is moved.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BandBinding(BTreeMap<BandSlot, LayerInstance>);

impl BandBinding {
    pub fn positional(layers: &RenderArray) -> Self {
        Self::pinned(layers, &BTreeMap::new())
    }

    /// Positional binding overridden by `pins`.  Pins to layers no longer
    /// in `layers` are ignored.
    pub fn pinned(layers: &RenderArray, pins: &BTreeMap<BandSlot, String>) -> Self {
        let mut map: BTreeMap<BandSlot, LayerInstance> = layers.iter().enumerate()
            .filter_map(|(i, layer)| u8::try_from(i + 1).ok().map(|n| (BandSlot(n), layer.clone())))
            .collect();
        for (slot, id) in pins {
            if let Some(layer) = layers.get(id) {
                map.insert(*slot, layer.clone());
            }
        }
        BandBinding(map)
    }

    pub fn get(&self, slot: BandSlot) -> Option<&LayerInstance> { self.0.get(&slot) }

    pub fn len(&self) -> usize { self.0.len() }

    pub fn is_empty(&self) -> bool { self.0.is_empty() }

    /// Fails with the first slot `expr` reads that has no layer.
    pub fn check(&self, expr: &Expression) -> Result<()> {
        match expr.band_slots().into_iter().find(|slot| !self.0.contains_key(slot)) {
            Some(slot) => Err(RampError::UnboundBand(slot)),
            None => Ok(()),
        }
    }

    /// The layers of slots `1 ..= top`, in slot order.
    pub fn layers_up_to(&self, top: u8) -> Result<Vec<&LayerInstance>> {
        (1..=top).map(|n| self.get(BandSlot(n)).ok_or(RampError::UnboundBand(BandSlot(n))))
            .collect()
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use BandKey::*;

    #[test]
    fn add_remove_reorder() {
        let mut layers = RenderArray::from_keys(&[VIS, VIS, TIR1]);
        let wv = layers.add_layer(WV);
        assert_eq!(layers.keys(), vec![VIS, VIS, TIR1, WV]);
        assert!(wv.starts_with("layer-") && wv.len() == 15);

        layers.reorder(3, 0);
        assert_eq!(layers.keys(), vec![WV, VIS, VIS, TIR1]);
        layers.reorder(0, 2);
        assert_eq!(layers.keys(), vec![VIS, VIS, WV, TIR1]);

        layers.reorder(1, 9);
        assert_eq!(layers.keys(), vec![VIS, VIS, WV, TIR1]);

        assert!(layers.remove_layer(&wv));
        assert!(!layers.remove_layer("layer-nothere"));
        assert_eq!(layers.keys(), vec![VIS, VIS, TIR1]);
    }

    #[test]
    fn ids_are_unique() {
        let mut layers = RenderArray::new();
        for _ in 0..200 {
            layers.add_layer(VIS);
        }
        let mut ids: Vec<&str> = layers.iter().map(|l| l.id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 200);
    }

    #[test]
    fn derivation_table() {
        assert_eq!(derive_from_index(SpectralIndex::Ndwi, VIS).keys(), vec![SWIR, MIR]);
        assert_eq!(derive_from_index(SpectralIndex::None, TIR1).keys(), vec![TIR1]);
        assert_eq!(derive_from_index(SpectralIndex::Ndvi, TIR1).keys(), vec![VIS, SWIR]);
        assert_eq!(derive_from_index(SpectralIndex::CloudMask, VIS).keys(), vec![TIR1, TIR2]);
        assert_eq!(derive_from_index(SpectralIndex::Amv, VIS).keys(), vec![WV, TIR1]);
        assert_eq!(derive_from_index(SpectralIndex::Nbr, VIS).keys(), vec![VIS, TIR1]);
    }

    #[test]
    fn roles_bind_every_slot_read() {
        for index in SpectralIndex::ALL {
            let layers = derive_from_index(index, WV);
            let binding = BandBinding::pinned(&layers, &role_pins(index, &layers));
            let (expr, _) = crate::index::expression_for(index);
            assert!(binding.check(&expr).is_ok(), "{index} has an unbound slot");
            for (slot, key) in band_roles(index) {
                assert_eq!(binding.get(slot).map(|l| l.key), Some(key), "{index} {slot}");
            }
        }
        let layers = derive_from_index(SpectralIndex::Ndwi, VIS);
        let binding = BandBinding::pinned(&layers, &role_pins(SpectralIndex::Ndwi, &layers));
        let keys: Vec<BandKey> = binding.layers_up_to(3).unwrap().iter().map(|l| l.key).collect();
        assert_eq!(keys, vec![SWIR, SWIR, MIR]);
    }

    #[test]
    fn roles_without_their_band_stay_positional() {
        let layers = RenderArray::from_keys(&[TIR1, WV]);
        let pins = role_pins(SpectralIndex::Nbr, &layers);
        assert_eq!(pins.len(), 1);
        assert_eq!(pins.get(&BandSlot(3)), Some(&layers.as_slice()[0].id));
    }

    #[test]
    fn pinned_slot_follows_layer() {
        let mut layers = RenderArray::from_keys(&[VIS, SWIR, TIR1]);
        let swir = layers.as_slice()[1].id.clone();
        let pins = BTreeMap::from([(BandSlot(2), swir.clone())]);

        layers.reorder(1, 2);
        let positional = BandBinding::positional(&layers);
        assert_eq!(positional.get(BandSlot(2)).map(|l| l.key), Some(TIR1));
        let binding = BandBinding::pinned(&layers, &pins);
        assert_eq!(binding.get(BandSlot(2)).map(|l| l.key), Some(SWIR));

        layers.remove_layer(&swir);
        let binding = BandBinding::pinned(&layers, &pins);
        assert_eq!(binding.get(BandSlot(2)).map(|l| l.key), Some(TIR1));
    }

    #[test]
    fn unbound_slots_are_reported() {
        let layers = RenderArray::from_keys(&[VIS, SWIR]);
        let binding = BandBinding::positional(&layers);
        let (ndvi, _) = crate::index::expression_for(SpectralIndex::Ndvi);
        assert!(matches!(binding.check(&ndvi), Err(RampError::UnboundBand(BandSlot(3)))));
        assert!(binding.layers_up_to(2).is_ok());
        assert!(binding.layers_up_to(3).is_err());
    }

    #[test]
    fn band_key_names() {
        assert_eq!("swir".parse::<BandKey>().unwrap(), SWIR);
        assert!("nir".parse::<BandKey>().is_err());
        assert_eq!(TIR2.to_string(), "TIR2");
    }
}
