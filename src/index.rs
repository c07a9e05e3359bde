//! Spectral indices and their band arithmetic.
//!
//! Band numbers are slots of the active [`BandBinding`](crate::BandBinding):
//! `B1` is whatever layer the binding puts in slot 1.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::errors::RampError;
use crate::expr::Expression::{self, *};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpectralIndex {
    /// Raw band 1, no arithmetic.
    #[default]
    None,
    Ndvi,
    Evi,
    Savi,
    Nbr,
    Msavi,
    Ndwi,
    Ndsi,
    Hillshade,
    /// Brightness temperature.
    Btt,
    /// Outgoing longwave radiation.
    Olr,
    CloudMask,
    /// Upper tropospheric humidity.
    Uth,
    /// Atmospheric motion vectors.
    Amv,
    /// Water vapour content.
    Wvc,
}

impl SpectralIndex {
    pub const ALL: [SpectralIndex; 15] = [
        Self::None, Self::Ndvi, Self::Evi, Self::Savi, Self::Nbr, Self::Msavi,
        Self::Ndwi, Self::Ndsi, Self::Hillshade, Self::Btt, Self::Olr,
        Self::CloudMask, Self::Uth, Self::Amv, Self::Wvc,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Ndvi => "ndvi",
            Self::Evi => "evi",
            Self::Savi => "savi",
            Self::Nbr => "nbr",
            Self::Msavi => "msavi",
            Self::Ndwi => "ndwi",
            Self::Ndsi => "ndsi",
            Self::Hillshade => "hillshade",
            Self::Btt => "btt",
            Self::Olr => "olr",
            Self::CloudMask => "cloudmask",
            Self::Uth => "uth",
            Self::Amv => "amv",
            Self::Wvc => "wvc",
        }
    }

    /// Whether the index computes something from the bands (as opposed to
    /// showing band 1 as is).
    pub fn has_arithmetic(&self) -> bool {
        !matches!(self, Self::None | Self::Ndsi | Self::Btt | Self::Olr | Self::CloudMask
                  | Self::Uth | Self::Amv | Self::Wvc)
    }

    /// The infix label shown next to the index in a selector.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Ndvi => "B3 - B2 / B3 + B2",
            Self::Evi => "2.5 * B3 - B2 / B3 + 6 * B2 + 7.5 * B1 + 1",
            Self::Savi => "1.5 * B3 - B2 / B3 + B2 + 0.5",
            Self::Nbr => "B3 - B1 / B3 + B1",
            Self::Msavi => "0.5 * 2 * B3 + 1 - sqrt(2 * B3 * 2 * B3 - 8 * B3 - B2)",
            Self::Ndwi => "B2 - B3 / B2 + B3",
            Self::Hillshade => "255 * hillshade",
            _ => "B1",
        }
    }
}

impl fmt::Display for SpectralIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for SpectralIndex {
    type Err = RampError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        SpectralIndex::ALL.into_iter()
            .find(|i| i.as_str() == name)
            .ok_or_else(|| RampError::UnknownIndex(s.to_string()))
    }
}

/// Values an index is expected to take.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ValidRange {
    pub min: f64,
    pub max: f64,
}

impl ValidRange {
    pub const fn new(min: f64, max: f64) -> Self { ValidRange { min, max } }

    pub fn contains(&self, x: f64) -> bool { self.min <= x && x <= self.max }
}

fn b(n: u8) -> Expression { Expression::band(n) }

/// The band arithmetic of `index` and the range of its values.
pub fn expression_for(index: SpectralIndex) -> (Expression, ValidRange) {
    let unit = ValidRange::new(-1., 1.);
    match index {
        SpectralIndex::Ndvi => (
            Div(vec![Sub(vec![b(3), b(2)]), Add(vec![b(3), b(2)])]),
            unit),
        SpectralIndex::Evi => (
            Mul(vec![Number(2.5),
                     Div(vec![Sub(vec![b(3), b(2)]),
                              Add(vec![b(3), Mul(vec![Number(6.), b(2)]),
                                       Mul(vec![Number(7.5), b(1)]), Number(1.)])])]),
            unit),
        SpectralIndex::Savi => (
            Mul(vec![Number(1.5),
                     Div(vec![Sub(vec![b(3), b(2)]), Add(vec![b(3), b(2), Number(0.5)])])]),
            ValidRange::new(-1.5, 1.5)),
        SpectralIndex::Nbr => (
            Div(vec![Sub(vec![b(3), b(1)]), Add(vec![b(3), b(1)])]),
            unit),
        // 0.5 * (2*b3 + 1 - sqrt((2*b3)^2 - 8*(b3 - b2)))
        SpectralIndex::Msavi => {
            let two_b3 = || Mul(vec![Number(2.), b(3)]);
            (Mul(vec![Number(0.5),
                      Sub(vec![Add(vec![two_b3(), Number(1.)]),
                               Expression::sqrt(Sub(vec![Mul(vec![two_b3(), two_b3()]),
                                                         Mul(vec![Number(8.), Sub(vec![b(3), b(2)])])]))])]),
             unit)
        }
        SpectralIndex::Ndwi => (
            Div(vec![Sub(vec![b(2), b(3)]), Add(vec![b(2), b(3)])]),
            unit),
        SpectralIndex::Hillshade => (
            Mul(vec![Number(255.), Expression::var("hillshade")]),
            ValidRange::new(0., 255.)),
        SpectralIndex::None | SpectralIndex::Ndsi | SpectralIndex::Btt | SpectralIndex::Olr
        | SpectralIndex::CloudMask | SpectralIndex::Uth | SpectralIndex::Amv
        | SpectralIndex::Wvc => (b(1), ValidRange::new(0., 255.)),
    }
}

/// [`expression_for`] by name.  Unknown names show band 1 as is, like
/// [`SpectralIndex::None`], but are reported.
pub fn expression_for_name(name: &str) -> (Expression, ValidRange) {
    match name.parse::<SpectralIndex>() {
        Ok(index) => {
            if !index.has_arithmetic() && index != SpectralIndex::None {
                debug!(%index, "index has no band arithmetic, showing band 1");
            }
            expression_for(index)
        }
        Err(_) => {
            warn!(name, "unknown spectral index, showing band 1");
            expression_for(SpectralIndex::None)
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_match_expressions() {
        for index in SpectralIndex::ALL {
            let (expr, _) = expression_for(index);
            assert_eq!(expr.to_string(), index.label(), "label of {index}");
        }
    }

    #[test]
    fn ndvi_expression() {
        let (expr, range) = expression_for(SpectralIndex::Ndvi);
        assert_eq!(expr.to_string(), "B3 - B2 / B3 + B2");
        assert_eq!(range, ValidRange::new(-1., 1.));
    }

    #[test]
    fn ranges() {
        assert_eq!(expression_for(SpectralIndex::Savi).1, ValidRange::new(-1.5, 1.5));
        assert_eq!(expression_for(SpectralIndex::None).1, ValidRange::new(0., 255.));
        assert_eq!(expression_for(SpectralIndex::Hillshade).1, ValidRange::new(0., 255.));
        for index in [SpectralIndex::Evi, SpectralIndex::Nbr, SpectralIndex::Msavi, SpectralIndex::Ndwi] {
            assert_eq!(expression_for(index).1, ValidRange::new(-1., 1.));
        }
    }

    #[test]
    fn unknown_name_falls_back_to_band_1() {
        let (expr, range) = expression_for_name("tasseled-cap");
        assert_eq!(expr, Expression::band(1));
        assert_eq!(range, ValidRange::new(0., 255.));
        assert_eq!(expression_for_name("NDWI"), expression_for(SpectralIndex::Ndwi));
        assert!("tasseled-cap".parse::<SpectralIndex>().is_err());
    }

    #[test]
    fn msavi_reads_bands_2_and_3() {
        let (expr, _) = expression_for(SpectralIndex::Msavi);
        let slots: Vec<u8> = expr.band_slots().into_iter().map(|s| s.0).collect();
        assert_eq!(slots, vec![2, 3]);
        assert!(!SpectralIndex::Btt.has_arithmetic());
        assert!(SpectralIndex::Hillshade.has_arithmetic());
    }

    #[test]
    fn names_roundtrip_through_ron() {
        let index: SpectralIndex = ron::from_str("cloudmask").unwrap();
        assert_eq!(index, SpectralIndex::CloudMask);
        assert_eq!(ron::to_string(&SpectralIndex::Ndvi).unwrap(), "ndvi");
    }
}
