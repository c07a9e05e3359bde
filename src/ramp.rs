//! Color stops for piecewise-linear color mapping of index values.

use std::fmt;

use rgb::{RGB, RGBA};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::adjust::ColorAdjustment;
use crate::errors::{RampError, Result};
use crate::{ColorRange, ColormapName, RGBColor};

/// Everything the color ramp is computed from.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColormapSettings {
    #[serde(alias = "type")]
    pub palette: ColormapName,
    pub min: f64,
    pub max: f64,
    pub steps: usize,
    pub reverse: bool,
    /// Opacity of the mapped colors, in \[0, 1\].
    pub alpha: f64,
    pub brightness: f64,
    pub contrast: f64,
    pub saturation: f64,
    pub exposure: f64,
    #[serde(alias = "hueshift")]
    pub hue_shift: f64,
}

impl Default for ColormapSettings {
    fn default() -> Self {
        let adj = ColorAdjustment::default();
        Self {
            palette: ColormapName::Viridis,
            min: -1.,
            max: 1.,
            steps: 10,
            reverse: false,
            alpha: 1.,
            brightness: adj.brightness,
            contrast: adj.contrast,
            saturation: adj.saturation,
            exposure: adj.exposure,
            hue_shift: adj.hue_shift,
        }
    }
}

impl ColormapSettings {
    pub fn adjustment(&self) -> ColorAdjustment {
        ColorAdjustment {
            brightness: self.brightness,
            contrast: self.contrast,
            saturation: self.saturation,
            exposure: self.exposure,
            hue_shift: self.hue_shift,
        }
    }

    fn check(&self) -> Result<()> {
        if self.steps < 2 {
            return Err(RampError::InvalidSteps(self.steps))
        }
        if !self.min.is_finite() || !self.max.is_finite() || self.min >= self.max {
            return Err(RampError::InvalidDomain { min: self.min, max: self.max })
        }
        Ok(())
    }
}

/// Fully transparent black, used for values outside the domain.
pub const TRANSPARENT: RGBA<f64> = RGBA { r: 0., g: 0., b: 0., a: 0. };

/// A value and the color it maps to.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorStop {
    pub value: f64,
    /// Components are integers in \[0, 255\], alpha is in \[0, 1\].
    pub color: RGBA<f64>,
}

impl ColorStop {
    pub fn is_transparent(&self) -> bool { self.color.a == 0. }

    /// The color in CSS notation, e.g. `rgba(68, 1, 84, 1)`.
    pub fn css_color(&self) -> String { css_rgba(self.color) }
}

pub fn css_rgba(c: RGBA<f64>) -> String {
    format!("rgba({}, {}, {}, {})", c.r, c.g, c.b, c.a)
}

/// One entry of the flattened stop list (`value, color, value, color, …`)
/// expected by the map host's `interpolate` operator.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FlatStop {
    Value(f64),
    Color(String),
}

/// Ordered color stops with non-decreasing values.  When not empty, the
/// first and last stops are transparent so that values outside the
/// domain are not drawn.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ColorStops(Vec<ColorStop>);

impl ColorStops {
    /// Number of (value, color) pairs.
    pub fn len(&self) -> usize { self.0.len() }

    pub fn is_empty(&self) -> bool { self.0.is_empty() }

    pub fn iter(&self) -> std::slice::Iter<'_, ColorStop> { self.0.iter() }

    pub fn as_slice(&self) -> &[ColorStop] { &self.0 }

    /// The flattened form, of length `2 * self.len()`.
    pub fn to_flat(&self) -> Vec<FlatStop> {
        self.0.iter()
            .flat_map(|s| [FlatStop::Value(s.value), FlatStop::Color(s.css_color())])
            .collect()
    }
}

impl<'a> IntoIterator for &'a ColorStops {
    type Item = &'a ColorStop;
    type IntoIter = std::slice::Iter<'a, ColorStop>;

    fn into_iter(self) -> Self::IntoIter { self.0.iter() }
}

impl fmt::Display for ColorStops {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, s) in self.0.iter().enumerate() {
            if i > 0 { f.write_str(", ")? }
            write!(f, "{}: {}", s.value, s.css_color())?;
        }
        Ok(())
    }
}

/// Compute the color stops of `settings`.
///
/// The palette is sampled at `settings.steps` values evenly spread over
/// `[min, max]` (reversed if asked), each color is adjusted with
/// [`ColormapSettings::adjustment`] and given the opacity `alpha`.  The
/// stops at `min` and `max` are transparent.  The palette
/// [`ColormapName::None`] gives an empty list: no color mapping.
///
/// # Example
///
/// ```
/// use spectral_ramp::{generate_color_stops, ColormapSettings};
/// let stops = generate_color_stops(&ColormapSettings::default()).unwrap();
/// assert_eq!(stops.to_flat().len(), 20);
/// assert!(stops.as_slice()[0].is_transparent());
/// ```
pub fn generate_color_stops(settings: &ColormapSettings) -> Result<ColorStops> {
    let Some(cmap) = RGBA::<f64>::colormap(settings.palette) else {
        return Ok(ColorStops::default())
    };
    settings.check()?;

    let (values, mut colors): (Vec<f64>, Vec<RGBA<f64>>) =
        cmap.range(settings.min, settings.max, settings.steps).unzip();
    if settings.reverse { colors.reverse() }

    let adj = settings.adjustment();
    let alpha = settings.alpha.clamp(0., 1.);
    let last = settings.steps - 1;
    let stops = values.into_iter().zip(colors).enumerate()
        .map(|(k, (value, c))| {
            if k == 0 || k == last {
                ColorStop { value, color: TRANSPARENT }
            } else {
                let RGB { r, g, b } = adj.apply(RGB { r: c.r, g: c.g, b: c.b });
                ColorStop { value,
                            color: RGBA { r: r.round(), g: g.round(), b: b.round(),
                                          a: c.a * alpha } }
            }
        })
        .collect();

    debug!(palette = %settings.palette, steps = settings.steps,
           min = settings.min, max = settings.max, "generated color stops");
    Ok(ColorStops(stops))
}
