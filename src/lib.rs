//! Color ramps and band arithmetic for spectral-index raster rendering.
//!
//! - [`Colormap`]s sampled through the [`ColorRange`] trait,
//! - [`adjust_color`]: tonal adjustments of a color,
//! - [`generate_color_stops`]: the value → color stops a map host
//!   interpolates over,
//! - [`expression_for`]: band-arithmetic [`Expression`]s of the
//!   [`SpectralIndex`]es,
//! - [`RenderArray`] and [`BandBinding`]: which raster layers feed
//!   which band slot,
//! - [`ViewState`]: all of the above behind a pure reducer, and
//!   [`build_style`] to turn it into the document the map host renders.
//!
//! Available palettes: Matplotlib viridis, plasma, magma and inferno
//! plus jet, rainbow, portland and bone (see [`ColormapName`]).

use std::marker::PhantomData;
use rgb::{RGBA, RGB8, RGBA8};

mod palettes;
use palettes::ty::{PaletteData, PaletteStop};
pub use palettes::ty::{ColormapName, PaletteType};

pub mod errors;
pub mod adjust;
pub mod ramp;
pub mod expr;
pub mod index;
pub mod layers;
pub mod state;
pub mod style;
pub mod config;

pub use errors::{RampError, Result};
pub use adjust::{adjust_color, ColorAdjustment};
pub use ramp::{generate_color_stops, ColorStop, ColorStops, ColormapSettings, FlatStop};
pub use expr::{CmpOp, Expression};
pub use index::{expression_for, expression_for_name, SpectralIndex, ValidRange};
pub use layers::{band_roles, derive_from_index, role_pins, BandBinding, BandKey, BandSlot, LayerInstance, RenderArray};
pub use state::{Action, ViewState};
pub use style::{build_style, BandSource, BandTable, RenderStyle, SourceDescriptor};
pub use config::{load_config, PortalConfig};

/// A “continuous” range of colors parametrized by reals in \[0, 1\].
pub trait ColorRange<Color> {
    /// Returns the color corresponding to `t` ∈ \[0., 1.\].
    fn rgb(&self, t: f64) -> Color;

    /// Return an iterator yielding uniform sampling of `n` points
    /// between `a` and `b` (with the bounds `a` and `b` included in
    /// the list of points) together with colors.  The `k`-th point is
    /// `a + k * (b - a) / (n - 1)`.  It is not required that `a <= b`.
    fn range(self, mut a: f64, mut b: f64, n: usize) -> Range<Self, Color>
    where Self: Sized {
        if a == f64::INFINITY { a = f64::MAX; }
        else if a == f64::NEG_INFINITY { a = f64::MIN };
        if b == f64::NEG_INFINITY { b = f64::MIN; }
        else if b == f64::INFINITY { b = f64::MAX };
        // `a` or `b` NaN will give an iterator yielding NaN.
        if n == 0 {
            Range { range: self,  color: PhantomData,
                    a, b, delta: 0., flast: 0., last: 0,
                    i: 1, j: 0 } // Empty iterator
        } else {
            let flast = (n - 1) as f64;
            Range { range: self,  color: PhantomData,
                    a, b, delta: (b - a) / flast, flast,
                    last: n - 1, i: 0, j: n - 1 }
        }
    }
}

/// An iterator yielding `f64` in a given range together with colors.
pub struct Range<R, Color> {
    range: R,
    color: PhantomData<Color>,
    a: f64, // finite or NaN
    b: f64, // finite or NaN
    delta: f64, // step between two consecutive points
    flast: f64, // `last` as a floating-point number
    last: usize,
    i: usize, // first position to be consumed (i ≤ j)
    j: usize, // last position to be consumed
}

impl<R, Color> Range<R, Color> where R: ColorRange<Color> {
    /// Return the float and RGB color of the position `k` (assuming
    /// it is in the range `0 ..= self.last`).
    fn rgb(&self, k: usize) -> (f64, Color) {
        if k == 0 {
            (self.a, R::rgb(&self.range, 0.))
        } else if k == self.last {
            (self.b, R::rgb(&self.range, 1.))
        } else {
            let t = k as f64 / self.flast;
            let mut x = self.a + k as f64 * self.delta;
            if x.is_infinite() {
                x = (1. - t) * self.a + t * self.b;
            }
            (x, R::rgb(&self.range, t))
        }
    }
}

impl<R, Color> Iterator for Range<R, Color>
where R: ColorRange<Color> {
    type Item = (f64, Color);

    fn next(&mut self) -> Option<Self::Item> {
        if self.i <= self.j {
            let item = self.rgb(self.i);
            self.i += 1;
            Some(item)
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.len();
        (len, Some(len))
    }
}

impl<R, Color> ExactSizeIterator for Range<R, Color>
where R: ColorRange<Color> {
    fn len(&self) -> usize {
        if self.i <= self.j { self.j - self.i + 1 } else { 0 }
    }
}

impl<R, Color> DoubleEndedIterator for Range<R, Color>
where R: ColorRange<Color> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.i <= self.j {
            let item = self.rgb(self.j);
            if self.j == 0 {
                self.i = 1
            } else {
                self.j -= 1;
            }
            Some(item)
        } else {
            None
        }
    }
}

/// Specifies the methods a RGB color encoding must provide.
pub trait RGBColor: Sized {
    /// Return the red, green, blue components of the color (in
    /// \[0, 255\]) and its alpha (in \[0, 1\]).
    fn to_rgba(&self) -> RGBA<f64>;

    /// Create a color from its RGB components (in \[0, 255\]) and
    /// alpha (in \[0, 1\]).
    fn from_rgba(rgba: RGBA<f64>) -> Self;

    /// Return the colormap `name`, or `None` for [`ColormapName::None`].
    ///
    /// # Example
    ///
    /// ```
    /// use rgb::RGB8;
    /// use spectral_ramp::{ColorRange, ColormapName, RGBColor};
    /// let viridis = RGB8::colormap(ColormapName::Viridis).unwrap();
    /// assert_eq!(viridis.rgb(0.), RGB8::new(68, 1, 84));
    /// ```
    fn colormap(name: ColormapName) -> Option<Colormap<Self>> {
        palettes::palette_data(name).map(|palette| Colormap::new(name, palette))
    }
}

impl RGBColor for RGBA<f64> {
    #[inline]
    fn to_rgba(&self) -> RGBA<f64> { *self }

    #[inline]
    fn from_rgba(c: RGBA<f64>) -> Self { c }
}

impl RGBColor for RGB8 {
    #[inline]
    fn to_rgba(&self) -> RGBA<f64> {
        RGBA { r: self.r as f64, g: self.g as f64, b: self.b as f64, a: 1. }
    }

    #[inline]
    fn from_rgba(c: RGBA<f64>) -> Self {
        RGB8 { r: c.r.round() as u8, g: c.g.round() as u8, b: c.b.round() as u8 }
    }
}

impl RGBColor for RGBA8 {
    #[inline]
    fn to_rgba(&self) -> RGBA<f64> {
        RGBA { r: self.r as f64, g: self.g as f64, b: self.b as f64,
               a: self.a as f64 / 255. }
    }

    #[inline]
    fn from_rgba(c: RGBA<f64>) -> Self {
        RGBA8 { r: c.r.round() as u8, g: c.g.round() as u8, b: c.b.round() as u8,
                a: (c.a * 255.).round() as u8 }
    }
}

/// # Colormaps
///
/// A named palette of indexed stops, sampled by linear interpolation
/// between the two stops surrounding `t`.
#[derive(Clone, Copy)]
pub struct Colormap<Color> {
    name: ColormapName,
    palette: &'static PaletteData,
    color: PhantomData<Color>,
}

impl<Color: RGBColor> Colormap<Color> {
    fn new(name: ColormapName, palette: &'static PaletteData) -> Self {
        Self { name, palette, color: PhantomData }
    }

    pub fn name(&self) -> ColormapName { self.name }

    /// Returns the number of stops defining the colormap (at least 2).
    pub fn len(&self) -> usize { self.palette.stops.len() }

    /// Says whether the palette is `Seq`uential or `Div`ergent.
    pub fn typ(&self) -> PaletteType { self.palette.typ }

    /// Returns the colors of the stops defining the colormap.
    pub fn colors(&self) -> Vec<Color> {
        self.palette.stops.iter().map(|s| Color::from_rgba(s.rgb)).collect()
    }
}

fn lerp(a: f64, b: f64, t: f64) -> f64 { a + (b - a) * t }

fn lerp_stops(s0: &PaletteStop, s1: &PaletteStop, t: f64) -> RGBA<f64> {
    let u = (t - s0.t) / (s1.t - s0.t);
    RGBA { r: lerp(s0.rgb.r, s1.rgb.r, u),
           g: lerp(s0.rgb.g, s1.rgb.g, u),
           b: lerp(s0.rgb.b, s1.rgb.b, u),
           a: lerp(s0.rgb.a, s1.rgb.a, u) }
}

impl<Color> ColorRange<Color> for Colormap<Color>
where Color: RGBColor {
    /// Returns the color corresponding to `t` ∈ \[0., 1.\]; `t` is
    /// clamped to that interval.
    fn rgb(&self, t: f64) -> Color {
        let stops = &self.palette.stops;
        let n = stops.len();
        if t <= 0. { return Color::from_rgba(stops[0].rgb) }
        if t >= 1. { return Color::from_rgba(stops[n - 1].rgb) }
        let rgba = stops.windows(2)
            .find(|s| t <= s[1].t)
            .map(|s| lerp_stops(&s[0], &s[1], t))
            .unwrap_or(stops[n - 1].rgb);
        Color::from_rgba(rgba)
    }
}
