//! Tonal adjustments applied to the base colors of a ramp.
//!
//! The stages run in a fixed order (brightness, contrast, saturation,
//! exposure, hue rotation) and each one feeds the next; the result is
//! clamped to \[0, 255\] only at the end.

use rgb::RGB;
use serde::{Deserialize, Serialize};

/// The five adjustment parameters.  [`ColorAdjustment::default`] leaves
/// colors unchanged.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorAdjustment {
    /// Additive shift, as a fraction of 255.
    pub brightness: f64,
    /// Contrast around mid-gray; 0.5 is neutral.
    pub contrast: f64,
    /// Push away from (positive) or toward (negative) gray; 0 is neutral.
    pub saturation: f64,
    /// Exponent of the 1.33 multiplier; 0 is neutral.
    pub exposure: f64,
    /// Hue rotation in degrees.
    pub hue_shift: f64,
}

impl Default for ColorAdjustment {
    fn default() -> Self {
        Self { brightness: 0., contrast: 0.5, saturation: 0., exposure: 0., hue_shift: 0. }
    }
}

impl ColorAdjustment {
    pub fn apply(&self, rgb: RGB<f64>) -> RGB<f64> {
        adjust_color(rgb, self.brightness, self.contrast, self.saturation,
                     self.exposure, self.hue_shift)
    }
}

/// Apply brightness, contrast, saturation, exposure and a hue rotation
/// of `hue_shift` degrees to `rgb` (components in \[0, 255\]).
///
/// # Example
///
/// ```
/// use rgb::RGB;
/// use spectral_ramp::adjust_color;
/// let c = adjust_color(RGB::new(128., 128., 128.), 0., 0.5, 0.5, 0., 0.);
/// assert!((c.r - 128.).abs() < 1e-9);
/// ```
pub fn adjust_color(rgb: RGB<f64>, brightness: f64, contrast: f64,
                    saturation: f64, exposure: f64, hue_shift: f64) -> RGB<f64> {
    let RGB { mut r, mut g, mut b } = rgb;

    let shift = brightness * 255.;
    r += shift;
    g += shift;
    b += shift;

    let contrast = |c: f64| (c - 128.) * contrast * 2. + 128.;
    r = contrast(r);
    g = contrast(g);
    b = contrast(b);

    let gray = 0.3 * r + 0.59 * g + 0.11 * b;
    let k = saturation * 1.33;
    r += (r - gray) * k;
    g += (g - gray) * k;
    b += (b - gray) * k;

    let gain = 1.33_f64.powf(exposure);
    r *= gain;
    g *= gain;
    b *= gain;

    let [rr, gg, bb] = hue_matrix(hue_shift);
    let rotate = |m: [f64; 3]| m[0] * r + m[1] * g + m[2] * b;
    let (r, g, b) = (rotate(rr), rotate(gg), rotate(bb));

    RGB { r: r.clamp(0., 255.), g: g.clamp(0., 255.), b: b.clamp(0., 255.) }
}

/// Rows of the YIQ-style hue rotation matrix for `degrees`.
fn hue_matrix(degrees: f64) -> [[f64; 3]; 3] {
    let (s, c) = degrees.to_radians().sin_cos();
    [
        [0.299 + 0.701 * c + 0.168 * s, 0.587 - 0.587 * c + 0.330 * s, 0.114 - 0.114 * c - 0.497 * s],
        [0.299 - 0.299 * c - 0.328 * s, 0.587 + 0.413 * c + 0.035 * s, 0.114 - 0.114 * c + 0.292 * s],
        [0.299 - 0.299 * c + 1.250 * s, 0.587 - 0.587 * c - 1.050 * s, 0.114 + 0.886 * c - 0.203 * s],
    ]
}


#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: RGB<f64>, b: RGB<f64>) -> bool {
        (a.r - b.r).abs() < 1e-6 && (a.g - b.g).abs() < 1e-6 && (a.b - b.b).abs() < 1e-6
    }

    #[test]
    fn neutral_settings_keep_gray() {
        let gray = RGB::new(128., 128., 128.);
        assert!(close(adjust_color(gray, 0., 0.5, 0.5, 0., 0.), gray));
        assert!(close(ColorAdjustment::default().apply(gray), gray));
    }

    #[test]
    fn default_adjustment_is_identity() {
        let c = RGB::new(33., 144., 141.);
        assert!(close(ColorAdjustment::default().apply(c), c));
    }

    #[test]
    fn brightness_then_clamp() {
        let c = adjust_color(RGB::new(200., 100., 0.), 0.5, 0.5, 0., 0., 0.);
        assert!(close(c, RGB::new(255., 227.5, 127.5)));
        let c = adjust_color(RGB::new(200., 100., 0.), -1., 0.5, 0., 0., 0.);
        assert!(close(c, RGB::new(0., 0., 0.)));
    }

    #[test]
    fn contrast_scales_around_128() {
        let c = adjust_color(RGB::new(64., 128., 192.), 0., 1., 0., 0., 0.);
        assert!(close(c, RGB::new(0., 128., 255.)));
        let c = adjust_color(RGB::new(64., 128., 192.), 0., 0., 0., 0., 0.);
        assert!(close(c, RGB::new(128., 128., 128.)));
    }

    #[test]
    fn exposure_multiplies() {
        let c = adjust_color(RGB::new(100., 50., 10.), 0., 0.5, 0., 1., 0.);
        assert!(close(c, RGB::new(133., 66.5, 13.3)));
    }

    #[test]
    fn saturation_moves_away_from_gray() {
        let c = adjust_color(RGB::new(100., 50., 0.), 0., 0.5, 1., 0., 0.);
        let gray = 0.3 * 100. + 0.59 * 50.;
        assert!((c.r - (100. + (100. - gray) * 1.33)).abs() < 1e-9);
        assert!(c.b == 0.); // clamped
    }

    #[test]
    fn stage_order_matters() {
        // brightness is applied before contrast: (10 + 25.5 - 128) * 2 + 128
        let c = adjust_color(RGB::new(10., 10., 10.), 0.1, 1., 0., 0., 0.);
        assert!((c.r - 0.).abs() < 1e-9);
        let c = adjust_color(RGB::new(100., 100., 100.), 0.1, 1., 0., 0., 0.);
        assert!((c.r - 123.).abs() < 1e-9);
    }

    #[test]
    fn hue_rotation_keeps_gray_and_full_turn() {
        let gray = RGB::new(90., 90., 90.);
        let c = adjust_color(gray, 0., 0.5, 0., 0., 120.);
        assert!((c.r - 90.).abs() < 0.5 && (c.g - 90.).abs() < 0.5 && (c.b - 90.).abs() < 0.5);
        let c = RGB::new(200., 40., 90.);
        assert!(close(adjust_color(c, 0., 0.5, 0., 0., 360.), c));
        assert!(!close(adjust_color(c, 0., 0.5, 0., 0., 90.), c));
    }

    #[test]
    fn hue_rotation_golden() {
        let c = RGB::new(100., 120., 140.);
        assert!(close(adjust_color(c, 0., 0.5, 0., 0., 90.), RGB::new(103.12, 128.58, 86.88)));
        assert!(close(adjust_color(c, 0., 0.5, 0., 0., 180.), RGB::new(132.6, 112.6, 92.6)));
        assert!(close(adjust_color(c, 0., 0.5, 0., 0., 0.), c));
    }
}
