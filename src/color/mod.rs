//! Color math on packed 24-bit RGB values.
//!
//! Provides [`Rgb`] together with the perceptual helpers the contrast
//! corrector is built on: sRGB transfer functions, WCAG relative luminance,
//! contrast ratio and HLS conversion. All component math happens on values
//! normalized to `[0, 1]`.

pub mod contrast;

use serde::{Deserialize, Serialize};

/// Opaque RGB color with 8-bit components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "u32", into = "u32")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(0xFF, 0xFF, 0xFF);
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Unpack a `0xRRGGBB` value. Bits above the lower 24 are ignored.
    pub const fn from_packed(rgb: u32) -> Self {
        Self {
            r: ((rgb >> 16) & 0xFF) as u8,
            g: ((rgb >> 8) & 0xFF) as u8,
            b: (rgb & 0xFF) as u8,
        }
    }

    /// Pack into a `0xRRGGBB` value.
    pub const fn to_packed(self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | (self.b as u32)
    }

    /// Components normalized to `[0, 1]`.
    pub fn to_unit(self) -> [f64; 3] {
        [
            f64::from(self.r) / 255.0,
            f64::from(self.g) / 255.0,
            f64::from(self.b) / 255.0,
        ]
    }

    /// Build a color from normalized components, rounding and clamping each one.
    pub fn from_unit(rgb: [f64; 3]) -> Self {
        fn quantize(c: f64) -> u8 {
            (c * 255.0).round().clamp(0.0, 255.0) as u8
        }
        Self::new(quantize(rgb[0]), quantize(rgb[1]), quantize(rgb[2]))
    }

    /// Decode to linear light.
    pub fn to_linear(self) -> [f64; 3] {
        self.to_unit().map(to_linear)
    }

    /// Encode linear light back to sRGB.
    pub fn from_linear(lin: [f64; 3]) -> Self {
        Self::from_unit(lin.map(to_srgb))
    }

    pub fn luminance(self) -> f64 {
        luminance(self)
    }
}

impl From<u32> for Rgb {
    fn from(rgb: u32) -> Self {
        Rgb::from_packed(rgb)
    }
}

impl From<Rgb> for u32 {
    fn from(rgb: Rgb) -> Self {
        rgb.to_packed()
    }
}

impl std::fmt::Display for Rgb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:06X}", self.to_packed())
    }
}

/// sRGB component to linear light.
pub fn to_linear(c: f64) -> f64 {
    if c <= 0.03928 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Linear light component to sRGB.
pub fn to_srgb(c: f64) -> f64 {
    if c < 0.003 {
        c * 12.92
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    }
}

/// WCAG relative luminance: `0.0` for black, `1.0` for white.
pub fn luminance(color: Rgb) -> f64 {
    let [r, g, b] = color.to_linear();
    0.2126 * r + 0.7152 * g + 0.0722 * b
}

/// Contrast ratio of `c1` against `c2`.
///
/// The result is not normalized: it drops below `1.0` when `c1` is the darker
/// color. Callers that need an order-independent value take `max(r, 1 / r)`.
pub fn contrast_ratio(c1: Rgb, c2: Rgb) -> f64 {
    (luminance(c1) + 0.05) / (luminance(c2) + 0.05)
}

/// Convert normalized RGB to `(hue, lightness, saturation)`, each in `[0, 1]`.
pub fn rgb_to_hls(rgb: [f64; 3]) -> (f64, f64, f64) {
    let [r, g, b] = rgb;
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (min + max) / 2.0;
    if max == min {
        return (0.0, l, 0.0);
    }
    let delta = max - min;
    let s = if l <= 0.5 {
        delta / (max + min)
    } else {
        delta / (2.0 - max - min)
    };
    let rc = (max - r) / delta;
    let gc = (max - g) / delta;
    let bc = (max - b) / delta;
    let h = if r == max {
        bc - gc
    } else if g == max {
        2.0 + rc - bc
    } else {
        4.0 + gc - rc
    };
    ((h / 6.0).rem_euclid(1.0), l, s)
}

/// Inverse of [`rgb_to_hls`].
pub fn hls_to_rgb(h: f64, l: f64, s: f64) -> [f64; 3] {
    if s == 0.0 {
        return [l, l, l];
    }
    let m2 = if l <= 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let m1 = 2.0 * l - m2;
    [
        hue_channel(m1, m2, h + 1.0 / 3.0),
        hue_channel(m1, m2, h),
        hue_channel(m1, m2, h - 1.0 / 3.0),
    ]
}

fn hue_channel(m1: f64, m2: f64, hue: f64) -> f64 {
    let hue = hue.rem_euclid(1.0);
    if hue < 1.0 / 6.0 {
        m1 + (m2 - m1) * hue * 6.0
    } else if hue < 0.5 {
        m2
    } else if hue < 2.0 / 3.0 {
        m1 + (m2 - m1) * (2.0 / 3.0 - hue) * 6.0
    } else {
        m1
    }
}

/// Scale HLS lightness by `factor`, clamped to `1.0`.
///
/// An infinite factor saturates the lightness even for black.
pub fn lighten(color: Rgb, factor: f64) -> Rgb {
    let (h, l, s) = rgb_to_hls(color.to_unit());
    let l = if factor.is_infinite() {
        1.0
    } else {
        (l * factor).min(1.0)
    };
    Rgb::from_unit(hls_to_rgb(h, l, s))
}

/// Divide HLS lightness by `factor`. Only the final quantization clamps.
pub fn darken(color: Rgb, factor: f64) -> Rgb {
    let (h, l, s) = rgb_to_hls(color.to_unit());
    Rgb::from_unit(hls_to_rgb(h, l / factor, s))
}
