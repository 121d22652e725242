//! Contrast correction of entity colors against the background.
//!
//! Two independent switches drive the correction:
//!
//! - `black_white_inversion` swaps pure white for black on light backgrounds
//!   and pure black for white on dark ones
//! - `color_correction` lightens or darkens any color whose contrast ratio
//!   against the background falls below [`MIN_CONTRAST_RATIO`]

use crate::color::{Rgb, contrast_ratio, darken, lighten, luminance};

/// Smallest contrast ratio that is left untouched by [`correct`].
pub const MIN_CONTRAST_RATIO: f64 = 1.5;

/// Background luminance from which pure white is swapped for black.
const LIGHT_BACKGROUND: f64 = 0.8;
/// Background luminance up to which pure black is swapped for white.
const DARK_BACKGROUND: f64 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CorrectionOptions {
    pub black_white_inversion: bool,
    pub color_correction: bool,
}

impl Default for CorrectionOptions {
    fn default() -> Self {
        Self {
            black_white_inversion: true,
            color_correction: false,
        }
    }
}

/// Correct `color` for visibility against `background`.
pub fn correct(color: Rgb, background: Rgb, options: CorrectionOptions) -> Rgb {
    correct_with_luminance(color, background, luminance(background), options)
}

/// Same as [`correct`] with the background luminance already known.
///
/// `Context` caches the background luminance and calls this directly.
pub fn correct_with_luminance(
    color: Rgb,
    background: Rgb,
    background_luminance: f64,
    options: CorrectionOptions,
) -> Rgb {
    if !options.black_white_inversion && !options.color_correction {
        return color;
    }

    if options.black_white_inversion {
        if color == Rgb::WHITE && background_luminance >= LIGHT_BACKGROUND {
            return Rgb::BLACK;
        }
        if color == Rgb::BLACK && background_luminance <= DARK_BACKGROUND {
            return Rgb::WHITE;
        }
    }

    if !options.color_correction {
        return color;
    }

    let ratio = contrast_ratio(color, background);
    let diff = ratio.max(1.0 / ratio);
    if diff >= MIN_CONTRAST_RATIO {
        return color;
    }

    let target = if background_luminance > 0.5 {
        background_luminance / 2.0
    } else {
        background_luminance * 2.0
    };
    let foreground = luminance(color);
    if target > foreground {
        lighten(color, target / foreground)
    } else if target > 0.0 {
        darken(color, foreground / target)
    } else {
        // pure black background: nothing darker is reachable
        color
    }
}
