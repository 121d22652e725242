//! Engine configuration.
//!
//! [`Options`] is the user-facing configuration surface and can be read from
//! TOML. [`Context`] is its runtime form: it owns the options and caches the
//! background luminance so that every entity color can be corrected cheaply.

use std::path::Path;

use anyhow::Context as _;
use serde::Deserialize;

use crate::color::{
    Rgb,
    contrast::{CorrectionOptions, correct_with_luminance},
    luminance,
};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct Options {
    /// Swap pure white/black for the opposite on backgrounds that would hide them.
    pub black_white_inversion: bool,
    /// Lighten or darken low-contrast colors.
    pub color_correction: bool,
    /// Background color the entities are drawn on.
    #[serde(alias = "clear_color")]
    pub clear_colour: Rgb,
    // The two fields below are passed through untouched.
    pub file_encoding: String,
    pub retain_parsed_dxf: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            black_white_inversion: true,
            color_correction: false,
            clear_colour: Rgb::WHITE,
            file_encoding: "utf-8".to_string(),
            retain_parsed_dxf: false,
        }
    }
}

impl Options {
    pub fn from_toml_str(source: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(source)
    }

    pub fn correction(&self) -> CorrectionOptions {
        CorrectionOptions {
            black_white_inversion: self.black_white_inversion,
            color_correction: self.color_correction,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Context {
    options: Options,
    background_luminance: f64,
}

impl Context {
    pub fn new(options: Options) -> Self {
        let background_luminance = luminance(options.clear_colour);
        Self {
            options,
            background_luminance,
        }
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read options from {}", path.display()))?;
        let options = Options::from_toml_str(&source)
            .with_context(|| format!("failed to parse options in {}", path.display()))?;
        Ok(Self::new(options))
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn clear_colour(&self) -> Rgb {
        self.options.clear_colour
    }

    /// Change the background. The cached luminance follows.
    pub fn set_clear_colour(&mut self, colour: Rgb) {
        self.options.clear_colour = colour;
        self.background_luminance = luminance(colour);
    }

    pub fn set_black_white_inversion(&mut self, enabled: bool) {
        self.options.black_white_inversion = enabled;
    }

    pub fn set_color_correction(&mut self, enabled: bool) {
        self.options.color_correction = enabled;
    }

    pub fn background_luminance(&self) -> f64 {
        self.background_luminance
    }

    /// Run `color` through the contrast corrector against the current background.
    pub fn correct(&self, color: Rgb) -> Rgb {
        correct_with_luminance(
            color,
            self.options.clear_colour,
            self.background_luminance,
            self.options.correction(),
        )
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new(Options::default())
    }
}

impl From<Options> for Context {
    fn from(options: Options) -> Self {
        Self::new(options)
    }
}
