//! Core color types for color-detector.
//!
//! This module defines the RGB triple read from a frame, its `#rrggbb` hex
//! encoding, and the `Sample` produced by each sampler tick.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Hex shown before the first reading.
pub const INITIAL_HEX: &str = "#000000";

/// Name shown before the first reading.
pub const INITIAL_NAME: &str = "Waiting...";

fn hex_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^#?([0-9a-fA-F]{2})([0-9a-fA-F]{2})([0-9a-fA-F]{2})$")
            .expect("hex pattern is valid")
    })
}

/// An 8-bit RGB triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb {
    /// Create a new RGB triple.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Encode as a lowercase `#rrggbb` string, each channel zero-padded.
    #[must_use]
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Parse a `#rrggbb` (or `rrggbb`) string in either case.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidHex`] if the input is not six hex digits.
    pub fn from_hex(value: &str) -> Result<Self> {
        let caps = hex_pattern()
            .captures(value.trim())
            .ok_or_else(|| Error::invalid_hex(value))?;

        let channel = |i: usize| {
            u8::from_str_radix(&caps[i], 16).map_err(|_| Error::invalid_hex(value))
        };

        Ok(Self::new(channel(1)?, channel(2)?, channel(3)?))
    }

    /// Perceived luminance in `[0, 1]` using Rec. 601 weights.
    #[must_use]
    pub fn luminance(self) -> f64 {
        (0.299 * f64::from(self.r) + 0.587 * f64::from(self.g) + 0.114 * f64::from(self.b))
            / 255.0
    }

    /// Text color (black or white) that stays readable on this background.
    #[must_use]
    pub fn contrast_text(self) -> Rgb {
        if self.luminance() > 0.5 {
            Rgb::new(0, 0, 0)
        } else {
            Rgb::new(255, 255, 255)
        }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Normalize user input to the canonical lowercase `#rrggbb` form.
///
/// # Errors
///
/// Returns [`Error::InvalidHex`] if the input is not a hex color.
pub fn normalize_hex(value: &str) -> Result<String> {
    Rgb::from_hex(value).map(Rgb::to_hex)
}

/// A single color reading.
///
/// Immutable once produced; serialized as `{"hex": "...", "name": "..."}`.
/// Deserializing normalizes the hex, so stored uppercase codes compare equal
/// to fresh readings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "StoredSample")]
pub struct Sample {
    hex: String,
    name: String,
}

#[derive(Deserialize)]
struct StoredSample {
    hex: String,
    name: String,
}

impl TryFrom<StoredSample> for Sample {
    type Error = Error;

    fn try_from(stored: StoredSample) -> Result<Self> {
        Ok(Self {
            hex: normalize_hex(&stored.hex)?,
            name: stored.name,
        })
    }
}

impl Sample {
    /// Create a sample from an RGB reading and its resolved name.
    #[must_use]
    pub fn new(rgb: Rgb, name: impl Into<String>) -> Self {
        Self {
            hex: rgb.to_hex(),
            name: name.into(),
        }
    }

    /// The `#rrggbb` code of this sample.
    #[must_use]
    pub fn hex(&self) -> &str {
        &self.hex
    }

    /// The display name of this sample.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Decode the hex code back into channels.
    ///
    /// # Errors
    ///
    /// Construction and deserialization both validate the hex, so this only
    /// fails on a value that bypassed them.
    pub fn rgb(&self) -> Result<Rgb> {
        Rgb::from_hex(&self.hex)
    }
}

impl Default for Sample {
    fn default() -> Self {
        Self {
            hex: INITIAL_HEX.to_string(),
            name: INITIAL_NAME.to_string(),
        }
    }
}

impl fmt::Display for Sample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.hex, self.name)
    }
}
