//! Marker data model: sampled colors and named markers.

use image::Rgb;
use serde::{Deserialize, Serialize};

use crate::constants::BACKGROUND_LABEL;

/// A color in the sampling color space (8-bit HSV, hue stored as degrees / 2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Hsv {
    pub h: u8,
    pub s: u8,
    pub v: u8,
}

impl Hsv {
    /// Create a new HSV triple.
    pub fn new(h: u8, s: u8, v: u8) -> Self {
        Self { h, s, v }
    }

    /// Channels in persisted order.
    pub fn channels(&self) -> [u8; 3] {
        [self.h, self.s, self.v]
    }
}

impl From<[u8; 3]> for Hsv {
    fn from(channels: [u8; 3]) -> Self {
        let [h, s, v] = channels;
        Self { h, s, v }
    }
}

/// A single pixel sample: the matching color plus the on-screen color used for swatches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampledColor {
    /// Color in the sampling color space
    pub hsv: Hsv,
    /// Color as shown in the preview
    pub display: Rgb<u8>,
}

impl SampledColor {
    /// Create a new sample.
    pub fn new(hsv: Hsv, display: Rgb<u8>) -> Self {
        Self { hsv, display }
    }
}

/// A committed marker with a validated name and a sampled color.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    /// Marker name, never empty
    pub name: String,
    /// Sampled color
    pub color: SampledColor,
}

impl Marker {
    /// Create a new marker.
    pub fn new(name: impl Into<String>, color: SampledColor) -> Self {
        Self {
            name: name.into(),
            color,
        }
    }
}

/// The background color entry. It has no name of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackgroundEntry {
    pub color: SampledColor,
}

impl BackgroundEntry {
    /// Create a new background entry.
    pub fn new(color: SampledColor) -> Self {
        Self { color }
    }

    /// Label used for the background record.
    pub fn label(&self) -> &'static str {
        BACKGROUND_LABEL
    }
}

/// Check whether a character may appear in a marker name.
///
/// Allowed: ASCII letters, digits, space, `_` and `-`.
pub fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == ' ' || c == '_' || c == '-'
}
