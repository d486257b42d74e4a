//! Color utility functions shared across the configurator.
//!
//! Markers are matched in 8-bit HSV, the layout most vision libraries use for
//! byte images: hue is stored as degrees / 2 so it fits a byte, saturation and
//! value span the full 0-255 range.

use crate::model::Hsv;

/// Convert an 8-bit RGB pixel to 8-bit HSV.
///
/// # Returns
/// `Hsv` with `h` in 0-179, `s` and `v` in 0-255
pub fn rgb_to_hsv(r: u8, g: u8, b: u8) -> Hsv {
    let rf = f32::from(r);
    let gf = f32::from(g);
    let bf = f32::from(b);

    let max = rf.max(gf).max(bf);
    let min = rf.min(gf).min(bf);
    let delta = max - min;

    let s = if max > 0.0 { delta * 255.0 / max } else { 0.0 };

    let hue_degrees = if delta == 0.0 {
        0.0
    } else if max == rf {
        60.0 * (gf - bf) / delta
    } else if max == gf {
        120.0 + 60.0 * (bf - rf) / delta
    } else {
        240.0 + 60.0 * (rf - gf) / delta
    };
    let hue_degrees = if hue_degrees < 0.0 {
        hue_degrees + 360.0
    } else {
        hue_degrees
    };

    let h = (hue_degrees / 2.0).round() as u16 % 180;

    Hsv::new(h as u8, s.round() as u8, max as u8)
}

/// Convert stored HSV into the units shown to the operator (360/100/100).
pub fn hsv_display_units(hsv: Hsv) -> (u16, u8, u8) {
    (
        u16::from(hsv.h) * 2,
        (u16::from(hsv.s) * 100 / 256) as u8,
        (u16::from(hsv.v) * 100 / 256) as u8,
    )
}
