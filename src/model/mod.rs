//! Data models for the RoundPen configurator.

mod marker;
mod region;

pub use marker::{BackgroundEntry, Hsv, Marker, SampledColor, is_name_char};
pub use region::{Dimensions, Point, Region, RegionSelector};
