//! Frame sources and preview generation.
//!
//! This module provides:
//! - `FrameSource`: the capability the session uses to obtain its still frame
//! - `ImageFileSource` / `StillFrame`: built-in sources
//! - Preview fitting and cropping helpers

mod frame;

pub use frame::{
    FrameError, FrameSource, ImageFileSource, StillFrame, fit_preview, frame_dimensions,
    render_preview,
};
