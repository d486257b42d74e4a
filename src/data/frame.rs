//! Frame acquisition and preview generation.
//!
//! The configurator works on a single still frame. Decoding video is left to
//! whatever produces the frame; here a frame is anything that can hand over an
//! RGB pixel buffer.

use std::path::{Path, PathBuf};

use image::imageops::{self, FilterType};
use image::RgbImage;
use thiserror::Error;

use crate::model::{Dimensions, Region};

/// Errors that can occur while acquiring a frame.
#[derive(Error, Debug)]
pub enum FrameError {
    /// The frame could not be decoded
    #[error("Failed to decode frame {path:?}: {source}")]
    Decode {
        /// File that failed to decode
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// The frame has no pixels
    #[error("Frame is empty ({width}x{height})")]
    Empty {
        /// Frame width
        width: u32,
        /// Frame height
        height: u32,
    },
}

/// Source of the frame the operator samples colors from.
pub trait FrameSource {
    /// Retrieve the current frame as full-resolution RGB pixels.
    fn current_frame(&mut self) -> Result<RgbImage, FrameError>;
}

/// Reads a still frame from an image file (PNG, JPEG, BMP, ...).
#[derive(Debug, Clone)]
pub struct ImageFileSource {
    path: PathBuf,
}

impl ImageFileSource {
    /// Create a source reading from `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the frame file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File extensions offered in the file picker.
    pub fn extensions() -> &'static [&'static str] {
        &["png", "jpg", "jpeg", "bmp", "tif", "tiff", "webp"]
    }
}

impl FrameSource for ImageFileSource {
    fn current_frame(&mut self) -> Result<RgbImage, FrameError> {
        let frame = image::open(&self.path)
            .map_err(|source| FrameError::Decode {
                path: self.path.clone(),
                source,
            })?
            .to_rgb8();

        ensure_not_empty(&frame)?;
        log::debug!(
            "Loaded frame {:?} ({}x{})",
            self.path,
            frame.width(),
            frame.height()
        );
        Ok(frame)
    }
}

/// A frame already held in memory.
#[derive(Debug, Clone)]
pub struct StillFrame(pub RgbImage);

impl FrameSource for StillFrame {
    fn current_frame(&mut self) -> Result<RgbImage, FrameError> {
        ensure_not_empty(&self.0)?;
        Ok(self.0.clone())
    }
}

fn ensure_not_empty(frame: &RgbImage) -> Result<(), FrameError> {
    if frame.width() == 0 || frame.height() == 0 {
        return Err(FrameError::Empty {
            width: frame.width(),
            height: frame.height(),
        });
    }
    Ok(())
}

/// Dimensions of an RGB frame.
pub fn frame_dimensions(frame: &RgbImage) -> Dimensions {
    Dimensions::new(frame.width(), frame.height())
}

/// Fit `source` into `max` keeping the aspect ratio.
///
/// The preview fills the full width if the resulting height fits, otherwise it
/// fills the full height. Small frames are scaled up as well.
pub fn fit_preview(source: Dimensions, max: Dimensions) -> Dimensions {
    if source.width == 0 || source.height == 0 {
        return Dimensions::new(1, 1);
    }

    let full_width_height =
        f64::from(max.width) * f64::from(source.height) / f64::from(source.width);

    let (width, height) = if full_width_height <= f64::from(max.height) {
        (max.width, full_width_height as u32)
    } else {
        let full_height_width =
            f64::from(max.height) * f64::from(source.width) / f64::from(source.height);
        (full_height_width as u32, max.height)
    };

    Dimensions::new(width.max(1), height.max(1))
}

/// Produce the preview of `frame` (or of its `crop`) fitted into `max`.
///
/// `crop` is given in source pixels and must lie inside the frame.
pub fn render_preview(frame: &RgbImage, crop: Option<Region>, max: Dimensions) -> RgbImage {
    let cropped;
    let view = match crop.filter(Region::is_valid) {
        Some(region) => {
            cropped = imageops::crop_imm(
                frame,
                region.x.max(0) as u32,
                region.y.max(0) as u32,
                region.width,
                region.height,
            )
            .to_image();
            &cropped
        }
        None => frame,
    };

    let size = fit_preview(frame_dimensions(view), max);
    log::trace!(
        "Preview {}x{} -> {}x{}",
        view.width(),
        view.height(),
        size.width,
        size.height
    );
    imageops::resize(view, size.width, size.height, FilterType::Triangle)
}
