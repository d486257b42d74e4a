//! Pixel sampling for background and marker colors.

use image::RgbImage;

use crate::color_utils::rgb_to_hsv;
use crate::model::{Point, SampledColor};

/// Reads the matching color from the source frame and the swatch color from the preview.
#[derive(Debug, Clone, Copy, Default)]
pub struct ColorSampler;

impl ColorSampler {
    /// Sample both frames.
    ///
    /// Returns None when either point lies outside its frame; the caller treats
    /// that as "nothing sampled" and leaves its state untouched.
    pub fn sample(
        &self,
        source: &RgbImage,
        display: &RgbImage,
        source_point: Point,
        display_point: Point,
    ) -> Option<SampledColor> {
        let display_pixel = pixel_at(display, display_point)?;
        let [r, g, b] = pixel_at(source, source_point)?.0;

        Some(SampledColor::new(rgb_to_hsv(r, g, b), display_pixel))
    }
}

fn pixel_at(frame: &RgbImage, point: Point) -> Option<image::Rgb<u8>> {
    let x = u32::try_from(point.x).ok()?;
    let y = u32::try_from(point.y).ok()?;
    frame.get_pixel_checked(x, y).copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Hsv;
    use image::Rgb;

    #[test]
    fn test_sample_reads_both_frames() {
        let mut source = RgbImage::from_pixel(20, 20, Rgb([0, 0, 0]));
        source.put_pixel(15, 5, Rgb([0, 0, 255]));
        let display = RgbImage::from_pixel(10, 10, Rgb([1, 2, 3]));

        let sample = ColorSampler
            .sample(&source, &display, Point::new(15, 5), Point::new(7, 2))
            .expect("both points are inside");

        assert_eq!(sample.hsv, Hsv::new(120, 255, 255));
        assert_eq!(sample.display, Rgb([1, 2, 3]));
    }

    #[test]
    fn test_sample_outside_display_is_skipped() {
        let source = RgbImage::from_pixel(20, 20, Rgb([9, 9, 9]));
        let display = RgbImage::from_pixel(10, 10, Rgb([9, 9, 9]));

        for p in [Point::new(10, 0), Point::new(0, 10), Point::new(-1, 3)] {
            assert!(
                ColorSampler
                    .sample(&source, &display, Point::new(0, 0), p)
                    .is_none(),
                "{p:?} should not be sampled"
            );
        }
    }

    #[test]
    fn test_sample_outside_source_is_skipped() {
        let source = RgbImage::from_pixel(4, 4, Rgb([9, 9, 9]));
        let display = RgbImage::from_pixel(4, 4, Rgb([9, 9, 9]));
        assert!(
            ColorSampler
                .sample(&source, &display, Point::new(4, 0), Point::new(0, 0))
                .is_none()
        );
    }
}
