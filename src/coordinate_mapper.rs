//! Preview-to-source coordinate mapping.
//!
//! The operator clicks on a scaled (and possibly cropped) preview while colors
//! are read from the full-resolution frame. The mapping is fixed once the
//! region step is over, so it is a plain value type.

use crate::model::{Dimensions, Point, Region};

/// Maps display pixels of the preview to pixels of the full-resolution frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateMapper {
    source: Dimensions,
    offset_x: i64,
    offset_y: i64,
    scale_x: f64,
    scale_y: f64,
}

impl CoordinateMapper {
    /// Create a mapper.
    ///
    /// # Arguments
    /// * `source` - Size of the full-resolution frame
    /// * `display` - Size of the preview shown to the operator
    /// * `crop` - Cropped area of the source (in source pixels) that the preview shows,
    ///   or None when the preview shows the whole frame
    pub fn new(source: Dimensions, display: Dimensions, crop: Option<Region>) -> Self {
        let (offset_x, offset_y, view) = match crop.filter(Region::is_valid) {
            Some(region) => (
                i64::from(region.x),
                i64::from(region.y),
                Dimensions::new(region.width, region.height),
            ),
            None => (0, 0, source),
        };

        Self {
            source,
            offset_x,
            offset_y,
            scale_x: ratio(view.width, display.width),
            scale_y: ratio(view.height, display.height),
        }
    }

    /// Identity mapping for a preview that is the source itself.
    pub fn identity(source: Dimensions) -> Self {
        Self::new(source, source, None)
    }

    /// Map a display point into the source frame.
    ///
    /// Points outside the preview are clamped into `[0, width) x [0, height)` of
    /// the source instead of being rejected.
    pub fn to_source(&self, display_point: Point) -> Point {
        let x = self.offset_x + (f64::from(display_point.x) * self.scale_x).floor() as i64;
        let y = self.offset_y + (f64::from(display_point.y) * self.scale_y).floor() as i64;

        Point::new(
            clamp_axis(x, self.source.width),
            clamp_axis(y, self.source.height),
        )
    }

    /// Size of the full-resolution frame.
    pub fn source(&self) -> Dimensions {
        self.source
    }

    /// Horizontal and vertical scale factors (source pixels per display pixel).
    pub fn scale(&self) -> (f64, f64) {
        (self.scale_x, self.scale_y)
    }
}

fn ratio(source: u32, display: u32) -> f64 {
    if display == 0 {
        1.0
    } else {
        f64::from(source) / f64::from(display)
    }
}

fn clamp_axis(value: i64, size: u32) -> i32 {
    let max = i64::from(size.max(1)) - 1;
    value.clamp(0, max) as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_mapping() {
        let mapper = CoordinateMapper::identity(Dimensions::new(640, 480));
        assert_eq!(mapper.to_source(Point::new(12, 34)), Point::new(12, 34));
        assert_eq!(mapper.scale(), (1.0, 1.0));
    }

    #[test]
    fn test_scaled_mapping() {
        // 1920x1080 shown at 960x540
        let mapper = CoordinateMapper::new(
            Dimensions::new(1920, 1080),
            Dimensions::new(960, 540),
            None,
        );
        assert_eq!(mapper.to_source(Point::new(100, 50)), Point::new(200, 100));
        assert_eq!(mapper.to_source(Point::new(959, 539)), Point::new(1918, 1078));
    }

    #[test]
    fn test_crop_offset_applied() {
        let crop = Region {
            x: 400,
            y: 300,
            width: 200,
            height: 100,
        };
        let mapper = CoordinateMapper::new(
            Dimensions::new(1920, 1080),
            Dimensions::new(400, 200),
            Some(crop),
        );
        assert_eq!(mapper.to_source(Point::new(0, 0)), Point::new(400, 300));
        assert_eq!(mapper.to_source(Point::new(100, 100)), Point::new(450, 350));
    }

    #[test]
    fn test_degenerate_crop_is_ignored() {
        let crop = Region {
            x: 10,
            y: 10,
            width: 0,
            height: 50,
        };
        let source = Dimensions::new(100, 100);
        let mapper = CoordinateMapper::new(source, source, Some(crop));
        assert_eq!(mapper, CoordinateMapper::identity(source));
    }

    #[test]
    fn test_out_of_bounds_points_are_clamped() {
        let mapper = CoordinateMapper::new(
            Dimensions::new(100, 50),
            Dimensions::new(200, 100),
            None,
        );
        assert_eq!(mapper.to_source(Point::new(-20, -1)), Point::new(0, 0));
        assert_eq!(mapper.to_source(Point::new(5000, 5000)), Point::new(99, 49));
    }

    #[test]
    fn test_every_display_point_maps_inside_source() {
        let source = Dimensions::new(37, 23);
        let display = Dimensions::new(50, 40);
        let crops = [
            None,
            Some(Region {
                x: 5,
                y: 3,
                width: 30,
                height: 20,
            }),
            Some(Region {
                x: 30,
                y: 20,
                width: 7,
                height: 3,
            }),
        ];

        for crop in crops {
            let mapper = CoordinateMapper::new(source, display, crop);
            for y in -5..(display.height as i32 + 5) {
                for x in -5..(display.width as i32 + 5) {
                    let p = mapper.to_source(Point::new(x, y));
                    assert!(
                        source.contains(p),
                        "({x}, {y}) mapped outside the source to {p:?} with crop {crop:?}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_mapping_is_deterministic() {
        let mapper = CoordinateMapper::new(
            Dimensions::new(1000, 700),
            Dimensions::new(333, 233),
            None,
        );
        let p = Point::new(123, 45);
        assert_eq!(mapper.to_source(p), mapper.to_source(p));
    }
}
