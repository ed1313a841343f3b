//! Raster geometry of a rendered page.
//!
//! Page bounds arrive in device-independent units of 1/96 inch. The pixel
//! size of the separation rasters is the bounds scaled to the requested
//! resolution and rounded to the nearest pixel.
//!
//! ```rust
//! use inkset_core::RasterGeometry;
//!
//! // US Letter (816 x 1056 units) at 150 dpi
//! let geometry = RasterGeometry::from_page_bounds(816.0, 1056.0, 150.0).unwrap();
//! assert_eq!((geometry.width, geometry.height), (1275, 1650));
//! ```

use crate::{Error, Result};

/// Device-independent units per inch of page bounds.
pub const UNITS_PER_INCH: f64 = 96.0;

/// Pixel dimensions and resolution of a separation raster.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RasterGeometry {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Resolution in pixels per inch.
    pub resolution: f64,
}

impl RasterGeometry {
    /// Geometry with explicit pixel dimensions.
    pub fn new(width: u32, height: u32, resolution: f64) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::invalid_dimensions(width, height, "width and height must be > 0"));
        }
        if !(resolution.is_finite() && resolution > 0.0) {
            return Err(Error::invalid_dimensions(
                width,
                height,
                format!("resolution {resolution} must be positive"),
            ));
        }
        Ok(Self {
            width,
            height,
            resolution,
        })
    }

    /// Geometry of a page whose bounds are given in 1/96 inch units.
    pub fn from_page_bounds(width_units: f64, height_units: f64, resolution: f64) -> Result<Self> {
        let width = units_to_pixels(width_units, resolution)?;
        let height = units_to_pixels(height_units, resolution)?;
        Self::new(width, height, resolution)
    }

    /// Number of pixels per plane.
    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

fn units_to_pixels(units: f64, resolution: f64) -> Result<u32> {
    if !(units.is_finite() && units >= 0.0) {
        return Err(Error::other(format!("page extent {units} must be finite and non-negative")));
    }
    if !(resolution.is_finite() && resolution > 0.0) {
        return Err(Error::other(format!("resolution {resolution} must be positive")));
    }
    let pixels = (units / UNITS_PER_INCH * resolution).round();
    if pixels > u32::MAX as f64 {
        return Err(Error::other(format!("page extent {units} overflows at {resolution} dpi")));
    }
    Ok(pixels as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_letter_at_150() {
        let g = RasterGeometry::from_page_bounds(816.0, 1056.0, 150.0).unwrap();
        assert_eq!(g.width, 1275);
        assert_eq!(g.height, 1650);
        assert_eq!(g.pixel_count(), 1275 * 1650);
        assert_relative_eq!(g.resolution, 150.0);
    }

    #[test]
    fn test_rounds_to_nearest() {
        let g = RasterGeometry::from_page_bounds(100.0, 100.6, 96.0).unwrap();
        assert_eq!(g.width, 100);
        // 100.6 px
        assert_eq!(g.height, 101);
        // 104.17 px
        let g = RasterGeometry::from_page_bounds(100.0, 100.0, 100.0).unwrap();
        assert_eq!(g.width, 104);
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(RasterGeometry::from_page_bounds(816.0, 1056.0, 0.0).is_err());
        assert!(RasterGeometry::from_page_bounds(-1.0, 1056.0, 150.0).is_err());
        assert!(RasterGeometry::from_page_bounds(f64::NAN, 10.0, 150.0).is_err());
        // Rounds to zero pixels
        assert!(RasterGeometry::from_page_bounds(0.1, 10.0, 72.0).is_err());
        assert!(RasterGeometry::new(0, 10, 72.0).is_err());
    }
}
