//! Subtractive overprint compositing in normalized coverage space.
//!
//! A spot ink printed over the process plates behaves like a
//! semi-transparent layer glazed on top: on each process channel it adds
//! coverage through the screen operator
//!
//! ```text
//! screen(a, b) = 1 - (1 - a) * (1 - b)
//! ```
//!
//! where `a` is the spot's contribution to that channel
//! (`representation[c] * coverage`) and `b` is the coverage accumulated so
//! far. For inputs in `[0, 1]` the result stays in `[0, 1]` and never falls
//! below `b`.
//!
//! # Example
//!
//! ```rust
//! use inkset_ops::composite::{overprint_pixel, screen};
//!
//! assert_eq!(screen(0.0, 0.25), 0.25);
//! assert_eq!(screen(1.0, 0.25), 1.0);
//!
//! // Orange spot at 50% over a pixel with 20% cyan
//! let mut value = [0.2, 0.0, 0.0, 0.0];
//! overprint_pixel(&mut value, &[0.0, 0.6, 1.0, 0.0], 0.5);
//! assert!((value[1] - 0.3).abs() < 1e-6);
//! assert!((value[2] - 0.5).abs() < 1e-6);
//! ```

use inkset_core::BitDepth;

/// Screen composite of two coverages.
#[inline]
pub fn screen(a: f32, b: f32) -> f32 {
    1.0 - (1.0 - a) * (1.0 - b)
}

/// Lays one spot pass over a single channel value.
///
/// `weight` is the spot's representation component for this channel and
/// `coverage` the spot's normalized coverage at this pixel.
#[inline]
pub fn overprint(value: f32, weight: f32, coverage: f32) -> f32 {
    let out = screen(weight * coverage, value);
    debug_assert!(
        (0.0..=1.0).contains(&out),
        "overprint left [0, 1]: value={value} weight={weight} coverage={coverage} -> {out}"
    );
    out
}

/// Lays one spot pass over every channel of a pixel.
#[inline]
pub fn overprint_pixel(values: &mut [f32], representation: &[f32], coverage: f32) {
    debug_assert_eq!(values.len(), representation.len());
    for (value, &weight) in values.iter_mut().zip(representation) {
        *value = overprint(*value, weight, coverage);
    }
}

/// Conversion between integer samples and normalized coverage.
///
/// Samples normalize as `sample * (1 / max)`; coverage rounds back half-up
/// as `floor(v * max + 0.5)`, clamped to `[0, max]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quantizer {
    max: u32,
    scale: f32,
    inv_scale: f32,
}

impl Quantizer {
    /// Quantizer for a bit depth.
    pub fn new(depth: BitDepth) -> Self {
        Self {
            max: depth.max_value(),
            scale: depth.scale(),
            inv_scale: depth.inv_scale(),
        }
    }

    /// Largest sample value.
    #[inline]
    pub fn max(&self) -> u32 {
        self.max
    }

    /// Sample to coverage. Samples above the maximum read as solid.
    #[inline]
    pub fn normalize(&self, sample: u32) -> f32 {
        sample.min(self.max) as f32 * self.inv_scale
    }

    /// Coverage to sample, round half up.
    #[inline]
    pub fn quantize(&self, value: f32) -> u32 {
        // The clamp only absorbs rounding overshoot at 1.0.
        (value * self.scale + 0.5).floor().clamp(0.0, self.scale) as u32
    }

    /// Rounds coverage to the nearest representable sample.
    #[inline]
    pub fn requantize(&self, value: f32) -> f32 {
        self.normalize(self.quantize(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_screen_identities() {
        for b in [0.0, 0.1, 0.5, 0.9, 1.0] {
            assert_relative_eq!(screen(0.0, b), b);
            assert_relative_eq!(screen(1.0, b), 1.0);
        }
        assert_relative_eq!(screen(0.5, 0.5), 0.75);
    }

    #[test]
    fn test_overprint_monotonic() {
        let mut value = 0.0;
        for step in 0..20 {
            let next = overprint(value, 0.3, step as f32 / 19.0);
            assert!(next >= value);
            assert!(next <= 1.0);
            value = next;
        }
    }

    #[test]
    fn test_overprint_pixel_per_channel() {
        let mut px = [0.0, 0.5, 1.0];
        overprint_pixel(&mut px, &[1.0, 0.5, 0.0], 1.0);
        assert_relative_eq!(px[0], 1.0);
        assert_relative_eq!(px[1], 0.75);
        assert_relative_eq!(px[2], 1.0);
    }

    #[test]
    fn test_quantizer_8bit() {
        let q = Quantizer::new(BitDepth::U8);
        assert_eq!(q.max(), 255);
        assert_eq!(q.normalize(0), 0.0);
        assert_eq!(q.normalize(255), 1.0);
        assert_eq!(q.quantize(0.5), 128);
        assert_eq!(q.quantize(1.0), 255);
        assert_eq!(q.quantize(1.0001), 255);
        assert_eq!(q.quantize(0.0), 0);
        for s in 0..=255 {
            assert_eq!(q.quantize(q.normalize(s)), s);
        }
    }

    #[test]
    fn test_quantizer_wide() {
        let q = Quantizer::new(BitDepth::U10);
        assert_eq!(q.quantize(1.0), 1023);
        assert_eq!(q.normalize(4000), 1.0);
        for s in (0..=1023).step_by(7) {
            assert_eq!(q.quantize(q.normalize(s)), s);
        }
        let q = Quantizer::new(BitDepth::U16);
        assert_eq!(q.quantize(0.5), 32768);
    }
}
