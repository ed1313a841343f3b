//! Output assembly: merged planes to an interleaved raster.
//!
//! The merged process planes are packed pixel-interleaved, channels in
//! catalog order, at the depth of the input separations. The result is
//! handed row by row to a [`ScanlineSink`], the boundary to whatever codec
//! encodes the proof.
//!
//! # Example
//!
//! ```rust
//! use inkset_core::{BitDepth, ColorantCatalog, RasterGeometry, SeparationBufferSet};
//! use inkset_ops::{assemble, merge, MergeOptions};
//!
//! let catalog = ColorantCatalog::cmyk();
//! let geometry = RasterGeometry::new(3, 2, 72.0).unwrap();
//! let mut separations = SeparationBufferSet::<u8>::allocate(&catalog, &geometry, BitDepth::U8).unwrap();
//! separations.get_mut(3).unwrap().fill(255);
//!
//! let merged = merge(&catalog, &separations, &MergeOptions::default()).unwrap();
//! let image = assemble::interleave(&merged);
//! assert_eq!(image.channels(), 4);
//! assert_eq!(image.pixel(2, 1), &[0, 0, 0, 255]);
//! ```

use inkset_core::{BitDepth, MergedBufferSet, Sample};
use tracing::debug;

use crate::{OpsError, OpsResult};

/// Receiver of interleaved scanlines, top row first.
///
/// Implemented by codec writers outside this crate.
pub trait ScanlineSink<T: Sample> {
    /// Accepts the next row of `channels * width` samples.
    fn write_scanline(&mut self, line: &[T]) -> OpsResult<()>;

    /// Called once after the last row.
    fn finish(&mut self) -> OpsResult<()> {
        Ok(())
    }
}

/// Pixel-interleaved process raster.
#[derive(Debug, Clone, PartialEq)]
pub struct InterleavedImage<T: Sample> {
    width: u32,
    height: u32,
    depth: BitDepth,
    channel_names: Vec<String>,
    data: Vec<T>,
    rows_written: u32,
}

impl<T: Sample> InterleavedImage<T> {
    /// Empty image that collects scanlines as a [`ScanlineSink`].
    pub fn collector(width: u32, height: u32, depth: BitDepth, channel_names: Vec<String>) -> Self {
        let capacity = width as usize * height as usize * channel_names.len();
        Self {
            width,
            height,
            depth,
            channel_names,
            data: Vec::with_capacity(capacity),
            rows_written: 0,
        }
    }

    /// Width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Samples per pixel.
    #[inline]
    pub fn channels(&self) -> usize {
        self.channel_names.len()
    }

    /// Significant bits per sample.
    #[inline]
    pub fn depth(&self) -> BitDepth {
        self.depth
    }

    /// Channel names in sample order.
    #[inline]
    pub fn channel_names(&self) -> &[String] {
        &self.channel_names
    }

    /// Returns `true` once every row is present.
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.rows_written == self.height
    }

    /// Interleaved samples, row-major.
    #[inline]
    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// Consumes the image and returns its samples.
    pub fn into_data(self) -> Vec<T> {
        self.data
    }

    /// Samples of row `y`.
    #[inline]
    pub fn scanline(&self, y: u32) -> &[T] {
        let len = self.width as usize * self.channels();
        let start = y as usize * len;
        &self.data[start..start + len]
    }

    /// Samples of pixel (x, y).
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> &[T] {
        let n = self.channels();
        let start = (y as usize * self.width as usize + x as usize) * n;
        &self.data[start..start + n]
    }
}

impl<T: Sample> ScanlineSink<T> for InterleavedImage<T> {
    fn write_scanline(&mut self, line: &[T]) -> OpsResult<()> {
        let expected = self.width as usize * self.channels();
        if line.len() != expected {
            return Err(OpsError::SizeMismatch(format!(
                "scanline of {} samples, expected {}",
                line.len(),
                expected
            )));
        }
        if self.rows_written >= self.height {
            return Err(OpsError::Sink {
                row: self.rows_written,
                reason: format!("image has only {} rows", self.height),
            });
        }
        self.data.extend_from_slice(line);
        self.rows_written += 1;
        Ok(())
    }

    fn finish(&mut self) -> OpsResult<()> {
        if !self.is_complete() {
            return Err(OpsError::Sink {
                row: self.rows_written,
                reason: format!("finished after {} of {} rows", self.rows_written, self.height),
            });
        }
        Ok(())
    }
}

/// Packs merged planes into one interleaved raster.
pub fn interleave<T: Sample>(merged: &MergedBufferSet<T>) -> InterleavedImage<T> {
    let n = merged.channels();
    let (w, h) = merged.dimensions();
    debug!(width = w, height = h, channels = n, "Interleaving merged planes");

    let mut data = vec![T::zero(); w as usize * h as usize * n];
    #[cfg(feature = "parallel")]
    crate::parallel::interleave_into(merged, &mut data);
    #[cfg(not(feature = "parallel"))]
    for (y, row) in data.chunks_exact_mut(w as usize * n).enumerate() {
        interleave_row(merged, y as u32, row);
    }

    InterleavedImage {
        width: w,
        height: h,
        depth: merged.depth(),
        channel_names: merged.channel_names().to_vec(),
        data,
        rows_written: h,
    }
}

/// Writes the merged planes to `sink`, one interleaved row at a time.
pub fn write_scanlines<T, S>(merged: &MergedBufferSet<T>, sink: &mut S) -> OpsResult<()>
where
    T: Sample,
    S: ScanlineSink<T> + ?Sized,
{
    let mut line = vec![T::zero(); merged.width() as usize * merged.channels()];
    for y in 0..merged.height() {
        interleave_row(merged, y, &mut line);
        sink.write_scanline(&line)?;
    }
    sink.finish()
}

fn interleave_row<T: Sample>(merged: &MergedBufferSet<T>, y: u32, line: &mut [T]) {
    let n = merged.channels();
    for c in 0..n {
        for (x, &s) in merged.row(c, y).iter().enumerate() {
            line[x * n + c] = s;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(n: usize) -> Vec<String> {
        ["Cyan", "Magenta", "Yellow", "Black"][..n].iter().map(|s| s.to_string()).collect()
    }

    fn ramp(width: u32, height: u32) -> MergedBufferSet<u16> {
        let mut merged = MergedBufferSet::new(width, height, BitDepth::U12, names(3)).unwrap();
        for (c, plane) in merged.planes_mut().into_iter().enumerate() {
            for (i, s) in plane.iter_mut().enumerate() {
                *s = (i * 10 + c) as u16;
            }
        }
        merged
    }

    #[test]
    fn test_interleave_order_and_depth() {
        let merged = ramp(4, 2);
        let image = interleave(&merged);
        assert_eq!(image.depth(), BitDepth::U12);
        assert_eq!(image.channel_names(), merged.channel_names());
        assert_eq!(image.pixel(0, 0), &[0, 1, 2]);
        assert_eq!(image.pixel(3, 1), &[70, 71, 72]);
        assert_eq!(image.scanline(1).len(), 12);
        assert!(image.is_complete());
    }

    #[test]
    fn test_scanlines_match_interleave() {
        let merged = ramp(5, 3);
        let mut sink = InterleavedImage::collector(5, 3, BitDepth::U12, names(3));
        write_scanlines(&merged, &mut sink).unwrap();
        assert_eq!(sink, interleave(&merged));
    }

    #[test]
    fn test_collector_rejects_bad_rows() {
        let mut sink = InterleavedImage::<u8>::collector(2, 1, BitDepth::U8, names(2));
        assert!(matches!(sink.write_scanline(&[1, 2, 3]), Err(OpsError::SizeMismatch(_))));
        assert!(matches!(sink.finish(), Err(OpsError::Sink { row: 0, .. })));
        sink.write_scanline(&[1, 2, 3, 4]).unwrap();
        assert!(matches!(sink.write_scanline(&[1, 2, 3, 4]), Err(OpsError::Sink { row: 1, .. })));
        sink.finish().unwrap();
        assert_eq!(sink.into_data(), vec![1, 2, 3, 4]);
    }
}
