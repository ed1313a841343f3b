//! Separation and merged raster buffers.
//!
//! This module provides the raster containers exchanged with the renderer
//! and the codec:
//! - [`SeparationBuffer`] - One single-channel plane as written by the renderer
//! - [`SeparationBufferSet`] - All planes of a page, process first then spots
//! - [`MergedBufferSet`] - Process-only planes produced by the merge
//!
//! # Memory Layout
//!
//! A separation plane is addressed through a [`PlaneLayout`]. Strides are
//! counted in samples, not bytes:
//!
//! ```text
//! index(x, y) = offset + y * row_stride + x * pixel_stride
//! ```
//!
//! Renderers usually write tightly packed planes (`pixel_stride = 1`,
//! `row_stride = width`), but padded rows and planes embedded in an
//! interleaved frame are both accepted. Slack samples are never read.
//!
//! Merged planes are always tightly packed, row-major, top-to-bottom.
//!
//! # Usage
//!
//! ```rust
//! use inkset_core::{BitDepth, ColorantCatalog, RasterGeometry, SeparationBufferSet};
//!
//! let mut catalog = ColorantCatalog::cmyk();
//! catalog.add_spot("Orange", vec![0.0, 0.6, 1.0, 0.0]).unwrap();
//!
//! let geometry = RasterGeometry::new(64, 32, 150.0).unwrap();
//! let mut set = SeparationBufferSet::<u8>::allocate(&catalog, &geometry, BitDepth::U8).unwrap();
//! assert_eq!(set.len(), 5);
//!
//! // The renderer fills each plane in catalog order.
//! set.get_mut(4).unwrap().set_sample(10, 10, 255);
//! assert_eq!(set.get(4).unwrap().sample(10, 10), 255);
//! ```

use crate::{BitDepth, ColorantCatalog, Error, RasterGeometry, Result, Sample};

/// Addressing of one plane inside its sample storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlaneLayout {
    /// Index of the sample at (0, 0).
    pub offset: usize,
    /// Samples between the starts of consecutive rows.
    pub row_stride: usize,
    /// Samples between consecutive pixels of a row.
    pub pixel_stride: usize,
}

impl PlaneLayout {
    /// Tightly packed plane of the given width.
    #[inline]
    pub fn packed(width: u32) -> Self {
        Self {
            offset: 0,
            row_stride: width as usize,
            pixel_stride: 1,
        }
    }

    /// Packed pixels with padded rows.
    #[inline]
    pub fn with_row_stride(row_stride: usize) -> Self {
        Self {
            offset: 0,
            row_stride,
            pixel_stride: 1,
        }
    }

    /// Channel `channel` of a pixel-interleaved frame with `channels` samples per pixel.
    #[inline]
    pub fn interleaved(width: u32, channels: usize, channel: usize) -> Self {
        Self {
            offset: channel,
            row_stride: width as usize * channels,
            pixel_stride: channels,
        }
    }

    /// Number of samples one row spans, from its first to its last pixel.
    #[inline]
    fn row_span(&self, width: u32) -> usize {
        (width as usize - 1) * self.pixel_stride + 1
    }

    /// Checks the layout against the plane dimensions and storage length.
    pub fn validate(&self, width: u32, height: u32, len: usize) -> Result<()> {
        if width == 0 || height == 0 {
            return Err(Error::invalid_dimensions(width, height, "width and height must be > 0"));
        }
        let invalid_stride = || Error::InvalidStride {
            row_stride: self.row_stride,
            pixel_stride: self.pixel_stride,
            width,
        };
        if self.pixel_stride == 0 {
            return Err(invalid_stride());
        }
        let span = (width as usize - 1)
            .checked_mul(self.pixel_stride)
            .and_then(|v| v.checked_add(1))
            .ok_or_else(invalid_stride)?;
        if self.row_stride < span {
            return Err(invalid_stride());
        }
        let required = (height as usize - 1)
            .checked_mul(self.row_stride)
            .and_then(|v| v.checked_add(span))
            .and_then(|v| v.checked_add(self.offset))
            .ok_or_else(|| Error::invalid_dimensions(width, height, "layout overflows usize"))?;
        if len < required {
            return Err(Error::BufferTooSmall { required, got: len });
        }
        Ok(())
    }
}

/// One row of a separation plane.
#[derive(Debug, Clone, Copy)]
pub struct Row<'a, T: Sample> {
    samples: &'a [T],
    pixel_stride: usize,
}

impl<T: Sample> Row<'_, T> {
    /// Sample at column `x`.
    #[inline]
    pub fn get(&self, x: usize) -> T {
        self.samples[x * self.pixel_stride]
    }
}

/// A single-channel separation plane.
///
/// Each sample encodes the ink coverage of one colorant at one pixel,
/// `0..=depth.max_value()` mapping linearly onto `0.0..=1.0`.
#[derive(Debug, Clone, PartialEq)]
pub struct SeparationBuffer<T: Sample> {
    width: u32,
    height: u32,
    depth: BitDepth,
    layout: PlaneLayout,
    data: Vec<T>,
}

impl<T: Sample> SeparationBuffer<T> {
    /// Creates a zeroed, tightly packed plane.
    pub fn new(width: u32, height: u32, depth: BitDepth) -> Result<Self> {
        let len = (width as usize)
            .checked_mul(height as usize)
            .ok_or_else(|| Error::invalid_dimensions(width, height, "pixel count overflows usize"))?;
        Self::with_layout(width, height, depth, PlaneLayout::packed(width), vec![T::zero(); len])
    }

    /// Creates a tightly packed plane with every sample set to `value`.
    pub fn filled(width: u32, height: u32, depth: BitDepth, value: T) -> Result<Self> {
        let mut buffer = Self::new(width, height, depth)?;
        buffer.data.fill(value);
        Ok(buffer)
    }

    /// Wraps tightly packed renderer output.
    pub fn from_data(width: u32, height: u32, depth: BitDepth, data: Vec<T>) -> Result<Self> {
        Self::with_layout(width, height, depth, PlaneLayout::packed(width), data)
    }

    /// Wraps renderer output with an explicit layout.
    ///
    /// # Errors
    ///
    /// - [`Error::UnsupportedDepth`] if `depth` does not fit `T`
    /// - [`Error::InvalidStride`] / [`Error::BufferTooSmall`] if the layout
    ///   cannot address every pixel inside `data`
    pub fn with_layout(
        width: u32,
        height: u32,
        depth: BitDepth,
        layout: PlaneLayout,
        data: Vec<T>,
    ) -> Result<Self> {
        if !depth.fits::<T>() {
            return Err(Error::UnsupportedDepth {
                depth,
                storage_bits: T::BITS,
            });
        }
        layout.validate(width, height, data.len())?;
        Ok(Self {
            width,
            height,
            depth,
            layout,
            data,
        })
    }

    /// Plane width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Plane height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns (width, height).
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Significant bits per sample.
    #[inline]
    pub fn depth(&self) -> BitDepth {
        self.depth
    }

    /// Sample addressing.
    #[inline]
    pub fn layout(&self) -> PlaneLayout {
        self.layout
    }

    /// Samples between row starts.
    #[inline]
    pub fn row_stride(&self) -> usize {
        self.layout.row_stride
    }

    /// Raw sample storage, including any slack.
    #[inline]
    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// Mutable raw storage for the renderer to fill.
    #[inline]
    pub fn data_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Consumes the plane and returns its storage.
    pub fn into_data(self) -> Vec<T> {
        self.data
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        self.layout.offset + y as usize * self.layout.row_stride + x as usize * self.layout.pixel_stride
    }

    /// Sample at (x, y).
    ///
    /// # Panics
    ///
    /// Panics if (x, y) is out of bounds, including positions that fall
    /// inside row padding.
    #[inline]
    pub fn sample(&self, x: u32, y: u32) -> T {
        assert!(x < self.width && y < self.height, "sample ({x}, {y}) out of bounds");
        self.data[self.index(x, y)]
    }

    /// Sets the sample at (x, y).
    ///
    /// # Panics
    ///
    /// Panics if (x, y) is out of bounds.
    #[inline]
    pub fn set_sample(&mut self, x: u32, y: u32, value: T) {
        assert!(x < self.width && y < self.height, "sample ({x}, {y}) out of bounds");
        let index = self.index(x, y);
        self.data[index] = value;
    }

    /// Sets every addressed sample to `value`, leaving slack untouched.
    pub fn fill(&mut self, value: T) {
        for y in 0..self.height {
            for x in 0..self.width {
                self.set_sample(x, y, value);
            }
        }
    }

    /// Row `y` for sequential reads.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    #[inline]
    pub fn row(&self, y: u32) -> Row<'_, T> {
        assert!(y < self.height, "row {y} out of bounds");
        let start = self.layout.offset + y as usize * self.layout.row_stride;
        let end = start + self.layout.row_span(self.width);
        Row {
            samples: &self.data[start..end],
            pixel_stride: self.layout.pixel_stride,
        }
    }
}

/// Separation planes of one page: process channels first, then spots.
///
/// All planes share width, height and depth. Row strides may differ.
#[derive(Debug, Clone, PartialEq)]
pub struct SeparationBufferSet<T: Sample> {
    width: u32,
    height: u32,
    depth: BitDepth,
    buffers: Vec<SeparationBuffer<T>>,
}

impl<T: Sample> SeparationBufferSet<T> {
    /// Groups planes into a set, checking they agree on size and depth.
    pub fn new(buffers: Vec<SeparationBuffer<T>>) -> Result<Self> {
        let first = buffers
            .first()
            .ok_or_else(|| Error::other("separation set needs at least one buffer"))?;
        let (width, height, depth) = (first.width, first.height, first.depth);
        for buffer in &buffers[1..] {
            if buffer.dimensions() != (width, height) {
                return Err(Error::dimension_mismatch((width, height), buffer.dimensions()));
            }
            if buffer.depth != depth {
                return Err(Error::DepthMismatch {
                    expected: depth,
                    got: buffer.depth,
                });
            }
        }
        Ok(Self {
            width,
            height,
            depth,
            buffers,
        })
    }

    /// Allocates one zeroed, tightly packed plane per catalog entry.
    pub fn allocate(catalog: &ColorantCatalog, geometry: &RasterGeometry, depth: BitDepth) -> Result<Self> {
        let buffers = (0..catalog.len())
            .map(|_| SeparationBuffer::new(geometry.width, geometry.height, depth))
            .collect::<Result<Vec<_>>>()?;
        Self::new(buffers)
    }

    /// Width shared by every plane.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height shared by every plane.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns (width, height).
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Depth shared by every plane.
    #[inline]
    pub fn depth(&self) -> BitDepth {
        self.depth
    }

    /// Number of planes.
    #[inline]
    pub fn len(&self) -> usize {
        self.buffers.len()
    }

    /// Always `false`: a set holds at least one plane.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buffers.is_empty()
    }

    /// All planes in catalog order.
    #[inline]
    pub fn buffers(&self) -> &[SeparationBuffer<T>] {
        &self.buffers
    }

    /// Plane at a catalog index.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&SeparationBuffer<T>> {
        self.buffers.get(index)
    }

    /// Mutable plane at a catalog index.
    ///
    /// The plane's dimensions and depth cannot change through this
    /// reference, only its samples.
    #[inline]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut SeparationBuffer<T>> {
        self.buffers.get_mut(index)
    }

    /// Plane of a named colorant.
    pub fn by_name(&self, catalog: &ColorantCatalog, name: &str) -> Result<&SeparationBuffer<T>> {
        let index = catalog.require(name)?;
        self.buffers
            .get(index)
            .ok_or_else(|| Error::other(format!("no separation for '{name}' at index {index}")))
    }
}

/// Process-only planes produced by merging spots.
///
/// Planes are tightly packed and named after the process colorants.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedBufferSet<T: Sample> {
    width: u32,
    height: u32,
    depth: BitDepth,
    names: Vec<String>,
    planes: Vec<Vec<T>>,
}

impl<T: Sample> MergedBufferSet<T> {
    /// Allocates zeroed planes, one per name.
    pub fn new(width: u32, height: u32, depth: BitDepth, names: Vec<String>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::invalid_dimensions(width, height, "width and height must be > 0"));
        }
        if !depth.fits::<T>() {
            return Err(Error::UnsupportedDepth {
                depth,
                storage_bits: T::BITS,
            });
        }
        let len = (width as usize)
            .checked_mul(height as usize)
            .ok_or_else(|| Error::invalid_dimensions(width, height, "pixel count overflows usize"))?;
        let planes = names.iter().map(|_| vec![T::zero(); len]).collect();
        Ok(Self {
            width,
            height,
            depth,
            names,
            planes,
        })
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

    /// Returns (width, height).
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Significant bits per sample.
    #[inline]
    pub fn depth(&self) -> BitDepth {
        self.depth
    }

    /// Number of process channels.
    #[inline]
    pub fn channels(&self) -> usize {
        self.planes.len()
    }

    /// Process colorant names in channel order.
    #[inline]
    pub fn channel_names(&self) -> &[String] {
        &self.names
    }

    /// Channel index of a process colorant.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    /// Plane of channel `c`.
    #[inline]
    pub fn plane(&self, c: usize) -> &[T] {
        &self.planes[c]
    }

    /// Mutable plane slices, one per channel.
    pub fn planes_mut(&mut self) -> Vec<&mut [T]> {
        self.planes.iter_mut().map(|p| p.as_mut_slice()).collect()
    }

    /// Row `y` of channel `c`.
    #[inline]
    pub fn row(&self, c: usize, y: u32) -> &[T] {
        debug_assert!(y < self.height, "row out of bounds");
        let w = self.width as usize;
        let start = y as usize * w;
        &self.planes[c][start..start + w]
    }

    /// Sample of channel `c` at (x, y).
    #[inline]
    pub fn sample(&self, c: usize, x: u32, y: u32) -> T {
        assert!(x < self.width && y < self.height, "sample ({x}, {y}) out of bounds");
        self.planes[c][y as usize * self.width as usize + x as usize]
    }

    /// Consumes the set and returns its planes in channel order.
    pub fn into_planes(self) -> Vec<Vec<T>> {
        self.planes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_packed_plane() {
        let mut buf: SeparationBuffer<u8> = SeparationBuffer::new(8, 4, BitDepth::U8).unwrap();
        assert_eq!(buf.dimensions(), (8, 4));
        assert_eq!(buf.row_stride(), 8);
        buf.set_sample(7, 3, 200);
        assert_eq!(buf.sample(7, 3), 200);
        assert_eq!(buf.data()[31], 200);
        assert_eq!(buf.row(3).get(7), 200);
    }

    #[test]
    fn test_padded_rows() {
        // 3x2 plane with 2 slack samples per row
        let data = vec![1u8, 2, 3, 99, 99, 4, 5, 6, 99, 99];
        let buf = SeparationBuffer::with_layout(3, 2, BitDepth::U8, PlaneLayout::with_row_stride(5), data)
            .unwrap();
        assert_eq!(buf.sample(0, 1), 4);
        assert_eq!(buf.sample(2, 1), 6);
        assert_eq!(buf.row(0).get(2), 3);
    }

    #[test]
    fn test_last_row_without_slack() {
        // Final row may end at the last pixel
        let data = vec![1u8, 2, 3, 99, 4, 5, 6];
        let buf = SeparationBuffer::with_layout(3, 2, BitDepth::U8, PlaneLayout::with_row_stride(4), data)
            .unwrap();
        assert_eq!(buf.sample(2, 1), 6);
    }

    #[test]
    fn test_interleaved_frame() {
        // 2x1 frame, 3 samples per pixel
        let frame = vec![10u8, 20, 30, 11, 21, 31];
        let buf = SeparationBuffer::with_layout(2, 1, BitDepth::U8, PlaneLayout::interleaved(2, 3, 1), frame)
            .unwrap();
        assert_eq!(buf.sample(0, 0), 20);
        assert_eq!(buf.sample(1, 0), 21);
    }

    #[test]
    fn test_invalid_layouts() {
        let short = SeparationBuffer::<u8>::with_layout(4, 4, BitDepth::U8, PlaneLayout::packed(4), vec![0; 15]);
        assert!(matches!(short, Err(Error::BufferTooSmall { required: 16, got: 15 })));

        let narrow =
            SeparationBuffer::<u8>::with_layout(4, 4, BitDepth::U8, PlaneLayout::with_row_stride(3), vec![0; 64]);
        assert!(matches!(narrow, Err(Error::InvalidStride { .. })));

        let zero_px = PlaneLayout {
            offset: 0,
            row_stride: 4,
            pixel_stride: 0,
        };
        assert!(SeparationBuffer::<u8>::with_layout(4, 4, BitDepth::U8, zero_px, vec![0; 16]).is_err());
        assert!(SeparationBuffer::<u8>::new(0, 4, BitDepth::U8).is_err());
    }

    #[test]
    fn test_depth_must_fit_storage() {
        let err = SeparationBuffer::<u8>::new(4, 4, BitDepth::U16).unwrap_err();
        assert!(matches!(err, Error::UnsupportedDepth { storage_bits: 8, .. }));
        assert!(SeparationBuffer::<u16>::new(4, 4, BitDepth::U10).is_ok());
    }

    #[test]
    fn test_set_requires_uniform_size() {
        let a = SeparationBuffer::<u8>::new(4, 4, BitDepth::U8).unwrap();
        let b = SeparationBuffer::<u8>::new(4, 5, BitDepth::U8).unwrap();
        let err = SeparationBufferSet::new(vec![a.clone(), b]).unwrap_err();
        assert!(matches!(err, Error::DimensionMismatch { .. }));

        // Strides may differ
        let c = SeparationBuffer::with_layout(4, 4, BitDepth::U8, PlaneLayout::with_row_stride(8), vec![0u8; 32])
            .unwrap();
        assert!(SeparationBufferSet::new(vec![a, c]).is_ok());
        assert!(SeparationBufferSet::<u8>::new(Vec::new()).is_err());
    }

    #[test]
    fn test_set_requires_uniform_depth() {
        let a = SeparationBuffer::<u16>::new(4, 4, BitDepth::U10).unwrap();
        let b = SeparationBuffer::<u16>::new(4, 4, BitDepth::U16).unwrap();
        let err = SeparationBufferSet::new(vec![a, b]).unwrap_err();
        assert!(matches!(
            err,
            Error::DepthMismatch {
                expected: BitDepth::U10,
                got: BitDepth::U16
            }
        ));
        assert!(err.is_layout_error());
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn test_sample_never_reads_row_padding() {
        let buf = SeparationBuffer::with_layout(3, 2, BitDepth::U8, PlaneLayout::with_row_stride(6), vec![7u8; 12])
            .unwrap();
        // Column 4 lies inside the padding of row 0
        buf.sample(4, 0);
    }

    #[test]
    fn test_by_name() {
        let mut catalog = ColorantCatalog::cmyk();
        catalog.add_spot("Orange", vec![0.0, 0.6, 1.0, 0.0]).unwrap();
        let geometry = RasterGeometry::new(2, 2, 72.0).unwrap();
        let mut set = SeparationBufferSet::<u8>::allocate(&catalog, &geometry, BitDepth::U8).unwrap();
        set.get_mut(4).unwrap().fill(9);
        assert_eq!(set.by_name(&catalog, "Orange").unwrap().sample(1, 1), 9);
        assert!(set.by_name(&catalog, "Gold").is_err());
    }

    #[test]
    fn test_merged_set() {
        let names = vec!["Cyan".to_string(), "Magenta".to_string()];
        let mut merged = MergedBufferSet::<u16>::new(3, 2, BitDepth::U16, names).unwrap();
        assert_eq!(merged.channels(), 2);
        merged.planes_mut()[1][5] = 65535;
        assert_eq!(merged.sample(1, 2, 1), 65535);
        assert_eq!(merged.row(1, 1), &[0, 0, 65535]);
        assert_eq!(merged.index_of("Magenta"), Some(1));
        assert_eq!(merged.into_planes().len(), 2);
    }
}
