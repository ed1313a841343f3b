//! Spot-to-process merge engine.
//!
//! Reduces a [`SeparationBufferSet`] of `num_process + num_spots` planes to
//! a [`MergedBufferSet`] of `num_process` planes by overprinting every spot,
//! in catalog order, onto the process channels.
//!
//! For each pixel and process channel `c`:
//!
//! ```text
//! value = process[c] / max
//! for spot i in catalog order:
//!     value = 1 - (1 - rep[i][c] * spot[i] / max) * (1 - value)
//! out = floor(value * max + 0.5)
//! ```
//!
//! With [`Quantization::PerPass`] `value` is rounded to a sample after every
//! spot, reproducing the reference loop bit for bit; the default
//! [`Quantization::Once`] rounds only at the end.
//!
//! Pixels are independent, so rows are merged in disjoint bands, on the
//! rayon pool when the `parallel` feature is enabled.
//!
//! # Example
//!
//! ```rust
//! use inkset_core::{BitDepth, ColorantCatalog, RasterGeometry, SeparationBufferSet};
//! use inkset_ops::{merge, MergeOptions};
//!
//! let mut catalog = ColorantCatalog::cmyk();
//! catalog.add_spot("Red", vec![0.0, 1.0, 1.0, 0.0]).unwrap();
//!
//! let geometry = RasterGeometry::new(4, 4, 72.0).unwrap();
//! let mut separations = SeparationBufferSet::<u8>::allocate(&catalog, &geometry, BitDepth::U8).unwrap();
//! separations.get_mut(4).unwrap().fill(128);
//!
//! let merged = merge(&catalog, &separations, &MergeOptions::default()).unwrap();
//! assert_eq!(merged.channels(), 4);
//! assert_eq!(merged.sample(1, 0, 0), 128); // Magenta
//! assert_eq!(merged.sample(0, 0, 0), 0); // Cyan
//! ```

use inkset_core::{
    BitDepth, ColorantCatalog, MergedBufferSet, Sample, SeparationBuffer, SeparationBufferSet,
};
use tracing::{debug, trace};

use crate::assemble::ScanlineSink;
use crate::composite::{overprint_pixel, Quantizer};
use crate::{MergeOptions, OpsError, OpsResult, Quantization};

/// A validated merge of one separation set.
///
/// Construction checks the separation set against the catalog; after that
/// every row can be merged independently and from any thread.
#[derive(Debug)]
pub struct SpotMerger<'a, T: Sample> {
    process: &'a [SeparationBuffer<T>],
    spots: Vec<(&'a [f32], &'a SeparationBuffer<T>)>,
    names: Vec<String>,
    width: u32,
    height: u32,
    depth: BitDepth,
    quantizer: Quantizer,
    quantization: Quantization,
}

impl<'a, T: Sample> SpotMerger<'a, T> {
    /// Checks `separations` against `catalog`.
    ///
    /// # Errors
    ///
    /// - [`OpsError::NoProcessChannels`] if the catalog has no process colorant
    /// - [`OpsError::BufferCount`] if the set does not hold exactly one
    ///   plane per catalog entry
    pub fn new(
        catalog: &'a ColorantCatalog,
        separations: &'a SeparationBufferSet<T>,
        quantization: Quantization,
    ) -> OpsResult<Self> {
        let num_process = catalog.num_process();
        if num_process == 0 {
            return Err(OpsError::NoProcessChannels);
        }
        if separations.len() != catalog.len() {
            return Err(OpsError::BufferCount {
                expected: catalog.len(),
                got: separations.len(),
            });
        }

        let (process, spot_buffers) = separations.buffers().split_at(num_process);
        let spots = catalog
            .spots()
            .iter()
            .zip(spot_buffers)
            .map(|(spot, buffer)| {
                debug_assert_eq!(spot.representation().len(), num_process);
                (spot.representation(), buffer)
            })
            .collect();

        Ok(Self {
            process,
            spots,
            names: catalog.process().iter().map(|c| c.name().to_string()).collect(),
            width: separations.width(),
            height: separations.height(),
            depth: separations.depth(),
            quantizer: Quantizer::new(separations.depth()),
            quantization,
        })
    }

    /// Number of output channels.
    #[inline]
    pub fn channels(&self) -> usize {
        self.process.len()
    }

    /// Number of spot passes per pixel.
    #[inline]
    pub fn num_spots(&self) -> usize {
        self.spots.len()
    }

    /// Width of every plane.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height of every plane.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Allocates the output set this merger fills.
    pub fn allocate_output(&self) -> OpsResult<MergedBufferSet<T>> {
        Ok(MergedBufferSet::new(self.width, self.height, self.depth, self.names.clone())?)
    }

    /// Merges row `y`, handing each result to `emit(channel, x, sample)`.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height()`.
    pub fn merge_row_with<F>(&self, y: u32, mut emit: F)
    where
        F: FnMut(usize, usize, T),
    {
        assert!(y < self.height, "row {y} out of bounds for height {}", self.height);
        let q = &self.quantizer;
        let per_pass = self.quantization == Quantization::PerPass;
        let process_rows: Vec<_> = self.process.iter().map(|b| b.row(y)).collect();
        let spot_rows: Vec<_> = self.spots.iter().map(|(rep, b)| (*rep, b.row(y))).collect();
        let mut value = vec![0.0f32; process_rows.len()];

        for x in 0..self.width as usize {
            for (v, row) in value.iter_mut().zip(&process_rows) {
                *v = q.normalize(row.get(x).to_u32());
            }
            for (rep, row) in &spot_rows {
                let coverage = q.normalize(row.get(x).to_u32());
                overprint_pixel(&mut value, rep, coverage);
                if per_pass {
                    for v in value.iter_mut() {
                        *v = q.requantize(*v);
                    }
                }
            }
            for (c, &v) in value.iter().enumerate() {
                emit(c, x, T::from_u32(q.quantize(v)));
            }
        }
    }

    /// Merges a band of rows starting at `y0` into per-channel row slices.
    ///
    /// `band[c]` holds whole rows of channel `c`, tightly packed.
    pub(crate) fn merge_band(&self, y0: u32, band: &mut [&mut [T]]) {
        let w = self.width as usize;
        let rows = band.first().map_or(0, |plane| plane.len() / w);
        trace!(y0, rows, "merge band");
        for dy in 0..rows {
            let offset = dy * w;
            self.merge_row_with(y0 + dy as u32, |c, x, s| band[c][offset + x] = s);
        }
    }

    /// Merges row `y` into a pixel-interleaved scanline of `channels() * width` samples.
    ///
    /// # Errors
    ///
    /// [`OpsError::SizeMismatch`] if `line` has the wrong length or `y` is
    /// past the last row. Nothing is written in that case.
    pub fn merge_interleaved_row(&self, y: u32, line: &mut [T]) -> OpsResult<()> {
        let n = self.channels();
        let expected = n * self.width as usize;
        if line.len() != expected {
            return Err(OpsError::SizeMismatch(format!(
                "scanline of {} samples, expected {}",
                line.len(),
                expected
            )));
        }
        if y >= self.height {
            return Err(OpsError::SizeMismatch(format!("row {y} past height {}", self.height)));
        }
        self.merge_row_with(y, |c, x, s| line[x * n + c] = s);
        Ok(())
    }
}

/// Splits merged planes into bands of `band_rows` rows.
///
/// Band `b` holds rows `b * band_rows ..` of every plane, so bands never
/// overlap and can be written from different threads.
pub(crate) fn split_bands<'m, T>(planes: Vec<&'m mut [T]>, width: u32, band_rows: usize) -> Vec<Vec<&'m mut [T]>> {
    let chunk = width as usize * band_rows.max(1);
    let n = planes.len();
    let mut bands: Vec<Vec<&'m mut [T]>> = Vec::new();
    for plane in planes {
        for (b, rows) in plane.chunks_mut(chunk).enumerate() {
            if bands.len() <= b {
                bands.push(Vec::with_capacity(n));
            }
            bands[b].push(rows);
        }
    }
    bands
}

/// Merges every spot into the process channels.
///
/// Returns a new [`MergedBufferSet`] with one plane per process colorant.
/// Nothing is written unless the separation set matches the catalog.
pub fn merge<T: Sample>(
    catalog: &ColorantCatalog,
    separations: &SeparationBufferSet<T>,
    options: &MergeOptions,
) -> OpsResult<MergedBufferSet<T>> {
    let merger = SpotMerger::new(catalog, separations, options.quantization)?;
    let mut merged = merger.allocate_output()?;
    debug!(
        width = merger.width(),
        height = merger.height(),
        process = merger.channels(),
        spots = merger.num_spots(),
        quantization = ?options.quantization,
        "Merging spots into process"
    );

    let height = merger.height();
    let width = merger.width();
    let planes = merged.planes_mut();

    #[cfg(feature = "parallel")]
    if options.parallel {
        let band_rows = options.band_rows(height, rayon::current_num_threads());
        crate::parallel::merge_bands(&merger, split_bands(planes, width, band_rows), band_rows);
        return Ok(merged);
    }

    let band_rows = options.band_rows(height, 1);
    for (b, mut band) in split_bands(planes, width, band_rows).into_iter().enumerate() {
        merger.merge_band((b * band_rows) as u32, &mut band);
    }
    Ok(merged)
}

/// Merges row by row into a scanline sink.
///
/// Each row is emitted as one pixel-interleaved scanline in process
/// channel order, then [`ScanlineSink::finish`] is called.
pub fn merge_into_sink<T, S>(
    catalog: &ColorantCatalog,
    separations: &SeparationBufferSet<T>,
    options: &MergeOptions,
    sink: &mut S,
) -> OpsResult<()>
where
    T: Sample,
    S: ScanlineSink<T> + ?Sized,
{
    let merger = SpotMerger::new(catalog, separations, options.quantization)?;
    debug!(
        width = merger.width(),
        height = merger.height(),
        process = merger.channels(),
        spots = merger.num_spots(),
        "Streaming merged scanlines"
    );

    let mut line = vec![T::zero(); merger.channels() * merger.width() as usize];
    for y in 0..merger.height() {
        merger.merge_interleaved_row(y, &mut line)?;
        sink.write_scanline(&line)?;
    }
    sink.finish()
}
