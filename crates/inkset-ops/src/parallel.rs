//! Parallel merge and assembly using Rayon.
//!
//! Output rows are split into disjoint bands and each band is handed to one
//! rayon task. A task writes only its own rows of every plane, so no
//! locking is needed; the only synchronization is the final join.
//!
//! # Example
//!
//! ```rust
//! use inkset_core::{BitDepth, ColorantCatalog, RasterGeometry, SeparationBufferSet};
//! use inkset_ops::{merge, MergeOptions};
//!
//! let mut catalog = ColorantCatalog::cmyk();
//! catalog.add_spot("Green", vec![0.9, 0.0, 1.0, 0.0]).unwrap();
//! let geometry = RasterGeometry::new(256, 256, 150.0).unwrap();
//! let separations = SeparationBufferSet::<u8>::allocate(&catalog, &geometry, BitDepth::U8).unwrap();
//!
//! // 16-row bands on the global rayon pool
//! let options = MergeOptions::default().with_rows_per_band(16);
//! let merged = merge(&catalog, &separations, &options).unwrap();
//! assert_eq!(merged.dimensions(), (256, 256));
//! ```

use inkset_core::{MergedBufferSet, Sample};
use rayon::prelude::*;
use tracing::trace;

use crate::merge::SpotMerger;

/// Merges every band on the rayon pool.
///
/// `bands[b]` holds rows `b * band_rows ..` of each output plane.
pub(crate) fn merge_bands<T: Sample>(merger: &SpotMerger<'_, T>, bands: Vec<Vec<&mut [T]>>, band_rows: usize) {
    trace!(bands = bands.len(), band_rows, "parallel merge");
    bands
        .into_par_iter()
        .enumerate()
        .for_each(|(b, mut band)| merger.merge_band((b * band_rows) as u32, &mut band));
}

/// Interleaves planes into `dst`, one rayon task per output row.
pub(crate) fn interleave_into<T: Sample>(merged: &MergedBufferSet<T>, dst: &mut [T]) {
    let n = merged.channels();
    let w = merged.width() as usize;
    dst.par_chunks_mut(w * n).enumerate().for_each(|(y, row)| {
        for c in 0..n {
            let src = merged.row(c, y as u32);
            for (x, &s) in src.iter().enumerate() {
                row[x * n + c] = s;
            }
        }
    });
}
