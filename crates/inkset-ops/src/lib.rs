//! # inkset-ops
//!
//! Spot-to-process merge for proofing separation rasters.
//!
//! A renderer produces one plane per colorant: the process inks first, then
//! every spot ink. This crate folds the spots into the process planes with
//! an overprint composite, so the page can be proofed on a plain CMYK (or
//! other process) output.
//!
//! # Modules
//!
//! - [`composite`] - Overprint arithmetic and sample quantization
//! - [`merge`] - The merge engine over whole separation sets
//! - [`assemble`] - Interleaving and scanline output
//! - [`config`] - Merge options, loadable from YAML
//!
//! # Example
//!
//! ```rust
//! use inkset_core::{BitDepth, ColorantCatalog, RasterGeometry, SeparationBufferSet};
//! use inkset_ops::{assemble, merge, MergeOptions, Quantization};
//!
//! let mut catalog = ColorantCatalog::cmyk();
//! catalog.add_spot("Orange", vec![0.0, 0.5, 1.0, 0.0]).unwrap();
//!
//! let geometry = RasterGeometry::from_page_bounds(96.0, 96.0, 10.0).unwrap();
//! let mut separations =
//!     SeparationBufferSet::<u8>::allocate(&catalog, &geometry, BitDepth::U8).unwrap();
//! separations.get_mut(4).unwrap().fill(255);
//!
//! let options = MergeOptions::default().with_quantization(Quantization::PerPass);
//! let merged = merge(&catalog, &separations, &options).unwrap();
//! let proof = assemble::interleave(&merged);
//! assert_eq!(proof.pixel(0, 0), &[0, 128, 255, 0]);
//! ```
//!
//! # Feature Flags
//!
//! - `parallel` (default) - Merge row bands on the rayon thread pool

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
pub mod assemble;
pub mod composite;
pub mod config;
pub mod merge;

#[cfg(feature = "parallel")]
mod parallel;

pub use assemble::{interleave, write_scanlines, InterleavedImage, ScanlineSink};
pub use config::{MergeOptions, Quantization};
pub use error::{OpsError, OpsResult};
pub use merge::{merge, merge_into_sink, SpotMerger};
