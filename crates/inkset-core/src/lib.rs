//! # inkset-core
//!
//! Core types for spot-to-process ink compositing.
//!
//! This crate provides the data model shared by the renderer boundary, the
//! merge engine and the output assembler:
//!
//! - [`ColorantCatalog`], [`Colorant`] - Process and spot inks in render order
//! - [`SeparationBuffer`], [`SeparationBufferSet`] - Renderer output planes
//! - [`MergedBufferSet`] - Process-only planes after merging spots
//! - [`BitDepth`], [`Sample`] - Sample precision and storage
//! - [`RasterGeometry`] - Pixel size of a page raster
//!
//! ## Crate Structure
//!
//! ```text
//! inkset-core (this crate)
//!    ^
//!    |
//!    +-- inkset-ops (merge engine, output assembler)
//!    +-- inkset-tests, inkset-bench
//! ```
//!
//! ## Feature Flags
//!
//! - `serde` - Enable serialization for [`BitDepth`], [`InkInfo`] and [`SpotSelection`]

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod buffer;
pub mod colorant;
pub mod error;
pub mod format;
pub mod geometry;

// Re-exports for convenience
pub use buffer::{MergedBufferSet, PlaneLayout, Row, SeparationBuffer, SeparationBufferSet};
pub use colorant::{Colorant, ColorantCatalog, ColorantKind, InkInfo, SpotDisposition, SpotSelection};
pub use error::{Error, Result};
pub use format::{BitDepth, Sample};
pub use geometry::{RasterGeometry, UNITS_PER_INCH};

/// Prelude module for convenient imports.
///
/// # Usage
///
/// ```
/// use inkset_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::buffer::{MergedBufferSet, PlaneLayout, SeparationBuffer, SeparationBufferSet};
    pub use crate::colorant::{ColorantCatalog, InkInfo, SpotSelection};
    pub use crate::error::{Error, Result};
    pub use crate::format::{BitDepth, Sample};
    pub use crate::geometry::RasterGeometry;
}
