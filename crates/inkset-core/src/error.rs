//! Error types for inkset-core operations.
//!
//! This module provides the error type shared by the colorant catalog,
//! separation buffers and raster geometry.
//!
//! # Overview
//!
//! The [`Error`] enum covers failures that can occur while:
//! - Building a [`ColorantCatalog`](crate::ColorantCatalog) (duplicates, ordering, arity)
//! - Wrapping renderer output as [`SeparationBuffer`](crate::SeparationBuffer)s
//! - Assembling a [`SeparationBufferSet`](crate::SeparationBufferSet)
//! - Deriving pixel dimensions from page bounds
//!
//! # Usage
//!
//! ```rust
//! use inkset_core::{ColorantCatalog, Error};
//!
//! let mut catalog = ColorantCatalog::cmyk();
//! let err = catalog.add_spot("PANTONE 185 C", vec![0.0, 1.0, 0.8]).unwrap_err();
//! assert!(matches!(err, Error::RepresentationArity { expected: 4, got: 3, .. }));
//! ```
//!
//! # Dependencies
//!
//! - [`thiserror`] - For derive macro error implementation

use thiserror::Error;

/// Result type alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the core data model.
///
/// # Categories
///
/// - **Catalog errors**: [`DuplicateColorant`](Error::DuplicateColorant),
///   [`ProcessAfterSpot`](Error::ProcessAfterSpot),
///   [`RepresentationArity`](Error::RepresentationArity),
///   [`InvalidRepresentation`](Error::InvalidRepresentation),
///   [`UnknownColorant`](Error::UnknownColorant)
/// - **Buffer errors**: [`InvalidStride`](Error::InvalidStride),
///   [`BufferTooSmall`](Error::BufferTooSmall),
///   [`UnsupportedDepth`](Error::UnsupportedDepth),
///   [`DepthMismatch`](Error::DepthMismatch),
///   [`DimensionMismatch`](Error::DimensionMismatch)
/// - **Geometry errors**: [`InvalidDimensions`](Error::InvalidDimensions)
#[derive(Debug, Error)]
pub enum Error {
    /// A colorant with this name is already in the catalog.
    #[error("colorant '{0}' is already in the catalog")]
    DuplicateColorant(String),

    /// A process colorant was added after the first spot colorant.
    ///
    /// The renderer sizes its buffer set from the catalog order, so the
    /// process set is closed as soon as a spot exists.
    #[error("cannot add process colorant '{0}' after spot colorants")]
    ProcessAfterSpot(String),

    /// A spot representation vector has the wrong number of components.
    #[error("colorant '{colorant}' has {got} representation components, expected {expected}")]
    RepresentationArity {
        /// Colorant name
        colorant: String,
        /// Number of process channels
        expected: usize,
        /// Number of components supplied
        got: usize,
    },

    /// A representation component is outside `[0, 1]` or not finite.
    #[error("colorant '{colorant}' component {index} is {value}, expected a value in [0, 1]")]
    InvalidRepresentation {
        /// Colorant name
        colorant: String,
        /// Component index
        index: usize,
        /// Offending value
        value: f32,
    },

    /// Lookup of a colorant that is not in the catalog.
    #[error("unknown colorant '{0}'")]
    UnknownColorant(String),

    /// Invalid raster dimensions.
    ///
    /// Returned when width or height is zero, or dimensions would cause
    /// integer overflow in buffer size calculations.
    #[error("invalid dimensions: {width}x{height} ({reason})")]
    InvalidDimensions {
        /// Requested width
        width: u32,
        /// Requested height
        height: u32,
        /// Reason why dimensions are invalid
        reason: String,
    },

    /// Row or pixel stride cannot address a full row.
    #[error("row stride {row_stride} with pixel stride {pixel_stride} cannot hold {width} samples")]
    InvalidStride {
        /// Samples between row starts
        row_stride: usize,
        /// Samples between pixel starts
        pixel_stride: usize,
        /// Row width in pixels
        width: u32,
    },

    /// Sample data is shorter than the declared layout requires.
    #[error("buffer holds {got} samples, layout requires {required}")]
    BufferTooSmall {
        /// Samples required by offset, strides and dimensions
        required: usize,
        /// Samples present
        got: usize,
    },

    /// Bit depth does not fit the sample storage type.
    #[error("{depth} samples cannot be stored in {storage_bits}-bit storage")]
    UnsupportedDepth {
        /// Requested depth
        depth: crate::BitDepth,
        /// Bits of the storage type
        storage_bits: u32,
    },

    /// Buffers of one set disagree on bit depth.
    #[error("depth mismatch: {expected} vs {got}")]
    DepthMismatch {
        /// Depth of the first buffer
        expected: crate::BitDepth,
        /// Depth of the offending buffer
        got: crate::BitDepth,
    },

    /// Buffers disagree on dimensions.
    #[error("dimension mismatch: {a_width}x{a_height} vs {b_width}x{b_height}")]
    DimensionMismatch {
        /// First buffer width
        a_width: u32,
        /// First buffer height
        a_height: u32,
        /// Second buffer width
        b_width: u32,
        /// Second buffer height
        b_height: u32,
    },

    /// Generic error with custom message.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Creates an [`Error::InvalidDimensions`] error.
    #[inline]
    pub fn invalid_dimensions(width: u32, height: u32, reason: impl Into<String>) -> Self {
        Self::InvalidDimensions {
            width,
            height,
            reason: reason.into(),
        }
    }

    /// Creates an [`Error::DimensionMismatch`] error.
    #[inline]
    pub fn dimension_mismatch(a: (u32, u32), b: (u32, u32)) -> Self {
        Self::DimensionMismatch {
            a_width: a.0,
            a_height: a.1,
            b_width: b.0,
            b_height: b.1,
        }
    }

    /// Creates an [`Error::RepresentationArity`] error.
    #[inline]
    pub fn representation_arity(colorant: impl Into<String>, expected: usize, got: usize) -> Self {
        Self::RepresentationArity {
            colorant: colorant.into(),
            expected,
            got,
        }
    }

    /// Creates an [`Error::Other`] error.
    #[inline]
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }

    /// Returns `true` if this error comes from catalog construction.
    #[inline]
    pub fn is_catalog_error(&self) -> bool {
        matches!(
            self,
            Self::DuplicateColorant(_)
                | Self::ProcessAfterSpot(_)
                | Self::RepresentationArity { .. }
                | Self::InvalidRepresentation { .. }
                | Self::UnknownColorant(_)
        )
    }

    /// Returns `true` if this error describes a buffer layout problem.
    #[inline]
    pub fn is_layout_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidStride { .. }
                | Self::BufferTooSmall { .. }
                | Self::UnsupportedDepth { .. }
                | Self::DepthMismatch { .. }
                | Self::DimensionMismatch { .. }
                | Self::InvalidDimensions { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_representation_arity() {
        let err = Error::representation_arity("Orange", 4, 3);
        let msg = err.to_string();
        assert!(msg.contains("Orange"));
        assert!(msg.contains("expected 4"));
        assert!(err.is_catalog_error());
        assert!(!err.is_layout_error());
    }

    #[test]
    fn test_dimension_mismatch() {
        let err = Error::dimension_mismatch((100, 100), (200, 200));
        let msg = err.to_string();
        assert!(msg.contains("100x100"));
        assert!(msg.contains("200x200"));
        assert!(err.is_layout_error());
    }

    #[test]
    fn test_unsupported_depth() {
        let err = Error::UnsupportedDepth {
            depth: crate::BitDepth::U16,
            storage_bits: 8,
        };
        assert!(err.to_string().contains("16-bit"));
    }

    #[test]
    fn test_depth_mismatch_is_layout() {
        let err = Error::DepthMismatch {
            expected: crate::BitDepth::U10,
            got: crate::BitDepth::U16,
        };
        assert_eq!(err.to_string(), "depth mismatch: 10-bit vs 16-bit");
        assert!(err.is_layout_error());
        assert!(!err.is_catalog_error());
    }
}
