//! Sample storage types and bit depths.
//!
//! Separation planes are single-channel integer rasters. The storage type
//! of one sample ([`Sample`]) and the number of significant bits
//! ([`BitDepth`]) are separate: a 10-bit plane is stored in `u16`.
//!
//! # Types
//!
//! - [`BitDepth`] - Significant bits per sample (8, 10, 12 or 16)
//! - [`Sample`] - Storage type of one sample (`u8`, `u16`)
//!
//! # Usage
//!
//! ```rust
//! use inkset_core::format::{BitDepth, Sample};
//!
//! let depth = BitDepth::U10;
//! assert_eq!(depth.max_value(), 1023);
//! assert!(depth.fits::<u16>());
//! assert!(!depth.fits::<u8>());
//! ```

/// Significant bits per separation sample.
///
/// A sample `v` encodes ink coverage `v / max_value()` linearly, so 0 is no
/// ink and `max_value()` is a solid tint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum BitDepth {
    /// 8-bit unsigned integer [0, 255].
    #[default]
    U8,
    /// 10-bit unsigned integer [0, 1023].
    U10,
    /// 12-bit unsigned integer [0, 4095].
    U12,
    /// 16-bit unsigned integer [0, 65535].
    U16,
}

impl BitDepth {
    /// Number of significant bits.
    #[inline]
    pub const fn bits(&self) -> u32 {
        match self {
            Self::U8 => 8,
            Self::U10 => 10,
            Self::U12 => 12,
            Self::U16 => 16,
        }
    }

    /// Largest sample value (solid coverage).
    #[inline]
    pub const fn max_value(&self) -> u32 {
        (1u32 << self.bits()) - 1
    }

    /// Largest sample value as `f32`.
    #[inline]
    pub fn scale(&self) -> f32 {
        self.max_value() as f32
    }

    /// Reciprocal of [`scale`](Self::scale), used to normalize samples.
    #[inline]
    pub fn inv_scale(&self) -> f32 {
        1.0 / self.scale()
    }

    /// Whether samples of this depth fit in storage type `T`.
    #[inline]
    pub fn fits<T: Sample>(&self) -> bool {
        self.bits() <= T::BITS
    }

    /// Returns the depth from a bit count, if supported.
    ///
    /// ```rust
    /// use inkset_core::BitDepth;
    /// assert_eq!(BitDepth::from_bits(12), Some(BitDepth::U12));
    /// assert_eq!(BitDepth::from_bits(32), None);
    /// ```
    pub fn from_bits(bits: u32) -> Option<Self> {
        match bits {
            8 => Some(Self::U8),
            10 => Some(Self::U10),
            12 => Some(Self::U12),
            16 => Some(Self::U16),
            _ => None,
        }
    }

    /// The natural depth of storage type `T` (all bits significant).
    #[inline]
    pub fn native<T: Sample>() -> Self {
        T::NATIVE_DEPTH
    }
}

impl std::fmt::Display for BitDepth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-bit", self.bits())
    }
}

/// Storage type of one separation sample.
///
/// Implemented for `u8` and `u16`. Values are moved through `u32` so the
/// merge engine can stay generic over storage.
pub trait Sample: Copy + Default + Send + Sync + PartialEq + std::fmt::Debug + 'static {
    /// Number of bits in the storage type.
    const BITS: u32;

    /// Depth that uses every storage bit.
    const NATIVE_DEPTH: BitDepth;

    /// Widens the sample.
    fn to_u32(self) -> u32;

    /// Narrows a value already clamped to the depth's range.
    fn from_u32(v: u32) -> Self;

    /// Zero value.
    #[inline]
    fn zero() -> Self {
        Self::default()
    }
}

impl Sample for u8 {
    const BITS: u32 = 8;
    const NATIVE_DEPTH: BitDepth = BitDepth::U8;

    #[inline]
    fn to_u32(self) -> u32 {
        self as u32
    }

    #[inline]
    fn from_u32(v: u32) -> Self {
        debug_assert!(v <= u8::MAX as u32);
        v as u8
    }
}

impl Sample for u16 {
    const BITS: u32 = 16;
    const NATIVE_DEPTH: BitDepth = BitDepth::U16;

    #[inline]
    fn to_u32(self) -> u32 {
        self as u32
    }

    #[inline]
    fn from_u32(v: u32) -> Self {
        debug_assert!(v <= u16::MAX as u32);
        v as u16
    }
}
