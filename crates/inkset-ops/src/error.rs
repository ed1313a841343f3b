//! Error types for merge and assembly operations.

use thiserror::Error;

/// Error type for merge and assembly operations.
#[derive(Error, Debug)]
pub enum OpsError {
    /// Separation count disagrees with the catalog.
    #[error("expected {expected} separations (process + spots), got {got}")]
    BufferCount {
        /// `num_process + num_spots`
        expected: usize,
        /// Buffers supplied
        got: usize,
    },

    /// A scanline or output buffer has the wrong length.
    #[error("size mismatch: {0}")]
    SizeMismatch(String),

    /// The catalog has no process colorants to merge into.
    #[error("catalog has no process colorants")]
    NoProcessChannels,

    /// Invalid merge options.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// I/O error while reading configuration.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The scanline sink rejected a row.
    #[error("scanline sink failed at row {row}: {reason}")]
    Sink {
        /// Row being written
        row: u32,
        /// Sink message
        reason: String,
    },

    /// Error from the core data model.
    #[error(transparent)]
    Core(#[from] inkset_core::Error),
}

/// Result type for merge and assembly operations.
pub type OpsResult<T> = Result<T, OpsError>;
