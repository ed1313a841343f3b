//! Merge options.
//!
//! Options are plain data and can be loaded from YAML:
//!
//! ```rust
//! use inkset_ops::{MergeOptions, Quantization};
//!
//! let options = MergeOptions::from_yaml_str("quantization: per_pass\nrows_per_band: 16\n").unwrap();
//! assert_eq!(options.quantization, Quantization::PerPass);
//! assert!(options.parallel);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{OpsError, OpsResult};

/// When accumulated coverage is rounded back to integer samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Quantization {
    /// Accumulate every spot pass in floating point, round once at the end.
    #[default]
    Once,
    /// Round to a sample after every spot pass, as the reference loop does.
    PerPass,
}

/// Options for [`merge`](crate::merge::merge).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MergeOptions {
    /// Rounding policy.
    pub quantization: Quantization,
    /// Process row bands on the rayon pool. Ignored without the `parallel` feature.
    pub parallel: bool,
    /// Rows per band; 0 splits rows evenly over the worker threads.
    pub rows_per_band: usize,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            quantization: Quantization::Once,
            parallel: true,
            rows_per_band: 0,
        }
    }
}

impl MergeOptions {
    /// Single-threaded merge with the given rounding policy.
    pub fn sequential(quantization: Quantization) -> Self {
        Self {
            quantization,
            parallel: false,
            rows_per_band: 0,
        }
    }

    /// Sets the rounding policy.
    pub fn with_quantization(mut self, quantization: Quantization) -> Self {
        self.quantization = quantization;
        self
    }

    /// Sets the band height.
    pub fn with_rows_per_band(mut self, rows: usize) -> Self {
        self.rows_per_band = rows;
        self
    }

    /// Parses options from YAML. Missing keys take their defaults.
    pub fn from_yaml_str(yaml: &str) -> OpsResult<Self> {
        serde_yaml::from_str(yaml).map_err(|e| OpsError::Config(e.to_string()))
    }

    /// Reads options from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> OpsResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Band height for an image of `height` rows split over `workers` threads.
    pub fn band_rows(&self, height: u32, workers: usize) -> usize {
        let height = height.max(1) as usize;
        if self.rows_per_band > 0 {
            return self.rows_per_band.min(height);
        }
        height.div_ceil(workers.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let options = MergeOptions::default();
        assert_eq!(options.quantization, Quantization::Once);
        assert!(options.parallel);
        assert_eq!(options.rows_per_band, 0);
        assert_eq!(MergeOptions::from_yaml_str("{}").unwrap(), options);
    }

    #[test]
    fn test_yaml_fields() {
        let options = MergeOptions::from_yaml_str(
            "quantization: once\nparallel: false\nrows_per_band: 8\n",
        )
        .unwrap();
        assert_eq!(options, MergeOptions::sequential(Quantization::Once).with_rows_per_band(8));
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = MergeOptions::from_yaml_str("threads: 4\n").unwrap_err();
        assert!(matches!(err, OpsError::Config(_)));
        let err = MergeOptions::from_yaml_str("quantization: sometimes\n").unwrap_err();
        assert!(matches!(err, OpsError::Config(_)));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "quantization: per_pass").unwrap();
        let options = MergeOptions::from_file(file.path()).unwrap();
        assert_eq!(options.quantization, Quantization::PerPass);

        let missing = MergeOptions::from_file("/nonexistent/inkset.yaml");
        assert!(matches!(missing, Err(OpsError::Io(_))));
    }

    #[test]
    fn test_band_rows() {
        let auto = MergeOptions::default();
        assert_eq!(auto.band_rows(100, 4), 25);
        assert_eq!(auto.band_rows(101, 4), 26);
        assert_eq!(auto.band_rows(3, 8), 1);
        assert_eq!(auto.band_rows(10, 0), 10);

        let fixed = MergeOptions::default().with_rows_per_band(16);
        assert_eq!(fixed.band_rows(100, 4), 16);
        assert_eq!(fixed.band_rows(5, 4), 5);
    }
}
