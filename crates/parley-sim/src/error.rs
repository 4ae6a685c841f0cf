//! Error types for the `parley-sim` binary.

use std::path::PathBuf;

/// Top-level error for the driver.
///
/// Engine-level problems never surface here: the simulation pass fails open
/// and reports them through the log instead.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: crate::config::ConfigError,
    },

    /// An input file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        /// The file that was being read.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// An input file was not the expected JSON shape.
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        /// The file that was being parsed.
        path: PathBuf,
        /// The underlying JSON error.
        source: serde_json::Error,
    },

    /// The conflict report could not be encoded.
    #[error("failed to encode conflicts: {source}")]
    Encode {
        /// The underlying JSON error.
        #[from]
        source: serde_json::Error,
    },

    /// The conflict report could not be written to stdout.
    #[error("failed to write output: {source}")]
    Write {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },
}
