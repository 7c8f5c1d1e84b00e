//! Errors surfaced by the `colormap` binary and the exit code each maps to.
//!
//! - 0:  success
//! - 2:  usage error, reported by clap before `run` starts
//! - 10: color map error (unknown preset, unusable color map JSON)
//! - 11: unused; the CLI reads no files and only writes to stdout/stderr,
//!   so there is no I/O class
//! - 12: input error (bad color, bad `--method`, missing map source)
//! - 13: serialization error

use colormap_core::ColorMapError;
use std::fmt;

/// Errors produced by CLI operations, each mapped to a distinct exit code.
pub enum CliError {
    /// A color map could not be resolved or parsed.
    ColorMap(ColorMapError),
    /// A user input error (bad color, no map given).
    Input(String),
    /// A serialization error (JSON output failure).
    Serialization(String),
}

impl CliError {
    /// Returns the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::ColorMap(_) => 10,
            CliError::Input(_) => 12,
            CliError::Serialization(_) => 13,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::ColorMap(e) => write!(f, "{e}"),
            CliError::Input(msg) => write!(f, "{msg}"),
            CliError::Serialization(msg) => write!(f, "{msg}"),
        }
    }
}

impl From<ColorMapError> for CliError {
    fn from(e: ColorMapError) -> Self {
        match e {
            ColorMapError::InvalidColor(msg) => CliError::Input(msg),
            other => CliError::ColorMap(other),
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Serialization(e.to_string())
    }
}
