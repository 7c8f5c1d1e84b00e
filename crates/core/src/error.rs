//! Error types for the colormap core.
//!
//! Editing, interpolation and discretization never fail: invalid input there
//! is corrected and reported through `log::warn!`. These errors only come out
//! of the strict entry points (hex parsing, deserialization, preset lookup).

use thiserror::Error;

/// Errors produced by the strict parsing and lookup paths.
#[derive(Debug, Error)]
pub enum ColorMapError {
    /// A color string could not be parsed.
    #[error("invalid color: {0}")]
    InvalidColor(String),

    /// No built-in color map is registered under this name.
    #[error("unknown preset: {0}")]
    UnknownPreset(String),

    /// A serialized color map was structurally unusable.
    #[error("invalid color map: {0}")]
    InvalidColorMap(String),
}
