//! Discretization of a continuous gradient into flat-colored bins.
//!
//! The domain `[start_range, end_range]` is split into `bin_count`
//! equal-width, contiguous bins. Each bin takes the gradient color at its
//! center. The last bin's upper bound is exactly `end_range`, so the bins
//! cover the whole domain with no gaps from float accumulation.

use crate::color::Color;
use crate::colormap::ColorMap;
use crate::interpolate::color_at;
use serde::Serialize;

/// One discretization bin: `[lower_bound, upper_bound)` (the last bin is
/// closed on the right) and its representative color.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorLookupEntry {
    pub color: Color,
    pub lower_bound: f64,
    pub center: f64,
    pub upper_bound: f64,
}

/// Splits the map's domain into `bin_count` bins colored at their centers.
///
/// `0` yields an empty table; a negative count is clamped to `0` with a
/// warning.
pub fn discretize(map: &ColorMap, bin_count: i64) -> Vec<ColorLookupEntry> {
    let bins = if bin_count < 0 {
        log::warn!("negative bin count {bin_count}; producing an empty lookup table");
        0
    } else {
        bin_count as usize
    };

    let start = map.start_range;
    let width = map.span() / bins.max(1) as f64;
    (0..bins)
        .map(|i| {
            let lower_bound = start + i as f64 * width;
            let upper_bound = if i + 1 == bins {
                map.end_range
            } else {
                start + (i + 1) as f64 * width
            };
            let center = (lower_bound + upper_bound) / 2.0;
            ColorLookupEntry {
                color: color_at(map, center),
                lower_bound,
                center,
                upper_bound,
            }
        })
        .collect()
}

/// A discretized color map that can be queried by data value.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorLookupTable {
    entries: Vec<ColorLookupEntry>,
    start_range: f64,
    end_range: f64,
}

impl ColorLookupTable {
    pub fn new(map: &ColorMap, bin_count: i64) -> Self {
        Self {
            entries: discretize(map, bin_count),
            start_range: map.start_range,
            end_range: map.end_range,
        }
    }

    pub fn entries(&self) -> &[ColorLookupEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Index of the bin containing `value`; values outside the domain map to
    /// the first or last bin. `None` for an empty table or NaN.
    pub fn bin_index(&self, value: f64) -> Option<usize> {
        if self.entries.is_empty() || value.is_nan() {
            return None;
        }
        let n = self.entries.len();
        let span = self.end_range - self.start_range;
        if span == 0.0 {
            return Some(0);
        }
        let t = ((value - self.start_range) / span).clamp(0.0, 1.0);
        Some(((t * n as f64) as usize).min(n - 1))
    }

    /// Color of the bin containing `value`.
    pub fn color_for(&self, value: f64) -> Option<Color> {
        self.bin_index(value).map(|i| self.entries[i].color)
    }

    /// Packs the bin colors as RGBA8, four bytes per bin, alpha 255.
    pub fn to_rgba8(&self) -> Vec<u8> {
        self.entries
            .iter()
            .flat_map(|e| {
                let rgb = e.color.rgb();
                [rgb.r, rgb.g, rgb.b, 255u8]
            })
            .collect()
    }
}
