//! The [`ColorMap`] value type and its string-keyed serializable form.
//!
//! A color map is an ordered list of [`ControlPoint`]s over a domain
//! `[start_range, end_range]` plus the [`InterpolationMethod`] used to blend
//! neighbouring stops. It is plain value data: callers own it, edit it
//! through [`crate::editor`] and read it through [`crate::interpolate`] and
//! [`crate::lut`].
//!
//! [`ColorMapString`] is the transport shape (`controlPoints`,
//! `interpolationMethod`, `startRange`, `endRange`, colors as hex strings).
//! `ColorMap` serializes through it, so `serde_json::to_string(&map)` yields
//! that JSON directly.

use crate::color::Color;
use crate::error::ColorMapError;
use serde::{Deserialize, Serialize};

/// Color space in which two adjacent stops are blended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum InterpolationMethod {
    #[default]
    #[serde(rename = "RGB", alias = "rgb")]
    Rgb,
    #[serde(rename = "HSV", alias = "hsv")]
    Hsv,
    #[serde(rename = "LAB", alias = "lab")]
    Lab,
}

impl InterpolationMethod {
    /// All methods, in display order.
    pub const ALL: [InterpolationMethod; 3] = [
        InterpolationMethod::Rgb,
        InterpolationMethod::Hsv,
        InterpolationMethod::Lab,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            InterpolationMethod::Rgb => "RGB",
            InterpolationMethod::Hsv => "HSV",
            InterpolationMethod::Lab => "LAB",
        }
    }

    /// Case-insensitive lookup by name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|m| m.name().eq_ignore_ascii_case(name))
    }
}

/// One stop of a gradient.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlPoint {
    pub color: Color,
    pub position: f64,
}

impl ControlPoint {
    pub fn new(color: Color, position: f64) -> Self {
        Self { color, position }
    }
}

/// An ordered set of control points over a domain, plus a blend method.
///
/// Control points are kept sorted ascending by position. Ties may exist
/// while a drag gesture is in progress and are resolved by
/// [`consolidate`](crate::editor::consolidate).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ColorMapString", into = "ColorMapString")]
pub struct ColorMap {
    pub control_points: Vec<ControlPoint>,
    pub interpolation_method: InterpolationMethod,
    pub start_range: f64,
    pub end_range: f64,
}

impl ColorMap {
    /// Creates a map over `[0, 1]`.
    pub fn new(control_points: Vec<ControlPoint>, interpolation_method: InterpolationMethod) -> Self {
        Self::with_range(control_points, interpolation_method, 0.0, 1.0)
    }

    /// Creates a map over `[start_range, end_range]`.
    ///
    /// A reversed range is swapped and non-finite bounds fall back to the
    /// unit domain, both with a warning.
    pub fn with_range(
        control_points: Vec<ControlPoint>,
        interpolation_method: InterpolationMethod,
        start_range: f64,
        end_range: f64,
    ) -> Self {
        let (start_range, end_range) = sanitize_range(start_range, end_range);
        Self {
            control_points,
            interpolation_method,
            start_range,
            end_range,
        }
    }

    /// Builds a map from its serializable form.
    ///
    /// Invalid hex colors become [`Color::INVALID`]; missing bounds default
    /// to `0` and `1`. Points are stably sorted by position (ties keep their
    /// input order) and clamped into the range, with a warning for each
    /// correction.
    pub fn from_serializable(map: &ColorMapString) -> Self {
        let (start_range, end_range) =
            sanitize_range(map.start_range.unwrap_or(0.0), map.end_range.unwrap_or(1.0));

        let mut control_points: Vec<ControlPoint> = map
            .control_points
            .iter()
            .map(|p| {
                let position = if p.position.is_nan() {
                    log::warn!("control point {} has NaN position; using {start_range}", p.color);
                    start_range
                } else if p.position < start_range || p.position > end_range {
                    log::warn!(
                        "control point position {} outside [{start_range}, {end_range}]; clamping",
                        p.position
                    );
                    p.position.clamp(start_range, end_range)
                } else {
                    p.position
                };
                ControlPoint::new(Color::from_hex(&p.color), position)
            })
            .collect();

        if !is_sorted(&control_points) {
            log::warn!("control points were not in ascending order; sorting");
            control_points.sort_by(|a, b| a.position.total_cmp(&b.position));
        }

        Self {
            control_points,
            interpolation_method: map.interpolation_method,
            start_range,
            end_range,
        }
    }

    /// Reduces the map to its serializable form, colors as canonical hex.
    pub fn to_serializable(&self) -> ColorMapString {
        ColorMapString {
            control_points: self
                .control_points
                .iter()
                .map(|p| ControlPointString {
                    color: p.color.hex(),
                    position: p.position,
                })
                .collect(),
            interpolation_method: self.interpolation_method,
            start_range: Some(self.start_range),
            end_range: Some(self.end_range),
        }
    }

    /// Parses a color map from `ColorMapString` JSON.
    ///
    /// Stricter than [`from_serializable`](Self::from_serializable): malformed
    /// JSON or an empty control-point list is an error. Individual bad colors
    /// still fall back to [`Color::INVALID`].
    pub fn from_json(json: &str) -> Result<Self, ColorMapError> {
        let map: ColorMapString =
            serde_json::from_str(json).map_err(|e| ColorMapError::InvalidColorMap(e.to_string()))?;
        if map.control_points.is_empty() {
            return Err(ColorMapError::InvalidColorMap(
                "color map requires at least 1 control point".to_string(),
            ));
        }
        Ok(Self::from_serializable(&map))
    }

    /// Serializes to pretty-printed `ColorMapString` JSON.
    pub fn to_json_pretty(&self) -> Result<String, ColorMapError> {
        serde_json::to_string_pretty(&self.to_serializable())
            .map_err(|e| ColorMapError::InvalidColorMap(e.to_string()))
    }

    pub fn len(&self) -> usize {
        self.control_points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.control_points.is_empty()
    }

    /// Width of the domain; zero for a single-point domain.
    pub fn span(&self) -> f64 {
        self.end_range - self.start_range
    }

    /// Maps a domain position to `[0, 1]` (unclamped).
    ///
    /// A zero-width domain divides by 1 instead of 0.
    pub fn normalize(&self, position: f64) -> f64 {
        let span = self.span();
        let denom = if span == 0.0 { 1.0 } else { span };
        (position - self.start_range) / denom
    }

    /// Whether positions are non-decreasing.
    pub fn is_sorted(&self) -> bool {
        is_sorted(&self.control_points)
    }
}

fn is_sorted(points: &[ControlPoint]) -> bool {
    points.windows(2).all(|w| w[0].position <= w[1].position)
}

fn sanitize_range(start: f64, end: f64) -> (f64, f64) {
    if !start.is_finite() || !end.is_finite() {
        log::warn!("non-finite color map range [{start}, {end}]; using [0, 1]");
        return (0.0, 1.0);
    }
    if start > end {
        log::warn!("reversed color map range [{start}, {end}]; swapping");
        return (end, start);
    }
    (start, end)
}

/// Serializable control point with its color as a hex string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlPointString {
    pub color: String,
    pub position: f64,
}

/// String-keyed transport form of a [`ColorMap`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorMapString {
    pub control_points: Vec<ControlPointString>,
    #[serde(default)]
    pub interpolation_method: InterpolationMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_range: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_range: Option<f64>,
}

impl From<ColorMapString> for ColorMap {
    fn from(map: ColorMapString) -> Self {
        ColorMap::from_serializable(&map)
    }
}

impl From<ColorMap> for ColorMapString {
    fn from(map: ColorMap) -> Self {
        map.to_serializable()
    }
}
