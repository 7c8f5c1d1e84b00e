//! Color model: hex, RGB and HSV representations of a single immutable [`Color`].
//!
//! A [`Color`] always carries a consistent RGB triple, HSV triple, hex string
//! and dark flag. The only way to build one is [`Color::from_input`] (the
//! `From` impls and hex helpers delegate to it), so those representations
//! cannot drift apart after construction.
//!
//! The linear-light and OKLab helpers at the bottom are shared with the
//! gradient engine, which mixes colors in OKLab for the `Lab` method.

use crate::error::ColorMapError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Relative luminance below which a color counts as dark.
const DARK_LUMINANCE_THRESHOLD: f64 = 0.5;

/// 8-bit sRGB channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Builds channels from floats in [0, 255], rounding to nearest and
    /// clamping out-of-range values. NaN maps to 0.
    pub fn from_f64(r: f64, g: f64, b: f64) -> Self {
        Self {
            r: quantize_channel(r),
            g: quantize_channel(g),
            b: quantize_channel(b),
        }
    }
}

fn quantize_channel(c: f64) -> u8 {
    if c.is_nan() {
        return 0;
    }
    c.round().clamp(0.0, 255.0) as u8
}

/// Hue in degrees [0, 360), saturation and value in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Hsv {
    pub h: f64,
    pub s: f64,
    pub v: f64,
}

impl Hsv {
    pub const fn new(h: f64, s: f64, v: f64) -> Self {
        Self { h, s, v }
    }

    /// Wraps hue into [0, 360) and clamps saturation/value into [0, 1].
    /// NaN components become 0.
    pub fn normalized(self) -> Self {
        let finite_or_zero = |x: f64| if x.is_finite() { x } else { 0.0 };
        Self {
            h: normalize_hue(finite_or_zero(self.h)),
            s: finite_or_zero(self.s).clamp(0.0, 1.0),
            v: finite_or_zero(self.v).clamp(0.0, 1.0),
        }
    }
}

/// Linear-light RGB with components in [0, 1] (gamma-decoded).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearRgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

/// OKLab perceptual color space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OkLab {
    pub l: f64,
    pub a: f64,
    pub b: f64,
}

/// Every representation a [`Color`] can be built from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColorInput<'a> {
    Hex(&'a str),
    Rgb(Rgb),
    Hsv(Hsv),
}

/// An immutable color with mutually consistent RGB, HSV, hex and dark flag.
///
/// Serializes as its hex string `"#rrggbb"`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    rgb: Rgb,
    hsv: Hsv,
    is_dark: bool,
}

impl Color {
    /// Fallback returned when a color cannot be parsed.
    ///
    /// Black, but deliberately not flagged dark.
    pub const INVALID: Color = Color {
        rgb: Rgb::new(0, 0, 0),
        hsv: Hsv::new(0.0, 0.0, 0.0),
        is_dark: false,
    };

    /// Builds a color from any accepted representation.
    ///
    /// An unparseable hex string yields [`Color::INVALID`] and a warning on
    /// the log channel. HSV input is kept as given (after normalization) and
    /// RGB is derived from it; RGB and hex input derive HSV from the 8-bit
    /// channels.
    pub fn from_input(input: ColorInput<'_>) -> Color {
        match input {
            ColorInput::Hex(s) => match parse_hex_rgb(s) {
                Ok(rgb) => Self::from_input(ColorInput::Rgb(rgb)),
                Err(e) => {
                    log::warn!("{e}; falling back to {}", Color::INVALID.hex());
                    Color::INVALID
                }
            },
            ColorInput::Rgb(rgb) => Color {
                rgb,
                hsv: rgb_to_hsv(rgb),
                is_dark: luminance_is_dark(rgb),
            },
            ColorInput::Hsv(hsv) => {
                let hsv = hsv.normalized();
                let rgb = hsv_to_rgb(hsv);
                Color {
                    rgb,
                    hsv,
                    is_dark: luminance_is_dark(rgb),
                }
            }
        }
    }

    /// Lenient hex parsing: returns [`Color::INVALID`] (and warns) on failure.
    pub fn from_hex(hex: &str) -> Color {
        Self::from_input(ColorInput::Hex(hex))
    }

    /// Strict hex parsing.
    ///
    /// Accepts `#rrggbb`, `rrggbb`, `#rgb` and `rgb`, case-insensitive, with
    /// surrounding whitespace ignored.
    pub fn parse_hex(hex: &str) -> Result<Color, ColorMapError> {
        parse_hex_rgb(hex).map(|rgb| Self::from_input(ColorInput::Rgb(rgb)))
    }

    pub fn rgb(&self) -> Rgb {
        self.rgb
    }

    pub fn hsv(&self) -> Hsv {
        self.hsv
    }

    /// Canonical lowercase `#rrggbb` form.
    pub fn hex(&self) -> String {
        let Rgb { r, g, b } = self.rgb;
        format!("#{r:02x}{g:02x}{b:02x}")
    }

    pub fn is_dark(&self) -> bool {
        self.is_dark
    }

    /// WCAG relative luminance of the 8-bit channels.
    pub fn luminance(&self) -> f64 {
        relative_luminance(self.rgb)
    }

    pub fn to_linear(&self) -> LinearRgb {
        rgb_to_linear(self.rgb)
    }

    pub fn to_oklab(&self) -> OkLab {
        linear_to_oklab(self.to_linear())
    }
}

/// Whether a color should get a light stroke/text drawn over it.
pub fn is_dark(color: &Color) -> bool {
    color.is_dark()
}

impl Default for Color {
    fn default() -> Self {
        Color::INVALID
    }
}

impl From<Rgb> for Color {
    fn from(rgb: Rgb) -> Self {
        Color::from_input(ColorInput::Rgb(rgb))
    }
}

impl From<Hsv> for Color {
    fn from(hsv: Hsv) -> Self {
        Color::from_input(ColorInput::Hsv(hsv))
    }
}

impl From<OkLab> for Color {
    fn from(lab: OkLab) -> Self {
        Color::from(linear_to_rgb(oklab_to_linear(lab)))
    }
}

impl FromStr for Color {
    type Err = ColorMapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Color::parse_hex(s)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.hex())
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Color::parse_hex(&s).map_err(serde::de::Error::custom)
    }
}

fn parse_hex_rgb(input: &str) -> Result<Rgb, ColorMapError> {
    let trimmed = input.trim();
    let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);
    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(ColorMapError::InvalidColor(format!(
            "'{input}' contains non-hex characters"
        )));
    }
    let nibble = |i: usize| -> u8 {
        // All bytes are ASCII hex digits here.
        (digits.as_bytes()[i] as char).to_digit(16).unwrap_or(0) as u8
    };
    match digits.len() {
        3 => Ok(Rgb::new(
            nibble(0) * 17,
            nibble(1) * 17,
            nibble(2) * 17,
        )),
        6 => Ok(Rgb::new(
            nibble(0) * 16 + nibble(1),
            nibble(2) * 16 + nibble(3),
            nibble(4) * 16 + nibble(5),
        )),
        n => Err(ColorMapError::InvalidColor(format!(
            "'{input}': expected 3 or 6 hex digits, got {n}"
        ))),
    }
}

/// Converts 8-bit RGB to HSV. Hue is 0 when undefined (gray), saturation is
/// 0 when value is 0.
pub fn rgb_to_hsv(rgb: Rgb) -> Hsv {
    let r = rgb.r as f64 / 255.0;
    let g = rgb.g as f64 / 255.0;
    let b = rgb.b as f64 / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let h = if delta == 0.0 {
        0.0
    } else if max == r {
        60.0 * ((g - b) / delta).rem_euclid(6.0)
    } else if max == g {
        60.0 * ((b - r) / delta + 2.0)
    } else {
        60.0 * ((r - g) / delta + 4.0)
    };
    let s = if max == 0.0 { 0.0 } else { delta / max };

    Hsv {
        h: normalize_hue(h),
        s,
        v: max,
    }
}

/// Converts HSV to 8-bit RGB with rounding.
pub fn hsv_to_rgb(hsv: Hsv) -> Rgb {
    let Hsv { h, s, v } = hsv.normalized();
    let c = v * s;
    let sector = h / 60.0;
    let x = c * (1.0 - (sector.rem_euclid(2.0) - 1.0).abs());
    let (r1, g1, b1) = match sector as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = v - c;
    Rgb::from_f64((r1 + m) * 255.0, (g1 + m) * 255.0, (b1 + m) * 255.0)
}

/// Normalizes a hue angle to [0, 360).
pub fn normalize_hue(h: f64) -> f64 {
    let wrapped = h.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs.
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// WCAG relative luminance of 8-bit sRGB channels, in [0, 1].
pub fn relative_luminance(rgb: Rgb) -> f64 {
    let lin = rgb_to_linear(rgb);
    0.2126 * lin.r + 0.7152 * lin.g + 0.0722 * lin.b
}

fn luminance_is_dark(rgb: Rgb) -> bool {
    relative_luminance(rgb) < DARK_LUMINANCE_THRESHOLD
}

/// Applies inverse sRGB gamma to convert a single sRGB component to linear.
fn srgb_component_to_linear(c: f64) -> f64 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Applies sRGB gamma to convert a single linear component to sRGB.
fn linear_component_to_srgb(c: f64) -> f64 {
    if c <= 0.0031308 {
        c * 12.92
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    }
}

/// Decodes 8-bit sRGB to linear light.
pub fn rgb_to_linear(rgb: Rgb) -> LinearRgb {
    LinearRgb {
        r: srgb_component_to_linear(rgb.r as f64 / 255.0),
        g: srgb_component_to_linear(rgb.g as f64 / 255.0),
        b: srgb_component_to_linear(rgb.b as f64 / 255.0),
    }
}

/// Encodes linear light to 8-bit sRGB, clamping out-of-gamut values.
pub fn linear_to_rgb(c: LinearRgb) -> Rgb {
    let encode = |x: f64| linear_component_to_srgb(x.clamp(0.0, 1.0)) * 255.0;
    Rgb::from_f64(encode(c.r), encode(c.g), encode(c.b))
}

/// Converts linear RGB to OKLab via the OKLab matrix transform.
pub fn linear_to_oklab(c: LinearRgb) -> OkLab {
    let l_ = 0.4122214708 * c.r + 0.5363325363 * c.g + 0.0514459929 * c.b;
    let m_ = 0.2119034982 * c.r + 0.6806995451 * c.g + 0.1073969566 * c.b;
    let s_ = 0.0883024619 * c.r + 0.2817188376 * c.g + 0.6299787005 * c.b;

    let l_c = l_.cbrt();
    let m_c = m_.cbrt();
    let s_c = s_.cbrt();

    OkLab {
        l: 0.2104542553 * l_c + 0.7936177850 * m_c - 0.0040720468 * s_c,
        a: 1.9779984951 * l_c - 2.4285922050 * m_c + 0.4505937099 * s_c,
        b: 0.0259040371 * l_c + 0.7827717662 * m_c - 0.8086757660 * s_c,
    }
}

/// Converts OKLab to linear RGB via the inverse OKLab matrix transform.
pub fn oklab_to_linear(c: OkLab) -> LinearRgb {
    let l_ = c.l + 0.3963377774 * c.a + 0.2158037573 * c.b;
    let m_ = c.l - 0.1055613458 * c.a - 0.0638541728 * c.b;
    let s_ = c.l - 0.0894841775 * c.a - 1.2914855480 * c.b;

    let l = l_ * l_ * l_;
    let m = m_ * m_ * m_;
    let s = s_ * s_ * s_;

    LinearRgb {
        r: 4.0767416621 * l - 3.3077115913 * m + 0.2309699292 * s,
        g: -1.2684380046 * l + 2.6097574011 * m - 0.3413193965 * s,
        b: -0.0041960863 * l - 0.7034186147 * m + 1.7076147010 * s,
    }
}
