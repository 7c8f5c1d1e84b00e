//! Built-in color maps.

use crate::color::Color;
use crate::colormap::{ColorMap, ControlPoint, InterpolationMethod};
use crate::error::ColorMapError;

/// Names accepted by [`from_name`], in listing order.
const PRESET_NAMES: &[&str] = &["grayscale", "blue-red", "viridis", "inferno", "coolwarm"];

/// Evenly spaces `hexes` over `[0, 1]`.
fn evenly_spaced(hexes: &[&str], method: InterpolationMethod) -> ColorMap {
    let last = hexes.len().saturating_sub(1).max(1) as f64;
    let points = hexes
        .iter()
        .enumerate()
        .map(|(i, hex)| ControlPoint::new(Color::from_hex(hex), i as f64 / last))
        .collect();
    ColorMap::new(points, method)
}

/// Black to white.
pub fn grayscale() -> ColorMap {
    evenly_spaced(&["#000000", "#ffffff"], InterpolationMethod::Rgb)
}

/// Blue to red, blended in RGB.
pub fn blue_red() -> ColorMap {
    evenly_spaced(&["#0000ff", "#ff0000"], InterpolationMethod::Rgb)
}

/// Five-stop approximation of matplotlib's viridis.
pub fn viridis() -> ColorMap {
    evenly_spaced(
        &["#440154", "#3b528b", "#21918c", "#5ec962", "#fde725"],
        InterpolationMethod::Lab,
    )
}

/// Six-stop approximation of matplotlib's inferno.
pub fn inferno() -> ColorMap {
    evenly_spaced(
        &["#000004", "#420a68", "#932667", "#dd513a", "#fca50a", "#fcffa4"],
        InterpolationMethod::Lab,
    )
}

/// Diverging blue / light gray / red.
pub fn coolwarm() -> ColorMap {
    evenly_spaced(&["#3b4cc0", "#dddddd", "#b40426"], InterpolationMethod::Lab)
}

/// Looks up a built-in color map by name (case-insensitive).
pub fn from_name(name: &str) -> Result<ColorMap, ColorMapError> {
    match name.to_ascii_lowercase().as_str() {
        "grayscale" | "gray" => Ok(grayscale()),
        "blue-red" => Ok(blue_red()),
        "viridis" => Ok(viridis()),
        "inferno" => Ok(inferno()),
        "coolwarm" => Ok(coolwarm()),
        _ => Err(ColorMapError::UnknownPreset(name.to_string())),
    }
}

/// Names of all built-in color maps.
pub fn list_names() -> &'static [&'static str] {
    PRESET_NAMES
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpolate::color_at;

    #[test]
    fn every_listed_name_resolves() {
        for name in list_names() {
            let map = from_name(name).unwrap_or_else(|e| panic!("{name}: {e}"));
            assert!(map.len() >= 2, "{name} has only {} stops", map.len());
            assert!(map.is_sorted(), "{name} is not sorted");
            assert!(
                map.control_points.iter().all(|p| p.color != Color::INVALID),
                "{name} has an unparseable stop"
            );
        }
    }

    #[test]
    fn presets_span_the_unit_domain() {
        for name in list_names() {
            let map = from_name(name).unwrap();
            assert_eq!(map.control_points[0].position, 0.0, "{name}");
            assert_eq!(map.control_points[map.len() - 1].position, 1.0, "{name}");
        }
    }

    #[test]
    fn lookup_is_case_insensitive() {
        assert_eq!(from_name("Viridis").unwrap(), viridis());
        assert_eq!(from_name("GRAY").unwrap(), grayscale());
    }

    #[test]
    fn unknown_name_is_an_error() {
        assert!(matches!(
            from_name("plasma"),
            Err(ColorMapError::UnknownPreset(name)) if name == "plasma"
        ));
    }

    #[test]
    fn grayscale_endpoints() {
        let map = grayscale();
        assert_eq!(color_at(&map, 0.0).hex(), "#000000");
        assert_eq!(color_at(&map, 1.0).hex(), "#ffffff");
    }

    #[test]
    fn viridis_gets_brighter() {
        let map = viridis();
        let lum = |t: f64| color_at(&map, t).luminance();
        assert!(lum(0.0) < lum(0.5) && lum(0.5) < lum(1.0));
    }
}
