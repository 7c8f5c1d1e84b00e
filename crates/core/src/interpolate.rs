//! Color lookup at arbitrary positions along a multi-stop gradient.
//!
//! Positions are normalized against the map's domain and clamped to [0, 1]
//! before the bracketing pair of stops is located by a linear scan. The pair
//! is then blended in the map's [`InterpolationMethod`] space:
//!
//! - `Rgb`: linear per channel on 8-bit values;
//! - `Hsv`: linear per channel with shortest-arc hue;
//! - `Lab`: linear in OKLab.
//!
//! The method only changes the mixing space, never the stop positions.

use crate::color::{normalize_hue, Color, Hsv, OkLab, Rgb};
use crate::colormap::{ColorMap, InterpolationMethod};

/// Returns the color of `map` at domain position `position`.
///
/// Positions outside the domain clamp to the outer stops. A single-stop map
/// returns that stop's color everywhere. An empty map returns
/// [`Color::INVALID`] and logs a warning.
pub fn color_at(map: &ColorMap, position: f64) -> Color {
    let points = &map.control_points;
    match points.len() {
        0 => {
            log::warn!("color_at on a color map with no control points");
            return Color::INVALID;
        }
        1 => return points[0].color,
        _ => {}
    }

    let t = if position.is_nan() {
        log::warn!("color_at called with NaN position; using the start of the range");
        0.0
    } else {
        map.normalize(position).clamp(0.0, 1.0)
    };

    let stop_t = |i: usize| map.normalize(points[i].position);

    // First pair bracketing t, or the boundary pair nearest to it.
    let last = points.len() - 1;
    let idx = (0..last)
        .find(|&i| stop_t(i) <= t && t <= stop_t(i + 1))
        .unwrap_or(if t < stop_t(0) { 0 } else { last - 1 });

    let a_t = stop_t(idx);
    let b_t = stop_t(idx + 1);
    let denom = if b_t == a_t { 1.0 } else { b_t - a_t };
    let local_t = ((t - a_t) / denom).clamp(0.0, 1.0);

    mix(
        &points[idx].color,
        &points[idx + 1].color,
        local_t,
        map.interpolation_method,
    )
}

/// Samples `count` evenly spaced colors from the start to the end of the
/// domain, both ends included.
pub fn sample(map: &ColorMap, count: usize) -> Vec<Color> {
    match count {
        0 => Vec::new(),
        1 => vec![color_at(map, map.start_range)],
        _ => (0..count)
            .map(|i| {
                let frac = i as f64 / (count - 1) as f64;
                color_at(map, map.start_range + frac * map.span())
            })
            .collect(),
    }
}

/// Blends two colors at `t` in [0, 1] in the given space.
///
/// `t` at or beyond either end returns that endpoint unchanged.
pub fn mix(a: &Color, b: &Color, t: f64, method: InterpolationMethod) -> Color {
    if t <= 0.0 {
        return *a;
    }
    if t >= 1.0 {
        return *b;
    }
    match method {
        InterpolationMethod::Rgb => mix_rgb(a.rgb(), b.rgb(), t),
        InterpolationMethod::Hsv => mix_hsv(a.hsv(), b.hsv(), t),
        InterpolationMethod::Lab => mix_lab(a.to_oklab(), b.to_oklab(), t),
    }
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + t * (b - a)
}

fn mix_rgb(a: Rgb, b: Rgb, t: f64) -> Color {
    let channel = |x: u8, y: u8| lerp(x as f64, y as f64, t);
    Color::from(Rgb::from_f64(
        channel(a.r, b.r),
        channel(a.g, b.g),
        channel(a.b, b.b),
    ))
}

fn mix_hsv(a: Hsv, b: Hsv, t: f64) -> Color {
    // An achromatic endpoint has no meaningful hue; borrow the other one so
    // a fade to gray or black does not sweep through the color wheel.
    let (h0, h1) = match (is_achromatic(a), is_achromatic(b)) {
        (true, false) => (b.h, b.h),
        (false, true) => (a.h, a.h),
        _ => (a.h, b.h),
    };
    Color::from(Hsv {
        h: interpolate_hue(h0, h1, t),
        s: lerp(a.s, b.s, t),
        v: lerp(a.v, b.v, t),
    })
}

fn is_achromatic(hsv: Hsv) -> bool {
    hsv.s == 0.0 || hsv.v == 0.0
}

fn mix_lab(a: OkLab, b: OkLab, t: f64) -> Color {
    Color::from(OkLab {
        l: lerp(a.l, b.l, t),
        a: lerp(a.a, b.a, t),
        b: lerp(a.b, b.b, t),
    })
}

/// Interpolates hue using shortest-arc logic, handling wraparound at 360.
fn interpolate_hue(h0: f64, h1: f64, t: f64) -> f64 {
    let delta = match h1 - h0 {
        d if d > 180.0 => d - 360.0,
        d if d < -180.0 => d + 360.0,
        d => d,
    };
    normalize_hue(h0 + t * delta)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colormap::ControlPoint;

    const EPSILON: f64 = 1e-6;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < EPSILON
    }

    fn channel_close(a: u8, b: u8) -> bool {
        (a as i16 - b as i16).abs() <= 1
    }

    fn map_of(stops: &[(f64, &str)], method: InterpolationMethod) -> ColorMap {
        ColorMap::new(
            stops
                .iter()
                .map(|&(pos, hex)| ControlPoint::new(Color::from_hex(hex), pos))
                .collect(),
            method,
        )
    }

    // -- Scenarios --

    #[test]
    fn rgb_midpoint_of_blue_and_red_is_purple() {
        let map = map_of(&[(0.0, "#0000ff"), (1.0, "#ff0000")], InterpolationMethod::Rgb);
        let mid = color_at(&map, 0.5).rgb();
        assert!(channel_close(mid.r, 0x7f) || channel_close(mid.r, 0x80), "r={}", mid.r);
        assert_eq!(mid.g, 0);
        assert!(channel_close(mid.b, 0x7f), "b={}", mid.b);
    }

    #[test]
    fn boundaries_return_outer_stop_colors() {
        for method in InterpolationMethod::ALL {
            let map = map_of(&[(0.0, "#123456"), (0.4, "#abcdef"), (1.0, "#fedcba")], method);
            assert_eq!(color_at(&map, 0.0).hex(), "#123456", "{method:?}");
            assert_eq!(color_at(&map, 1.0).hex(), "#fedcba", "{method:?}");
        }
    }

    #[test]
    fn positions_outside_domain_clamp() {
        let map = map_of(&[(0.0, "#000000"), (1.0, "#ffffff")], InterpolationMethod::Rgb);
        assert_eq!(color_at(&map, -3.0).hex(), "#000000");
        assert_eq!(color_at(&map, 7.0).hex(), "#ffffff");
    }

    #[test]
    fn stops_inside_domain_hold_outer_colors_to_the_edges() {
        let map = map_of(&[(0.25, "#ff0000"), (0.75, "#0000ff")], InterpolationMethod::Rgb);
        assert_eq!(color_at(&map, 0.0).hex(), "#ff0000");
        assert_eq!(color_at(&map, 0.1).hex(), "#ff0000");
        assert_eq!(color_at(&map, 0.9).hex(), "#0000ff");
        assert_eq!(color_at(&map, 1.0).hex(), "#0000ff");
    }

    #[test]
    fn custom_domain_is_normalized() {
        let mut map = map_of(&[(-10.0, "#000000"), (10.0, "#ffffff")], InterpolationMethod::Rgb);
        map.start_range = -10.0;
        map.end_range = 10.0;
        let mid = color_at(&map, 0.0).rgb();
        assert!(channel_close(mid.r, 128), "r={}", mid.r);
        assert_eq!(color_at(&map, -10.0).hex(), "#000000");
    }

    #[test]
    fn zero_width_domain_does_not_divide_by_zero() {
        let map = ColorMap::with_range(
            vec![
                ControlPoint::new(Color::from_hex("#ff0000"), 2.0),
                ControlPoint::new(Color::from_hex("#0000ff"), 2.0),
            ],
            InterpolationMethod::Rgb,
            2.0,
            2.0,
        );
        let c = color_at(&map, 2.0);
        assert_ne!(c, Color::INVALID);
        assert_eq!(c.hex(), "#ff0000");
    }

    #[test]
    fn single_point_returns_its_color_everywhere() {
        let map = map_of(&[(0.3, "#abcdef")], InterpolationMethod::Hsv);
        for pos in [-100.0, 0.0, 0.3, 0.99, 1.0, 42.0] {
            assert_eq!(color_at(&map, pos).hex(), "#abcdef", "at {pos}");
        }
    }

    #[test]
    fn empty_map_returns_sentinel() {
        let map = ColorMap::new(vec![], InterpolationMethod::Rgb);
        assert_eq!(color_at(&map, 0.5), Color::INVALID);
    }

    #[test]
    fn nan_position_is_treated_as_start() {
        let map = map_of(&[(0.0, "#ff0000"), (1.0, "#0000ff")], InterpolationMethod::Rgb);
        assert_eq!(color_at(&map, f64::NAN).hex(), "#ff0000");
    }

    #[test]
    fn tied_stops_make_a_hard_edge() {
        let map = map_of(
            &[(0.0, "#000000"), (0.5, "#ff0000"), (0.5, "#0000ff"), (1.0, "#ffffff")],
            InterpolationMethod::Rgb,
        );
        assert_eq!(color_at(&map, 0.5).hex(), "#ff0000");
        let just_after = color_at(&map, 0.5001).rgb();
        assert!(just_after.b > 200 && just_after.r < 10, "{just_after:?}");
    }

    #[test]
    fn three_stops_use_the_right_segment() {
        let map = map_of(
            &[(0.0, "#000000"), (0.5, "#ffffff"), (1.0, "#000000")],
            InterpolationMethod::Rgb,
        );
        assert_eq!(color_at(&map, 0.5).hex(), "#ffffff");
        let q = color_at(&map, 0.75).rgb();
        assert!(channel_close(q.r, 128), "r={}", q.r);
    }

    // -- Mixing spaces --

    #[test]
    fn hsv_mix_takes_the_short_way_round() {
        // 350 -> 10 passes through red (0), not cyan (180).
        let a = Color::from(Hsv::new(350.0, 1.0, 1.0));
        let b = Color::from(Hsv::new(10.0, 1.0, 1.0));
        let mid = mix(&a, &b, 0.5, InterpolationMethod::Hsv);
        assert!(approx_eq(mid.hsv().h, 0.0), "h={}", mid.hsv().h);
        assert_eq!(mid.hex(), "#ff0000");
    }

    #[test]
    fn hsv_mix_to_gray_keeps_hue() {
        let red = Color::from_hex("#ff0000");
        let gray = Color::from_hex("#808080");
        let mid = mix(&red, &gray, 0.5, InterpolationMethod::Hsv);
        assert!(approx_eq(mid.hsv().h, 0.0), "h={}", mid.hsv().h);
        let mid = mix(&Color::from_hex("#00ff00"), &gray, 0.5, InterpolationMethod::Hsv);
        assert!(approx_eq(mid.hsv().h, 120.0), "h={}", mid.hsv().h);
    }

    #[test]
    fn lab_mix_of_black_and_white_is_perceptual_gray() {
        let black = Color::from_hex("#000000");
        let white = Color::from_hex("#ffffff");
        let mid = mix(&black, &white, 0.5, InterpolationMethod::Lab).rgb();
        // OKLab L=0.5 is darker than sRGB 50% but far brighter than linear 50%.
        assert_eq!(mid.r, mid.g);
        assert_eq!(mid.g, mid.b);
        assert!(mid.r > 80 && mid.r < 128, "r={}", mid.r);
    }

    #[test]
    fn methods_differ_only_in_mixing() {
        let stops = [(0.0, "#ff0000"), (1.0, "#00ff00")];
        let rgb = color_at(&map_of(&stops, InterpolationMethod::Rgb), 0.5);
        let hsv = color_at(&map_of(&stops, InterpolationMethod::Hsv), 0.5);
        assert_ne!(rgb.hex(), hsv.hex());
        assert_eq!(hsv.hex(), "#ffff00");
    }

    #[test]
    fn mix_endpoints_return_inputs() {
        let a = Color::from_hex("#102030");
        let b = Color::from_hex("#405060");
        for method in InterpolationMethod::ALL {
            assert_eq!(mix(&a, &b, 0.0, method), a);
            assert_eq!(mix(&a, &b, 1.0, method), b);
        }
    }

    #[test]
    fn hue_interpolation_no_wraparound() {
        assert!(approx_eq(interpolate_hue(90.0, 180.0, 0.5), 135.0));
        assert!(approx_eq(interpolate_hue(10.0, 350.0, 0.5), 0.0));
    }

    #[test]
    fn sample_spans_the_domain() {
        let map = map_of(&[(0.0, "#000000"), (1.0, "#ffffff")], InterpolationMethod::Rgb);
        let colors = sample(&map, 3);
        assert_eq!(colors.len(), 3);
        assert_eq!(colors[0].hex(), "#000000");
        assert_eq!(colors[2].hex(), "#ffffff");
        assert!(sample(&map, 0).is_empty());
        assert_eq!(sample(&map, 1)[0].hex(), "#000000");
    }

    // -- Property-based tests --

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn method() -> impl Strategy<Value = InterpolationMethod> {
            prop_oneof![
                Just(InterpolationMethod::Rgb),
                Just(InterpolationMethod::Hsv),
                Just(InterpolationMethod::Lab),
            ]
        }

        proptest! {
            #[test]
            fn endpoints_match_first_and_last_stop(
                interior in prop::collection::vec(0.01_f64..0.99, 0..6),
                colors in prop::collection::vec(any::<(u8, u8, u8)>(), 8),
                method in method(),
                start in -100.0_f64..100.0,
                width in 0.001_f64..50.0,
            ) {
                let mut positions = interior;
                positions.sort_by(f64::total_cmp);
                positions.insert(0, 0.0);
                positions.push(1.0);
                let n = positions.len();
                let points = positions
                    .iter()
                    .zip(&colors)
                    .map(|(&p, &(r, g, b))| {
                        ControlPoint::new(Color::from(Rgb::new(r, g, b)), start + p * width)
                    })
                    .collect::<Vec<_>>();
                let first = points[0].color;
                let last = points[n - 1].color;
                let map = ColorMap::with_range(points, method, start, start + width);
                prop_assert_eq!(color_at(&map, start).hex(), first.hex());
                prop_assert_eq!(color_at(&map, start + width).hex(), last.hex());
            }

            #[test]
            fn single_point_is_constant(
                pos in -10.0_f64..10.0,
                query in -1000.0_f64..1000.0,
                method in method(),
                (r, g, b) in any::<(u8, u8, u8)>(),
            ) {
                let color = Color::from(Rgb::new(r, g, b));
                let map = ColorMap::new(vec![ControlPoint::new(color, pos)], method);
                prop_assert_eq!(color_at(&map, query), color);
            }

            #[test]
            fn rgb_mix_stays_between_endpoints(
                a in any::<(u8, u8, u8)>(),
                b in any::<(u8, u8, u8)>(),
                t in 0.0_f64..=1.0,
            ) {
                let ca = Color::from(Rgb::new(a.0, a.1, a.2));
                let cb = Color::from(Rgb::new(b.0, b.1, b.2));
                let m = mix(&ca, &cb, t, InterpolationMethod::Rgb).rgb();
                prop_assert!(m.r >= a.0.min(b.0) && m.r <= a.0.max(b.0));
                prop_assert!(m.g >= a.1.min(b.1) && m.g <= a.1.max(b.1));
                prop_assert!(m.b >= a.2.min(b.2) && m.b <= a.2.max(b.2));
            }

            #[test]
            fn hue_interpolation_stays_in_range(
                h0 in 0.0_f64..360.0,
                h1 in 0.0_f64..360.0,
                t in 0.0_f64..=1.0,
            ) {
                let h = interpolate_hue(h0, h1, t);
                prop_assert!(h >= 0.0 && h < 360.0, "hue {} out of range", h);
            }
        }
    }
}
