//! State for a standalone HSV color picker.
//!
//! Hue is undefined for grays (zero saturation) and both hue and saturation
//! are undefined for black (zero value). A picker that re-derived HSV from
//! RGB after every edit would snap its hue slider to 0 whenever the user
//! dragged saturation or value to zero. [`HsvPicker`] keeps the last valid
//! hue and saturation ("backup" values) and reports those instead.

use crate::color::{Color, Hsv};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HsvPicker {
    color: Color,
    backup_hue: f64,
    backup_saturation: f64,
}

impl HsvPicker {
    pub fn new(color: Color) -> Self {
        let hsv = color.hsv();
        Self {
            color,
            backup_hue: hsv.h,
            backup_saturation: hsv.s,
        }
    }

    pub fn color(&self) -> Color {
        self.color
    }

    /// HSV as shown by the picker: hue and saturation fall back to their last
    /// valid values where the current color leaves them undefined.
    pub fn hsv(&self) -> Hsv {
        let hsv = self.color.hsv();
        Hsv {
            h: if hue_defined(hsv) { hsv.h } else { self.backup_hue },
            s: if hsv.v > 0.0 { hsv.s } else { self.backup_saturation },
            v: hsv.v,
        }
    }

    /// Replaces the color (hex entry, swatch click, ...), updating the
    /// backups only with the components the new color defines.
    pub fn set_color(&mut self, color: Color) {
        let hsv = color.hsv();
        if hue_defined(hsv) {
            self.backup_hue = hsv.h;
        }
        if hsv.v > 0.0 {
            self.backup_saturation = hsv.s;
        }
        self.color = color;
    }

    pub fn set_hue(&mut self, h: f64) {
        let current = self.hsv();
        self.set_hsv(Hsv { h, ..current });
    }

    pub fn set_saturation(&mut self, s: f64) {
        let current = self.hsv();
        self.set_hsv(Hsv { s, ..current });
    }

    pub fn set_value(&mut self, v: f64) {
        let current = self.hsv();
        self.set_hsv(Hsv { v, ..current });
    }

    /// Sets all three components. Slider input is authoritative, so hue and
    /// saturation become the new backups even where they are undefined.
    pub fn set_hsv(&mut self, hsv: Hsv) {
        let color = Color::from(hsv);
        let hsv = color.hsv();
        self.backup_hue = hsv.h;
        self.backup_saturation = hsv.s;
        self.color = color;
    }
}

impl Default for HsvPicker {
    fn default() -> Self {
        Self::new(Color::from_hex("#ff0000"))
    }
}

fn hue_defined(hsv: Hsv) -> bool {
    hsv.s > 0.0 && hsv.v > 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn value_to_zero_keeps_hue_and_saturation() {
        let mut picker = HsvPicker::new(Color::from(Hsv::new(210.0, 0.6, 0.8)));
        picker.set_value(0.0);
        assert_eq!(picker.color().hex(), "#000000");
        let hsv = picker.hsv();
        assert!(approx_eq(hsv.h, 210.0), "h={}", hsv.h);
        assert!(approx_eq(hsv.s, 0.6), "s={}", hsv.s);
        picker.set_value(1.0);
        assert!(approx_eq(picker.hsv().h, 210.0));
        assert!(approx_eq(picker.hsv().s, 0.6));
    }

    #[test]
    fn saturation_to_zero_keeps_hue() {
        let mut picker = HsvPicker::new(Color::from_hex("#00ff00"));
        picker.set_saturation(0.0);
        assert_eq!(picker.color().hex(), "#ffffff");
        assert!(approx_eq(picker.hsv().h, 120.0));
        picker.set_saturation(1.0);
        assert_eq!(picker.color().hex(), "#00ff00");
    }

    #[test]
    fn hex_entry_of_gray_keeps_previous_hue() {
        let mut picker = HsvPicker::new(Color::from_hex("#0000ff"));
        picker.set_color(Color::from_hex("#808080"));
        let hsv = picker.hsv();
        assert!(approx_eq(hsv.h, 240.0), "h={}", hsv.h);
        assert!(approx_eq(hsv.s, 0.0), "gray keeps its own zero saturation");
    }

    #[test]
    fn hex_entry_of_black_keeps_hue_and_saturation() {
        let mut picker = HsvPicker::new(Color::from_hex("#ff8000"));
        let before = picker.hsv();
        picker.set_color(Color::from_hex("#000000"));
        let hsv = picker.hsv();
        assert!(approx_eq(hsv.h, before.h));
        assert!(approx_eq(hsv.s, before.s));
        assert!(approx_eq(hsv.v, 0.0));
    }

    #[test]
    fn chromatic_color_updates_backups() {
        let mut picker = HsvPicker::default();
        picker.set_color(Color::from_hex("#ffff00"));
        picker.set_color(Color::from_hex("#000000"));
        assert!(approx_eq(picker.hsv().h, 60.0));
    }

    #[test]
    fn set_hue_changes_color() {
        let mut picker = HsvPicker::default();
        picker.set_hue(240.0);
        assert_eq!(picker.color().hex(), "#0000ff");
    }
}
