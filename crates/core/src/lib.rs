#![deny(unsafe_code)]
//! Color model and gradient engine for color-map editors.
//!
//! Provides the immutable [`Color`] (hex / RGB / HSV), the [`ColorMap`] value
//! type and its serializable form, gradient lookup ([`color_at`]), lookup
//! table generation ([`discretize`]), and the control-point editing rules
//! ([`editor`]) that keep a gradient consistent while it is edited
//! interactively.
//!
//! Invalid input never panics or returns an error from the editing and
//! sampling paths: it is corrected and reported through the `log` facade.

pub mod color;
pub mod colormap;
pub mod editor;
pub mod error;
pub mod interpolate;
pub mod lut;
pub mod picker;
pub mod presets;
pub mod throttle;

pub use color::{is_dark, Color, ColorInput, Hsv, Rgb};
pub use colormap::{ColorMap, ColorMapString, ControlPoint, ControlPointString, InterpolationMethod};
pub use editor::{ColorMapEditor, DragSession, Subscription};
pub use error::ColorMapError;
pub use interpolate::color_at;
pub use lut::{discretize, ColorLookupEntry, ColorLookupTable};
pub use picker::HsvPicker;
pub use throttle::Throttle;
