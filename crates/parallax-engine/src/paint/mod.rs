//! Paint model: colours and colour ramps.
//!
//! Colours are straight-alpha sRGB. The only place that cares about linear light is
//! the surface clear, which converts on the way out.

pub mod color;
pub mod gradient;

pub use color::Color;
pub use gradient::{ColorRamp, ColorStop};
