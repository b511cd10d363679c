//! Pure per-pixel colour functions for GraphicsWorld.
//!
//! Every variant is a closed-form function of three inputs and nothing else:
//!
//! ```text
//!   frag_coord (pixel centre, top-left origin)
//!   resolution (surface size in pixels)        ──▶ Variant::evaluate ──▶ RGBA
//!   time       (seconds, non-decreasing)
//! ```
//!
//! There is no state carried between pixels or frames, so callers are free to
//! evaluate pixels in any order and on any number of threads. The renderer
//! crate fans rows out over rayon; a GPU port could call the same maths from a
//! fragment entry point.

mod palette;
mod uv;
mod variants;

use std::fmt;
use std::str::FromStr;

use glam::{Vec2, Vec4};
use serde::{Deserialize, Serialize};

pub use palette::palette;
pub use uv::{centered_uv, normalized_uv};
pub use variants::{gradient, kaleidoscope, radial};

/// Surface size as seen by the evaluator.
///
/// Both dimensions are strictly positive; zero-area surfaces never reach the
/// evaluator because [`Resolution::new`] refuses them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolution {
    width: f32,
    height: f32,
}

impl Resolution {
    /// Builds a resolution, returning `None` for zero, negative, or non-finite sizes.
    pub fn new(width: f32, height: f32) -> Option<Self> {
        let valid = |value: f32| value.is_finite() && value > 0.0;
        if valid(width) && valid(height) {
            Some(Self { width, height })
        } else {
            None
        }
    }

    /// Convenience constructor for integer pixel sizes.
    pub fn from_pixels(width: u32, height: u32) -> Option<Self> {
        Self::new(width as f32, height as f32)
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn as_vec2(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// Centre of the canvas in fragment coordinates.
    pub fn center(&self) -> Vec2 {
        self.as_vec2() * 0.5
    }
}

/// Which colour function to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// Red channel encodes the distance from the canvas centre.
    Radial,
    /// Red channel ramps from 0 on the left edge to 1 on the right edge.
    Gradient,
    /// Animated palette-cycling fractal built from four folded tiles.
    #[default]
    Kaleidoscope,
}

impl Variant {
    pub const ALL: [Variant; 3] = [Variant::Radial, Variant::Gradient, Variant::Kaleidoscope];

    /// Evaluates the colour of a single fragment.
    #[inline]
    pub fn evaluate(self, frag_coord: Vec2, resolution: Resolution, time: f32) -> Vec4 {
        match self {
            Variant::Radial => radial(frag_coord, resolution),
            Variant::Gradient => gradient(frag_coord, resolution),
            Variant::Kaleidoscope => kaleidoscope(frag_coord, resolution, time),
        }
    }

    /// Whether the output depends on the time input.
    pub fn is_animated(self) -> bool {
        matches!(self, Variant::Kaleidoscope)
    }

    pub fn name(self) -> &'static str {
        match self {
            Variant::Radial => "radial",
            Variant::Gradient => "gradient",
            Variant::Kaleidoscope => "kaleidoscope",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown shader variant '{0}'; expected radial, gradient, or kaleidoscope")]
pub struct ParseVariantError(String);

impl FromStr for Variant {
    type Err = ParseVariantError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "radial" | "distance" | "a" => Ok(Variant::Radial),
            "gradient" | "linear" | "b" => Ok(Variant::Gradient),
            "kaleidoscope" | "fractal" | "palette" | "c" => Ok(Variant::Kaleidoscope),
            _ => Err(ParseVariantError(value.trim().to_string())),
        }
    }
}

/// Free-function form of [`Variant::evaluate`] over plain tuples.
///
/// Returns `None` only when the resolution has zero area.
pub fn evaluate(
    variant: Variant,
    frag_coord: (f32, f32),
    resolution: (f32, f32),
    time: f32,
) -> Option<(f32, f32, f32, f32)> {
    let resolution = Resolution::new(resolution.0, resolution.1)?;
    let color = variant.evaluate(Vec2::new(frag_coord.0, frag_coord.1), resolution, time);
    Some((color.x, color.y, color.z, color.w))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolution_rejects_degenerate_sizes() {
        assert!(Resolution::new(0.0, 10.0).is_none());
        assert!(Resolution::new(10.0, -1.0).is_none());
        assert!(Resolution::new(f32::NAN, 10.0).is_none());
        assert!(Resolution::from_pixels(0, 0).is_none());
        let res = Resolution::from_pixels(640, 480).unwrap();
        assert_eq!(res.center(), Vec2::new(320.0, 240.0));
    }

    #[test]
    fn parses_variant_names_and_aliases() {
        assert_eq!("radial".parse::<Variant>().unwrap(), Variant::Radial);
        assert_eq!(" Gradient ".parse::<Variant>().unwrap(), Variant::Gradient);
        assert_eq!("C".parse::<Variant>().unwrap(), Variant::Kaleidoscope);
        let err = "plasma".parse::<Variant>().unwrap_err();
        assert!(err.to_string().contains("plasma"));
    }

    #[test]
    fn display_round_trips_through_from_str() {
        for variant in Variant::ALL {
            assert_eq!(variant.to_string().parse::<Variant>().unwrap(), variant);
        }
    }

    #[test]
    fn variant_deserializes_from_lowercase_names() {
        #[derive(Deserialize)]
        struct Holder {
            variant: Variant,
        }
        let holder: Holder = toml::from_str("variant = \"gradient\"").unwrap();
        assert_eq!(holder.variant, Variant::Gradient);
    }

    #[test]
    fn tuple_evaluate_rejects_zero_area() {
        assert!(evaluate(Variant::Radial, (0.0, 0.0), (0.0, 100.0), 0.0).is_none());
        let (r, g, b, a) = evaluate(Variant::Gradient, (50.0, 3.0), (100.0, 10.0), 0.0).unwrap();
        assert!((r - 0.5).abs() < 1e-6);
        assert_eq!((g, b, a), (0.0, 0.0, 1.0));
    }

    #[test]
    fn only_kaleidoscope_is_animated() {
        assert!(!Variant::Radial.is_animated());
        assert!(!Variant::Gradient.is_animated());
        assert!(Variant::Kaleidoscope.is_animated());
    }
}
