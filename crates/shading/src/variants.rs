use glam::{Vec2, Vec3, Vec4};

use crate::palette::palette;
use crate::uv::{centered_uv, normalized_uv};
use crate::Resolution;

const FOLDS: usize = 4;
const TILE_SCALE: f32 = 1.5;
const PALETTE_STEP: f32 = 0.4;
const PALETTE_SPEED: f32 = 0.4;
const RING_FREQUENCY: f32 = 8.0;
const GLOW: f32 = 0.01;
const GLOW_EXPONENT: f32 = 1.2;

/// Distance from the canvas centre in the red channel.
///
/// Values past 1.0 are left as-is; they saturate only when converted for display.
#[inline]
pub fn radial(frag_coord: Vec2, resolution: Resolution) -> Vec4 {
    let distance = centered_uv(frag_coord, resolution).length();
    Vec4::new(distance, 0.0, 0.0, 1.0)
}

/// Left-to-right ramp in the red channel.
#[inline]
pub fn gradient(frag_coord: Vec2, resolution: Resolution) -> Vec4 {
    let uv = normalized_uv(frag_coord, resolution);
    Vec4::new(uv.x, 0.0, 0.0, 1.0)
}

/// Palette-cycling fractal.
///
/// Each fold tiles the plane by 1.5x and recentres every tile, feeding the
/// folded coordinate into the next pass. The distance inside the current tile
/// is turned into thin animated rings whose brightness is the reciprocal of
/// the ring distance, so the filaments spike sharply. Output is unclamped but
/// always finite.
pub fn kaleidoscope(frag_coord: Vec2, resolution: Resolution, time: f32) -> Vec4 {
    let uv0 = centered_uv(frag_coord, resolution);
    let radius0 = uv0.length();
    let falloff = (-radius0).exp();

    let mut uv = uv0;
    let mut color = Vec3::ZERO;
    for fold in 0..FOLDS {
        uv = fract(uv * TILE_SCALE) - 0.5;
        let distance = uv.length() * falloff;
        let tint = palette(radius0 + fold as f32 * PALETTE_STEP + time * PALETTE_SPEED);
        color = saturating_add(color, tint * ring_glow(distance, time));
    }

    color.extend(1.0)
}

/// `x - floor(x)`, which stays in `[0, 1)` for negative inputs too.
#[inline]
fn fract(value: Vec2) -> Vec2 {
    value - value.floor()
}

/// Sharpens a smooth distance into animated ring brightness.
///
/// A ring distance of exactly zero (or one small enough to overflow) yields
/// `f32::MAX` rather than infinity.
#[inline]
pub(crate) fn ring_glow(distance: f32, time: f32) -> f32 {
    let ring = ((distance * RING_FREQUENCY + time).sin() / RING_FREQUENCY).abs();
    if ring == 0.0 {
        return f32::MAX;
    }
    let glow = (GLOW / ring).powf(GLOW_EXPONENT);
    if glow.is_finite() {
        glow
    } else {
        f32::MAX
    }
}

#[inline]
fn saturating_add(accumulated: Vec3, contribution: Vec3) -> Vec3 {
    (accumulated + contribution).min(Vec3::splat(f32::MAX))
}
