use std::f32::consts::TAU;

use glam::Vec3;

const BIAS: Vec3 = Vec3::splat(0.5);
const AMPLITUDE: Vec3 = Vec3::splat(0.5);
const FREQUENCY: Vec3 = Vec3::ONE;
const PHASE: Vec3 = Vec3::new(0.263, 0.416, 0.557);

/// Cosine palette: `bias + amplitude * cos(2π (frequency * t + phase))`.
///
/// The per-channel phase offsets make the three channels peak at different
/// values of `t`, which cycles the output through a rainbow as `t` grows.
/// Each channel stays within `[0, 1]`.
#[inline]
pub fn palette(t: f32) -> Vec3 {
    let angle = (FREQUENCY * t + PHASE) * TAU;
    BIAS + AMPLITUDE * Vec3::new(angle.x.cos(), angle.y.cos(), angle.z.cos())
}
