pub mod vec3;
pub mod matrix;

pub use vec3::Vec3;
pub use matrix::Mat4;

/// Linear interpolation written so that `t = 0` yields `a` and `t = 1`
/// yields `b` bit-for-bit.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a * (1.0 - t) + b * t
}
