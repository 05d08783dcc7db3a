use std::f32::consts::TAU;
use rand::Rng;
use crate::math::Vec3;

/// Upright cone with its apex at `+height/2` and base at `-height/2`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConeVolume {
    pub height: f32,
    pub radius: f32,
}

impl ConeVolume {
    pub fn new(height: f32, radius: f32) -> Self {
        Self { height, radius }
    }

    /// Radius of the cross-section at height `y` measured from the base
    pub fn radius_at(&self, y: f32) -> f32 {
        (1.0 - y / self.height) * self.radius
    }

    /// Same, for a recentred position (`y` in `[-H/2, H/2]`)
    pub fn radius_at_centered(&self, y: f32) -> f32 {
        self.radius_at(y + self.height / 2.0)
    }

    /// Place a point at base-relative height `y`, azimuth `angle`, planar distance `r`
    pub fn place(&self, y: f32, angle: f32, r: f32) -> Vec3 {
        Vec3::new(angle.cos() * r, y - self.height / 2.0, angle.sin() * r)
    }

    /// Uniform areal density over each cross-section disk
    pub fn sample_filled<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec3 {
        let y = rng.gen::<f32>() * self.height;
        let angle = rng.gen::<f32>() * TAU;
        let r = rng.gen::<f32>().sqrt() * self.radius_at(y);
        self.place(y, angle, r)
    }

    /// Point near the surface, below `height_fraction * H`, at
    /// `radius_fraction` of the local radius
    pub fn sample_shell<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        height_fraction: f32,
        radius_fraction: f32,
    ) -> Vec3 {
        let y = rng.gen::<f32>() * self.height * height_fraction;
        let angle = rng.gen::<f32>() * TAU;
        let r = self.radius_at(y) * radius_fraction;
        self.place(y, angle, r)
    }
}

/// Three independent draws in `[-half_extent, half_extent)`
pub fn sample_cube<R: Rng + ?Sized>(rng: &mut R, half_extent: f32) -> Vec3 {
    let mut axis = || (rng.gen::<f32>() - 0.5) * 2.0 * half_extent;
    let x = axis();
    let y = axis();
    let z = axis();
    Vec3::new(x, y, z)
}

/// Per-axis uniform draw from `[min, max)`
pub fn sample_euler<R: Rng + ?Sized>(rng: &mut R, range: &crate::config::Range) -> Vec3 {
    let x = range.sample(rng);
    let y = range.sample(rng);
    let z = range.sample(rng);
    Vec3::new(x, y, z)
}

/// Seed for runs that do not ask for reproducibility
pub fn entropy_seed() -> u64 {
    #[cfg(target_arch = "wasm32")]
    {
        let hi = (js_sys::Math::random() * u32::MAX as f64) as u64;
        let lo = (js_sys::Math::random() * u32::MAX as f64) as u64;
        (hi << 32) | lo
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(42)
    }
}
