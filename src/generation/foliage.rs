//! Foliage point cloud
//!
//! Thousands of needle particles, each with a cone position, a scatter
//! position, a color and a point size. The buffers are uploaded once; the
//! vertex shader does the per-frame blending.

use rand::Rng;
use crate::config::TreeConfig;
use crate::math::Vec3;
use super::sampling::{sample_cube, ConeVolume};

/// Floats per particle in [`FoliageCloud::attribute_data`]:
/// tree_position(3) + scatter_position(3) + color(3) + size(1)
pub const FOLIAGE_FLOATS_PER_PARTICLE: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticleCategory {
    Base,
    Accent,
}

/// A single foliage particle. Never mutated after generation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub tree_position: Vec3,
    pub scatter_position: Vec3,
    pub category: ParticleCategory,
    pub color: Vec3,
    pub size: f32,
}

impl Particle {
    /// Blend between the scattered (0) and assembled (1) positions
    pub fn position_at(&self, progress: f32) -> Vec3 {
        self.scatter_position.lerp(&self.tree_position, progress)
    }

    fn to_array(&self) -> [f32; FOLIAGE_FLOATS_PER_PARTICLE] {
        [
            self.tree_position.x, self.tree_position.y, self.tree_position.z,
            self.scatter_position.x, self.scatter_position.y, self.scatter_position.z,
            self.color.x, self.color.y, self.color.z,
            self.size,
        ]
    }
}

/// The generated foliage
#[derive(Debug, Clone, PartialEq)]
pub struct FoliageCloud {
    particles: Vec<Particle>,
}

impl FoliageCloud {
    /// Sample `config.particle_count` particles from `rng`
    pub fn generate<R: Rng + ?Sized>(config: &TreeConfig, rng: &mut R) -> Self {
        let cone = ConeVolume::new(config.height, config.radius);
        let base_color = config.palette.base.to_vec3();
        let accent_color = config.palette.accent.to_vec3();

        let particles = (0..config.particle_count)
            .map(|_| {
                let tree_position = cone.sample_filled(rng);
                let scatter_position = sample_cube(rng, config.scatter_radius);

                let is_accent = rng.gen::<f32>() > config.accent_threshold;
                let (category, color, size_range) = if is_accent {
                    (ParticleCategory::Accent, accent_color, &config.accent_size)
                } else {
                    (ParticleCategory::Base, base_color, &config.base_size)
                };

                Particle {
                    tree_position,
                    scatter_position,
                    category,
                    color,
                    size: size_range.sample(rng),
                }
            })
            .collect();

        Self { particles }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn accent_count(&self) -> usize {
        self.particles
            .iter()
            .filter(|p| p.category == ParticleCategory::Accent)
            .count()
    }

    /// Interleaved static buffer for GPU upload
    pub fn attribute_data(&self) -> Vec<f32> {
        let mut data = Vec::with_capacity(self.particles.len() * FOLIAGE_FLOATS_PER_PARTICLE);
        for p in &self.particles {
            data.extend_from_slice(&p.to_array());
        }
        data
    }
}
