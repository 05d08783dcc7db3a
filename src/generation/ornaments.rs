use rand::Rng;
use crate::config::{OrnamentGroupConfig, OrnamentKind, TreeConfig};
use crate::math::Vec3;
use super::sampling::{sample_cube, sample_euler, ConeVolume};

/// One decorative instance. Never mutated after generation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrnamentInstance {
    pub tree_position: Vec3,
    pub scatter_position: Vec3,
    /// Base Euler angles (XYZ)
    pub rotation: Vec3,
    pub scale: f32,
    /// Drift and spin amplitude while not fully assembled
    pub weight: f32,
}

impl OrnamentInstance {
    /// Blend between the scattered (0) and assembled (1) positions
    pub fn position_at(&self, progress: f32) -> Vec3 {
        self.scatter_position.lerp(&self.tree_position, progress)
    }
}

/// All instances of one kind. The kind decides primitive and material.
#[derive(Debug, Clone, PartialEq)]
pub struct OrnamentGroup {
    pub kind: OrnamentKind,
    pub instances: Vec<OrnamentInstance>,
}

impl OrnamentGroup {
    pub fn generate<R: Rng + ?Sized>(
        kind: OrnamentKind,
        group: &OrnamentGroupConfig,
        config: &TreeConfig,
        rng: &mut R,
    ) -> Self {
        let cone = ConeVolume::new(config.height, config.radius);
        let scatter_half_extent = config.ornament_scatter_half_extent();

        let instances = (0..group.count)
            .map(|_| {
                let tree_position = cone.sample_shell(
                    rng,
                    config.ornament_height_fraction,
                    config.ornament_radius_fraction,
                );
                let scatter_position = sample_cube(rng, scatter_half_extent);
                let rotation = sample_euler(rng, &config.ornament_rotation);
                let scale = group.scale.sample(rng);
                let weight = group.weight.sample(rng);

                OrnamentInstance {
                    tree_position,
                    scatter_position,
                    rotation,
                    scale,
                    weight,
                }
            })
            .collect();

        Self { kind, instances }
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}

/// Balls, boxes and stars, in that order
#[derive(Debug, Clone, PartialEq)]
pub struct OrnamentSet {
    groups: [OrnamentGroup; 3],
}

impl OrnamentSet {
    pub fn generate<R: Rng + ?Sized>(config: &TreeConfig, rng: &mut R) -> Self {
        let groups = OrnamentKind::ALL
            .map(|kind| OrnamentGroup::generate(kind, config.ornaments.group(kind), config, rng));
        Self { groups }
    }

    pub fn groups(&self) -> &[OrnamentGroup; 3] {
        &self.groups
    }

    pub fn group(&self, kind: OrnamentKind) -> &OrnamentGroup {
        match kind {
            OrnamentKind::Ball => &self.groups[0],
            OrnamentKind::Box => &self.groups[1],
            OrnamentKind::Star => &self.groups[2],
        }
    }

    pub fn total_count(&self) -> usize {
        self.groups.iter().map(OrnamentGroup::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Range;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn config() -> TreeConfig {
        TreeConfig {
            particle_count: 1000,
            height: 10.0,
            radius: 4.0,
            scatter_radius: 15.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_group_counts() {
        let config = config();
        let set = OrnamentSet::generate(&config, &mut SmallRng::seed_from_u64(42));
        assert_eq!(set.group(OrnamentKind::Ball).len(), 150);
        assert_eq!(set.group(OrnamentKind::Box).len(), 60);
        assert_eq!(set.group(OrnamentKind::Star).len(), 300);
        assert_eq!(set.total_count(), config.ornaments.total_count());
        for (group, kind) in set.groups().iter().zip(OrnamentKind::ALL) {
            assert_eq!(group.kind, kind);
        }
    }

    #[test]
    fn test_instances_sit_low_and_near_surface() {
        let config = config();
        let cone = ConeVolume::new(config.height, config.radius);
        let set = OrnamentSet::generate(&config, &mut SmallRng::seed_from_u64(1));

        for group in set.groups() {
            for inst in &group.instances {
                // 0.9 * H from the base, recentred
                assert!(inst.tree_position.y >= -5.0 && inst.tree_position.y < 4.0 + 1e-4);
                let expected = cone.radius_at_centered(inst.tree_position.y) * 0.95;
                assert!((inst.tree_position.planar_length() - expected).abs() < 1e-3);
            }
        }
    }

    #[test]
    fn test_scatter_cube_scaled() {
        let config = config();
        let half = config.ornament_scatter_half_extent();
        let set = OrnamentSet::generate(&config, &mut SmallRng::seed_from_u64(2));

        for group in set.groups() {
            for inst in &group.instances {
                for v in inst.scatter_position.to_array() {
                    assert!(v >= -half && v <= half);
                }
            }
        }
    }

    #[test]
    fn test_scale_weight_rotation_ranges() {
        let config = config();
        let set = OrnamentSet::generate(&config, &mut SmallRng::seed_from_u64(3));

        for group in set.groups() {
            let group_config = config.ornaments.group(group.kind);
            for inst in &group.instances {
                assert!(group_config.scale.contains(inst.scale));
                assert!(group_config.weight.contains(inst.weight));
                for angle in inst.rotation.to_array() {
                    assert!(config.ornament_rotation.contains(angle));
                }
            }
        }
    }

    #[test]
    fn test_lerp_endpoints_exact() {
        let set = OrnamentSet::generate(&config(), &mut SmallRng::seed_from_u64(4));
        for group in set.groups() {
            for inst in &group.instances {
                assert_eq!(inst.position_at(0.0), inst.scatter_position);
                assert_eq!(inst.position_at(1.0), inst.tree_position);
            }
        }
    }

    #[test]
    fn test_fixed_weight_range() {
        let mut config = config();
        config.ornaments.boxes.weight = Range::new(2.0, 2.0);
        let set = OrnamentSet::generate(&config, &mut SmallRng::seed_from_u64(5));
        assert!(set.group(OrnamentKind::Box).instances.iter().all(|i| i.weight == 2.0));
    }

    #[test]
    fn test_empty_group() {
        let mut config = config();
        config.ornaments.stars.count = 0;
        let set = OrnamentSet::generate(&config, &mut SmallRng::seed_from_u64(6));
        assert!(set.group(OrnamentKind::Star).is_empty());
        assert_eq!(set.total_count(), 210);
    }
}
