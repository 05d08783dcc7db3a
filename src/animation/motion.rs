use crate::generation::{OrnamentInstance, Particle};
use crate::math::{Mat4, Vec3};

/// Drift switches off once progress reaches this value
pub const DRIFT_CUTOFF: f32 = 0.99;

const DRIFT_SCALE: f32 = 0.2;
const SPIN_RATE: f32 = 0.1;

/// CPU mirror of the foliage vertex shader
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FoliageVertex {
    pub position: Vec3,
    pub alpha: f32,
}

/// Morphed position with breathing jitter on x/z, and the pulsing alpha.
/// Must stay in step with `FOLIAGE_VERTEX_SHADER`.
pub fn foliage_vertex(particle: &Particle, progress: f32, time: f32, amplitude: f32) -> FoliageVertex {
    let mut position = particle.position_at(progress);

    let jitter = (time * 2.0 + position.y * 0.5).sin() * amplitude;
    position.x += jitter;
    position.z += jitter;

    FoliageVertex {
        position,
        alpha: 0.8 + 0.2 * (time + position.y).sin(),
    }
}

/// Weight-scaled wander, fading out as the tree assembles. The instance
/// index offsets the phase so neighbours don't move in lockstep.
pub fn drift_offset(index: usize, weight: f32, progress: f32, time: f32) -> Vec3 {
    if progress >= DRIFT_CUTOFF {
        return Vec3::ZERO;
    }
    let drift = (1.0 - progress) * weight * DRIFT_SCALE;
    let phase = index as f32;
    Vec3::new(
        (time * 0.5 + phase).sin() * drift,
        (time * 0.3 + phase).cos() * drift,
        (time * 0.7 + phase).sin() * drift,
    )
}

/// Base orientation plus a spin on X and Y that vanishes at full assembly
pub fn spin_rotation(instance: &OrnamentInstance, progress: f32, time: f32) -> Vec3 {
    let spin = time * SPIN_RATE * (1.0 - progress) * instance.weight;
    Vec3::new(
        instance.rotation.x + spin,
        instance.rotation.y + spin,
        instance.rotation.z,
    )
}

/// Current model matrix of one ornament
pub fn compose_instance(instance: &OrnamentInstance, index: usize, progress: f32, time: f32) -> Mat4 {
    let position =
        instance.position_at(progress) + drift_offset(index, instance.weight, progress, time);
    Mat4::compose(position, spin_rotation(instance, progress, time), instance.scale)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::ParticleCategory;

    fn particle() -> Particle {
        Particle {
            tree_position: Vec3::new(1.0, 2.0, -0.5),
            scatter_position: Vec3::new(-10.0, 4.0, 12.0),
            category: ParticleCategory::Base,
            color: Vec3::new(0.0, 0.4, 0.2),
            size: 1.0,
        }
    }

    fn ornament() -> OrnamentInstance {
        OrnamentInstance {
            tree_position: Vec3::new(2.0, -1.0, 0.5),
            scatter_position: Vec3::new(-6.0, 8.0, 3.0),
            rotation: Vec3::new(0.3, 1.1, 2.0),
            scale: 0.25,
            weight: 2.0,
        }
    }

    #[test]
    fn test_foliage_without_jitter_is_pure_lerp() {
        let p = particle();
        let v = foliage_vertex(&p, 1.0, 3.7, 0.0);
        assert_eq!(v.position, p.tree_position);
        let v = foliage_vertex(&p, 0.0, 3.7, 0.0);
        assert_eq!(v.position, p.scatter_position);
    }

    #[test]
    fn test_foliage_jitter_bounded_and_shared_on_xz() {
        let p = particle();
        for i in 0..200 {
            let t = i as f32 * 0.05;
            let v = foliage_vertex(&p, 1.0, t, 0.05);
            let dx = v.position.x - p.tree_position.x;
            let dz = v.position.z - p.tree_position.z;
            assert!(dx.abs() <= 0.05 + 1e-6);
            assert!((dx - dz).abs() < 1e-5);
            assert_eq!(v.position.y, p.tree_position.y);
        }
    }

    #[test]
    fn test_foliage_alpha_range() {
        let p = particle();
        for i in 0..200 {
            let v = foliage_vertex(&p, 0.5, i as f32 * 0.1, 0.05);
            assert!(v.alpha >= 0.6 - 1e-6 && v.alpha <= 1.0 + 1e-6);
        }
    }

    #[test]
    fn test_drift_vanishes_near_assembly() {
        assert_eq!(drift_offset(5, 3.0, 0.99, 12.0), Vec3::ZERO);
        assert_eq!(drift_offset(5, 3.0, 1.0, 12.0), Vec3::ZERO);
        assert_ne!(drift_offset(5, 3.0, 0.5, 12.0), Vec3::ZERO);
    }

    #[test]
    fn test_drift_amplitude_scales_with_weight() {
        for i in 0..50 {
            let d = drift_offset(i, 2.0, 0.0, i as f32 * 0.3);
            for v in d.to_array() {
                assert!(v.abs() <= 2.0 * 0.2 + 1e-6);
            }
        }
        assert_eq!(drift_offset(3, 0.0, 0.0, 4.0), Vec3::ZERO);
    }

    #[test]
    fn test_drift_decorrelated_by_index() {
        assert_ne!(drift_offset(0, 1.0, 0.0, 2.0), drift_offset(1, 1.0, 0.0, 2.0));
    }

    #[test]
    fn test_spin_only_on_two_axes() {
        let inst = ornament();
        let r = spin_rotation(&inst, 0.0, 10.0);
        assert!((r.x - (0.3 + 2.0)).abs() < 1e-5);
        assert!((r.y - (1.1 + 2.0)).abs() < 1e-5);
        assert_eq!(r.z, 2.0);
        assert_eq!(spin_rotation(&inst, 1.0, 10.0), inst.rotation);
    }

    #[test]
    fn test_assembled_transform_is_static() {
        let inst = ornament();
        let expected = Mat4::compose(inst.tree_position, inst.rotation, inst.scale);
        for t in [0.0, 1.0, 50.0] {
            let m = compose_instance(&inst, 7, 1.0, t);
            assert_eq!(m, expected);
            assert_eq!(m.translation_part(), inst.tree_position);
        }
    }

    #[test]
    fn test_scattered_transform_includes_drift() {
        let inst = ornament();
        let m = compose_instance(&inst, 2, 0.0, 3.0);
        let expected = inst.scatter_position + drift_offset(2, inst.weight, 0.0, 3.0);
        let t = m.translation_part();
        assert!((t.x - expected.x).abs() < 1e-5);
        assert!((t.y - expected.y).abs() < 1e-5);
        assert!((t.z - expected.z).abs() < 1e-5);
    }
}
