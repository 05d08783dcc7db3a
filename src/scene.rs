//! Framework-free owner of the tree
//!
//! Builds the foliage and ornament data once, then turns each frame's
//! timing into the values a renderer needs: two foliage uniforms and one
//! matrix per ornament.

use rand::rngs::SmallRng;
use rand::SeedableRng;
use crate::animation::{compose_instance, FrameContext, MorphState, ModeMailbox, TreeMode};
use crate::config::{OrnamentKind, TreeConfig};
use crate::error::ConfigError;
use crate::generation::{entropy_seed, FoliageCloud, OrnamentSet};
use crate::math::Mat4;

/// Shared values consumed by the foliage vertex shader
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FoliageUniforms {
    pub progress: f32,
    pub time: f32,
}

/// Composed transforms for one ornament group, in instance order
#[derive(Debug, Clone, PartialEq)]
pub struct OrnamentBatch {
    pub kind: OrnamentKind,
    pub matrices: Vec<Mat4>,
}

impl OrnamentBatch {
    fn new(kind: OrnamentKind, capacity: usize) -> Self {
        Self {
            kind,
            matrices: Vec::with_capacity(capacity),
        }
    }

    /// Replace `out` with all matrices, column-major
    pub fn flatten_into(&self, out: &mut Vec<f32>) {
        out.clear();
        out.reserve(self.matrices.len() * 16);
        for m in &self.matrices {
            out.extend_from_slice(m.as_slice());
        }
    }
}

/// What one frame produces
#[derive(Debug, Clone, Copy)]
pub struct FrameOutput<'a> {
    pub uniforms: FoliageUniforms,
    pub ornaments: &'a [OrnamentBatch; 3],
}

pub struct TreeScene {
    config: TreeConfig,
    seed: u64,
    foliage: FoliageCloud,
    ornaments: OrnamentSet,
    morph: MorphState,
    mailbox: ModeMailbox,
    time: f32,
    batches: [OrnamentBatch; 3],
}

impl TreeScene {
    /// Validate `config` and generate everything. `None` picks a fresh seed.
    pub fn new(config: TreeConfig, seed: Option<u64>) -> Result<Self, ConfigError> {
        if let Err(e) = config.validate() {
            log::warn!("rejecting tree configuration: {}", e);
            return Err(e);
        }

        let seed = seed.unwrap_or_else(entropy_seed);
        let mut rng = SmallRng::seed_from_u64(seed);

        let foliage = FoliageCloud::generate(&config, &mut rng);
        let ornaments = OrnamentSet::generate(&config, &mut rng);
        let batches = OrnamentKind::ALL.map(|kind| OrnamentBatch::new(kind, ornaments.group(kind).len()));

        log::info!(
            "tree generated: {} particles ({} accent), {} ornaments, seed {}",
            foliage.len(),
            foliage.accent_count(),
            ornaments.total_count(),
            seed
        );

        let mut scene = Self {
            morph: MorphState::new(config.transition_speed),
            config,
            seed,
            foliage,
            ornaments,
            mailbox: ModeMailbox::new(),
            time: 0.0,
            batches,
        };
        scene.compose_ornaments();
        Ok(scene)
    }

    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn foliage(&self) -> &FoliageCloud {
        &self.foliage
    }

    pub fn ornaments(&self) -> &OrnamentSet {
        &self.ornaments
    }

    pub fn progress(&self) -> f32 {
        self.morph.progress()
    }

    pub fn mode(&self) -> TreeMode {
        self.morph.mode()
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    /// Handle for posting mode changes from another thread
    pub fn mailbox(&self) -> ModeMailbox {
        self.mailbox.clone()
    }

    /// Idempotent; returns whether the target changed. Any mode still
    /// waiting in the mailbox is older than this call and is dropped.
    pub fn set_mode(&mut self, mode: TreeMode) -> bool {
        self.mailbox.clear();
        self.apply_mode(mode)
    }

    fn apply_mode(&mut self, mode: TreeMode) -> bool {
        let changed = self.morph.set_mode(mode);
        if changed {
            log::debug!("tree mode -> {:?} at progress {:.3}", mode, self.morph.progress());
        }
        changed
    }

    pub fn toggle(&mut self) -> TreeMode {
        let next = self.mode().toggled();
        self.set_mode(next);
        next
    }

    pub fn uniforms(&self) -> FoliageUniforms {
        FoliageUniforms {
            progress: self.morph.progress(),
            time: self.time,
        }
    }

    pub fn batches(&self) -> &[OrnamentBatch; 3] {
        &self.batches
    }

    /// Advance one frame: drain the mailbox, smooth progress, recompose ornaments
    pub fn update(&mut self, ctx: &FrameContext) -> FrameOutput<'_> {
        if let Some(mode) = self.mailbox.take() {
            self.apply_mode(mode);
        }

        self.time = ctx.time;
        self.morph.step();
        self.compose_ornaments();

        FrameOutput {
            uniforms: self.uniforms(),
            ornaments: &self.batches,
        }
    }

    fn compose_ornaments(&mut self) {
        let progress = self.morph.progress();
        let time = self.time;

        for (batch, group) in self.batches.iter_mut().zip(self.ornaments.groups()) {
            batch.matrices.clear();
            batch.matrices.extend(
                group
                    .instances
                    .iter()
                    .enumerate()
                    .map(|(i, inst)| compose_instance(inst, i, progress, time)),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::{foliage_vertex, FrameClock};

    fn scenario_config() -> TreeConfig {
        TreeConfig {
            particle_count: 1000,
            height: 10.0,
            radius: 4.0,
            scatter_radius: 15.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_deterministic_with_seed() {
        let a = TreeScene::new(scenario_config(), Some(42)).unwrap();
        let b = TreeScene::new(scenario_config(), Some(42)).unwrap();

        assert_eq!(a.foliage(), b.foliage());
        assert_eq!(a.ornaments(), b.ornaments());
        assert_eq!(a.seed(), 42);
    }

    #[test]
    fn test_no_nan_in_generated_data() {
        let scene = TreeScene::new(scenario_config(), Some(42)).unwrap();

        for p in scene.foliage().particles() {
            assert!(p.tree_position.is_finite());
            assert!(p.scatter_position.is_finite());
            assert!(p.color.is_finite());
            assert!(p.size.is_finite());
        }
        for group in scene.ornaments().groups() {
            for inst in &group.instances {
                assert!(inst.tree_position.is_finite());
                assert!(inst.scatter_position.is_finite());
                assert!(inst.rotation.is_finite());
                assert!(inst.scale.is_finite() && inst.weight.is_finite());
            }
        }
        assert!(scene.foliage().attribute_data().iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_scatter_scenario() {
        let mut scene = TreeScene::new(scenario_config(), Some(42)).unwrap();
        assert_eq!(scene.progress(), 1.0);

        scene.set_mode(TreeMode::Scattered);
        let mut clock = FrameClock::new();
        for _ in 0..500 {
            let ctx = clock.tick(1.0 / 60.0);
            scene.update(&ctx);
        }

        assert!(scene.progress() < 0.01, "progress {}", scene.progress());
        for batch in scene.batches() {
            assert!(batch.matrices.iter().all(Mat4::is_finite));
        }
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = TreeConfig { height: 0.0, ..scenario_config() };
        assert!(TreeScene::new(config, Some(1)).is_err());
    }

    #[test]
    fn test_initial_batches_are_assembled() {
        let scene = TreeScene::new(scenario_config(), Some(7)).unwrap();
        for (batch, group) in scene.batches().iter().zip(scene.ornaments().groups()) {
            assert_eq!(batch.kind, group.kind);
            assert_eq!(batch.matrices.len(), group.len());
            for (m, inst) in batch.matrices.iter().zip(&group.instances) {
                assert_eq!(m.translation_part(), inst.tree_position);
            }
        }
    }

    #[test]
    fn test_set_mode_twice_is_noop() {
        let mut scene = TreeScene::new(scenario_config(), Some(3)).unwrap();
        assert!(scene.set_mode(TreeMode::Scattered));
        assert!(!scene.set_mode(TreeMode::Scattered));
        assert_eq!(scene.mode(), TreeMode::Scattered);
        assert_eq!(scene.progress(), 1.0);
    }

    #[test]
    fn test_toggle_round_trip() {
        let mut scene = TreeScene::new(scenario_config(), Some(3)).unwrap();
        assert_eq!(scene.toggle(), TreeMode::Scattered);
        assert_eq!(scene.toggle(), TreeMode::TreeShape);
    }

    #[test]
    fn test_mailbox_applied_on_update() {
        let mut scene = TreeScene::new(scenario_config(), Some(5)).unwrap();
        let mailbox = scene.mailbox();
        mailbox.post(TreeMode::Scattered);
        assert_eq!(scene.mode(), TreeMode::TreeShape);

        let out = scene.update(&FrameContext::new(0.016, 0.016));
        assert!(out.uniforms.progress < 1.0);
        assert_eq!(scene.mode(), TreeMode::Scattered);
    }

    #[test]
    fn test_direct_set_mode_overrides_older_post() {
        let mut scene = TreeScene::new(scenario_config(), Some(5)).unwrap();
        let mailbox = scene.mailbox();
        mailbox.post(TreeMode::Scattered);
        scene.set_mode(TreeMode::TreeShape);

        scene.update(&FrameContext::new(0.016, 0.016));
        assert_eq!(scene.mode(), TreeMode::TreeShape);
        assert_eq!(scene.progress(), 1.0);

        mailbox.post(TreeMode::Scattered);
        scene.update(&FrameContext::new(0.032, 0.016));
        assert_eq!(scene.mode(), TreeMode::Scattered);
    }

    #[test]
    fn test_frame_output_uniforms() {
        let mut scene = TreeScene::new(scenario_config(), Some(5)).unwrap();
        let out = scene.update(&FrameContext::new(2.5, 0.016));
        assert_eq!(out.uniforms, FoliageUniforms { progress: 1.0, time: 2.5 });
        assert_eq!(out.ornaments[1].kind, OrnamentKind::Box);
    }

    #[test]
    fn test_foliage_cpu_path_matches_uniforms() {
        let mut scene = TreeScene::new(scenario_config(), Some(11)).unwrap();
        scene.set_mode(TreeMode::Scattered);
        let uniforms = scene.update(&FrameContext::new(1.0, 1.0)).uniforms;

        let amplitude = scene.config().jitter_amplitude;
        for p in scene.foliage().particles().iter().take(50) {
            let v = foliage_vertex(p, uniforms.progress, uniforms.time, amplitude);
            let base = p.position_at(uniforms.progress);
            assert!((v.position.y - base.y).abs() < 1e-6);
            assert!((v.position.x - base.x).abs() <= amplitude + 1e-5);
        }
    }

    #[test]
    fn test_flatten_batch() {
        let scene = TreeScene::new(scenario_config(), Some(13)).unwrap();
        let batch = &scene.batches()[2];
        let mut buf = vec![99.0];
        batch.flatten_into(&mut buf);
        assert_eq!(buf.len(), batch.matrices.len() * 16);
        assert_eq!(&buf[16..32], batch.matrices[1].as_slice());
    }
}
