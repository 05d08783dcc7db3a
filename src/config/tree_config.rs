use std::f32::consts::PI;
use rand::Rng;
use serde::{Deserialize, Serialize};
use crate::error::ConfigError;
use super::color::{Color, Palette};

/// Half-open sampling interval `[min, max)`, written `[min, max]` in YAML
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f32; 2]", into = "[f32; 2]")]
pub struct Range {
    pub min: f32,
    pub max: f32,
}

impl Range {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Uniform draw; a degenerate range always yields `min`
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        if self.min < self.max {
            rng.gen_range(self.min..self.max)
        } else {
            self.min
        }
    }

    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }

    fn validate(&self, field: impl Into<String>) -> Result<(), ConfigError> {
        if !self.min.is_finite() || !self.max.is_finite() || self.min > self.max {
            return Err(ConfigError::InvalidRange {
                field: field.into(),
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }
}

impl From<[f32; 2]> for Range {
    fn from([min, max]: [f32; 2]) -> Self {
        Self { min, max }
    }
}

impl From<Range> for [f32; 2] {
    fn from(r: Range) -> Self {
        [r.min, r.max]
    }
}

/// The three ornament groups. Membership is fixed at generation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrnamentKind {
    Ball,
    Box,
    Star,
}

impl OrnamentKind {
    pub const ALL: [OrnamentKind; 3] = [OrnamentKind::Ball, OrnamentKind::Box, OrnamentKind::Star];

    pub fn name(&self) -> &'static str {
        match self {
            OrnamentKind::Ball => "balls",
            OrnamentKind::Box => "boxes",
            OrnamentKind::Star => "stars",
        }
    }
}

/// Geometry drawn for every instance of a group
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum OrnamentPrimitive {
    Sphere { segments: u32, rings: u32 },
    Box,
}

/// Surface parameters for the instanced ornament shader
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrnamentMaterial {
    pub color: Color,
    pub emissive: Color,
    #[serde(default)]
    pub emissive_intensity: f32,
    #[serde(default)]
    pub metalness: f32,
    #[serde(default = "default_roughness")]
    pub roughness: f32,
}

fn default_roughness() -> f32 {
    1.0
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrnamentGroupConfig {
    pub count: usize,
    /// Uniform scale of each instance
    pub scale: Range,
    /// Drift and spin amplitude while not fully assembled
    pub weight: Range,
    pub primitive: OrnamentPrimitive,
    pub material: OrnamentMaterial,
}

impl OrnamentGroupConfig {
    pub fn default_balls() -> Self {
        Self {
            count: 150,
            scale: Range::new(0.15, 0.3),
            weight: Range::new(0.5, 1.0),
            primitive: OrnamentPrimitive::Sphere { segments: 16, rings: 16 },
            material: OrnamentMaterial {
                color: Color::from_rgb_u32(0xd4af37),
                emissive: Color::from_rgb_u32(0xffd700),
                emissive_intensity: 0.2,
                metalness: 0.9,
                roughness: 0.1,
            },
        }
    }

    pub fn default_boxes() -> Self {
        Self {
            count: 60,
            scale: Range::new(0.3, 0.6),
            weight: Range::new(1.5, 3.0),
            primitive: OrnamentPrimitive::Box,
            material: OrnamentMaterial {
                color: Color::from_rgb_u32(0x0b5d3b),
                emissive: Color::new(0.0, 0.0, 0.0),
                emissive_intensity: 0.0,
                metalness: 0.4,
                roughness: 0.5,
            },
        }
    }

    pub fn default_stars() -> Self {
        Self {
            count: 300,
            scale: Range::new(0.05, 0.15),
            weight: Range::new(0.1, 0.4),
            primitive: OrnamentPrimitive::Sphere { segments: 8, rings: 8 },
            material: OrnamentMaterial {
                color: Color::from_rgb_u32(0xffd700),
                emissive: Color::from_rgb_u32(0xffd700),
                emissive_intensity: 2.0,
                metalness: 0.0,
                roughness: 1.0,
            },
        }
    }

    fn validate(&self, group: &'static str) -> Result<(), ConfigError> {
        self.scale.validate(format!("{}.scale", group))?;
        self.weight.validate(format!("{}.weight", group))?;

        if self.scale.min <= 0.0 {
            return Err(ConfigError::NonPositive { field: format!("{}.scale", group), value: self.scale.min });
        }
        if self.weight.min < 0.0 {
            return Err(ConfigError::OutOfRange {
                field: format!("{}.weight", group),
                value: self.weight.min,
                min: 0.0,
                max: f32::INFINITY,
            });
        }

        if let OrnamentPrimitive::Sphere { segments, rings } = self.primitive {
            if segments < 3 {
                return Err(ConfigError::InvalidPrimitive { group, reason: "sphere needs at least 3 segments" });
            }
            if rings < 2 {
                return Err(ConfigError::InvalidPrimitive { group, reason: "sphere needs at least 2 rings" });
            }
        }

        let m = &self.material;
        unit_interval(&format!("{}.material.metalness", group), m.metalness)?;
        unit_interval(&format!("{}.material.roughness", group), m.roughness)?;
        if !(m.emissive_intensity >= 0.0 && m.emissive_intensity.is_finite()) {
            return Err(ConfigError::OutOfRange {
                field: format!("{}.material.emissive_intensity", group),
                value: m.emissive_intensity,
                min: 0.0,
                max: f32::INFINITY,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrnamentsConfig {
    pub balls: OrnamentGroupConfig,
    pub boxes: OrnamentGroupConfig,
    pub stars: OrnamentGroupConfig,
}

impl Default for OrnamentsConfig {
    fn default() -> Self {
        Self {
            balls: OrnamentGroupConfig::default_balls(),
            boxes: OrnamentGroupConfig::default_boxes(),
            stars: OrnamentGroupConfig::default_stars(),
        }
    }
}

impl OrnamentsConfig {
    pub fn group(&self, kind: OrnamentKind) -> &OrnamentGroupConfig {
        match kind {
            OrnamentKind::Ball => &self.balls,
            OrnamentKind::Box => &self.boxes,
            OrnamentKind::Star => &self.stars,
        }
    }

    pub fn total_count(&self) -> usize {
        OrnamentKind::ALL.iter().map(|k| self.group(*k).count).sum()
    }
}

/// Startup configuration for the whole tree. Not mutable at runtime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeConfig {
    /// Number of foliage points
    pub particle_count: usize,
    /// Cone height (H)
    pub height: f32,
    /// Cone base radius (R)
    pub radius: f32,
    /// Half-extent of the foliage scatter cube (S)
    pub scatter_radius: f32,
    /// Per-frame exponential smoothing factor for progress
    pub transition_speed: f32,
    /// Breathing amplitude on the foliage x/z axes
    pub jitter_amplitude: f32,
    /// Draws above this value become accent particles
    pub accent_threshold: f32,
    pub base_size: Range,
    pub accent_size: Range,
    pub palette: Palette,
    /// Ornaments stay below this fraction of H
    pub ornament_height_fraction: f32,
    /// Ornaments sit at this fraction of the cone radius
    pub ornament_radius_fraction: f32,
    /// Multiplies the scatter cube width for ornaments
    pub ornament_scatter_factor: f32,
    /// Range of each base Euler angle
    pub ornament_rotation: Range,
    pub ornaments: OrnamentsConfig,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            particle_count: 15_000,
            height: 12.0,
            radius: 4.5,
            scatter_radius: 15.0,
            transition_speed: 0.03,
            jitter_amplitude: 0.05,
            accent_threshold: 0.92,
            base_size: Range::new(0.5, 2.0),
            accent_size: Range::new(1.0, 3.0),
            palette: Palette::default(),
            ornament_height_fraction: 0.9,
            ornament_radius_fraction: 0.95,
            ornament_scatter_factor: 1.5,
            ornament_rotation: Range::new(0.0, PI),
            ornaments: OrnamentsConfig::default(),
        }
    }
}

impl TreeConfig {
    /// Parse a (possibly partial) YAML document and validate it
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: TreeConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Half-extent of the ornament scatter cube
    pub fn ornament_scatter_half_extent(&self) -> f32 {
        self.scatter_radius * self.ornament_scatter_factor * 0.5
    }

    /// Reject anything that would put NaN or infinities into the render output
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.particle_count == 0 {
            return Err(ConfigError::ZeroParticles);
        }

        positive("height", self.height)?;
        positive("radius", self.radius)?;
        positive("scatter_radius", self.scatter_radius)?;
        positive("ornament_scatter_factor", self.ornament_scatter_factor)?;

        if !(self.transition_speed > 0.0 && self.transition_speed <= 1.0) {
            return Err(ConfigError::OutOfRange {
                field: "transition_speed".to_string(),
                value: self.transition_speed,
                min: f32::MIN_POSITIVE,
                max: 1.0,
            });
        }
        unit_interval("accent_threshold", self.accent_threshold)?;

        if !(self.jitter_amplitude >= 0.0 && self.jitter_amplitude.is_finite()) {
            return Err(ConfigError::OutOfRange {
                field: "jitter_amplitude".to_string(),
                value: self.jitter_amplitude,
                min: 0.0,
                max: f32::INFINITY,
            });
        }

        fraction("ornament_height_fraction", self.ornament_height_fraction)?;
        fraction("ornament_radius_fraction", self.ornament_radius_fraction)?;

        self.base_size.validate("base_size")?;
        self.accent_size.validate("accent_size")?;
        if self.base_size.min < 0.0 || self.accent_size.min < 0.0 {
            return Err(ConfigError::OutOfRange {
                field: "particle size".to_string(),
                value: self.base_size.min.min(self.accent_size.min),
                min: 0.0,
                max: f32::INFINITY,
            });
        }
        self.ornament_rotation.validate("ornament_rotation")?;

        for kind in OrnamentKind::ALL {
            self.ornaments.group(kind).validate(kind.name())?;
        }
        Ok(())
    }
}

fn positive(field: &str, value: f32) -> Result<(), ConfigError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { field: field.to_string(), value })
    }
}

fn unit_interval(field: &str, value: f32) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange { field: field.to_string(), value, min: 0.0, max: 1.0 })
    }
}

fn fraction(field: &str, value: f32) -> Result<(), ConfigError> {
    if value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange { field: field.to_string(), value, min: 0.0, max: 1.0 })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn test_default_is_valid() {
        assert!(TreeConfig::default().validate().is_ok());
        assert_eq!(TreeConfig::default().ornaments.total_count(), 510);
    }

    #[test]
    fn test_partial_yaml_overrides() {
        let yaml = r#"
particle_count: 1000
height: 10.0
radius: 4.0
scatter_radius: 15.0
"#;
        let config = TreeConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.particle_count, 1000);
        assert_eq!(config.height, 10.0);
        assert_eq!(config.transition_speed, 0.03);
        assert_eq!(config.ornaments.boxes.count, 60);
    }

    #[test]
    fn test_group_yaml() {
        let yaml = r#"
ornaments:
  stars:
    count: 12
    scale: [0.1, 0.2]
    weight: [0.0, 0.5]
    primitive: { shape: sphere, segments: 6, rings: 4 }
    material: { color: '#ffffff', emissive: '#ffee88', emissive_intensity: 1.5 }
"#;
        let config = TreeConfig::from_yaml(yaml).unwrap();
        let stars = config.ornaments.group(OrnamentKind::Star);
        assert_eq!(stars.count, 12);
        assert_eq!(stars.scale, Range::new(0.1, 0.2));
        assert_eq!(stars.material.roughness, 1.0);
        assert_eq!(config.ornaments.balls, OrnamentGroupConfig::default_balls());
    }

    #[test]
    fn test_yaml_roundtrip() {
        let config = TreeConfig::default();
        let yaml = config.to_yaml().unwrap();
        assert_eq!(TreeConfig::from_yaml(&yaml).unwrap(), config);
    }

    #[test]
    fn test_rejects_zero_particles() {
        let config = TreeConfig { particle_count: 0, ..Default::default() };
        assert!(matches!(config.validate(), Err(ConfigError::ZeroParticles)));
    }

    #[test]
    fn test_rejects_degenerate_geometry() {
        for height in [0.0, -1.0, f32::NAN, f32::INFINITY] {
            let config = TreeConfig { height, ..Default::default() };
            assert!(
                matches!(config.validate(), Err(ConfigError::NonPositive { ref field, .. }) if field == "height"),
                "height {} should be rejected",
                height
            );
        }
        let config = TreeConfig { radius: 0.0, ..Default::default() };
        assert!(config.validate().is_err());
        let config = TreeConfig { scatter_radius: -2.0, ..Default::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_bad_smoothing() {
        for transition_speed in [0.0, -0.1, 1.5, f32::NAN] {
            let config = TreeConfig { transition_speed, ..Default::default() };
            assert!(config.validate().is_err());
        }
        let config = TreeConfig { transition_speed: 1.0, ..Default::default() };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_inverted_range() {
        let mut config = TreeConfig::default();
        config.ornaments.boxes.weight = Range::new(3.0, 1.5);
        assert!(matches!(config.validate(), Err(ConfigError::InvalidRange { .. })));

        let config = TreeConfig { accent_size: Range::new(f32::NAN, 1.0), ..Default::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_bad_primitive() {
        let mut config = TreeConfig::default();
        config.ornaments.balls.primitive = OrnamentPrimitive::Sphere { segments: 2, rings: 8 };
        assert!(matches!(config.validate(), Err(ConfigError::InvalidPrimitive { group: "balls", .. })));
    }

    #[test]
    fn test_group_errors_name_the_group() {
        let mut config = TreeConfig::default();
        config.ornaments.stars.scale = Range::new(0.0, 0.1);
        match config.validate() {
            Err(ConfigError::NonPositive { field, .. }) => assert_eq!(field, "stars.scale"),
            other => panic!("unexpected {:?}", other),
        }

        let mut config = TreeConfig::default();
        config.ornaments.boxes.weight = Range::new(-1.0, 1.0);
        let message = config.validate().unwrap_err().to_string();
        assert!(message.starts_with("boxes.weight"), "{}", message);

        let mut config = TreeConfig::default();
        config.ornaments.balls.material.metalness = 1.5;
        match config.validate() {
            Err(ConfigError::OutOfRange { field, .. }) => assert_eq!(field, "balls.material.metalness"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_zero_count_group_is_valid() {
        let mut config = TreeConfig::default();
        config.ornaments.stars.count = 0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_yaml() {
        assert!(matches!(TreeConfig::from_yaml("height: [1, 2"), Err(ConfigError::Yaml(_))));
        assert!(TreeConfig::from_yaml("height: 0").is_err());
    }

    #[test]
    fn test_range_sample() {
        let mut rng = SmallRng::seed_from_u64(7);
        let range = Range::new(0.15, 0.3);
        for _ in 0..1000 {
            let v = range.sample(&mut rng);
            assert!(v >= 0.15 && v < 0.3);
        }
        assert_eq!(Range::new(2.0, 2.0).sample(&mut rng), 2.0);
    }

    #[test]
    fn test_ornament_scatter_extent() {
        let config = TreeConfig { scatter_radius: 10.0, ..Default::default() };
        assert!((config.ornament_scatter_half_extent() - 7.5).abs() < 1e-6);
    }
}
