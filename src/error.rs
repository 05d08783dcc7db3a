//! Error types for tree configuration.
//!
//! Generation and animation are pure arithmetic and cannot fail once the
//! configuration has been accepted, so every failure is reported up front.

use std::fmt;

/// Errors raised while loading or validating a [`TreeConfig`](crate::config::TreeConfig).
#[derive(Debug)]
pub enum ConfigError {
    /// The YAML document could not be parsed.
    Yaml(serde_yaml::Error),
    /// The foliage needs at least one particle.
    ZeroParticles,
    /// A length or factor that must be strictly positive and finite.
    NonPositive { field: String, value: f32 },
    /// A scalar outside its permitted closed interval.
    OutOfRange { field: String, value: f32, min: f32, max: f32 },
    /// A sampling range with non-finite bounds or `min > max`.
    InvalidRange { field: String, min: f32, max: f32 },
    /// A color string that is not `#rrggbb`.
    InvalidColor(String),
    /// An ornament primitive that cannot be tessellated.
    InvalidPrimitive { group: &'static str, reason: &'static str },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Yaml(e) => write!(f, "YAML parse error: {}", e),
            ConfigError::ZeroParticles => write!(f, "particle_count must be at least 1"),
            ConfigError::NonPositive { field, value } => {
                write!(f, "{} must be positive and finite, got {}", field, value)
            }
            ConfigError::OutOfRange { field, value, min, max } => {
                write!(f, "{} must lie within [{}, {}], got {}", field, min, max, value)
            }
            ConfigError::InvalidRange { field, min, max } => {
                write!(f, "{} range is invalid: [{}, {}]", field, min, max)
            }
            ConfigError::InvalidColor(s) => write!(f, "invalid color '{}', expected #rrggbb", s),
            ConfigError::InvalidPrimitive { group, reason } => {
                write!(f, "{} primitive is invalid: {}", group, reason)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Yaml(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(e: serde_yaml::Error) -> Self {
        ConfigError::Yaml(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_display_messages() {
        let e = ConfigError::NonPositive { field: "height".to_string(), value: 0.0 };
        assert_eq!(e.to_string(), "height must be positive and finite, got 0");

        let e = ConfigError::InvalidColor("gold".to_string());
        assert!(e.to_string().contains("gold"));
    }

    #[test]
    fn test_yaml_source() {
        let yaml_err = serde_yaml::from_str::<u32>("[not a number").unwrap_err();
        let e: ConfigError = yaml_err.into();
        assert!(e.source().is_some());
        assert!(ConfigError::ZeroParticles.source().is_none());
    }
}
