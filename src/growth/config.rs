use serde::Deserialize;
use crate::error::{Result, RootError};

/// Tunables controlling how a root grows
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GrowthConfig {
    /// Mesh assigned to each stem; stems are left bare when unset
    pub mesh: Option<String>,
    /// Target length of each stem
    pub segment_length: f32,
    /// Alpha gained per second on the in-progress stem
    pub growth_rate: f32,
    /// Seconds between growth ticks
    pub tick_interval: f32,
}

impl Default for GrowthConfig {
    fn default() -> Self {
        Self {
            mesh: None,
            segment_length: 20.0,
            growth_rate: 0.5,
            tick_interval: 0.05,
        }
    }
}

impl GrowthConfig {
    /// Parse from YAML string. Missing fields take their defaults.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: GrowthConfig = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// Reject values that would stall growth or tick forever
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("segment_length", self.segment_length),
            ("growth_rate", self.growth_rate),
            ("tick_interval", self.tick_interval),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(RootError::InvalidConfig { field, value });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = GrowthConfig::default();
        assert_eq!(config.segment_length, 20.0);
        assert_eq!(config.growth_rate, 0.5);
        assert_eq!(config.tick_interval, 0.05);
        assert!(config.mesh.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_yaml() {
        let yaml = r#"
mesh: "root_stem"
segment_length: 12.5
growth_rate: 2.0
"#;
        let config = GrowthConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.mesh.as_deref(), Some("root_stem"));
        assert_eq!(config.segment_length, 12.5);
        assert_eq!(config.growth_rate, 2.0);
        assert_eq!(config.tick_interval, 0.05);
    }

    #[test]
    fn test_parse_error() {
        let result = GrowthConfig::from_yaml("segment_length: [1, 2]");
        assert!(matches!(result, Err(RootError::Parse(_))));
    }

    #[test]
    fn test_rejects_non_positive_values() {
        let config = GrowthConfig {
            segment_length: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(RootError::InvalidConfig { field: "segment_length", .. })
        ));

        let config = GrowthConfig {
            growth_rate: -1.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(RootError::InvalidConfig { field: "growth_rate", .. })
        ));

        let config = GrowthConfig {
            tick_interval: f32::NAN,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
