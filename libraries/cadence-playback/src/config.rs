//! Player configuration

use crate::types::RepeatMode;
use serde::{Deserialize, Serialize};

/// Startup settings for the player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerConfig {
    /// Initial volume in [0, 1] (default: 0.8)
    #[serde(default = "default_volume")]
    pub initial_volume: f32,

    /// Initial repeat mode (default: Off)
    #[serde(default)]
    pub repeat: RepeatMode,

    /// Shuffle the queue right after loading (default: false)
    #[serde(default)]
    pub shuffle: bool,
}

impl PlayerConfig {
    /// Check value ranges
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.initial_volume) {
            return Err(format!(
                "initial_volume must be within [0, 1], got {}",
                self.initial_volume
            ));
        }
        Ok(())
    }
}

fn default_volume() -> f32 {
    0.8
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            initial_volume: default_volume(),
            repeat: RepeatMode::Off,
            shuffle: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = PlayerConfig::default();
        assert_eq!(config.initial_volume, 0.8);
        assert_eq!(config.repeat, RepeatMode::Off);
        assert!(!config.shuffle);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_config_fills_defaults() {
        let config: PlayerConfig = serde_json::from_str(r#"{"repeat":"all"}"#).unwrap();
        assert_eq!(config.repeat, RepeatMode::All);
        assert_eq!(config.initial_volume, 0.8);
    }

    #[test]
    fn out_of_range_volume_is_invalid() {
        let config = PlayerConfig {
            initial_volume: 1.5,
            ..PlayerConfig::default()
        };
        assert!(config.validate().is_err());

        let config = PlayerConfig {
            initial_volume: f32::NAN,
            ..PlayerConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
