/// Console configuration
use anyhow::{bail, Context, Result};
use cadence_playback::PlayerConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default config file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "cadence.toml";

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ConsoleConfig {
    #[serde(default)]
    pub player: PlayerConfig,

    #[serde(default)]
    pub display: DisplaySettings,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DisplaySettings {
    /// Characters used for the progress bar
    #[serde(default = "default_progress_width")]
    pub progress_width: usize,

    /// Print the full track list after the queue changes
    #[serde(default = "default_show_queue")]
    pub show_queue: bool,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            progress_width: default_progress_width(),
            show_queue: default_show_queue(),
        }
    }
}

impl ConsoleConfig {
    /// Load configuration from file and environment
    ///
    /// An explicit `path` must exist; otherwise `cadence.toml` is used when
    /// present. Variables like `CADENCE_PLAYER__INITIAL_VOLUME=0.5` override
    /// file values.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                settings = settings.add_source(config::File::from(path.to_path_buf()));
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        settings = settings.add_source(
            config::Environment::with_prefix("CADENCE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = settings
            .build()
            .context("Failed to read configuration")?;

        config
            .try_deserialize()
            .context("Invalid configuration")
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if let Err(reason) = self.player.validate() {
            bail!("player: {reason}");
        }

        if self.display.progress_width == 0 {
            bail!("display: progress_width must be at least 1");
        }

        Ok(())
    }
}

// Default values
fn default_progress_width() -> usize {
    30
}

fn default_show_queue() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadence_playback::RepeatMode;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn defaults_are_valid() {
        let config = ConsoleConfig::default();
        assert_eq!(config.player, PlayerConfig::default());
        assert_eq!(config.display.progress_width, 30);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn load_from_file() {
        let file = write_config(
            r#"
[player]
initial_volume = 0.25
repeat = "all"
shuffle = true

[display]
progress_width = 10
"#,
        );

        let config = ConsoleConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.player.initial_volume, 0.25);
        assert_eq!(config.player.repeat, RepeatMode::All);
        assert!(config.player.shuffle);
        assert_eq!(config.display.progress_width, 10);
        assert!(config.display.show_queue);
    }

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let file = write_config("[display]\nshow_queue = false\n");

        let config = ConsoleConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.player, PlayerConfig::default());
        assert!(!config.display.show_queue);
    }

    #[test]
    fn explicit_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = ConsoleConfig::load(Some(&dir.path().join("absent.toml")));
        assert!(result.is_err());
    }

    #[test]
    fn validate_rejects_out_of_range_volume() {
        let mut config = ConsoleConfig::default();
        config.player.initial_volume = 1.5;
        assert!(config.validate().is_err());

        config.player.initial_volume = 0.5;
        config.display.progress_width = 0;
        assert!(config.validate().is_err());
    }
}
