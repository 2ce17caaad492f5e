use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::map::WallFilter;

pub const AUDIO_CONFIG_PATH: &str = "assets/audio_config.ron";

/// Static audio-occlusion configuration, loaded once at startup.
///
/// Changing these values requires rebuilding the zoned map, so they are not
/// hot-reloaded.
#[derive(Resource, Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct AudioConfig {
    /// Attenuation radius; zone spacing is half of it and zone coverage 1.5× it.
    pub speaking_radius: f64,
    /// How walls are matched against a zone's coverage circle.
    pub wall_filter: WallFilter,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            speaking_radius: 10.0,
            wall_filter: WallFilter::LineApproximation,
        }
    }
}

impl AudioConfig {
    /// Read and parse a RON config file, falling back to defaults on any error.
    pub fn load_or_default(path: &str) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => match Self::from_ron(&contents) {
                Ok(config) => {
                    info!(
                        "[AUDIO CONFIG] Loaded {} (speaking radius {})",
                        path, config.speaking_radius
                    );
                    config
                }
                Err(e) => {
                    error!("[AUDIO CONFIG] Failed to parse {}: {}", path, e);
                    error!("[AUDIO CONFIG] Using default AudioConfig");
                    Self::default()
                }
            },
            Err(e) => {
                error!("[AUDIO CONFIG] Failed to read {}: {}", path, e);
                error!("[AUDIO CONFIG] Using default AudioConfig");
                Self::default()
            }
        }
    }

    pub fn from_ron(contents: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str(contents)
    }
}

/// Startup system: insert the [`AudioConfig`] resource unless one was provided.
pub(super) fn load_audio_config(mut commands: Commands, existing: Option<Res<AudioConfig>>) {
    if existing.is_some() {
        debug!("[AUDIO CONFIG] Using AudioConfig inserted by the app");
        return;
    }
    commands.insert_resource(AudioConfig::load_or_default(AUDIO_CONFIG_PATH));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let config =
            AudioConfig::from_ron("(speaking_radius: 24.0, wall_filter: ClampedSegment)").unwrap();
        assert_eq!(config.speaking_radius, 24.0);
        assert_eq!(config.wall_filter, WallFilter::ClampedSegment);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config = AudioConfig::from_ron("(speaking_radius: 6.0)").unwrap();
        assert_eq!(config.speaking_radius, 6.0);
        assert_eq!(config.wall_filter, WallFilter::LineApproximation);
    }

    #[test]
    fn test_malformed_config_is_an_error() {
        assert!(AudioConfig::from_ron("(speaking_radius: \"loud\")").is_err());
    }

    #[test]
    fn test_missing_file_falls_back_to_default() {
        let config = AudioConfig::load_or_default("assets/does_not_exist.ron");
        assert_eq!(config, AudioConfig::default());
    }

    #[test]
    fn test_shipped_config_parses() {
        let contents = std::fs::read_to_string(AUDIO_CONFIG_PATH).unwrap();
        assert!(AudioConfig::from_ron(&contents).is_ok());
    }
}
