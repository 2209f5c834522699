//! Replay configuration (YAML).

use std::fs;
use std::num::NonZeroU64;
use std::path::Path;
use std::time::Duration;

use gr_results::OverlayConfig;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::scheduler::{DEFAULT_DELAY, DEFAULT_STEP_DIFFERENCE, PlaybackOptions};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplayConfig {
    /// Virtual clock advance per tick.
    pub step_difference: NonZeroU64,
    /// Pause between ticks.
    pub delay_ms: u64,
    /// Overlay shape expected of recorded runs.
    pub overlay: OverlayConfig,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            step_difference: DEFAULT_STEP_DIFFERENCE,
            delay_ms: DEFAULT_DELAY.as_millis() as u64,
            overlay: OverlayConfig::default(),
        }
    }
}

impl ReplayConfig {
    pub fn playback_options(&self) -> PlaybackOptions {
        PlaybackOptions {
            step_difference: self.step_difference,
            delay: Duration::from_millis(self.delay_ms),
            cancel: None,
        }
    }
}

pub fn parse_config(yaml: &str) -> Result<ReplayConfig, ConfigError> {
    Ok(serde_yaml::from_str(yaml)?)
}

pub fn load_config(path: &Path) -> Result<ReplayConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let config = parse_config("{}").unwrap();
        assert_eq!(config, ReplayConfig::default());
        assert_eq!(config.overlay.path_overlay_offset.get(), 10);
        assert_eq!(config.overlay.path_step_increment.get(), 5);
    }

    #[test]
    fn partial_overlay_keeps_other_defaults() {
        let config = parse_config("step_difference: 10\noverlay:\n  path_step_increment: 2\n").unwrap();
        assert_eq!(config.step_difference.get(), 10);
        assert_eq!(config.overlay.path_step_increment.get(), 2);
        assert_eq!(config.overlay.path_overlay_offset.get(), 10);

        let options = config.playback_options();
        assert_eq!(options.step_difference.get(), 10);
        assert_eq!(options.delay, DEFAULT_DELAY);
    }

    #[test]
    fn zero_step_difference_is_rejected() {
        assert!(matches!(
            parse_config("step_difference: 0"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn zero_overlay_gaps_are_rejected() {
        assert!(matches!(
            parse_config("overlay:\n  path_step_increment: 0\n"),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            parse_config("overlay:\n  path_overlay_offset: 0\n"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = load_config(Path::new("/definitely/not/here.yaml")).unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.yaml"));
    }
}
