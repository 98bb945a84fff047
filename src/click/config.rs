//! Click sound settings — the `click` section of the config file.

use serde::{Deserialize, Serialize};

use super::plan::PlaybackMode;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClickConfig {
    /// Output sample rate in Hz.
    pub sample_rate: u32,
    /// Pitch of the first click of each bar.
    pub downbeat_hz: f64,
    /// Pitch of the other clicks.
    pub beat_hz: f64,
    /// Length of one click sound.
    pub click_secs: f64,
    /// Output gain (0.0 to 1.0).
    pub gain: f32,
    pub mode: PlaybackMode,
}

impl Default for ClickConfig {
    fn default() -> Self {
        Self {
            sample_rate: 44100,
            downbeat_hz: 1500.0,
            beat_hz: 1000.0,
            click_secs: 0.05,
            gain: 0.8,
            mode: PlaybackMode::Repeat,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = ClickConfig::default();
        assert_eq!(config.sample_rate, 44100);
        assert_eq!(config.mode, PlaybackMode::Repeat);
        assert!(config.downbeat_hz > config.beat_hz);
    }

    #[test]
    fn partial_yaml_keeps_defaults() {
        let yaml = "sample_rate: 48000\nmode: per-bar\n";
        let config: ClickConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.sample_rate, 48000);
        assert_eq!(config.mode, PlaybackMode::PerBar);
        assert_eq!(config.beat_hz, 1000.0);
    }
}
