//! Pipeline tuning settings.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default bound on consecutive passes that produce no output.
pub const DEFAULT_MAX_IDLE_PASSES: usize = 1024;

/// Largest accepted source window, in frames.
pub const MAX_WINDOW_FRAMES: usize = 1 << 24;

/// Settings for a processing pipeline.
///
/// ```toml
/// window_frames = 4096
/// max_idle_passes = 1024
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Frames fetched from the source per refill. `None` means one second
    /// of audio at the source sample rate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub window_frames: Option<usize>,

    /// Consecutive passes without tail output before a read gives up.
    pub max_idle_passes: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            window_frames: None,
            max_idle_passes: DEFAULT_MAX_IDLE_PASSES,
        }
    }
}

impl PipelineConfig {
    /// Set a fixed source window size in frames.
    pub fn with_window_frames(mut self, frames: usize) -> Self {
        self.window_frames = Some(frames);
        self
    }

    /// Set the idle pass bound.
    pub fn with_max_idle_passes(mut self, passes: usize) -> Self {
        self.max_idle_passes = passes;
        self
    }

    /// Source window in frames for a stream at `sample_rate`.
    pub fn window_frames_for(&self, sample_rate: u32) -> usize {
        self.window_frames
            .unwrap_or_else(|| (sample_rate as usize).max(1))
    }

    /// Reject settings the pipeline cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window_frames == Some(0) {
            return Err(ConfigError::invalid("window_frames", "must be at least 1"));
        }
        if let Some(frames) = self.window_frames.filter(|&f| f > MAX_WINDOW_FRAMES) {
            return Err(ConfigError::invalid(
                "window_frames",
                format!("{frames} exceeds the limit of {MAX_WINDOW_FRAMES}"),
            ));
        }
        if self.max_idle_passes == 0 {
            return Err(ConfigError::invalid("max_idle_passes", "must be at least 1"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_window_is_one_second() {
        let config = PipelineConfig::default();
        assert_eq!(config.window_frames_for(8000), 8000);
        assert_eq!(config.window_frames_for(0), 1);
        assert_eq!(config.max_idle_passes, DEFAULT_MAX_IDLE_PASSES);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn explicit_window_wins() {
        let config = PipelineConfig::default().with_window_frames(256);
        assert_eq!(config.window_frames_for(48000), 256);
    }

    #[test]
    fn zero_settings_are_invalid() {
        let err = PipelineConfig::default().with_window_frames(0).validate();
        assert!(matches!(err, Err(ConfigError::InvalidConfig { ref setting, .. }) if setting == "window_frames"));

        let err = PipelineConfig::default().with_max_idle_passes(0).validate();
        assert!(matches!(err, Err(ConfigError::InvalidConfig { ref setting, .. }) if setting == "max_idle_passes"));
    }

    #[test]
    fn oversized_window_is_invalid() {
        assert!(
            PipelineConfig::default()
                .with_window_frames(MAX_WINDOW_FRAMES)
                .validate()
                .is_ok()
        );
        let err = PipelineConfig::default()
            .with_window_frames(usize::MAX)
            .validate()
            .unwrap_err();
        assert!(err.to_string().contains("exceeds the limit"), "{err}");
    }

    #[test]
    fn missing_fields_take_defaults() {
        let config: PipelineConfig = toml::from_str("window_frames = 64").unwrap();
        assert_eq!(config.window_frames, Some(64));
        assert_eq!(config.max_idle_passes, DEFAULT_MAX_IDLE_PASSES);
    }
}
