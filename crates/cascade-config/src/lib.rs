//! Configuration and presets for cascade effect pipelines.
//!
//! # Features
//!
//! - **Effect specs**: [`EffectSpec`] parses `name arg arg...` strings
//! - **Pipeline settings**: [`PipelineConfig`] holds the source window size
//!   and the idle-pass bound
//! - **Presets**: [`Preset`] loads and saves whole chains as TOML
//!
//! # Example
//!
//! ```rust,no_run
//! use cascade_config::{EffectSpec, PipelineConfig, Preset};
//!
//! let preset = Preset::new("Quieter")
//!     .with_effect("vol -6dB".parse::<EffectSpec>().unwrap())
//!     .with_pipeline(PipelineConfig::default().with_window_frames(4096));
//! preset.save("presets/quieter.toml").unwrap();
//!
//! let loaded = Preset::load("presets/quieter.toml").unwrap();
//! assert_eq!(loaded, preset);
//! ```

mod effect_spec;
mod error;
mod pipeline;
mod preset;

pub use effect_spec::EffectSpec;
pub use error::ConfigError;
pub use pipeline::{DEFAULT_MAX_IDLE_PASSES, MAX_WINDOW_FRAMES, PipelineConfig};
pub use preset::Preset;
