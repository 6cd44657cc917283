//! Pull-based effect pipeline for cascade.
//!
//! This crate provides:
//!
//! - **Pipeline**: [`Pipeline`] pulls interleaved frames from an
//!   [`AudioSource`](cascade_core::AudioSource), runs them through a chain of
//!   streaming transforms and hands back exactly the number of frames asked
//!   for, buffering across calls and restarting on a rewind to frame 0
//! - **Chain building**: [`ChainBuilder`] resolves effect specs against an
//!   [`EffectRegistry`](cascade_registry::EffectRegistry) and splits the
//!   chain into per-channel lanes when an effect only handles one channel
//! - **WAV file I/O**: [`read_wav`] and [`write_wav`] convert between files
//!   and full-scale 32-bit samples
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use cascade_config::{EffectSpec, PipelineConfig};
//! use cascade_core::MemorySource;
//! use cascade_io::{Pipeline, read_wav, write_wav};
//! use cascade_registry::EffectRegistry;
//!
//! let (samples, spec) = read_wav("input.wav")?;
//! let frames = samples.len() / spec.channels as usize;
//! let source = MemorySource::new(samples, spec.channels as usize, spec.sample_rate);
//!
//! let specs: Vec<EffectSpec> = vec!["vol -6dB".parse()?, "delay 0.1".parse()?];
//! let mut pipeline = Pipeline::new(source, &specs, &EffectRegistry::new(), &PipelineConfig::default())?;
//! let processed = pipeline.read(0, frames)?;
//!
//! write_wav("output.wav", &processed, spec)?;
//! ```

pub mod chain;
mod pipeline;
pub mod reader;
pub mod scheduler;
mod wav;

pub use chain::{Chain, ChainBuilder, EffectInstance};
pub use pipeline::Pipeline;
pub use reader::SourceReader;
pub use scheduler::{FlowScheduler, FlowStats};
pub use wav::{WavInfo, WavSpec, read_wav, read_wav_info, write_wav};

use cascade_config::ConfigError;

/// Error types for pipeline construction, processing and file I/O.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No handler is registered under this name.
    #[error("unknown effect '{name}'")]
    UnknownEffect {
        /// Requested effect name.
        name: String,
    },

    /// The effect changes the channel count or sample rate.
    #[error("effect '{name}' is not supported: {reason}")]
    UnsupportedEffect {
        /// Effect name.
        name: String,
        /// What the effect would change.
        reason: String,
    },

    /// The effect rejected its arguments or the signal it was started with.
    #[error("failed to configure effect '{name}': {message}")]
    Configuration {
        /// Effect name.
        name: String,
        /// The effect's own diagnostic.
        message: String,
    },

    /// The effect could not be restarted after a rewind.
    #[error("failed to restart effect '{name}': {message}")]
    Restart {
        /// Effect name.
        name: String,
        /// The effect's own diagnostic.
        message: String,
    },

    /// No effects were given.
    #[error("effect chain is empty")]
    EmptyChain,

    /// A transform failed mid-stream or broke the flow contract.
    #[error("effect '{name}' failed: {message}")]
    Flow {
        /// Effect name.
        name: String,
        /// What went wrong.
        message: String,
    },

    /// An earlier restart or transform failure left the pipeline unusable.
    #[error("pipeline halted after an earlier failure: {reason}")]
    Halted {
        /// The failure that halted the pipeline.
        reason: String,
    },

    /// The chain stopped delivering output.
    #[error("pipeline stalled after {passes} passes without output")]
    Stalled {
        /// Passes run since the last delivered sample.
        passes: usize,
    },

    /// The caller asked for something the pipeline cannot serve.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// A sample count does not divide into whole frames.
    #[error("{samples} samples do not divide into {channels} channels")]
    ChannelMismatch {
        /// Number of samples supplied.
        samples: usize,
        /// Channel count they were meant for.
        channels: usize,
    },

    /// Invalid pipeline settings or preset.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// WAV file read/write error.
    #[error("WAV file error: {0}")]
    Wav(#[from] hound::Error),

    /// Standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type for pipeline and I/O operations.
pub type Result<T> = std::result::Result<T, Error>;
