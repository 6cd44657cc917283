//! The pull-based pipeline driver.

use cascade_config::{EffectSpec, PipelineConfig, Preset};
use cascade_core::{AudioSource, Diagnostics, Sample, Severity, SignalInfo};
use cascade_registry::EffectRegistry;

use crate::chain::{Chain, ChainBuilder, failure_message};
use crate::reader::SourceReader;
use crate::scheduler::{FlowScheduler, FlowStats};
use crate::{Error, Result};

/// An effect chain wrapped around an [`AudioSource`], read on demand.
///
/// Each [`read`](Pipeline::read) returns exactly the requested number of
/// frames. Output the chain produces beyond that stays buffered for the next
/// call. Asking for frame 0 (or earlier) after the stream has moved on
/// restarts every restart-safe effect and replays the source from the start.
///
/// A failed restart or a failing transform halts the pipeline: that read and
/// every later one return an error.
///
/// # Example
///
/// ```rust
/// use cascade_config::{EffectSpec, PipelineConfig};
/// use cascade_core::MemorySource;
/// use cascade_io::Pipeline;
/// use cascade_registry::EffectRegistry;
///
/// let source = MemorySource::new(vec![100, -100, 3, -3], 2, 8000);
/// let specs: Vec<EffectSpec> = vec!["vol 0.5".parse().unwrap()];
/// let mut pipeline =
///     Pipeline::new(source, &specs, &EffectRegistry::new(), &PipelineConfig::default()).unwrap();
///
/// assert_eq!(pipeline.read(0, 2).unwrap(), [50, -50, 2, -2]);
/// ```
#[derive(Debug)]
pub struct Pipeline<S: AudioSource> {
    chain: Chain,
    reader: SourceReader<S>,
    scheduler: FlowScheduler,
    diagnostics: Diagnostics,
    signal: SignalInfo,
    lane_signal: SignalInfo,
    max_idle_passes: usize,
    /// Frames delivered since the last restart.
    position: u64,
    halted: Option<String>,
}

impl<S: AudioSource> Pipeline<S> {
    /// Build a pipeline from effect specs.
    pub fn new(
        source: S,
        specs: &[EffectSpec],
        registry: &EffectRegistry,
        config: &PipelineConfig,
    ) -> Result<Self> {
        config.validate()?;

        let signal = SignalInfo::new(source.sample_rate(), source.channels());
        if signal.channels == 0 {
            return Err(Error::InvalidRequest("source has no channels".into()));
        }
        let window_frames = config.window_frames_for(signal.sample_rate);

        let mut diagnostics = Diagnostics::new();
        let mut builder = ChainBuilder::new(registry, signal, window_frames);
        for spec in specs {
            builder.push(spec, &mut diagnostics)?;
        }
        let chain = builder.build(&mut diagnostics)?;

        let lane_signal = if chain.is_split() {
            SignalInfo::new(signal.sample_rate, 1)
        } else {
            signal
        };
        let reader = SourceReader::new(source, chain.stride(), window_frames);

        tracing::debug!(
            channels = signal.channels,
            sample_rate = signal.sample_rate,
            window_frames,
            effects = ?chain.effect_names(),
            split = chain.is_split(),
            "pipeline ready"
        );

        let mut pipeline = Self {
            chain,
            reader,
            scheduler: FlowScheduler::new(),
            diagnostics,
            signal,
            lane_signal,
            max_idle_passes: config.max_idle_passes,
            position: 0,
            halted: None,
        };
        pipeline.forward_diagnostics();
        Ok(pipeline)
    }

    /// Build a pipeline from a preset's effects and settings.
    pub fn from_preset(source: S, preset: &Preset, registry: &EffectRegistry) -> Result<Self> {
        Self::new(source, &preset.effects, registry, &preset.pipeline)
    }

    /// Signal shape of the source (and of the output).
    pub fn signal(&self) -> SignalInfo {
        self.signal
    }

    /// Number of interleaved channels.
    pub fn channels(&self) -> usize {
        self.signal.channels
    }

    /// The effect chain.
    pub fn chain(&self) -> &Chain {
        &self.chain
    }

    /// Frame index of the next upstream read.
    pub fn next_start(&self) -> u64 {
        self.reader.next_start()
    }

    /// Frames delivered since the stream (re)started.
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Flow statistics.
    pub fn stats(&self) -> FlowStats {
        self.scheduler.stats()
    }

    /// The wrapped source.
    pub fn source(&self) -> &S {
        self.reader.source()
    }

    /// Returns true once a fatal failure has halted the pipeline.
    pub fn is_halted(&self) -> bool {
        self.halted.is_some()
    }

    /// Read `frames` frames of processed audio starting at `start_frame`.
    ///
    /// Returns `frames * channels` interleaved samples.
    pub fn read(&mut self, start_frame: i64, frames: usize) -> Result<Vec<Sample>> {
        let len = frames
            .checked_mul(self.signal.channels)
            .ok_or_else(|| Error::InvalidRequest(format!("{frames} frames is too many")))?;
        let mut out = vec![0; len];
        self.read_into(start_frame, &mut out)?;
        Ok(out)
    }

    /// Fill `out` with processed audio starting at `start_frame`.
    ///
    /// `out` must hold a whole number of frames.
    pub fn read_into(&mut self, start_frame: i64, out: &mut [Sample]) -> Result<()> {
        if let Some(reason) = &self.halted {
            return Err(Error::Halted {
                reason: reason.clone(),
            });
        }
        if out.len() % self.signal.channels != 0 {
            return Err(Error::InvalidRequest(format!(
                "{} samples is not a whole number of {}-channel frames",
                out.len(),
                self.signal.channels
            )));
        }
        if out.is_empty() {
            return Ok(());
        }

        let result = self.fill(start_frame, out);
        self.forward_diagnostics();
        if let Err(err @ (Error::Restart { .. } | Error::Flow { .. })) = &result {
            tracing::error!(error = %err, "pipeline halted");
            self.halted = Some(err.to_string());
        }
        result
    }

    fn fill(&mut self, start_frame: i64, out: &mut [Sample]) -> Result<()> {
        if start_frame <= 0 && self.reader.next_start() > 0 {
            self.restart()?;
        } else if start_frame > 0 && start_frame.unsigned_abs() != self.position {
            tracing::warn!(
                requested = start_frame,
                position = self.position,
                "non-contiguous read, continuing from current position"
            );
        }

        let mut delivered = 0;
        let mut idle_passes = 0;
        while delivered < out.len() {
            let copied = self.drain_tail(&mut out[delivered..]);
            if copied > 0 {
                delivered += copied;
                idle_passes = 0;
                continue;
            }

            let active = self.pass()?;
            idle_passes += 1;
            if !active || idle_passes > self.max_idle_passes {
                tracing::warn!(
                    passes = idle_passes,
                    delivered,
                    requested = out.len(),
                    "pipeline stalled"
                );
                return Err(Error::Stalled {
                    passes: idle_passes,
                });
            }
        }

        self.position += (out.len() / self.signal.channels) as u64;
        Ok(())
    }

    /// Run every stage once, in order. Returns false if nothing moved.
    fn pass(&mut self) -> Result<bool> {
        let mut active = false;
        for n in 0..self.chain.len() {
            let flow =
                self.scheduler
                    .advance(&mut self.chain, &mut self.reader, n, &mut self.diagnostics)?;
            active |= !flow.is_idle();
        }
        self.scheduler.record_pass();
        tracing::trace!(stats = ?self.scheduler.stats(), active, "pass complete");
        Ok(active)
    }

    /// Copy buffered tail output into `out`, re-interleaving lanes.
    fn drain_tail(&mut self, out: &mut [Sample]) -> usize {
        let stride = self.chain.stride();
        let tail = self.chain.tail_mut();

        if stride == 1 {
            let buffer = &mut tail[0].buffer;
            let n = buffer.len().min(out.len());
            out[..n].copy_from_slice(&buffer.readable()[..n]);
            buffer.consume(n);
            return n;
        }

        let available = tail.iter().map(|s| s.buffer.len()).min().unwrap_or(0);
        let frames = available.min(out.len() / stride);
        if frames == 0 {
            return 0;
        }
        for (lane, stage) in tail.iter_mut().enumerate() {
            let readable = &stage.buffer.readable()[..frames];
            for (frame, &sample) in out.chunks_exact_mut(stride).zip(readable) {
                frame[lane] = sample;
            }
            stage.buffer.consume(frames);
        }
        frames * stride
    }

    /// Stop and start restart-safe stages, drop buffered audio and rewind.
    fn restart(&mut self) -> Result<()> {
        tracing::info!(
            next_start = self.reader.next_start(),
            position = self.position,
            "rewind to start, restarting effects"
        );

        let lane_signal = self.lane_signal;
        for stage in self.chain.stages_mut() {
            if stage.is_restartable() {
                stage.stop();
                if stage.start(&lane_signal, &mut self.diagnostics).is_err() {
                    return Err(Error::Restart {
                        name: stage.name().to_string(),
                        message: failure_message(&self.diagnostics),
                    });
                }
            }
            stage.buffer.clear();
        }

        self.reader.rewind();
        self.position = 0;
        Ok(())
    }

    fn forward_diagnostics(&mut self) {
        for diagnostic in self.diagnostics.drain() {
            match diagnostic.severity {
                Severity::Error => tracing::debug!(message = %diagnostic.message, "effect error"),
                Severity::Warning => tracing::warn!(message = %diagnostic.message, "effect warning"),
                Severity::Info => tracing::debug!(message = %diagnostic.message, "effect note"),
            }
        }
    }
}
