//! Effect instances and chain construction.
//!
//! A chain is either *uniform*, where every instance sees the interleaved
//! signal, or *split*, where the chain is replicated once per channel and
//! every instance sees a single de-interleaved lane. The decision is made
//! while the effect specs are accepted and never changes afterwards.
//!
//! Split chains are stored as a flattened `effects x channels` grid, lanes
//! of one effect consecutive:
//!
//! ```text
//! stride = 2
//! stages: [vol/L, vol/R, compand/L, compand/R]
//!           0      1      2          3
//! stage n reads from stage n - stride (or from the source window if n < stride)
//! ```

use std::sync::Arc;

use cascade_config::EffectSpec;
use cascade_core::{
    Diagnostics, EffectFailure, EffectFlags, EffectHandler, SignalInfo, StageBuffer, Transform,
};
use cascade_registry::EffectRegistry;

use crate::{Error, Result};

/// One configured transform with its private output buffer.
pub struct EffectInstance {
    pub(crate) handler: Arc<dyn EffectHandler>,
    pub(crate) transform: Box<dyn Transform>,
    pub(crate) buffer: StageBuffer,
    lane: usize,
    started: bool,
}

impl EffectInstance {
    fn new(
        handler: Arc<dyn EffectHandler>,
        transform: Box<dyn Transform>,
        capacity: usize,
        lane: usize,
    ) -> Self {
        Self {
            handler,
            transform,
            buffer: StageBuffer::new(capacity),
            lane,
            started: false,
        }
    }

    /// Registered effect name.
    pub fn name(&self) -> &str {
        self.handler.name()
    }

    /// Shared handler this instance was created from.
    pub fn handler(&self) -> &Arc<dyn EffectHandler> {
        &self.handler
    }

    /// Lane index (always 0 in a uniform chain).
    pub fn lane(&self) -> usize {
        self.lane
    }

    /// Output buffer.
    pub fn buffer(&self) -> &StageBuffer {
        &self.buffer
    }

    /// Whether the handler declares the transform safe to stop and restart.
    pub fn is_restartable(&self) -> bool {
        self.handler.is_restartable()
    }

    pub(crate) fn start(
        &mut self,
        signal: &SignalInfo,
        diagnostics: &mut Diagnostics,
    ) -> std::result::Result<(), EffectFailure> {
        let result = self.transform.start(signal, diagnostics);
        self.started = result.is_ok();
        result
    }

    /// Stop the transform if its last start succeeded.
    pub(crate) fn stop(&mut self) {
        if self.started {
            self.transform.stop();
            self.started = false;
        }
    }
}

impl std::fmt::Debug for EffectInstance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EffectInstance")
            .field("name", &self.name())
            .field("lane", &self.lane)
            .field("started", &self.started)
            .field("buffer", &self.buffer)
            .finish_non_exhaustive()
    }
}

/// An ordered, started chain of effect instances.
#[derive(Debug)]
pub enum Chain {
    /// Every instance processes the interleaved signal.
    Uniform(Vec<EffectInstance>),
    /// Every effect is replicated once per channel.
    Split {
        /// Lanes per effect (the channel count).
        stride: usize,
        /// Flattened `effects x stride` grid.
        stages: Vec<EffectInstance>,
    },
}

impl Chain {
    /// Distance between an instance and the one feeding it.
    pub fn stride(&self) -> usize {
        match self {
            Chain::Uniform(_) => 1,
            Chain::Split { stride, .. } => *stride,
        }
    }

    /// Returns true for a per-channel chain.
    pub fn is_split(&self) -> bool {
        matches!(self, Chain::Split { .. })
    }

    /// All instances in processing order.
    pub fn stages(&self) -> &[EffectInstance] {
        match self {
            Chain::Uniform(stages) | Chain::Split { stages, .. } => stages,
        }
    }

    pub(crate) fn stages_mut(&mut self) -> &mut [EffectInstance] {
        match self {
            Chain::Uniform(stages) | Chain::Split { stages, .. } => stages,
        }
    }

    /// The last `stride` instances, whose buffers hold the chain output.
    pub fn tail(&self) -> &[EffectInstance] {
        let stages = self.stages();
        &stages[stages.len() - self.stride()..]
    }

    pub(crate) fn tail_mut(&mut self) -> &mut [EffectInstance] {
        let stride = self.stride();
        let stages = self.stages_mut();
        let start = stages.len() - stride;
        &mut stages[start..]
    }

    /// Number of instances.
    pub fn len(&self) -> usize {
        self.stages().len()
    }

    /// Returns true if the chain holds no instances.
    pub fn is_empty(&self) -> bool {
        self.stages().is_empty()
    }

    /// Number of effects, counting replicated lanes once.
    pub fn effect_count(&self) -> usize {
        self.len() / self.stride()
    }

    /// Effect names in chain order, one per effect.
    pub fn effect_names(&self) -> Vec<&str> {
        self.stages()
            .iter()
            .step_by(self.stride())
            .map(EffectInstance::name)
            .collect()
    }
}

impl Drop for Chain {
    fn drop(&mut self) {
        for stage in self.stages_mut() {
            if stage.is_restartable() {
                stage.stop();
            }
        }
    }
}

/// An effect accepted by the builder, with one transform per lane.
struct Accepted {
    handler: Arc<dyn EffectHandler>,
    args: Vec<String>,
    lanes: Vec<Box<dyn Transform>>,
}

/// Builds a [`Chain`] from effect specs.
///
/// Specs are accepted one at a time, in chain order. The first effect that
/// cannot handle interleaved multi-channel input switches the builder to
/// split mode: every effect accepted so far, and every effect accepted
/// afterwards, gets one transform per channel.
///
/// # Example
///
/// ```rust
/// use cascade_config::EffectSpec;
/// use cascade_core::{Diagnostics, SignalInfo};
/// use cascade_io::ChainBuilder;
/// use cascade_registry::EffectRegistry;
///
/// let registry = EffectRegistry::new();
/// let mut diagnostics = Diagnostics::new();
/// let mut builder = ChainBuilder::new(&registry, SignalInfo::new(8000, 2), 8000);
/// for spec in ["vol 0.5", "compand 0,0 -90,-90,0,0"] {
///     let spec: EffectSpec = spec.parse().unwrap();
///     builder.push(&spec, &mut diagnostics).unwrap();
/// }
///
/// let chain = builder.build(&mut diagnostics).unwrap();
/// assert!(chain.is_split());
/// assert_eq!(chain.len(), 4);
/// ```
pub struct ChainBuilder<'r> {
    registry: &'r EffectRegistry,
    signal: SignalInfo,
    window_frames: usize,
    accepted: Vec<Accepted>,
    split: bool,
}

impl<'r> ChainBuilder<'r> {
    /// Start a chain for `signal`, pulling `window_frames` frames per refill.
    pub fn new(registry: &'r EffectRegistry, signal: SignalInfo, window_frames: usize) -> Self {
        Self {
            registry,
            signal,
            window_frames,
            accepted: Vec::new(),
            split: false,
        }
    }

    /// Whether the chain has been split into per-channel lanes.
    pub fn is_split(&self) -> bool {
        self.split
    }

    /// Number of effects accepted so far.
    pub fn len(&self) -> usize {
        self.accepted.len()
    }

    /// Returns true if nothing has been accepted.
    pub fn is_empty(&self) -> bool {
        self.accepted.is_empty()
    }

    fn lanes(&self) -> usize {
        if self.split { self.signal.channels } else { 1 }
    }

    /// Resolve, validate and instantiate one effect.
    pub fn push(&mut self, spec: &EffectSpec, diagnostics: &mut Diagnostics) -> Result<()> {
        let handler = self
            .registry
            .find(&spec.name)
            .ok_or_else(|| Error::UnknownEffect {
                name: spec.name.clone(),
            })?;

        let flags = handler.flags();
        if flags.contains(EffectFlags::CHANGES_CHANNELS) {
            return Err(Error::UnsupportedEffect {
                name: spec.name.clone(),
                reason: "it changes the number of channels".into(),
            });
        }
        if flags.contains(EffectFlags::CHANGES_RATE) {
            return Err(Error::UnsupportedEffect {
                name: spec.name.clone(),
                reason: "it changes the sample rate".into(),
            });
        }

        let first = create(handler.as_ref(), &spec.args, diagnostics)?;
        let mut accepted = Accepted {
            handler,
            args: spec.args.clone(),
            lanes: vec![first],
        };

        if !self.split && !accepted.handler.is_multichannel() && self.signal.channels > 1 {
            tracing::debug!(
                effect = %spec.name,
                channels = self.signal.channels,
                replicated = self.accepted.len(),
                "effect is single-channel, splitting chain into lanes"
            );
            self.split = true;
            let channels = self.signal.channels;
            for earlier in &mut self.accepted {
                replicate(earlier, channels, diagnostics)?;
            }
        }
        replicate(&mut accepted, self.lanes(), diagnostics)?;

        tracing::debug!(effect = %spec.name, args = ?spec.args, lanes = self.lanes(), "accepted effect");
        self.accepted.push(accepted);
        Ok(())
    }

    /// Start every instance and assemble the chain.
    pub fn build(self, diagnostics: &mut Diagnostics) -> Result<Chain> {
        if self.accepted.is_empty() {
            return Err(Error::EmptyChain);
        }

        let lanes = self.lanes();
        let lane_signal = if self.split {
            SignalInfo::new(self.signal.sample_rate, 1)
        } else {
            self.signal
        };
        let window_samples = self
            .window_frames
            .checked_mul(self.signal.channels)
            .ok_or_else(|| {
                Error::InvalidRequest(format!(
                    "a {}-frame window of {} channels is too large",
                    self.window_frames, self.signal.channels
                ))
            })?;
        let capacity = (window_samples / lanes).max(1);

        let mut stages = Vec::with_capacity(self.accepted.len() * lanes);
        for accepted in self.accepted {
            for (lane, transform) in accepted.lanes.into_iter().enumerate() {
                stages.push(EffectInstance::new(
                    Arc::clone(&accepted.handler),
                    transform,
                    capacity,
                    lane,
                ));
            }
        }

        let mut chain = if self.split {
            Chain::Split {
                stride: lanes,
                stages,
            }
        } else {
            Chain::Uniform(stages)
        };

        for stage in chain.stages_mut() {
            if stage.start(&lane_signal, diagnostics).is_err() {
                return Err(Error::Configuration {
                    name: stage.name().to_string(),
                    message: failure_message(diagnostics),
                });
            }
        }

        tracing::debug!(
            effects = chain.effect_count(),
            stages = chain.len(),
            split = chain.is_split(),
            buffer_capacity = capacity,
            "chain built"
        );
        Ok(chain)
    }
}

fn create(
    handler: &dyn EffectHandler,
    args: &[String],
    diagnostics: &mut Diagnostics,
) -> Result<Box<dyn Transform>> {
    handler
        .create(args, diagnostics)
        .map_err(|EffectFailure| Error::Configuration {
            name: handler.name().to_string(),
            message: failure_message(diagnostics),
        })
}

/// Top `accepted` up to `lanes` transforms.
fn replicate(accepted: &mut Accepted, lanes: usize, diagnostics: &mut Diagnostics) -> Result<()> {
    while accepted.lanes.len() < lanes {
        let transform = create(accepted.handler.as_ref(), &accepted.args, diagnostics)?;
        accepted.lanes.push(transform);
    }
    Ok(())
}

pub(crate) fn failure_message(diagnostics: &Diagnostics) -> String {
    diagnostics
        .last_error()
        .unwrap_or("no diagnostic given")
        .to_string()
}
