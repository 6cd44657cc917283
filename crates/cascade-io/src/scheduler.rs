//! Single-stage flow scheduling.
//!
//! [`FlowScheduler::advance`] runs one instance's transform once: it wires
//! the instance's input (its lane of the source window, or the readable part
//! of the instance `stride` places before it), hands over the free part of
//! its own buffer, and moves cursors by what the transform reports it
//! actually consumed and produced.

use cascade_core::{AudioSource, Diagnostics, Flow};

use crate::chain::{Chain, failure_message};
use crate::reader::SourceReader;
use crate::{Error, Result};

/// Running totals over every scheduled transform call.
///
/// `consumed <= offered` always holds, as does `produced` never exceeding
/// the free space handed out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlowStats {
    /// Full passes over the chain.
    pub passes: u64,
    /// Input samples offered to transforms.
    pub offered: u64,
    /// Input samples transforms consumed.
    pub consumed: u64,
    /// Output samples transforms produced.
    pub produced: u64,
    /// Source windows pulled.
    pub refills: u64,
}

/// Drives individual chain instances and keeps [`FlowStats`].
#[derive(Debug, Default)]
pub struct FlowScheduler {
    stats: FlowStats,
}

impl FlowScheduler {
    /// Create a scheduler with zeroed statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Statistics so far.
    pub fn stats(&self) -> FlowStats {
        self.stats
    }

    /// Count one completed pass over the chain.
    pub fn record_pass(&mut self) {
        self.stats.passes += 1;
    }

    /// Run the transform of stage `n` once.
    ///
    /// Stages in the first `stride` positions read from the source window,
    /// which is refilled first if every lane has used up its share.
    ///
    /// # Panics
    ///
    /// Panics if `n` is out of range for `chain`.
    pub fn advance<S: AudioSource>(
        &mut self,
        chain: &mut Chain,
        reader: &mut SourceReader<S>,
        n: usize,
        diagnostics: &mut Diagnostics,
    ) -> Result<Flow> {
        let stride = chain.stride();
        let (upstream, rest) = chain.stages_mut().split_at_mut(n);
        let stage = &mut rest[0];
        stage.buffer.reclaim();

        if n < stride && reader.is_exhausted() {
            reader.refill();
            self.stats.refills += 1;
        }

        let input = if n < stride {
            reader.input(n)
        } else {
            upstream[n - stride].buffer.readable()
        };
        let offered = input.len();
        let free = stage.buffer.free();

        let flow = stage
            .transform
            .flow(input, stage.buffer.writable(), diagnostics)
            .map_err(|_| Error::Flow {
                name: stage.handler.name().to_string(),
                message: failure_message(diagnostics),
            })?;

        if flow.consumed > offered {
            return Err(Error::Flow {
                name: stage.handler.name().to_string(),
                message: format!(
                    "consumed {} samples but only {offered} were offered",
                    flow.consumed
                ),
            });
        }
        if flow.produced > free {
            return Err(Error::Flow {
                name: stage.handler.name().to_string(),
                message: format!(
                    "produced {} samples into {free} free slots",
                    flow.produced
                ),
            });
        }

        stage.buffer.commit(flow.produced);
        if n < stride {
            reader.consume(n, flow.consumed);
        } else {
            upstream[n - stride].buffer.consume(flow.consumed);
        }

        self.stats.offered += offered as u64;
        self.stats.consumed += flow.consumed as u64;
        self.stats.produced += flow.produced as u64;
        Ok(flow)
    }
}
