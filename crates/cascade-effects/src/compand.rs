//! Single-channel compander.
//!
//! `compand ATTACK,DECAY IN1,OUT1[,IN2,OUT2...] [GAIN_DB [INITIAL_DB]]`
//!
//! An envelope follower tracks the absolute level of the channel (attack and
//! decay times in seconds). The level, in dB relative to full scale, is mapped
//! through a piecewise-linear transfer function given as `in,out` dB pairs;
//! the difference between mapped and actual level (plus `GAIN_DB`) is applied
//! to the sample. Below the first point and above the last one the offset of
//! that point is held.
//!
//! # Signal Flow
//!
//! ```text
//! Input → |x| → Envelope (attack/decay) → dB → Transfer → Gain → Output
//! ```
//!
//! The compander only handles one channel and its envelope state cannot be
//! safely reset mid-stream, so its handler declares neither
//! [`EffectFlags::MULTICHANNEL`] nor [`EffectFlags::RESTARTABLE`].

#[cfg(not(feature = "std"))]
use alloc::{boxed::Box, format, string::String, vec::Vec};

use cascade_core::{
    Diagnostics, EffectFailure, EffectFlags, EffectHandler, Flow, Sample, SignalInfo, Transform,
    db_to_linear, linear_to_db, scale_sample,
};

use crate::args;

const FULL_SCALE: f64 = 2_147_483_648.0;

/// Piecewise-linear dB transfer function.
#[derive(Debug, Clone, PartialEq)]
pub struct TransferFunction {
    points: Vec<(f64, f64)>,
}

impl TransferFunction {
    /// Build from `(in_db, out_db)` points with strictly increasing inputs.
    ///
    /// Returns `None` if there are no points or the inputs are not increasing.
    pub fn new(points: Vec<(f64, f64)>) -> Option<Self> {
        if points.is_empty() || points.windows(2).any(|w| w[1].0 <= w[0].0) {
            return None;
        }
        Some(Self { points })
    }

    /// Gain offset in dB to apply at `in_db`.
    pub fn offset_db(&self, in_db: f64) -> f64 {
        let first = self.points[0];
        let last = self.points[self.points.len() - 1];
        if in_db <= first.0 {
            return first.1 - first.0;
        }
        if in_db >= last.0 {
            return last.1 - last.0;
        }
        for w in self.points.windows(2) {
            let ((x0, y0), (x1, y1)) = (w[0], w[1]);
            if in_db < x1 {
                let t = (in_db - x0) / (x1 - x0);
                let out = y0 + t * (y1 - y0);
                return out - in_db;
            }
        }
        last.1 - last.0
    }
}

/// Compander transform state.
#[derive(Debug, Clone)]
pub struct Compand {
    attack: f64,
    decay: f64,
    transfer: TransferFunction,
    gain_db: f64,
    initial_db: Option<f64>,
    attack_coef: f64,
    decay_coef: f64,
    envelope: f64,
}

impl Compand {
    /// Create a compander. Coefficients are derived in [`Transform::start`].
    pub fn new(
        attack: f64,
        decay: f64,
        transfer: TransferFunction,
        gain_db: f64,
        initial_db: Option<f64>,
    ) -> Self {
        Self {
            attack,
            decay,
            transfer,
            gain_db,
            initial_db,
            attack_coef: 1.0,
            decay_coef: 1.0,
            envelope: 0.0,
        }
    }

    /// Current envelope level (linear, full scale = 1.0).
    pub fn envelope(&self) -> f64 {
        self.envelope
    }

    #[inline]
    fn process(&mut self, sample: Sample) -> Sample {
        let level = f64::from(sample).abs() / FULL_SCALE;
        let coef = if level > self.envelope {
            self.attack_coef
        } else {
            self.decay_coef
        };
        self.envelope += (level - self.envelope) * coef;

        let offset = self.transfer.offset_db(linear_to_db(self.envelope)) + self.gain_db;
        scale_sample(sample, db_to_linear(offset))
    }
}

fn smoothing_coef(seconds: f64, sample_rate: u32) -> f64 {
    let samples = seconds * f64::from(sample_rate);
    if samples <= 0.0 {
        1.0
    } else {
        1.0 - libm::exp(-1.0 / samples)
    }
}

impl Transform for Compand {
    fn start(
        &mut self,
        signal: &SignalInfo,
        diagnostics: &mut Diagnostics,
    ) -> Result<(), EffectFailure> {
        if signal.channels != 1 {
            diagnostics.error(format!(
                "compand: processes a single channel, got {}",
                signal.channels
            ));
            return Err(EffectFailure);
        }
        self.attack_coef = smoothing_coef(self.attack, signal.sample_rate);
        self.decay_coef = smoothing_coef(self.decay, signal.sample_rate);
        self.envelope = self.initial_db.map_or(0.0, db_to_linear);
        Ok(())
    }

    fn flow(
        &mut self,
        input: &[Sample],
        output: &mut [Sample],
        _diagnostics: &mut Diagnostics,
    ) -> Result<Flow, EffectFailure> {
        let n = input.len().min(output.len());
        for (out, &inp) in output[..n].iter_mut().zip(input) {
            *out = self.process(inp);
        }
        Ok(Flow::new(n, n))
    }
}

/// Handler for `compand`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompandHandler;

impl EffectHandler for CompandHandler {
    fn name(&self) -> &str {
        "compand"
    }

    fn description(&self) -> &str {
        "Single-channel compander with a piecewise-linear dB transfer function"
    }

    fn usage(&self) -> &str {
        "ATTACK,DECAY IN1,OUT1[,IN2,OUT2...] [GAIN_DB [INITIAL_DB]]"
    }

    fn flags(&self) -> EffectFlags {
        EffectFlags::NONE
    }

    fn create(
        &self,
        args: &[String],
        diagnostics: &mut Diagnostics,
    ) -> Result<Box<dyn Transform>, EffectFailure> {
        let name = self.name();
        args::expect_count(name, self.usage(), args, 2, 4, diagnostics)?;

        let times = args::number_list(name, "attack/decay time", &args[0], diagnostics)?;
        let &[attack, decay] = times.as_slice() else {
            diagnostics.error(format!(
                "compand: expected ATTACK,DECAY, got '{}'",
                args[0]
            ));
            return Err(EffectFailure);
        };
        if attack < 0.0 || decay < 0.0 {
            diagnostics.error("compand: attack and decay times must not be negative");
            return Err(EffectFailure);
        }

        let values = args::number_list(name, "transfer point", &args[1], diagnostics)?;
        if values.len() % 2 != 0 {
            diagnostics.error(format!(
                "compand: transfer function needs IN,OUT pairs, got {} value(s)",
                values.len()
            ));
            return Err(EffectFailure);
        }
        let points = values.chunks(2).map(|p| (p[0], p[1])).collect();
        let Some(transfer) = TransferFunction::new(points) else {
            diagnostics.error("compand: transfer function inputs must be strictly increasing");
            return Err(EffectFailure);
        };

        let gain_db = match args.get(2) {
            Some(token) => args::number(name, "gain", token, diagnostics)?,
            None => 0.0,
        };
        let initial_db = match args.get(3) {
            Some(token) => Some(args::number(name, "initial level", token, diagnostics)?),
            None => None,
        };

        Ok(Box::new(Compand::new(
            attack, decay, transfer, gain_db, initial_db,
        )))
    }
}
