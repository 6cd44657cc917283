//! Delay by prepending silence.
//!
//! `delay SECONDS` emits `round(SECONDS * rate)` frames of silence before
//! passing the input through unchanged. While silence is pending the
//! transform consumes nothing, so callers see it under-consume.

#[cfg(not(feature = "std"))]
use alloc::{boxed::Box, format, string::String};

use cascade_core::{
    Diagnostics, EffectFailure, EffectFlags, EffectHandler, Flow, Sample, SignalInfo, Transform,
};

use crate::args;

/// Delay transform state.
#[derive(Debug, Clone)]
pub struct Delay {
    seconds: f64,
    /// Silent samples still to emit.
    pending: usize,
}

impl Delay {
    /// Create a delay of `seconds`. Silence is scheduled by [`Transform::start`].
    pub fn new(seconds: f64) -> Self {
        Self {
            seconds,
            pending: 0,
        }
    }

    /// Silent samples not yet emitted.
    pub fn pending(&self) -> usize {
        self.pending
    }
}

impl Transform for Delay {
    fn start(
        &mut self,
        signal: &SignalInfo,
        diagnostics: &mut Diagnostics,
    ) -> Result<(), EffectFailure> {
        let frames = libm::round(self.seconds * f64::from(signal.sample_rate));
        if frames > (usize::MAX / signal.channels.max(1)) as f64 {
            diagnostics.error(format!("delay: {} seconds is too long", self.seconds));
            return Err(EffectFailure);
        }
        self.pending = frames as usize * signal.channels;
        Ok(())
    }

    fn flow(
        &mut self,
        input: &[Sample],
        output: &mut [Sample],
        _diagnostics: &mut Diagnostics,
    ) -> Result<Flow, EffectFailure> {
        let silence = self.pending.min(output.len());
        output[..silence].fill(0);
        self.pending -= silence;

        let rest = &mut output[silence..];
        let n = input.len().min(rest.len());
        rest[..n].copy_from_slice(&input[..n]);
        Ok(Flow::new(n, silence + n))
    }

    fn stop(&mut self) {
        self.pending = 0;
    }
}

/// Handler for `delay`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DelayHandler;

impl EffectHandler for DelayHandler {
    fn name(&self) -> &str {
        "delay"
    }

    fn description(&self) -> &str {
        "Delay the signal by prepending silence"
    }

    fn usage(&self) -> &str {
        "SECONDS"
    }

    fn flags(&self) -> EffectFlags {
        EffectFlags::MULTICHANNEL | EffectFlags::RESTARTABLE
    }

    fn create(
        &self,
        args: &[String],
        diagnostics: &mut Diagnostics,
    ) -> Result<Box<dyn Transform>, EffectFailure> {
        args::expect_count(self.name(), self.usage(), args, 1, 1, diagnostics)?;
        let seconds = args::seconds(self.name(), "delay time", &args[0], diagnostics)?;
        Ok(Box::new(Delay::new(seconds)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn started(seconds: f64, rate: u32, channels: usize) -> Delay {
        let mut delay = Delay::new(seconds);
        delay
            .start(&SignalInfo::new(rate, channels), &mut Diagnostics::new())
            .unwrap();
        delay
    }

    #[test]
    fn silence_scales_with_channels() {
        assert_eq!(started(0.5, 8, 1).pending(), 4);
        assert_eq!(started(0.5, 8, 2).pending(), 8);
        assert_eq!(started(0.0, 8, 2).pending(), 0);
    }

    #[test]
    fn emits_silence_before_input() {
        let mut delay = started(0.25, 8, 1);
        let mut diag = Diagnostics::new();
        let mut out = [9; 5];
        let flow = delay.flow(&[1, 2, 3, 4], &mut out, &mut diag).unwrap();
        assert_eq!(flow, Flow::new(3, 5));
        assert_eq!(out, [0, 0, 1, 2, 3]);
    }

    #[test]
    fn under_consumes_while_silence_pending() {
        let mut delay = started(1.0, 8, 1);
        let mut diag = Diagnostics::new();
        let mut out = [9; 3];
        let flow = delay.flow(&[1, 2, 3], &mut out, &mut diag).unwrap();
        assert_eq!(flow, Flow::new(0, 3));
        assert_eq!(delay.pending(), 5);
    }

    #[test]
    fn restart_reschedules_silence() {
        let mut delay = started(0.25, 8, 1);
        let mut diag = Diagnostics::new();
        let mut out = [0; 8];
        delay.flow(&[1; 8], &mut out, &mut diag).unwrap();
        assert_eq!(delay.pending(), 0);

        delay.stop();
        delay.start(&SignalInfo::new(8, 1), &mut diag).unwrap();
        assert_eq!(delay.pending(), 2);
    }

    #[test]
    fn handler_rejects_negative_time() {
        let mut diag = Diagnostics::new();
        assert!(DelayHandler.create(&["-0.5".to_string()], &mut diag).is_err());
        assert!(diag.last_error().unwrap().contains("must not be negative"));
    }
}
