//! Volume scaling.
//!
//! `vol GAIN` multiplies every sample by a linear factor (`0.5`) or by a
//! level given in decibels (`-6dB`). Results are rounded half away from
//! zero and saturate at the `i32` range.

#[cfg(not(feature = "std"))]
use alloc::{boxed::Box, string::String};

use cascade_core::{
    Diagnostics, EffectFailure, EffectFlags, EffectHandler, Flow, Sample, Transform, scale_sample,
};

use crate::args;

/// Volume transform state.
#[derive(Debug, Clone)]
pub struct Vol {
    factor: f64,
}

impl Vol {
    /// Create a volume stage with a linear factor.
    pub fn new(factor: f64) -> Self {
        Self { factor }
    }

    /// The linear factor applied to every sample.
    pub fn factor(&self) -> f64 {
        self.factor
    }
}

impl Transform for Vol {
    fn flow(
        &mut self,
        input: &[Sample],
        output: &mut [Sample],
        _diagnostics: &mut Diagnostics,
    ) -> Result<Flow, EffectFailure> {
        Ok(scale_block(input, output, self.factor))
    }
}

/// Scale as much of `input` as fits in `output`.
pub(crate) fn scale_block(input: &[Sample], output: &mut [Sample], factor: f64) -> Flow {
    let n = input.len().min(output.len());
    for (out, &inp) in output[..n].iter_mut().zip(input) {
        *out = scale_sample(inp, factor);
    }
    Flow::new(n, n)
}

/// Handler for `vol`.
#[derive(Debug, Clone, Copy, Default)]
pub struct VolHandler;

impl EffectHandler for VolHandler {
    fn name(&self) -> &str {
        "vol"
    }

    fn description(&self) -> &str {
        "Scale the signal by a linear factor or a dB level"
    }

    fn usage(&self) -> &str {
        "GAIN (e.g. 0.5 or -6dB)"
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
        let factor = args::amplitude(self.name(), &args[0], diagnostics)?;
        Ok(Box::new(Vol::new(factor)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn halves_and_rounds_away_from_zero() {
        let mut vol = Vol::new(0.5);
        let mut diag = Diagnostics::new();
        let input = [0, 1, 2, 3, -3, 1000];
        let mut output = [0; 6];
        let flow = vol.flow(&input, &mut output, &mut diag).unwrap();
        assert_eq!(flow, Flow::new(6, 6));
        assert_eq!(output, [0, 1, 1, 2, -2, 500]);
    }

    #[test]
    fn limited_by_output_room() {
        let mut vol = Vol::new(2.0);
        let mut diag = Diagnostics::new();
        let mut output = [0; 2];
        let flow = vol.flow(&[1, 2, 3], &mut output, &mut diag).unwrap();
        assert_eq!(flow, Flow::new(2, 2));
        assert_eq!(output, [2, 4]);
    }

    #[test]
    fn unity_is_exact() {
        let mut vol = Vol::new(1.0);
        let mut diag = Diagnostics::new();
        let input = [Sample::MIN, -1, 0, 1, Sample::MAX];
        let mut output = [0; 5];
        vol.flow(&input, &mut output, &mut diag).unwrap();
        assert_eq!(output, input);
    }

    #[test]
    fn handler_parses_linear_and_db() {
        let mut diag = Diagnostics::new();
        assert!(VolHandler.create(&args(&["0.5"]), &mut diag).is_ok());
        assert!(VolHandler.create(&args(&["-6dB"]), &mut diag).is_ok());
        assert!(diag.is_empty());
    }

    #[test]
    fn handler_rejects_bad_args() {
        let mut diag = Diagnostics::new();
        assert!(VolHandler.create(&[], &mut diag).is_err());
        assert!(VolHandler.create(&args(&["half"]), &mut diag).is_err());
        assert_eq!(diag.last_error(), Some("vol: invalid gain 'half'"));
        assert!(VolHandler.create(&args(&["1", "2"]), &mut diag).is_err());
    }

    #[test]
    fn handler_flags() {
        assert!(VolHandler.is_multichannel());
        assert!(VolHandler.is_restartable());
    }
}
