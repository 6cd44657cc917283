//! Gain in decibels.
//!
//! `gain DB` is [`vol`](crate::vol) with the level always given in dB.

#[cfg(not(feature = "std"))]
use alloc::{boxed::Box, string::String};

use cascade_core::{
    Diagnostics, EffectFailure, EffectFlags, EffectHandler, Flow, Sample, Transform, db_to_linear,
};

use crate::args;
use crate::vol::scale_block;

/// Gain transform state.
#[derive(Debug, Clone)]
pub struct Gain {
    db: f64,
    factor: f64,
}

impl Gain {
    /// Create a gain stage of `db` decibels.
    pub fn new(db: f64) -> Self {
        Self {
            db,
            factor: db_to_linear(db),
        }
    }

    /// Gain in decibels.
    pub fn db(&self) -> f64 {
        self.db
    }
}

impl Transform for Gain {
    fn flow(
        &mut self,
        input: &[Sample],
        output: &mut [Sample],
        _diagnostics: &mut Diagnostics,
    ) -> Result<Flow, EffectFailure> {
        Ok(scale_block(input, output, self.factor))
    }
}

/// Handler for `gain`.
#[derive(Debug, Clone, Copy, Default)]
pub struct GainHandler;

impl EffectHandler for GainHandler {
    fn name(&self) -> &str {
        "gain"
    }

    fn description(&self) -> &str {
        "Apply a gain in decibels"
    }

    fn usage(&self) -> &str {
        "DB"
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
        let db = args::number(self.name(), "gain", &args[0], diagnostics)?;
        Ok(Box::new(Gain::new(db)))
    }
}
