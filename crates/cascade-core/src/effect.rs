//! Streaming effect contract.
//!
//! An effect is split in two halves:
//!
//! - [`EffectHandler`]: the shared, read-only half. It names the effect,
//!   declares its [`EffectFlags`], and parses arguments into a configured
//!   [`Transform`]. One handler is shared by every instance (and every
//!   per-channel replica) of the effect.
//! - [`Transform`]: the per-instance half holding the effect's state.
//!
//! ## The flow contract
//!
//! [`Transform::flow`] is offered an input slice and an output slice. It is
//! **not** required to consume all of its input nor to fill its output; it
//! reports what it actually did through [`Flow`]. Callers advance their
//! cursors by the reported amounts only, and call again once they have more
//! input to offer or more room to give.
//!
//! Failures are reported as [`EffectFailure`]; the human-readable reason is
//! written into the [`Diagnostics`] channel passed to every call.

#[cfg(not(feature = "std"))]
use alloc::{boxed::Box, string::String};

use crate::Diagnostics;

/// One audio sample: 32-bit signed integer, full scale.
pub type Sample = i32;

/// Shape of the signal an effect instance sees.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignalInfo {
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Interleaved channels presented to the instance (1 for a per-channel lane).
    pub channels: usize,
}

impl SignalInfo {
    /// Create a signal description.
    pub const fn new(sample_rate: u32, channels: usize) -> Self {
        Self {
            sample_rate,
            channels,
        }
    }
}

/// Result of one [`Transform::flow`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Flow {
    /// Input samples actually consumed.
    pub consumed: usize,
    /// Output samples actually written.
    pub produced: usize,
}

impl Flow {
    /// Create a flow report.
    pub const fn new(consumed: usize, produced: usize) -> Self {
        Self { consumed, produced }
    }

    /// Returns `true` if the call neither consumed nor produced anything.
    pub const fn is_idle(&self) -> bool {
        self.consumed == 0 && self.produced == 0
    }
}

/// Marker error returned by a transform or handler that failed.
///
/// The reason lives in the [`Diagnostics`] channel of the failing call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EffectFailure;

impl core::fmt::Display for EffectFailure {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("effect failed")
    }
}

/// Capability flags declared by an [`EffectHandler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct EffectFlags(u8);

impl EffectFlags {
    /// No flags set: single-channel only, not restart-safe.
    pub const NONE: Self = Self(0);
    /// Instance can process interleaved multichannel audio.
    pub const MULTICHANNEL: Self = Self(1 << 0);
    /// Effect changes the channel count.
    pub const CHANGES_CHANNELS: Self = Self(1 << 1);
    /// Effect changes the sample rate.
    pub const CHANGES_RATE: Self = Self(1 << 2);
    /// Instance can be stopped and started again without corruption.
    pub const RESTARTABLE: Self = Self(1 << 3);

    /// Returns `true` if all bits in `other` are set in `self`.
    #[inline]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns the union of two flag sets.
    #[inline]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Returns `true` if the effect alters the stream shape (channels or rate).
    #[inline]
    pub const fn changes_shape(self) -> bool {
        self.0 & (Self::CHANGES_CHANNELS.0 | Self::CHANGES_RATE.0) != 0
    }
}

impl core::ops::BitOr for EffectFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

/// Per-instance streaming transform.
///
/// Instances are created by [`EffectHandler::create`] with their arguments
/// already parsed, then started before the first [`flow`](Transform::flow).
pub trait Transform: Send {
    /// Prepare the instance for a stream of the given shape.
    ///
    /// Called once after construction and again on every restart. The
    /// default does nothing.
    fn start(
        &mut self,
        _signal: &SignalInfo,
        _diagnostics: &mut Diagnostics,
    ) -> Result<(), EffectFailure> {
        Ok(())
    }

    /// Process as much of `input` into `output` as the transform wants to.
    ///
    /// `input` may be empty (the transform may still emit buffered output);
    /// `output` may be empty (the transform may still absorb input).
    /// The returned counts must not exceed the slice lengths.
    fn flow(
        &mut self,
        input: &[Sample],
        output: &mut [Sample],
        diagnostics: &mut Diagnostics,
    ) -> Result<Flow, EffectFailure>;

    /// Release per-stream state. Only invoked for restart-safe effects.
    fn stop(&mut self) {}
}

/// Shared description and factory of one effect type.
pub trait EffectHandler: Send + Sync {
    /// Registered effect name (lowercase, no spaces).
    fn name(&self) -> &str;

    /// One-line description for listings.
    fn description(&self) -> &str;

    /// Argument synopsis, e.g. `"GAIN"`.
    fn usage(&self) -> &str {
        ""
    }

    /// Declared capabilities.
    fn flags(&self) -> EffectFlags;

    /// Parse `args` and build a configured, not yet started, instance.
    ///
    /// On malformed arguments write the reason to `diagnostics` and return
    /// [`EffectFailure`].
    fn create(
        &self,
        args: &[String],
        diagnostics: &mut Diagnostics,
    ) -> Result<Box<dyn Transform>, EffectFailure>;

    /// Returns `true` if instances may be stopped and restarted.
    fn is_restartable(&self) -> bool {
        self.flags().contains(EffectFlags::RESTARTABLE)
    }

    /// Returns `true` if instances can process interleaved multichannel audio.
    fn is_multichannel(&self) -> bool {
        self.flags().contains(EffectFlags::MULTICHANNEL)
    }
}
