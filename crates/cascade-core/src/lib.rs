//! Cascade Core - the streaming contract behind the cascade effect pipeline
//!
//! This crate defines the pieces every other cascade crate agrees on: the
//! sample type, the [`Transform`] contract a streaming effect implements, the
//! [`EffectHandler`] that describes and instantiates an effect, the per-call
//! [`Diagnostics`] channel, the fixed-capacity [`StageBuffer`] each pipeline
//! stage writes into, and the [`AudioSource`] upstream provider interface.
//!
//! # Core Abstractions
//!
//! ## Streaming Effects
//!
//! - [`Transform`] - one configured effect instance: `start`, `flow`, `stop`
//! - [`EffectHandler`] - shared, read-only description + factory of an effect
//! - [`EffectFlags`] - declared capabilities (multichannel, restart-safe, ...)
//! - [`Flow`] - what one `flow` call actually consumed and produced
//!
//! ## Buffers and Sources
//!
//! - [`StageBuffer`] - owning two-cursor buffer of produced-but-unread samples
//! - [`AudioSource`] - pull-based provider of interleaved frames
//! - [`MemorySource`] - `AudioSource` over an in-memory interleaved buffer
//!
//! ## Utilities
//!
//! - Math functions: [`db_to_linear`], [`linear_to_db`], [`to_sample`], [`scale_sample`]
//!
//! # no_std Support
//!
//! This crate is `no_std` compatible (it needs `alloc`). Disable the default
//! `std` feature in your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! cascade-core = { version = "0.1", default-features = false }
//! ```
//!
//! # Example
//!
//! ```rust
//! use cascade_core::{Diagnostics, EffectFailure, Flow, Sample, Transform};
//!
//! struct Invert;
//!
//! impl Transform for Invert {
//!     fn flow(
//!         &mut self,
//!         input: &[Sample],
//!         output: &mut [Sample],
//!         _diagnostics: &mut Diagnostics,
//!     ) -> Result<Flow, EffectFailure> {
//!         let n = input.len().min(output.len());
//!         for (out, &inp) in output[..n].iter_mut().zip(input) {
//!             *out = inp.saturating_neg();
//!         }
//!         Ok(Flow::new(n, n))
//!     }
//! }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod buffer;
pub mod diagnostics;
pub mod effect;
pub mod math;
pub mod source;

pub use buffer::StageBuffer;
pub use diagnostics::{Diagnostic, Diagnostics, Severity};
pub use effect::{
    EffectFailure, EffectFlags, EffectHandler, Flow, Sample, SignalInfo, Transform,
};
pub use math::{db_to_linear, linear_to_db, scale_sample, to_sample};
pub use source::{AudioSource, MemorySource};
