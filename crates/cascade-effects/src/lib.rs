//! Reference streaming transforms for cascade.
//!
//! These effects are deliberately small: they exist so effect chains can be
//! built, listed and exercised end-to-end. Each module provides the transform
//! state plus the [`EffectHandler`](cascade_core::EffectHandler) that parses
//! its positional arguments.
//!
//! | Effect | Arguments | Multichannel | Restart-safe |
//! |--------|-----------|--------------|--------------|
//! | [`vol`] | `GAIN` (linear or `NdB`) | yes | yes |
//! | [`gain`] | `DB` | yes | yes |
//! | [`delay`] | `SECONDS` | yes | yes |
//! | [`compand`] | `ATTACK,DECAY IN,OUT[,...] [GAIN_DB [INITIAL_DB]]` | no | no |
//!
//! # Example
//!
//! ```rust
//! use cascade_core::{Diagnostics, EffectHandler, SignalInfo};
//! use cascade_effects::VolHandler;
//!
//! let mut diagnostics = Diagnostics::new();
//! let mut vol = VolHandler.create(&["0.5".to_string()], &mut diagnostics).unwrap();
//! vol.start(&SignalInfo::new(8000, 1), &mut diagnostics).unwrap();
//!
//! let mut out = [0; 3];
//! let flow = vol.flow(&[2, 4, 6], &mut out, &mut diagnostics).unwrap();
//! assert_eq!(flow.produced, 3);
//! assert_eq!(out, [1, 2, 3]);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

mod args;

pub mod compand;
pub mod delay;
pub mod gain;
pub mod vol;

pub use compand::{Compand, CompandHandler, TransferFunction};
pub use delay::{Delay, DelayHandler};
pub use gain::{Gain, GainHandler};
pub use vol::{Vol, VolHandler};
