//! Effect handler registry for cascade.
//!
//! This crate resolves effect names to shared [`EffectHandler`]s. The
//! pipeline looks every configured effect up here; listings read the
//! [`EffectDescriptor`]s.
//!
//! # Features
//!
//! - **Lookup by name**: [`EffectRegistry::find`] returns a shared handler
//! - **Built-in effects**: `vol`, `gain`, `delay`, `compand`
//! - **Custom effects**: [`EffectRegistry::register`] adds or replaces handlers
//! - **Descriptors**: name, description, usage and capability flags for UIs
//!
//! # Example
//!
//! ```rust
//! use cascade_registry::EffectRegistry;
//!
//! let registry = EffectRegistry::new();
//!
//! for effect in registry.all_effects() {
//!     println!("{}: {}", effect.name, effect.description);
//! }
//!
//! let vol = registry.find("vol").expect("vol is built in");
//! assert!(vol.is_multichannel());
//! ```
//!
//! # no_std Support
//!
//! This crate is `no_std` compatible (it needs `alloc`). Disable the default
//! `std` feature:
//!
//! ```toml
//! [dependencies]
//! cascade-registry = { version = "0.1", default-features = false }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(not(feature = "std"))]
use alloc::{string::String, sync::Arc, vec::Vec};
#[cfg(feature = "std")]
use std::sync::Arc;

use cascade_core::{EffectFlags, EffectHandler};
use cascade_effects::{CompandHandler, DelayHandler, GainHandler, VolHandler};

/// Describes a registered effect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectDescriptor {
    /// Registered name.
    pub name: String,
    /// Brief description.
    pub description: String,
    /// Argument synopsis.
    pub usage: String,
    /// Declared capabilities.
    pub flags: EffectFlags,
}

impl EffectDescriptor {
    fn of(handler: &dyn EffectHandler) -> Self {
        Self {
            name: handler.name().into(),
            description: handler.description().into(),
            usage: handler.usage().into(),
            flags: handler.flags(),
        }
    }
}

/// Registry of available effect handlers.
///
/// Handlers are shared (`Arc`) and read-only, so one registry can serve any
/// number of independent pipelines.
#[derive(Clone)]
pub struct EffectRegistry {
    handlers: Vec<Arc<dyn EffectHandler>>,
}

impl Default for EffectRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for EffectRegistry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_list()
            .entries(self.handlers.iter().map(|h| h.name()))
            .finish()
    }
}

impl EffectRegistry {
    /// Create a registry with all built-in effects registered.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register_builtin_effects();
        registry
    }

    /// Create a registry with no effects.
    pub fn empty() -> Self {
        Self {
            handlers: Vec::with_capacity(4),
        }
    }

    fn register_builtin_effects(&mut self) {
        self.register(Arc::new(VolHandler));
        self.register(Arc::new(GainHandler));
        self.register(Arc::new(DelayHandler));
        self.register(Arc::new(CompandHandler));
    }

    /// Register a handler, replacing any handler already registered under
    /// the same name. Returns the replaced handler.
    pub fn register(&mut self, handler: Arc<dyn EffectHandler>) -> Option<Arc<dyn EffectHandler>> {
        match self
            .handlers
            .iter_mut()
            .find(|h| h.name() == handler.name())
        {
            Some(slot) => Some(core::mem::replace(slot, handler)),
            None => {
                self.handlers.push(handler);
                None
            }
        }
    }

    /// Look up a handler by name.
    pub fn find(&self, name: &str) -> Option<Arc<dyn EffectHandler>> {
        self.handlers.iter().find(|h| h.name() == name).cloned()
    }

    /// Get the descriptor of a registered effect.
    pub fn get(&self, name: &str) -> Option<EffectDescriptor> {
        self.handlers
            .iter()
            .find(|h| h.name() == name)
            .map(|h| EffectDescriptor::of(h.as_ref()))
    }

    /// Descriptors for all registered effects, in registration order.
    pub fn all_effects(&self) -> Vec<EffectDescriptor> {
        self.handlers
            .iter()
            .map(|h| EffectDescriptor::of(h.as_ref()))
            .collect()
    }

    /// Number of registered effects.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Returns true if no effects are registered.
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}
