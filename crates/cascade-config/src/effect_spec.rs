//! Effect specs: an effect name plus its positional arguments.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// One entry of an effect chain, e.g. `vol 0.5` or `compand 0.1,0.3 -70,-60,0,-3`.
///
/// The first whitespace-separated word is the effect name, the rest are its
/// arguments. Specs serialize as that plain string, so a preset lists its
/// effects the way they are typed on the command line.
///
/// # Example
///
/// ```rust
/// use cascade_config::EffectSpec;
///
/// let spec: EffectSpec = "delay 0.25".parse().unwrap();
/// assert_eq!(spec.name, "delay");
/// assert_eq!(spec.args, ["0.25"]);
/// assert_eq!(spec.to_string(), "delay 0.25");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EffectSpec {
    /// Registered effect name.
    pub name: String,
    /// Positional arguments passed to the effect handler.
    pub args: Vec<String>,
}

impl EffectSpec {
    /// Create a spec with no arguments.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: Vec::new(),
        }
    }

    /// Append an argument.
    pub fn with_arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments.
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }
}

impl FromStr for EffectSpec {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut words = s.split_whitespace();
        let name = words.next().ok_or(ConfigError::EmptySpec)?;
        Ok(Self::new(name).with_args(words))
    }
}

impl fmt::Display for EffectSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

impl TryFrom<String> for EffectSpec {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<EffectSpec> for String {
    fn from(spec: EffectSpec) -> Self {
        spec.to_string()
    }
}
