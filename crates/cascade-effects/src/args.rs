//! Positional argument parsing shared by the reference effects.
//!
//! Every helper writes a diagnostic naming the effect and the offending
//! token before returning [`EffectFailure`].

#[cfg(not(feature = "std"))]
use alloc::{format, string::String, vec::Vec};

use cascade_core::{Diagnostics, EffectFailure, db_to_linear};

/// Check the argument count against `min..=max`.
pub(crate) fn expect_count(
    effect: &str,
    usage: &str,
    args: &[String],
    min: usize,
    max: usize,
    diagnostics: &mut Diagnostics,
) -> Result<(), EffectFailure> {
    if args.len() < min || args.len() > max {
        diagnostics.error(format!(
            "{effect}: expected {} argument(s), got {}; usage: {effect} {usage}",
            count_range(min, max),
            args.len()
        ));
        return Err(EffectFailure);
    }
    Ok(())
}

fn count_range(min: usize, max: usize) -> String {
    if min == max {
        format!("{min}")
    } else {
        format!("{min} to {max}")
    }
}

/// Parse a finite number.
pub(crate) fn number(
    effect: &str,
    what: &str,
    token: &str,
    diagnostics: &mut Diagnostics,
) -> Result<f64, EffectFailure> {
    match token.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => {
            diagnostics.error(format!("{effect}: invalid {what} '{token}'"));
            Err(EffectFailure)
        }
    }
}

/// Parse a non-negative time in seconds.
pub(crate) fn seconds(
    effect: &str,
    what: &str,
    token: &str,
    diagnostics: &mut Diagnostics,
) -> Result<f64, EffectFailure> {
    let value = number(effect, what, token, diagnostics)?;
    if value < 0.0 {
        diagnostics.error(format!("{effect}: {what} must not be negative, got {token}"));
        return Err(EffectFailure);
    }
    Ok(value)
}

/// Parse an amplitude factor: plain linear (`0.5`) or decibels (`-6dB`).
pub(crate) fn amplitude(
    effect: &str,
    token: &str,
    diagnostics: &mut Diagnostics,
) -> Result<f64, EffectFailure> {
    let trimmed = token.trim();
    let lower = trimmed.to_ascii_lowercase();
    if let Some(db) = lower.strip_suffix("db") {
        let db = number(effect, "gain", db, diagnostics)?;
        Ok(db_to_linear(db))
    } else {
        number(effect, "gain", trimmed, diagnostics)
    }
}

/// Parse a comma-separated list of numbers.
pub(crate) fn number_list(
    effect: &str,
    what: &str,
    token: &str,
    diagnostics: &mut Diagnostics,
) -> Result<Vec<f64>, EffectFailure> {
    token
        .split(',')
        .map(|part| number(effect, what, part, diagnostics))
        .collect()
}
