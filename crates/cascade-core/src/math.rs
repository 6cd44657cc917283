//! Level conversion and sample rounding helpers.
//!
//! All arithmetic is done in `f64` so a 32-bit sample survives a unity-gain
//! round trip exactly.

use crate::Sample;

/// Convert decibels to a linear amplitude factor.
#[inline]
pub fn db_to_linear(db: f64) -> f64 {
    libm::pow(10.0, db / 20.0)
}

/// Convert a linear amplitude factor to decibels.
///
/// Non-positive input maps to negative infinity.
#[inline]
pub fn linear_to_db(linear: f64) -> f64 {
    if linear <= 0.0 {
        f64::NEG_INFINITY
    } else {
        20.0 * libm::log10(linear)
    }
}

/// Round to the nearest sample, half away from zero, saturating at the
/// `i32` range. NaN maps to 0.
#[inline]
pub fn to_sample(value: f64) -> Sample {
    // float -> int `as` casts saturate
    libm::round(value) as Sample
}

/// Multiply a sample by `factor` with [`to_sample`] rounding.
#[inline]
pub fn scale_sample(sample: Sample, factor: f64) -> Sample {
    to_sample(f64::from(sample) * factor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn db_round_trip() {
        for db in [-60.0, -6.0, 0.0, 3.0, 12.0] {
            let back = linear_to_db(db_to_linear(db));
            assert!((back - db).abs() < 1e-9, "{db} -> {back}");
        }
    }

    #[test]
    fn zero_linear_is_neg_infinity() {
        assert_eq!(linear_to_db(0.0), f64::NEG_INFINITY);
        assert_eq!(linear_to_db(-1.0), f64::NEG_INFINITY);
    }

    #[test]
    fn rounding_is_half_away_from_zero() {
        assert_eq!(to_sample(2.5), 3);
        assert_eq!(to_sample(-2.5), -3);
        assert_eq!(to_sample(2.4), 2);
        assert_eq!(to_sample(-2.6), -3);
    }

    #[test]
    fn rounding_saturates() {
        assert_eq!(to_sample(1e12), Sample::MAX);
        assert_eq!(to_sample(-1e12), Sample::MIN);
        assert_eq!(to_sample(f64::NAN), 0);
    }

    #[test]
    fn scale_by_half() {
        assert_eq!(scale_sample(7, 0.5), 4);
        assert_eq!(scale_sample(-7, 0.5), -4);
        assert_eq!(scale_sample(Sample::MAX, 2.0), Sample::MAX);
        assert_eq!(scale_sample(Sample::MIN, 1.0), Sample::MIN);
    }
}
