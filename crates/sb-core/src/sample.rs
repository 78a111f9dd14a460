//! Sample types and level conversions

/// Type alias for audio samples (always f64 for maximum precision)
pub type Sample = f64;

/// Convert decibels to linear gain
#[inline]
pub fn db_to_linear(db: Sample) -> Sample {
    10.0_f64.powf(db / 20.0)
}

/// Convert linear gain to decibels
///
/// Values at or below zero clamp to -160 dB rather than returning
/// -inf/NaN.
#[inline]
pub fn linear_to_db(linear: Sample) -> Sample {
    if linear <= 0.0 {
        -160.0
    } else {
        20.0 * linear.log10()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_db_round_trip() {
        for db in [-60.0, -20.0, -6.0, 0.0, 6.0] {
            let linear = db_to_linear(db);
            assert!((linear_to_db(linear) - db).abs() < 1e-9);
        }
    }

    #[test]
    fn test_unity_gain() {
        assert!((db_to_linear(0.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_zero_clamps() {
        assert_eq!(linear_to_db(0.0), -160.0);
        assert_eq!(linear_to_db(-1.0), -160.0);
    }
}
