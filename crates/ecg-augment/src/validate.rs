//! Construction-time normalization of user supplied parameters
//!
//! Validators are pure and only run inside transform constructors, so a
//! transform that exists is always well configured.

use ecg_core::{config_error, AugResult};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// A bound given either as one scalar or as an explicit pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RangeInput<T> {
    Scalar(T),
    Bounds(Vec<T>),
}

impl<T> From<T> for RangeInput<T> {
    fn from(value: T) -> Self {
        RangeInput::Scalar(value)
    }
}

impl<T> From<(T, T)> for RangeInput<T> {
    fn from((low, high): (T, T)) -> Self {
        RangeInput::Bounds(vec![low, high])
    }
}

fn ordered_pair<T: PartialOrd + Copy + Display>(
    bounds: &[T],
    name: &str,
) -> AugResult<(T, T)> {
    match bounds {
        [first, second] if first > second => Ok((*second, *first)),
        [first, second] => Ok((*first, *second)),
        _ => Err(config_error!(
            name,
            "expected a scalar or a pair of bounds, got {} values",
            bounds.len()
        )),
    }
}

/// Scalar `v` becomes `(-|v|, |v|)`, a pair is sorted ascending
pub fn symmetric_range(value: &RangeInput<f32>, name: &str) -> AugResult<(f32, f32)> {
    let range = match value {
        RangeInput::Scalar(v) => (-v.abs(), v.abs()),
        RangeInput::Bounds(bounds) => ordered_pair(bounds, name)?,
    };

    if !range.0.is_finite() || !range.1.is_finite() {
        return Err(config_error!(name, "bounds must be finite, got ({}, {})", range.0, range.1));
    }

    Ok(range)
}

/// Scalar `v` becomes `(low_bound, v)`, a pair is sorted; both must respect `low_bound`
pub fn asymmetric_range<T>(value: &RangeInput<T>, low_bound: T, name: &str) -> AugResult<(T, T)>
where
    T: PartialOrd + Copy + Display,
{
    match value {
        RangeInput::Scalar(v) => {
            if *v < low_bound {
                return Err(config_error!(name, "value {} is below the lower bound {}", v, low_bound));
            }
            Ok((low_bound, *v))
        }
        RangeInput::Bounds(bounds) => {
            let (low, high) = ordered_pair(bounds, name)?;
            // NaN compares false everywhere, so reject it explicitly
            if !(low >= low_bound) {
                return Err(config_error!(name, "lower end {} is below the lower bound {}", low, low_bound));
            }
            Ok((low, high))
        }
    }
}

/// Integer range whose lower bound is non-negative, converted to sizes
pub fn size_range(value: &RangeInput<i64>, low_bound: usize, name: &str) -> AugResult<(usize, usize)> {
    let (low, high) = asymmetric_range(value, low_bound as i64, name)?;
    Ok((low as usize, high as usize))
}

/// Integer setting that must be at least `low_bound`
pub fn require_size(value: i64, low_bound: usize, name: &str) -> AugResult<usize> {
    if value < low_bound as i64 {
        return Err(config_error!(name, "must be at least {}, got {}", low_bound, value));
    }
    Ok(value as usize)
}

pub fn require_non_negative(value: f32, name: &str) -> AugResult<f32> {
    if !(value >= 0.0) || !value.is_finite() {
        return Err(config_error!(name, "must be a non-negative number, got {}", value));
    }
    Ok(value)
}

pub fn require_positive(value: f32, name: &str) -> AugResult<f32> {
    if !(value > 0.0) || !value.is_finite() {
        return Err(config_error!(name, "must be a positive number, got {}", value));
    }
    Ok(value)
}

/// Both ends of a kernel size range must be odd
pub fn require_odd_bounds(range: (usize, usize), name: &str) -> AugResult<(usize, usize)> {
    if range.0 % 2 == 0 || range.1 % 2 == 0 {
        return Err(config_error!(name, "bounds must be odd, got ({}, {})", range.0, range.1));
    }
    Ok(range)
}

/// Application probability in `[0, 1]`
pub fn probability(p: f32) -> AugResult<f32> {
    if !(0.0..=1.0).contains(&p) {
        return Err(config_error!("p", "probability must lie in [0, 1], got {}", p));
    }
    Ok(p)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symmetric_range() {
        assert_eq!(symmetric_range(&RangeInput::Scalar(0.05), "scale").unwrap(), (-0.05, 0.05));
        assert_eq!(symmetric_range(&RangeInput::Scalar(-0.2), "scale").unwrap(), (-0.2, 0.2));
        assert_eq!(symmetric_range(&RangeInput::from((0.3f32, -0.1)), "scale").unwrap(), (-0.1, 0.3));

        let error = symmetric_range(&RangeInput::Bounds(vec![0.1, 0.2, 0.3]), "scale").unwrap_err();
        assert!(error.is_config());
    }

    #[test]
    fn test_asymmetric_range() {
        assert_eq!(asymmetric_range(&RangeInput::Scalar(5i64), 1, "segments").unwrap(), (1, 5));
        assert_eq!(asymmetric_range(&RangeInput::from((5i64, 2i64)), 1, "segments").unwrap(), (2, 5));
        assert!(asymmetric_range(&RangeInput::Scalar(0i64), 1, "segments").is_err());
        assert!(asymmetric_range(&RangeInput::from((0i64, 1i64)), 1, "channel_drop_range").is_err());
        assert!(asymmetric_range(&RangeInput::from((f32::NAN, 1.0f32)), 0.0, "frequency").is_err());
    }

    #[test]
    fn test_size_range() {
        assert_eq!(size_range(&RangeInput::from((1i64, 5i64)), 0, "num_ranges").unwrap(), (1, 5));
        assert!(size_range(&RangeInput::from((-1i64, 5i64)), 0, "num_ranges").is_err());
    }

    #[test]
    fn test_scalar_checks() {
        assert_eq!(require_non_negative(0.0, "variance").unwrap(), 0.0);
        assert!(require_non_negative(-0.1, "variance").is_err());
        assert_eq!(require_size(5000, 1, "length").unwrap(), 5000);
        assert!(require_size(0, 1, "length").is_err());
        assert!(require_positive(0.0, "variance").is_err());
        assert!(require_odd_bounds((2, 4), "kernel_size_range").is_err());
        assert!(require_odd_bounds((3, 5), "kernel_size_range").is_ok());
        assert!(probability(1.0).is_ok());
        assert!(probability(1.5).is_err());
        assert!(probability(f32::NAN).is_err());
    }
}
