//! # Unit Types
//!
//! Type-safe wrappers for the few units a cutting list needs. These are
//! plain f64 newtypes so JSON stays clean (just numbers).
//!
//! ## Metric Units
//!
//! Cabinet and panel dimensions are entered and reported in centimeters,
//! and sheet consumption is summed in square meters.
//!
//! ## Example
//!
//! ```rust
//! use cutlist_core::units::{Centimeters, SquareCentimeters, SquareMeters};
//!
//! let inner = Centimeters(80.0) - Centimeters(1.6) * 2.0;
//! assert!((inner.value() - 76.8).abs() < 1e-9);
//!
//! let sheet: SquareMeters = SquareCentimeters(25_000.0).into();
//! assert_eq!(sheet.0, 2.5);
//! ```

use serde::{Deserialize, Serialize};
use std::ops::{Mul, Sub};

/// Round to one decimal place, half away from zero.
///
/// Every displayed dimension goes through this so that `80 - 2 * 1.6`
/// reads `76.8` rather than `76.80000000000001`.
pub fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

// ============================================================================
// Length Units
// ============================================================================

/// Length in centimeters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Centimeters(pub f64);

// ============================================================================
// Area Units
// ============================================================================

/// Area in square centimeters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SquareCentimeters(pub f64);

/// Area in square meters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SquareMeters(pub f64);

impl From<SquareCentimeters> for SquareMeters {
    fn from(cm2: SquareCentimeters) -> Self {
        SquareMeters(cm2.0 / 10_000.0)
    }
}

impl From<SquareMeters> for SquareCentimeters {
    fn from(m2: SquareMeters) -> Self {
        SquareCentimeters(m2.0 * 10_000.0)
    }
}

// ============================================================================
// Arithmetic Implementations (macro to reduce boilerplate)
// ============================================================================

macro_rules! impl_arithmetic {
    ($type:ty) => {
        impl Sub for $type {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self::Output {
                Self(self.0 - rhs.0)
            }
        }

        impl Mul<f64> for $type {
            type Output = Self;
            fn mul(self, rhs: f64) -> Self::Output {
                Self(self.0 * rhs)
            }
        }

        impl std::iter::Sum for $type {
            fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
                Self(iter.map(|v| v.0).sum())
            }
        }

        impl $type {
            /// Get the raw f64 value
            pub fn value(self) -> f64 {
                self.0
            }
        }
    };
}

impl_arithmetic!(Centimeters);
impl_arithmetic!(SquareCentimeters);
impl_arithmetic!(SquareMeters);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_tenth() {
        assert_eq!(round_tenth(80.0 - 2.0 * 1.6), 76.8);
        assert_eq!(round_tenth(77.1 - 1.6), 75.5);
        assert_eq!(round_tenth(77.1 - 0.9), 76.2);
        assert_eq!(round_tenth(49.0), 49.0);
    }

    #[test]
    fn test_area_conversion() {
        let cm2 = SquareCentimeters(39_071.36);
        let m2: SquareMeters = cm2.into();
        assert!((m2.0 - 3.907136).abs() < 1e-9);
    }

    #[test]
    fn test_arithmetic() {
        let a = Centimeters(80.0);
        let b = Centimeters(1.6);
        assert!(((a - b * 2.0).value() - 76.8).abs() < 1e-9);
        let total: SquareMeters = vec![SquareMeters(1.0), SquareMeters(0.5)].into_iter().sum();
        assert_eq!(total.0, 1.5);
    }

    #[test]
    fn test_serialization() {
        let cm = Centimeters(55.5);
        let json = serde_json::to_string(&cm).unwrap();
        assert_eq!(json, "55.5");

        let roundtrip: Centimeters = serde_json::from_str(&json).unwrap();
        assert_eq!(cm, roundtrip);
    }
}
