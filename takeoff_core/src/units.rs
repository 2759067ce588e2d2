//! # Unit Types
//!
//! Type-safe wrappers for the two physical quantities the estimator works in.
//! They stay lightweight (just f64 wrappers) and serialize as plain numbers.
//!
//! Takeoff works in metric only:
//! - Length: meters (m)
//! - Area: square meters (m²)
//!
//! Purchasable quantities are not physical units; they are integer counts of
//! a catalog [`Unit`](crate::catalog::Unit) (boxes, bags, pieces, ...).
//!
//! ## Example
//!
//! ```rust
//! use takeoff_core::units::{Meters, SquareMeters};
//!
//! let width = Meters(3.0);
//! let height = Meters(2.5);
//! let area: SquareMeters = width * height;
//! assert_eq!(area.0, 7.5);
//! ```

use serde::{Deserialize, Serialize};
use std::iter::Sum;
use std::ops::{Add, Div, Mul, Sub};

/// Length in meters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Meters(pub f64);

/// Area in square meters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SquareMeters(pub f64);

impl Mul<Meters> for Meters {
    type Output = SquareMeters;
    fn mul(self, rhs: Meters) -> Self::Output {
        SquareMeters(self.0 * rhs.0)
    }
}

/// Area divided by a length gives a length (e.g. area over channel spacing).
impl Div<Meters> for SquareMeters {
    type Output = Meters;
    fn div(self, rhs: Meters) -> Self::Output {
        Meters(self.0 / rhs.0)
    }
}

macro_rules! impl_arithmetic {
    ($type:ty) => {
        impl Add for $type {
            type Output = Self;
            fn add(self, rhs: Self) -> Self::Output {
                Self(self.0 + rhs.0)
            }
        }

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

        impl Div<f64> for $type {
            type Output = Self;
            fn div(self, rhs: f64) -> Self::Output {
                Self(self.0 / rhs)
            }
        }

        impl Sum for $type {
            fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
                iter.fold(Self(0.0), |acc, x| acc + x)
            }
        }

        impl $type {
            /// Get the raw f64 value
            pub fn value(self) -> f64 {
                self.0
            }

            /// Create from raw f64 value
            pub fn new(value: f64) -> Self {
                Self(value)
            }

            /// True for a finite, strictly positive measurement
            pub fn is_positive(self) -> bool {
                self.0.is_finite() && self.0 > 0.0
            }
        }
    };
}

impl_arithmetic!(Meters);
impl_arithmetic!(SquareMeters);
