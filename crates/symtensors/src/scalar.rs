//! Scalar trait for tensor component types.

use faer_traits::ComplexField;
use std::fmt::Debug;
use std::ops::{Add, Mul, Neg, Sub};

pub use faer::c64;

/// Trait for scalar types supported by symtensors.
///
/// This wraps faer's `ComplexField` with the arithmetic the contraction
/// engine accumulates with.
pub trait Scalar:
    ComplexField
    + Copy
    + Debug
    + Default
    + PartialEq
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Neg<Output = Self>
    + 'static
{
    /// Returns the additive identity (zero).
    fn zero() -> Self {
        Self::default()
    }

    /// Returns the multiplicative identity (one).
    fn one() -> Self;

    /// Embeds a real number, used for combinatorial rescaling.
    fn from_real(value: f64) -> Self;
}

impl Scalar for f64 {
    fn one() -> Self {
        1.0
    }

    fn from_real(value: f64) -> Self {
        value
    }
}

impl Scalar for c64 {
    fn one() -> Self {
        c64::new(1.0, 0.0)
    }

    fn from_real(value: f64) -> Self {
        c64::new(value, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use faer_traits::ComplexField;

    #[test]
    fn test_f64_is_real() {
        assert!(<f64 as ComplexField>::IS_REAL);
    }

    #[test]
    fn test_c64_is_not_real() {
        assert!(!<c64 as ComplexField>::IS_REAL);
    }

    #[test]
    fn test_zero_one() {
        assert_eq!(f64::zero(), 0.0);
        assert_eq!(f64::one(), 1.0);
        assert_eq!(c64::zero(), c64::new(0.0, 0.0));
        assert_eq!(c64::one(), c64::new(1.0, 0.0));
    }

    #[test]
    fn test_from_real() {
        assert_eq!(f64::from_real(0.5), 0.5);
        assert_eq!(c64::from_real(-2.0), c64::new(-2.0, 0.0));
    }
}
