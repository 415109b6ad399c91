//! The numeric capability backing every transformation and evaluator.

use std::fmt::Debug;
use std::ops::{Add, Mul, Neg, Sub};

/// A double-precision-like scalar.
///
/// Implementations wrap an IEEE-754 binary64 value and may carry extra
/// context (an operation tally, for instance) alongside it.
///
/// # Laws
///
/// - `+`, `-`, `*` and [`mul_add`](Scalar::mul_add) round exactly as the
///   corresponding `f64` operations under round-to-nearest; the carried
///   context never changes the numeric value.
/// - Operations are performed in the order written. No implementation may
///   assume associativity or commutativity when that would change the
///   rounding sequence.
/// - [`lift`](Scalar::lift) embeds a literal into the same context as `self`
///   without performing any arithmetic.
pub trait Scalar:
    Clone
    + PartialEq
    + Debug
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Neg<Output = Self>
{
    /// Embeds a literal constant into the same context as `self`.
    #[must_use]
    fn lift(&self, value: f64) -> Self;

    /// Fused multiply-add `self * b + c` with a single final rounding.
    #[must_use]
    fn mul_add(&self, b: &Self, c: &Self) -> Self;
}

impl Scalar for f64 {
    fn lift(&self, value: f64) -> Self {
        value
    }

    fn mul_add(&self, b: &Self, c: &Self) -> Self {
        f64::mul_add(*self, *b, *c)
    }
}
