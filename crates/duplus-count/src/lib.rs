//! # duplus-count
//!
//! An operation-counting scalar.
//!
//! [`Counted`] wraps an `f64` together with a shared [`Computation`] tally;
//! every arithmetic operation increments the tally and produces a value in
//! the same computation. Because the evaluators are generic over
//! [`Scalar`], substituting [`Counted`] audits their literal flop counts
//! without touching (or re-ordering) the numeric path: counted results are
//! bit-identical to plain `f64` results.
//!
//! Two values may only be combined when they belong to the same
//! [`Computation`]; mixing computations is a caller bug and panics
//! immediately.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

use std::cell::Cell;
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};
use std::rc::Rc;

use duplus_eft::Scalar;

/// A running tally of floating-point operations.
#[derive(Debug, Default)]
pub struct Computation {
    adds: Cell<u64>,
    subs: Cell<u64>,
    muls: Cell<u64>,
    fmas: Cell<u64>,
}

impl Computation {
    /// Starts a fresh tally.
    #[must_use]
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// Number of additions so far.
    #[must_use]
    pub fn adds(&self) -> u64 {
        self.adds.get()
    }

    /// Number of subtractions so far.
    #[must_use]
    pub fn subs(&self) -> u64 {
        self.subs.get()
    }

    /// Number of multiplications so far.
    #[must_use]
    pub fn muls(&self) -> u64 {
        self.muls.get()
    }

    /// Number of fused multiply-adds so far.
    #[must_use]
    pub fn fmas(&self) -> u64 {
        self.fmas.get()
    }

    /// Total number of operations so far.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.adds() + self.subs() + self.muls() + self.fmas()
    }
}

impl fmt::Display for Computation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} flops ({} add, {} sub, {} multiply, {} fma)",
            self.total(),
            self.adds(),
            self.subs(),
            self.muls(),
            self.fmas()
        )
    }
}

/// An `f64` that reports every operation to its [`Computation`].
#[derive(Clone, Debug)]
pub struct Counted {
    value: f64,
    computation: Rc<Computation>,
}

impl Counted {
    /// Wraps a value in the given computation.
    #[must_use]
    pub fn new(value: f64, computation: &Rc<Computation>) -> Self {
        Self {
            value,
            computation: Rc::clone(computation),
        }
    }

    /// The wrapped value.
    #[must_use]
    pub fn value(&self) -> f64 {
        self.value
    }

    fn check_same_computation(&self, other: &Self) {
        assert!(
            Rc::ptr_eq(&self.computation, &other.computation),
            "operands belong to different computations"
        );
    }
}

impl PartialEq for Counted {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Add for Counted {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        self.check_same_computation(&rhs);
        self.computation.adds.set(self.computation.adds.get() + 1);
        Self {
            value: self.value + rhs.value,
            computation: self.computation,
        }
    }
}

impl Sub for Counted {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        self.check_same_computation(&rhs);
        self.computation.subs.set(self.computation.subs.get() + 1);
        Self {
            value: self.value - rhs.value,
            computation: self.computation,
        }
    }
}

impl Mul for Counted {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        self.check_same_computation(&rhs);
        self.computation.muls.set(self.computation.muls.get() + 1);
        Self {
            value: self.value * rhs.value,
            computation: self.computation,
        }
    }
}

impl Neg for Counted {
    type Output = Self;

    // Sign flips are exact and free on every target; they are not tallied.
    fn neg(self) -> Self::Output {
        Self {
            value: -self.value,
            computation: self.computation,
        }
    }
}

impl Scalar for Counted {
    fn lift(&self, value: f64) -> Self {
        Self {
            value,
            computation: Rc::clone(&self.computation),
        }
    }

    fn mul_add(&self, b: &Self, c: &Self) -> Self {
        self.check_same_computation(b);
        self.check_same_computation(c);
        self.computation.fmas.set(self.computation.fmas.get() + 1);
        Self {
            value: f64::mul_add(self.value, b.value, c.value),
            computation: Rc::clone(&self.computation),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use duplus_eft::{add_eft, multiply_eft_fma, multiply_eft_split, split, sum_k};
    use duplus_eval::{de_casteljau, horner};

    fn counted(values: &[f64], computation: &Rc<Computation>) -> Vec<Counted> {
        values.iter().map(|&v| Counted::new(v, computation)).collect()
    }

    #[test]
    fn test_add_eft_costs_six() {
        let tally = Computation::new();
        let a = Counted::new(1.5, &tally);
        let b = Counted::new(0.25, &tally);
        let _ = add_eft(a, b);
        assert_eq!(tally.adds(), 2);
        assert_eq!(tally.subs(), 4);
        assert_eq!(tally.total(), 6);
    }

    #[test]
    fn test_split_costs_four() {
        let tally = Computation::new();
        let _ = split(Counted::new(0.7, &tally));
        assert_eq!(tally.muls(), 1);
        assert_eq!(tally.subs(), 3);
        assert_eq!(tally.total(), 4);
    }

    #[test]
    fn test_multiply_eft_split_costs_seventeen() {
        let tally = Computation::new();
        let a = Counted::new(0.7, &tally);
        let b = Counted::new(1.3, &tally);
        let _ = multiply_eft_split(a, b);
        assert_eq!(tally.muls(), 7);
        assert_eq!(tally.subs(), 10);
        assert_eq!(tally.total(), 17);
    }

    #[test]
    fn test_multiply_eft_fma_costs_two() {
        let tally = Computation::new();
        let a = Counted::new(0.7, &tally);
        let b = Counted::new(1.3, &tally);
        let _ = multiply_eft_fma(a, b);
        assert_eq!(tally.muls(), 1);
        assert_eq!(tally.fmas(), 1);
        assert_eq!(tally.total(), 2);
    }

    #[test]
    fn test_sum_k_cost_formula() {
        // (6K - 5)(n - 1) for n inputs at K folds.
        let tally = Computation::new();
        let values = counted(&[1.0, 0.5, 0.25, 0.125], &tally);
        let _ = sum_k(&values, 3);
        assert_eq!(tally.total(), 13 * 3);
    }

    #[test]
    fn test_horner_basic_cost() {
        // 2n flops for degree n.
        let tally = Computation::new();
        let x = Counted::new(0.3, &tally);
        let coeffs = counted(&[1.0, -2.0, 3.0, -4.0], &tally);
        let _ = horner::basic(&x, &coeffs);
        assert_eq!(tally.total(), 6);
    }

    #[test]
    fn test_horner_compensated_cost() {
        // 26n + 1 with the split-based two-product.
        let tally = Computation::new();
        let x = Counted::new(0.3, &tally);
        let coeffs = counted(&[1.0, -2.0, 3.0, -4.0], &tally);
        let _ = horner::compensated(&x, &coeffs);
        assert_eq!(tally.total(), 26 * 3 + 1);
    }

    #[test]
    fn test_de_casteljau_basic_cost() {
        // 3 * T_n + 1 with T_n = n(n+1)/2.
        let tally = Computation::new();
        let s = Counted::new(0.3, &tally);
        let coeffs = counted(&[1.0, -1.0, 1.0, -1.0], &tally);
        let _ = de_casteljau::basic(&s, &coeffs);
        assert_eq!(tally.total(), 3 * 6 + 1);
    }

    #[test]
    fn test_de_casteljau_compensated_cost() {
        // 48 * T_n + 7 with the split-based two-product.
        let tally = Computation::new();
        let s = Counted::new(0.3, &tally);
        let coeffs = counted(&[1.0, -1.0, 1.0], &tally);
        let _ = de_casteljau::compensated(&s, &coeffs);
        assert_eq!(tally.total(), 48 * 3 + 7);
    }

    #[test]
    fn test_counted_matches_plain_f64() {
        let coeffs = [2.5, -0.75, 3.0, 1.5, -1.0];
        let s = 0.5 + 2_f64.powi(-25);

        let tally = Computation::new();
        let counted_s = Counted::new(s, &tally);
        let counted_coeffs = counted(&coeffs, &tally);

        let plain = de_casteljau::compensated_k(&s, &coeffs, 4);
        let audited = de_casteljau::compensated_k(&counted_s, &counted_coeffs, 4);
        for (p, a) in plain.iter().zip(&audited) {
            assert_eq!(p.to_bits(), a.value().to_bits());
        }
    }

    #[test]
    #[should_panic(expected = "different computations")]
    fn test_mixing_computations_panics() {
        let first = Computation::new();
        let second = Computation::new();
        let _ = Counted::new(1.0, &first) + Counted::new(2.0, &second);
    }
}
