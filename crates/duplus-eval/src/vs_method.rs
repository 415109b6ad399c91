//! VS-method evaluation of polynomials in Bernstein form.
//!
//! A single-pass alternative to de Casteljau: instead of reducing the
//! control net, one accumulator collects binomial-weighted powers of `s`
//! while being rescaled by `r = 1 - s` once per step. Asymptotically the
//! same cost, structurally much simpler, and specified to one compensation
//! fold only.
//!
//! The binomial weights are computed exactly in big-integer arithmetic and
//! cast to `f64` only when the cast is exact; anything else is a domain
//! error, because a silently rounded weight would break the reconstruction
//! invariant the compensation relies on.

use dashu::base::Approximation;
use dashu::integer::UBig;
use duplus_eft::{add_eft, multiply_eft, Scalar};
use thiserror::Error;

/// Errors reported by the VS-method evaluators.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum VsError {
    /// A binomial weight fell outside the exactly representable doubles.
    #[error("binomial coefficient C({n}, {k}) has no exact f64 representation")]
    InexactBinomial {
        /// Polynomial degree.
        n: u32,
        /// Basis index.
        k: u32,
    },
}

fn factorial(n: u32) -> UBig {
    let mut product = UBig::ONE;
    for i in 2..=n {
        product *= UBig::from(i);
    }
    product
}

/// The binomial coefficient `C(n, k)` as an exactly represented double.
///
/// Computed as `n! / (k! (n-k)!)` in big-integer arithmetic; returns
/// [`VsError::InexactBinomial`] when the value does not round-trip through
/// `f64`.
///
/// # Panics
///
/// Panics if `k > n`.
pub fn binomial(n: u32, k: u32) -> Result<f64, VsError> {
    assert!(k <= n, "binomial index cannot exceed the degree");

    let value = factorial(n) / (factorial(k) * factorial(n - k));
    match value.to_f64() {
        Approximation::Exact(weight) => Ok(weight),
        Approximation::Inexact(..) => Err(VsError::InexactBinomial { n, k }),
    }
}

/// Basic VS-method evaluation.
///
/// Control points ordered from `b_n` down to `b_0`, as for de Casteljau.
/// A single control point is returned unchanged.
///
/// # Errors
///
/// Returns [`VsError::InexactBinomial`] when a binomial weight of the
/// degree is not exactly representable as a double.
///
/// # Panics
///
/// Panics if `coeffs` is empty.
pub fn basic<T: Scalar>(s: &T, coeffs: &[T]) -> Result<T, VsError> {
    assert!(!coeffs.is_empty(), "control net cannot be empty");

    let degree = coeffs.len() - 1;
    if degree == 0 {
        return Ok(coeffs[0].clone());
    }
    let n = u32::try_from(degree).expect("degree fits in u32");

    let r = s.lift(1.0) - s.clone();
    let mut result = r.clone() * coeffs[0].clone();
    let mut s_pow = s.lift(1.0);
    for j in 1..degree {
        s_pow = s.clone() * s_pow;
        let weight = s.lift(binomial(n, u32::try_from(j).expect("index fits in u32"))?);
        result = result + weight * s_pow.clone() * coeffs[j].clone();
        result = result * r.clone();
    }
    result = result + s.clone() * s_pow * coeffs[degree].clone();

    Ok(result)
}

/// Compensated VS-method evaluation (one correction term).
///
/// Runs the same accumulation through error-free transformations, carrying
/// a separate error chain for the running power of `s` and a running
/// correction for the accumulator, and returns `primary + correction`.
///
/// # Errors
///
/// Returns [`VsError::InexactBinomial`] under the same conditions as
/// [`basic`].
///
/// # Panics
///
/// Panics if `coeffs` is empty.
pub fn compensated<T: Scalar>(s: &T, coeffs: &[T]) -> Result<T, VsError> {
    assert!(!coeffs.is_empty(), "control net cannot be empty");

    let degree = coeffs.len() - 1;
    if degree == 0 {
        return Ok(coeffs[0].clone());
    }
    let n = u32::try_from(degree).expect("degree fits in u32");

    let (r, rho) = add_eft(s.lift(1.0), -s.clone());

    let (mut result, e_first) = multiply_eft(r.clone(), coeffs[0].clone());
    let mut correction = e_first + rho.clone() * coeffs[0].clone();

    let mut s_pow = s.lift(1.0);
    let mut pow_err = s.lift(0.0);
    for j in 1..degree {
        let (next_pow, e_pow) = multiply_eft(s.clone(), s_pow);
        s_pow = next_pow;
        pow_err = e_pow + s.clone() * pow_err;

        let weight = s.lift(binomial(n, u32::try_from(j).expect("index fits in u32"))?);
        let (weighted, e1) = multiply_eft(weight.clone(), s_pow.clone());
        let (term, e2) = multiply_eft(weighted, coeffs[j].clone());
        let term_err = e2 + coeffs[j].clone() * (e1 + weight * pow_err.clone());

        let (sum, e3) = add_eft(result, term);
        let (scaled, e4) = multiply_eft(sum.clone(), r.clone());
        result = scaled;
        correction = e4 + rho.clone() * sum + r.clone() * (correction + e3 + term_err);
    }

    let (last_pow, e_pow) = multiply_eft(s.clone(), s_pow);
    pow_err = e_pow + s.clone() * pow_err;
    let (term, e1) = multiply_eft(last_pow, coeffs[degree].clone());
    let term_err = e1 + coeffs[degree].clone() * pow_err;
    let (total, e2) = add_eft(result, term);
    correction = correction + e2 + term_err;

    Ok(total + correction)
}
