//! Condition numbers of polynomial evaluation.
//!
//! The condition number at a point is the ratio of the absolute-value
//! evaluation to the absolute evaluated value. It predicts how far the
//! relative forward error of an evaluator can stray: roughly `u * cond`
//! for a basic evaluator and `u + u^K * cond` for a K-fold compensated
//! one. These helpers label experiments; they take no part in the
//! compensated paths themselves.

use crate::{de_casteljau, horner};

/// Condition number of Bernstein-form evaluation at `s`.
///
/// Meaningful for `s` in `[0, 1]`, where the basis functions are
/// nonnegative. Returns infinity at a root.
///
/// # Panics
///
/// Panics if `coeffs` is empty.
#[must_use]
pub fn bernstein(s: f64, coeffs: &[f64]) -> f64 {
    let absolutes: Vec<f64> = coeffs.iter().map(|c| c.abs()).collect();
    de_casteljau::basic(&s, &absolutes) / de_casteljau::basic(&s, coeffs).abs()
}

/// Condition number of monomial-form evaluation at `x`.
///
/// Returns infinity at a root.
#[must_use]
pub fn monomial(x: f64, coeffs: &[f64]) -> f64 {
    let absolutes: Vec<f64> = coeffs.iter().map(|c| c.abs()).collect();
    horner::basic(&x.abs(), &absolutes) / horner::basic(&x, coeffs).abs()
}
