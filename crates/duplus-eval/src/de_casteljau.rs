//! De Casteljau evaluation of polynomials in Bernstein form.
//!
//! A polynomial `p(s) = sum_j b_j C(n,j) (1-s)^(n-j) s^j` is evaluated by
//! repeatedly reducing the control net: `b_j <- r*b_j + s*b_{j+1}` with
//! `r = 1 - s`, one pass per degree, until a single value survives.
//!
//! The compensated evaluator runs K parallel levels of that reduction.
//! Level 0 carries the control net through error-free transformations;
//! each deeper level carries the rounding errors recovered from the level
//! above, itself error-free until the last level, which absorbs what
//! remains in plain arithmetic. The K surviving values form a ladder
//! `b + db + d2b + ...` that approximates `p(s)` ever more closely as more
//! terms are summed.
//!
//! Control points are ordered from `b_n` down to `b_0` throughout.

use duplus_eft::{add_eft, multiply_eft, Scalar};
use smallvec::SmallVec;

/// Inline capacity covering the error ladder up to 5-fold compensation.
type ErrorLadder<T> = SmallVec<[T; 18]>;

/// Classic de Casteljau reduction.
///
/// Correct (though not accurate) for any finite `s`, not just `[0, 1]`.
///
/// # Panics
///
/// Panics if `coeffs` is empty.
#[must_use]
pub fn basic<T: Scalar>(s: &T, coeffs: &[T]) -> T {
    assert!(!coeffs.is_empty(), "control net cannot be empty");

    let degree = coeffs.len() - 1;
    let r = s.lift(1.0) - s.clone();

    let mut pk = coeffs.to_vec();
    for pass in 0..degree {
        for j in 0..degree - pass {
            pk[j] = r.clone() * pk[j].clone() + s.clone() * pk[j + 1].clone();
        }
    }

    pk[0].clone()
}

/// Plain reduction of a pending error ladder: the sum of the pending terms
/// plus `rho * delta_b`, all in ordinary arithmetic.
fn local_error<T: Scalar>(errors: &[T], rho: &T, delta_b: &T) -> T {
    let mut total = errors[0].clone();
    for error in &errors[1..] {
        total = total + error.clone();
    }
    total + rho.clone() * delta_b.clone()
}

/// Error-free reduction of a pending error ladder.
///
/// Sequentially two-sums the pending terms, folds in `rho * delta_b` via a
/// two-product, and rewrites the ladder with the errors of those operations
/// (one more entry than it had). Returns the rounded local error.
fn local_error_eft<T: Scalar>(errors: &mut ErrorLadder<T>, rho: &T, delta_b: &T) -> T {
    let (mut running, first) = add_eft(errors[0].clone(), errors[1].clone());
    errors[0] = first;
    for j in 2..errors.len() {
        let (next, error) = add_eft(running, errors[j].clone());
        errors[j - 1] = error;
        running = next;
    }

    let (product, tail) = multiply_eft(rho.clone(), delta_b.clone());
    let last = errors.len() - 1;
    errors[last] = tail;

    let (total, error) = add_eft(running, product);
    errors.push(error);
    total
}

/// Generalized K-fold compensated de Casteljau evaluation.
///
/// Returns the K surviving values `(b, db, d2b, ...)`; summed left to
/// right they approximate `p(s)` with accuracy improving roughly by one
/// factor of the unit roundoff per extra term. Levels `0..k-1` are carried
/// through error-free transformations; the final level absorbs the
/// remaining errors in plain arithmetic, the designed cutoff beyond which
/// further exact tracking buys nothing extractable.
///
/// Bit-identical to the historical hand-unrolled 2/3/4/5-fold algorithms
/// for `k` in that range.
///
/// # Panics
///
/// Panics if `coeffs` is empty or `k < 2`.
#[must_use]
pub fn compensated_k<T: Scalar>(s: &T, coeffs: &[T], k: usize) -> Vec<T> {
    assert!(!coeffs.is_empty(), "control net cannot be empty");
    assert!(k >= 2, "compensation needs at least two levels");

    let degree = coeffs.len() - 1;
    let (r, rho) = add_eft(s.lift(1.0), -s.clone());
    let zero = s.lift(0.0);

    // levels[0] is the control net; deeper levels start at zero.
    let mut levels: Vec<Vec<T>> = Vec::with_capacity(k);
    levels.push(coeffs.to_vec());
    for _ in 1..k {
        levels.push(vec![zero.clone(); degree + 1]);
    }

    let mut errors: ErrorLadder<T> = SmallVec::new();
    for pass in 0..degree {
        for j in 0..degree - pass {
            let mut delta_b = levels[0][j].clone();

            // Level 0: the basic recurrence, error-free.
            errors.clear();
            let (left, e1) = multiply_eft(r.clone(), levels[0][j].clone());
            let (right, e2) = multiply_eft(s.clone(), levels[0][j + 1].clone());
            let (combined, e3) = add_eft(left, right);
            levels[0][j] = combined;
            errors.push(e1);
            errors.push(e2);
            errors.push(e3);

            // Intermediate levels: fold the ladder in, still error-free.
            for level in 1..k - 1 {
                let local = local_error_eft(&mut errors, &rho, &delta_b);
                delta_b = levels[level][j].clone();

                let (right, e1) = multiply_eft(s.clone(), levels[level][j + 1].clone());
                let (partial, e2) = add_eft(local, right);
                let (left, e3) = multiply_eft(r.clone(), levels[level][j].clone());
                let (combined, e4) = add_eft(partial, left);
                levels[level][j] = combined;
                errors.push(e1);
                errors.push(e2);
                errors.push(e3);
                errors.push(e4);
            }

            // Final level: plain arithmetic absorbs what is left.
            let local = local_error(&errors, &rho, &delta_b);
            let last = k - 1;
            levels[last][j] = local
                + s.clone() * levels[last][j + 1].clone()
                + r.clone() * levels[last][j].clone();
        }
    }

    levels.into_iter().map(|level| level[0].clone()).collect()
}

/// Sums a compensation ladder left to right.
fn ladder_total<T: Scalar>(values: Vec<T>) -> T {
    let mut values = values.into_iter();
    let mut total = values.next().expect("ladder is never empty");
    for value in values {
        total = total + value;
    }
    total
}

/// Compensated de Casteljau evaluation (2-fold).
///
/// # Panics
///
/// Panics if `coeffs` is empty.
#[must_use]
pub fn compensated<T: Scalar>(s: &T, coeffs: &[T]) -> T {
    ladder_total(compensated_k(s, coeffs, 2))
}

/// 3-fold compensated de Casteljau evaluation.
///
/// # Panics
///
/// Panics if `coeffs` is empty.
#[must_use]
pub fn compensated3<T: Scalar>(s: &T, coeffs: &[T]) -> T {
    ladder_total(compensated_k(s, coeffs, 3))
}

/// 4-fold compensated de Casteljau evaluation.
///
/// # Panics
///
/// Panics if `coeffs` is empty.
#[must_use]
pub fn compensated4<T: Scalar>(s: &T, coeffs: &[T]) -> T {
    ladder_total(compensated_k(s, coeffs, 4))
}

/// 5-fold compensated de Casteljau evaluation.
///
/// # Panics
///
/// Panics if `coeffs` is empty.
#[must_use]
pub fn compensated5<T: Scalar>(s: &T, coeffs: &[T]) -> T {
    ladder_total(compensated_k(s, coeffs, 5))
}
