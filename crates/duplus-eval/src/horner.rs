//! Horner evaluation of polynomials in monomial form.
//!
//! Computes `p(x) = a_n x^n + ... + a_1 x + a_0` through the recurrence
//! `p_k = p_{k+1} * x + a_k`, with coefficients ordered from `a_n` down to
//! `a_0`. The compensated variants run the same recurrence through
//! error-free transformations and fold the recovered per-step errors back
//! into the result.

use duplus_eft::{add_eft, multiply_eft, sum_k, Scalar};

/// Classic Horner evaluation.
///
/// An empty coefficient slice evaluates to zero; this is a defined
/// degenerate case, not an error.
#[must_use]
pub fn basic<T: Scalar>(x: &T, coeffs: &[T]) -> T {
    let Some((first, rest)) = coeffs.split_first() else {
        return x.lift(0.0);
    };

    let mut p = first.clone();
    for coeff in rest {
        p = p * x.clone() + coeff.clone();
    }
    p
}

/// One EFT pass of Horner's recurrence.
///
/// Returns the primary value together with the per-step multiply errors and
/// add errors, in step order.
fn compensated_parts<T: Scalar>(x: &T, coeffs: &[T]) -> (T, Vec<T>, Vec<T>) {
    let Some((first, rest)) = coeffs.split_first() else {
        return (x.lift(0.0), Vec::new(), Vec::new());
    };

    let mut p = first.clone();
    let mut e_pi = Vec::with_capacity(rest.len());
    let mut e_sigma = Vec::with_capacity(rest.len());
    for coeff in rest {
        let (product, e1) = multiply_eft(p, x.clone());
        let (next, e2) = add_eft(product, coeff.clone());
        p = next;
        e_pi.push(e1);
        e_sigma.push(e2);
    }

    (p, e_pi, e_sigma)
}

/// Compensated Horner evaluation (one correction term).
///
/// The per-step errors are themselves a polynomial in `x`; they are
/// evaluated with a second, plain Horner recurrence in the original step
/// order and added to the primary value at the end.
#[must_use]
pub fn compensated<T: Scalar>(x: &T, coeffs: &[T]) -> T {
    let (p, e_pi, e_sigma) = compensated_parts(x, coeffs);

    let mut e = x.lift(0.0);
    for (e1, e2) in e_pi.into_iter().zip(e_sigma) {
        e = x.clone() * e + (e1 + e2);
    }

    p + e
}

/// 3-fold compensated Horner evaluation.
///
/// Re-runs the EFT pass on each error list of the first pass, finishes the
/// four deepest lists with [`basic`], and combines the seven partial values
/// with 3-fold summation.
#[must_use]
pub fn compensated3<T: Scalar>(x: &T, coeffs: &[T]) -> T {
    let (h1, p2, p3) = compensated_parts(x, coeffs);
    let (h2, p4, p5) = compensated_parts(x, &p2);
    let (h3, p6, p7) = compensated_parts(x, &p3);

    let h4 = basic(x, &p4);
    let h5 = basic(x, &p5);
    let h6 = basic(x, &p6);
    let h7 = basic(x, &p7);

    sum_k(&[h1, h2, h3, h4, h5, h6, h7], 3)
}

/// 4-fold compensated Horner evaluation.
///
/// One level deeper than [`compensated3`]: fifteen partial values combined
/// with 4-fold summation.
#[must_use]
pub fn compensated4<T: Scalar>(x: &T, coeffs: &[T]) -> T {
    let (h1, p2, p3) = compensated_parts(x, coeffs);
    let (h2, p4, p5) = compensated_parts(x, &p2);
    let (h3, p6, p7) = compensated_parts(x, &p3);
    let (h4, p8, p9) = compensated_parts(x, &p4);
    let (h5, p10, p11) = compensated_parts(x, &p5);
    let (h6, p12, p13) = compensated_parts(x, &p6);
    let (h7, p14, p15) = compensated_parts(x, &p7);

    let h8 = basic(x, &p8);
    let h9 = basic(x, &p9);
    let h10 = basic(x, &p10);
    let h11 = basic(x, &p11);
    let h12 = basic(x, &p12);
    let h13 = basic(x, &p13);
    let h14 = basic(x, &p14);
    let h15 = basic(x, &p15);

    sum_k(
        &[
            h1, h2, h3, h4, h5, h6, h7, h8, h9, h10, h11, h12, h13, h14, h15,
        ],
        4,
    )
}
