//! The error-free transformations themselves.

use crate::scalar::Scalar;

/// Splitting constant `2^26 + 1` for [`split`].
const SPLIT_FACTOR: f64 = 67_108_865.0;

/// Two-sum of Knuth and Møller.
///
/// Returns `(sum, error)` where `sum` is the correctly rounded `a + b` and
/// `sum + error` reconstructs the exact real sum. Valid for any operand
/// order; no branch on magnitudes is needed.
#[must_use]
pub fn add_eft<T: Scalar>(a: T, b: T) -> (T, T) {
    let sum = a.clone() + b.clone();
    let delta = sum.clone() - a.clone();
    let error = (a - (sum.clone() - delta.clone())) + (b - delta);
    (sum, error)
}

/// Veltkamp split of a double into a 26-bit high part and the remainder.
///
/// `high + low == a` holds bit-exactly as long as `a * (2^26 + 1)` does not
/// overflow (`|a| < 2^970`).
#[must_use]
pub fn split<T: Scalar>(a: T) -> (T, T) {
    let scaled = a.clone() * a.lift(SPLIT_FACTOR);
    let high = scaled.clone() - (scaled - a.clone());
    let low = a - high.clone();
    (high, low)
}

/// Two-product via Dekker's algorithm.
///
/// Returns `(product, error)` where `product` is the correctly rounded
/// `a * b` and `product + error` reconstructs the exact real product. The
/// error is derived from the four partial products of the [`split`] halves.
#[must_use]
pub fn multiply_eft_split<T: Scalar>(a: T, b: T) -> (T, T) {
    let product = a.clone() * b.clone();
    let (high1, low1) = split(a);
    let (high2, low2) = split(b);
    let error = low1.clone() * low2.clone()
        - (((product.clone() - high1.clone() * high2.clone()) - low1 * high2) - high1 * low2);
    (product, error)
}

/// Two-product via a fused multiply-add.
///
/// Computes the error term as `fma(a, b, -product)` in two operations.
/// Produces bit-identical results to [`multiply_eft_split`] whenever the
/// platform `fma` rounds once from infinite precision.
#[must_use]
pub fn multiply_eft_fma<T: Scalar>(a: T, b: T) -> (T, T) {
    let product = a.clone() * b.clone();
    let error = a.mul_add(&b, &-product.clone());
    (product, error)
}

/// Two-product, dispatching on the `fma` cargo feature.
///
/// The split path is the portable default; enable `fma` on targets with a
/// correctly rounded fused multiply-add to cut the operation count.
#[must_use]
pub fn multiply_eft<T: Scalar>(a: T, b: T) -> (T, T) {
    #[cfg(feature = "fma")]
    {
        multiply_eft_fma(a, b)
    }
    #[cfg(not(feature = "fma"))]
    {
        multiply_eft_split(a, b)
    }
}

/// One in-place error-free vector pass.
///
/// After the pass, the last slot holds the running sum of the input and the
/// earlier slots hold the rounding errors extracted along the way.
pub fn vec_sum<T: Scalar>(values: &mut [T]) {
    for i in 1..values.len() {
        let (sum, error) = add_eft(values[i].clone(), values[i - 1].clone());
        values[i] = sum;
        values[i - 1] = error;
    }
}

/// K-fold compensated summation.
///
/// Applies `k - 1` [`vec_sum`] passes and then sums the workspace left to
/// right; `k == 1` is plain summation. Costs `(6k - 5)(n - 1)` flops for `n`
/// inputs, and each extra fold improves the achievable relative accuracy by
/// roughly one factor of the unit roundoff.
///
/// # Panics
///
/// Panics if `values` is empty or `k == 0`.
#[must_use]
pub fn sum_k<T: Scalar>(values: &[T], k: usize) -> T {
    assert!(!values.is_empty(), "values cannot be empty");
    assert!(k >= 1, "k must be at least 1");

    let mut workspace = values.to_vec();
    for _ in 1..k {
        vec_sum(&mut workspace);
    }

    let mut total = workspace[0].clone();
    for value in &workspace[1..] {
        total = total + value.clone();
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;

    fn significant_bits(x: f64) -> u32 {
        if x == 0.0 {
            return 0;
        }
        let mantissa = (x.to_bits() & ((1_u64 << 52) - 1)) | (1_u64 << 52);
        53 - mantissa.trailing_zeros()
    }

    #[test]
    fn test_add_eft_rounded_tie() {
        // 1.5 + (0.5 + 2^-52) = 2 + 2^-52 rounds to 2 (ties to even),
        // leaving the tail as the exact error.
        let (sum, error) = add_eft(1.5, 0.5 + 2_f64.powi(-52));
        assert_eq!(sum, 2.0);
        assert_eq!(error, 2_f64.powi(-52));
    }

    #[test]
    fn test_add_eft_exact_case() {
        let (sum, error) = add_eft(0.25, 4.0);
        assert_eq!(sum, 4.25);
        assert_eq!(error, 0.0);
    }

    #[test]
    fn test_multiply_eft_tiny_tail() {
        // (1 + 2^-40)(1 - 2^-40) = 1 - 2^-80 rounds to 1.
        let (product, error) = multiply_eft(1.0 + 2_f64.powi(-40), 1.0 - 2_f64.powi(-40));
        assert_eq!(product, 1.0);
        assert_eq!(error, -(2_f64.powi(-80)));
    }

    #[test]
    fn test_split_small_tail() {
        let (high, low) = split(1.0 + 2_f64.powi(-27));
        assert_eq!(high, 1.0);
        assert_eq!(low, 2_f64.powi(-27));
    }

    #[test]
    fn test_split_reconstructs_and_is_narrow() {
        let corpus = [
            std::f64::consts::PI,
            std::f64::consts::E,
            1.0 / 3.0,
            4097.1,
            -6.02214076e23,
            2_f64.powi(-500) * 1.375,
        ];
        for &a in &corpus {
            let (high, low) = split(a);
            assert_eq!((high + low).to_bits(), a.to_bits());
            assert!(significant_bits(high) <= 26, "high part too wide for {a}");
        }
    }

    #[test]
    fn test_multiply_eft_paths_agree() {
        let corpus = [
            (std::f64::consts::PI, std::f64::consts::LN_2),
            (1.0 / 3.0, 3.0),
            (1.0 + 2_f64.powi(-30), 1.0 - 2_f64.powi(-30)),
            (-7.25e10, 1.1e-12),
            (0.1, 0.2),
        ];
        for &(a, b) in &corpus {
            let (p1, e1) = multiply_eft_split(a, b);
            let (p2, e2) = multiply_eft_fma(a, b);
            assert_eq!(p1.to_bits(), p2.to_bits());
            assert_eq!(e1.to_bits(), e2.to_bits(), "error terms differ for {a} * {b}");
        }
    }

    #[test]
    fn test_sum_k_recovers_lost_bits() {
        // Plain summation loses both 2^-53 tails to ties; one extra fold
        // recovers them.
        let values = [1.0, 2_f64.powi(-53), 2_f64.powi(-53)];
        assert_eq!(sum_k(&values, 1), 1.0);
        assert_eq!(sum_k(&values, 2), 1.0 + 2_f64.powi(-52));
    }

    #[test]
    fn test_sum_k_single_value() {
        assert_eq!(sum_k(&[0.3], 4), 0.3);
    }

    #[test]
    #[should_panic(expected = "values cannot be empty")]
    fn test_sum_k_empty_panics() {
        let _ = sum_k::<f64>(&[], 2);
    }

    #[test]
    fn test_vec_sum_last_slot_holds_sum() {
        let mut values = [0.1, 0.2, 0.3];
        let plain = (0.1 + 0.2) + 0.3;
        vec_sum(&mut values);
        assert_eq!(values[2], plain);
    }
}
