//! # Duplus
//!
//! Compensated polynomial evaluation in K times the working precision.
//!
//! Duplus builds evaluators for polynomials in monomial and Bernstein form
//! on top of error-free transformations: the primary result of each
//! floating-point operation is kept alongside its exact rounding error, and
//! the accumulated errors are folded back in as correction terms. The
//! result behaves as if the evaluation had been carried out in K times the
//! native precision, at a small constant factor in cost and without any
//! arbitrary-precision arithmetic.
//!
//! ## Crates
//!
//! - [`eft`]: two-sum, two-product, Veltkamp splitting, cascaded summation
//! - [`eval`]: Horner, de Casteljau (generalized K-fold), and VS-method
//!   evaluators, plus condition numbers
//! - [`count`]: an operation-counting scalar for auditing flop costs
//!
//! ## Quick start
//!
//! ```rust
//! use duplus::prelude::*;
//!
//! // (2s - 1)^6 in Bernstein form, badly conditioned near s = 1/2.
//! let coeffs = [1.0, -1.0, 1.0, -1.0, 1.0, -1.0, 1.0];
//! let s = 0.5 + 2_f64.powi(-30);
//!
//! let exact = 2_f64.powi(-174);
//! let naive = de_casteljau::basic(&s, &coeffs);
//! let sharp = de_casteljau::compensated4(&s, &coeffs);
//! assert!((sharp - exact).abs() < (naive - exact).abs());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub use duplus_count as count;
pub use duplus_eft as eft;
pub use duplus_eval as eval;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use duplus_count::{Computation, Counted};
    pub use duplus_eft::{add_eft, multiply_eft, split, sum_k, Scalar};
    pub use duplus_eval::{condition, de_casteljau, horner, vs_method, VsError};
}
