//! Property-based tests across the evaluator families.
