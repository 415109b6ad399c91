//! Property-based tests for the reconstruction invariants.
