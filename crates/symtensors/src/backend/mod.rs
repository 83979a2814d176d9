//! Hand-off to the linear-algebra back-end.
//!
//! The contraction engine never calls into faer itself. Callers that need
//! inversion, determinants or decompositions view a two-factor tensor as a
//! faer matrix here, run faer, and copy the result back onto a space.
//!
//! Tensor products are row-major, so a dense tensor on `V ⊗ W` is a
//! `dim V × dim W` matrix with row stride `dim W` and column stride 1.

mod faer_interop;

pub use faer_interop::{AsFaerMat, faer_mat_from_tensor, matrix_shape, tensor_from_faer_mat};
