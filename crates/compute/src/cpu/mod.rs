// Copyright 2025 Irreducible Inc.

//! CPU implementation of the matmul kernels.
//!
//! [`CpuMatMul`] owns the batch fan-out and the gradient reduction strategy, the [`crate::Lanes`]
//! parameter decides how the inner products are evaluated. [`Scalar`] lanes are the readable
//! reference that vectorized lanes are validated against.

mod matmul;
mod scalar;

pub use matmul::{CpuMatMul, ReferenceMatMul};
pub use scalar::Scalar;
