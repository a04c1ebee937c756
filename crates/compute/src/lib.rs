// Copyright 2025 Irreducible Inc.

//! Matrix multiplication kernels behind the `Linear` layer.
//!
//! A kernel computes the affine map `out = in · Wᵀ + bias` for a batch of row vectors and the
//! matching gradients. Variants differ only in how the inner loops are evaluated: [`cpu`] holds
//! the readable scalar reference, [`arch`] holds vectorized lanes that are picked at runtime when
//! the host supports them.

pub mod arch;
pub mod cpu;
mod error;
mod lanes;
mod matmul;
mod parallelism;
mod select;

pub use error::*;
pub use lanes::Lanes;
pub use matmul::*;
pub use parallelism::Parallelism;
pub use select::*;
