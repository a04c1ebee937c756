// Copyright 2025 Irreducible Inc.

mod avx2;

pub use avx2::{Avx2, Avx2MatMul};

use crate::{Error, MatMul, Parallelism};

pub(crate) fn vectorized_kernel_supported() -> bool {
	Avx2::detect().is_some()
}

/// Builds the widest kernel the running CPU supports, if any.
pub(crate) fn optimal_matmul(parallelism: Parallelism) -> Result<Option<Box<dyn MatMul>>, Error> {
	match Avx2::detect() {
		Some(lanes) => Ok(Some(Box::new(Avx2MatMul::with_lanes(lanes, parallelism)?))),
		None => Ok(None),
	}
}
