// Copyright 2025 Irreducible Inc.

//! Vectorized lanes for the host architecture.

use cfg_if::cfg_if;

cfg_if! {
	if #[cfg(target_arch = "x86_64")] {
		mod x86_64;
		pub use x86_64::{Avx2, Avx2MatMul};
		pub(crate) use x86_64::{optimal_matmul, vectorized_kernel_supported};
	} else {
		use crate::{Error, MatMul, Parallelism};

		pub(crate) fn vectorized_kernel_supported() -> bool {
			false
		}

		pub(crate) fn optimal_matmul(
			_parallelism: Parallelism,
		) -> Result<Option<Box<dyn MatMul>>, Error> {
			Ok(None)
		}
	}
}
