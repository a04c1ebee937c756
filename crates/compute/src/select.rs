// Copyright 2025 Irreducible Inc.

use synapse_utils::env::boolean_env_flag_set;
use tracing::debug;

use crate::{arch, cpu::ReferenceMatMul, Error, MatMul, Parallelism};

/// Environment flag that pins every kernel selection to the scalar reference.
pub const FORCE_REFERENCE_ENV: &str = "SYNAPSE_FORCE_REFERENCE_KERNEL";

/// Which kernel variant [`select_matmul`] should build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KernelPreference {
	/// The widest kernel the running CPU supports.
	#[default]
	Auto,
	/// Always the scalar reference.
	Reference,
}

/// Whether a vectorized kernel is available on the running CPU.
pub fn vectorized_kernel_supported() -> bool {
	arch::vectorized_kernel_supported()
}

/// Builds a matmul kernel.
///
/// With [`KernelPreference::Auto`] the vectorized kernel is used when the CPU supports it, unless
/// the [`FORCE_REFERENCE_ENV`] flag is set. Otherwise the scalar reference is returned.
pub fn select_matmul(
	preference: KernelPreference,
	parallelism: Parallelism,
) -> Result<Box<dyn MatMul>, Error> {
	let forced = boolean_env_flag_set(FORCE_REFERENCE_ENV);
	if preference == KernelPreference::Auto && !forced {
		if let Some(kernel) = arch::optimal_matmul(parallelism)? {
			debug!(kernel = kernel.name(), ?parallelism, "selected matmul kernel");
			return Ok(kernel);
		}
	}

	let kernel = ReferenceMatMul::new(parallelism)?;
	debug!(kernel = kernel.name(), ?parallelism, ?preference, forced, "selected matmul kernel");
	Ok(Box::new(kernel))
}
