// Copyright 2025 Irreducible Inc.

use std::fmt::Debug;

/// The inner loops of a matrix multiplication kernel.
///
/// A value of the implementing type is a proof that the instructions it uses are available, so
/// the methods are safe to call. Both slices passed to a method have the same length.
pub trait Lanes: Copy + Debug + Send + Sync + 'static {
	/// Human readable name of the instruction set, used in diagnostics.
	const NAME: &'static str;

	/// Returns `init + Σ x[i] * y[i]`.
	fn dot(self, init: f32, x: &[f32], y: &[f32]) -> f32;

	/// Computes `y[i] += alpha * x[i]`.
	fn axpy(self, y: &mut [f32], x: &[f32], alpha: f32);
}
