// Copyright 2025 Irreducible Inc.

use std::fmt::Debug;

use crate::Parallelism;

/// Dimensions of a batched affine map: `batch` rows of `input` features mapped to `output`
/// features.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatMulShape {
	pub batch: usize,
	pub input: usize,
	pub output: usize,
}

impl MatMulShape {
	pub fn new(batch: usize, input: usize, output: usize) -> Self {
		Self {
			batch,
			input,
			output,
		}
	}
}

/// Gradient buffers a backward pass accumulates into.
#[derive(Debug)]
pub struct MatMulGrads<'a> {
	/// `[batch, input]`, expected to be zeroed by the caller.
	pub input: &'a mut [f32],
	/// `[output, input]`, accumulated across calls.
	pub weight: &'a mut [f32],
	/// `[output]`, accumulated across calls.
	pub bias: Option<&'a mut [f32]>,
}

/// A batched affine map `out[b, o] = bias[o] + Σ_i in[b, i] * weight[o, i]` and its gradient.
///
/// All buffers are row-major: `in` is `[batch, input]`, `out` is `[batch, output]`, `weight` is
/// `[output, input]` and `bias` is `[output]`.
///
/// Implementations do not validate buffer lengths, callers must pass buffers that match `shape`.
/// Variants must agree with each other up to float32 rounding.
pub trait MatMul: Debug + Send + Sync {
	/// Name of the kernel variant, for diagnostics.
	fn name(&self) -> &'static str;

	fn parallelism(&self) -> Parallelism;

	/// Overwrites `out` with the affine map of `input`.
	fn forward(
		&self,
		out: &mut [f32],
		input: &[f32],
		weight: &[f32],
		bias: Option<&[f32]>,
		shape: MatMulShape,
	);

	/// Accumulates the gradients of the affine map given the gradient of its output.
	///
	/// * `grads.input += out_grad · weight`
	/// * `grads.weight += out_gradᵀ · input`
	/// * `grads.bias += Σ_b out_grad[b, :]`
	fn backward(
		&self,
		out_grad: &[f32],
		input: &[f32],
		weight: &[f32],
		grads: MatMulGrads<'_>,
		shape: MatMulShape,
	);
}
