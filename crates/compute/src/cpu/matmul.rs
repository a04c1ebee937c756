// Copyright 2025 Irreducible Inc.

use tracing::instrument;

use super::Scalar;
use crate::{
	parallelism::Executor, Error, Lanes, MatMul, MatMulGrads, MatMulShape, Parallelism,
};

/// The scalar reference kernel.
pub type ReferenceMatMul = CpuMatMul<Scalar>;

/// Matmul kernel that fans rows out over a worker pool and evaluates inner products with `L`.
///
/// The forward pass and the input gradient are partitioned by batch row. The weight and bias
/// gradients are reductions over the batch, so they are partitioned by output unit instead:
/// each worker owns whole rows of the weight gradient and no two workers write the same element.
/// Results are therefore identical for every [`Parallelism`].
#[derive(Debug)]
pub struct CpuMatMul<L: Lanes> {
	lanes: L,
	parallelism: Parallelism,
	executor: Executor,
}

impl<L: Lanes> CpuMatMul<L> {
	pub fn with_lanes(lanes: L, parallelism: Parallelism) -> Result<Self, Error> {
		Ok(Self {
			lanes,
			parallelism,
			executor: Executor::new(parallelism)?,
		})
	}
}

impl ReferenceMatMul {
	pub fn new(parallelism: Parallelism) -> Result<Self, Error> {
		Self::with_lanes(Scalar, parallelism)
	}
}

impl<L: Lanes> MatMul for CpuMatMul<L> {
	fn name(&self) -> &'static str {
		L::NAME
	}

	fn parallelism(&self) -> Parallelism {
		self.parallelism
	}

	#[instrument(
		"CpuMatMul::forward",
		skip_all,
		level = "trace",
		fields(kernel = L::NAME, batch = shape.batch, input = shape.input, output = shape.output)
	)]
	fn forward(
		&self,
		out: &mut [f32],
		input: &[f32],
		weight: &[f32],
		bias: Option<&[f32]>,
		shape: MatMulShape,
	) {
		let MatMulShape {
			batch,
			input: n_in,
			output: n_out,
		} = shape;
		debug_assert_eq!(out.len(), batch * n_out);
		debug_assert_eq!(input.len(), batch * n_in);
		debug_assert_eq!(weight.len(), n_out * n_in);
		debug_assert!(bias.map_or(true, |bias| bias.len() == n_out));

		let lanes = self.lanes;
		self.executor.for_each_chunk(out, n_out, |b, out_row| {
			let x = &input[b * n_in..(b + 1) * n_in];
			for (o, (y, w)) in out_row.iter_mut().zip(weight.chunks_exact(n_in)).enumerate() {
				let init = bias.map_or(0.0, |bias| bias[o]);
				*y = lanes.dot(init, x, w);
			}
		});
	}

	#[instrument(
		"CpuMatMul::backward",
		skip_all,
		level = "trace",
		fields(kernel = L::NAME, batch = shape.batch, input = shape.input, output = shape.output)
	)]
	fn backward(
		&self,
		out_grad: &[f32],
		input: &[f32],
		weight: &[f32],
		grads: MatMulGrads<'_>,
		shape: MatMulShape,
	) {
		let MatMulShape {
			batch,
			input: n_in,
			output: n_out,
		} = shape;
		let MatMulGrads {
			input: in_grad,
			weight: weight_grad,
			bias: bias_grad,
		} = grads;
		debug_assert_eq!(out_grad.len(), batch * n_out);
		debug_assert_eq!(input.len(), batch * n_in);
		debug_assert_eq!(in_grad.len(), batch * n_in);
		debug_assert_eq!(weight.len(), n_out * n_in);
		debug_assert_eq!(weight_grad.len(), n_out * n_in);

		let lanes = self.lanes;

		// in_grad[b, :] += Σ_o out_grad[b, o] * weight[o, :]
		self.executor.for_each_chunk(in_grad, n_in, |b, in_grad_row| {
			let deltas = &out_grad[b * n_out..(b + 1) * n_out];
			for (&delta, w) in deltas.iter().zip(weight.chunks_exact(n_in)) {
				lanes.axpy(in_grad_row, w, delta);
			}
		});

		// weight_grad[o, :] += Σ_b out_grad[b, o] * input[b, :]
		self.executor
			.for_each_chunk(weight_grad, n_in, |o, weight_grad_row| {
				for (x, deltas) in input.chunks_exact(n_in).zip(out_grad.chunks_exact(n_out)) {
					lanes.axpy(weight_grad_row, x, deltas[o]);
				}
			});

		if let Some(bias_grad) = bias_grad {
			debug_assert_eq!(bias_grad.len(), n_out);
			for deltas in out_grad.chunks_exact(n_out) {
				lanes.axpy(bias_grad, deltas, 1.0);
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use std::num::NonZeroUsize;

	use super::*;

	// in = [[1, 2], [3, 4], [5, 6]], weight = [[1, 0], [0, 1], [1, 1]] (3 outputs)
	const INPUT: [f32; 6] = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
	const WEIGHT: [f32; 6] = [1.0, 0.0, 0.0, 1.0, 1.0, 1.0];
	const BIAS: [f32; 3] = [0.5, -0.5, 1.0];

	fn kernels() -> Vec<ReferenceMatMul> {
		[
			Parallelism::Sequential,
			Parallelism::Auto,
			Parallelism::Limited(NonZeroUsize::new(2).unwrap()),
		]
		.into_iter()
		.map(|parallelism| ReferenceMatMul::new(parallelism).unwrap())
		.collect()
	}

	#[test]
	fn test_forward() {
		for kernel in kernels() {
			let mut out = [f32::NAN; 9];
			kernel.forward(&mut out, &INPUT, &WEIGHT, Some(&BIAS), MatMulShape::new(3, 2, 3));
			assert_eq!(out, [1.5, 1.5, 4.0, 3.5, 3.5, 8.0, 5.5, 5.5, 12.0]);

			kernel.forward(&mut out, &INPUT, &WEIGHT, None, MatMulShape::new(3, 2, 3));
			assert_eq!(out, [1.0, 2.0, 3.0, 3.0, 4.0, 7.0, 5.0, 6.0, 11.0]);
		}
	}

	#[test]
	fn test_backward_accumulates() {
		let out_grad = [1.0, 0.0, 1.0, 0.0, 1.0, 0.0, 2.0, 0.0, -1.0];
		for kernel in kernels() {
			let mut in_grad = [0.0; 6];
			let mut weight_grad = [0.0; 6];
			let mut bias_grad = [0.0; 3];
			for _ in 0..2 {
				in_grad.fill(0.0);
				kernel.backward(
					&out_grad,
					&INPUT,
					&WEIGHT,
					MatMulGrads {
						input: &mut in_grad,
						weight: &mut weight_grad,
						bias: Some(&mut bias_grad),
					},
					MatMulShape::new(3, 2, 3),
				);
			}

			assert_eq!(in_grad, [2.0, 1.0, 0.0, 1.0, 1.0, -1.0]);
			// Two accumulated passes.
			assert_eq!(weight_grad, [22.0, 28.0, 6.0, 8.0, -8.0, -8.0]);
			assert_eq!(bias_grad, [6.0, 2.0, 0.0]);
			assert_eq!(kernel.name(), "reference");
		}
	}
}
