// Copyright 2025 Irreducible Inc.

use crate::Lanes;

/// Plain sequential loops, accumulating in index order.
#[derive(Debug, Clone, Copy, Default)]
pub struct Scalar;

impl Lanes for Scalar {
	const NAME: &'static str = "reference";

	#[inline]
	fn dot(self, init: f32, x: &[f32], y: &[f32]) -> f32 {
		x.iter().zip(y).fold(init, |acc, (&x, &y)| acc + x * y)
	}

	#[inline]
	fn axpy(self, y: &mut [f32], x: &[f32], alpha: f32) {
		for (y, &x) in y.iter_mut().zip(x) {
			*y += x * alpha;
		}
	}
}
