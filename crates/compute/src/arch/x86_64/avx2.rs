// Copyright 2025 Irreducible Inc.

use std::arch::x86_64::*;

use crate::{cpu::CpuMatMul, Error, Lanes, Parallelism};

/// Eight-wide lanes using AVX2 loads and FMA.
///
/// Can only be obtained through [`Avx2::detect`], so holding one means the instructions are
/// available on the running CPU.
#[derive(Debug, Clone, Copy)]
pub struct Avx2 {
	_private: (),
}

impl Avx2 {
	pub fn detect() -> Option<Self> {
		(is_x86_feature_detected!("avx2") && is_x86_feature_detected!("fma"))
			.then_some(Self { _private: () })
	}
}

impl Lanes for Avx2 {
	const NAME: &'static str = "avx2";

	#[inline]
	fn dot(self, init: f32, x: &[f32], y: &[f32]) -> f32 {
		// Safety: `self` witnesses that avx2 and fma are available.
		unsafe { dot(init, x, y) }
	}

	#[inline]
	fn axpy(self, y: &mut [f32], x: &[f32], alpha: f32) {
		// Safety: `self` witnesses that avx2 and fma are available.
		unsafe { axpy(y, x, alpha) }
	}
}

pub type Avx2MatMul = CpuMatMul<Avx2>;

impl Avx2MatMul {
	/// Fails with [`Error::UnsupportedInstructionSet`] on CPUs without AVX2 and FMA.
	pub fn new(parallelism: Parallelism) -> Result<Self, Error> {
		let lanes = Avx2::detect().ok_or(Error::UnsupportedInstructionSet {
			name: "avx2+fma",
		})?;
		Self::with_lanes(lanes, parallelism)
	}
}

#[target_feature(enable = "avx2,fma")]
unsafe fn dot(init: f32, x: &[f32], y: &[f32]) -> f32 {
	debug_assert_eq!(x.len(), y.len());

	let x_chunks = x.chunks_exact(8);
	let y_chunks = y.chunks_exact(8);
	let (x_tail, y_tail) = (x_chunks.remainder(), y_chunks.remainder());

	let mut acc = _mm256_setzero_ps();
	for (x, y) in x_chunks.zip(y_chunks) {
		acc = _mm256_fmadd_ps(_mm256_loadu_ps(x.as_ptr()), _mm256_loadu_ps(y.as_ptr()), acc);
	}

	let sum = init + horizontal_sum(acc);
	x_tail
		.iter()
		.zip(y_tail)
		.fold(sum, |acc, (&x, &y)| acc + x * y)
}

#[target_feature(enable = "avx2,fma")]
unsafe fn axpy(y: &mut [f32], x: &[f32], alpha: f32) {
	debug_assert_eq!(x.len(), y.len());

	let alpha_v = _mm256_set1_ps(alpha);
	let mut y_chunks = y.chunks_exact_mut(8);
	let x_chunks = x.chunks_exact(8);
	let x_tail = x_chunks.remainder();

	for (y, x) in (&mut y_chunks).zip(x_chunks) {
		let sum = _mm256_fmadd_ps(alpha_v, _mm256_loadu_ps(x.as_ptr()), _mm256_loadu_ps(y.as_ptr()));
		_mm256_storeu_ps(y.as_mut_ptr(), sum);
	}

	for (y, &x) in y_chunks.into_remainder().iter_mut().zip(x_tail) {
		*y += x * alpha;
	}
}

#[target_feature(enable = "avx2")]
unsafe fn horizontal_sum(v: __m256) -> f32 {
	let sum = _mm_add_ps(_mm256_castps256_ps128(v), _mm256_extractf128_ps::<1>(v));
	let odd = _mm_movehdup_ps(sum);
	let pairs = _mm_add_ps(sum, odd);
	let high = _mm_movehl_ps(odd, pairs);
	_mm_cvtss_f32(_mm_add_ss(pairs, high))
}

#[cfg(test)]
mod tests {
	use assert_matches::assert_matches;
	use proptest::prelude::*;

	use super::*;
	use crate::cpu::Scalar;

	fn close(a: f32, b: f32) -> bool {
		(a - b).abs() <= 1e-3 * (1.0 + a.abs().max(b.abs()))
	}

	#[test]
	fn test_detect_matches_runtime_flags() {
		assert_eq!(
			Avx2::detect().is_some(),
			is_x86_feature_detected!("avx2") && is_x86_feature_detected!("fma")
		);
	}

	#[test]
	fn test_new_without_support() {
		if Avx2::detect().is_none() {
			assert_matches!(
				Avx2MatMul::new(Parallelism::Sequential),
				Err(Error::UnsupportedInstructionSet { name: "avx2+fma" })
			);
		}
	}

	proptest! {
		#[test]
		fn test_lanes_agree_with_scalar(
			pairs in prop::collection::vec((-4.0f32..4.0, -4.0f32..4.0), 0..70),
			init in -1.0f32..1.0,
			alpha in -2.0f32..2.0,
		) {
			let Some(avx2) = Avx2::detect() else {
				return Ok(());
			};
			let (x, y): (Vec<f32>, Vec<f32>) = pairs.into_iter().unzip();

			prop_assert!(close(avx2.dot(init, &x, &y), Scalar.dot(init, &x, &y)));

			let mut expected = y.clone();
			Scalar.axpy(&mut expected, &x, alpha);
			let mut actual = y;
			avx2.axpy(&mut actual, &x, alpha);
			for (a, e) in actual.iter().zip(&expected) {
				prop_assert!(close(*a, *e));
			}
		}
	}
}
