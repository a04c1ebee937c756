// Copyright 2025 Irreducible Inc.

use std::f64::consts::PI;

use crate::Generator;

/// Guards the logarithm against `ln(0)` in the Box-Muller transform.
const EPSILON: f64 = 1e-12;

/// Number of values transformed together by the batched Box-Muller transform. The first half
/// of each window supplies the radii and the second half the angles.
const WINDOW: usize = 16;

/// Uniform `f32` sample in `[from, to)`.
pub fn uniform32<G: Generator + ?Sized>(g: &mut G, from: f32, to: f32) -> f32 {
	g.uniform32() * (to - from) + from
}

/// Uniform `f64` sample in `[from, to)`.
pub fn uniform64<G: Generator + ?Sized>(g: &mut G, from: f64, to: f64) -> f64 {
	g.uniform64() * (to - from) + from
}

/// Fills `data` with uniform samples in `[from, to)`.
pub fn uniform_<G: Generator + ?Sized>(data: &mut [f32], g: &mut G, from: f32, to: f32) {
	for value in data {
		*value = uniform32(g, from, to);
	}
}

/// Fills `data` with samples from `N(mean, std^2)`.
///
/// The sampling order matches PyTorch's CPU `normal_`, so a generator seeded the same way
/// produces numerically identical tensors:
///
/// * For 16 or more values the whole buffer is first filled with `f32` uniforms, then
///   transformed in place window by window. When the length is not a multiple of 16, the last 16
///   values are drawn again and transformed as one more window, overwriting part of the previous
///   pass.
/// * Shorter buffers use the scalar transform on `f64` uniforms, consuming one pair of draws per
///   two output values.
pub fn normal_<G: Generator + ?Sized>(data: &mut [f32], g: &mut G, mean: f32, std: f32) {
	if data.len() >= WINDOW {
		uniform_(data, g, 0.0, 1.0);
		for window in data.chunks_exact_mut(WINDOW) {
			box_muller_window(window, mean, std);
		}

		if data.len() % WINDOW != 0 {
			let tail_start = data.len() - WINDOW;
			let tail = &mut data[tail_start..];
			uniform_(tail, g, 0.0, 1.0);
			box_muller_window(tail, mean, std);
		}
	} else {
		let (mean, std) = (mean as f64, std as f64);
		let mut cached = None;
		for value in data {
			if let Some(sample) = cached.take() {
				*value = (sample * std + mean) as f32;
				continue;
			}

			let u1 = uniform64(g, 0.0, 1.0);
			let u2 = uniform64(g, 0.0, 1.0);
			let radius = (-2.0 * (1.0 - u2 + EPSILON).ln()).sqrt();
			let theta = 2.0 * PI * u1;
			cached = Some(radius * theta.sin());
			*value = (radius * theta.cos() * std + mean) as f32;
		}
	}
}

/// Replaces a window of 16 uniforms with 16 normal samples.
fn box_muller_window(window: &mut [f32], mean: f32, std: f32) {
	debug_assert_eq!(window.len(), WINDOW);

	let (mean, std) = (mean as f64, std as f64);
	let (radii, angles) = window.split_at_mut(WINDOW / 2);
	for (r, a) in radii.iter_mut().zip(angles) {
		let u1 = 1.0 - *r;
		let radius = (-2.0 * (u1 as f64 + EPSILON).ln()).sqrt();
		let theta = 2.0 * PI * *a as f64;
		*r = (radius * theta.cos() * std + mean) as f32;
		*a = (radius * theta.sin() * std + mean) as f32;
	}
}
