// Copyright 2025 Irreducible Inc.

//! Parameter initialisation.

use synapse_rand::Generator;
use synapse_tensor::Tensor;

use crate::{Error, Linear};

/// Fills `tensor` with samples from `U(from, to)`.
pub fn uniform_<G: Generator + ?Sized>(
	tensor: &mut Tensor,
	g: &mut G,
	from: f32,
	to: f32,
) -> Result<(), Error> {
	synapse_rand::uniform_(tensor.data_mut()?, g, from, to);
	Ok(())
}

/// Fills `tensor` with samples from `N(mean, std²)`.
pub fn normal_<G: Generator + ?Sized>(
	tensor: &mut Tensor,
	g: &mut G,
	mean: f32,
	std: f32,
) -> Result<(), Error> {
	synapse_rand::normal_(tensor.data_mut()?, g, mean, std);
	Ok(())
}

/// Draws weight and bias from `U(-k, k)` with `k = 1 / sqrt(in_features)`.
pub fn reset_linear<G: Generator + ?Sized>(linear: &mut Linear, g: &mut G) -> Result<(), Error> {
	let bound = 1.0 / (linear.in_features() as f32).sqrt();
	uniform_(linear.weight_mut(), g, -bound, bound)?;
	if let Some(bias) = linear.bias_mut() {
		uniform_(bias, g, -bound, bound)?;
	}
	Ok(())
}
