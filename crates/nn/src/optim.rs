// Copyright 2025 Irreducible Inc.

//! Plain gradient descent over a layer's parameters.

use synapse_utils::ensure;

use crate::{Error, Layer};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sgd {
	lr: f32,
}

impl Sgd {
	pub fn new(lr: f32) -> Self {
		Self { lr }
	}

	pub fn lr(&self) -> f32 {
		self.lr
	}

	/// Clears the accumulated parameter gradients. Call once per training step, before the
	/// backward pass.
	pub fn zero_grad(&self, layer: &mut dyn Layer) -> Result<(), Error> {
		ensure!(!layer.is_disposed(), Error::Disposed { layer: layer.name() });
		for parameter in layer.parameters_mut() {
			parameter.zero_grad()?;
		}
		Ok(())
	}

	/// Applies `data -= lr * grad` to every parameter.
	pub fn step(&self, layer: &mut dyn Layer) -> Result<(), Error> {
		ensure!(!layer.is_disposed(), Error::Disposed { layer: layer.name() });
		for parameter in layer.parameters_mut() {
			let (data, grad) = parameter.data_mut_and_grad()?;
			for (w, &g) in data.iter_mut().zip(grad) {
				*w -= self.lr * g;
			}
		}
		Ok(())
	}
}
