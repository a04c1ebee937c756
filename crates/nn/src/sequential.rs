// Copyright 2025 Irreducible Inc.

use synapse_tensor::Tensor;
use synapse_utils::ensure;

use crate::{Error, Layer, Mode};

/// Layers applied one after another.
///
/// Children are disposed and dropped in reverse order of insertion.
#[derive(Debug, Default)]
pub struct Sequential {
	layers: Vec<Box<dyn Layer>>,
	disposed: bool,
}

impl Sequential {
	pub fn new() -> Self {
		Self::default()
	}

	/// Appends `layer` after the existing ones.
	pub fn push(&mut self, layer: impl Layer + 'static) -> &mut Self {
		self.layers.push(Box::new(layer));
		self
	}

	pub fn push_boxed(&mut self, layer: Box<dyn Layer>) -> &mut Self {
		self.layers.push(layer);
		self
	}

	pub fn len(&self) -> usize {
		self.layers.len()
	}

	pub fn is_empty(&self) -> bool {
		self.layers.is_empty()
	}

	pub fn get(&self, index: usize) -> Option<&dyn Layer> {
		self.layers.get(index).map(|layer| layer.as_ref())
	}

	pub fn get_mut(&mut self, index: usize) -> Option<&mut dyn Layer> {
		self.layers
			.get_mut(index)
			.map(|layer| layer.as_mut() as &mut dyn Layer)
	}

	pub fn iter(&self) -> impl Iterator<Item = &dyn Layer> {
		self.layers.iter().map(|layer| layer.as_ref())
	}
}

impl FromIterator<Box<dyn Layer>> for Sequential {
	fn from_iter<T: IntoIterator<Item = Box<dyn Layer>>>(iter: T) -> Self {
		Self {
			layers: iter.into_iter().collect(),
			disposed: false,
		}
	}
}

impl Layer for Sequential {
	fn name(&self) -> &'static str {
		"Sequential"
	}

	fn forward<'a>(&'a mut self, input: &'a Tensor) -> Result<&'a Tensor, Error> {
		ensure!(!self.disposed, Error::Disposed { layer: "Sequential" });
		let mut x = input;
		for layer in self.layers.iter_mut() {
			x = layer.forward(x)?;
		}
		Ok(x)
	}

	fn backward<'a>(&'a mut self, output: &'a Tensor) -> Result<&'a Tensor, Error> {
		ensure!(!self.disposed, Error::Disposed { layer: "Sequential" });
		let mut dy = output;
		for layer in self.layers.iter_mut().rev() {
			dy = layer.backward(dy)?;
		}
		Ok(dy)
	}

	fn parameters(&self) -> Vec<&Tensor> {
		self.layers
			.iter()
			.flat_map(|layer| layer.parameters())
			.collect()
	}

	fn parameters_mut(&mut self) -> Vec<&mut Tensor> {
		self.layers
			.iter_mut()
			.flat_map(|layer| layer.parameters_mut())
			.collect()
	}

	fn set_mode(&mut self, mode: Mode) {
		for layer in &mut self.layers {
			layer.set_mode(mode);
		}
	}

	fn dispose(&mut self) {
		for layer in self.layers.iter_mut().rev() {
			layer.dispose();
		}
		self.disposed = true;
	}

	fn is_disposed(&self) -> bool {
		self.disposed
	}
}

impl Drop for Sequential {
	fn drop(&mut self) {
		while let Some(layer) = self.layers.pop() {
			drop(layer);
		}
	}
}
