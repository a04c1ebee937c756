// Copyright 2025 Irreducible Inc.

use synapse_tensor::Tensor;
use synapse_utils::ensure;

use crate::{Error, Layer};

/// Passes tensors through unchanged in both directions.
#[derive(Debug, Default)]
pub struct Identity {
	disposed: bool,
}

impl Identity {
	pub fn new() -> Self {
		Self::default()
	}
}

impl Layer for Identity {
	fn name(&self) -> &'static str {
		"Identity"
	}

	fn forward<'a>(&'a mut self, input: &'a Tensor) -> Result<&'a Tensor, Error> {
		ensure!(!self.disposed, Error::Disposed { layer: "Identity" });
		Ok(input)
	}

	fn backward<'a>(&'a mut self, output: &'a Tensor) -> Result<&'a Tensor, Error> {
		ensure!(!self.disposed, Error::Disposed { layer: "Identity" });
		Ok(output)
	}

	fn dispose(&mut self) {
		self.disposed = true;
	}

	fn is_disposed(&self) -> bool {
		self.disposed
	}
}
