// Copyright 2025 Irreducible Inc.

use std::fmt::Debug;

use synapse_tensor::Tensor;

use crate::Error;

/// Whether stochastic layers sample (`Train`) or pass their input through (`Eval`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
	Train,
	Eval,
}

/// A differentiable unit of a model.
pub trait Layer: Debug + Send {
	/// Short name used in error reports.
	fn name(&self) -> &'static str;

	/// Maps `input` to the layer's output.
	///
	/// Internal buffers are resized to the observed element count, so consecutive calls may use
	/// different batch sizes.
	fn forward<'a>(&'a mut self, input: &'a Tensor) -> Result<&'a Tensor, Error>;

	/// Propagates the gradient held in `output.grad` back to the input of the last forward call.
	///
	/// Parameter gradients are accumulated, not overwritten. The returned tensor's gradient
	/// buffer holds the gradient with respect to the input.
	fn backward<'a>(&'a mut self, output: &'a Tensor) -> Result<&'a Tensor, Error>;

	/// Trainable tensors, in a stable order.
	fn parameters(&self) -> Vec<&Tensor> {
		Vec::new()
	}

	fn parameters_mut(&mut self) -> Vec<&mut Tensor> {
		Vec::new()
	}

	fn set_mode(&mut self, _mode: Mode) {}

	fn train(&mut self) {
		self.set_mode(Mode::Train)
	}

	fn eval(&mut self) {
		self.set_mode(Mode::Eval)
	}

	/// Releases every tensor the layer owns. Any later forward or backward call fails with
	/// [`Error::Disposed`]. Disposing twice is a no-op.
	fn dispose(&mut self);

	fn is_disposed(&self) -> bool;
}
