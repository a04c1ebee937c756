// Copyright 2025 Irreducible Inc.

use std::{fmt::Debug, marker::PhantomData};

use itertools::izip;
use synapse_tensor::Tensor;
use synapse_utils::{bail, ensure};

use crate::{buffer, Error, Layer};

/// A scalar nonlinearity and its derivative.
pub trait Elementwise: Debug + Send + 'static {
	const NAME: &'static str;

	fn apply(x: f32) -> f32;

	/// Derivative at `x`, where `y = apply(x)`.
	fn derivative(x: f32, y: f32) -> f32;
}

#[derive(Debug)]
pub struct Rectifier;

impl Elementwise for Rectifier {
	const NAME: &'static str = "ReLU";

	#[inline]
	fn apply(x: f32) -> f32 {
		x.max(0.0)
	}

	#[inline]
	fn derivative(x: f32, _y: f32) -> f32 {
		if x > 0.0 {
			1.0
		} else {
			0.0
		}
	}
}

#[derive(Debug)]
pub struct Logistic;

impl Elementwise for Logistic {
	const NAME: &'static str = "Sigmoid";

	#[inline]
	fn apply(x: f32) -> f32 {
		1.0 / (1.0 + (-x).exp())
	}

	#[inline]
	fn derivative(_x: f32, y: f32) -> f32 {
		y * (1.0 - y)
	}
}

pub type ReLU = Activation<Rectifier>;
pub type Sigmoid = Activation<Logistic>;

/// Applies `F` elementwise, remembering the input and output of the last forward call.
#[derive(Debug)]
pub struct Activation<F> {
	input: Option<Tensor>,
	output: Option<Tensor>,
	disposed: bool,
	_marker: PhantomData<F>,
}

impl<F: Elementwise> Activation<F> {
	pub fn new() -> Self {
		Self {
			input: None,
			output: None,
			disposed: false,
			_marker: PhantomData,
		}
	}
}

impl<F: Elementwise> Default for Activation<F> {
	fn default() -> Self {
		Self::new()
	}
}

impl<F: Elementwise> Layer for Activation<F> {
	fn name(&self) -> &'static str {
		F::NAME
	}

	fn forward<'a>(&'a mut self, input: &'a Tensor) -> Result<&'a Tensor, Error> {
		ensure!(!self.disposed, Error::Disposed { layer: F::NAME });
		let values = input.data()?;

		let x = buffer::reuse(&mut self.input, values.len(), true)?;
		x.fill_(values)?;
		let y = buffer::reuse(&mut self.output, values.len(), false)?;
		for (y, &x) in y.data_mut()?.iter_mut().zip(x.data()?) {
			*y = F::apply(x);
		}
		Ok(y)
	}

	fn backward<'a>(&'a mut self, output: &'a Tensor) -> Result<&'a Tensor, Error> {
		ensure!(!self.disposed, Error::Disposed { layer: F::NAME });
		let out_grad = output.grad()?;

		let (Some(x), Some(y)) = (self.input.as_mut(), self.output.as_ref()) else {
			bail!(Error::ShapeMismatch {
				expected: 0,
				actual: out_grad.len(),
			});
		};
		let remembered = x.numel()?;
		ensure!(
			out_grad.len() == remembered,
			Error::ShapeMismatch {
				expected: remembered,
				actual: out_grad.len(),
			}
		);

		x.zero_grad()?;
		let (x_data, x_grad) = x.data_and_grad_mut()?;
		for (dx, &x, &y, &dy) in izip!(x_grad, x_data, y.data()?, out_grad) {
			*dx += F::derivative(x, y) * dy;
		}
		Ok(x)
	}

	fn dispose(&mut self) {
		buffer::release(&mut self.output);
		buffer::release(&mut self.input);
		self.disposed = true;
	}

	fn is_disposed(&self) -> bool {
		self.disposed
	}
}
