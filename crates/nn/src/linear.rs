// Copyright 2025 Irreducible Inc.

use std::fmt;

use synapse_compute::{
	select_matmul, KernelPreference, MatMul, MatMulGrads, MatMulShape, Parallelism,
};
use synapse_tensor::Tensor;
use synapse_utils::{bail, ensure};

use crate::{buffer, Error, Layer};

/// Exclusive upper bound on the number of input and output features of a [`Linear`] layer.
pub const MAX_FEATURES: usize = 16383;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinearConfig {
	/// Whether the layer owns a bias vector.
	pub bias: bool,
	pub parallelism: Parallelism,
	pub kernel: KernelPreference,
}

impl Default for LinearConfig {
	fn default() -> Self {
		Self {
			bias: true,
			parallelism: Parallelism::Auto,
			kernel: KernelPreference::Auto,
		}
	}
}

/// Affine layer `y = x · Wᵀ + b` over a batch of row vectors.
///
/// The weight is stored row-major as `[out_features, in_features]`. Parameters start out zeroed,
/// see [`crate::init::reset_linear`] for the usual initialisation.
#[derive(Debug)]
pub struct Linear {
	in_features: usize,
	out_features: usize,
	weight: Tensor,
	bias: Option<Tensor>,
	input: Option<Tensor>,
	output: Option<Tensor>,
	/// `None` once the layer is disposed.
	kernel: Option<Box<dyn MatMul>>,
}

impl Linear {
	pub fn new(
		in_features: usize,
		out_features: usize,
		config: LinearConfig,
	) -> Result<Self, Error> {
		for (arg, value) in [("in_features", in_features), ("out_features", out_features)] {
			ensure!(
				(1..MAX_FEATURES).contains(&value),
				Error::ConfigurationOutOfRange {
					arg,
					value,
					range: 1..MAX_FEATURES,
				}
			);
		}

		let weight = Tensor::new(out_features * in_features, true)?;
		let bias = config
			.bias
			.then(|| Tensor::new(out_features, true))
			.transpose()?;
		let kernel = select_matmul(config.kernel, config.parallelism)?;

		Ok(Self {
			in_features,
			out_features,
			weight,
			bias,
			input: None,
			output: None,
			kernel: Some(kernel),
		})
	}

	pub fn in_features(&self) -> usize {
		self.in_features
	}

	pub fn out_features(&self) -> usize {
		self.out_features
	}

	pub fn weight(&self) -> &Tensor {
		&self.weight
	}

	pub fn weight_mut(&mut self) -> &mut Tensor {
		&mut self.weight
	}

	pub fn bias(&self) -> Option<&Tensor> {
		self.bias.as_ref()
	}

	pub fn bias_mut(&mut self) -> Option<&mut Tensor> {
		self.bias.as_mut()
	}

	/// Name of the matmul kernel, `None` after disposal.
	pub fn kernel_name(&self) -> Option<&'static str> {
		self.kernel.as_ref().map(|kernel| kernel.name())
	}

	/// Number of rows in a buffer of `numel` elements with `width` columns.
	fn rows(numel: usize, width: usize) -> Result<usize, Error> {
		let rows = numel.div_ceil(width);
		ensure!(
			rows * width == numel,
			Error::ShapeMismatch {
				expected: rows * width,
				actual: numel,
			}
		);
		Ok(rows)
	}
}

impl fmt::Display for Linear {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"Linear<{}>({}, {})",
			self.kernel_name().unwrap_or_default(),
			self.in_features,
			self.out_features
		)
	}
}

impl Layer for Linear {
	fn name(&self) -> &'static str {
		"Linear"
	}

	fn forward<'a>(&'a mut self, input: &'a Tensor) -> Result<&'a Tensor, Error> {
		let kernel = self
			.kernel
			.as_deref()
			.ok_or(Error::Disposed { layer: "Linear" })?;
		let values = input.data()?;
		let batch = Self::rows(values.len(), self.in_features)?;
		let shape = MatMulShape::new(batch, self.in_features, self.out_features);

		let x = buffer::reuse(&mut self.input, values.len(), true)?;
		x.fill_(values)?;
		let y = buffer::reuse(&mut self.output, batch * self.out_features, false)?;
		let bias = self.bias.as_ref().map(Tensor::data).transpose()?;

		kernel.forward(y.data_mut()?, x.data()?, self.weight.data()?, bias, shape);
		Ok(y)
	}

	fn backward<'a>(&'a mut self, output: &'a Tensor) -> Result<&'a Tensor, Error> {
		let kernel = self
			.kernel
			.as_deref()
			.ok_or(Error::Disposed { layer: "Linear" })?;
		let out_grad = output.grad()?;
		let batch = Self::rows(out_grad.len(), self.out_features)?;
		let shape = MatMulShape::new(batch, self.in_features, self.out_features);

		let remembered = self.output.as_ref().map_or(Ok(0), Tensor::numel)?;
		ensure!(
			remembered == out_grad.len(),
			Error::ShapeMismatch {
				expected: remembered,
				actual: out_grad.len(),
			}
		);
		let Some(x) = self.input.as_mut() else {
			bail!(Error::ShapeMismatch {
				expected: 0,
				actual: batch * self.in_features,
			});
		};
		let remembered = x.numel()?;
		ensure!(
			remembered == batch * self.in_features,
			Error::ShapeMismatch {
				expected: remembered,
				actual: batch * self.in_features,
			}
		);

		x.zero_grad()?;
		let (x_data, x_grad) = x.data_and_grad_mut()?;
		let (weight, weight_grad) = self.weight.data_and_grad_mut()?;
		let bias_grad = self.bias.as_mut().map(Tensor::grad_mut).transpose()?;

		kernel.backward(
			out_grad,
			x_data,
			weight,
			MatMulGrads {
				input: x_grad,
				weight: weight_grad,
				bias: bias_grad,
			},
			shape,
		);
		Ok(x)
	}

	fn parameters(&self) -> Vec<&Tensor> {
		std::iter::once(&self.weight).chain(&self.bias).collect()
	}

	fn parameters_mut(&mut self) -> Vec<&mut Tensor> {
		std::iter::once(&mut self.weight)
			.chain(&mut self.bias)
			.collect()
	}

	fn dispose(&mut self) {
		self.weight.dispose();
		if let Some(bias) = &mut self.bias {
			bias.dispose();
		}
		buffer::release(&mut self.input);
		buffer::release(&mut self.output);
		self.kernel = None;
	}

	fn is_disposed(&self) -> bool {
		self.kernel.is_none()
	}
}
