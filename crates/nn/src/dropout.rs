// Copyright 2025 Irreducible Inc.

use std::fmt::Debug;

use itertools::izip;
use synapse_rand::Generator;
use synapse_tensor::Tensor;
use synapse_utils::{bail, ensure};
use tracing::warn;

use crate::{buffer, Error, Layer, Mode};

/// Inverted dropout.
///
/// In [`Mode::Train`] every element is zeroed with probability `p` and the survivors are scaled
/// by `1 / (1 - p)`. In [`Mode::Eval`] the input passes through unchanged. The mode starts out
/// unset and behaves as `Eval` until [`Layer::train`] or [`Layer::eval`] is called; the first
/// forward call in that state logs a warning.
#[derive(Debug)]
pub struct Dropout<G> {
	generator: G,
	p: f64,
	mode: Option<Mode>,
	warned_unset_mode: bool,
	input: Option<Tensor>,
	output: Option<Tensor>,
	mask: Option<Tensor>,
	disposed: bool,
}

impl<G: Generator> Dropout<G> {
	pub fn new(generator: G, p: f64) -> Result<Self, Error> {
		ensure!((0.0..=1.0).contains(&p), Error::InvalidProbability { p });
		Ok(Self {
			generator,
			p,
			mode: None,
			warned_unset_mode: false,
			input: None,
			output: None,
			mask: None,
			disposed: false,
		})
	}

	pub fn p(&self) -> f64 {
		self.p
	}

	/// The mode set by the caller, `None` if it was never set.
	pub fn mode(&self) -> Option<Mode> {
		self.mode
	}

	fn effective_mode(&mut self) -> Mode {
		match self.mode {
			Some(mode) => mode,
			None => {
				if !self.warned_unset_mode {
					warn!(p = self.p, "dropout used before train() or eval(), treating it as eval");
					self.warned_unset_mode = true;
				}
				Mode::Eval
			}
		}
	}
}

impl<G: Generator + Debug + Send> Layer for Dropout<G> {
	fn name(&self) -> &'static str {
		"Dropout"
	}

	fn forward<'a>(&'a mut self, input: &'a Tensor) -> Result<&'a Tensor, Error> {
		ensure!(!self.disposed, Error::Disposed { layer: "Dropout" });
		let mode = self.effective_mode();
		let values = input.data()?;
		let n = values.len();

		let x = buffer::reuse(&mut self.input, n, true)?;
		x.fill_(values)?;
		let mask = buffer::reuse(&mut self.mask, n, false)?.data_mut()?;
		match mode {
			Mode::Train => {
				let scale = if self.p < 1.0 {
					(1.0 / (1.0 - self.p)) as f32
				} else {
					0.0
				};
				for m in mask.iter_mut() {
					*m = if self.generator.uniform64() < self.p {
						0.0
					} else {
						scale
					};
				}
			}
			Mode::Eval => mask.fill(1.0),
		}

		let y = buffer::reuse(&mut self.output, n, false)?;
		for (y, &x, &m) in izip!(y.data_mut()?, values, &*mask) {
			*y = x * m;
		}
		Ok(y)
	}

	fn backward<'a>(&'a mut self, output: &'a Tensor) -> Result<&'a Tensor, Error> {
		ensure!(!self.disposed, Error::Disposed { layer: "Dropout" });
		let out_grad = output.grad()?;

		let (Some(x), Some(mask)) = (self.input.as_mut(), self.mask.as_ref()) else {
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
		for (dx, &m, &dy) in izip!(x.grad_mut()?, mask.data()?, out_grad) {
			*dx += m * dy;
		}
		Ok(x)
	}

	fn set_mode(&mut self, mode: Mode) {
		self.mode = Some(mode);
	}

	fn dispose(&mut self) {
		buffer::release(&mut self.output);
		buffer::release(&mut self.input);
		buffer::release(&mut self.mask);
		self.disposed = true;
	}

	fn is_disposed(&self) -> bool {
		self.disposed
	}
}
