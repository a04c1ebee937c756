// Copyright 2025 Irreducible Inc.

use std::ops::Range;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("tensor error: {0}")]
	Tensor(#[from] synapse_tensor::Error),
	#[error("compute error: {0}")]
	Compute(#[from] synapse_compute::Error),
	#[error("expected {expected} elements, got {actual}")]
	ShapeMismatch { expected: usize, actual: usize },
	#[error("the {layer} layer has been disposed")]
	Disposed { layer: &'static str },
	#[error("{arg} = {value} is outside the supported range {range:?}")]
	ConfigurationOutOfRange {
		arg: &'static str,
		value: usize,
		range: Range<usize>,
	},
	#[error("dropout probability {p} is outside [0, 1]")]
	InvalidProbability { p: f64 },
}
