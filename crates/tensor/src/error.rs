// Copyright 2025 Irreducible Inc.

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
	#[error("tensor size {numel} is invalid, tensors must hold at least one element")]
	InvalidSize { numel: usize },
	#[error("expected {expected} elements, got {actual}")]
	ShapeMismatch { expected: usize, actual: usize },
	#[error("the tensor does not track gradients")]
	GradientNotTracked,
	#[error("the tensor has been disposed")]
	Disposed,
}
