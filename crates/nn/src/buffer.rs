// Copyright 2025 Irreducible Inc.

use synapse_tensor::Tensor;

use crate::Error;

/// Returns the tensor in `slot`, allocating it on first use and reallocating it when the element
/// count changed.
pub(crate) fn reuse(
	slot: &mut Option<Tensor>,
	numel: usize,
	requires_grad: bool,
) -> Result<&mut Tensor, Error> {
	let tensor = match slot.take() {
		Some(mut tensor) => {
			if tensor.numel()? != numel {
				tensor.resize(numel)?;
			}
			tensor
		}
		None => Tensor::new(numel, requires_grad)?,
	};
	Ok(slot.insert(tensor))
}

/// Disposes and forgets the tensor in `slot`, if any.
pub(crate) fn release(slot: &mut Option<Tensor>) {
	if let Some(mut tensor) = slot.take() {
		tensor.dispose();
	}
}
