// Copyright 2025 Irreducible Inc.

use bytemuck::zeroed_vec;
use synapse_utils::ensure;
use tracing::trace;

use crate::Error;

/// A flat buffer of `f32` values with an optional gradient buffer of equal length.
///
/// The buffers are released by [`Tensor::dispose`] or when the tensor is dropped. Every operation
/// on a disposed tensor fails with [`Error::Disposed`].
#[derive(Debug, Clone, PartialEq)]
pub struct Tensor {
	storage: Option<Storage>,
}

#[derive(Debug, Clone, PartialEq)]
struct Storage {
	data: Vec<f32>,
	grad: Option<Vec<f32>>,
}

impl Storage {
	fn zeroed(numel: usize, requires_grad: bool) -> Self {
		Self {
			data: zeroed_vec(numel),
			grad: requires_grad.then(|| zeroed_vec(numel)),
		}
	}
}

impl Tensor {
	/// Creates a zero-filled tensor of `numel` elements.
	///
	/// The gradient buffer is allocated (and zeroed) only when `requires_grad` is set.
	pub fn new(numel: usize, requires_grad: bool) -> Result<Self, Error> {
		ensure!(numel != 0, Error::InvalidSize { numel });
		Ok(Self {
			storage: Some(Storage::zeroed(numel, requires_grad)),
		})
	}

	/// Creates a tensor holding a copy of `values`.
	pub fn from_slice(values: &[f32], requires_grad: bool) -> Result<Self, Error> {
		let mut tensor = Self::new(values.len(), requires_grad)?;
		tensor.fill_(values)?;
		Ok(tensor)
	}

	/// Number of elements.
	pub fn numel(&self) -> Result<usize, Error> {
		Ok(self.storage()?.data.len())
	}

	pub fn requires_grad(&self) -> bool {
		self.storage
			.as_ref()
			.is_some_and(|storage| storage.grad.is_some())
	}

	pub fn is_disposed(&self) -> bool {
		self.storage.is_none()
	}

	/// Reallocates the buffers to hold `numel` elements.
	///
	/// Prior contents are not preserved: both buffers come back zeroed, and the gradient buffer is
	/// reallocated only if the tensor tracks gradients.
	pub fn resize(&mut self, numel: usize) -> Result<(), Error> {
		let storage = self.storage_mut()?;
		ensure!(numel != 0, Error::InvalidSize { numel });

		trace!(from = storage.data.len(), to = numel, "resizing tensor");
		*storage = Storage::zeroed(numel, storage.grad.is_some());
		Ok(())
	}

	/// Copies `source` into the data buffer. The lengths must match exactly.
	pub fn fill_(&mut self, source: &[f32]) -> Result<(), Error> {
		let data = self.data_mut()?;
		ensure!(
			data.len() == source.len(),
			Error::ShapeMismatch {
				expected: data.len(),
				actual: source.len(),
			}
		);
		data.copy_from_slice(source);
		Ok(())
	}

	/// Sets the gradient buffer to zero. Does nothing for tensors that don't track gradients.
	pub fn zero_grad(&mut self) -> Result<(), Error> {
		if let Some(grad) = self.storage_mut()?.grad.as_deref_mut() {
			grad.fill(0.0);
		}
		Ok(())
	}

	pub fn data(&self) -> Result<&[f32], Error> {
		Ok(&self.storage()?.data)
	}

	pub fn data_mut(&mut self) -> Result<&mut [f32], Error> {
		Ok(&mut self.storage_mut()?.data)
	}

	pub fn grad(&self) -> Result<&[f32], Error> {
		self.storage()?
			.grad
			.as_deref()
			.ok_or(Error::GradientNotTracked)
	}

	pub fn grad_mut(&mut self) -> Result<&mut [f32], Error> {
		self.storage_mut()?
			.grad
			.as_deref_mut()
			.ok_or(Error::GradientNotTracked)
	}

	/// Borrows the data buffer immutably and the gradient buffer mutably at the same time.
	pub fn data_and_grad_mut(&mut self) -> Result<(&[f32], &mut [f32]), Error> {
		let Storage { data, grad } = self.storage_mut()?;
		let grad = grad.as_deref_mut().ok_or(Error::GradientNotTracked)?;
		Ok((data.as_slice(), grad))
	}

	/// Borrows the data buffer mutably and the gradient buffer immutably, as a parameter update
	/// needs.
	pub fn data_mut_and_grad(&mut self) -> Result<(&mut [f32], &[f32]), Error> {
		let Storage { data, grad } = self.storage_mut()?;
		let grad = grad.as_deref().ok_or(Error::GradientNotTracked)?;
		Ok((data.as_mut_slice(), grad))
	}

	/// Releases both buffers. Calling it again is a no-op.
	pub fn dispose(&mut self) {
		self.storage = None;
	}

	fn storage(&self) -> Result<&Storage, Error> {
		self.storage.as_ref().ok_or(Error::Disposed)
	}

	fn storage_mut(&mut self) -> Result<&mut Storage, Error> {
		self.storage.as_mut().ok_or(Error::Disposed)
	}
}

#[cfg(test)]
mod tests {
	use assert_matches::assert_matches;
	use proptest::prelude::*;

	use super::*;

	#[test]
	fn test_new_is_zeroed() {
		let tensor = Tensor::new(5, true).unwrap();
		assert_eq!(tensor.numel(), Ok(5));
		assert!(tensor.requires_grad());
		assert_eq!(tensor.data().unwrap(), &[0.0; 5]);
		assert_eq!(tensor.grad().unwrap(), &[0.0; 5]);
	}

	#[test]
	fn test_new_without_grad() {
		let mut tensor = Tensor::new(3, false).unwrap();
		assert!(!tensor.requires_grad());
		assert_matches!(tensor.grad(), Err(Error::GradientNotTracked));
		assert_matches!(tensor.data_and_grad_mut(), Err(Error::GradientNotTracked));
		// zeroing a non-tracking tensor is allowed
		tensor.zero_grad().unwrap();
	}

	#[test]
	fn test_zero_size_is_rejected() {
		assert_matches!(Tensor::new(0, false), Err(Error::InvalidSize { numel: 0 }));

		let mut tensor = Tensor::new(2, false).unwrap();
		assert_matches!(tensor.resize(0), Err(Error::InvalidSize { numel: 0 }));
		assert_eq!(tensor.numel(), Ok(2));
	}

	#[test]
	fn test_fill_requires_matching_length() {
		let mut tensor = Tensor::new(3, false).unwrap();
		assert_matches!(
			tensor.fill_(&[1.0, 2.0]),
			Err(Error::ShapeMismatch {
				expected: 3,
				actual: 2
			})
		);
		tensor.fill_(&[1.0, 2.0, 3.0]).unwrap();
		assert_eq!(tensor.data().unwrap(), &[1.0, 2.0, 3.0]);
	}

	#[test]
	fn test_resize_discards_old_contents() {
		let mut tensor = Tensor::from_slice(&[1.0, 2.0, 3.0, 4.0], true).unwrap();
		tensor.grad_mut().unwrap().fill(7.0);

		tensor.resize(2).unwrap();
		assert_eq!(tensor.numel(), Ok(2));
		assert_eq!(tensor.data().unwrap(), &[0.0, 0.0]);
		assert_eq!(tensor.grad().unwrap(), &[0.0, 0.0]);

		tensor.resize(6).unwrap();
		tensor.fill_(&[6.0, 5.0, 4.0, 3.0, 2.0, 1.0]).unwrap();
		assert_eq!(tensor.data().unwrap(), &[6.0, 5.0, 4.0, 3.0, 2.0, 1.0]);
		assert_eq!(tensor.grad().unwrap().len(), 6);
	}

	#[test]
	fn test_zero_grad() {
		let mut tensor = Tensor::new(4, true).unwrap();
		tensor.grad_mut().unwrap().copy_from_slice(&[1.0, -1.0, 2.0, 0.5]);
		tensor.zero_grad().unwrap();
		assert_eq!(tensor.grad().unwrap(), &[0.0; 4]);
	}

	#[test]
	fn test_data_and_grad_mut() {
		let mut tensor = Tensor::from_slice(&[1.0, 2.0], true).unwrap();
		let (data, grad) = tensor.data_and_grad_mut().unwrap();
		for (g, &d) in grad.iter_mut().zip(data) {
			*g += 2.0 * d;
		}
		assert_eq!(tensor.grad().unwrap(), &[2.0, 4.0]);

		let (data, grad) = tensor.data_mut_and_grad().unwrap();
		for (d, &g) in data.iter_mut().zip(grad) {
			*d -= 0.5 * g;
		}
		assert_eq!(tensor.data().unwrap(), &[0.0, 0.0]);
	}

	#[test]
	fn test_dispose() {
		let mut tensor = Tensor::new(4, true).unwrap();
		tensor.dispose();
		tensor.dispose();

		assert!(tensor.is_disposed());
		assert_matches!(tensor.numel(), Err(Error::Disposed));
		assert!(!tensor.requires_grad());
		assert_matches!(tensor.resize(4), Err(Error::Disposed));
		assert_matches!(tensor.fill_(&[0.0; 4]), Err(Error::Disposed));
		assert_matches!(tensor.zero_grad(), Err(Error::Disposed));
		assert_matches!(tensor.data(), Err(Error::Disposed));
		assert_matches!(tensor.data_mut(), Err(Error::Disposed));
		assert_matches!(tensor.grad(), Err(Error::Disposed));
		assert_matches!(tensor.grad_mut(), Err(Error::Disposed));
	}

	proptest! {
		#[test]
		fn test_resize_then_fill(first in 1usize..64, second in 1usize..64, requires_grad in any::<bool>()) {
			let mut tensor = Tensor::new(first, requires_grad).unwrap();
			tensor.data_mut().unwrap().fill(9.0);
			tensor.resize(second).unwrap();
			prop_assert_eq!(tensor.numel(), Ok(second));
			prop_assert!(tensor.data().unwrap().iter().all(|&x| x == 0.0));

			let values = (0..second).map(|i| i as f32).collect::<Vec<_>>();
			tensor.fill_(&values).unwrap();
			prop_assert_eq!(tensor.data().unwrap(), values.as_slice());
			prop_assert_eq!(tensor.requires_grad(), requires_grad);
		}
	}
}
