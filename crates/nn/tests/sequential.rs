// Copyright 2025 Irreducible Inc.

use assert_matches::assert_matches;
use rand::{rngs::StdRng, Rng, SeedableRng};
use synapse_compute::{KernelPreference, Parallelism};
use synapse_nn::{init, Error, Layer, Linear, LinearConfig, ReLU, Sequential};
use synapse_rand::Mt19937;
use synapse_tensor::Tensor;

fn config() -> LinearConfig {
	LinearConfig {
		bias: true,
		parallelism: Parallelism::Sequential,
		kernel: KernelPreference::Reference,
	}
}

fn linear_pair(seed: u32) -> (Linear, Linear) {
	let mut g = Mt19937::new(seed);
	let mut first = Linear::new(3, 5, config()).unwrap();
	let mut second = Linear::new(5, 2, config()).unwrap();
	init::reset_linear(&mut first, &mut g).unwrap();
	init::reset_linear(&mut second, &mut g).unwrap();
	(first, second)
}

fn gradient_tensor(values: &[f32]) -> Tensor {
	let mut tensor = Tensor::new(values.len(), true).unwrap();
	tensor.grad_mut().unwrap().copy_from_slice(values);
	tensor
}

#[test]
fn test_matches_manual_composition() {
	let mut rng = StdRng::seed_from_u64(0);
	let x_values = (0..4 * 3)
		.map(|_| rng.gen_range(-1.0f32..1.0))
		.collect::<Vec<_>>();
	let out_grad = (0..4 * 2)
		.map(|_| rng.gen_range(-1.0f32..1.0))
		.collect::<Vec<_>>();
	let x = Tensor::from_slice(&x_values, false).unwrap();

	// manual: Linear -> ReLU -> Linear
	let (mut first, mut second) = linear_pair(9);
	let mut relu = ReLU::new();
	let expected_output = {
		let h = first.forward(&x).unwrap();
		let a = relu.forward(h).unwrap();
		second.forward(a).unwrap().data().unwrap().to_vec()
	};
	let dy = gradient_tensor(&out_grad);
	let expected_in_grad = {
		let da = second.backward(&dy).unwrap();
		let dh = relu.backward(da).unwrap();
		first.backward(dh).unwrap().grad().unwrap().to_vec()
	};
	let expected_params = [&first as &dyn Layer, &second]
		.iter()
		.flat_map(|layer| layer.parameters())
		.map(|p| p.grad().unwrap().to_vec())
		.collect::<Vec<_>>();

	let (first, second) = linear_pair(9);
	let mut model = Sequential::new();
	model.push(first).push(ReLU::new()).push(second);

	assert_eq!(model.forward(&x).unwrap().data().unwrap(), expected_output);
	assert_eq!(model.backward(&dy).unwrap().grad().unwrap(), expected_in_grad);
	let params = model
		.parameters()
		.iter()
		.map(|p| p.grad().unwrap().to_vec())
		.collect::<Vec<_>>();
	assert_eq!(params, expected_params);
	assert_eq!(model.parameters_mut().len(), 4);
}

#[test]
fn test_varying_batch_size() {
	let (first, second) = linear_pair(1);
	let mut model = Sequential::new();
	model.push(first).push(ReLU::new()).push(second);

	for batch in [1, 6, 2] {
		let x = Tensor::from_slice(&vec![0.5; batch * 3], false).unwrap();
		assert_eq!(model.forward(&x).unwrap().numel().unwrap(), batch * 2);
		let dy = gradient_tensor(&vec![1.0; batch * 2]);
		assert_eq!(model.backward(&dy).unwrap().numel().unwrap(), batch * 3);
	}

	// gradient for a different batch than the last forward call
	let dy = gradient_tensor(&[1.0; 6]);
	assert_matches!(
		model.backward(&dy),
		Err(Error::ShapeMismatch {
			expected: 4,
			actual: 6
		})
	);
}

#[test]
fn test_dispose_cascades() {
	let (first, second) = linear_pair(2);
	let mut model = Sequential::new();
	model.push(first).push(ReLU::new()).push(second);
	model.dispose();

	assert!(model.iter().all(|layer| layer.is_disposed()));
	let parameters = model.parameters();
	assert!(!parameters.is_empty());
	assert!(parameters.iter().all(|parameter| parameter.is_disposed()));
	let x = Tensor::new(3, false).unwrap();
	assert_matches!(model.forward(&x), Err(Error::Disposed { .. }));
}
