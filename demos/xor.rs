// Copyright 2025 Irreducible Inc.

use anyhow::Result;
use clap::{value_parser, Parser};
use synapse_compute::{KernelPreference, Parallelism};
use synapse_nn::{init, optim::Sgd, Layer, Linear, LinearConfig, Sequential, Sigmoid};
use synapse_rand::Mt19937;
use synapse_tensor::Tensor;
use synapse_utils::{rayon::adjust_thread_pool, tracing::init_tracing};
use tracing::info;

const INPUTS: [f32; 8] = [0.0, 0.0, 0.0, 1.0, 1.0, 0.0, 1.0, 1.0];
const TARGETS: [f32; 4] = [0.0, 1.0, 1.0, 0.0];

#[derive(Debug, Parser)]
struct Args {
	/// Number of full-batch gradient steps.
	#[arg(long, default_value_t = 5000, value_parser = value_parser!(u32).range(1..))]
	epochs: u32,
	/// Width of the hidden layer.
	#[arg(long, default_value_t = 8, value_parser = value_parser!(u32).range(1..16383))]
	hidden: u32,
	#[arg(long, default_value_t = 1.0)]
	lr: f32,
	/// Seed of the Mersenne Twister used for initialisation.
	#[arg(long, default_value_t = Mt19937::DEFAULT_SEED)]
	seed: u32,
	/// Use the scalar reference kernel even when a vectorized one is available.
	#[arg(long)]
	reference: bool,
}

/// Mean squared error and its gradient with respect to `output`.
fn mse(output: &[f32], targets: &[f32]) -> (f32, Vec<f32>) {
	let n = output.len() as f32;
	let loss = output
		.iter()
		.zip(targets)
		.map(|(y, t)| (y - t).powi(2))
		.sum::<f32>()
		/ n;
	let grad = output
		.iter()
		.zip(targets)
		.map(|(y, t)| 2.0 * (y - t) / n)
		.collect();
	(loss, grad)
}

fn main() -> Result<()> {
	adjust_thread_pool()
		.as_ref()
		.expect("failed to init thread pool");

	let args = Args::parse();

	init_tracing().expect("failed to initialize tracing");

	let config = LinearConfig {
		bias: true,
		parallelism: Parallelism::from_env(),
		kernel: if args.reference {
			KernelPreference::Reference
		} else {
			KernelPreference::Auto
		},
	};
	let hidden = args.hidden as usize;

	let mut g = Mt19937::new(args.seed);
	let mut first = Linear::new(2, hidden, config)?;
	let mut second = Linear::new(hidden, 1, config)?;
	init::reset_linear(&mut first, &mut g)?;
	init::reset_linear(&mut second, &mut g)?;
	info!(%first, %second, "built model");

	let mut model = Sequential::new();
	model
		.push(first)
		.push(Sigmoid::new())
		.push(second)
		.push(Sigmoid::new());
	model.train();

	let x = Tensor::from_slice(&INPUTS, false)?;
	let mut dy = Tensor::new(TARGETS.len(), true)?;
	let sgd = Sgd::new(args.lr);

	for epoch in 0..args.epochs {
		let (loss, grad) = mse(model.forward(&x)?.data()?, &TARGETS);
		dy.grad_mut()?.copy_from_slice(&grad);

		sgd.zero_grad(&mut model)?;
		model.backward(&dy)?;
		sgd.step(&mut model)?;

		if epoch % 1000 == 0 {
			info!(epoch, loss, "training");
		}
	}

	model.eval();
	let predictions = model.forward(&x)?.data()?.to_vec();
	for (pair, prediction) in INPUTS.chunks_exact(2).zip(predictions) {
		println!("{} xor {} = {prediction:.3}", pair[0], pair[1]);
	}

	model.dispose();
	Ok(())
}
