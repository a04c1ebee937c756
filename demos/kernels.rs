// Copyright 2025 Irreducible Inc.

use std::time::Instant;

use anyhow::Result;
use clap::{value_parser, Parser};
use synapse_compute::{
	cpu::ReferenceMatMul, select_matmul, vectorized_kernel_supported, KernelPreference, MatMul,
	MatMulShape, Parallelism,
};
use synapse_rand::{uniform_, Mt19937};
use synapse_utils::{rayon::adjust_thread_pool, tracing::init_tracing};
use tracing::info;

#[derive(Debug, Parser)]
struct Args {
	#[arg(long, default_value_t = 64, value_parser = value_parser!(u32).range(1..))]
	batch: u32,
	#[arg(long, default_value_t = 512, value_parser = value_parser!(u32).range(1..16383))]
	input: u32,
	#[arg(long, default_value_t = 256, value_parser = value_parser!(u32).range(1..16383))]
	output: u32,
	/// Timed forward calls per kernel.
	#[arg(long, default_value_t = 20, value_parser = value_parser!(u32).range(1..))]
	iterations: u32,
	/// Degree of parallelism: negative for all hardware threads, zero for the calling thread.
	#[arg(long, default_value_t = -1, allow_negative_numbers = true)]
	degree: i64,
}

fn random_vec(g: &mut Mt19937, len: usize) -> Vec<f32> {
	let mut values = vec![0.0; len];
	uniform_(&mut values, g, -1.0, 1.0);
	values
}

fn time_forward(
	kernel: &dyn MatMul,
	out: &mut [f32],
	input: &[f32],
	weight: &[f32],
	bias: &[f32],
	shape: MatMulShape,
	iterations: u32,
) -> f64 {
	let start = Instant::now();
	for _ in 0..iterations {
		kernel.forward(out, input, weight, Some(bias), shape);
	}
	start.elapsed().as_secs_f64() * 1e3 / iterations as f64
}

fn main() -> Result<()> {
	adjust_thread_pool()
		.as_ref()
		.expect("failed to init thread pool");

	let args = Args::parse();

	init_tracing().expect("failed to initialize tracing");

	let shape = MatMulShape::new(args.batch as usize, args.input as usize, args.output as usize);
	let parallelism = Parallelism::from_degree(args.degree);
	info!(?shape, ?parallelism, vectorized = vectorized_kernel_supported(), "comparing kernels");

	let mut g = Mt19937::default();
	let input = random_vec(&mut g, shape.batch * shape.input);
	let weight = random_vec(&mut g, shape.output * shape.input);
	let bias = random_vec(&mut g, shape.output);

	let reference = ReferenceMatMul::new(parallelism)?;
	let selected = select_matmul(KernelPreference::Auto, parallelism)?;

	let mut expected = vec![0.0; shape.batch * shape.output];
	let mut actual = vec![0.0; shape.batch * shape.output];
	let reference_ms =
		time_forward(&reference, &mut expected, &input, &weight, &bias, shape, args.iterations);
	let selected_ms =
		time_forward(selected.as_ref(), &mut actual, &input, &weight, &bias, shape, args.iterations);

	let max_error = expected
		.iter()
		.zip(&actual)
		.map(|(e, a)| (e - a).abs() / (1.0 + e.abs()))
		.fold(0.0f32, f32::max);

	println!("{:<10} {reference_ms:>10.3} ms", reference.name());
	println!("{:<10} {selected_ms:>10.3} ms", selected.name());
	println!("max relative difference: {max_error:e}");
	Ok(())
}
