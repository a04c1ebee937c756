// Copyright 2025 Irreducible Inc.

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("the host CPU does not support the {name} instruction set")]
	UnsupportedInstructionSet { name: &'static str },
	#[error("failed to build the worker pool: {0}")]
	ThreadPool(#[from] rayon::ThreadPoolBuildError),
}
