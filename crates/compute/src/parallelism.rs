// Copyright 2025 Irreducible Inc.

use std::num::NonZeroUsize;

use rayon::prelude::*;
use synapse_utils::env::parse_env_var;

use crate::Error;

/// How many workers a kernel may fan batch rows out to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Parallelism {
	/// Use the global rayon pool, one worker per hardware thread unless `RAYON_NUM_THREADS` says
	/// otherwise.
	#[default]
	Auto,
	/// Run everything on the calling thread.
	Sequential,
	/// Use a dedicated pool with exactly this many workers.
	Limited(NonZeroUsize),
}

impl Parallelism {
	/// Environment variable read by [`Parallelism::from_env`].
	pub const ENV_VAR: &'static str = "SYNAPSE_NUM_THREADS";

	/// Maps a classic degree of parallelism: negative means auto, zero means sequential and a
	/// positive value caps the number of workers.
	pub fn from_degree(degree: i64) -> Self {
		match usize::try_from(degree) {
			Err(_) => Self::Auto,
			Ok(degree) => NonZeroUsize::new(degree).map_or(Self::Sequential, Self::Limited),
		}
	}

	/// Reads the degree from `SYNAPSE_NUM_THREADS`, falling back to [`Parallelism::Auto`].
	pub fn from_env() -> Self {
		parse_env_var::<i64>(Self::ENV_VAR).map_or(Self::Auto, Self::from_degree)
	}
}

/// Runs closures over disjoint chunks of an output buffer according to a [`Parallelism`].
#[derive(Debug)]
pub(crate) enum Executor {
	Sequential,
	Global,
	Pool(rayon::ThreadPool),
}

impl Executor {
	pub fn new(parallelism: Parallelism) -> Result<Self, Error> {
		let executor = match parallelism {
			Parallelism::Auto => Self::Global,
			Parallelism::Sequential => Self::Sequential,
			Parallelism::Limited(n) => Self::Pool(synapse_utils::rayon::build_pool(n.get())?),
		};
		Ok(executor)
	}

	/// Calls `f(index, chunk)` for every `chunk_len`-sized chunk of `data`.
	///
	/// Chunks never overlap, so `f` may write its chunk without synchronization.
	pub fn for_each_chunk<F>(&self, data: &mut [f32], chunk_len: usize, f: F)
	where
		F: Fn(usize, &mut [f32]) + Send + Sync,
	{
		match self {
			Self::Sequential => data
				.chunks_mut(chunk_len)
				.enumerate()
				.for_each(|(index, chunk)| f(index, chunk)),
			Self::Global => data
				.par_chunks_mut(chunk_len)
				.enumerate()
				.for_each(|(index, chunk)| f(index, chunk)),
			Self::Pool(pool) => pool.install(|| {
				data.par_chunks_mut(chunk_len)
					.enumerate()
					.for_each(|(index, chunk)| f(index, chunk))
			}),
		}
	}
}
