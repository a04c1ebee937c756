// Copyright 2023 Ulvetanna Inc.

use tracing_subscriber::{
	fmt, layer::SubscriberExt, util::SubscriberInitExt, util::TryInitError, EnvFilter,
};

/// Installs a global fmt subscriber filtered by `RUST_LOG` (default `info`).
///
/// Fails if a global subscriber was already set.
pub fn init_tracing() -> Result<(), TryInitError> {
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
	tracing_subscriber::registry()
		.with(filter)
		.with(fmt::layer().with_target(false))
		.try_init()
}
