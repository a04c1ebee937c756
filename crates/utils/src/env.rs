// Copyright 2024 Irreducible Inc.

use std::str::FromStr;

/// Read boolean flag from the environment variable.
pub fn boolean_env_flag_set(flag: &str) -> bool {
	match std::env::var(flag) {
		Ok(val) => ["1", "on", "ON", "true", "TRUE", "yes", "YES"].contains(&val.as_str()),
		Err(_) => false,
	}
}

/// Parse the environment variable `name` into `T`.
///
/// Returns `None` when the variable is unset or does not parse.
pub fn parse_env_var<T: FromStr>(name: &str) -> Option<T> {
	std::env::var(name).ok()?.trim().parse().ok()
}
