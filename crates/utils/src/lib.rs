// Copyright 2024 Ulvetanna Inc.

pub mod env;
pub mod error_utils;
pub mod rayon;
pub mod tracing;
