// Copyright 2025 Irreducible Inc.

//! Deterministic pseudo-random sources and the distributions built on top of them.
//!
//! Generators are plain owned values. Whoever needs randomness receives one explicitly, there is
//! no process-wide default instance.

mod distributions;
mod generator;
mod mcg;
mod mt19937;

pub use distributions::*;
pub use generator::Generator;
pub use mcg::Mcg31m1;
pub use mt19937::Mt19937;
