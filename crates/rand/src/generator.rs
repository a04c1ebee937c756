// Copyright 2025 Irreducible Inc.

use auto_impl::auto_impl;

/// A source of uniformly distributed 32-bit words.
///
/// The float conversions keep 24 bits (`f32`) and 53 bits (`f64`) of the drawn integers, so the
/// results lie in `[0, 1)`. Generators with a narrower output range override them.
#[auto_impl(&mut, Box)]
pub trait Generator {
	fn draw32(&mut self) -> u32;

	/// Two consecutive draws, the first one in the high half.
	fn draw64(&mut self) -> u64 {
		let hi = self.draw32() as u64;
		let lo = self.draw32() as u64;
		(hi << 32) | lo
	}

	fn uniform32(&mut self) -> f32 {
		(self.draw32() & ((1 << 24) - 1)) as f32 * (1.0 / (1u32 << 24) as f32)
	}

	fn uniform64(&mut self) -> f64 {
		(self.draw64() & ((1 << 53) - 1)) as f64 * (1.0 / (1u64 << 53) as f64)
	}
}
