// Copyright 2025 Irreducible Inc.

use rand::{Error as RandError, RngCore};

use crate::Generator;

const MODULUS: u64 = 0x7fff_ffff;
const MULTIPLIER: u64 = 1_132_489_760;

/// The 31-bit multiplicative congruential generator MCG(1132489760, 2^31 - 1) (L'Ecuyer, 1999).
///
/// Much cheaper than [`crate::Mt19937`] and of noticeably lower quality. Draws are in
/// `[0, 2^31 - 1)`, and floats are produced by dividing a single draw by the modulus. A zero seed
/// yields a generator stuck at zero.
#[derive(Debug, Clone)]
pub struct Mcg31m1 {
	state: u64,
}

impl Mcg31m1 {
	pub const DEFAULT_SEED: u32 = 1;

	pub fn new(seed: u32) -> Self {
		Self {
			state: seed as u64 % MODULUS,
		}
	}
}

impl Default for Mcg31m1 {
	fn default() -> Self {
		Self::new(Self::DEFAULT_SEED)
	}
}

impl Generator for Mcg31m1 {
	fn draw32(&mut self) -> u32 {
		let x = (self.state % MODULUS) as u32;
		self.state = (MULTIPLIER * self.state) % MODULUS;
		x
	}

	fn uniform32(&mut self) -> f32 {
		self.draw32() as f32 / MODULUS as f32
	}

	fn uniform64(&mut self) -> f64 {
		self.draw32() as f64 / MODULUS as f64
	}
}

impl RngCore for Mcg31m1 {
	fn next_u32(&mut self) -> u32 {
		self.draw32()
	}

	fn next_u64(&mut self) -> u64 {
		self.draw64()
	}

	fn fill_bytes(&mut self, dest: &mut [u8]) {
		for chunk in dest.chunks_mut(4) {
			let word = self.draw32().to_le_bytes();
			chunk.copy_from_slice(&word[..chunk.len()]);
		}
	}

	fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), RandError> {
		self.fill_bytes(dest);
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_default_sequence() {
		let mut rng = Mcg31m1::default();
		let draws = (0..6).map(|_| rng.draw32()).collect::<Vec<_>>();
		assert_eq!(draws, [1, 1132489760, 826537482, 289798557, 480863449, 1381340036]);
	}

	#[test]
	fn test_seeded_sequence() {
		let mut rng = Mcg31m1::new(12345);
		let draws = (0..4).map(|_| rng.draw32()).collect::<Vec<_>>();
		assert_eq!(draws, [12345, 467545230, 910408393, 2002913910]);
	}

	#[test]
	fn test_draw64_and_floats() {
		let mut rng = Mcg31m1::default();
		assert_eq!(rng.draw64(), (1u64 << 32) | 1132489760);

		let mut rng = Mcg31m1::new(12345);
		assert_eq!(rng.uniform64(), 12345.0 / 2147483647.0);
		assert_eq!(rng.uniform32(), 467545230.0f32 / 2147483647.0f32);
	}

	#[test]
	fn test_zero_seed_is_degenerate() {
		let mut rng = Mcg31m1::new(0);
		assert!((0..8).all(|_| rng.draw32() == 0));
	}
}
