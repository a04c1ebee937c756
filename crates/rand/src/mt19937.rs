// Copyright 2025 Irreducible Inc.

use std::fmt;

use rand::{Error as RandError, RngCore, SeedableRng};

use crate::Generator;

const STATE_LEN: usize = 624;
const SHIFT_LEN: usize = 397;
const MATRIX_A: u32 = 0x9908_b0df;
const UPPER_MASK: u32 = 0x8000_0000;
const LOWER_MASK: u32 = 0x7fff_ffff;

/// Mersenne Twister MT19937 (Matsumoto and Nishimura), period `2^19937 - 1`.
///
/// Output is bit-compatible with the reference implementation, including the seeding routine and
/// the default seed of 5489.
#[derive(Clone)]
pub struct Mt19937 {
	state: Box<[u32; STATE_LEN]>,
	// Words left before the state has to be regenerated.
	left: usize,
	next: usize,
}

impl Mt19937 {
	pub const DEFAULT_SEED: u32 = 5489;

	pub fn new(seed: u32) -> Self {
		let mut state = Box::new([0u32; STATE_LEN]);
		state[0] = seed;
		for j in 1..STATE_LEN {
			let prev = state[j - 1];
			state[j] = 1_812_433_253u32
				.wrapping_mul(prev ^ (prev >> 30))
				.wrapping_add(j as u32);
		}
		Self {
			state,
			left: 1,
			next: 0,
		}
	}

	/// Regenerates all 624 words of the state in a single pass.
	fn twist(&mut self) {
		let state = &mut self.state;
		let mix = |upper: u32, lower: u32| {
			let y = (upper & UPPER_MASK) | (lower & LOWER_MASK);
			(y >> 1) ^ if y & 1 == 0 { 0 } else { MATRIX_A }
		};

		for j in 0..STATE_LEN - SHIFT_LEN {
			state[j] = state[j + SHIFT_LEN] ^ mix(state[j], state[j + 1]);
		}
		for j in STATE_LEN - SHIFT_LEN..STATE_LEN - 1 {
			state[j] = state[j + SHIFT_LEN - STATE_LEN] ^ mix(state[j], state[j + 1]);
		}
		state[STATE_LEN - 1] = state[SHIFT_LEN - 1] ^ mix(state[STATE_LEN - 1], state[0]);

		self.left = STATE_LEN;
		self.next = 0;
	}
}

impl Default for Mt19937 {
	fn default() -> Self {
		Self::new(Self::DEFAULT_SEED)
	}
}

impl fmt::Debug for Mt19937 {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Mt19937")
			.field("left", &self.left)
			.field("next", &self.next)
			.finish_non_exhaustive()
	}
}

impl Generator for Mt19937 {
	fn draw32(&mut self) -> u32 {
		self.left -= 1;
		if self.left == 0 {
			self.twist();
		}

		let mut y = self.state[self.next];
		self.next += 1;

		y ^= y >> 11;
		y ^= (y << 7) & 0x9d2c_5680;
		y ^= (y << 15) & 0xefc6_0000;
		y ^= y >> 18;
		y
	}
}

impl RngCore for Mt19937 {
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

impl SeedableRng for Mt19937 {
	type Seed = [u8; 4];

	fn from_seed(seed: Self::Seed) -> Self {
		Self::new(u32::from_le_bytes(seed))
	}
}
