//! Randomness sources: the pluggable generator factory configured on
//! [`crate::parameters::EncryptionParameters`], and the ternary/Gaussian/
//! uniform samplers the FV scheme draws from it.

use std::fmt::Debug;

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;
use rand_distr::{Distribution, Normal};

use crate::poly::Polynomial;
use crate::uint::{ModulusDescriptor, WideUint};

/// A source of cryptographically secure randomness. The default
/// implementation is a CSPRNG seeded from the OS; callers may substitute a
/// deterministic generator (e.g. for reproducible tests) by implementing
/// this trait themselves.
pub trait RandomGeneratorFactory: Debug {
	/// Creates a fresh random number generator.
	fn create(&self) -> Box<dyn RngCore>;
}

/// The default factory: a `ChaCha20` stream cipher CSPRNG seeded from the
/// operating system's entropy source.
#[derive(Debug, Clone, Default)]
pub struct DefaultRandomGeneratorFactory;

impl RandomGeneratorFactory for DefaultRandomGeneratorFactory {
	fn create(&self) -> Box<dyn RngCore> {
		Box::new(ChaCha20Rng::from_entropy())
	}
}

/// A fixed-seed factory. Only meaningful behind the `deterministic`
/// feature or in tests: never use this for real key material.
#[derive(Debug, Clone)]
pub struct SeededRandomGeneratorFactory {
	seed: u64,
}

impl SeededRandomGeneratorFactory {
	/// Builds a factory that always yields the same stream from `seed`.
	pub fn new(seed: u64) -> Self {
		Self { seed }
	}
}

impl RandomGeneratorFactory for SeededRandomGeneratorFactory {
	fn create(&self) -> Box<dyn RngCore> {
		Box::new(ChaCha20Rng::seed_from_u64(self.seed))
	}
}

/// Draws `n` coefficients i.i.d. uniform from `{-1, 0, +1}`, returned as a
/// signed vector (callers fold into `R_q` themselves).
pub fn sample_ternary(n: usize, rng: &mut dyn RngCore) -> Vec<i8> {
	(0..n)
		.map(|_| match rng.next_u32() % 3 {
			0 => -1,
			1 => 0,
			_ => 1,
		})
		.collect()
}

/// Builds a ternary secret-key-shaped polynomial mod `q`: samples
/// `{-1,0,1}`, represents `-1` as `q-1`.
pub fn ternary_poly(n: usize, bit_width: usize, q: &WideUint, rng: &mut dyn RngCore) -> Polynomial<'static> {
	let signs = sample_ternary(n, rng);
	let mut poly = Polynomial::zero(n, bit_width);
	for (i, s) in signs.into_iter().enumerate() {
		let v = match s {
			-1 => q.sub(&WideUint::from_u64(bit_width, 1), bit_width).0,
			0 => WideUint::zero(bit_width),
			_ => WideUint::from_u64(bit_width, 1),
		};
		poly.set_coefficient(i, &v);
	}
	poly
}

/// Builds a polynomial with coefficients uniform in `[0, q)`.
pub fn uniform_poly(n: usize, bit_width: usize, q: &WideUint, rng: &mut dyn RngCore) -> Polynomial<'static> {
	let mut poly = Polynomial::zero(n, bit_width);
	let limb_count = q.limb_count();
	for i in 0..n {
		loop {
			let limbs: Vec<u64> = (0..limb_count).map(|_| rng.next_u64()).collect();
			let candidate = WideUint::from_limbs(bit_width, limbs);
			if candidate.compare(q) == std::cmp::Ordering::Less {
				poly.set_coefficient(i, &candidate);
				break;
			}
		}
	}
	poly
}

/// Builds a polynomial with coefficients drawn from a discrete Gaussian of
/// standard deviation `sigma`, clipped to `[-bound, bound]`, folded into
/// `[0, q)` (negative values represented as `q - |x|`).
pub fn gaussian_poly(
	n: usize,
	bit_width: usize,
	q: &WideUint,
	sigma: f64,
	bound: f64,
	rng: &mut dyn RngCore,
) -> Polynomial<'static> {
	let normal = Normal::new(0.0, sigma).expect("sigma must be positive and finite");
	let mut poly = Polynomial::zero(n, bit_width);
	for i in 0..n {
		let mut sample = normal.sample(rng);
		if sample > bound {
			sample = bound;
		} else if sample < -bound {
			sample = -bound;
		}
		let rounded = sample.round() as i64;
		let v = if rounded < 0 {
			q.sub(&WideUint::from_u64(bit_width, (-rounded) as u64), bit_width).0
		} else {
			WideUint::from_u64(bit_width, rounded as u64)
		};
		poly.set_coefficient(i, &v);
	}
	poly
}

/// Convenience: builds a polynomial with coefficients uniform in `[0, q)`
/// using the modulus descriptor's value.
pub fn uniform_poly_for_modulus(n: usize, bit_width: usize, modulus: &ModulusDescriptor, rng: &mut dyn RngCore) -> Polynomial<'static> {
	uniform_poly(n, bit_width, modulus.value(), rng)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn ternary_samples_are_in_range() {
		let mut rng = ChaCha20Rng::seed_from_u64(1);
		let q = WideUint::from_u64(32, 97);
		let poly = ternary_poly(16, 32, &q, &mut rng);
		for i in 0..16 {
			let c = poly.get_coefficient(i).low_u64();
			assert!(c == 0 || c == 1 || c == 96);
		}
	}

	#[test]
	fn uniform_samples_stay_below_modulus() {
		let mut rng = ChaCha20Rng::seed_from_u64(2);
		let q = WideUint::from_u64(32, 97);
		let poly = uniform_poly(32, 32, &q, &mut rng);
		for i in 0..32 {
			assert!(poly.get_coefficient(i).low_u64() < 97);
		}
	}
}
