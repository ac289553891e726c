//! Encryption parameters: the ring dimension, coefficient modulus,
//! plaintext modulus, relinearization base, and noise distribution that
//! together determine the security and capability of every component built
//! on top of a [`crate::context::Context`].

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::rng::{DefaultRandomGeneratorFactory, RandomGeneratorFactory};
use crate::uint::{ModulusDescriptor, WideUint};

/// Supported ring dimensions. Each is a power of two, as required by the
/// cyclotomic-only scope of this engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DegreeType {
	/// N = 1024.
	D1024,
	/// N = 2048.
	D2048,
	/// N = 4096.
	D4096,
	/// N = 8192.
	D8192,
	/// N = 16384.
	D16384,
	/// N = 32768.
	D32768,
}

impl DegreeType {
	/// The ring dimension as a plain integer.
	pub fn value(self) -> usize {
		match self {
			DegreeType::D1024 => 1024,
			DegreeType::D2048 => 2048,
			DegreeType::D4096 => 4096,
			DegreeType::D8192 => 8192,
			DegreeType::D16384 => 16384,
			DegreeType::D32768 => 32768,
		}
	}
}

impl TryFrom<u64> for DegreeType {
	type Error = Error;

	fn try_from(value: u64) -> Result<Self> {
		match value {
			1024 => Ok(DegreeType::D1024),
			2048 => Ok(DegreeType::D2048),
			4096 => Ok(DegreeType::D4096),
			8192 => Ok(DegreeType::D8192),
			16384 => Ok(DegreeType::D16384),
			32768 => Ok(DegreeType::D32768),
			other => Err(Error::InvalidArgument(format!(
				"{other} is not a supported power-of-two ring dimension"
			))),
		}
	}
}

/// A target security level, used only to pick defaults out of
/// [`CoefficientModulus::default_for`]; the engine does not enforce it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SecurityLevel {
	/// No security target; caller-supplied parameters are used as-is.
	None,
	/// 128-bit classical security (the common default).
	#[default]
	TC128,
	/// 192-bit classical security.
	TC192,
	/// 256-bit classical security.
	TC256,
}

/// A modulus value together with its precomputed reduction descriptor.
#[derive(Debug, Clone)]
pub struct Modulus {
	descriptor: ModulusDescriptor,
}

impl Modulus {
	/// Builds a modulus from a raw `u64` value.
	pub fn new(value: u64) -> Result<Self> {
		Self::from_wide(WideUint::from_u64(bit_width_for(value), value))
	}

	/// Builds a modulus from an already-constructed wide integer.
	pub fn from_wide(value: WideUint<'static>) -> Result<Self> {
		Ok(Self {
			descriptor: ModulusDescriptor::new(value)?,
		})
	}

	/// The modulus as a plain `u64` (truncating if it somehow exceeds 64
	/// bits, which does not happen for any modulus this engine constructs).
	pub fn value(&self) -> u64 {
		self.descriptor.value().low_u64()
	}

	/// The bit width declared for values reduced modulo this modulus.
	pub fn bit_width(&self) -> usize {
		self.descriptor.value().bit_width()
	}

	/// The precomputed reduction descriptor.
	pub fn descriptor(&self) -> &ModulusDescriptor {
		&self.descriptor
	}
}

impl PartialEq for Modulus {
	fn eq(&self, other: &Self) -> bool {
		self.value() == other.value()
	}
}
impl Eq for Modulus {}

impl Serialize for Modulus {
	fn serialize<S: serde::Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
		self.value().serialize(s)
	}
}

impl<'de> Deserialize<'de> for Modulus {
	fn deserialize<D: serde::Deserializer<'de>>(d: D) -> std::result::Result<Self, D::Error> {
		let v = u64::deserialize(d)?;
		Modulus::new(v).map_err(serde::de::Error::custom)
	}
}

fn bit_width_for(value: u64) -> usize {
	(64 - value.leading_zeros() as usize).max(1)
}

fn is_prime(n: u64) -> bool {
	if n < 2 {
		return false;
	}
	for p in [2u64, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37] {
		if n == p {
			return true;
		}
		if n % p == 0 {
			return false;
		}
	}
	// Deterministic Miller-Rabin for n < 3,317,044,064,679,887,385,961,981
	// using this witness set, which comfortably covers all u64 values.
	let mut d = n - 1;
	let mut r = 0u32;
	while d % 2 == 0 {
		d /= 2;
		r += 1;
	}
	'witness: for &a in &[2u64, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37] {
		let mut x = pow_mod_u64(a % n, d, n);
		if x == 1 || x == n - 1 {
			continue;
		}
		for _ in 0..r - 1 {
			x = mul_mod_u64(x, x, n);
			if x == n - 1 {
				continue 'witness;
			}
		}
		return false;
	}
	true
}

fn mul_mod_u64(a: u64, b: u64, m: u64) -> u64 {
	((a as u128 * b as u128) % m as u128) as u64
}

fn pow_mod_u64(mut base: u64, mut exp: u64, m: u64) -> u64 {
	let mut result = 1u64 % m;
	base %= m;
	while exp > 0 {
		if exp & 1 == 1 {
			result = mul_mod_u64(result, base, m);
		}
		base = mul_mod_u64(base, base, m);
		exp >>= 1;
	}
	result
}

/// Factory for coefficient-modulus primes.
pub struct CoefficientModulus;

impl CoefficientModulus {
	/// Searches downward from `2^bit_size - 1` for the largest prime
	/// congruent to 1 mod `2N`, i.e. one admitting an NTT for ring
	/// dimension `degree`.
	pub fn create(degree: DegreeType, bit_sizes: &[u32]) -> Result<Vec<Modulus>> {
		let two_n = 2 * degree.value() as u64;
		bit_sizes
			.iter()
			.map(|&bits| {
				find_ntt_prime(bits, two_n)
					.ok_or_else(|| Error::UnsupportedConfiguration(format!("no {bits}-bit NTT prime found for N={}", degree.value())))
					.and_then(Modulus::new)
			})
			.collect()
	}

	/// A single default coefficient modulus for `degree`, sized in
	/// proportion to the requested security level (a coarse, documented
	/// heuristic, not a formally vetted estimator).
	pub fn default_for(degree: DegreeType, level: SecurityLevel) -> Result<Vec<Modulus>> {
		let bits = match (degree, level) {
			(DegreeType::D1024, _) => 27,
			(DegreeType::D2048, SecurityLevel::None) => 54,
			(DegreeType::D2048, _) => 37,
			(DegreeType::D4096, SecurityLevel::TC256) => 54,
			(DegreeType::D4096, _) => 54,
			(DegreeType::D8192, _) => 60,
			(DegreeType::D16384, _) => 60,
			(DegreeType::D32768, _) => 60,
		};
		Self::create(degree, &[bits])
	}
}

/// Factory for plaintext-modulus primes suitable for CRT batching.
pub struct PlainModulus;

impl PlainModulus {
	/// A prime `t` of approximately `bit_size` bits with `2N | t-1`,
	/// enabling [`crate::batch_encoder::PolyCrtBuilder`].
	pub fn batching(degree: DegreeType, bit_size: u32) -> Result<Modulus> {
		let two_n = 2 * degree.value() as u64;
		find_ntt_prime(bit_size, two_n)
			.ok_or_else(|| Error::UnsupportedConfiguration(format!("no {bit_size}-bit batching prime found for N={}", degree.value())))
			.and_then(Modulus::new)
	}

	/// A plaintext modulus with an arbitrary fixed value; batching will be
	/// unavailable unless the value happens to satisfy `2N | t-1`.
	pub fn raw(value: u64) -> Result<Modulus> {
		Modulus::new(value)
	}
}

fn find_ntt_prime(bits: u32, two_n: u64) -> Option<u64> {
	if !(2..64).contains(&bits) {
		return None;
	}
	let mut candidate = (1u64 << bits) - 1;
	candidate -= candidate % two_n;
	candidate += 1;
	loop {
		if candidate >= two_n && is_prime(candidate) {
			return Some(candidate);
		}
		if candidate <= two_n {
			return None;
		}
		candidate -= two_n;
	}
}

/// Encryption parameters, as built by [`EncryptionParametersBuilder`].
/// Validation (building NTT tables and the qualifier flags) happens
/// separately, in [`crate::context::Context::new`].
#[derive(Clone)]
pub struct EncryptionParameters {
	poly_modulus_degree: usize,
	coeff_modulus: Modulus,
	plain_modulus: Modulus,
	decomposition_bit_count: u32,
	noise_standard_deviation: f64,
	noise_max_deviation: f64,
	random_generator_factory: Arc<dyn RandomGeneratorFactory>,
}

impl std::fmt::Debug for EncryptionParameters {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("EncryptionParameters")
			.field("poly_modulus_degree", &self.poly_modulus_degree)
			.field("coeff_modulus", &self.coeff_modulus.value())
			.field("plain_modulus", &self.plain_modulus.value())
			.field("decomposition_bit_count", &self.decomposition_bit_count)
			.field("noise_standard_deviation", &self.noise_standard_deviation)
			.field("noise_max_deviation", &self.noise_max_deviation)
			.finish()
	}
}

impl EncryptionParameters {
	/// Ring dimension `N`.
	pub fn poly_modulus_degree(&self) -> usize {
		self.poly_modulus_degree
	}

	/// Coefficient modulus `q`.
	pub fn coeff_modulus(&self) -> &Modulus {
		&self.coeff_modulus
	}

	/// Plaintext modulus `t`.
	pub fn plain_modulus(&self) -> &Modulus {
		&self.plain_modulus
	}

	/// Relinearization decomposition base exponent `w`; 0 disables
	/// relinearization.
	pub fn decomposition_bit_count(&self) -> u32 {
		self.decomposition_bit_count
	}

	/// Gaussian noise standard deviation σ.
	pub fn noise_standard_deviation(&self) -> f64 {
		self.noise_standard_deviation
	}

	/// Gaussian noise clipping bound B.
	pub fn noise_max_deviation(&self) -> f64 {
		self.noise_max_deviation
	}

	/// The configured random-generator factory.
	pub fn random_generator_factory(&self) -> &Arc<dyn RandomGeneratorFactory> {
		&self.random_generator_factory
	}
}

/// Builds [`EncryptionParameters`] for the FV scheme.
pub struct EncryptionParametersBuilder {
	poly_modulus_degree: Option<usize>,
	coeff_modulus: Option<Modulus>,
	plain_modulus: Option<Modulus>,
	decomposition_bit_count: u32,
	noise_standard_deviation: f64,
	noise_max_deviation: f64,
	random_generator_factory: Arc<dyn RandomGeneratorFactory>,
}

/// The conventional default Gaussian noise standard deviation.
pub const DEFAULT_NOISE_STANDARD_DEVIATION: f64 = 3.2;
/// The conventional default clipping bound, six standard deviations out.
pub const DEFAULT_NOISE_MAX_DEVIATION: f64 = 6.0 * DEFAULT_NOISE_STANDARD_DEVIATION;
/// The conventional default relinearization base exponent.
pub const DEFAULT_DECOMPOSITION_BIT_COUNT: u32 = 16;

impl EncryptionParametersBuilder {
	/// Creates a new builder with conventional noise defaults.
	pub fn new() -> Self {
		Self {
			poly_modulus_degree: None,
			coeff_modulus: None,
			plain_modulus: None,
			decomposition_bit_count: DEFAULT_DECOMPOSITION_BIT_COUNT,
			noise_standard_deviation: DEFAULT_NOISE_STANDARD_DEVIATION,
			noise_max_deviation: DEFAULT_NOISE_MAX_DEVIATION,
			random_generator_factory: Arc::new(DefaultRandomGeneratorFactory),
		}
	}

	/// Sets the ring dimension `N`.
	pub fn set_poly_modulus_degree(mut self, degree: DegreeType) -> Self {
		self.poly_modulus_degree = Some(degree.value());
		self
	}

	/// Sets the coefficient modulus `q`.
	pub fn set_coefficient_modulus(mut self, modulus: Modulus) -> Self {
		self.coeff_modulus = Some(modulus);
		self
	}

	/// Sets the plaintext modulus `t`.
	pub fn set_plain_modulus(mut self, modulus: Modulus) -> Self {
		self.plain_modulus = Some(modulus);
		self
	}

	/// Sets the relinearization decomposition base exponent `w`. Pass 0 to
	/// disable relinearization.
	pub fn set_decomposition_bit_count(mut self, w: u32) -> Self {
		self.decomposition_bit_count = w;
		self
	}

	/// Overrides the Gaussian noise standard deviation.
	pub fn set_noise_standard_deviation(mut self, sigma: f64) -> Self {
		self.noise_standard_deviation = sigma;
		self
	}

	/// Overrides the Gaussian noise clipping bound.
	pub fn set_noise_max_deviation(mut self, bound: f64) -> Self {
		self.noise_max_deviation = bound;
		self
	}

	/// Overrides the random-generator factory.
	pub fn set_random_generator_factory(mut self, factory: Arc<dyn RandomGeneratorFactory>) -> Self {
		self.random_generator_factory = factory;
		self
	}

	/// Validates that every required field was set and that `t < q`, then
	/// returns the built parameters. Qualifier derivation (NTT/batching
	/// eligibility) happens later, in [`crate::context::Context::new`].
	pub fn build(self) -> Result<EncryptionParameters> {
		let poly_modulus_degree = self
			.poly_modulus_degree
			.ok_or_else(|| Error::InvalidArgument("poly_modulus_degree not set".into()))?;
		let coeff_modulus = self
			.coeff_modulus
			.ok_or_else(|| Error::InvalidArgument("coefficient_modulus not set".into()))?;
		let plain_modulus = self
			.plain_modulus
			.ok_or_else(|| Error::InvalidArgument("plain_modulus not set".into()))?;

		if plain_modulus.value() >= coeff_modulus.value() {
			return Err(Error::InvalidArgument(
				"plain_modulus must be strictly less than coeff_modulus".into(),
			));
		}

		Ok(EncryptionParameters {
			poly_modulus_degree,
			coeff_modulus,
			plain_modulus,
			decomposition_bit_count: self.decomposition_bit_count,
			noise_standard_deviation: self.noise_standard_deviation,
			noise_max_deviation: self.noise_max_deviation,
			random_generator_factory: self.random_generator_factory,
		})
	}
}

impl Default for EncryptionParametersBuilder {
	fn default() -> Self {
		Self::new()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn ntt_prime_search_satisfies_congruence() {
		let m = CoefficientModulus::create(DegreeType::D1024, &[30]).unwrap();
		assert_eq!(m.len(), 1);
		assert_eq!((m[0].value() - 1) % 2048, 0);
	}

	#[test]
	fn builder_rejects_missing_fields() {
		let err = EncryptionParametersBuilder::new()
			.set_poly_modulus_degree(DegreeType::D1024)
			.build()
			.unwrap_err();
		assert!(matches!(err, Error::InvalidArgument(_)));
	}

	#[test]
	fn builder_rejects_plain_modulus_too_large() {
		let q = CoefficientModulus::create(DegreeType::D1024, &[20]).unwrap().remove(0);
		let t = Modulus::new(q.value() + 1000).unwrap();
		let result = EncryptionParametersBuilder::new()
			.set_poly_modulus_degree(DegreeType::D1024)
			.set_coefficient_modulus(Modulus::new(q.value()).unwrap())
			.set_plain_modulus(t)
			.build();
		assert!(matches!(result, Err(Error::InvalidArgument(_))));
	}
}
