//! Key generation: secret key, public key, and relinearization
//! (evaluation) keys.

use tracing::{debug, trace};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::context::Context;
use crate::error::Result;
use crate::poly::Polynomial;
use crate::rng::{gaussian_poly, ternary_poly, uniform_poly};
use crate::uint::{ModulusDescriptor, WideUint};

/// A secret polynomial in `R_q` with small, ternary-shaped coefficients.
/// Zeroized on drop.
#[derive(Clone, ZeroizeOnDrop)]
pub struct SecretKey {
	poly: Polynomial<'static>,
}

impl SecretKey {
	/// The underlying polynomial.
	pub fn poly(&self) -> &Polynomial<'static> {
		&self.poly
	}

	/// Wraps an already-sampled polynomial as a secret key. Exposed for
	/// callers that need to reconstruct a key from serialized bytes; most
	/// callers should go through [`KeyGenerator::new`] instead.
	pub fn from_poly(poly: Polynomial<'static>) -> Self {
		Self { poly }
	}
}

impl std::fmt::Debug for SecretKey {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("SecretKey").field("poly", &"<ELIDED>").finish()
	}
}

/// A public key pair `(p0, p1)` in `R_q`, with `p1` uniform and
/// `p0 = -(a*s + t*e)`.
#[derive(Clone)]
pub struct PublicKey {
	p0: Polynomial<'static>,
	p1: Polynomial<'static>,
}

impl PublicKey {
	/// The `p0` component.
	pub fn p0(&self) -> &Polynomial<'static> {
		&self.p0
	}

	/// The `p1` component.
	pub fn p1(&self) -> &Polynomial<'static> {
		&self.p1
	}
}

impl std::fmt::Debug for PublicKey {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("PublicKey").field("p0", &"<ELIDED>").field("p1", &"<ELIDED>").finish()
	}
}

/// One relinearization evaluation-key pair, encoding `2^(i*w) * s^power`
/// noisily under the secret key, for base-chunk index `i`.
#[derive(Clone)]
pub struct EvaluationKeyEntry {
	pub(crate) e0: Polynomial<'static>,
	pub(crate) e1: Polynomial<'static>,
}

/// The ordered sequence of evaluation keys used to relinearize a ciphertext
/// element attached to `s^power` back onto `(1, s)`.
#[derive(Clone)]
pub struct RelinearizationKey {
	power: usize,
	decomposition_bit_count: u32,
	entries: Vec<EvaluationKeyEntry>,
}

impl RelinearizationKey {
	/// The secret-key power this key relinearizes from (2 by default).
	pub fn power(&self) -> usize {
		self.power
	}

	/// The base-2^w decomposition exponent used to build these keys.
	pub fn decomposition_bit_count(&self) -> u32 {
		self.decomposition_bit_count
	}

	/// The `L = floor(bits(q)/w) + 1` key-pairs.
	pub fn entries(&self) -> &[EvaluationKeyEntry] {
		&self.entries
	}
}

impl std::fmt::Debug for RelinearizationKey {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("RelinearizationKey")
			.field("power", &self.power)
			.field("decomposition_bit_count", &self.decomposition_bit_count)
			.field("entries", &self.entries.len())
			.finish()
	}
}

/// Generates secret keys, public keys, and relinearization keys for a
/// validated [`Context`].
pub struct KeyGenerator {
	ctx: Context,
	secret_key: SecretKey,
}

impl KeyGenerator {
	/// Samples a fresh secret key (retrying internally until invertible)
	/// and is ready to derive public/evaluation keys from it.
	pub fn new(ctx: &Context) -> Result<Self> {
		ctx.require_valid()?;
		let secret_key = generate_secret_key(ctx)?;
		Ok(Self { ctx: ctx.clone(), secret_key })
	}

	/// Builds a generator around an already-sampled secret key, e.g. one
	/// restored from storage.
	pub fn from_secret_key(ctx: &Context, secret_key: SecretKey) -> Result<Self> {
		ctx.require_valid()?;
		Ok(Self { ctx: ctx.clone(), secret_key })
	}

	/// The secret key this generator is holding.
	pub fn secret_key(&self) -> &SecretKey {
		&self.secret_key
	}

	/// Derives a fresh public key: `(-(a*s + t*e), a)` for uniform `a` and
	/// Gaussian noise `e`.
	pub fn create_public_key(&self) -> Result<PublicKey> {
		let params = self.ctx.parameters();
		let n = self.ctx.n();
		let bits = params.coeff_modulus().bit_width();
		let q = WideUint::from_u64(bits, params.coeff_modulus().value());
		let modulus = params.coeff_modulus().descriptor();
		let t = WideUint::from_u64(bits, params.plain_modulus().value());

		let mut rng = params.random_generator_factory().create();
		let a = uniform_poly(n, bits, &q, rng.as_mut());
		let e = gaussian_poly(n, bits, &q, params.noise_standard_deviation(), params.noise_max_deviation(), rng.as_mut());

		let a_s = ring_multiply(&a, self.secret_key.poly(), self.ctx, modulus);
		let t_e = e.scalar_mul(&t, modulus);
		let sum = a_s.add(&t_e, Some(modulus));
		let p0 = sum.negate(modulus);

		Ok(PublicKey { p0, p1: a })
	}

	/// Derives relinearization keys targeting `s^2` (the default
	/// collapsing target for a size-3 ciphertext), with
	/// `L = floor(bits(q)/w) + 1` entries.
	pub fn create_relinearization_keys(&self) -> Result<RelinearizationKey> {
		self.create_relinearization_keys_for_power(2)
	}

	/// Derives relinearization keys targeting an arbitrary secret-key
	/// power, e.g. for collapsing ciphertexts produced by repeated
	/// multiplication before relinearizing.
	pub fn create_relinearization_keys_for_power(&self, power: usize) -> Result<RelinearizationKey> {
		let params = self.ctx.parameters();
		if !self.ctx.qualifiers().enable_relinearization {
			return Err(crate::error::Error::UnsupportedConfiguration(
				"decomposition_bit_count is 0; relinearization is disabled".into(),
			));
		}
		let w = params.decomposition_bit_count();
		let n = self.ctx.n();
		let bits = params.coeff_modulus().bit_width();
		let q = WideUint::from_u64(bits, params.coeff_modulus().value());
		let modulus = params.coeff_modulus().descriptor();
		let t = WideUint::from_u64(bits, params.plain_modulus().value());

		// significant_bit_count() == bits(q), so this is floor(bits(q)/w)+1;
		// equivalent to the floor(log2(q)/w)+1 phrasing up to q's top bit.
		let l = (q.significant_bit_count() as u32 / w) + 1;

		let s_power = secret_key_power(self.secret_key.poly(), power, self.ctx, modulus);

		let mut rng = params.random_generator_factory().create();
		let mut entries = Vec::with_capacity(l as usize);
		for i in 0..l {
			let a_i = uniform_poly(n, bits, &q, rng.as_mut());
			let e_i = gaussian_poly(n, bits, &q, params.noise_standard_deviation(), params.noise_max_deviation(), rng.as_mut());

			let a_s = ring_multiply(&a_i, self.secret_key.poly(), self.ctx, modulus);
			let t_e = e_i.scalar_mul(&t, modulus);
			let base = a_s.add(&t_e, Some(modulus));
			let neg_base = base.negate(modulus);

			let shift = WideUint::from_u64(bits, 1).shl((i * w) as usize, bits);
			let scaled_s_power = s_power.scalar_mul(&shift, modulus);

			let e0 = neg_base.add(&scaled_s_power, Some(modulus));
			entries.push(EvaluationKeyEntry { e0, e1: a_i });
		}

		trace!(power, decomposition_bit_count = w, entry_count = entries.len(), "generated relinearization keys");

		Ok(RelinearizationKey {
			power,
			decomposition_bit_count: w,
			entries,
		})
	}
}

/// Multiplies two ring elements using whichever fast-multiplication
/// backend the context's qualifiers select: NTT when available,
/// Nussbaumer otherwise.
pub(crate) fn ring_multiply(a: &Polynomial, b: &Polynomial, ctx: &Context, modulus: &ModulusDescriptor) -> Polynomial<'static> {
	if let Some(tables) = ctx.coeff_ntt_tables() {
		let mut fa = a.clone();
		let mut fb = b.clone();
		tables.forward_inplace(&mut fa);
		tables.forward_inplace(&mut fb);
		let mut product = tables.pointwise_multiply(&fa, &fb);
		tables.inverse_inplace(&mut product);
		product
	} else {
		crate::nussbaumer::nussbaumer_multiply(a, b, modulus)
	}
}

fn secret_key_power(s: &Polynomial, power: usize, ctx: &Context, modulus: &ModulusDescriptor) -> Polynomial<'static> {
	assert!(power >= 1);
	let mut acc = s.clone();
	for _ in 1..power {
		acc = ring_multiply(&acc, s, ctx, modulus);
	}
	acc
}

fn generate_secret_key(ctx: &Context) -> Result<SecretKey> {
	let params = ctx.parameters();
	let n = ctx.n();
	let bits = params.coeff_modulus().bit_width();
	let q = WideUint::from_u64(bits, params.coeff_modulus().value());
	let t = WideUint::from_u64(bits, params.plain_modulus().value());
	let modulus = params.coeff_modulus().descriptor();
	let mut rng = params.random_generator_factory().create();

	let mut attempt = 0u32;
	loop {
		attempt += 1;
		let raw = ternary_poly(n, bits, &q, rng.as_mut());
		let mut candidate = raw.scalar_mul(&t, modulus);
		let one = candidate.get_coefficient(0);
		candidate.set_coefficient(0, &modulus.add_mod(&one, &WideUint::from_u64(bits, 1)));

		if poly_is_invertible(&candidate, n, modulus) {
			if attempt > 1 {
				debug!(attempt, "secret key sampling converged after retrying non-invertible candidates");
			}
			return Ok(SecretKey { poly: candidate });
		}
		trace!(attempt, "secret key candidate was not invertible mod q, resampling");
	}
}

/// Tests whether `s` is a unit in `R_q = Z_q[X]/(X^N+1)` via the
/// polynomial Euclidean algorithm: `s` is invertible iff
/// `gcd(s, X^N+1)` (computed over `Z_q[X]`) has degree 0.
fn poly_is_invertible(s: &Polynomial, n: usize, modulus: &ModulusDescriptor) -> bool {
	let bits = s.coeff_bit_width();
	let mut cyclotomic = vec![WideUint::zero(bits); n + 1];
	cyclotomic[0] = WideUint::from_u64(bits, 1);
	cyclotomic[n] = WideUint::from_u64(bits, 1);

	let mut r0 = cyclotomic;
	let mut r1: Vec<WideUint<'static>> = (0..n).map(|i| s.get_coefficient(i)).collect();
	trim(&mut r1);

	while !is_zero_poly(&r1) {
		let rem = match poly_mod_divrem(&r0, &r1, modulus) {
			Some(r) => r,
			// A leading coefficient had no inverse mod q (q not prime, or an
			// unlucky composite factor): treat as inconclusive and force a
			// retry rather than risk accepting a non-invertible key.
			None => return false,
		};
		r0 = r1;
		r1 = rem;
	}

	poly_degree(&r0) == 0
}

fn trim(v: &mut Vec<WideUint<'static>>) {
	while v.len() > 1 && v.last().expect("nonempty").is_zero() {
		v.pop();
	}
}

fn is_zero_poly(v: &[WideUint<'static>]) -> bool {
	v.iter().all(|c| c.is_zero())
}

fn poly_degree(v: &[WideUint<'static>]) -> usize {
	for i in (0..v.len()).rev() {
		if !v[i].is_zero() {
			return i;
		}
	}
	0
}

fn poly_mod_divrem(dividend: &[WideUint<'static>], divisor: &[WideUint<'static>], modulus: &ModulusDescriptor) -> Option<Vec<WideUint<'static>>> {
	let mut rem = dividend.to_vec();
	trim(&mut rem);
	let mut div = divisor.to_vec();
	trim(&mut div);

	if is_zero_poly(&div) {
		return Some(rem);
	}

	let lead_inv = modulus.inverse(&div[div.len() - 1]).ok()?;

	while !is_zero_poly(&rem) && poly_degree(&rem) >= poly_degree(&div) {
		let shift = poly_degree(&rem) - poly_degree(&div);
		let coeff = modulus.mul_mod(&rem[poly_degree(&rem)], &lead_inv);
		for (i, d) in div.iter().enumerate() {
			let idx = i + shift;
			let term = modulus.mul_mod(&coeff, d);
			rem[idx] = modulus.sub_mod(&rem[idx], &term);
		}
		trim(&mut rem);
		if poly_degree(&div) == 0 {
			break;
		}
	}

	Some(rem)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::parameters::{CoefficientModulus, DegreeType, EncryptionParametersBuilder, PlainModulus};

	fn ctx() -> Context {
		let params = EncryptionParametersBuilder::new()
			.set_poly_modulus_degree(DegreeType::D1024)
			.set_coefficient_modulus(CoefficientModulus::create(DegreeType::D1024, &[30]).unwrap().remove(0))
			.set_plain_modulus(PlainModulus::raw(257).unwrap())
			.set_decomposition_bit_count(16)
			.build()
			.unwrap();
		Context::new(&params).unwrap()
	}

	#[test]
	fn keygen_produces_invertible_secret_key() {
		let c = ctx();
		let gen = KeyGenerator::new(&c).unwrap();
		let modulus = c.parameters().coeff_modulus().descriptor();
		assert!(poly_is_invertible(gen.secret_key().poly(), c.n(), modulus));
	}

	#[test]
	fn public_key_shape_matches_ring_dimension() {
		let c = ctx();
		let gen = KeyGenerator::new(&c).unwrap();
		let pk = gen.create_public_key().unwrap();
		assert_eq!(pk.p0().coeff_count(), c.n());
		assert_eq!(pk.p1().coeff_count(), c.n());
	}

	#[test]
	fn relinearization_keys_have_expected_length() {
		let c = ctx();
		let gen = KeyGenerator::new(&c).unwrap();
		let rk = gen.create_relinearization_keys().unwrap();
		let bits = c.parameters().coeff_modulus().bit_width() as u32;
		let expected_l = bits / c.parameters().decomposition_bit_count() + 1;
		assert_eq!(rk.entries().len(), expected_l as usize);
	}
}
