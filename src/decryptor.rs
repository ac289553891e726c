//! Decryption and noise measurement.
//!
//! Holds a lazily-grown cache of secret-key powers `s, s^2, ..., s^{M-1}`
//! (NTT domain when available, coefficient domain via Nussbaumer
//! otherwise), grown monotonically as ciphertexts of increasing size are
//! decrypted.

use crate::ciphertext::Ciphertext;
use crate::context::Context;
use crate::error::Result;
use crate::keys::SecretKey;
use crate::nussbaumer::nussbaumer_dot_product;
use crate::plaintext::Plaintext;
use crate::poly::Polynomial;
use crate::uint::WideUint;

/// Decrypts ciphertexts under a secret key and measures their noise.
///
/// Mirrors the source's one-decryptor-per-thread stance (see the crate's
/// design notes): the secret-key power cache is grown in place and is not
/// safe to call concurrently from two threads.
pub struct Decryptor {
	ctx: Context,
	secret_key: SecretKey,
	/// `powers[0] = s`, `powers[1] = s^2`, ... — kept in NTT domain when the
	/// NTT qualifier is set, coefficient domain otherwise (see
	/// [`Decryptor::ensure_powers`]).
	powers: Vec<Polynomial<'static>>,
}

impl Decryptor {
	/// Builds a decryptor for `secret_key` under `ctx`.
	pub fn new(ctx: &Context, secret_key: SecretKey) -> Result<Self> {
		ctx.require_valid()?;
		Ok(Self {
			ctx: ctx.clone(),
			secret_key,
			powers: Vec::new(),
		})
	}

	fn modulus(&self) -> &crate::uint::ModulusDescriptor {
		self.ctx.parameters().coeff_modulus().descriptor()
	}

	/// Grows the power cache so that `powers[0..=target_index]` is
	/// populated (`target_index` is 0-based, so `target_index = k` means
	/// `s^{k+1}` is cached). When the NTT qualifier is set, every cached
	/// power is itself stored already transformed into NTT domain, so
	/// growing the cache is a single dyadic (pointwise) multiplication by
	/// `s`; otherwise the cache stays in coefficient domain and growing it
	/// is a Nussbaumer convolution, per spec.
	fn ensure_powers(&mut self, target_index: usize) {
		let modulus = self.ctx.parameters().coeff_modulus().descriptor().clone();
		let tables = self.ctx.coeff_ntt_tables().cloned();

		if self.powers.is_empty() {
			let first = match &tables {
				Some(t) => {
					let mut s0 = self.secret_key.poly().clone();
					t.forward_inplace(&mut s0);
					s0
				}
				None => self.secret_key.poly().clone(),
			};
			self.powers.push(first);
		}

		let s_ntt = self.powers[0].clone();
		while self.powers.len() <= target_index {
			let last = self.powers.last().expect("seeded above").clone();
			let next = match &tables {
				Some(t) => t.pointwise_multiply(&last, &s_ntt),
				None => nussbaumer_dot_product(std::slice::from_ref(&last), std::slice::from_ref(self.secret_key.poly()), &modulus),
			};
			self.powers.push(next);
		}
	}

	/// Computes `x = sum_{j=0}^{M-1} c_j * s^j mod (poly_modulus, q)` for a
	/// ciphertext `(c0, c1, ..., c_{M-1})`, growing the secret-key power
	/// cache as needed. `c0`'s term contributes directly (`s^0 = 1`); the
	/// `j >= 1` terms are computed via [`crate::ntt::NttTables::dot_product`]
	/// when NTT is available (transforming the ciphertext elements into NTT
	/// domain to match the cached powers, then transforming the sum back)
	/// or [`nussbaumer_dot_product`] otherwise.
	fn compute_dot_product(&mut self, ciphertext: &Ciphertext) -> Polynomial<'static> {
		let modulus = self.modulus().clone();

		let mut acc = ciphertext.element(0).clone();
		if ciphertext.size() > 1 {
			self.ensure_powers(ciphertext.size() - 2);
			let powers = &self.powers[..ciphertext.size() - 1];

			let sum = if let Some(tables) = self.ctx.coeff_ntt_tables() {
				let transformed: Vec<Polynomial<'static>> = ciphertext.elements()[1..]
					.iter()
					.map(|e| {
						let mut t = e.clone();
						tables.forward_inplace(&mut t);
						t
					})
					.collect();
				let mut sum_ntt = tables.dot_product(&transformed, powers);
				tables.inverse_inplace(&mut sum_ntt);
				sum_ntt
			} else {
				nussbaumer_dot_product(&ciphertext.elements()[1..], powers, &modulus)
			};

			acc = acc.add(&sum, Some(&modulus));
		}
		acc
	}

	/// Decrypts `ciphertext`, returning the recovered plaintext.
	///
	/// For each coefficient of `x = sum c_j * s^j`: add `Delta/2` (round to
	/// nearest), fold back from the upper half if the result reached
	/// `upper_half_threshold`, then integer-divide by `Delta`.
	pub fn decrypt(&mut self, ciphertext: &Ciphertext) -> Result<Plaintext> {
		self.ctx.require_valid()?;
		let constants = self.ctx.constants()?.clone();
		let bits = self.ctx.parameters().coeff_modulus().bit_width();
		let t = self.ctx.parameters().plain_modulus().value();
		let n = self.ctx.n();

		let x = self.compute_dot_product(ciphertext);

		let mut result = Plaintext::new(n, bits);
		for i in 0..n {
			let xi = x.get_coefficient(i);
			let (rounded, _) = xi.add(&constants.delta_half, bits + 1);
			let folded = if rounded.compare(&constants.upper_half_threshold) != std::cmp::Ordering::Less {
				rounded.sub(&constants.upper_half_increment, bits + 1).0
			} else {
				rounded
			};
			let (quotient, _) = folded.div_rem(&constants.delta)?;
			result.set_coefficient(i, quotient.low_u64() % t);
		}
		Ok(result)
	}

	/// Recomputes `x` as in [`Decryptor::decrypt`], subtracts `Delta*m` to
	/// recover the noise polynomial, and returns its infinity norm mod `q`.
	pub fn inherent_noise(&mut self, ciphertext: &Ciphertext, plaintext: &Plaintext) -> Result<WideUint<'static>> {
		self.ctx.require_valid()?;
		let constants = self.ctx.constants()?.clone();
		let bits = self.ctx.parameters().coeff_modulus().bit_width();
		let q = WideUint::from_u64(bits, self.ctx.parameters().coeff_modulus().value());
		let modulus = self.modulus().clone();
		let n = self.ctx.n();

		let x = self.compute_dot_product(ciphertext);
		let mut delta_m = Polynomial::zero(n, bits);
		for i in 0..n {
			let coeff = if i < plaintext.poly().coeff_count() {
				plaintext.poly().get_coefficient(i)
			} else {
				WideUint::zero(bits)
			};
			delta_m.set_coefficient(i, &modulus.mul_mod(&coeff, &constants.delta));
		}
		let noise = x.sub(&delta_m, Some(&modulus));
		Ok(noise.infinity_norm_mod_q(&q))
	}

	/// `max(0, bits(q) - bits(norm) - 1)` where `norm` is the infinity norm
	/// of `t * x mod q`. A ciphertext with budget `<= 0` no longer decrypts
	/// reliably.
	pub fn invariant_noise_budget(&mut self, ciphertext: &Ciphertext) -> Result<u32> {
		self.ctx.require_valid()?;
		let bits = self.ctx.parameters().coeff_modulus().bit_width();
		let q = WideUint::from_u64(bits, self.ctx.parameters().coeff_modulus().value());
		let t = WideUint::from_u64(bits, self.ctx.parameters().plain_modulus().value());
		let modulus = self.modulus().clone();

		let x = self.compute_dot_product(ciphertext);
		let scaled = x.scalar_mul(&t, &modulus);
		let norm = scaled.infinity_norm_mod_q(&q);

		let q_bits = q.significant_bit_count() as u32;
		let norm_bits = norm.significant_bit_count() as u32;
		Ok(q_bits.saturating_sub(norm_bits).saturating_sub(1))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::encryptor::Encryptor;
	use crate::keys::KeyGenerator;
	use crate::parameters::{CoefficientModulus, DegreeType, EncryptionParametersBuilder, PlainModulus};

	fn ctx() -> Context {
		let params = EncryptionParametersBuilder::new()
			.set_poly_modulus_degree(DegreeType::D1024)
			.set_coefficient_modulus(CoefficientModulus::create(DegreeType::D1024, &[30]).unwrap().remove(0))
			.set_plain_modulus(PlainModulus::raw(257).unwrap())
			.build()
			.unwrap();
		Context::new(&params).unwrap()
	}

	#[test]
	fn decrypts_fresh_encryption() {
		let c = ctx();
		let keygen = KeyGenerator::new(&c).unwrap();
		let pk = keygen.create_public_key().unwrap();
		let encryptor = Encryptor::new(&c, pk).unwrap();
		let mut decryptor = Decryptor::new(&c, keygen.secret_key().clone()).unwrap();

		let pt = Plaintext::from_hex_string(c.parameters().coeff_modulus().bit_width(), "5").unwrap();
		let ct = encryptor.encrypt(&pt).unwrap();
		let decrypted = decryptor.decrypt(&ct).unwrap();
		assert_eq!(decrypted.get_coefficient(0), 5);
	}

	#[test]
	fn fresh_ciphertext_has_positive_noise_budget() {
		let c = ctx();
		let keygen = KeyGenerator::new(&c).unwrap();
		let pk = keygen.create_public_key().unwrap();
		let encryptor = Encryptor::new(&c, pk).unwrap();
		let mut decryptor = Decryptor::new(&c, keygen.secret_key().clone()).unwrap();

		let pt = Plaintext::from_hex_string(c.parameters().coeff_modulus().bit_width(), "1").unwrap();
		let ct = encryptor.encrypt(&pt).unwrap();
		let budget = decryptor.invariant_noise_budget(&ct).unwrap();
		assert!(budget > 0);
	}

	/// A coefficient modulus picked to *not* satisfy `q = 1 mod 2N`, so
	/// `enable_ntt` is false and `compute_dot_product` must take the
	/// Nussbaumer branch instead of the NTT one.
	fn nussbaumer_ctx() -> Context {
		use crate::parameters::Modulus;
		let params = EncryptionParametersBuilder::new()
			.set_poly_modulus_degree(DegreeType::D1024)
			.set_coefficient_modulus(Modulus::new(4_294_966_811).unwrap())
			.set_plain_modulus(PlainModulus::raw(257).unwrap())
			.build()
			.unwrap();
		Context::new(&params).unwrap()
	}

	#[test]
	fn decrypts_fresh_encryption_without_ntt() {
		let c = nussbaumer_ctx();
		assert!(!c.qualifiers().enable_ntt);
		assert!(c.qualifiers().enable_nussbaumer);

		let keygen = KeyGenerator::new(&c).unwrap();
		let pk = keygen.create_public_key().unwrap();
		let encryptor = Encryptor::new(&c, pk).unwrap();
		let mut decryptor = Decryptor::new(&c, keygen.secret_key().clone()).unwrap();

		let pt = Plaintext::from_hex_string(c.parameters().coeff_modulus().bit_width(), "5").unwrap();
		let ct = encryptor.encrypt(&pt).unwrap();
		let decrypted = decryptor.decrypt(&ct).unwrap();
		assert_eq!(decrypted.get_coefficient(0), 5);
	}
}
