//! Asymmetric encryption under a [`crate::keys::PublicKey`].
//!
//! The source's `Encryptor<T>` dispatches symmetric vs. asymmetric
//! encryption through a phantom-typed marker-trait hierarchy
//! (`Sym`/`Asym`/`SymAsym`). This engine only ever encrypts under a public
//! key, so that machinery collapses to a single concrete type; see
//! `DESIGN.md` for the simplification note.

use crate::ciphertext::Ciphertext;
use crate::context::Context;
use crate::error::Result;
use crate::keys::{ring_multiply, PublicKey};
use crate::plaintext::Plaintext;
use crate::poly::Polynomial;
use crate::rng::{gaussian_poly, ternary_poly};
use crate::uint::WideUint;
use tracing::trace;

/// Encrypts plaintexts into fresh, size-2 ciphertexts under a public key.
pub struct Encryptor {
	ctx: Context,
	public_key: PublicKey,
}

impl Encryptor {
	/// Builds an encryptor for `public_key` under `ctx`.
	pub fn new(ctx: &Context, public_key: PublicKey) -> Result<Self> {
		ctx.require_valid()?;
		Ok(Self { ctx: ctx.clone(), public_key })
	}

	/// Encrypts `plaintext`, producing a size-2 ciphertext
	/// `(p0*u + t*e1 + Delta*m, p1*u + t*e2)`.
	///
	/// `m` is first lifted by upper-half folding: any plaintext coefficient
	/// at least `ceil(t/2)` is re-expressed as `coeff + (q - t*Delta)` so it
	/// lands in the upper half of `q`, matching how decryption folds back.
	pub fn encrypt(&self, plaintext: &Plaintext) -> Result<Ciphertext> {
		self.ctx.require_valid()?;
		trace!(n = self.ctx.n(), "encrypting plaintext");
		let params = self.ctx.parameters();
		let n = self.ctx.n();
		let bits = params.coeff_modulus().bit_width();
		let q = WideUint::from_u64(bits, params.coeff_modulus().value());
		let t = WideUint::from_u64(bits, params.plain_modulus().value());
		let modulus = params.coeff_modulus().descriptor();
        let constants = self.ctx.constants()?;

		let mut rng = params.random_generator_factory().create();
		let u = ternary_poly(n, bits, &q, rng.as_mut());
		let e1 = gaussian_poly(n, bits, &q, params.noise_standard_deviation(), params.noise_max_deviation(), rng.as_mut());
		let e2 = gaussian_poly(n, bits, &q, params.noise_standard_deviation(), params.noise_max_deviation(), rng.as_mut());

		let lifted = self.upper_half_fold(plaintext, &constants.delta, &constants.upper_half_increment);

		let p0_u = ring_multiply(self.public_key.p0(), &u, &self.ctx, modulus);
		let t_e1 = e1.scalar_mul(&t, modulus);
		let c0 = p0_u.add(&t_e1, Some(modulus)).add(&lifted, Some(modulus));

		let p1_u = ring_multiply(self.public_key.p1(), &u, &self.ctx, modulus);
		let t_e2 = e2.scalar_mul(&t, modulus);
		let c1 = p1_u.add(&t_e2, Some(modulus));

		Ciphertext::new(vec![c0, c1])
	}

	/// Computes `Delta * m`, folding any coefficient `>= ceil(t/2)` into the
	/// upper half of `q` by adding `upper_half_increment`.
	fn upper_half_fold(&self, plaintext: &Plaintext, delta: &WideUint, upper_half_increment: &WideUint) -> Polynomial<'static> {
		let params = self.ctx.parameters();
		let n = self.ctx.n();
		let bits = params.coeff_modulus().bit_width();
		let modulus = params.coeff_modulus().descriptor();
		let t = params.plain_modulus().value();
		let half_t = t.div_ceil(2);

		let mut scaled = Polynomial::zero(n, bits);
		for i in 0..n {
			let coeff = if i < plaintext.poly().coeff_count() {
				plaintext.poly().get_coefficient(i).low_u64()
			} else {
				0
			};
			let scaled_coeff = modulus.mul_mod(&WideUint::from_u64(bits, coeff), delta);
			let folded = if coeff >= half_t {
				modulus.add_mod(&scaled_coeff, upper_half_increment)
			} else {
				scaled_coeff
			};
			scaled.set_coefficient(i, &folded);
		}
		scaled
	}
}

#[cfg(test)]
mod tests {
	use super::*;
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
	fn encrypts_to_fresh_size_two_ciphertext() {
		let c = ctx();
		let keygen = KeyGenerator::new(&c).unwrap();
		let pk = keygen.create_public_key().unwrap();
		let encryptor = Encryptor::new(&c, pk).unwrap();

		let pt = Plaintext::from_hex_string(c.parameters().coeff_modulus().bit_width(), "5").unwrap();
		let ct = encryptor.encrypt(&pt).unwrap();
		assert_eq!(ct.size(), 2);
		assert_eq!(ct.coeff_count(), c.n());
	}
}
