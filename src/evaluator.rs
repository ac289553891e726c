//! Homomorphic operations on ciphertexts.
//!
//! The source models BFV/CKKS dispatch through an `Evaluator` trait with
//! associated `Plaintext`/`Ciphertext` types (see `evaluator/mod.rs`,
//! `evaluator/bfv.rs`, `evaluator/ckks.rs`). This engine implements a
//! single scheme, so that trait collapses to one concrete struct; the
//! method names and shapes below are carried over unchanged. Galois-key
//! rotation and modulus-switching are out of scope (see `DESIGN.md`) and
//! are not implemented.

use crate::ciphertext::Ciphertext;
use crate::context::Context;
use crate::error::{Error, Result};
use crate::keys::{ring_multiply, RelinearizationKey};
use crate::plaintext::Plaintext;
use crate::poly::Polynomial;
use crate::uint::{ModulusDescriptor, WideUint};
use tracing::{debug, trace};

/// Performs homomorphic operations under a fixed, validated [`Context`].
pub struct Evaluator {
	ctx: Context,
}

impl Evaluator {
	/// Builds an evaluator for `ctx`.
	pub fn new(ctx: &Context) -> Result<Self> {
		ctx.require_valid()?;
		Ok(Self { ctx: ctx.clone() })
	}

	fn modulus(&self) -> &ModulusDescriptor {
		self.ctx.parameters().coeff_modulus().descriptor()
	}

	fn n(&self) -> usize {
		self.ctx.n()
	}

	fn bits(&self) -> usize {
		self.ctx.parameters().coeff_modulus().bit_width()
	}

	/// Coefficient-wise negation mod `q` on every element. Size preserved.
	pub fn negate(&self, a: &Ciphertext) -> Result<Ciphertext> {
		let modulus = self.modulus();
		let elements = a.elements().iter().map(|p| p.negate(modulus)).collect();
		Ok(Ciphertext::from_elements_unchecked(elements))
	}

	fn pad_to(&self, elements: &[Polynomial<'static>], size: usize) -> Vec<Polynomial<'static>> {
		let mut out: Vec<Polynomial<'static>> = elements.to_vec();
		while out.len() < size {
			out.push(Polynomial::zero(self.n(), self.bits()));
		}
		out
	}

	/// Coefficient-wise addition on matching indices; shorter operand is
	/// zero-padded. Output size is the max of the two input sizes.
	pub fn add(&self, a: &Ciphertext, b: &Ciphertext) -> Result<Ciphertext> {
		let modulus = self.modulus();
		let size = a.size().max(b.size());
		let pa = self.pad_to(a.elements(), size);
		let pb = self.pad_to(b.elements(), size);
		let out = pa.iter().zip(pb.iter()).map(|(x, y)| x.add(y, Some(modulus))).collect();
		Ok(Ciphertext::from_elements_unchecked(out))
	}

	/// Coefficient-wise subtraction; shorter operand is zero-padded.
	pub fn sub(&self, a: &Ciphertext, b: &Ciphertext) -> Result<Ciphertext> {
		let modulus = self.modulus();
		let size = a.size().max(b.size());
		let pa = self.pad_to(a.elements(), size);
		let pb = self.pad_to(b.elements(), size);
		let out = pa.iter().zip(pb.iter()).map(|(x, y)| x.sub(y, Some(modulus))).collect();
		Ok(Ciphertext::from_elements_unchecked(out))
	}

	/// A modulus wide enough to hold the exact (unreduced by `q`) tensor
	/// product `t * sum_i c_i*d_j` without wraparound: `2*bits(q) +
	/// bits(t)` plus a generous guard band, rounded up to a pseudo-Mersenne
	/// `2^k - 1` so reduction under it is a cheap no-op in practice.
	fn lift_modulus(&self) -> ModulusDescriptor {
		let bits = self.bits();
		let t_bits = self.ctx.parameters().plain_modulus().bit_width();
		let lift_bits = 2 * bits + t_bits + 64;
		let mut all_ones = WideUint::zero(lift_bits);
		for i in 0..lift_bits {
			all_ones.set_bit(i, true);
		}
		ModulusDescriptor::new(all_ones).expect("2^k - 1 is always a valid modulus")
	}

	/// Ciphertext multiplication: output size `M + K - 1` for inputs of
	/// size `M`, `K`. Element `k` is `round((t/q) * sum_{i+j=k} c_i*d_j)`,
	/// where the tensor sum is computed exactly (lifted well above `q`),
	/// then scaled by `t`, divided by `q` with rounding, and reduced mod
	/// `q` — the "lift, multiply, scale, reduce" sequence.
	pub fn multiply(&self, a: &Ciphertext, b: &Ciphertext) -> Result<Ciphertext> {
		let out_size = a.size() + b.size() - 1;
		trace!(a_size = a.size(), b_size = b.size(), out_size, "homomorphic multiply");
		let lift = self.lift_modulus();
		let n = self.n();
		let lift_bits = lift.value().bit_width();

		let mut raw: Vec<Polynomial<'static>> = (0..out_size).map(|_| Polynomial::zero(n, lift_bits)).collect();
		for (i, ci) in a.elements().iter().enumerate() {
			let ci_lifted = lift_poly(ci, lift_bits);
			for (j, dj) in b.elements().iter().enumerate() {
				let dj_lifted = lift_poly(dj, lift_bits);
				let term = ci_lifted.mul_nonfft(&dj_lifted, &lift);
				raw[i + j] = raw[i + j].add(&term, Some(&lift));
			}
		}

		let q = WideUint::from_u64(self.bits(), self.ctx.parameters().coeff_modulus().value());
		let t = WideUint::from_u64(self.bits(), self.ctx.parameters().plain_modulus().value());
		let half_q = q.shr(1);
		let modulus = self.modulus();

		let elements = raw
			.into_iter()
			.map(|poly| scale_round_reduce(&poly, &t, &q, &half_q, modulus, self.bits()))
			.collect();
		Ok(Ciphertext::from_elements_unchecked(elements))
	}

	/// `multiply(a, a)`.
	pub fn square(&self, a: &Ciphertext) -> Result<Ciphertext> {
		self.multiply(a, a)
	}

	/// Collapses a size-3 ciphertext (the output of a single `multiply`)
	/// down to size 2 using `relin_keys`, which must target secret-key
	/// power 2 — the power a fresh product's top element is attached to.
	///
	/// `relin_keys` encodes a noisy product of `s^power` for a *specific*
	/// `power` (see [`crate::keys::RelinearizationKey::power`]); applying it
	/// to collapse an element attached to any other power would silently
	/// produce a wrong plaintext rather than an error. Collapsing a
	/// ciphertext of size 4 or more down to 2 needs a chain of relinearization
	/// keys, one set per power being eliminated (see
	/// [`crate::keys::KeyGenerator::create_relinearization_keys_for_power`]
	/// and `examples/original_source/SEAL/evaluator.h`'s relinearize doc
	/// comment) — this crate does not build that chain, so larger inputs are
	/// rejected rather than silently collapsed with the wrong key.
	///
	/// A no-op if `a.size() == target_size`. `target_size` must be 2; any
	/// other value is rejected.
	pub fn relinearize(&self, a: &Ciphertext, relin_keys: &RelinearizationKey, target_size: usize) -> Result<Ciphertext> {
		if target_size < 2 {
			return Err(Error::InvalidArgument("relinearization target size must be at least 2".into()));
		}
		if a.size() == target_size {
			trace!(size = a.size(), "relinearize no-op, already at target size");
			return Ciphertext::new(a.elements().to_vec());
		}
		if target_size != 2 || a.size() != 3 {
			return Err(Error::UnsupportedConfiguration(format!(
				"relinearize only supports collapsing a size-3 ciphertext to size 2 (requested size {} -> {}); \
				 collapsing size {} needs a chain of per-power relinearization keys this crate does not build",
				a.size(),
				target_size,
				a.size()
			)));
		}
		if relin_keys.power() != 2 {
			return Err(Error::UnsupportedConfiguration(format!(
				"relin_keys target secret-key power {} but a size-3 ciphertext's top element is attached to s^2",
				relin_keys.power()
			)));
		}
		let elements = self.collapse_top(a.elements().to_vec(), relin_keys)?;
		debug!("relinearized size-3 ciphertext down to size 2");
		Ciphertext::new(elements)
	}

	fn collapse_top(&self, mut elements: Vec<Polynomial<'static>>, relin_keys: &RelinearizationKey) -> Result<Vec<Polynomial<'static>>> {
		let modulus = self.modulus();
		let top = elements.pop().expect("at least one element to collapse");
		let w = relin_keys.decomposition_bit_count();
		let entries = relin_keys.entries();

		let mut acc0 = Polynomial::zero(self.n(), self.bits());
		let mut acc_last = Polynomial::zero(self.n(), self.bits());

		for (k, entry) in entries.iter().enumerate() {
			let chunk = decompose_chunk(&top, k as u32, w, self.bits());
			if chunk.is_zero() {
				continue;
			}
			let term0 = ring_multiply(&chunk, &entry.e0, &self.ctx, modulus);
			let term1 = ring_multiply(&chunk, &entry.e1, &self.ctx, modulus);
			acc0 = acc0.add(&term0, Some(modulus));
			acc_last = acc_last.add(&term1, Some(modulus));
		}

		let last_idx = elements.len() - 1;
		elements[0] = elements[0].add(&acc0, Some(modulus));
		elements[last_idx] = elements[last_idx].add(&acc_last, Some(modulus));
		Ok(elements)
	}

	/// Sums `ciphertexts` pairwise.
	pub fn add_many(&self, ciphertexts: &[Ciphertext]) -> Result<Ciphertext> {
		if ciphertexts.is_empty() {
			return Err(Error::InvalidArgument("add_many requires at least one ciphertext".into()));
		}
		let mut acc = ciphertexts[0].clone();
		for c in &ciphertexts[1..] {
			acc = self.add(&acc, c)?;
		}
		Ok(acc)
	}

	/// Multiplies `ciphertexts` in a tree schedule, relinearizing back to
	/// size 2 after every multiplication.
	pub fn multiply_many(&self, ciphertexts: &[Ciphertext], relin_keys: &RelinearizationKey) -> Result<Ciphertext> {
		if ciphertexts.is_empty() {
			return Err(Error::InvalidArgument("multiply_many requires at least one ciphertext".into()));
		}
		let mut level: Vec<Ciphertext> = ciphertexts.to_vec();
		while level.len() > 1 {
			let mut next = Vec::with_capacity(level.len().div_ceil(2));
			let mut iter = level.into_iter();
			while let Some(a) = iter.next() {
				if let Some(b) = iter.next() {
					let product = self.multiply(&a, &b)?;
					next.push(self.relinearize(&product, relin_keys, 2)?);
				} else {
					next.push(a);
				}
			}
			level = next;
		}
		Ok(level.remove(0))
	}

	/// Raises `a` to `exponent` via depth-optimal repeated squaring,
	/// relinearizing back to size 2 after every multiplication.
	pub fn exponentiate(&self, a: &Ciphertext, exponent: u64, relin_keys: &RelinearizationKey) -> Result<Ciphertext> {
		if exponent == 0 {
			return Err(Error::InvalidArgument("exponent must be positive".into()));
		}
		let mut result: Option<Ciphertext> = None;
		let mut base = a.clone();
		let mut e = exponent;
		while e > 0 {
			if e & 1 == 1 {
				result = Some(match result {
					Some(r) => self.relinearize(&self.multiply(&r, &base)?, relin_keys, 2)?,
					None => base.clone(),
				});
			}
			e >>= 1;
			if e > 0 {
				base = self.relinearize(&self.multiply(&base, &base)?, relin_keys, 2)?;
			}
		}
		Ok(result.expect("exponent > 0 guarantees at least one squaring"))
	}

	fn scaled_plaintext(&self, b: &Plaintext) -> Polynomial<'static> {
		let delta = &self.ctx.constants().expect("validated context has constants").delta;
		let modulus = self.modulus();
		let n = self.n();
		let bits = self.bits();
		let mut scaled = Polynomial::zero(n, bits);
		for i in 0..n {
			let coeff = if i < b.poly().coeff_count() { b.poly().get_coefficient(i) } else { WideUint::zero(bits) };
			scaled.set_coefficient(i, &modulus.mul_mod(&coeff, delta));
		}
		scaled
	}

	/// `a + Delta*b`, added into `a`'s first element.
	pub fn add_plain(&self, a: &Ciphertext, b: &Plaintext) -> Result<Ciphertext> {
		let modulus = self.modulus();
		let scaled = self.scaled_plaintext(b);
		let mut elements = a.elements().to_vec();
		elements[0] = elements[0].add(&scaled, Some(modulus));
		Ok(Ciphertext::from_elements_unchecked(elements))
	}

	/// `a - Delta*b`, subtracted from `a`'s first element.
	pub fn sub_plain(&self, a: &Ciphertext, b: &Plaintext) -> Result<Ciphertext> {
		let modulus = self.modulus();
		let scaled = self.scaled_plaintext(b);
		let mut elements = a.elements().to_vec();
		elements[0] = elements[0].sub(&scaled, Some(modulus));
		Ok(Ciphertext::from_elements_unchecked(elements))
	}

	/// Multiplies every element of `a` by plaintext `b` (treated as a
	/// coefficient polynomial, not Delta-scaled). Forbidden for a zero
	/// plaintext — a fresh encryption of zero is the caller's job.
	pub fn multiply_plain(&self, a: &Ciphertext, b: &Plaintext) -> Result<Ciphertext> {
		if b.poly().is_zero() {
			return Err(Error::InvalidArgument("multiply_plain by zero is forbidden".into()));
		}
		let modulus = self.modulus();
		let mut coeff_poly = Polynomial::zero(self.n(), self.bits());
		for i in 0..self.n() {
			let c = if i < b.poly().coeff_count() { b.poly().get_coefficient(i) } else { WideUint::zero(self.bits()) };
			coeff_poly.set_coefficient(i, &c);
		}
		let elements = a
			.elements()
			.iter()
			.map(|e| ring_multiply(e, &coeff_poly, &self.ctx, modulus))
			.collect();
		Ok(Ciphertext::from_elements_unchecked(elements))
	}

	/// Transforms every element of `a` into NTT domain. Available only
	/// when the NTT qualifier is set.
	pub fn transform_to_ntt(&self, a: &Ciphertext) -> Result<Ciphertext> {
		let tables = self
			.ctx
			.coeff_ntt_tables()
			.ok_or_else(|| Error::UnsupportedConfiguration("NTT not available for this parameter set".into()))?;
		let mut ct = a.clone();
		for e in ct.elements_mut().iter_mut() {
			tables.forward_inplace(e);
		}
		ct.set_ntt_form(true);
		Ok(ct)
	}

	/// Transforms every element of `a` out of NTT domain.
	pub fn transform_from_ntt(&self, a: &Ciphertext) -> Result<Ciphertext> {
		let tables = self
			.ctx
			.coeff_ntt_tables()
			.ok_or_else(|| Error::UnsupportedConfiguration("NTT not available for this parameter set".into()))?;
		let mut ct = a.clone();
		for e in ct.elements_mut().iter_mut() {
			tables.inverse_inplace(e);
		}
		ct.set_ntt_form(false);
		Ok(ct)
	}

	/// Pointwise-multiplies every element of an NTT-domain ciphertext `a`
	/// by an NTT-domain plaintext `b_ntt` (the caller transforms the
	/// plaintext itself; see [`crate::ntt::NttTables::transform_scaled_plaintext`]).
	pub fn multiply_plain_ntt(&self, a: &Ciphertext, b_ntt: &Plaintext) -> Result<Ciphertext> {
		let tables = self
			.ctx
			.coeff_ntt_tables()
			.ok_or_else(|| Error::UnsupportedConfiguration("NTT not available for this parameter set".into()))?;
		if !a.is_ntt_form() {
			return Err(Error::InvalidState("ciphertext is not in NTT form".into()));
		}
		let elements = a.elements().iter().map(|e| tables.pointwise_multiply(e, b_ntt.poly())).collect();
		let mut ct = Ciphertext::from_elements_unchecked(elements);
		ct.set_ntt_form(true);
		Ok(ct)
	}
}

fn lift_poly(p: &Polynomial, target_bits: usize) -> Polynomial<'static> {
	let n = p.coeff_count();
	let mut out = Polynomial::zero(n, target_bits);
	for i in 0..n {
		let c = p.get_coefficient(i);
		out.set_coefficient(i, &WideUint::from_limbs(target_bits, c.limbs().to_vec()));
	}
	out
}

fn scale_round_reduce(
	poly: &Polynomial,
	t: &WideUint,
	q: &WideUint,
	half_q: &WideUint,
	modulus: &ModulusDescriptor,
	result_bits: usize,
) -> Polynomial<'static> {
	let n = poly.coeff_count();
	let mut out = Polynomial::zero(n, result_bits);
	for i in 0..n {
		let raw = poly.get_coefficient(i);
		let t_raw = raw.mul_wide(t);
		let wide_bits = t_raw.bit_width() + 1;
		let (biased, _) = t_raw.add(half_q, wide_bits);
		let q_wide = WideUint::from_limbs(wide_bits, q.limbs().to_vec());
		let (quotient, _) = biased.div_rem(&q_wide).expect("q is nonzero");
		let reduced = modulus.reduce(&quotient);
		out.set_coefficient(i, &reduced);
	}
	out
}

/// Extracts the `k`-th base-`2^w` chunk of every coefficient of `poly`.
fn decompose_chunk(poly: &Polynomial, k: u32, w: u32, bits: usize) -> Polynomial<'static> {
	let n = poly.coeff_count();
	let mut out = Polynomial::zero(n, bits);
	for i in 0..n {
		let c = poly.get_coefficient(i);
		let shifted = c.shr((k * w) as usize);
		let mut chunk = WideUint::zero(bits);
		for b in 0..(w as usize).min(bits) {
			if shifted.get_bit(b) {
				chunk.set_bit(b, true);
			}
		}
		out.set_coefficient(i, &chunk);
	}
	out
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::decryptor::Decryptor;
	use crate::encryptor::Encryptor;
	use crate::keys::KeyGenerator;
	use crate::parameters::{CoefficientModulus, DegreeType, EncryptionParametersBuilder, PlainModulus};

	fn ctx() -> Context {
		let params = EncryptionParametersBuilder::new()
			.set_poly_modulus_degree(DegreeType::D1024)
			.set_coefficient_modulus(CoefficientModulus::create(DegreeType::D1024, &[40]).unwrap().remove(0))
			.set_plain_modulus(PlainModulus::raw(257).unwrap())
			.set_decomposition_bit_count(16)
			.build()
			.unwrap();
		Context::new(&params).unwrap()
	}

	fn encrypt(ctx: &Context, value: &str) -> (Ciphertext, KeyGenerator) {
		let keygen = KeyGenerator::new(ctx).unwrap();
		let pk = keygen.create_public_key().unwrap();
		let encryptor = Encryptor::new(ctx, pk).unwrap();
		let pt = Plaintext::from_hex_string(ctx.parameters().coeff_modulus().bit_width(), value).unwrap();
		(encryptor.encrypt(&pt).unwrap(), keygen)
	}

	#[test]
	fn add_then_decrypt_sums_plaintexts() {
		let c = ctx();
		let (ct_a, keygen) = encrypt(&c, "5");
		let pk2 = keygen.create_public_key().unwrap();
		let encryptor2 = Encryptor::new(&c, pk2).unwrap();
		let pt_b = Plaintext::from_hex_string(c.parameters().coeff_modulus().bit_width(), "7").unwrap();
		let ct_b = encryptor2.encrypt(&pt_b).unwrap();

		let evaluator = Evaluator::new(&c).unwrap();
		let sum = evaluator.add(&ct_a, &ct_b).unwrap();

		let mut decryptor = Decryptor::new(&c, keygen.secret_key().clone()).unwrap();
		let decrypted = decryptor.decrypt(&sum).unwrap();
		assert_eq!(decrypted.get_coefficient(0), 12);
	}

	#[test]
	fn multiply_then_decrypt_multiplies_plaintexts() {
		let c = ctx();
		let (ct_a, keygen) = encrypt(&c, "5");
		let pk2 = keygen.create_public_key().unwrap();
		let encryptor2 = Encryptor::new(&c, pk2).unwrap();
		let pt_b = Plaintext::from_hex_string(c.parameters().coeff_modulus().bit_width(), "7").unwrap();
		let ct_b = encryptor2.encrypt(&pt_b).unwrap();

		let evaluator = Evaluator::new(&c).unwrap();
		let product = evaluator.multiply(&ct_a, &ct_b).unwrap();
		assert_eq!(product.size(), 3);

		let mut decryptor = Decryptor::new(&c, keygen.secret_key().clone()).unwrap();
		let decrypted = decryptor.decrypt(&product).unwrap();
		assert_eq!(decrypted.get_coefficient(0), 35);
	}

	#[test]
	fn relinearize_restores_size_two_and_preserves_plaintext() {
		let c = ctx();
		let (ct_a, keygen) = encrypt(&c, "5");
		let pk2 = keygen.create_public_key().unwrap();
		let encryptor2 = Encryptor::new(&c, pk2).unwrap();
		let pt_b = Plaintext::from_hex_string(c.parameters().coeff_modulus().bit_width(), "7").unwrap();
		let ct_b = encryptor2.encrypt(&pt_b).unwrap();

		let evaluator = Evaluator::new(&c).unwrap();
		let product = evaluator.multiply(&ct_a, &ct_b).unwrap();
		let relin_keys = keygen.create_relinearization_keys().unwrap();
		let relinearized = evaluator.relinearize(&product, &relin_keys, 2).unwrap();
		assert_eq!(relinearized.size(), 2);

		let mut decryptor = Decryptor::new(&c, keygen.secret_key().clone()).unwrap();
		let decrypted = decryptor.decrypt(&relinearized).unwrap();
		assert_eq!(decrypted.get_coefficient(0), 35);
	}

	#[test]
	fn multiply_plain_by_zero_is_rejected() {
		let c = ctx();
		let (ct_a, _keygen) = encrypt(&c, "5");
		let evaluator = Evaluator::new(&c).unwrap();
		let zero = Plaintext::new(c.n(), c.parameters().coeff_modulus().bit_width());
		let err = evaluator.multiply_plain(&ct_a, &zero).unwrap_err();
		assert!(matches!(err, Error::InvalidArgument(_)));
	}

	#[test]
	fn relinearize_rejects_a_chained_product_of_size_five() {
		let c = ctx();
		let (ct_a, keygen) = encrypt(&c, "5");
		let pk2 = keygen.create_public_key().unwrap();
		let encryptor2 = Encryptor::new(&c, pk2).unwrap();
		let pt_b = Plaintext::from_hex_string(c.parameters().coeff_modulus().bit_width(), "7").unwrap();
		let ct_b = encryptor2.encrypt(&pt_b).unwrap();

		let evaluator = Evaluator::new(&c).unwrap();
		// Two unrelinearized size-3 products multiplied together reach size
		// 5 (3 + 3 - 1), entirely through the public API.
		let product_a = evaluator.multiply(&ct_a, &ct_b).unwrap();
		let product_b = evaluator.multiply(&ct_a, &ct_b).unwrap();
		let chained = evaluator.multiply(&product_a, &product_b).unwrap();
		assert_eq!(chained.size(), 5);

		let relin_keys = keygen.create_relinearization_keys().unwrap();
		let err = evaluator.relinearize(&chained, &relin_keys, 2).unwrap_err();
		assert!(matches!(err, Error::UnsupportedConfiguration(_)));
	}

	#[test]
	fn relinearize_rejects_keys_for_the_wrong_power() {
		let c = ctx();
		let (ct_a, keygen) = encrypt(&c, "5");
		let pk2 = keygen.create_public_key().unwrap();
		let encryptor2 = Encryptor::new(&c, pk2).unwrap();
		let pt_b = Plaintext::from_hex_string(c.parameters().coeff_modulus().bit_width(), "7").unwrap();
		let ct_b = encryptor2.encrypt(&pt_b).unwrap();

		let evaluator = Evaluator::new(&c).unwrap();
		let product = evaluator.multiply(&ct_a, &ct_b).unwrap();
		let wrong_power_keys = keygen.create_relinearization_keys_for_power(3).unwrap();
		let err = evaluator.relinearize(&product, &wrong_power_keys, 2).unwrap_err();
		assert!(matches!(err, Error::UnsupportedConfiguration(_)));
	}

	#[test]
	fn relinearize_is_a_no_op_when_already_at_target_size() {
		let c = ctx();
		let (ct_a, keygen) = encrypt(&c, "5");
		let evaluator = Evaluator::new(&c).unwrap();
		let relin_keys = keygen.create_relinearization_keys().unwrap();
		let same = evaluator.relinearize(&ct_a, &relin_keys, 2).unwrap();
		assert_eq!(same.size(), ct_a.size());

		let mut decryptor = Decryptor::new(&c, keygen.secret_key().clone()).unwrap();
		assert_eq!(decryptor.decrypt(&same).unwrap().get_coefficient(0), 5);
	}
}
