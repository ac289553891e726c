//! CRT (SIMD-style) plaintext batching.
//!
//! Requires `enable_batching`: `t` prime with `2N | t-1`, so
//! `Z_t[X]/(X^N+1)` splits into `N` independent copies of `Z_t`. Mirrors
//! the source's `PolyCRTBuilder`, built on the same forward/inverse NTT
//! machinery as the coefficient-modulus fast-multiplication path, but run
//! over the plaintext modulus instead.

use crate::context::Context;
use crate::error::{Error, Result};
use crate::plaintext::Plaintext;
use crate::poly::Polynomial;
use crate::uint::WideUint;

/// Packs/unpacks `N` independent plaintext integers into a single
/// plaintext polynomial via a negacyclic NTT over the plaintext modulus.
pub struct PolyCrtBuilder {
	ctx: Context,
}

fn bit_reverse(mut x: usize, bits: u32) -> usize {
	let mut r = 0usize;
	for _ in 0..bits {
		r = (r << 1) | (x & 1);
		x >>= 1;
	}
	r
}

impl PolyCrtBuilder {
	/// Builds a CRT batcher for `ctx`. Fails with
	/// [`Error::UnsupportedConfiguration`] if `enable_batching` is not set.
	pub fn new(ctx: &Context) -> Result<Self> {
		ctx.require_valid()?;
		if !ctx.qualifiers().enable_batching {
			return Err(Error::UnsupportedConfiguration(
				"plain_modulus is not congruent to 1 mod 2N; batching is unavailable".into(),
			));
		}
		Ok(Self { ctx: ctx.clone() })
	}

	/// Number of independent slots: the ring dimension `N`.
	pub fn slot_count(&self) -> usize {
		self.ctx.n()
	}

	/// Packs `values` (each taken mod `t`) into a plaintext polynomial.
	/// Fewer than `N` values are zero-padded; more than `N` is an error.
	pub fn compose(&self, values: &[u64]) -> Result<Plaintext> {
		let n = self.slot_count();
		if values.len() > n {
			return Err(Error::InvalidArgument(format!(
				"{} values exceed the {n}-slot batch capacity",
				values.len()
			)));
		}
		let bits = self.ctx.parameters().plain_modulus().bit_width();
		let t = self.ctx.parameters().plain_modulus().value();
		let log_n = n.trailing_zeros();

		let mut poly = Polynomial::zero(n, bits);
		for (i, &v) in values.iter().enumerate() {
			let slot = bit_reverse(i, log_n);
			poly.set_coefficient(slot, &WideUint::from_u64(bits, v % t));
		}

		let tables = self
			.ctx
			.plain_ntt_tables()
			.expect("enable_batching guarantees plaintext NTT tables");
		tables.inverse_inplace(&mut poly);

		Ok(Plaintext::from_poly(poly))
	}

	/// Unpacks a plaintext polynomial produced by [`PolyCrtBuilder::compose`]
	/// back into its `N` slot values.
	pub fn decompose(&self, plaintext: &Plaintext) -> Result<Vec<u64>> {
		let n = self.slot_count();
		let log_n = n.trailing_zeros();

		let mut poly = plaintext.poly().clone();
		if poly.coeff_count() != n {
			poly.resize(n)?;
		}

		let tables = self
			.ctx
			.plain_ntt_tables()
			.expect("enable_batching guarantees plaintext NTT tables");
		tables.forward_inplace(&mut poly);

		let mut out = vec![0u64; n];
		for i in 0..n {
			let slot = bit_reverse(i, log_n);
			out[i] = poly.get_coefficient(slot).low_u64();
		}
		Ok(out)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::parameters::{CoefficientModulus, DegreeType, EncryptionParametersBuilder, PlainModulus};

	fn ctx() -> Context {
		let params = EncryptionParametersBuilder::new()
			.set_poly_modulus_degree(DegreeType::D1024)
			.set_coefficient_modulus(CoefficientModulus::create(DegreeType::D1024, &[30]).unwrap().remove(0))
			.set_plain_modulus(PlainModulus::batching(DegreeType::D1024, 20).unwrap())
			.build()
			.unwrap();
		Context::new(&params).unwrap()
	}

	#[test]
	fn batching_is_available_for_an_ntt_friendly_plain_modulus() {
		let c = ctx();
		assert!(c.qualifiers().enable_batching);
		let builder = PolyCrtBuilder::new(&c).unwrap();
		assert_eq!(builder.slot_count(), c.n());
	}

	#[test]
	fn compose_decompose_roundtrips() {
		let c = ctx();
		let builder = PolyCrtBuilder::new(&c).unwrap();
		let mut values = vec![0u64; builder.slot_count()];
		for (i, v) in values.iter_mut().enumerate().take(6) {
			*v = [2, 3, 5, 7, 11, 13][i];
		}

		let pt = builder.compose(&values).unwrap();
		let recovered = builder.decompose(&pt).unwrap();
		assert_eq!(recovered, values);
	}

	#[test]
	fn rejects_non_batching_plain_modulus() {
		let params = EncryptionParametersBuilder::new()
			.set_poly_modulus_degree(DegreeType::D1024)
			.set_coefficient_modulus(CoefficientModulus::create(DegreeType::D1024, &[30]).unwrap().remove(0))
			.set_plain_modulus(PlainModulus::raw(257).unwrap())
			.build()
			.unwrap();
		let c = Context::new(&params).unwrap();
		let err = PolyCrtBuilder::new(&c).unwrap_err();
		assert!(matches!(err, Error::UnsupportedConfiguration(_)));
	}

	#[test]
	fn too_many_values_is_rejected() {
		let c = ctx();
		let builder = PolyCrtBuilder::new(&c).unwrap();
		let err = builder.compose(&vec![1u64; builder.slot_count() + 1]).unwrap_err();
		assert!(matches!(err, Error::InvalidArgument(_)));
	}
}
