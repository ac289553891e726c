//! Negacyclic Number-Theoretic Transform engine.
//!
//! Requires `q ≡ 1 (mod 2N)`; table construction searches for a primitive
//! `2N`-th root of unity mod `q`. When none exists, [`NttTables::try_new`]
//! returns [`Error::UnsupportedConfiguration`] and the caller falls back to
//! the Nussbaumer engine ([`crate::nussbaumer`]).

use crate::error::{Error, Result};
use crate::poly::Polynomial;
use crate::uint::{ModulusDescriptor, WideUint};

/// Upper bound on candidates tried while searching for a primitive root.
/// Any NTT-friendly prime used in practice yields a witness well within
/// this bound; exceeding it means the modulus does not actually support
/// NTT despite satisfying `q ≡ 1 (mod 2N)`.
const MAX_ROOT_CANDIDATES: u64 = 1 << 20;

/// Precomputed tables for the forward/inverse negacyclic NTT over a fixed
/// `(N, q)` pair. Immutable once constructed.
#[derive(Debug, Clone)]
pub struct NttTables {
	n: usize,
	log_n: usize,
	modulus: ModulusDescriptor,
	root: WideUint<'static>,
	root_inv: WideUint<'static>,
	root_powers: Vec<WideUint<'static>>,
	inv_root_powers: Vec<WideUint<'static>>,
	n_inv: WideUint<'static>,
}

fn bit_reverse(mut x: usize, bits: u32) -> usize {
	let mut r = 0usize;
	for _ in 0..bits {
		r = (r << 1) | (x & 1);
		x >>= 1;
	}
	r
}

impl NttTables {
	/// Builds NTT tables for ring dimension `n` (a power of two) and
	/// modulus descriptor `modulus`.
	///
	/// Fails with [`Error::UnsupportedConfiguration`] if `q` is not
	/// congruent to 1 mod `2n`, or if no primitive `2n`-th root of unity is
	/// found within [`MAX_ROOT_CANDIDATES`] attempts.
	pub fn try_new(n: usize, modulus: ModulusDescriptor) -> Result<Self> {
		if n == 0 || !n.is_power_of_two() {
			return Err(Error::InvalidArgument("NTT dimension must be a power of two".into()));
		}
		let log_n = n.trailing_zeros();
		let q = modulus.value().clone_owned();
		let bits = q.bit_width();

		let two_n = WideUint::from_u64(bits, 2 * n as u64);
		let q_minus_1 = q.sub(&WideUint::from_u64(bits, 1), bits).0;
		let (exponent, remainder) = q_minus_1.div_rem(&two_n)?;
		if !remainder.is_zero() {
			return Err(Error::UnsupportedConfiguration(
				"coefficient modulus is not congruent to 1 mod 2N".into(),
			));
		}
		let exponent = exponent.low_u64();

		let root = find_primitive_root(&modulus, n, exponent, bits)
			.ok_or_else(|| Error::UnsupportedConfiguration("no primitive 2N-th root of unity found".into()))?;
		let root_inv = modulus.inverse(&root)?;
		let n_inv = modulus.inverse(&WideUint::from_u64(bits, n as u64))?;

		let mut root_powers = Vec::with_capacity(n);
		let mut inv_root_powers = Vec::with_capacity(n);
		for j in 0..n {
			let rev = bit_reverse(j, log_n) as u64;
			root_powers.push(modulus.pow_mod(&root, rev));
			inv_root_powers.push(modulus.pow_mod(&root_inv, rev));
		}

		Ok(Self {
			n,
			log_n: log_n as usize,
			modulus,
			root,
			root_inv,
			root_powers,
			inv_root_powers,
			n_inv,
		})
	}

	/// Ring dimension.
	pub fn n(&self) -> usize {
		self.n
	}

	/// The modulus descriptor these tables were built for.
	pub fn modulus(&self) -> &ModulusDescriptor {
		&self.modulus
	}

	/// The primitive 2N-th root of unity used to build this table.
	pub fn root(&self) -> &WideUint<'static> {
		&self.root
	}

	/// Forward negacyclic NTT, in place. Iterative Cooley-Tukey
	/// decimation-in-frequency, following the classic layout: at layer
	/// `m` (a power of two from 1 to n/2), butterflies combine blocks of
	/// size `2t` (`t = n/(2m)`) using twiddle `root_powers[m + i]`.
	pub fn forward_inplace(&self, poly: &mut Polynomial) {
		assert_eq!(poly.coeff_count(), self.n);
		let mut values: Vec<WideUint<'static>> = (0..self.n).map(|i| poly.get_coefficient(i)).collect();

		let mut t = self.n / 2;
		let mut m = 1usize;
		while m < self.n {
			let mut j1 = 0usize;
			for i in 0..m {
				let w = &self.root_powers[m + i];
				for j in j1..j1 + t {
					let u = values[j].clone_owned();
					let v = self.modulus.mul_mod(&values[j + t], w);
					values[j] = self.modulus.add_mod(&u, &v);
					values[j + t] = self.modulus.sub_mod(&u, &v);
				}
				j1 += 2 * t;
			}
			t /= 2;
			m *= 2;
		}

		for (i, v) in values.into_iter().enumerate() {
			poly.set_coefficient(i, &v);
		}
	}

	/// Inverse negacyclic NTT, in place. Gentleman-Sande decimation-in-time,
	/// followed by a scalar multiplication by `n^-1 mod q`.
	pub fn inverse_inplace(&self, poly: &mut Polynomial) {
		assert_eq!(poly.coeff_count(), self.n);
		let mut values: Vec<WideUint<'static>> = (0..self.n).map(|i| poly.get_coefficient(i)).collect();

		let mut t = 1usize;
		let mut m = self.n;
		while m > 1 {
			let h = m / 2;
			let mut j1 = 0usize;
			for i in 0..h {
				let w = &self.inv_root_powers[h + i];
				for j in j1..j1 + t {
					let u = values[j].clone_owned();
					let v = values[j + t].clone_owned();
					values[j] = self.modulus.add_mod(&u, &v);
					let diff = self.modulus.sub_mod(&u, &v);
					values[j + t] = self.modulus.mul_mod(&diff, w);
				}
				j1 += 2 * t;
			}
			t *= 2;
			m /= 2;
		}

		for v in values.iter_mut() {
			*v = self.modulus.mul_mod(v, &self.n_inv);
		}

		for (i, v) in values.into_iter().enumerate() {
			poly.set_coefficient(i, &v);
		}
	}

	/// Pointwise (dyadic) product of two polynomials already in NTT
	/// domain.
	pub fn pointwise_multiply(&self, a: &Polynomial, b: &Polynomial) -> Polynomial<'static> {
		a.dyadic_product(b, &self.modulus)
	}

	/// Transforms `plaintext`, scaled by `delta`, into NTT domain: used
	/// when a caller wants the `Δ·m` term in encryption expressed in the
	/// NTT domain directly.
	pub fn transform_scaled_plaintext(&self, plaintext: &Polynomial, delta: &WideUint) -> Polynomial<'static> {
		let mut scaled = plaintext.scalar_mul(delta, &self.modulus);
		self.forward_inplace(&mut scaled);
		scaled
	}

	/// NTT-domain "dot product" `Σ a_j * b_j`, used during decryption to
	/// compute `Σ c_j · s^j` when operands are already transformed.
	pub fn dot_product(&self, a: &[Polynomial], b: &[Polynomial]) -> Polynomial<'static> {
		assert_eq!(a.len(), b.len());
		let mut acc = Polynomial::zero(self.n, a[0].coeff_bit_width());
		for (x, y) in a.iter().zip(b.iter()) {
			let term = self.pointwise_multiply(x, y);
			acc = acc.add(&term, Some(&self.modulus));
		}
		acc
	}
}

fn find_primitive_root(
	modulus: &ModulusDescriptor,
	n: usize,
	exponent: u64,
	bits: usize,
) -> Option<WideUint<'static>> {
	for g in 2..=MAX_ROOT_CANDIDATES {
		let candidate = modulus.pow_mod(&WideUint::from_u64(bits, g), exponent);
		if candidate.is_zero() {
			continue;
		}
		let check = modulus.pow_mod(&candidate, n as u64);
		let neg_one = modulus.sub_mod(&WideUint::zero(bits), &WideUint::from_u64(bits, 1));
		if check == neg_one {
			return Some(candidate);
		}
	}
	None
}

#[cfg(test)]
mod tests {
	use super::*;

	fn tables(n: usize, q: u64) -> NttTables {
		let modulus = ModulusDescriptor::new(WideUint::from_u64(64, q)).unwrap();
		NttTables::try_new(n, modulus).unwrap()
	}

	#[test]
	fn roundtrip_ntt() {
		// 12289 is a classic NTT-friendly prime for n = 8 (12289 = 1 + 12*1024, and 2*8 | 12288).
		let t = tables(8, 12289);
		let original = Polynomial::from_u64_coeffs(64, &[1, 2, 3, 4, 5, 6, 7, 8]);
		let mut p = original.clone();
		t.forward_inplace(&mut p);
		t.inverse_inplace(&mut p);
		assert_eq!(p, original);
	}

	#[test]
	fn pointwise_multiply_matches_negacyclic_schoolbook() {
		let t = tables(8, 12289);
		let m = ModulusDescriptor::new(WideUint::from_u64(64, 12289)).unwrap();
		let a = Polynomial::from_u64_coeffs(64, &[1, 2, 0, 0, 0, 0, 0, 0]);
		let b = Polynomial::from_u64_coeffs(64, &[3, 4, 0, 0, 0, 0, 0, 0]);

		let schoolbook = a.mul_nonfft(&b, &m);

		let mut fa = a.clone();
		let mut fb = b.clone();
		t.forward_inplace(&mut fa);
		t.forward_inplace(&mut fb);
		let mut product = t.pointwise_multiply(&fa, &fb);
		t.inverse_inplace(&mut product);

		assert_eq!(product, schoolbook);
	}

	#[test]
	fn rejects_non_ntt_friendly_modulus() {
		let modulus = ModulusDescriptor::new(WideUint::from_u64(64, 97)).unwrap();
		assert!(NttTables::try_new(8, modulus).is_err());
	}
}
