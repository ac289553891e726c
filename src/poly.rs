//! Polynomial arithmetic over `N` coefficients of identical limb-count,
//! i.e. elements of `Z[X]` truncated to degree `N-1` before any reduction
//! mod `(X^N+1, q)` is applied by a caller.

use zeroize::Zeroize;

use crate::error::{Error, Result};
use crate::uint::{Buffer, ModulusDescriptor, WideUint};

/// `N` coefficients, each a [`WideUint`] of identical bit width, stored as a
/// contiguous limb array of shape `[N x limbs_per_coeff]`.
///
/// Shares the owning/aliasing duality of [`WideUint`]: an aliased
/// polynomial cannot be resized (its coefficient count is fixed).
#[derive(Debug, Clone)]
pub struct Polynomial<'a> {
	coeff_count: usize,
	coeff_bit_width: usize,
	limbs: Buffer<'a>,
}

impl<'a> Polynomial<'a> {
	fn limbs_per_coeff(coeff_bit_width: usize) -> usize {
		coeff_bit_width.div_ceil(64).max(1)
	}

	/// The zero polynomial with `coeff_count` coefficients of `coeff_bit_width`
	/// bits each.
	pub fn zero(coeff_count: usize, coeff_bit_width: usize) -> Self {
		let lpc = Self::limbs_per_coeff(coeff_bit_width);
		Self {
			coeff_count,
			coeff_bit_width,
			limbs: Buffer::Owned(vec![0u64; coeff_count * lpc]),
		}
	}

	/// Builds a polynomial from per-coefficient `u64` values (each taken
	/// mod `2^64`, not mod `q`; callers are responsible for reducing first
	/// if that matters).
	pub fn from_u64_coeffs(coeff_bit_width: usize, coeffs: &[u64]) -> Self {
		let mut p = Self::zero(coeffs.len(), coeff_bit_width);
		for (i, &c) in coeffs.iter().enumerate() {
			p.set_coefficient(i, &WideUint::from_u64(coeff_bit_width, c));
		}
		p
	}

	/// Wraps caller-provided limb storage without copying.
	pub fn alias(coeff_count: usize, coeff_bit_width: usize, limbs: &'a mut [u64]) -> Self {
		Self {
			coeff_count,
			coeff_bit_width,
			limbs: Buffer::Borrowed(limbs),
		}
	}

	/// Number of coefficients (`N`).
	pub fn coeff_count(&self) -> usize {
		self.coeff_count
	}

	/// Bit width declared for each coefficient.
	pub fn coeff_bit_width(&self) -> usize {
		self.coeff_bit_width
	}

	fn limbs_per_coeff_self(&self) -> usize {
		Self::limbs_per_coeff(self.coeff_bit_width)
	}

	/// Reads out coefficient `index`.
	///
	/// # Panics
	/// Panics if `index >= coeff_count()`.
	pub fn get_coefficient(&self, index: usize) -> WideUint<'static> {
		let lpc = self.limbs_per_coeff_self();
		let start = index * lpc;
		WideUint::from_limbs(
			self.coeff_bit_width,
			self.limbs.as_slice()[start..start + lpc].to_vec(),
		)
	}

	/// Overwrites coefficient `index`.
	///
	/// # Panics
	/// Panics if `index >= coeff_count()`.
	pub fn set_coefficient(&mut self, index: usize, value: &WideUint) {
		let lpc = self.limbs_per_coeff_self();
		let start = index * lpc;
		let dst = &mut self.limbs.as_mut_slice()[start..start + lpc];
		for (d, s) in dst.iter_mut().zip(value.limbs().iter().chain(std::iter::repeat(&0))) {
			*d = *s;
		}
	}

	/// Resizes to `new_count` coefficients, zero-padding on growth. Fails
	/// with [`Error::AliasMutation`] if this polynomial borrows its storage.
	pub fn resize(&mut self, new_count: usize) -> Result<()> {
		let lpc = self.limbs_per_coeff_self();
		self.limbs.resize(new_count * lpc)?;
		self.coeff_count = new_count;
		Ok(())
	}

	/// Coefficient-wise addition, reducing mod `q` if a descriptor is given.
	pub fn add(&self, other: &Polynomial, modulus: Option<&ModulusDescriptor>) -> Polynomial<'static> {
		self.zip_coeffs(other, modulus, |m, a, b| match m {
			Some(m) => m.add_mod(a, b),
			None => {
				let bits = a.bit_width().max(b.bit_width());
				a.add(b, bits).0
			}
		})
	}

	/// Coefficient-wise subtraction, reducing mod `q` if a descriptor is
	/// given.
	pub fn sub(&self, other: &Polynomial, modulus: Option<&ModulusDescriptor>) -> Polynomial<'static> {
		self.zip_coeffs(other, modulus, |m, a, b| match m {
			Some(m) => m.sub_mod(a, b),
			None => a.sub(b, a.bit_width()).0,
		})
	}

	/// Pointwise (dyadic) product mod `q` — used for NTT-domain
	/// multiplication.
	pub fn dyadic_product(&self, other: &Polynomial, modulus: &ModulusDescriptor) -> Polynomial<'static> {
		self.zip_coeffs(other, Some(modulus), |m, a, b| m.unwrap().mul_mod(a, b))
	}

	fn zip_coeffs(
		&self,
		other: &Polynomial,
		modulus: Option<&ModulusDescriptor>,
		f: impl Fn(Option<&ModulusDescriptor>, &WideUint, &WideUint) -> WideUint<'static>,
	) -> Polynomial<'static> {
		assert_eq!(self.coeff_count, other.coeff_count, "mismatched polynomial degree");
		let mut out = Polynomial::zero(self.coeff_count, self.coeff_bit_width);
		for i in 0..self.coeff_count {
			let a = self.get_coefficient(i);
			let b = other.get_coefficient(i);
			out.set_coefficient(i, &f(modulus, &a, &b));
		}
		out
	}

	/// Scalar multiplication by a wide integer, reduced mod `q`.
	pub fn scalar_mul(&self, scalar: &WideUint, modulus: &ModulusDescriptor) -> Polynomial<'static> {
		let mut out = Polynomial::zero(self.coeff_count, self.coeff_bit_width);
		for i in 0..self.coeff_count {
			let a = self.get_coefficient(i);
			out.set_coefficient(i, &modulus.mul_mod(&a, scalar));
		}
		out
	}

	/// Coefficient-wise negation mod `q`.
	pub fn negate(&self, modulus: &ModulusDescriptor) -> Polynomial<'static> {
		let zero = WideUint::zero(self.coeff_bit_width);
		let mut out = Polynomial::zero(self.coeff_count, self.coeff_bit_width);
		for i in 0..self.coeff_count {
			let a = self.get_coefficient(i);
			out.set_coefficient(i, &modulus.sub_mod(&zero, &a));
		}
		out
	}

	/// Schoolbook multiplication, producing a polynomial of degree
	/// `2N - 2` (size `2N - 1`), coefficients reduced mod `q` but *not*
	/// reduced modulo the ring polynomial.
	pub fn mul_schoolbook(&self, other: &Polynomial, modulus: &ModulusDescriptor) -> Polynomial<'static> {
		assert_eq!(self.coeff_count, other.coeff_count);
		let n = self.coeff_count;
		let mut out = Polynomial::zero(2 * n - 1, self.coeff_bit_width);
		for i in 0..n {
			let a = self.get_coefficient(i);
			if a.is_zero() {
				continue;
			}
			for j in 0..n {
				let b = other.get_coefficient(j);
				let prod = modulus.mul_mod(&a, &b);
				let existing = out.get_coefficient(i + j);
				out.set_coefficient(i + j, &modulus.add_mod(&existing, &prod));
			}
		}
		out
	}

	/// Reduces a `2N-1`-sized schoolbook product modulo `(X^N+1, q)`: for
	/// `k >= N`, subtracts the coefficient at `k` from the one at `k - N`
	/// (negacyclic wraparound) and truncates to `N` coefficients.
	pub fn reduce_negacyclic(&self, n: usize, modulus: &ModulusDescriptor) -> Polynomial<'static> {
		let mut out = Polynomial::zero(n, self.coeff_bit_width);
		for k in 0..self.coeff_count {
			let c = self.get_coefficient(k);
			if k < n {
				let existing = out.get_coefficient(k);
				out.set_coefficient(k, &modulus.add_mod(&existing, &c));
			} else {
				let idx = k - n;
				let existing = out.get_coefficient(idx);
				out.set_coefficient(idx, &modulus.sub_mod(&existing, &c));
			}
		}
		out
	}

	/// Multiplication mod `(X^N+1, q)` via the generic "nonfft" path:
	/// schoolbook multiply then negacyclic reduction.
	pub fn mul_nonfft(&self, other: &Polynomial, modulus: &ModulusDescriptor) -> Polynomial<'static> {
		let n = self.coeff_count;
		self.mul_schoolbook(other, modulus).reduce_negacyclic(n, modulus)
	}

	/// The infinity norm of this polynomial's symmetric representatives mod
	/// `q`: for each coefficient, the absolute value of its representative
	/// in `(-q/2, q/2]`, maximized over all coefficients.
	pub fn infinity_norm_mod_q(&self, q: &WideUint) -> WideUint<'static> {
		let half = q.shr(1);
		let mut max = WideUint::zero(q.bit_width());
		for i in 0..self.coeff_count {
			let c = self.get_coefficient(i);
			let symmetric_abs = if c.compare(&half) == std::cmp::Ordering::Greater {
				q.sub(&c, q.bit_width()).0
			} else {
				c
			};
			if symmetric_abs.compare(&max) == std::cmp::Ordering::Greater {
				max = symmetric_abs;
			}
		}
		max
	}

	/// True if every coefficient is zero.
	pub fn is_zero(&self) -> bool {
		self.limbs.as_slice().iter().all(|&l| l == 0)
	}
}

impl<'a> Zeroize for Polynomial<'a> {
	fn zeroize(&mut self) {
		self.limbs.as_mut_slice().zeroize();
	}
}

impl<'a> PartialEq for Polynomial<'a> {
	fn eq(&self, other: &Self) -> bool {
		self.coeff_count == other.coeff_count
			&& self.coeff_bit_width == other.coeff_bit_width
			&& (0..self.coeff_count).all(|i| self.get_coefficient(i) == other.get_coefficient(i))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::uint::ModulusDescriptor;

	fn desc(q: u64) -> ModulusDescriptor {
		ModulusDescriptor::new(WideUint::from_u64(64, q)).unwrap()
	}

	#[test]
	fn add_sub_roundtrip() {
		let m = desc(97);
		let a = Polynomial::from_u64_coeffs(64, &[1, 2, 3, 4]);
		let b = Polynomial::from_u64_coeffs(64, &[90, 95, 10, 50]);
		let sum = a.add(&b, Some(&m));
		let back = sum.sub(&b, Some(&m));
		assert_eq!(back, a);
	}

	#[test]
	fn negacyclic_multiply_wraps_with_sign_flip() {
		// (X^3) * (X^1) mod (X^4 + 1) = X^4 = -1 (constant term -1 mod q).
		let m = desc(97);
		let a = Polynomial::from_u64_coeffs(64, &[0, 0, 0, 1]);
		let b = Polynomial::from_u64_coeffs(64, &[0, 1, 0, 0]);
		let product = a.mul_nonfft(&b, &m);
		assert_eq!(product.get_coefficient(0).low_u64(), 96);
		assert_eq!(product.get_coefficient(1).low_u64(), 0);
	}

	#[test]
	fn scalar_mul_reduces_mod_q() {
		let m = desc(97);
		let a = Polynomial::from_u64_coeffs(64, &[10, 20, 30]);
		let scaled = a.scalar_mul(&WideUint::from_u64(64, 5), &m);
		assert_eq!(scaled.get_coefficient(0).low_u64(), 50);
		assert_eq!(scaled.get_coefficient(1).low_u64(), 3); // 100 mod 97
	}

	#[test]
	fn infinity_norm_picks_symmetric_representative() {
		let q = WideUint::from_u64(64, 97);
		let a = Polynomial::from_u64_coeffs(64, &[0, 96, 48]); // 96 -> -1, abs 1; 48 -> 48
		assert_eq!(a.infinity_norm_mod_q(&q).low_u64(), 48);
	}

	#[test]
	fn aliasing_resize_fails() {
		let mut storage = vec![0u64; 4];
		let mut p = Polynomial::alias(4, 64, &mut storage);
		assert_eq!(p.resize(8), Err(Error::AliasMutation));
	}
}
