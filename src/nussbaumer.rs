//! Fallback negacyclic convolution engine used when the coefficient modulus
//! admits no NTT-friendly root of unity.
//!
//! Works for *any* modulus `q`, unlike [`crate::ntt`]: the recursion here
//! never needs a root of unity in `Z_q`, only polynomial splitting, so it
//! has no primality precondition on `q`.

use crate::poly::Polynomial;
use crate::uint::{ModulusDescriptor, WideUint};

/// Below this length, recursion bottoms out into direct schoolbook
/// multiplication.
const BASE_CASE_LEN: usize = 2;

/// Multiplies two degree-`<N` polynomials mod `(X^N+1, q)` using a
/// recursive negacyclic convolution: the ordinary (non-modular) product is
/// computed via Karatsuba's three-multiplication split, bottoming out at
/// schoolbook multiplication for short operands, and the final product is
/// folded mod `X^N+1` once at the top.
pub fn nussbaumer_multiply(a: &Polynomial, b: &Polynomial, modulus: &ModulusDescriptor) -> Polynomial<'static> {
	assert_eq!(a.coeff_count(), b.coeff_count());
	let n = a.coeff_count();
	let av: Vec<WideUint<'static>> = (0..n).map(|i| a.get_coefficient(i)).collect();
	let bv: Vec<WideUint<'static>> = (0..n).map(|i| b.get_coefficient(i)).collect();

	let product = karatsuba(&av, &bv, modulus);

	let mut wide = Polynomial::zero(product.len(), a.coeff_bit_width());
	for (i, c) in product.into_iter().enumerate() {
		wide.set_coefficient(i, &c);
	}
	wide.reduce_negacyclic(n, modulus)
}

/// The "dot product" `Σ a_j * b_j mod (X^N+1, q)` used during decryption
/// when the NTT qualifier is unavailable.
pub fn nussbaumer_dot_product(a: &[Polynomial], b: &[Polynomial], modulus: &ModulusDescriptor) -> Polynomial<'static> {
	assert_eq!(a.len(), b.len());
	assert!(!a.is_empty());
	let n = a[0].coeff_count();
	let mut acc = Polynomial::zero(n, a[0].coeff_bit_width());
	for (x, y) in a.iter().zip(b.iter()) {
		let term = nussbaumer_multiply(x, y, modulus);
		acc = acc.add(&term, Some(modulus));
	}
	acc
}

/// Ordinary (non-modular) polynomial multiplication via Karatsuba's
/// recursive three-multiplication split. Operands must have equal,
/// power-of-two length; returns a vector of length `2*len - 1`.
fn karatsuba(a: &[WideUint<'static>], b: &[WideUint<'static>], modulus: &ModulusDescriptor) -> Vec<WideUint<'static>> {
	let n = a.len();
	if n <= BASE_CASE_LEN {
		return schoolbook(a, b, modulus);
	}

	let half = n / 2;
	let (a_lo, a_hi) = a.split_at(half);
	let (b_lo, b_hi) = b.split_at(half);

	let z0 = karatsuba(a_lo, b_lo, modulus);
	let z2 = karatsuba(a_hi, b_hi, modulus);

	let a_sum = add_vecs(a_lo, a_hi, modulus);
	let b_sum = add_vecs(b_lo, b_hi, modulus);
	let z1_raw = karatsuba(&a_sum, &b_sum, modulus);
	let z1 = sub_vecs(&sub_vecs(&z1_raw, &z0, modulus), &z2, modulus);

	// result = z0 + (z1 << half) + (z2 << 2*half), lengths (2*half-1),
	// shifted and summed into a buffer of length 2n-1.
	let mut result = vec![WideUint::zero(a[0].bit_width()); 2 * n - 1];
	add_into(&mut result, &z0, 0, modulus);
	add_into(&mut result, &z1, half, modulus);
	add_into(&mut result, &z2, 2 * half, modulus);
	result
}

fn schoolbook(a: &[WideUint<'static>], b: &[WideUint<'static>], modulus: &ModulusDescriptor) -> Vec<WideUint<'static>> {
	let n = a.len();
	let mut out = vec![WideUint::zero(a[0].bit_width()); 2 * n - 1];
	for i in 0..n {
		if a[i].is_zero() {
			continue;
		}
		for j in 0..n {
			let prod = modulus.mul_mod(&a[i], &b[j]);
			out[i + j] = modulus.add_mod(&out[i + j], &prod);
		}
	}
	out
}

fn add_vecs(a: &[WideUint<'static>], b: &[WideUint<'static>], modulus: &ModulusDescriptor) -> Vec<WideUint<'static>> {
	a.iter().zip(b.iter()).map(|(x, y)| modulus.add_mod(x, y)).collect()
}

fn sub_vecs(a: &[WideUint<'static>], b: &[WideUint<'static>], modulus: &ModulusDescriptor) -> Vec<WideUint<'static>> {
	a.iter().zip(b.iter()).map(|(x, y)| modulus.sub_mod(x, y)).collect()
}

fn add_into(dst: &mut [WideUint<'static>], src: &[WideUint<'static>], offset: usize, modulus: &ModulusDescriptor) {
	for (i, v) in src.iter().enumerate() {
		dst[offset + i] = modulus.add_mod(&dst[offset + i], v);
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::poly::Polynomial;

	fn desc(q: u64) -> ModulusDescriptor {
		ModulusDescriptor::new(WideUint::from_u64(64, q)).unwrap()
	}

	#[test]
	fn matches_schoolbook_negacyclic_multiply() {
		// q = 97 is not NTT-friendly for n = 8 (97 - 1 = 96, not divisible by 16... actually it is: 96/16=6).
		// Use a modulus with no 2N-th root instead to emphasize Nussbaumer's unconditional support.
		let m = desc(1000000007);
		let a = Polynomial::from_u64_coeffs(64, &[1, 2, 3, 4, 5, 6, 7, 8]);
		let b = Polynomial::from_u64_coeffs(64, &[8, 7, 6, 5, 4, 3, 2, 1]);

		let expected = a.mul_nonfft(&b, &m);
		let got = nussbaumer_multiply(&a, &b, &m);
		assert_eq!(got, expected);
	}

	#[test]
	fn works_for_arbitrary_modulus() {
		let m = desc(6); // not prime, no NTT possible at all
		let a = Polynomial::from_u64_coeffs(64, &[1, 1, 1, 1]);
		let b = Polynomial::from_u64_coeffs(64, &[1, 0, 0, 0]);
		let got = nussbaumer_multiply(&a, &b, &m);
		assert_eq!(got, a);
	}
}
