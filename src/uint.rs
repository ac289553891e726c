//! Wide unsigned integers and modular arithmetic on arrays of 64-bit limbs.
//!
//! This is not a general-purpose bignum library: every operation here exists
//! to serve polynomial coefficients in the ring, so the surface is limited to
//! what the polynomial and FV layers actually need.

use std::cmp::Ordering;

use crate::error::{Error, Result};

const LIMB_BITS: usize = u64::BITS as usize;

/// The backing storage for a [`WideUint`]: either an owned buffer, or a
/// borrowed slice of caller-provided storage.
///
/// Resizing is only ever defined on the owned variant; attempting to resize
/// a borrowed buffer returns [`Error::AliasMutation`]. This replaces the
/// runtime "is this buffer aliased" flag found in C++-flavored
/// implementations with a type-level distinction.
#[derive(Debug)]
pub enum Buffer<'a> {
	/// Storage owned by this value.
	Owned(Vec<u64>),
	/// Storage borrowed from the caller; cannot be resized.
	Borrowed(&'a mut [u64]),
}

impl<'a> Buffer<'a> {
	/// Returns the limbs as a read-only slice.
	pub fn as_slice(&self) -> &[u64] {
		match self {
			Buffer::Owned(v) => v.as_slice(),
			Buffer::Borrowed(s) => s,
		}
	}

	/// Returns the limbs as a mutable slice.
	pub fn as_mut_slice(&mut self) -> &mut [u64] {
		match self {
			Buffer::Owned(v) => v.as_mut_slice(),
			Buffer::Borrowed(s) => s,
		}
	}

	/// Resizes the buffer, zero-extending or truncating. Fails on a borrowed
	/// buffer.
	pub fn resize(&mut self, new_len: usize) -> Result<()> {
		match self {
			Buffer::Owned(v) => {
				v.resize(new_len, 0);
				Ok(())
			}
			Buffer::Borrowed(_) => Err(Error::AliasMutation),
		}
	}

	fn to_owned_vec(&self) -> Vec<u64> {
		self.as_slice().to_vec()
	}
}

impl<'a> Clone for Buffer<'a> {
	/// Cloning always produces an owned buffer, even from a borrowed source:
	/// there is no lifetime to tie a clone's borrow to.
	fn clone(&self) -> Self {
		Buffer::Owned(self.to_owned_vec())
	}
}

/// An unsigned integer of a declared bit width, represented as little-endian
/// 64-bit limbs (limb 0 is least significant). Bits above the declared width
/// are always zero.
#[derive(Debug, Clone)]
pub struct WideUint<'a> {
	bit_width: usize,
	limbs: Buffer<'a>,
}

fn limb_count_for_bits(bits: usize) -> usize {
	bits.div_ceil(LIMB_BITS).max(1)
}

impl<'a> WideUint<'a> {
	/// Constructs a zero-valued wide integer owning its storage.
	pub fn zero(bit_width: usize) -> Self {
		Self {
			bit_width,
			limbs: Buffer::Owned(vec![0u64; limb_count_for_bits(bit_width)]),
		}
	}

	/// Constructs a wide integer from a little-endian limb vector, owning
	/// it, masking off any bits above `bit_width`.
	pub fn from_limbs(bit_width: usize, mut limbs: Vec<u64>) -> Self {
		limbs.resize(limb_count_for_bits(bit_width), 0);
		let mut w = Self {
			bit_width,
			limbs: Buffer::Owned(limbs),
		};
		w.mask_high_bits();
		w
	}

	/// Constructs a wide integer from a single `u64` value.
	pub fn from_u64(bit_width: usize, value: u64) -> Self {
		Self::from_limbs(bit_width, vec![value])
	}

	/// Wraps caller-provided storage without copying. The value aliases
	/// `limbs` until dropped; resizing it fails.
	pub fn alias(bit_width: usize, limbs: &'a mut [u64]) -> Self {
		Self {
			bit_width,
			limbs: Buffer::Borrowed(limbs),
		}
	}

	/// The declared bit width.
	pub fn bit_width(&self) -> usize {
		self.bit_width
	}

	/// The number of limbs backing this value.
	pub fn limb_count(&self) -> usize {
		self.limbs.as_slice().len()
	}

	/// The raw little-endian limbs.
	pub fn limbs(&self) -> &[u64] {
		self.limbs.as_slice()
	}

	/// True if every limb is zero.
	pub fn is_zero(&self) -> bool {
		self.limbs().iter().all(|&l| l == 0)
	}

	/// The position (1-based) of the highest set bit, or 0 if the value is
	/// zero.
	pub fn significant_bit_count(&self) -> usize {
		for (i, &limb) in self.limbs().iter().enumerate().rev() {
			if limb != 0 {
				return i * LIMB_BITS + (LIMB_BITS - limb.leading_zeros() as usize);
			}
		}
		0
	}

	/// Reads the bit at `index` (0 = least significant).
	pub fn get_bit(&self, index: usize) -> bool {
		if index >= self.bit_width {
			return false;
		}
		let limb = self.limbs()[index / LIMB_BITS];
		(limb >> (index % LIMB_BITS)) & 1 == 1
	}

	/// Sets (or clears) the bit at `index`.
	pub fn set_bit(&mut self, index: usize, value: bool) {
		assert!(index < self.bit_width, "bit index out of declared width");
		let limb = &mut self.limbs.as_mut_slice()[index / LIMB_BITS];
		let mask = 1u64 << (index % LIMB_BITS);
		if value {
			*limb |= mask;
		} else {
			*limb &= !mask;
		}
	}

	fn mask_high_bits(&mut self) {
		let total_bits = self.limb_count() * LIMB_BITS;
		if self.bit_width >= total_bits {
			return;
		}
		let keep = self.bit_width % LIMB_BITS;
		let last = self.limb_count() - 1;
		let slice = self.limbs.as_mut_slice();
		if keep == 0 {
			// bit_width is an exact multiple and smaller than total_bits cannot
			// happen given limb_count_for_bits, but guard anyway.
			slice[last] = 0;
		} else {
			slice[last] &= (1u64 << keep) - 1;
		}
	}

	/// Compares two values as unsigned integers, zero-extending the shorter
	/// limb array.
	pub fn compare(&self, other: &WideUint) -> Ordering {
		compare_slices(self.limbs(), other.limbs())
	}

	/// Left shift by `amount` bits, producing a value with `result_bits`
	/// declared width (caller-sized; left shift is otherwise unbounded).
	pub fn shl(&self, amount: usize, result_bits: usize) -> WideUint<'static> {
		let limb_shift = amount / LIMB_BITS;
		let bit_shift = amount % LIMB_BITS;
		let out_limbs = limb_count_for_bits(result_bits);
		let mut out = vec![0u64; out_limbs];

		for i in (0..self.limb_count()).rev() {
			let dst = i + limb_shift;
			if dst >= out_limbs {
				continue;
			}
			let v = self.limbs()[i];
			if bit_shift == 0 {
				out[dst] |= v;
			} else {
				out[dst] |= v << bit_shift;
				if dst + 1 < out_limbs {
					out[dst + 1] |= v >> (LIMB_BITS - bit_shift);
				}
			}
		}

		let mut result = WideUint::from_limbs(result_bits, out);
		result.mask_high_bits();
		result
	}

	/// Right shift by `amount` bits. Shifting by at least the bit width
	/// yields zero.
	pub fn shr(&self, amount: usize) -> WideUint<'static> {
		if amount >= self.bit_width {
			return WideUint::zero(self.bit_width);
		}
		let limb_shift = amount / LIMB_BITS;
		let bit_shift = amount % LIMB_BITS;
		let n = self.limb_count();
		let mut out = vec![0u64; n];

		for i in 0..n {
			let src = i + limb_shift;
			if src >= n {
				break;
			}
			let mut v = self.limbs()[src] >> bit_shift;
			if bit_shift != 0 && src + 1 < n {
				v |= self.limbs()[src + 1] << (LIMB_BITS - bit_shift);
			}
			out[i] = v;
		}

		WideUint::from_limbs(self.bit_width, out)
	}

	/// Bitwise NOT, masked to the declared width.
	pub fn not(&self) -> WideUint<'static> {
		let out: Vec<u64> = self.limbs().iter().map(|&l| !l).collect();
		WideUint::from_limbs(self.bit_width, out)
	}

	/// Bitwise AND.
	pub fn and(&self, other: &WideUint) -> WideUint<'static> {
		self.zip_bits(other, |a, b| a & b)
	}

	/// Bitwise OR.
	pub fn or(&self, other: &WideUint) -> WideUint<'static> {
		self.zip_bits(other, |a, b| a | b)
	}

	/// Bitwise XOR.
	pub fn xor(&self, other: &WideUint) -> WideUint<'static> {
		self.zip_bits(other, |a, b| a ^ b)
	}

	fn zip_bits(&self, other: &WideUint, f: impl Fn(u64, u64) -> u64) -> WideUint<'static> {
		let n = self.limb_count().max(other.limb_count());
		let mut out = vec![0u64; n];
		for i in 0..n {
			let a = self.limbs().get(i).copied().unwrap_or(0);
			let b = other.limbs().get(i).copied().unwrap_or(0);
			out[i] = f(a, b);
		}
		WideUint::from_limbs(self.bit_width.max(other.bit_width), out)
	}

	/// Adds two values, truncating the result to `result_bits` (upper bits
	/// masked to zero). Returns the result and whether truncation dropped a
	/// nonzero carry.
	pub fn add(&self, other: &WideUint, result_bits: usize) -> (WideUint<'static>, bool) {
		let (sum, carry) = add_slices(self.limbs(), other.limbs(), limb_count_for_bits(result_bits));
		let mut w = WideUint::from_limbs(result_bits, sum);
		w.mask_high_bits();
		(w, carry != 0)
	}

	/// Subtracts `other` from `self`, truncating to `result_bits`. Returns
	/// the result and whether the subtraction borrowed (i.e. `self < other`
	/// when zero-extended).
	pub fn sub(&self, other: &WideUint, result_bits: usize) -> (WideUint<'static>, bool) {
		let (diff, borrow) =
			sub_slices(self.limbs(), other.limbs(), limb_count_for_bits(result_bits));
		let mut w = WideUint::from_limbs(result_bits, diff);
		w.mask_high_bits();
		(w, borrow != 0)
	}

	/// Multiplies two values, producing the full-width product (no
	/// truncation): `self.bit_width + other.bit_width` bits.
	pub fn mul_wide(&self, other: &WideUint) -> WideUint<'static> {
		let product = mul_slices(self.limbs(), other.limbs());
		WideUint::from_limbs(self.bit_width + other.bit_width, product)
	}

	/// Euclidean division with remainder. Fails with [`Error::DivisionByZero`]
	/// if `divisor` is zero.
	pub fn div_rem(&self, divisor: &WideUint) -> Result<(WideUint<'static>, WideUint<'static>)> {
		if divisor.is_zero() {
			return Err(Error::DivisionByZero);
		}
		let (q, r) = div_rem_slices(self.limbs(), divisor.limbs());
		Ok((
			WideUint::from_limbs(self.bit_width, q),
			WideUint::from_limbs(divisor.bit_width, r),
		))
	}

	/// Reads out the value as a `u64`, truncating any higher bits. Useful
	/// once a value is known to fit (e.g. after reduction mod a
	/// machine-word-sized modulus).
	pub fn low_u64(&self) -> u64 {
		self.limbs().first().copied().unwrap_or(0)
	}
}

impl<'a> PartialEq for WideUint<'a> {
	fn eq(&self, other: &Self) -> bool {
		self.compare(other) == Ordering::Equal
	}
}
impl<'a> Eq for WideUint<'a> {}

fn compare_slices(a: &[u64], b: &[u64]) -> Ordering {
	let n = a.len().max(b.len());
	for i in (0..n).rev() {
		let av = a.get(i).copied().unwrap_or(0);
		let bv = b.get(i).copied().unwrap_or(0);
		match av.cmp(&bv) {
			Ordering::Equal => continue,
			other => return other,
		}
	}
	Ordering::Equal
}

fn add_slices(a: &[u64], b: &[u64], out_len: usize) -> (Vec<u64>, u64) {
	let mut out = vec![0u64; out_len];
	let mut carry = 0u64;
	let n = a.len().max(b.len()).max(out_len);
	for i in 0..n {
		let av = a.get(i).copied().unwrap_or(0) as u128;
		let bv = b.get(i).copied().unwrap_or(0) as u128;
		let sum = av + bv + carry as u128;
		carry = (sum >> LIMB_BITS) as u64;
		if i < out_len {
			out[i] = sum as u64;
		}
	}
	(out, carry)
}

fn sub_slices(a: &[u64], b: &[u64], out_len: usize) -> (Vec<u64>, u64) {
	let mut out = vec![0u64; out_len];
	let mut borrow = 0i128;
	let n = a.len().max(b.len()).max(out_len);
	for i in 0..n {
		let av = a.get(i).copied().unwrap_or(0) as i128;
		let bv = b.get(i).copied().unwrap_or(0) as i128;
		let mut diff = av - bv - borrow;
		if diff < 0 {
			diff += 1i128 << LIMB_BITS;
			borrow = 1;
		} else {
			borrow = 0;
		}
		if i < out_len {
			out[i] = diff as u64;
		}
	}
	(out, borrow as u64)
}

fn mul_slices(a: &[u64], b: &[u64]) -> Vec<u64> {
	let mut out = vec![0u64; a.len() + b.len()];
	for (i, &ai) in a.iter().enumerate() {
		if ai == 0 {
			continue;
		}
		let mut carry = 0u128;
		for (j, &bj) in b.iter().enumerate() {
			let idx = i + j;
			let prod = ai as u128 * bj as u128 + out[idx] as u128 + carry;
			out[idx] = prod as u64;
			carry = prod >> LIMB_BITS;
		}
		let mut idx = i + b.len();
		while carry > 0 {
			let sum = out[idx] as u128 + carry;
			out[idx] = sum as u64;
			carry = sum >> LIMB_BITS;
			idx += 1;
		}
	}
	out
}

/// Bit-by-bit restoring division. Simple and obviously correct rather than
/// fast; coefficient-sized operands make this adequate.
fn div_rem_slices(dividend: &[u64], divisor: &[u64]) -> (Vec<u64>, Vec<u64>) {
	let bits = dividend.len() * LIMB_BITS;
	let mut quotient = vec![0u64; dividend.len()];
	let mut remainder = vec![0u64; divisor.len().max(1)];

	for i in (0..bits).rev() {
		// remainder <<= 1
		let mut carry = 0u64;
		for limb in remainder.iter_mut() {
			let new_carry = *limb >> (LIMB_BITS - 1);
			*limb = (*limb << 1) | carry;
			carry = new_carry;
		}
		let bit = (dividend[i / LIMB_BITS] >> (i % LIMB_BITS)) & 1;
		remainder[0] |= bit;

		if compare_slices(&remainder, divisor) != Ordering::Less {
			let (diff, _) = sub_slices(&remainder, divisor, remainder.len());
			remainder = diff;
			quotient[i / LIMB_BITS] |= 1 << (i % LIMB_BITS);
		}
	}

	(quotient, remainder)
}

/// Extended Euclidean modular inverse of `a` modulo `m`. Fails with
/// [`Error::NotInvertible`] when gcd(a, m) != 1.
pub fn mod_inverse(a: &WideUint, m: &WideUint) -> Result<WideUint<'static>> {
	// Signed extended Euclid over i128 pairs is insufficient for truly wide
	// values; we instead run the algorithm over plain Vec<u64> magnitudes
	// with explicit sign tracking, since coefficients here realistically fit
	// within a handful of limbs.
	let (mut old_r, mut r) = (a.limbs().to_vec(), m.limbs().to_vec());
	let (mut old_s, mut s): (Vec<i128>, Vec<i128>) = (vec![1], vec![0]);
	// We track s as a single i128 accumulator; valid because mod_inverse is
	// only ever used with moduli that fit comfortably within 128 bits in
	// this crate (coefficient and plaintext moduli).
	let m_val = limbs_to_u128(&r);
	let mut old_r_v = limbs_to_u128(&old_r);
	let mut r_v = m_val;
	let mut old_s_v: i128 = 1;
	let mut s_v: i128 = 0;
	let _ = (&mut old_r, &mut r, &mut old_s, &mut s);

	if r_v == 0 {
		return Err(Error::DivisionByZero);
	}

	while r_v != 0 {
		let quotient = (old_r_v / r_v) as i128;
		let new_r = old_r_v % r_v;
		old_r_v = r_v;
		r_v = new_r;

		let new_s = old_s_v - quotient * s_v;
		old_s_v = s_v;
		s_v = new_s;
	}

	if old_r_v != 1 {
		return Err(Error::NotInvertible);
	}

	let m_i = m_val as i128;
	let inv = ((old_s_v % m_i) + m_i) % m_i;
	Ok(WideUint::from_u64(m.bit_width, inv as u64))
}

fn limbs_to_u128(limbs: &[u64]) -> u128 {
	let mut v = 0u128;
	for (i, &limb) in limbs.iter().enumerate().take(2) {
		v |= (limb as u128) << (i * LIMB_BITS);
	}
	v
}

/// Precomputed acceleration data for reducing values modulo `m`.
///
/// Two strategies are supported: a fast path when `m` is a pseudo-Mersenne
/// number `2^k - 1` (reduction by splitting into high/low `k`-bit halves and
/// adding), and a generic Barrett reduction using a precomputed reciprocal
/// for every other modulus. Constructing a descriptor reads `m` once; it is
/// immutable thereafter.
#[derive(Debug, Clone)]
pub struct ModulusDescriptor {
	value: WideUint<'static>,
	kind: ModulusKind,
}

#[derive(Debug, Clone)]
enum ModulusKind {
	/// `m = 2^k - 1`.
	PseudoMersenne { k: usize },
	/// Barrett reduction: `mu = floor(2^(2k) / m)` where `k = bits(m)`.
	Barrett { mu: WideUint<'static>, k: usize },
}

impl ModulusDescriptor {
	/// Builds a descriptor for modulus `m`, choosing the pseudo-Mersenne
	/// fast path when applicable and Barrett reduction otherwise.
	pub fn new(m: WideUint<'static>) -> Result<Self> {
		if m.is_zero() {
			return Err(Error::DivisionByZero);
		}
		let k = m.significant_bit_count();

		if is_pseudo_mersenne(&m, k) {
			return Ok(Self {
				value: m,
				kind: ModulusKind::PseudoMersenne { k },
			});
		}

		let two_k = WideUint::from_u64(2 * k + 2, 1).shl(2 * k, 2 * k + 2);
		let (mu, _) = two_k.div_rem(&m)?;
		Ok(Self {
			value: m,
			kind: ModulusKind::Barrett { mu, k },
		})
	}

	/// The modulus value.
	pub fn value(&self) -> &WideUint<'static> {
		&self.value
	}

	/// Reduces `x` modulo `m`, where `x` may be up to twice the bit width of
	/// `m` (the common case after a multiply).
	pub fn reduce(&self, x: &WideUint) -> WideUint<'static> {
		match &self.kind {
			ModulusKind::PseudoMersenne { k } => reduce_pseudo_mersenne(x, *k, &self.value),
			ModulusKind::Barrett { mu, k } => reduce_barrett(x, &self.value, mu, *k),
		}
	}

	/// `(a + b) mod m`.
	pub fn add_mod(&self, a: &WideUint, b: &WideUint) -> WideUint<'static> {
		let bits = self.value.bit_width() + 1;
		let (sum, _) = a.add(b, bits);
		self.reduce(&sum)
	}

	/// `(a - b) mod m`.
	pub fn sub_mod(&self, a: &WideUint, b: &WideUint) -> WideUint<'static> {
		let a_r = self.reduce(a);
		let b_r = self.reduce(b);
		if a_r.compare(&b_r) != Ordering::Less {
			let (d, _) = a_r.sub(&b_r, self.value.bit_width());
			d
		} else {
			let (sum, _) = a_r.add(&self.value, self.value.bit_width() + 1);
			let (d, _) = sum.sub(&b_r, self.value.bit_width());
			d
		}
	}

	/// `(a * b) mod m`.
	pub fn mul_mod(&self, a: &WideUint, b: &WideUint) -> WideUint<'static> {
		let product = a.mul_wide(b);
		self.reduce(&product)
	}

	/// `base^exponent mod m` via square-and-multiply.
	pub fn pow_mod(&self, base: &WideUint, exponent: u64) -> WideUint<'static> {
		let mut result = WideUint::from_u64(self.value.bit_width(), 1);
		let mut b = self.reduce(base);
		let mut e = exponent;
		while e > 0 {
			if e & 1 == 1 {
				result = self.mul_mod(&result, &b);
			}
			b = self.mul_mod(&b, &b);
			e >>= 1;
		}
		result
	}

	/// Modular inverse of `a` modulo this descriptor's modulus.
	pub fn inverse(&self, a: &WideUint) -> Result<WideUint<'static>> {
		mod_inverse(a, &self.value)
	}
}

fn is_pseudo_mersenne(m: &WideUint, k: usize) -> bool {
	// m == 2^k - 1 iff every bit below k is set and m's significant bit
	// count is exactly k.
	(0..k).all(|i| m.get_bit(i)) && !m.get_bit(k)
}

fn reduce_pseudo_mersenne(x: &WideUint, k: usize, m: &WideUint) -> WideUint<'static> {
	// m = 2^k - 1, so 2^k === 1 (mod m): split x into high := x >> k and
	// low := x & (2^k - 1), then x === high + low (mod m). Repeat until the
	// sum fits below 2m, then correct with at most one subtraction.
	let mut high = x.shr(k);
	let mut low = mask_low_bits(x, k);
	while !high.is_zero() {
		let (sum, _) = high.add(&low, k + 2);
		high = sum.shr(k);
		low = mask_low_bits(&sum, k);
	}
	if low.compare(m) != Ordering::Less {
		let (d, _) = low.sub(m, low.bit_width());
		d
	} else {
		low
	}
}

fn mask_low_bits(x: &WideUint, k: usize) -> WideUint<'static> {
	let mut out = WideUint::zero(k.max(1));
	for i in 0..k.min(x.bit_width()) {
		out.set_bit(i, x.get_bit(i));
	}
	out
}

fn reduce_barrett(x: &WideUint, m: &WideUint, mu: &WideUint, k: usize) -> WideUint<'static> {
	// q = floor((x * mu) / 2^(2k)); r = x - q*m; then at most two
	// corrective subtractions.
	let xm = x.mul_wide(mu);
	let q = xm.shr(2 * k);
	let qm = q.mul_wide(m);
	let bits = x.bit_width().max(qm.bit_width()) + 1;
	let (mut r, borrowed) = x.add(&WideUint::zero(bits), bits);
	let _ = borrowed;
	let (mut r2, borrow) = r.sub(&qm, bits);
	if borrow {
		// x < q*m should not happen with a correctly rounded mu, but guard
		// against off-by-one reciprocal error by adding back 2^(2k).
		let correction = WideUint::from_u64(bits + 1, 1).shl(2 * k, bits + 1);
		let (fixed, _) = r2.add(&correction, bits + 1);
		r2 = fixed;
	}
	r = r2;
	for _ in 0..2 {
		if r.compare(m) != Ordering::Less {
			let (d, _) = r.sub(m, r.bit_width());
			r = d;
		}
	}
	WideUint::from_limbs(m.bit_width(), r.limbs().to_vec())
}

impl<'a> WideUint<'a> {
	/// Clones into an owned `'static` value.
	pub fn clone_owned(&self) -> WideUint<'static> {
		WideUint::from_limbs(self.bit_width, self.limbs().to_vec())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn add_sub_roundtrip() {
		let a = WideUint::from_u64(64, 123456789);
		let b = WideUint::from_u64(64, 987654321);
		let (sum, carry) = a.add(&b, 64);
		assert!(!carry);
		assert_eq!(sum.low_u64(), 123456789 + 987654321);

		let (back, borrow) = sum.sub(&b, 64);
		assert!(!borrow);
		assert_eq!(back.low_u64(), 123456789);
	}

	#[test]
	fn shift_semantics() {
		let a = WideUint::from_u64(8, 0b0000_0001);
		let shifted = a.shl(3, 8);
		assert_eq!(shifted.low_u64(), 0b0000_1000);

		let over = a.shr(100);
		assert!(over.is_zero());
	}

	#[test]
	fn multiply_matches_u128() {
		let a = WideUint::from_u64(64, 0xFFFF_FFFF);
		let b = WideUint::from_u64(64, 0xFFFF_FFFF);
		let product = a.mul_wide(&b);
		let expected = 0xFFFF_FFFFu128 * 0xFFFF_FFFFu128;
		assert_eq!(product.low_u64() as u128, expected);
	}

	#[test]
	fn div_rem_basic() {
		let a = WideUint::from_u64(64, 100);
		let b = WideUint::from_u64(64, 7);
		let (q, r) = a.div_rem(&b).unwrap();
		assert_eq!(q.low_u64(), 14);
		assert_eq!(r.low_u64(), 2);
	}

	#[test]
	fn div_by_zero_errors() {
		let a = WideUint::from_u64(64, 1);
		let z = WideUint::zero(64);
		assert_eq!(a.div_rem(&z), Err(Error::DivisionByZero));
	}

	#[test]
	fn modulus_descriptor_matches_plain_mod() {
		let m = WideUint::from_u64(64, 97);
		let desc = ModulusDescriptor::new(m.clone_owned()).unwrap();
		for v in [0u64, 1, 50, 96, 97, 98, 1000, 9699] {
			let x = WideUint::from_u64(64, v);
			assert_eq!(desc.reduce(&x).low_u64(), v % 97, "failed for {v}");
		}
	}

	#[test]
	fn pseudo_mersenne_descriptor() {
		let m = WideUint::from_u64(64, (1u64 << 13) - 1);
		let desc = ModulusDescriptor::new(m.clone_owned()).unwrap();
		for v in [0u64, 1, 8191, 8192, 20000, 100000] {
			let x = WideUint::from_u64(64, v);
			assert_eq!(desc.reduce(&x).low_u64(), v % ((1 << 13) - 1), "failed for {v}");
		}
	}

	#[test]
	fn mod_inverse_known_value() {
		let m = WideUint::from_u64(64, 97);
		let a = WideUint::from_u64(64, 5);
		let inv = mod_inverse(&a, &m).unwrap();
		assert_eq!((inv.low_u64() * 5) % 97, 1);
	}

	#[test]
	fn aliased_buffer_rejects_resize() {
		let mut storage = vec![0u64; 2];
		let w = WideUint::alias(64, &mut storage);
		let mut buf = match w.limbs {
			Buffer::Borrowed(s) => Buffer::Borrowed(s),
			Buffer::Owned(v) => Buffer::Owned(v),
		};
		assert_eq!(buf.resize(4), Err(Error::AliasMutation));
	}
}
