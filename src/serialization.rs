//! Little-endian binary formats for wide integers, polynomials, polynomial
//! arrays, and the higher-level records built from them. Every format is
//! self-describing by shape: a load reports [`Error::IoError`] on a
//! truncated stream, and resizes the target up (never down) when the
//! stored shape exceeds its capacity.

use crate::error::{Error, Result};
use crate::poly::Polynomial;
use crate::uint::WideUint;

/// Converts an object into its persisted byte representation.
pub trait ToBytes {
	/// Returns the object as a byte array.
	fn as_bytes(&self) -> Result<Vec<u8>>;
}

/// Deserializes an object from a byte slice, given whatever external state
/// (e.g. a [`crate::context::Context`]) is needed to reconstruct it.
pub trait FromBytes {
	/// State used to deserialize an object from bytes.
	type State;
	/// Deserializes an object from `bytes` using `state`.
	fn from_bytes(state: &Self::State, bytes: &[u8]) -> Result<Self>
	where
		Self: Sized;
}

struct Cursor<'a> {
	data: &'a [u8],
	pos: usize,
}

impl<'a> Cursor<'a> {
	fn new(data: &'a [u8]) -> Self {
		Self { data, pos: 0 }
	}

	fn take(&mut self, n: usize) -> Result<&'a [u8]> {
		if self.pos + n > self.data.len() {
			return Err(Error::IoError("truncated stream during load".into()));
		}
		let slice = &self.data[self.pos..self.pos + n];
		self.pos += n;
		Ok(slice)
	}

	fn read_i32(&mut self) -> Result<i32> {
		Ok(i32::from_le_bytes(self.take(4)?.try_into().unwrap()))
	}

	fn read_u64(&mut self) -> Result<u64> {
		Ok(u64::from_le_bytes(self.take(8)?.try_into().unwrap()))
	}

	fn read_f64(&mut self) -> Result<f64> {
		Ok(f64::from_le_bytes(self.take(8)?.try_into().unwrap()))
	}
}

fn write_i32(out: &mut Vec<u8>, v: i32) {
	out.extend_from_slice(&v.to_le_bytes());
}

fn write_u64(out: &mut Vec<u8>, v: u64) {
	out.extend_from_slice(&v.to_le_bytes());
}

fn write_f64(out: &mut Vec<u8>, v: f64) {
	out.extend_from_slice(&v.to_le_bytes());
}

/// `int32 bit_count` then `ceil(bit_count/64)` little-endian limbs.
pub fn write_wide_uint(out: &mut Vec<u8>, value: &WideUint) {
	write_i32(out, value.bit_width() as i32);
	for &limb in value.limbs() {
		write_u64(out, limb);
	}
}

/// Reads a wide integer written by [`write_wide_uint`], resizing up to
/// `min_bit_width` if the stored width is smaller.
fn read_wide_uint(cursor: &mut Cursor, min_bit_width: usize) -> Result<WideUint<'static>> {
	let bit_width = cursor.read_i32()? as usize;
	let limb_count = bit_width.div_ceil(64).max(1);
	let mut limbs = Vec::with_capacity(limb_count);
	for _ in 0..limb_count {
		limbs.push(cursor.read_u64()?);
	}
	let width = bit_width.max(min_bit_width);
	Ok(WideUint::from_limbs(width, limbs))
}

fn read_wide_uint_pub(data: &[u8]) -> Result<WideUint<'static>> {
	let mut cursor = Cursor::new(data);
	read_wide_uint(&mut cursor, 0)
}

/// `int32 coeff_count`, `int32 coeff_bit_count`, then the coefficients in
/// coefficient-major order.
pub fn write_polynomial(out: &mut Vec<u8>, poly: &Polynomial) {
	write_i32(out, poly.coeff_count() as i32);
	write_i32(out, poly.coeff_bit_width() as i32);
	for i in 0..poly.coeff_count() {
		for &limb in poly.get_coefficient(i).limbs() {
			write_u64(out, limb);
		}
	}
}

fn read_polynomial(cursor: &mut Cursor) -> Result<Polynomial<'static>> {
	let coeff_count = cursor.read_i32()? as usize;
	let coeff_bit_width = cursor.read_i32()? as usize;
	let mut poly = Polynomial::zero(coeff_count, coeff_bit_width);
	let limb_count = coeff_bit_width.div_ceil(64).max(1);
	for i in 0..coeff_count {
		let mut limbs = Vec::with_capacity(limb_count);
		for _ in 0..limb_count {
			limbs.push(cursor.read_u64()?);
		}
		poly.set_coefficient(i, &WideUint::from_limbs(coeff_bit_width, limbs));
	}
	Ok(poly)
}

/// `int32 size` then `size` polynomials.
pub fn write_polynomial_array(out: &mut Vec<u8>, polys: &[Polynomial]) {
	write_i32(out, polys.len() as i32);
	for p in polys {
		write_polynomial(out, p);
	}
}

fn read_polynomial_array(cursor: &mut Cursor) -> Result<Vec<Polynomial<'static>>> {
	let size = cursor.read_i32()? as usize;
	(0..size).map(|_| read_polynomial(cursor)).collect()
}

/// Persists `coeff_modulus`, `plain_modulus`, and the noise/relinearization
/// scalars that together make up [`crate::parameters::EncryptionParameters`].
/// `aux_coeff_modulus` is written as an empty polynomial array, reserved for
/// a future RNS-chain extension (see the crate's design notes).
pub fn write_parameters_body(
	out: &mut Vec<u8>,
	coeff_modulus: &WideUint,
	plain_modulus: &WideUint,
	noise_standard_deviation: f64,
	noise_max_deviation: f64,
	decomposition_bit_count: u32,
) {
	write_wide_uint(out, coeff_modulus);
	write_i32(out, 0); // aux_coeff_modulus: reserved, always empty
	write_wide_uint(out, plain_modulus);
	write_f64(out, noise_standard_deviation);
	write_f64(out, noise_max_deviation);
	write_i32(out, decomposition_bit_count as i32);
}

/// The fields read back by [`write_parameters_body`].
pub struct ParametersBody {
	pub coeff_modulus: WideUint<'static>,
	pub plain_modulus: WideUint<'static>,
	pub noise_standard_deviation: f64,
	pub noise_max_deviation: f64,
	pub decomposition_bit_count: u32,
}

/// Reads back the body written by [`write_parameters_body`].
pub fn read_parameters_body(data: &[u8]) -> Result<ParametersBody> {
	let mut cursor = Cursor::new(data);
	let coeff_modulus = read_wide_uint(&mut cursor, 0)?;
	let aux_count = cursor.read_i32()?;
	for _ in 0..aux_count {
		read_polynomial(&mut cursor)?;
	}
	let plain_modulus = read_wide_uint(&mut cursor, 0)?;
	let noise_standard_deviation = cursor.read_f64()?;
	let noise_max_deviation = cursor.read_f64()?;
	let decomposition_bit_count = cursor.read_i32()? as u32;
	Ok(ParametersBody {
		coeff_modulus,
		plain_modulus,
		noise_standard_deviation,
		noise_max_deviation,
		decomposition_bit_count,
	})
}

/// `int32 count`, then `count` polynomial-array pairs (`e0`, `e1`).
pub fn write_evaluation_keys(out: &mut Vec<u8>, pairs: &[(Polynomial, Polynomial)]) {
	write_i32(out, pairs.len() as i32);
	for (e0, e1) in pairs {
		write_polynomial_array(out, std::slice::from_ref(e0));
		write_polynomial_array(out, std::slice::from_ref(e1));
	}
}

/// Reads back the pairs written by [`write_evaluation_keys`].
pub fn read_evaluation_keys(data: &[u8]) -> Result<Vec<(Polynomial<'static>, Polynomial<'static>)>> {
	let mut cursor = Cursor::new(data);
	let count = cursor.read_i32()? as usize;
	let mut out = Vec::with_capacity(count);
	for _ in 0..count {
		let mut e0 = read_polynomial_array(&mut cursor)?;
		let mut e1 = read_polynomial_array(&mut cursor)?;
		out.push((e0.remove(0), e1.remove(0)));
	}
	Ok(out)
}

/// `int32 size`, `int32 coeff_count`, `int32 coeff_mod_count` (always 1 in
/// this single-modulus engine), then the coefficient array.
pub fn write_ciphertext_body(out: &mut Vec<u8>, elements: &[Polynomial]) {
	write_i32(out, elements.len() as i32);
	write_i32(out, elements.first().map(|p| p.coeff_count()).unwrap_or(0) as i32);
	write_i32(out, 1);
	for p in elements {
		write_polynomial(out, p);
	}
}

/// Reads back the elements written by [`write_ciphertext_body`]. Resizes
/// each recovered polynomial up to at least `min_coeff_count` per the
/// "resize up, never down" load policy.
pub fn read_ciphertext_body(data: &[u8], min_coeff_count: usize) -> Result<Vec<Polynomial<'static>>> {
	let mut cursor = Cursor::new(data);
	let size = cursor.read_i32()? as usize;
	let _coeff_count = cursor.read_i32()?;
	let _coeff_mod_count = cursor.read_i32()?;
	let mut out = Vec::with_capacity(size);
	for _ in 0..size {
		let mut poly = read_polynomial(&mut cursor)?;
		if poly.coeff_count() < min_coeff_count {
			poly.resize(min_coeff_count)?;
		}
		out.push(poly);
	}
	Ok(out)
}

/// Parses a standalone persisted wide integer (the wire format used for
/// `poly_modulus`/raw moduli outside a larger record).
pub fn wide_uint_from_bytes(data: &[u8]) -> Result<WideUint<'static>> {
	read_wide_uint_pub(data)
}

/// Parses a standalone persisted polynomial (the shape written by
/// [`write_polynomial`]), used by records — like [`crate::plaintext::Plaintext`]
/// — that persist a single polynomial alongside a small header of their own.
pub fn polynomial_from_bytes(data: &[u8]) -> Result<Polynomial<'static>> {
	let mut cursor = Cursor::new(data);
	read_polynomial(&mut cursor)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn wide_uint_roundtrip() {
		let w = WideUint::from_u64(128, 0xDEAD_BEEF_CAFE_u64);
		let mut out = Vec::new();
		write_wide_uint(&mut out, &w);
		let back = wide_uint_from_bytes(&out).unwrap();
		assert_eq!(back.low_u64(), w.low_u64());
		assert_eq!(back.bit_width(), 128);
	}

	#[test]
	fn polynomial_roundtrip() {
		let p = Polynomial::from_u64_coeffs(64, &[1, 2, 3, 4]);
		let mut out = Vec::new();
		write_polynomial(&mut out, &p);
		let mut cursor = Cursor::new(&out);
		let back = read_polynomial(&mut cursor).unwrap();
		assert_eq!(back, p);
	}

	#[test]
	fn ciphertext_body_resizes_up_not_down() {
		let elements = vec![Polynomial::from_u64_coeffs(64, &[1, 2]), Polynomial::from_u64_coeffs(64, &[3, 4])];
		let mut out = Vec::new();
		write_ciphertext_body(&mut out, &elements);
		let back = read_ciphertext_body(&out, 8).unwrap();
		assert_eq!(back[0].coeff_count(), 8);
		assert_eq!(back[0].get_coefficient(0).low_u64(), 1);
	}

	#[test]
	fn truncated_stream_errors() {
		let w = WideUint::from_u64(64, 42);
		let mut out = Vec::new();
		write_wide_uint(&mut out, &w);
		out.truncate(out.len() - 2);
		assert!(matches!(wide_uint_from_bytes(&out), Err(Error::IoError(_))));
	}
}
