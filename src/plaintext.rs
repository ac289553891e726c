//! Plaintext polynomials: the coefficient-domain representation of a
//! message before encryption, and the textual hex format used for human
//! entry and debugging (also used to parse `poly_modulus` literals).

use crate::context::Context;
use crate::error::{Error, Result};
use crate::poly::Polynomial;
use crate::serialization::{polynomial_from_bytes, write_polynomial, FromBytes, ToBytes};
use crate::uint::WideUint;

/// A polynomial with coefficients modulo the plaintext modulus `t`. The
/// degree is at most `N - 1`, one less than the ring dimension.
#[derive(Debug, Clone, PartialEq)]
pub struct Plaintext {
	poly: Polynomial<'static>,
	is_ntt_form: bool,
}

impl Plaintext {
	/// The zero plaintext with `coeff_count` coefficients of `coeff_bit_width`
	/// bits each.
	pub fn new(coeff_count: usize, coeff_bit_width: usize) -> Self {
		Self {
			poly: Polynomial::zero(coeff_count, coeff_bit_width),
			is_ntt_form: false,
		}
	}

	/// Wraps an already-built polynomial as a plaintext.
	pub fn from_poly(poly: Polynomial<'static>) -> Self {
		Self { poly, is_ntt_form: false }
	}

	/// Parses a textual polynomial of the form `"7FFx^3 + 1x^1 + 3"`:
	///
	/// 1. Terms are listed in strictly decreasing exponent order.
	/// 2. Coefficients are non-negative hexadecimal (either case).
	/// 3. Exponents are positive decimal.
	/// 4. Zero-coefficient terms may be omitted.
	/// 5. The exponent-one term must be written exactly as `x^1`.
	/// 6. The constant term is written as a bare hex number, no exponent.
	/// 7. Terms are separated by exactly `" + "`; minus is not allowed.
	/// 8. No other whitespace is permitted.
	pub fn from_hex_string(coeff_bit_width: usize, hex_str: &str) -> Result<Self> {
		if hex_str == "0" {
			return Ok(Self::new(1, coeff_bit_width));
		}

		let mut terms: Vec<(usize, u64)> = Vec::new();
		let mut max_power = None;

		for term in hex_str.split(" + ") {
			if term.is_empty() || term.contains(char::is_whitespace) {
				return Err(Error::ParseError(format!("malformed term: {term:?}")));
			}
			let (coeff_str, power) = match term.split_once("x^") {
				Some((c, p)) => {
					let power: usize = p
						.parse()
						.map_err(|_| Error::ParseError(format!("invalid exponent in term {term:?}")))?;
					if power == 0 {
						return Err(Error::ParseError("exponent 0 must be written without x^".into()));
					}
					(c, power)
				}
				None => (term, 0),
			};
			if coeff_str.is_empty() || !coeff_str.chars().all(|c| c.is_ascii_hexdigit()) {
				return Err(Error::ParseError(format!("invalid hex coefficient in term {term:?}")));
			}
			let coeff =
				u64::from_str_radix(coeff_str, 16).map_err(|_| Error::ParseError(format!("coefficient overflow in term {term:?}")))?;

			if let Some(prev) = max_power {
				if power >= prev {
					return Err(Error::ParseError("terms must appear in strictly descending powers".into()));
				}
			}
			max_power = Some(power);
			terms.push((power, coeff));
		}

		let degree = terms.first().map(|(p, _)| *p).unwrap_or(0);
		let mut poly = Polynomial::zero(degree + 1, coeff_bit_width);
		for (power, coeff) in terms {
			poly.set_coefficient(power, &WideUint::from_u64(coeff_bit_width, coeff));
		}
		Ok(Self { poly, is_ntt_form: false })
	}

	/// Re-emits this plaintext in the format accepted by
	/// [`Plaintext::from_hex_string`]: hex coefficients, descending powers,
	/// `" + "`-separated, lowercase hex digits.
	pub fn to_hex_string(&self) -> String {
		let n = self.poly.coeff_count();
		let mut terms = Vec::new();
		for i in (0..n).rev() {
			let c = self.poly.get_coefficient(i).low_u64();
			if c == 0 {
				continue;
			}
			let hex = format!("{c:x}");
			match i {
				0 => terms.push(hex),
				1 => terms.push(format!("{hex}x^1")),
				_ => terms.push(format!("{hex}x^{i}")),
			}
		}
		if terms.is_empty() {
			"0".to_string()
		} else {
			terms.join(" + ")
		}
	}

	/// The underlying coefficient polynomial.
	pub fn poly(&self) -> &Polynomial<'static> {
		&self.poly
	}

	/// Mutable access to the underlying coefficient polynomial.
	pub fn poly_mut(&mut self) -> &mut Polynomial<'static> {
		&mut self.poly
	}

	/// Number of coefficients this plaintext holds.
	pub fn len(&self) -> usize {
		self.poly.coeff_count()
	}

	/// True if this plaintext holds no coefficients.
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Reads coefficient `index`.
	pub fn get_coefficient(&self, index: usize) -> u64 {
		self.poly.get_coefficient(index).low_u64()
	}

	/// Overwrites coefficient `index`.
	pub fn set_coefficient(&mut self, index: usize, value: u64) {
		let bits = self.poly.coeff_bit_width();
		self.poly.set_coefficient(index, &WideUint::from_u64(bits, value));
	}

	/// Resizes to `new_count` coefficients, zero-padding on growth.
	pub fn resize(&mut self, new_count: usize) -> Result<()> {
		self.poly.resize(new_count)
	}

	/// True if this plaintext is stored in NTT (evaluation) form, e.g. after
	/// [`crate::evaluator::Evaluator::transform_to_ntt`].
	pub fn is_ntt_form(&self) -> bool {
		self.is_ntt_form
	}

	pub(crate) fn set_ntt_form(&mut self, value: bool) {
		self.is_ntt_form = value;
	}
}

impl ToBytes for Plaintext {
	fn as_bytes(&self) -> Result<Vec<u8>> {
		let mut out = Vec::new();
		out.push(self.is_ntt_form as u8);
		write_polynomial(&mut out, &self.poly);
		Ok(out)
	}
}

impl FromBytes for Plaintext {
	type State = Context;

	fn from_bytes(ctx: &Context, data: &[u8]) -> Result<Self> {
		if data.is_empty() {
			return Err(Error::IoError("truncated plaintext stream".into()));
		}
		let is_ntt_form = data[0] != 0;
		let mut poly = polynomial_from_bytes(&data[1..])?;
		if poly.coeff_count() < ctx.n() {
			poly.resize(ctx.n())?;
		}
		let mut plaintext = Plaintext::from_poly(poly);
		plaintext.set_ntt_form(is_ntt_form);
		Ok(plaintext)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn hex_roundtrip() {
		let p = Plaintext::from_hex_string(64, "1234x^2 + 4321").unwrap();
		assert_eq!(p.get_coefficient(0), 0x4321);
		assert_eq!(p.get_coefficient(1), 0);
		assert_eq!(p.get_coefficient(2), 0x1234);
		assert_eq!(p.to_hex_string(), "1234x^2 + 4321");
	}

	#[test]
	fn hex_requires_descending_powers() {
		let err = Plaintext::from_hex_string(64, "1x^1 + 2x^2").unwrap_err();
		assert!(matches!(err, Error::ParseError(_)));
	}

	#[test]
	fn hex_exponent_one_required_explicit() {
		let p = Plaintext::from_hex_string(64, "ax^1 + b").unwrap();
		assert_eq!(p.get_coefficient(1), 0xa);
		assert_eq!(p.get_coefficient(0), 0xb);
	}

	#[test]
	fn zero_polynomial_parses() {
		let p = Plaintext::from_hex_string(64, "0").unwrap();
		assert_eq!(p.to_hex_string(), "0");
	}
}
