//! Ciphertexts: polynomial arrays of size `M >= 2`, each element a ring
//! element attached to a power of the secret key (`decrypt` computes
//! `sum_j c_j * s^j`).

use crate::context::Context;
use crate::error::{Error, Result};
use crate::poly::Polynomial;
use crate::serialization::{read_ciphertext_body, write_ciphertext_body, FromBytes, ToBytes};

/// A homomorphically-operable ciphertext: an ordered array of ring
/// elements `(c0, c1, ..., c_{M-1})`.
#[derive(Debug, Clone, PartialEq)]
pub struct Ciphertext {
	elements: Vec<Polynomial<'static>>,
	is_ntt_form: bool,
}

impl Ciphertext {
	/// Builds a ciphertext from its polynomial elements. `elements.len()`
	/// must be at least 2.
	pub fn new(elements: Vec<Polynomial<'static>>) -> Result<Self> {
		if elements.len() < 2 {
			return Err(Error::InvalidArgument("ciphertext must have at least 2 elements".into()));
		}
		Ok(Self { elements, is_ntt_form: false })
	}

	/// Builds a ciphertext without the minimum-size check, for internal use
	/// by the evaluator while constructing intermediate products before
	/// they're accumulated into their final shape.
	pub(crate) fn from_elements_unchecked(elements: Vec<Polynomial<'static>>) -> Self {
		Self { elements, is_ntt_form: false }
	}

	/// Number of polynomials in this ciphertext.
	pub fn size(&self) -> usize {
		self.elements.len()
	}

	/// The ring dimension of each element.
	pub fn coeff_count(&self) -> usize {
		self.elements.first().map(|p| p.coeff_count()).unwrap_or(0)
	}

	/// Read-only access to the elements.
	pub fn elements(&self) -> &[Polynomial<'static>] {
		&self.elements
	}

	/// Mutable access to the elements, for in-place homomorphic operations.
	pub fn elements_mut(&mut self) -> &mut Vec<Polynomial<'static>> {
		&mut self.elements
	}

	/// Element `index`.
	pub fn element(&self, index: usize) -> &Polynomial<'static> {
		&self.elements[index]
	}

	/// True if this ciphertext is stored in NTT (evaluation) form.
	pub fn is_ntt_form(&self) -> bool {
		self.is_ntt_form
	}

	pub(crate) fn set_ntt_form(&mut self, value: bool) {
		self.is_ntt_form = value;
	}
}

impl ToBytes for Ciphertext {
	fn as_bytes(&self) -> Result<Vec<u8>> {
		let mut out = Vec::new();
		out.push(self.is_ntt_form as u8);
		write_ciphertext_body(&mut out, &self.elements);
		Ok(out)
	}
}

impl FromBytes for Ciphertext {
	type State = Context;

	fn from_bytes(ctx: &Context, data: &[u8]) -> Result<Self> {
		if data.is_empty() {
			return Err(Error::IoError("truncated ciphertext stream".into()));
		}
		let is_ntt_form = data[0] != 0;
		let elements = read_ciphertext_body(&data[1..], ctx.n())?;
		let mut ciphertext = Ciphertext::new(elements)?;
		ciphertext.set_ntt_form(is_ntt_form);
		Ok(ciphertext)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::poly::Polynomial;

	#[test]
	fn rejects_undersized_ciphertext() {
		let err = Ciphertext::new(vec![Polynomial::zero(4, 64)]).unwrap_err();
		assert!(matches!(err, Error::InvalidArgument(_)));
	}

	#[test]
	fn exposes_size_and_elements() {
		let ct = Ciphertext::new(vec![Polynomial::zero(4, 64), Polynomial::zero(4, 64)]).unwrap();
		assert_eq!(ct.size(), 2);
		assert_eq!(ct.coeff_count(), 4);
	}
}
