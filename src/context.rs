//! Parameter validation: builds NTT tables and the qualifier flags that
//! downstream components (key generator, encryptor, decryptor, evaluator,
//! batch encoder) dispatch on.

use crate::error::{Error, Result};
use crate::ntt::NttTables;
use crate::parameters::EncryptionParameters;
use crate::uint::WideUint;

/// Derived facts about a parameter set, computed once at validation time
/// and immutable thereafter.
#[derive(Debug, Clone)]
pub struct EncryptionParameterQualifiers {
	/// False if any precondition below failed; when false, every other
	/// field is meaningless and components must refuse to operate
	/// ([`Error::InvalidState`]).
	pub parameters_set: bool,
	/// `poly_modulus` is `X^N+1` with `N` a power of two. Required: if this
	/// is false, `parameters_set` is also false.
	pub enable_nussbaumer: bool,
	/// `q ≡ 1 (mod 2N)` and a primitive `2N`-th root of unity exists mod `q`.
	pub enable_ntt: bool,
	/// `t ≡ 1 (mod 2N)` and a primitive `2N`-th root of unity exists mod `t`.
	pub enable_batching: bool,
	/// `decomposition_bit_count > 0`.
	pub enable_relinearization: bool,
}

/// Precomputed scheme constants that depend only on `(q, t)`.
#[derive(Debug, Clone)]
pub struct SchemeConstants {
	/// `Δ = floor(q/t)`, the plaintext scaling factor.
	pub delta: WideUint<'static>,
	/// `ceil(q/2)`, the symmetric-representative boundary.
	pub upper_half_threshold: WideUint<'static>,
	/// `q - t*Δ`, the remainder used when folding into/out of the upper half.
	pub upper_half_increment: WideUint<'static>,
	/// `Δ/2`, the rounding offset used during decryption.
	pub delta_half: WideUint<'static>,
}

/// A validated parameter set: the entry point every other component is
/// constructed from.
#[derive(Clone)]
pub struct Context {
	params: EncryptionParameters,
	qualifiers: EncryptionParameterQualifiers,
	constants: Option<SchemeConstants>,
	coeff_ntt: Option<NttTables>,
	plain_ntt: Option<NttTables>,
}

impl std::fmt::Debug for Context {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Context")
			.field("params", &self.params)
			.field("qualifiers", &self.qualifiers)
			.finish()
	}
}

impl Context {
	/// Validates `params`, building NTT tables and qualifier flags.
	///
	/// This never fails outright on an unsatisfiable NTT or batching
	/// precondition: those simply clear the corresponding qualifier flag,
	/// per the source's stance that `enable_ntt`/`enable_batching` are
	/// advisory dispatch flags, not hard requirements. It does fail (return
	/// `Err`) on structurally invalid input (e.g. `N == 0`); and it reports
	/// `parameters_set = false` rather than erroring when `N` is not a
	/// power of two or `t >= q`, matching the quantified validation policy.
	pub fn new(params: &EncryptionParameters) -> Result<Self> {
		let n = params.poly_modulus_degree();
		let enable_nussbaumer = n > 0 && n.is_power_of_two();

		let t_ge_q = params.plain_modulus().value() >= params.coeff_modulus().value();
		let parameters_set = enable_nussbaumer && !t_ge_q;

		if !parameters_set {
			return Ok(Self {
				params: params.clone(),
				qualifiers: EncryptionParameterQualifiers {
					parameters_set: false,
					enable_nussbaumer,
					enable_ntt: false,
					enable_batching: false,
					enable_relinearization: params.decomposition_bit_count() > 0,
				},
				constants: None,
				coeff_ntt: None,
				plain_ntt: None,
			});
		}

		let coeff_ntt = NttTables::try_new(n, params.coeff_modulus().descriptor().clone()).ok();
		let enable_ntt = coeff_ntt.is_some();

		let two_n = 2 * n as u64;
		let t_congruent = (params.plain_modulus().value() - 1) % two_n == 0;
		let plain_ntt = if t_congruent {
			NttTables::try_new(n, params.plain_modulus().descriptor().clone()).ok()
		} else {
			None
		};
		let enable_batching = t_congruent && plain_ntt.is_some();

		let enable_relinearization = params.decomposition_bit_count() > 0;

		let constants = Some(compute_scheme_constants(params));

		Ok(Self {
			params: params.clone(),
			qualifiers: EncryptionParameterQualifiers {
				parameters_set: true,
				enable_nussbaumer,
				enable_ntt,
				enable_batching,
				enable_relinearization,
			},
			constants,
			coeff_ntt,
			plain_ntt,
		})
	}

	/// The validated parameters.
	pub fn parameters(&self) -> &EncryptionParameters {
		&self.params
	}

	/// The derived qualifier flags.
	pub fn qualifiers(&self) -> &EncryptionParameterQualifiers {
		&self.qualifiers
	}

	/// Ring dimension `N`.
	pub fn n(&self) -> usize {
		self.params.poly_modulus_degree()
	}

	/// The precomputed scheme constants, or [`Error::InvalidState`] if
	/// `parameters_set` is false.
	pub fn constants(&self) -> Result<&SchemeConstants> {
		self.constants
			.as_ref()
			.ok_or_else(|| Error::InvalidState("parameters did not pass validation".into()))
	}

	/// NTT tables over the coefficient modulus, if `enable_ntt`.
	pub fn coeff_ntt_tables(&self) -> Option<&NttTables> {
		self.coeff_ntt.as_ref()
	}

	/// NTT tables over the plaintext modulus, if `enable_batching`.
	pub fn plain_ntt_tables(&self) -> Option<&NttTables> {
		self.plain_ntt.as_ref()
	}

	/// Convenience check components call before doing any work.
	pub fn require_valid(&self) -> Result<()> {
		if self.qualifiers.parameters_set {
			Ok(())
		} else {
			Err(Error::InvalidState("parameters did not pass validation".into()))
		}
	}
}

fn compute_scheme_constants(params: &EncryptionParameters) -> SchemeConstants {
	let bits = params.coeff_modulus().bit_width();
	let q = WideUint::from_u64(bits, params.coeff_modulus().value());
	let t = WideUint::from_u64(bits, params.plain_modulus().value());

	let (delta, _) = q.div_rem(&t).expect("plain_modulus validated nonzero");
	let one = WideUint::from_u64(bits, 1);
	let (q_plus_1, _) = q.add(&one, bits + 1);
	let two = WideUint::from_u64(bits + 1, 2);
	let (upper_half_threshold, _) = q_plus_1.div_rem(&two).expect("2 != 0");

	let t_delta = t.mul_wide(&delta);
	let (upper_half_increment, _) = q.sub(&t_delta, bits);

	let delta_half = delta.shr(1);

	SchemeConstants {
		delta,
		upper_half_threshold: WideUint::from_limbs(bits, upper_half_threshold.limbs().to_vec()),
		upper_half_increment,
		delta_half,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::parameters::{CoefficientModulus, DegreeType, EncryptionParametersBuilder, PlainModulus};

	fn small_params() -> EncryptionParameters {
		EncryptionParametersBuilder::new()
			.set_poly_modulus_degree(DegreeType::D1024)
			.set_coefficient_modulus(CoefficientModulus::create(DegreeType::D1024, &[30]).unwrap().remove(0))
			.set_plain_modulus(PlainModulus::raw(257).unwrap())
			.build()
			.unwrap()
	}

	#[test]
	fn validates_and_enables_ntt() {
		let params = small_params();
		let ctx = Context::new(&params).unwrap();
		assert!(ctx.qualifiers().parameters_set);
		assert!(ctx.qualifiers().enable_ntt);
		assert!(ctx.qualifiers().enable_nussbaumer);
	}

	#[test]
	fn scheme_constants_match_definitions() {
		let params = small_params();
		let ctx = Context::new(&params).unwrap();
		let constants = ctx.constants().unwrap();
		let q = params.coeff_modulus().value();
		let t = params.plain_modulus().value();
		assert_eq!(constants.delta.low_u64(), q / t);
		assert_eq!(constants.upper_half_threshold.low_u64(), q.div_ceil(2));
	}

	#[test]
	fn plain_modulus_at_least_coeff_modulus_is_rejected_at_build_time() {
		let params = small_params();
		let bad = EncryptionParametersBuilder::new()
			.set_poly_modulus_degree(DegreeType::D1024)
			.set_coefficient_modulus(params.coeff_modulus().clone())
			.set_plain_modulus(crate::parameters::Modulus::new(params.coeff_modulus().value()).unwrap())
			.build();
		assert!(bad.is_err(), "builder rejects t >= q before Context ever sees it");
	}
}
