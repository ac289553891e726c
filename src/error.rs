//! Error types returned by every layer of the engine.

use thiserror::Error;

/// The result type used throughout this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong inside the wide-integer, polynomial, NTT,
/// Nussbaumer, FV scheme, and CRT batching layers.
///
/// Primitives never attempt local recovery: an error is propagated straight
/// to the caller. The single exception is key generation's retry loop on a
/// non-invertible candidate secret key, which never surfaces a
/// [`Error::NotInvertible`] to the caller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
	/// Wrong shape or size, a coefficient out of range, a plaintext too
	/// large for the plaintext modulus, or an attempt to multiply a
	/// ciphertext by a plaintext encoding zero.
	#[error("invalid argument: {0}")]
	InvalidArgument(String),

	/// An operation was attempted before parameter validation succeeded, or
	/// on a component whose parameters have since been invalidated.
	#[error("invalid state: {0}")]
	InvalidState(String),

	/// A resize was attempted on a wide integer or polynomial that is
	/// currently borrowing caller-provided storage.
	#[error("cannot resize an aliasing (borrowed) buffer")]
	AliasMutation,

	/// A modular or polynomial division used a zero divisor.
	#[error("division by zero")]
	DivisionByZero,

	/// A modular inverse was requested of a non-unit (gcd != 1).
	#[error("value has no modular inverse")]
	NotInvertible,

	/// Malformed hexadecimal/polynomial text.
	#[error("failed to parse: {0}")]
	ParseError(String),

	/// A load operation ran out of bytes before the declared shape was
	/// filled in.
	#[error("truncated stream during load: {0}")]
	IoError(String),

	/// A feature was requested that the validated parameters do not
	/// support, e.g. NTT with q not congruent to 1 mod 2N, or batching
	/// with t not congruent to 1 mod 2N.
	#[error("unsupported configuration: {0}")]
	UnsupportedConfiguration(String),
}

impl From<std::io::Error> for Error {
	fn from(e: std::io::Error) -> Self {
		Error::IoError(e.to_string())
	}
}

/// Shorthand for constructing an [`Error::InvalidArgument`] with a formatted
/// message, mirroring the `try_seal!` convenience macro this crate's
/// predecessors used for their own error conversions.
#[macro_export]
macro_rules! invalid_argument {
	($($arg:tt)*) => {
		$crate::error::Error::InvalidArgument(format!($($arg)*))
	};
}
