//! A Fan–Vercauteren (FV/BFV) homomorphic encryption engine over
//! `R_q = Z_q[X]/(X^N+1)`, `N` a power of two.
//!
//! Layers, bottom to top: wide-integer modular arithmetic ([`uint`]),
//! polynomial arithmetic over that ring ([`poly`]), two fast-multiplication
//! backends ([`ntt`], [`nussbaumer`]), randomness ([`rng`]), parameter
//! validation ([`context`]), the scheme itself ([`keys`], [`encryptor`],
//! [`decryptor`], [`evaluator`]), and CRT batching ([`batch_encoder`]).
//!
//! # Example
//!
//! ```rust
//! use fhe_ring::{
//!     CoefficientModulus, Context, DegreeType, Encryptor, EncryptionParametersBuilder,
//!     Decryptor, Evaluator, KeyGenerator, PlainModulus, Plaintext,
//! };
//!
//! fn main() -> fhe_ring::Result<()> {
//!     let params = EncryptionParametersBuilder::new()
//!         .set_poly_modulus_degree(DegreeType::D1024)
//!         .set_coefficient_modulus(CoefficientModulus::create(DegreeType::D1024, &[30])?.remove(0))
//!         .set_plain_modulus(PlainModulus::raw(257)?)
//!         .build()?;
//!
//!     let ctx = Context::new(&params)?;
//!     let keygen = KeyGenerator::new(&ctx)?;
//!     let encryptor = Encryptor::new(&ctx, keygen.create_public_key()?)?;
//!     let mut decryptor = Decryptor::new(&ctx, keygen.secret_key().clone())?;
//!     let evaluator = Evaluator::new(&ctx)?;
//!
//!     let a = Plaintext::from_hex_string(params.coeff_modulus().bit_width(), "5")?;
//!     let b = Plaintext::from_hex_string(params.coeff_modulus().bit_width(), "7")?;
//!
//!     let ct_a = encryptor.encrypt(&a)?;
//!     let ct_b = encryptor.encrypt(&b)?;
//!     let ct_sum = evaluator.add(&ct_a, &ct_b)?;
//!
//!     let decrypted = decryptor.decrypt(&ct_sum)?;
//!     assert_eq!(decrypted.get_coefficient(0), 12);
//!     Ok(())
//! }
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![warn(missing_docs)]

pub mod batch_encoder;
pub mod ciphertext;
pub mod context;
pub mod decryptor;
pub mod encryptor;
pub mod error;
pub mod evaluator;
pub mod keys;
pub mod memory;
pub mod ntt;
pub mod nussbaumer;
pub mod parameters;
pub mod plaintext;
pub mod poly;
pub mod rng;
pub mod serialization;
pub mod uint;

pub use batch_encoder::PolyCrtBuilder;
pub use ciphertext::Ciphertext;
pub use context::{Context, EncryptionParameterQualifiers, SchemeConstants};
pub use decryptor::Decryptor;
pub use encryptor::Encryptor;
pub use error::{Error, Result};
pub use evaluator::Evaluator;
pub use keys::{EvaluationKeyEntry, KeyGenerator, PublicKey, RelinearizationKey, SecretKey};
pub use memory::MemoryPool;
pub use parameters::{
	CoefficientModulus, DegreeType, EncryptionParameters, EncryptionParametersBuilder, Modulus, PlainModulus, SecurityLevel,
	DEFAULT_DECOMPOSITION_BIT_COUNT, DEFAULT_NOISE_MAX_DEVIATION, DEFAULT_NOISE_STANDARD_DEVIATION,
};
pub use plaintext::Plaintext;
pub use serialization::{FromBytes, ToBytes};
pub use uint::{ModulusDescriptor, WideUint};
