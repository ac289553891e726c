use fhe_ring::{
	CoefficientModulus, Context, Decryptor, DegreeType, Encryptor, EncryptionParametersBuilder, Evaluator, KeyGenerator, PlainModulus,
	Plaintext,
};

fn main() -> fhe_ring::Result<()> {
	tracing_subscriber::fmt().with_env_filter(tracing_subscriber::EnvFilter::from_default_env()).init();

	let degree = DegreeType::D8192;

	let params = EncryptionParametersBuilder::new()
		.set_poly_modulus_degree(degree)
		.set_coefficient_modulus(CoefficientModulus::create(degree, &[50, 30, 30]).unwrap().remove(0))
		.set_plain_modulus(PlainModulus::batching(degree, 32)?)
		.build()?;

	let ctx = Context::new(&params)?;
	let gen = KeyGenerator::new(&ctx)?;

	let encryptor = Encryptor::new(&ctx, gen.create_public_key()?)?;
	let mut decryptor = Decryptor::new(&ctx, gen.secret_key().clone())?;
	let evaluator = Evaluator::new(&ctx)?;

	let bits = params.coeff_modulus().bit_width();
	let plaintext = Plaintext::from_hex_string(bits, "7")?;
	let factor = Plaintext::from_hex_string(bits, "2")?;

	let ciphertext = encryptor.encrypt(&plaintext)?;
	let ciphertext_result = evaluator.multiply_plain(&ciphertext, &factor)?;

	let decrypted = decryptor.decrypt(&ciphertext_result)?;
	let result = decrypted.get_coefficient(0);
	tracing::info!(result, "multiply_plain demo complete");
	println!("{result:?}"); // 14

	Ok(())
}
