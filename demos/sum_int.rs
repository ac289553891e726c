use fhe_ring::{
	CoefficientModulus, Context, Decryptor, DegreeType, Encryptor, EncryptionParametersBuilder, Evaluator, KeyGenerator, PlainModulus,
	Plaintext,
};

fn main() -> fhe_ring::Result<()> {
	tracing_subscriber::fmt().with_env_filter(tracing_subscriber::EnvFilter::from_default_env()).init();

	let degree = DegreeType::D8192;

	let params = EncryptionParametersBuilder::new()
		.set_poly_modulus_degree(degree)
		.set_coefficient_modulus(CoefficientModulus::create(degree, &[60])?.remove(0))
		.set_plain_modulus(PlainModulus::batching(degree, 32)?)
		.build()?;

	let ctx = Context::new(&params)?;
	let key_gen = KeyGenerator::new(&ctx)?;
	let encryptor = Encryptor::new(&ctx, key_gen.create_public_key()?)?;
	let mut decryptor = Decryptor::new(&ctx, key_gen.secret_key().clone())?;
	let evaluator = Evaluator::new(&ctx)?;

	let x = 500123;
	let y = 100321;

	let x_encoded = Plaintext::from_hex_string(params.coeff_modulus().bit_width(), &format!("{x:x}"))?;
	let y_encoded = Plaintext::from_hex_string(params.coeff_modulus().bit_width(), &format!("{y:x}"))?;

	let x_enc = encryptor.encrypt(&x_encoded)?;
	let y_enc = encryptor.encrypt(&y_encoded)?;

	let sum = evaluator.add(&x_enc, &y_enc)?;
	let sum_dec = decryptor.decrypt(&sum)?;

	let truth = x + y;
	let result = sum_dec.get_coefficient(0);
	assert_eq!(result, truth as u64);

	tracing::info!(truth, result, "sum_int demo complete");
	println!("truth: {truth}");
	println!("sum: {result}");

	Ok(())
}
