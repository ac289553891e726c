use criterion::{black_box, criterion_group, criterion_main, Criterion};

use fhe_ring::{
	Ciphertext, CoefficientModulus, Context, DegreeType, Encryptor, EncryptionParametersBuilder, Error, Evaluator, KeyGenerator,
	PlainModulus, PolyCrtBuilder,
};

fn generate_client_vectors(num_clients: usize, slot_count: usize) -> Vec<Vec<u64>> {
	let mut clients = Vec::with_capacity(num_clients);
	for client_idx in 0..num_clients {
		let mut values = Vec::with_capacity(slot_count);
		for slot in 0..slot_count {
			values.push(((client_idx * 7 + slot * 3) % 101) as u64);
		}
		clients.push(values);
	}
	clients
}

fn create_bfv_context(degree: DegreeType, bit_size: u32) -> Result<Context, Error> {
	let params = EncryptionParametersBuilder::new()
		.set_poly_modulus_degree(degree)
		.set_coefficient_modulus(CoefficientModulus::create(degree, &[bit_size])?.remove(0))
		.set_plain_modulus(PlainModulus::batching(degree, 20)?)
		.build()?;

	Context::new(&params)
}

fn aggregate(ctx: &Context, ciphertexts: &[Ciphertext]) -> Result<Ciphertext, Error> {
	let evaluator = Evaluator::new(ctx)?;
	evaluator.add_many(ciphertexts)
}

fn criterion_benchmark(c: &mut Criterion) {
	let _ = tracing_subscriber::fmt().with_env_filter(tracing_subscriber::EnvFilter::from_default_env()).try_init();

	let degree = DegreeType::D4096;
	let num_clients = 10;

	let ctx = create_bfv_context(degree, 40).expect("failed to create context");
	let batcher = PolyCrtBuilder::new(&ctx).expect("batching requires an NTT-friendly plain modulus");
	let key_gen = KeyGenerator::new(&ctx).expect("failed to create key generator");
	let encryptor = Encryptor::new(&ctx, key_gen.create_public_key().expect("public key derivation")).expect("failed to create encryptor");

	let clients = generate_client_vectors(num_clients, batcher.slot_count());

	let ciphertexts: Vec<Ciphertext> = clients
		.iter()
		.map(|client| {
			let plaintext = batcher.compose(client).expect("compose client vector");
			encryptor.encrypt(&plaintext).expect("encrypt client vector")
		})
		.collect();

	c.bench_function("aggregate 10 clients BFV", |b| {
		b.iter(|| aggregate(black_box(&ctx), black_box(&ciphertexts)))
	});
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
