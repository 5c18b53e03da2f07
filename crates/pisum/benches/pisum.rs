use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use num_bigint::BigUint;
use pisum::paillier::KeyPair;
use pisum::protocol::{run_protocol, PartyOne, PartyTwo};
use pisum::ProtocolParametersBuilder;
use pisum_math::zp::{DdhGroup, HashToGroup};
use pisum_traits::{AheDecrypter, AheEncrypter};
use rand::thread_rng;
use std::time::Duration;

fn group(c: &mut Criterion) {
    let mut group = c.benchmark_group("group");
    group.sample_size(10);
    group.measurement_time(Duration::from_secs(5));
    let mut rng = thread_rng();

    for (name, ddh) in [
        ("modp_1536", DdhGroup::modp_1536()),
        ("modp_2048", DdhGroup::modp_2048()),
    ] {
        let k = ddh.random_scalar(&mut rng);
        let h = ddh.hash_to_element(b"bench@example.com").unwrap();

        group.bench_function(BenchmarkId::new("hash_to_element", name), |b| {
            b.iter(|| ddh.hash_to_element(b"bench@example.com").unwrap());
        });

        let reference = ddh.clone().with_hash_to_group(HashToGroup::GeneratorExponent);
        group.bench_function(BenchmarkId::new("hash_to_element_reference", name), |b| {
            b.iter(|| reference.hash_to_element(b"bench@example.com").unwrap());
        });

        group.bench_function(BenchmarkId::new("power", name), |b| {
            b.iter(|| ddh.power(&h, &k).unwrap());
        });
    }

    group.finish();
}

fn paillier(c: &mut Criterion) {
    let mut group = c.benchmark_group("paillier");
    group.sample_size(10);
    group.measurement_time(Duration::from_secs(5));
    let mut rng = thread_rng();

    for bits in [1024usize, 2048] {
        let keys = KeyPair::generate(bits, 20, &mut rng).unwrap();
        let ek = keys.encryption_key();
        let dk = keys.decryption_key();
        let ct = ek.try_encrypt(&BigUint::from(42u32), &mut rng).unwrap();

        group.bench_function(BenchmarkId::new("encrypt", bits), |b| {
            b.iter(|| ek.try_encrypt(&BigUint::from(42u32), &mut rng).unwrap());
        });

        group.bench_function(BenchmarkId::new("add", bits), |b| {
            b.iter(|| ek.add(&ct, &ct).unwrap());
        });

        group.bench_function(BenchmarkId::new("decrypt", bits), |b| {
            b.iter(|| dk.try_decrypt(&ct).unwrap());
        });
    }

    group.finish();
}

fn protocol(c: &mut Criterion) {
    let mut group = c.benchmark_group("protocol");
    group.sample_size(10);
    group.measurement_time(Duration::from_secs(30));
    let mut rng = thread_rng();

    let par = ProtocolParametersBuilder::new()
        .set_group(DdhGroup::modp_1536())
        .set_paillier_bits(1024)
        .allow_insecure_sizes()
        .build_arc()
        .unwrap();

    for size in [16usize, 128] {
        let p1_ids = (0..size).map(|i| format!("id{i}")).collect::<Vec<_>>();
        let p2_entries = (size / 2..size + size / 2)
            .map(|i| (format!("id{i}"), i as u64))
            .collect::<Vec<_>>();

        group.bench_function(BenchmarkId::new("run", size), |b| {
            b.iter(|| {
                let mut p1 = PartyOne::new(&p1_ids, &par, &mut rng);
                let mut p2 = PartyTwo::new(p2_entries.clone(), &par, &mut rng).unwrap();
                run_protocol(&mut p1, &mut p2, &mut rng).unwrap()
            });
        });
    }

    group.finish();
}

criterion_group!(benches, group, paillier, protocol);
criterion_main!(benches);
