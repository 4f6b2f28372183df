use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pairing_vrf::hcode::encode;
use pairing_vrf::{BigUint, Scheme, Vrf};

fn prover(scheme: Scheme) -> Vrf {
    let mut vrf: Vrf = Vrf::new(scheme);
    vrf.generate(128).unwrap();
    vrf
}

fn bench_hcode_encode(c: &mut Criterion) {
    let data = "1001011100000000111100001010101000000000111111110110011000001101";

    c.bench_function("hcode_encode_64", |b| {
        b.iter(|| {
            let _ = encode(black_box(data));
        });
    });
}

fn bench_eval(c: &mut Criterion) {
    let x = BigUint::from(0x0123_4567_89ab_cdef_u64);
    for scheme in Scheme::ALL {
        let vrf = prover(scheme);
        c.bench_function(&format!("{scheme}_eval"), |b| {
            b.iter(|| {
                let _ = vrf.eval(black_box(&x));
            });
        });
    }
}

fn bench_verify(c: &mut Criterion) {
    let x = BigUint::from(0x0123_4567_89ab_cdef_u64);
    for scheme in Scheme::ALL {
        let vrf = prover(scheme);
        let (value, proof) = vrf.eval(&x).unwrap();
        c.bench_function(&format!("{scheme}_verify"), |b| {
            b.iter(|| {
                let _ = vrf.verify(black_box(&x), black_box(&value), black_box(&proof));
            });
        });
    }
}

fn bench_import(c: &mut Criterion) {
    let source = prover(Scheme::Bmr10);
    let params = source.marshal_params().unwrap();
    let pk = source.marshal_public_key().unwrap();

    c.bench_function("BMR10_import_public_key", |b| {
        b.iter(|| {
            let mut v: Vrf = Vrf::new(Scheme::Bmr10);
            v.unmarshal_params(black_box(&params)).unwrap();
            v.unmarshal_public_key(black_box(&pk)).unwrap();
        });
    });
}

criterion_group! {
    name = benches;
    config = Criterion::default().sample_size(10);
    targets = bench_hcode_encode, bench_eval, bench_verify, bench_import
}
criterion_main!(benches);
