use arith_coder::{AdaptiveModel, ArithmeticCoder};
use criterion::{criterion_group, criterion_main, Criterion, Throughput};

fn digit_input(len: usize) -> Vec<u8> {
    // Skewed digits so the model has something to learn.
    (0..len)
        .map(|i| b'0' + ((i * i + i / 7) % 10).min((i % 4) * 3) as u8)
        .collect()
}

fn digits_model() -> AdaptiveModel {
    AdaptiveModel::builder().chars(b"0123456789").build().unwrap()
}

fn bench_digits(c: &mut Criterion) {
    let mut group = c.benchmark_group("adaptive_digits");
    let input = digit_input(100_000);
    let coder = ArithmeticCoder::new();
    group.throughput(Throughput::Bytes(input.len() as u64));

    group.bench_function("encode", |b| {
        b.iter(|| coder.encode_to_vec(digits_model(), &input).unwrap())
    });

    let packed = coder.encode_to_vec(digits_model(), &input).unwrap();

    group.bench_function("decode", |b| {
        b.iter(|| coder.decode_to_vec(digits_model(), &packed).unwrap())
    });
}

fn bench_bytes(c: &mut Criterion) {
    let mut group = c.benchmark_group("adaptive_bytes");
    // Text-like byte stream over the full 256-symbol alphabet.
    let input = b"It was the best of times, it was the worst of times. "
        .iter()
        .copied()
        .cycle()
        .take(100_000)
        .collect::<Vec<_>>();
    let coder = ArithmeticCoder::new();
    group.throughput(Throughput::Bytes(input.len() as u64));

    group.bench_function("encode", |b| {
        b.iter(|| {
            coder
                .encode_to_vec(AdaptiveModel::builder().build().unwrap(), &input)
                .unwrap()
        })
    });

    let packed = coder
        .encode_to_vec(AdaptiveModel::builder().build().unwrap(), &input)
        .unwrap();

    group.bench_function("decode", |b| {
        b.iter(|| {
            coder
                .decode_to_vec(AdaptiveModel::builder().build().unwrap(), &packed)
                .unwrap()
        })
    });
}

criterion_group!(benches, bench_digits, bench_bytes);
criterion_main!(benches);
