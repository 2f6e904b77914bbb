use arith_coder::{AdaptiveModel, ArithmeticCoder};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const DIGITS: &[u8] = b"0123456789";

fn random_digits(rng: &mut ChaCha8Rng, len: usize) -> Vec<u8> {
    (0..len).map(|_| DIGITS[rng.gen_range(0..DIGITS.len())]).collect()
}

fn roundtrip(coder: &ArithmeticCoder, input: &[u8]) -> Vec<u8> {
    let model = AdaptiveModel::builder().chars(DIGITS).build().unwrap();
    let packed = coder.encode_to_vec(model, input).unwrap();
    let model = AdaptiveModel::builder().chars(DIGITS).build().unwrap();
    coder.decode_to_vec(model, &packed).unwrap()
}

#[test]
fn test_random_digits_roundtrip() {
    let coder = ArithmeticCoder::new();
    let mut rng = ChaCha8Rng::seed_from_u64(0x5eed);
    for _ in 0..10 {
        let len = rng.gen_range(0..200_000);
        let input = random_digits(&mut rng, len);
        assert_eq!(roundtrip(&coder, &input), input);
    }
}

#[test]
fn test_full_length_digits_near_entropy() {
    let coder = ArithmeticCoder::new();
    let mut rng = ChaCha8Rng::seed_from_u64(200_000);
    let input = random_digits(&mut rng, 200_000);

    let model = AdaptiveModel::builder().chars(DIGITS).build().unwrap();
    let packed = coder.encode_to_vec(model, &input).unwrap();
    // log2(10) = 3.32 bits per digit, plus a little model-learning overhead.
    let bits_per_digit = packed.len() as f64 * 8.0 / input.len() as f64;
    assert!(bits_per_digit < 3.35, "{bits_per_digit} bits per digit");

    let model = AdaptiveModel::builder().chars(DIGITS).build().unwrap();
    assert_eq!(coder.decode_to_vec(model, &packed).unwrap(), input);
}

#[test]
fn test_concurrent_roundtrips_share_one_coder() {
    let coder = ArithmeticCoder::new();
    let inputs: Vec<Vec<u8>> = (0..10u64)
        .map(|seed| {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let len = rng.gen_range(0..200_000);
            random_digits(&mut rng, len)
        })
        .collect();

    std::thread::scope(|scope| {
        let handles: Vec<_> = inputs
            .iter()
            .map(|input| scope.spawn(move || roundtrip(&coder, input)))
            .collect();
        for (handle, input) in handles.into_iter().zip(&inputs) {
            assert_eq!(&handle.join().unwrap(), input);
        }
    });
}
