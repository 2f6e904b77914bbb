#![no_main]
use arith_coder::{AdaptiveModel, ArithmeticCoder};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: (Vec<u8>, u16, bool)| {
    let (input, max_freq, restricted) = data;

    // Restricted runs fold the input onto a 4-character alphabet with a short
    // memory so rescaling and symbol swaps get exercised.
    let (chars, input): (Vec<u8>, Vec<u8>) = if restricted {
        (b"abcd".to_vec(), input.iter().map(|b| b"abcd"[(b % 4) as usize]).collect())
    } else {
        ((0..=255).collect(), input)
    };
    let max_freq = chars.len() as u64 + 2 + max_freq as u64;
    let build = || {
        AdaptiveModel::builder()
            .chars(&chars)
            .max_freq(max_freq)
            .build()
            .unwrap()
    };

    let coder = ArithmeticCoder::new();
    let packed = coder.encode_to_vec(build(), &input).unwrap();
    let decoded = coder.decode_to_vec(build(), &packed).unwrap();

    assert_eq!(input, decoded);
});
