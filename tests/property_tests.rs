use arith_coder::{AdaptiveModel, ArithmeticCoder};
use proptest::prelude::*;

fn model(chars: &[u8], max_freq: u64) -> AdaptiveModel {
    AdaptiveModel::builder()
        .chars(chars)
        .max_freq(max_freq)
        .build()
        .unwrap()
}

proptest! {
    #[test]
    fn test_roundtrip_restricted_alphabet(
        // Indices into a small alphabet, so the symbol mix is skewed and the
        // reordering swaps actually happen.
        picks in prop::collection::vec(0usize..6, 0..3_000),
        max_freq in 8u64..5_000,
    ) {
        let chars = b"ACGTN-";
        let input: Vec<u8> = picks.iter().map(|&i| chars[i]).collect();
        let coder = ArithmeticCoder::new();

        let packed = coder.encode_to_vec(model(chars, max_freq), &input).unwrap();
        let decoded = coder.decode_to_vec(model(chars, max_freq), &packed).unwrap();

        assert_eq!(input, decoded);
    }

    #[test]
    fn test_roundtrip_any_bytes_any_precision(
        input in prop::collection::vec(any::<u8>(), 0..1_500),
        precision_bits in 12u32..=32,
    ) {
        let coder = ArithmeticCoder::with_precision_bits(precision_bits).unwrap();
        let build = || {
            AdaptiveModel::builder()
                .precision_bits(precision_bits)
                .build()
                .unwrap()
        };

        let packed = coder.encode_to_vec(build(), &input).unwrap();
        let decoded = coder.decode_to_vec(build(), &packed).unwrap();

        assert_eq!(input, decoded);
    }
}
