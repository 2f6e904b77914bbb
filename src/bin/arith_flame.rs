use arith_coder::{AdaptiveModel, ArithmeticCoder};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), arith_coder::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let input = (0..100_000u32)
        .map(|i| b'0' + (i * 7 % 10) as u8)
        .collect::<Vec<_>>();
    let coder = ArithmeticCoder::new();
    let digits = b"0123456789";

    let mut packed_len = 0;
    for _ in 0..100 {
        let model = AdaptiveModel::builder().chars(digits).build()?;
        let packed = coder.encode_to_vec(model, &input)?;
        packed_len = packed.len();

        let model = AdaptiveModel::builder().chars(digits).build()?;
        let decoded = coder.decode_to_vec(model, &packed)?;
        assert_eq!(decoded.len(), input.len());
    }

    tracing::info!(input = input.len(), packed = packed_len, "profiling run complete");
    Ok(())
}
