//! Adaptive frequency model.
//!
//! Every symbol starts with frequency 1 and gains one count each time it is
//! seen. When the total reaches `max_freq`, all counts are halved (rounding
//! up, so no symbol ever drops to zero). A smaller `max_freq` gives the model
//! a shorter memory and lets recent statistics dominate.
//!
//! Symbols are kept loosely sorted by descending frequency: before a count
//! is incremented, the symbol trades characters with the lowest-indexed
//! symbol of equal frequency. Frequent characters therefore sit at low
//! indices, where the decoder's linear search finds them first.

use tracing::trace;

use crate::alphabet::Alphabet;
use crate::coder::{
    max_frequency, DEFAULT_PRECISION_BITS, MAX_PRECISION_BITS, MIN_PRECISION_BITS,
};
use crate::error::{Error, Result};
use crate::model::{Lifecycle, LifecycleState, Model};

/// Adaptive model; build one per encode or decode pass.
///
/// ```
/// use arith_coder::{AdaptiveModel, ArithmeticCoder};
///
/// let coder = ArithmeticCoder::new();
/// let digits = b"0123456789";
///
/// let model = AdaptiveModel::builder().chars(digits).build().unwrap();
/// let packed = coder.encode_to_vec(model, b"31415926535").unwrap();
///
/// let model = AdaptiveModel::builder().chars(digits).build().unwrap();
/// assert_eq!(coder.decode_to_vec(model, &packed).unwrap(), b"31415926535");
/// ```
#[derive(Clone, Debug)]
pub struct AdaptiveModel {
    alphabet: Alphabet,
    /// Indexed by symbol; `freq[0]` stays 0.
    freq: Vec<u64>,
    cumulative: Vec<u64>,
    max_freq: u64,
    lifecycle: Lifecycle,
}

impl AdaptiveModel {
    /// Start configuring a model.
    pub fn builder() -> AdaptiveModelBuilder {
        AdaptiveModelBuilder::default()
    }

    fn new(alphabet: Alphabet, max_freq: u64) -> Self {
        let n = alphabet.num_symbols();
        let mut freq = vec![1u64; n + 1];
        freq[0] = 0;
        let cumulative = (0..=n).map(|i| (n - i) as u64).collect();
        Self {
            alphabet,
            freq,
            cumulative,
            max_freq,
            lifecycle: Lifecycle::default(),
        }
    }

    /// Frequency of `symbol`.
    pub fn frequency(&self, symbol: usize) -> u64 {
        self.freq[symbol]
    }

    /// Rescale ceiling of this model.
    pub fn max_freq(&self) -> u64 {
        self.max_freq
    }

    /// Current lifecycle state.
    pub fn state(&self) -> LifecycleState {
        self.lifecycle.state()
    }

    fn rescale(&mut self) {
        let mut running = 0u64;
        let slots = self.freq.iter_mut().zip(self.cumulative.iter_mut());
        for (freq, cum) in slots.rev() {
            *freq = freq.div_ceil(2);
            *cum = running;
            running += *freq;
        }
        trace!(total = self.cumulative[0], "rescaled adaptive model");
    }
}

impl Model for AdaptiveModel {
    fn char_to_symbol(&self, ch: u8) -> Option<usize> {
        self.alphabet.char_to_symbol(ch)
    }

    fn symbol_to_char(&self, symbol: usize) -> Option<u8> {
        self.alphabet.symbol_to_char(symbol)
    }

    fn eof_symbol(&self) -> usize {
        self.alphabet.eof_symbol()
    }

    fn cumulative_frequency(&self) -> &[u64] {
        &self.cumulative
    }

    fn max_total(&self) -> u64 {
        self.max_freq
    }

    fn update(&mut self, symbol: usize) {
        // Only character symbols adapt; end-of-stream keeps frequency 1.
        if symbol == 0 || symbol >= self.eof_symbol() {
            return;
        }
        if self.cumulative[0] >= self.max_freq {
            self.rescale();
        }

        // freq[0] == 0 stops the scan at symbol 1 at the latest.
        let mut i = symbol;
        while self.freq[i] == self.freq[i - 1] {
            i -= 1;
        }
        if i < symbol {
            self.alphabet.swap(i, symbol);
        }

        self.freq[i] += 1;
        for cum in &mut self.cumulative[..i] {
            *cum += 1;
        }
    }

    fn start_encode(&mut self) -> Result<()> {
        self.lifecycle.start()
    }

    fn finish_encode(&mut self) {
        self.lifecycle.finish();
    }

    fn start_decode(&mut self) -> Result<()> {
        self.lifecycle.start()
    }

    fn finish_decode(&mut self) {
        self.lifecycle.finish();
    }
}

/// Builder for [`AdaptiveModel`].
#[derive(Clone, Debug, Default)]
pub struct AdaptiveModelBuilder {
    chars: Option<Vec<u8>>,
    max_freq: Option<u64>,
    precision_bits: Option<u32>,
}

impl AdaptiveModelBuilder {
    /// Characters to encode, in initial symbol order. Defaults to all 256 byte values.
    pub fn chars(mut self, chars: &[u8]) -> Self {
        self.chars = Some(chars.to_vec());
        self
    }

    /// Total frequency at which counts are halved.
    ///
    /// Defaults to the largest value the coder precision allows.
    pub fn max_freq(mut self, max_freq: u64) -> Self {
        self.max_freq = Some(max_freq);
        self
    }

    /// Coder precision the ceiling is checked against. Defaults to 30.
    pub fn precision_bits(mut self, bits: u32) -> Self {
        self.precision_bits = Some(bits);
        self
    }

    /// Validate the configuration and build the model.
    ///
    /// # Errors
    /// - `Error::InvalidPrecision` for an unsupported precision
    /// - `Error::EmptyAlphabet` / `Error::DuplicateCharacter` for a bad alphabet
    /// - `Error::MaxFrequencyTooLarge` if the ceiling exceeds `2^(precision - 2) - 1`
    /// - `Error::MaxFrequencyTooSmall` if the ceiling does not exceed the symbol count
    pub fn build(self) -> Result<AdaptiveModel> {
        let precision = self.precision_bits.unwrap_or(DEFAULT_PRECISION_BITS);
        if !(MIN_PRECISION_BITS..=MAX_PRECISION_BITS).contains(&precision) {
            return Err(Error::InvalidPrecision(precision));
        }
        let ceiling = max_frequency(precision);

        let alphabet = match self.chars {
            Some(chars) => Alphabet::new(&chars)?,
            None => Alphabet::bytes(),
        };

        let max_freq = self.max_freq.unwrap_or(ceiling);
        if max_freq > ceiling {
            return Err(Error::MaxFrequencyTooLarge {
                requested: max_freq,
                ceiling,
            });
        }
        let symbols = alphabet.num_symbols();
        if max_freq <= symbols as u64 {
            return Err(Error::MaxFrequencyTooSmall {
                requested: max_freq,
                symbols,
            });
        }

        Ok(AdaptiveModel::new(alphabet, max_freq))
    }
}
