//! Probability models driving the coder.
//!
//! A model owns the character/symbol bijection and a cumulative frequency
//! table `cum` of `eof_symbol + 1` entries: `cum[0]` is the total, `cum[eof]`
//! is 0, and symbol `s` owns the half-open window `[cum[s], cum[s - 1])`.
//! Entries must strictly decrease with the index; the coder checks this once
//! at the start of every pass.

use crate::alphabet::Alphabet;
use crate::error::{Error, Result};

/// Capabilities the coder needs from a model.
///
/// A model instance serves exactly one encode or one decode pass. The
/// `start_*` hooks enforce this and the coder always runs the matching
/// `finish_*` hook, even when the pass fails.
pub trait Model {
    /// Symbol for an input character, if it belongs to the alphabet.
    fn char_to_symbol(&self, ch: u8) -> Option<usize>;

    /// Character for a decoded symbol. `None` for the end-of-stream symbol.
    fn symbol_to_char(&self, symbol: usize) -> Option<u8>;

    /// The reserved end-of-stream symbol (highest index).
    fn eof_symbol(&self) -> usize;

    /// Current cumulative frequency table.
    ///
    /// The contents may change after every call to [`Model::update`].
    fn cumulative_frequency(&self) -> &[u64];

    /// Largest total `cumulative_frequency()[0]` can reach over the pass.
    ///
    /// The coder rejects a model whose bound exceeds its precision before any
    /// input is read.
    fn max_total(&self) -> u64;

    /// Adapt to a symbol that was just encoded or decoded.
    fn update(&mut self, symbol: usize);

    /// Called before the first symbol is encoded.
    fn start_encode(&mut self) -> Result<()>;

    /// Called once encoding stops, successfully or not.
    fn finish_encode(&mut self);

    /// Called before the first symbol is decoded.
    fn start_decode(&mut self) -> Result<()>;

    /// Called once decoding stops, successfully or not.
    fn finish_decode(&mut self);
}

/// Position of a model in its single-use lifecycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LifecycleState {
    /// Freshly built.
    #[default]
    Initial,
    /// An encode or decode pass is running.
    InUse,
    /// The pass has finished; the model cannot be used again.
    Done,
}

/// `Initial -> InUse -> Done` state machine shared by the model strategies.
#[derive(Clone, Debug, Default)]
pub struct Lifecycle {
    state: LifecycleState,
}

impl Lifecycle {
    /// Enter `InUse`.
    ///
    /// # Errors
    /// Returns `Error::ModelReuse` unless the state is `Initial`.
    pub fn start(&mut self) -> Result<()> {
        if self.state != LifecycleState::Initial {
            return Err(Error::ModelReuse(self.state));
        }
        self.state = LifecycleState::InUse;
        Ok(())
    }

    /// Enter `Done` unconditionally.
    pub fn finish(&mut self) {
        self.state = LifecycleState::Done;
    }

    /// Current state.
    pub fn state(&self) -> LifecycleState {
        self.state
    }
}

/// A model with a fixed frequency table.
///
/// Useful when the symbol distribution is known in advance. The
/// end-of-stream symbol always has frequency 1.
#[derive(Clone, Debug)]
pub struct StaticModel {
    alphabet: Alphabet,
    cumulative: Vec<u64>,
    lifecycle: Lifecycle,
}

impl StaticModel {
    /// Build from one count per character, in alphabet order.
    ///
    /// Counts of zero are accepted here but produce a table the coder rejects.
    ///
    /// # Errors
    /// Returns `Error::FrequencyCountMismatch` if `counts` does not match the alphabet size.
    pub fn from_counts(alphabet: Alphabet, counts: &[u64]) -> Result<Self> {
        if counts.len() != alphabet.num_chars() {
            return Err(Error::FrequencyCountMismatch {
                expected: alphabet.num_chars(),
                got: counts.len(),
            });
        }

        let eof = alphabet.eof_symbol();
        let mut cumulative = vec![0u64; eof + 1];
        cumulative[eof - 1] = 1;
        // A fresh alphabet numbers characters in order, so symbol `s` counts `counts[s - 1]`.
        for symbol in (1..eof).rev() {
            cumulative[symbol - 1] = cumulative[symbol].saturating_add(counts[symbol - 1]);
        }

        Ok(Self {
            alphabet,
            cumulative,
            lifecycle: Lifecycle::default(),
        })
    }

    /// Build from the character counts of a sample, each smoothed by +1.
    ///
    /// # Errors
    /// Returns `Error::UnknownCharacter` if the sample contains a character outside the alphabet.
    pub fn from_sample(alphabet: Alphabet, sample: &[u8]) -> Result<Self> {
        let mut counts = vec![1u64; alphabet.num_chars()];
        for &ch in sample {
            let symbol = alphabet
                .char_to_symbol(ch)
                .ok_or(Error::UnknownCharacter(ch))?;
            counts[symbol - 1] += 1;
        }
        Self::from_counts(alphabet, &counts)
    }

    /// Current lifecycle state.
    pub fn state(&self) -> LifecycleState {
        self.lifecycle.state()
    }
}

impl Model for StaticModel {
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
        self.cumulative[0]
    }

    fn update(&mut self, _symbol: usize) {}

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
