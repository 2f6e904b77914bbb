//! Error types for arithmetic coding.

use thiserror::Error;

use crate::model::LifecycleState;

/// Error variants for coding operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The alphabet has no characters.
    #[error("alphabet must contain at least one character")]
    EmptyAlphabet,

    /// A character appears more than once in the alphabet.
    #[error("duplicate character {0:#04x} in alphabet")]
    DuplicateCharacter(u8),

    /// The requested rescale ceiling would allow the interval arithmetic to overflow.
    #[error("max frequency {requested} exceeds ceiling {ceiling}")]
    MaxFrequencyTooLarge {
        /// Requested ceiling.
        requested: u64,
        /// Largest safe ceiling for the precision.
        ceiling: u64,
    },

    /// The rescale ceiling cannot hold one count per symbol.
    #[error("max frequency {requested} must exceed the symbol count {symbols}")]
    MaxFrequencyTooSmall {
        /// Requested ceiling.
        requested: u64,
        /// Number of symbols, end-of-stream included.
        symbols: usize,
    },

    /// Precision outside the supported range.
    #[error("precision of {0} bits is not supported")]
    InvalidPrecision(u32),

    /// A static model was given the wrong number of counts.
    #[error("expected {expected} frequency counts, got {got}")]
    FrequencyCountMismatch {
        /// Alphabet size.
        expected: usize,
        /// Counts supplied.
        got: usize,
    },

    /// The cumulative frequency table is not strictly decreasing, or is not terminated by 0.
    #[error("malformed cumulative frequency table at index {index} (value {value})")]
    MalformedCumulativeTable {
        /// First offending index.
        index: usize,
        /// Value at that index.
        value: u64,
    },

    /// The model total does not fit the coder's precision.
    #[error("cumulative total {total} exceeds coder ceiling {ceiling}")]
    TotalFrequencyTooLarge {
        /// Total from the model.
        total: u64,
        /// Largest total the coder accepts.
        ceiling: u64,
    },

    /// The model has no character for a symbol the decoder produced.
    #[error("model has no character for symbol {0}")]
    UnmappedSymbol(usize),

    /// An input byte is not part of the model alphabet.
    #[error("character {0:#04x} is not in the model alphabet")]
    UnknownCharacter(u8),

    /// A model was started twice, or started after it was finished.
    #[error("model cannot be reused (state: {0:?}); create a new instance")]
    ModelReuse(LifecycleState),

    /// The decoder read more bits past the end of the input than it may.
    #[error("read past end of stream ({garbage_bits} garbage bits)")]
    StreamExhausted {
        /// Garbage bits requested when the budget ran out.
        garbage_bits: u32,
    },

    /// An I/O error occurred during encoding or decoding.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Broad classification of an [`Error`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Invalid alphabet, ceiling, precision, frequency table or symbol mapping.
    Configuration,
    /// Input data the model cannot represent.
    Input,
    /// A model was driven through its lifecycle out of order.
    Lifecycle,
    /// Truncated or corrupted compressed input.
    StreamExhausted,
    /// Failure in the underlying byte source or sink.
    Io,
}

impl Error {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::EmptyAlphabet
            | Error::DuplicateCharacter(_)
            | Error::MaxFrequencyTooLarge { .. }
            | Error::MaxFrequencyTooSmall { .. }
            | Error::InvalidPrecision(_)
            | Error::FrequencyCountMismatch { .. }
            | Error::MalformedCumulativeTable { .. }
            | Error::TotalFrequencyTooLarge { .. }
            | Error::UnmappedSymbol(_) => ErrorKind::Configuration,
            Error::UnknownCharacter(_) => ErrorKind::Input,
            Error::ModelReuse(_) => ErrorKind::Lifecycle,
            Error::StreamExhausted { .. } => ErrorKind::StreamExhausted,
            Error::Io(_) => ErrorKind::Io,
        }
    }
}

/// A specialized Result type for coding operations.
pub type Result<T> = std::result::Result<T, Error>;
