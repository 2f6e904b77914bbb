//! # Adaptive Arithmetic Coding
//!
//! *Near-entropy lossless compression of symbol streams, with no prior statistics.*
//!
//! ## Intuition First
//!
//! Think of a message as an address inside the unit interval. The first symbol
//! picks a slice of `[0, 1)` whose width is that symbol's probability; the next
//! symbol picks a slice of that slice, and so on. After the whole message, any
//! number inside the final sliver identifies it, and a sliver of width `p`
//! takes about `-log2(p)` bits to name. Likely messages get wide slivers and
//! short codes.
//!
//! ## The Problem
//!
//! Done with exact fractions, the interval shrinks forever and needs unbounded
//! precision. Huffman coding avoids arithmetic altogether but rounds every
//! probability to a power of two, losing up to a bit per symbol on skewed
//! data.
//!
//! ## Historical Context
//!
//! ```text
//! 1948  Shannon          Entropy as the fundamental limit
//! 1952  Huffman          Prefix codes: fast, but whole bits per symbol
//! 1976  Rissanen, Pasco  Arithmetic coding with finite precision
//! 1979  Rissanen/Langdon Arithmetic coding as a practical framework
//! 1987  Witten, Neal, Cleary  "Arithmetic coding for data compression" (CACM)
//! ```
//!
//! The finite-precision scheme keeps `[low, high]` as fixed-width integers and
//! shifts out the leading bit as soon as both ends agree on it. The tricky case
//! is an interval that keeps straddling the midpoint while shrinking; it is
//! resolved by counting deferred bits ("underflow") until the next settled bit.
//!
//! ## Mathematical Formulation
//!
//! With a cumulative table `cum` (`cum[0]` = total, symbol `s` owning
//! `[cum[s], cum[s - 1])`) and `range = high - low + 1`, coding `s` sets
//!
//! ```text
//! high = low + range * cum[s - 1] / cum[0] - 1
//! low  = low + range * cum[s]     / cum[0]
//! ```
//!
//! The decoder inverts this by locating `((value - low + 1) * cum[0] - 1) / range`
//! in the table.
//!
//! ## Complexity Analysis
//!
//! - **Time**: O(1) interval arithmetic per symbol plus O(k) table maintenance,
//!   where k is the symbol's rank; the adaptive model keeps frequent symbols at
//!   low ranks.
//! - **Space**: O(alphabet) for the model; the coder itself is constant-size.
//!
//! ## Failure Modes
//!
//! 1. **Overflow**: totals larger than a quarter of the code range let
//!    symbols collapse to empty intervals. Models are capped at
//!    `2^(precision - 2) - 1` and rescale on reaching their ceiling.
//! 2. **Mismatched models**: the stream carries no header; decoding with a
//!    differently configured model yields garbage or a stream error.
//! 3. **Truncation**: the decoder tolerates `precision - 2` bits past the end
//!    of its input and fails with [`Error::StreamExhausted`] beyond that.
//!
//! ## Implementation Notes
//!
//! This crate provides:
//! - **[`ArithmeticCoder`]**: stateless, reentrant encode/decode over `Read`/`Write`.
//! - **[`AdaptiveModel`]**: counts symbols as it goes and periodically halves them.
//! - **[`StaticModel`]**: a fixed table for known distributions.
//! - **[`bitio`]**: MSB-first bit adapters with a bounded read-past-end budget.
//!
//! A model value is moved into the call that uses it, so it cannot be reused
//! by accident; the lifecycle hooks on [`Model`] reject reuse at runtime as well.
//!
//! ## References
//!
//! - Witten, I. H., Neal, R. M., Cleary, J. G. (1987). "Arithmetic coding for data compression." CACM 30(6).
//! - Moffat, A., Neal, R. M., Witten, I. H. (1998). "Arithmetic coding revisited." ACM TOIS 16(3).

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adaptive;
pub mod alphabet;
pub mod bitio;
pub mod coder;
pub mod error;
pub mod model;

pub use adaptive::{AdaptiveModel, AdaptiveModelBuilder};
pub use alphabet::Alphabet;
pub use bitio::{BitReader, BitWriter};
pub use coder::{ArithmeticCoder, DEFAULT_PRECISION_BITS};
pub use error::{Error, ErrorKind};
pub use model::{LifecycleState, Model, StaticModel};
