//! Fixed-precision arithmetic coder.
//!
//! The coder keeps an interval `[low, high]` of `precision_bits`-bit
//! integers. Each symbol narrows the interval to its share of the model's
//! cumulative frequency table. Whenever the interval is confined to one half
//! of the code range, the leading bit is settled and the interval doubled.
//! An interval straddling the midpoint inside the middle half is also doubled,
//! and its bit is deferred until the next settled bit decides it (emitted
//! inverted).
//!
//! The end of the stream is marked by coding the model's end-of-stream symbol
//! once; the decoder stops when it decodes that symbol and never needs the
//! input length.

use std::io::{BufReader, BufWriter, Read, Write};
use std::ops::{Deref, DerefMut};

use tracing::debug;

use crate::bitio::{BitReader, BitWriter};
use crate::error::{Error, Result};
use crate::model::Model;

/// Default code value width in bits.
pub const DEFAULT_PRECISION_BITS: u32 = 30;

/// Smallest supported code value width.
pub const MIN_PRECISION_BITS: u32 = 8;

/// Largest supported code value width. Keeps `range * total` below `2^62`.
pub const MAX_PRECISION_BITS: u32 = 32;

/// Largest cumulative total a model may reach at the given precision.
pub const fn max_frequency(precision_bits: u32) -> u64 {
    (1 << (precision_bits - 2)) - 1
}

/// Bits the decoder may read past the end of its input at the given precision.
pub const fn garbage_bits(precision_bits: u32) -> u32 {
    precision_bits - 2
}

/// Arithmetic encoder and decoder.
///
/// The coder holds only constants; every call keeps its interval state on the
/// stack, so one coder can serve any number of concurrent calls.
#[derive(Clone, Copy, Debug)]
pub struct ArithmeticCoder {
    precision_bits: u32,
    top: u64,
    first_quarter: u64,
    half: u64,
    third_quarter: u64,
}

impl ArithmeticCoder {
    /// Coder with the default 30-bit precision.
    pub fn new() -> Self {
        Self::from_bits(DEFAULT_PRECISION_BITS)
    }

    /// Coder with a custom precision.
    ///
    /// # Errors
    /// Returns `Error::InvalidPrecision` outside
    /// `MIN_PRECISION_BITS..=MAX_PRECISION_BITS`.
    pub fn with_precision_bits(precision_bits: u32) -> Result<Self> {
        if !(MIN_PRECISION_BITS..=MAX_PRECISION_BITS).contains(&precision_bits) {
            return Err(Error::InvalidPrecision(precision_bits));
        }
        Ok(Self::from_bits(precision_bits))
    }

    fn from_bits(precision_bits: u32) -> Self {
        let top = (1u64 << precision_bits) - 1;
        let first_quarter = top / 4 + 1;
        Self {
            precision_bits,
            top,
            first_quarter,
            half: 2 * first_quarter,
            third_quarter: 3 * first_quarter,
        }
    }

    /// Code value width in bits.
    pub fn precision_bits(&self) -> u32 {
        self.precision_bits
    }

    /// Largest cumulative total this coder accepts.
    pub fn max_frequency(&self) -> u64 {
        max_frequency(self.precision_bits)
    }

    /// Bits the decoder may read past the end of its input.
    pub fn max_garbage_bits(&self) -> u32 {
        garbage_bits(self.precision_bits)
    }

    /// Compress every byte of `input` into `output`.
    ///
    /// The model is consumed: it adapts during the pass and cannot be reused.
    /// Both streams are flushed before this returns successfully.
    ///
    /// # Errors
    /// - configuration errors if the model's table is malformed or too large
    /// - `Error::UnknownCharacter` for an input byte outside the alphabet
    /// - `Error::ModelReuse` if the model was already started
    /// - `Error::Io` from either stream
    pub fn encode<M, R, W>(&self, mut model: M, input: R, output: W) -> Result<()>
    where
        M: Model,
        R: Read,
        W: Write,
    {
        let mut model = Finishing::new(&mut model, Pass::Encode);
        model.start_encode()?;
        self.check_model(&*model)?;

        let mut out = BitWriter::new(BufWriter::new(output));
        let mut interval = Interval::new(self.top);
        let mut pending = 0u64;
        let mut symbols = 0u64;

        for byte in BufReader::new(input).bytes() {
            let ch = byte?;
            let symbol = model
                .char_to_symbol(ch)
                .ok_or(Error::UnknownCharacter(ch))?;
            self.encode_symbol(
                &mut interval,
                &mut pending,
                &mut out,
                symbol,
                model.cumulative_frequency(),
            )?;
            model.update(symbol);
            symbols += 1;
        }

        let eof = model.eof_symbol();
        self.encode_symbol(
            &mut interval,
            &mut pending,
            &mut out,
            eof,
            model.cumulative_frequency(),
        )?;

        // One more settled bit, with one extra deferred bit, pins the final
        // interval for the decoder.
        pending += 1;
        let bit = interval.low >= self.first_quarter;
        emit(&mut out, bit, &mut pending)?;
        out.finish()?;

        debug!(symbols, bits = out.bits_written(), "encode finished");
        Ok(())
    }

    /// Decompress `input` into `output`, stopping at the end-of-stream symbol.
    ///
    /// `model` must be a fresh model configured exactly like the one used to
    /// encode.
    ///
    /// # Errors
    /// - configuration errors if the model's table is malformed or too large
    /// - `Error::UnmappedSymbol` if the model cannot translate a decoded symbol
    /// - `Error::StreamExhausted` if the input ends too early
    /// - `Error::ModelReuse` if the model was already started
    /// - `Error::Io` from either stream
    pub fn decode<M, R, W>(&self, mut model: M, input: R, output: W) -> Result<()>
    where
        M: Model,
        R: Read,
        W: Write,
    {
        let mut model = Finishing::new(&mut model, Pass::Decode);
        model.start_decode()?;
        self.check_model(&*model)?;

        let mut input = BitReader::new(BufReader::new(input), self.max_garbage_bits());
        let mut out = BufWriter::new(output);

        let mut value = 0u64;
        for _ in 0..self.precision_bits {
            value = (value << 1) | input.read_bit()? as u64;
        }

        let eof = model.eof_symbol();
        let mut interval = Interval::new(self.top);
        let mut symbols = 0u64;

        loop {
            let symbol = {
                let cum = model.cumulative_frequency();
                let symbol = find_symbol(cum, interval.position(value, cum[0]));
                interval.narrow(symbol, cum);
                symbol
            };
            if symbol == eof {
                break;
            }

            let ch = model
                .symbol_to_char(symbol)
                .ok_or(Error::UnmappedSymbol(symbol))?;
            out.write_all(&[ch])?;
            model.update(symbol);
            symbols += 1;

            loop {
                if interval.high < self.half {
                    // settled 0: nothing to subtract
                } else if interval.low >= self.half {
                    value -= self.half;
                    interval.shift_down(self.half);
                } else if interval.low >= self.first_quarter && interval.high < self.third_quarter {
                    value -= self.first_quarter;
                    interval.shift_down(self.first_quarter);
                } else {
                    break;
                }
                interval.double();
                value = (value << 1) | input.read_bit()? as u64;
            }
        }
        out.flush()?;

        debug!(
            symbols,
            bits = input.bits_read(),
            garbage_bits = input.garbage_bits(),
            "decode finished"
        );
        Ok(())
    }

    /// Encode `data` into a new buffer.
    pub fn encode_to_vec<M: Model>(&self, model: M, data: &[u8]) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        self.encode(model, data, &mut out)?;
        Ok(out)
    }

    /// Decode `data` into a new buffer.
    pub fn decode_to_vec<M: Model>(&self, model: M, data: &[u8]) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        self.decode(model, data, &mut out)?;
        Ok(out)
    }

    fn encode_symbol<W: Write>(
        &self,
        interval: &mut Interval,
        pending: &mut u64,
        out: &mut BitWriter<W>,
        symbol: usize,
        cum: &[u64],
    ) -> Result<()> {
        interval.narrow(symbol, cum);
        loop {
            if interval.high < self.half {
                emit(out, false, pending)?;
            } else if interval.low >= self.half {
                emit(out, true, pending)?;
                interval.shift_down(self.half);
            } else if interval.low >= self.first_quarter && interval.high < self.third_quarter {
                *pending += 1;
                interval.shift_down(self.first_quarter);
            } else {
                break;
            }
            interval.double();
        }
        Ok(())
    }

    fn check_model<M: Model>(&self, model: &M) -> Result<()> {
        let cum = model.cumulative_frequency();
        let eof = model.eof_symbol();
        if cum.len() != eof + 1 {
            return Err(Error::FrequencyCountMismatch {
                expected: eof + 1,
                got: cum.len(),
            });
        }
        // Symbol 0 is never coded, so a one-entry table has no windows at all.
        if eof == 0 {
            return Err(Error::MalformedCumulativeTable {
                index: 0,
                value: cum[0],
            });
        }
        for (i, pair) in cum.windows(2).enumerate() {
            if pair[0] <= pair[1] {
                return Err(Error::MalformedCumulativeTable {
                    index: i + 1,
                    value: pair[1],
                });
            }
        }
        if cum[eof] != 0 {
            return Err(Error::MalformedCumulativeTable {
                index: eof,
                value: cum[eof],
            });
        }
        // An adaptive total grows during the pass; its bound must fit too.
        let total = model.max_total().max(cum[0]);
        if total > self.max_frequency() {
            return Err(Error::TotalFrequencyTooLarge {
                total,
                ceiling: self.max_frequency(),
            });
        }
        Ok(())
    }
}

impl Default for ArithmeticCoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Current coding interval, both ends inclusive.
#[derive(Clone, Copy, Debug)]
struct Interval {
    low: u64,
    high: u64,
}

impl Interval {
    fn new(top: u64) -> Self {
        Self { low: 0, high: top }
    }

    #[inline]
    fn narrow(&mut self, symbol: usize, cum: &[u64]) {
        let range = self.high - self.low + 1;
        let total = cum[0];
        self.high = self.low + range * cum[symbol - 1] / total - 1;
        self.low += range * cum[symbol] / total;
    }

    /// Scaled position of `value` on the `[0, total)` frequency axis.
    #[inline]
    fn position(&self, value: u64, total: u64) -> u64 {
        let range = self.high - self.low + 1;
        ((value - self.low + 1) * total - 1) / range
    }

    #[inline]
    fn shift_down(&mut self, by: u64) {
        self.low -= by;
        self.high -= by;
    }

    #[inline]
    fn double(&mut self) {
        self.low <<= 1;
        self.high = (self.high << 1) | 1;
    }
}

/// Lowest symbol whose window `[cum[s], cum[s - 1])` contains `target`.
#[inline]
fn find_symbol(cum: &[u64], target: u64) -> usize {
    let mut symbol = 1;
    while cum[symbol] > target {
        symbol += 1;
    }
    symbol
}

/// Write a settled bit followed by the deferred bits, which take the opposite value.
#[inline]
fn emit<W: Write>(out: &mut BitWriter<W>, bit: bool, pending: &mut u64) -> Result<()> {
    out.write_bit(bit)?;
    while *pending > 0 {
        out.write_bit(!bit)?;
        *pending -= 1;
    }
    Ok(())
}

#[derive(Clone, Copy, Debug)]
enum Pass {
    Encode,
    Decode,
}

/// Runs the model's finish hook when the pass ends, however it ends.
struct Finishing<'a, M: Model> {
    model: &'a mut M,
    pass: Pass,
}

impl<'a, M: Model> Finishing<'a, M> {
    fn new(model: &'a mut M, pass: Pass) -> Self {
        Self { model, pass }
    }
}

impl<M: Model> Deref for Finishing<'_, M> {
    type Target = M;

    fn deref(&self) -> &M {
        self.model
    }
}

impl<M: Model> DerefMut for Finishing<'_, M> {
    fn deref_mut(&mut self) -> &mut M {
        self.model
    }
}

impl<M: Model> Drop for Finishing<'_, M> {
    fn drop(&mut self) {
        match self.pass {
            Pass::Encode => self.model.finish_encode(),
            Pass::Decode => self.model.finish_decode(),
        }
    }
}
