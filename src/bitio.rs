//! Bit-level adapters over byte streams.
//!
//! Bits are packed MSB-first: the first bit written lands in bit 7 of the
//! first byte. A partially filled final byte is padded with zero bits.
//!
//! The reader tolerates a bounded number of reads past the end of its source
//! ("garbage bits", each read as 0). The arithmetic decoder keeps a fixed
//! lookahead window and routinely reads a few bits beyond the last byte the
//! encoder produced.

use std::io::{self, Read, Write};

use crate::error::{Error, Result};

/// Writes single bits to a byte sink.
///
/// Call [`BitWriter::finish`] to flush the final partial byte and the sink.
/// If the writer is dropped without finishing, the partial byte is flushed on
/// a best-effort basis and errors are ignored.
pub struct BitWriter<W: Write> {
    inner: W,
    /// Accumulator for the current partial byte (MSB-aligned)
    buffer: u8,
    /// Number of bits in `buffer` (0-7)
    bit_count: u8,
    bits_written: u64,
    finished: bool,
}

impl<W: Write> BitWriter<W> {
    /// Wrap a byte sink.
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            buffer: 0,
            bit_count: 0,
            bits_written: 0,
            finished: false,
        }
    }

    /// Write one bit.
    ///
    /// # Errors
    /// Returns `Error::Io` if the sink rejects a completed byte.
    #[inline]
    pub fn write_bit(&mut self, bit: bool) -> Result<()> {
        if bit {
            self.buffer |= 0x80 >> self.bit_count;
        }
        self.bit_count += 1;
        self.bits_written += 1;
        if self.bit_count == 8 {
            self.inner.write_all(&[self.buffer])?;
            self.buffer = 0;
            self.bit_count = 0;
        }
        Ok(())
    }

    /// Flush the partial byte (zero-padded) and the underlying sink.
    ///
    /// Calling this more than once has no further effect.
    pub fn finish(&mut self) -> Result<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.flush_partial()?;
        self.inner.flush()?;
        Ok(())
    }

    fn flush_partial(&mut self) -> io::Result<()> {
        if self.bit_count > 0 {
            let byte = self.buffer;
            self.buffer = 0;
            self.bit_count = 0;
            self.inner.write_all(&[byte])?;
        }
        Ok(())
    }

    /// Total number of bits written so far.
    pub fn bits_written(&self) -> u64 {
        self.bits_written
    }

    /// Reference to the underlying sink.
    pub fn get_ref(&self) -> &W {
        &self.inner
    }
}

impl<W: Write> Drop for BitWriter<W> {
    fn drop(&mut self) {
        if !self.finished {
            let _ = self.flush_partial();
            let _ = self.inner.flush();
        }
    }
}

/// Reads single bits from a byte source.
pub struct BitReader<R: Read> {
    bytes: io::Bytes<R>,
    buffer: u8,
    /// Unread bits left in `buffer`
    bits_left: u8,
    exhausted: bool,
    garbage_bits: u32,
    max_garbage_bits: u32,
    bits_read: u64,
}

impl<R: Read> BitReader<R> {
    /// Wrap a byte source, allowing up to `max_garbage_bits` reads past its end.
    pub fn new(inner: R, max_garbage_bits: u32) -> Self {
        Self {
            bytes: inner.bytes(),
            buffer: 0,
            bits_left: 0,
            exhausted: false,
            garbage_bits: 0,
            max_garbage_bits,
            bits_read: 0,
        }
    }

    /// Read one bit.
    ///
    /// Past the end of the source this returns `false` until the garbage
    /// budget is spent.
    ///
    /// # Errors
    /// - `Error::StreamExhausted` once more than `max_garbage_bits` bits were read past the end
    /// - `Error::Io` if the source fails
    #[inline]
    pub fn read_bit(&mut self) -> Result<bool> {
        if self.bits_left == 0 {
            let next = if self.exhausted {
                None
            } else {
                self.bytes.next()
            };
            match next {
                Some(byte) => {
                    self.buffer = byte?;
                    self.bits_left = 8;
                }
                None => {
                    self.exhausted = true;
                    self.garbage_bits += 1;
                    if self.garbage_bits > self.max_garbage_bits {
                        return Err(Error::StreamExhausted {
                            garbage_bits: self.garbage_bits,
                        });
                    }
                    self.bits_read += 1;
                    return Ok(false);
                }
            }
        }
        self.bits_left -= 1;
        self.bits_read += 1;
        Ok((self.buffer >> self.bits_left) & 1 == 1)
    }

    /// Number of bits read past the end of the source so far.
    pub fn garbage_bits(&self) -> u32 {
        self.garbage_bits
    }

    /// Total number of bits returned so far, garbage included.
    pub fn bits_read(&self) -> u64 {
        self.bits_read
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn write_all_bits(bits: &[bool]) -> Vec<u8> {
        let mut out: Vec<u8> = Vec::new();
        let mut writer = BitWriter::new(&mut out);
        for &bit in bits {
            writer.write_bit(bit).unwrap();
        }
        writer.finish().unwrap();
        drop(writer);
        out
    }

    #[test]
    fn test_msb_first_packing() {
        let bits = [true, false, true, true, false, false, true, true];
        assert_eq!(write_all_bits(&bits), vec![0b1011_0011]);
    }

    #[test]
    fn test_partial_byte_is_zero_padded() {
        assert_eq!(write_all_bits(&[true, false, true]), vec![0b1010_0000]);
    }

    #[test]
    fn test_no_padding_byte_on_boundary() {
        assert_eq!(write_all_bits(&[true; 16]), vec![0xFF, 0xFF]);
        assert!(write_all_bits(&[]).is_empty());
    }

    #[test]
    fn test_drop_flushes_partial_byte() {
        let mut out: Vec<u8> = Vec::new();
        {
            let mut writer = BitWriter::new(&mut out);
            writer.write_bit(true).unwrap();
            writer.write_bit(true).unwrap();
        }
        assert_eq!(out, vec![0b1100_0000]);
    }

    #[test]
    fn test_finish_is_idempotent() {
        let mut out: Vec<u8> = Vec::new();
        let mut writer = BitWriter::new(&mut out);
        writer.write_bit(true).unwrap();
        writer.finish().unwrap();
        writer.finish().unwrap();
        assert_eq!(writer.bits_written(), 1);
        drop(writer);
        assert_eq!(out, vec![0x80]);
    }

    #[test]
    fn test_garbage_bits_within_budget() {
        let data = [0xFFu8];
        let mut reader = BitReader::new(&data[..], 3);
        for _ in 0..8 {
            assert!(reader.read_bit().unwrap());
        }
        for _ in 0..3 {
            assert!(!reader.read_bit().unwrap());
        }
        assert_eq!(reader.garbage_bits(), 3);
        assert_eq!(reader.bits_read(), 11);
    }

    #[test]
    fn test_garbage_budget_exceeded() {
        let mut reader = BitReader::new(io::empty(), 2);
        assert!(!reader.read_bit().unwrap());
        assert!(!reader.read_bit().unwrap());
        match reader.read_bit() {
            Err(Error::StreamExhausted { garbage_bits }) => assert_eq!(garbage_bits, 3),
            other => panic!("expected StreamExhausted, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_zero_budget_fails_immediately_at_end() {
        let mut reader = BitReader::new(io::empty(), 0);
        assert!(matches!(
            reader.read_bit(),
            Err(Error::StreamExhausted { .. })
        ));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_bits_read_back_in_order(bits in prop::collection::vec(any::<bool>(), 0..200)) {
            let bytes = write_all_bits(&bits);
            prop_assert_eq!(bytes.len(), bits.len().div_ceil(8));

            let mut reader = BitReader::new(&bytes[..], 0);
            for &expected in &bits {
                prop_assert_eq!(reader.read_bit().unwrap(), expected);
            }
        }
    }
}
