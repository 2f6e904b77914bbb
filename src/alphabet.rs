//! Character alphabet and its symbol bijection.
//!
//! Characters are byte values. The `n` configured characters map to symbols
//! `1..=n`; symbol `n + 1` is reserved for end-of-stream and symbol 0 is
//! never assigned (it indexes the total in a cumulative frequency table).

use crate::error::{Error, Result};

const NO_SYMBOL: u16 = 0;

/// Bidirectional mapping between characters and dense symbol codes.
///
/// Both directions are fixed-size arrays, so lookups never hash and a swap
/// updates both sides together.
#[derive(Clone, Debug)]
pub struct Alphabet {
    char_to_symbol: [u16; 256],
    /// Indexed by symbol; slots 0 and `eof_symbol` are unused.
    symbol_to_char: Vec<u8>,
}

impl Alphabet {
    /// Build an alphabet whose initial symbol order follows `chars`.
    ///
    /// # Errors
    /// - `Error::EmptyAlphabet` if `chars` is empty
    /// - `Error::DuplicateCharacter` if a character repeats
    pub fn new(chars: &[u8]) -> Result<Self> {
        if chars.is_empty() {
            return Err(Error::EmptyAlphabet);
        }

        let mut char_to_symbol = [NO_SYMBOL; 256];
        let mut symbol_to_char = vec![0u8; chars.len() + 2];
        for (i, &ch) in chars.iter().enumerate() {
            if char_to_symbol[ch as usize] != NO_SYMBOL {
                return Err(Error::DuplicateCharacter(ch));
            }
            let symbol = i + 1;
            char_to_symbol[ch as usize] = symbol as u16;
            symbol_to_char[symbol] = ch;
        }

        Ok(Self {
            char_to_symbol,
            symbol_to_char,
        })
    }

    /// All 256 byte values in ascending order.
    pub fn bytes() -> Self {
        let mut char_to_symbol = [NO_SYMBOL; 256];
        let mut symbol_to_char = vec![0u8; 258];
        for ch in 0..=255u8 {
            char_to_symbol[ch as usize] = ch as u16 + 1;
            symbol_to_char[ch as usize + 1] = ch;
        }
        Self {
            char_to_symbol,
            symbol_to_char,
        }
    }

    /// Number of characters (end-of-stream excluded).
    pub fn num_chars(&self) -> usize {
        self.symbol_to_char.len() - 2
    }

    /// Number of symbols, end-of-stream included.
    pub fn num_symbols(&self) -> usize {
        self.num_chars() + 1
    }

    /// The reserved end-of-stream symbol.
    pub fn eof_symbol(&self) -> usize {
        self.num_symbols()
    }

    /// Symbol currently assigned to `ch`.
    #[inline]
    pub fn char_to_symbol(&self, ch: u8) -> Option<usize> {
        match self.char_to_symbol[ch as usize] {
            NO_SYMBOL => None,
            symbol => Some(symbol as usize),
        }
    }

    /// Character currently assigned to `symbol`.
    ///
    /// Returns `None` for symbol 0, the end-of-stream symbol and anything beyond.
    #[inline]
    pub fn symbol_to_char(&self, symbol: usize) -> Option<u8> {
        if symbol == 0 || symbol >= self.eof_symbol() {
            return None;
        }
        Some(self.symbol_to_char[symbol])
    }

    /// Exchange the characters assigned to two character symbols.
    pub(crate) fn swap(&mut self, a: usize, b: usize) {
        debug_assert!(a != 0 && a < self.eof_symbol());
        debug_assert!(b != 0 && b < self.eof_symbol());
        let ch_a = self.symbol_to_char[a];
        let ch_b = self.symbol_to_char[b];
        self.symbol_to_char.swap(a, b);
        self.char_to_symbol[ch_a as usize] = b as u16;
        self.char_to_symbol[ch_b as usize] = a as u16;
    }
}

impl Default for Alphabet {
    fn default() -> Self {
        Self::bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digits_alphabet() {
        let alphabet = Alphabet::new(b"0123456789").unwrap();
        assert_eq!(alphabet.num_chars(), 10);
        assert_eq!(alphabet.eof_symbol(), 11);
        assert_eq!(alphabet.char_to_symbol(b'0'), Some(1));
        assert_eq!(alphabet.char_to_symbol(b'9'), Some(10));
        assert_eq!(alphabet.char_to_symbol(b'a'), None);
        assert_eq!(alphabet.symbol_to_char(10), Some(b'9'));
        assert_eq!(alphabet.symbol_to_char(0), None);
        assert_eq!(alphabet.symbol_to_char(11), None);
    }

    #[test]
    fn test_byte_alphabet_is_identity_plus_one() {
        let alphabet = Alphabet::bytes();
        assert_eq!(alphabet.eof_symbol(), 257);
        for ch in 0..=255u8 {
            let symbol = alphabet.char_to_symbol(ch).unwrap();
            assert_eq!(symbol, ch as usize + 1);
            assert_eq!(alphabet.symbol_to_char(symbol), Some(ch));
        }
    }

    #[test]
    fn test_rejects_bad_alphabets() {
        assert!(matches!(Alphabet::new(&[]), Err(Error::EmptyAlphabet)));
        assert!(matches!(
            Alphabet::new(b"abca"),
            Err(Error::DuplicateCharacter(b'a'))
        ));
    }

    #[test]
    fn test_swap_keeps_bijection() {
        let mut alphabet = Alphabet::new(b"xyz").unwrap();
        alphabet.swap(1, 3);
        assert_eq!(alphabet.char_to_symbol(b'x'), Some(3));
        assert_eq!(alphabet.char_to_symbol(b'z'), Some(1));
        assert_eq!(alphabet.symbol_to_char(1), Some(b'z'));
        assert_eq!(alphabet.symbol_to_char(3), Some(b'x'));
        for symbol in 1..alphabet.eof_symbol() {
            let ch = alphabet.symbol_to_char(symbol).unwrap();
            assert_eq!(alphabet.char_to_symbol(ch), Some(symbol));
        }
    }
}
