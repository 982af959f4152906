//! Alphabet: ordered symbol set with a dense index mapping.
//!
//! Every other component works on indices in `[0, size)`; the alphabet is
//! the only place where symbols and indices are translated.

use std::fmt;
use std::str::FromStr;

use crate::error::{EnigmaError, Result};

/// Characters reserved by the cycle and settings notations.
const RESERVED: [char; 3] = ['(', ')', '*'];

/// Ordered set of unique symbols usable by a machine.
///
/// # Examples
///
/// ```
/// use enigma::Alphabet;
///
/// let alpha = Alphabet::new("ABCD").unwrap();
/// assert_eq!(alpha.size(), 4);
/// assert_eq!(alpha.to_int('C').unwrap(), 2);
/// assert_eq!(alpha.to_char(3).unwrap(), 'D');
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet {
    symbols: Vec<char>,
}

impl Default for Alphabet {
    fn default() -> Self {
        Self::uppercase()
    }
}

impl Alphabet {
    /// Creates an alphabet from the symbols of `chars`, in order.
    ///
    /// # Errors
    /// Returns [`EnigmaError::InvalidAlphabet`] if `chars` is empty, repeats a
    /// symbol, or contains whitespace or one of `(`, `)`, `*`.
    pub fn new(chars: &str) -> Result<Self> {
        let mut symbols = Vec::with_capacity(chars.len());
        for ch in chars.chars() {
            if ch.is_whitespace() || RESERVED.contains(&ch) {
                return Err(EnigmaError::InvalidAlphabet(format!(
                    "reserved character {:?}",
                    ch
                )));
            }
            if symbols.contains(&ch) {
                return Err(EnigmaError::InvalidAlphabet(format!(
                    "duplicate symbol '{}'",
                    ch
                )));
            }
            symbols.push(ch);
        }
        if symbols.is_empty() {
            return Err(EnigmaError::InvalidAlphabet("empty alphabet".to_string()));
        }
        Ok(Alphabet { symbols })
    }

    /// Creates the alphabet of every character from `first` to `last`
    /// inclusive.
    ///
    /// # Errors
    /// Returns [`EnigmaError::InvalidAlphabet`] if `last` precedes `first` or
    /// the range crosses a reserved character.
    pub fn from_range(first: char, last: char) -> Result<Self> {
        if last < first {
            return Err(EnigmaError::InvalidAlphabet(format!(
                "empty range {}-{}",
                first, last
            )));
        }
        let chars: String = (first..=last).collect();
        Self::new(&chars)
    }

    /// The 26 upper-case Latin letters.
    pub fn uppercase() -> Self {
        Alphabet {
            symbols: ('A'..='Z').collect(),
        }
    }

    /// Returns the number of symbols.
    pub fn size(&self) -> usize {
        self.symbols.len()
    }

    /// Returns true if `ch` is a symbol of this alphabet.
    pub fn contains(&self, ch: char) -> bool {
        self.symbols.contains(&ch)
    }

    /// Returns the symbol at `index`.
    ///
    /// # Errors
    /// Returns [`EnigmaError::IndexOutOfRange`] if `index >= size()`.
    pub fn to_char(&self, index: usize) -> Result<char> {
        self.symbols
            .get(index)
            .copied()
            .ok_or(EnigmaError::IndexOutOfRange {
                index,
                size: self.size(),
            })
    }

    /// Returns the index of `ch`. Inverse of [`to_char`](Self::to_char).
    ///
    /// # Errors
    /// Returns [`EnigmaError::SymbolNotFound`] if `ch` is not in the alphabet.
    pub fn to_int(&self, ch: char) -> Result<usize> {
        self.symbols
            .iter()
            .position(|&s| s == ch)
            .ok_or(EnigmaError::SymbolNotFound(ch))
    }

    /// Iterates the symbols in index order.
    pub fn symbols(&self) -> impl Iterator<Item = char> + '_ {
        self.symbols.iter().copied()
    }
}

impl FromStr for Alphabet {
    type Err = EnigmaError;

    /// Parses either a literal symbol sequence or the range shorthand `X-Y`.
    fn from_str(s: &str) -> Result<Self> {
        let chars: Vec<char> = s.chars().collect();
        if let [first, '-', last] = chars[..] {
            return Self::from_range(first, last);
        }
        Self::new(s)
    }
}

impl fmt::Display for Alphabet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for ch in &self.symbols {
            write!(f, "{}", ch)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_and_contains() {
        let alpha = Alphabet::new("ABCD").unwrap();
        assert_eq!(alpha.size(), 4);
        assert!(alpha.contains('B'));
        assert!(!alpha.contains('E'));
    }

    #[test]
    fn test_to_char_to_int_inverse() {
        let alpha = Alphabet::uppercase();
        for i in 0..alpha.size() {
            let ch = alpha.to_char(i).unwrap();
            assert_eq!(alpha.to_int(ch).unwrap(), i);
        }
    }

    #[test]
    fn test_to_char_out_of_range() {
        let alpha = Alphabet::new("ABCD").unwrap();
        assert_eq!(
            alpha.to_char(4),
            Err(EnigmaError::IndexOutOfRange { index: 4, size: 4 })
        );
    }

    #[test]
    fn test_to_int_symbol_not_found() {
        let alpha = Alphabet::new("ABCD").unwrap();
        assert_eq!(alpha.to_int('Z'), Err(EnigmaError::SymbolNotFound('Z')));
    }

    #[test]
    fn test_rejects_duplicates() {
        assert!(matches!(
            Alphabet::new("ABCA"),
            Err(EnigmaError::InvalidAlphabet(_))
        ));
    }

    #[test]
    fn test_rejects_empty_and_reserved() {
        assert!(Alphabet::new("").is_err());
        assert!(Alphabet::new("AB(").is_err());
        assert!(Alphabet::new("A B").is_err());
        assert!(Alphabet::new("AB*").is_err());
    }

    #[test]
    fn test_range_shorthand() {
        let alpha: Alphabet = "A-Z".parse().unwrap();
        assert_eq!(alpha, Alphabet::uppercase());

        let digits: Alphabet = "0-9".parse().unwrap();
        assert_eq!(digits.size(), 10);
        assert_eq!(digits.to_char(9).unwrap(), '9');

        assert!("Z-A".parse::<Alphabet>().is_err());
    }

    #[test]
    fn test_literal_three_symbols_without_dash() {
        let alpha: Alphabet = "XYZ".parse().unwrap();
        assert_eq!(alpha.size(), 3);
        assert_eq!(alpha.to_string(), "XYZ");
    }
}
