//! Permutation: invertible mapping over alphabet indices.
//!
//! Built from cycle notation such as `"(AELTPHQXRU) (BKNW) (S)"`. The
//! forward and inverse tables are computed once at construction, so every
//! lookup is a single slice index.

use std::fmt;
use std::sync::Arc;

use crate::alphabet::Alphabet;
use crate::error::{EnigmaError, Result};

/// Total, invertible mapping over the indices of an [`Alphabet`].
///
/// Cloning is cheap: the alphabet and both tables are shared.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use enigma::{Alphabet, Permutation};
///
/// let alpha = Arc::new(Alphabet::new("ABCD").unwrap());
/// let perm = Permutation::new("(AB)(CD)", alpha).unwrap();
/// assert_eq!(perm.permute_symbol('A').unwrap(), 'B');
/// assert_eq!(perm.invert_symbol('D').unwrap(), 'C');
/// assert!(perm.derangement());
/// ```
#[derive(Debug, Clone)]
pub struct Permutation {
    alphabet: Arc<Alphabet>,
    forward: Arc<[usize]>,
    inverse: Arc<[usize]>,
}

impl Permutation {
    /// Parses `cycles` over `alphabet`.
    ///
    /// Each symbol in a cycle maps to its successor, the last one wrapping to
    /// the first. Symbols that appear in no cycle map to themselves.
    /// Whitespace is ignored.
    ///
    /// # Errors
    /// - [`EnigmaError::SymbolNotFound`] if a cycle names a symbol outside
    ///   the alphabet.
    /// - [`EnigmaError::MalformedCycles`] on unbalanced or nested
    ///   parentheses, text outside a cycle, or a repeated symbol.
    pub fn new(cycles: &str, alphabet: Arc<Alphabet>) -> Result<Self> {
        let size = alphabet.size();
        let mut forward: Vec<usize> = (0..size).collect();
        let mut seen = vec![false; size];

        for cycle in parse_cycles(cycles, &alphabet)? {
            for &index in &cycle {
                if seen[index] {
                    return Err(EnigmaError::MalformedCycles(format!(
                        "symbol '{}' appears more than once",
                        alphabet.to_char(index)?
                    )));
                }
                seen[index] = true;
            }
            for (k, &index) in cycle.iter().enumerate() {
                forward[index] = cycle[(k + 1) % cycle.len()];
            }
        }

        let mut inverse = vec![0usize; size];
        for (i, &target) in forward.iter().enumerate() {
            inverse[target] = i;
        }

        Ok(Permutation {
            alphabet,
            forward: forward.into(),
            inverse: inverse.into(),
        })
    }

    /// The permutation that maps every index to itself.
    pub fn identity(alphabet: Arc<Alphabet>) -> Self {
        let table: Arc<[usize]> = (0..alphabet.size()).collect();
        Permutation {
            alphabet,
            forward: Arc::clone(&table),
            inverse: table,
        }
    }

    /// Returns the size of the alphabet this permutation acts on.
    pub fn size(&self) -> usize {
        self.forward.len()
    }

    /// Returns `p` modulo [`size`](Self::size), always in `[0, size)`.
    pub fn wrap(&self, p: i64) -> usize {
        p.rem_euclid(self.size() as i64) as usize
    }

    /// Applies the permutation to `p` modulo the alphabet size.
    ///
    /// Any `usize` is accepted. Signed offsets must go through
    /// [`wrap`](Self::wrap) first.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::Arc;
    /// use enigma::{Alphabet, Permutation};
    ///
    /// let perm = Permutation::new("(ABC)", Arc::new(Alphabet::new("ABCD").unwrap())).unwrap();
    /// assert_eq!(perm.permute(perm.wrap(-2)), 0);
    /// assert_eq!(perm.permute(5), 2);
    /// ```
    pub fn permute(&self, p: usize) -> usize {
        self.forward[p % self.size()]
    }

    /// Applies the inverse permutation to `c` modulo the alphabet size.
    /// Signed offsets must go through [`wrap`](Self::wrap) first.
    pub fn invert(&self, c: usize) -> usize {
        self.inverse[c % self.size()]
    }

    /// Applies the permutation to a symbol of the alphabet.
    ///
    /// # Errors
    /// Returns [`EnigmaError::SymbolNotFound`] if `p` is not in the alphabet.
    pub fn permute_symbol(&self, p: char) -> Result<char> {
        let index = self.alphabet.to_int(p)?;
        self.alphabet.to_char(self.permute(index))
    }

    /// Applies the inverse permutation to a symbol of the alphabet.
    ///
    /// # Errors
    /// Returns [`EnigmaError::SymbolNotFound`] if `c` is not in the alphabet.
    pub fn invert_symbol(&self, c: char) -> Result<char> {
        let index = self.alphabet.to_int(c)?;
        self.alphabet.to_char(self.invert(index))
    }

    /// Returns the alphabet this permutation was built over.
    pub fn alphabet(&self) -> &Arc<Alphabet> {
        &self.alphabet
    }

    /// Returns true iff no index maps to itself.
    pub fn derangement(&self) -> bool {
        self.forward.iter().enumerate().all(|(i, &p)| i != p)
    }
}

impl PartialEq for Permutation {
    fn eq(&self, other: &Self) -> bool {
        self.forward == other.forward && self.alphabet == other.alphabet
    }
}

impl Eq for Permutation {}

impl fmt::Display for Permutation {
    /// Writes canonical cycle notation: each cycle starts at its lowest
    /// index, fixed points are omitted.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut visited = vec![false; self.size()];
        let mut first = true;
        for start in 0..self.size() {
            if visited[start] || self.forward[start] == start {
                continue;
            }
            if !first {
                write!(f, " ")?;
            }
            first = false;
            write!(f, "(")?;
            let mut i = start;
            while !visited[i] {
                visited[i] = true;
                let ch = self.alphabet.to_char(i).map_err(|_| fmt::Error)?;
                write!(f, "{}", ch)?;
                i = self.forward[i];
            }
            write!(f, ")")?;
        }
        Ok(())
    }
}

/// Splits cycle notation into index sequences, one per parenthesized group.
fn parse_cycles(cycles: &str, alphabet: &Alphabet) -> Result<Vec<Vec<usize>>> {
    let mut parsed = Vec::new();
    let mut current: Option<Vec<usize>> = None;

    for ch in cycles.chars() {
        if ch.is_whitespace() {
            continue;
        }
        match ch {
            '(' => {
                if current.is_some() {
                    return Err(EnigmaError::MalformedCycles(format!(
                        "nested '(' in {:?}",
                        cycles
                    )));
                }
                current = Some(Vec::new());
            }
            ')' => match current.take() {
                Some(cycle) => parsed.push(cycle),
                None => {
                    return Err(EnigmaError::MalformedCycles(format!(
                        "unmatched ')' in {:?}",
                        cycles
                    )));
                }
            },
            c => match current.as_mut() {
                Some(cycle) => cycle.push(alphabet.to_int(c)?),
                None => {
                    return Err(EnigmaError::MalformedCycles(format!(
                        "symbol '{}' outside of a cycle in {:?}",
                        c, cycles
                    )));
                }
            },
        }
    }

    if current.is_some() {
        return Err(EnigmaError::MalformedCycles(format!(
            "unclosed '(' in {:?}",
            cycles
        )));
    }
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn abcd() -> Arc<Alphabet> {
        Arc::new(Alphabet::new("ABCD").unwrap())
    }

    fn upper() -> Arc<Alphabet> {
        Arc::new(Alphabet::uppercase())
    }

    /// Checks that `perm` maps each symbol of `from` to the symbol at the
    /// same position in `to`, both by symbol and by index.
    fn check_perm(perm: &Permutation, from: &str, to: &str) {
        let alpha = perm.alphabet();
        for (c, e) in from.chars().zip(to.chars()) {
            assert_eq!(perm.permute_symbol(c).unwrap(), e, "wrong translation of '{}'", c);
            assert_eq!(perm.invert_symbol(e).unwrap(), c, "wrong inverse of '{}'", e);
            let ci = alpha.to_int(c).unwrap();
            let ei = alpha.to_int(e).unwrap();
            assert_eq!(perm.permute(ci), ei, "wrong translation of {}", ci);
            assert_eq!(perm.invert(ei), ci, "wrong inverse of {}", ei);
        }
    }

    #[test]
    fn test_identity_transform() {
        let perm = Permutation::new("", upper()).unwrap();
        let all: String = ('A'..='Z').collect();
        check_perm(&perm, &all, &all);
        assert_eq!(perm, Permutation::identity(upper()));
    }

    #[test]
    fn test_pairs_are_derangement() {
        let perm = Permutation::new("(AB)(CD)", abcd()).unwrap();
        assert_eq!(perm.permute_symbol('A').unwrap(), 'B');
        assert_eq!(perm.permute_symbol('C').unwrap(), 'D');
        assert_eq!(perm.invert_symbol('D').unwrap(), 'C');
        assert!(perm.derangement());
    }

    #[test]
    fn test_uncovered_symbols_are_fixed_points() {
        let perm = Permutation::new("(AB)", abcd()).unwrap();
        assert_eq!(perm.permute_symbol('C').unwrap(), 'C');
        assert_eq!(perm.invert_symbol('D').unwrap(), 'D');
        assert!(!perm.derangement());
    }

    #[test]
    fn test_long_cycles_wrap() {
        let perm = Permutation::new("(ZADT) (YUR)", upper()).unwrap();
        check_perm(&perm, "ZADTYUR", "ADTZURY");
        assert_eq!(perm.invert_symbol('Z').unwrap(), 'T');
        assert_eq!(perm.invert_symbol('Y').unwrap(), 'R');
    }

    #[test]
    fn test_singleton_cycle_is_fixed_point() {
        let perm = Permutation::new("(AELTPHQXRU) (BKNW) (CMOY) (DFG) (IV) (JZ) (S)", upper())
            .unwrap();
        assert_eq!(perm.permute_symbol('S').unwrap(), 'S');
        assert_eq!(perm.permute_symbol('U').unwrap(), 'A');
        assert!(!perm.derangement());
    }

    #[test]
    fn test_wrap_handles_negative_and_oversized() {
        let perm = Permutation::new("(AB)(CD)", abcd()).unwrap();
        assert_eq!(perm.wrap(-1), 3);
        assert_eq!(perm.wrap(-8), 0);
        assert_eq!(perm.wrap(9), 1);
        assert_eq!(perm.permute(4), 1);
        assert_eq!(perm.invert(6), 3);
    }

    #[test]
    fn test_signed_offsets_through_wrap() {
        let perm = Permutation::new("(ABC)", abcd()).unwrap();
        for offset in [-9_i64, -5, -1, 0, 3, 7, 1_000_001] {
            let index = perm.wrap(offset);
            assert!(index < perm.size(), "wrap({}) out of range", offset);
            assert_eq!(perm.invert(perm.permute(index)), index);
        }
        assert_eq!(perm.permute(perm.wrap(-2)), 0);
        assert_eq!(perm.invert(perm.wrap(-4)), 2);
        assert_eq!(perm.permute(usize::MAX), perm.permute(usize::MAX % 4));
    }

    #[test]
    fn test_bijection_both_directions() {
        let perm = Permutation::new("(AELTPHQXRU) (BKNW) (CMOY) (DFG) (IV) (JZ)", upper()).unwrap();
        for i in 0..perm.size() {
            assert_eq!(perm.invert(perm.permute(i)), i);
            assert_eq!(perm.permute(perm.invert(i)), i);
        }
    }

    #[test]
    fn test_unknown_symbol_rejected() {
        assert_eq!(
            Permutation::new("(AE)", abcd()),
            Err(EnigmaError::SymbolNotFound('E'))
        );
    }

    #[test]
    fn test_malformed_cycles_rejected() {
        for bad in ["(AB", "AB)", "(A(B))", "A(BC)", "(AB) C"] {
            assert!(
                matches!(Permutation::new(bad, abcd()), Err(EnigmaError::MalformedCycles(_))),
                "{:?} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_repeated_symbol_rejected() {
        assert!(matches!(
            Permutation::new("(AB) (BC)", abcd()),
            Err(EnigmaError::MalformedCycles(_))
        ));
    }

    #[test]
    fn test_display_canonical_cycles() {
        let perm = Permutation::new("(DC) (BA)", abcd()).unwrap();
        assert_eq!(perm.to_string(), "(AB) (CD)");

        let perm = Permutation::new("(YUR) (ZADT) (Q)", upper()).unwrap();
        assert_eq!(perm.to_string(), "(ADTZ) (RYU)");
    }
}
