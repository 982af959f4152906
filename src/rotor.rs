//! Rotor: a wired permutation mounted on a rotating body.
//!
//! A single [`Rotor`] record carries the fields every rotor shares (name,
//! wiring, current setting) and a [`RotorKind`] tag selecting the
//! per-variant behavior. The machine keeps its rotors as a contiguous
//! `Vec<Rotor>` and drives them by slot index.

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::alphabet::Alphabet;
use crate::error::{EnigmaError, Result};
use crate::permutation::Permutation;

/// Variant-specific rotor behavior.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RotorKind {
    /// Never moves on its own; may still be set to any position.
    Fixed,
    /// Advanced by a pawl. Holds the alphabet indices of its notches.
    Moving { notches: BTreeSet<usize> },
    /// Turns the signal back. Always at setting 0, forward pass only.
    Reflector,
}

/// A rotor: name, wiring, current setting and variant.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use enigma::{Alphabet, Permutation, Rotor};
///
/// let alpha = Arc::new(Alphabet::new("ABCD").unwrap());
/// let perm = Permutation::new("(AC)(BD)", Arc::clone(&alpha)).unwrap();
/// let mut rotor = Rotor::moving("R2", perm, "A").unwrap();
///
/// assert!(rotor.at_notch());
/// rotor.advance().unwrap();
/// assert_eq!(rotor.setting(), 1);
/// assert!(!rotor.at_notch());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rotor {
    name: String,
    permutation: Permutation,
    setting: usize,
    kind: RotorKind,
}

impl Rotor {
    /// Creates a non-moving, non-reflecting rotor at setting 0.
    pub fn fixed(name: impl Into<String>, permutation: Permutation) -> Self {
        Self::build(name.into(), permutation, RotorKind::Fixed)
    }

    /// Creates a moving rotor at setting 0 with notches at the symbols of
    /// `notches`.
    ///
    /// # Errors
    /// Returns [`EnigmaError::SymbolNotFound`] if a notch symbol is not in the
    /// permutation's alphabet.
    pub fn moving(name: impl Into<String>, permutation: Permutation, notches: &str) -> Result<Self> {
        let alphabet = permutation.alphabet();
        let notches = notches
            .chars()
            .map(|ch| alphabet.to_int(ch))
            .collect::<Result<BTreeSet<usize>>>()?;
        Ok(Self::build(
            name.into(),
            permutation,
            RotorKind::Moving { notches },
        ))
    }

    /// Creates a reflector.
    pub fn reflector(name: impl Into<String>, permutation: Permutation) -> Self {
        Self::build(name.into(), permutation, RotorKind::Reflector)
    }

    fn build(name: String, permutation: Permutation, kind: RotorKind) -> Self {
        Rotor {
            name,
            permutation,
            setting: 0,
            kind,
        }
    }

    /// Returns the rotor's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the rotor's wiring at setting 0.
    pub fn permutation(&self) -> &Permutation {
        &self.permutation
    }

    /// Returns the alphabet of the rotor's wiring.
    pub fn alphabet(&self) -> &Arc<Alphabet> {
        self.permutation.alphabet()
    }

    /// Returns the variant tag.
    pub fn kind(&self) -> &RotorKind {
        &self.kind
    }

    /// Returns the size of the rotor's alphabet.
    pub fn size(&self) -> usize {
        self.permutation.size()
    }

    /// Returns true iff this rotor can be advanced by a pawl.
    pub fn rotates(&self) -> bool {
        matches!(self.kind, RotorKind::Moving { .. })
    }

    /// Returns true iff this rotor is a reflector.
    pub fn reflecting(&self) -> bool {
        matches!(self.kind, RotorKind::Reflector)
    }

    /// Returns the current setting, in `[0, size)`.
    pub fn setting(&self) -> usize {
        self.setting
    }

    /// Sets the current setting to `posn`.
    ///
    /// # Errors
    /// - [`EnigmaError::IndexOutOfRange`] if `posn >= size()`.
    /// - [`EnigmaError::ReflectorMisuse`] if this is a reflector and
    ///   `posn != 0`.
    pub fn set(&mut self, posn: usize) -> Result<()> {
        if posn >= self.size() {
            return Err(EnigmaError::IndexOutOfRange {
                index: posn,
                size: self.size(),
            });
        }
        match self.kind {
            RotorKind::Reflector if posn != 0 => Err(EnigmaError::ReflectorMisuse(format!(
                "reflector {} can only be at position 0, not {}",
                self.name, posn
            ))),
            RotorKind::Reflector | RotorKind::Fixed | RotorKind::Moving { .. } => {
                self.setting = posn;
                Ok(())
            }
        }
    }

    /// Sets the current setting to the index of symbol `ch`.
    ///
    /// # Errors
    /// As [`set`](Self::set), plus [`EnigmaError::SymbolNotFound`] if `ch` is
    /// not in the alphabet.
    pub fn set_symbol(&mut self, ch: char) -> Result<()> {
        let posn = self.alphabet().to_int(ch)?;
        self.set(posn)
    }

    /// Returns true iff this rotor is moving and its current setting is one
    /// of its notches.
    pub fn at_notch(&self) -> bool {
        match &self.kind {
            RotorKind::Moving { notches } => notches.contains(&self.setting),
            RotorKind::Fixed | RotorKind::Reflector => false,
        }
    }

    /// Advances the rotor by one position.
    ///
    /// Fixed rotors ignore the request.
    ///
    /// # Errors
    /// Returns [`EnigmaError::ReflectorMisuse`] for a reflector.
    pub fn advance(&mut self) -> Result<()> {
        match self.kind {
            RotorKind::Moving { .. } => {
                self.setting = self.permutation.wrap(self.setting as i64 + 1);
                Ok(())
            }
            RotorKind::Fixed => Ok(()),
            RotorKind::Reflector => Err(EnigmaError::ReflectorMisuse(format!(
                "reflector {} cannot advance",
                self.name
            ))),
        }
    }

    /// Converts contact index `e` entering from the right, accounting for
    /// the current setting.
    pub fn convert_forward(&self, e: usize) -> usize {
        let contact = self.permutation.permute(e % self.size() + self.setting);
        self.unshift(contact)
    }

    /// Converts contact index `e` entering from the left, accounting for the
    /// current setting.
    ///
    /// # Errors
    /// Returns [`EnigmaError::ReflectorMisuse`] for a reflector.
    pub fn convert_backward(&self, e: usize) -> Result<usize> {
        match self.kind {
            RotorKind::Reflector => Err(EnigmaError::ReflectorMisuse(format!(
                "reflector {} has no backward path",
                self.name
            ))),
            RotorKind::Fixed | RotorKind::Moving { .. } => {
                let contact = self.permutation.invert(e % self.size() + self.setting);
                Ok(self.unshift(contact))
            }
        }
    }

    /// Removes the setting offset from a contact index.
    fn unshift(&self, contact: usize) -> usize {
        (contact + self.size() - self.setting) % self.size()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upper() -> Arc<Alphabet> {
        Arc::new(Alphabet::uppercase())
    }

    fn rotor_i() -> Rotor {
        let perm = Permutation::new("(AELTPHQXRU) (BKNW) (CMOY) (DFG) (IV) (JZ) (S)", upper())
            .unwrap();
        Rotor::moving("I", perm, "Q").unwrap()
    }

    fn reflector_b() -> Rotor {
        let perm = Permutation::new(
            "(AY) (BR) (CU) (DH) (EQ) (FS) (GL) (IP) (JX) (KN) (MO) (TZ) (VW)",
            upper(),
        )
        .unwrap();
        Rotor::reflector("B", perm)
    }

    #[test]
    fn test_capabilities_per_kind() {
        let moving = rotor_i();
        assert!(moving.rotates());
        assert!(!moving.reflecting());

        let fixed = Rotor::fixed("BETA", Permutation::identity(upper()));
        assert!(!fixed.rotates());
        assert!(!fixed.reflecting());
        assert!(!fixed.at_notch());

        let reflector = reflector_b();
        assert!(!reflector.rotates());
        assert!(reflector.reflecting());
        assert!(!reflector.at_notch());
    }

    #[test]
    fn test_forward_at_setting_zero_matches_wiring() {
        let rotor = rotor_i();
        // Rotor I wiring: EKMFLGDQVZNTOWYHXUSPAIBRCJ
        let wiring = "EKMFLGDQVZNTOWYHXUSPAIBRCJ";
        for (i, expected) in wiring.chars().enumerate() {
            let out = rotor.convert_forward(i);
            assert_eq!(rotor.alphabet().to_char(out).unwrap(), expected);
            assert_eq!(rotor.convert_backward(out).unwrap(), i);
        }
    }

    #[test]
    fn test_offset_adjusted_conversion() {
        let mut rotor = rotor_i();
        rotor.set_symbol('B').unwrap();
        // A enters at contact B, which is wired to K; K less one is J.
        assert_eq!(rotor.convert_forward(0), 9);
        assert_eq!(rotor.convert_backward(9).unwrap(), 0);
    }

    #[test]
    fn test_advance_wraps() {
        let mut rotor = rotor_i();
        rotor.set(25).unwrap();
        rotor.advance().unwrap();
        assert_eq!(rotor.setting(), 0);
    }

    #[test]
    fn test_at_notch_tracks_setting() {
        let mut rotor = rotor_i();
        rotor.set_symbol('P').unwrap();
        assert!(!rotor.at_notch());
        rotor.advance().unwrap();
        assert!(rotor.at_notch());
        rotor.advance().unwrap();
        assert!(!rotor.at_notch());
    }

    #[test]
    fn test_multiple_notches() {
        let perm = Permutation::identity(upper());
        let mut rotor = Rotor::moving("VI", perm, "ZM").unwrap();
        rotor.set_symbol('M').unwrap();
        assert!(rotor.at_notch());
        rotor.set_symbol('Z').unwrap();
        assert!(rotor.at_notch());
        rotor.set_symbol('A').unwrap();
        assert!(!rotor.at_notch());
    }

    #[test]
    fn test_fixed_rotor_set_but_not_advanced() {
        let mut rotor = Rotor::fixed("BETA", Permutation::identity(upper()));
        rotor.set(4).unwrap();
        rotor.advance().unwrap();
        assert_eq!(rotor.setting(), 4);
    }

    #[test]
    fn test_reflector_set_nonzero_fails() {
        let mut reflector = reflector_b();
        assert!(reflector.set(0).is_ok());
        assert!(matches!(
            reflector.set(1),
            Err(EnigmaError::ReflectorMisuse(_))
        ));
        assert_eq!(reflector.setting(), 0);
    }

    #[test]
    fn test_reflector_backward_fails() {
        let reflector = reflector_b();
        for e in 0..26 {
            assert!(matches!(
                reflector.convert_backward(e),
                Err(EnigmaError::ReflectorMisuse(_))
            ));
        }
    }

    #[test]
    fn test_reflector_advance_fails() {
        let mut reflector = reflector_b();
        assert!(matches!(
            reflector.advance(),
            Err(EnigmaError::ReflectorMisuse(_))
        ));
    }

    #[test]
    fn test_set_out_of_range() {
        let mut rotor = rotor_i();
        assert_eq!(
            rotor.set(26),
            Err(EnigmaError::IndexOutOfRange { index: 26, size: 26 })
        );
    }

    #[test]
    fn test_unknown_notch_symbol() {
        let alpha = Arc::new(Alphabet::new("ABCD").unwrap());
        let perm = Permutation::identity(alpha);
        assert_eq!(
            Rotor::moving("X", perm, "E"),
            Err(EnigmaError::SymbolNotFound('E'))
        );
    }
}
