//! Machine: rotor stack, plugboard and the pawl stepping mechanism.
//!
//! Holds the available rotor definitions, the assembled stack (slot 0 is
//! the reflector, the last slot is the fast rotor) and the optional
//! plugboard. Every keystroke first steps the driven rotors, then runs the
//! signal forward through the stack, off the reflector, and back.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use tracing::{debug, trace, warn};

use crate::alphabet::Alphabet;
use crate::error::{EnigmaError, Result};
use crate::permutation::Permutation;
use crate::rotor::Rotor;

/// Symbol that passes through [`Machine::convert_message`] untouched.
const SPACE: char = ' ';

/// A rotor cipher machine.
///
/// # Architecture
///
/// ```text
/// plugboard → slot N-1 → … → slot 1 → slot 0 (reflector)
///                                        ↓
/// plugboard ← slot N-1 ← … ← slot 1 ←───┘
/// ```
///
/// The rightmost `num_pawls` slots are driven. Before each keystroke the
/// fast rotor always advances; a driven rotor sitting at a notch advances
/// itself and its left neighbor, which reproduces the double step.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use enigma::{Alphabet, Machine, Permutation, Rotor};
///
/// let alpha = Arc::new(Alphabet::new("ABCD").unwrap());
/// let perm = |cycles: &str| Permutation::new(cycles, Arc::clone(&alpha)).unwrap();
/// let rotors = vec![
///     Rotor::reflector("R0", perm("(AD)(BC)")),
///     Rotor::fixed("R1", perm("(AB)(CD)")),
///     Rotor::moving("R2", perm("(AC)(BD)"), "A").unwrap(),
/// ];
///
/// let mut machine = Machine::new(Arc::clone(&alpha), 3, 1, rotors).unwrap();
/// machine.insert_rotors(&["R0", "R1", "R2"]).unwrap();
/// machine.set_rotors("AA").unwrap();
/// assert_eq!(machine.convert_message("A").unwrap(), "D");
/// ```
#[derive(Debug, Clone)]
pub struct Machine {
    alphabet: Arc<Alphabet>,
    num_rotors: usize,
    num_pawls: usize,
    available: BTreeMap<String, Rotor>,
    slots: Vec<Rotor>,
    plugboard: Option<Permutation>,
}

impl Machine {
    /// Creates a machine with `num_rotors` slots, of which the rightmost
    /// `num_pawls` are driven, choosing its rotors from `all_rotors`.
    ///
    /// No rotors are inserted yet; call
    /// [`insert_rotors`](Self::insert_rotors) before converting.
    ///
    /// # Errors
    /// - [`EnigmaError::InfeasibleSpec`] unless `num_rotors > 1` and
    ///   `num_pawls < num_rotors`.
    /// - [`EnigmaError::RotorAssembly`] if two definitions share a name
    ///   (case-insensitively) or a definition uses a different alphabet.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::Arc;
    /// use enigma::{Alphabet, EnigmaError, Machine, Rotor};
    ///
    /// let alpha = Arc::new(Alphabet::uppercase());
    /// let result = Machine::new(alpha, 3, 3, Vec::<Rotor>::new());
    /// assert!(matches!(result, Err(EnigmaError::InfeasibleSpec { .. })));
    /// ```
    pub fn new(
        alphabet: Arc<Alphabet>,
        num_rotors: usize,
        num_pawls: usize,
        all_rotors: impl IntoIterator<Item = Rotor>,
    ) -> Result<Self> {
        check_feasible(num_rotors, num_pawls)?;

        let mut available = BTreeMap::new();
        for rotor in all_rotors {
            if **rotor.alphabet() != *alphabet {
                return Err(EnigmaError::RotorAssembly(format!(
                    "rotor {} is wired over a different alphabet",
                    rotor.name()
                )));
            }
            let key = rotor.name().to_uppercase();
            if available.contains_key(&key) {
                return Err(EnigmaError::RotorAssembly(format!(
                    "rotor {} is defined more than once",
                    rotor.name()
                )));
            }
            available.insert(key, rotor);
        }

        debug!(
            num_rotors,
            num_pawls,
            available = available.len(),
            "machine created"
        );

        Ok(Machine {
            alphabet,
            num_rotors,
            num_pawls,
            available,
            slots: Vec::with_capacity(num_rotors),
            plugboard: None,
        })
    }

    /// Returns the number of rotor slots.
    pub fn num_rotors(&self) -> usize {
        self.num_rotors
    }

    /// Returns the number of pawls, and thus of driven rotors.
    pub fn num_pawls(&self) -> usize {
        self.num_pawls
    }

    /// Returns the machine's alphabet.
    pub fn alphabet(&self) -> &Arc<Alphabet> {
        &self.alphabet
    }

    /// Returns the assembled rotor stack, left to right. Empty until
    /// [`insert_rotors`](Self::insert_rotors) succeeds.
    pub fn rotors(&self) -> &[Rotor] {
        &self.slots
    }

    /// Returns the plugboard, if one is set.
    pub fn plugboard(&self) -> Option<&Permutation> {
        self.plugboard.as_ref()
    }

    /// Fills the rotor slots with the rotors named by `names`, left to right.
    /// `names[0]` must name a reflector. All inserted rotors start at
    /// setting 0. Names are matched case-insensitively.
    ///
    /// # Errors
    /// Returns [`EnigmaError::RotorAssembly`] if fewer rotors are available
    /// than requested, `names.len() != num_rotors()`, a name repeats or is
    /// unknown, `names[0]` is not a reflector, or a later slot names a
    /// reflector. On error the previous stack is left untouched.
    pub fn insert_rotors<S: AsRef<str>>(&mut self, names: &[S]) -> Result<()> {
        if self.available.len() < names.len() {
            return Err(EnigmaError::RotorAssembly(format!(
                "{} rotors requested but only {} available",
                names.len(),
                self.available.len()
            )));
        }
        if names.len() != self.num_rotors {
            return Err(EnigmaError::RotorAssembly(format!(
                "expected {} rotors, got {}",
                self.num_rotors,
                names.len()
            )));
        }

        let mut seen = BTreeSet::new();
        let mut slots = Vec::with_capacity(self.num_rotors);
        for (slot, name) in names.iter().enumerate() {
            let key = name.as_ref().to_uppercase();
            if !seen.insert(key.clone()) {
                return Err(EnigmaError::RotorAssembly(format!(
                    "rotor {} is used more than once",
                    name.as_ref()
                )));
            }
            let rotor = self.available.get(&key).ok_or_else(|| {
                EnigmaError::RotorAssembly(format!("unknown rotor {}", name.as_ref()))
            })?;
            match (slot, rotor.reflecting()) {
                (0, false) => {
                    return Err(EnigmaError::RotorAssembly(format!(
                        "first rotor {} must be a reflector",
                        rotor.name()
                    )));
                }
                (s, true) if s > 0 => {
                    return Err(EnigmaError::RotorAssembly(format!(
                        "reflector {} can only occupy the first slot",
                        rotor.name()
                    )));
                }
                _ => {}
            }
            let mut rotor = rotor.clone();
            rotor.set(0)?;
            slots.push(rotor);
        }

        let moving = slots.iter().filter(|r| r.rotates()).count();
        if moving != self.num_pawls {
            warn!(
                moving,
                num_pawls = self.num_pawls,
                "number of moving rotors does not match number of pawls"
            );
        }

        debug!(
            rotors = ?slots.iter().map(Rotor::name).collect::<Vec<_>>(),
            "rotors inserted"
        );
        self.slots = slots;
        Ok(())
    }

    /// Sets the positions of slots 1.. from `setting`, one symbol per slot,
    /// leftmost first. The reflector in slot 0 is never set this way.
    ///
    /// # Errors
    /// - [`EnigmaError::SettingLength`] unless `setting` has exactly
    ///   `num_rotors() - 1` symbols.
    /// - [`EnigmaError::RotorAssembly`] if no rotors are inserted.
    /// - [`EnigmaError::SymbolNotFound`] if a symbol is not in the alphabet.
    ///
    /// Either every position is applied or none is.
    pub fn set_rotors(&mut self, setting: &str) -> Result<()> {
        let expected = self.num_rotors - 1;
        let actual = setting.chars().count();
        if actual != expected {
            return Err(EnigmaError::SettingLength { expected, actual });
        }
        self.ensure_assembled()?;

        let positions = setting
            .chars()
            .map(|ch| self.alphabet.to_int(ch))
            .collect::<Result<Vec<usize>>>()?;

        let mut slots = self.slots.clone();
        for (rotor, posn) in slots.iter_mut().skip(1).zip(positions) {
            rotor.set(posn)?;
        }
        self.slots = slots;

        trace!(positions = %setting, "rotors set");
        Ok(())
    }

    /// Returns the current positions of slots 1.. as symbols.
    pub fn positions(&self) -> String {
        self.slots
            .iter()
            .skip(1)
            .filter_map(|r| self.alphabet.to_char(r.setting()).ok())
            .collect()
    }

    /// Replaces the plugboard. `None` means no plugboard.
    pub fn set_plugboard(&mut self, plugboard: Option<Permutation>) {
        if let Some(board) = &plugboard {
            debug!(plugboard = %board, "plugboard set");
        }
        self.plugboard = plugboard;
    }

    /// Converts the input index `c` after first stepping the rotors.
    ///
    /// # Errors
    /// Returns [`EnigmaError::RotorAssembly`] if the rotor stack has not been
    /// inserted.
    pub fn convert(&mut self, c: usize) -> Result<usize> {
        self.ensure_assembled()?;
        self.step()?;

        let mut c = c;
        if let Some(board) = &self.plugboard {
            c = board.permute(c);
        }
        for rotor in self.slots.iter().rev() {
            c = rotor.convert_forward(c);
        }
        for rotor in self.slots.iter().skip(1) {
            c = rotor.convert_backward(c)?;
        }
        if let Some(board) = &self.plugboard {
            c = board.permute(c);
        }
        Ok(c)
    }

    /// Converts `msg` symbol by symbol, upper-casing each one first.
    ///
    /// Spaces are copied through without stepping the rotors.
    ///
    /// # Errors
    /// Returns [`EnigmaError::SymbolNotFound`] for a symbol outside the
    /// alphabet, and any error from [`convert`](Self::convert).
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::Arc;
    /// use enigma::{Alphabet, Machine, Permutation, Rotor};
    ///
    /// let alpha = Arc::new(Alphabet::uppercase());
    /// let perm = |cycles: &str| Permutation::new(cycles, Arc::clone(&alpha)).unwrap();
    /// let rotors = vec![
    ///     Rotor::reflector("B", perm("(AY)(BR)(CU)(DH)(EQ)(FS)(GL)(IP)(JX)(KN)(MO)(TZ)(VW)")),
    ///     Rotor::moving("I", perm("(AELTPHQXRU)(BKNW)(CMOY)(DFG)(IV)(JZ)(S)"), "Q").unwrap(),
    ///     Rotor::moving("II", perm("(FIXVYOMW)(CDKLHUP)(ESZ)(BJ)(GR)(NT)(A)(Q)"), "E").unwrap(),
    ///     Rotor::moving("III", perm("(ABDHPEJT)(CFLVMZOYQIRWUKXSG)(N)"), "V").unwrap(),
    /// ];
    ///
    /// let mut machine = Machine::new(Arc::clone(&alpha), 4, 3, rotors).unwrap();
    /// machine.insert_rotors(&["B", "I", "II", "III"]).unwrap();
    /// machine.set_rotors("AAA").unwrap();
    /// assert_eq!(machine.convert_message("aaaaa").unwrap(), "BDZGO");
    /// ```
    pub fn convert_message(&mut self, msg: &str) -> Result<String> {
        let mut converted = String::with_capacity(msg.len());
        for ch in msg.chars() {
            if ch == SPACE {
                converted.push(SPACE);
                continue;
            }
            for upper in ch.to_uppercase() {
                let index = self.alphabet.to_int(upper)?;
                let out = self.convert(index)?;
                converted.push(self.alphabet.to_char(out)?);
            }
        }
        Ok(converted)
    }

    // ──────── Stepping ────────

    /// Advances the driven rotors for one keystroke.
    ///
    /// Which rotors move is decided from the state before any of them
    /// moves. The fast rotor always moves. A driven rotor at a notch moves
    /// its left neighbor and, when that neighbor is also driven, itself.
    /// The leftmost driven rotor has no pawl to its left and never kicks
    /// itself.
    fn step(&mut self) -> Result<()> {
        let n = self.slots.len();
        if self.num_pawls == 0 {
            return Ok(());
        }
        let first_driven = n - self.num_pawls;

        let mut advancing = vec![false; n];
        advancing[n - 1] = true;
        for i in (first_driven + 1)..n {
            if self.slots[i].at_notch() {
                advancing[i] = true;
                advancing[i - 1] = true;
            }
        }

        for (rotor, _) in self
            .slots
            .iter_mut()
            .zip(advancing)
            .filter(|(_, advance)| *advance)
        {
            rotor.advance()?;
        }

        trace!(positions = %self.positions(), "rotors stepped");
        Ok(())
    }

    /// Fails unless every slot holds a rotor.
    fn ensure_assembled(&self) -> Result<()> {
        if self.slots.len() != self.num_rotors {
            return Err(EnigmaError::RotorAssembly(
                "rotors have not been inserted".to_string(),
            ));
        }
        Ok(())
    }
}

/// Checks the slot and pawl counts of a machine description.
///
/// # Errors
/// Returns [`EnigmaError::InfeasibleSpec`] unless `num_rotors > 1` and
/// `num_pawls < num_rotors`.
pub(crate) fn check_feasible(num_rotors: usize, num_pawls: usize) -> Result<()> {
    if num_rotors > 1 && num_pawls < num_rotors {
        Ok(())
    } else {
        Err(EnigmaError::InfeasibleSpec {
            num_rotors,
            num_pawls,
        })
    }
}
