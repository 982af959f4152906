//! Machine configuration and settings-line parsing.
//!
//! A configuration describes everything that is fixed for a run: the
//! alphabet, the slot and pawl counts, and the rotors available to choose
//! from. It is plain whitespace-separated text:
//!
//! ```text
//! ABCDEFGHIJKLMNOPQRSTUVWXYZ
//! 5 3
//! I     MQ  (AELTPHQXRU) (BKNW) (CMOY) (DFG) (IV) (JZ) (S)
//! BETA  N   (ALBEVFCYODJWUGNMQTZSKPR) (HIX)
//! B     R   (AE) (BN) (CK) (DQ) (FU) (GY) (HW) (IJ) (LO) (MP)
//!           (RX) (SZ) (TV)
//! ```
//!
//! The alphabet may also be written as a range such as `A-Z`. Each rotor is
//! a name, a type (`M` followed by its notch symbols, `N` for fixed, `R` for
//! a reflector) and any number of cycle tokens.
//!
//! A settings line selects rotors for one message:
//!
//! ```text
//! * B BETA III IV I AXLE (HQ) (EX) (IP) (TR) (BY)
//! ```

use std::str::FromStr;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::alphabet::Alphabet;
use crate::error::{EnigmaError, Result};
use crate::machine::{check_feasible, Machine};
use crate::permutation::Permutation;
use crate::rotor::Rotor;

/// Leading marker of a settings line.
pub const SETTINGS_MARKER: char = '*';

/// Everything needed to build a fresh [`Machine`].
///
/// # Examples
///
/// ```
/// use enigma::MachineConfig;
///
/// let config: MachineConfig = "ABCD 3 1
///     R0 R (AD) (BC)
///     R1 N (AB) (CD)
///     R2 MA (AC) (BD)"
///     .parse()
///     .unwrap();
///
/// let mut machine = config.build_machine().unwrap();
/// "* R0 R1 R2 AA".parse::<enigma::Settings>().unwrap().apply(&mut machine).unwrap();
/// assert_eq!(machine.convert_message("A").unwrap(), "D");
/// ```
#[derive(Debug, Clone)]
pub struct MachineConfig {
    alphabet: Arc<Alphabet>,
    num_rotors: usize,
    num_pawls: usize,
    rotors: Vec<Rotor>,
}

impl MachineConfig {
    /// Creates a configuration from already-built parts.
    ///
    /// # Errors
    /// Returns [`EnigmaError::InfeasibleSpec`] for bad counts.
    pub fn new(
        alphabet: Arc<Alphabet>,
        num_rotors: usize,
        num_pawls: usize,
        rotors: Vec<Rotor>,
    ) -> Result<Self> {
        check_feasible(num_rotors, num_pawls)?;
        Ok(MachineConfig {
            alphabet,
            num_rotors,
            num_pawls,
            rotors,
        })
    }

    /// Parses configuration text.
    ///
    /// # Errors
    /// - [`EnigmaError::Config`] if the text is truncated, a count is not a
    ///   number, a rotor type is unknown or a rotor name repeats.
    /// - [`EnigmaError::InfeasibleSpec`] for bad counts.
    /// - Alphabet and cycle errors from the underlying constructors.
    pub fn parse(text: &str) -> Result<Self> {
        let mut tokens = text.split_whitespace().peekable();

        let alphabet: Alphabet = tokens
            .next()
            .ok_or_else(|| truncated("alphabet"))?
            .parse()?;
        let alphabet = Arc::new(alphabet);
        let num_rotors = parse_count(tokens.next(), "rotor count")?;
        let num_pawls = parse_count(tokens.next(), "pawl count")?;
        check_feasible(num_rotors, num_pawls)?;

        let mut rotors: Vec<Rotor> = Vec::new();
        while let Some(name) = tokens.next() {
            let name = name.to_uppercase();
            if rotors.iter().any(|r| r.name() == name) {
                return Err(EnigmaError::Config(format!(
                    "rotor {} is defined more than once",
                    name
                )));
            }
            let kind = tokens
                .next()
                .ok_or_else(|| truncated(&format!("type of rotor {}", name)))?;

            let mut cycles = Vec::new();
            while let Some(cycle) = tokens.next_if(|t| t.starts_with('(')) {
                cycles.push(cycle);
            }
            let permutation = Permutation::new(&cycles.join(" "), Arc::clone(&alphabet))?;

            rotors.push(parse_rotor(name, kind, permutation)?);
        }

        debug!(
            alphabet = %alphabet,
            num_rotors,
            num_pawls,
            rotors = rotors.len(),
            "configuration loaded"
        );

        Ok(MachineConfig {
            alphabet,
            num_rotors,
            num_pawls,
            rotors,
        })
    }

    /// Returns the shared alphabet.
    pub fn alphabet(&self) -> &Arc<Alphabet> {
        &self.alphabet
    }

    /// Returns the number of rotor slots.
    pub fn num_rotors(&self) -> usize {
        self.num_rotors
    }

    /// Returns the number of pawls.
    pub fn num_pawls(&self) -> usize {
        self.num_pawls
    }

    /// Returns the available rotor definitions, in file order.
    pub fn rotors(&self) -> &[Rotor] {
        &self.rotors
    }

    /// Builds a machine with every definition available and no rotors
    /// inserted yet.
    ///
    /// # Errors
    /// As [`Machine::new`].
    pub fn build_machine(&self) -> Result<Machine> {
        Machine::new(
            Arc::clone(&self.alphabet),
            self.num_rotors,
            self.num_pawls,
            self.rotors.iter().cloned(),
        )
    }
}

impl FromStr for MachineConfig {
    type Err = EnigmaError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// A parsed settings line: rotor choice, initial positions and plugboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    rotors: Vec<String>,
    positions: String,
    plugboard: Option<String>,
}

impl Settings {
    /// Parses a settings line. The number of rotor names is implied by the
    /// token that follows them: the last non-cycle token is the positions
    /// string, every token before it is a rotor name.
    ///
    /// # Errors
    /// Returns [`EnigmaError::Config`] if the line does not start with `*`,
    /// names no rotors, or has no positions token.
    pub fn parse(line: &str) -> Result<Self> {
        let body = line
            .trim_start()
            .strip_prefix(SETTINGS_MARKER)
            .ok_or_else(|| {
                EnigmaError::Config(format!("settings line must start with '*': {:?}", line))
            })?;

        let tokens: Vec<&str> = body.split_whitespace().collect();
        let split = tokens
            .iter()
            .position(|t| t.starts_with('('))
            .unwrap_or(tokens.len());
        let (head, cycles) = tokens.split_at(split);

        let (positions, names) = head.split_last().ok_or_else(|| {
            EnigmaError::Config(format!("settings line has no positions: {:?}", line))
        })?;
        if names.is_empty() {
            return Err(EnigmaError::Config(format!(
                "settings line names no rotors: {:?}",
                line
            )));
        }

        let plugboard = if cycles.is_empty() {
            None
        } else {
            Some(cycles.join(" "))
        };

        Ok(Settings {
            rotors: names.iter().map(|n| n.to_uppercase()).collect(),
            positions: positions.to_string(),
            plugboard,
        })
    }

    /// Returns the selected rotor names, left to right.
    pub fn rotors(&self) -> &[String] {
        &self.rotors
    }

    /// Returns the initial positions string.
    pub fn positions(&self) -> &str {
        &self.positions
    }

    /// Returns the plugboard cycles, if any.
    pub fn plugboard(&self) -> Option<&str> {
        self.plugboard.as_deref()
    }

    /// Inserts the rotors, sets their positions and installs the plugboard.
    ///
    /// Either the whole line takes effect or `machine` is left untouched.
    ///
    /// # Errors
    /// Any error from [`Machine::insert_rotors`], [`Machine::set_rotors`] or
    /// parsing the plugboard cycles.
    pub fn apply(&self, machine: &mut Machine) -> Result<()> {
        let plugboard = self
            .plugboard
            .as_deref()
            .map(|cycles| Permutation::new(cycles, Arc::clone(machine.alphabet())))
            .transpose()?;

        let mut staged = machine.clone();
        staged.insert_rotors(self.rotors.as_slice())?;
        staged.set_rotors(&self.positions)?;
        staged.set_plugboard(plugboard);
        *machine = staged;
        Ok(())
    }
}

impl FromStr for Settings {
    type Err = EnigmaError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Builds a rotor from its type token.
fn parse_rotor(name: String, kind: &str, permutation: Permutation) -> Result<Rotor> {
    let mut chars = kind.chars();
    match chars.next().map(|c| c.to_ascii_uppercase()) {
        Some('M') => Rotor::moving(name, permutation, chars.as_str()),
        Some('N') if chars.as_str().is_empty() => Ok(Rotor::fixed(name, permutation)),
        Some('R') if chars.as_str().is_empty() => {
            if !permutation.derangement() {
                warn!(rotor = %name, "reflector wiring has fixed points");
            }
            Ok(Rotor::reflector(name, permutation))
        }
        _ => Err(EnigmaError::Config(format!(
            "rotor {} has unknown type {:?}",
            name, kind
        ))),
    }
}

/// Parses a non-negative count token.
fn parse_count(token: Option<&str>, what: &str) -> Result<usize> {
    let token = token.ok_or_else(|| truncated(what))?;
    token
        .parse()
        .map_err(|_| EnigmaError::Config(format!("expected {}, found {:?}", what, token)))
}

fn truncated(what: &str) -> EnigmaError {
    EnigmaError::Config(format!("configuration truncated before {}", what))
}
