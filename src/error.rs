//! Error types for the Enigma library.

use thiserror::Error;

/// Errors produced by the machine core and the configuration parser.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EnigmaError {
    /// Alphabet index lookup outside `[0, size)`.
    #[error("index {index} is outside the alphabet range [0, {size})")]
    IndexOutOfRange { index: usize, size: usize },

    /// Character not present in the configured alphabet.
    #[error("symbol '{0}' is not in the alphabet")]
    SymbolNotFound(char),

    /// Alphabet is empty, repeats a symbol, or uses a reserved character.
    #[error("invalid alphabet: {0}")]
    InvalidAlphabet(String),

    /// Cycle notation could not be parsed into a permutation.
    #[error("malformed cycles: {0}")]
    MalformedCycles(String),

    /// Rotor slot and pawl counts do not describe a buildable machine.
    #[error("machine with {num_rotors} rotor slots and {num_pawls} pawls is not feasible")]
    InfeasibleSpec { num_rotors: usize, num_pawls: usize },

    /// Rotor stack could not be assembled as requested.
    #[error("rotor assembly error: {0}")]
    RotorAssembly(String),

    /// Initial setting string has the wrong number of symbols.
    #[error("setting must have {expected} symbols, got {actual}")]
    SettingLength { expected: usize, actual: usize },

    /// Reflector asked to move or to carry the backward signal.
    #[error("reflector misuse: {0}")]
    ReflectorMisuse(String),

    /// Configuration or settings text is malformed.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, EnigmaError>;
