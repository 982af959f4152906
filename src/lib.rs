//! Rotor cipher machine simulator.
//!
//! Emulates the electromechanical cipher of a rotor machine: a stack of
//! interchangeable wired rotors advanced by pawls, a reflector that turns
//! the signal back through the stack, and an optional plugboard. The
//! stepping mechanism reproduces the historical double step of the middle
//! rotor.
//!
//! # Architecture
//!
//! ```text
//! Alphabet     (symbol ⟷ index)
//!     ↓
//! Permutation  (cycle notation → forward/inverse tables)
//!     ↓
//! Rotor        (Fixed | Moving | Reflector, offset by its setting)
//!     ↓ N slots, rightmost num_pawls driven
//! Machine      (stepping + plugboard + forward/backward signal path)
//!     ↑ built from
//! MachineConfig + Settings  →  Session (message stream, 5-symbol groups)
//! ```
//!
//! # Examples
//!
//! Encrypt with an Enigma I (reflector B, rotors I II III at AAA) and
//! decrypt with a second machine set up the same way:
//!
//! ```
//! use enigma::{MachineConfig, Settings};
//!
//! let config: MachineConfig = "A-Z 4 3
//!     B   R   (AY) (BR) (CU) (DH) (EQ) (FS) (GL) (IP) (JX) (KN) (MO) (TZ) (VW)
//!     I   MQ  (AELTPHQXRU) (BKNW) (CMOY) (DFG) (IV) (JZ) (S)
//!     II  ME  (FIXVYOMW) (CDKLHUP) (ESZ) (BJ) (GR) (NT) (A) (Q)
//!     III MV  (ABDHPEJT) (CFLVMZOYQIRWUKXSG) (N)"
//!     .parse()
//!     .unwrap();
//! let settings: Settings = "* B I II III AAA".parse().unwrap();
//!
//! let mut encoder = config.build_machine().unwrap();
//! settings.apply(&mut encoder).unwrap();
//! assert_eq!(encoder.convert_message("HELLO WORLD").unwrap(), "ILBDA AMTAZ");
//!
//! let mut decoder = config.build_machine().unwrap();
//! settings.apply(&mut decoder).unwrap();
//! assert_eq!(decoder.convert_message("ILBDA AMTAZ").unwrap(), "HELLO WORLD");
//! ```

#![deny(clippy::all)]

pub mod alphabet;
pub mod config;
pub mod error;
pub mod machine;
pub mod permutation;
pub mod rotor;
pub mod session;
pub mod utils;

pub use alphabet::Alphabet;
pub use config::{MachineConfig, Settings};
pub use error::EnigmaError;
pub use machine::Machine;
pub use permutation::Permutation;
pub use rotor::{Rotor, RotorKind};
pub use session::{Session, SessionError};
