//! Session: drives a machine over a stream of settings and message lines.
//!
//! Input is read line by line. A line starting with `*` builds a fresh
//! machine from the [`MachineConfig`] and applies the settings on it; every
//! other line is converted by the current machine and written out in
//! fixed-width groups. Rotor positions carry over from one message line to
//! the next until the next settings line.

use std::io::{BufRead, Write};

use thiserror::Error;
use tracing::{debug, info};

use crate::config::{MachineConfig, Settings, SETTINGS_MARKER};
use crate::error::EnigmaError;
use crate::machine::Machine;
use crate::utils::grouping::{group_symbols, DEFAULT_GROUP_WIDTH};

/// Errors produced while processing a message stream.
#[derive(Error, Debug)]
pub enum SessionError {
    /// The machine, configuration or a settings line was rejected.
    #[error(transparent)]
    Enigma(#[from] EnigmaError),

    /// Reading input or writing output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A message line appeared before any settings line.
    #[error("input must begin with a settings line starting with '*'")]
    MissingSettings,
}

/// Processes message streams against one configuration.
///
/// # Examples
///
/// ```
/// use enigma::{MachineConfig, Session};
///
/// let config: MachineConfig = "ABCD 3 1 R0 R (AD)(BC) R1 N (AB)(CD) R2 MA (AC)(BD)"
///     .parse()
///     .unwrap();
/// let session = Session::new(config);
///
/// let mut output = Vec::new();
/// session.run("* R0 R1 R2 AA\nAAAA\n".as_bytes(), &mut output).unwrap();
/// assert_eq!(String::from_utf8(output).unwrap(), "DDDD\n");
/// ```
#[derive(Debug, Clone)]
pub struct Session {
    config: MachineConfig,
    group_width: usize,
}

impl Session {
    /// Creates a session writing output in groups of five symbols.
    pub fn new(config: MachineConfig) -> Self {
        Session {
            config,
            group_width: DEFAULT_GROUP_WIDTH,
        }
    }

    /// Sets the output group width. 0 disables grouping.
    pub fn with_group_width(mut self, width: usize) -> Self {
        self.group_width = width;
        self
    }

    /// Returns the configuration machines are built from.
    pub fn config(&self) -> &MachineConfig {
        &self.config
    }

    /// Reads every line of `input` and writes converted messages to
    /// `output`, one output line per message line.
    ///
    /// Input is upper-cased before processing. Only a line whose first
    /// character is `*` is a settings line; an indented `*` is message text.
    /// Blank lines before the first settings line are skipped; after it they
    /// produce blank output lines.
    ///
    /// # Errors
    /// - [`SessionError::MissingSettings`] if a message precedes every
    ///   settings line.
    /// - [`SessionError::Enigma`] for configuration, settings or conversion
    ///   failures.
    /// - [`SessionError::Io`] if reading or writing fails.
    pub fn run<R: BufRead, W: Write>(&self, input: R, mut output: W) -> Result<(), SessionError> {
        let mut machine: Option<Machine> = None;

        for (number, line) in input.lines().enumerate() {
            let line = line?.to_uppercase();

            if line.starts_with(SETTINGS_MARKER) {
                machine = Some(self.configure(&line)?);
                info!(line = number + 1, "machine configured");
                continue;
            }

            let current = match machine.as_mut() {
                Some(current) => current,
                None if line.trim().is_empty() => continue,
                None => return Err(SessionError::MissingSettings),
            };

            let message = line.split_whitespace().collect::<Vec<_>>().join(" ");
            let converted = current.convert_message(&message)?;
            writeln!(output, "{}", group_symbols(&converted, self.group_width))?;
            debug!(
                line = number + 1,
                symbols = converted.chars().filter(|c| !c.is_whitespace()).count(),
                "message converted"
            );
        }

        output.flush()?;
        Ok(())
    }

    /// Builds a fresh machine and applies the settings line to it.
    fn configure(&self, line: &str) -> Result<Machine, EnigmaError> {
        let settings = Settings::parse(line)?;
        let mut machine = self.config.build_machine()?;
        settings.apply(&mut machine)?;
        Ok(machine)
    }
}
