//! enigma - rotor cipher machine simulator
//!
//! Reads a machine configuration, then encrypts or decrypts the messages
//! in the input stream according to its `*` settings lines.

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::process;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use enigma::utils::grouping::DEFAULT_GROUP_WIDTH;
use enigma::{MachineConfig, Session};

#[derive(Parser)]
#[command(name = "enigma")]
#[command(about = "Rotor cipher machine simulator")]
#[command(version)]
struct Cli {
    /// Machine configuration file
    config: PathBuf,

    /// Message file (standard input if omitted)
    input: Option<PathBuf>,

    /// Output file (standard output if omitted)
    output: Option<PathBuf>,

    /// Symbols per output group (0 disables grouping)
    #[arg(short = 'g', long, default_value_t = DEFAULT_GROUP_WIDTH)]
    group_width: usize,
}

fn main() {
    init_logging();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

/// Logs to stderr; `RUST_LOG` overrides the default `warn` level.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let text = fs::read_to_string(&cli.config)
        .with_context(|| format!("could not open {}", cli.config.display()))?;
    let config = MachineConfig::parse(&text)
        .with_context(|| format!("bad configuration in {}", cli.config.display()))?;
    let session = Session::new(config).with_group_width(cli.group_width);

    match (cli.input, cli.output) {
        (Some(input), Some(output)) => session.run(open_input(&input)?, create_output(&output)?)?,
        (Some(input), None) => session.run(open_input(&input)?, io::stdout().lock())?,
        (None, Some(output)) => session.run(io::stdin().lock(), create_output(&output)?)?,
        (None, None) => session.run(io::stdin().lock(), io::stdout().lock())?,
    }
    Ok(())
}

fn open_input(path: &Path) -> anyhow::Result<BufReader<File>> {
    let file = File::open(path).with_context(|| format!("could not open {}", path.display()))?;
    Ok(BufReader::new(file))
}

fn create_output(path: &Path) -> anyhow::Result<BufWriter<File>> {
    let file = File::create(path).with_context(|| format!("could not open {}", path.display()))?;
    Ok(BufWriter::new(file))
}
