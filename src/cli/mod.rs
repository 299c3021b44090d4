//! Command-line interface for make-ssh-config.
//!
//! The tool is a one-shot batch transform: read the layer document, resolve every record,
//! write the flattened ssh_config. Output is buffered and only written once every record
//! has succeeded, so a failing run never creates or modifies the output file.
//!
//! # Usage
//!
//! ```bash
//! # Read ./config.yaml, print to stdout
//! make-ssh-config
//!
//! # Explicit input and output
//! make-ssh-config layers.yaml --output ~/.ssh/config
//!
//! # Read from stdin, show debug logging on stderr
//! cat layers.yaml | make-ssh-config - --verbose
//! ```
//!
//! # Environment
//!
//! - `MAKE_SSH_CONFIG_OUTPUT` - default for `--output`
//! - `RUST_LOG` - overrides the log filter chosen by `--verbose` / `--quiet`

#[cfg(test)]
mod tests;

use anyhow::{Context, Result};
use clap::Parser;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use crate::maker;
use crate::utils::atomic_write;

/// Path argument meaning stdin (for input) or stdout (for output).
const STDIO_PATH: &str = "-";

/// Runtime configuration derived from the command line.
///
/// Kept separate from [`Cli`] so tests and library callers can choose a log level without
/// parsing arguments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliConfig {
    /// Default log filter, used when `RUST_LOG` is not set.
    ///
    /// - `"error"`: `--quiet`
    /// - `"warn"`: default
    /// - `"debug"`: `--verbose`
    pub log_level: Option<String>,
}

impl CliConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the global tracing subscriber, writing to stderr.
    ///
    /// Does nothing when a subscriber is already installed.
    pub fn init_logging(&self) {
        let filter = match std::env::var("RUST_LOG") {
            Ok(_) => EnvFilter::from_default_env(),
            Err(_) => EnvFilter::new(self.log_level.as_deref().unwrap_or("warn")),
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    }
}

/// Compile layered YAML declarations into an ssh_config file.
#[derive(Parser, Debug)]
#[command(
    name = "make-ssh-config",
    about = "Compile layered, templated YAML declarations into an ssh_config file",
    version,
    long_about = "Reads a YAML sequence of layer records (name, merge, vars, config, host, match), \
                  resolves inheritance and templates, and writes one Host/Match block per record \
                  that carries a selector."
)]
pub struct Cli {
    /// Layer document to read (`-` for stdin).
    #[arg(default_value = "config.yaml")]
    input: PathBuf,

    /// Where to write the ssh_config (`-` for stdout).
    #[arg(short, long, default_value = STDIO_PATH, env = "MAKE_SSH_CONFIG_OUTPUT")]
    output: PathBuf,

    /// Enable debug logging on stderr.
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log errors.
    #[arg(short, long)]
    quiet: bool,
}

impl Cli {
    /// Execute with the configuration derived from the arguments.
    pub fn execute(self) -> Result<()> {
        let config = self.build_config();
        self.execute_with_config(config)
    }

    /// Translate verbosity flags into a [`CliConfig`].
    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        let log_level = if self.verbose {
            "debug"
        } else if self.quiet {
            "error"
        } else {
            "warn"
        };

        CliConfig {
            log_level: Some(log_level.to_string()),
        }
    }

    /// Run the transform with an explicit configuration.
    pub fn execute_with_config(self, config: CliConfig) -> Result<()> {
        config.init_logging();

        let source = read_input(&self.input)?;
        tracing::debug!("Read {} bytes from {}", source.len(), self.input.display());

        let rendered = maker::compile(&source)?;

        write_output(&self.output, &rendered)
    }
}

fn is_stdio(path: &Path) -> bool {
    path.as_os_str() == STDIO_PATH
}

fn read_input(path: &Path) -> Result<String> {
    if is_stdio(path) {
        let mut source = String::new();
        std::io::stdin().read_to_string(&mut source).context("Failed to read from stdin")?;
        return Ok(source);
    }

    std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read input file: {}", path.display()))
}

fn write_output(path: &Path, content: &str) -> Result<()> {
    if is_stdio(path) {
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(content.as_bytes()).context("Failed to write to stdout")?;
        stdout.flush().context("Failed to flush stdout")?;
        return Ok(());
    }

    atomic_write(path, content.as_bytes())
}
