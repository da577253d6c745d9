//! Transit - Terminal shell
//!
//! Drives the Home/Form navigation demo from text commands. The core owns
//! all state; this crate only parses input and prints screens.

mod commands;
mod render;
mod state;

use anyhow::Context;
use clap::Parser;
use std::io::{BufRead, Write};
use std::path::PathBuf;

use transit_core::Config;

use state::{Flow, ShellState};

#[derive(Debug, Parser)]
#[command(name = "transit", version, about = "Screen navigation demo with deep links")]
pub struct Cli {
    /// TOML configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Deep link or in-app path to open after start
    #[arg(long)]
    pub deep_link: Option<String>,

    /// Commands separated by `;`, run instead of reading stdin
    #[arg(long)]
    pub script: Option<String>,

    /// Log filter used when RUST_LOG is unset
    #[arg(long)]
    pub log_filter: Option<String>,
}

impl Cli {
    /// File configuration with command-line overrides applied
    pub fn resolve_config(&self) -> anyhow::Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)
                .with_context(|| format!("loading config from {}", path.display()))?,
            None => Config::default(),
        };

        if let Some(uri) = &self.deep_link {
            config.start_uri = Some(uri.clone());
        }
        if let Some(filter) = &self.log_filter {
            config.log_filter = filter.clone();
        }

        Ok(config)
    }
}

pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.resolve_config()?;

    transit_core::init_logging(&config.log_filter);

    let stdout = std::io::stdout();
    match &cli.script {
        Some(script) => {
            let lines = script.split(';').map(str::to_string).collect::<Vec<_>>();
            run_session(&config, lines.into_iter().map(Ok), stdout.lock())?;
        }
        None => {
            let stdin = std::io::stdin();
            run_session(&config, stdin.lock().lines(), stdout.lock())?;
        }
    }

    tracing::info!("Transit shell exited");

    Ok(())
}

/// Start the app and feed it `lines` until they run out or the shell exits.
/// Returns the output writer.
pub fn run_session<I, W>(config: &Config, lines: I, out: W) -> anyhow::Result<W>
where
    I: IntoIterator<Item = std::io::Result<String>>,
    W: Write,
{
    let mut shell = ShellState::new(config, out)?;
    shell.start()?;

    for line in lines {
        let line = line.context("reading input")?;
        if shell.execute(&line)? == Flow::Exit {
            break;
        }
    }

    Ok(shell.into_output())
}
