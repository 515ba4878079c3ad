//! netsynth CLI library

pub mod commands;
pub mod config;
pub mod error;

pub use error::{Error, Result};

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// netsynth - least-privilege network policies from observed traffic
#[derive(Parser, Debug)]
#[command(name = "netsynth")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Config file (default: $NETSYNTH_CONFIG or ~/.netsynth/config.json)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Read a Hubble export and save it as a normalized flow collection
    Learn(commands::learn::LearnArgs),
    /// Synthesize CiliumNetworkPolicy YAML from a flow collection
    Propose(commands::propose::ProposeArgs),
    /// Check a policy file for structural problems
    Verify(commands::verify::VerifyArgs),
}

impl Cli {
    /// Run the CLI command
    pub fn run(self) -> Result<()> {
        let config = config::load_config(self.config.as_deref())?;
        match self.command {
            Commands::Learn(args) => commands::learn::run(args, &config),
            Commands::Propose(args) => commands::propose::run(args, &config),
            Commands::Verify(args) => commands::verify::run(args, &config),
        }
    }
}
