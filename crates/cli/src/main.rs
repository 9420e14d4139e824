mod cmd;
mod output;
mod prompts;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::cmd::StripArgs;
use crate::output::OutputFormat;

/// slnstrip - remove files from a Visual Studio solution, its projects and disk
#[derive(Parser)]
#[command(name = "slnstrip")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable verbose output
  #[arg(short, long, global = true)]
  verbose: bool,

  /// Output format
  #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Text)]
  output: OutputFormat,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Remove files from every project of a solution and from disk
  Strip(StripArgs),

  /// List the member projects of a solution
  Projects {
    /// Path to the solution file
    solution: PathBuf,
  },

  /// List the compile and include items of a project
  Items {
    /// Path to the project file (.vcxproj or .vcxproj.filters)
    project: PathBuf,
  },
}

fn main() -> Result<()> {
  let cli = Cli::parse();

  let default_filter = if cli.verbose { "debug" } else { "warn" };
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
    .with_writer(std::io::stderr)
    .without_time()
    .init();

  match cli.command {
    Commands::Strip(args) => cmd::cmd_strip(args, cli.verbose, cli.output),
    Commands::Projects { solution } => cmd::cmd_projects(&solution, cli.output),
    Commands::Items { project } => cmd::cmd_items(&project, cli.output),
  }
}
