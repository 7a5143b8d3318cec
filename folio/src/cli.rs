use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Command line interface for folio
#[derive(Parser, Debug)]
#[command(author, version, about = "Folio: post-process document HTML")]
pub struct Cli {
  /// Subcommand to execute (see [`Commands`])
  #[command(subcommand)]
  pub command: Commands,

  /// Enable verbose debug logging
  #[arg(short, long, global = true)]
  pub verbose: bool,

  /// Path to configuration file(s) (TOML or JSON, can be specified multiple
  /// times) Multiple files are merged in order, with later files overriding
  /// earlier ones
  #[arg(
    short = 'c',
    long = "config-file",
    action = clap::ArgAction::Append,
    global = true
  )]
  pub config_files: Vec<PathBuf>,

  /// Override configuration values (KEY=VALUE format, can be used multiple
  /// times)
  #[arg(long = "config", action = clap::ArgAction::Append, global = true)]
  pub config_overrides: Vec<String>,

  /// Number of threads to use for batch rendering.
  #[arg(short = 'j', long = "jobs", global = true)]
  pub jobs: Option<usize>,
}

/// All supported subcommands for the folio CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
  /// Process HTML documents.
  Render {
    /// Files or directories to render. Directories are searched for `.html`
    /// and `.htm` files; `-` reads from stdin.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Directory to write rendered documents to. Prints to stdout when
    /// omitted.
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format.
    #[arg(short = 'F', long, value_parser = ["html", "json"])]
    format: Option<String>,

    /// Disable syntax highlighting of code blocks.
    #[arg(long)]
    no_highlight: bool,

    /// Highlight theme for the stylesheet written next to the output.
    #[arg(short, long)]
    theme: Option<String>,
  },

  /// Print the outline of a document.
  Outline {
    /// Document to read, or `-` for stdin.
    input: PathBuf,

    /// Print the outline as JSON.
    #[arg(long)]
    json: bool,
  },

  /// Print the stylesheet for highlighted code.
  Css {
    /// Theme to generate the stylesheet for.
    #[arg(short, long)]
    theme: Option<String>,
  },

  /// Initialize a new folio configuration file
  Init {
    /// Path to create the configuration file at
    #[arg(short, long, default_value = "folio.toml")]
    output: PathBuf,

    /// Format of the configuration file.
    #[arg(short = 'F', long, default_value = "toml", value_parser = ["toml", "json"])]
    format: String,

    /// Force overwrite if file already exists
    #[arg(short, long)]
    force: bool,
  },
}

impl Cli {
  /// Parse command line arguments into a [`Cli`] struct.
  #[must_use]
  pub fn parse_args() -> Self {
    Self::parse()
  }
}
