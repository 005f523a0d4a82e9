use crate::io::OutputFormat;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "regexplain")]
#[command(about = "Explain regular expressions and flag risky constructs", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Explain a pattern, optionally running it against sample text
    Explain {
        /// Pattern source, without surrounding slashes
        #[arg(allow_hyphen_values = true)]
        pattern: String,

        /// Flags drawn from "gimsuy"
        #[arg(short, long, default_value = "")]
        flags: String,

        /// Sample text to run the pattern against
        #[arg(short, long, conflicts_with = "sample_file")]
        sample: Option<String>,

        /// Read the sample text from a file
        #[arg(long = "sample-file")]
        sample_file: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value = "terminal")]
        format: OutputFormat,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Configuration file (defaults to the nearest .regexplain.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Skip risk detection
        #[arg(long = "no-risks")]
        no_risks: bool,

        /// Skip the false positive / negative estimate
        #[arg(long = "no-estimate")]
        no_estimate: bool,

        /// Disable colored output
        #[arg(long)]
        plain: bool,

        /// Increase verbosity level (can be repeated: -v, -vv, -vvv)
        #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
        verbosity: u8,
    },

    /// Initialize configuration file
    Init {
        /// Force overwrite existing config
        #[arg(long)]
        force: bool,
    },
}

impl Commands {
    pub fn verbosity(&self) -> u8 {
        match self {
            Commands::Explain { verbosity, .. } => *verbosity,
            Commands::Init { .. } => 0,
        }
    }
}
