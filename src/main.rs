use anyhow::Result;
use clap::Parser;
use regexplain::cli::{Cli, Commands};
use regexplain::commands::{self, ExplainConfig};
use regexplain::parser::PatternError;

/// Exit status for a pattern that failed to parse.
const EXIT_INVALID_PATTERN: i32 = 2;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.command.verbosity());

    let result = match cli.command {
        Commands::Explain {
            pattern,
            flags,
            sample,
            sample_file,
            format,
            output,
            config,
            no_risks,
            no_estimate,
            plain,
            verbosity: _,
        } => commands::handle_explain(ExplainConfig {
            pattern,
            flags,
            sample,
            sample_file,
            format,
            output,
            config,
            no_risks,
            no_estimate,
            plain,
        }),
        Commands::Init { force } => commands::init_config(force),
    };

    match result {
        // Already rendered on stderr by the explain command
        Err(e) if e.downcast_ref::<PatternError>().is_some() => {
            std::process::exit(EXIT_INVALID_PATTERN)
        }
        other => other,
    }
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}
