mod cli;

use std::process::ExitCode;

use clap::Parser;
use itertools::Itertools;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Format};
use lindenmayer::generator::{generate_with_level, state_to_string};
use lindenmayer::parser::parse_file;

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    init_logging();
    let cli = Cli::parse();

    let system = match parse_file(&cli.file) {
        Ok(system) => system,
        Err(errors) => {
            for error in errors {
                eprintln!("{}", error);
            }
            return ExitCode::FAILURE;
        }
    };

    if cli.symbols {
        println!("{}", system.drawable_symbols().iter().join(" "));
        return ExitCode::SUCCESS;
    }

    let level = cli.level.unwrap_or(system.level);
    let mut random = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    info!(file = %cli.file.display(), level, "deriving system");

    for _ in 0..cli.amount.unwrap_or(1) {
        let state = match generate_with_level(&system, level, cli.file.clone(), &mut random) {
            Ok(state) => state,
            Err(error) => {
                eprintln!("{}", error);
                return ExitCode::FAILURE;
            }
        };

        match cli.format {
            Format::Text => println!("{}", state_to_string(&state)),
            Format::Json => match serde_json::to_string(&state) {
                Ok(json) => println!("{}", json),
                Err(error) => {
                    eprintln!("{}", error);
                    return ExitCode::FAILURE;
                }
            },
        }
    }

    ExitCode::SUCCESS
}
