use std::path::PathBuf;

use clap::{Parser, ValueEnum};

#[derive(Clone, Copy, Debug, PartialEq, ValueEnum)]
pub enum Format {
    /// Symbols with their values, e.g. `F(s: 2)+F(s: 3)`
    Text,
    /// A JSON array of `{ "symbol", "values" }` objects
    Json,
}

#[derive(Parser)]
#[command(version, about)]
pub struct Cli {
    /// JSON file containing the system
    pub file: PathBuf,

    /// Number of generations (default: the system's level)
    #[arg(short, long, value_name = "LEVEL")]
    pub level: Option<u32>,

    /// Seed for stochastic productions (default: random)
    #[arg(short, long, value_name = "SEED")]
    pub seed: Option<u64>,

    /// Amount to generate (default: 1)
    #[arg(short = 'n', long, value_name = "AMOUNT")]
    pub amount: Option<u32>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Text)]
    pub format: Format,

    /// List the drawable symbols instead of deriving the system
    #[arg(long)]
    pub symbols: bool,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn cli_parses_options() {
        let cli = Cli::parse_from(["lindenmayer", "plant.json", "-l", "3", "--seed", "7", "-n", "2", "-f", "json"]);
        assert_eq!(cli.file, PathBuf::from("plant.json"));
        assert_eq!(cli.level, Some(3));
        assert_eq!(cli.seed, Some(7));
        assert_eq!(cli.amount, Some(2));
        assert_eq!(cli.format, Format::Json);
        assert!(!cli.symbols);
    }
}
