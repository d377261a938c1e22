mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::stress::{FilterArgs, PnlSeriesArgs, StressArgs};

/// SRT first-loss tranche PnL stress analysis
#[derive(Parser)]
#[command(
    name = "srt",
    version,
    about = "SRT first-loss tranche PnL stress analysis",
    long_about = "Simulates the quarter-by-quarter cash flows of a Synthetic Risk Transfer \
                  first-loss tranche under credit-loss stress scenarios, with decimal \
                  precision. Produces the full cash-flow ledger, cross-stress PnL time \
                  series, and filtered per-scenario PnL views."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full stress analysis and emit the cash-flow ledger
    Stress(StressArgs),
    /// Cross-stress cumulative PnL series for a fixed trigger year
    PnlSeries(PnlSeriesArgs),
    /// Quarter/regime/PnL view for one trigger year and stress multiplier
    Filter(FilterArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Stress(args) => commands::stress::run_stress(args),
        Commands::PnlSeries(args) => commands::stress::run_pnl_series(args),
        Commands::Filter(args) => commands::stress::run_filter(args),
        Commands::Version => {
            println!("srt {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
