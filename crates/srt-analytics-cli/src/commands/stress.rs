use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use srt_analytics_core::srt::deal::SrtStressInput;
use srt_analytics_core::srt::stress::{self, StressAnalysisOutput};

use crate::input;

#[derive(Args)]
pub struct StressArgs {
    /// Path to JSON file with deal parameters and scenarios
    #[arg(long)]
    pub input: Option<String>,
}

#[derive(Args)]
pub struct PnlSeriesArgs {
    /// Path to JSON file with deal parameters and scenarios
    #[arg(long)]
    pub input: Option<String>,

    /// Trigger year held constant across the comparison
    #[arg(long)]
    pub trigger_year: u32,
}

#[derive(Args)]
pub struct FilterArgs {
    /// Path to JSON file with deal parameters and scenarios
    #[arg(long)]
    pub input: Option<String>,

    /// Trigger year of the scenario to select
    #[arg(long)]
    pub trigger_year: u32,

    /// Stress multiplier of the scenario to select (e.g. 1.5)
    #[arg(long)]
    pub stress: Decimal,
}

fn read_input(path: &Option<String>) -> Result<SrtStressInput, Box<dyn std::error::Error>> {
    if let Some(path) = path {
        input::read_json(path)
    } else if let Some(data) = input::read_stdin()? {
        Ok(serde_json::from_value(data)?)
    } else {
        Err("--input <file.json> or stdin required".into())
    }
}

fn run_analysis(
    path: &Option<String>,
) -> Result<StressAnalysisOutput, Box<dyn std::error::Error>> {
    let input_data = read_input(path)?;
    Ok(stress::run_stress_analysis(&input_data)?)
}

pub fn run_stress(args: StressArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let result = run_analysis(&args.input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_pnl_series(args: PnlSeriesArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let result = run_analysis(&args.input)?;
    let series = stress::pnl_time_series(&result, args.trigger_year);
    Ok(serde_json::to_value(series)?)
}

pub fn run_filter(args: FilterArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let result = run_analysis(&args.input)?;
    let rows = stress::filter_records(&result, args.trigger_year, args.stress);
    Ok(serde_json::to_value(rows)?)
}
