//! Multi-scenario stress orchestration.
//!
//! Runs the scenario runner over every configured stress scenario and
//! concatenates all period records, in scenario order then chronological
//! order, into one result table. Scenario failures are isolated: a bad
//! scenario is reported with its identifier while independent scenarios
//! still complete.
//!
//! Also exposes the cross-stress cumulative PnL time series for a fixed
//! trigger year, and the filtered quarter/regime/PnL view for a single
//! scenario. Rendering (tables, charts) is left to the presentation layer.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::Money;
use crate::SrtResult;

use super::deal::{validate_deal, AmortisationRegime, SrtStressInput};
use super::runner::{PeriodRecord, ScenarioRunner};

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// A scenario that failed validation, reported alongside completed results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioFailure {
    /// Scenario identifier (e.g. "Stress 2").
    pub scenario: String,
    /// Violated constraint and offending value.
    pub error: String,
}

/// Full stress analysis result table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StressAnalysisOutput {
    /// All period records, in scenario order then chronological order.
    pub records: Vec<PeriodRecord>,
    /// Scenarios that failed validation.
    pub failures: Vec<ScenarioFailure>,
}

/// Cumulative PnL trajectory of one stress level, aligned on the global
/// period axis `1..=maturity * periods_per_year`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PnlSeries {
    /// Stress multiplier of the scenario.
    pub stress_multiplier: Decimal,
    /// Trigger year held constant across the comparison.
    pub trigger_year: u32,
    /// Cumulative PnL per global period.
    pub cumulative_pnl: Vec<Money>,
}

/// One row of the filtered quarter/regime/PnL view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilteredPnlRow {
    pub year: u32,
    pub quarter: u32,
    pub amortisation_regime: AmortisationRegime,
    pub cumulative_pnl: Money,
}

// ---------------------------------------------------------------------------
// Orchestrator
// ---------------------------------------------------------------------------

/// Run every configured scenario and concatenate the emitted records.
///
/// Deal-level configuration errors are fatal. Per-scenario errors are
/// collected into `failures` without aborting the remaining scenarios.
pub fn run_stress_analysis(input: &SrtStressInput) -> SrtResult<StressAnalysisOutput> {
    validate_deal(&input.deal)?;
    if input.scenarios.is_empty() {
        return Err(crate::SrtError::InsufficientData(
            "At least one stress scenario is required.".into(),
        ));
    }

    let total_periods = input.deal.total_periods() as usize;
    let mut records: Vec<PeriodRecord> =
        Vec::with_capacity(total_periods * input.scenarios.len());
    let mut failures: Vec<ScenarioFailure> = Vec::new();

    for (i, scenario) in input.scenarios.iter().enumerate() {
        let label = format!("Stress {}", i + 1);
        match ScenarioRunner::new(&input.deal, scenario, label.clone()) {
            Ok(runner) => records.extend(runner),
            Err(e) => failures.push(ScenarioFailure {
                scenario: label,
                error: e.to_string(),
            }),
        }
    }

    Ok(StressAnalysisOutput { records, failures })
}

/// Cumulative PnL time series for every scenario with the given trigger
/// year, one series per stress level, in scenario order.
pub fn pnl_time_series(output: &StressAnalysisOutput, trigger_year: u32) -> Vec<PnlSeries> {
    let mut series: Vec<PnlSeries> = Vec::new();
    let mut current_scenario: Option<&str> = None;

    for record in &output.records {
        if record.trigger_year != trigger_year {
            continue;
        }
        // Records of one scenario are contiguous; a label change starts a
        // new series.
        if current_scenario != Some(record.scenario.as_str()) {
            current_scenario = Some(record.scenario.as_str());
            series.push(PnlSeries {
                stress_multiplier: record.stress_multiplier,
                trigger_year,
                cumulative_pnl: Vec::new(),
            });
        }
        if let Some(last) = series.last_mut() {
            last.cumulative_pnl.push(record.cumulative_pnl);
        }
    }

    series
}

/// Quarter/regime/PnL view for the scenario matching the given trigger
/// year and stress multiplier.
pub fn filter_records(
    output: &StressAnalysisOutput,
    trigger_year: u32,
    stress_multiplier: Decimal,
) -> Vec<FilteredPnlRow> {
    output
        .records
        .iter()
        .filter(|r| r.trigger_year == trigger_year && r.stress_multiplier == stress_multiplier)
        .map(|r| FilteredPnlRow {
            year: r.year,
            quarter: r.quarter,
            amortisation_regime: r.amortisation_regime,
            cumulative_pnl: r.cumulative_pnl,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    use crate::srt::deal::{DealParameters, StressScenario};

    fn sample_deal() -> DealParameters {
        DealParameters {
            tranche_size: dec!(50_000_000),
            notional_amount: dec!(500_000_000),
            coupon_rate: dec!(0.11),
            annual_loss_rate: dec!(0.0006),
            cln_price: dec!(45_000_000),
            amortisation_rate: dec!(0.33),
            maturity: 8,
            replenishment_period: 3,
            periods_per_year: 4,
            risk_free_rates: vec![dec!(0.01); 8],
        }
    }

    fn sample_input() -> SrtStressInput {
        SrtStressInput {
            deal: sample_deal(),
            scenarios: vec![
                StressScenario {
                    stress_multiplier: dec!(1),
                    trigger_year: 4,
                },
                StressScenario {
                    stress_multiplier: dec!(1.5),
                    trigger_year: 5,
                },
                StressScenario {
                    stress_multiplier: dec!(2),
                    trigger_year: 6,
                },
                StressScenario {
                    stress_multiplier: dec!(2.5),
                    trigger_year: 7,
                },
            ],
        }
    }

    #[test]
    fn test_total_record_count() {
        let out = run_stress_analysis(&sample_input()).unwrap();
        assert_eq!(out.records.len(), 32 * 4);
        assert!(out.failures.is_empty());
    }

    #[test]
    fn test_scenario_labels_in_input_order() {
        let out = run_stress_analysis(&sample_input()).unwrap();
        assert_eq!(out.records[0].scenario, "Stress 1");
        assert_eq!(out.records[32].scenario, "Stress 2");
        assert_eq!(out.records[64].scenario, "Stress 3");
        assert_eq!(out.records[96].scenario, "Stress 4");
    }

    #[test]
    fn test_records_chronological_within_scenario() {
        let out = run_stress_analysis(&sample_input()).unwrap();
        for chunk in out.records.chunks(32) {
            for (i, r) in chunk.iter().enumerate() {
                let i = i as u32;
                assert_eq!(r.year, i / 4 + 1);
                assert_eq!(r.quarter, i % 4 + 1);
            }
        }
    }

    #[test]
    fn test_bad_scenario_is_isolated() {
        let mut input = sample_input();
        input.scenarios[1].stress_multiplier = dec!(-1);
        let out = run_stress_analysis(&input).unwrap();
        assert_eq!(out.failures.len(), 1);
        assert_eq!(out.failures[0].scenario, "Stress 2");
        // The three valid scenarios still complete in full.
        assert_eq!(out.records.len(), 32 * 3);
    }

    #[test]
    fn test_bad_deal_is_fatal() {
        let mut input = sample_input();
        input.deal.maturity = 0;
        assert!(run_stress_analysis(&input).is_err());
    }

    #[test]
    fn test_reject_empty_scenarios() {
        let mut input = sample_input();
        input.scenarios = vec![];
        assert!(run_stress_analysis(&input).is_err());
    }

    #[test]
    fn test_pnl_time_series_for_fixed_trigger() {
        let input = sample_input();
        let out = run_stress_analysis(&input).unwrap();
        let series = pnl_time_series(&out, 4);
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].stress_multiplier, dec!(1));
        assert_eq!(series[0].cumulative_pnl.len(), 32);
    }

    #[test]
    fn test_pnl_time_series_multiple_matches() {
        let mut input = sample_input();
        for s in &mut input.scenarios {
            s.trigger_year = 4;
        }
        let out = run_stress_analysis(&input).unwrap();
        let series = pnl_time_series(&out, 4);
        assert_eq!(series.len(), 4);
        for s in &series {
            assert_eq!(s.cumulative_pnl.len(), 32);
        }
        // Series follow scenario order, so stress levels ascend as input.
        assert_eq!(series[0].stress_multiplier, dec!(1));
        assert_eq!(series[3].stress_multiplier, dec!(2.5));
    }

    #[test]
    fn test_pnl_time_series_values_match_records() {
        let input = sample_input();
        let out = run_stress_analysis(&input).unwrap();
        let series = pnl_time_series(&out, 4);
        let expected: Vec<_> = out
            .records
            .iter()
            .filter(|r| r.trigger_year == 4)
            .map(|r| r.cumulative_pnl)
            .collect();
        assert_eq!(series[0].cumulative_pnl, expected);
    }

    #[test]
    fn test_pnl_time_series_no_match_is_empty() {
        let out = run_stress_analysis(&sample_input()).unwrap();
        assert!(pnl_time_series(&out, 8).is_empty());
    }

    #[test]
    fn test_higher_stress_never_improves_pnl() {
        let mut input = sample_input();
        for s in &mut input.scenarios {
            s.trigger_year = 4;
        }
        let out = run_stress_analysis(&input).unwrap();
        let series = pnl_time_series(&out, 4);
        let base_final = *series[0].cumulative_pnl.last().unwrap();
        let severe_final = *series[3].cumulative_pnl.last().unwrap();
        assert!(severe_final <= base_final);
    }

    #[test]
    fn test_filter_records_view() {
        let out = run_stress_analysis(&sample_input()).unwrap();
        let rows = filter_records(&out, 5, dec!(1.5));
        assert_eq!(rows.len(), 32);
        assert_eq!(rows[0].year, 1);
        assert_eq!(rows[0].quarter, 1);
        assert_eq!(rows[0].amortisation_regime, AmortisationRegime::Replenishment);
    }

    #[test]
    fn test_filter_records_no_match() {
        let out = run_stress_analysis(&sample_input()).unwrap();
        assert!(filter_records(&out, 5, dec!(99)).is_empty());
    }

    #[test]
    fn test_serialization_roundtrip() {
        let out = run_stress_analysis(&sample_input()).unwrap();
        let json = serde_json::to_string(&out).unwrap();
        let _: StressAnalysisOutput = serde_json::from_str(&json).unwrap();
    }
}
