//! Single-scenario driver.
//!
//! Owns one `SimulationState` and one `ReinvestmentAccumulator`, drives the
//! waterfall engine for `maturity * periods_per_year` consecutive quarters
//! in strict chronological order, and yields one `PeriodRecord` per quarter.
//!
//! The runner is a lazy, finite iterator and is not restartable: state is
//! consumed in place, so re-running a scenario requires a fresh runner.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::Money;
use crate::SrtResult;

use super::deal::{
    validate_deal, validate_scenario, AmortisationRegime, DealParameters, StressScenario,
};
use super::reinvestment::ReinvestmentAccumulator;
use super::waterfall::{step_period, SimulationState};

// ---------------------------------------------------------------------------
// Output record
// ---------------------------------------------------------------------------

/// One row of the cash-flow ledger: the full outcome of one simulated
/// quarter. Write-once, appended to the result table in emission order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodRecord {
    /// Scenario identifier (e.g. "Stress 1").
    pub scenario: String,
    /// 1-indexed year.
    pub year: u32,
    /// 1-indexed quarter within the year.
    pub quarter: u32,
    /// Trigger year of the scenario this row belongs to.
    pub trigger_year: u32,
    /// Stress multiplier of the scenario this row belongs to.
    pub stress_multiplier: Decimal,
    /// Credit losses accrued this period.
    pub period_losses: Money,
    /// Remaining structure notional after this period's update.
    pub remaining_notional: Money,
    /// Tranche exposure after this period's update.
    pub tranche_exposure: Money,
    /// Scheduled principal received by the tranche this period.
    pub principal_payment: Money,
    /// Coupon plus principal received this period.
    pub quarterly_cashflow: Money,
    /// Amortisation regime in force this period.
    pub amortisation_regime: AmortisationRegime,
    /// Raw cumulative PnL including the upfront CLN cost.
    pub cumulative_pnl: Money,
    /// Reinvested cash flows net of the upfront CLN price.
    pub risk_adjusted_pnl: Money,
}

// ---------------------------------------------------------------------------
// Runner
// ---------------------------------------------------------------------------

/// Drives one scenario across all periods, yielding `PeriodRecord`s.
pub struct ScenarioRunner<'a> {
    deal: &'a DealParameters,
    scenario: &'a StressScenario,
    label: String,
    state: SimulationState,
    accumulator: ReinvestmentAccumulator,
    period_index: u32,
}

impl<'a> ScenarioRunner<'a> {
    /// Validate the deal and scenario, then construct a fresh runner.
    pub fn new(
        deal: &'a DealParameters,
        scenario: &'a StressScenario,
        label: impl Into<String>,
    ) -> SrtResult<Self> {
        validate_deal(deal)?;
        validate_scenario(scenario, deal)?;
        Ok(ScenarioRunner {
            deal,
            scenario,
            label: label.into(),
            state: SimulationState::new(deal),
            accumulator: ReinvestmentAccumulator::new(),
            period_index: 0,
        })
    }
}

impl Iterator for ScenarioRunner<'_> {
    type Item = PeriodRecord;

    fn next(&mut self) -> Option<PeriodRecord> {
        if self.period_index >= self.deal.total_periods() {
            return None;
        }

        let year = self.period_index / self.deal.periods_per_year + 1;
        let quarter = self.period_index % self.deal.periods_per_year + 1;
        self.period_index += 1;

        let outcome = step_period(self.deal, self.scenario, &mut self.state, year);

        let annual_rate = self.deal.risk_free_rate_for_year(year);
        self.accumulator.credit(
            outcome.quarterly_cashflow,
            annual_rate,
            self.deal.periods_per_year,
        );

        Some(PeriodRecord {
            scenario: self.label.clone(),
            year,
            quarter,
            trigger_year: self.scenario.trigger_year,
            stress_multiplier: self.scenario.stress_multiplier,
            period_losses: outcome.period_losses,
            remaining_notional: self.state.remaining_notional,
            tranche_exposure: self.state.tranche_exposure,
            principal_payment: outcome.principal_payment,
            quarterly_cashflow: outcome.quarterly_cashflow,
            amortisation_regime: outcome.regime,
            cumulative_pnl: self.state.cumulative_pnl,
            risk_adjusted_pnl: self.accumulator.risk_adjusted_pnl(self.deal.cln_price),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.deal.total_periods().saturating_sub(self.period_index) as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for ScenarioRunner<'_> {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
