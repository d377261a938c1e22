//! SRT amortisation waterfall engine.
//!
//! Advances one scenario's simulation state by exactly one quarter:
//! loss accrual, regime selection (replenishment -> pro-rata -> sequential),
//! principal and coupon computation, exposure/notional update.
//!
//! The sequential regime is a one-way latch: once entered it is never left,
//! regardless of subsequent year values. It is held as a sticky flag on the
//! state, never re-derived from `year == trigger_year` each period.
//!
//! All arithmetic uses `rust_decimal::Decimal`. No `f64`.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::Money;

use super::deal::{AmortisationRegime, DealParameters, StressScenario};

// ---------------------------------------------------------------------------
// State / outcome types
// ---------------------------------------------------------------------------

/// Mutable per-scenario simulation state. Owned by one scenario run,
/// constructed fresh for every run and discarded after the last period.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationState {
    /// Remaining structure notional.
    pub remaining_notional: Money,
    /// First-loss tranche at-risk notional.
    pub tranche_exposure: Money,
    /// Raw cumulative PnL, starting at the upfront CLN cost (negative).
    pub cumulative_pnl: Money,
    /// Sticky sequential-amortisation latch.
    pub sequential_mode: bool,
}

impl SimulationState {
    /// Fresh state at inception of a scenario run.
    pub fn new(deal: &DealParameters) -> Self {
        SimulationState {
            remaining_notional: deal.notional_amount,
            tranche_exposure: deal.tranche_size,
            cumulative_pnl: -deal.cln_price,
            sequential_mode: false,
        }
    }
}

/// Cash-flow and regime outcome of one simulated quarter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeriodOutcome {
    /// Regime in force this period.
    pub regime: AmortisationRegime,
    /// Credit losses accrued this period.
    pub period_losses: Money,
    /// Scheduled principal received by the tranche this period.
    pub principal_payment: Money,
    /// Coupon on post-loss, post-amortisation exposure.
    pub quarterly_coupon: Money,
    /// Coupon plus principal.
    pub quarterly_cashflow: Money,
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Advance the state by one quarter of the given 1-indexed year.
///
/// Negative exposure or notional (an over-stressed, wiped-out tranche) is
/// defined behavior: the arithmetic continues unclamped so downstream
/// analysis can detect it.
pub fn step_period(
    deal: &DealParameters,
    scenario: &StressScenario,
    state: &mut SimulationState,
    year: u32,
) -> PeriodOutcome {
    let q = Decimal::from(deal.periods_per_year);

    let period_losses =
        state.remaining_notional * deal.annual_loss_rate * scenario.stress_multiplier / q;

    let mut principal_payment = Decimal::ZERO;
    let regime = if year <= deal.replenishment_period {
        // Portfolio is replenished: no amortisation, no principal.
        AmortisationRegime::Replenishment
    } else {
        if year == scenario.trigger_year {
            state.sequential_mode = true;
        }
        let amortisation_factor = Decimal::ONE - deal.amortisation_rate / q;
        if state.sequential_mode {
            // First loss takes the full impact and no scheduled principal.
            state.tranche_exposure -= period_losses;
            state.remaining_notional *= amortisation_factor;
            AmortisationRegime::Sequential
        } else {
            let period_amortisation = state.remaining_notional * deal.amortisation_rate / q;
            // Pro-rata share of the period's structural amortisation. A zero
            // or negative remaining notional yields zero principal instead of
            // a degenerate division.
            if state.remaining_notional > Decimal::ZERO {
                principal_payment =
                    (state.tranche_exposure / state.remaining_notional) * period_amortisation;
            }
            state.tranche_exposure -= principal_payment;
            state.remaining_notional *= amortisation_factor;
            AmortisationRegime::ProRata
        }
    };

    // Losses reduce the first-loss tranche directly, every period.
    state.tranche_exposure -= period_losses;

    let quarterly_coupon = state.tranche_exposure * deal.coupon_rate / q;
    let quarterly_cashflow = quarterly_coupon + principal_payment;
    state.cumulative_pnl += quarterly_cashflow;

    PeriodOutcome {
        regime,
        period_losses,
        principal_payment,
        quarterly_coupon,
        quarterly_cashflow,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
