//! Deal terms and stress scenario definitions for SRT analysis.
//!
//! Pure data holders plus configuration validation. The deal and its
//! scenarios are created once per run and never mutated.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::SrtError;
use crate::types::{Money, Rate};
use crate::SrtResult;

// ---------------------------------------------------------------------------
// Input types
// ---------------------------------------------------------------------------

/// Economic terms of the SRT trade.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DealParameters {
    /// First-loss tranche notional at inception.
    pub tranche_size: Money,
    /// Total structure notional at inception.
    pub notional_amount: Money,
    /// Annual coupon rate paid on outstanding tranche exposure (decimal).
    pub coupon_rate: Rate,
    /// Expected annual loss rate on remaining notional, unstressed (decimal).
    pub annual_loss_rate: Rate,
    /// Price paid upfront by the investor for the CLN.
    pub cln_price: Money,
    /// Annual amortisation rate once amortisation begins (decimal).
    pub amortisation_rate: Rate,
    /// Trade maturity in years.
    pub maturity: u32,
    /// Initial replenishment period in years (no amortisation).
    pub replenishment_period: u32,
    /// Periods per year (4 = quarterly).
    pub periods_per_year: u32,
    /// Annual risk-free rates, one per year. Held flat past the end.
    pub risk_free_rates: Vec<Rate>,
}

impl DealParameters {
    /// Total number of simulation periods.
    pub fn total_periods(&self) -> u32 {
        self.maturity * self.periods_per_year
    }

    /// Risk-free rate for a 1-indexed year; the last supplied rate is
    /// held flat if the horizon exceeds the list. Requires a validated
    /// deal (non-empty rate list).
    pub fn risk_free_rate_for_year(&self, year: u32) -> Rate {
        let idx = (year.saturating_sub(1) as usize).min(self.risk_free_rates.len().saturating_sub(1));
        self.risk_free_rates.get(idx).copied().unwrap_or(Decimal::ZERO)
    }
}

/// A single stress scenario: loss multiplier plus the contractual year at
/// which the deal is forced into sequential amortisation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StressScenario {
    /// Multiplier applied to the expected annual loss rate (positive).
    pub stress_multiplier: Decimal,
    /// Year at which sequential amortisation is triggered (1..=maturity).
    pub trigger_year: u32,
}

/// Input for a full stress analysis run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SrtStressInput {
    /// Deal economics.
    pub deal: DealParameters,
    /// Scenarios to run, in order.
    pub scenarios: Vec<StressScenario>,
}

/// Amortisation regime in force for a given period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AmortisationRegime {
    Replenishment,
    ProRata,
    Sequential,
}

impl fmt::Display for AmortisationRegime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AmortisationRegime::Replenishment => "Replenishment",
            AmortisationRegime::ProRata => "Pro-rata",
            AmortisationRegime::Sequential => "Sequential",
        };
        write!(f, "{}", label)
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Longest accepted trade maturity. Also keeps `total_periods()` far from
/// `u32` overflow.
pub const MAX_MATURITY_YEARS: u32 = 100;

/// Finest accepted period granularity (daily).
pub const MAX_PERIODS_PER_YEAR: u32 = 366;

/// Validate deal-level configuration.
pub fn validate_deal(deal: &DealParameters) -> SrtResult<()> {
    if deal.periods_per_year == 0 || deal.periods_per_year > MAX_PERIODS_PER_YEAR {
        return Err(SrtError::InvalidInput {
            field: "periods_per_year".into(),
            reason: format!(
                "Periods per year must be within [1, {}], got {}.",
                MAX_PERIODS_PER_YEAR, deal.periods_per_year
            ),
        });
    }
    if deal.maturity == 0 || deal.maturity > MAX_MATURITY_YEARS {
        return Err(SrtError::InvalidInput {
            field: "maturity".into(),
            reason: format!(
                "Maturity must be within [1, {}] years, got {}.",
                MAX_MATURITY_YEARS, deal.maturity
            ),
        });
    }
    if deal.replenishment_period >= deal.maturity {
        return Err(SrtError::InvalidInput {
            field: "replenishment_period".into(),
            reason: format!(
                "Replenishment period ({}) must be shorter than maturity ({}).",
                deal.replenishment_period, deal.maturity
            ),
        });
    }
    if deal.risk_free_rates.is_empty() {
        return Err(SrtError::InsufficientData(
            "At least one annual risk-free rate is required.".into(),
        ));
    }
    if deal.tranche_size <= Decimal::ZERO {
        return Err(SrtError::InvalidInput {
            field: "tranche_size".into(),
            reason: "Tranche size must be positive.".into(),
        });
    }
    if deal.notional_amount <= Decimal::ZERO {
        return Err(SrtError::InvalidInput {
            field: "notional_amount".into(),
            reason: "Notional amount must be positive.".into(),
        });
    }
    if deal.cln_price < Decimal::ZERO {
        return Err(SrtError::InvalidInput {
            field: "cln_price".into(),
            reason: "CLN price cannot be negative.".into(),
        });
    }
    if deal.annual_loss_rate < Decimal::ZERO {
        return Err(SrtError::InvalidInput {
            field: "annual_loss_rate".into(),
            reason: "Annual loss rate cannot be negative.".into(),
        });
    }
    if deal.amortisation_rate < Decimal::ZERO {
        return Err(SrtError::InvalidInput {
            field: "amortisation_rate".into(),
            reason: "Amortisation rate cannot be negative.".into(),
        });
    }
    Ok(())
}

/// Validate a single scenario against the deal it will run on.
pub fn validate_scenario(scenario: &StressScenario, deal: &DealParameters) -> SrtResult<()> {
    if scenario.stress_multiplier <= Decimal::ZERO {
        return Err(SrtError::InvalidInput {
            field: "stress_multiplier".into(),
            reason: format!(
                "Stress multiplier must be positive, got {}.",
                scenario.stress_multiplier
            ),
        });
    }
    if scenario.trigger_year < 1 || scenario.trigger_year > deal.maturity {
        return Err(SrtError::InvalidInput {
            field: "trigger_year".into(),
            reason: format!(
                "Trigger year {} must be within [1, {}].",
                scenario.trigger_year, deal.maturity
            ),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

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

    #[test]
    fn test_total_periods() {
        assert_eq!(sample_deal().total_periods(), 32);
    }

    #[test]
    fn test_risk_free_rate_held_flat_past_end() {
        let mut deal = sample_deal();
        deal.risk_free_rates = vec![dec!(0.01), dec!(0.02)];
        assert_eq!(deal.risk_free_rate_for_year(1), dec!(0.01));
        assert_eq!(deal.risk_free_rate_for_year(2), dec!(0.02));
        assert_eq!(deal.risk_free_rate_for_year(8), dec!(0.02));
    }

    #[test]
    fn test_valid_deal_accepted() {
        assert!(validate_deal(&sample_deal()).is_ok());
    }

    #[test]
    fn test_reject_zero_periods_per_year() {
        let mut deal = sample_deal();
        deal.periods_per_year = 0;
        assert!(validate_deal(&deal).is_err());
    }

    #[test]
    fn test_reject_zero_maturity() {
        let mut deal = sample_deal();
        deal.maturity = 0;
        assert!(validate_deal(&deal).is_err());
    }

    #[test]
    fn test_reject_replenishment_beyond_maturity() {
        let mut deal = sample_deal();
        deal.replenishment_period = 8;
        assert!(validate_deal(&deal).is_err());
    }

    #[test]
    fn test_reject_empty_risk_free_rates() {
        let mut deal = sample_deal();
        deal.risk_free_rates = vec![];
        assert!(validate_deal(&deal).is_err());
    }

    #[test]
    fn test_reject_maturity_beyond_bound() {
        let mut deal = sample_deal();
        deal.maturity = MAX_MATURITY_YEARS + 1;
        assert!(validate_deal(&deal).is_err());
    }

    #[test]
    fn test_reject_periods_per_year_beyond_bound() {
        let mut deal = sample_deal();
        deal.periods_per_year = MAX_PERIODS_PER_YEAR + 1;
        assert!(validate_deal(&deal).is_err());
    }

    #[test]
    fn test_reject_negative_tranche_size() {
        let mut deal = sample_deal();
        deal.tranche_size = dec!(-1);
        assert!(validate_deal(&deal).is_err());
    }

    #[test]
    fn test_reject_negative_notional_amount() {
        let mut deal = sample_deal();
        deal.notional_amount = dec!(-1);
        assert!(validate_deal(&deal).is_err());
    }

    #[test]
    fn test_reject_negative_cln_price() {
        let mut deal = sample_deal();
        deal.cln_price = dec!(-1);
        assert!(validate_deal(&deal).is_err());
    }

    #[test]
    fn test_reject_negative_annual_loss_rate() {
        let mut deal = sample_deal();
        deal.annual_loss_rate = dec!(-0.0001);
        assert!(validate_deal(&deal).is_err());
    }

    #[test]
    fn test_reject_negative_amortisation_rate() {
        let mut deal = sample_deal();
        deal.amortisation_rate = dec!(-0.01);
        assert!(validate_deal(&deal).is_err());
    }

    #[test]
    fn test_reject_non_positive_stress_multiplier() {
        let deal = sample_deal();
        let scenario = StressScenario {
            stress_multiplier: Decimal::ZERO,
            trigger_year: 4,
        };
        assert!(validate_scenario(&scenario, &deal).is_err());
    }

    #[test]
    fn test_reject_trigger_year_out_of_range() {
        let deal = sample_deal();
        for trigger_year in [0, 9] {
            let scenario = StressScenario {
                stress_multiplier: Decimal::ONE,
                trigger_year,
            };
            assert!(validate_scenario(&scenario, &deal).is_err());
        }
    }

    #[test]
    fn test_trigger_year_bounds_accepted() {
        let deal = sample_deal();
        for trigger_year in [1, 8] {
            let scenario = StressScenario {
                stress_multiplier: Decimal::ONE,
                trigger_year,
            };
            assert!(validate_scenario(&scenario, &deal).is_ok());
        }
    }

    #[test]
    fn test_regime_display_labels() {
        assert_eq!(AmortisationRegime::Replenishment.to_string(), "Replenishment");
        assert_eq!(AmortisationRegime::ProRata.to_string(), "Pro-rata");
        assert_eq!(AmortisationRegime::Sequential.to_string(), "Sequential");
    }

    #[test]
    fn test_serialization_roundtrip() {
        let input = SrtStressInput {
            deal: sample_deal(),
            scenarios: vec![StressScenario {
                stress_multiplier: dec!(1.5),
                trigger_year: 5,
            }],
        };
        let json = serde_json::to_string(&input).unwrap();
        let _: SrtStressInput = serde_json::from_str(&json).unwrap();
    }
}
