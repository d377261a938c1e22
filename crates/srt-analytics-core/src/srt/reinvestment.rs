//! Forward compounding of received cash flows.
//!
//! Every received cash flow is reinvested at the prevailing risk-free rate
//! from the moment of receipt through the end of the simulated horizon.
//! This is carry-forward compounding, not a present-value discount: the
//! recurrence `balance = (balance + cashflow) * (1 + rate/q)` is what the
//! reporting layer expects and must be preserved exactly.
//!
//! All arithmetic uses `rust_decimal::Decimal`. No `f64`.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{Money, Rate};

/// Running reinvested balance for one scenario, reset at scenario start.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReinvestmentAccumulator {
    /// Compounded balance of all cash flows received so far.
    pub compounded_balance: Money,
}

impl ReinvestmentAccumulator {
    pub fn new() -> Self {
        ReinvestmentAccumulator {
            compounded_balance: Decimal::ZERO,
        }
    }

    /// Credit a period's cash flow and roll the balance forward one period
    /// at the given annual risk-free rate. Returns the new balance.
    pub fn credit(
        &mut self,
        quarterly_cashflow: Money,
        annual_rate: Rate,
        periods_per_year: u32,
    ) -> Money {
        let period_rate = annual_rate / Decimal::from(periods_per_year);
        self.compounded_balance =
            (self.compounded_balance + quarterly_cashflow) * (Decimal::ONE + period_rate);
        self.compounded_balance
    }

    /// Risk-adjusted PnL: compounded balance net of the upfront CLN price.
    pub fn risk_adjusted_pnl(&self, cln_price: Money) -> Money {
        self.compounded_balance - cln_price
    }
}
