//! SRT first-loss tranche analytics.
//!
//! Period-by-period cash-flow simulation of a Synthetic Risk Transfer
//! first-loss tranche under credit-loss stress scenarios:
//! - Amortisation waterfall (replenishment -> pro-rata -> sequential)
//! - Forward compounding of received cash flows at the risk-free rate
//! - Multi-scenario stress orchestration and PnL time series
//!
//! All arithmetic uses `rust_decimal::Decimal`. No `f64`.

pub mod deal;
pub mod reinvestment;
pub mod runner;
pub mod stress;
pub mod waterfall;
