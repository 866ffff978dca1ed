//! Mineral Eval - cash-flow and return engine for mineral and royalty interest acquisitions
//!
//! This library provides:
//! - Tract ownership records and net revenue interest (NRI) aggregation
//! - Production forecasts from decline curves or external type curves
//! - A monthly investor ledger with ramp, taxes, deductions, and purchase costs
//! - IRR, NPV, multiple-on-money, and payback metrics
//! - Parallel scenario runs over price, cost, and timing variants

pub mod error;
pub mod deal;
pub mod prices;
pub mod production;
pub mod projection;
pub mod metrics;
pub mod scenario;

// Re-export commonly used types
pub use error::{LoadError, ValidationError};
pub use deal::{DealConfig, DealInputs, Tract};
pub use prices::{MonthlyPrices, PriceDeck, PriceSource};
pub use production::{DeclineParams, ProductionProfile, ProductionSeries, TypeCurve, TypeCurveLibrary};
pub use projection::{CashFlowGenerator, Ledger, LedgerRow};
pub use metrics::{EvaluationSummary, MetricsEngine};
pub use scenario::{evaluate, evaluate_deal, evaluate_with_prices, Evaluation, Scenario, ScenarioRunner};
