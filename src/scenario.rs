//! Deal evaluation and batch scenario runs
//!
//! [`evaluate`] is the single-deal entry point. [`ScenarioRunner`] resolves
//! production once, then evaluates many variants of the same deal in parallel.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::deal::DealInputs;
use crate::error::ValidationError;
use crate::metrics::{EvaluationSummary, MetricsEngine};
use crate::prices::{PriceDeck, PriceSource};
use crate::production::ProductionSeries;
use crate::projection::{CashFlowGenerator, Ledger};

/// Ledger and summary for one deal
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evaluation {
    pub ledger: Ledger,
    pub summary: EvaluationSummary,
}

/// Evaluate a deal against a production series.
///
/// Pure and deterministic: the same inputs always give the same ledger and
/// summary.
pub fn evaluate(deal: &DealInputs, production: &ProductionSeries) -> Evaluation {
    evaluate_with_prices(deal, production, &deal.config().prices)
}

/// Evaluate a deal against an external price source instead of its own deck
pub fn evaluate_with_prices(deal: &DealInputs, production: &ProductionSeries, prices: &dyn PriceSource) -> Evaluation {
    let ledger = CashFlowGenerator::with_prices(deal, prices).generate(production);
    let summary = MetricsEngine::new(deal.discount_rates()).summarize(&ledger, deal.total_nri());
    Evaluation { ledger, summary }
}

/// Evaluate a deal using its own production profiles
pub fn evaluate_deal(deal: &DealInputs) -> Evaluation {
    let production = ProductionSeries::from_deal(deal);
    evaluate(deal, &production)
}

/// Overrides applied to the base deal for one run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scenario {
    pub label: String,
    /// Flat gas price replacing every month of the deck
    pub gas_price: Option<f64>,
    /// Flat oil price replacing every month of the deck
    pub oil_price: Option<f64>,
    pub acquisition_cost: Option<f64>,
    pub undeveloped_delay_months: Option<u32>,
}

impl Scenario {
    pub fn new(label: impl Into<String>) -> Self {
        Self { label: label.into(), ..Self::default() }
    }

    pub fn with_gas_price(mut self, gas_price: f64) -> Self {
        self.gas_price = Some(gas_price);
        self
    }

    pub fn with_oil_price(mut self, oil_price: f64) -> Self {
        self.oil_price = Some(oil_price);
        self
    }

    pub fn with_acquisition_cost(mut self, cost: f64) -> Self {
        self.acquisition_cost = Some(cost);
        self
    }

    pub fn with_delay(mut self, months: u32) -> Self {
        self.undeveloped_delay_months = Some(months);
        self
    }

    /// One scenario per gas price, labelled by price
    pub fn gas_price_sweep(prices: &[f64]) -> Vec<Scenario> {
        prices
            .iter()
            .map(|&p| Scenario::new(format!("gas ${p:.2}")).with_gas_price(p))
            .collect()
    }

    /// Build the variant deal, revalidating it
    pub fn apply(&self, base: &DealInputs) -> Result<DealInputs, ValidationError> {
        let mut config = base.to_config();

        if self.gas_price.is_some() || self.oil_price.is_some() {
            let mut prices: PriceDeck = config.prices;
            if let Some(gas) = self.gas_price {
                prices = prices.with_gas_price(gas);
            }
            if let Some(oil) = self.oil_price {
                prices = prices.with_oil_price(oil);
            }
            config.prices = prices;
        }
        if let Some(cost) = self.acquisition_cost {
            config.acquisition.cost = cost;
        }
        if let Some(delay) = self.undeveloped_delay_months {
            // An explicit delay replaces a first-sales date
            config.timing.first_sales_date = None;
            config.timing.undeveloped_delay_months = delay;
        }

        DealInputs::new(config)
    }
}

/// Summary of one scenario run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioResult {
    pub label: String,
    pub summary: EvaluationSummary,
}

/// Pre-resolved scenario runner for batch evaluations
///
/// # Example
/// ```ignore
/// let runner = ScenarioRunner::new(deal);
/// let results = runner.run_scenarios(&Scenario::gas_price_sweep(&[2.5, 3.0, 3.68]))?;
/// ```
#[derive(Debug, Clone)]
pub struct ScenarioRunner {
    base_deal: DealInputs,
    production: ProductionSeries,
}

impl ScenarioRunner {
    /// Create runner, resolving the deal's production once
    pub fn new(base_deal: DealInputs) -> Self {
        let production = ProductionSeries::from_deal(&base_deal);
        Self { base_deal, production }
    }

    /// Create runner with an externally supplied production series
    pub fn with_production(base_deal: DealInputs, production: ProductionSeries) -> Self {
        Self { base_deal, production }
    }

    /// Evaluate the base deal
    pub fn run(&self) -> Evaluation {
        evaluate(&self.base_deal, &self.production)
    }

    /// Evaluate one variant
    pub fn run_variant(&self, scenario: &Scenario) -> Result<Evaluation, ValidationError> {
        let deal = scenario.apply(&self.base_deal)?;
        Ok(evaluate(&deal, &self.production))
    }

    /// Evaluate many variants in parallel, preserving input order
    pub fn run_scenarios(&self, scenarios: &[Scenario]) -> Result<Vec<ScenarioResult>, ValidationError> {
        log::info!(
            "Running {} scenario(s) for deal '{}'",
            scenarios.len(),
            self.base_deal.name()
        );

        scenarios
            .par_iter()
            .map(|scenario| {
                let evaluation = self.run_variant(scenario)?;
                Ok(ScenarioResult {
                    label: scenario.label.clone(),
                    summary: evaluation.summary,
                })
            })
            .collect()
    }

    pub fn deal(&self) -> &DealInputs {
        &self.base_deal
    }

    pub fn production(&self) -> &ProductionSeries {
        &self.production
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deal::{DealConfig, Tract};
    use crate::metrics::PVCalculator;
    use crate::prices::MonthlyPrices;
    use crate::production::{DeclineParams, ProductionProfile};
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use chrono::NaiveDate;

    /// Single-tract gas deal: 18 ac at 20% in a 234.2 ac unit, 12,060 MMcf EUR
    fn worked_deal() -> DealInputs {
        let mut config = DealConfig {
            name: "Worked example".to_string(),
            tracts: vec![Tract::new(18.0, 0.20, 234.2).unwrap()],
            gas: ProductionProfile::from_decline(DeclineParams::exponential(0.0, 0.35).with_eur(12_060_000.0)),
            prices: PriceDeck::flat(3.68, 61.0),
            ..DealConfig::default()
        };
        config.taxes.severance_gas = 0.007;
        config.taxes.ad_valorem = 0.01;
        config.acquisition.cost = 237_500.0;
        config.timing.base_date = NaiveDate::from_ymd_opt(2026, 2, 28).unwrap();
        config.timing.undeveloped_delay_months = 36;
        config.timing.ramp_months = 12;
        config.timing.horizon_years = 50;
        DealInputs::new(config).unwrap()
    }

    #[test]
    fn test_worked_deal() {
        let deal = worked_deal();
        assert_abs_diff_eq!(deal.total_nri(), 0.015371477, epsilon = 1e-9);

        let evaluation = evaluate_deal(&deal);
        let summary = &evaluation.summary;

        assert_eq!(evaluation.ledger.len(), 601);
        let irr = summary.irr.unwrap();
        assert!(irr > 0.12 && irr < 0.18, "irr {}", irr);
        assert!(summary.mom.unwrap() > 2.0);
        // Pays back only after delay and ramp
        assert!(summary.payback_month.unwrap() > 48);

        let npv_at_irr = PVCalculator::npv(&evaluation.ledger.net_cash_flows(), irr);
        assert!(npv_at_irr.abs() < 237.5, "npv at irr {}", npv_at_irr);
        assert!(summary.npv_at(0.10).unwrap() > 0.0);
        assert!(summary.npv_at(0.30).unwrap() < 0.0);
    }

    #[test]
    fn test_worked_deal_at_zero_gas() {
        let runner = ScenarioRunner::new(worked_deal());
        let evaluation = runner.run_variant(&Scenario::new("zero").with_gas_price(0.0)).unwrap();
        let summary = evaluation.summary;

        assert_eq!(summary.irr, None);
        assert_abs_diff_eq!(summary.mom.unwrap(), 0.0);
        assert_eq!(summary.payback_month, None);
        assert_abs_diff_eq!(summary.total_profit, -237_500.0, epsilon = 1e-6);
    }

    #[test]
    fn test_short_type_curve_held_flat() {
        let curve: Vec<f64> = (0..35).map(|k| 10_000.0 * 0.97f64.powi(k)).collect();
        let mut config = worked_deal().to_config();
        config.gas = ProductionProfile::from_type_curve(curve.clone());
        config.timing.undeveloped_delay_months = 0;
        config.timing.ramp_months = 0;
        let deal = DealInputs::new(config).unwrap();

        let ledger = evaluate_deal(&deal).ledger;
        for m in 36..=600 {
            assert_eq!(ledger.get(m).unwrap().gross_gas, curve[34]);
        }
        assert_eq!(ledger.get(35).unwrap().gross_gas, curve[34]);
        assert_eq!(ledger.get(1).unwrap().gross_gas, curve[0]);
    }

    #[test]
    fn test_sweep_runs_in_order() {
        let runner = ScenarioRunner::new(worked_deal());
        let results = runner
            .run_scenarios(&Scenario::gas_price_sweep(&[2.0, 3.68, 5.0]))
            .unwrap();

        assert_eq!(results.len(), 3);
        assert_eq!(results[1].label, "gas $3.68");
        let irrs: Vec<f64> = results.iter().map(|r| r.summary.irr.unwrap()).collect();
        assert!(irrs[0] < irrs[1] && irrs[1] < irrs[2]);
        assert_eq!(results[1].summary, runner.run().summary);
    }

    #[test]
    fn test_variant_overrides() {
        let runner = ScenarioRunner::new(worked_deal());
        let cheaper = runner.run_variant(&Scenario::new("cheap").with_acquisition_cost(150_000.0)).unwrap();
        let later = runner.run_variant(&Scenario::new("late").with_delay(60)).unwrap();
        let base = runner.run();

        assert!(cheaper.summary.irr > base.summary.irr);
        assert!(later.summary.irr < base.summary.irr);
        assert_eq!(later.ledger.get(60).unwrap().gross_gas, 0.0);
        assert!(later.ledger.get(61).unwrap().gross_gas > 0.0);
    }

    #[test]
    fn test_invalid_variant_surfaces_error() {
        let runner = ScenarioRunner::new(worked_deal());
        let scenarios = vec![Scenario::new("ok"), Scenario::new("bad").with_acquisition_cost(-1.0)];
        assert!(matches!(
            runner.run_scenarios(&scenarios),
            Err(ValidationError::Negative { .. })
        ));
    }

    /// Flat deck that steps up once first sales begin
    struct StepDeck {
        step_month: u32,
        before: f64,
        after: f64,
    }

    impl PriceSource for StepDeck {
        fn prices_for_month(&self, month: u32) -> MonthlyPrices {
            let gas = if month < self.step_month { self.before } else { self.after };
            MonthlyPrices::new(gas, 61.0)
        }
    }

    #[test]
    fn test_external_price_source() {
        let deal = worked_deal();
        let production = ProductionSeries::from_deal(&deal);

        // Same as the deal's own deck
        let flat = StepDeck { step_month: 0, before: 3.68, after: 3.68 };
        assert_eq!(evaluate_with_prices(&deal, &production, &flat), evaluate(&deal, &production));

        let richer = StepDeck { step_month: 37, before: 3.68, after: 5.0 };
        let stepped = evaluate_with_prices(&deal, &production, &richer);
        assert!(stepped.summary.irr > evaluate(&deal, &production).summary.irr);
        let row = stepped.ledger.get(37).unwrap();
        assert_relative_eq!(row.gas_revenue, row.net_gas * 5.0, epsilon = 1e-9);
    }

    #[test]
    fn test_evaluation_is_deterministic() {
        let deal = worked_deal();
        assert_eq!(evaluate_deal(&deal), evaluate_deal(&deal));
    }
}
