//! Investment metrics over a finished ledger: IRR, NPV, MoM, and payback

mod discount;
mod irr;

pub use discount::{NpvPoint, PVCalculator};
pub use irr::{
    calculate_irr, effective_annual_rate, IRR_BRACKET_EXPANSION, IRR_LOWER_BOUND, IRR_TOLERANCE,
    IRR_UPPER_BOUND, MAX_BISECTION_ITERATIONS,
};

use serde::{Deserialize, Serialize};

use crate::projection::Ledger;

/// Headline results for one evaluated deal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationSummary {
    /// Annual nominal IRR, compounded monthly
    pub irr: Option<f64>,
    /// Annual effective IRR
    pub irr_effective: Option<f64>,
    /// Multiple on money: total inflow over total outflow
    pub mom: Option<f64>,
    pub npv: Vec<NpvPoint>,
    /// First ledger month with non-negative cumulative cash flow
    pub payback_month: Option<u32>,
    pub total_gross_revenue: f64,
    /// Revenue after taxes, GP&T, and opex
    pub total_net_revenue: f64,
    pub total_taxes: f64,
    pub total_gpt: f64,
    pub total_opex: f64,
    pub total_capex: f64,
    pub total_ga: f64,
    /// Acquisition cost, upfront G&A, and capex
    pub total_investment: f64,
    /// Undiscounted sum of net cash flow
    pub total_profit: f64,
    pub nri: f64,
    /// Production months in the ledger (closing month excluded)
    pub months: u32,
}

impl EvaluationSummary {
    /// NPV at `rate`, if it was requested
    pub fn npv_at(&self, rate: f64) -> Option<f64> {
        self.npv
            .iter()
            .find(|p| (p.rate - rate).abs() < 1e-12)
            .map(|p| p.npv)
    }
}

/// Derives [`EvaluationSummary`] values from ledgers
#[derive(Debug, Clone)]
pub struct MetricsEngine {
    discount_rates: Vec<f64>,
}

impl MetricsEngine {
    pub fn new(discount_rates: &[f64]) -> Self {
        Self { discount_rates: discount_rates.to_vec() }
    }

    pub fn discount_rates(&self) -> &[f64] {
        &self.discount_rates
    }

    /// Summarize a ledger for a deal with total NRI `nri`
    pub fn summarize(&self, ledger: &Ledger, nri: f64) -> EvaluationSummary {
        let cashflows = ledger.net_cash_flows();

        let irr = calculate_irr(&cashflows);
        let closing_outlay = ledger
            .get(0)
            .map(|row| row.acquisition_cost + row.ga_fees)
            .unwrap_or(0.0);

        let mut total_gross_revenue = 0.0;
        let mut total_net_revenue = 0.0;
        let mut total_taxes = 0.0;
        let mut total_gpt = 0.0;
        let mut total_opex = 0.0;
        let mut total_capex = 0.0;
        let mut total_ga = 0.0;
        for row in ledger {
            total_gross_revenue += row.gross_revenue;
            total_net_revenue += row.net_revenue();
            total_taxes += row.total_taxes();
            total_gpt += row.gpt_deduction;
            total_opex += row.opex;
            total_capex += row.capex;
            total_ga += row.ga_fees;
        }

        EvaluationSummary {
            irr,
            irr_effective: irr.map(effective_annual_rate),
            mom: multiple_on_money(&cashflows),
            npv: PVCalculator::npv_table(&cashflows, &self.discount_rates),
            payback_month: payback_month(ledger),
            total_gross_revenue,
            total_net_revenue,
            total_taxes,
            total_gpt,
            total_opex,
            total_capex,
            total_ga,
            total_investment: closing_outlay + total_capex,
            total_profit: cashflows.iter().sum(),
            nri,
            months: ledger.len().saturating_sub(1) as u32,
        }
    }
}

/// Undiscounted inflows over outflows; None when nothing flows out
pub fn multiple_on_money(cashflows: &[f64]) -> Option<f64> {
    let inflow: f64 = cashflows.iter().filter(|&&cf| cf > 0.0).sum();
    let outflow: f64 = cashflows.iter().filter(|&&cf| cf < 0.0).map(|cf| -cf).sum();
    if outflow > 0.0 {
        Some(inflow / outflow)
    } else {
        None
    }
}

/// First month whose cumulative net cash flow is non-negative
pub fn payback_month(ledger: &Ledger) -> Option<u32> {
    ledger
        .iter()
        .find(|row| row.cumulative_net_cash_flow >= 0.0)
        .map(|row| row.month)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::LedgerRow;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    /// Closing outlay followed by level monthly net cash flow
    fn level_ledger(outlay: f64, monthly: f64, months: u32) -> Ledger {
        let base = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let mut ledger = Ledger::with_capacity(months as usize + 1);
        let mut cumulative = 0.0;
        for m in 0..=months {
            let mut row = LedgerRow::new(m, base);
            if m == 0 {
                row.acquisition_cost = outlay;
                row.net_cash_flow = -outlay;
            } else {
                row.gross_revenue = monthly;
                row.net_cash_flow = monthly;
            }
            cumulative += row.net_cash_flow;
            row.cumulative_net_cash_flow = cumulative;
            ledger.add_row(row);
        }
        ledger
    }

    #[test]
    fn test_summary_of_level_stream() {
        let ledger = level_ledger(1200.0, 100.0, 24);
        let summary = MetricsEngine::new(&[0.0, 0.1]).summarize(&ledger, 0.05);

        assert_eq!(summary.months, 24);
        assert_eq!(summary.payback_month, Some(12));
        assert_relative_eq!(summary.mom.unwrap(), 2.0);
        assert_relative_eq!(summary.total_profit, 1200.0);
        assert_relative_eq!(summary.npv_at(0.0).unwrap(), 1200.0);
        assert_eq!(summary.npv_at(0.25), None);
        assert_relative_eq!(summary.total_investment, 1200.0);
        assert_relative_eq!(summary.total_gross_revenue, 2400.0);

        let irr = summary.irr.unwrap();
        assert!(PVCalculator::npv(&ledger.net_cash_flows(), irr).abs() < 0.01);
        assert!(summary.irr_effective.unwrap() > irr);
    }

    #[test]
    fn test_never_pays_back() {
        let ledger = level_ledger(1000.0, 0.0, 12);
        let summary = MetricsEngine::new(&[0.1]).summarize(&ledger, 0.01);
        assert_eq!(summary.irr, None);
        assert_eq!(summary.irr_effective, None);
        assert_eq!(summary.payback_month, None);
        assert_eq!(summary.mom, Some(0.0));
    }

    #[test]
    fn test_mom_without_outflows() {
        assert_eq!(multiple_on_money(&[0.0, 10.0, 5.0]), None);
        assert_eq!(multiple_on_money(&[]), None);
        assert_relative_eq!(multiple_on_money(&[-10.0, 5.0, -10.0, 45.0]).unwrap(), 2.5);
    }

    #[test]
    fn test_free_deal_pays_back_at_closing() {
        let ledger = level_ledger(0.0, 10.0, 3);
        assert_eq!(payback_month(&ledger), Some(0));
    }
}
