//! Monthly cash-flow generator for mineral/royalty deals

use super::ledger::{Ledger, LedgerRow};
use super::state::{GeneratorState, ProductionPhase};
use crate::deal::DealInputs;
use crate::prices::PriceSource;
use crate::production::ProductionSeries;

/// Builds the investor ledger for one deal.
///
/// Holds the deal and its price source by reference; generation never mutates
/// inputs.
pub struct CashFlowGenerator<'a> {
    deal: &'a DealInputs,
    prices: &'a dyn PriceSource,
}

impl<'a> CashFlowGenerator<'a> {
    /// Generator priced off the deal's own deck
    pub fn new(deal: &'a DealInputs) -> Self {
        Self::with_prices(deal, &deal.config().prices)
    }

    /// Generator priced off an external source, e.g. a strip or escalated deck
    pub fn with_prices(deal: &'a DealInputs, prices: &'a dyn PriceSource) -> Self {
        Self { deal, prices }
    }

    /// Generate ledger rows for months 0..=horizon in a single pass
    pub fn generate(&self, production: &ProductionSeries) -> Ledger {
        let months = self.deal.horizon_months();
        let mut ledger = Ledger::with_capacity(months as usize + 1);
        let mut state = GeneratorState::from_deal(self.deal, production);

        let row = self.calculate_closing(&mut state);
        ledger.add_row(row);

        for _month in 1..=months {
            state.advance_month();
            let row = self.calculate_month(production, &mut state);
            ledger.add_row(row);
        }

        if state.negative_revenue_months > 0 {
            log::warn!(
                "Deal '{}': {} month(s) with negative revenue (price below differential)",
                self.deal.name(),
                state.negative_revenue_months
            );
        }

        ledger
    }

    /// Month 0: acquisition cost and upfront G&A, no production
    fn calculate_closing(&self, state: &mut GeneratorState) -> LedgerRow {
        let acquisition = &self.deal.config().acquisition;
        let mut row = LedgerRow::new(0, self.deal.date_for_month(0));

        row.acquisition_cost = acquisition.cost;
        row.ga_fees = acquisition.upfront_ga_fee;
        row.net_cash_flow = -acquisition.closing_outlay();

        state.cumulative_net += row.net_cash_flow;
        row.cumulative_net_cash_flow = state.cumulative_net;
        row
    }

    /// Calculate one production-period month
    fn calculate_month(&self, production: &ProductionSeries, state: &mut GeneratorState) -> LedgerRow {
        let mut row = LedgerRow::new(state.month, self.deal.date_for_month(state.month));

        self.calculate_volumes(production, state, &mut row);
        self.calculate_revenue(state, &mut row);
        self.calculate_taxes(&mut row);
        if self.deal.is_cost_bearing() {
            self.calculate_costs(state, &mut row);
        }

        // Recurring G&A, monthly share
        row.ga_fees = self.deal.config().acquisition.annual_ga / 12.0;

        row.net_cash_flow = row.gross_revenue
            - row.severance_tax
            - row.ad_valorem_tax
            - row.gpt_deduction
            - row.opex
            - row.capex
            - row.ga_fees;

        state.cumulative_net += row.net_cash_flow;
        row.cumulative_net_cash_flow = state.cumulative_net;
        row
    }

    /// Gross and net volumes, including ramp and production risk
    fn calculate_volumes(&self, production: &ProductionSeries, state: &GeneratorState, row: &mut LedgerRow) {
        let config = self.deal.config();
        let commercial = &config.commercial;

        let phase = state.phase();
        row.curve_month = phase.curve_month();
        row.ramp_fraction = phase.ramp_fraction();

        let (gas, oil) = match phase {
            ProductionPhase::Closing | ProductionPhase::Undeveloped => return,
            ProductionPhase::Ramp { curve_month, .. } => state.ramp.volumes(curve_month),
            ProductionPhase::Producing { .. } => {
                let Some(capacity_month) = state.capacity_month(config.timing.ramp_style) else {
                    return;
                };
                (production.gas(capacity_month), production.oil(capacity_month))
            }
        };

        row.gross_gas = gas * commercial.production_risk;
        row.gross_oil = oil * commercial.production_risk;

        // NGL recovered from shrunk gas; yield is per MMcf
        row.gross_ngl = row.gross_gas * commercial.gas_shrink * commercial.ngl_yield_bbl_per_mmcf / 1000.0;

        let nri = self.deal.total_nri();
        row.net_gas = row.gross_gas * nri;
        row.net_oil = row.gross_oil * nri;
        row.net_ngl = row.gross_ngl * nri;
    }

    /// Revenue = net volume × (price − differential), per commodity
    fn calculate_revenue(&self, state: &mut GeneratorState, row: &mut LedgerRow) {
        let commercial = &self.deal.config().commercial;
        let prices = self.prices.prices_for_month(state.month);

        let gas_realized = (prices.gas - commercial.gas_differential) * commercial.btu_adjustment;
        let oil_realized = prices.oil - commercial.oil_differential;
        let ngl_realized = prices.ngl.unwrap_or(prices.oil * commercial.ngl_pct_of_oil);

        row.gas_revenue = row.net_gas * gas_realized;
        row.oil_revenue = row.net_oil * oil_realized;
        row.ngl_revenue = row.net_ngl * ngl_realized;
        row.gross_revenue = row.gas_revenue + row.oil_revenue + row.ngl_revenue;

        // Uneconomic months flow through unclamped
        if row.gross_revenue < 0.0 {
            state.negative_revenue_months += 1;
        }
    }

    /// Severance by commodity, ad valorem on total revenue
    fn calculate_taxes(&self, row: &mut LedgerRow) {
        let taxes = &self.deal.config().taxes;

        row.severance_tax = row.gas_revenue * taxes.severance_gas
            + row.oil_revenue * taxes.severance_oil
            + row.ngl_revenue * taxes.severance_ngl;
        row.ad_valorem_tax = row.gross_revenue * taxes.ad_valorem;
    }

    /// GP&T, opex, and capex for cost-bearing deals
    fn calculate_costs(&self, state: &GeneratorState, row: &mut LedgerRow) {
        let config = self.deal.config();
        let costs = &config.costs;

        row.gpt_deduction = row.net_gas * config.commercial.gas_shrink * costs.gpt_per_mcf;

        let producing = row.gross_gas > 0.0 || row.gross_oil > 0.0;
        let fixed_opex = if producing {
            costs.fixed_opex_per_month * costs.cost_share
        } else {
            0.0
        };
        let variable_opex =
            row.net_gas * costs.variable_opex_gas_per_mcf + row.net_oil * costs.variable_opex_oil_per_bbl;
        row.opex = fixed_opex + variable_opex;

        if costs.capex > 0.0 && state.in_capex_window() {
            row.capex = costs.capex * costs.cost_share / state.capex_months() as f64;
        }
    }
}
