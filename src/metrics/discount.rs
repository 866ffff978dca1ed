//! Discounting of monthly cash-flow streams
//!
//! Annual rates are nominal and compounded monthly: month `m` is discounted by
//! `(1 + rate/12)^m`, with month 0 undiscounted.

use serde::{Deserialize, Serialize};

/// NPV at one annual discount rate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NpvPoint {
    pub rate: f64,
    pub npv: f64,
}

/// Present-value helpers over monthly cash flows indexed from month 0
pub struct PVCalculator;

impl PVCalculator {
    /// Monthly discount factor `1 / (1 + rate/12)`
    pub fn monthly_discount_factor(annual_rate: f64) -> f64 {
        1.0 / (1.0 + annual_rate / 12.0)
    }

    /// Net present value of `cashflows` at an annual nominal rate
    pub fn npv(cashflows: &[f64], annual_rate: f64) -> f64 {
        let v = Self::monthly_discount_factor(annual_rate);
        // Running factor avoids a powi per month
        let mut factor = 1.0;
        let mut total = 0.0;
        for &cf in cashflows {
            total += cf * factor;
            factor *= v;
        }
        total
    }

    /// NPV at each rate, in the order given
    pub fn npv_table(cashflows: &[f64], rates: &[f64]) -> Vec<NpvPoint> {
        rates
            .iter()
            .map(|&rate| NpvPoint { rate, npv: Self::npv(cashflows, rate) })
            .collect()
    }
}
