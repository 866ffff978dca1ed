//! Commodity price inputs
//!
//! Prices arrive per month from an outside source (strip, broker deck, flat case).
//! The engine never escalates them; it only looks them up.

use serde::{Deserialize, Serialize};

use crate::error::{require_finite, ValidationError};

/// Benchmark prices for one production month
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonthlyPrices {
    /// $/Mcf
    pub gas: f64,
    /// $/Bbl
    pub oil: f64,
    /// $/Bbl; when absent the NGL price is derived from oil
    #[serde(default)]
    pub ngl: Option<f64>,
}

impl MonthlyPrices {
    pub fn new(gas: f64, oil: f64) -> Self {
        Self { gas, oil, ngl: None }
    }
}

/// Supplies prices by production month (1-indexed)
pub trait PriceSource {
    fn prices_for_month(&self, month: u32) -> MonthlyPrices;
}

/// Month-by-month price deck.
///
/// Entry 0 prices month 1. Months past the end of the deck hold the last entry,
/// so a single entry is a flat price case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceDeck {
    months: Vec<MonthlyPrices>,
}

impl PriceDeck {
    pub fn flat(gas: f64, oil: f64) -> Self {
        Self { months: vec![MonthlyPrices::new(gas, oil)] }
    }

    pub fn monthly(months: Vec<MonthlyPrices>) -> Self {
        Self { months }
    }

    pub fn with_ngl_price(mut self, ngl: f64) -> Self {
        for entry in &mut self.months {
            entry.ngl = Some(ngl);
        }
        self
    }

    /// Replace the gas price in every month
    pub fn with_gas_price(mut self, gas: f64) -> Self {
        for entry in &mut self.months {
            entry.gas = gas;
        }
        self
    }

    /// Replace the oil price in every month
    pub fn with_oil_price(mut self, oil: f64) -> Self {
        for entry in &mut self.months {
            entry.oil = oil;
        }
        self
    }

    pub fn len(&self) -> usize {
        self.months.len()
    }

    pub fn is_empty(&self) -> bool {
        self.months.is_empty()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.months.is_empty() {
            return Err(ValidationError::EmptyPriceDeck);
        }
        for (i, entry) in self.months.iter().enumerate() {
            require_finite(&format!("prices[{i}].gas"), entry.gas)?;
            require_finite(&format!("prices[{i}].oil"), entry.oil)?;
            if let Some(ngl) = entry.ngl {
                require_finite(&format!("prices[{i}].ngl"), ngl)?;
            }
        }
        Ok(())
    }
}

impl Default for PriceDeck {
    fn default() -> Self {
        Self::flat(3.68, 61.0)
    }
}

impl PriceSource for PriceDeck {
    fn prices_for_month(&self, month: u32) -> MonthlyPrices {
        let idx = (month as usize).saturating_sub(1);
        self.months
            .get(idx)
            .or_else(|| self.months.last())
            .copied()
            .unwrap_or(MonthlyPrices::new(0.0, 0.0))
    }
}
