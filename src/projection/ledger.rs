//! Monthly cash-flow ledger and its tabular export

use std::io::Write;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One month of the investor's cash-flow ledger.
///
/// Gross volumes are 8/8ths well volumes; net volumes and all dollar amounts
/// are the investor's share.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerRow {
    #[serde(rename = "Month")]
    pub month: u32,
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    /// Production-curve month (1 = first sales); empty before first sales
    #[serde(rename = "CurveMonth")]
    pub curve_month: Option<u32>,
    #[serde(rename = "RampFraction")]
    pub ramp_fraction: f64,

    // Volumes
    #[serde(rename = "GrossGas")]
    pub gross_gas: f64,
    #[serde(rename = "GrossOil")]
    pub gross_oil: f64,
    #[serde(rename = "GrossNgl")]
    pub gross_ngl: f64,
    #[serde(rename = "NetGas")]
    pub net_gas: f64,
    #[serde(rename = "NetOil")]
    pub net_oil: f64,
    #[serde(rename = "NetNgl")]
    pub net_ngl: f64,

    // Revenue
    #[serde(rename = "GasRevenue")]
    pub gas_revenue: f64,
    #[serde(rename = "OilRevenue")]
    pub oil_revenue: f64,
    #[serde(rename = "NglRevenue")]
    pub ngl_revenue: f64,
    #[serde(rename = "GrossRevenue")]
    pub gross_revenue: f64,

    // Deductions
    #[serde(rename = "SeveranceTax")]
    pub severance_tax: f64,
    #[serde(rename = "AdValoremTax")]
    pub ad_valorem_tax: f64,
    #[serde(rename = "GptDeduction")]
    pub gpt_deduction: f64,
    #[serde(rename = "Opex")]
    pub opex: f64,
    #[serde(rename = "Capex")]
    pub capex: f64,

    // Purchase
    #[serde(rename = "AcquisitionCost")]
    pub acquisition_cost: f64,
    #[serde(rename = "GaFees")]
    pub ga_fees: f64,

    // Summary
    #[serde(rename = "NetCashFlow")]
    pub net_cash_flow: f64,
    #[serde(rename = "CumulativeNetCashFlow")]
    pub cumulative_net_cash_flow: f64,
}

impl LedgerRow {
    /// Create an empty row for `month`
    pub fn new(month: u32, date: NaiveDate) -> Self {
        Self {
            month,
            date,
            curve_month: None,
            ramp_fraction: 0.0,
            gross_gas: 0.0,
            gross_oil: 0.0,
            gross_ngl: 0.0,
            net_gas: 0.0,
            net_oil: 0.0,
            net_ngl: 0.0,
            gas_revenue: 0.0,
            oil_revenue: 0.0,
            ngl_revenue: 0.0,
            gross_revenue: 0.0,
            severance_tax: 0.0,
            ad_valorem_tax: 0.0,
            gpt_deduction: 0.0,
            opex: 0.0,
            capex: 0.0,
            acquisition_cost: 0.0,
            ga_fees: 0.0,
            net_cash_flow: 0.0,
            cumulative_net_cash_flow: 0.0,
        }
    }

    pub fn total_taxes(&self) -> f64 {
        self.severance_tax + self.ad_valorem_tax
    }

    /// Revenue after taxes and operating deductions, before capital and purchase costs
    pub fn net_revenue(&self) -> f64 {
        self.gross_revenue - self.total_taxes() - self.gpt_deduction - self.opex
    }
}

/// Ordered ledger for months 0..=N, built once by the generator.
///
/// Rows can only be appended inside the crate; callers get read-only access.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ledger {
    rows: Vec<LedgerRow>,
}

impl Ledger {
    pub(crate) fn with_capacity(months: usize) -> Self {
        Self { rows: Vec::with_capacity(months) }
    }

    /// Append the next month; months must arrive in order
    pub(crate) fn add_row(&mut self, row: LedgerRow) {
        debug_assert_eq!(row.month as usize, self.rows.len());
        self.rows.push(row);
    }

    pub fn rows(&self) -> &[LedgerRow] {
        &self.rows
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LedgerRow> {
        self.rows.iter()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, month: u32) -> Option<&LedgerRow> {
        self.rows.get(month as usize)
    }

    /// Net cash flow by month, month 0 first
    pub fn net_cash_flows(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.net_cash_flow).collect()
    }

    /// Write every row as CSV with a header line
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), csv::Error> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        for row in &self.rows {
            csv_writer.serialize(row)?;
        }
        csv_writer.flush()?;
        Ok(())
    }

    /// Ledger as a CSV string
    pub fn to_csv_string(&self) -> Result<String, csv::Error> {
        let mut buffer = Vec::new();
        self.write_csv(&mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}

impl<'a> IntoIterator for &'a Ledger {
    type Item = &'a LedgerRow;
    type IntoIter = std::slice::Iter<'a, LedgerRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

/// Column header of the CSV export, in order
pub const LEDGER_CSV_HEADER: &str = "Month,Date,CurveMonth,RampFraction,GrossGas,GrossOil,GrossNgl,\
NetGas,NetOil,NetNgl,GasRevenue,OilRevenue,NglRevenue,GrossRevenue,SeveranceTax,AdValoremTax,\
GptDeduction,Opex,Capex,AcquisitionCost,GaFees,NetCashFlow,CumulativeNetCashFlow";
