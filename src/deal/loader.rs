//! Load deals from JSON files and type curves from monthly-volume CSVs

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use csv::Reader;

use super::{DealConfig, DealInputs};
use crate::error::LoadError;
use crate::production::TypeCurve;

/// Raw CSV row: `Month,Gas,Oil` with Oil optional
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    #[serde(rename = "Month", alias = "month")]
    month: u32,
    #[serde(rename = "Gas", alias = "gas", default)]
    gas: Option<f64>,
    #[serde(rename = "Oil", alias = "oil", default)]
    oil: Option<f64>,
}

/// Read a deal configuration without validating it
pub fn load_deal_config<P: AsRef<Path>>(path: P) -> Result<DealConfig, LoadError> {
    let file = File::open(path)?;
    load_deal_config_from_reader(BufReader::new(file))
}

/// Read a deal configuration from any reader (e.g. request body)
pub fn load_deal_config_from_reader<R: Read>(reader: R) -> Result<DealConfig, LoadError> {
    Ok(serde_json::from_reader(reader)?)
}

/// Read and validate a deal file
pub fn load_deal<P: AsRef<Path>>(path: P) -> Result<DealInputs, LoadError> {
    let config = load_deal_config(path)?;
    Ok(DealInputs::new(config)?)
}

/// Load a single type curve from a CSV file
pub fn load_type_curve<P: AsRef<Path>>(path: P) -> Result<TypeCurve, LoadError> {
    let file = File::open(path)?;
    load_type_curve_from_reader(file)
}

/// Load a type curve from any reader.
///
/// Months must run 1, 2, 3, ... without gaps. Blank oil cells count as zero.
pub fn load_type_curve_from_reader<R: Read>(reader: R) -> Result<TypeCurve, LoadError> {
    let mut csv_reader = Reader::from_reader(reader);
    let mut gas = Vec::new();
    let mut oil = Vec::new();

    for (i, result) in csv_reader.deserialize().enumerate() {
        let row: CsvRow = result?;
        if row.month as usize != i + 1 {
            return Err(LoadError::CurveOrder { row: i + 1, month: row.month });
        }
        gas.push(row.gas.unwrap_or(0.0));
        oil.push(row.oil.unwrap_or(0.0));
    }

    if oil.iter().all(|&v| v == 0.0) {
        oil.clear();
    }
    if gas.iter().all(|&v| v == 0.0) {
        gas.clear();
    }

    log::debug!("Loaded type curve: {} gas months, {} oil months", gas.len(), oil.len());
    Ok(TypeCurve { gas, oil })
}
