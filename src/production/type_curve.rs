//! Type-curve source interface and an in-memory library

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Reference monthly production profile for one well
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TypeCurve {
    /// Gross gas volumes by curve month (Mcf)
    #[serde(default)]
    pub gas: Vec<f64>,
    /// Gross oil volumes by curve month (Bbl)
    #[serde(default)]
    pub oil: Vec<f64>,
}

impl TypeCurve {
    pub fn gas_only(gas: Vec<f64>) -> Self {
        Self { gas, oil: Vec::new() }
    }

    /// Cumulative gas over the whole curve
    pub fn gas_eur(&self) -> f64 {
        self.gas.iter().sum()
    }

    pub fn oil_eur(&self) -> f64 {
        self.oil.iter().sum()
    }

    pub fn months(&self) -> usize {
        self.gas.len().max(self.oil.len())
    }
}

/// Supplies type curves by identifier
pub trait TypeCurveSource {
    fn type_curve(&self, curve_id: &str) -> Option<&TypeCurve>;
}

/// Type curves held in memory, keyed by curve id (e.g. "APPA_113")
#[derive(Debug, Clone, Default)]
pub struct TypeCurveLibrary {
    curves: HashMap<String, TypeCurve>,
}

impl TypeCurveLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, curve_id: impl Into<String>, curve: TypeCurve) -> Option<TypeCurve> {
        self.curves.insert(curve_id.into(), curve)
    }

    pub fn len(&self) -> usize {
        self.curves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.curves.is_empty()
    }

    /// Curve ids in sorted order
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.curves.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }
}

impl TypeCurveSource for TypeCurveLibrary {
    fn type_curve(&self, curve_id: &str) -> Option<&TypeCurve> {
        self.curves.get(curve_id)
    }
}
