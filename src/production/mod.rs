//! Production forecasting: decline curves, type curves, and the resolved
//! monthly series the cash-flow generator consumes

mod decline;
mod type_curve;

pub use decline::{DeclineParams, DeclineType, ProductionDecline};
pub use type_curve::{TypeCurve, TypeCurveLibrary, TypeCurveSource};

use serde::{Deserialize, Serialize};

use crate::deal::DealInputs;
use crate::error::{require_non_negative, ValidationError};

/// Production inputs for one commodity.
///
/// A type curve always takes precedence over decline parameters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductionProfile {
    /// Monthly gross volumes from an external type curve
    pub type_curve: Option<Vec<f64>>,
    /// Parametric decline used when no type curve is supplied
    pub decline: Option<DeclineParams>,
}

impl ProductionProfile {
    pub fn from_type_curve(volumes: Vec<f64>) -> Self {
        Self { type_curve: Some(volumes), decline: None }
    }

    pub fn from_decline(params: DeclineParams) -> Self {
        Self { type_curve: None, decline: Some(params) }
    }

    pub fn is_empty(&self) -> bool {
        self.type_curve.is_none() && self.decline.is_none()
    }

    pub fn validate(&self, field: &str) -> Result<(), ValidationError> {
        if let Some(curve) = &self.type_curve {
            for (i, &v) in curve.iter().enumerate() {
                require_non_negative(&format!("{field}.type_curve[{i}]"), v)?;
            }
        }
        // Decline parameters are checked even when a type curve overrides them
        if let Some(decline) = &self.decline {
            decline.validate(&format!("{field}.decline"))?;
        }
        Ok(())
    }

    /// Monthly gross volumes for curve months 1..=months
    pub fn resolve(&self, months: u32) -> Vec<f64> {
        match (&self.type_curve, &self.decline) {
            (Some(curve), decline) => {
                if decline.is_some() {
                    log::warn!("Type curve supplied alongside decline parameters; using type curve");
                }
                ProductionDecline::extend_type_curve(curve, months)
            }
            (None, Some(params)) => ProductionDecline::monthly_volumes(params, months),
            (None, None) => vec![0.0; months as usize],
        }
    }
}

/// Full-capacity gross volumes by curve month, sized to the analysis horizon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductionSeries {
    gas: Vec<f64>,
    oil: Vec<f64>,
}

impl ProductionSeries {
    /// Wrap externally produced volumes, fitting each stream to `months`
    /// with the same hold-flat rule used for type curves
    pub fn new(gas: &[f64], oil: &[f64], months: u32) -> Self {
        Self {
            gas: ProductionDecline::extend_type_curve(gas, months),
            oil: ProductionDecline::extend_type_curve(oil, months),
        }
    }

    /// Resolve the deal's own gas and oil profiles
    pub fn from_deal(deal: &DealInputs) -> Self {
        let months = deal.horizon_months();
        let config = deal.config();
        if config.gas.is_empty() && config.oil.is_empty() {
            log::warn!("Deal '{}' has no gas or oil production inputs", config.name);
        }
        Self {
            gas: config.gas.resolve(months),
            oil: config.oil.resolve(months),
        }
    }

    /// Gas capacity for 1-indexed curve month `k`
    pub fn gas(&self, k: u32) -> f64 {
        Self::at(&self.gas, k)
    }

    /// Oil capacity for 1-indexed curve month `k`
    pub fn oil(&self, k: u32) -> f64 {
        Self::at(&self.oil, k)
    }

    pub fn months(&self) -> usize {
        self.gas.len()
    }

    pub fn gas_volumes(&self) -> &[f64] {
        &self.gas
    }

    pub fn oil_volumes(&self) -> &[f64] {
        &self.oil
    }

    fn at(volumes: &[f64], k: u32) -> f64 {
        if k == 0 {
            return 0.0;
        }
        volumes.get(k as usize - 1).copied().unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_curve_wins_over_decline() {
        let profile = ProductionProfile {
            type_curve: Some(vec![10.0, 9.0, 8.0]),
            decline: Some(DeclineParams::exponential(1000.0, 0.5)),
        };
        assert_eq!(profile.resolve(5), vec![10.0, 9.0, 8.0, 8.0, 8.0]);
    }

    #[test]
    fn test_invalid_decline_rejected_even_with_type_curve() {
        let profile = ProductionProfile {
            type_curve: Some(vec![10.0]),
            decline: Some(DeclineParams::hyperbolic(1000.0, 0.5, 3.0)),
        };
        let err = profile.validate("gas").unwrap_err();
        assert!(matches!(err, ValidationError::HyperbolicExponent { .. }));
        assert!(err.to_string().starts_with("gas.decline.b_factor"));
    }

    #[test]
    fn test_negative_type_curve_volume_rejected() {
        let profile = ProductionProfile::from_type_curve(vec![10.0, -5.0, 8.0]);
        let err = profile.validate("oil").unwrap_err();
        assert_eq!(err, ValidationError::negative("oil.type_curve[1]", -5.0));

        let profile = ProductionProfile::from_type_curve(vec![10.0, f64::NAN]);
        assert!(matches!(profile.validate("gas"), Err(ValidationError::NotFinite { .. })));
        assert!(ProductionProfile::from_type_curve(vec![10.0, 0.0]).validate("gas").is_ok());
    }

    #[test]
    fn test_empty_profile_resolves_to_zero() {
        let profile = ProductionProfile::default();
        assert!(profile.is_empty());
        assert_eq!(profile.resolve(3), vec![0.0; 3]);
    }

    #[test]
    fn test_series_indexing() {
        let series = ProductionSeries::new(&[3.0, 2.0], &[], 4);
        assert_eq!(series.months(), 4);
        assert_eq!(series.gas(0), 0.0);
        assert_eq!(series.gas(1), 3.0);
        assert_eq!(series.gas(4), 2.0);
        assert_eq!(series.gas(5), 0.0);
        assert_eq!(series.oil(2), 0.0);
    }
}
