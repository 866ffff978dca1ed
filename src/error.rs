//! Error types for deal construction and input loading

use thiserror::Error;

/// Construction-time validation failures.
///
/// Every variant names the offending field so callers can point a user at the
/// exact input. Nothing in the crate corrects these silently.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("deal has no tracts")]
    EmptyTracts,
    #[error("{field}: royalty rate {value} is outside [0, 1]")]
    RoyaltyOutOfRange { field: String, value: f64 },
    #[error("{field}: {value} must be positive")]
    NonPositive { field: String, value: f64 },
    #[error("{field}: {value} must not be negative")]
    Negative { field: String, value: f64 },
    #[error("{field}: {value} is not a finite number")]
    NotFinite { field: String, value: f64 },
    #[error("{field}: hyperbolic exponent b = {value} is outside (0, 2]")]
    HyperbolicExponent { field: String, value: f64 },
    #[error("{field}: fraction {value} is outside [0, 1]")]
    FractionOutOfRange { field: String, value: f64 },
    #[error("analysis horizon must be at least one year")]
    NonPositiveHorizon,
    #[error("analysis horizon of {0} years is too long")]
    HorizonTooLong(u32),
    #[error("first sales date {first_sales} is not after base date {base}")]
    NonMonotonicDates { base: String, first_sales: String },
    #[error("unknown type curve: {0}")]
    UnknownTypeCurve(String),
    #[error("price deck is empty")]
    EmptyPriceDeck,
    #[error("date arithmetic overflow at month {0}")]
    DateOverflow(u32),
}

impl ValidationError {
    pub(crate) fn non_positive(field: impl Into<String>, value: f64) -> Self {
        ValidationError::NonPositive { field: field.into(), value }
    }

    pub(crate) fn negative(field: impl Into<String>, value: f64) -> Self {
        ValidationError::Negative { field: field.into(), value }
    }
}

/// Failures while reading deal files or type curves from disk.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("csv: {0}")]
    Csv(#[from] csv::Error),
    #[error("invalid deal: {0}")]
    Invalid(#[from] ValidationError),
    #[error("type curve row {row}: month {month} out of sequence")]
    CurveOrder { row: usize, month: u32 },
}

/// Checks shared by every sub-config validator.
pub(crate) fn require_finite(field: &str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ValidationError::NotFinite { field: field.to_string(), value })
    }
}

pub(crate) fn require_non_negative(field: &str, value: f64) -> Result<(), ValidationError> {
    require_finite(field, value)?;
    if value < 0.0 {
        return Err(ValidationError::negative(field, value));
    }
    Ok(())
}

pub(crate) fn require_positive(field: &str, value: f64) -> Result<(), ValidationError> {
    require_finite(field, value)?;
    if value <= 0.0 {
        return Err(ValidationError::non_positive(field, value));
    }
    Ok(())
}

pub(crate) fn require_fraction(field: &str, value: f64) -> Result<(), ValidationError> {
    require_finite(field, value)?;
    if !(0.0..=1.0).contains(&value) {
        return Err(ValidationError::FractionOutOfRange { field: field.to_string(), value });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_field() {
        let err = require_fraction("taxes.ad_valorem", 1.5).unwrap_err();
        assert_eq!(err.to_string(), "taxes.ad_valorem: fraction 1.5 is outside [0, 1]");

        let err = require_positive("timing.horizon_years", 0.0).unwrap_err();
        assert!(matches!(err, ValidationError::NonPositive { .. }));
    }

    #[test]
    fn test_nan_rejected_before_range_checks() {
        let err = require_non_negative("acquisition.cost", f64::NAN).unwrap_err();
        assert!(matches!(err, ValidationError::NotFinite { .. }));
    }
}
