//! Mineral/royalty ownership tracts

use serde::{Deserialize, Serialize};

use crate::error::{require_finite, require_positive, ValidationError};

/// Raw tract record as it appears in deal files
#[derive(Debug, Clone, Serialize, Deserialize)]
struct TractRecord {
    mineral_acres: f64,
    royalty_rate: f64,
    #[serde(alias = "unit_gross_acres")]
    drilling_unit_gross_acres: f64,
    #[serde(default)]
    working_interest: bool,
    #[serde(default, alias = "unit_name")]
    name: Option<String>,
}

/// A single tract of mineral acres inside a drilling unit.
///
/// Validated on construction and immutable afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TractRecord", into = "TractRecord")]
pub struct Tract {
    mineral_acres: f64,
    royalty_rate: f64,
    drilling_unit_gross_acres: f64,
    working_interest: bool,
    name: Option<String>,
}

impl Tract {
    pub fn new(
        mineral_acres: f64,
        royalty_rate: f64,
        drilling_unit_gross_acres: f64,
    ) -> Result<Self, ValidationError> {
        require_positive("tract.mineral_acres", mineral_acres)?;
        require_positive("tract.drilling_unit_gross_acres", drilling_unit_gross_acres)?;
        require_finite("tract.royalty_rate", royalty_rate)?;
        if !(0.0..=1.0).contains(&royalty_rate) {
            return Err(ValidationError::RoyaltyOutOfRange {
                field: "tract.royalty_rate".to_string(),
                value: royalty_rate,
            });
        }

        Ok(Self {
            mineral_acres,
            royalty_rate,
            drilling_unit_gross_acres,
            working_interest: false,
            name: None,
        })
    }

    /// Attach a display name (e.g. "Stephens County Unit 1")
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Mark the tract as held as a working interest, which makes the deal cost-bearing
    pub fn with_working_interest(mut self, working_interest: bool) -> Self {
        self.working_interest = working_interest;
        self
    }

    /// Net revenue interest: (acres × royalty) / unit gross acres
    pub fn nri(&self) -> f64 {
        self.mineral_acres * self.royalty_rate / self.drilling_unit_gross_acres
    }

    pub fn mineral_acres(&self) -> f64 {
        self.mineral_acres
    }

    pub fn royalty_rate(&self) -> f64 {
        self.royalty_rate
    }

    pub fn drilling_unit_gross_acres(&self) -> f64 {
        self.drilling_unit_gross_acres
    }

    pub fn is_working_interest(&self) -> bool {
        self.working_interest
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Net royalty acres: mineral acres normalized to `base_royalty`
    /// (1/8 under the usual convention)
    pub fn net_royalty_acres(&self, base_royalty: f64) -> f64 {
        if base_royalty <= 0.0 {
            return 0.0;
        }
        self.mineral_acres * self.royalty_rate / base_royalty
    }
}

impl TryFrom<TractRecord> for Tract {
    type Error = ValidationError;

    fn try_from(record: TractRecord) -> Result<Self, Self::Error> {
        let tract = Tract::new(
            record.mineral_acres,
            record.royalty_rate,
            record.drilling_unit_gross_acres,
        )?
        .with_working_interest(record.working_interest);

        Ok(match record.name {
            Some(name) => tract.with_name(name),
            None => tract,
        })
    }
}

impl From<Tract> for TractRecord {
    fn from(tract: Tract) -> Self {
        Self {
            mineral_acres: tract.mineral_acres,
            royalty_rate: tract.royalty_rate,
            drilling_unit_gross_acres: tract.drilling_unit_gross_acres,
            working_interest: tract.working_interest,
            name: tract.name,
        }
    }
}
