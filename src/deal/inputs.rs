//! Deal configuration and its validated form

use chrono::{Datelike, Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::Tract;
use crate::error::{require_finite, require_fraction, require_non_negative, ValidationError};
use crate::prices::PriceDeck;
use crate::production::{ProductionProfile, TypeCurveSource};

/// Default NPV discount rates (annual)
pub const DEFAULT_DISCOUNT_RATES: [f64; 10] =
    [0.0, 0.05, 0.075, 0.10, 0.125, 0.15, 0.175, 0.20, 0.25, 0.30];

/// Realized-price and product-yield assumptions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommercialTerms {
    /// Subtracted from the gas benchmark ($/Mcf); positive = discount
    pub gas_differential: f64,
    /// Subtracted from the oil benchmark ($/Bbl)
    pub oil_differential: f64,
    /// Heating-value multiplier on realized gas price
    pub btu_adjustment: f64,
    /// Fraction of wet gas remaining after processing
    pub gas_shrink: f64,
    /// NGL barrels recovered per MMcf of shrunk gas; 0 disables NGL
    pub ngl_yield_bbl_per_mmcf: f64,
    /// NGL price as a fraction of oil when the deck carries no NGL price
    pub ngl_pct_of_oil: f64,
    /// Risk multiplier on gross volumes (1.0 = unrisked)
    pub production_risk: f64,
}

impl Default for CommercialTerms {
    fn default() -> Self {
        Self {
            gas_differential: 0.0,
            oil_differential: 0.0,
            btu_adjustment: 1.0,
            gas_shrink: 0.85,
            ngl_yield_bbl_per_mmcf: 0.0,
            ngl_pct_of_oil: 0.33,
            production_risk: 1.0,
        }
    }
}

impl CommercialTerms {
    fn validate(&self) -> Result<(), ValidationError> {
        require_finite("commercial.gas_differential", self.gas_differential)?;
        require_finite("commercial.oil_differential", self.oil_differential)?;
        require_non_negative("commercial.btu_adjustment", self.btu_adjustment)?;
        require_fraction("commercial.gas_shrink", self.gas_shrink)?;
        require_non_negative("commercial.ngl_yield_bbl_per_mmcf", self.ngl_yield_bbl_per_mmcf)?;
        require_non_negative("commercial.ngl_pct_of_oil", self.ngl_pct_of_oil)?;
        require_non_negative("commercial.production_risk", self.production_risk)?;
        Ok(())
    }
}

/// Production taxes as fractions of revenue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaxRates {
    pub severance_gas: f64,
    pub severance_oil: f64,
    pub severance_ngl: f64,
    pub ad_valorem: f64,
}

impl Default for TaxRates {
    fn default() -> Self {
        Self {
            severance_gas: 0.007,
            severance_oil: 0.002,
            severance_ngl: 0.0,
            ad_valorem: 0.01,
        }
    }
}

impl TaxRates {
    fn validate(&self) -> Result<(), ValidationError> {
        require_fraction("taxes.severance_gas", self.severance_gas)?;
        require_fraction("taxes.severance_oil", self.severance_oil)?;
        require_fraction("taxes.severance_ngl", self.severance_ngl)?;
        require_fraction("taxes.ad_valorem", self.ad_valorem)?;
        Ok(())
    }
}

/// Cost schedules borne by the investor when the deal is cost-bearing.
///
/// On a lease (royalty) basis the operator carries all of these and they are
/// ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CostAssumptions {
    /// true = investor bears no capex, opex, or GP&T
    pub lease_basis: bool,
    /// Gathering, processing & transportation, $/Mcf of net shrunk gas
    pub gpt_per_mcf: f64,
    /// $/month for each producing month, before cost share
    pub fixed_opex_per_month: f64,
    /// $/net Mcf
    pub variable_opex_gas_per_mcf: f64,
    /// $/net Bbl
    pub variable_opex_oil_per_bbl: f64,
    /// Drilling & completion capex for the well, before cost share
    pub capex: f64,
    /// Months from spud to first sales; capex is spread evenly across them
    pub spud_to_sales_months: u32,
    /// Fraction of gross well costs borne (1.0 = single-well basis)
    pub cost_share: f64,
}

impl Default for CostAssumptions {
    fn default() -> Self {
        Self {
            lease_basis: true,
            gpt_per_mcf: 1.79,
            fixed_opex_per_month: 2500.0,
            variable_opex_gas_per_mcf: 0.15,
            variable_opex_oil_per_bbl: 0.0,
            capex: 0.0,
            spud_to_sales_months: 3,
            cost_share: 1.0,
        }
    }
}

impl CostAssumptions {
    fn validate(&self) -> Result<(), ValidationError> {
        require_non_negative("costs.gpt_per_mcf", self.gpt_per_mcf)?;
        require_non_negative("costs.fixed_opex_per_month", self.fixed_opex_per_month)?;
        require_non_negative("costs.variable_opex_gas_per_mcf", self.variable_opex_gas_per_mcf)?;
        require_non_negative("costs.variable_opex_oil_per_bbl", self.variable_opex_oil_per_bbl)?;
        require_non_negative("costs.capex", self.capex)?;
        require_fraction("costs.cost_share", self.cost_share)?;
        Ok(())
    }
}

/// Purchase price and fees
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AcquisitionTerms {
    /// Paid once at closing (month 0)
    pub cost: f64,
    /// One-time G&A/admin fee paid at closing
    pub upfront_ga_fee: f64,
    /// Recurring G&A per year, charged monthly from month 1
    pub annual_ga: f64,
}

impl AcquisitionTerms {
    fn validate(&self) -> Result<(), ValidationError> {
        require_non_negative("acquisition.cost", self.cost)?;
        require_non_negative("acquisition.upfront_ga_fee", self.upfront_ga_fee)?;
        require_non_negative("acquisition.annual_ga", self.annual_ga)?;
        Ok(())
    }

    /// Cash paid at closing
    pub fn closing_outlay(&self) -> f64 {
        self.cost + self.upfront_ga_fee
    }
}

/// How the ramp window applies to the production curve
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RampStyle {
    /// Curve month k is scaled by the ramp fraction; the curve starts at first sales
    #[default]
    Scaled,
    /// The first curve month's capacity is scaled during the ramp and the curve
    /// itself starts once the ramp completes
    Deferred,
}

/// Development timing and analysis window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timing {
    /// Closing/valuation date; ledger month 0
    pub base_date: NaiveDate,
    /// Months with no sales after closing
    pub undeveloped_delay_months: u32,
    /// When set, determines the delay and must fall after `base_date`
    pub first_sales_date: Option<NaiveDate>,
    /// Months for production to ramp to full capacity; 0 disables the ramp
    pub ramp_months: u32,
    pub ramp_style: RampStyle,
    pub horizon_years: u32,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            base_date: Utc::now().date_naive(),
            undeveloped_delay_months: 36,
            first_sales_date: None,
            ramp_months: 12,
            ramp_style: RampStyle::Scaled,
            horizon_years: 50,
        }
    }
}

impl Timing {
    /// Months of zero production after closing
    fn resolve_delay(&self) -> Result<u32, ValidationError> {
        let Some(first_sales) = self.first_sales_date else {
            return Ok(self.undeveloped_delay_months);
        };

        if first_sales <= self.base_date {
            return Err(ValidationError::NonMonotonicDates {
                base: self.base_date.to_string(),
                first_sales: first_sales.to_string(),
            });
        }

        let months = (first_sales.year() - self.base_date.year()) * 12
            + first_sales.month() as i32
            - self.base_date.month() as i32;
        // A first-sales date inside the closing month still sells in month 1
        let first_sales_month = months.max(1) as u32;
        Ok(first_sales_month - 1)
    }
}

/// Everything needed to evaluate a deal, as supplied by a form, file, or API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DealConfig {
    pub name: String,
    pub basin: Option<String>,
    pub type_curve_id: Option<String>,
    pub tracts: Vec<Tract>,
    /// Additional NRI held outside the listed tracts
    pub participation_nri: f64,
    pub gas: ProductionProfile,
    pub oil: ProductionProfile,
    pub prices: PriceDeck,
    pub commercial: CommercialTerms,
    pub taxes: TaxRates,
    pub costs: CostAssumptions,
    pub acquisition: AcquisitionTerms,
    pub timing: Timing,
    /// Annual rates for the NPV table
    pub discount_rates: Vec<f64>,
}

impl Default for DealConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            basin: None,
            type_curve_id: None,
            tracts: Vec::new(),
            participation_nri: 0.0,
            gas: ProductionProfile::default(),
            oil: ProductionProfile::default(),
            prices: PriceDeck::default(),
            commercial: CommercialTerms::default(),
            taxes: TaxRates::default(),
            costs: CostAssumptions::default(),
            acquisition: AcquisitionTerms::default(),
            timing: Timing::default(),
            discount_rates: DEFAULT_DISCOUNT_RATES.to_vec(),
        }
    }
}

impl DealConfig {
    /// Fill gas/oil type curves from `source` using `type_curve_id`.
    ///
    /// Profiles that already carry a type curve are left alone.
    pub fn attach_type_curve<S: TypeCurveSource + ?Sized>(
        &mut self,
        source: &S,
    ) -> Result<(), ValidationError> {
        let Some(curve_id) = self.type_curve_id.as_deref() else {
            return Ok(());
        };
        let curve = source
            .type_curve(curve_id)
            .ok_or_else(|| ValidationError::UnknownTypeCurve(curve_id.to_string()))?;

        if self.gas.type_curve.is_none() && !curve.gas.is_empty() {
            self.gas.type_curve = Some(curve.gas.clone());
        }
        if self.oil.type_curve.is_none() && !curve.oil.is_empty() {
            self.oil.type_curve = Some(curve.oil.clone());
        }
        Ok(())
    }
}

/// Validated, read-only deal inputs.
///
/// Built once with [`DealInputs::new`]; every rule is checked there so the
/// generator and metrics never see malformed inputs.
#[derive(Debug, Clone, PartialEq)]
pub struct DealInputs {
    config: DealConfig,
    total_nri: f64,
    undeveloped_delay: u32,
    horizon_months: u32,
}

impl DealInputs {
    pub fn new(config: DealConfig) -> Result<Self, ValidationError> {
        if config.tracts.is_empty() {
            return Err(ValidationError::EmptyTracts);
        }
        require_non_negative("participation_nri", config.participation_nri)?;

        config.gas.validate("gas")?;
        config.oil.validate("oil")?;
        config.prices.validate()?;
        config.commercial.validate()?;
        config.taxes.validate()?;
        config.costs.validate()?;
        config.acquisition.validate()?;

        for (i, &rate) in config.discount_rates.iter().enumerate() {
            require_non_negative(&format!("discount_rates[{i}]"), rate)?;
        }

        if config.timing.horizon_years == 0 {
            return Err(ValidationError::NonPositiveHorizon);
        }
        let horizon_months = config
            .timing
            .horizon_years
            .checked_mul(12)
            .ok_or(ValidationError::HorizonTooLong(config.timing.horizon_years))?;
        config
            .timing
            .base_date
            .checked_add_months(Months::new(horizon_months))
            .ok_or(ValidationError::DateOverflow(horizon_months))?;
        let undeveloped_delay = config.timing.resolve_delay()?;

        let total_nri = config.tracts.iter().map(Tract::nri).sum::<f64>() + config.participation_nri;

        log::debug!(
            "Deal '{}': {} tract(s), NRI {:.6}, delay {} months, horizon {} months",
            config.name,
            config.tracts.len(),
            total_nri,
            undeveloped_delay,
            horizon_months
        );

        Ok(Self {
            config,
            total_nri,
            undeveloped_delay,
            horizon_months,
        })
    }

    pub fn config(&self) -> &DealConfig {
        &self.config
    }

    /// Editable copy of the configuration for building a variant deal
    pub fn to_config(&self) -> DealConfig {
        self.config.clone()
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn tracts(&self) -> &[Tract] {
        &self.config.tracts
    }

    /// Sum of tract NRIs
    pub fn tract_nri(&self) -> f64 {
        self.total_nri - self.config.participation_nri
    }

    /// Tract NRIs plus participation NRI
    pub fn total_nri(&self) -> f64 {
        self.total_nri
    }

    pub fn horizon_months(&self) -> u32 {
        self.horizon_months
    }

    /// Months with no sales after closing
    pub fn undeveloped_delay(&self) -> u32 {
        self.undeveloped_delay
    }

    /// Ledger month of first sales
    pub fn first_sales_month(&self) -> u32 {
        self.undeveloped_delay + 1
    }

    /// Investor bears costs when the deal is not on a lease basis or any tract
    /// is held as a working interest
    pub fn is_cost_bearing(&self) -> bool {
        !self.config.costs.lease_basis || self.config.tracts.iter().any(Tract::is_working_interest)
    }

    /// Calendar date of ledger month `month`
    pub fn date_for_month(&self, month: u32) -> NaiveDate {
        let base = self.config.timing.base_date;
        // The horizon end date was checked in `new`
        base.checked_add_months(Months::new(month)).unwrap_or(base)
    }

    pub fn discount_rates(&self) -> &[f64] {
        &self.config.discount_rates
    }
}

impl TryFrom<DealConfig> for DealInputs {
    type Error = ValidationError;

    fn try_from(config: DealConfig) -> Result<Self, Self::Error> {
        DealInputs::new(config)
    }
}
