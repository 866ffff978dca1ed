//! Deal definition: ownership tracts and economic assumptions

mod tract;
mod inputs;
pub mod loader;

pub use tract::Tract;
pub use inputs::{
    AcquisitionTerms, CommercialTerms, CostAssumptions, DealConfig, DealInputs, RampStyle,
    TaxRates, Timing, DEFAULT_DISCOUNT_RATES,
};
pub use loader::{load_deal, load_deal_config, load_deal_config_from_reader, load_type_curve};
