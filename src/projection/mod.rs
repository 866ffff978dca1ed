//! Cash-flow generation: deal inputs and production in, monthly ledger out

mod state;
mod engine;
mod ledger;

pub use state::{capacity_month_for, ramp_fraction, GeneratorState, ProductionPhase, RampSchedule};
pub use engine::CashFlowGenerator;
pub use ledger::{Ledger, LedgerRow, LEDGER_CSV_HEADER};
