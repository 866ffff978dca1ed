//! Running state carried month to month by the cash-flow generator

use crate::deal::{DealInputs, RampStyle};
use crate::production::ProductionSeries;

/// Where a ledger month sits relative to first sales
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProductionPhase {
    /// Closing month (month 0)
    Closing,
    /// Before first sales
    Undeveloped,
    /// Inside the ramp window
    Ramp { curve_month: u32, fraction: f64 },
    /// Full decline-curve capacity
    Producing { curve_month: u32 },
}

impl ProductionPhase {
    pub fn curve_month(&self) -> Option<u32> {
        match *self {
            ProductionPhase::Ramp { curve_month, .. } | ProductionPhase::Producing { curve_month } => {
                Some(curve_month)
            }
            _ => None,
        }
    }

    pub fn ramp_fraction(&self) -> f64 {
        match *self {
            ProductionPhase::Ramp { fraction, .. } => fraction,
            ProductionPhase::Producing { .. } => 1.0,
            _ => 0.0,
        }
    }
}

/// Generator state at a point in the ledger
#[derive(Debug, Clone)]
pub struct GeneratorState {
    /// Current ledger month (0 = closing)
    pub month: u32,

    /// Months with no sales after closing
    pub undeveloped_delay: u32,

    /// Months in the ramp window
    pub ramp_months: u32,

    /// Cumulative net cash flow through the current month
    pub cumulative_net: f64,

    /// First and last ledger months carrying capex
    pub capex_window: (u32, u32),

    /// Months with negative revenue so far
    pub negative_revenue_months: u32,

    /// Gross volumes for each ramp month
    pub ramp: RampSchedule,
}

impl GeneratorState {
    /// Initialize state before month 0
    pub fn from_deal(deal: &DealInputs, production: &ProductionSeries) -> Self {
        let delay = deal.undeveloped_delay();
        let spud = deal.config().costs.spud_to_sales_months.max(1);
        // Capex lands in the spud-to-sales months ending with the last dry month
        let end = delay.max(1);
        let start = (delay + 1).saturating_sub(spud).max(1).min(end);

        let timing = &deal.config().timing;

        Self {
            month: 0,
            undeveloped_delay: delay,
            ramp_months: timing.ramp_months,
            cumulative_net: 0.0,
            capex_window: (start, end),
            negative_revenue_months: 0,
            ramp: RampSchedule::new(production, timing.ramp_months, timing.ramp_style),
        }
    }

    /// Advance to the next ledger month
    pub fn advance_month(&mut self) {
        self.month += 1;
    }

    /// Phase of the current month
    pub fn phase(&self) -> ProductionPhase {
        if self.month == 0 {
            return ProductionPhase::Closing;
        }
        if self.month <= self.undeveloped_delay {
            return ProductionPhase::Undeveloped;
        }

        let curve_month = self.month - self.undeveloped_delay;
        if curve_month <= self.ramp_months {
            ProductionPhase::Ramp {
                curve_month,
                fraction: ramp_fraction(curve_month, self.ramp_months),
            }
        } else {
            ProductionPhase::Producing { curve_month }
        }
    }

    /// Curve month supplying capacity for the current month under `style`.
    ///
    /// Deferred ramps draw on curve month 1 throughout the ramp and start the
    /// curve afterwards.
    pub fn capacity_month(&self, style: RampStyle) -> Option<u32> {
        let curve_month = self.phase().curve_month()?;
        Some(capacity_month_for(curve_month, self.ramp_months, style))
    }

    pub fn in_capex_window(&self) -> bool {
        let (start, end) = self.capex_window;
        self.month >= start && self.month <= end
    }

    pub fn capex_months(&self) -> u32 {
        let (start, end) = self.capex_window;
        end - start + 1
    }
}

/// Curve month supplying capacity for 1-indexed `curve_month` under `style`
pub fn capacity_month_for(curve_month: u32, ramp_months: u32, style: RampStyle) -> u32 {
    match style {
        RampStyle::Scaled => curve_month,
        RampStyle::Deferred if curve_month <= ramp_months => 1,
        RampStyle::Deferred => curve_month - ramp_months,
    }
}

/// Gross gas and oil for ramp months 1..=R.
///
/// Each month starts as capacity × linear fraction. A backward pass then lowers
/// any month that exceeds its successor, so the series never decreases and the
/// last ramp month sits exactly at capacity. Gentle curves come through unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RampSchedule {
    gas: Vec<f64>,
    oil: Vec<f64>,
}

impl RampSchedule {
    pub fn new(production: &ProductionSeries, ramp_months: u32, style: RampStyle) -> Self {
        Self {
            gas: ramp_envelope(|k| production.gas(k), ramp_months, style),
            oil: ramp_envelope(|k| production.oil(k), ramp_months, style),
        }
    }

    /// (gas, oil) for ramp month `curve_month`; zero outside the ramp
    pub fn volumes(&self, curve_month: u32) -> (f64, f64) {
        let idx = (curve_month as usize).wrapping_sub(1);
        (
            self.gas.get(idx).copied().unwrap_or(0.0),
            self.oil.get(idx).copied().unwrap_or(0.0),
        )
    }
}

fn ramp_envelope(capacity: impl Fn(u32) -> f64, ramp_months: u32, style: RampStyle) -> Vec<f64> {
    let mut volumes: Vec<f64> = (1..=ramp_months)
        .map(|k| capacity(capacity_month_for(k, ramp_months, style)) * ramp_fraction(k, ramp_months))
        .collect();

    for i in (0..volumes.len().saturating_sub(1)).rev() {
        volumes[i] = volumes[i].min(volumes[i + 1]);
    }
    volumes
}

/// Linear ramp fraction for 1-indexed curve month `k` of an `n`-month ramp.
///
/// Runs 1/n, 2/n, ..., 1.0 and stays at 1.0 afterwards.
pub fn ramp_fraction(k: u32, n: u32) -> f64 {
    if n == 0 || k >= n {
        1.0
    } else {
        k as f64 / n as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deal::{DealConfig, Tract};
    use crate::production::ProductionProfile;

    fn state(delay: u32, ramp: u32, spud: u32) -> GeneratorState {
        let deal = deal(delay, ramp, spud);
        GeneratorState::from_deal(&deal, &ProductionSeries::from_deal(&deal))
    }

    fn deal(delay: u32, ramp: u32, spud: u32) -> DealInputs {
        let mut config = DealConfig {
            tracts: vec![Tract::new(10.0, 0.2, 640.0).unwrap()],
            ..DealConfig::default()
        };
        config.timing.undeveloped_delay_months = delay;
        config.timing.ramp_months = ramp;
        config.costs.spud_to_sales_months = spud;
        config.gas = ProductionProfile::from_type_curve(vec![1000.0]);
        DealInputs::new(config).unwrap()
    }

    #[test]
    fn test_phases() {
        let mut state = state(2, 3, 3);
        let mut phases = vec![state.phase()];
        for _ in 0..6 {
            state.advance_month();
            phases.push(state.phase());
        }

        assert_eq!(phases[0], ProductionPhase::Closing);
        assert_eq!(phases[1], ProductionPhase::Undeveloped);
        assert_eq!(phases[2], ProductionPhase::Undeveloped);
        assert_eq!(phases[3].curve_month(), Some(1));
        assert!((phases[3].ramp_fraction() - 1.0 / 3.0).abs() < 1e-12);
        assert_eq!(phases[5], ProductionPhase::Ramp { curve_month: 3, fraction: 1.0 });
        assert_eq!(phases[6], ProductionPhase::Producing { curve_month: 4 });
    }

    #[test]
    fn test_deferred_capacity_month() {
        let mut state = state(0, 2, 1);
        state.advance_month();
        assert_eq!(state.capacity_month(RampStyle::Deferred), Some(1));
        assert_eq!(state.capacity_month(RampStyle::Scaled), Some(1));
        state.advance_month();
        assert_eq!(state.capacity_month(RampStyle::Deferred), Some(1));
        assert_eq!(state.capacity_month(RampStyle::Scaled), Some(2));
        state.advance_month();
        assert_eq!(state.capacity_month(RampStyle::Deferred), Some(1));
        assert_eq!(state.capacity_month(RampStyle::Scaled), Some(3));
        state.advance_month();
        assert_eq!(state.capacity_month(RampStyle::Deferred), Some(2));
    }

    #[test]
    fn test_capex_window() {
        assert_eq!(state(36, 12, 3).capex_window, (34, 36));
        assert_eq!(state(2, 12, 3).capex_window, (1, 2));
        assert_eq!(state(0, 12, 3).capex_window, (1, 1));
        assert_eq!(state(10, 12, 0).capex_window, (10, 10));
        assert_eq!(state(36, 12, 3).capex_months(), 3);
    }

    #[test]
    fn test_ramp_fraction_bounds() {
        assert_eq!(ramp_fraction(1, 12), 1.0 / 12.0);
        assert_eq!(ramp_fraction(12, 12), 1.0);
        assert_eq!(ramp_fraction(40, 12), 1.0);
        assert_eq!(ramp_fraction(1, 0), 1.0);
    }

    #[test]
    fn test_ramp_envelope_never_decreases() {
        // Steep curve: plain scaling would give 333.3, 200, 200
        let production = ProductionSeries::new(&[1000.0, 300.0, 200.0], &[], 12);
        let ramp = RampSchedule::new(&production, 3, RampStyle::Scaled);
        assert_eq!(ramp.volumes(1), (200.0, 0.0));
        assert_eq!(ramp.volumes(2), (200.0, 0.0));
        assert_eq!(ramp.volumes(3), (200.0, 0.0));
        assert_eq!(ramp.volumes(4), (0.0, 0.0));
        assert_eq!(ramp.volumes(0), (0.0, 0.0));
    }

    #[test]
    fn test_ramp_envelope_keeps_gentle_curves() {
        let production = ProductionSeries::new(&[1000.0, 990.0, 980.0, 970.0], &[], 12);
        let ramp = RampSchedule::new(&production, 4, RampStyle::Scaled);
        assert_eq!(ramp.volumes(1).0, 250.0);
        assert_eq!(ramp.volumes(2).0, 495.0);
        assert_eq!(ramp.volumes(4).0, 970.0);

        let deferred = RampSchedule::new(&production, 4, RampStyle::Deferred);
        assert_eq!(deferred.volumes(2).0, 500.0);
        assert_eq!(deferred.volumes(4).0, 1000.0);
    }
}
