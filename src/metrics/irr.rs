//! Internal Rate of Return (IRR) calculation
//!
//! Solved by bisection on the annual nominal rate, so the result is consistent
//! with the NPV convention in [`PVCalculator::npv`].

use super::discount::PVCalculator;

/// Lower edge of the search bracket (annual nominal): a 99% loss per month
pub const IRR_LOWER_BOUND: f64 = -11.88;
/// Upper edge of the search bracket before expansion (annual nominal)
pub const IRR_UPPER_BOUND: f64 = 10.0;
/// Upper bounds tried in turn when the initial bracket holds no root
pub const IRR_BRACKET_EXPANSION: [f64; 4] = [50.0, 100.0, 500.0, 1000.0];
/// Half-width of the bracket at which bisection stops
pub const IRR_TOLERANCE: f64 = 1e-6;
pub const MAX_BISECTION_ITERATIONS: u32 = 100;

/// Calculate the IRR of monthly cash flows (month 0 first).
///
/// # Returns
/// * `Option<f64>` - annual nominal IRR, or None when the stream never changes
///   sign, no bracket holds a root, or bisection does not converge
pub fn calculate_irr(cashflows: &[f64]) -> Option<f64> {
    let has_positive = cashflows.iter().any(|&cf| cf > 0.0);
    let has_negative = cashflows.iter().any(|&cf| cf < 0.0);
    if !has_positive || !has_negative {
        return None; // No sign change means no IRR
    }

    let low = IRR_LOWER_BOUND;
    let npv_low = npv_at_rate(cashflows, low)?;
    let high = find_upper_bound(cashflows, npv_low)?;

    bisect(cashflows, low, high, npv_low)
}

/// Annual effective rate for a nominal rate compounded monthly
pub fn effective_annual_rate(nominal: f64) -> f64 {
    (1.0 + nominal / 12.0).powi(12) - 1.0
}

/// First upper bound whose NPV has the opposite sign to the lower bound
fn find_upper_bound(cashflows: &[f64], npv_low: f64) -> Option<f64> {
    if npv_low == 0.0 {
        return Some(IRR_UPPER_BOUND);
    }

    let candidates = std::iter::once(IRR_UPPER_BOUND).chain(IRR_BRACKET_EXPANSION);
    for high in candidates {
        let npv_high = npv_at_rate(cashflows, high)?;
        if npv_high == 0.0 || npv_high.signum() != npv_low.signum() {
            if high > IRR_UPPER_BOUND {
                log::debug!("IRR bracket expanded to [{}, {}]", IRR_LOWER_BOUND, high);
            }
            return Some(high);
        }
    }

    log::warn!("IRR has no root between {} and {}", IRR_LOWER_BOUND, IRR_BRACKET_EXPANSION[3]);
    None
}

fn bisect(cashflows: &[f64], mut low: f64, mut high: f64, mut npv_low: f64) -> Option<f64> {
    if npv_low == 0.0 {
        return Some(low);
    }

    for _ in 0..MAX_BISECTION_ITERATIONS {
        let mid = (low + high) / 2.0;
        if (high - low) / 2.0 < IRR_TOLERANCE {
            return Some(mid);
        }

        let npv_mid = npv_at_rate(cashflows, mid)?;
        if npv_mid == 0.0 {
            return Some(mid);
        }

        if npv_mid.signum() != npv_low.signum() {
            high = mid;
        } else {
            low = mid;
            npv_low = npv_mid;
        }
    }

    log::warn!("IRR bisection did not converge in {} iterations", MAX_BISECTION_ITERATIONS);
    None
}

/// A value with the same sign as the NPV at `rate`, or None when it overflows.
///
/// Below a zero rate the discount factors grow geometrically, so the stream is
/// rolled forward to its last month instead. That differs from the NPV by a
/// positive factor and stays finite over long horizons.
fn npv_at_rate(cashflows: &[f64], rate: f64) -> Option<f64> {
    let growth = 1.0 + rate / 12.0;
    let value = if growth < 1.0 {
        cashflows.iter().fold(0.0, |acc, &cf| acc * growth + cf)
    } else {
        PVCalculator::npv(cashflows, rate)
    };
    value.is_finite().then_some(value)
}
