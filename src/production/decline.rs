//! Arps decline-curve model
//!
//! Decline constants are nominal annual rates. Time inside the model is measured
//! in months since first production, so curve month `k` (1-indexed) is evaluated at
//! `t = k - 1`.

use serde::{Deserialize, Serialize};

use crate::error::{require_finite, require_non_negative, ValidationError};

/// Shape of the decline curve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeclineType {
    /// q(t) = q0 * exp(-D*t)
    Exponential,
    /// q(t) = q0 / (1 + b*D*t)^(1/b)
    Hyperbolic,
    /// Hyperbolic with b = 1
    Harmonic,
}

fn default_b_factor() -> f64 {
    0.5
}

/// Parametric decline inputs for one commodity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeclineParams {
    pub decline_type: DeclineType,

    /// Initial monthly volume (Mcf/month or Bbl/month)
    #[serde(default)]
    pub initial_rate: f64,

    /// Estimated ultimate recovery over the analysis horizon.
    /// When set, the initial rate is solved from it and `initial_rate` is ignored.
    #[serde(default)]
    pub eur: Option<f64>,

    /// Initial nominal decline, annual (0.35 = 35%/yr)
    pub initial_decline: f64,

    /// Hyperbolic exponent; ignored for exponential and harmonic curves
    #[serde(default = "default_b_factor")]
    pub b_factor: f64,

    /// Terminal nominal decline, annual. Hyperbolic curves switch to
    /// exponential once their instantaneous decline reaches this rate.
    #[serde(default)]
    pub terminal_decline: Option<f64>,
}

impl DeclineParams {
    pub fn exponential(initial_rate: f64, initial_decline: f64) -> Self {
        Self {
            decline_type: DeclineType::Exponential,
            initial_rate,
            eur: None,
            initial_decline,
            b_factor: default_b_factor(),
            terminal_decline: None,
        }
    }

    pub fn hyperbolic(initial_rate: f64, initial_decline: f64, b_factor: f64) -> Self {
        Self {
            decline_type: DeclineType::Hyperbolic,
            b_factor,
            ..Self::exponential(initial_rate, initial_decline)
        }
    }

    pub fn harmonic(initial_rate: f64, initial_decline: f64) -> Self {
        Self {
            decline_type: DeclineType::Harmonic,
            ..Self::exponential(initial_rate, initial_decline)
        }
    }

    /// Size the curve by EUR instead of initial rate
    pub fn with_eur(mut self, eur: f64) -> Self {
        self.eur = Some(eur);
        self
    }

    pub fn with_terminal_decline(mut self, terminal_decline: f64) -> Self {
        self.terminal_decline = Some(terminal_decline);
        self
    }

    /// Effective b factor for the chosen decline type
    pub fn effective_b(&self) -> Option<f64> {
        match self.decline_type {
            DeclineType::Exponential => None,
            DeclineType::Hyperbolic => Some(self.b_factor),
            DeclineType::Harmonic => Some(1.0),
        }
    }

    pub fn validate(&self, field: &str) -> Result<(), ValidationError> {
        require_non_negative(&format!("{field}.initial_rate"), self.initial_rate)?;
        require_non_negative(&format!("{field}.initial_decline"), self.initial_decline)?;
        if let Some(eur) = self.eur {
            require_non_negative(&format!("{field}.eur"), eur)?;
        }
        if let Some(terminal) = self.terminal_decline {
            require_non_negative(&format!("{field}.terminal_decline"), terminal)?;
        }
        if self.decline_type == DeclineType::Hyperbolic {
            let b = self.b_factor;
            require_finite(&format!("{field}.b_factor"), b)?;
            if b <= 0.0 || b > 2.0 {
                return Err(ValidationError::HyperbolicExponent {
                    field: format!("{field}.b_factor"),
                    value: b,
                });
            }
        }
        Ok(())
    }
}

/// Decline-curve mathematics and type-curve normalization
pub struct ProductionDecline;

impl ProductionDecline {
    /// Exponential decline with monthly nominal decline `d`
    pub fn exponential(q0: f64, d: f64, t: f64) -> f64 {
        q0 * (-d * t).exp()
    }

    /// Hyperbolic decline with monthly nominal decline `d`
    pub fn hyperbolic(q0: f64, d: f64, b: f64, t: f64) -> f64 {
        q0 / (1.0 + b * d * t).powf(1.0 / b)
    }

    /// Harmonic decline, the b = 1 hyperbolic
    pub fn harmonic(q0: f64, d: f64, t: f64) -> f64 {
        q0 / (1.0 + d * t)
    }

    /// Rate at `t` months for the given parameters and initial rate.
    /// Applies the terminal-decline switch for hyperbolic shapes.
    pub fn rate_at(params: &DeclineParams, q0: f64, t: f64) -> f64 {
        let d = params.initial_decline / 12.0;
        let Some(b) = params.effective_b() else {
            return Self::exponential(q0, d, t);
        };

        if let Some(terminal) = params.terminal_decline {
            let d_term = terminal / 12.0;
            if d_term > 0.0 && d_term < d {
                // Instantaneous decline d / (1 + b*d*t) reaches d_term here
                let t_switch = (d / d_term - 1.0) / (b * d);
                if t > t_switch {
                    let q_switch = Self::hyperbolic(q0, d, b, t_switch);
                    return Self::exponential(q_switch, d_term, t - t_switch);
                }
            }
        }

        Self::hyperbolic(q0, d, b, t)
    }

    /// Monthly volumes for curve months 1..=months
    pub fn monthly_volumes(params: &DeclineParams, months: u32) -> Vec<f64> {
        let shape: Vec<f64> = (0..months)
            .map(|t| Self::rate_at(params, 1.0, t as f64))
            .collect();

        let q0 = match params.eur {
            Some(eur) => Self::initial_rate_for_eur(eur, &shape),
            None => params.initial_rate,
        };

        shape.into_iter().map(|s| s * q0).collect()
    }

    /// Initial monthly rate that makes the horizon-truncated curve sum to `eur`
    fn initial_rate_for_eur(eur: f64, unit_shape: &[f64]) -> f64 {
        let cumulative: f64 = unit_shape.iter().sum();
        if cumulative > 0.0 {
            eur / cumulative
        } else {
            0.0
        }
    }

    /// Fit an externally supplied type curve to the horizon.
    ///
    /// Longer curves are truncated. Shorter curves hold their final month flat
    /// until the horizon is reached. An empty curve yields no production.
    pub fn extend_type_curve(curve: &[f64], months: u32) -> Vec<f64> {
        let months = months as usize;
        let Some(&last) = curve.last() else {
            return vec![0.0; months];
        };

        if curve.len() < months {
            log::debug!(
                "Extending {}-month type curve to {} months at {:.3}/month",
                curve.len(),
                months,
                last
            );
        }

        curve
            .iter()
            .copied()
            .chain(std::iter::repeat(last))
            .take(months)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    #[test]
    fn test_exponential_curve() {
        let params = DeclineParams::exponential(1000.0, 0.12);
        let volumes = ProductionDecline::monthly_volumes(&params, 13);

        assert_eq!(volumes.len(), 13);
        assert_relative_eq!(volumes[0], 1000.0);
        // 12 months at 1%/month nominal
        assert_relative_eq!(volumes[12], 1000.0 * (-0.12_f64).exp(), epsilon = 1e-9);
    }

    #[test]
    fn test_harmonic_matches_hyperbolic_b_one() {
        let harmonic = DeclineParams::harmonic(500.0, 0.6);
        let hyperbolic = DeclineParams::hyperbolic(500.0, 0.6, 1.0);

        let a = ProductionDecline::monthly_volumes(&harmonic, 120);
        let b = ProductionDecline::monthly_volumes(&hyperbolic, 120);
        for (x, y) in a.iter().zip(&b) {
            assert_relative_eq!(*x, *y, epsilon = 1e-9);
        }
        assert_relative_eq!(a[24], 500.0 / (1.0 + 0.05 * 24.0), epsilon = 1e-9);
    }

    #[test]
    fn test_hyperbolic_declines_slower_than_exponential() {
        let exp = DeclineParams::exponential(1000.0, 0.8);
        let hyp = DeclineParams::hyperbolic(1000.0, 0.8, 1.2);

        let e = ProductionDecline::monthly_volumes(&exp, 60);
        let h = ProductionDecline::monthly_volumes(&hyp, 60);
        assert!(h[59] > e[59]);
        assert!(h.windows(2).all(|w| w[1] <= w[0]));
    }

    #[test]
    fn test_hyperbolic_b_factor_validation() {
        for b in [0.0, -0.5, 2.01, f64::NAN] {
            let params = DeclineParams::hyperbolic(1000.0, 0.5, b);
            assert!(params.validate("gas.decline").is_err(), "b = {b} accepted");
        }
        for b in [0.01, 1.0, 2.0] {
            let params = DeclineParams::hyperbolic(1000.0, 0.5, b);
            assert!(params.validate("gas.decline").is_ok(), "b = {b} rejected");
        }
        // b is irrelevant for exponential curves
        let mut exp = DeclineParams::exponential(1000.0, 0.5);
        exp.b_factor = 5.0;
        assert!(exp.validate("gas.decline").is_ok());
    }

    #[test]
    fn test_eur_sizing() {
        let params = DeclineParams::exponential(0.0, 0.35).with_eur(12_060_000.0);
        let volumes = ProductionDecline::monthly_volumes(&params, 600);

        let total: f64 = volumes.iter().sum();
        assert_relative_eq!(total, 12_060_000.0, max_relative = 1e-12);
        assert!(volumes[0] > 340_000.0 && volumes[0] < 350_000.0);
    }

    #[test]
    fn test_terminal_decline_switch() {
        let params = DeclineParams::hyperbolic(1000.0, 1.2, 1.5).with_terminal_decline(0.06);
        let volumes = ProductionDecline::monthly_volumes(&params, 600);

        // Late in life the month-over-month ratio settles at exp(-0.005)
        let ratio = volumes[599] / volumes[598];
        assert_relative_eq!(ratio, (-0.005_f64).exp(), epsilon = 1e-9);

        // Terminal decline only removes volume relative to pure hyperbolic
        let pure = ProductionDecline::monthly_volumes(&DeclineParams::hyperbolic(1000.0, 1.2, 1.5), 600);
        assert!(volumes[599] < pure[599]);
        assert_relative_eq!(volumes[0], pure[0]);
    }

    #[test]
    fn test_type_curve_extension_holds_last_month() {
        let curve: Vec<f64> = (1..=35).map(|m| 1000.0 - m as f64).collect();
        let extended = ProductionDecline::extend_type_curve(&curve, 600);

        assert_eq!(extended.len(), 600);
        assert_eq!(&extended[..35], curve.as_slice());
        assert!(extended[35..].iter().all(|&v| v == curve[34]));
    }

    #[test]
    fn test_type_curve_truncation_and_empty() {
        let curve = vec![5.0; 700];
        assert_eq!(ProductionDecline::extend_type_curve(&curve, 600).len(), 600);

        let none = ProductionDecline::extend_type_curve(&[], 24);
        assert_eq!(none.len(), 24);
        assert_abs_diff_eq!(none.iter().sum::<f64>(), 0.0);
    }
}
