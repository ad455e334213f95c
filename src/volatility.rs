//! New volatility of a player (step 5 of the Glicko-2 procedure).
//!
//! The new volatility `σ'` is found as the root of a one dimensional
//! function in `x = ln(σ'²)`, using the Illinois variant of regula falsi.

use tracing::trace;

use crate::{error::Error, rating_system::RatingSystem};

/// Function whose root in `x = ln(σ'²)` determines the new volatility.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct VolatilityObjective {
    delta: f64,
    deviation: f64,
    volatility: f64,
    variance: f64,
    tau: f64,
}

impl VolatilityObjective {
    /// `delta` is the estimated improvement `v · Σ g(φⱼ)(sⱼ - Eⱼ)`,
    /// `deviation` and `volatility` are the player's pre-period values on
    /// the internal scale, and `variance` is the estimated variance `v`.
    pub fn new(delta: f64, deviation: f64, volatility: f64, variance: f64, tau: f64) -> Self {
        VolatilityObjective {
            delta,
            deviation,
            volatility,
            variance,
            tau,
        }
    }

    /// `a = ln(σ²)`.
    pub fn anchor(&self) -> f64 {
        (self.volatility * self.volatility).ln()
    }

    /// `Δ² - φ² - v`.
    fn excess(&self) -> f64 {
        self.delta * self.delta - self.deviation * self.deviation - self.variance
    }

    pub fn eval(&self, x: f64) -> f64 {
        let ex = x.exp();
        let spread = self.deviation * self.deviation + self.variance + ex;
        ex * (self.excess() - ex) / (2.0 * spread * spread)
            - (x - self.anchor()) / (self.tau * self.tau)
    }

    /// Solves for the new volatility `σ'`.
    pub fn solve(&self, system: &RatingSystem) -> Result<f64, Error> {
        let anchor = self.anchor();

        let mut a = anchor;
        let mut b = if self.excess() > 0.0 {
            self.excess().ln()
        } else {
            let mut k = 1;
            loop {
                let x = anchor - f64::from(k) * self.tau;
                if self.eval(x) >= 0.0 {
                    break x;
                }
                if k >= system.max_bracket_steps() {
                    return Err(Error::NumericalNonConvergence { iterations: k });
                }
                k += 1;
            }
        };

        let mut f_a = self.eval(a);
        let mut f_b = self.eval(b);
        if !f_a.is_finite() || !f_b.is_finite() {
            return Err(Error::NumericalNonConvergence { iterations: 0 });
        }

        let mut iterations = 0;
        while (b - a).abs() > system.convergence_tolerance() {
            if iterations >= system.max_iterations() {
                return Err(Error::NumericalNonConvergence { iterations });
            }
            iterations += 1;

            let c = a + (a - b) * f_a / (f_b - f_a);
            let f_c = self.eval(c);
            if !f_c.is_finite() {
                return Err(Error::NumericalNonConvergence { iterations });
            }

            if f_c * f_b <= 0.0 {
                a = b;
                f_a = f_b;
            } else {
                f_a /= 2.0;
            }
            b = c;
            f_b = f_c;
        }

        let volatility = (a / 2.0).exp();
        trace!(iterations, volatility, "volatility converged");
        Ok(volatility)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn glickman_example() -> VolatilityObjective {
        VolatilityObjective::new(-0.4834, 1.1513, 0.06, 1.7785, 0.5)
    }

    #[test]
    fn test_glickman_example() {
        let volatility = glickman_example().solve(&RatingSystem::default()).unwrap();
        assert!((volatility - 0.05999).abs() < 1e-5, "{volatility}");
    }

    #[test]
    fn test_root_residual() {
        let system = RatingSystem::default();
        for objective in [
            glickman_example(),
            // Δ² > φ² + v takes the logarithmic bracket.
            VolatilityObjective::new(3.0, 0.5, 0.06, 1.0, 0.5),
            VolatilityObjective::new(0.1, 2.0, 0.2, 0.3, 1.2),
            VolatilityObjective::new(-5.0, 0.05, 0.01, 0.2, 0.3),
        ] {
            let volatility = objective.solve(&system).unwrap();
            assert!(volatility > 0.0);
            let residual = objective.eval((volatility * volatility).ln());
            assert!(residual.abs() < 1e-4, "{objective:?}: {residual}");
        }
    }

    #[test]
    fn test_iteration_bound() {
        let system = RatingSystem::builder().max_iterations(1).build().unwrap();
        assert!(matches!(
            glickman_example().solve(&system),
            Err(Error::NumericalNonConvergence { .. })
        ));
    }

    #[test]
    fn test_bracket_search_terminates() {
        let objective = VolatilityObjective::new(0.0, 1.0, 0.06, f64::NAN, 0.5);
        assert_eq!(
            objective.solve(&RatingSystem::default()),
            Err(Error::NumericalNonConvergence { iterations: 100 })
        );
    }
}
