use crate::error::Error;

#[derive(Debug, Clone)]
pub struct RatingSystemBuilder {
    tau: f64,
    convergence_tolerance: f64,
    max_bracket_steps: u32,
    max_iterations: u32,
}

impl Default for RatingSystemBuilder {
    fn default() -> RatingSystemBuilder {
        RatingSystemBuilder::new()
    }
}

impl RatingSystemBuilder {
    pub fn new() -> RatingSystemBuilder {
        RatingSystemBuilder {
            tau: 0.5,
            convergence_tolerance: 1e-6,
            max_bracket_steps: 100,
            max_iterations: 1000,
        }
    }

    /// System constant constraining the change in volatility over time.
    /// Reasonable choices are between `0.3` and `1.2`. Smaller values
    /// prevent large rating changes after very improbable results.
    pub fn tau(&mut self, tau: f64) -> &mut Self {
        self.tau = tau;
        self
    }

    /// Width of the bracket at which the volatility iteration stops.
    pub fn convergence_tolerance(&mut self, convergence_tolerance: f64) -> &mut Self {
        self.convergence_tolerance = convergence_tolerance;
        self
    }

    /// Maximum number of `tau` steps taken while searching for the initial
    /// volatility bracket.
    pub fn max_bracket_steps(&mut self, max_bracket_steps: u32) -> &mut Self {
        self.max_bracket_steps = max_bracket_steps;
        self
    }

    /// Maximum number of regula falsi iterations.
    pub fn max_iterations(&mut self, max_iterations: u32) -> &mut Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn build(&self) -> Result<RatingSystem, Error> {
        if !(self.tau.is_finite() && self.tau > 0.0) {
            return Err(Error::InvalidConfiguration {
                reason: "tau must be finite and positive",
            });
        }
        if !(self.convergence_tolerance.is_finite() && self.convergence_tolerance > 0.0) {
            return Err(Error::InvalidConfiguration {
                reason: "convergence tolerance must be finite and positive",
            });
        }
        if self.max_bracket_steps == 0 || self.max_iterations == 0 {
            return Err(Error::InvalidConfiguration {
                reason: "iteration bounds must be positive",
            });
        }

        Ok(RatingSystem {
            tau: self.tau,
            convergence_tolerance: self.convergence_tolerance,
            max_bracket_steps: self.max_bracket_steps,
            max_iterations: self.max_iterations,
        })
    }
}

/// Parameters shared by every player update in a rating period.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RatingSystem {
    tau: f64,
    convergence_tolerance: f64,
    max_bracket_steps: u32,
    max_iterations: u32,
}

impl Default for RatingSystem {
    fn default() -> RatingSystem {
        RatingSystem {
            tau: 0.5,
            convergence_tolerance: 1e-6,
            max_bracket_steps: 100,
            max_iterations: 1000,
        }
    }
}

impl RatingSystem {
    pub fn builder() -> RatingSystemBuilder {
        RatingSystemBuilder::default()
    }

    pub fn with_tau(tau: f64) -> Result<RatingSystem, Error> {
        RatingSystem::builder().tau(tau).build()
    }

    pub fn tau(&self) -> f64 {
        self.tau
    }

    pub fn convergence_tolerance(&self) -> f64 {
        self.convergence_tolerance
    }

    pub fn max_bracket_steps(&self) -> u32 {
        self.max_bracket_steps
    }

    pub fn max_iterations(&self) -> u32 {
        self.max_iterations
    }
}
