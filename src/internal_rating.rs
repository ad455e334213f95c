use std::f64::consts::PI;

use crate::{
    error::Error,
    rating::{Rating, RatingDifference, RatingScalar, Volatility},
    rating_system::RatingSystem,
    score::Score,
    volatility::VolatilityObjective,
};

/// Ratio between the public Glicko scale and the internal Glicko-2 scale.
pub const INTERNAL_RATING_SCALE: f64 = 173.7178;

const PUBLIC_RATING_OFFSET: f64 = 1500.0;

/// Rating state of a player on the internal (logistic) Glicko-2 scale.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InternalRating {
    /// `μ`
    pub rating: f64,
    /// `φ`
    pub deviation: f64,
    /// `σ`
    pub volatility: f64,
}

impl From<&Rating> for InternalRating {
    fn from(rating: &Rating) -> InternalRating {
        InternalRating {
            rating: (f64::from(rating.rating) - PUBLIC_RATING_OFFSET) / INTERNAL_RATING_SCALE,
            deviation: f64::from(rating.deviation) / INTERNAL_RATING_SCALE,
            volatility: f64::from(rating.volatility),
        }
    }
}

impl From<InternalRating> for Rating {
    fn from(rating: InternalRating) -> Rating {
        Rating {
            rating: RatingScalar(rating.rating * INTERNAL_RATING_SCALE + PUBLIC_RATING_OFFSET),
            deviation: RatingDifference(rating.deviation * INTERNAL_RATING_SCALE),
            volatility: Volatility(rating.volatility),
        }
    }
}

impl InternalRating {
    pub fn new(rating: f64, deviation: f64, volatility: f64) -> Result<InternalRating, Error> {
        let rating = InternalRating {
            rating,
            deviation,
            volatility,
        };
        rating.validate()?;
        Ok(rating)
    }

    pub fn validate(&self) -> Result<(), Error> {
        if !self.rating.is_finite() {
            return Err(Error::InvalidConfiguration {
                reason: "rating must be finite",
            });
        }
        if !(self.deviation.is_finite() && self.deviation > 0.0) {
            return Err(Error::InvalidConfiguration {
                reason: "deviation must be finite and positive",
            });
        }
        if !(self.volatility.is_finite() && self.volatility > 0.0) {
            return Err(Error::InvalidConfiguration {
                reason: "volatility must be finite and positive",
            });
        }
        Ok(())
    }

    /// State after a rating period without games: the deviation grows by the
    /// volatility, everything else is unchanged.
    #[must_use]
    pub fn touched(&self) -> InternalRating {
        InternalRating {
            deviation: self.deviation.hypot(self.volatility),
            ..*self
        }
    }

    /// Expected score `E` against `opponent`.
    pub fn expected_score(&self, opponent: &InternalRating) -> f64 {
        expectation(self.rating, opponent.rating, g(opponent.deviation))
    }

    /// Rates a player with pre-period state `self` from the pre-period
    /// states of its opponents and the scores it achieved against them.
    pub fn rate<I>(&self, results: I, system: &RatingSystem) -> Result<InternalRating, Error>
    where
        I: IntoIterator<Item = (InternalRating, Score)>,
    {
        let mut games = 0;
        // Σ g(φⱼ)² Eⱼ (1 - Eⱼ), the reciprocal of the estimated variance.
        let mut information = 0.0;
        // Σ g(φⱼ) (sⱼ - Eⱼ)
        let mut improvement = 0.0;

        for (opponent, score) in results {
            let g = g(opponent.deviation);
            let e = expectation(self.rating, opponent.rating, g);
            information += g * g * e * (1.0 - e);
            improvement += g * (score.value() - e);
            games += 1;
        }

        if games == 0 {
            return Ok(self.touched());
        }

        let variance = information.recip();
        if !(variance.is_finite() && variance > 0.0) {
            return Err(Error::DegenerateVariance);
        }

        let volatility = VolatilityObjective::new(
            variance * improvement,
            self.deviation,
            self.volatility,
            variance,
            system.tau(),
        )
        .solve(system)?;

        let pre_deviation = self.deviation.hypot(volatility);
        let deviation = (pre_deviation.powi(-2) + variance.recip()).sqrt().recip();

        Ok(InternalRating {
            rating: self.rating + deviation * deviation * improvement,
            deviation,
            volatility,
        })
    }
}

/// Reduces the impact of games against opponents with uncertain ratings.
fn g(deviation: f64) -> f64 {
    (1.0 + 3.0 * deviation * deviation / (PI * PI)).sqrt().recip()
}

fn expectation(rating: f64, opponent_rating: f64, g: f64) -> f64 {
    (1.0 + (-g * (rating - opponent_rating)).exp()).recip()
}
