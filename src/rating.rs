use std::ops::{Add, Mul, Sub};

use crate::internal_rating::InternalRating;

/// Number representing playing strength on the public Glicko scale, centred
/// on `1500`. Higher is better.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RatingScalar(pub f64);

impl From<RatingScalar> for f64 {
    #[inline]
    fn from(RatingScalar(rating): RatingScalar) -> f64 {
        rating
    }
}

impl From<f64> for RatingScalar {
    #[inline]
    fn from(rating: f64) -> RatingScalar {
        RatingScalar(rating)
    }
}

impl Sub<RatingScalar> for RatingScalar {
    type Output = RatingDifference;

    #[inline]
    fn sub(self, rhs: RatingScalar) -> RatingDifference {
        RatingDifference(self.0 - rhs.0)
    }
}

impl Add<RatingDifference> for RatingScalar {
    type Output = RatingScalar;

    #[inline]
    fn add(self, RatingDifference(difference): RatingDifference) -> RatingScalar {
        RatingScalar(self.0 + difference)
    }
}

impl Sub<RatingDifference> for RatingScalar {
    type Output = RatingScalar;

    #[inline]
    fn sub(self, RatingDifference(difference): RatingDifference) -> RatingScalar {
        RatingScalar(self.0 - difference)
    }
}

/// A difference between two ratings, or a rating deviation, on the public
/// Glicko scale.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RatingDifference(pub f64);

impl From<RatingDifference> for f64 {
    #[inline]
    fn from(RatingDifference(difference): RatingDifference) -> f64 {
        difference
    }
}

impl From<f64> for RatingDifference {
    #[inline]
    fn from(difference: f64) -> RatingDifference {
        RatingDifference(difference)
    }
}

impl RatingDifference {
    #[inline]
    pub fn abs(self) -> RatingDifference {
        RatingDifference(self.0.abs())
    }
}

impl Mul<f64> for RatingDifference {
    type Output = RatingDifference;

    #[inline]
    fn mul(self, scalar: f64) -> RatingDifference {
        RatingDifference(self.0 * scalar)
    }
}

impl Mul<RatingDifference> for f64 {
    type Output = RatingDifference;

    #[inline]
    fn mul(self, RatingDifference(difference): RatingDifference) -> RatingDifference {
        RatingDifference(self * difference)
    }
}

/// Number indicating the degree of expected fluctuation in a rating.
/// Identical on both scales.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Volatility(pub f64);

impl From<Volatility> for f64 {
    #[inline]
    fn from(Volatility(volatility): Volatility) -> f64 {
        volatility
    }
}

impl From<f64> for Volatility {
    #[inline]
    fn from(volatility: f64) -> Volatility {
        Volatility(volatility)
    }
}

/// A rating on the public Glicko scale. Convert it into an
/// [`InternalRating`] to register it in a [`crate::RatingPeriod`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rating {
    /// Number indicating playing strength. Higher is better. The difference
    /// between two ratings determines the expected score in a game between
    /// the two players.
    pub rating: RatingScalar,
    /// Uncertainty in the rating. A range from rating minus twice the deviation
    /// to rating plus twice the deviation approximately represents a 95%
    /// confidence interval.
    pub deviation: RatingDifference,
    /// Number indicating the degree of expected fluctuation in the rating.
    pub volatility: Volatility,
}

impl Default for Rating {
    /// Rating of an unrated player.
    fn default() -> Rating {
        Rating {
            rating: RatingScalar(1500.0),
            deviation: RatingDifference(350.0),
            volatility: Volatility(0.06),
        }
    }
}

impl Rating {
    /// Expected score (probability of winning) against `opponent`, taking the
    /// opponent's uncertainty into account.
    pub fn expected_score(&self, opponent: &Rating) -> f64 {
        InternalRating::from(self).expected_score(&InternalRating::from(opponent))
    }

    /// Approximate 95% confidence interval of the rating.
    pub fn confidence_interval(&self) -> (RatingScalar, RatingScalar) {
        (
            self.rating - 1.96 * self.deviation,
            self.rating + 1.96 * self.deviation,
        )
    }
}
