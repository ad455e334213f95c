//! Glicko-2 ratings computed over rating periods.
//!
//! Register players with their rating at the start of a period, record the
//! games they played, then [`RatingPeriod::calculate()`] all new ratings at
//! once.
//!
//! ```
//! use glicko2_period::{InternalRating, Rating, RatingPeriod, Score};
//!
//! let mut period = RatingPeriod::new(0.5)?;
//! let alice = period.add_player("alice", InternalRating::from(&Rating::default()))?;
//! let bob = period.add_player("bob", InternalRating::from(&Rating::default()))?;
//! period.add_match(alice, bob, Score::Win)?;
//! period.calculate()?;
//!
//! let alice = Rating::from(*period.player(alice).unwrap().current());
//! assert!(f64::from(alice.rating) > 1500.0);
//! # Ok::<_, Box<dyn std::error::Error>>(())
//! ```

mod error;
mod internal_rating;
mod period;
mod rating;
mod rating_system;
mod score;
mod volatility;

pub use error::{CalculationError, Error};
pub use internal_rating::{InternalRating, INTERNAL_RATING_SCALE};
pub use period::{Match, MatchId, Player, PlayerId, RatingPeriod};
pub use rating::{Rating, RatingDifference, RatingScalar, Volatility};
pub use rating_system::{RatingSystem, RatingSystemBuilder};
pub use score::Score;
pub use volatility::VolatilityObjective;

/// Log likelihood deviance metric that can be used to evaluate the quality of
/// rating system predictions.
///
/// Lower is better.
///
/// See https://www.kaggle.com/c/ChessRatings2/overview/evaluation.
pub fn deviance(expected: f64, actual: Score) -> f64 {
    let expected = expected.clamp(0.01, 0.99);
    let actual = actual.value();
    -(actual * expected.log10() + (1.0 - actual) * (1.0 - expected).log10())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deviance() {
        assert!(deviance(0.9, Score::Win) < deviance(0.5, Score::Win));
        assert!(deviance(0.9, Score::Loss) > deviance(0.5, Score::Loss));
        assert!((deviance(0.5, Score::Draw) - 2f64.log10()).abs() < 1e-12);
        assert!(deviance(1.0, Score::Loss).is_finite());
    }
}
