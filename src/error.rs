use thiserror::Error;

use crate::period::PlayerId;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("invalid configuration: {reason}")]
    InvalidConfiguration { reason: &'static str },
    #[error("volatility did not converge after {iterations} iterations")]
    NumericalNonConvergence { iterations: u32 },
    /// The sum of information over a player's matches is zero or not finite,
    /// so the estimated variance is undefined.
    #[error("estimated variance is degenerate")]
    DegenerateVariance,
    #[error("player {0:?} is not registered in this rating period")]
    UnknownPlayer(PlayerId),
}

/// Players whose update failed during [`crate::RatingPeriod::calculate()`].
/// All other players were updated.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{} of {players} players could not be rated", .failures.len())]
pub struct CalculationError {
    pub players: usize,
    pub failures: Vec<(PlayerId, Error)>,
}
