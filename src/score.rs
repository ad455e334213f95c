/// Outcome of a game, from the perspective of one of the participants.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Score {
    Loss,
    Draw,
    Win,
}

impl From<Score> for f64 {
    #[inline]
    fn from(score: Score) -> f64 {
        score.value()
    }
}

impl Score {
    /// The score as seen from the other participant.
    #[must_use]
    #[inline]
    pub fn opposite(self) -> Score {
        match self {
            Score::Loss => Score::Win,
            Score::Draw => Score::Draw,
            Score::Win => Score::Loss,
        }
    }

    /// `0.0` for a loss, `0.5` for a draw and `1.0` for a win.
    #[inline]
    pub fn value(self) -> f64 {
        match self {
            Score::Loss => 0.0,
            Score::Draw => 0.5,
            Score::Win => 1.0,
        }
    }
}
