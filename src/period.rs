//! A rating period: every game played within one evaluation window, rated
//! simultaneously.
//!
//! Players and matches live in arenas owned by the [`RatingPeriod`] and refer
//! to each other through [`PlayerId`] and [`MatchId`] handles.

use std::{borrow::Borrow, hash::Hash};

use rustc_hash::FxHashMap;
use tracing::{debug, trace, warn};

use crate::{
    error::{CalculationError, Error},
    internal_rating::InternalRating,
    rating_system::RatingSystem,
    score::Score,
};

/// Handle of a player within one rating period.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct PlayerId(usize);

impl PlayerId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Handle of a match within one rating period.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct MatchId(usize);

impl MatchId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A single game between two distinct players.
#[derive(Debug, Clone, PartialEq)]
pub struct Match {
    first: PlayerId,
    second: PlayerId,
    score: Score,
}

impl Match {
    pub fn first(&self) -> PlayerId {
        self.first
    }

    pub fn second(&self) -> PlayerId {
        self.second
    }

    /// Score from the perspective of the first player.
    pub fn score(&self) -> Score {
        self.score
    }

    /// Score from the perspective of `player`, or `None` if `player` did not
    /// take part.
    pub fn score_for(&self, player: PlayerId) -> Option<Score> {
        if player == self.first {
            Some(self.score)
        } else if player == self.second {
            Some(self.score.opposite())
        } else {
            None
        }
    }

    pub fn opponent_of(&self, player: PlayerId) -> Option<PlayerId> {
        if player == self.first {
            Some(self.second)
        } else if player == self.second {
            Some(self.first)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pre: InternalRating,
    post: Option<InternalRating>,
    matches: Vec<MatchId>,
}

impl Player {
    fn new(pre: InternalRating) -> Player {
        Player {
            pre,
            post: None,
            matches: Vec::new(),
        }
    }

    /// Rating at the start of the period.
    pub fn pre(&self) -> &InternalRating {
        &self.pre
    }

    /// Rating at the end of the period. Only available after a successful
    /// [`RatingPeriod::calculate()`].
    pub fn post(&self) -> Option<&InternalRating> {
        self.post.as_ref()
    }

    /// The post-period rating if available, otherwise the pre-period rating.
    pub fn current(&self) -> &InternalRating {
        self.post.as_ref().unwrap_or(&self.pre)
    }

    pub fn matches(&self) -> &[MatchId] {
        &self.matches
    }
}

/// Collects the matches of one rating period and computes the updated
/// ratings of all participating players.
///
/// Players are identified by caller supplied keys of type `K`. Registering
/// the same key again is a no-op.
#[derive(Debug, Clone)]
pub struct RatingPeriod<K> {
    system: RatingSystem,
    ids: FxHashMap<K, PlayerId>,
    keys: Vec<K>,
    players: Vec<Player>,
    matches: Vec<Match>,
}

impl<K: Hash + Eq + Clone> RatingPeriod<K> {
    /// Creates an empty rating period with system constant `tau` and default
    /// convergence settings.
    pub fn new(tau: f64) -> Result<RatingPeriod<K>, Error> {
        Ok(RatingPeriod::with_system(RatingSystem::with_tau(tau)?))
    }

    pub fn with_system(system: RatingSystem) -> RatingPeriod<K> {
        RatingPeriod {
            system,
            ids: FxHashMap::default(),
            keys: Vec::new(),
            players: Vec::new(),
            matches: Vec::new(),
        }
    }

    pub fn system(&self) -> &RatingSystem {
        &self.system
    }

    pub fn tau(&self) -> f64 {
        self.system.tau()
    }

    /// Registers a player with its rating at the start of the period.
    ///
    /// If `key` is already registered, its existing handle is returned and
    /// `pre` is ignored.
    pub fn add_player(&mut self, key: K, pre: InternalRating) -> Result<PlayerId, Error> {
        if let Some(&id) = self.ids.get(&key) {
            return Ok(id);
        }
        pre.validate()?;

        let id = PlayerId(self.players.len());
        self.ids.insert(key.clone(), id);
        self.keys.push(key);
        self.players.push(Player::new(pre));
        Ok(id)
    }

    /// Records a game between two registered players, with `score` from the
    /// perspective of `first`.
    pub fn add_match(
        &mut self,
        first: PlayerId,
        second: PlayerId,
        score: Score,
    ) -> Result<MatchId, Error> {
        for player in [first, second] {
            if player.0 >= self.players.len() {
                return Err(Error::UnknownPlayer(player));
            }
        }
        if first == second {
            return Err(Error::InvalidConfiguration {
                reason: "a player cannot play against itself",
            });
        }

        let id = MatchId(self.matches.len());
        self.matches.push(Match {
            first,
            second,
            score,
        });
        self.players[first.0].matches.push(id);
        self.players[second.0].matches.push(id);
        Ok(id)
    }

    /// Registers both players (if not already registered) and records a game
    /// between them.
    pub fn add_match_by_key(
        &mut self,
        first: K,
        first_pre: InternalRating,
        second: K,
        second_pre: InternalRating,
        score: Score,
    ) -> Result<MatchId, Error> {
        if first == second {
            return Err(Error::InvalidConfiguration {
                reason: "a player cannot play against itself",
            });
        }
        let first = self.add_player(first, first_pre)?;
        let second = self.add_player(second, second_pre)?;
        self.add_match(first, second, score)
    }

    pub fn player_id<Q>(&self, key: &Q) -> Option<PlayerId>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.ids.get(key).copied()
    }

    pub fn player(&self, PlayerId(id): PlayerId) -> Option<&Player> {
        self.players.get(id)
    }

    pub fn key(&self, PlayerId(id): PlayerId) -> Option<&K> {
        self.keys.get(id)
    }

    pub fn get_match(&self, MatchId(id): MatchId) -> Option<&Match> {
        self.matches.get(id)
    }

    pub fn players(&self) -> impl Iterator<Item = (PlayerId, &K, &Player)> {
        self.keys
            .iter()
            .zip(&self.players)
            .enumerate()
            .map(|(id, (key, player))| (PlayerId(id), key, player))
    }

    pub fn matches(&self) -> impl Iterator<Item = (MatchId, &Match)> {
        self.matches
            .iter()
            .enumerate()
            .map(|(id, game)| (MatchId(id), game))
    }

    /// Current rating of each player, see [`Player::current()`].
    pub fn ratings(&self) -> impl Iterator<Item = (&K, InternalRating)> {
        self.keys
            .iter()
            .zip(&self.players)
            .map(|(key, player)| (key, *player.current()))
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Computes the post-period rating of every registered player.
    ///
    /// Each update reads only pre-period ratings, so the result does not
    /// depend on the order of players. Players without games only have
    /// their deviation increased. A failed update leaves that player without
    /// a post-period rating and does not affect other players.
    pub fn calculate(&mut self) -> Result<(), CalculationError> {
        debug!(
            players = self.players.len(),
            matches = self.matches.len(),
            tau = self.system.tau(),
            "calculating rating period"
        );

        let updates = self.updates();

        let mut failures = Vec::new();
        for (index, (player, update)) in self.players.iter_mut().zip(updates).enumerate() {
            match update {
                Ok(post) => player.post = Some(post),
                Err(err) => {
                    warn!(player = index, %err, "rating update failed");
                    player.post = None;
                    failures.push((PlayerId(index), err));
                }
            }
        }

        debug!(failures = failures.len(), "rating period calculated");
        if failures.is_empty() {
            Ok(())
        } else {
            Err(CalculationError {
                players: self.players.len(),
                failures,
            })
        }
    }

    #[cfg(not(feature = "rayon"))]
    fn updates(&self) -> Vec<Result<InternalRating, Error>> {
        let (players, matches, system) = (&self.players, &self.matches, &self.system);
        players
            .iter()
            .enumerate()
            .map(|(index, player)| rate_player(PlayerId(index), player, players, matches, system))
            .collect()
    }

    #[cfg(feature = "rayon")]
    fn updates(&self) -> Vec<Result<InternalRating, Error>> {
        use rayon::prelude::*;

        let (players, matches, system) = (&self.players, &self.matches, &self.system);
        players
            .par_iter()
            .enumerate()
            .map(|(index, player)| rate_player(PlayerId(index), player, players, matches, system))
            .collect()
    }

    /// Starts the next rating period: every player is carried over with its
    /// current rating as the new pre-period rating, without any matches.
    pub fn carry_forward(self) -> RatingPeriod<K> {
        RatingPeriod {
            system: self.system,
            ids: self.ids,
            keys: self.keys,
            players: self
                .players
                .iter()
                .map(|player| Player::new(*player.current()))
                .collect(),
            matches: Vec::new(),
        }
    }
}

fn rate_player(
    id: PlayerId,
    player: &Player,
    players: &[Player],
    matches: &[Match],
    system: &RatingSystem,
) -> Result<InternalRating, Error> {
    trace!(player = id.0, games = player.matches.len(), "rating player");
    let results = player.matches.iter().filter_map(|&MatchId(m)| {
        let game = matches.get(m)?;
        let opponent = players.get(game.opponent_of(id)?.0)?;
        Some((opponent.pre, game.score_for(id)?))
    });
    player.pre.rate(results, system)
}
