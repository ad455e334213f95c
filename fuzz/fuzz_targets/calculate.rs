#![no_main]

use arbitrary::{Arbitrary, Unstructured};
use glicko2_period::{InternalRating, RatingPeriod, Score};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary)]
struct ArbitraryRating {
    rating: f64,
    deviation: f64,
    volatility: f64,
}

impl ArbitraryRating {
    fn into_clamped(self) -> Option<InternalRating> {
        if self.rating.is_nan() || self.deviation.is_nan() || self.volatility.is_nan() {
            None
        } else {
            Some(InternalRating {
                rating: self.rating.clamp(-60.0, 60.0),
                deviation: self.deviation.clamp(1e-3, 6.0),
                volatility: self.volatility.clamp(1e-3, 1.0),
            })
        }
    }
}

#[derive(Arbitrary)]
enum ArbitraryScore {
    Loss,
    Draw,
    Win,
}

#[derive(Arbitrary)]
struct Encounter {
    first: u8,
    second: u8,
    score: ArbitraryScore,
}

#[derive(Arbitrary)]
struct Period {
    tau: f64,
    players: Vec<ArbitraryRating>,
    encounters: Vec<Encounter>,
}

fn assert_rating(rating: &InternalRating) {
    assert!(rating.rating.is_finite());
    assert!(rating.deviation.is_finite() && rating.deviation > 0.0);
    assert!(rating.volatility.is_finite() && rating.volatility > 0.0);
}

fuzz_target!(|data: &[u8]| {
    let mut u = Unstructured::new(data);
    let Ok(input) = Period::arbitrary(&mut u) else {
        return;
    };
    if input.tau.is_nan() {
        return;
    }
    let Ok(mut period) = RatingPeriod::new(input.tau.clamp(0.01, 10.0)) else {
        return;
    };

    let mut ids = Vec::new();
    for (key, rating) in input.players.into_iter().enumerate() {
        let Some(rating) = rating.into_clamped() else {
            return;
        };
        ids.push(period.add_player(key, rating).expect("clamped rating is valid"));
    }
    if ids.is_empty() {
        return;
    }

    for encounter in input.encounters {
        let first = ids[usize::from(encounter.first) % ids.len()];
        let second = ids[usize::from(encounter.second) % ids.len()];
        let score = match encounter.score {
            ArbitraryScore::Loss => Score::Loss,
            ArbitraryScore::Draw => Score::Draw,
            ArbitraryScore::Win => Score::Win,
        };
        if first == second {
            assert!(period.add_match(first, second, score).is_err());
        } else {
            period.add_match(first, second, score).expect("registered players");
        }
    }

    let failed: Vec<_> = match period.calculate() {
        Ok(()) => Vec::new(),
        Err(err) => err.failures.into_iter().map(|(id, _)| id).collect(),
    };
    for (id, _, player) in period.players() {
        match player.post() {
            Some(post) => assert_rating(post),
            None => assert!(failed.contains(&id)),
        }
    }
});
