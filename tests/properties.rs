use glicko2_period::{InternalRating, RatingPeriod, RatingSystem, Score, VolatilityObjective};
use proptest::prelude::*;

fn internal_rating() -> impl Strategy<Value = InternalRating> {
    (-3.0..3.0f64, 0.05..2.0f64, 0.01..0.2f64).prop_map(|(rating, deviation, volatility)| {
        InternalRating {
            rating,
            deviation,
            volatility,
        }
    })
}

fn score() -> impl Strategy<Value = Score> {
    prop_oneof![Just(Score::Loss), Just(Score::Draw), Just(Score::Win)]
}

fn rate_pair(
    first: InternalRating,
    second: InternalRating,
    score: Score,
    tau: f64,
) -> (InternalRating, InternalRating) {
    let mut period = RatingPeriod::new(tau).unwrap();
    let a = period.add_player(0, first).unwrap();
    let b = period.add_player(1, second).unwrap();
    period.add_match(a, b, score).unwrap();
    period.calculate().unwrap();
    (
        *period.player(a).unwrap().current(),
        *period.player(b).unwrap().current(),
    )
}

proptest! {
    #[test]
    fn role_swap_gives_same_ratings(
        first in internal_rating(),
        second in internal_rating(),
        score in score(),
        tau in 0.3..1.2f64,
    ) {
        let (a, b) = rate_pair(first, second, score, tau);
        let (b_swapped, a_swapped) = rate_pair(second, first, score.opposite(), tau);
        prop_assert_eq!(a, a_swapped);
        prop_assert_eq!(b, b_swapped);
    }

    #[test]
    fn draw_between_equals_keeps_rating(pre in internal_rating(), tau in 0.3..1.2f64) {
        let (a, b) = rate_pair(pre, pre, Score::Draw, tau);
        prop_assert_eq!(a, b);
        prop_assert_eq!(a.rating, pre.rating);
    }

    #[test]
    fn ratings_stay_finite(
        first in internal_rating(),
        second in internal_rating(),
        score in score(),
        tau in 0.3..1.2f64,
    ) {
        let (a, b) = rate_pair(first, second, score, tau);
        for rated in [a, b] {
            prop_assert!(rated.rating.is_finite());
            prop_assert!(rated.deviation.is_finite() && rated.deviation > 0.0);
            prop_assert!(rated.volatility.is_finite() && rated.volatility > 0.0);
        }
    }

    #[test]
    fn idle_player_only_gains_deviation(pre in internal_rating(), tau in 0.3..1.2f64) {
        let mut period = RatingPeriod::new(tau).unwrap();
        let id = period.add_player((), pre).unwrap();
        period.calculate().unwrap();
        let post = *period.player(id).unwrap().post().unwrap();
        prop_assert_eq!(post.rating, pre.rating);
        prop_assert_eq!(post.volatility, pre.volatility);
        prop_assert!(post.deviation > pre.deviation);
    }

    #[test]
    fn volatility_is_a_root(
        delta in -4.0..4.0f64,
        deviation in 0.05..2.0f64,
        volatility in 0.01..0.2f64,
        variance in 0.1..20.0f64,
        tau in 0.3..1.2f64,
    ) {
        let objective = VolatilityObjective::new(delta, deviation, volatility, variance, tau);
        let solved = objective.solve(&RatingSystem::default()).unwrap();
        prop_assert!(solved > 0.0);
        let residual = objective.eval((solved * solved).ln());
        prop_assert!(residual.abs() < 1e-4, "residual {}", residual);
    }
}
