//! Elo rating updates

use crate::core::Side;

pub const INITIAL_RATING: f64 = 1500.0;
pub const K_FACTOR: f64 = 32.0;

/// Probability that a player rated `rating` beats one rated `opponent`
pub fn expected_score(rating: f64, opponent: f64) -> f64 {
    1.0 / (1.0 + 10f64.powf((opponent - rating) / 400.0))
}

/// Rating change for p1 after a battle; p2 moves by the negation.
/// Draws leave both ratings unchanged.
pub fn rating_delta(p1: f64, p2: f64, winner: Option<Side>) -> f64 {
    let expected = expected_score(p1, p2);
    match winner {
        Some(Side::P1) => K_FACTOR * (1.0 - expected),
        Some(Side::P2) => -K_FACTOR * expected,
        None => 0.0,
    }
}

/// Apply one result in place
pub fn update(p1: &mut f64, p2: &mut f64, winner: Option<Side>) {
    let delta = rating_delta(*p1, *p2, winner);
    *p1 += delta;
    *p2 -= delta;
}
