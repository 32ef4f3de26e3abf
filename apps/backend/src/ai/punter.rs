//! Punter — the second automation tier.
//!
//! Always hits below 12. Between 12 and 16 it hits into a strong dealer
//! upcard (7 or better); against a weak upcard it mostly stands but hits
//! anyway three times in ten, modelling imperfect play. Wagers are small
//! random amounts.

use rand::{Rng, RngCore};

use crate::ai::trait_def::{Action, Strategy, TableView};

/// Probability of hitting a stiff hand into a weak dealer card.
const MISPLAY_HIT_CHANCE: f64 = 0.3;

#[derive(Debug, Default, Clone, Copy)]
pub struct Punter;

impl Punter {
    pub const NAME: &'static str = "Punter";
}

impl Strategy for Punter {
    fn decide(&self, view: &TableView, rng: &mut dyn RngCore) -> Action {
        if view.score < 12 {
            Action::Hit
        } else if view.score < 17 {
            if view.dealer_upcard >= 7 {
                Action::Hit
            } else if rng.random_bool(MISPLAY_HIT_CHANCE) {
                Action::Hit
            } else {
                Action::Stand
            }
        } else {
            Action::Stand
        }
    }

    fn wager(&self, funds: u32, minimum: u32, rng: &mut dyn RngCore) -> u32 {
        let cap = 300.min(funds).max(minimum);
        if cap <= minimum {
            minimum
        } else {
            rng.random_range(minimum..=cap)
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    fn view(score: u32, dealer_upcard: u32) -> TableView {
        TableView {
            score,
            cards_held: 2,
            dealer_upcard,
            funds: 1000,
            wager: 100,
        }
    }

    #[test]
    fn always_hits_below_twelve() {
        let mut rng = StdRng::seed_from_u64(1);
        for score in 4..12 {
            assert_eq!(Punter.decide(&view(score, 2), &mut rng), Action::Hit);
        }
    }

    #[test]
    fn hits_stiff_hands_into_a_strong_upcard() {
        let mut rng = StdRng::seed_from_u64(1);
        for score in 12..17 {
            assert_eq!(Punter.decide(&view(score, 7), &mut rng), Action::Hit);
            assert_eq!(Punter.decide(&view(score, 10), &mut rng), Action::Hit);
        }
    }

    #[test]
    fn mostly_stands_against_a_weak_upcard() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut stands = 0;
        let mut hits = 0;
        for _ in 0..100 {
            match Punter.decide(&view(14, 5), &mut rng) {
                Action::Stand => stands += 1,
                Action::Hit => hits += 1,
                Action::Double => panic!("punter never doubles"),
            }
        }
        assert!(stands > hits, "expected mostly stands, got {stands}/{hits}");
        assert!(hits > 0, "imperfection never fired across 100 trials");
    }

    #[test]
    fn wagers_stay_within_bounds() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..50 {
            let wager = Punter.wager(1000, 100, &mut rng);
            assert!((100..=300).contains(&wager));
        }
        // Short stack: capped by funds.
        for _ in 0..50 {
            let wager = Punter.wager(150, 100, &mut rng);
            assert!((100..=150).contains(&wager));
        }
        // Funds below minimum collapse to the minimum; the table-side
        // clamp turns that into an all-in.
        assert_eq!(Punter.wager(40, 100, &mut rng), 100);
    }
}
