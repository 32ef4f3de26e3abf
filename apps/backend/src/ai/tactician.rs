//! Tactician — the third automation tier.
//!
//! Plays the same stiff-hand table as the Punter but with no randomness:
//! identical inputs always produce identical decisions. Wagers scale with
//! the bankroll.

use rand::{Rng, RngCore};

use crate::ai::trait_def::{Action, Strategy, TableView};

#[derive(Debug, Default, Clone, Copy)]
pub struct Tactician;

impl Tactician {
    pub const NAME: &'static str = "Tactician";
}

impl Strategy for Tactician {
    fn decide(&self, view: &TableView, _rng: &mut dyn RngCore) -> Action {
        if view.score < 12 {
            Action::Hit
        } else if view.score < 17 {
            if view.dealer_upcard >= 7 {
                Action::Hit
            } else {
                Action::Stand
            }
        } else {
            Action::Stand
        }
    }

    fn wager(&self, funds: u32, minimum: u32, rng: &mut dyn RngCore) -> u32 {
        // A fifth of the bankroll, capped, keeps the tier solvent longer
        // than the Punter's flat range.
        let cap = 500.min(funds / 5).max(minimum);
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
    fn decisions_are_deterministic() {
        let mut rng_a = StdRng::seed_from_u64(1);
        let mut rng_b = StdRng::seed_from_u64(999);
        for score in 4..=21 {
            for upcard in 2..=11 {
                let a = Tactician.decide(&view(score, upcard), &mut rng_a);
                let b = Tactician.decide(&view(score, upcard), &mut rng_b);
                assert_eq!(a, b, "score {score} vs upcard {upcard}");
            }
        }
    }

    #[test]
    fn follows_the_stiff_hand_table() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(Tactician.decide(&view(11, 5), &mut rng), Action::Hit);
        assert_eq!(Tactician.decide(&view(14, 7), &mut rng), Action::Hit);
        assert_eq!(Tactician.decide(&view(14, 6), &mut rng), Action::Stand);
        assert_eq!(Tactician.decide(&view(17, 10), &mut rng), Action::Stand);
    }

    #[test]
    fn wagers_scale_with_the_bankroll() {
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..50 {
            let wager = Tactician.wager(1000, 100, &mut rng);
            assert!((100..=200).contains(&wager));
        }
        for _ in 0..50 {
            let wager = Tactician.wager(5000, 100, &mut rng);
            assert!((100..=500).contains(&wager));
        }
    }
}
