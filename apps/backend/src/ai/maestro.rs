//! Maestro — the top automation tier.
//!
//! Full basic-strategy bands against the dealer's upcard:
//! - 11 or less: always hit.
//! - 12: hit against 2, 3 or 7+, stand against 4-6.
//! - 13-16: hit against 7+, stand otherwise.
//! - 17+: stand.
//!
//! With exactly two cards totalling 9-11 and funds to match the wager it
//! usually doubles down instead. Wagers are proportional randomized
//! slices of the bankroll.

use rand::{Rng, RngCore};

use crate::ai::trait_def::{Action, Strategy, TableView};

/// Chance of doubling a 9-11 when the bankroll allows it.
const DOUBLE_DOWN_CHANCE: f64 = 0.8;

#[derive(Debug, Default, Clone, Copy)]
pub struct Maestro;

impl Maestro {
    pub const NAME: &'static str = "Maestro";
}

impl Strategy for Maestro {
    fn decide(&self, view: &TableView, rng: &mut dyn RngCore) -> Action {
        if (9..=11).contains(&view.score)
            && view.cards_held == 2
            && view.funds >= view.wager
            && rng.random_bool(DOUBLE_DOWN_CHANCE)
        {
            return Action::Double;
        }

        if view.score <= 11 {
            Action::Hit
        } else if view.score == 12 {
            if matches!(view.dealer_upcard, 2 | 3) || view.dealer_upcard >= 7 {
                Action::Hit
            } else {
                Action::Stand
            }
        } else if view.score <= 16 {
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
        let base = (funds / 10).max(minimum);
        let cap = 600.min(funds * 3 / 10).max(base);
        if cap <= base {
            base
        } else {
            rng.random_range(base..=cap)
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    fn view(score: u32, dealer_upcard: u32, cards_held: usize) -> TableView {
        TableView {
            score,
            cards_held,
            dealer_upcard,
            funds: 1000,
            wager: 100,
        }
    }

    #[test]
    fn twelve_hits_twos_threes_and_sevens_up() {
        let mut rng = StdRng::seed_from_u64(1);
        // Three cards, so the double-down branch stays out of the way.
        assert_eq!(Maestro.decide(&view(12, 2, 3), &mut rng), Action::Hit);
        assert_eq!(Maestro.decide(&view(12, 3, 3), &mut rng), Action::Hit);
        assert_eq!(Maestro.decide(&view(12, 4, 3), &mut rng), Action::Stand);
        assert_eq!(Maestro.decide(&view(12, 6, 3), &mut rng), Action::Stand);
        assert_eq!(Maestro.decide(&view(12, 7, 3), &mut rng), Action::Hit);
    }

    #[test]
    fn thirteen_to_sixteen_follow_the_upcard() {
        let mut rng = StdRng::seed_from_u64(1);
        for score in 13..=16 {
            assert_eq!(Maestro.decide(&view(score, 7, 3), &mut rng), Action::Hit);
            assert_eq!(Maestro.decide(&view(score, 6, 3), &mut rng), Action::Stand);
        }
        assert_eq!(Maestro.decide(&view(17, 10, 3), &mut rng), Action::Stand);
    }

    #[test]
    fn doubles_most_nine_to_elevens_with_two_cards() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut doubles = 0;
        for _ in 0..100 {
            if Maestro.decide(&view(10, 6, 2), &mut rng) == Action::Double {
                doubles += 1;
            }
        }
        assert!(doubles > 50, "expected frequent doubles, got {doubles}");
    }

    #[test]
    fn never_doubles_without_matching_funds() {
        let mut rng = StdRng::seed_from_u64(11);
        let broke = TableView {
            score: 10,
            cards_held: 2,
            dealer_upcard: 6,
            funds: 50,
            wager: 100,
        };
        for _ in 0..100 {
            assert_ne!(Maestro.decide(&broke, &mut rng), Action::Double);
        }
    }

    #[test]
    fn wagers_are_funds_proportional() {
        let mut rng = StdRng::seed_from_u64(2);
        for _ in 0..50 {
            let wager = Maestro.wager(2000, 100, &mut rng);
            assert!((200..=600).contains(&wager), "got {wager}");
        }
    }
}
