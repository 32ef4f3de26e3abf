//! Novice — the lowest automation tier.
//!
//! Hits below 17 and stands otherwise, ignoring the dealer's upcard
//! entirely, and always wagers the table minimum.

use rand::RngCore;

use crate::ai::trait_def::{Action, Strategy, TableView};

#[derive(Debug, Default, Clone, Copy)]
pub struct Novice;

impl Novice {
    pub const NAME: &'static str = "Novice";
}

impl Strategy for Novice {
    fn decide(&self, view: &TableView, _rng: &mut dyn RngCore) -> Action {
        if view.score < 17 {
            Action::Hit
        } else {
            Action::Stand
        }
    }

    fn wager(&self, _funds: u32, minimum: u32, _rng: &mut dyn RngCore) -> u32 {
        minimum
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    fn view(score: u32) -> TableView {
        TableView {
            score,
            cards_held: 2,
            dealer_upcard: 10,
            funds: 1000,
            wager: 100,
        }
    }

    #[test]
    fn hits_below_seventeen_stands_from_seventeen() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(Novice.decide(&view(16), &mut rng), Action::Hit);
        assert_eq!(Novice.decide(&view(17), &mut rng), Action::Stand);
        assert_eq!(Novice.decide(&view(20), &mut rng), Action::Stand);
    }

    #[test]
    fn always_wagers_the_minimum() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(Novice.wager(1000, 100, &mut rng), 100);
        assert_eq!(Novice.wager(250, 100, &mut rng), 100);
    }
}
