//! Round settlement: hand classification, precedence and payouts.
//!
//! Precedence is a total order: Five Dragon > natural blackjack > high
//! score > dealer bust > push. A five-card dealer hand at 21 or under is
//! a Five Dragon even when its raw score is lower than a non-dragon
//! player hand; two Five Dragons compare raw scores and equal scores
//! push. A busted hand is never a Five Dragon.

use crate::domain::cards::Card;
use crate::domain::hand;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandClass {
    Busted,
    FiveDragon,
    Natural,
    Standing,
}

/// Classify a finished hand for settlement.
pub fn classify(cards: &[Card]) -> HandClass {
    if hand::is_busted(cards) {
        HandClass::Busted
    } else if hand::is_five_dragon(cards) {
        HandClass::FiveDragon
    } else if hand::is_natural(cards) {
        HandClass::Natural
    } else {
        HandClass::Standing
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Win,
    Push,
    Lose,
}

/// Resolve one seat against the dealer.
pub fn resolve(
    player: HandClass,
    player_score: u32,
    dealer: HandClass,
    dealer_score: u32,
) -> Outcome {
    use HandClass::*;

    match (player, dealer) {
        (Busted, _) => Outcome::Lose,
        (FiveDragon, FiveDragon) => match player_score.cmp(&dealer_score) {
            std::cmp::Ordering::Greater => Outcome::Win,
            std::cmp::Ordering::Less => Outcome::Lose,
            std::cmp::Ordering::Equal => Outcome::Push,
        },
        (FiveDragon, _) => Outcome::Win,
        (_, FiveDragon) => Outcome::Lose,
        (Natural, Natural) => Outcome::Push,
        (Natural, _) => Outcome::Win,
        (_, Natural) => Outcome::Lose,
        (_, Busted) => Outcome::Win,
        _ => match player_score.cmp(&dealer_score) {
            std::cmp::Ordering::Greater => Outcome::Win,
            std::cmp::Ordering::Less => Outcome::Lose,
            std::cmp::Ordering::Equal => Outcome::Push,
        },
    }
}

/// Amount credited back to the seat for its wager.
///
/// The wager was already deducted at placement, so a push credits the
/// wager itself, a plain win credits double, a natural credits 3:2
/// (floored) and a Five Dragon credits 2:1.
pub fn credit(outcome: Outcome, class: HandClass, wager: u32) -> u32 {
    match outcome {
        Outcome::Lose => 0,
        Outcome::Push => wager,
        Outcome::Win => match class {
            HandClass::FiveDragon => wager * 3,
            HandClass::Natural => wager * 5 / 2,
            _ => wager * 2,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn precedence_dragon_beats_natural() {
        let outcome = resolve(HandClass::FiveDragon, 18, HandClass::Natural, 21);
        assert_eq!(outcome, Outcome::Win);
        let outcome = resolve(HandClass::Natural, 21, HandClass::FiveDragon, 18);
        assert_eq!(outcome, Outcome::Lose);
    }

    #[test]
    fn dragons_compare_scores() {
        assert_eq!(
            resolve(HandClass::FiveDragon, 20, HandClass::FiveDragon, 18),
            Outcome::Win
        );
        assert_eq!(
            resolve(HandClass::FiveDragon, 17, HandClass::FiveDragon, 18),
            Outcome::Lose
        );
        assert_eq!(
            resolve(HandClass::FiveDragon, 18, HandClass::FiveDragon, 18),
            Outcome::Push
        );
    }

    #[test]
    fn naturals_push_each_other() {
        assert_eq!(
            resolve(HandClass::Natural, 21, HandClass::Natural, 21),
            Outcome::Push
        );
    }

    #[test]
    fn dealer_bust_pays_standing_hands() {
        assert_eq!(
            resolve(HandClass::Standing, 13, HandClass::Busted, 25),
            Outcome::Win
        );
        // A busted player loses even when the dealer busts too.
        assert_eq!(
            resolve(HandClass::Busted, 25, HandClass::Busted, 23),
            Outcome::Lose
        );
    }

    #[test]
    fn score_comparison_falls_through() {
        assert_eq!(
            resolve(HandClass::Standing, 20, HandClass::Standing, 19),
            Outcome::Win
        );
        assert_eq!(
            resolve(HandClass::Standing, 17, HandClass::Standing, 19),
            Outcome::Lose
        );
        assert_eq!(
            resolve(HandClass::Standing, 19, HandClass::Standing, 19),
            Outcome::Push
        );
    }

    #[test]
    fn natural_credit_is_three_to_two_floored() {
        assert_eq!(credit(Outcome::Win, HandClass::Natural, 100), 250);
        assert_eq!(credit(Outcome::Win, HandClass::Natural, 101), 252);
        assert_eq!(credit(Outcome::Win, HandClass::FiveDragon, 100), 300);
        assert_eq!(credit(Outcome::Win, HandClass::Standing, 100), 200);
        assert_eq!(credit(Outcome::Push, HandClass::Natural, 100), 100);
        assert_eq!(credit(Outcome::Lose, HandClass::Standing, 100), 0);
    }
}
