//! Hand scoring: ace-flexible best total and the derived predicates.

use crate::domain::cards::{Card, Rank};

/// Best blackjack total for a hand.
///
/// Face cards count 10, aces count 11 reduced to 1 one at a time while the
/// total exceeds 21. Deterministic, order-independent, no side effects.
/// An empty hand scores 0.
pub fn score(hand: &[Card]) -> u32 {
    let mut total = 0;
    let mut soft_aces = 0;
    for card in hand {
        total += card.rank.face_value();
        if card.rank == Rank::Ace {
            soft_aces += 1;
        }
    }
    while total > 21 && soft_aces > 0 {
        total -= 10;
        soft_aces -= 1;
    }
    total
}

/// Natural blackjack: exactly two cards totalling 21.
pub fn is_natural(hand: &[Card]) -> bool {
    hand.len() == 2 && score(hand) == 21
}

/// Five Dragon: five or more cards without busting. An automatic-win
/// variant rule that outranks a natural at settlement.
pub fn is_five_dragon(hand: &[Card]) -> bool {
    hand.len() >= 5 && score(hand) <= 21
}

/// Whether the hand is bust.
pub fn is_busted(hand: &[Card]) -> bool {
    score(hand) > 21
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::domain::cards::{full_deck, Suit};

    fn card(rank: Rank) -> Card {
        Card::new(Suit::Spades, rank)
    }

    #[test]
    fn empty_hand_scores_zero() {
        assert_eq!(score(&[]), 0);
    }

    #[test]
    fn lone_ace_scores_eleven() {
        assert_eq!(score(&[card(Rank::Ace)]), 11);
    }

    #[test]
    fn ace_drops_to_one_instead_of_busting() {
        // A + 9 = 20 soft; adding a king would bust at 30, so the ace drops.
        let hand = [card(Rank::Ace), card(Rank::Nine), card(Rank::King)];
        assert_eq!(score(&hand), 20);
    }

    #[test]
    fn multiple_aces_reduce_one_at_a_time() {
        let hand = [card(Rank::Ace), card(Rank::Ace), card(Rank::Nine)];
        assert_eq!(score(&hand), 21);
        let hand = [
            card(Rank::Ace),
            card(Rank::Ace),
            card(Rank::Ace),
            card(Rank::King),
        ];
        assert_eq!(score(&hand), 13);
    }

    #[test]
    fn natural_requires_exactly_two_cards() {
        assert!(is_natural(&[card(Rank::Ace), card(Rank::King)]));
        assert!(!is_natural(&[
            card(Rank::Seven),
            card(Rank::Seven),
            card(Rank::Seven)
        ]));
    }

    #[test]
    fn five_dragon_requires_five_cards_under_22() {
        let hand = [
            card(Rank::Two),
            card(Rank::Three),
            card(Rank::Four),
            card(Rank::Five),
            card(Rank::Six),
        ];
        assert_eq!(score(&hand), 20);
        assert!(is_five_dragon(&hand));

        let busted = [
            card(Rank::Nine),
            card(Rank::Eight),
            card(Rank::Seven),
            card(Rank::Six),
            card(Rank::Five),
        ];
        assert!(!is_five_dragon(&busted));
        assert!(is_busted(&busted));
    }

    proptest! {
        #[test]
        fn score_is_invariant_under_reordering(
            mut indices in proptest::collection::vec(0usize..52, 0..8)
        ) {
            let deck = full_deck();
            indices.dedup();
            let hand: Vec<Card> = indices.iter().map(|&i| deck[i]).collect();
            let forward = score(&hand);
            let mut reversed = hand.clone();
            reversed.reverse();
            prop_assert_eq!(forward, score(&reversed));
        }

        #[test]
        fn score_never_exceeds_21_while_a_soft_ace_remains(
            indices in proptest::collection::vec(0usize..52, 1..6)
        ) {
            let deck = full_deck();
            let hand: Vec<Card> = indices.iter().map(|&i| deck[i]).collect();
            let total = score(&hand);
            let hard_minimum: u32 = hand
                .iter()
                .map(|c| if c.rank == Rank::Ace { 1 } else { c.rank.face_value() })
                .sum();
            // The scorer only busts when even the all-hard reading busts.
            if total > 21 {
                prop_assert_eq!(total, hard_minimum);
            }
        }
    }
}
