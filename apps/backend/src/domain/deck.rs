//! Shuffled deck with automatic low-water reshuffle.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::domain::cards::{full_deck, Card};

/// An ordered, shuffled sequence of 52 unique cards, owned by exactly one
/// room table.
///
/// `draw` never fails: once the remaining length is at or under the
/// reshuffle threshold the deck is rebuilt to a full shuffled 52 before
/// the card comes off the top.
#[derive(Debug)]
pub struct Deck {
    cards: Vec<Card>,
    reshuffle_threshold: usize,
}

impl Deck {
    pub fn new(reshuffle_threshold: usize, rng: &mut StdRng) -> Self {
        let mut deck = Self {
            cards: Vec::new(),
            reshuffle_threshold,
        };
        deck.rebuild(rng);
        deck
    }

    /// Rebuild to a full 52-card deck and shuffle.
    pub fn rebuild(&mut self, rng: &mut StdRng) {
        self.cards = full_deck();
        self.cards.shuffle(rng);
    }

    /// Remove and return the top card, reshuffling first if the deck has
    /// run low.
    pub fn draw(&mut self, rng: &mut StdRng) -> Card {
        if self.cards.len() <= self.reshuffle_threshold {
            self.rebuild(rng);
        }
        // The rebuild above guarantees at least 52 - threshold cards.
        self.cards.pop().expect("deck cannot be empty after rebuild")
    }

    /// The card that the next `draw` would return, assuming no reshuffle
    /// intervenes. Used by the dealer's five-card peek rule.
    pub fn peek(&self) -> Option<Card> {
        self.cards.last().copied()
    }

    pub fn remaining(&self) -> usize {
        self.cards.len()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::SeedableRng;

    use super::*;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn draws_are_unique_until_reshuffle() {
        let mut rng = rng();
        let mut deck = Deck::new(10, &mut rng);
        let mut seen = HashSet::new();
        // 42 draws leave exactly the threshold; all must be distinct.
        for _ in 0..42 {
            assert!(seen.insert(deck.draw(&mut rng)));
        }
        assert_eq!(deck.remaining(), 10);
    }

    #[test]
    fn reshuffles_at_threshold_and_never_underflows() {
        let mut rng = rng();
        let mut deck = Deck::new(10, &mut rng);
        for _ in 0..42 {
            deck.draw(&mut rng);
        }
        assert_eq!(deck.remaining(), 10);
        // Next draw hits the threshold: deck rebuilds to 52 then pops one.
        deck.draw(&mut rng);
        assert_eq!(deck.remaining(), 51);
    }

    #[test]
    fn draw_never_fails_over_long_runs() {
        let mut rng = rng();
        let mut deck = Deck::new(10, &mut rng);
        for _ in 0..1000 {
            deck.draw(&mut rng);
            assert!(deck.remaining() > 0);
        }
    }
}
