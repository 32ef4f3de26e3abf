//! Difficulty registry for automated seats.
//!
//! 1) Implement `Strategy` for your type in its module.
//! 2) Add a `StrategyFactory` entry for its difficulty tier below.
//! 3) Keep ordering stable; avoid side effects in constructors.

use rand::seq::IndexedRandom;
use rand::RngCore;

use crate::ai::{Maestro, Novice, Punter, Strategy, Tactician};
use crate::domain::seat::Difficulty;

/// Factory definition binding a difficulty tier to its strategy.
pub struct StrategyFactory {
    pub difficulty: Difficulty,
    pub name: &'static str,
    /// Prefix for generated display names at this tier.
    pub name_prefix: &'static str,
    pub make: fn() -> Box<dyn Strategy>,
}

static STRATEGY_FACTORIES: &[StrategyFactory] = &[
    StrategyFactory {
        difficulty: Difficulty::Easy,
        name: Novice::NAME,
        name_prefix: "Beginner",
        make: make_novice,
    },
    StrategyFactory {
        difficulty: Difficulty::Medium,
        name: Punter::NAME,
        name_prefix: "Amateur",
        make: make_punter,
    },
    StrategyFactory {
        difficulty: Difficulty::Hard,
        name: Tactician::NAME,
        name_prefix: "Expert",
        make: make_tactician,
    },
    StrategyFactory {
        difficulty: Difficulty::Expert,
        name: Maestro::NAME,
        name_prefix: "Master",
        make: make_maestro,
    },
];

/// Name pool for generated automated-seat display names.
static SEAT_NAMES: &[&str] = &[
    "Alex", "Emma", "Jack", "Olivia", "James", "Alpha", "Beta", "Gamma", "Delta", "Epsilon",
    "Orange", "Lemon", "Apple", "Banana", "Grape",
];

/// Returns the statically registered strategy factories.
pub fn registered_strategies() -> &'static [StrategyFactory] {
    STRATEGY_FACTORIES
}

/// Finds the factory for a difficulty tier.
pub fn by_difficulty(difficulty: Difficulty) -> &'static StrategyFactory {
    STRATEGY_FACTORIES
        .iter()
        .find(|factory| factory.difficulty == difficulty)
        .expect("every difficulty tier is registered")
}

/// Construct the strategy for a difficulty tier.
pub fn strategy_for(difficulty: Difficulty) -> Box<dyn Strategy> {
    (by_difficulty(difficulty).make)()
}

/// Generate a display name like "Master-Emma" for a new automated seat.
pub fn friendly_seat_name(difficulty: Difficulty, rng: &mut dyn RngCore) -> String {
    let prefix = by_difficulty(difficulty).name_prefix;
    let name = SEAT_NAMES
        .choose(rng)
        .expect("seat name pool is not empty");
    format!("{prefix}-{name}")
}

fn make_novice() -> Box<dyn Strategy> {
    Box::new(Novice)
}

fn make_punter() -> Box<dyn Strategy> {
    Box::new(Punter)
}

fn make_tactician() -> Box<dyn Strategy> {
    Box::new(Tactician)
}

fn make_maestro() -> Box<dyn Strategy> {
    Box::new(Maestro)
}

#[cfg(test)]
mod registry_smoke {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn every_difficulty_is_registered() {
        assert_eq!(registered_strategies().len(), Difficulty::ALL.len());
        for difficulty in Difficulty::ALL {
            let factory = by_difficulty(difficulty);
            assert_eq!(factory.difficulty, difficulty);
            let _strategy: Box<dyn Strategy> = (factory.make)();
        }
    }

    #[test]
    fn friendly_names_carry_the_tier_prefix() {
        let mut rng = StdRng::seed_from_u64(1);
        let name = friendly_seat_name(Difficulty::Expert, &mut rng);
        assert!(name.starts_with("Master-"), "got {name}");
        let name = friendly_seat_name(Difficulty::Easy, &mut rng);
        assert!(name.starts_with("Beginner-"), "got {name}");
    }
}
