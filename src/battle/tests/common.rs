use std::sync::Arc;

use crate::battle::arena::TrainerId;
use crate::battle::conditions::StatusCondition;
use crate::battle::engine::Battle;
use crate::battle::options::BattleOptions;
use crate::battle::rng::{BattleRng, ScriptedRng};
use crate::battle::state::BattleEvent;
use crate::catalog::StaticCatalog;
use crate::errors::BattleResult;
use crate::player::Trainer;
use crate::pokemon::{Pokemon, PokemonBuilder};

/// The builtin catalog every test battle uses.
pub fn test_catalog() -> Arc<StaticCatalog> {
    match StaticCatalog::builtin() {
        Ok(catalog) => Arc::new(catalog),
        Err(err) => panic!("Failed to load builtin catalog: {}", err),
    }
}

/// A builder for creating test Pokemon instances with common defaults.
///
/// # Example
/// ```ignore
/// let pokemon = TestPokemonBuilder::new("Pikachu", 25)
///     .with_moves(vec!["Thunder Shock"])
///     .with_status(StatusCondition::Paralysis)
///     .build();
/// ```
pub struct TestPokemonBuilder {
    builder: PokemonBuilder,
    species: String,
}

impl TestPokemonBuilder {
    /// Creates a new builder for a given species and level.
    pub fn new(species: &str, level: u8) -> Self {
        Self {
            builder: PokemonBuilder::new(species, level),
            species: species.to_string(),
        }
    }

    /// Sets the moves for the test Pokemon.
    pub fn with_moves(mut self, moves: Vec<&str>) -> Self {
        self.builder = self.builder.moves(&moves);
        self
    }

    /// Sets the status condition for the test Pokemon.
    pub fn with_status(mut self, status: StatusCondition) -> Self {
        self.builder = self.builder.status(status);
        self
    }

    /// Sets the current HP for the test Pokemon. If not set, HP will be max.
    pub fn with_hp(mut self, hp: u16) -> Self {
        self.builder = self.builder.hp(hp);
        self
    }

    pub fn with_pp(mut self, move_name: &str, pp: u8) -> Self {
        self.builder = self.builder.pp(move_name, pp);
        self
    }

    pub fn with_nickname(mut self, nickname: &str) -> Self {
        self.builder = self.builder.nickname(nickname);
        self
    }

    /// Builds the `Pokemon` against [`test_catalog`].
    pub fn build(self) -> Pokemon {
        let catalog = test_catalog();
        match self.builder.build(catalog.as_ref()) {
            Ok(pokemon) => pokemon,
            Err(err) => panic!("Failed to build test pokemon {}: {}", self.species, err),
        }
    }
}

/// A boxed RNG that replays `outcomes` in order.
pub fn scripted_rng(outcomes: Vec<u32>) -> Box<dyn BattleRng> {
    Box::new(ScriptedRng::new(outcomes))
}

/// Creates a test trainer without items.
pub fn create_test_trainer(name: &str, team: Vec<Pokemon>) -> Trainer {
    Trainer::new(name, team)
}

/// Creates an unstarted battle from trainers grouped by side, drawing from
/// a scripted RNG.
pub fn create_test_battle(
    sides: Vec<Vec<Trainer>>,
    pokemon_per_trainer: usize,
    outcomes: Vec<u32>,
) -> Battle {
    let options = BattleOptions {
        pokemon_per_trainer,
        ..BattleOptions::default()
    };
    assert_ok(Battle::with_rng(
        sides,
        test_catalog(),
        options,
        scripted_rng(outcomes),
    ))
}

/// Standard 1v1: Ash on side 0 against Misty on side 1, already started.
pub fn started_battle(ash: Vec<Pokemon>, misty: Vec<Pokemon>, outcomes: Vec<u32>) -> Battle {
    let mut battle = create_test_battle(
        vec![
            vec![create_test_trainer("Ash", ash)],
            vec![create_test_trainer("Misty", misty)],
        ],
        1,
        outcomes,
    );
    assert_ok_true(battle.continue_battle());
    battle
}

pub const ASH: TrainerId = TrainerId { side: 0, index: 0 };
pub const MISTY: TrainerId = TrainerId { side: 1, index: 0 };

/// Events of the last closed segment as `kind arg arg...` lines.
pub fn last_segment_lines(battle: &Battle) -> Vec<String> {
    battle
        .log()
        .last_segment()
        .unwrap_or_default()
        .iter()
        .map(BattleEvent::to_string)
        .collect()
}

/// Helper function to assert that a Result is Ok and return the value.
/// Provides clear error messages in tests when functions unexpectedly fail.
pub fn assert_ok<T>(result: BattleResult<T>) -> T {
    match result {
        Ok(value) => value,
        Err(err) => panic!("Expected Ok but got error: {}", err),
    }
}

/// Helper function to assert that a boolean Result is Ok and true.
pub fn assert_ok_true(result: BattleResult<bool>) -> bool {
    let value = assert_ok(result);
    assert!(value, "Expected true but got false");
    value
}

/// Helper function to assert that a boolean Result is Ok and false.
pub fn assert_ok_false(result: BattleResult<bool>) -> bool {
    let value = assert_ok(result);
    assert!(!value, "Expected false but got true");
    value
}
