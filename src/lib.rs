//! Pokemon Arena Battle Engine
//!
//! A simultaneous-turn battle engine for any number of sides, each fielding
//! one or more pokemon per trainer. Trainers submit actions, the engine
//! orders and resolves them, and everything that happens is reported as a
//! flat event log.

// --- MODULE DECLARATIONS ---
pub mod battle;
pub mod catalog;
pub mod errors;
pub mod growth;
pub mod player;
pub mod pokemon;

// --- PUBLIC API RE-EXPORTS ---

// --- From the `schema` crate ---
pub use schema::{
    BaseStats, ItemData, ItemEffect, MoveCategory, MoveData, MoveTarget, Nature, PokemonSpecies,
    PokemonType, Stat, StatType, StatusType,
};

// --- From this crate's modules (`src/`) ---

// Battle driving and state.
pub use battle::action_stack::{Action, QueuedAction, Target};
pub use battle::arena::{PokemonRef, Side, SlotRef, TrainerId};
pub use battle::engine::Battle;
pub use battle::options::BattleOptions;
pub use battle::rng::{BattleRng, ScriptedRng, SeededRng};
pub use battle::state::{BattleEvent, EventLog, LogValue};
pub use battle::turn_orchestrator::Turn;

// Runtime types.
pub use battle::conditions::StatusCondition;
pub use growth::GrowthEvent;
pub use player::Trainer;
pub use pokemon::{Pokemon, PokemonBuilder};

// Static data access.
pub use catalog::{Catalog, StandardStatFormula, StatFormula, StaticCatalog};

// Crate-specific error and result types.
pub use errors::{
    ActionError, BattleEngineError, BattleResult, BattleStateError, CatalogError, CatalogResult,
};
