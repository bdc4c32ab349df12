// Pokemon Arena Schema - catalog record definitions
// Species, moves, natures and items are read-only records looked up by name.
// The battle engine consumes them through its catalog interface and never
// mutates them.

pub use item_data::*;
pub use move_types::*;
pub use pokemon_types::*;
pub use species_data::*;

pub mod item_data;
pub mod move_types;
pub mod pokemon_types;
pub mod species_data;
