use crate::errors::{BattleResult, BattleStateError};
use serde::{Deserialize, Serialize};

/// Per-battle settings. Every field has a default, so a RON document only
/// names what it changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BattleOptions {
    /// Positions each trainer fills.
    pub pokemon_per_trainer: usize,
    /// Seed for the default random source. `None` draws a fresh one.
    pub seed: Option<u64>,
    pub max_growth_chain_depth: usize,
}

impl Default for BattleOptions {
    fn default() -> Self {
        BattleOptions {
            pokemon_per_trainer: 1,
            seed: None,
            max_growth_chain_depth: 16,
        }
    }
}

impl BattleOptions {
    pub fn from_ron_str(source: &str) -> BattleResult<Self> {
        let options: BattleOptions = ron::from_str(source)
            .map_err(|err| BattleStateError::MalformedOptions(err.to_string()))?;
        if options.pokemon_per_trainer == 0 {
            return Err(
                BattleStateError::MalformedOptions("pokemon_per_trainer must be positive".into())
                    .into(),
            );
        }
        Ok(options)
    }
}
