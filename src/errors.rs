use thiserror::Error;

/// Main error type for the arena battle engine
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BattleEngineError {
    /// Error related to catalog lookups or catalog parsing
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),
    /// Error related to invalid battle state
    #[error("Battle state error: {0}")]
    BattleState(#[from] BattleStateError),
    /// Error related to an action the engine could not carry out
    #[error("Action error: {0}")]
    Action(#[from] ActionError),
}

/// Errors related to catalog data
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("Species not found: {0}")]
    SpeciesNotFound(String),
    #[error("Move not found: {0}")]
    MoveNotFound(String),
    #[error("Nature not found: {0}")]
    NatureNotFound(String),
    #[error("Item not found: {0}")]
    ItemNotFound(String),
    /// Catalog data is malformed or incomplete
    #[error("Malformed catalog data: {0}")]
    MalformedData(String),
}

/// Errors related to battle state validation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BattleStateError {
    #[error("A battle needs at least two sides, got {0}")]
    NotEnoughSides(usize),
    #[error("No trainer at side {side}, index {index}")]
    UnknownTrainer { side: usize, index: usize },
    #[error("Trainer {trainer} has no team member at index {team_index}")]
    UnknownPokemon { trainer: String, team_index: usize },
    #[error("Side {0} has no free position")]
    NoFreePosition(usize),
    /// A growth-event chain did not settle within the configured depth
    #[error("Growth event chain exceeded depth {0}")]
    GrowthChainTooDeep(usize),
    #[error("Malformed battle options: {0}")]
    MalformedOptions(String),
}

/// Errors related to executing actions
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    /// A submitted item sub-choice does not match the item's growth-event chain
    #[error("Invalid sub-choice {choice:?} while using {item}")]
    InvalidItemActions { item: String, choice: String },
    #[error("Option {0:?} is not offered by the pending growth event")]
    InvalidGrowthOption(String),
    #[error("No pending growth event")]
    NoPendingGrowthEvent,
}

/// Type alias for Results that can fail with BattleEngineError
pub type BattleResult<T> = Result<T, BattleEngineError>;

/// Type alias for catalog lookups
pub type CatalogResult<T> = Result<T, CatalogError>;
