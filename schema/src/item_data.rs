use crate::StatusType;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemEffect {
    RestoreHp(u16),
    /// Restores PP on one move the trainer picks.
    RestorePp(u8),
    CureStatus(StatusType),
    GainLevel,
    /// Triggers any evolution keyed on this item's name.
    EvolutionStone,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemData {
    pub name: String,
    pub effect: ItemEffect,
}
