use crate::PokemonType;
use serde::{Deserialize, Serialize};
use std::fmt;
use strum::{EnumIter, IntoStaticStr};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveCategory {
    Physical,
    Special,
    Status,
}

impl fmt::Display for MoveCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveCategory::Physical => write!(f, "Physical"),
            MoveCategory::Special => write!(f, "Special"),
            MoveCategory::Status => write!(f, "Status"),
        }
    }
}

/// Stats that carry an in-battle stage counter.
///
/// The snake_case names are the ones written to the event log.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter, IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum StatType {
    Atk,
    Def,
    SpAtk,
    SpDef,
    Speed,
    Accuracy,
    Evasion,
    CriticalHit,
}

impl StatType {
    pub fn name(self) -> &'static str {
        self.into()
    }

    /// Inclusive stage bounds for this counter.
    pub fn stage_bounds(self) -> (i8, i8) {
        match self {
            StatType::CriticalHit => (0, 3),
            _ => (-6, 6),
        }
    }
}

impl fmt::Display for StatType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which stat a move modifier touches. `Random` is resolved when the move lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatChoice {
    Stat(StatType),
    Random,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatModifier {
    pub stat: StatChoice,
    pub change_by: i8,
    #[serde(default)]
    pub affects_user: bool,
}

/// The non-volatile afflictions a pokemon can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum StatusType {
    Poison,
    Burn,
    Freeze,
    Paralysis,
    BadlyPoisoned,
    Sleep,
}

impl StatusType {
    pub fn name(self) -> &'static str {
        self.into()
    }
}

impl fmt::Display for StatusType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A secondary condition a move inflicts on its target with `probability` percent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEffect {
    pub condition: StatusType,
    pub probability: u8,
}

/// The targeting shape a move declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveTarget {
    /// The user itself.
    User,
    /// One adjacent foe or ally.
    TargetAdjacentSingle,
    /// One adjacent ally.
    TargetAdjacentUserSingle,
    /// The user or one adjacent ally.
    TargetUserOrAdjacentUser,
    /// One adjacent foe. Struggle uses this shape.
    AdjacentFoeSingle,
    /// Every position on the user's side.
    AllUsers,
    /// Every adjacent foe and ally.
    AllAdjacent,
    /// Every adjacent foe.
    AdjacentFoesAll,
    /// Every position on the foe sides.
    AllFoes,
    /// Every position except the user's own.
    AllExceptUser,
    /// Every position on the field.
    All,
}

impl MoveTarget {
    /// True when the shape resolves to one compound target instead of a choice of singles.
    pub fn is_compound(self) -> bool {
        matches!(
            self,
            MoveTarget::AllUsers
                | MoveTarget::AllAdjacent
                | MoveTarget::AdjacentFoesAll
                | MoveTarget::AllFoes
                | MoveTarget::AllExceptUser
                | MoveTarget::All
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveData {
    pub name: String,
    pub move_type: PokemonType,
    pub category: MoveCategory,
    #[serde(default)]
    pub power: u16,
    /// `None` never misses.
    #[serde(default)]
    pub accuracy: Option<u8>,
    pub pp: u8,
    #[serde(default)]
    pub priority: i8,
    pub target: MoveTarget,
    #[serde(default)]
    pub stat_modifiers: Vec<StatModifier>,
    #[serde(default)]
    pub status_conditions: Vec<StatusEffect>,
}

impl MoveData {
    pub const STRUGGLE: &'static str = "Struggle";

    /// Fallback record used when a catalog does not define Struggle itself.
    pub fn struggle() -> Self {
        MoveData {
            name: Self::STRUGGLE.to_string(),
            move_type: PokemonType::Normal,
            category: MoveCategory::Physical,
            power: 50,
            accuracy: None,
            pp: 1,
            priority: 0,
            target: MoveTarget::AdjacentFoeSingle,
            stat_modifiers: Vec::new(),
            status_conditions: Vec::new(),
        }
    }
}
