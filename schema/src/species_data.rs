use crate::PokemonType;
use serde::{Deserialize, Serialize};
use strum::EnumIter;

/// The six permanent stats produced by the stat formula.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter)]
pub enum Stat {
    Hp,
    Atk,
    Def,
    SpAtk,
    SpDef,
    Speed,
}

impl Stat {
    pub fn index(self) -> usize {
        match self {
            Stat::Hp => 0,
            Stat::Atk => 1,
            Stat::Def => 2,
            Stat::SpAtk => 3,
            Stat::SpDef => 4,
            Stat::Speed => 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseStats {
    pub hp: u8,
    pub atk: u8,
    pub def: u8,
    pub sp_atk: u8,
    pub sp_def: u8,
    pub speed: u8,
}

impl BaseStats {
    pub fn get(&self, stat: Stat) -> u8 {
        match stat {
            Stat::Hp => self.hp,
            Stat::Atk => self.atk,
            Stat::Def => self.def,
            Stat::SpAtk => self.sp_atk,
            Stat::SpDef => self.sp_def,
            Stat::Speed => self.speed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelMove {
    pub level: u8,
    pub move_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EvolutionMethod {
    Level(u8),
    Item(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvolutionData {
    pub into: String,
    pub method: EvolutionMethod,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PokemonSpecies {
    pub name: String,
    pub types: Vec<PokemonType>,
    pub base_stats: BaseStats,
    #[serde(default)]
    pub learnset: Vec<LevelMove>,
    #[serde(default)]
    pub evolution: Option<EvolutionData>,
}

impl PokemonSpecies {
    /// Names of moves learned exactly at `level`, in learnset order.
    pub fn moves_learned_at(&self, level: u8) -> impl Iterator<Item = &str> {
        self.learnset
            .iter()
            .filter(move |entry| entry.level == level)
            .map(|entry| entry.move_name.as_str())
    }

    /// The species this one evolves into once `level` is reached, if any.
    pub fn level_evolution(&self, level: u8) -> Option<&str> {
        match &self.evolution {
            Some(EvolutionData {
                into,
                method: EvolutionMethod::Level(required),
            }) if level >= *required => Some(into.as_str()),
            _ => None,
        }
    }

    /// The species this one evolves into when exposed to `item`, if any.
    pub fn item_evolution(&self, item: &str) -> Option<&str> {
        match &self.evolution {
            Some(EvolutionData {
                into,
                method: EvolutionMethod::Item(required),
            }) if required == item => Some(into.as_str()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Nature {
    pub name: String,
    #[serde(default)]
    pub increased_stat: Option<Stat>,
    #[serde(default)]
    pub decreased_stat: Option<Stat>,
}

impl Nature {
    /// Multiplier the nature applies to a non-HP stat.
    pub fn factor(&self, stat: Stat) -> f64 {
        if self.increased_stat == self.decreased_stat {
            1.0
        } else if self.increased_stat == Some(stat) {
            1.1
        } else if self.decreased_stat == Some(stat) {
            0.9
        } else {
            1.0
        }
    }
}
