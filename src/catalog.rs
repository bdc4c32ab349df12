//! Read-only lookups the engine consumes: species, moves, natures, items,
//! the type chart and the stat formula.

use crate::errors::{CatalogError, CatalogResult};
use schema::{BaseStats, ItemData, MoveData, Nature, PokemonSpecies, PokemonType, Stat};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

const BUILTIN_CATALOG: &str = include_str!("../data/catalog.ron");

/// Turns {level, IV, EV, nature, base stat} into a concrete stat value.
pub trait StatFormula {
    fn initial_stat(
        &self,
        stat: Stat,
        level: u8,
        iv: u8,
        ev: u8,
        nature: &Nature,
        base_stats: &BaseStats,
    ) -> u16;
}

/// The classic formula: EVs count in quarters, natures scale non-HP stats by 10%.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardStatFormula;

impl StatFormula for StandardStatFormula {
    fn initial_stat(
        &self,
        stat: Stat,
        level: u8,
        iv: u8,
        ev: u8,
        nature: &Nature,
        base_stats: &BaseStats,
    ) -> u16 {
        let first_part = ((2.0 * f64::from(base_stats.get(stat)) + f64::from(iv)
            + f64::from(ev / 4))
            * f64::from(level))
            / 100.0;
        let value = match stat {
            Stat::Hp => first_part + f64::from(level) + 10.0,
            _ => (first_part + 5.0) * nature.factor(stat),
        };
        value as u16
    }
}

/// Lookup interface for every piece of static data a battle needs.
pub trait Catalog {
    fn species(&self, name: &str) -> CatalogResult<&PokemonSpecies>;
    fn move_data(&self, name: &str) -> CatalogResult<&MoveData>;
    fn nature(&self, name: &str) -> CatalogResult<&Nature>;
    fn item(&self, name: &str) -> CatalogResult<&ItemData>;

    fn type_effectiveness(&self, attacking: PokemonType, defending: PokemonType) -> f64 {
        PokemonType::type_effectiveness(attacking, defending)
    }

    fn stat_formula(&self) -> &dyn StatFormula {
        &StandardStatFormula
    }
}

/// On-disk shape of a catalog file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogData {
    #[serde(default)]
    pub species: Vec<PokemonSpecies>,
    #[serde(default)]
    pub moves: Vec<MoveData>,
    #[serde(default)]
    pub natures: Vec<Nature>,
    #[serde(default)]
    pub items: Vec<ItemData>,
}

/// In-memory catalog keyed by name.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    species: HashMap<String, PokemonSpecies>,
    moves: HashMap<String, MoveData>,
    natures: HashMap<String, Nature>,
    items: HashMap<String, ItemData>,
}

impl StaticCatalog {
    pub fn new(data: CatalogData) -> CatalogResult<Self> {
        let catalog = StaticCatalog {
            species: data
                .species
                .into_iter()
                .map(|species| (species.name.clone(), species))
                .collect(),
            moves: data
                .moves
                .into_iter()
                .map(|move_data| (move_data.name.clone(), move_data))
                .collect(),
            natures: data
                .natures
                .into_iter()
                .map(|nature| (nature.name.clone(), nature))
                .collect(),
            items: data
                .items
                .into_iter()
                .map(|item| (item.name.clone(), item))
                .collect(),
        };
        catalog.check_references()?;
        Ok(catalog)
    }

    /// Parses a RON document shaped like [`CatalogData`].
    pub fn from_ron_str(source: &str) -> CatalogResult<Self> {
        let data: CatalogData =
            ron::from_str(source).map_err(|err| CatalogError::MalformedData(err.to_string()))?;
        Self::new(data)
    }

    /// The catalog bundled with the crate.
    pub fn builtin() -> CatalogResult<Self> {
        Self::from_ron_str(BUILTIN_CATALOG)
    }

    pub fn species_names(&self) -> impl Iterator<Item = &str> {
        self.species.keys().map(String::as_str)
    }

    // Learnsets and evolutions may only name records that exist.
    fn check_references(&self) -> CatalogResult<()> {
        for species in self.species.values() {
            for entry in &species.learnset {
                if !self.moves.contains_key(&entry.move_name) {
                    return Err(CatalogError::MalformedData(format!(
                        "{} learns unknown move {}",
                        species.name, entry.move_name
                    )));
                }
            }
            if let Some(evolution) = &species.evolution {
                if !self.species.contains_key(&evolution.into) {
                    return Err(CatalogError::MalformedData(format!(
                        "{} evolves into unknown species {}",
                        species.name, evolution.into
                    )));
                }
            }
        }
        Ok(())
    }
}

impl Catalog for StaticCatalog {
    fn species(&self, name: &str) -> CatalogResult<&PokemonSpecies> {
        self.species
            .get(name)
            .ok_or_else(|| CatalogError::SpeciesNotFound(name.to_string()))
    }

    fn move_data(&self, name: &str) -> CatalogResult<&MoveData> {
        self.moves
            .get(name)
            .ok_or_else(|| CatalogError::MoveNotFound(name.to_string()))
    }

    fn nature(&self, name: &str) -> CatalogResult<&Nature> {
        self.natures
            .get(name)
            .ok_or_else(|| CatalogError::NatureNotFound(name.to_string()))
    }

    fn item(&self, name: &str) -> CatalogResult<&ItemData> {
        self.items
            .get(name)
            .ok_or_else(|| CatalogError::ItemNotFound(name.to_string()))
    }
}
