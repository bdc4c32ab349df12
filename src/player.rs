use crate::growth::GrowthEvent;
use crate::pokemon::Pokemon;
use serde::{Deserialize, Serialize};

/// A team member that currently occupies a field position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActiveSlot {
    pub position: usize,
    pub team_index: usize,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Trainer {
    pub name: String,
    pub team: Vec<Pokemon>,
    // Item names; duplicates are separate units.
    pub items: Vec<String>,
    active_slots: Vec<ActiveSlot>,
    // Field positions this trainer sends into, fixed when the battle starts.
    positions: Vec<usize>,
}

impl Trainer {
    pub fn new(name: &str, team: Vec<Pokemon>) -> Self {
        Self::with_items(name, team, Vec::new())
    }

    pub fn with_items(name: &str, team: Vec<Pokemon>, items: Vec<String>) -> Self {
        Trainer {
            name: name.to_string(),
            team,
            items,
            active_slots: Vec::new(),
            positions: Vec::new(),
        }
    }

    pub fn pokemon(&self, team_index: usize) -> Option<&Pokemon> {
        self.team.get(team_index)
    }

    pub fn pokemon_mut(&mut self, team_index: usize) -> Option<&mut Pokemon> {
        self.team.get_mut(team_index)
    }

    pub fn active_slots(&self) -> &[ActiveSlot] {
        &self.active_slots
    }

    pub fn positions(&self) -> &[usize] {
        &self.positions
    }

    pub(crate) fn claim_position(&mut self, position: usize) {
        if !self.positions.contains(&position) {
            self.positions.push(position);
        }
    }

    pub fn slot_at(&self, position: usize) -> Option<ActiveSlot> {
        self.active_slots
            .iter()
            .copied()
            .find(|slot| slot.position == position)
    }

    pub fn is_active(&self, team_index: usize) -> bool {
        self.active_slots
            .iter()
            .any(|slot| slot.team_index == team_index)
    }

    pub(crate) fn place(&mut self, position: usize, team_index: usize) {
        self.active_slots.retain(|slot| slot.position != position);
        self.active_slots.push(ActiveSlot {
            position,
            team_index,
        });
        self.active_slots.sort_by_key(|slot| slot.position);
        self.claim_position(position);
    }

    pub(crate) fn vacate(&mut self, position: usize) -> Option<ActiveSlot> {
        let index = self
            .active_slots
            .iter()
            .position(|slot| slot.position == position)?;
        Some(self.active_slots.remove(index))
    }

    /// Healthy team members that are not on the field.
    pub fn left_pokemon_in_team(&self) -> Vec<usize> {
        self.team
            .iter()
            .enumerate()
            .filter(|(index, pokemon)| !pokemon.fainted() && !self.is_active(*index))
            .map(|(index, _)| index)
            .collect()
    }

    pub fn fainted(&self) -> bool {
        self.team.iter().all(Pokemon::fainted)
    }

    pub fn has_item(&self, item: &str) -> bool {
        self.items.iter().any(|owned| owned == item)
    }

    pub fn item_count(&self, item: &str) -> usize {
        self.items.iter().filter(|owned| *owned == item).count()
    }

    /// Removes one unit of `item`. Returns false when none is left.
    pub fn consume_item(&mut self, item: &str) -> bool {
        match self.items.iter().position(|owned| owned == item) {
            Some(index) => {
                self.items.remove(index);
                true
            }
            None => false,
        }
    }

    /// The first team member with a pending growth event.
    pub fn growth_event(&self) -> Option<(usize, &GrowthEvent)> {
        self.team
            .iter()
            .enumerate()
            .find_map(|(index, pokemon)| pokemon.growth_event().map(|event| (index, event)))
    }

    /// Team index of the first member whose pending event waits on a choice.
    pub fn awaiting_growth_choice(&self) -> Option<usize> {
        let (index, _) = self.growth_event()?;
        self.team[index].awaiting_growth_choice().then_some(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::tests::common::TestPokemonBuilder;
    use pretty_assertions::assert_eq;

    fn trainer() -> Trainer {
        Trainer::with_items(
            "Ash",
            vec![
                TestPokemonBuilder::new("Pikachu", 5).build(),
                TestPokemonBuilder::new("Bulbasaur", 5).with_hp(0).build(),
                TestPokemonBuilder::new("Charmander", 5).build(),
            ],
            vec!["Potion".to_string(), "Antidote".to_string(), "Potion".to_string()],
        )
    }

    #[test]
    fn test_bench_excludes_fainted_and_active() {
        let mut ash = trainer();
        ash.place(0, 0);

        assert_eq!(ash.left_pokemon_in_team(), vec![2]);
        assert!(!ash.fainted());
    }

    #[test]
    fn test_place_and_vacate() {
        let mut ash = trainer();
        ash.place(1, 2);
        ash.place(0, 0);

        assert_eq!(
            ash.active_slots(),
            &[
                ActiveSlot {
                    position: 0,
                    team_index: 0
                },
                ActiveSlot {
                    position: 1,
                    team_index: 2
                }
            ]
        );
        assert_eq!(ash.vacate(1).map(|slot| slot.team_index), Some(2));
        assert_eq!(ash.slot_at(1), None);
        // the position stays owned
        assert_eq!(ash.positions(), &[1, 0]);
    }

    #[test]
    fn test_consume_item_removes_one_unit() {
        let mut ash = trainer();

        assert!(ash.consume_item("Potion"));
        assert_eq!(ash.item_count("Potion"), 1);
        assert_eq!(ash.items, vec!["Antidote".to_string(), "Potion".to_string()]);
        assert!(!ash.consume_item("Rare Candy"));
    }
}
