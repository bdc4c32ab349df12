//! Enumerates the actions a trainer may submit right now.

use crate::battle::action_stack::Action;
use crate::battle::arena::{trainer_ref, SlotRef, TrainerId};
use crate::battle::engine::Battle;
use crate::battle::targeting::Field;
use crate::catalog::Catalog;
use crate::errors::{BattleResult, BattleStateError};
use crate::player::Trainer;
use crate::pokemon::Pokemon;
use schema::{ItemData, MoveData};

impl Battle {
    /// Every action `trainer` may submit in its current state.
    ///
    /// Read-only growth events of every trainer are resolved first. A pending
    /// growth choice, this trainer's or anyone else's, hides all other actions.
    pub fn valid_actions_for(&mut self, trainer: TrainerId) -> BattleResult<Vec<Action>> {
        trainer_ref(&self.sides, trainer)?;
        if !self.started || self.finished() {
            return Ok(Vec::new());
        }
        self.auto_resolve_growth_events(trainer)?;
        for other in self.trainer_ids() {
            self.auto_resolve_growth_events(other)?;
        }

        let owner = trainer_ref(&self.sides, trainer)?;
        if let Some(team_index) = owner.awaiting_growth_choice() {
            let pokemon = &owner.team[team_index];
            let options = pokemon
                .growth_event()
                .map(|event| event.possible_actions(pokemon))
                .unwrap_or_default();
            return Ok(options
                .into_iter()
                .map(|option| Action::GrowthChoice { team_index, option })
                .collect());
        }
        if self
            .trainer_ids()
            .into_iter()
            .filter(|other| *other != trainer)
            .filter_map(|other| trainer_ref(&self.sides, other).ok())
            .any(|other| other.awaiting_growth_choice().is_some())
        {
            return Ok(Vec::new());
        }

        self.turn_actions_for(trainer)
    }

    fn turn_actions_for(&self, id: TrainerId) -> BattleResult<Vec<Action>> {
        let trainer = trainer_ref(&self.sides, id)?;
        let pending: Vec<&Action> = self
            .pending_actions
            .iter()
            .filter(|queued| queued.trainer == id)
            .map(|queued| &queued.action)
            .collect();
        let bench = trainer.left_pokemon_in_team();

        // owned positions that are filled, or empty with someone to fill them
        let capacity = trainer
            .positions()
            .iter()
            .filter(|position| trainer.slot_at(**position).is_some() || !bench.is_empty())
            .count();
        if pending.len() >= capacity {
            return Ok(Vec::new());
        }
        let bound: Vec<usize> = pending.iter().filter_map(|a| a.bound_position()).collect();

        let mut actions = self.move_actions(id, trainer, &bound);
        actions.extend(recall_actions(trainer, &pending, &bound, &bench));
        actions.extend(self.item_actions(trainer, &pending)?);
        Ok(actions)
    }

    fn move_actions(&self, id: TrainerId, trainer: &Trainer, bound: &[usize]) -> Vec<Action> {
        let field = Field::new(&self.sides, self.pokemon_per_side());
        let mut actions = Vec::new();
        for slot in trainer.active_slots() {
            if bound.contains(&slot.position) {
                continue;
            }
            let Some(pokemon) = trainer.pokemon(slot.team_index) else {
                continue;
            };
            let actor = SlotRef::new(id.side, slot.position);
            let mut usable: Vec<MoveData> = pokemon.moves_with_pp().map(|m| m.data.clone()).collect();
            if usable.is_empty() {
                usable.push(self.struggle());
            }
            for data in usable {
                for target in field.targets_in_battle(data.target, actor) {
                    actions.push(Action::Move {
                        position: slot.position,
                        move_name: data.name.clone(),
                        target,
                    });
                }
            }
        }
        actions
    }

    fn struggle(&self) -> MoveData {
        self.catalog
            .move_data(MoveData::STRUGGLE)
            .cloned()
            .unwrap_or_else(|_| MoveData::struggle())
    }

    fn item_actions(&self, trainer: &Trainer, pending: &[&Action]) -> BattleResult<Vec<Action>> {
        let pending_items: Vec<&str> = pending
            .iter()
            .filter_map(|action| match action {
                Action::UseItem { item, .. } => Some(item.as_str()),
                _ => None,
            })
            .collect();
        if pending_items.len() >= trainer.active_slots().len() {
            return Ok(Vec::new());
        }

        let mut actions = Vec::new();
        let mut seen: Vec<&str> = Vec::new();
        for item in &trainer.items {
            if seen.contains(&item.as_str()) {
                continue;
            }
            seen.push(item);
            let reserved = pending_items.iter().filter(|name| **name == item.as_str()).count();
            if reserved >= trainer.item_count(item) {
                continue;
            }
            let data = self.catalog.item(item)?;
            for (team_index, pokemon) in trainer.team.iter().enumerate() {
                if !pokemon.usable_item(data) {
                    continue;
                }
                for sub_choices in item_sub_choices(
                    pokemon,
                    data,
                    self.catalog.as_ref(),
                    self.options.max_growth_chain_depth,
                )? {
                    actions.push(Action::UseItem {
                        team_index,
                        item: item.clone(),
                        sub_choices,
                    });
                }
            }
        }
        Ok(actions)
    }
}

fn recall_actions(
    trainer: &Trainer,
    pending: &[&Action],
    bound: &[usize],
    bench: &[usize],
) -> Vec<Action> {
    let chosen: Vec<usize> = pending
        .iter()
        .filter_map(|action| match action {
            Action::Recall { team_index, .. } => Some(*team_index),
            _ => None,
        })
        .collect();
    let mut positions = trainer.positions().to_vec();
    positions.sort_unstable();

    let mut actions = Vec::new();
    for position in positions {
        if bound.contains(&position) {
            continue;
        }
        for team_index in bench.iter().filter(|index| !chosen.contains(*index)) {
            actions.push(Action::Recall {
                position,
                team_index: *team_index,
            });
        }
    }
    actions
}

/// Every sequence of answers the growth events queued by `item` can take.
///
/// Works on a copy of the pokemon. Each branch ends at the first read-only
/// event or when nothing is left.
pub(crate) fn item_sub_choices(
    pokemon: &Pokemon,
    item: &ItemData,
    catalog: &dyn Catalog,
    max_depth: usize,
) -> BattleResult<Vec<Vec<String>>> {
    let mut simulated = pokemon.clone();
    simulated.use_item(item);
    choice_branches(simulated, catalog, 0, max_depth)
}

fn choice_branches(
    pokemon: Pokemon,
    catalog: &dyn Catalog,
    depth: usize,
    max_depth: usize,
) -> BattleResult<Vec<Vec<String>>> {
    let Some(event) = pokemon.growth_event() else {
        return Ok(vec![Vec::new()]);
    };
    if event.read_only(&pokemon) {
        return Ok(vec![Vec::new()]);
    }
    if depth >= max_depth {
        tracing::warn!(pokemon = pokemon.name(), max_depth, "item growth chain did not settle");
        return Err(BattleStateError::GrowthChainTooDeep(max_depth).into());
    }

    let mut branches = Vec::new();
    for option in event.possible_actions(&pokemon) {
        let mut branch = pokemon.clone();
        branch.resolve_growth_event(Some(&option), catalog)?;
        for mut rest in choice_branches(branch, catalog, depth + 1, max_depth)? {
            rest.insert(0, option.clone());
            branches.push(rest);
        }
    }
    Ok(branches)
}
