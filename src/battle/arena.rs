//! Position model: sides, field positions and the handles used to address them.

use crate::battle::conditions::{HookContext, LifecycleHook};
use crate::battle::engine::Battle;
use crate::battle::rng::BattleRng;
use crate::battle::state::{BattleEvent, EventLog};
use crate::errors::{BattleResult, BattleStateError};
use crate::player::{ActiveSlot, Trainer};
use crate::pokemon::Pokemon;
use serde::{Deserialize, Serialize};

/// A trainer, addressed by side and order within the side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TrainerId {
    pub side: usize,
    pub index: usize,
}

impl TrainerId {
    pub fn new(side: usize, index: usize) -> Self {
        TrainerId { side, index }
    }
}

/// A field position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SlotRef {
    pub side: usize,
    pub position: usize,
}

impl SlotRef {
    pub fn new(side: usize, position: usize) -> Self {
        SlotRef { side, position }
    }
}

/// A team member, addressed through its owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PokemonRef {
    pub trainer: TrainerId,
    pub team_index: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Side {
    pub(crate) trainers: Vec<Trainer>,
}

impl Side {
    pub fn new(trainers: Vec<Trainer>) -> Self {
        Side { trainers }
    }

    pub fn trainers(&self) -> &[Trainer] {
        &self.trainers
    }

    /// Every occupied position as `(trainer index, slot)`, by position.
    pub fn active_slots(&self) -> Vec<(usize, ActiveSlot)> {
        let mut slots: Vec<(usize, ActiveSlot)> = self
            .trainers
            .iter()
            .enumerate()
            .flat_map(|(index, trainer)| {
                trainer
                    .active_slots()
                    .iter()
                    .map(move |slot| (index, *slot))
            })
            .collect();
        slots.sort_by_key(|(_, slot)| slot.position);
        slots
    }

    pub fn taken_positions(&self) -> Vec<usize> {
        self.active_slots()
            .into_iter()
            .map(|(_, slot)| slot.position)
            .collect()
    }

    /// Lowest free position below `pokemon_per_side`, if any.
    pub fn next_position(&self, pokemon_per_side: usize) -> Option<usize> {
        let taken = self.taken_positions();
        (0..pokemon_per_side).find(|position| !taken.contains(position))
    }

    pub fn occupant(&self, position: usize) -> Option<(usize, ActiveSlot)> {
        self.trainers
            .iter()
            .enumerate()
            .find_map(|(index, trainer)| trainer.slot_at(position).map(|slot| (index, slot)))
    }

    pub fn occupant_pokemon(&self, position: usize) -> Option<&Pokemon> {
        let (index, slot) = self.occupant(position)?;
        self.trainers[index].pokemon(slot.team_index)
    }

    pub fn is_occupied(&self, position: usize) -> bool {
        self.occupant(position).is_some()
    }

    /// Whether anything is on the field for this side.
    pub fn pokemon_left(&self) -> bool {
        self.trainers
            .iter()
            .any(|trainer| !trainer.active_slots().is_empty())
    }

    pub fn trainer_on_side(&self, name: &str) -> Option<usize> {
        self.trainers.iter().position(|trainer| trainer.name == name)
    }

    pub fn fainted(&self) -> bool {
        self.trainers.iter().all(Trainer::fainted)
    }
}

pub(crate) fn trainer_ref(sides: &[Side], id: TrainerId) -> BattleResult<&Trainer> {
    sides
        .get(id.side)
        .and_then(|side| side.trainers.get(id.index))
        .ok_or_else(|| {
            BattleStateError::UnknownTrainer {
                side: id.side,
                index: id.index,
            }
            .into()
        })
}

pub(crate) fn trainer_mut(sides: &mut [Side], id: TrainerId) -> BattleResult<&mut Trainer> {
    sides
        .get_mut(id.side)
        .and_then(|side| side.trainers.get_mut(id.index))
        .ok_or_else(|| {
            BattleStateError::UnknownTrainer {
                side: id.side,
                index: id.index,
            }
            .into()
        })
}

pub(crate) fn pokemon_ref(sides: &[Side], pokemon: PokemonRef) -> BattleResult<&Pokemon> {
    let trainer = trainer_ref(sides, pokemon.trainer)?;
    trainer
        .pokemon(pokemon.team_index)
        .ok_or_else(|| unknown_pokemon(trainer, pokemon.team_index))
}

pub(crate) fn pokemon_mut(sides: &mut [Side], pokemon: PokemonRef) -> BattleResult<&mut Pokemon> {
    let trainer = trainer_mut(sides, pokemon.trainer)?;
    if trainer.pokemon(pokemon.team_index).is_none() {
        return Err(unknown_pokemon(trainer, pokemon.team_index));
    }
    Ok(&mut trainer.team[pokemon.team_index])
}

/// The trainer and team member bound to a field position.
pub(crate) fn occupant_ref(sides: &[Side], slot: SlotRef) -> Option<PokemonRef> {
    let (index, active) = sides.get(slot.side)?.occupant(slot.position)?;
    Some(PokemonRef {
        trainer: TrainerId::new(slot.side, index),
        team_index: active.team_index,
    })
}

pub(crate) fn unknown_pokemon(trainer: &Trainer, team_index: usize) -> crate::errors::BattleEngineError {
    BattleStateError::UnknownPokemon {
        trainer: trainer.name.clone(),
        team_index,
    }
    .into()
}

/// Runs one lifecycle hook over the conditions of a team member.
pub(crate) fn run_lifecycle_hook(
    trainer: &mut Trainer,
    team_index: usize,
    hook: LifecycleHook,
    log: &mut EventLog,
    rng: &mut dyn BattleRng,
) {
    let Trainer { name, team, .. } = trainer;
    let Some(pokemon) = team.get_mut(team_index) else {
        return;
    };
    let mut ctx = HookContext {
        trainer_name: name,
        log,
        rng,
    };
    pokemon.run_condition_hooks(None, |condition, holder| {
        condition.apply_hook(hook, holder, &mut ctx)
    });
}

impl Battle {
    /// Puts a benched team member on the lowest free position of its side.
    pub fn send_to_battle(&mut self, pokemon: PokemonRef) -> BattleResult<usize> {
        let side = pokemon.trainer.side;
        let pokemon_per_side = self.pokemon_per_side();
        let position = self
            .sides
            .get(side)
            .and_then(|s| s.next_position(pokemon_per_side))
            .ok_or(BattleStateError::NoFreePosition(side))?;
        self.place_pokemon(pokemon, position)?;

        let trainer = trainer_ref(&self.sides, pokemon.trainer)?;
        let name = pokemon_ref(&self.sides, pokemon)?.name().to_string();
        self.log.push(BattleEvent::SendsToBattle {
            trainer: trainer.name.clone(),
            pokemon: name,
        });
        Ok(position)
    }

    /// Binds a team member to `position` without logging.
    pub(crate) fn place_pokemon(&mut self, pokemon: PokemonRef, position: usize) -> BattleResult<()> {
        let trainer = trainer_mut(&mut self.sides, pokemon.trainer)?;
        if trainer.pokemon(pokemon.team_index).is_none() {
            return Err(unknown_pokemon(trainer, pokemon.team_index));
        }
        trainer.place(position, pokemon.team_index);
        Ok(())
    }

    /// Takes an active pokemon off the field: stages reset, switch-out hooks run.
    pub fn remove_from_battle(&mut self, pokemon: PokemonRef) -> BattleResult<()> {
        let trainer = trainer_mut(&mut self.sides, pokemon.trainer)?;
        let Some(slot) = trainer
            .active_slots()
            .iter()
            .copied()
            .find(|slot| slot.team_index == pokemon.team_index)
        else {
            return Ok(());
        };
        let name = match trainer.pokemon_mut(pokemon.team_index) {
            Some(member) => {
                member.reset_stats();
                member.name().to_string()
            }
            None => return Err(unknown_pokemon(trainer, pokemon.team_index)),
        };
        run_lifecycle_hook(
            trainer,
            pokemon.team_index,
            LifecycleHook::AfterSwitchedOut,
            &mut self.log,
            self.rng.as_mut(),
        );
        trainer.vacate(slot.position);
        self.log.push(BattleEvent::RemovesFromBattle {
            trainer: trainer.name.clone(),
            pokemon: name,
        });
        Ok(())
    }

    /// Clears every active pokemon at 0 HP off the field.
    pub fn remove_fainted(&mut self) {
        for side in self.sides.iter_mut() {
            for trainer in side.trainers.iter_mut() {
                let fainted: Vec<ActiveSlot> = trainer
                    .active_slots()
                    .iter()
                    .copied()
                    .filter(|slot| trainer.pokemon(slot.team_index).is_some_and(Pokemon::fainted))
                    .collect();
                for slot in fainted {
                    let name = trainer
                        .pokemon(slot.team_index)
                        .map(|p| p.name().to_string())
                        .unwrap_or_default();
                    self.log.push(BattleEvent::PokemonFainted {
                        trainer: trainer.name.clone(),
                        pokemon: name,
                    });
                    run_lifecycle_hook(
                        trainer,
                        slot.team_index,
                        LifecycleHook::AfterFainted,
                        &mut self.log,
                        self.rng.as_mut(),
                    );
                    trainer.vacate(slot.position);
                }
            }
        }
    }
}
