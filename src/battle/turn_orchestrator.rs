use crate::battle::action_stack::{resolve_move, Action, ActionStack, QueuedAction, Target};
use crate::battle::arena::{
    occupant_ref, pokemon_mut, pokemon_ref, run_lifecycle_hook, trainer_mut, trainer_ref,
    PokemonRef, SlotRef, TrainerId,
};
use crate::battle::calculators::MoveExecution;
use crate::battle::conditions::LifecycleHook;
use crate::battle::engine::Battle;
use crate::battle::state::BattleEvent;
use crate::errors::{ActionError, BattleResult};
use serde::Serialize;

/// One round of submitted actions.
#[derive(Debug, Clone, Serialize)]
pub struct Turn {
    number: usize,
    // submission order until executed, execution order after
    actions: Vec<QueuedAction>,
}

impl Turn {
    pub fn new(number: usize, actions: Vec<QueuedAction>) -> Self {
        Turn { number, actions }
    }

    pub fn number(&self) -> usize {
        self.number
    }

    pub fn actions(&self) -> &[QueuedAction] {
        &self.actions
    }

    /// Runs the turn: before-turn hooks, every action in priority order,
    /// after-turn hooks, then one faint sweep.
    pub fn execute(&mut self, battle: &mut Battle) -> BattleResult<()> {
        tracing::debug!(turn = self.number, actions = self.actions.len(), "turn started");
        run_hooks_on_field(battle, LifecycleHook::BeforeTurn);
        let occupied_at_start = occupied_slots(battle);

        let submitted = std::mem::take(&mut self.actions);
        let mut stack = ActionStack::build_initial(
            &battle.sides,
            battle.catalog.as_ref(),
            submitted,
            battle.rng.as_mut(),
        );
        while let Some(queued) = stack.pop_front() {
            execute_action(battle, &queued, &occupied_at_start)?;
            self.actions.push(queued);
        }

        run_hooks_on_field(battle, LifecycleHook::AfterTurn);
        battle.remove_fainted();
        Ok(())
    }
}

/// Every position holding a pokemon, across all sides.
fn occupied_slots(battle: &Battle) -> Vec<SlotRef> {
    battle
        .sides
        .iter()
        .enumerate()
        .flat_map(|(side, state)| {
            state
                .taken_positions()
                .into_iter()
                .map(move |position| SlotRef::new(side, position))
        })
        .collect()
}

/// Runs `hook` for every active pokemon, side by side in position order.
fn run_hooks_on_field(battle: &mut Battle, hook: LifecycleHook) {
    for side in battle.sides.iter_mut() {
        for (trainer_index, slot) in side.active_slots() {
            let trainer = &mut side.trainers[trainer_index];
            run_lifecycle_hook(
                trainer,
                slot.team_index,
                hook,
                &mut battle.log,
                battle.rng.as_mut(),
            );
        }
    }
}

fn execute_action(
    battle: &mut Battle,
    queued: &QueuedAction,
    occupied_at_start: &[SlotRef],
) -> BattleResult<()> {
    match &queued.action {
        Action::Move {
            position,
            move_name,
            target,
        } => execute_move(
            battle,
            queued.trainer,
            *position,
            move_name,
            target,
            occupied_at_start,
        ),
        Action::Recall {
            position,
            team_index,
        } => execute_recall(battle, queued.trainer, *position, *team_index),
        Action::UseItem {
            team_index,
            item,
            sub_choices,
        } => execute_item(battle, queued.trainer, *team_index, item, sub_choices),
        Action::GrowthChoice { .. } => {
            tracing::debug!(?queued, "growth choices resolve at submission, skipping");
            Ok(())
        }
    }
}

/// The healthy team member at a position, if any.
fn living_occupant(battle: &Battle, slot: SlotRef) -> Option<PokemonRef> {
    let occupant = occupant_ref(&battle.sides, slot)?;
    let alive = pokemon_ref(&battle.sides, occupant).is_ok_and(|pokemon| !pokemon.fainted());
    alive.then_some(occupant)
}

fn execute_move(
    battle: &mut Battle,
    trainer: TrainerId,
    position: usize,
    move_name: &str,
    target: &Target,
    occupied_at_start: &[SlotRef],
) -> BattleResult<()> {
    let Some(user) = living_occupant(battle, SlotRef::new(trainer.side, position)) else {
        tracing::debug!(?trainer, position, move_name, "user left the field, skipping move");
        return Ok(());
    };
    // every targeted position that held a pokemon when the turn began must still hold a living one
    let stale = target
        .slots()
        .iter()
        .filter(|slot| occupied_at_start.contains(*slot))
        .any(|slot| living_occupant(battle, *slot).is_none());
    if stale {
        tracing::debug!(?trainer, position, move_name, ?target, "target fainted this turn, skipping move");
        return Ok(());
    }
    let targets: Vec<PokemonRef> = target
        .slots()
        .iter()
        .filter_map(|slot| living_occupant(battle, *slot))
        .collect();
    if targets.is_empty() {
        tracing::debug!(?trainer, position, move_name, ?target, "no target left, skipping move");
        return Ok(());
    }
    let actor = pokemon_ref(&battle.sides, user)?;
    let Some(move_data) = resolve_move(actor, move_name, battle.catalog.as_ref()) else {
        tracing::debug!(?trainer, move_name, "move no longer known, skipping");
        return Ok(());
    };

    pokemon_mut(&mut battle.sides, user)?.change_pp_by(move_name, -1);
    let mut parts = battle.parts();
    for target in targets {
        MoveExecution {
            user,
            move_data: &move_data,
            target,
        }
        .execute(&mut parts)?;
    }
    battle.remove_fainted();
    Ok(())
}

fn execute_recall(
    battle: &mut Battle,
    trainer: TrainerId,
    position: usize,
    team_index: usize,
) -> BattleResult<()> {
    let owner = trainer_ref(&battle.sides, trainer)?;
    let incoming_ok = owner
        .pokemon(team_index)
        .is_some_and(|pokemon| !pokemon.fainted())
        && !owner.is_active(team_index);
    if !incoming_ok {
        tracing::debug!(?trainer, team_index, "recall target unavailable, skipping");
        return Ok(());
    }
    let trainer_name = owner.name.clone();
    let incoming_name = owner.team[team_index].name().to_string();
    let incoming = PokemonRef {
        trainer,
        team_index,
    };

    match owner.slot_at(position) {
        Some(slot) => {
            let outgoing_name = owner.team[slot.team_index].name().to_string();
            battle.log.push(BattleEvent::Recalls {
                trainer: trainer_name,
                outgoing: outgoing_name,
                incoming: incoming_name,
            });
            battle.remove_from_battle(PokemonRef {
                trainer,
                team_index: slot.team_index,
            })?;
        }
        None => battle.log.push(BattleEvent::RecallsForFainted {
            trainer: trainer_name,
            incoming: incoming_name,
        }),
    }
    battle.place_pokemon(incoming, position)
}

fn execute_item(
    battle: &mut Battle,
    trainer: TrainerId,
    team_index: usize,
    item: &str,
    sub_choices: &[String],
) -> BattleResult<()> {
    let data = battle.catalog.item(item)?.clone();
    let owner = trainer_mut(&mut battle.sides, trainer)?;
    let usable = owner.has_item(item)
        && owner
            .pokemon(team_index)
            .is_some_and(|pokemon| pokemon.usable_item(&data));
    if !usable {
        tracing::debug!(?trainer, team_index, item, "item no longer usable, skipping");
        return Ok(());
    }
    owner.consume_item(item);
    let trainer_name = owner.name.clone();
    let pokemon = &mut owner.team[team_index];
    battle.log.push(BattleEvent::UsesItemOnPokemon {
        trainer: trainer_name,
        pokemon: pokemon.name().to_string(),
        item: item.to_string(),
    });
    pokemon.use_item(&data);

    for choice in sub_choices {
        let pokemon = pokemon_ref(
            &battle.sides,
            PokemonRef {
                trainer,
                team_index,
            },
        )?;
        let accepted = pokemon.growth_event().is_some_and(|event| {
            !event.read_only(pokemon) && event.possible_actions(pokemon).contains(choice)
        });
        if !accepted {
            tracing::warn!(?trainer, item, choice, "item sub-choice does not match its growth events");
            return Err(ActionError::InvalidItemActions {
                item: item.to_string(),
                choice: choice.clone(),
            }
            .into());
        }
        battle.resolve_growth_event(trainer, team_index, Some(choice))?;
    }
    Ok(())
}
