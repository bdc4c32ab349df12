use std::cmp::Reverse;
use std::collections::VecDeque;

use crate::battle::arena::{trainer_ref, Side, SlotRef, TrainerId};
use crate::battle::rng::BattleRng;
use crate::catalog::Catalog;
use crate::pokemon::Pokemon;
use schema::MoveData;
use serde::{Deserialize, Serialize};

/// Recalls pre-empt everything.
pub const RECALL_PRIORITY: i8 = 7;
/// Items go after recalls but before any move.
pub const ITEM_PRIORITY: i8 = 6;

/// Where a move lands: one chosen position, or a fixed group resolved together.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Target {
    Single(SlotRef),
    Many(Vec<SlotRef>),
}

impl Target {
    pub fn slots(&self) -> &[SlotRef] {
        match self {
            Target::Single(slot) => std::slice::from_ref(slot),
            Target::Many(slots) => slots,
        }
    }
}

/// One intent a trainer submits for the coming turn.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// The pokemon at `position` uses `move_name`.
    Move {
        position: usize,
        move_name: String,
        target: Target,
    },
    /// Sends team member `team_index` into `position`, recalling whoever is there.
    Recall { position: usize, team_index: usize },
    /// Uses `item` on team member `team_index`. `sub_choices` answer the
    /// growth events the item queues, in order.
    UseItem {
        team_index: usize,
        item: String,
        sub_choices: Vec<String>,
    },
    /// Answers the pending growth event of team member `team_index`.
    GrowthChoice { team_index: usize, option: String },
}

impl Action {
    /// The field position this action occupies for the round, if any.
    pub fn bound_position(&self) -> Option<usize> {
        match self {
            Action::Move { position, .. } | Action::Recall { position, .. } => Some(*position),
            Action::UseItem { .. } | Action::GrowthChoice { .. } => None,
        }
    }

    pub fn is_item(&self) -> bool {
        matches!(self, Action::UseItem { .. })
    }
}

/// An action together with the trainer that submitted it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueuedAction {
    pub trainer: TrainerId,
    pub action: Action,
}

/// Move data for `move_name` as `pokemon` would use it. Struggle is always
/// available; any other move must be known.
pub(crate) fn resolve_move(
    pokemon: &Pokemon,
    move_name: &str,
    catalog: &dyn Catalog,
) -> Option<MoveData> {
    if let Some(known) = pokemon.move_named(move_name) {
        return Some(known.data.clone());
    }
    if move_name == MoveData::STRUGGLE {
        return Some(
            catalog
                .move_data(MoveData::STRUGGLE)
                .cloned()
                .unwrap_or_else(|_| MoveData::struggle()),
        );
    }
    None
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ActionPriority {
    tier: i8,
    speed: u16,
}

/// Turn actions in execution order.
#[derive(Debug)]
pub struct ActionStack {
    actions: VecDeque<QueuedAction>,
}

impl ActionStack {
    /// Orders the submitted actions and stacks them for execution.
    pub fn build_initial(
        sides: &[Side],
        catalog: &dyn Catalog,
        actions: Vec<QueuedAction>,
        rng: &mut dyn BattleRng,
    ) -> Self {
        ActionStack {
            actions: determine_action_order(sides, catalog, actions, rng).into(),
        }
    }

    pub fn pop_front(&mut self) -> Option<QueuedAction> {
        self.actions.pop_front()
    }
}

fn action_priority(sides: &[Side], catalog: &dyn Catalog, queued: &QueuedAction) -> ActionPriority {
    let Ok(trainer) = trainer_ref(sides, queued.trainer) else {
        return ActionPriority { tier: 0, speed: 0 };
    };
    let pokemon_at = |position: usize| {
        trainer
            .slot_at(position)
            .and_then(|slot| trainer.pokemon(slot.team_index))
    };
    match &queued.action {
        Action::Move {
            position,
            move_name,
            ..
        } => {
            let actor = pokemon_at(*position);
            let tier = actor
                .and_then(|pokemon| resolve_move(pokemon, move_name, catalog))
                .map_or(0, |data| data.priority);
            ActionPriority {
                tier,
                speed: actor.map_or(0, Pokemon::speed),
            }
        }
        Action::Recall { position, .. } => ActionPriority {
            tier: RECALL_PRIORITY,
            speed: pokemon_at(*position).map_or(0, Pokemon::speed),
        },
        Action::UseItem { .. } => ActionPriority {
            tier: ITEM_PRIORITY,
            speed: 0,
        },
        // never queued, resolved at submission
        Action::GrowthChoice { .. } => ActionPriority {
            tier: RECALL_PRIORITY,
            speed: 0,
        },
    }
}

/// Sorts by priority tier, then speed, both descending. Runs that tie on
/// both are shuffled through `rng`.
pub fn determine_action_order(
    sides: &[Side],
    catalog: &dyn Catalog,
    actions: Vec<QueuedAction>,
    rng: &mut dyn BattleRng,
) -> Vec<QueuedAction> {
    let mut prioritized: Vec<(ActionPriority, QueuedAction)> = actions
        .into_iter()
        .map(|queued| (action_priority(sides, catalog, &queued), queued))
        .collect();
    prioritized.sort_by_key(|(priority, _)| (Reverse(priority.tier), Reverse(priority.speed)));

    let mut start = 0;
    while start < prioritized.len() {
        let key = prioritized[start].0;
        let end = prioritized[start..]
            .iter()
            .position(|(priority, _)| *priority != key)
            .map_or(prioritized.len(), |offset| start + offset);
        let run = &mut prioritized[start..end];
        for i in (1..run.len()).rev() {
            let j = rng.index(i + 1, "speed tie");
            run.swap(i, j);
        }
        start = end;
    }

    let ordered: Vec<QueuedAction> = prioritized.into_iter().map(|(_, queued)| queued).collect();
    tracing::debug!(order = ?ordered, "action order");
    ordered
}
