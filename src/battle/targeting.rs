//! Resolves a move's targeting shape into concrete target choices.

use crate::battle::action_stack::Target;
use crate::battle::arena::{Side, SlotRef};
use schema::MoveTarget;

/// Field geometry seen from one actor.
#[derive(Debug, Clone, Copy)]
pub struct Field<'a> {
    pub sides: &'a [Side],
    pub pokemon_per_side: usize,
}

impl<'a> Field<'a> {
    pub fn new(sides: &'a [Side], pokemon_per_side: usize) -> Self {
        Field {
            sides,
            pokemon_per_side,
        }
    }

    fn within_field(&self, positions: impl IntoIterator<Item = isize>) -> Vec<usize> {
        positions
            .into_iter()
            .filter(|position| *position >= 0 && (*position as usize) < self.pokemon_per_side)
            .map(|position| position as usize)
            .collect()
    }

    fn foe_sides(&self, actor: SlotRef) -> impl Iterator<Item = usize> + '_ {
        (0..self.sides.len()).filter(move |side| *side != actor.side)
    }

    fn adjacent_foes(&self, actor: SlotRef) -> Vec<SlotRef> {
        let p = actor.position as isize;
        let positions = self.within_field([p - 1, p, p + 1]);
        self.foe_sides(actor)
            .flat_map(|side| positions.iter().map(move |position| SlotRef::new(side, *position)))
            .collect()
    }

    fn adjacent_users(&self, actor: SlotRef) -> Vec<SlotRef> {
        let p = actor.position as isize;
        self.within_field([p - 1, p + 1])
            .into_iter()
            .map(|position| SlotRef::new(actor.side, position))
            .collect()
    }

    fn all_users(&self, actor: SlotRef) -> Vec<SlotRef> {
        (0..self.pokemon_per_side)
            .map(|position| SlotRef::new(actor.side, position))
            .collect()
    }

    fn all_foes(&self, actor: SlotRef) -> Vec<SlotRef> {
        self.foe_sides(actor)
            .flat_map(|side| (0..self.pokemon_per_side).map(move |position| SlotRef::new(side, position)))
            .collect()
    }

    fn adjacent(&self, actor: SlotRef) -> Vec<SlotRef> {
        let mut slots = self.adjacent_foes(actor);
        slots.extend(self.adjacent_users(actor));
        slots
    }

    fn all(&self, actor: SlotRef) -> Vec<SlotRef> {
        let mut slots = self.all_foes(actor);
        slots.extend(self.all_users(actor));
        slots
    }

    /// Every target the shape offers, before occupancy is considered.
    pub fn candidate_targets(&self, shape: MoveTarget, actor: SlotRef) -> Vec<Target> {
        let singles =
            |slots: Vec<SlotRef>| -> Vec<Target> { slots.into_iter().map(Target::Single).collect() };
        match shape {
            MoveTarget::User => vec![Target::Single(actor)],
            MoveTarget::TargetAdjacentSingle => singles(self.adjacent(actor)),
            MoveTarget::TargetAdjacentUserSingle => singles(self.adjacent_users(actor)),
            MoveTarget::TargetUserOrAdjacentUser => {
                let mut slots = vec![actor];
                slots.extend(self.adjacent_users(actor));
                singles(slots)
            }
            MoveTarget::AdjacentFoeSingle => singles(self.adjacent_foes(actor)),
            MoveTarget::AllUsers => vec![Target::Many(self.all_users(actor))],
            MoveTarget::AllAdjacent => vec![Target::Many(self.adjacent(actor))],
            MoveTarget::AdjacentFoesAll => vec![Target::Many(self.adjacent_foes(actor))],
            MoveTarget::AllFoes => vec![Target::Many(self.all_foes(actor))],
            MoveTarget::AllExceptUser => {
                let slots = self
                    .all(actor)
                    .into_iter()
                    .filter(|slot| *slot != actor)
                    .collect();
                vec![Target::Many(slots)]
            }
            MoveTarget::All => vec![Target::Many(self.all(actor))],
        }
    }

    pub fn is_occupied(&self, slot: SlotRef) -> bool {
        self.sides
            .get(slot.side)
            .is_some_and(|side| side.is_occupied(slot.position))
    }

    /// A single target needs an occupant, unless its whole side is empty and
    /// it names position 0. A group needs at least one occupant.
    pub fn target_in_battle(&self, target: &Target) -> bool {
        match target {
            Target::Single(slot) => {
                self.is_occupied(*slot)
                    || (slot.position == 0
                        && self
                            .sides
                            .get(slot.side)
                            .is_some_and(|side| !side.pokemon_left()))
            }
            Target::Many(slots) => slots.iter().any(|slot| self.is_occupied(*slot)),
        }
    }

    /// Candidate targets that are legal right now.
    pub fn targets_in_battle(&self, shape: MoveTarget, actor: SlotRef) -> Vec<Target> {
        self.candidate_targets(shape, actor)
            .into_iter()
            .filter(|target| match target {
                Target::Many(slots) => !slots.is_empty(),
                Target::Single(_) => true,
            })
            .filter(|target| self.target_in_battle(target))
            .collect()
    }

    /// Occupied positions a target covers when the move actually lands.
    pub fn occupied_slots(&self, target: &Target) -> Vec<SlotRef> {
        target
            .slots()
            .iter()
            .copied()
            .filter(|slot| self.is_occupied(*slot))
            .collect()
    }
}
