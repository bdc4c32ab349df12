use crate::battle::rng::BattleRng;
use crate::battle::state::{BattleEvent, EventLog};
use crate::pokemon::Pokemon;
use schema::{MoveCategory, PokemonType, StatType, StatusType};
use serde::{Deserialize, Serialize};

/// BadlyPoisoned damage stops growing after this many turns.
const BADLY_POISONED_TURN_CAP: u8 = 15;

/// A non-volatile affliction attached to one pokemon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusCondition {
    Poison,
    Burn,
    Freeze,
    Paralysis,
    BadlyPoisoned { turn_count: u8 },
    Sleep { turn_count: u8, max_turn_count: u8 },
}

/// Whether a condition stays attached after a hook ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionLifecycle {
    Keep,
    Remove,
}

/// Lifecycle points at which every attached condition is notified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleHook {
    BeforeTurn,
    AfterTurn,
    AfterReceivedDamage { move_type: PokemonType },
    AfterFainted,
    AfterSwitchedOut,
}

/// What a hook may touch besides its holder.
pub struct HookContext<'a> {
    pub trainer_name: &'a str,
    pub log: &'a mut EventLog,
    pub rng: &'a mut dyn BattleRng,
}

impl HookContext<'_> {
    fn names(&self, holder: &Pokemon) -> (String, String) {
        (self.trainer_name.to_string(), holder.name().to_string())
    }
}

impl StatusCondition {
    /// A fresh condition of `kind`. Sleep draws its 1..=3 turn sentence here.
    pub fn new(kind: StatusType, rng: &mut dyn BattleRng) -> Self {
        match kind {
            StatusType::Poison => StatusCondition::Poison,
            StatusType::Burn => StatusCondition::Burn,
            StatusType::Freeze => StatusCondition::Freeze,
            StatusType::Paralysis => StatusCondition::Paralysis,
            StatusType::BadlyPoisoned => StatusCondition::BadlyPoisoned { turn_count: 0 },
            StatusType::Sleep => StatusCondition::Sleep {
                turn_count: 0,
                max_turn_count: rng.range_inclusive(1, 3, "sleep duration") as u8,
            },
        }
    }

    pub fn kind(&self) -> StatusType {
        match self {
            StatusCondition::Poison => StatusType::Poison,
            StatusCondition::Burn => StatusType::Burn,
            StatusCondition::Freeze => StatusType::Freeze,
            StatusCondition::Paralysis => StatusType::Paralysis,
            StatusCondition::BadlyPoisoned { .. } => StatusType::BadlyPoisoned,
            StatusCondition::Sleep { .. } => StatusType::Sleep,
        }
    }

    /// Dispatches one lifecycle hook.
    pub fn apply_hook(
        &mut self,
        hook: LifecycleHook,
        holder: &mut Pokemon,
        ctx: &mut HookContext<'_>,
    ) -> ConditionLifecycle {
        match hook {
            LifecycleHook::BeforeTurn => self.before_turn(holder, ctx),
            LifecycleHook::AfterTurn => self.after_turn(holder, ctx),
            LifecycleHook::AfterReceivedDamage { move_type } => {
                self.after_received_damage(move_type, holder, ctx)
            }
            LifecycleHook::AfterFainted => self.after_fainted(),
            LifecycleHook::AfterSwitchedOut => self.after_switched_out(),
        }
    }

    pub fn before_turn(&mut self, holder: &Pokemon, ctx: &mut HookContext<'_>) -> ConditionLifecycle {
        match self {
            StatusCondition::Freeze => {
                if ctx.rng.roll_percent("freeze thaw") <= 20 {
                    defrost(holder, ctx)
                } else {
                    ConditionLifecycle::Keep
                }
            }
            StatusCondition::Poison
            | StatusCondition::Burn
            | StatusCondition::Paralysis
            | StatusCondition::BadlyPoisoned { .. }
            | StatusCondition::Sleep { .. } => ConditionLifecycle::Keep,
        }
    }

    pub fn after_turn(&mut self, holder: &mut Pokemon, ctx: &mut HookContext<'_>) -> ConditionLifecycle {
        match self {
            StatusCondition::Poison => {
                if !holder.fainted() {
                    let delta = periodic_damage(holder.max_hp(), 1.0 / 8.0);
                    let (trainer, pokemon) = ctx.names(holder);
                    ctx.log.push(BattleEvent::DamageByPoison {
                        trainer,
                        pokemon,
                        delta,
                    });
                    holder.change_hp_by(delta);
                }
                ConditionLifecycle::Keep
            }
            StatusCondition::Burn => {
                if !holder.fainted() {
                    let delta = periodic_damage(holder.max_hp(), 1.0 / 16.0);
                    let (trainer, pokemon) = ctx.names(holder);
                    ctx.log.push(BattleEvent::DamageByBurn {
                        trainer,
                        pokemon,
                        delta,
                    });
                    holder.change_hp_by(delta);
                }
                ConditionLifecycle::Keep
            }
            StatusCondition::BadlyPoisoned { turn_count } => {
                if !holder.fainted() {
                    let turns = (*turn_count).min(BADLY_POISONED_TURN_CAP);
                    let fraction = f64::from(turns + 1) / 16.0;
                    let delta = periodic_damage(holder.max_hp(), fraction);
                    let (trainer, pokemon) = ctx.names(holder);
                    ctx.log.push(BattleEvent::DamageByBadlyPoisoned {
                        trainer,
                        pokemon,
                        delta,
                    });
                    holder.change_hp_by(delta);
                }
                *turn_count = turn_count.saturating_add(1);
                ConditionLifecycle::Keep
            }
            StatusCondition::Sleep {
                turn_count,
                max_turn_count,
            } => {
                if *turn_count >= *max_turn_count {
                    let (trainer, pokemon) = ctx.names(holder);
                    ctx.log.push(BattleEvent::WakeUp { trainer, pokemon });
                    return ConditionLifecycle::Remove;
                }
                *turn_count += 1;
                ConditionLifecycle::Keep
            }
            StatusCondition::Freeze | StatusCondition::Paralysis => ConditionLifecycle::Keep,
        }
    }

    /// True when this condition stops the holder from acting. Logs the reason.
    pub fn prevents_move(&self, holder: &Pokemon, ctx: &mut HookContext<'_>) -> bool {
        match self {
            StatusCondition::Sleep { .. } => {
                let (trainer, pokemon) = ctx.names(holder);
                ctx.log.push(BattleEvent::Sleeping { trainer, pokemon });
                true
            }
            StatusCondition::Freeze => {
                let (trainer, pokemon) = ctx.names(holder);
                ctx.log.push(BattleEvent::Frozen { trainer, pokemon });
                true
            }
            StatusCondition::Paralysis => {
                if ctx.rng.roll_percent("full paralysis") <= 25 {
                    let (trainer, pokemon) = ctx.names(holder);
                    ctx.log.push(BattleEvent::Paralysed { trainer, pokemon });
                    true
                } else {
                    false
                }
            }
            StatusCondition::Poison
            | StatusCondition::Burn
            | StatusCondition::BadlyPoisoned { .. } => false,
        }
    }

    pub fn stat_modifier(&self, stat: StatType) -> f64 {
        match (self, stat) {
            (StatusCondition::Paralysis, StatType::Speed) => 0.5,
            _ => 1.0,
        }
    }

    /// Factor on the damage the holder deals with a move of `category`.
    pub fn damage_modifier(&self, category: MoveCategory) -> f64 {
        match (self, category) {
            (StatusCondition::Burn, MoveCategory::Physical) => 0.5,
            _ => 1.0,
        }
    }

    pub fn after_received_damage(
        &mut self,
        move_type: PokemonType,
        holder: &Pokemon,
        ctx: &mut HookContext<'_>,
    ) -> ConditionLifecycle {
        match self {
            StatusCondition::Freeze if move_type == PokemonType::Fire => defrost(holder, ctx),
            _ => ConditionLifecycle::Keep,
        }
    }

    // Paralysis is the one condition fainting does not clear.
    pub fn after_fainted(&mut self) -> ConditionLifecycle {
        match self {
            StatusCondition::Paralysis => ConditionLifecycle::Keep,
            StatusCondition::Poison
            | StatusCondition::Burn
            | StatusCondition::Freeze
            | StatusCondition::BadlyPoisoned { .. }
            | StatusCondition::Sleep { .. } => ConditionLifecycle::Remove,
        }
    }

    pub fn after_switched_out(&mut self) -> ConditionLifecycle {
        if let StatusCondition::BadlyPoisoned { turn_count } = self {
            *turn_count = 0;
        }
        ConditionLifecycle::Keep
    }
}

fn defrost(holder: &Pokemon, ctx: &mut HookContext<'_>) -> ConditionLifecycle {
    let (trainer, pokemon) = ctx.names(holder);
    ctx.log.push(BattleEvent::Defrosts { trainer, pokemon });
    ConditionLifecycle::Remove
}

// At least one point of damage, as a negative HP delta.
fn periodic_damage(max_hp: u16, fraction: f64) -> i32 {
    let damage = (f64::from(max_hp) * fraction) as i32;
    (-damage).min(-1)
}
