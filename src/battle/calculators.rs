use crate::battle::arena::{pokemon_mut, pokemon_ref, trainer_ref, PokemonRef, Side};
use crate::battle::conditions::{HookContext, LifecycleHook, StatusCondition};
use crate::battle::damage::Damage;
use crate::battle::rng::BattleRng;
use crate::battle::state::{BattleEvent, EventLog};
use crate::catalog::Catalog;
use crate::errors::BattleResult;
use crate::pokemon::Pokemon;
use schema::{MoveData, StatChoice, StatModifier, StatType};
use strum::IntoEnumIterator;

/// Mutable battle state a move execution works on.
pub struct BattleParts<'a> {
    pub sides: &'a mut [Side],
    pub log: &'a mut EventLog,
    pub rng: &'a mut dyn BattleRng,
    pub catalog: &'a dyn Catalog,
}

/// One move against one target. A group move runs one of these per
/// occupied position, each independent of the others.
#[derive(Debug, Clone)]
pub struct MoveExecution<'m> {
    pub user: PokemonRef,
    pub move_data: &'m MoveData,
    pub target: PokemonRef,
}

impl MoveExecution<'_> {
    /// Runs prevention, hit check, damage, stat changes, status procs and the
    /// received-damage hook, in that order. Fainted pokemon are left on the
    /// field for the caller's sweep.
    pub fn execute(&self, parts: &mut BattleParts<'_>) -> BattleResult<()> {
        let user_trainer = trainer_ref(parts.sides, self.user.trainer)?.name.clone();
        let target_trainer = trainer_ref(parts.sides, self.target.trainer)?.name.clone();
        let attacker = pokemon_ref(parts.sides, self.user)?.clone();

        if self.prevented(&attacker, &user_trainer, parts) {
            return Ok(());
        }

        let defender = pokemon_ref(parts.sides, self.target)?.clone();
        let move_name = self.move_data.name.clone();
        if let Some(accuracy) = self.move_data.accuracy {
            let probability = f64::from(accuracy) / 100.0 * attacker.accuracy() / defender.evasion();
            let threshold = (probability * 1000.0) as u32;
            if parts.rng.roll_permille("hit check") > threshold {
                parts.log.push(BattleEvent::MoveDoesNotHit {
                    trainer: user_trainer,
                    pokemon: attacker.name().to_string(),
                    move_name,
                });
                return Ok(());
            }
        }
        parts.log.push(BattleEvent::UsesMove {
            trainer: user_trainer.clone(),
            pokemon: attacker.name().to_string(),
            move_name: move_name.clone(),
        });

        let conditions_before_hit = defender.status_conditions().len();
        let damaged = self.move_data.power > 0;
        if damaged {
            let damage = Damage::calculate(&attacker, &defender, self.move_data, parts.catalog, parts.rng);
            let amount = damage.damage();
            let target = pokemon_mut(parts.sides, self.target)?;
            if amount > 0 {
                parts.log.push(BattleEvent::ReceivedDamage {
                    trainer: target_trainer.clone(),
                    pokemon: target.name().to_string(),
                    move_name: move_name.clone(),
                    amount,
                });
                target.change_hp_by(-i32::from(amount));
                if target.fainted() {
                    parts.log.push(BattleEvent::TargetFainted {
                        trainer: target_trainer.clone(),
                        pokemon: target.name().to_string(),
                    });
                }
            } else {
                parts.log.push(BattleEvent::ReceivedNoDamage {
                    trainer: target_trainer.clone(),
                    pokemon: target.name().to_string(),
                    move_name: move_name.clone(),
                });
            }
        }

        for modifier in &self.move_data.stat_modifiers {
            self.apply_stat_modifier(modifier, &user_trainer, &target_trainer, parts)?;
        }

        self.apply_status_effects(&target_trainer, parts)?;

        if damaged {
            let move_type = self.move_data.move_type;
            let target = pokemon_mut(parts.sides, self.target)?;
            let mut ctx = HookContext {
                trainer_name: &target_trainer,
                log: &mut *parts.log,
                rng: &mut *parts.rng,
            };
            target.run_condition_hooks(Some(conditions_before_hit), |condition, holder| {
                condition.apply_hook(
                    LifecycleHook::AfterReceivedDamage { move_type },
                    holder,
                    &mut ctx,
                )
            });
        }
        Ok(())
    }

    fn prevented(
        &self,
        attacker: &Pokemon,
        trainer_name: &str,
        parts: &mut BattleParts<'_>,
    ) -> bool {
        let mut ctx = HookContext {
            trainer_name,
            log: &mut *parts.log,
            rng: &mut *parts.rng,
        };
        attacker
            .status_conditions()
            .iter()
            .any(|condition| condition.prevents_move(attacker, &mut ctx))
    }

    fn apply_stat_modifier(
        &self,
        modifier: &StatModifier,
        user_trainer: &str,
        target_trainer: &str,
        parts: &mut BattleParts<'_>,
    ) -> BattleResult<()> {
        let (affected, trainer) = if modifier.affects_user {
            (self.user, user_trainer)
        } else {
            (self.target, target_trainer)
        };
        let stat = match modifier.stat {
            StatChoice::Stat(stat) => stat,
            StatChoice::Random => {
                let stats: Vec<StatType> = StatType::iter().collect();
                stats[parts.rng.index(stats.len(), "random stat")]
            }
        };
        let pokemon = pokemon_mut(parts.sides, affected)?;
        let changed = pokemon.change_stat_by(stat, modifier.change_by);
        let (trainer, pokemon, stat) = (
            trainer.to_string(),
            pokemon.name().to_string(),
            stat.name().to_string(),
        );
        parts.log.push(if changed {
            BattleEvent::ChangesStat {
                trainer,
                pokemon,
                stat,
                change_by: modifier.change_by,
            }
        } else {
            BattleEvent::ChangesNoStat {
                trainer,
                pokemon,
                stat,
                change_by: modifier.change_by,
            }
        });
        Ok(())
    }

    fn apply_status_effects(&self, target_trainer: &str, parts: &mut BattleParts<'_>) -> BattleResult<()> {
        for effect in &self.move_data.status_conditions {
            // nothing sticks to a pokemon this move just knocked out
            if pokemon_ref(parts.sides, self.target)?.fainted() {
                return Ok(());
            }
            if parts.rng.roll_percent("status proc") > u32::from(effect.probability) {
                continue;
            }
            let condition = StatusCondition::new(effect.condition, parts.rng);
            let target = pokemon_mut(parts.sides, self.target)?;
            if target.add_status_condition(condition) {
                parts.log.push(BattleEvent::TargetConditionAdded {
                    trainer: target_trainer.to_string(),
                    pokemon: target.name().to_string(),
                    condition: effect.condition.name().to_string(),
                });
            }
        }
        Ok(())
    }
}
