use crate::battle::rng::BattleRng;
use crate::catalog::Catalog;
use crate::pokemon::Pokemon;
use schema::{MoveCategory, MoveData};

/// One damage roll of `move_data` from `attacker` against `target`.
///
/// Every factor is read from the pre-damage state. The critical roll is drawn
/// before the variance roll.
#[derive(Debug, Clone, PartialEq)]
pub struct Damage {
    simple_damage: f64,
    critical: bool,
    random_modifier: f64,
    stab_modifier: f64,
    type_modifier: f64,
    status_condition_modifier: f64,
}

impl Damage {
    pub fn calculate(
        attacker: &Pokemon,
        target: &Pokemon,
        move_data: &MoveData,
        catalog: &dyn Catalog,
        rng: &mut dyn BattleRng,
    ) -> Self {
        let critical_threshold = (attacker.critical_hit_prob() * 1000.0) as u32;
        let critical = rng.roll_permille("critical hit") <= critical_threshold;
        let random_modifier = f64::from(rng.range_inclusive(850, 1000, "damage variance")) / 1000.0;

        let stab_modifier = if attacker.types().contains(&move_data.move_type) {
            1.5
        } else {
            1.0
        };
        let type_modifier = target
            .types()
            .iter()
            .map(|defending| catalog.type_effectiveness(move_data.move_type, *defending))
            .product();
        let status_condition_modifier = attacker
            .status_conditions()
            .iter()
            .map(|condition| condition.damage_modifier(move_data.category))
            .product();

        Damage {
            simple_damage: simple_damage(attacker, target, move_data),
            critical,
            random_modifier,
            stab_modifier,
            type_modifier,
            status_condition_modifier,
        }
    }

    pub fn damage(&self) -> u16 {
        (self.simple_damage * self.modifier()) as u16
    }

    pub fn critical(&self) -> bool {
        self.critical
    }

    pub fn effective(&self) -> bool {
        self.type_modifier > 1.0
    }

    pub fn ineffective(&self) -> bool {
        self.type_modifier < 1.0
    }

    fn modifier(&self) -> f64 {
        target_modifier()
            * weather_modifier()
            * self.critical_hit_modifier()
            * self.random_modifier
            * self.stab_modifier
            * self.type_modifier
            * burn_modifier()
            * self.status_condition_modifier
    }

    fn critical_hit_modifier(&self) -> f64 {
        if self.critical {
            1.5
        } else {
            1.0
        }
    }
}

// Spread moves are not weakened yet.
fn target_modifier() -> f64 {
    1.0
}

fn weather_modifier() -> f64 {
    1.0
}

// Burn's halving comes from the condition's own damage modifier.
fn burn_modifier() -> f64 {
    1.0
}

fn simple_damage(attacker: &Pokemon, target: &Pokemon, move_data: &MoveData) -> f64 {
    let ratio = match move_data.category {
        MoveCategory::Special => f64::from(attacker.sp_atk()) / f64::from(target.sp_def().max(1)),
        MoveCategory::Physical | MoveCategory::Status => {
            f64::from(attacker.atk()) / f64::from(target.def().max(1))
        }
    };
    let level_factor = 2.0 * f64::from(attacker.level()) / 5.0 + 2.0;
    ((level_factor * f64::from(move_data.power) * ratio) / 50.0).floor() + 2.0
}
