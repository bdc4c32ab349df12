use schema::StatType;

// (numerator, denominator) indexed by stage + 6
const STAGE_MULTIPLIERS: [(u32, u32); 13] = [
    (2, 8),
    (2, 7),
    (2, 6),
    (2, 5),
    (2, 4),
    (2, 3),
    (2, 2),
    (3, 2),
    (4, 2),
    (5, 2),
    (6, 2),
    (7, 2),
    (8, 2),
];

const ACCURACY_EVASION_MULTIPLIERS: [(u32, u32); 13] = [
    (3, 9),
    (3, 8),
    (3, 7),
    (3, 6),
    (3, 5),
    (3, 4),
    (3, 3),
    (4, 3),
    (5, 3),
    (6, 3),
    (7, 3),
    (8, 3),
    (9, 3),
];

// indexed by stage 0..=3
const CRITICAL_HIT_PROBABILITIES: [(u32, u32); 4] = [(1, 24), (1, 8), (1, 2), (1, 1)];

fn ratio((numerator, denominator): (u32, u32)) -> f64 {
    f64::from(numerator) / f64::from(denominator)
}

fn table_index(stage: i8) -> usize {
    (i32::from(stage.clamp(-6, 6)) + 6) as usize
}

/// Multiplier for a battle stat (atk, def, sp_atk, sp_def, speed) at `stage`.
pub fn stage_multiplier(stage: i8) -> f64 {
    ratio(STAGE_MULTIPLIERS[table_index(stage)])
}

/// Multiplier for accuracy or evasion at `stage`.
pub fn accuracy_evasion_multiplier(stage: i8) -> f64 {
    ratio(ACCURACY_EVASION_MULTIPLIERS[table_index(stage)])
}

/// Probability of landing a critical hit at `stage`.
pub fn critical_hit_probability(stage: i8) -> f64 {
    let index = stage.clamp(0, 3) as usize;
    ratio(CRITICAL_HIT_PROBABILITIES[index])
}

/// Apply the stage multiplier and a status modifier to a base stat, truncating.
pub fn apply_stat_stage_multiplier(base_stat: u16, stage: i8, status_modifier: f64) -> u16 {
    let (numerator, denominator) = STAGE_MULTIPLIERS[table_index(stage)];
    let staged = f64::from(u32::from(base_stat) * numerator) / f64::from(denominator);
    (staged * status_modifier) as u16
}

/// Per-stat stage counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct StatStages {
    atk: i8,
    def: i8,
    sp_atk: i8,
    sp_def: i8,
    speed: i8,
    accuracy: i8,
    evasion: i8,
    critical_hit: i8,
}

impl StatStages {
    pub fn get(&self, stat: StatType) -> i8 {
        match stat {
            StatType::Atk => self.atk,
            StatType::Def => self.def,
            StatType::SpAtk => self.sp_atk,
            StatType::SpDef => self.sp_def,
            StatType::Speed => self.speed,
            StatType::Accuracy => self.accuracy,
            StatType::Evasion => self.evasion,
            StatType::CriticalHit => self.critical_hit,
        }
    }

    fn get_mut(&mut self, stat: StatType) -> &mut i8 {
        match stat {
            StatType::Atk => &mut self.atk,
            StatType::Def => &mut self.def,
            StatType::SpAtk => &mut self.sp_atk,
            StatType::SpDef => &mut self.sp_def,
            StatType::Speed => &mut self.speed,
            StatType::Accuracy => &mut self.accuracy,
            StatType::Evasion => &mut self.evasion,
            StatType::CriticalHit => &mut self.critical_hit,
        }
    }

    /// Moves a counter by `change_by`, clamped to the stat's bounds.
    /// Returns false when the clamp absorbed the whole change.
    pub fn change(&mut self, stat: StatType, change_by: i8) -> bool {
        let (min, max) = stat.stage_bounds();
        let stage = self.get_mut(stat);
        let updated = (i16::from(*stage) + i16::from(change_by)).clamp(i16::from(min), i16::from(max));
        let changed = updated != i16::from(*stage);
        *stage = updated as i8;
        changed
    }

    pub fn reset(&mut self) {
        *self = StatStages::default();
    }
}
