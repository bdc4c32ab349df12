use crate::battle::conditions::{ConditionLifecycle, StatusCondition};
use crate::battle::stats::{
    accuracy_evasion_multiplier, apply_stat_stage_multiplier, critical_hit_probability, StatStages,
};
use crate::catalog::{Catalog, StatFormula};
use crate::errors::{ActionError, BattleResult};
use crate::growth::GrowthEvent;
use schema::{
    ItemData, ItemEffect, MoveData, Nature, PokemonSpecies, PokemonType, Stat, StatType,
    StatusType,
};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use strum::IntoEnumIterator;

pub const MAX_MOVES: usize = 4;
pub const MAX_LEVEL: u8 = 100;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveInstance {
    pub data: MoveData,
    pub pp: u8,
    pub max_pp: u8,
}

impl MoveInstance {
    pub fn new(data: MoveData) -> Self {
        let max_pp = data.pp;
        Self {
            data,
            pp: max_pp,
            max_pp,
        }
    }

    pub fn name(&self) -> &str {
        &self.data.name
    }

    pub fn has_pp(&self) -> bool {
        self.pp > 0
    }
}

/// A team member: static species data plus everything that changes during a battle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pokemon {
    nickname: Option<String>,
    species: PokemonSpecies,
    nature: Nature,
    level: u8,
    ivs: [u8; 6],
    evs: [u8; 6],
    stats: [u16; 6], // HP, ATK, DEF, SP.ATK, SP.DEF, SPD
    current_hp: u16,
    moves: Vec<MoveInstance>,
    status_conditions: Vec<StatusCondition>,
    stat_stages: StatStages,
    growth_events: VecDeque<GrowthEvent>,
}

impl Pokemon {
    pub fn name(&self) -> &str {
        self.nickname.as_deref().unwrap_or(&self.species.name)
    }

    pub fn species(&self) -> &PokemonSpecies {
        &self.species
    }

    pub fn types(&self) -> &[PokemonType] {
        &self.species.types
    }

    pub fn level(&self) -> u8 {
        self.level
    }

    pub fn nature(&self) -> &Nature {
        &self.nature
    }

    // --- HP ---

    pub fn max_hp(&self) -> u16 {
        self.stats[Stat::Hp.index()]
    }

    pub fn current_hp(&self) -> u16 {
        self.current_hp
    }

    pub fn fainted(&self) -> bool {
        self.current_hp == 0
    }

    /// Adds `delta` to current HP, clamped to `0..=max_hp`.
    pub fn change_hp_by(&mut self, delta: i32) {
        let updated = (i64::from(self.current_hp) + i64::from(delta)).clamp(0, i64::from(self.max_hp()));
        self.current_hp = updated as u16;
    }

    // --- Moves ---

    pub fn moves(&self) -> &[MoveInstance] {
        &self.moves
    }

    pub fn move_named(&self, name: &str) -> Option<&MoveInstance> {
        self.moves.iter().find(|move_instance| move_instance.name() == name)
    }

    pub fn moves_with_pp(&self) -> impl Iterator<Item = &MoveInstance> {
        self.moves.iter().filter(|move_instance| move_instance.has_pp())
    }

    /// Adds `delta` to the PP of the named move, clamped to `0..=max_pp`.
    /// Unknown names (Struggle) are ignored.
    pub fn change_pp_by(&mut self, move_name: &str, delta: i32) {
        if let Some(move_instance) = self.moves.iter_mut().find(|m| m.name() == move_name) {
            let updated = (i32::from(move_instance.pp) + delta).clamp(0, i32::from(move_instance.max_pp));
            move_instance.pp = updated as u8;
        }
    }

    pub(crate) fn learn_move(&mut self, data: MoveData) {
        if self.moves.len() < MAX_MOVES {
            self.moves.push(MoveInstance::new(data));
        }
    }

    pub(crate) fn replace_move(&mut self, forgotten: &str, data: MoveData) -> bool {
        match self.moves.iter_mut().find(|m| m.name() == forgotten) {
            Some(slot) => {
                *slot = MoveInstance::new(data);
                true
            }
            None => false,
        }
    }

    // --- Stats ---

    /// Permanent stat from the stat formula, before stages and conditions.
    pub fn stat(&self, stat: Stat) -> u16 {
        self.stats[stat.index()]
    }

    pub fn stat_stage(&self, stat: StatType) -> i8 {
        self.stat_stages.get(stat)
    }

    /// Returns false when the clamp absorbed the whole change.
    pub fn change_stat_by(&mut self, stat: StatType, change_by: i8) -> bool {
        self.stat_stages.change(stat, change_by)
    }

    pub fn reset_stats(&mut self) {
        self.stat_stages.reset();
    }

    fn status_stat_modifier(&self, stat: StatType) -> f64 {
        self.status_conditions
            .iter()
            .map(|condition| condition.stat_modifier(stat))
            .product()
    }

    fn battle_stat(&self, base: Stat, stat: StatType) -> u16 {
        apply_stat_stage_multiplier(
            self.stat(base),
            self.stat_stage(stat),
            self.status_stat_modifier(stat),
        )
    }

    pub fn atk(&self) -> u16 {
        self.battle_stat(Stat::Atk, StatType::Atk)
    }

    pub fn def(&self) -> u16 {
        self.battle_stat(Stat::Def, StatType::Def)
    }

    pub fn sp_atk(&self) -> u16 {
        self.battle_stat(Stat::SpAtk, StatType::SpAtk)
    }

    pub fn sp_def(&self) -> u16 {
        self.battle_stat(Stat::SpDef, StatType::SpDef)
    }

    pub fn speed(&self) -> u16 {
        self.battle_stat(Stat::Speed, StatType::Speed)
    }

    pub fn accuracy(&self) -> f64 {
        accuracy_evasion_multiplier(self.stat_stage(StatType::Accuracy))
            * self.status_stat_modifier(StatType::Accuracy)
    }

    pub fn evasion(&self) -> f64 {
        accuracy_evasion_multiplier(self.stat_stage(StatType::Evasion))
            * self.status_stat_modifier(StatType::Evasion)
    }

    pub fn critical_hit_prob(&self) -> f64 {
        critical_hit_probability(self.stat_stage(StatType::CriticalHit))
    }

    fn recalculate_stats(&mut self, formula: &dyn StatFormula) {
        let old_max = self.max_hp();
        self.stats = compute_stats(
            &self.species,
            self.level,
            &self.ivs,
            &self.evs,
            &self.nature,
            formula,
        );
        // keep damage taken, not the HP ratio
        let gained = i32::from(self.max_hp()) - i32::from(old_max);
        if !self.fainted() {
            self.change_hp_by(gained);
        }
    }

    pub(crate) fn grow_to_level(&mut self, level: u8, catalog: &dyn Catalog) {
        self.level = level.min(MAX_LEVEL);
        self.recalculate_stats(catalog.stat_formula());
    }

    pub(crate) fn evolve_into(&mut self, species: &str, catalog: &dyn Catalog) -> BattleResult<()> {
        self.species = catalog.species(species)?.clone();
        self.recalculate_stats(catalog.stat_formula());
        Ok(())
    }

    // --- Status conditions ---

    pub fn status_conditions(&self) -> &[StatusCondition] {
        &self.status_conditions
    }

    pub fn has_status(&self, kind: StatusType) -> bool {
        self.status_conditions.iter().any(|c| c.kind() == kind)
    }

    /// Attaches a condition unless one is already present.
    pub fn add_status_condition(&mut self, condition: StatusCondition) -> bool {
        if !self.status_conditions.is_empty() {
            return false;
        }
        self.status_conditions.push(condition);
        true
    }

    pub fn cure(&mut self, kind: StatusType) -> bool {
        let before = self.status_conditions.len();
        self.status_conditions.retain(|c| c.kind() != kind);
        before != self.status_conditions.len()
    }

    /// Runs `hook` over the first `limit` attached conditions (all when `None`),
    /// dropping the ones that ask to be removed.
    pub(crate) fn run_condition_hooks<F>(&mut self, limit: Option<usize>, mut hook: F)
    where
        F: FnMut(&mut StatusCondition, &mut Pokemon) -> ConditionLifecycle,
    {
        let mut conditions = std::mem::take(&mut self.status_conditions);
        let split = limit.unwrap_or(conditions.len()).min(conditions.len());
        let untouched = conditions.split_off(split);
        let mut kept = Vec::with_capacity(conditions.len() + untouched.len());
        for mut condition in conditions {
            if hook(&mut condition, self) == ConditionLifecycle::Keep {
                kept.push(condition);
            }
        }
        kept.extend(untouched);
        // conditions attached by a hook itself stay after the existing ones
        kept.append(&mut self.status_conditions);
        self.status_conditions = kept;
    }

    // --- Growth events ---

    pub fn growth_event(&self) -> Option<&GrowthEvent> {
        self.growth_events.front()
    }

    pub fn add_growth_event(&mut self, event: GrowthEvent) {
        self.growth_events.push_back(event);
    }

    pub(crate) fn prepend_growth_events(&mut self, events: Vec<GrowthEvent>) {
        for event in events.into_iter().rev() {
            self.growth_events.push_front(event);
        }
    }

    /// Whether the pending growth event waits on a choice.
    pub fn awaiting_growth_choice(&self) -> bool {
        self.growth_event()
            .is_some_and(|event| !event.read_only(self))
    }

    /// Executes the front growth event and returns its message.
    ///
    /// Read-only events ignore `option`; choice events require one of their
    /// `possible_actions`.
    pub fn resolve_growth_event(
        &mut self,
        option: Option<&str>,
        catalog: &dyn Catalog,
    ) -> BattleResult<String> {
        let event = self
            .growth_events
            .pop_front()
            .ok_or(ActionError::NoPendingGrowthEvent)?;
        let message = event.message(self);
        let option = if event.read_only(self) {
            None
        } else {
            match option {
                Some(choice) if event.possible_actions(self).iter().any(|o| o == choice) => {
                    Some(choice)
                }
                other => {
                    let rejected = other.unwrap_or_default().to_string();
                    self.growth_events.push_front(event);
                    return Err(ActionError::InvalidGrowthOption(rejected).into());
                }
            }
        };
        event.execute(self, option, catalog)?;
        Ok(message)
    }

    // --- Items ---

    pub fn usable_item(&self, item: &ItemData) -> bool {
        match &item.effect {
            ItemEffect::RestoreHp(_) => !self.fainted() && self.current_hp < self.max_hp(),
            ItemEffect::RestorePp(_) => self.moves.iter().any(|m| m.pp < m.max_pp),
            ItemEffect::CureStatus(kind) => self.has_status(*kind),
            ItemEffect::GainLevel => self.level < MAX_LEVEL,
            ItemEffect::EvolutionStone => {
                !self.fainted() && self.species.item_evolution(&item.name).is_some()
            }
        }
    }

    /// Applies an item. Multi-step effects queue growth events instead of
    /// finishing here.
    pub fn use_item(&mut self, item: &ItemData) {
        match &item.effect {
            ItemEffect::RestoreHp(amount) => self.change_hp_by(i32::from(*amount)),
            ItemEffect::RestorePp(amount) => {
                self.add_growth_event(GrowthEvent::RestorePp { amount: *amount })
            }
            ItemEffect::CureStatus(kind) => {
                self.cure(*kind);
            }
            ItemEffect::GainLevel => self.add_growth_event(GrowthEvent::LevelUp {
                new_level: self.level.saturating_add(1).min(MAX_LEVEL),
            }),
            ItemEffect::EvolutionStone => {
                if let Some(into) = self.species.item_evolution(&item.name) {
                    let into = into.to_string();
                    self.add_growth_event(GrowthEvent::Evolution { into });
                }
            }
        }
    }
}

fn compute_stats(
    species: &PokemonSpecies,
    level: u8,
    ivs: &[u8; 6],
    evs: &[u8; 6],
    nature: &Nature,
    formula: &dyn StatFormula,
) -> [u16; 6] {
    let mut stats = [0u16; 6];
    for stat in Stat::iter() {
        let index = stat.index();
        stats[index] = formula.initial_stat(
            stat,
            level,
            ivs[index],
            evs[index],
            nature,
            &species.base_stats,
        );
    }
    stats
}

/// Builds a [`Pokemon`] from catalog data.
///
/// Defaults: Hardy nature, zero IVs and EVs, full HP and the last four
/// learnset moves at or below the level.
#[derive(Debug, Clone)]
pub struct PokemonBuilder {
    species: String,
    level: u8,
    nickname: Option<String>,
    nature: String,
    ivs: [u8; 6],
    evs: [u8; 6],
    moves: Option<Vec<String>>,
    pp_overrides: Vec<(String, u8)>,
    hp: Option<u16>,
    conditions: Vec<StatusCondition>,
}

impl PokemonBuilder {
    pub fn new(species: &str, level: u8) -> Self {
        Self {
            species: species.to_string(),
            level,
            nickname: None,
            nature: "Hardy".to_string(),
            ivs: [0; 6],
            evs: [0; 6],
            moves: None,
            pp_overrides: Vec::new(),
            hp: None,
            conditions: Vec::new(),
        }
    }

    pub fn nickname(mut self, nickname: &str) -> Self {
        self.nickname = Some(nickname.to_string());
        self
    }

    pub fn nature(mut self, nature: &str) -> Self {
        self.nature = nature.to_string();
        self
    }

    pub fn ivs(mut self, ivs: [u8; 6]) -> Self {
        self.ivs = ivs;
        self
    }

    pub fn evs(mut self, evs: [u8; 6]) -> Self {
        self.evs = evs;
        self
    }

    pub fn moves(mut self, moves: &[&str]) -> Self {
        self.moves = Some(moves.iter().map(|m| m.to_string()).collect());
        self
    }

    pub fn pp(mut self, move_name: &str, pp: u8) -> Self {
        self.pp_overrides.push((move_name.to_string(), pp));
        self
    }

    pub fn hp(mut self, hp: u16) -> Self {
        self.hp = Some(hp);
        self
    }

    pub fn status(mut self, condition: StatusCondition) -> Self {
        self.conditions.push(condition);
        self
    }

    pub fn build(self, catalog: &dyn Catalog) -> BattleResult<Pokemon> {
        let species = catalog.species(&self.species)?.clone();
        let nature = catalog.nature(&self.nature)?.clone();
        let level = self.level.clamp(1, MAX_LEVEL);

        let move_names = match self.moves {
            Some(names) => names,
            None => {
                let known: Vec<String> = species
                    .learnset
                    .iter()
                    .filter(|entry| entry.level <= level)
                    .map(|entry| entry.move_name.clone())
                    .collect();
                let skip = known.len().saturating_sub(MAX_MOVES);
                known.into_iter().skip(skip).collect()
            }
        };
        let mut moves = Vec::with_capacity(MAX_MOVES);
        for name in move_names.iter().take(MAX_MOVES) {
            let mut instance = MoveInstance::new(catalog.move_data(name)?.clone());
            if let Some((_, pp)) = self.pp_overrides.iter().find(|(n, _)| n == name) {
                instance.pp = (*pp).min(instance.max_pp);
            }
            moves.push(instance);
        }

        let stats = compute_stats(
            &species,
            level,
            &self.ivs,
            &self.evs,
            &nature,
            catalog.stat_formula(),
        );
        let max_hp = stats[Stat::Hp.index()];

        Ok(Pokemon {
            nickname: self.nickname,
            species,
            nature,
            level,
            ivs: self.ivs,
            evs: self.evs,
            stats,
            current_hp: self.hp.unwrap_or(max_hp).min(max_hp),
            moves,
            status_conditions: self.conditions,
            stat_stages: StatStages::default(),
            growth_events: VecDeque::new(),
        })
    }
}
