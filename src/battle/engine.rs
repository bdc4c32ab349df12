use std::fmt;
use std::sync::Arc;

use crate::battle::action_stack::{Action, QueuedAction};
use crate::battle::arena::{pokemon_mut, trainer_ref, PokemonRef, Side, TrainerId};
use crate::battle::calculators::BattleParts;
use crate::battle::options::BattleOptions;
use crate::battle::rng::{BattleRng, SeededRng};
use crate::battle::state::{BattleEvent, EventLog};
use crate::battle::turn_orchestrator::Turn;
use crate::catalog::Catalog;
use crate::errors::{BattleResult, BattleStateError};
use crate::player::Trainer;

/// A battle between two or more sides.
///
/// The caller drives it by polling: ask each trainer for its legal actions,
/// submit one with [`Battle::add_action`], then call
/// [`Battle::continue_battle`] until it returns `false` or the battle is over.
pub struct Battle {
    pub(crate) sides: Vec<Side>,
    pub(crate) options: BattleOptions,
    pub(crate) pending_actions: Vec<QueuedAction>,
    pub(crate) log: EventLog,
    pub(crate) turns: Vec<Turn>,
    pub(crate) catalog: Arc<dyn Catalog>,
    pub(crate) rng: Box<dyn BattleRng>,
    pub(crate) started: bool,
}

impl Battle {
    /// Creates a battle seeded from `options.seed`.
    pub fn new(
        sides: Vec<Vec<Trainer>>,
        catalog: Arc<dyn Catalog>,
        options: BattleOptions,
    ) -> BattleResult<Self> {
        let rng = SeededRng::new(options.seed);
        tracing::debug!(seed = rng.initial_seed(), "battle rng seeded");
        Self::with_rng(sides, catalog, options, Box::new(rng))
    }

    /// Creates a battle drawing every random outcome from `rng`.
    pub fn with_rng(
        sides: Vec<Vec<Trainer>>,
        catalog: Arc<dyn Catalog>,
        options: BattleOptions,
        rng: Box<dyn BattleRng>,
    ) -> BattleResult<Self> {
        if sides.len() < 2 || sides.iter().any(Vec::is_empty) {
            return Err(BattleStateError::NotEnoughSides(
                sides.iter().filter(|side| !side.is_empty()).count(),
            )
            .into());
        }
        Ok(Battle {
            sides: sides.into_iter().map(Side::new).collect(),
            options,
            pending_actions: Vec::new(),
            log: EventLog::new(),
            turns: Vec::new(),
            catalog,
            rng,
            started: false,
        })
    }

    // --- Queries ---

    pub fn sides(&self) -> &[Side] {
        &self.sides
    }

    pub fn options(&self) -> &BattleOptions {
        &self.options
    }

    pub fn trainer(&self, id: TrainerId) -> Option<&Trainer> {
        trainer_ref(&self.sides, id).ok()
    }

    pub fn trainer_ids(&self) -> Vec<TrainerId> {
        self.sides
            .iter()
            .enumerate()
            .flat_map(|(side, s)| (0..s.trainers.len()).map(move |index| TrainerId::new(side, index)))
            .collect()
    }

    /// Positions per side: positions per trainer times the largest trainer count.
    pub fn pokemon_per_side(&self) -> usize {
        let trainers = self
            .sides
            .iter()
            .map(|side| side.trainers.len())
            .max()
            .unwrap_or(0);
        self.options.pokemon_per_trainer * trainers
    }

    pub fn started(&self) -> bool {
        self.started
    }

    /// True once at most one side still has a healthy pokemon.
    pub fn finished(&self) -> bool {
        self.sides.iter().filter(|side| !side.fainted()).count() <= 1
    }

    /// The index of the winning side. `None` while running and on a draw.
    pub fn winner(&self) -> Option<usize> {
        if !self.finished() {
            return None;
        }
        self.sides.iter().position(|side| !side.fainted())
    }

    pub fn log(&self) -> &EventLog {
        &self.log
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn pending_actions(&self) -> &[QueuedAction] {
        &self.pending_actions
    }

    pub fn catalog(&self) -> &dyn Catalog {
        self.catalog.as_ref()
    }

    pub(crate) fn parts(&mut self) -> BattleParts<'_> {
        BattleParts {
            sides: &mut self.sides,
            log: &mut self.log,
            rng: self.rng.as_mut(),
            catalog: self.catalog.as_ref(),
        }
    }

    // --- Driving ---

    /// Advances the battle by one step.
    ///
    /// The first call sends every trainer's opening pokemon. Later calls run
    /// a turn once no trainer has a legal action left to submit, and return
    /// `false` while some trainer still does, or once the battle is over.
    pub fn continue_battle(&mut self) -> BattleResult<bool> {
        if self.finished() {
            return Ok(false);
        }
        if !self.started {
            self.start()?;
            return Ok(true);
        }

        for id in self.trainer_ids() {
            self.auto_resolve_growth_events(id)?;
        }
        for id in self.trainer_ids() {
            if !self.valid_actions_for(id)?.is_empty() {
                return Ok(false);
            }
        }

        let actions = std::mem::take(&mut self.pending_actions);
        let mut turn = Turn::new(self.turns.len() + 1, actions);
        turn.execute(self)?;
        self.turns.push(turn);
        self.log.finish_segment();
        Ok(true)
    }

    fn start(&mut self) -> BattleResult<()> {
        let per_trainer = self.options.pokemon_per_trainer;
        for id in self.trainer_ids() {
            let healthy: Vec<usize> = trainer_ref(&self.sides, id)?
                .team
                .iter()
                .enumerate()
                .filter(|(_, pokemon)| !pokemon.fainted())
                .map(|(index, _)| index)
                .take(per_trainer)
                .collect();
            for team_index in healthy {
                self.send_to_battle(PokemonRef {
                    trainer: id,
                    team_index,
                })?;
            }
        }
        self.started = true;
        self.log.finish_segment();
        tracing::debug!(
            sides = self.sides.len(),
            pokemon_per_side = self.pokemon_per_side(),
            "battle started"
        );
        Ok(())
    }

    /// Submits an action. Returns `false` when it is not currently legal for
    /// `trainer`. A growth choice takes effect immediately.
    pub fn add_action(&mut self, trainer: TrainerId, action: Action) -> BattleResult<bool> {
        if !self.valid_actions_for(trainer)?.contains(&action) {
            tracing::debug!(?trainer, ?action, "rejected action");
            return Ok(false);
        }
        if let Action::GrowthChoice { team_index, option } = &action {
            self.resolve_growth_event(trainer, *team_index, Some(option))?;
            return Ok(true);
        }
        self.pending_actions.push(QueuedAction { trainer, action });
        Ok(true)
    }

    /// Submits a uniformly random legal action for `trainer`.
    pub fn simulate_action(&mut self, trainer: TrainerId) -> BattleResult<bool> {
        let mut actions = self.valid_actions_for(trainer)?;
        if actions.is_empty() {
            return Ok(false);
        }
        let index = self.rng.index(actions.len(), "simulated action");
        self.add_action(trainer, actions.swap_remove(index))
    }

    /// Executes the front growth event of a team member and logs its message.
    pub(crate) fn resolve_growth_event(
        &mut self,
        trainer: TrainerId,
        team_index: usize,
        option: Option<&str>,
    ) -> BattleResult<()> {
        let trainer_name = trainer_ref(&self.sides, trainer)?.name.clone();
        let pokemon = pokemon_mut(
            &mut self.sides,
            PokemonRef {
                trainer,
                team_index,
            },
        )?;
        let name = pokemon.name().to_string();
        let message = pokemon.resolve_growth_event(option, self.catalog.as_ref())?;
        self.log.push(BattleEvent::GrowthEvent {
            trainer: trainer_name,
            pokemon: name,
            message,
        });
        Ok(())
    }

    /// Resolves read-only growth events of `trainer` until a choice or
    /// nothing is left.
    pub(crate) fn auto_resolve_growth_events(&mut self, trainer: TrainerId) -> BattleResult<()> {
        let limit = self.options.max_growth_chain_depth;
        let mut resolved = 0;
        loop {
            let owner = trainer_ref(&self.sides, trainer)?;
            let Some((team_index, event)) = owner.growth_event() else {
                return Ok(());
            };
            if !event.read_only(&owner.team[team_index]) {
                return Ok(());
            }
            if resolved >= limit {
                tracing::warn!(?trainer, limit, "growth event chain did not settle");
                return Err(BattleStateError::GrowthChainTooDeep(limit).into());
            }
            tracing::debug!(?trainer, team_index, ?event, "auto-resolving growth event");
            self.resolve_growth_event(trainer, team_index, None)?;
            resolved += 1;
        }
    }
}

impl fmt::Debug for Battle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Battle")
            .field("sides", &self.sides)
            .field("options", &self.options)
            .field("pending_actions", &self.pending_actions)
            .field("turns", &self.turns.len())
            .field("started", &self.started)
            .finish_non_exhaustive()
    }
}
