//! Out-of-battle growth: level ups, new moves, PP restores and evolution.
//!
//! Events queue on the pokemon they concern. Read-only events resolve on
//! their own; the rest wait for the owning trainer to pick an option.

use crate::catalog::Catalog;
use crate::errors::{ActionError, BattleResult};
use crate::pokemon::{Pokemon, MAX_MOVES};
use serde::{Deserialize, Serialize};

pub const SKIP: &str = "Skip";
pub const CONTINUE: &str = "Continue";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GrowthEvent {
    LevelUp { new_level: u8 },
    LearnMove { move_name: String },
    RestorePp { amount: u8 },
    Evolution { into: String },
    DidEvolution { from: String, into: String },
    SkipEvolution { into: String },
}

impl GrowthEvent {
    /// Read-only events carry no options and resolve without a trainer.
    pub fn read_only(&self, pokemon: &Pokemon) -> bool {
        match self {
            GrowthEvent::LevelUp { .. }
            | GrowthEvent::DidEvolution { .. }
            | GrowthEvent::SkipEvolution { .. } => true,
            GrowthEvent::LearnMove { .. } => pokemon.moves().len() < MAX_MOVES,
            GrowthEvent::RestorePp { .. } | GrowthEvent::Evolution { .. } => false,
        }
    }

    pub fn message(&self, pokemon: &Pokemon) -> String {
        let name = pokemon.name();
        match self {
            GrowthEvent::LevelUp { new_level } => format!("{name} grew to level {new_level}"),
            GrowthEvent::LearnMove { move_name } if self.read_only(pokemon) => {
                format!("{name} learned {move_name}")
            }
            GrowthEvent::LearnMove { move_name } => {
                format!("{name} wants to learn {move_name} but already knows {MAX_MOVES} moves")
            }
            GrowthEvent::RestorePp { amount } => {
                format!("Choose a move of {name} to restore {amount} PP")
            }
            GrowthEvent::Evolution { into } => format!("{name} is evolving into {into}"),
            GrowthEvent::DidEvolution { from, into } => format!("{from} evolved into {into}"),
            GrowthEvent::SkipEvolution { into } => format!("{name} did not evolve into {into}"),
        }
    }

    /// Options a trainer may answer with. Empty for read-only events.
    pub fn possible_actions(&self, pokemon: &Pokemon) -> Vec<String> {
        if self.read_only(pokemon) {
            return Vec::new();
        }
        match self {
            // the option names the move to forget
            GrowthEvent::LearnMove { .. } => pokemon
                .moves()
                .iter()
                .map(|m| m.name().to_string())
                .chain(std::iter::once(SKIP.to_string()))
                .collect(),
            GrowthEvent::RestorePp { .. } => pokemon
                .moves()
                .iter()
                .filter(|m| m.pp < m.max_pp)
                .map(|m| m.name().to_string())
                .collect(),
            GrowthEvent::Evolution { .. } => vec![CONTINUE.to_string(), SKIP.to_string()],
            GrowthEvent::LevelUp { .. }
            | GrowthEvent::DidEvolution { .. }
            | GrowthEvent::SkipEvolution { .. } => Vec::new(),
        }
    }

    /// Applies the event. `option` has already been checked against
    /// [`GrowthEvent::possible_actions`] for choice events.
    pub(crate) fn execute(
        &self,
        pokemon: &mut Pokemon,
        option: Option<&str>,
        catalog: &dyn Catalog,
    ) -> BattleResult<()> {
        match self {
            GrowthEvent::LevelUp { new_level } => {
                pokemon.grow_to_level(*new_level, catalog);
                let level = pokemon.level();
                let mut follow_ups: Vec<GrowthEvent> = pokemon
                    .species()
                    .moves_learned_at(level)
                    .filter(|name| pokemon.move_named(name).is_none())
                    .map(|name| GrowthEvent::LearnMove {
                        move_name: name.to_string(),
                    })
                    .collect();
                if let Some(into) = pokemon.species().level_evolution(level) {
                    follow_ups.push(GrowthEvent::Evolution {
                        into: into.to_string(),
                    });
                }
                pokemon.prepend_growth_events(follow_ups);
            }
            GrowthEvent::LearnMove { move_name } => {
                let data = catalog.move_data(move_name)?.clone();
                match option {
                    None => pokemon.learn_move(data),
                    Some(SKIP) => {}
                    Some(forgotten) => {
                        if !pokemon.replace_move(forgotten, data) {
                            return Err(ActionError::InvalidGrowthOption(forgotten.to_string()).into());
                        }
                    }
                }
            }
            GrowthEvent::RestorePp { amount } => {
                let move_name = option
                    .ok_or_else(|| ActionError::InvalidGrowthOption(String::new()))?;
                pokemon.change_pp_by(move_name, i32::from(*amount));
            }
            GrowthEvent::Evolution { into } => match option {
                Some(CONTINUE) => {
                    let from = pokemon.name().to_string();
                    pokemon.evolve_into(into, catalog)?;
                    pokemon.prepend_growth_events(vec![GrowthEvent::DidEvolution {
                        from,
                        into: into.clone(),
                    }]);
                }
                Some(SKIP) => pokemon.prepend_growth_events(vec![GrowthEvent::SkipEvolution {
                    into: into.clone(),
                }]),
                other => {
                    return Err(ActionError::InvalidGrowthOption(
                        other.unwrap_or_default().to_string(),
                    )
                    .into())
                }
            },
            GrowthEvent::DidEvolution { .. } | GrowthEvent::SkipEvolution { .. } => {}
        }
        tracing::debug!(pokemon = pokemon.name(), event = ?self, ?option, "growth event resolved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::tests::common::{test_catalog, TestPokemonBuilder};
    use crate::catalog::Catalog;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_level_up_queues_new_moves() {
        // Arrange: Pikachu learns Thunder Wave at 8
        let catalog = test_catalog();
        let mut pikachu = TestPokemonBuilder::new("Pikachu", 7)
            .with_moves(vec!["Thunder Shock", "Growl"])
            .build();
        pikachu.add_growth_event(GrowthEvent::LevelUp { new_level: 8 });

        // Act
        let message = pikachu.resolve_growth_event(None, catalog.as_ref()).unwrap();

        // Assert
        assert_eq!(message, "Pikachu grew to level 8");
        assert_eq!(pikachu.level(), 8);
        assert_eq!(
            pikachu.growth_event(),
            Some(&GrowthEvent::LearnMove {
                move_name: "Thunder Wave".to_string()
            })
        );
        assert!(!pikachu.awaiting_growth_choice());

        let message = pikachu.resolve_growth_event(None, catalog.as_ref()).unwrap();
        assert_eq!(message, "Pikachu learned Thunder Wave");
        assert_eq!(pikachu.moves().len(), 3);
        assert_eq!(pikachu.growth_event(), None);
    }

    #[test]
    fn test_full_moveset_asks_which_move_to_forget() {
        let catalog = test_catalog();
        let mut pikachu = TestPokemonBuilder::new("Pikachu", 10)
            .with_moves(vec!["Thunder Shock", "Growl", "Tail Whip", "Thunder Wave"])
            .build();
        pikachu.add_growth_event(GrowthEvent::LearnMove {
            move_name: "Quick Attack".to_string(),
        });

        let event = pikachu.growth_event().unwrap().clone();
        assert!(!event.read_only(&pikachu));
        assert_eq!(
            event.possible_actions(&pikachu),
            vec!["Thunder Shock", "Growl", "Tail Whip", "Thunder Wave", "Skip"]
        );

        pikachu
            .resolve_growth_event(Some("Growl"), catalog.as_ref())
            .unwrap();

        let names: Vec<&str> = pikachu.moves().iter().map(|m| m.name()).collect();
        assert_eq!(names, vec!["Thunder Shock", "Quick Attack", "Tail Whip", "Thunder Wave"]);
    }

    #[test]
    fn test_unknown_option_is_rejected_and_event_kept() {
        let catalog = test_catalog();
        let mut pikachu = TestPokemonBuilder::new("Pikachu", 10).build();
        pikachu.add_growth_event(GrowthEvent::Evolution {
            into: "Raichu".to_string(),
        });

        let result = pikachu.resolve_growth_event(Some("Maybe"), catalog.as_ref());

        assert!(result.is_err());
        assert!(pikachu.awaiting_growth_choice());
    }

    #[test]
    fn test_evolution_can_continue_or_skip() {
        let catalog = test_catalog();
        let mut evolving = TestPokemonBuilder::new("Pikachu", 10).build();
        let mut staying = evolving.clone();
        let event = GrowthEvent::Evolution {
            into: "Raichu".to_string(),
        };
        evolving.add_growth_event(event.clone());
        staying.add_growth_event(event);

        evolving
            .resolve_growth_event(Some(CONTINUE), catalog.as_ref())
            .unwrap();
        staying
            .resolve_growth_event(Some(SKIP), catalog.as_ref())
            .unwrap();

        assert_eq!(evolving.name(), "Raichu");
        assert!(evolving.max_hp() > staying.max_hp());
        assert_eq!(
            evolving.resolve_growth_event(None, catalog.as_ref()).unwrap(),
            "Pikachu evolved into Raichu"
        );
        assert_eq!(staying.name(), "Pikachu");
        assert_eq!(
            staying.resolve_growth_event(None, catalog.as_ref()).unwrap(),
            "Pikachu did not evolve into Raichu"
        );
    }

    #[test]
    fn test_level_evolution_follows_level_up() {
        let catalog = test_catalog();
        let mut bulbasaur = TestPokemonBuilder::new("Bulbasaur", 15).build();
        bulbasaur.add_growth_event(GrowthEvent::LevelUp { new_level: 16 });

        bulbasaur.resolve_growth_event(None, catalog.as_ref()).unwrap();

        assert_eq!(
            bulbasaur.growth_event(),
            Some(&GrowthEvent::Evolution {
                into: "Ivysaur".to_string()
            })
        );
        assert_eq!(catalog.species("Ivysaur").unwrap().name, "Ivysaur");
    }

    #[test]
    fn test_restore_pp_offers_only_spent_moves() {
        let catalog = test_catalog();
        let mut pikachu = TestPokemonBuilder::new("Pikachu", 10)
            .with_moves(vec!["Thunder Shock", "Growl"])
            .with_pp("Growl", 5)
            .build();
        let ether = catalog.item("Ether").unwrap().clone();

        pikachu.use_item(&ether);
        let event = pikachu.growth_event().unwrap().clone();
        assert_eq!(event.possible_actions(&pikachu), vec!["Growl"]);

        pikachu
            .resolve_growth_event(Some("Growl"), catalog.as_ref())
            .unwrap();
        assert_eq!(pikachu.move_named("Growl").unwrap().pp, 15);
    }
}
