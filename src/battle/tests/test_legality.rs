#[cfg(test)]
mod tests {
    use crate::battle::action_stack::{Action, Target};
    use crate::battle::arena::{SlotRef, TrainerId};
    use crate::battle::tests::common::{
        assert_ok, assert_ok_false, assert_ok_true, create_test_battle, create_test_trainer,
        started_battle, TestPokemonBuilder, ASH, MISTY,
    };
    use crate::growth::GrowthEvent;
    use crate::player::Trainer;
    use pretty_assertions::assert_eq;

    fn ash_team() -> Vec<crate::pokemon::Pokemon> {
        vec![
            TestPokemonBuilder::new("Pikachu", 3)
                .with_moves(vec!["Thunder Shock", "Growl"])
                .build(),
            TestPokemonBuilder::new("Charmander", 3).build(),
        ]
    }

    fn misty_team() -> Vec<crate::pokemon::Pokemon> {
        vec![TestPokemonBuilder::new("Bulbasaur", 3)
            .with_moves(vec!["Tackle", "Growl"])
            .build()]
    }

    #[test]
    fn test_nothing_is_legal_before_the_battle_starts() {
        let mut battle = create_test_battle(
            vec![
                vec![create_test_trainer("Ash", ash_team())],
                vec![create_test_trainer("Misty", misty_team())],
            ],
            1,
            vec![],
        );

        assert_eq!(assert_ok(battle.valid_actions_for(ASH)), vec![]);
    }

    #[test]
    fn test_unknown_trainer_is_an_error() {
        let mut battle = started_battle(ash_team(), misty_team(), vec![]);

        assert!(battle.valid_actions_for(TrainerId::new(5, 0)).is_err());
    }

    #[test]
    fn test_moves_and_recalls_of_a_fresh_turn() {
        let mut battle = started_battle(ash_team(), misty_team(), vec![]);

        let actions = assert_ok(battle.valid_actions_for(ASH));

        assert_eq!(
            actions,
            vec![
                Action::Move {
                    position: 0,
                    move_name: "Thunder Shock".to_string(),
                    target: Target::Single(SlotRef::new(1, 0)),
                },
                Action::Move {
                    position: 0,
                    move_name: "Growl".to_string(),
                    target: Target::Many(vec![SlotRef::new(1, 0)]),
                },
                Action::Recall {
                    position: 0,
                    team_index: 1,
                },
            ]
        );
    }

    #[test]
    fn test_one_action_per_position() {
        let mut battle = started_battle(ash_team(), misty_team(), vec![]);

        assert_ok_true(battle.add_action(
            ASH,
            Action::Recall {
                position: 0,
                team_index: 1,
            },
        ));

        assert_eq!(assert_ok(battle.valid_actions_for(ASH)), vec![]);
        assert!(!assert_ok(battle.valid_actions_for(MISTY)).is_empty());
    }

    #[test]
    fn test_illegal_action_is_rejected() {
        let mut battle = started_battle(ash_team(), misty_team(), vec![]);

        assert_ok_false(battle.add_action(
            ASH,
            Action::Move {
                position: 0,
                move_name: "Tackle".to_string(),
                target: Target::Single(SlotRef::new(1, 0)),
            },
        ));
        assert_ok_false(battle.add_action(
            ASH,
            Action::Move {
                position: 0,
                move_name: "Thunder Shock".to_string(),
                target: Target::Single(SlotRef::new(0, 0)),
            },
        ));
        assert!(battle.pending_actions().is_empty());
    }

    #[test]
    fn test_struggle_when_out_of_pp() {
        let pikachu = TestPokemonBuilder::new("Pikachu", 3)
            .with_moves(vec!["Thunder Shock"])
            .with_pp("Thunder Shock", 0)
            .build();
        let mut battle = started_battle(vec![pikachu], misty_team(), vec![]);

        assert_eq!(
            assert_ok(battle.valid_actions_for(ASH)),
            vec![Action::Move {
                position: 0,
                move_name: "Struggle".to_string(),
                target: Target::Single(SlotRef::new(1, 0)),
            }]
        );
    }

    #[test]
    fn test_fainted_team_members_cannot_be_recalled() {
        let team = vec![
            TestPokemonBuilder::new("Pikachu", 3)
                .with_moves(vec!["Thunder Shock"])
                .build(),
            TestPokemonBuilder::new("Charmander", 3).with_hp(0).build(),
        ];
        let mut battle = started_battle(team, misty_team(), vec![]);

        let actions = assert_ok(battle.valid_actions_for(ASH));

        assert!(actions
            .iter()
            .all(|action| !matches!(action, Action::Recall { .. })));
    }

    #[test]
    fn test_items_are_offered_once_per_name() {
        let mut trainer = create_test_trainer(
            "Ash",
            vec![TestPokemonBuilder::new("Pikachu", 3)
                .with_moves(vec!["Thunder Shock"])
                .with_hp(10)
                .build()],
        );
        trainer.items = vec!["Potion".to_string(), "Potion".to_string(), "Antidote".to_string()];
        let mut battle = create_test_battle(
            vec![vec![trainer], vec![create_test_trainer("Misty", misty_team())]],
            1,
            vec![],
        );
        assert_ok_true(battle.continue_battle());

        let items: Vec<Action> = assert_ok(battle.valid_actions_for(ASH))
            .into_iter()
            .filter(Action::is_item)
            .collect();

        // nobody is poisoned, so no Antidote
        assert_eq!(
            items,
            vec![Action::UseItem {
                team_index: 0,
                item: "Potion".to_string(),
                sub_choices: vec![],
            }]
        );
    }

    #[test]
    fn test_two_positions_take_two_actions() {
        let ash = Trainer::new(
            "Ash",
            vec![
                TestPokemonBuilder::new("Pikachu", 3).with_moves(vec!["Splash"]).build(),
                TestPokemonBuilder::new("Charmander", 3).with_moves(vec!["Splash"]).build(),
            ],
        );
        let misty = Trainer::new(
            "Misty",
            vec![
                TestPokemonBuilder::new("Bulbasaur", 3).build(),
                TestPokemonBuilder::new("Squirtle", 3).build(),
            ],
        );
        let mut battle = create_test_battle(vec![vec![ash], vec![misty]], 2, vec![]);
        assert_ok_true(battle.continue_battle());

        assert_ok_true(battle.add_action(
            ASH,
            Action::Move {
                position: 0,
                move_name: "Splash".to_string(),
                target: Target::Single(SlotRef::new(0, 0)),
            },
        ));
        let remaining = assert_ok(battle.valid_actions_for(ASH));

        assert_eq!(
            remaining,
            vec![Action::Move {
                position: 1,
                move_name: "Splash".to_string(),
                target: Target::Single(SlotRef::new(0, 1)),
            }]
        );

        assert_ok_true(battle.add_action(ASH, remaining[0].clone()));
        assert_eq!(assert_ok(battle.valid_actions_for(ASH)), vec![]);
    }

    #[test]
    fn test_pending_growth_choice_blocks_everyone_else() {
        let bulbasaur = TestPokemonBuilder::new("Bulbasaur", 3)
            .with_moves(vec!["Tackle", "Growl"])
            .with_pp("Tackle", 5)
            .build();
        let mut battle = started_battle(ash_team(), vec![bulbasaur], vec![]);
        battle.sides[1].trainers[0].team[0].add_growth_event(GrowthEvent::RestorePp { amount: 10 });

        assert_eq!(assert_ok(battle.valid_actions_for(ASH)), vec![]);
        assert_eq!(
            assert_ok(battle.valid_actions_for(MISTY)),
            vec![Action::GrowthChoice {
                team_index: 0,
                option: "Tackle".to_string(),
            }]
        );
        assert_ok_false(battle.continue_battle());

        assert_ok_true(battle.add_action(
            MISTY,
            Action::GrowthChoice {
                team_index: 0,
                option: "Tackle".to_string(),
            },
        ));

        let misty = battle.trainer(MISTY).unwrap();
        assert_eq!(misty.team[0].move_named("Tackle").unwrap().pp, 15);
        assert!(battle.pending_actions().is_empty());
        assert_eq!(
            battle.log().current().last().map(ToString::to_string),
            Some("growth_event Misty Bulbasaur Choose a move of Bulbasaur to restore 10 PP".to_string())
        );
        assert!(!assert_ok(battle.valid_actions_for(ASH)).is_empty());
    }
}
