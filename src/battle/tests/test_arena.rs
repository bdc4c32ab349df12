#[cfg(test)]
mod tests {
    use crate::battle::action_stack::{Action, Target};
    use crate::battle::arena::{PokemonRef, SlotRef, TrainerId};
    use crate::battle::conditions::StatusCondition;
    use crate::battle::tests::common::{
        assert_ok, assert_ok_true, create_test_battle, create_test_trainer, last_segment_lines,
        started_battle, TestPokemonBuilder, ASH, MISTY,
    };
    use crate::errors::{BattleEngineError, BattleStateError};
    use crate::pokemon::Pokemon;
    use pretty_assertions::assert_eq;
    use schema::StatType;

    fn three_pokemon() -> Vec<Pokemon> {
        vec![
            TestPokemonBuilder::new("Pikachu", 5).build(),
            TestPokemonBuilder::new("Bulbasaur", 5).build(),
            TestPokemonBuilder::new("Charmander", 5).build(),
        ]
    }

    fn doubles() -> crate::battle::engine::Battle {
        let mut battle = create_test_battle(
            vec![
                vec![create_test_trainer("Ash", three_pokemon())],
                vec![create_test_trainer(
                    "Misty",
                    vec![
                        TestPokemonBuilder::new("Squirtle", 5).build(),
                        TestPokemonBuilder::new("Pidgey", 5).build(),
                    ],
                )],
            ],
            2,
            vec![],
        );
        assert_ok_true(battle.continue_battle());
        battle
    }

    #[test]
    fn test_opening_fills_positions_in_order() {
        let battle = doubles();
        let side = &battle.sides()[0];

        assert_eq!(side.taken_positions(), vec![0, 1]);
        assert_eq!(side.occupant_pokemon(0).unwrap().name(), "Pikachu");
        assert_eq!(side.occupant_pokemon(1).unwrap().name(), "Bulbasaur");
        assert_eq!(side.next_position(battle.pokemon_per_side()), None);
    }

    #[test]
    fn test_send_to_battle_takes_lowest_free_position() {
        let mut battle = doubles();
        let pikachu = PokemonRef {
            trainer: ASH,
            team_index: 0,
        };
        let charmander = PokemonRef {
            trainer: ASH,
            team_index: 2,
        };

        assert_ok(battle.remove_from_battle(pikachu));
        let position = assert_ok(battle.send_to_battle(charmander));

        assert_eq!(position, 0);
        assert_eq!(
            battle.log().current().iter().map(ToString::to_string).collect::<Vec<_>>(),
            vec!["removes_from_battle Ash Pikachu", "sends_to_battle Ash Charmander"]
        );
        assert!(battle.trainer(ASH).unwrap().is_active(2));
        assert!(!battle.trainer(ASH).unwrap().is_active(0));
    }

    #[test]
    fn test_full_side_has_no_free_position() {
        let mut battle = doubles();

        let result = battle.send_to_battle(PokemonRef {
            trainer: ASH,
            team_index: 2,
        });

        assert_eq!(
            result,
            Err(BattleEngineError::BattleState(BattleStateError::NoFreePosition(0)))
        );
    }

    #[test]
    fn test_switching_out_resets_stages() {
        let mut battle = doubles();
        battle.sides[0].trainers[0].team[0].change_stat_by(StatType::Atk, 2);

        assert_ok(battle.remove_from_battle(PokemonRef {
            trainer: ASH,
            team_index: 0,
        }));

        assert_eq!(battle.trainer(ASH).unwrap().team[0].stat_stage(StatType::Atk), 0);
    }

    #[test]
    fn test_fainting_clears_conditions_except_paralysis() {
        let mut battle = started_battle(
            vec![TestPokemonBuilder::new("Pikachu", 5)
                .with_status(StatusCondition::Paralysis)
                .build()],
            vec![TestPokemonBuilder::new("Bulbasaur", 5)
                .with_status(StatusCondition::Burn)
                .build()],
            vec![],
        );
        for side in battle.sides.iter_mut() {
            side.trainers[0].team[0].change_hp_by(-100);
        }

        battle.remove_fainted();

        assert_eq!(
            battle.log().current().iter().map(ToString::to_string).collect::<Vec<_>>(),
            vec!["pokemon_fainted Ash Pikachu", "pokemon_fainted Misty Bulbasaur"]
        );
        assert_eq!(
            battle.trainer(ASH).unwrap().team[0].status_conditions(),
            &[StatusCondition::Paralysis]
        );
        assert!(battle.trainer(MISTY).unwrap().team[0].status_conditions().is_empty());
        assert!(!battle.sides()[0].pokemon_left());
        assert!(battle.finished());
        assert_eq!(battle.winner(), None);
    }

    #[test]
    fn test_trainers_sharing_a_side_get_their_own_positions() {
        let mut battle = create_test_battle(
            vec![
                vec![
                    create_test_trainer("Ash", vec![TestPokemonBuilder::new("Pikachu", 5).build()]),
                    create_test_trainer("Brock", vec![TestPokemonBuilder::new("Rattata", 5).build()]),
                ],
                vec![create_test_trainer(
                    "Misty",
                    vec![TestPokemonBuilder::new("Squirtle", 5).build()],
                )],
            ],
            1,
            vec![],
        );

        assert_ok_true(battle.continue_battle());

        assert_eq!(battle.pokemon_per_side(), 2);
        let side = &battle.sides()[0];
        assert_eq!(side.occupant(0).map(|(trainer, _)| trainer), Some(0));
        assert_eq!(side.occupant(1).map(|(trainer, _)| trainer), Some(1));
        assert_eq!(battle.sides()[1].taken_positions(), vec![0]);
        assert_eq!(side.trainer_on_side("Brock"), Some(1));
        assert_eq!(battle.sides()[1].trainer_on_side("Misty"), Some(0));
        assert_eq!(battle.sides()[1].trainer_on_side("Brock"), None);
        assert_eq!(
            last_segment_lines(&battle),
            vec![
                "sends_to_battle Ash Pikachu",
                "sends_to_battle Brock Rattata",
                "sends_to_battle Misty Squirtle",
            ]
        );
    }

    #[test]
    fn test_recall_into_a_position_swaps_pokemon() {
        let mut battle = started_battle(
            vec![
                TestPokemonBuilder::new("Pikachu", 5).build(),
                TestPokemonBuilder::new("Charmander", 5).build(),
            ],
            vec![TestPokemonBuilder::new("Bulbasaur", 5).with_moves(vec!["Splash"]).build()],
            vec![],
        );

        assert_ok_true(battle.add_action(
            ASH,
            Action::Recall {
                position: 0,
                team_index: 1,
            },
        ));
        assert_ok_true(battle.add_action(
            MISTY,
            Action::Move {
                position: 0,
                move_name: "Splash".to_string(),
                target: Target::Single(SlotRef::new(1, 0)),
            },
        ));
        assert_ok_true(battle.continue_battle());

        assert_eq!(
            last_segment_lines(&battle),
            vec![
                "recalls Ash Pikachu Charmander",
                "removes_from_battle Ash Pikachu",
                "uses_move Misty Bulbasaur Splash",
            ]
        );
        assert_eq!(
            battle.sides()[0].occupant_pokemon(0).unwrap().name(),
            "Charmander"
        );
    }

    #[test]
    fn test_fainted_position_is_refilled_by_recall() {
        let mut battle = started_battle(
            vec![
                TestPokemonBuilder::new("Pikachu", 5).build(),
                TestPokemonBuilder::new("Charmander", 5).build(),
            ],
            vec![TestPokemonBuilder::new("Bulbasaur", 5).with_moves(vec!["Splash"]).build()],
            vec![],
        );
        battle.sides[0].trainers[0].team[0].change_hp_by(-100);
        battle.remove_fainted();

        let actions = assert_ok(battle.valid_actions_for(ASH));
        assert_eq!(
            actions,
            vec![Action::Recall {
                position: 0,
                team_index: 1,
            }]
        );
        assert_ok_true(battle.add_action(ASH, actions[0].clone()));
        assert_ok_true(battle.add_action(
            MISTY,
            Action::Move {
                position: 0,
                move_name: "Splash".to_string(),
                target: Target::Single(SlotRef::new(1, 0)),
            },
        ));
        assert_ok_true(battle.continue_battle());

        assert_eq!(
            last_segment_lines(&battle),
            vec![
                "pokemon_fainted Ash Pikachu",
                "recalls_for_fainted Ash Charmander",
                "uses_move Misty Bulbasaur Splash",
            ]
        );
        assert_eq!(battle.trainer(TrainerId::new(0, 0)).unwrap().positions(), &[0]);
    }

    #[test]
    fn test_log_uses_nicknames() {
        let sparky = TestPokemonBuilder::new("Pikachu", 5).with_nickname("Sparky").build();

        let battle = started_battle(
            vec![sparky],
            vec![TestPokemonBuilder::new("Bulbasaur", 5).build()],
            vec![],
        );

        assert_eq!(
            last_segment_lines(&battle),
            vec!["sends_to_battle Ash Sparky", "sends_to_battle Misty Bulbasaur"]
        );
    }
}
