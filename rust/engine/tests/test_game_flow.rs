use holdem_engine::cards::parse_cards;
use holdem_engine::deck::{Deck, StackedDecks};
use holdem_engine::errors::GameError;
use holdem_engine::events::ActionOutcome;
use holdem_engine::game::{Game, Phase};
use holdem_engine::player::{ActionKind as K, PlayerAction as A, SeatedPlayer};
use holdem_engine::settings::TableSettings;

fn players(stacks: &[(usize, u32)]) -> Vec<SeatedPlayer> {
    stacks
        .iter()
        .map(|&(seat, chips)| SeatedPlayer::new(seat, format!("p{seat}"), chips))
        .collect()
}

fn stacked_game(settings: TableSettings, top: &str) -> Game {
    let cards = parse_cards(top).unwrap();
    Game::new(settings, StackedDecks::new([Deck::stacked(&cards)]))
}

fn chips(game: &Game, seat: usize) -> u32 {
    game.seat(seat).unwrap().chips
}

#[test]
fn heads_up_checked_down_to_showdown() {
    // A (seat 0) gets As Ah, B (seat 1) gets Kc Kd
    let mut game = stacked_game(
        TableSettings::default(),
        "Kc As Kd Ah 4h 2c 7d 9h 5h Jc 6h 3s",
    );
    let start = game.start_hand(&players(&[(0, 1000), (1, 1000)])).unwrap();
    assert_eq!(start.dealer_seat, 0);
    assert_eq!(start.small_blind_seat, 0);
    assert_eq!(start.big_blind_seat, 1);
    assert_eq!(start.current_player_seat, Some(0));
    assert_eq!(start.pot, 15);
    assert_eq!(start.hole_cards_for(0), Some(parse_cards("As Ah").unwrap().try_into().unwrap()));
    assert_eq!(game.chips_in_play(), 2000);

    let out = game.handle_action(0, A::Call).unwrap();
    match out {
        ActionOutcome::ActionApplied {
            seat_index,
            bet_amount,
            pot,
            next_player_seat,
            ..
        } => {
            assert_eq!(seat_index, 0);
            assert_eq!(bet_amount, 10);
            assert_eq!(pot, 20);
            assert_eq!(next_player_seat, 1);
        }
        other => panic!("unexpected outcome {other:?}"),
    }
    assert_eq!(game.chips_in_play(), 2000);

    let out = game.handle_action(1, A::Check).unwrap();
    match out {
        ActionOutcome::PhaseAdvanced {
            phase,
            community_cards,
            current_player_seat,
            all_in_runout,
            revealed,
            ..
        } => {
            assert_eq!(phase, Phase::Flop);
            assert_eq!(community_cards, parse_cards("2c 7d 9h").unwrap());
            // big blind acts first after the flop heads-up
            assert_eq!(current_player_seat, Some(1));
            assert!(!all_in_runout);
            assert!(revealed.is_none());
        }
        other => panic!("unexpected outcome {other:?}"),
    }
    assert_eq!(game.current_bet(), 0);

    for street in [Phase::Turn, Phase::River] {
        game.handle_action(1, A::Check).unwrap();
        let out = game.handle_action(0, A::Check).unwrap();
        assert!(matches!(out, ActionOutcome::PhaseAdvanced { phase, .. } if phase == street));
        assert_eq!(game.chips_in_play(), 2000);
    }
    assert_eq!(game.community_cards(), parse_cards("2c 7d 9h Jc 3s").unwrap().as_slice());

    game.handle_action(1, A::Check).unwrap();
    let out = game.handle_action(0, A::Check).unwrap();
    match &out {
        ActionOutcome::Showdown {
            pot_results,
            players,
            ..
        } => {
            assert_eq!(pot_results.len(), 1);
            assert_eq!(pot_results[0].amount, 20);
            assert_eq!(pot_results[0].winners[0].seat_index, 0);
            assert_eq!(players[0].best_hand.as_ref().unwrap().name, "Pair");
        }
        other => panic!("unexpected outcome {other:?}"),
    }
    assert_eq!(out.final_chips(), Some(vec![(0, 1010), (1, 990)]));
    assert_eq!(game.phase(), Phase::Complete);
    assert_eq!(game.pot(), 0);
    assert_eq!(game.chips_in_play(), 2000);
}

#[test]
fn split_pot_gives_odd_chip_to_first_seat() {
    // board is a royal flush; seats 0 and 2 chop
    let mut game = stacked_game(
        TableSettings::default(),
        "2c 3c 4c 2d 3d 4d 5c As Ks Qs 5d Js 6c Ts",
    );
    let start = game
        .start_hand(&players(&[(0, 1000), (1, 1000), (2, 1000)]))
        .unwrap();
    assert_eq!(start.small_blind_seat, 1);
    assert_eq!(start.big_blind_seat, 2);
    assert_eq!(start.current_player_seat, Some(0));

    game.handle_action(0, A::Call).unwrap();
    game.handle_action(1, A::Fold).unwrap();
    let out = game.handle_action(2, A::Check).unwrap();
    assert!(matches!(out, ActionOutcome::PhaseAdvanced { current_player_seat: Some(2), .. }));

    let mut last = None;
    for _ in 0..3 {
        game.handle_action(2, A::Check).unwrap();
        last = Some(game.handle_action(0, A::Check).unwrap());
    }
    let out = last.unwrap();
    let ActionOutcome::Showdown { pot_results, players, .. } = &out else {
        panic!("expected showdown, got {out:?}");
    };
    let amounts: Vec<(u32, Vec<(usize, u32)>)> = pot_results
        .iter()
        .map(|p| (p.amount, p.winners.iter().map(|w| (w.seat_index, w.amount)).collect()))
        .collect();
    assert_eq!(
        amounts,
        vec![(15, vec![(0, 8), (2, 7)]), (10, vec![(0, 5), (2, 5)])]
    );
    assert!(players[1].folded);
    assert!(players[1].hole.is_none(), "folded cards stay hidden");
    assert_eq!(chips(&game, 0), 1003);
    assert_eq!(chips(&game, 1), 995);
    assert_eq!(chips(&game, 2), 1002);
}

#[test]
fn turn_order_and_validation_on_sparse_seats() {
    let mut game = Game::with_seed(TableSettings::default(), 11);
    let roster = players(&[(2, 1000), (5, 1000), (7, 1000)]);
    let start = game.start_hand(&roster).unwrap();
    assert_eq!(start.dealer_seat, 2);
    assert_eq!(start.small_blind_seat, 5);
    assert_eq!(start.big_blind_seat, 7);
    assert_eq!(start.current_player_seat, Some(2));

    assert_eq!(
        game.handle_action(5, A::Call),
        Err(GameError::NotYourTurn { seat: 5 })
    );
    assert!(game.available_actions(5).is_none());

    let menu = game.available_actions(2).unwrap();
    assert_eq!(menu.actions, vec![K::Fold, K::Call, K::Raise, K::AllIn]);
    assert_eq!((menu.to_call, menu.min_raise, menu.max_raise, menu.pot), (10, 20, 1000, 15));

    assert_eq!(
        game.handle_action(2, A::Check),
        Err(GameError::CannotCheck { to_call: 10 })
    );
    let err = game.handle_action(2, A::Raise(15)).unwrap_err();
    assert_eq!(err.to_string(), "Min raise to 20");
    assert_eq!(game.pot(), 15, "rejected actions change nothing");

    game.handle_action(2, A::Fold).unwrap();
    let out = game.handle_action(5, A::Fold).unwrap();
    match &out {
        ActionOutcome::HandComplete { winners, .. } => {
            assert_eq!(winners.len(), 1);
            assert_eq!(winners[0].seat_index, 7);
            assert_eq!(winners[0].amount, 15);
        }
        other => panic!("unexpected outcome {other:?}"),
    }
    assert_eq!(
        game.handle_action(7, A::Check),
        Err(GameError::NoHandInProgress)
    );

    for expected in [5, 7, 2] {
        let start = game.start_hand(&roster).unwrap();
        assert_eq!(start.dealer_seat, expected);
        let mut seat = start.current_player_seat.unwrap();
        loop {
            let out = game.handle_action(seat, A::Fold).unwrap();
            match out {
                ActionOutcome::ActionApplied { next_player_seat, .. } => seat = next_player_seat,
                _ => break,
            }
        }
    }
}

#[test]
fn all_in_and_call_runs_out_the_board() {
    let mut game = Game::with_seed(TableSettings::default(), 3);
    game.start_hand(&players(&[(0, 1000), (1, 1000)])).unwrap();
    game.handle_action(0, A::AllIn).unwrap();
    assert_eq!(game.available_actions(1).unwrap().actions, vec![K::Fold, K::Call, K::AllIn]);
    let out = game.handle_action(1, A::Call).unwrap();
    match &out {
        ActionOutcome::PhaseAdvanced {
            phase,
            current_player_seat,
            all_in_runout,
            revealed,
            ..
        } => {
            assert_eq!(*phase, Phase::Flop);
            assert_eq!(*current_player_seat, None);
            assert!(*all_in_runout);
            assert_eq!(revealed.as_ref().map(Vec::len), Some(2));
        }
        other => panic!("unexpected outcome {other:?}"),
    }
    assert!(out.needs_runout());
    assert!(game.is_runout());

    for street in [Phase::Turn, Phase::River] {
        let out = game.advance_runout().unwrap();
        match out {
            ActionOutcome::PhaseAdvanced { phase, revealed, .. } => {
                assert_eq!(phase, street);
                assert!(revealed.is_none(), "hands are revealed once");
            }
            other => panic!("unexpected outcome {other:?}"),
        }
    }
    let out = game.advance_runout().unwrap();
    assert!(matches!(out, ActionOutcome::Showdown { .. }));
    assert_eq!(game.community_cards().len(), 5);
    assert_eq!(game.chips_in_play(), 2000);
    assert_eq!(game.advance_runout(), Err(GameError::NoRunoutPending));
}

#[test]
fn side_pots_pay_each_level_to_its_best_hand() {
    // seat 0 AA, seat 1 KK, seat 2 QQ on a dry board
    let mut game = stacked_game(
        TableSettings::default(),
        "Kc Qc Ac Kd Qd Ad 2h 3s 7h 9d 2s Jh 2d 4c",
    );
    game.start_hand(&players(&[(0, 100), (1, 300), (2, 1000)]))
        .unwrap();
    game.handle_action(0, A::AllIn).unwrap();
    game.handle_action(1, A::AllIn).unwrap();
    let out = game.handle_action(2, A::Call).unwrap();
    assert!(out.needs_runout());
    game.advance_runout().unwrap();
    game.advance_runout().unwrap();
    let out = game.advance_runout().unwrap();
    let ActionOutcome::Showdown { pot_results, .. } = &out else {
        panic!("expected showdown, got {out:?}");
    };
    assert_eq!(pot_results.iter().map(|p| p.amount).collect::<Vec<_>>(), vec![300, 400]);
    assert_eq!(out.final_chips(), Some(vec![(0, 300), (1, 400), (2, 700)]));
}

#[test]
fn short_big_blind_still_leaves_full_blind_to_call() {
    let mut game = Game::with_seed(TableSettings::default(), 5);
    let start = game.start_hand(&players(&[(0, 1000), (1, 4)])).unwrap();
    assert_eq!(start.pot, 9);
    assert_eq!(start.current_bet, 10);
    assert_eq!(start.current_player_seat, Some(0));
    assert!(!start.all_in_runout);

    assert_eq!(game.available_actions(0).unwrap().to_call, 5);
    let out = game.handle_action(0, A::Call).unwrap();
    assert!(out.needs_runout());
    while game.is_runout() {
        game.advance_runout().unwrap();
    }
    assert_eq!(game.phase(), Phase::Complete);
    assert_eq!(game.chips_in_play(), 1004);
}

#[test]
fn blinds_that_put_everyone_all_in_start_a_runout() {
    let mut game = Game::with_seed(TableSettings::default(), 8);
    let start = game.start_hand(&players(&[(0, 5), (1, 10)])).unwrap();
    assert!(start.all_in_runout);
    assert_eq!(start.current_player_seat, None);
    assert!(game.is_runout());
    assert_eq!(game.handle_action(0, A::Check), Err(GameError::NotYourTurn { seat: 0 }));

    let out = game.advance_runout().unwrap();
    assert!(matches!(out, ActionOutcome::PhaseAdvanced { phase: Phase::Flop, revealed: Some(_), .. }));
    let mut last = out;
    while game.is_runout() {
        last = game.advance_runout().unwrap();
    }
    assert!(last.is_hand_over());
    assert_eq!(game.chips_in_play(), 15);
}

fn incomplete_raise_game(reopens: bool) -> Game {
    let settings = TableSettings {
        incomplete_raise_reopens: reopens,
        ..TableSettings::default()
    };
    let mut game = Game::with_seed(settings, 21);
    game.start_hand(&players(&[(0, 1000), (1, 1000), (2, 25)]))
        .unwrap();
    game.handle_action(0, A::Raise(20)).unwrap();
    game.handle_action(1, A::Call).unwrap();
    // big blind shoves for 25, five more than the bet
    game.handle_action(2, A::AllIn).unwrap();
    game
}

#[test]
fn incomplete_raise_reopens_betting_by_default() {
    let mut game = incomplete_raise_game(true);
    assert_eq!(game.current_bet(), 25);
    assert_eq!(game.current_player_seat(), Some(0));
    let menu = game.available_actions(0).unwrap();
    assert!(menu.allows(K::Raise));
    assert_eq!(menu.to_call, 5);
    assert_eq!(menu.min_raise, 35);
    game.handle_action(0, A::Raise(60)).unwrap();
    assert_eq!(game.current_bet(), 60);
}

#[test]
fn incomplete_raise_can_leave_betting_closed() {
    let mut game = incomplete_raise_game(false);
    let menu = game.available_actions(0).unwrap();
    assert_eq!(menu.actions, vec![K::Fold, K::Call]);
    assert_eq!(
        game.handle_action(0, A::Raise(60)),
        Err(GameError::RaiseNotReopened { seat: 0 })
    );
    game.handle_action(0, A::Call).unwrap();
    assert_eq!(game.available_actions(1).unwrap().actions, vec![K::Fold, K::Call]);
    let out = game.handle_action(1, A::Call).unwrap();
    match out {
        ActionOutcome::PhaseAdvanced { phase, pot, all_in_runout, .. } => {
            assert_eq!(phase, Phase::Flop);
            assert_eq!(pot, 75);
            assert!(!all_in_runout, "two seats can still bet");
        }
        other => panic!("unexpected outcome {other:?}"),
    }
    // locks last only for the street
    assert!(game.available_actions(1).unwrap().allows(K::Raise));
}

#[test]
fn timeout_checks_when_free_and_folds_otherwise() {
    let mut game = Game::with_seed(TableSettings::default(), 2);
    game.start_hand(&players(&[(0, 1000), (1, 1000)])).unwrap();
    assert_eq!(game.timeout_action(0), Some(A::Fold));
    assert_eq!(game.timeout_action(1), None);
    game.handle_action(0, A::Call).unwrap();
    assert_eq!(game.timeout_action(1), Some(A::Check));
}

#[test]
fn start_hand_rejects_bad_rosters() {
    let mut game = Game::with_seed(TableSettings::default(), 1);
    assert_eq!(
        game.start_hand(&players(&[(0, 1000)])).unwrap_err(),
        GameError::NotEnoughPlayers { count: 1 }
    );
    assert_eq!(
        game.start_hand(&players(&[(0, 1000), (10, 1000)])).unwrap_err(),
        GameError::InvalidSeat(10)
    );
    assert_eq!(
        game.start_hand(&players(&[(4, 1000), (4, 500)])).unwrap_err(),
        GameError::DuplicateSeat(4)
    );
    assert_eq!(
        game.start_hand(&players(&[(0, 1000), (1, 0)])).unwrap_err(),
        GameError::EmptyStack(1)
    );
    assert_eq!(game.phase(), Phase::Waiting);
    assert_eq!(game.handle_action(0, A::Check), Err(GameError::NoHandInProgress));

    game.start_hand(&players(&[(0, 1000), (1, 1000)])).unwrap();
    assert_eq!(
        game.start_hand(&players(&[(0, 1000), (1, 1000)])).unwrap_err(),
        GameError::HandInProgress
    );
}

#[test]
fn hole_cards_never_reach_the_public_record() {
    let mut game = Game::with_seed(TableSettings::default(), 4);
    let start = game.start_hand(&players(&[(0, 1000), (1, 1000)])).unwrap();
    assert_eq!(start.hole_cards.len(), 2);
    let json = serde_json::to_value(&start).unwrap();
    assert!(json.get("holeCards").is_none());
    assert_eq!(json["dealerSeat"], 0);
    assert_eq!(json["players"][1]["currentBet"], 10);
}

#[test]
fn outcomes_serialize_with_type_tags() {
    let mut game = Game::with_seed(TableSettings::default(), 4);
    game.start_hand(&players(&[(0, 1000), (1, 1000)])).unwrap();
    let applied = game.handle_action(0, A::Raise(30)).unwrap();
    let json = serde_json::to_value(&applied).unwrap();
    assert_eq!(json["type"], "actionApplied");
    assert_eq!(json["action"]["raise"], 30);
    assert_eq!(json["nextPlayerSeat"], 1);

    let complete = game.handle_action(1, A::Fold).unwrap();
    let json = serde_json::to_value(&complete).unwrap();
    assert_eq!(json["type"], "handComplete");
    assert_eq!(json["winners"][0]["amount"], 40);
}

#[test]
fn history_tracks_actions_by_street() {
    let mut game = Game::with_seed(TableSettings::default(), 6);
    game.start_hand(&players(&[(0, 1000), (1, 1000)])).unwrap();
    game.handle_action(0, A::Call).unwrap();
    game.handle_action(1, A::Check).unwrap();
    game.handle_action(1, A::Check).unwrap();
    let streets: Vec<Phase> = game.history().iter().map(|r| r.street).collect();
    assert_eq!(streets, vec![Phase::Preflop, Phase::Preflop, Phase::Flop]);
}

#[test]
fn all_in_on_the_turn_reveals_hands_with_the_river() {
    let mut game = Game::with_seed(TableSettings::default(), 21);
    game.start_hand(&players(&[(0, 1000), (1, 1000)])).unwrap();
    game.handle_action(0, A::Call).unwrap();
    game.handle_action(1, A::Check).unwrap();
    game.handle_action(1, A::Check).unwrap();
    game.handle_action(0, A::Check).unwrap();
    assert_eq!(game.phase(), Phase::Turn);

    game.handle_action(1, A::AllIn).unwrap();
    let mut outcomes = vec![game.handle_action(0, A::Call).unwrap()];
    match &outcomes[0] {
        ActionOutcome::PhaseAdvanced {
            phase,
            all_in_runout,
            revealed,
            ..
        } => {
            assert_eq!(*phase, Phase::River);
            assert!(*all_in_runout);
            assert_eq!(revealed.as_ref().map(Vec::len), Some(2));
        }
        other => panic!("unexpected outcome {other:?}"),
    }
    while game.is_runout() {
        outcomes.push(game.advance_runout().unwrap());
    }
    let reveals = outcomes
        .iter()
        .filter(|o| matches!(o, ActionOutcome::PhaseAdvanced { revealed: Some(_), .. }))
        .count();
    assert_eq!(reveals, 1);
    assert!(outcomes.last().unwrap().is_hand_over());
    assert_eq!(game.chips_in_play(), 2000);
}

#[test]
fn stacks_too_large_to_count_are_rejected() {
    let mut game = Game::with_seed(TableSettings::default(), 1);
    let err = game
        .start_hand(&players(&[(0, 3_000_000_000), (1, 3_000_000_000)]))
        .unwrap_err();
    assert_eq!(err, GameError::TooManyChips { total: 6_000_000_000 });
    assert_eq!(game.phase(), Phase::Waiting);
    assert_eq!(game.hand_number(), 0);

    // the largest table that still fits plays out normally
    let start = game
        .start_hand(&players(&[(0, u32::MAX - 1000), (1, 1000)]))
        .unwrap();
    let first = start.current_player_seat.unwrap();
    game.handle_action(first, A::AllIn).unwrap();
    let other = game.current_player_seat().unwrap();
    game.handle_action(other, A::Call).unwrap();
    while game.is_runout() {
        game.advance_runout().unwrap();
    }
    assert_eq!(game.phase(), Phase::Complete);
    assert_eq!(game.chips_in_play(), u64::from(u32::MAX));
}

#[test]
fn history_records_the_action_as_applied() {
    // a raise past the stack is clamped to everything in
    let mut game = Game::with_seed(TableSettings::default(), 2);
    game.start_hand(&players(&[(0, 1000), (1, 1000)])).unwrap();
    let out = game.handle_action(0, A::Raise(5000)).unwrap();
    match out {
        ActionOutcome::ActionApplied { action, bet_amount, chips, .. } => {
            assert_eq!(action, A::AllIn);
            assert_eq!(bet_amount, 1000);
            assert_eq!(chips, 0);
        }
        other => panic!("unexpected outcome {other:?}"),
    }
    assert_eq!(game.history()[0].action, A::AllIn);

    // a raise the seat cannot afford only calls what is left
    let mut game = Game::with_seed(TableSettings::default(), 2);
    game.start_hand(&players(&[(0, 1000), (1, 12)])).unwrap();
    game.handle_action(0, A::Raise(100)).unwrap();
    game.handle_action(1, A::Raise(500)).unwrap();
    let recorded: Vec<A> = game.history().iter().map(|r| r.action).collect();
    assert_eq!(recorded, vec![A::Raise(100), A::Call]);
    assert_eq!(game.seat(1).unwrap().chips, 0);
}

#[test]
fn needs_to_act_shrinks_as_seats_respond() {
    let mut game = Game::with_seed(TableSettings::default(), 3);
    let start = game.start_hand(&players(&[(0, 1000), (2, 1000), (5, 1000)])).unwrap();
    let owed = game.needs_to_act();
    assert_eq!(owed.len(), 3);
    assert_eq!(owed.iter().collect::<Vec<_>>(), vec![0, 2, 5]);

    let first = start.current_player_seat.unwrap();
    game.handle_action(first, A::Call).unwrap();
    let owed = game.needs_to_act();
    assert_eq!(owed.len(), 2);
    assert!(!owed.contains(first));

    // a full raise puts everyone else back on the hook
    let next = game.current_player_seat().unwrap();
    game.handle_action(next, A::Raise(40)).unwrap();
    let owed = game.needs_to_act();
    assert_eq!(owed.len(), 2);
    assert!(owed.contains(first));
    assert!(!owed.contains(next));
}
