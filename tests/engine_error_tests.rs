//! Отказы движка: каждая ошибка возвращается до мутации,
//! стол и игра остаются ровно такими, какими были.

use holdem_engine::domain::{
    chips::Chips,
    hand::GamePhase,
    table::{Table, TableConfig, TableStakes, TimerConfig},
    PlayerId,
};
use holdem_engine::engine::{
    advance_phase, apply_action, start_hand, EngineError, Game, PlayerAction, PlayerActionKind,
};
use holdem_engine::infra::DeterministicRng;

fn make_table(n: u8) -> Table {
    let config = TableConfig {
        max_seats: 6,
        stakes: TableStakes::new(Chips(50), Chips(100)),
        timer: TimerConfig { turn_seconds: 30 },
    };
    let mut table = Table::new(9, "Errors", config);
    for pos in 1..=n {
        table
            .seat_player(pos as PlayerId, format!("p{pos}"), pos, Chips(1_000))
            .unwrap();
    }
    table
}

fn started(n: u8) -> (Table, Game) {
    let mut table = make_table(n);
    let mut game = Game::new(table.id);
    start_hand(&mut table, &mut game, &mut DeterministicRng::from_seed(3), true).unwrap();
    (table, game)
}

/// Применить заведомо неверное действие и убедиться, что состояние не изменилось.
fn reject(
    table: &mut Table,
    game: &mut Game,
    player_id: PlayerId,
    kind: PlayerActionKind,
) -> EngineError {
    let table_before = table.clone();
    let game_before = game.clone();

    let err = apply_action(table, game, PlayerAction::new(player_id, kind))
        .expect_err("действие должно быть отклонено");

    assert_eq!(*table, table_before, "стол изменился после ошибки {err}");
    assert_eq!(*game, game_before, "игра изменилась после ошибки {err}");
    err
}

#[test]
fn acting_out_of_turn_is_rejected() {
    let (mut table, mut game) = started(3);
    // Ход у игрока 1 (место 0).
    let err = reject(&mut table, &mut game, 2, PlayerActionKind::Call);
    assert_eq!(err, EngineError::OutOfTurn(2));
}

#[test]
fn bets_above_stack_or_below_call_are_rejected() {
    let (mut table, mut game) = started(3);

    let err = reject(&mut table, &mut game, 1, PlayerActionKind::Bet(Chips(5_000)));
    assert_eq!(
        err,
        EngineError::InvalidBet {
            amount: 5_000,
            stack: Chips(1_000)
        }
    );

    // Меньше, чем нужно доплатить, и это не олл-ин.
    let err = reject(&mut table, &mut game, 1, PlayerActionKind::Bet(Chips(50)));
    assert!(matches!(err, EngineError::InvalidBet { amount: 50, .. }));

    let err = reject(&mut table, &mut game, 1, PlayerActionKind::Bet(Chips::ZERO));
    assert!(matches!(err, EngineError::InvalidBet { amount: 0, .. }));
}

#[test]
fn huge_bet_is_reported_without_wrapping() {
    let (mut table, mut game) = started(3);
    let err = reject(&mut table, &mut game, 1, PlayerActionKind::Bet(Chips(u64::MAX)));
    assert_eq!(
        err,
        EngineError::InvalidBet {
            amount: i64::MAX,
            stack: Chips(1_000)
        }
    );
}

#[test]
fn folded_player_cannot_act_even_on_turn() {
    let (mut table, mut game) = started(3);
    // Сброс вне очереди оставляет позицию хода на месте игрока.
    table.player_mut(0).unwrap().folded = true;
    assert_eq!(game.turn_position, Some(0));

    let err = reject(&mut table, &mut game, 1, PlayerActionKind::Bet(Chips(500)));
    assert_eq!(err, EngineError::OutOfTurn(1));
}

#[test]
fn short_all_in_below_call_is_accepted() {
    let (mut table, mut game) = started(3);
    table.player_mut(0).unwrap().stack = Chips(60);

    apply_action(
        &mut table,
        &mut game,
        PlayerAction::new(1, PlayerActionKind::Bet(Chips(60))),
    )
    .unwrap();

    assert!(table.player(0).unwrap().stack.is_zero());
    assert_eq!(game.current_bet, Chips(100), "олл-ин ниже ставки её не поднимает");
}

#[test]
fn check_facing_a_bet_is_rejected() {
    let (mut table, mut game) = started(3);
    let err = reject(&mut table, &mut game, 1, PlayerActionKind::Check);
    assert_eq!(err, EngineError::CannotCheck { to_call: Chips(100) });
}

#[test]
fn unknown_player_is_rejected() {
    let (mut table, mut game) = started(3);
    let err = reject(&mut table, &mut game, 99, PlayerActionKind::Fold);
    assert_eq!(err, EngineError::PlayerNotFound(99));
}

#[test]
fn actions_without_a_running_hand_are_rejected() {
    let mut table = make_table(3);
    let mut game = Game::new(table.id);

    let err = reject(&mut table, &mut game, 1, PlayerActionKind::Fold);
    assert_eq!(err, EngineError::NoActiveHand);
    assert_eq!(
        advance_phase(&mut table, &mut game),
        Err(EngineError::NoActiveHand)
    );
}

#[test]
fn actions_after_round_closed_or_hand_finished_are_rejected() {
    let (mut table, mut game) = started(2);
    // Хедз-ап: SB (место 1) сбрасывает, раунд закрыт.
    apply_action(
        &mut table,
        &mut game,
        PlayerAction::new(2, PlayerActionKind::Fold),
    )
    .unwrap();
    assert!(game.bets_matched);

    let err = reject(&mut table, &mut game, 1, PlayerActionKind::Check);
    assert_eq!(err, EngineError::BettingClosed);

    advance_phase(&mut table, &mut game).unwrap();
    assert_eq!(game.phase, GamePhase::End);
    let err = reject(&mut table, &mut game, 1, PlayerActionKind::Check);
    assert_eq!(err, EngineError::HandFinished);
}

#[test]
fn start_hand_needs_two_dealable_players() {
    let mut table = make_table(1);
    let mut game = Game::new(table.id);
    let mut rng = DeterministicRng::from_seed(1);

    assert_eq!(
        start_hand(&mut table, &mut game, &mut rng, true),
        Err(EngineError::InsufficientPlayers { found: 1 })
    );

    // Второй игрок есть, но уже уходит из-за стола.
    table.seat_player(2, "p2", 2, Chips(1_000)).unwrap();
    table.pending_leaves.push(2);
    let before = table.clone();
    assert_eq!(
        start_hand(&mut table, &mut game, &mut rng, true),
        Err(EngineError::InsufficientPlayers { found: 1 })
    );
    assert_eq!(table, before);
    assert_eq!(game.phase, GamePhase::NotStarted);
}

#[test]
fn start_hand_during_a_hand_is_rejected() {
    let (mut table, mut game) = started(3);
    let table_before = table.clone();
    let game_before = game.clone();

    assert_eq!(
        start_hand(
            &mut table,
            &mut game,
            &mut DeterministicRng::from_seed(5),
            false
        ),
        Err(EngineError::HandInProgress)
    );
    assert_eq!(table, table_before);
    assert_eq!(game, game_before);
}

#[test]
fn seating_errors() {
    let mut table = make_table(2);
    assert_eq!(
        table.seat_player(3, "p3", 1, Chips(100)),
        Err(EngineError::SeatTaken(1))
    );
    assert_eq!(
        table.seat_player(1, "p1", 3, Chips(100)),
        Err(EngineError::AlreadySeated(1))
    );
    assert_eq!(
        table.seat_player(3, "p3", 7, Chips(100)),
        Err(EngineError::InvalidSeat(7))
    );
    assert_eq!(
        table.add_chips(1, Chips::ZERO),
        Err(EngineError::InvalidChipAmount)
    );
}
