//! Менеджер столов поверх in-memory хранилища: сохранение только при
//! успехе, события для клиентов, журнал раздач, уход и докупка.

use holdem_engine::domain::{
    chips::Chips,
    hand::GamePhase,
    table::{Table, TableConfig, TableStakes, TimerConfig},
    PlayerId, TableId,
};
use holdem_engine::engine::{
    EngineError, Game, GameSnapshot, HandEventKind, InMemoryCollector, ManagerError, PlayerAction,
    PlayerActionKind, PotLedger, RoundContribution, TableManager,
};
use holdem_engine::infra::{
    decode_table_state, encode_table_state, DeterministicRng, InMemoryPokerStorage, PokerStorage,
    StoredTable,
};

type TestManager =
    TableManager<InMemoryPokerStorage, DeterministicRng, InMemoryCollector, InMemoryCollector>;

fn config() -> TableConfig {
    TableConfig {
        max_seats: 6,
        stakes: TableStakes::new(Chips(50), Chips(100)),
        timer: TimerConfig { turn_seconds: 30 },
    }
}

fn manager_with_table(players: u8) -> (TestManager, TableId) {
    let mut manager = TableManager::with_collaborators(
        InMemoryPokerStorage::new(),
        DeterministicRng::from_seed(2024),
        InMemoryCollector::default(),
        InMemoryCollector::default(),
    );
    let table_id = manager.create_table("Infra", config()).unwrap();
    for pos in 1..=players {
        manager
            .seat_player(table_id, pos as PlayerId, format!("p{pos}"), pos, Chips(1_000))
            .unwrap();
    }
    (manager, table_id)
}

fn act(
    manager: &mut TestManager,
    table_id: TableId,
    player_id: PlayerId,
    kind: PlayerActionKind,
) -> GameSnapshot {
    manager
        .apply_action(table_id, PlayerAction::new(player_id, kind))
        .unwrap_or_else(|e| panic!("действие {kind} игрока {player_id} отклонено: {e}"))
}

/// Доиграть раздачу чеками/коллами.
fn play_out(manager: &mut TestManager, table_id: TableId) -> GameSnapshot {
    let mut snap = manager.snapshot(table_id, None).unwrap();
    for _ in 0..100 {
        if snap.phase == GamePhase::End {
            return snap;
        }
        snap = match (snap.bets_matched, snap.turn_player) {
            (false, Some(pid)) => {
                let owes = snap
                    .players
                    .iter()
                    .find(|p| p.player_id == pid)
                    .is_some_and(|p| p.current_bet < snap.current_bet);
                let kind = if owes {
                    PlayerActionKind::Call
                } else {
                    PlayerActionKind::Check
                };
                act(manager, table_id, pid, kind)
            }
            _ => manager.advance_phase(table_id).unwrap(),
        };
    }
    panic!("раздача не завершилась");
}

#[test]
fn create_hand_publishes_start_and_private_cards() {
    let (mut manager, table_id) = manager_with_table(3);
    let snap = manager.create_hand(table_id).unwrap();

    assert_eq!(snap.phase, GamePhase::Preflop);
    assert_eq!(snap.hand_number, 1);
    assert_eq!(snap.turn_player, Some(1));
    assert!(snap.players.iter().all(|p| p.hole_cards.is_none()));

    let events = &manager.sink().events;
    assert!(events.iter().all(|(id, _)| *id == table_id));
    assert!(matches!(
        events[0].1.kind,
        HandEventKind::HandStarted {
            hand_number: 1,
            player_count: 3
        }
    ));
    let recipients: Vec<PlayerId> = events.iter().filter_map(|(_, e)| e.kind.recipient()).collect();
    assert_eq!(recipients, vec![2, 3, 1]);

    let indices: Vec<u32> = events.iter().map(|(_, e)| e.index).collect();
    assert!(indices.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn failed_command_is_not_persisted() {
    let (mut manager, table_id) = manager_with_table(3);
    manager.create_hand(table_id).unwrap();

    let raw_before = manager.storage().raw(table_id).unwrap().to_owned();
    let events_before = manager.sink().events.len();

    let err = manager
        .apply_action(table_id, PlayerAction::new(2, PlayerActionKind::Call))
        .unwrap_err();
    assert!(matches!(err, ManagerError::Engine(EngineError::OutOfTurn(2))));

    assert_eq!(manager.storage().raw(table_id).unwrap(), raw_before);
    assert_eq!(manager.sink().events.len(), events_before);
}

#[test]
fn viewer_sees_only_own_cards() {
    let (mut manager, table_id) = manager_with_table(3);
    manager.create_hand(table_id).unwrap();

    let snap = act(&mut manager, table_id, 1, PlayerActionKind::Call);
    for p in &snap.players {
        assert!(p.has_cards);
        assert_eq!(p.hole_cards.is_some(), p.player_id == 1, "игрок {}", p.player_id);
    }

    let public = manager.snapshot(table_id, None).unwrap();
    assert!(public.players.iter().all(|p| p.hole_cards.is_none()));
}

#[test]
fn finished_hand_is_recorded_and_revealed() {
    let (mut manager, table_id) = manager_with_table(3);
    manager.create_hand(table_id).unwrap();
    let snap = play_out(&mut manager, table_id);

    assert_eq!(snap.community_cards.len(), 5);
    assert!(snap.players.iter().all(|p| p.hole_cards.is_some()));
    assert_eq!(snap.total_pot(), Chips(300));

    let records = &manager.recorder().records;
    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.table_id, table_id);
    assert_eq!(record.hand_number, 1);
    assert_eq!(record.hole_cards.len(), 3);
    let paid: Chips = record.payouts.iter().map(|(_, _, amount)| *amount).sum();
    assert_eq!(paid, Chips(300));
    assert!(matches!(
        record.history.events.last().map(|e| &e.kind),
        Some(HandEventKind::HandEnded { hand_number: 1 })
    ));

    let stored = manager.load(table_id).unwrap();
    let stacks: Chips = stored.table.occupied_seats().map(|(_, p)| p.stack).sum();
    assert_eq!(stacks, Chips(3_000));
}

#[test]
fn leaving_mid_hand_folds_and_frees_seat_at_next_hand() {
    let (mut manager, table_id) = manager_with_table(3);
    manager.create_hand(table_id).unwrap();
    act(&mut manager, table_id, 1, PlayerActionKind::Call);

    // Ход у игрока 2: уход сбрасывает его карты и передаёт ход дальше.
    manager.leave_table(table_id, 2).unwrap();
    let stored = manager.load(table_id).unwrap();
    assert_eq!(stored.table.pending_leaves, vec![2]);
    assert!(stored.table.player_by_id(2).unwrap().folded);

    let snap = manager.snapshot(table_id, None).unwrap();
    assert_eq!(snap.turn_player, Some(3));

    play_out(&mut manager, table_id);
    manager.create_hand(table_id).unwrap();

    let stored = manager.load(table_id).unwrap();
    assert!(stored.table.seat_of(2).is_none());
    assert!(stored.table.pending_leaves.is_empty());
    assert_eq!(stored.table.seated_count(), 2);
    assert_eq!(stored.game.unwrap().players, vec![1, 3]);
}

#[test]
fn leaving_between_hands_removes_immediately() {
    let (mut manager, table_id) = manager_with_table(3);
    manager.leave_table(table_id, 3).unwrap();
    let stored = manager.load(table_id).unwrap();
    assert!(stored.table.seat_of(3).is_none());
    assert!(stored.table.pending_leaves.is_empty());
}

#[test]
fn add_chips_waits_for_the_hand_to_finish() {
    let (mut manager, table_id) = manager_with_table(2);
    manager.create_hand(table_id).unwrap();

    let err = manager.add_chips(table_id, 1, Chips(500)).unwrap_err();
    assert!(matches!(err, ManagerError::Engine(EngineError::HandInProgress)));

    // Игрок, севший во время раздачи, докупается сразу.
    manager
        .seat_player(table_id, 7, "late", 5, Chips(100))
        .unwrap();
    assert_eq!(manager.add_chips(table_id, 7, Chips(50)).unwrap(), Chips(150));
}

#[test]
fn stand_up_keeps_seat_but_skips_hands() {
    let (mut manager, table_id) = manager_with_table(3);
    manager.stand_up(table_id, 3).unwrap();

    let snap = manager.create_hand(table_id).unwrap();
    let standing = snap.players.iter().find(|p| p.player_id == 3).unwrap();
    assert!(!standing.seated);
    assert!(!standing.has_cards);

    play_out(&mut manager, table_id);
    manager.sit_down(table_id, 3).unwrap();
    let snap = manager.create_hand(table_id).unwrap();
    assert!(snap.players.iter().all(|p| p.has_cards));
}

#[test]
fn unknown_table_and_bad_config_are_reported() {
    let (mut manager, _) = manager_with_table(2);
    assert!(matches!(
        manager.create_hand(404),
        Err(ManagerError::TableNotFound(404))
    ));

    let mut bad = config();
    bad.max_seats = 11;
    assert!(matches!(
        manager.create_table("Too big", bad),
        Err(ManagerError::InvalidConfig(_))
    ));
}

#[test]
fn table_ids_continue_after_reload() {
    let mut storage = InMemoryPokerStorage::new();
    storage
        .save_table(&StoredTable::new(Table::new(5, "old", config())))
        .unwrap();

    let mut manager = TableManager::new(storage, DeterministicRng::from_seed(1));
    assert_eq!(manager.create_table("new", config()).unwrap(), 6);
    assert_eq!(manager.storage().table_ids(), vec![5, 6]);
}

#[test]
fn table_state_with_side_pots_survives_encoding() {
    let mut table = Table::new(3, "Codec", config());
    for pos in 1..=3u8 {
        table
            .seat_player(pos as PlayerId, format!("p{pos}"), pos, Chips(500))
            .unwrap();
    }
    let mut game = Game::new(table.id);
    game.pots = PotLedger::new();
    game.pots.add_round_to_pot(
        Chips(250),
        &[
            RoundContribution { seat: 0, bet: Chips(50), all_in: true, live: true },
            RoundContribution { seat: 1, bet: Chips(100), all_in: false, live: true },
            RoundContribution { seat: 2, bet: Chips(100), all_in: false, live: true },
        ],
    );
    let state = StoredTable {
        table,
        game: Some(game),
    };

    let raw = encode_table_state(&state).unwrap();
    let back = decode_table_state(&raw).unwrap();
    assert_eq!(back, state);
    assert_eq!(
        back.game.unwrap().pots.side_pot_amounts(),
        vec![Chips(100)]
    );

    assert!(decode_table_state("{not json").is_err());
}

fn stack_of(manager: &TestManager, table_id: TableId, player_id: PlayerId) -> Chips {
    let stored = manager.load(table_id).unwrap();
    stored.table.player_by_id(player_id).unwrap().stack
}

fn assert_conserved(manager: &TestManager, table_id: TableId) {
    let stored = manager.load(table_id).unwrap();
    let game = stored.game.as_ref().unwrap();
    assert_eq!(game.chips_accounted(&stored.table), game.chips_at_start);
}

#[test]
fn big_blind_leaving_before_its_turn_never_acts_again() {
    let (mut manager, table_id) = manager_with_table(3);
    manager.create_hand(table_id).unwrap();

    // Дилер 1, SB 2, BB 3; большой блайнд уходит, пока ход у дилера.
    manager.leave_table(table_id, 3).unwrap();
    assert_eq!(stack_of(&manager, table_id, 3), Chips(900));

    let snap = act(&mut manager, table_id, 1, PlayerActionKind::Call);
    assert_eq!(snap.turn_player, Some(2));
    let snap = act(&mut manager, table_id, 2, PlayerActionKind::Call);
    assert!(snap.bets_matched, "раунд закрывается на месте ушедшего BB");
    assert_eq!(snap.turn_player, None);
    assert_eq!(snap.total_pot(), Chips(300));

    let err = manager
        .apply_action(table_id, PlayerAction::new(3, PlayerActionKind::Bet(Chips(500))))
        .unwrap_err();
    assert!(matches!(err, ManagerError::Engine(EngineError::BettingClosed)));
    assert_conserved(&manager, table_id);

    play_out(&mut manager, table_id);
    assert_eq!(stack_of(&manager, table_id, 3), Chips(900));
    assert_conserved(&manager, table_id);
}

#[test]
fn big_blind_leaving_on_its_option_closes_the_round() {
    let (mut manager, table_id) = manager_with_table(4);
    manager.create_hand(table_id).unwrap();
    act(&mut manager, table_id, 4, PlayerActionKind::Call);
    act(&mut manager, table_id, 1, PlayerActionKind::Call);
    let snap = act(&mut manager, table_id, 2, PlayerActionKind::Call);
    assert_eq!(snap.turn_player, Some(3));

    manager.leave_table(table_id, 3).unwrap();
    let snap = manager.snapshot(table_id, None).unwrap();
    assert!(snap.bets_matched);
    assert_eq!(snap.total_pot(), Chips(400));
    assert_eq!(stack_of(&manager, table_id, 3), Chips(900));
    assert_conserved(&manager, table_id);

    let snap = manager.advance_phase(table_id).unwrap();
    assert_eq!(snap.phase, GamePhase::Flop);
    assert_eq!(snap.turn_player, Some(2));
}

#[test]
fn aggressor_leaving_still_closes_the_round_on_its_seat() {
    let (mut manager, table_id) = manager_with_table(4);
    manager.create_hand(table_id).unwrap();
    act(&mut manager, table_id, 4, PlayerActionKind::Bet(Chips(300)));

    manager.leave_table(table_id, 4).unwrap();
    let snap = manager.snapshot(table_id, None).unwrap();
    assert_eq!(snap.turn_player, Some(1));

    let snap = act(&mut manager, table_id, 1, PlayerActionKind::Call);
    assert_eq!(snap.turn_player, Some(2));
    let snap = act(&mut manager, table_id, 2, PlayerActionKind::Call);
    assert_eq!(snap.turn_player, Some(3));
    let snap = act(&mut manager, table_id, 3, PlayerActionKind::Call);
    assert!(snap.bets_matched);
    assert_eq!(snap.total_pot(), Chips(1_200));

    assert_eq!(stack_of(&manager, table_id, 4), Chips(700));
    assert_conserved(&manager, table_id);
    play_out(&mut manager, table_id);
    assert_eq!(stack_of(&manager, table_id, 4), Chips(700));
}

#[test]
fn standing_up_on_turn_passes_it_on() {
    let (mut manager, table_id) = manager_with_table(3);
    manager.create_hand(table_id).unwrap();

    manager.stand_up(table_id, 1).unwrap();
    let snap = manager.snapshot(table_id, None).unwrap();
    assert_eq!(snap.turn_player, Some(2));
    let standing = snap.players.iter().find(|p| p.player_id == 1).unwrap();
    assert!(standing.folded && !standing.seated);

    let snap = act(&mut manager, table_id, 2, PlayerActionKind::Call);
    assert_eq!(snap.turn_player, Some(3), "опцион остаётся у большого блайнда");
    let snap = act(&mut manager, table_id, 3, PlayerActionKind::Check);
    assert!(snap.bets_matched);
    assert_conserved(&manager, table_id);

    play_out(&mut manager, table_id);
    assert_eq!(stack_of(&manager, table_id, 1), Chips(1_000));
    assert_conserved(&manager, table_id);
}

#[test]
fn hand_won_by_folds_on_the_river_stays_hidden() {
    let (mut manager, table_id) = manager_with_table(3);
    let mut snap = manager.create_hand(table_id).unwrap();
    while !(snap.phase == GamePhase::River && !snap.bets_matched) {
        snap = match (snap.bets_matched, snap.turn_player) {
            (false, Some(pid)) => {
                let owes = snap
                    .players
                    .iter()
                    .find(|p| p.player_id == pid)
                    .is_some_and(|p| p.current_bet < snap.current_bet);
                let kind = if owes {
                    PlayerActionKind::Call
                } else {
                    PlayerActionKind::Check
                };
                act(&mut manager, table_id, pid, kind)
            }
            _ => manager.advance_phase(table_id).unwrap(),
        };
    }

    let bettor = snap.turn_player.unwrap();
    snap = act(&mut manager, table_id, bettor, PlayerActionKind::Bet(Chips(200)));
    while !snap.bets_matched {
        let pid = snap.turn_player.unwrap();
        snap = act(&mut manager, table_id, pid, PlayerActionKind::Fold);
    }
    let snap = manager.advance_phase(table_id).unwrap();

    assert_eq!(snap.phase, GamePhase::End);
    assert_eq!(snap.community_cards.len(), 5);
    let public = manager.snapshot(table_id, None).unwrap();
    assert!(public.players.iter().all(|p| p.hole_cards.is_none()));
    assert_eq!(stack_of(&manager, table_id, bettor), Chips(1_200));
}
