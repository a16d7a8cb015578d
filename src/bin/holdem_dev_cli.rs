// src/bin/holdem_dev_cli.rs
//
// Dev-CLI: прогоняет несколько раздач на одном столе через TableManager.
// Необязательный аргумент – путь к JSON с TableConfig.

use std::env;
use std::fs;
use std::process::ExitCode;

use holdem_engine::domain::chips::Chips;
use holdem_engine::domain::hand::GamePhase;
use holdem_engine::domain::table::TableConfig;
use holdem_engine::domain::TableId;
use holdem_engine::engine::{
    GameSnapshot, HandEventKind, InMemoryCollector, ManagerError, PlayerAction,
    PlayerActionKind, TableManager,
};
use holdem_engine::eval::describe_hand;
use holdem_engine::infra::{IdGenerator, InMemoryPokerStorage, SystemRng};
use holdem_engine::VERSION;
use log::{error, info};

type DevManager =
    TableManager<InMemoryPokerStorage, SystemRng, InMemoryCollector, InMemoryCollector>;

/// Сценарий тестовой раздачи.
#[derive(Copy, Clone, Debug)]
enum Scenario {
    CheckCall,
    WithFold,
    AllIn,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match env::args().nth(1) {
        Some(path) => match load_config(&path) {
            Ok(cfg) => cfg,
            Err(e) => {
                error!("Не удалось прочитать конфиг {path}: {e}");
                return ExitCode::FAILURE;
            }
        },
        None => TableConfig::default(),
    };

    match run(config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("holdem_dev_cli: {e}");
            ExitCode::FAILURE
        }
    }
}

fn load_config(path: &str) -> Result<TableConfig, String> {
    let raw = fs::read_to_string(path).map_err(|e| e.to_string())?;
    serde_json::from_str(&raw).map_err(|e| e.to_string())
}

fn run(config: TableConfig) -> Result<(), ManagerError> {
    info!("holdem-engine {VERSION}: dev-прогон, {} мест", config.max_seats);
    let ids = IdGenerator::new();
    let mut manager: DevManager = TableManager::with_collaborators(
        InMemoryPokerStorage::new(),
        SystemRng,
        InMemoryCollector::default(),
        InMemoryCollector::default(),
    );

    let table_id = manager.create_table("DEV TABLE", config)?;
    for position in 1..=4u8 {
        let player_id = ids.next_player_id();
        manager.seat_player(
            table_id,
            player_id,
            format!("bot-{position}"),
            position,
            Chips(200 * position as u64),
        )?;
    }

    for scenario in [Scenario::CheckCall, Scenario::WithFold, Scenario::AllIn] {
        play_hand(&mut manager, table_id, scenario)?;
    }

    info!(
        "Событий разослано: {}, раздач записано: {}",
        manager.sink().events.len(),
        manager.recorder().records.len()
    );
    Ok(())
}

/// Одна полная раздача: действия ботов, пока раунд открыт, иначе – следующая улица.
fn play_hand(
    manager: &mut DevManager,
    table_id: TableId,
    scenario: Scenario,
) -> Result<(), ManagerError> {
    const MAX_STEPS: u32 = 200;

    let mut snap = manager.create_hand(table_id)?;
    info!("=== Раздача #{} ({scenario:?}) ===", snap.hand_number);

    for step in 0..MAX_STEPS {
        if snap.phase == GamePhase::End {
            print_result(manager, table_id, &snap);
            return Ok(());
        }

        snap = match snap.turn_player {
            Some(player_id) if !snap.bets_matched => {
                let kind = pick_action(&snap, player_id, scenario, step);
                info!("[step={step}] {} игрок {player_id}: {kind}", snap.phase);
                manager.apply_action(table_id, PlayerAction::new(player_id, kind))?
            }
            _ => manager.advance_phase(table_id)?,
        };
    }

    error!("Превышен лимит шагов ({MAX_STEPS})");
    Ok(())
}

fn pick_action(
    snap: &GameSnapshot,
    player_id: u64,
    scenario: Scenario,
    step: u32,
) -> PlayerActionKind {
    let Some(me) = snap.players.iter().find(|p| p.player_id == player_id) else {
        return PlayerActionKind::Fold;
    };
    let to_call = snap.current_bet.saturating_sub(me.current_bet);

    match scenario {
        Scenario::WithFold if step % 3 == 1 && !to_call.is_zero() => PlayerActionKind::Fold,
        Scenario::AllIn if step == 0 => PlayerActionKind::Bet(me.stack),
        _ if to_call.is_zero() => PlayerActionKind::Check,
        _ => PlayerActionKind::Call,
    }
}

fn print_result(manager: &DevManager, table_id: TableId, snap: &GameSnapshot) {
    info!("Борд: {:?}", snap.community_cards.iter().map(ToString::to_string).collect::<Vec<_>>());
    for award in &snap.winners {
        for share in &award.shares {
            let hand = share
                .hand
                .map(|h| describe_hand(h.rank))
                .unwrap_or_else(|| "без вскрытия".to_string());
            info!(
                "  банк #{}: {} получает {} ({hand})",
                award.pot_index, share.player_name, share.amount
            );
        }
    }
    let private = manager
        .sink()
        .events
        .iter()
        .filter(|(id, e)| *id == table_id && matches!(e.kind, HandEventKind::PlayerCardsDealt { .. }))
        .count();
    info!("Приватных событий с картами за всё время: {private}");
}
