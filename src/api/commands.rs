use serde::{Deserialize, Serialize};

use crate::domain::chips::Chips;
use crate::domain::table::{TableConfig, TableStakes, TimerConfig};
use crate::domain::{PlayerId, TableId};
use crate::engine::actions::{PlayerAction, PlayerActionKind};
use crate::engine::hand_history::{EventSink, HandRecorder};
use crate::engine::table_manager::TableManager;
use crate::engine::{EngineError, RandomSource};
use crate::infra::persistence::PokerStorage;

use super::dto::CommandResponse;
use super::errors::ApiError;

/// Команда верхнего уровня.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum Command {
    /// Создать новый стол.
    CreateTable(CreateTableCommand),

    /// Операция над конкретным столом.
    TableCommand(TableCommand),
}

/// Команда создания стола.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CreateTableCommand {
    /// Имя стола (отображается во фронте / лобби).
    pub name: String,
    /// Максимальное количество мест (2–10).
    pub max_seats: u8,
    pub small_blind: Chips,
    pub big_blind: Chips,
    /// Секунд на ход (таймер – внешний).
    pub turn_seconds: u32,
}

impl CreateTableCommand {
    pub fn to_config(&self) -> TableConfig {
        TableConfig {
            max_seats: self.max_seats,
            stakes: TableStakes::new(self.small_blind, self.big_blind),
            timer: TimerConfig {
                turn_seconds: self.turn_seconds,
            },
        }
    }
}

/// Команды, которые относятся к существующему столу.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum TableCommand {
    /// Посадить игрока за стол.
    SeatPlayer(SeatPlayerCommand),

    /// Встать из-за стола, сохранив место.
    StandUp { table_id: TableId, player_id: PlayerId },

    /// Вернуться на своё место.
    SitDown { table_id: TableId, player_id: PlayerId },

    /// Уйти из-за стола (во время раздачи – после её завершения).
    LeaveTable { table_id: TableId, player_id: PlayerId },

    /// Докупить фишки.
    AddChips(AddChipsCommand),

    /// Запустить новую раздачу (если сейчас нет активной).
    StartHand { table_id: TableId },

    /// Действие игрока в раздаче.
    PlayerAction(PlayerActionCommand),

    /// Открыть следующую улицу / завершить раздачу.
    AdvancePhase { table_id: TableId },
}

/// Посадить игрока на позицию 1..=max_seats.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SeatPlayerCommand {
    pub table_id: TableId,
    pub player_id: PlayerId,
    pub position: u8,
    pub display_name: String,
    pub initial_stack: Chips,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AddChipsCommand {
    pub table_id: TableId,
    pub player_id: PlayerId,
    pub amount: Chips,
}

/// Внешнее представление действия. Сумма ставки приходит знаковой:
/// отрицательные значения отсекаются здесь, до движка.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum ActionKindApi {
    Bet { amount: i64 },
    Call,
    Check,
    Fold,
}

/// Действие игрока в раздаче.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlayerActionCommand {
    pub table_id: TableId,
    pub player_id: PlayerId,
    pub action: ActionKindApi,
}

impl PlayerActionCommand {
    /// Перевести в действие движка.
    pub fn to_engine_action(&self) -> Result<PlayerAction, EngineError> {
        let kind = match self.action {
            ActionKindApi::Bet { amount } => {
                let amount = u64::try_from(amount).map_err(|_| EngineError::InvalidBet {
                    amount,
                    stack: Chips::ZERO,
                })?;
                PlayerActionKind::Bet(Chips(amount))
            }
            ActionKindApi::Call => PlayerActionKind::Call,
            ActionKindApi::Check => PlayerActionKind::Check,
            ActionKindApi::Fold => PlayerActionKind::Fold,
        };
        Ok(PlayerAction::new(self.player_id, kind))
    }
}

/// Выполнить команду через менеджер столов.
pub fn execute_command<S, R, E, H>(
    manager: &mut TableManager<S, R, E, H>,
    command: Command,
) -> Result<CommandResponse, ApiError>
where
    S: PokerStorage,
    R: RandomSource,
    E: EventSink,
    H: HandRecorder,
{
    match command {
        Command::CreateTable(cmd) => {
            let table_id = manager.create_table(cmd.name.clone(), cmd.to_config())?;
            Ok(CommandResponse::TableCreated { table_id })
        }
        Command::TableCommand(cmd) => execute_table_command(manager, cmd),
    }
}

fn execute_table_command<S, R, E, H>(
    manager: &mut TableManager<S, R, E, H>,
    command: TableCommand,
) -> Result<CommandResponse, ApiError>
where
    S: PokerStorage,
    R: RandomSource,
    E: EventSink,
    H: HandRecorder,
{
    let response = match command {
        TableCommand::SeatPlayer(cmd) => {
            let seat = manager.seat_player(
                cmd.table_id,
                cmd.player_id,
                cmd.display_name,
                cmd.position,
                cmd.initial_stack,
            )?;
            CommandResponse::PlayerSeated { seat_index: seat }
        }
        TableCommand::StandUp { table_id, player_id } => {
            manager.stand_up(table_id, player_id)?;
            CommandResponse::Ok
        }
        TableCommand::SitDown { table_id, player_id } => {
            manager.sit_down(table_id, player_id)?;
            CommandResponse::Ok
        }
        TableCommand::LeaveTable { table_id, player_id } => {
            manager.leave_table(table_id, player_id)?;
            CommandResponse::Ok
        }
        TableCommand::AddChips(cmd) => {
            let stack = manager.add_chips(cmd.table_id, cmd.player_id, cmd.amount)?;
            CommandResponse::ChipsAdded { stack }
        }
        TableCommand::StartHand { table_id } => {
            CommandResponse::Snapshot(manager.create_hand(table_id)?)
        }
        TableCommand::PlayerAction(cmd) => {
            let action = cmd.to_engine_action()?;
            CommandResponse::Snapshot(manager.apply_action(cmd.table_id, action)?)
        }
        TableCommand::AdvancePhase { table_id } => {
            CommandResponse::Snapshot(manager.advance_phase(table_id)?)
        }
    };
    Ok(response)
}
