use serde::{Deserialize, Serialize};

use crate::domain::chips::Chips;
use crate::domain::{SeatIndex, TableId};
use crate::engine::snapshot::GameSnapshot;
use crate::infra::persistence::StoredTable;

/// DTO стола: настройки + снимок раздачи.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TableViewDto {
    pub table_id: TableId,
    pub name: String,
    pub max_seats: u8,
    pub small_blind: Chips,
    pub big_blind: Chips,
    pub turn_seconds: u32,
    pub hands_played: u64,
    pub game: GameSnapshot,
}

/// Краткая строка для лобби.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TableSummaryDto {
    pub table_id: TableId,
    pub name: String,
    pub max_seats: u8,
    pub seated: usize,
    pub small_blind: Chips,
    pub big_blind: Chips,
    /// Есть ли активная раздача.
    pub hand_in_progress: bool,
}

impl TableSummaryDto {
    pub fn from_state(state: &StoredTable) -> Self {
        let table = &state.table;
        Self {
            table_id: table.id,
            name: table.name.clone(),
            max_seats: table.max_seats(),
            seated: table.seated_count(),
            small_blind: table.config.stakes.small_blind,
            big_blind: table.config.stakes.big_blind,
            hand_in_progress: state.game.as_ref().is_some_and(|g| g.in_progress()),
        }
    }
}

/// Ответ API на команду.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum CommandResponse {
    /// Успешный результат без доп.данных.
    Ok,

    /// Создан новый стол.
    TableCreated { table_id: TableId },

    /// Игрок посажен на место.
    PlayerSeated { seat_index: SeatIndex },

    /// Новый стек после докупки.
    ChipsAdded { stack: Chips },

    /// Обновлённое состояние раздачи.
    Snapshot(GameSnapshot),
}
