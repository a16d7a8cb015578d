use serde::{Deserialize, Serialize};

use crate::domain::{PlayerId, TableId};
use crate::engine::hand_history::{EventSink, HandRecorder};
use crate::engine::table_manager::TableManager;
use crate::engine::RandomSource;
use crate::infra::persistence::PokerStorage;

use super::dto::{TableSummaryDto, TableViewDto};
use super::errors::ApiError;

/// Запросы "только чтение".
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum Query {
    /// Получить состояние стола. `viewer` видит свои карманные карты.
    GetTable {
        table_id: TableId,
        viewer: Option<PlayerId>,
    },

    /// Получить список столов (для лобби).
    ListTables,
}

/// Результат запроса "только чтение".
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum QueryResponse {
    Table(TableViewDto),
    Tables(Vec<TableSummaryDto>),
}

pub fn execute_query<S, R, E, H>(
    manager: &TableManager<S, R, E, H>,
    query: Query,
) -> Result<QueryResponse, ApiError>
where
    S: PokerStorage,
    R: RandomSource,
    E: EventSink,
    H: HandRecorder,
{
    match query {
        Query::GetTable { table_id, viewer } => {
            let state = manager.load(table_id)?;
            let game = manager.snapshot(table_id, viewer)?;
            let table = &state.table;
            Ok(QueryResponse::Table(TableViewDto {
                table_id: table.id,
                name: table.name.clone(),
                max_seats: table.max_seats(),
                small_blind: table.config.stakes.small_blind,
                big_blind: table.config.stakes.big_blind,
                turn_seconds: table.config.timer.turn_seconds,
                hands_played: table.hands_played,
                game,
            }))
        }
        Query::ListTables => {
            let mut tables = Vec::new();
            for table_id in manager.storage().table_ids() {
                tables.push(TableSummaryDto::from_state(&manager.load(table_id)?));
            }
            Ok(QueryResponse::Tables(tables))
        }
    }
}
