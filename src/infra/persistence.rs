use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::table::Table;
use crate::domain::TableId;
use crate::engine::game_loop::Game;

/// Агрегат хранилища: стол и (если была) его текущая/последняя раздача.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredTable {
    pub table: Table,
    pub game: Option<Game>,
}

impl StoredTable {
    pub fn new(table: Table) -> Self {
        Self { table, game: None }
    }
}

/// Ошибки слоя хранения.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Ошибка сериализации состояния стола: {0}")]
    Codec(#[from] serde_json::Error),

    #[error("Ошибка хранилища: {0}")]
    Backend(String),
}

/// Сериализовать стол вместе с раздачей (колода, борд, цепочка банков, победители).
pub fn encode_table_state(state: &StoredTable) -> Result<String, StorageError> {
    Ok(serde_json::to_string(state)?)
}

pub fn decode_table_state(raw: &str) -> Result<StoredTable, StorageError> {
    Ok(serde_json::from_str(raw)?)
}

/// Абстракция хранилища для покера (внешний коллаборатор).
///
/// Движок сам ничего не сохраняет: `TableManager` загружает агрегат,
/// применяет команду к копии и сохраняет результат только при успехе.
pub trait PokerStorage {
    /// Загрузить стол.
    fn load_table(&self, id: TableId) -> Result<Option<StoredTable>, StorageError>;

    /// Сохранить стол.
    fn save_table(&mut self, state: &StoredTable) -> Result<(), StorageError>;

    /// Все известные столы.
    fn table_ids(&self) -> Vec<TableId>;
}

/// Простая in-memory реализация для тестов и локального запуска.
///
/// Хранит JSON, а не сами структуры: так каждая команда проходит
/// через ту же границу сериализации, что и настоящее хранилище.
#[derive(Debug, Default)]
pub struct InMemoryPokerStorage {
    tables: HashMap<TableId, String>,
}

impl InMemoryPokerStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Сырой JSON стола (для отладки).
    pub fn raw(&self, id: TableId) -> Option<&str> {
        self.tables.get(&id).map(String::as_str)
    }
}

impl PokerStorage for InMemoryPokerStorage {
    fn load_table(&self, id: TableId) -> Result<Option<StoredTable>, StorageError> {
        self.tables
            .get(&id)
            .map(|raw| decode_table_state(raw))
            .transpose()
    }

    fn save_table(&mut self, state: &StoredTable) -> Result<(), StorageError> {
        let raw = encode_table_state(state)?;
        self.tables.insert(state.table.id, raw);
        Ok(())
    }

    fn table_ids(&self) -> Vec<TableId> {
        let mut ids: Vec<TableId> = self.tables.keys().copied().collect();
        ids.sort_unstable();
        ids
    }
}
