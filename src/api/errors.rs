use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{PlayerId, TableId};
use crate::engine::table_manager::ManagerError;
use crate::engine::EngineError;

/// Ошибки внешнего API (то, что отдаём фронту / клиенту).
#[derive(Clone, Debug, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum ApiError {
    /// Неправильные входные данные (например, битый конфиг).
    #[error("Некорректный запрос: {0}")]
    BadRequest(String),

    #[error("Стол {0} не найден")]
    TableNotFound(TableId),

    #[error("Игрок {0} не найден за столом")]
    PlayerNotAtTable(PlayerId),

    /// Ошибка движка (ставки, действия, очередь хода).
    #[error("{0}")]
    EngineError(String),

    /// Внутренняя ошибка (хранилище, нарушенный инвариант).
    #[error("Внутренняя ошибка: {0}")]
    Internal(String),
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::PlayerNotFound(id) => ApiError::PlayerNotAtTable(id),
            e if e.is_fatal() => ApiError::Internal(e.to_string()),
            e => ApiError::EngineError(e.to_string()),
        }
    }
}

impl From<ManagerError> for ApiError {
    fn from(err: ManagerError) -> Self {
        match err {
            ManagerError::TableNotFound(id) => ApiError::TableNotFound(id),
            ManagerError::InvalidConfig(msg) => ApiError::BadRequest(msg),
            ManagerError::Engine(e) => e.into(),
            ManagerError::Storage(e) => ApiError::Internal(e.to_string()),
        }
    }
}
