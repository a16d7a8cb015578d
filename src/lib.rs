//! Движок стола Texas Hold'em.
//!
//! Колода и раздача, банк с сайд-потами, машина состояний раунда ставок
//! и определение победителей на шоудауне. Движок не делает I/O:
//! хранилище, рассылка событий и история игр – внешние коллабораторы
//! (см. `engine::hand_history` и `infra::persistence`).
//!
//! Внешние команды:
//!   - `TableManager::create_hand`   – начать новую раздачу;
//!   - `TableManager::apply_action`  – действие игрока;
//!   - `TableManager::advance_phase` – открыть следующие карты / шоудаун.

pub mod api;
pub mod domain;
pub mod engine;
pub mod eval;
pub mod infra;

/// Версия библиотеки.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
