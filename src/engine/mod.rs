//! Покерный движок: очередь хода, раунды ставок, банки и сайд-поты, шоудаун.
//!
//! Высокоуровневый объект: `TableManager`
//! Основные операции:
//!   - `start_hand` – запустить новую раздачу
//!   - `apply_action` – применить действие игрока
//!   - `advance_phase` – открыть следующую улицу / завершить раздачу
//!
//! Движок синхронный и не делает I/O: одна команда за раз на стол,
//! сериализацию команд обеспечивает вызывающий код.

pub mod actions;
pub mod betting;
pub mod errors;
pub mod game_loop;
pub mod hand_history;
pub mod positions;
pub mod pot;
pub mod snapshot;
pub mod table_manager;
pub mod validation;

pub use actions::{PlayerAction, PlayerActionKind};
pub use errors::EngineError;
pub use game_loop::{advance_phase, apply_action, start_hand, Game, PotAward, WinnerShare};
pub use hand_history::{
    EventSink, HandEvent, HandEventKind, HandHistory, HandRecord, HandRecorder,
    InMemoryCollector, NullSink,
};
pub use positions::find_next_active_position;
pub use pot::{Pot, PotLedger, RoundContribution};
pub use snapshot::{GameSnapshot, PlayerView};
pub use table_manager::{ManagerError, TableManager};

/// RNG интерфейс для engine.
/// Реализации – в infra (обёртки над `rand`).
pub trait RandomSource {
    /// Равномерная перестановка за один проход (Fisher–Yates).
    fn shuffle<T>(&mut self, slice: &mut [T]);
}
