use crate::domain::{Chips, PlayerId};

use thiserror::Error;

/// Ошибки движка покера.
///
/// Любая ошибка возвращается до мутации состояния: команда либо
/// применяется целиком, либо не применяется вовсе.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Сейчас не ход игрока с id={0}")]
    OutOfTurn(PlayerId),

    #[error("Недопустимая ставка {amount} (стек {stack})")]
    InvalidBet { amount: i64, stack: Chips },

    #[error("Недостаточно игроков с фишками для раздачи: {found}")]
    InsufficientPlayers { found: usize },

    /// Структурно недостижимо: в раздаче максимум 10×2 + 5 + 3 = 28 карт.
    #[error("Колода пуста")]
    EmptyDeck,

    #[error("Игрок {0} не найден за столом")]
    PlayerNotFound(PlayerId),

    #[error("Раздача не активна")]
    NoActiveHand,

    #[error("Раунд ставок уже закрыт")]
    BettingClosed,

    #[error("Раунд ставок ещё не завершён")]
    BettingNotFinished,

    #[error("Невозможно выполнить check – нужно доплатить {to_call}")]
    CannotCheck { to_call: Chips },

    #[error("Раздача уже завершена")]
    HandFinished,

    #[error("Раздача уже идёт")]
    HandInProgress,

    #[error("Позиция {0} не существует за столом")]
    InvalidSeat(u8),

    #[error("Позиция {0} уже занята")]
    SeatTaken(u8),

    #[error("Игрок {0} уже сидит за столом")]
    AlreadySeated(PlayerId),

    #[error("Сумма фишек должна быть положительной")]
    InvalidChipAmount,
}

impl EngineError {
    /// Ошибки, после которых состояние нельзя считать корректным.
    pub fn is_fatal(&self) -> bool {
        matches!(self, EngineError::EmptyDeck)
    }
}
