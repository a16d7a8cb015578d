use core::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::{Chips, PlayerId};

/// Тип действия игрока.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum PlayerActionKind {
    /// Ставка/рейз: сколько фишек игрок добавляет к своей ставке в раунде.
    Bet(Chips),
    /// Уравнять текущую ставку (или check большого блайнда с опционом).
    Call,
    Check,
    Fold,
}

impl PlayerActionKind {
    pub fn label(self) -> &'static str {
        match self {
            PlayerActionKind::Bet(_) => "bet",
            PlayerActionKind::Call => "call",
            PlayerActionKind::Check => "check",
            PlayerActionKind::Fold => "fold",
        }
    }
}

impl fmt::Display for PlayerActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayerActionKind::Bet(amount) => write!(f, "bet {amount}"),
            other => f.write_str(other.label()),
        }
    }
}

/// Конкретное действие игрока.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerAction {
    /// Какой игрок действует.
    pub player_id: PlayerId,
    /// Само действие.
    pub kind: PlayerActionKind,
}

impl PlayerAction {
    pub fn new(player_id: PlayerId, kind: PlayerActionKind) -> Self {
        Self { player_id, kind }
    }
}
