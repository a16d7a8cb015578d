use core::fmt;

use serde::{Deserialize, Serialize};

/// Фаза раздачи. Переходы только вперёд: см. `GamePhase::next`.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub enum GamePhase {
    #[default]
    NotStarted,
    Start,
    Preflop,
    Flop,
    Turn,
    River,
    End,
}

impl GamePhase {
    /// Следующая фаза. `End` – терминальная.
    pub fn next(self) -> GamePhase {
        match self {
            GamePhase::NotStarted => GamePhase::Start,
            GamePhase::Start => GamePhase::Preflop,
            GamePhase::Preflop => GamePhase::Flop,
            GamePhase::Flop => GamePhase::Turn,
            GamePhase::Turn => GamePhase::River,
            GamePhase::River | GamePhase::End => GamePhase::End,
        }
    }

    /// Идёт ли в этой фазе раунд ставок.
    pub fn is_betting(self) -> bool {
        matches!(
            self,
            GamePhase::Preflop | GamePhase::Flop | GamePhase::Turn | GamePhase::River
        )
    }

    /// Сколько общих карт открывается при входе в фазу.
    pub fn cards_revealed(self) -> usize {
        match self {
            GamePhase::Flop => 3,
            GamePhase::Turn | GamePhase::River => 1,
            _ => 0,
        }
    }
}

impl fmt::Display for GamePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            GamePhase::NotStarted => "not started",
            GamePhase::Start => "start",
            GamePhase::Preflop => "preflop",
            GamePhase::Flop => "flop",
            GamePhase::Turn => "turn",
            GamePhase::River => "river",
            GamePhase::End => "end",
        };
        f.write_str(s)
    }
}

/// Упакованная сила руки: категория + 5 рангов (см. `eval::hand_rank`).
/// Чем больше число, тем сильнее рука.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HandRank(pub u32);
