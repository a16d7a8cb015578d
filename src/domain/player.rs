use serde::{Deserialize, Serialize};

use crate::domain::card::Card;
use crate::domain::chips::Chips;
use crate::domain::PlayerId;

/// Роль игрока в текущей раздаче.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum PokerPosition {
    Dealer,
    SmallBlind,
    BigBlind,
    #[default]
    Other,
}

/// Состояние игрока за конкретным столом.
///
/// Владелец – `Table`; игра ссылается на игрока только через индекс места.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerAtTable {
    pub player_id: PlayerId,
    pub name: String,
    /// Позиция за столом (1..=10).
    pub position: u8,
    /// Текущий стек за столом.
    pub stack: Chips,
    /// Ставка в текущем раунде.
    pub current_bet: Chips,
    pub folded: bool,
    /// Участвует ли игрок в игре (false – встал из-за стола или вылетел).
    pub in_game: bool,
    pub seated: bool,
    /// Карманные карты (0 или 2).
    pub hole_cards: Vec<Card>,
    pub is_dealer: bool,
    pub role: PokerPosition,
}

impl PlayerAtTable {
    pub fn new(player_id: PlayerId, name: impl Into<String>, position: u8, stack: Chips) -> Self {
        Self {
            player_id,
            name: name.into(),
            position,
            stack,
            current_bet: Chips::ZERO,
            folded: false,
            in_game: true,
            seated: true,
            hole_cards: Vec::new(),
            is_dealer: false,
            role: PokerPosition::Other,
        }
    }

    /// Активен ли игрок в раздаче.
    ///
    /// `only_bettors` – дополнительно требовать ненулевой стек
    /// (игрок в олл-ине активен, но ходить уже не может).
    pub fn is_active(&self, only_bettors: bool) -> bool {
        self.in_game && !self.folded && !(only_bettors && self.stack.is_zero())
    }

    /// Получил ли игрок карты в этой раздаче.
    pub fn has_cards(&self) -> bool {
        self.hole_cards.len() == 2
    }

    /// Может ли игрок получить карты в новой раздаче.
    pub fn can_be_dealt_in(&self) -> bool {
        self.seated && self.in_game && !self.stack.is_zero()
    }

    pub fn is_all_in(&self) -> bool {
        self.in_game && !self.folded && self.has_cards() && self.stack.is_zero()
    }

    /// Снять фишки со стека в ставку текущего раунда.
    pub fn make_bet(&mut self, amount: Chips) {
        self.current_bet += amount;
        self.stack -= amount;
    }

    /// Очистить всё, что относится к одной раздаче. Стек сохраняется.
    pub fn reset_for_new_hand(&mut self) {
        self.hole_cards.clear();
        self.current_bet = Chips::ZERO;
        self.folded = false;
        self.is_dealer = false;
        self.role = PokerPosition::Other;
        if self.stack.is_zero() {
            self.in_game = false;
        }
    }
}
