use serde::{Deserialize, Serialize};

use crate::domain::card::Card;
use crate::domain::chips::Chips;
use crate::domain::hand::GamePhase;
use crate::domain::{PlayerId, SeatIndex, TableId};
use crate::engine::actions::PlayerActionKind;
use crate::eval::HandCategory;

/// Тип события в раздаче.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum HandEventKind {
    /// Новая раздача началась.
    HandStarted {
        hand_number: u64,
        player_count: usize,
    },

    /// Игрок получил карманные карты. Приватное событие: только владельцу.
    PlayerCardsDealt {
        player_id: PlayerId,
        cards: Vec<Card>,
    },

    /// Открыты общие карты на борде.
    CommunityCardsRevealed {
        phase: GamePhase,
        cards: Vec<Card>,
    },

    /// Действие игрока. `amount` – сколько фишек реально ушло со стека.
    PlayerActed {
        player_name: String,
        action: PlayerActionKind,
        amount: Chips,
    },

    /// Выплата банка. `hand_type` пустой, если банк забран без вскрытия.
    PotWinner {
        player_name: String,
        hand_type: Option<HandCategory>,
        amount: Chips,
        cards: Vec<Card>,
    },

    /// Раздача завершена.
    HandEnded { hand_number: u64 },
}

impl HandEventKind {
    /// Кому адресовано событие. `None` – всем за столом.
    pub fn recipient(&self) -> Option<PlayerId> {
        match self {
            HandEventKind::PlayerCardsDealt { player_id, .. } => Some(*player_id),
            _ => None,
        }
    }
}

/// Событие в раздаче с порядковым номером.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct HandEvent {
    pub index: u32,
    pub kind: HandEventKind,
}

/// Полная история раздачи.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct HandHistory {
    pub events: Vec<HandEvent>,
}

impl HandHistory {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn push(&mut self, kind: HandEventKind) {
        let idx = self.events.len() as u32;
        self.events.push(HandEvent { index: idx, kind });
    }

    /// События, добавленные начиная с позиции `from`.
    pub fn since(&self, from: usize) -> Vec<HandEvent> {
        self.events.get(from..).map(<[_]>::to_vec).unwrap_or_default()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

/// Итог раздачи для внешнего журнала.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct HandRecord {
    pub table_id: TableId,
    pub hand_number: u64,
    pub community_cards: Vec<Card>,
    /// Карманные карты всех, кто получил карты в этой раздаче.
    pub hole_cards: Vec<(PlayerId, Vec<Card>)>,
    /// Выплаты: место, игрок, сумма.
    pub payouts: Vec<(SeatIndex, PlayerId, Chips)>,
    pub history: HandHistory,
}

/// Канал рассылки событий клиентам (внешний коллаборатор).
pub trait EventSink {
    fn publish(&mut self, table_id: TableId, event: &HandEvent);
}

/// Журнал сыгранных раздач (внешний коллаборатор).
pub trait HandRecorder {
    fn record(&mut self, record: HandRecord);
}

/// Sink, который ничего не делает.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn publish(&mut self, _table_id: TableId, _event: &HandEvent) {}
}

impl HandRecorder for NullSink {
    fn record(&mut self, _record: HandRecord) {}
}

/// Складывает всё в память. Удобно для тестов и dev-CLI.
#[derive(Clone, Debug, Default)]
pub struct InMemoryCollector {
    pub events: Vec<(TableId, HandEvent)>,
    pub records: Vec<HandRecord>,
}

impl EventSink for InMemoryCollector {
    fn publish(&mut self, table_id: TableId, event: &HandEvent) {
        self.events.push((table_id, event.clone()));
    }
}

impl HandRecorder for InMemoryCollector {
    fn record(&mut self, record: HandRecord) {
        self.records.push(record);
    }
}
