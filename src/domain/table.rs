use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::chips::Chips;
use crate::domain::player::PlayerAtTable;
use crate::domain::{PlayerId, TableId};
use crate::engine::errors::EngineError;

/// Индекс места за столом (0..max_seats-1). Позиция игрока = индекс + 1.
pub type SeatIndex = u8;

/// Больше десяти мест за столом не бывает.
pub const MAX_SEATS: u8 = 10;

/// Стейки стола (SB/BB).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TableStakes {
    pub small_blind: Chips,
    pub big_blind: Chips,
}

impl TableStakes {
    pub fn new(sb: Chips, bb: Chips) -> Self {
        Self {
            small_blind: sb,
            big_blind: bb,
        }
    }
}

/// Настройки таймера хода. Сам таймер – внешний коллаборатор.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TimerConfig {
    pub turn_seconds: u32,
}

/// Конфиг стола: сколько мест, какие блайнды, сколько секунд на ход.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TableConfig {
    /// Максимальное количество мест за столом (2–10).
    pub max_seats: u8,
    pub stakes: TableStakes,
    pub timer: TimerConfig,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            max_seats: MAX_SEATS,
            stakes: TableStakes::new(Chips(1), Chips(2)),
            timer: TimerConfig { turn_seconds: 30 },
        }
    }
}

impl TableConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.max_seats < 2 || self.max_seats > MAX_SEATS {
            return Err(format!(
                "TableConfig: max_seats = {} (ожидается 2..={MAX_SEATS})",
                self.max_seats
            ));
        }
        if self.stakes.small_blind.is_zero() {
            return Err("TableConfig: small_blind = 0".into());
        }
        if self.stakes.big_blind < self.stakes.small_blind {
            return Err(format!(
                "TableConfig: big_blind ({}) < small_blind ({})",
                self.stakes.big_blind, self.stakes.small_blind
            ));
        }
        if self.timer.turn_seconds == 0 {
            return Err("TableConfig: turn_seconds = 0".into());
        }
        Ok(())
    }
}

/// Основное состояние стола.
///
/// Стол владеет игроками; игра (`Game`) хранит только индексы мест.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Table {
    pub id: TableId,
    pub name: String,
    pub config: TableConfig,

    /// Места за столом: индекс вектора = SeatIndex.
    /// None – место пустое.
    pub seats: Vec<Option<PlayerAtTable>>,

    /// PlayerId -> SeatIndex, чтобы не искать игрока перебором мест.
    pub seat_by_player: BTreeMap<PlayerId, SeatIndex>,

    /// Игроки, которые ушли во время раздачи: убираем их при старте следующей.
    pub pending_leaves: Vec<PlayerId>,

    /// Сколько раздач сыграно за этим столом.
    pub hands_played: u64,
}

impl Table {
    /// Создать пустой стол с заданной конфигурацией.
    pub fn new(id: TableId, name: impl Into<String>, config: TableConfig) -> Self {
        let seats = vec![None; config.max_seats as usize];
        Self {
            id,
            name: name.into(),
            config,
            seats,
            seat_by_player: BTreeMap::new(),
            pending_leaves: Vec::new(),
            hands_played: 0,
        }
    }

    pub fn max_seats(&self) -> u8 {
        self.config.max_seats
    }

    pub fn seated_count(&self) -> usize {
        self.seats.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_seat_empty(&self, index: SeatIndex) -> bool {
        self.seats
            .get(index as usize)
            .map(|s| s.is_none())
            .unwrap_or(true)
    }

    pub fn player(&self, seat: SeatIndex) -> Option<&PlayerAtTable> {
        self.seats.get(seat as usize).and_then(|s| s.as_ref())
    }

    pub fn player_mut(&mut self, seat: SeatIndex) -> Option<&mut PlayerAtTable> {
        self.seats.get_mut(seat as usize).and_then(|s| s.as_mut())
    }

    pub fn seat_of(&self, player_id: PlayerId) -> Option<SeatIndex> {
        self.seat_by_player.get(&player_id).copied()
    }

    pub fn player_by_id(&self, player_id: PlayerId) -> Option<&PlayerAtTable> {
        self.seat_of(player_id).and_then(|seat| self.player(seat))
    }

    pub fn player_by_id_mut(&mut self, player_id: PlayerId) -> Option<&mut PlayerAtTable> {
        let seat = self.seat_of(player_id)?;
        self.player_mut(seat)
    }

    /// Все занятые места по возрастанию.
    pub fn occupied_seats(&self) -> impl Iterator<Item = (SeatIndex, &PlayerAtTable)> {
        self.seats
            .iter()
            .enumerate()
            .filter_map(|(idx, s)| s.as_ref().map(|p| (idx as SeatIndex, p)))
    }

    /// Сумма всех фишек в стеках и текущих ставках.
    pub fn chips_in_play(&self) -> Chips {
        self.occupied_seats()
            .map(|(_, p)| p.stack + p.current_bet)
            .sum()
    }

    /// Посадить игрока на позицию 1..=max_seats.
    pub fn seat_player(
        &mut self,
        player_id: PlayerId,
        name: impl Into<String>,
        position: u8,
        stack: Chips,
    ) -> Result<SeatIndex, EngineError> {
        if position == 0 || position > self.max_seats() {
            return Err(EngineError::InvalidSeat(position));
        }
        if self.seat_by_player.contains_key(&player_id) {
            return Err(EngineError::AlreadySeated(player_id));
        }
        let seat = position - 1;
        if !self.is_seat_empty(seat) {
            return Err(EngineError::SeatTaken(position));
        }

        self.seats[seat as usize] = Some(PlayerAtTable::new(player_id, name, position, stack));
        self.seat_by_player.insert(player_id, seat);
        Ok(seat)
    }

    /// Освободить место игрока.
    pub fn remove_player(&mut self, player_id: PlayerId) -> Result<PlayerAtTable, EngineError> {
        let seat = self
            .seat_by_player
            .remove(&player_id)
            .ok_or(EngineError::PlayerNotFound(player_id))?;
        self.seats[seat as usize]
            .take()
            .ok_or(EngineError::PlayerNotFound(player_id))
    }

    /// Встать из-за стола, сохранив место.
    pub fn stand_up(&mut self, player_id: PlayerId) -> Result<(), EngineError> {
        let p = self
            .player_by_id_mut(player_id)
            .ok_or(EngineError::PlayerNotFound(player_id))?;
        p.seated = false;
        p.in_game = false;
        Ok(())
    }

    /// Вернуться за стол (карты получит со следующей раздачи).
    pub fn sit_down(&mut self, player_id: PlayerId) -> Result<(), EngineError> {
        let p = self
            .player_by_id_mut(player_id)
            .ok_or(EngineError::PlayerNotFound(player_id))?;
        p.seated = true;
        p.in_game = true;
        Ok(())
    }

    /// Докупить фишки. Сумма строго положительная.
    pub fn add_chips(&mut self, player_id: PlayerId, amount: Chips) -> Result<Chips, EngineError> {
        if amount.is_zero() {
            return Err(EngineError::InvalidChipAmount);
        }
        let p = self
            .player_by_id_mut(player_id)
            .ok_or(EngineError::PlayerNotFound(player_id))?;
        p.stack += amount;
        if p.seated {
            p.in_game = true;
        }
        Ok(p.stack)
    }
}
