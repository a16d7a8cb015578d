use std::sync::atomic::{AtomicU64, Ordering};

use crate::domain::{PlayerId, TableId};

/// Простая генерация ID на основе монотонных счётчиков.
#[derive(Debug)]
pub struct IdGenerator {
    table_counter: AtomicU64,
    player_counter: AtomicU64,
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdGenerator {
    /// Создать генератор с начальным значением 1 для всех сущностей.
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    /// Продолжить нумерацию, например после загрузки из хранилища.
    pub fn starting_at(first: u64) -> Self {
        Self {
            table_counter: AtomicU64::new(first),
            player_counter: AtomicU64::new(first),
        }
    }

    #[inline]
    pub fn next_table_id(&self) -> TableId {
        self.table_counter.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn next_player_id(&self) -> PlayerId {
        self.player_counter.fetch_add(1, Ordering::Relaxed)
    }
}
