use log::{debug, info};
use thiserror::Error;

use crate::domain::chips::Chips;
use crate::domain::table::{Table, TableConfig};
use crate::domain::{PlayerId, SeatIndex, TableId};
use crate::engine::betting::fold_out_of_turn;
use crate::engine::game_loop::{self, Game};
use crate::engine::hand_history::{EventSink, HandEvent, HandRecorder, NullSink};
use crate::engine::snapshot::GameSnapshot;
use crate::engine::{EngineError, PlayerAction, RandomSource};
use crate::infra::ids::IdGenerator;
use crate::infra::persistence::{PokerStorage, StorageError, StoredTable};

/// Ошибки уровня менеджера столов (над движком одной раздачи).
#[derive(Debug, Error)]
pub enum ManagerError {
    /// Стол с таким ID не найден.
    #[error("Стол {0} не найден")]
    TableNotFound(TableId),

    #[error("Некорректная конфигурация стола: {0}")]
    InvalidConfig(String),

    /// Проброшенная ошибка из движка (EngineError).
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Менеджер столов:
/// - загружает агрегат стола из хранилища, применяет одну команду
///   к копии и сохраняет её только при успехе;
/// - после сохранения рассылает события и пишет итог раздачи в журнал;
/// - возвращает снимок состояния.
///
/// Команды к одному столу вызывающий код обязан сериализовать.
pub struct TableManager<S, R, E = NullSink, H = NullSink> {
    storage: S,
    rng: R,
    ids: IdGenerator,
    sink: E,
    recorder: H,
}

impl<S: PokerStorage, R: RandomSource> TableManager<S, R> {
    /// Менеджер без рассылки событий и журнала.
    pub fn new(storage: S, rng: R) -> Self {
        Self::with_collaborators(storage, rng, NullSink, NullSink)
    }
}

impl<S, R, E, H> TableManager<S, R, E, H>
where
    S: PokerStorage,
    R: RandomSource,
    E: EventSink,
    H: HandRecorder,
{
    pub fn with_collaborators(storage: S, rng: R, sink: E, recorder: H) -> Self {
        let next_id = storage.table_ids().into_iter().max().map_or(1, |id| id + 1);
        Self {
            storage,
            rng,
            ids: IdGenerator::starting_at(next_id),
            sink,
            recorder,
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn sink(&self) -> &E {
        &self.sink
    }

    pub fn recorder(&self) -> &H {
        &self.recorder
    }

    /// Создать стол и сохранить его.
    pub fn create_table(
        &mut self,
        name: impl Into<String>,
        config: TableConfig,
    ) -> Result<TableId, ManagerError> {
        config.validate().map_err(ManagerError::InvalidConfig)?;
        let id = self.ids.next_table_id();
        let table = Table::new(id, name, config);
        self.storage.save_table(&StoredTable::new(table))?;
        info!("Создан стол {id}");
        Ok(id)
    }

    /// Загрузить стол вместе с раздачей.
    pub fn load(&self, table_id: TableId) -> Result<StoredTable, ManagerError> {
        self.storage
            .load_table(table_id)?
            .ok_or(ManagerError::TableNotFound(table_id))
    }

    /// Снимок состояния стола (`viewer` видит свои карты).
    pub fn snapshot(
        &self,
        table_id: TableId,
        viewer: Option<PlayerId>,
    ) -> Result<GameSnapshot, ManagerError> {
        let state = self.load(table_id)?;
        Ok(build_snapshot(&state, viewer))
    }

    /// Посадить игрока на позицию 1..=max_seats.
    /// Во время раздачи он получит карты только со следующей.
    pub fn seat_player(
        &mut self,
        table_id: TableId,
        player_id: PlayerId,
        name: impl Into<String>,
        position: u8,
        stack: Chips,
    ) -> Result<SeatIndex, ManagerError> {
        let name = name.into();
        self.mutate(table_id, |state, _| {
            Ok(state.table.seat_player(player_id, name, position, stack)?)
        })
    }

    /// Встать из-за стола, сохранив место. Карты текущей раздачи сбрасываются.
    pub fn stand_up(&mut self, table_id: TableId, player_id: PlayerId) -> Result<(), ManagerError> {
        self.mutate(table_id, |state, _| {
            drop_out_of_hand(state, player_id)?;
            Ok(state.table.stand_up(player_id)?)
        })
    }

    pub fn sit_down(&mut self, table_id: TableId, player_id: PlayerId) -> Result<(), ManagerError> {
        self.mutate(table_id, |state, _| Ok(state.table.sit_down(player_id)?))
    }

    /// Уйти из-за стола. Во время раздачи игрок сбрасывает карты,
    /// а место освобождается при старте следующей.
    pub fn leave_table(
        &mut self,
        table_id: TableId,
        player_id: PlayerId,
    ) -> Result<(), ManagerError> {
        self.mutate(table_id, |state, _| {
            if drop_out_of_hand(state, player_id)? {
                if !state.table.pending_leaves.contains(&player_id) {
                    state.table.pending_leaves.push(player_id);
                }
                debug!("leave_table: игрок {player_id} уйдёт после раздачи");
            } else {
                state.table.remove_player(player_id)?;
            }
            Ok(())
        })
    }

    /// Докупить фишки. Участнику идущей раздачи – только после неё.
    pub fn add_chips(
        &mut self,
        table_id: TableId,
        player_id: PlayerId,
        amount: Chips,
    ) -> Result<Chips, ManagerError> {
        self.mutate(table_id, |state, _| {
            if let Some(game) = &state.game {
                if game.in_progress() && game.players.contains(&player_id) {
                    return Err(EngineError::HandInProgress.into());
                }
            }
            Ok(state.table.add_chips(player_id, amount)?)
        })
    }

    /// Начать новую раздачу.
    pub fn create_hand(&mut self, table_id: TableId) -> Result<GameSnapshot, ManagerError> {
        let events = self.mutate(table_id, |state, rng| {
            let game = state.game.get_or_insert_with(|| Game::new(table_id));
            let is_first_hand = game.dealer_position.is_none();
            Ok(game_loop::start_hand(&mut state.table, game, rng, is_first_hand)?)
        })?;
        self.publish(table_id, &events);
        self.snapshot(table_id, None)
    }

    /// Применить действие игрока. Снимок – глазами этого игрока.
    pub fn apply_action(
        &mut self,
        table_id: TableId,
        action: PlayerAction,
    ) -> Result<GameSnapshot, ManagerError> {
        let player_id = action.player_id;
        let events = self.mutate(table_id, |state, _| {
            let game = state.game.as_mut().ok_or(EngineError::NoActiveHand)?;
            Ok(game_loop::apply_action(&mut state.table, game, action)?)
        })?;
        self.publish(table_id, &events);
        self.snapshot(table_id, Some(player_id))
    }

    /// Открыть следующую улицу или завершить раздачу.
    pub fn advance_phase(&mut self, table_id: TableId) -> Result<GameSnapshot, ManagerError> {
        let (events, record) = self.mutate(table_id, |state, _| {
            let game = state.game.as_mut().ok_or(EngineError::NoActiveHand)?;
            let events = game_loop::advance_phase(&mut state.table, game)?;
            Ok((events, game.hand_record(&state.table)))
        })?;
        self.publish(table_id, &events);
        if let Some(record) = record {
            self.recorder.record(record);
        }
        self.snapshot(table_id, None)
    }

    /// Загрузить → применить к копии → сохранить (только при успехе).
    fn mutate<T>(
        &mut self,
        table_id: TableId,
        f: impl FnOnce(&mut StoredTable, &mut R) -> Result<T, ManagerError>,
    ) -> Result<T, ManagerError> {
        let mut state = self.load(table_id)?;
        let out = f(&mut state, &mut self.rng)?;
        self.storage.save_table(&state)?;
        Ok(out)
    }

    fn publish(&mut self, table_id: TableId, events: &[HandEvent]) {
        for event in events {
            self.sink.publish(table_id, event);
        }
    }
}

fn build_snapshot(state: &StoredTable, viewer: Option<PlayerId>) -> GameSnapshot {
    let idle;
    let game = match &state.game {
        Some(game) => game,
        None => {
            idle = Game::new(state.table.id);
            &idle
        }
    };
    match viewer {
        Some(id) => GameSnapshot::for_viewer(&state.table, game, id),
        None => GameSnapshot::public(&state.table, game),
    }
}

/// Вывести игрока из идущей раздачи. `true`, если он в ней участвовал.
fn drop_out_of_hand(state: &mut StoredTable, player_id: PlayerId) -> Result<bool, ManagerError> {
    let seat = state
        .table
        .seat_of(player_id)
        .ok_or(EngineError::PlayerNotFound(player_id))?;
    match state.game.as_mut() {
        Some(game) if game.in_progress() && game.players.contains(&player_id) => {
            fold_out_of_turn(game, &mut state.table, seat);
            Ok(true)
        }
        _ => Ok(false),
    }
}
