use serde::{Deserialize, Serialize};

use crate::domain::card::Card;
use crate::domain::chips::Chips;
use crate::domain::hand::GamePhase;
use crate::domain::player::PokerPosition;
use crate::domain::table::Table;
use crate::domain::{PlayerId, SeatIndex, TableId};
use crate::engine::game_loop::{Game, PotAward};

/// Игрок глазами конкретного зрителя.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerView {
    pub player_id: PlayerId,
    pub name: String,
    pub position: u8,
    pub stack: Chips,
    pub current_bet: Chips,
    pub folded: bool,
    pub in_game: bool,
    pub seated: bool,
    pub role: PokerPosition,
    pub is_dealer: bool,
    /// Есть ли у игрока карты (даже если они скрыты).
    pub has_cards: bool,
    /// Открытые карты: свои – всегда, чужие – только после вскрытия.
    pub hole_cards: Option<Vec<Card>>,
}

/// Неизменяемая проекция состояния стола для внешних потребителей.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameSnapshot {
    pub table_id: TableId,
    pub hand_number: u64,
    pub phase: GamePhase,
    pub community_cards: Vec<Card>,
    pub main_pot: Chips,
    pub side_pots: Vec<Chips>,
    pub current_bet: Chips,
    pub round_pot: Chips,
    pub bets_matched: bool,
    pub dealer_position: Option<SeatIndex>,
    pub turn_position: Option<SeatIndex>,
    pub turn_player: Option<PlayerId>,
    pub players: Vec<PlayerView>,
    /// Победители по банкам (после завершения раздачи).
    pub winners: Vec<PotAward>,
}

impl GameSnapshot {
    /// Публичный снимок: чужих карт не видно никому.
    pub fn public(table: &Table, game: &Game) -> Self {
        Self::build(table, game, None)
    }

    /// Снимок для конкретного игрока: его карты открыты.
    pub fn for_viewer(table: &Table, game: &Game, viewer: PlayerId) -> Self {
        Self::build(table, game, Some(viewer))
    }

    fn build(table: &Table, game: &Game, viewer: Option<PlayerId>) -> Self {
        // Карты открываются только после настоящего вскрытия, а не при заборе банка без него.
        let showdown = game.phase == GamePhase::End
            && game
                .winners
                .iter()
                .flat_map(|award| &award.shares)
                .any(|share| share.hand.is_some());

        let players = table
            .occupied_seats()
            .map(|(_, p)| {
                let visible = viewer == Some(p.player_id) || (showdown && !p.folded);
                PlayerView {
                    player_id: p.player_id,
                    name: p.name.clone(),
                    position: p.position,
                    stack: p.stack,
                    current_bet: p.current_bet,
                    folded: p.folded,
                    in_game: p.in_game,
                    seated: p.seated,
                    role: p.role,
                    is_dealer: p.is_dealer,
                    has_cards: p.has_cards(),
                    hole_cards: (visible && p.has_cards()).then(|| p.hole_cards.clone()),
                }
            })
            .collect();

        Self {
            table_id: table.id,
            hand_number: game.hand_number,
            phase: game.phase,
            community_cards: game.community_cards.clone(),
            main_pot: game.pots.main_pot().amount,
            side_pots: game.pots.side_pot_amounts(),
            current_bet: game.current_bet,
            round_pot: game.round_pot,
            bets_matched: game.bets_matched,
            dealer_position: game.dealer_position,
            turn_position: game.turn_position,
            turn_player: game
                .turn_position
                .and_then(|seat| table.player(seat))
                .map(|p| p.player_id),
            players,
            winners: game.winners.clone(),
        }
    }

    /// Сумма всех банков.
    pub fn total_pot(&self) -> Chips {
        self.main_pot + self.side_pots.iter().copied().sum::<Chips>()
    }
}
