//! Очередь хода и раунды ставок.
//!
//! Все функции работают над парой (`Game`, `Table`): игра хранит позиции,
//! стол – самих игроков.

use log::debug;

use crate::domain::chips::Chips;
use crate::domain::player::PokerPosition;
use crate::domain::table::Table;
use crate::domain::SeatIndex;
use crate::engine::errors::EngineError;
use crate::engine::game_loop::Game;
use crate::engine::positions::{count_dealable, find_next_active_position, live_seats};
use crate::engine::pot::RoundContribution;

/// Поставить блайнды и передать ход первому после большого блайнда.
///
/// Хедз-ап: большой блайнд ставит дилер, малый – второй игрок.
pub fn post_blinds(game: &mut Game, table: &mut Table) -> Result<(), EngineError> {
    let dealer = game.dealer_position.ok_or(EngineError::NoActiveHand)?;
    let heads_up = count_dealable(table) == 2;

    let sb = find_next_active_position(table, dealer, true, None)
        .ok_or(EngineError::InsufficientPlayers { found: 1 })?;
    let bb_role = if heads_up {
        dealer
    } else {
        find_next_active_position(table, sb, true, None)
            .ok_or(EngineError::InsufficientPlayers { found: 2 })?
    };

    if let Some(p) = table.player_mut(dealer) {
        p.is_dealer = true;
        p.role = PokerPosition::Dealer;
    }
    if let Some(p) = table.player_mut(sb) {
        p.role = PokerPosition::SmallBlind;
    }
    if let Some(p) = table.player_mut(bb_role) {
        p.role = PokerPosition::BigBlind;
    }

    game.end_position = Some(dealer);
    game.turn_position = Some(sb);
    game.blind_option = true;

    let stakes = table.config.stakes.clone();
    let sb_amount = blind_amount(table, sb, stakes.small_blind);
    place_bet(game, table, sb, sb_amount);

    let bb = find_next_active_position(table, sb, false, None).unwrap_or(bb_role);
    let bb_amount = blind_amount(table, bb, stakes.big_blind);
    place_bet(game, table, bb, bb_amount);

    debug!(
        "post_blinds: dealer={} sb={} ({}) bb={} ({})",
        dealer, sb, sb_amount, bb, bb_amount
    );

    match find_next_active_position(table, bb, false, None) {
        Some(next) => game.turn_position = Some(next),
        None => end_round(game, table),
    }
    Ok(())
}

fn blind_amount(table: &Table, seat: SeatIndex, blind: Chips) -> Chips {
    table
        .player(seat)
        .map(|p| p.stack.min(blind))
        .unwrap_or(Chips::ZERO)
}

/// Перенести фишки игрока в ставку раунда.
///
/// Если новая ставка игрока больше текущей – он становится агрессором:
/// раунд закроется, когда очередь вернётся к нему.
pub fn place_bet(game: &mut Game, table: &mut Table, seat: SeatIndex, amount: Chips) {
    let Some(player) = table.player_mut(seat) else {
        return;
    };
    let amount = amount.min(player.stack);
    let total = player.current_bet + amount;
    if total > game.current_bet {
        game.current_bet = total;
        game.end_position = Some(seat);
    }
    game.round_pot += amount;
    player.make_bet(amount);
}

/// Передать ход следующему или закрыть раунд.
pub fn advance_turn(game: &mut Game, table: &mut Table) {
    if live_seats(table).len() <= 1 {
        end_round(game, table);
        return;
    }

    let Some(turn) = game.turn_position else {
        end_round(game, table);
        return;
    };

    let is_big_blind = |seat: SeatIndex| {
        table
            .player(seat)
            .is_some_and(|p| p.role == PokerPosition::BigBlind)
    };
    // Опцион есть только у большого блайнда, который ещё в раздаче и может ставить.
    let has_option = |seat: SeatIndex| {
        table
            .player(seat)
            .is_some_and(|p| is_big_blind(seat) && !p.folded && !p.stack.is_zero())
    };

    let next = find_next_active_position(table, turn, false, game.end_position);

    // Большой блайнд сходил на опционе (check, fold или уход без рейза).
    let big_blind_ended =
        game.end_position == Some(turn) && game.blind_option && is_big_blind(turn);

    let reached_aggressor = match next {
        Some(n) => game.end_position == Some(n) && !(game.blind_option && has_option(n)),
        None => false,
    };

    match next {
        Some(n) if n != turn && !big_blind_ended && !reached_aggressor => {
            game.turn_position = Some(n);
        }
        _ => end_round(game, table),
    }
}

/// Закрыть раунд ставок: сложить ставки в банк(и) и обнулить их.
pub fn end_round(game: &mut Game, table: &mut Table) {
    game.bets_matched = true;
    game.turn_position = None;
    game.end_position = None;
    // Опцион большого блайнда есть только в первом раунде.
    game.blind_option = false;

    let contributors: Vec<RoundContribution> = table
        .occupied_seats()
        .filter(|(_, p)| p.has_cards() || !p.current_bet.is_zero())
        .map(|(seat, p)| RoundContribution {
            seat,
            bet: p.current_bet,
            all_in: p.is_all_in(),
            live: p.is_active(false) && p.has_cards(),
        })
        .collect();

    game.pots.add_round_to_pot(game.round_pot, &contributors);

    for seat in table.seats.iter_mut().flatten() {
        seat.current_bet = Chips::ZERO;
    }
    game.current_bet = Chips::ZERO;
    game.round_pot = Chips::ZERO;

    debug!(
        "end_round: банк {} (сайд-потов: {})",
        game.pots.total(),
        game.pots.side_pot_amounts().len()
    );
}

/// Сбросить карты игрока вне очереди (уход из-за стола во время раздачи).
pub fn fold_out_of_turn(game: &mut Game, table: &mut Table, seat: SeatIndex) {
    if let Some(p) = table.player_mut(seat) {
        p.folded = true;
    }
    if game.bets_matched {
        return;
    }
    if game.turn_position == Some(seat) {
        advance_turn(game, table);
    } else if live_seats(table).len() <= 1 {
        end_round(game, table);
    }
}
