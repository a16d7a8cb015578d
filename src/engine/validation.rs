use crate::domain::chips::Chips;
use crate::domain::hand::GamePhase;
use crate::domain::player::PokerPosition;
use crate::domain::table::Table;
use crate::domain::SeatIndex;
use crate::engine::actions::{PlayerAction, PlayerActionKind};
use crate::engine::errors::EngineError;
use crate::engine::game_loop::Game;

/// Проверенное действие: что и сколько применять.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ValidatedAction {
    pub seat: SeatIndex,
    pub kind: PlayerActionKind,
    /// Сколько фишек уйдёт со стека.
    pub pay: Chips,
    /// Call большого блайнда с опционом: раунд закрывается без доплаты.
    pub closes_round: bool,
}

/// Проверка, может ли игрок выполнить это действие при текущем состоянии раздачи.
///
/// Порядок проверок: фаза → раунд открыт → игрок за столом → его ход → само действие.
pub fn validate_action(
    game: &Game,
    table: &Table,
    action: &PlayerAction,
) -> Result<ValidatedAction, EngineError> {
    match game.phase {
        GamePhase::End => return Err(EngineError::HandFinished),
        phase if !phase.is_betting() => return Err(EngineError::NoActiveHand),
        _ => {}
    }
    if game.bets_matched {
        return Err(EngineError::BettingClosed);
    }

    let seat = table
        .seat_of(action.player_id)
        .ok_or(EngineError::PlayerNotFound(action.player_id))?;
    let player = table
        .player(seat)
        .ok_or(EngineError::PlayerNotFound(action.player_id))?;

    if game.turn_position != Some(seat) || player.folded {
        return Err(EngineError::OutOfTurn(action.player_id));
    }

    let to_call = diff_to_call(game, player.current_bet);
    let mut validated = ValidatedAction {
        seat,
        kind: action.kind,
        pay: Chips::ZERO,
        closes_round: false,
    };

    match action.kind {
        PlayerActionKind::Fold => {}

        PlayerActionKind::Check => {
            if !to_call.is_zero() {
                return Err(EngineError::CannotCheck { to_call });
            }
        }

        PlayerActionKind::Call => {
            let big_blind_option = game.blind_option
                && player.role == PokerPosition::BigBlind
                && to_call.is_zero();
            if big_blind_option {
                validated.closes_round = true;
            } else {
                validated.pay = to_call.min(player.stack);
            }
        }

        PlayerActionKind::Bet(amount) => {
            let invalid = EngineError::InvalidBet {
                amount: i64::try_from(amount.0).unwrap_or(i64::MAX),
                stack: player.stack,
            };
            if amount.is_zero() || amount > player.stack {
                return Err(invalid);
            }
            // Меньше, чем нужно для колла, можно поставить только олл-ином.
            if amount < to_call && amount != player.stack {
                return Err(invalid);
            }
            validated.pay = amount;
        }
    }

    Ok(validated)
}

/// Сколько фишек нужно добавить игроку, чтобы уравнять текущую ставку.
fn diff_to_call(game: &Game, player_bet: Chips) -> Chips {
    game.current_bet.saturating_sub(player_bet)
}
