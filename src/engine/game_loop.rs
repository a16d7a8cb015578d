use std::collections::BTreeMap;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::domain::card::Card;
use crate::domain::chips::Chips;
use crate::domain::deck::Deck;
use crate::domain::hand::GamePhase;
use crate::domain::table::Table;
use crate::domain::{PlayerId, SeatIndex, TableId};
use crate::engine::actions::{PlayerAction, PlayerActionKind};
use crate::engine::betting::{advance_turn, end_round, place_bet, post_blinds};
use crate::engine::errors::EngineError;
use crate::engine::hand_history::{HandEvent, HandEventKind, HandHistory, HandRecord};
use crate::engine::positions::{
    collect_dealable_seats_after, count_bettors, find_next_active_position, first_dealable_seat,
    live_seats,
};
use crate::engine::pot::PotLedger;
use crate::engine::validation::{validate_action, ValidatedAction};
use crate::engine::RandomSource;
use crate::eval::{determine_winners, split_pot, HandEvaluation};

/// Выплата одному победителю банка.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct WinnerShare {
    pub seat: SeatIndex,
    pub player_id: PlayerId,
    pub player_name: String,
    pub amount: Chips,
    /// Рука победителя; `None`, если банк забран без вскрытия.
    pub hand: Option<HandEvaluation>,
}

/// Итог розыгрыша одного банка.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PotAward {
    pub pot_index: usize,
    pub amount: Chips,
    pub shares: Vec<WinnerShare>,
}

/// Состояние одной раздачи за столом.
///
/// Игра не владеет игроками: позиции – индексы мест в `Table::seats`.
/// Между раздачами объект не пересоздаётся, а сбрасывается (`start_hand`).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Game {
    pub table_id: TableId,
    /// Номер раздачи за столом (с 1).
    pub hand_number: u64,
    pub phase: GamePhase,

    pub dealer_position: Option<SeatIndex>,
    pub turn_position: Option<SeatIndex>,
    /// Агрессор: раунд закрывается, когда очередь возвращается к нему.
    pub end_position: Option<SeatIndex>,

    pub current_bet: Chips,
    /// Ставки текущего раунда, ещё не разложенные по банкам.
    pub round_pot: Chips,
    pub blind_option: bool,
    pub bets_matched: bool,

    /// Участники раздачи по порядку мест.
    pub players: Vec<PlayerId>,
    pub community_cards: Vec<Card>,
    pub deck: Deck,
    pub pots: PotLedger,
    pub winners: Vec<PotAward>,
    pub history: HandHistory,

    /// Фишки на столе в начале раздачи (стеки участников).
    pub chips_at_start: Chips,
}

impl Game {
    pub fn new(table_id: TableId) -> Self {
        Self {
            table_id,
            hand_number: 0,
            phase: GamePhase::NotStarted,
            dealer_position: None,
            turn_position: None,
            end_position: None,
            current_bet: Chips::ZERO,
            round_pot: Chips::ZERO,
            blind_option: false,
            bets_matched: false,
            players: Vec::new(),
            community_cards: Vec::new(),
            deck: Deck::standard_52(),
            pots: PotLedger::new(),
            winners: Vec::new(),
            history: HandHistory::new(),
            chips_at_start: Chips::ZERO,
        }
    }

    /// Идёт ли раздача прямо сейчас.
    pub fn in_progress(&self) -> bool {
        self.phase == GamePhase::Start || self.phase.is_betting()
    }

    /// Сбросить всё, что относится к прошлой раздаче. Кнопка и номер остаются.
    fn reset_for_new_hand(&mut self) {
        self.phase = GamePhase::Start;
        self.turn_position = None;
        self.end_position = None;
        self.current_bet = Chips::ZERO;
        self.round_pot = Chips::ZERO;
        self.blind_option = true;
        self.bets_matched = false;
        self.players.clear();
        self.community_cards.clear();
        self.pots.reset();
        self.winners.clear();
        self.history.clear();
    }

    /// Фишки участников раздачи: стеки + ставки раунда + банки (пока не выплачены).
    pub fn chips_accounted(&self, table: &Table) -> Chips {
        let on_table: Chips = self
            .players
            .iter()
            .filter_map(|id| table.player_by_id(*id))
            .map(|p| p.stack + p.current_bet)
            .sum();
        if self.phase == GamePhase::End {
            on_table
        } else {
            on_table + self.pots.total()
        }
    }

    /// Запись для журнала раздач; есть только после завершения.
    pub fn hand_record(&self, table: &Table) -> Option<HandRecord> {
        if self.phase != GamePhase::End {
            return None;
        }
        let hole_cards = self
            .players
            .iter()
            .filter_map(|id| table.player_by_id(*id))
            .filter(|p| p.has_cards())
            .map(|p| (p.player_id, p.hole_cards.clone()))
            .collect();
        let payouts = self
            .winners
            .iter()
            .flat_map(|award| award.shares.iter())
            .map(|s| (s.seat, s.player_id, s.amount))
            .collect();

        Some(HandRecord {
            table_id: self.table_id,
            hand_number: self.hand_number,
            community_cards: self.community_cards.clone(),
            hole_cards,
            payouts,
            history: self.history.clone(),
        })
    }
}

/// Старт новой раздачи:
/// - убирает ушедших игроков и сбрасывает поля прошлой раздачи;
/// - двигает кнопку (или выбирает её для первой раздачи);
/// - тасует колоду и раздаёт по две карты, по одной за проход;
/// - ставит блайнды и открывает префлоп.
///
/// Возвращает события, появившиеся в этом вызове.
pub fn start_hand<R: RandomSource>(
    table: &mut Table,
    game: &mut Game,
    rng: &mut R,
    is_first_hand: bool,
) -> Result<Vec<HandEvent>, EngineError> {
    if game.in_progress() {
        return Err(EngineError::HandInProgress);
    }

    let found = table
        .occupied_seats()
        .filter(|(_, p)| p.can_be_dealt_in() && !table.pending_leaves.contains(&p.player_id))
        .count();
    if found < 2 {
        return Err(EngineError::InsufficientPlayers { found });
    }

    for player_id in std::mem::take(&mut table.pending_leaves) {
        if table.remove_player(player_id).is_ok() {
            info!("start_hand: игрок {player_id} покинул стол {}", table.id);
        }
    }
    for player in table.seats.iter_mut().flatten() {
        player.reset_for_new_hand();
    }
    game.reset_for_new_hand();

    let dealer = match game.dealer_position {
        Some(prev) if !is_first_hand => find_next_active_position(table, prev, true, None),
        _ => first_dealable_seat(table),
    }
    .ok_or(EngineError::InsufficientPlayers { found })?;
    game.dealer_position = Some(dealer);

    table.hands_played += 1;
    game.hand_number = table.hands_played;

    let order = collect_dealable_seats_after(table, dealer);
    game.players = table
        .occupied_seats()
        .filter(|(seat, _)| order.contains(seat))
        .map(|(_, p)| p.player_id)
        .collect();
    game.chips_at_start = game.chips_accounted(table);

    game.history.push(HandEventKind::HandStarted {
        hand_number: game.hand_number,
        player_count: order.len(),
    });

    game.deck.shuffle(rng);
    for _pass in 0..2 {
        for &seat in &order {
            let card = game.deck.deal_one()?;
            if let Some(p) = table.player_mut(seat) {
                p.hole_cards.push(card);
            }
        }
    }
    for &seat in &order {
        if let Some(p) = table.player(seat) {
            game.history.push(HandEventKind::PlayerCardsDealt {
                player_id: p.player_id,
                cards: p.hole_cards.clone(),
            });
        }
    }

    post_blinds(game, table)?;
    game.phase = GamePhase::Preflop;

    info!(
        "Стол {}: раздача #{} началась, игроков {}, дилер на месте {}",
        table.id,
        game.hand_number,
        order.len(),
        dealer
    );

    Ok(game.history.since(0))
}

/// Применить действие игрока (validate-then-apply).
///
/// При ошибке ни стол, ни игра не меняются.
pub fn apply_action(
    table: &mut Table,
    game: &mut Game,
    action: PlayerAction,
) -> Result<Vec<HandEvent>, EngineError> {
    let ValidatedAction {
        seat,
        kind,
        pay,
        closes_round,
    } = validate_action(game, table, &action)?;

    let from = game.history.len();
    let player_name = table
        .player(seat)
        .map(|p| p.name.clone())
        .unwrap_or_default();

    match kind {
        PlayerActionKind::Bet(_) => {
            // Опцион большого блайнда снимает только рейз.
            let raises = table
                .player(seat)
                .is_some_and(|p| p.current_bet + pay > game.current_bet);
            if raises {
                game.blind_option = false;
            }
            place_bet(game, table, seat, pay);
        }
        PlayerActionKind::Call if closes_round => {}
        PlayerActionKind::Call => place_bet(game, table, seat, pay),
        PlayerActionKind::Check => {}
        PlayerActionKind::Fold => {
            if let Some(p) = table.player_mut(seat) {
                p.folded = true;
            }
        }
    }

    game.history.push(HandEventKind::PlayerActed {
        player_name,
        action: kind,
        amount: pay,
    });
    debug!("apply_action: место {seat}: {kind} (внесено {pay})");

    if closes_round {
        game.blind_option = false;
        end_round(game, table);
    } else {
        advance_turn(game, table);
    }

    Ok(game.history.since(from))
}

/// Перейти к следующей улице.
///
/// Флоп: сжечь 1 и открыть 3; тёрн и ривер: сжечь 1 и открыть 1.
/// С ривера – вскрытие и выплата. Если в раздаче остался один игрок,
/// раздача сразу завершается, а банк уходит ему без вскрытия.
pub fn advance_phase(table: &mut Table, game: &mut Game) -> Result<Vec<HandEvent>, EngineError> {
    match game.phase {
        GamePhase::NotStarted | GamePhase::Start => return Err(EngineError::NoActiveHand),
        GamePhase::End => return Err(EngineError::HandFinished),
        _ => {}
    }
    if !game.bets_matched {
        return Err(EngineError::BettingNotFinished);
    }

    let from = game.history.len();
    let live = live_seats(table);

    if live.len() <= 1 {
        finish_uncontested(table, game, &live);
    } else if game.phase == GamePhase::River {
        showdown(table, game, &live);
    } else {
        let next = game.phase.next();
        game.deck.burn()?;
        let cards = game.deck.deal_hand(next.cards_revealed())?;
        game.community_cards.extend_from_slice(&cards);
        game.phase = next;
        game.history.push(HandEventKind::CommunityCardsRevealed { phase: next, cards });

        game.current_bet = Chips::ZERO;
        if count_bettors(table) <= 1 {
            // Ставить больше некому: борд докладывается без ставок.
            game.turn_position = None;
            game.end_position = None;
            game.bets_matched = true;
        } else {
            let first = game
                .dealer_position
                .and_then(|d| find_next_active_position(table, d, false, None));
            game.turn_position = first;
            game.end_position = first;
            game.bets_matched = false;
        }
        debug!("advance_phase: стол {} → {}", table.id, next);
    }

    Ok(game.history.since(from))
}

/// Вскрытие на ривере.
fn showdown(table: &mut Table, game: &mut Game, live: &[SeatIndex]) {
    let hands: BTreeMap<SeatIndex, Vec<Card>> = live
        .iter()
        .filter_map(|seat| table.player(*seat).map(|p| (*seat, p.hole_cards.clone())))
        .collect();

    let results = determine_winners(&game.pots, &hands, &game.community_cards);
    for result in results {
        let winners = result
            .winners
            .into_iter()
            .map(|(seat, eval)| (seat, Some(eval)))
            .collect();
        award_pot(table, game, result.pot_index, result.amount, winners);
    }

    finish_hand(table, game);
}

/// Все, кроме одного, сбросили карты: банки уходят ему без вскрытия.
fn finish_uncontested(table: &mut Table, game: &mut Game, live: &[SeatIndex]) {
    match live.first() {
        Some(&winner) => {
            for idx in game.pots.chain() {
                let amount = game.pots.pots[idx].amount;
                if !amount.is_zero() {
                    award_pot(table, game, idx, amount, vec![(winner, None)]);
                }
            }
        }
        None => warn!(
            "finish_uncontested: на столе {} не осталось игроков в раздаче, банк {} не выплачен",
            table.id,
            game.pots.total()
        ),
    }
    finish_hand(table, game);
}

/// Разделить банк между победителями. Нечётные фишки – по одной,
/// начиная с первого победителя по часовой стрелке от дилера.
fn award_pot(
    table: &mut Table,
    game: &mut Game,
    pot_index: usize,
    amount: Chips,
    winners: Vec<(SeatIndex, Option<HandEvaluation>)>,
) {
    let max = table.max_seats().max(1) as usize;
    let dealer = game.dealer_position.unwrap_or(0) as usize;
    let mut ordered = winners;
    ordered.sort_by_key(|(seat, _)| (*seat as usize + max - dealer - 1) % max);

    let seats: Vec<SeatIndex> = ordered.iter().map(|(s, _)| *s).collect();
    let mut shares = Vec::with_capacity(ordered.len());

    for ((seat, chips), (_, hand)) in split_pot(amount, &seats).into_iter().zip(ordered) {
        let Some(player) = table.player_mut(seat) else {
            warn!("award_pot: место {seat} пустое, доля {chips} пропущена");
            continue;
        };
        player.stack += chips;

        let cards = match &hand {
            Some(eval) => eval.best_cards.to_vec(),
            None => player.hole_cards.clone(),
        };
        game.history.push(HandEventKind::PotWinner {
            player_name: player.name.clone(),
            hand_type: hand.map(|h| h.category),
            amount: chips,
            cards,
        });
        shares.push(WinnerShare {
            seat,
            player_id: player.player_id,
            player_name: player.name.clone(),
            amount: chips,
            hand,
        });
    }

    game.winners.push(PotAward {
        pot_index,
        amount,
        shares,
    });
}

fn finish_hand(table: &mut Table, game: &mut Game) {
    game.phase = GamePhase::End;
    game.turn_position = None;
    game.end_position = None;
    game.bets_matched = true;
    game.history.push(HandEventKind::HandEnded {
        hand_number: game.hand_number,
    });

    let accounted = game.chips_accounted(table);
    if accounted != game.chips_at_start {
        warn!(
            "finish_hand: стол {} раздача #{}: фишек {} вместо {}",
            table.id, game.hand_number, accounted, game.chips_at_start
        );
    }
    info!(
        "Стол {}: раздача #{} завершена, банков разыграно {}",
        table.id,
        game.hand_number,
        game.winners.len()
    );
}
