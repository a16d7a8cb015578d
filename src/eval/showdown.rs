use std::collections::BTreeMap;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::domain::card::Card;
use crate::domain::chips::Chips;
use crate::domain::SeatIndex;
use crate::engine::pot::PotLedger;

use super::evaluator::{evaluate_best_hand, HandEvaluation};

/// Победители одного банка.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PotWinners {
    /// Индекс банка в `PotLedger::pots`.
    pub pot_index: usize,
    pub amount: Chips,
    /// Места победителей по возрастанию и их руки.
    pub winners: Vec<(SeatIndex, HandEvaluation)>,
}

/// Лучшие руки среди претендентов на банк.
///
/// Сначала остаются только игроки с максимальной категорией, затем они
/// сравниваются по рангам позиция за позицией. Если все позиции равны –
/// победителей несколько (банк делится).
pub fn determine_pot_winners(
    contenders: &[(SeatIndex, &[Card])],
    community: &[Card],
) -> Vec<(SeatIndex, HandEvaluation)> {
    let mut evaluated: Vec<(SeatIndex, HandEvaluation)> = contenders
        .iter()
        .filter_map(|(seat, hole)| evaluate_best_hand(hole, community).map(|e| (*seat, e)))
        .collect();

    let Some(top) = evaluated.iter().map(|(_, e)| e.category).max() else {
        return Vec::new();
    };
    evaluated.retain(|(_, e)| e.category == top);

    for pos in 0..5 {
        let Some(best) = evaluated.iter().map(|(_, e)| e.rank.ranks()[pos]).max() else {
            break;
        };
        evaluated.retain(|(_, e)| e.rank.ranks()[pos] == best);
        if evaluated.len() == 1 {
            break;
        }
    }

    evaluated.sort_by_key(|(seat, _)| *seat);
    evaluated
}

/// Пройти цепочку банков и найти победителей каждого.
///
/// `hands` – карманные карты игроков, которые дошли до вскрытия.
/// Банк без живых претендентов разыгрывается между всеми из `hands`.
pub fn determine_winners(
    pots: &PotLedger,
    hands: &BTreeMap<SeatIndex, Vec<Card>>,
    community: &[Card],
) -> Vec<PotWinners> {
    let mut result = Vec::new();

    for idx in pots.chain() {
        let pot = &pots.pots[idx];
        if pot.amount.is_zero() || pot.eligible.is_empty() {
            continue;
        }

        let mut contenders: Vec<(SeatIndex, &[Card])> = pot
            .eligible
            .iter()
            .filter_map(|seat| hands.get(seat).map(|h| (*seat, h.as_slice())))
            .collect();
        if contenders.is_empty() {
            warn!(
                "determine_winners: в банке #{idx} ({}) нет живых претендентов, разыгрываем между всеми",
                pot.amount
            );
            contenders = hands.iter().map(|(s, h)| (*s, h.as_slice())).collect();
        }

        let winners = determine_pot_winners(&contenders, community);
        if !winners.is_empty() {
            result.push(PotWinners {
                pot_index: idx,
                amount: pot.amount,
                winners,
            });
        }
    }

    result
}

/// Разделить банк между победителями.
///
/// `winners_in_order` – места в порядке выдачи нечётных фишек
/// (по часовой стрелке от дилера). Остаток раздаётся по одной фишке.
pub fn split_pot(amount: Chips, winners_in_order: &[SeatIndex]) -> Vec<(SeatIndex, Chips)> {
    let n = winners_in_order.len() as u64;
    if n == 0 {
        return Vec::new();
    }
    let share = amount.0 / n;
    let odd = amount.0 % n;

    winners_in_order
        .iter()
        .enumerate()
        .map(|(i, seat)| {
            let extra = if (i as u64) < odd { 1 } else { 0 };
            (*seat, Chips(share + extra))
        })
        .collect()
}
