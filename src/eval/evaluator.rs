use serde::{Deserialize, Serialize};

use crate::domain::card::{Card, Rank, Suit};
use crate::domain::hand::HandRank;

use super::hand_rank::HandCategory;
use super::lookup_tables::{detect_straight, rank_to_bit, straight_ranks, RankMask};

/// Результат оценки: категория, сами 5 карт и упакованная сила.
///
/// `best_cards` упорядочены так же, как они сравниваются: сначала группы
/// (каре, сет, пары) по убыванию размера и ранга, затем кикеры.
/// Для wheel порядок 5-4-3-2-A.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct HandEvaluation {
    pub category: HandCategory,
    pub best_cards: [Card; 5],
    pub rank: HandRank,
}

/// Лучшая 5-карточная рука из карманных карт и борда.
///
/// Работает для любых 5–7 карт; если карт меньше пяти – `None`.
pub fn evaluate_best_hand(hole: &[Card], board: &[Card]) -> Option<HandEvaluation> {
    let mut all_cards = Vec::with_capacity(hole.len() + board.len());
    all_cards.extend_from_slice(hole);
    all_cards.extend_from_slice(board);

    let n = all_cards.len();
    if n < 5 {
        return None;
    }

    let mut best: Option<HandEvaluation> = None;
    for a in 0..(n - 4) {
        for b in (a + 1)..(n - 3) {
            for c in (b + 1)..(n - 2) {
                for d in (c + 1)..(n - 1) {
                    for e in (d + 1)..n {
                        let five = [
                            all_cards[a],
                            all_cards[b],
                            all_cards[c],
                            all_cards[d],
                            all_cards[e],
                        ];
                        let eval = evaluate_five(five);
                        if best.map_or(true, |cur| eval.rank > cur.rank) {
                            best = Some(eval);
                        }
                    }
                }
            }
        }
    }
    best
}

/// Оценка строго 5-карточной комбинации.
pub fn evaluate_five(cards: [Card; 5]) -> HandEvaluation {
    let mut rank_counts = [0u8; 15];
    let mut rank_mask: RankMask = 0;
    for card in cards.iter() {
        rank_counts[card.rank.value() as usize] += 1;
        rank_mask |= rank_to_bit(card.rank);
    }

    let first_suit: Suit = cards[0].suit;
    let is_flush = cards.iter().all(|c| c.suit == first_suit);
    let straight_high = if rank_mask.count_ones() == 5 {
        detect_straight(rank_mask)
    } else {
        None
    };

    if let Some(high) = straight_high {
        let category = match (is_flush, high) {
            (true, Rank::Ace) => HandCategory::RoyalFlush,
            (true, _) => HandCategory::StraightFlush,
            (false, _) => HandCategory::Straight,
        };
        let ranks = straight_ranks(high);
        let mut best_cards = cards;
        best_cards.sort_by_key(|c| {
            ranks
                .iter()
                .position(|r| *r == c.rank)
                .unwrap_or(ranks.len())
        });
        return HandEvaluation {
            category,
            best_cards,
            rank: HandRank::from_category_and_ranks(category, ranks),
        };
    }

    // Группы: сначала по размеру, потом по рангу (оба по убыванию).
    let mut best_cards = cards;
    best_cards.sort_by(|a, b| {
        let ca = rank_counts[a.rank.value() as usize];
        let cb = rank_counts[b.rank.value() as usize];
        cb.cmp(&ca)
            .then_with(|| b.rank.cmp(&a.rank))
            .then_with(|| a.suit.cmp(&b.suit))
    });

    let mut pattern: Vec<u8> = rank_counts.iter().copied().filter(|&c| c > 0).collect();
    pattern.sort_unstable_by(|a, b| b.cmp(a));

    // Пять карт одной масти не содержат пар.
    let category = if is_flush {
        HandCategory::Flush
    } else {
        match pattern.as_slice() {
            [4, 1] => HandCategory::FourOfAKind,
            [3, 2] => HandCategory::FullHouse,
            [3, 1, 1] => HandCategory::ThreeOfAKind,
            [2, 2, 1] => HandCategory::TwoPair,
            [2, 1, 1, 1] => HandCategory::OnePair,
            _ => HandCategory::HighCard,
        }
    };

    let ranks: [Rank; 5] = core::array::from_fn(|i| best_cards[i].rank);
    HandEvaluation {
        category,
        best_cards,
        rank: HandRank::from_category_and_ranks(category, ranks),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::card::parse_cards;

    fn eval(hole: &str, board: &str) -> HandEvaluation {
        let hole = parse_cards(hole).unwrap();
        let board = parse_cards(board).unwrap();
        evaluate_best_hand(&hole, &board).unwrap()
    }

    #[test]
    fn picks_best_five_of_seven() {
        let e = eval("Ah Kh", "Qh Jh Th 2c 3d");
        assert_eq!(e.category, HandCategory::RoyalFlush);

        let e = eval("9s 9d", "9h 4c 4d Kc 2s");
        assert_eq!(e.category, HandCategory::FullHouse);
        assert_eq!(e.best_cards[0].rank, Rank::Nine);
        assert_eq!(e.best_cards[3].rank, Rank::Four);
    }

    #[test]
    fn wheel_is_five_high() {
        let e = eval("Ac 2d", "3h 4s 5c Kd Qh");
        assert_eq!(e.category, HandCategory::Straight);
        assert_eq!(e.best_cards[0].rank, Rank::Five);
        assert_eq!(e.best_cards[4].rank, Rank::Ace);

        let six_high = eval("6c 2d", "3h 4s 5c Kd Qh");
        assert!(six_high.rank > e.rank);
    }

    #[test]
    fn kickers_break_ties_within_category() {
        let a = eval("Ah Qd", "Ac 9s 7h 4d 2c");
        let b = eval("As Jd", "Ac 9s 7h 4d 2c");
        assert_eq!(a.category, HandCategory::OnePair);
        assert_eq!(b.category, HandCategory::OnePair);
        assert!(a.rank > b.rank);
    }

    #[test]
    fn too_few_cards_is_none() {
        let hole = parse_cards("Ah Kh").unwrap();
        let board = parse_cards("2c 3d").unwrap();
        assert!(evaluate_best_hand(&hole, &board).is_none());
    }
}
