use core::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::card::Rank;
use crate::domain::hand::HandRank;

/// Категория покерной руки по силе.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HandCategory {
    HighCard = 0,
    OnePair = 1,
    TwoPair = 2,
    ThreeOfAKind = 3,
    Straight = 4,
    Flush = 5,
    FullHouse = 6,
    FourOfAKind = 7,
    StraightFlush = 8,
    /// Стрит-флеш от туза.
    RoyalFlush = 9,
}

impl HandCategory {
    pub const ALL: [HandCategory; 10] = [
        HandCategory::HighCard,
        HandCategory::OnePair,
        HandCategory::TwoPair,
        HandCategory::ThreeOfAKind,
        HandCategory::Straight,
        HandCategory::Flush,
        HandCategory::FullHouse,
        HandCategory::FourOfAKind,
        HandCategory::StraightFlush,
        HandCategory::RoyalFlush,
    ];

    fn from_id(id: u8) -> HandCategory {
        HandCategory::ALL
            .get(id as usize)
            .copied()
            .unwrap_or(HandCategory::HighCard)
    }
}

impl fmt::Display for HandCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            HandCategory::HighCard => "High card",
            HandCategory::OnePair => "One pair",
            HandCategory::TwoPair => "Two pair",
            HandCategory::ThreeOfAKind => "Three of a kind",
            HandCategory::Straight => "Straight",
            HandCategory::Flush => "Flush",
            HandCategory::FullHouse => "Full house",
            HandCategory::FourOfAKind => "Four of a kind",
            HandCategory::StraightFlush => "Straight flush",
            HandCategory::RoyalFlush => "Royal flush",
        };
        f.write_str(s)
    }
}

impl HandRank {
    /// Собрать HandRank из категории и 5 рангов (в порядке сравнения).
    ///
    /// Схема кодирования (u32):
    ///   [категория:4 бита][r0:4][r1:4][r2:4][r3:4][r4:4]
    /// Rank: 2..14 (2..A) влазит в 4 бита.
    pub fn from_category_and_ranks(category: HandCategory, ranks: [Rank; 5]) -> Self {
        let mut value = ((category as u32) & 0x0F) << 20;
        for (i, rank) in ranks.iter().enumerate() {
            value |= (rank.value() as u32) << (16 - 4 * i);
        }
        HandRank(value)
    }

    /// Вытащить категорию из HandRank.
    pub fn category(&self) -> HandCategory {
        HandCategory::from_id(((self.0 >> 20) & 0x0F) as u8)
    }

    /// Достать 5 рангов (в порядке сравнения) из HandRank.
    pub fn ranks(&self) -> [Rank; 5] {
        let nibble = |i: usize| ((self.0 >> (16 - 4 * i)) & 0x0F) as u8;
        // В корректном HandRank каждый ниббл – 2..=14.
        core::array::from_fn(|i| Rank::from_value(nibble(i)).unwrap_or(Rank::Two))
    }
}

/// Человеческое описание руки: категория + старшая карта комбинации.
pub fn describe_hand(rank: HandRank) -> String {
    let top = rank.ranks()[0];
    match rank.category() {
        HandCategory::RoyalFlush => HandCategory::RoyalFlush.to_string(),
        cat => format!("{cat}, {top:?}"),
    }
}
