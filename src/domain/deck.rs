use serde::{Deserialize, Serialize};

use crate::domain::card::{Card, Rank, Suit};
use crate::engine::errors::EngineError;
use crate::engine::RandomSource;

/// Колода карт.
///
/// `cards` – живая часть (верх колоды = конец вектора),
/// `removed` – всё, что уже сдано (включая сожжённые карты).
/// Инвариант: две части не пересекаются и вместе всегда дают 52 карты.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Deck {
    pub cards: Vec<Card>,
    pub removed: Vec<Card>,
}

impl Default for Deck {
    fn default() -> Self {
        Self::standard_52()
    }
}

impl Deck {
    /// Стандартная 52-карточная колода в порядке:
    /// Hearts 2..A, Diamonds 2..A, Clubs 2..A, Spades 2..A.
    pub fn standard_52() -> Self {
        let mut cards = Vec::with_capacity(52);
        for suit in Suit::ALL {
            for rank in Rank::ALL {
                cards.push(Card::new(rank, suit));
            }
        }
        Deck {
            cards,
            removed: Vec::new(),
        }
    }

    /// Колода с заранее заданным порядком (для тестов и реплея).
    ///
    /// `top_first[0]` будет сдана первой; остальные карты стандартной колоды
    /// лежат под ними в стандартном порядке.
    pub fn from_cards(top_first: &[Card]) -> Self {
        let mut deck = Self::standard_52();
        deck.cards.retain(|c| !top_first.contains(c));
        deck.cards.extend(top_first.iter().rev().copied());
        deck
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Вернуть сданные карты в колоду и перемешать всё за один проход.
    pub fn shuffle<R: RandomSource>(&mut self, rng: &mut R) {
        self.cards.append(&mut self.removed);
        rng.shuffle(&mut self.cards);
    }

    /// Взять одну карту сверху колоды.
    pub fn deal_one(&mut self) -> Result<Card, EngineError> {
        let card = self.cards.pop().ok_or(EngineError::EmptyDeck)?;
        self.removed.push(card);
        Ok(card)
    }

    /// Взять n карт сверху.
    pub fn deal_hand(&mut self, n: usize) -> Result<Vec<Card>, EngineError> {
        if self.cards.len() < n {
            return Err(EngineError::EmptyDeck);
        }
        (0..n).map(|_| self.deal_one()).collect()
    }

    /// Сжечь карту перед открытием борда.
    pub fn burn(&mut self) -> Result<(), EngineError> {
        self.deal_one().map(|_| ())
    }
}
