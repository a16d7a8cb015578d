use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::engine::RandomSource;

/// Системный RNG: `thread_rng` (ChaCha, криптостойкий).
#[derive(Clone, Debug, Default)]
pub struct SystemRng;

impl RandomSource for SystemRng {
    fn shuffle<T>(&mut self, slice: &mut [T]) {
        slice.shuffle(&mut rand::thread_rng());
    }
}

/// Детерминированный RNG для тестов и реплея.
/// Позволяет воспроизводить одни и те же раздачи при одинаковом seed.
#[derive(Clone, Debug)]
pub struct DeterministicRng {
    inner: StdRng,
}

impl DeterministicRng {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            inner: StdRng::seed_from_u64(seed),
        }
    }
}

impl RandomSource for DeterministicRng {
    fn shuffle<T>(&mut self, slice: &mut [T]) {
        slice.shuffle(&mut self.inner);
    }
}

/// Ничего не перемешивает: колода остаётся в заданном порядке.
/// Нужен, чтобы раздать заранее известные карты (`Deck::from_cards`).
#[derive(Clone, Copy, Debug, Default)]
pub struct NoShuffle;

impl RandomSource for NoShuffle {
    fn shuffle<T>(&mut self, _slice: &mut [T]) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Deck;

    #[test]
    fn same_seed_same_order() {
        let mut a = Deck::standard_52();
        let mut b = Deck::standard_52();
        a.shuffle(&mut DeterministicRng::from_seed(42));
        b.shuffle(&mut DeterministicRng::from_seed(42));
        assert_eq!(a.cards, b.cards);
        assert_ne!(a.cards, Deck::standard_52().cards);
    }
}
