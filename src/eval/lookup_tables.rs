use crate::domain::card::Rank;

/// Битовая маска рангов: бит 0 = двойка, бит 12 = туз.
pub type RankMask = u16;

/// Маски всех стритов, от broadway (индекс 0) до wheel (индекс 9).
pub const STRAIGHT_MASKS: [RankMask; 10] = build_straight_masks();

/// Старшая карта стрита для каждой маски в `STRAIGHT_MASKS`.
const STRAIGHT_HIGHS: [Rank; 10] = [
    Rank::Ace,
    Rank::King,
    Rank::Queen,
    Rank::Jack,
    Rank::Ten,
    Rank::Nine,
    Rank::Eight,
    Rank::Seven,
    Rank::Six,
    Rank::Five,
];

const fn build_straight_masks() -> [RankMask; 10] {
    let mut masks = [0u16; 10];
    let mut i = 0;
    while i < 9 {
        // Старшая карта: A (бит 12) .. 6 (бит 4); пять бит подряд вниз.
        let high_bit = 12 - i;
        masks[i] = 0b1_1111 << (high_bit - 4);
        i += 1;
    }
    // Wheel: A,2,3,4,5.
    masks[9] = (1 << 12) | 0b1111;
    masks
}

pub fn rank_to_bit(rank: Rank) -> RankMask {
    1u16 << (rank.value() - 2)
}

pub fn mask_of(ranks: impl IntoIterator<Item = Rank>) -> RankMask {
    ranks.into_iter().fold(0, |m, r| m | rank_to_bit(r))
}

/// Найти самый сильный стрит в маске. Wheel (A2345) → `Rank::Five`.
pub fn detect_straight(rank_mask: RankMask) -> Option<Rank> {
    STRAIGHT_MASKS
        .iter()
        .position(|&sm| rank_mask & sm == sm)
        .map(|i| STRAIGHT_HIGHS[i])
}

/// Ранги стрита от старшей карты вниз. Для wheel туз идёт последним.
pub fn straight_ranks(high: Rank) -> [Rank; 5] {
    if high == Rank::Five {
        return [Rank::Five, Rank::Four, Rank::Three, Rank::Two, Rank::Ace];
    }
    let top = high.value();
    core::array::from_fn(|i| Rank::from_value(top - i as u8).unwrap_or(Rank::Two))
}
