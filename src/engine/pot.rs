use log::warn;
use serde::{Deserialize, Serialize};

use crate::domain::chips::Chips;
use crate::domain::SeatIndex;

/// Один банк в цепочке: основной или сайд-пот.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Pot {
    pub amount: Chips,
    /// Кто может выиграть этот банк (индексы мест).
    pub eligible: Vec<SeatIndex>,
    /// Индекс следующего сайд-пота в `PotLedger::pots`.
    pub side_pot: Option<usize>,
}

static EMPTY_POT: Pot = Pot {
    amount: Chips::ZERO,
    eligible: Vec::new(),
    side_pot: None,
};

/// Вклад одного игрока в закрывающийся раунд ставок.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RoundContribution {
    pub seat: SeatIndex,
    /// Ставка игрока в этом раунде.
    pub bet: Chips,
    /// Стек после ставки пуст (олл-ин).
    pub all_in: bool,
    /// Игрок ещё претендует на банк (не сфолдил).
    pub live: bool,
}

/// Цепочка банков: main → side → side → …
///
/// Хранится плоским вектором с индексными ссылками. Элемент 0 – основной банк.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PotLedger {
    pub pots: Vec<Pot>,
}

impl Default for PotLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl PotLedger {
    pub fn new() -> Self {
        Self {
            pots: vec![Pot::default()],
        }
    }

    /// Сбросить до одного пустого основного банка.
    pub fn reset(&mut self) {
        self.pots.clear();
        self.pots.push(Pot::default());
    }

    /// Основной банк; для пустого вектора (испорченное сохранение) – пустой банк.
    pub fn main_pot(&self) -> &Pot {
        self.pots.first().unwrap_or(&EMPTY_POT)
    }

    /// Индексы банков в порядке цепочки, начиная с основного.
    pub fn chain(&self) -> Vec<usize> {
        let mut order = Vec::with_capacity(self.pots.len());
        let mut idx = Some(0);
        while let Some(i) = idx {
            if i >= self.pots.len() || order.contains(&i) {
                break;
            }
            order.push(i);
            idx = self.pots[i].side_pot;
        }
        order
    }

    /// Последний банк цепочки: туда идут новые ставки.
    pub fn tail(&self) -> usize {
        self.chain().last().copied().unwrap_or(0)
    }

    /// Сумма по всей цепочке.
    pub fn total(&self) -> Chips {
        self.chain().into_iter().map(|i| self.pots[i].amount).sum()
    }

    /// Суммы сайд-потов (без основного) в порядке цепочки.
    pub fn side_pot_amounts(&self) -> Vec<Chips> {
        self.chain()
            .into_iter()
            .skip(1)
            .map(|i| self.pots[i].amount)
            .collect()
    }

    /// Разложить ставки закрывшегося раунда по банкам.
    ///
    /// Без новых олл-инов весь раунд уходит в хвостовой банк. Иначе для каждого
    /// уровня олл-ина (по возрастанию) в текущий банк идёт то, что каждый
    /// участник мог уравнять на этом уровне, а для тех, кто поставил больше,
    /// открывается новый сайд-пот. Фишки сфолдивших тоже распределяются по уровням.
    pub fn add_round_to_pot(&mut self, round_amount: Chips, contributors: &[RoundContribution]) {
        let committed: Chips = contributors.iter().map(|c| c.bet).sum();
        if committed != round_amount {
            warn!(
                "add_round_to_pot: банк раунда {} не совпадает с суммой ставок {}",
                round_amount, committed
            );
        }

        if self.pots.is_empty() {
            self.pots.push(Pot::default());
        }
        let mut current = self.tail();
        self.refresh_eligible(current, contributors);

        let bet_of = |seat: SeatIndex| {
            contributors
                .iter()
                .find(|c| c.seat == seat)
                .map(|c| c.bet)
                .unwrap_or(Chips::ZERO)
        };

        let mut levels: Vec<Chips> = contributors
            .iter()
            .filter(|c| c.live && c.all_in && self.pots[current].eligible.contains(&c.seat))
            .map(|c| c.bet)
            .collect();
        levels.sort();
        levels.dedup();

        let mut prev = Chips::ZERO;
        for level in levels {
            let tier: Chips = contributors
                .iter()
                .map(|c| c.bet.min(level) - c.bet.min(prev))
                .sum();
            self.pots[current].amount += tier;
            prev = level;

            let next_eligible: Vec<SeatIndex> = self.pots[current]
                .eligible
                .iter()
                .copied()
                .filter(|&seat| bet_of(seat) > level)
                .collect();
            if next_eligible.is_empty() {
                break;
            }

            self.pots.push(Pot {
                amount: Chips::ZERO,
                eligible: next_eligible,
                side_pot: None,
            });
            let new_idx = self.pots.len() - 1;
            self.pots[current].side_pot = Some(new_idx);
            current = new_idx;
        }

        let remainder: Chips = contributors
            .iter()
            .map(|c| c.bet.saturating_sub(prev))
            .sum();
        self.pots[current].amount += remainder;
    }

    /// Пустой хвост получает всех живых; непустой теряет сфолдивших.
    fn refresh_eligible(&mut self, idx: usize, contributors: &[RoundContribution]) {
        let live: Vec<SeatIndex> = contributors
            .iter()
            .filter(|c| c.live)
            .map(|c| c.seat)
            .collect();

        let pot = &mut self.pots[idx];
        if pot.eligible.is_empty() {
            pot.eligible = live;
        } else {
            pot.eligible.retain(|seat| live.contains(seat));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contrib(seat: SeatIndex, bet: u64, all_in: bool) -> RoundContribution {
        RoundContribution {
            seat,
            bet: Chips(bet),
            all_in,
            live: true,
        }
    }

    #[test]
    fn round_without_all_in_goes_to_tail() {
        let mut ledger = PotLedger::new();
        let round = [contrib(0, 20, false), contrib(1, 20, false)];
        ledger.add_round_to_pot(Chips(40), &round);

        assert_eq!(ledger.pots.len(), 1);
        assert_eq!(ledger.main_pot().amount, Chips(40));
        assert_eq!(ledger.main_pot().eligible, vec![0, 1]);
    }

    #[test]
    fn short_all_in_opens_side_pot() {
        let mut ledger = PotLedger::new();
        let round = [
            contrib(0, 80, false),
            contrib(1, 50, true),
            contrib(2, 80, false),
        ];
        ledger.add_round_to_pot(Chips(210), &round);

        assert_eq!(ledger.main_pot().amount, Chips(150));
        assert_eq!(ledger.main_pot().eligible, vec![0, 1, 2]);
        assert_eq!(ledger.side_pot_amounts(), vec![Chips(60)]);
        assert_eq!(ledger.pots[1].eligible, vec![0, 2]);
        assert_eq!(ledger.total(), Chips(210));
    }

    #[test]
    fn several_all_ins_build_a_chain() {
        let mut ledger = PotLedger::new();
        let round = [
            contrib(0, 30, true),
            contrib(1, 70, true),
            contrib(2, 100, false),
            contrib(3, 100, false),
        ];
        ledger.add_round_to_pot(Chips(300), &round);

        assert_eq!(ledger.main_pot().amount, Chips(120));
        assert_eq!(ledger.side_pot_amounts(), vec![Chips(120), Chips(60)]);
        assert_eq!(ledger.pots[1].eligible, vec![1, 2, 3]);
        assert_eq!(ledger.pots[2].eligible, vec![2, 3]);
        assert_eq!(ledger.chain(), vec![0, 1, 2]);
    }

    #[test]
    fn folded_money_stays_in_lower_tier() {
        let mut ledger = PotLedger::new();
        let mut folded = contrib(2, 40, false);
        folded.live = false;
        let round = [contrib(0, 20, true), contrib(1, 60, false), folded];
        ledger.add_round_to_pot(Chips(120), &round);

        // 20 × 3 в основной банк, остальное – в сайд-пот игрока 1.
        assert_eq!(ledger.main_pot().amount, Chips(60));
        assert_eq!(ledger.main_pot().eligible, vec![0, 1]);
        assert_eq!(ledger.side_pot_amounts(), vec![Chips(60)]);
        assert_eq!(ledger.pots[1].eligible, vec![1]);
    }

    #[test]
    fn reset_leaves_single_empty_pot() {
        let mut ledger = PotLedger::new();
        ledger.add_round_to_pot(
            Chips(100),
            &[contrib(0, 10, true), contrib(1, 90, false)],
        );
        ledger.reset();
        assert_eq!(ledger, PotLedger::new());
        assert!(ledger.total().is_zero());
    }

    #[test]
    fn empty_ledger_reads_as_empty_main_pot() {
        let mut ledger: PotLedger = serde_json::from_str(r#"{"pots":[]}"#).unwrap();
        assert_eq!(ledger.main_pot(), &Pot::default());
        assert!(ledger.side_pot_amounts().is_empty());

        ledger.add_round_to_pot(Chips(40), &[contrib(0, 20, false), contrib(1, 20, false)]);
        assert_eq!(ledger.main_pot().amount, Chips(40));
    }
}
