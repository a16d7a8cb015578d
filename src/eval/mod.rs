//! Модуль оценки силы покерных рук (Texas Hold'em) и определения победителей.
//!
//! Основные функции:
//!   `evaluate_best_hand(hole, board) -> Option<HandEvaluation>`
//!   `determine_pot_winners(contenders, board)`
//!   `determine_winners(pots, hands, board)`

pub mod evaluator;
pub mod hand_rank;
pub mod lookup_tables;
pub mod showdown;

pub use evaluator::{evaluate_best_hand, HandEvaluation};
pub use hand_rank::{describe_hand, HandCategory};
pub use showdown::{determine_pot_winners, determine_winners, split_pot, PotWinners};
