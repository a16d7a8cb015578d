//! Инфраструктурный слой вокруг покерного движка:
//! - генерация ID;
//! - RNG-реализации для движка;
//! - хранение столов (JSON на границе хранилища).

pub mod ids;
pub mod persistence;
pub mod rng;

pub use ids::*;
pub use persistence::*;
pub use rng::*;
