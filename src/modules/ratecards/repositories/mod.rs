pub mod rate_card_repository;

pub use rate_card_repository::{MySqlRateCardRepository, RateCardRepository};
