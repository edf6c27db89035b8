pub mod rate_card_service;

pub use rate_card_service::RateCardService;
