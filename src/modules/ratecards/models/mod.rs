mod rate_card;

pub use rate_card::{Quote, RateCard, UpsertRateCardRequest};
