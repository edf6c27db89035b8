pub mod rate_card_controller;

pub use rate_card_controller::configure;
