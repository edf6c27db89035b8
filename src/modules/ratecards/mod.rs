// Rate cards module

pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use models::{Quote, RateCard};
pub use repositories::RateCardRepository;
pub use services::RateCardService;
