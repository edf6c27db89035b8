// Bookings module

pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use models::{Booking, BookingFilter, BookingStatus};
pub use repositories::BookingRepository;
pub use services::BookingService;
