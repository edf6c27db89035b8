pub mod bookings;
pub mod companies;
pub mod dashboard;
pub mod drivers;
pub mod health;
pub mod ratecards;
pub mod reports;
pub mod vehicles;
