//! Freight desk back-office library
//!
//! Bookings, fleet and customer records for a parcel logistics counter, plus
//! the dashboard and report aggregations computed over them.

pub mod app;
pub mod config;
pub mod core;
pub mod demo;
pub mod middleware;
pub mod modules;

// Re-export commonly used types
pub use app::{configure_api, Repositories, Services};
pub use demo::DemoStore;
pub use modules::{dashboard, reports};
