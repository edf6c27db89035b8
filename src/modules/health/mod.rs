// Health module: liveness and readiness probes

pub mod controllers;

pub use controllers::health_controller::DataStore;
