use crate::core::{AppError, Result};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::env;
use std::str::FromStr;
use std::time::Duration;

pub mod database;
pub mod server;

pub use database::DatabaseConfig;
pub use server::ServerConfig;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    /// Absent when the service runs on seeded demo data
    pub database: Option<DatabaseConfig>,
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub env: String,
    pub log_level: String,
    pub log_format: LogFormat,
    /// Serve from the in-memory sample store instead of MySQL
    pub demo_data: bool,
    /// GST applied on top of rate-card subtotals
    pub gst_rate: Decimal,
    /// Budget for one composite dashboard/report request
    pub query_timeout_secs: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(AppError::Configuration(format!(
                "Invalid LOG_FORMAT '{}'",
                other
            ))),
        }
    }
}

impl AppConfig {
    pub fn query_timeout(&self) -> Duration {
        Duration::from_secs(self.query_timeout_secs)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            env: "development".to_string(),
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            demo_data: false,
            gst_rate: Decimal::new(18, 2),
            query_timeout_secs: 10,
        }
    }
}

fn parse_bool(name: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(AppError::Configuration(format!("Invalid {}", name))),
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        let demo_data = parse_bool(
            "DEMO_DATA",
            &env::var("DEMO_DATA").unwrap_or_else(|_| "false".to_string()),
        )?;

        let app = AppConfig {
            env: env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            log_format: env::var("LOG_FORMAT")
                .unwrap_or_else(|_| "pretty".to_string())
                .parse()?,
            demo_data,
            gst_rate: env::var("GST_RATE")
                .unwrap_or_else(|_| "0.18".to_string())
                .parse()
                .map_err(|_| AppError::Configuration("Invalid GST_RATE".to_string()))?,
            query_timeout_secs: env::var("QUERY_TIMEOUT_SECS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .map_err(|_| AppError::Configuration("Invalid QUERY_TIMEOUT_SECS".to_string()))?,
        };

        // DATABASE_URL is only mandatory when we actually talk to MySQL
        let database = if demo_data && env::var("DATABASE_URL").is_err() {
            None
        } else {
            Some(DatabaseConfig::from_env()?)
        };

        Ok(Config {
            app,
            database,
            server: ServerConfig::from_env()?,
        })
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.app.query_timeout_secs == 0 {
            return Err(AppError::Configuration(
                "Query timeout must be greater than 0".to_string(),
            ));
        }

        if self.app.gst_rate < Decimal::ZERO || self.app.gst_rate > Decimal::ONE {
            return Err(AppError::Configuration(
                "GST rate must be between 0 and 1".to_string(),
            ));
        }

        if !self.app.demo_data && self.database.is_none() {
            return Err(AppError::Configuration(
                "DATABASE_URL not set and DEMO_DATA is disabled".to_string(),
            ));
        }

        if let Some(database) = &self.database {
            database.validate()?;
        }

        Ok(())
    }
}
