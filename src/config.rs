use config::{Config, Environment, File};
use serde::Deserialize;
use std::env;
use std::path::Path;
use thiserror::Error;
use tracing::info;
use validator::Validate;

use crate::analytics::stock::DEFAULT_LEAD_TIME_DAYS;
use crate::queries::TREND_WINDOW_DAYS;

/// Default values for configuration
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_ENV: &str = "development";
const CONFIG_DIR: &str = "config";
const DEFAULT_DATA_DIR: &str = ".retail-pulse";
const DEFAULT_FORECAST_HORIZON_DAYS: usize = 7;
const DEFAULT_EVENT_CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, Error)]
pub enum AppConfigError {
    #[error("Configuration error: {0}")]
    Build(#[from] config::ConfigError),
    #[error("Configuration validation failed: {0}")]
    Validation(String),
}

/// Application configuration with validation.
#[derive(Clone, Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Default spreadsheet locator used when the sync command gets none.
    #[serde(default)]
    pub sheet_url: Option<String>,

    /// Directory holding the persisted synced dataset.
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    /// Supplier lead time in days for reorder-point suggestions.
    #[serde(default = "default_lead_time_days")]
    #[validate(range(min = 1, max = 60))]
    pub lead_time_days: u32,

    /// Days projected by the sales forecast.
    #[serde(default = "default_forecast_horizon_days")]
    #[validate(range(min = 1, max = 30))]
    pub forecast_horizon_days: usize,

    /// Days of history feeding the sales trend and forecast.
    #[serde(default = "default_trend_window_days")]
    #[validate(range(min = 2, max = 90))]
    pub trend_window_days: usize,

    /// Fixed seed for the synthetic sales backfill; unset means entropy.
    #[serde(default)]
    pub backfill_seed: Option<u64>,

    /// Capacity of the dataset event channel.
    #[serde(default = "default_event_channel_capacity")]
    pub event_channel_capacity: usize,

    /// Application environment
    #[serde(default = "default_environment")]
    pub environment: String,

    /// Logging level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Log in JSON format (structured logging)
    #[serde(default)]
    pub log_json: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            sheet_url: None,
            data_dir: default_data_dir(),
            lead_time_days: default_lead_time_days(),
            forecast_horizon_days: default_forecast_horizon_days(),
            trend_window_days: default_trend_window_days(),
            backfill_seed: None,
            event_channel_capacity: default_event_channel_capacity(),
            environment: default_environment(),
            log_level: default_log_level(),
            log_json: false,
        }
    }
}

fn default_data_dir() -> String {
    DEFAULT_DATA_DIR.to_string()
}
fn default_lead_time_days() -> u32 {
    DEFAULT_LEAD_TIME_DAYS
}
fn default_forecast_horizon_days() -> usize {
    DEFAULT_FORECAST_HORIZON_DAYS
}
fn default_trend_window_days() -> usize {
    TREND_WINDOW_DAYS
}
fn default_event_channel_capacity() -> usize {
    DEFAULT_EVENT_CHANNEL_CAPACITY
}
fn default_environment() -> String {
    DEFAULT_ENV.to_string()
}
fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

/// Loads configuration from files and environment.
///
/// Precedence, lowest to highest: built-in defaults, `config/default`,
/// `config/{RUN_ENV}`, then `APP__`-prefixed environment variables
/// (e.g. `APP__LEAD_TIME_DAYS=10`).
pub fn load_config() -> Result<AppConfig, AppConfigError> {
    let run_env = env::var("RUN_ENV")
        .or_else(|_| env::var("APP_ENV"))
        .unwrap_or_else(|_| DEFAULT_ENV.to_string());
    info!("Loading configuration for environment: {}", run_env);

    if !Path::new(CONFIG_DIR).exists() {
        info!(
            "Config directory '{}' not found; relying on built-in defaults and environment variables",
            CONFIG_DIR
        );
    }

    let config = Config::builder()
        .add_source(File::with_name(&format!("{CONFIG_DIR}/default")).required(false))
        .add_source(File::with_name(&format!("{CONFIG_DIR}/{run_env}")).required(false))
        .add_source(Environment::with_prefix("APP").separator("__"))
        .build()?;

    let app_config: AppConfig = config.try_deserialize()?;
    app_config
        .validate()
        .map_err(|err| AppConfigError::Validation(err.to_string()))?;

    Ok(app_config)
}

/// Initializes the global tracing subscriber.
///
/// `RUST_LOG` overrides the configured level when set and non-empty.
/// Safe to call more than once; later calls are no-ops.
pub fn init_tracing(level: &str, json: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default_directive = format!("retail_pulse={level}");
    let filter_directive = env::var("RUST_LOG")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(default_directive);

    if json {
        let _ = fmt()
            .json()
            .with_env_filter(EnvFilter::new(filter_directive))
            .try_init();
    } else {
        let _ = fmt()
            .with_env_filter(EnvFilter::new(filter_directive))
            .try_init();
    }
}
