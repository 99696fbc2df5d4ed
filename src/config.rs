//! Configuration types.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::error::ConfigError;

/// Service configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Path of the libSQL database file.
    pub db_path: PathBuf,
    /// HTTP port for the REST API.
    pub port: u16,
    /// Latency of the simulated delivery service.
    pub order_delay: Duration,
    /// Lower bound (inclusive) for placeholder unit prices.
    pub price_min: Decimal,
    /// Upper bound (exclusive) for placeholder unit prices.
    pub price_max: Decimal,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from("./data/meal-planner.db"),
            port: 8080,
            order_delay: Duration::from_millis(2000),
            price_min: dec!(1),
            price_max: dec!(6),
        }
    }
}

impl AppConfig {
    /// Build config from environment variables, falling back to defaults
    /// for anything unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let db_path = lookup("MEAL_PLANNER_DB_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.db_path);
        let port = parse_var(&lookup, "MEAL_PLANNER_PORT")?.unwrap_or(defaults.port);
        let order_delay = parse_var::<u64, _>(&lookup, "MEAL_PLANNER_ORDER_DELAY_MS")?
            .map(Duration::from_millis)
            .unwrap_or(defaults.order_delay);
        let price_min = parse_var(&lookup, "MEAL_PLANNER_PRICE_MIN")?.unwrap_or(defaults.price_min);
        let price_max = parse_var(&lookup, "MEAL_PLANNER_PRICE_MAX")?.unwrap_or(defaults.price_max);

        if price_min < Decimal::ZERO || price_min >= price_max {
            return Err(ConfigError::InvalidValue {
                key: "MEAL_PLANNER_PRICE_MIN".to_string(),
                message: format!("price range [{price_min}, {price_max}) is empty or negative"),
            });
        }

        Ok(Self {
            db_path,
            port,
            order_delay,
            price_min,
            price_max,
        })
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e: T::Err| ConfigError::InvalidValue {
                key: key.to_string(),
                message: format!("{raw:?}: {e}"),
            }),
    }
}
