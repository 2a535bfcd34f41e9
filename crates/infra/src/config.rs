//! Process configuration, read once at startup from the environment.
//!
//! | var | default |
//! |---|---|
//! | `FORECASTS_TABLE` | `shelterflow-forecasts` |
//! | `METRICS_TABLE` | `shelterflow-metrics` |
//! | `ORDER_QUEUE_URL` | unset: in-memory order channel |
//! | `DEVICE_STATE_URL` | unset: in-memory inventory |
//! | `DATABASE_URL` | unset: in-memory forecast/metrics stores |
//! | `RESTOCK_HORIZON_DAYS` | `14` |
//! | `REORDER_BUFFER_FRACTION` | `0.2` |
//! | `PROCUREMENT_INTERVAL_SECS` | unset: no scheduled runner |
//! | `SHELTERFLOW_PAIRS` | `shelter-1,shelter-2` x `blankets,food,hygiene` |
//! | `BIND_ADDR` | `0.0.0.0:8000` |

use std::net::SocketAddr;
use std::time::Duration;

use thiserror::Error;

use shelterflow_core::PairKey;
use shelterflow_procurement::ReorderPolicy;
use shelterflow_procurement::policy::{DEFAULT_BUFFER_FRACTION, DEFAULT_RESTOCK_HORIZON_DAYS};

pub const DEFAULT_FORECASTS_TABLE: &str = "shelterflow-forecasts";
pub const DEFAULT_METRICS_TABLE: &str = "shelterflow-metrics";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";

const DEFAULT_LOCATIONS: [&str; 2] = ["shelter-1", "shelter-2"];
const DEFAULT_ITEMS: [&str; 3] = ["blankets", "food", "hygiene"];

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{var}: expected {expected}, got {value:?}")]
    Invalid {
        var: &'static str,
        expected: &'static str,
        value: String,
    },

    #[error("{var}: {message}")]
    Rejected { var: &'static str, message: String },
}

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub forecasts_table: String,
    pub metrics_table: String,
    pub order_queue_url: Option<String>,
    pub device_state_url: Option<String>,
    pub database_url: Option<String>,
    pub policy: ReorderPolicy,
    pub procurement_interval: Option<Duration>,
    pub pairs: Vec<PairKey>,
    pub bind_addr: SocketAddr,
}

impl ServiceConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build the config from an arbitrary variable lookup. Blank values count
    /// as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |var: &str| {
            lookup(var)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let horizon = match get("RESTOCK_HORIZON_DAYS") {
            Some(v) => parse_f64("RESTOCK_HORIZON_DAYS", v)?,
            None => DEFAULT_RESTOCK_HORIZON_DAYS,
        };
        let buffer = match get("REORDER_BUFFER_FRACTION") {
            Some(v) => parse_f64("REORDER_BUFFER_FRACTION", v)?,
            None => DEFAULT_BUFFER_FRACTION,
        };
        let policy = ReorderPolicy::new(horizon, buffer).map_err(|e| ConfigError::Rejected {
            var: "RESTOCK_HORIZON_DAYS/REORDER_BUFFER_FRACTION",
            message: e.to_string(),
        })?;

        let procurement_interval = match get("PROCUREMENT_INTERVAL_SECS") {
            Some(v) => {
                let secs = v.parse::<u64>().ok().filter(|s| *s > 0).ok_or(ConfigError::Invalid {
                    var: "PROCUREMENT_INTERVAL_SECS",
                    expected: "a positive number of seconds",
                    value: v,
                })?;
                Some(Duration::from_secs(secs))
            }
            None => None,
        };

        let pairs = match get("SHELTERFLOW_PAIRS") {
            Some(v) => parse_pairs(&v)?,
            None => default_pairs(),
        };

        let bind_addr = get("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_addr.parse::<SocketAddr>().map_err(|_| ConfigError::Invalid {
            var: "BIND_ADDR",
            expected: "host:port",
            value: bind_addr.clone(),
        })?;

        Ok(Self {
            forecasts_table: get("FORECASTS_TABLE").unwrap_or_else(|| DEFAULT_FORECASTS_TABLE.to_string()),
            metrics_table: get("METRICS_TABLE").unwrap_or_else(|| DEFAULT_METRICS_TABLE.to_string()),
            order_queue_url: get("ORDER_QUEUE_URL"),
            device_state_url: get("DEVICE_STATE_URL"),
            database_url: get("DATABASE_URL"),
            policy,
            procurement_interval,
            pairs,
            bind_addr,
        })
    }
}

fn parse_f64(var: &'static str, value: String) -> Result<f64, ConfigError> {
    value.parse::<f64>().map_err(|_| ConfigError::Invalid {
        var,
        expected: "a number",
        value,
    })
}

/// `location:item` entries separated by commas.
fn parse_pairs(raw: &str) -> Result<Vec<PairKey>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let invalid = || ConfigError::Invalid {
                var: "SHELTERFLOW_PAIRS",
                expected: "comma-separated location:item entries",
                value: entry.to_string(),
            };
            let (location, item) = entry.split_once(':').ok_or_else(invalid)?;
            PairKey::parse(location, item).map_err(|_| invalid())
        })
        .collect()
}

fn default_pairs() -> Vec<PairKey> {
    DEFAULT_LOCATIONS
        .iter()
        .flat_map(|location| {
            DEFAULT_ITEMS
                .iter()
                .filter_map(move |item| PairKey::parse(location, item).ok())
        })
        .collect()
}
