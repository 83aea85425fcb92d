use std::str::FromStr;
use std::time::Duration;
use tracing::warn;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_EVENT_CAPACITY: usize = 1024;
pub const DEFAULT_HANDLER_TIMEOUT_SECS: u64 = 5;
pub const DEFAULT_HANDLER_MAX_RETRIES: u32 = 3;
pub const DEFAULT_RETRY_BACKOFF_MS: u64 = 100;

/// Runtime settings read from the environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind_addr: String,
    /// PostgreSQL is used when set, in-memory stores otherwise
    pub database_url: Option<String>,
    pub event_capacity: usize,
    pub handler_timeout: Duration,
    pub handler_max_retries: u32,
    /// Base delay before a handler retry, doubled per attempt
    pub retry_backoff: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            database_url: None,
            event_capacity: DEFAULT_EVENT_CAPACITY,
            handler_timeout: Duration::from_secs(DEFAULT_HANDLER_TIMEOUT_SECS),
            handler_max_retries: DEFAULT_HANDLER_MAX_RETRIES,
            retry_backoff: Duration::from_millis(DEFAULT_RETRY_BACKOFF_MS),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        Self {
            bind_addr: non_empty("CRICKSTATS_BIND_ADDR")
                .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            database_url: non_empty("DATABASE_URL"),
            event_capacity: parse_or_default(
                "CRICKSTATS_EVENT_CAPACITY",
                non_empty("CRICKSTATS_EVENT_CAPACITY"),
                DEFAULT_EVENT_CAPACITY,
            ),
            handler_timeout: Duration::from_secs(parse_or_default(
                "CRICKSTATS_HANDLER_TIMEOUT_SECS",
                non_empty("CRICKSTATS_HANDLER_TIMEOUT_SECS"),
                DEFAULT_HANDLER_TIMEOUT_SECS,
            )),
            handler_max_retries: parse_or_default(
                "CRICKSTATS_HANDLER_MAX_RETRIES",
                non_empty("CRICKSTATS_HANDLER_MAX_RETRIES"),
                DEFAULT_HANDLER_MAX_RETRIES,
            ),
            retry_backoff: Duration::from_millis(parse_or_default(
                "CRICKSTATS_HANDLER_BACKOFF_MS",
                non_empty("CRICKSTATS_HANDLER_BACKOFF_MS"),
                DEFAULT_RETRY_BACKOFF_MS,
            )),
        }
    }
}

fn parse_or_default<T: FromStr + Copy>(key: &str, raw: Option<String>, default: T) -> T {
    match raw {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!(key, value = %raw, "Ignoring unparseable setting, using default");
            default
        }),
    }
}
