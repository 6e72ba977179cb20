//! Application configuration loaded from environment variables.

use checkout::DEFAULT_APPROVAL_RATE;

/// Output format for log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Shop configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `PAYMENT_APPROVAL_RATE` — probability a payment is approved (default: `0.90`)
/// - `LOW_STOCK_THRESHOLD` — stock below this is reported as low (default: `5`)
/// - `RUST_LOG` — tracing filter directive (default: `"info"`)
/// - `LOG_FORMAT` — `pretty` or `json` (default: `pretty`)
///
/// Values that fail to parse fall back to their defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub payment_approval_rate: f64,
    pub low_stock_threshold: u32,
    pub log_level: String,
    pub log_format: LogFormat,
}

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Loads configuration through an arbitrary variable lookup.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            payment_approval_rate: lookup("PAYMENT_APPROVAL_RATE")
                .and_then(|v| v.trim().parse::<f64>().ok())
                .filter(|rate| (0.0..=1.0).contains(rate))
                .unwrap_or(defaults.payment_approval_rate),
            low_stock_threshold: lookup("LOW_STOCK_THRESHOLD")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(defaults.low_stock_threshold),
            log_level: lookup("RUST_LOG").unwrap_or(defaults.log_level),
            log_format: match lookup("LOG_FORMAT").as_deref().map(str::trim) {
                Some(f) if f.eq_ignore_ascii_case("json") => LogFormat::Json,
                _ => defaults.log_format,
            },
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            payment_approval_rate: DEFAULT_APPROVAL_RATE,
            low_stock_threshold: 5,
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
        }
    }
}
