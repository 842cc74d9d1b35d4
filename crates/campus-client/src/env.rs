// Environment detection, logger setup, and env-driven client options.

use std::sync::OnceLock;

use crate::{ClientOptions, SubscriptionOptions};

pub const API_URL_VAR: &str = "CAMPUS_API_URL";
pub const TIMEOUT_VAR: &str = "CAMPUS_TIMEOUT_SECS";
pub const POLL_VAR: &str = "CAMPUS_SUBSCRIPTION_POLL_SECS";

/// Cached environment mode.
static ENV_MODE: OnceLock<EnvMode> = OnceLock::new();

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvMode {
    Production,
    Development,
    Test,
}

impl EnvMode {
    fn from_value(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "production" | "prod" => EnvMode::Production,
            "test" | "testing" => EnvMode::Test,
            _ => EnvMode::Development,
        }
    }
}

/// Detect the environment mode from `CAMPUS_ENV`, then `RUST_ENV`.
pub fn detect_env_mode() -> EnvMode {
    *ENV_MODE.get_or_init(|| {
        let env_val = std::env::var("CAMPUS_ENV")
            .or_else(|_| std::env::var("RUST_ENV"))
            .unwrap_or_default();
        EnvMode::from_value(&env_val)
    })
}

pub fn is_production() -> bool {
    detect_env_mode() == EnvMode::Production
}

pub fn is_test() -> bool {
    detect_env_mode() == EnvMode::Test
}

/// Initialize the `tracing` subscriber. `RUST_LOG` wins when set; otherwise
/// `campus=info` in production and `campus=debug` everywhere else.
pub fn init_logger() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if is_production() {
            EnvFilter::new("campus=info")
        } else {
            EnvFilter::new("campus=debug")
        }
    });

    // A second call (tests, embedding apps) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .try_init();
}

impl ClientOptions {
    /// Options from `CAMPUS_API_URL`, `CAMPUS_TIMEOUT_SECS` and
    /// `CAMPUS_SUBSCRIPTION_POLL_SECS`, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with a custom variable source.
    /// Unparseable numbers are ignored with a warning.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut options = ClientOptions::default();

        if let Some(url) = lookup(API_URL_VAR).filter(|u| !u.trim().is_empty()) {
            options.base_url = url.trim().trim_end_matches('/').to_string();
        }
        options.timeout_secs = parse_secs(&lookup, TIMEOUT_VAR).or(options.timeout_secs);
        options.subscription = SubscriptionOptions {
            poll_interval_secs: parse_secs(&lookup, POLL_VAR)
                .or(options.subscription.poll_interval_secs),
        };
        options
    }
}

fn parse_secs(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<u64> {
    let raw = lookup(key)?;
    match raw.trim().parse::<u64>() {
        Ok(0) => None,
        Ok(secs) => Some(secs),
        Err(_) => {
            tracing::warn!(var = key, value = %raw, "ignoring non-numeric value");
            None
        }
    }
}
