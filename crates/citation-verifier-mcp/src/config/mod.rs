//! Configuration loading and resolution.
//!
//! Every setting resolves as: explicit CLI value, then environment
//! variable, then built-in default.

use std::time::Duration;

use citation_verifier::{CrossrefConfig, DEFAULT_CROSSREF_URL, DEFAULT_TIMEOUT_SECS};

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_KEEPALIVE_SECS: u64 = 30;

/// Fully resolved server settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub crossref_url: String,
    pub mailto: Option<String>,
    pub timeout_secs: u64,
    pub keepalive_secs: u64,
}

/// Values supplied on the command line; `None` means "not given".
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub log_level: Option<String>,
    pub crossref_url: Option<String>,
    pub mailto: Option<String>,
    pub timeout_secs: Option<u64>,
    pub keepalive_secs: Option<u64>,
}

impl ServerConfig {
    /// Resolve against the process environment.
    pub fn resolve(overrides: ConfigOverrides) -> Self {
        Self::resolve_with(overrides, |key| std::env::var(key).ok())
    }

    /// Resolve against an arbitrary variable lookup.
    pub fn resolve_with<F>(overrides: ConfigOverrides, env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = |key: &str| env(key).filter(|v| !v.trim().is_empty());

        Self {
            host: overrides
                .host
                .or_else(|| env("HOST"))
                .unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: overrides
                .port
                .or_else(|| parse_env(&env, "PORT"))
                .unwrap_or(DEFAULT_PORT),
            log_level: overrides
                .log_level
                .or_else(|| env("LOG_LEVEL"))
                .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
            crossref_url: overrides
                .crossref_url
                .or_else(|| env("CROSSREF_API_URL"))
                .unwrap_or_else(|| DEFAULT_CROSSREF_URL.to_string()),
            mailto: overrides.mailto.or_else(|| env("CROSSREF_MAILTO")),
            timeout_secs: overrides
                .timeout_secs
                .or_else(|| parse_env(&env, "CROSSREF_TIMEOUT_SECS"))
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
            keepalive_secs: overrides
                .keepalive_secs
                .or_else(|| parse_env(&env, "SSE_KEEPALIVE_SECS"))
                .unwrap_or(DEFAULT_KEEPALIVE_SECS),
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn keepalive_interval(&self) -> Duration {
        Duration::from_secs(self.keepalive_secs.max(1))
    }

    pub fn crossref(&self) -> CrossrefConfig {
        CrossrefConfig {
            base_url: self.crossref_url.clone(),
            mailto: self.mailto.clone(),
            timeout: Duration::from_secs(self.timeout_secs.max(1)),
        }
    }
}

fn parse_env<T, F>(env: &F, key: &str) -> Option<T>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    let raw = env(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!("Ignoring unparseable {key}={raw}");
            None
        }
    }
}
