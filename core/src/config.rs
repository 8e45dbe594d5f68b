//! Service configuration.
//!
//! Defaults match what the Teapplix endpoints have always been called with;
//! `from_env` lets deployments override them without code changes.

use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{Error, Result};

/// Bytes copied per read when buffering a response body.
pub const DEFAULT_COPY_CHUNK_SIZE: usize = 0x100;

/// Largest accepted `copy_chunk_size`; the read buffer is allocated up front.
pub const MAX_COPY_CHUNK_SIZE: usize = 1024 * 1024;

/// Label attached to successful response payloads in the diagnostic sink.
pub const DEFAULT_RESPONSE_LOG_LABEL: &str = "response";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub copy_chunk_size: usize,
    pub response_log_label: String,
    /// Applied to the transport only; the service itself never times out.
    pub connect_timeout_secs: Option<u64>,
    pub request_timeout_secs: Option<u64>,
    pub user_agent: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            copy_chunk_size: DEFAULT_COPY_CHUNK_SIZE,
            response_log_label: DEFAULT_RESPONSE_LOG_LABEL.to_string(),
            connect_timeout_secs: None,
            request_timeout_secs: None,
            user_agent: concat!("teapplix-core/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ServiceConfig {
    /// Defaults overlaid with any `TEAPPLIX_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();
        if let Some(size) = parse_var(&lookup, "TEAPPLIX_COPY_CHUNK_SIZE")? {
            config.copy_chunk_size = size;
        }
        if let Some(label) = lookup("TEAPPLIX_RESPONSE_LOG_LABEL") {
            config.response_log_label = label;
        }
        if let Some(secs) = parse_var(&lookup, "TEAPPLIX_CONNECT_TIMEOUT_SECS")? {
            config.connect_timeout_secs = Some(secs);
        }
        if let Some(secs) = parse_var(&lookup, "TEAPPLIX_REQUEST_TIMEOUT_SECS")? {
            config.request_timeout_secs = Some(secs);
        }
        if let Some(agent) = lookup("TEAPPLIX_USER_AGENT") {
            config.user_agent = agent;
        }
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.copy_chunk_size == 0 || self.copy_chunk_size > MAX_COPY_CHUNK_SIZE {
            return Err(Error::Config {
                message: format!(
                    "copy_chunk_size must be between 1 and {MAX_COPY_CHUNK_SIZE}, got {}",
                    self.copy_chunk_size
                ),
                key: Some("copy_chunk_size".to_string()),
            });
        }
        Ok(())
    }

    /// Build the HTTP client used as transport.
    pub fn build_http_client(&self) -> Result<reqwest::Client> {
        let mut builder = reqwest::Client::builder().user_agent(self.user_agent.as_str());
        if let Some(secs) = self.connect_timeout_secs {
            builder = builder.connect_timeout(Duration::from_secs(secs));
        }
        if let Some(secs) = self.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        Ok(builder.build()?)
    }
}

fn parse_var<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<T>>
where
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw.trim().parse::<T>().map(Some).map_err(|e: T::Err| Error::Config {
            message: format!("invalid value {raw:?} for {key}: {e}"),
            key: Some(key.to_string()),
        }),
    }
}
