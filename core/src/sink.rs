//! Out-of-band diagnostics for raw payloads and failures.
//!
//! # Design
//! The sink is injected into `WebRequestService` rather than reached through a
//! global logger, so tests can record exactly what was logged. Implementations
//! must never fail or panic; logging is fire-and-forget.

use std::error::Error as StdError;
use std::fmt;

/// Receives raw response payloads and error reports.
pub trait DiagnosticSink: Send + Sync {
    /// Record a raw byte payload under `label`, attributed to `account`.
    fn log_stream(&self, label: &str, account: &str, data: &[u8]);

    /// Record an error event with an already formatted message.
    fn log_error(&self, error: Option<&(dyn StdError + 'static)>, message: fmt::Arguments<'_>);
}

/// Default sink that forwards everything to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn log_stream(&self, label: &str, account: &str, data: &[u8]) {
        tracing::debug!(
            label,
            account,
            bytes = data.len(),
            payload = %String::from_utf8_lossy(data),
            "raw stream"
        );
    }

    fn log_error(&self, error: Option<&(dyn StdError + 'static)>, message: fmt::Arguments<'_>) {
        match error {
            Some(err) => tracing::error!(error = %err, "{message}"),
            None => tracing::error!("{message}"),
        }
    }
}
