//! Error types for the Teapplix client core.
//!
//! # Design
//! Transport and parser errors are carried unmodified inside their variants so
//! callers can still inspect the underlying `reqwest::Error` or `csv::Error`.
//! Diagnostic detail (account, raw payload) goes to the `DiagnosticSink`, not
//! into the error values.

use std::fmt;
use std::io;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by `WebRequestService` and the request builders.
#[derive(Debug, Error)]
pub enum Error {
    /// Sending the request or receiving the response failed, including
    /// non-2xx statuses.
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Reading the response body failed below the HTTP client.
    #[error("I/O error while reading response body: {0}")]
    Io(#[from] io::Error),

    #[error("failed to parse upload response: {0}")]
    UploadParse(#[source] ParseError),

    #[error("failed to parse export file: {0}")]
    ExportParse(#[source] ParseError),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("configuration error: {message}")]
    Config {
        message: String,
        /// Environment variable or setting that was rejected.
        key: Option<String>,
    },

    #[error("blocking call made from within an async runtime; use the async form instead")]
    BlockingInAsyncContext,

    #[error("failed to start blocking runtime: {0}")]
    Runtime(#[source] io::Error),
}

impl Error {
    /// Status classification for transport-level failures.
    pub fn transport_status(&self) -> Option<TransportStatus> {
        match self {
            Error::Transport(err) => Some(TransportStatus::from_reqwest(err)),
            Error::Io(err) => Some(TransportStatus::from_io(err)),
            _ => None,
        }
    }
}

/// Errors raised by the upload response and export file parsers.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("input has no header row")]
    MissingHeader,

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),
}

/// Coarse classification of a transport failure, logged next to the account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportStatus {
    Timeout,
    ConnectFailure,
    ProtocolError,
    ReceiveFailure,
    SendFailure,
    UnknownError,
}

impl TransportStatus {
    pub fn from_reqwest(err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportStatus::Timeout
        } else if err.is_connect() {
            TransportStatus::ConnectFailure
        } else if err.is_status() || err.is_redirect() {
            TransportStatus::ProtocolError
        } else if err.is_body() || err.is_decode() {
            TransportStatus::ReceiveFailure
        } else if err.is_request() {
            TransportStatus::SendFailure
        } else {
            TransportStatus::UnknownError
        }
    }

    pub fn from_io(err: &io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::TimedOut => TransportStatus::Timeout,
            io::ErrorKind::ConnectionRefused | io::ErrorKind::NotConnected => {
                TransportStatus::ConnectFailure
            }
            io::ErrorKind::UnexpectedEof
            | io::ErrorKind::ConnectionReset
            | io::ErrorKind::ConnectionAborted
            | io::ErrorKind::BrokenPipe => TransportStatus::ReceiveFailure,
            _ => TransportStatus::UnknownError,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TransportStatus::Timeout => "Timeout",
            TransportStatus::ConnectFailure => "ConnectFailure",
            TransportStatus::ProtocolError => "ProtocolError",
            TransportStatus::ReceiveFailure => "ReceiveFailure",
            TransportStatus::SendFailure => "SendFailure",
            TransportStatus::UnknownError => "UnknownError",
        }
    }
}

impl fmt::Display for TransportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_kinds_map_to_statuses() {
        let cases = [
            (io::ErrorKind::TimedOut, TransportStatus::Timeout),
            (io::ErrorKind::ConnectionRefused, TransportStatus::ConnectFailure),
            (io::ErrorKind::UnexpectedEof, TransportStatus::ReceiveFailure),
            (io::ErrorKind::ConnectionReset, TransportStatus::ReceiveFailure),
            (io::ErrorKind::PermissionDenied, TransportStatus::UnknownError),
        ];
        for (kind, expected) in cases {
            assert_eq!(TransportStatus::from_io(&io::Error::from(kind)), expected, "{kind:?}");
        }
    }

    #[test]
    fn status_renders_as_variant_name() {
        assert_eq!(TransportStatus::ConnectFailure.to_string(), "ConnectFailure");
        assert_eq!(TransportStatus::ProtocolError.to_string(), "ProtocolError");
    }

    #[test]
    fn only_transport_errors_carry_a_status() {
        let io_err = Error::Io(io::Error::from(io::ErrorKind::ConnectionReset));
        assert_eq!(io_err.transport_status(), Some(TransportStatus::ReceiveFailure));

        let parse_err = Error::ExportParse(ParseError::MissingHeader);
        assert_eq!(parse_err.transport_status(), None);
    }

    #[test]
    fn parse_errors_keep_their_source() {
        use std::error::Error as _;
        let err = Error::UploadParse(ParseError::MissingHeader);
        let source = err.source().expect("source");
        assert_eq!(source.to_string(), "input has no header row");
    }
}
