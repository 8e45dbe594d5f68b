//! Client core for Teapplix inventory uploads and order exports.
//!
//! # Overview
//! Builds upload (multipart POST) and retrieval (GET) request descriptors,
//! executes them over HTTP, buffers the response body and hands it to the
//! matching parser. Failures are reported through an injected
//! `DiagnosticSink`, attributed to the account, and then returned unchanged.
//!
//! # Design
//! - `build_get_request` / `build_post_request` produce plain-data
//!   `HttpRequest` values; nothing is sent until `WebRequestService` executes
//!   them.
//! - `WebRequestService` holds only immutable collaborators, so one instance
//!   can serve concurrent calls. Async methods are the implementation; the
//!   `*_blocking` variants wrap them.
//! - Parsers and the sink are traits. `CsvUploadResponseParser`,
//!   `CsvExportFileParser` and `TracingSink` are the defaults.

pub mod config;
pub mod credentials;
pub mod error;
pub mod executor;
pub mod http;
pub mod parser;
pub mod sink;
pub mod types;

pub use config::ServiceConfig;
pub use credentials::TeapplixCredentials;
pub use error::{Error, ParseError, Result, TransportStatus};
pub use executor::WebRequestService;
pub use http::{build_get_request, build_post_request, multipart_boundary, CredentialMode, HttpMethod, HttpRequest};
pub use parser::{CsvExportFileParser, CsvUploadResponseParser, ExportFileParser, UploadResponseParser};
pub use sink::{DiagnosticSink, TracingSink};
pub use types::{OrderRecord, UploadResultRecord, UploadStatus};
