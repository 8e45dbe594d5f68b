//! Request execution and response handling for one Teapplix account.
//!
//! # Design
//! `WebRequestService` owns no per-call state: every call owns its response
//! handle and body buffer and drops them on every exit path, so calls may run
//! concurrently. The async methods are the single implementation; the
//! `*_blocking` forms drive them on a private current-thread runtime.
//!
//! Failures are reported to the `DiagnosticSink` and then returned unchanged.
//! Upload parse errors are returned without logging, while export parse
//! errors log the whole raw export first.

use std::error::Error as StdError;
use std::future::Future;
use std::io::{self, Cursor};
use std::sync::Arc;

use futures::TryStreamExt;
use tokio::io::AsyncReadExt;
use tokio_util::io::StreamReader;
use tracing::debug;

use crate::config::ServiceConfig;
use crate::credentials::TeapplixCredentials;
use crate::error::{Error, Result, TransportStatus};
use crate::http::{HttpMethod, HttpRequest};
use crate::parser::{CsvExportFileParser, CsvUploadResponseParser, ExportFileParser, UploadResponseParser};
use crate::sink::{DiagnosticSink, TracingSink};
use crate::types::{OrderRecord, UploadResultRecord};

/// Executes Teapplix requests on behalf of one account.
#[derive(Clone)]
pub struct WebRequestService {
    credentials: TeapplixCredentials,
    config: ServiceConfig,
    http: reqwest::Client,
    sink: Arc<dyn DiagnosticSink>,
    upload_parser: Arc<dyn UploadResponseParser>,
    export_parser: Arc<dyn ExportFileParser>,
}

impl WebRequestService {
    /// Service with default configuration, `TracingSink` and the CSV parsers.
    pub fn new(credentials: TeapplixCredentials) -> Result<Self> {
        Self::with_config(credentials, ServiceConfig::default())
    }

    pub fn with_config(credentials: TeapplixCredentials, config: ServiceConfig) -> Result<Self> {
        config.validate()?;
        let http = config.build_http_client()?;
        Ok(Self {
            credentials,
            config,
            http,
            sink: Arc::new(TracingSink),
            upload_parser: Arc::new(CsvUploadResponseParser),
            export_parser: Arc::new(CsvExportFileParser),
        })
    }

    /// Replace the transport. Deadlines, proxies and TLS settings belong on
    /// this client; the service adds none of its own.
    pub fn with_http_client(mut self, http: reqwest::Client) -> Self {
        self.http = http;
        self
    }

    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn with_upload_parser(mut self, parser: Arc<dyn UploadResponseParser>) -> Self {
        self.upload_parser = parser;
        self
    }

    pub fn with_export_parser(mut self, parser: Arc<dyn ExportFileParser>) -> Self {
        self.export_parser = parser;
        self
    }

    pub fn credentials(&self) -> &TeapplixCredentials {
        &self.credentials
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Send an upload request and parse the platform's per-item results.
    ///
    /// The buffered body is handed to the sink before parsing. Transport
    /// failures are logged with the account and status; parse failures are
    /// returned as `Error::UploadParse` without logging.
    pub async fn get_upload_result(&self, request: HttpRequest) -> Result<Vec<UploadResultRecord>> {
        let body = match self.fetch(request).await {
            Ok(body) => body,
            Err(err) => {
                self.log_http_error("upload file", &err);
                return Err(err);
            }
        };

        self.sink
            .log_stream(&self.config.response_log_label, self.credentials.account_name(), &body);

        let mut buffer = Cursor::new(body);
        self.upload_parser.parse(&mut buffer).map_err(Error::UploadParse)
    }

    pub fn get_upload_result_blocking(&self, request: HttpRequest) -> Result<Vec<UploadResultRecord>> {
        block_on(self.get_upload_result(request))?
    }

    /// Fetch an export file into memory without parsing it.
    ///
    /// The returned cursor is positioned after the last byte written.
    pub async fn download_export(&self, request: HttpRequest) -> Result<Cursor<Vec<u8>>> {
        match self.fetch(request).await {
            Ok(body) => {
                let len = body.len() as u64;
                let mut buffer = Cursor::new(body);
                buffer.set_position(len);
                Ok(buffer)
            }
            Err(err) => {
                self.log_http_error("download export file", &err);
                Err(err)
            }
        }
    }

    pub fn download_export_blocking(&self, request: HttpRequest) -> Result<Cursor<Vec<u8>>> {
        block_on(self.download_export(request))?
    }

    /// Parse an export buffer from its first byte, whatever its cursor.
    ///
    /// On failure the complete buffer is logged as text with the account
    /// before the parser's error is returned.
    pub fn get_parsed_orders<T: AsRef<[u8]>>(&self, buffer: &mut Cursor<T>) -> Result<Vec<OrderRecord>> {
        buffer.set_position(0);
        match self.export_parser.parse(&mut *buffer) {
            Ok(orders) => Ok(orders),
            Err(err) => {
                self.log_parse_report_error(buffer.get_ref().as_ref(), &err);
                Err(Error::ExportParse(err))
            }
        }
    }

    async fn fetch(&self, request: HttpRequest) -> Result<Vec<u8>> {
        let method = request.method;
        let url = request.url.clone();
        debug!(account = self.credentials.account_name(), method = method.as_str(), %url, "sending request");

        let response = self.to_transport(request).send().await?.error_for_status()?;
        let status = response.status();
        let body = copy_body(response, self.config.copy_chunk_size).await?;

        debug!(%url, status = status.as_u16(), bytes = body.len(), "response buffered");
        Ok(body)
    }

    fn to_transport(&self, request: HttpRequest) -> reqwest::RequestBuilder {
        let method = match request.method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
        };
        let mut builder = self.http.request(method, request.url);
        for (name, value) in request.headers {
            builder = builder.header(name, value);
        }
        if request.keep_alive {
            builder = builder.header(reqwest::header::CONNECTION, "keep-alive");
        }
        // CredentialMode::TransportDefault: the transport's own defaults apply,
        // nothing from `self.credentials` is attached.
        if let Some(body) = request.body {
            builder = builder.body(body);
        }
        builder
    }

    fn log_http_error(&self, action: &str, err: &Error) {
        let status = err.transport_status().unwrap_or(TransportStatus::UnknownError);
        self.sink.log_error(
            None,
            format_args!(
                "Failed to {action} for account '{}'. Request status is '{status}'",
                self.credentials.account_name()
            ),
        );
    }

    fn log_parse_report_error(&self, raw: &[u8], err: &(dyn StdError + 'static)) {
        let raw_export = String::from_utf8_lossy(raw);
        self.sink.log_error(
            Some(err),
            format_args!(
                "Failed to parse file for account '{}':\n{raw_export}",
                self.credentials.account_name()
            ),
        );
    }
}

impl std::fmt::Debug for WebRequestService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebRequestService")
            .field("credentials", &self.credentials)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Copy the whole response body into memory, `chunk_size` bytes per read.
async fn copy_body(response: reqwest::Response, chunk_size: usize) -> Result<Vec<u8>> {
    let stream = response.bytes_stream().map_err(io::Error::other);
    let mut reader = StreamReader::new(Box::pin(stream));
    let mut body = Vec::new();
    let mut chunk = vec![0u8; chunk_size];
    loop {
        let read = reader.read(&mut chunk).await.map_err(body_read_error)?;
        if read == 0 {
            break;
        }
        body.extend_from_slice(&chunk[..read]);
    }
    Ok(body)
}

/// Recover the `reqwest::Error` that `StreamReader` wrapped in an `io::Error`.
fn body_read_error(err: io::Error) -> Error {
    if !err.get_ref().is_some_and(|inner| inner.is::<reqwest::Error>()) {
        return Error::Io(err);
    }
    match err.into_inner().map(|inner| inner.downcast::<reqwest::Error>()) {
        Some(Ok(inner)) => Error::Transport(*inner),
        Some(Err(inner)) => Error::Io(io::Error::other(inner)),
        None => Error::Io(io::Error::other("response body read failed")),
    }
}

fn block_on<F: Future>(future: F) -> Result<F::Output> {
    if tokio::runtime::Handle::try_current().is_ok() {
        return Err(Error::BlockingInAsyncContext);
    }
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(Error::Runtime)?;
    Ok(runtime.block_on(future))
}
