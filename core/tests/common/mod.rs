//! Shared fixtures: a live mock server and a sink that records every call.

#![allow(dead_code)]

use std::error::Error as StdError;
use std::fmt;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use teapplix_core::{DiagnosticSink, TeapplixCredentials, WebRequestService};
use url::Url;

pub const ACCOUNT: &str = "acme-outfitters";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggedStream {
    pub label: String,
    pub account: String,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggedError {
    pub cause: Option<String>,
    pub message: String,
}

#[derive(Default)]
pub struct RecordingSink {
    streams: Mutex<Vec<LoggedStream>>,
    errors: Mutex<Vec<LoggedError>>,
}

impl RecordingSink {
    pub fn streams(&self) -> Vec<LoggedStream> {
        self.streams.lock().unwrap().clone()
    }

    pub fn errors(&self) -> Vec<LoggedError> {
        self.errors.lock().unwrap().clone()
    }
}

impl DiagnosticSink for RecordingSink {
    fn log_stream(&self, label: &str, account: &str, data: &[u8]) {
        self.streams.lock().unwrap().push(LoggedStream {
            label: label.to_string(),
            account: account.to_string(),
            data: data.to_vec(),
        });
    }

    fn log_error(&self, error: Option<&(dyn StdError + 'static)>, message: fmt::Arguments<'_>) {
        self.errors.lock().unwrap().push(LoggedError {
            cause: error.map(|e| e.to_string()),
            message: message.to_string(),
        });
    }
}

/// Start the mock server on a random port in a background thread.
pub fn spawn_server() -> SocketAddr {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    addr
}

/// An address nothing listens on.
pub fn closed_addr() -> SocketAddr {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap()
}

pub fn url(addr: SocketAddr, path: &str) -> Url {
    Url::parse(&format!("http://{addr}{path}")).unwrap()
}

pub fn service() -> (WebRequestService, Arc<RecordingSink>) {
    let sink = Arc::new(RecordingSink::default());
    let creds = TeapplixCredentials::new(ACCOUNT, "ops@acme.test", "secret").unwrap();
    let svc = WebRequestService::new(creds).unwrap().with_sink(sink.clone());
    (svc, sink)
}

/// A multipart body carrying an inventory CSV, delimited by `boundary`.
pub fn inventory_body(boundary: &str, rows: &[(&str, &str)]) -> Vec<u8> {
    let mut body = format!(
        "--{boundary}\r\nContent-Disposition: form-data; name=\"upload\"; filename=\"inventory.csv\"\r\nContent-Type: text/csv\r\n\r\nSKU,Quantity\r\n"
    );
    for (sku, quantity) in rows {
        body.push_str(&format!("{sku},{quantity}\r\n"));
    }
    body.push_str(&format!("--{boundary}--\r\n"));
    body.into_bytes()
}
