//! Stand-in for the Teapplix upload and export endpoints.
//!
//! Uploads are answered with one `SKU,Status,Message` row per inventory line
//! found in the request body, and every upload is recorded so tests can
//! inspect the exact headers that went over the wire.

use std::{io, sync::Arc, time::Duration};

use axum::{
    body::{Body, Bytes},
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use futures::{stream, StreamExt};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};

/// Pause between the first body chunk and the dropped connection on `/aborted`.
const ABORT_DELAY: Duration = Duration::from_millis(100);

pub const EXPORT_HEADER: &str = "TxnId,Date,PaymentStatus,Name,Email,SKU,Quantity,Total,Currency";

pub const EXPORT_TWO_ORDERS: &str = "TxnId,Date,PaymentStatus,Name,Email,SKU,Quantity,Total,Currency\n\
TX-1001,2024/03/01,Completed,Jane Doe,jane@example.com,WIDGET-1,2,19.98,USD\n\
TX-1002,2024/03/02,Pending,John Roe,john@example.com,GADGET-7,1,45.00,USD\n";

/// Export cut off in the middle of its second row.
pub const EXPORT_CORRUPT: &str = "TxnId,Date,PaymentStatus,Name,Email,SKU,Quantity,Total,Currency\n\
TX-1001,2024/03/01,Completed,Jane Doe,jane@example.com,WIDGET-1,2,19.98,USD\n\
TX-1002,2024/03/02,Pend";

/// What the server saw for one upload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceivedUpload {
    pub content_type: Option<String>,
    pub connection: Option<String>,
    pub body_len: usize,
}

pub type Uploads = Arc<RwLock<Vec<ReceivedUpload>>>;

pub fn app() -> Router {
    let uploads: Uploads = Arc::new(RwLock::new(Vec::new()));
    Router::new()
        .route("/upload", get(list_uploads).post(upload))
        .route("/export", get(|| async { csv(EXPORT_TWO_ORDERS) }))
        .route("/export/corrupt", get(|| async { csv(EXPORT_CORRUPT) }))
        .route("/status/{code}", get(status).post(status))
        .route("/aborted", get(aborted).post(aborted))
        .with_state(uploads)
}

pub async fn run(listener: TcpListener) -> Result<(), io::Error> {
    axum::serve(listener, app()).await
}

fn csv(body: &'static str) -> Response {
    ([(header::CONTENT_TYPE, "text/csv")], body).into_response()
}

fn header_value(headers: &HeaderMap, name: header::HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

async fn upload(State(uploads): State<Uploads>, headers: HeaderMap, body: Bytes) -> Response {
    let received = ReceivedUpload {
        content_type: header_value(&headers, header::CONTENT_TYPE),
        connection: header_value(&headers, header::CONNECTION),
        body_len: body.len(),
    };
    tracing::info!(?received, "upload received");
    let accepted = received
        .content_type
        .as_deref()
        .is_some_and(|ct| ct.starts_with("multipart/form-data boundary="));
    uploads.write().await.push(received);

    if !accepted {
        return (StatusCode::UNSUPPORTED_MEDIA_TYPE, "expected multipart/form-data").into_response();
    }
    csv_owned(upload_report(&String::from_utf8_lossy(&body)))
}

fn csv_owned(body: String) -> Response {
    ([(header::CONTENT_TYPE, "text/csv")], body).into_response()
}

/// One result row per `SKU,Quantity` line of the uploaded inventory file.
pub fn upload_report(body: &str) -> String {
    let mut report = String::from("SKU,Status,Message\n");
    for line in body.lines().map(str::trim) {
        let Some((sku, quantity)) = line.split_once(',') else {
            continue;
        };
        if line.starts_with("--") || sku.eq_ignore_ascii_case("SKU") {
            continue;
        }
        match quantity.trim().parse::<u32>() {
            Ok(_) => report.push_str(&format!("{sku},Success,\n")),
            Err(_) => report.push_str(&format!("{sku},Failed,Invalid quantity\n")),
        }
    }
    report
}

async fn list_uploads(State(uploads): State<Uploads>) -> Json<Vec<ReceivedUpload>> {
    Json(uploads.read().await.clone())
}

async fn status(Path(code): Path<u16>) -> Result<&'static str, StatusCode> {
    match StatusCode::from_u16(code) {
        Ok(status) if status.is_success() => Ok("ok"),
        Ok(status) => Err(status),
        Err(_) => Err(StatusCode::BAD_REQUEST),
    }
}

/// Sends the response head and the start of a body, pauses so both reach
/// the client, then drops the connection.
async fn aborted() -> Response {
    let head = stream::once(async { Ok::<_, io::Error>(Bytes::from_static(b"SKU,Status,Message\n")) });
    let cut = stream::once(async {
        tokio::time::sleep(ABORT_DELAY).await;
        Err::<Bytes, _>(io::Error::other("connection dropped"))
    });
    Body::from_stream(head.chain(cut)).into_response()
}
