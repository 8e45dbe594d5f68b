//! HTTP request descriptors for the Teapplix upload and export endpoints.
//!
//! # Design
//! Requests are described as plain data and only turned into transport calls
//! by `WebRequestService`. The builder never infers intent: the caller picks
//! `build_get_request` for retrievals and `build_post_request` for multipart
//! uploads.

use url::Url;
use uuid::Uuid;

use crate::error::{Error, Result};

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

/// Which identity the transport attaches to a request.
///
/// `TransportDefault` leaves authentication to whatever the configured
/// transport supplies on its own. `TeapplixCredentials` are never attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CredentialMode {
    #[default]
    None,
    TransportDefault,
}

/// An HTTP request described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: Url,
    pub headers: Vec<(String, String)>,
    pub keep_alive: bool,
    pub credential_mode: CredentialMode,
    pub body: Option<Vec<u8>>,
}

impl HttpRequest {
    /// Attach an already encoded body, e.g. the multipart payload of an upload.
    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Build a retrieval request for `url`.
pub fn build_get_request(url: &Url) -> HttpRequest {
    HttpRequest {
        method: HttpMethod::Get,
        url: url.clone(),
        headers: Vec::new(),
        keep_alive: false,
        credential_mode: CredentialMode::None,
        body: None,
    }
}

/// Build a multipart upload request for `url` delimited by `boundary`.
///
/// The content type is `multipart/form-data boundary=<token>` with no `;`
/// before `boundary=`; the remote endpoint accepts exactly this form.
pub fn build_post_request(url: &Url, boundary: &str) -> Result<HttpRequest> {
    if boundary.is_empty() {
        return Err(Error::InvalidRequest("multipart boundary must not be empty".to_string()));
    }
    if boundary.chars().any(|c| c.is_control()) {
        return Err(Error::InvalidRequest(format!(
            "multipart boundary {boundary:?} contains control characters"
        )));
    }

    Ok(HttpRequest {
        method: HttpMethod::Post,
        url: url.clone(),
        headers: vec![(
            "content-type".to_string(),
            format!("multipart/form-data boundary={boundary}"),
        )],
        keep_alive: true,
        credential_mode: CredentialMode::TransportDefault,
        body: None,
    })
}

/// Generate a fresh multipart boundary token.
pub fn multipart_boundary() -> String {
    format!("----------------{}", Uuid::new_v4().simple())
}
