use std::borrow::Cow;
use std::future::Future;
use std::time::Duration;

use bytes::Bytes;

use reqwest::header::{ACCEPT, CONTENT_TYPE};

use serde_json::Value;

use crate::error::{Error, ErrorKind, Result};

pub use reqwest::Method;

const JSON_CONTENT_TYPE: &str = "application/json";

const DEFAULT_USER_AGENT: &str = concat!("vmanage-client/", env!("CARGO_PKG_VERSION"));

/// A response received from a controller.
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body decoded as JSON.
    ///
    /// An empty body is decoded as [`Value::Null`].
    pub json: Value,
}

impl RawResponse {
    /// Creates a [`RawResponse`].
    #[must_use]
    pub const fn new(status: u16, json: Value) -> Self {
        Self { status, json }
    }
}

/// A transport sending requests to a controller.
///
/// A transport owns everything related to the connection: authentication,
/// TLS, and timeouts. Non-successful HTTP statuses and connection failures
/// must be returned as errors.
pub trait Transport {
    /// Sends a request with an optional JSON-encoded payload and returns
    /// the decoded response.
    fn request(
        &self,
        method: Method,
        url: &str,
        payload: Option<String>,
    ) -> impl Future<Output = Result<RawResponse>> + Send;
}

/// Configuration of a [`ReqwestTransport`].
#[derive(Debug, Clone, PartialEq)]
pub struct TransportConfig {
    timeout: Option<Duration>,
    accept_invalid_certs: bool,
    user_agent: Cow<'static, str>,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl TransportConfig {
    /// Creates a [`TransportConfig`] without timeout, accepting only valid
    /// certificates.
    #[must_use]
    #[inline]
    pub const fn new() -> Self {
        Self {
            timeout: None,
            accept_invalid_certs: false,
            user_agent: Cow::Borrowed(DEFAULT_USER_AGENT),
        }
    }

    /// Sets the timeout of each request.
    #[must_use]
    #[inline]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Accepts invalid certificates, such as the self-signed ones
    /// installed by default on a controller.
    #[must_use]
    #[inline]
    pub const fn accept_invalid_certs(mut self, accept_invalid_certs: bool) -> Self {
        self.accept_invalid_certs = accept_invalid_certs;
        self
    }

    /// Sets the user agent sent with each request.
    #[must_use]
    #[inline]
    pub fn user_agent(mut self, user_agent: impl Into<Cow<'static, str>>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    fn build(&self) -> Result<reqwest::Client> {
        let mut builder = reqwest::Client::builder()
            .danger_accept_invalid_certs(self.accept_invalid_certs)
            .user_agent(self.user_agent.as_ref());

        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        builder.build().map_err(|e| {
            Error::new(
                ErrorKind::Transport,
                format!("Impossible to build the HTTP client: {e}"),
            )
        })
    }
}

/// A [`Transport`] based on a [`reqwest::Client`].
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Creates a [`ReqwestTransport`] from a [`TransportConfig`].
    ///
    /// # Errors
    ///
    /// An error is returned when the TLS backend cannot be initialized.
    pub fn new(config: &TransportConfig) -> Result<Self> {
        Ok(Self {
            client: config.build()?,
        })
    }

    /// Creates a [`ReqwestTransport`] from an existing [`reqwest::Client`],
    /// for example one already holding an authenticated session.
    #[must_use]
    #[inline]
    pub const fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

fn decode_body(body: &Bytes) -> Result<Value> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }

    serde_json::from_slice(body)
        .map_err(|e| Error::new(ErrorKind::JsonResponse, format!("Json error caused by {e}")))
}

impl Transport for ReqwestTransport {
    async fn request(
        &self,
        method: Method,
        url: &str,
        payload: Option<String>,
    ) -> Result<RawResponse> {
        let mut request = self
            .client
            .request(method.clone(), url)
            .header(ACCEPT, JSON_CONTENT_TYPE);

        if let Some(payload) = payload {
            request = request.header(CONTENT_TYPE, JSON_CONTENT_TYPE).body(payload);
        }

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::new(
                ErrorKind::Status,
                format!("{method} {url} failed with {status}: {body}"),
            ));
        }

        let body = response.bytes().await?;

        Ok(RawResponse::new(status.as_u16(), decode_body(&body)?))
    }
}
