use reqwest::Url;

use tracing::debug;

use crate::definitions::PolicyDefinitions;
use crate::device::DeviceInventory;
use crate::error::{Error, ErrorKind, Result};
use crate::transport::{Method, RawResponse, Transport};

/// The default HTTPS port of a controller.
pub const DEFAULT_PORT: u16 = 443;

fn base_url(host: &str, port: u16) -> String {
    format!("https://{host}:{port}/dataservice/")
}

/// A client for the `dataservice` API of a controller.
///
/// The client owns the controller address and the [`Transport`] used to
/// reach it. Requests are always sent one at a time: each of them completes
/// before the next one starts.
#[derive(Debug)]
pub struct Client<T: Transport> {
    host: String,
    port: u16,
    base_url: String,
    transport: T,
}

impl<T: Transport> Client<T> {
    /// Creates a [`Client`] for the controller at the given host, reachable
    /// on the [`DEFAULT_PORT`].
    #[must_use]
    pub fn new(host: impl Into<String>, transport: T) -> Self {
        let host = host.into();
        Self {
            base_url: base_url(&host, DEFAULT_PORT),
            host,
            port: DEFAULT_PORT,
            transport,
        }
    }

    /// Sets the controller port.
    #[must_use]
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self.base_url = base_url(&self.host, port);
        self
    }

    /// Returns the controller host.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns the controller port.
    #[must_use]
    pub const fn controller_port(&self) -> u16 {
        self.port
    }

    /// Returns the base URL of the `dataservice` API.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the [`Transport`].
    #[must_use]
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Returns the policy definitions API.
    #[must_use]
    pub const fn policy_definitions(&self) -> PolicyDefinitions<'_, T> {
        PolicyDefinitions::new(self)
    }

    /// Returns the device inventory API.
    #[must_use]
    pub const fn devices(&self) -> DeviceInventory<'_, T> {
        DeviceInventory::new(self)
    }

    pub(crate) async fn send(
        &self,
        method: Method,
        api: &str,
        payload: Option<String>,
    ) -> Result<RawResponse> {
        let url = format!("{}{api}", self.base_url);
        self.request(method, &url, payload).await
    }

    #[inline]
    pub(crate) async fn get(&self, api: &str) -> Result<RawResponse> {
        self.send(Method::GET, api, None).await
    }

    // Query values are form-encoded, so `#`, `&` and spaces stay inside
    // their own parameter.
    pub(crate) async fn get_query(
        &self,
        api: &str,
        query: &[(&str, &str)],
    ) -> Result<RawResponse> {
        let mut url = Url::parse(&format!("{}{api}", self.base_url)).map_err(|e| {
            Error::new(
                ErrorKind::InvalidInput,
                format!("Invalid URL for `{}{api}`: {e}", self.base_url),
            )
        })?;
        let _ = url.query_pairs_mut().extend_pairs(query);
        self.request(Method::GET, url.as_str(), None).await
    }

    async fn request(
        &self,
        method: Method,
        url: &str,
        payload: Option<String>,
    ) -> Result<RawResponse> {
        debug!("{method} {url}");
        self.transport.request(method, url, payload).await
    }
}
