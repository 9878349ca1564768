//! # dashdeck-adapter-http-reqwest
//!
//! Fetches widget envelopes from `GET {base_url}/api/widget/{name}` with
//! [reqwest](https://docs.rs/reqwest).
//!
//! The HTTP status code is not inspected: whatever the endpoint answers is
//! decoded as a [`WidgetEnvelope`]. Only unreachable endpoints and
//! undecodable bodies are reported as [`TransportError`]s. Requests time out
//! after [`DEFAULT_TIMEOUT`] unless another timeout is given, so a hung
//! endpoint leaves the widget `offline` instead of stale.

use std::future::Future;
use std::time::Duration;

use dashdeck_app::ports::WidgetSource;
use dashdeck_domain::envelope::WidgetEnvelope;
use dashdeck_domain::error::TransportError;
use dashdeck_domain::widget::WidgetName;

/// Time allowed for one widget request, body included.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors raised while talking to the widget endpoint.
#[derive(Debug, thiserror::Error)]
pub enum HttpSourceError {
    #[error("cannot build http client")]
    Client(#[source] reqwest::Error),

    #[error("invalid base url {url:?}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The request could not be sent or the body could not be read.
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The body was not a widget envelope.
    #[error("invalid response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

impl From<HttpSourceError> for TransportError {
    fn from(err: HttpSourceError) -> Self {
        Self::new(err)
    }
}

/// [`WidgetSource`] backed by a shared [`reqwest::Client`].
#[derive(Debug, Clone)]
pub struct HttpWidgetSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpWidgetSource {
    /// Create a source for the server at `base_url` (e.g. `http://127.0.0.1:3000`).
    ///
    /// # Errors
    ///
    /// Returns [`HttpSourceError::InvalidBaseUrl`] if `base_url` is not an
    /// absolute URL.
    pub fn new(base_url: impl Into<String>) -> Result<Self, HttpSourceError> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    /// Same as [`new`](Self::new) with requests abandoned after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`HttpSourceError`] if the client cannot be built or
    /// `base_url` is not an absolute URL.
    pub fn with_timeout(
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, HttpSourceError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(HttpSourceError::Client)?;
        Self::with_client(client, base_url)
    }

    /// Same as [`new`](Self::new) with a caller-provided client.
    ///
    /// # Errors
    ///
    /// Returns [`HttpSourceError::InvalidBaseUrl`] if `base_url` is not an
    /// absolute URL.
    pub fn with_client(
        client: reqwest::Client,
        base_url: impl Into<String>,
    ) -> Result<Self, HttpSourceError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        if let Err(source) = client.get(&base_url).build() {
            return Err(HttpSourceError::InvalidBaseUrl {
                url: base_url,
                source,
            });
        }
        Ok(Self { client, base_url })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn widget_url(&self, name: &WidgetName) -> String {
        format!("{}/api/widget/{name}", self.base_url)
    }

    async fn get(&self, url: String) -> Result<WidgetEnvelope, HttpSourceError> {
        let response = match self.client.get(&url).send().await {
            Ok(response) => response,
            Err(source) => return Err(HttpSourceError::Request { url, source }),
        };
        tracing::debug!(%url, status = %response.status(), "widget response");
        match response.json::<WidgetEnvelope>().await {
            Ok(envelope) => Ok(envelope),
            Err(source) => Err(HttpSourceError::Decode { url, source }),
        }
    }
}

impl WidgetSource for HttpWidgetSource {
    fn fetch(
        &self,
        name: &WidgetName,
    ) -> impl Future<Output = Result<WidgetEnvelope, TransportError>> + Send {
        let url = self.widget_url(name);
        async move { Ok(self.get(url).await?) }
    }
}
