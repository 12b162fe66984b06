//! HTTP transport implementation using `reqwest`.

use std::time::Duration;

use reqwest::Url;
use reqwest::header::{CONTENT_TYPE, HeaderValue};
use tokio::time::Instant;

use crate::{Method, RawResponse, Request, RequestId, Transport, TransportError};

/// Settings for the HTTP client.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Base address of the session service, e.g. `http://localhost:8080`.
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Value of the `User-Agent` header.
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            timeout: Duration::from_secs(30),
            user_agent: format!("tokengate/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// A [`Transport`] that talks HTTP/1.1 to the session service.
///
/// The underlying `reqwest::Client` pools connections, so one
/// `HttpTransport` should be built and shared for the whole process.
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpTransport {
    /// Builds the HTTP client.
    ///
    /// # Errors
    /// Returns [`TransportError::Setup`] if the base URL is not an
    /// absolute `http(s)` URL, carries a query or fragment, or the client
    /// cannot be constructed.
    pub fn new(config: HttpConfig) -> Result<Self, TransportError> {
        let base_url = Url::parse(&config.base_url).map_err(|e| {
            TransportError::Setup(format!("invalid base url {:?}: {e}", config.base_url))
        })?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(TransportError::Setup(format!(
                "base url must be http:// or https://, got {:?}",
                config.base_url
            )));
        }
        if base_url.query().is_some() || base_url.fragment().is_some() {
            return Err(TransportError::Setup(format!(
                "base url must not carry a query or fragment, got {:?}",
                config.base_url
            )));
        }

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent)
            .build()
            .map_err(|e| TransportError::Setup(e.to_string()))?;

        tracing::debug!(%base_url, "HTTP transport ready");
        Ok(Self { client, base_url })
    }

    /// Returns the base address requests are resolved against.
    pub fn base_url(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }

    /// Appends `path` to the base URL's own path, segment by segment.
    fn url_for(&self, path: &str) -> Result<Url, TransportError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                TransportError::Setup(format!("{} cannot be a base url", self.base_url))
            })?
            .pop_if_empty()
            .extend(path.split('/').filter(|segment| !segment.is_empty()));
        Ok(url)
    }
}

impl Transport for HttpTransport {
    async fn send(
        &self,
        request: Request,
    ) -> Result<RawResponse, TransportError> {
        let id = RequestId::next();
        let url = self.url_for(request.path())?;
        let method = request.method();

        let mut builder = match method {
            Method::Get => self.client.get(url),
            Method::Post => self.client.post(url),
        };
        if !request.query().is_empty() {
            builder = builder.query(request.query());
        }
        if let Some(body) = request.body() {
            builder = builder
                .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
                .body(body.to_vec());
        }

        tracing::debug!(%id, %method, path = request.path(), "sending request");
        let start = Instant::now();

        let response = builder.send().await.map_err(|e| {
            tracing::debug!(%id, error = %e, "request did not complete");
            classify(e)
        })?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| TransportError::ReadBody(e.to_string()))?;
        let elapsed = start.elapsed();

        tracing::debug!(
            %id,
            status,
            elapsed_ms = elapsed.as_millis() as u64,
            "response received"
        );

        Ok(RawResponse {
            status,
            body: body.to_vec(),
            elapsed,
        })
    }
}

fn classify(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout
    } else {
        TransportError::RequestFailed(err.to_string())
    }
}
