mod envelope;

use std::time::Duration;

use reqwest::{Method, StatusCode, Url};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

pub use envelope::Envelope;

pub const DEFAULT_BASE_URL: &str = "https://dashtar-new.vercel.app";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request to {url} failed: {source}")]
    Network {
        url: String,
        timed_out: bool,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} answered HTTP {status}")]
    Http { url: String, status: StatusCode },

    #[error("unexpected response from {url}: {message}")]
    Decode { url: String, message: String },

    #[error("invalid {field}: {message}")]
    Validation { field: String, message: String },

    #[error("failed to build HTTP client: {source}")]
    ClientBuild {
        #[source]
        source: reqwest::Error,
    },

    #[error("invalid base URL '{url}': {message}")]
    BaseUrl { url: String, message: String },
}

impl ApiError {
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        ApiError::Validation {
            field: field.to_string(),
            message: message.into(),
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, ApiError::Network { timed_out: true, .. })
    }
}

/// A REST path plus the envelope its payload arrives in.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Endpoint {
    pub path: String,
    pub envelope: Envelope,
}

impl Endpoint {
    pub fn new(path: &str, envelope: Envelope) -> Self {
        Self {
            path: path.to_string(),
            envelope,
        }
    }
}

/// Result of a collection fetch that never fails outright: on any error the
/// records are empty and the error is carried alongside for display.
#[derive(Debug, Default)]
pub struct FetchOutcome {
    pub records: Vec<Value>,
    pub error: Option<ApiError>,
}

impl FetchOutcome {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

#[derive(Clone, Debug)]
pub struct ClientOptions {
    pub base_url: String,
    pub timeout_secs: u64,
    pub proxy: Option<String>,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            proxy: None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    pub fn new(options: &ClientOptions) -> Result<Self, ApiError> {
        let base_url = Url::parse(options.base_url.trim()).map_err(|e| ApiError::BaseUrl {
            url: options.base_url.clone(),
            message: e.to_string(),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::BaseUrl {
                url: options.base_url.clone(),
                message: "URL cannot be used as a base".to_string(),
            });
        }

        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::USER_AGENT,
            reqwest::header::HeaderValue::from_static(concat!(
                "fleetdesk/",
                env!("CARGO_PKG_VERSION")
            )),
        );
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static("application/json"),
        );

        let mut builder = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(options.timeout_secs.max(1)));
        if let Some(proxy) = options.proxy.as_deref().filter(|p| !p.trim().is_empty()) {
            let proxy = reqwest::Proxy::all(proxy)
                .map_err(|source| ApiError::ClientBuild { source })?;
            builder = builder.proxy(proxy);
        }
        let client = builder
            .build()
            .map_err(|source| ApiError::ClientBuild { source })?;
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `path` is split on `/`; each extra segment is percent-encoded as one
    /// path segment, so ids cannot escape their position.
    pub fn url_for(&self, path: &str, extra_segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|_| ApiError::BaseUrl {
                url: self.base_url.to_string(),
                message: "URL cannot be used as a base".to_string(),
            })?;
            segments.pop_if_empty();
            segments.extend(path.split('/').filter(|s| !s.is_empty()));
            segments.extend(extra_segments);
        }
        Ok(url)
    }

    async fn send(&self, method: Method, url: Url, body: Option<&Value>) -> Result<String, ApiError> {
        debug!(%method, %url, "sending request");
        let mut request = self.client.request(method, url.clone());
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send().await.map_err(|source| ApiError::Network {
            url: url.to_string(),
            timed_out: source.is_timeout(),
            source,
        })?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Http {
                url: url.to_string(),
                status,
            });
        }
        response.text().await.map_err(|source| ApiError::Network {
            url: url.to_string(),
            timed_out: source.is_timeout(),
            source,
        })
    }

    async fn get_json(&self, url: Url) -> Result<Value, ApiError> {
        let text = self.send(Method::GET, url.clone(), None).await?;
        serde_json::from_str(&text).map_err(|e| ApiError::Decode {
            url: url.to_string(),
            message: format!("body is not valid JSON: {e}"),
        })
    }

    pub async fn try_fetch_collection(&self, endpoint: &Endpoint) -> Result<Vec<Value>, ApiError> {
        let url = self.url_for(&endpoint.path, &[])?;
        let body = self.get_json(url.clone()).await?;
        endpoint
            .envelope
            .unwrap_collection(body)
            .map_err(|message| ApiError::Decode {
                url: url.to_string(),
                message,
            })
    }

    /// Collection Fetcher boundary: errors are logged and handed back next to
    /// an empty record list, never raised.
    pub async fn fetch_collection(&self, endpoint: &Endpoint) -> FetchOutcome {
        match self.try_fetch_collection(endpoint).await {
            Ok(records) => {
                debug!(path = %endpoint.path, count = records.len(), "fetched collection");
                FetchOutcome {
                    records,
                    error: None,
                }
            }
            Err(e) => {
                warn!(
                    path = %endpoint.path,
                    envelope = %endpoint.envelope.label(),
                    error = %e,
                    "collection fetch failed"
                );
                FetchOutcome {
                    records: Vec::new(),
                    error: Some(e),
                }
            }
        }
    }

    /// A single record in a `{success, <key>: {...}}` envelope.
    pub async fn fetch_record(
        &self,
        path: &str,
        id: &str,
        envelope: Envelope,
    ) -> Result<Value, ApiError> {
        let url = self.url_for(path, &[id])?;
        let body = self.get_json(url.clone()).await?;
        envelope
            .unwrap_record(body)
            .map_err(|message| ApiError::Decode {
                url: url.to_string(),
                message,
            })
    }

    /// A bare top-level JSON object, as the dashboard summary is served.
    pub async fn fetch_document(&self, path: &str) -> Result<Value, ApiError> {
        let url = self.url_for(path, &[])?;
        match self.get_json(url.clone()).await? {
            doc @ Value::Object(_) => Ok(doc),
            _ => Err(ApiError::Decode {
                url: url.to_string(),
                message: "expected a JSON object".to_string(),
            }),
        }
    }

    /// Issues exactly one request and ignores the response body.
    pub async fn execute(
        &self,
        method: Method,
        path: &str,
        id: &str,
        body: Option<&Value>,
    ) -> Result<(), ApiError> {
        let url = self.url_for(path, &[id])?;
        self.send(method, url, body).await.map(|_| ())
    }
}
