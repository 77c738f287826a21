//! The HTTP transport

use std::sync::Arc;
use std::time::Duration;

use http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use url::Url;
use uuid::Uuid;

use super::interceptor::{ErrorInterceptor, RequestInterceptor, ResponseInterceptor};
use crate::error::{Error, Result};
use crate::query::encode_pairs;

/// A mutable request descriptor, as seen by request interceptors.
///
/// `RequestConfig` values are never shared across calls, so interceptors may
/// replace any part of the request without synchronization.
#[derive(Debug, Clone)]
pub struct RequestConfig {
    /// HTTP method.
    pub method: Method,
    /// Path relative to the base URL, e.g. `companies/1/contacts`.
    pub path: String,
    /// Pre-encoded query pairs, appended in order.
    pub query: Vec<(String, String)>,
    /// JSON body, omitted for GET/DELETE unless explicitly supplied.
    pub body: Option<Value>,
    /// Per-request headers, overriding transport defaults on conflict.
    pub headers: HeaderMap,
    /// Per-request timeout override.
    pub timeout: Option<Duration>,
}

impl RequestConfig {
    /// Create a request descriptor for the given method and path.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            headers: HeaderMap::new(),
            timeout: None,
        }
    }

    /// Set the query pairs.
    pub fn query(mut self, query: Vec<(String, String)>) -> Self {
        self.query = query;
        self
    }

    /// Set the JSON body.
    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Set a header, returning an error for an invalid name or value.
    pub fn header(mut self, key: &str, value: &str) -> Result<Self> {
        let key: HeaderName = key
            .parse()
            .map_err(|_| Error::InvalidHeader(key.to_string()))?;
        let value: HeaderValue = value
            .parse()
            .map_err(|_| Error::InvalidHeader(value.to_string()))?;
        self.headers.insert(key, value);
        Ok(self)
    }

    /// Override the transport's default timeout for this request.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// The single chokepoint for every outbound call.
///
/// Owns the base URL, default timeout and headers, and the three ordered
/// interceptor chains. All chains run strictly in registration order.
/// The transport itself never retries and never caches; retry policy, if
/// any, belongs to a caller-supplied interceptor.
pub struct Transport {
    http: reqwest::Client,
    base_url: Url,
    timeout: Duration,
    default_headers: HeaderMap,
    request_interceptors: Vec<Arc<dyn RequestInterceptor>>,
    response_interceptors: Vec<Arc<dyn ResponseInterceptor>>,
    error_interceptors: Vec<Arc<dyn ErrorInterceptor>>,
}

impl std::fmt::Debug for Transport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transport")
            .field("base_url", &self.base_url.as_str())
            .field("timeout", &self.timeout)
            .field("request_interceptors", &self.request_interceptors.len())
            .field("response_interceptors", &self.response_interceptors.len())
            .field("error_interceptors", &self.error_interceptors.len())
            .finish()
    }
}

impl Transport {
    /// Create a new builder.
    pub fn builder() -> TransportBuilder {
        TransportBuilder::default()
    }

    /// The configured base URL (always with a trailing slash).
    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Append a request interceptor; interceptors run in registration order.
    pub fn add_request_interceptor(&mut self, interceptor: Arc<dyn RequestInterceptor>) {
        self.request_interceptors.push(interceptor);
    }

    /// Append a response interceptor; interceptors run in registration order.
    pub fn add_response_interceptor(&mut self, interceptor: Arc<dyn ResponseInterceptor>) {
        self.response_interceptors.push(interceptor);
    }

    /// Append an error interceptor; interceptors run in registration order.
    pub fn add_error_interceptor(&mut self, interceptor: Arc<dyn ErrorInterceptor>) {
        self.error_interceptors.push(interceptor);
    }

    /// Perform a request: fold request interceptors, send, map failures to
    /// the typed error, fold response interceptors over the parsed body.
    ///
    /// Every failure path folds the error interceptors before propagating.
    pub async fn request(&self, config: RequestConfig) -> Result<Value> {
        match self.execute(config).await {
            Ok(body) => Ok(body),
            Err(mut error) => {
                for interceptor in &self.error_interceptors {
                    error = interceptor.call(error).await;
                }
                Err(error)
            }
        }
    }

    async fn execute(&self, mut config: RequestConfig) -> Result<Value> {
        for interceptor in &self.request_interceptors {
            config = interceptor.call(config).await?;
        }

        let mut url = self
            .base_url
            .join(config.path.trim_start_matches('/'))
            .map_err(|e| Error::InvalidUrl(format!("path '{}': {e}", config.path)))?;
        if !config.query.is_empty() {
            url.set_query(Some(&encode_pairs(&config.query)));
        }

        let timeout = config.timeout.unwrap_or(self.timeout);
        let request_id = Uuid::new_v4();

        let mut headers = self.default_headers.clone();
        headers.extend(config.headers);

        let mut request = self
            .http
            .request(config.method.clone(), url.clone())
            .timeout(timeout)
            .headers(headers)
            .header("x-request-id", request_id.to_string());
        if let Some(body) = &config.body {
            request = request.json(body);
        }

        tracing::debug!(
            method = %config.method,
            url = %url,
            %request_id,
            "sending request"
        );

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                Error::Timeout(timeout)
            } else {
                Error::Connection(e.to_string())
            }
        })?;

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| Error::Connection(e.to_string()))?;

        tracing::debug!(status = %status, %request_id, "received response");

        if !status.is_success() {
            return Err(Error::from_response(
                status.as_u16(),
                &String::from_utf8_lossy(&bytes),
            ));
        }

        let mut body = if status == StatusCode::NO_CONTENT || bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).map_err(|e| {
                Error::Decode(format!("response body is not valid JSON: {e}"))
            })?
        };

        for interceptor in &self.response_interceptors {
            body = interceptor.call(status, &headers, body).await?;
        }

        Ok(body)
    }

    /// GET with query parameters.
    pub async fn get(&self, path: &str, query: Vec<(String, String)>) -> Result<Value> {
        self.request(RequestConfig::new(Method::GET, path).query(query))
            .await
    }

    /// POST with an optional JSON body.
    pub async fn post(&self, path: &str, body: Option<Value>) -> Result<Value> {
        let mut config = RequestConfig::new(Method::POST, path);
        if let Some(body) = body {
            config = config.body(body);
        }
        self.request(config).await
    }

    /// PUT with a JSON body.
    pub async fn put(&self, path: &str, body: Value) -> Result<Value> {
        self.request(RequestConfig::new(Method::PUT, path).body(body))
            .await
    }

    /// PATCH with a JSON body.
    pub async fn patch(&self, path: &str, body: Value) -> Result<Value> {
        self.request(RequestConfig::new(Method::PATCH, path).body(body))
            .await
    }

    /// DELETE without a body.
    pub async fn delete(&self, path: &str) -> Result<Value> {
        self.request(RequestConfig::new(Method::DELETE, path)).await
    }
}

/// Builder for a configured [`Transport`].
#[derive(Default)]
pub struct TransportBuilder {
    base_url: Option<String>,
    timeout: Option<Duration>,
    bearer_token: Option<SecretString>,
    default_headers: HeaderMap,
}

impl TransportBuilder {
    /// Set the base URL. A trailing slash is added when missing so request
    /// paths join relative to the full prefix.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Set the default timeout for requests.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the bearer token installed as the `authorization` default header.
    pub fn bearer_token(mut self, token: SecretString) -> Self {
        self.bearer_token = Some(token);
        self
    }

    /// Replace the default header map wholesale.
    pub fn default_headers(mut self, headers: HeaderMap) -> Self {
        self.default_headers = headers;
        self
    }

    /// Add a default header sent with every request.
    pub fn header(mut self, key: &str, value: &str) -> Result<Self> {
        let key: HeaderName = key
            .parse()
            .map_err(|_| Error::InvalidHeader(key.to_string()))?;
        let value: HeaderValue = value
            .parse()
            .map_err(|_| Error::InvalidHeader(value.to_string()))?;
        self.default_headers.insert(key, value);
        Ok(self)
    }

    /// Build the transport.
    pub fn build(self) -> Result<Transport> {
        let timeout = self.timeout.unwrap_or(Duration::from_secs(30));

        let base_url_string = self
            .base_url
            .unwrap_or_else(|| crate::DEFAULT_BASE_URL.to_string());
        if base_url_string.trim().is_empty() {
            return Err(Error::InvalidUrl("base URL cannot be empty".to_string()));
        }
        let mut base_url: Url = base_url_string
            .parse()
            .map_err(|e| Error::InvalidUrl(format!("{e}")))?;
        match base_url.scheme() {
            "http" | "https" => {}
            scheme => {
                return Err(Error::InvalidUrl(format!(
                    "invalid URL scheme '{scheme}', only http and https are supported"
                )));
            }
        }
        if !base_url.path().ends_with('/') {
            base_url.set_path(&format!("{}/", base_url.path()));
        }

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(format!("fiska-rust/{}", crate::VERSION))
            .build()
            .map_err(|e| Error::Connection(e.to_string()))?;

        let mut default_headers = self.default_headers;
        default_headers.insert(
            http::header::ACCEPT,
            HeaderValue::from_static("application/json"),
        );
        if let Some(token) = &self.bearer_token {
            let mut value =
                HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
                    .map_err(|_| Error::InvalidHeader("authorization".to_string()))?;
            value.set_sensitive(true);
            default_headers.insert(http::header::AUTHORIZATION, value);
        }

        Ok(Transport {
            http,
            base_url,
            timeout,
            default_headers,
            request_interceptors: Vec::new(),
            response_interceptors: Vec::new(),
            error_interceptors: Vec::new(),
        })
    }
}
