//! Request, response, and error interceptors
//!
//! Interceptors are ordered lists of transforms applied around every call
//! the [`Transport`](super::Transport) makes. All three chains run strictly
//! in registration order. Auth-refresh-and-retry policies belong here, in
//! caller-supplied interceptors; the transport itself never retries.

use async_trait::async_trait;
use http::{HeaderMap, StatusCode};
use serde_json::Value;

use super::transport::RequestConfig;
use crate::error::{Error, Result};

/// Transforms the outgoing request descriptor before it is sent.
#[async_trait]
pub trait RequestInterceptor: Send + Sync {
    /// Mutate or replace the request; returning an error aborts the call.
    async fn call(&self, request: RequestConfig) -> Result<RequestConfig>;
}

/// Transforms the parsed response body before it reaches the caller.
#[async_trait]
pub trait ResponseInterceptor: Send + Sync {
    /// Receives the transport status/headers plus the already-parsed body.
    async fn call(&self, status: StatusCode, headers: &HeaderMap, body: Value) -> Result<Value>;
}

/// Observes or replaces a normalized error before it propagates.
#[async_trait]
pub trait ErrorInterceptor: Send + Sync {
    /// May return the error unchanged or substitute another.
    async fn call(&self, error: Error) -> Error;
}

/// Interceptor that logs requests and responses at debug level.
pub struct TracingInterceptor;

#[async_trait]
impl RequestInterceptor for TracingInterceptor {
    async fn call(&self, request: RequestConfig) -> Result<RequestConfig> {
        tracing::debug!(method = %request.method, path = %request.path, "outbound request");
        Ok(request)
    }
}

#[async_trait]
impl ResponseInterceptor for TracingInterceptor {
    async fn call(&self, status: StatusCode, _headers: &HeaderMap, body: Value) -> Result<Value> {
        tracing::debug!(status = %status, "inbound response");
        Ok(body)
    }
}

/// Request interceptor that applies a token-bucket rate limit.
pub struct RateLimitInterceptor {
    governor: std::sync::Arc<governor::DefaultDirectRateLimiter>,
}

impl RateLimitInterceptor {
    /// Create a rate limit of `requests_per_second`; values below 1 clamp
    /// to 1 request per second.
    pub fn new(requests_per_second: u32) -> Self {
        use governor::{Quota, RateLimiter};
        use std::num::NonZeroU32;

        let rate = NonZeroU32::new(requests_per_second).unwrap_or(NonZeroU32::MIN);
        let quota = Quota::per_second(rate);

        Self {
            governor: std::sync::Arc::new(RateLimiter::direct(quota)),
        }
    }
}

#[async_trait]
impl RequestInterceptor for RateLimitInterceptor {
    async fn call(&self, request: RequestConfig) -> Result<RequestConfig> {
        // Wait until the bucket allows another request.
        self.governor.until_ready().await;
        Ok(request)
    }
}
