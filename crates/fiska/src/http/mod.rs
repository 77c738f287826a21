//! HTTP transport and interceptor pipeline
//!
//! This module is the single chokepoint for every outbound call: URL
//! construction, the ordered request/response/error interceptor chains,
//! and the mapping of transport- and server-level failures into the typed
//! [`Error`](crate::Error).

pub use interceptor::{
    ErrorInterceptor, RateLimitInterceptor, RequestInterceptor, ResponseInterceptor,
    TracingInterceptor,
};
pub use transport::{RequestConfig, Transport, TransportBuilder};

pub mod interceptor;
mod transport;

// Re-export HTTP types from the http crate for convenience
pub use http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode};
