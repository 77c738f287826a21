//! Client facade
//!
//! [`Client`] wires the transport and the tenant scope together and hands
//! out typed endpoints. Resource endpoints are built lazily on first
//! access and cached for the lifetime of the client; cloning a client is
//! cheap and shares everything.

use std::sync::{Arc, OnceLock};
use std::time::Duration;

use http::{HeaderMap, HeaderName, HeaderValue};
use secrecy::SecretString;

use crate::config::ClientConfig;
use crate::endpoint::{ApiResource, Endpoint};
use crate::error::{Error, Result};
use crate::http::{ErrorInterceptor, RequestInterceptor, ResponseInterceptor, Transport};
use crate::jobs::Trackables;
use crate::resources::{Contact, Invoice, Payment, Product};

struct ClientInner {
    transport: Arc<Transport>,
    company_id: u64,
    contacts: OnceLock<Endpoint<Contact>>,
    invoices: OnceLock<Endpoint<Invoice>>,
    products: OnceLock<Endpoint<Product>>,
    payments: OnceLock<Endpoint<Payment>>,
    trackables: OnceLock<Trackables>,
}

/// High-level API client, scoped to one company.
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("company_id", &self.inner.company_id)
            .field("base_url", &self.inner.transport.base_url())
            .finish()
    }
}

impl Client {
    /// Start building a client.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    /// Build a client from a [`ClientConfig`], typically one produced by
    /// [`ClientConfig::from_env`].
    pub fn from_config(config: ClientConfig) -> Result<Self> {
        let mut builder = Client::builder().timeout(config.timeout);
        if let Some(access_token) = config.access_token {
            builder = builder.access_token_secret(access_token);
        }
        if let Some(company_id) = config.company_id {
            builder = builder.company(company_id);
        }
        if let Some(base_url) = config.base_url {
            builder = builder.base_url(base_url);
        }
        builder.default_headers = config.default_headers;
        builder.build()
    }

    /// Convenience: [`ClientConfig::from_env`] then [`Client::from_config`].
    pub fn from_env() -> Result<Self> {
        Self::from_config(ClientConfig::from_env()?)
    }

    /// The tenant this client is scoped to.
    pub fn company_id(&self) -> u64 {
        self.inner.company_id
    }

    /// The underlying transport, for registering interceptors or issuing
    /// raw requests.
    pub fn transport(&self) -> &Arc<Transport> {
        &self.inner.transport
    }

    /// The contacts endpoint.
    pub fn contacts(&self) -> &Endpoint<Contact> {
        self.inner.contacts.get_or_init(|| self.endpoint())
    }

    /// The invoices endpoint.
    pub fn invoices(&self) -> &Endpoint<Invoice> {
        self.inner.invoices.get_or_init(|| self.endpoint())
    }

    /// The products endpoint.
    pub fn products(&self) -> &Endpoint<Product> {
        self.inner.products.get_or_init(|| self.endpoint())
    }

    /// The payments endpoint.
    pub fn payments(&self) -> &Endpoint<Payment> {
        self.inner.payments.get_or_init(|| self.endpoint())
    }

    /// The trackable-jobs status client.
    pub fn trackables(&self) -> &Trackables {
        self.inner
            .trackables
            .get_or_init(|| Trackables::new(Arc::clone(&self.inner.transport), self.inner.company_id))
    }

    /// Build an endpoint for any resource type, including ones defined
    /// outside this crate.
    pub fn endpoint<R: ApiResource>(&self) -> Endpoint<R> {
        Endpoint::new(Arc::clone(&self.inner.transport), self.inner.company_id)
    }
}

/// Builder for [`Client`].
#[derive(Default)]
pub struct ClientBuilder {
    access_token: Option<SecretString>,
    company_id: Option<u64>,
    base_url: Option<String>,
    timeout: Option<Duration>,
    default_headers: HeaderMap,
    request_interceptors: Vec<Arc<dyn RequestInterceptor>>,
    response_interceptors: Vec<Arc<dyn ResponseInterceptor>>,
    error_interceptors: Vec<Arc<dyn ErrorInterceptor>>,
}

impl std::fmt::Debug for ClientBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientBuilder")
            .field("company_id", &self.company_id)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl ClientBuilder {
    /// Set the bearer token.
    pub fn access_token(mut self, access_token: impl Into<String>) -> Self {
        self.access_token = Some(SecretString::new(access_token.into().into_boxed_str()));
        self
    }

    /// Set the bearer token from an already-wrapped secret.
    pub fn access_token_secret(mut self, access_token: SecretString) -> Self {
        self.access_token = Some(access_token);
        self
    }

    /// Set the company (tenant) id.
    pub fn company(mut self, company_id: u64) -> Self {
        self.company_id = Some(company_id);
        self
    }

    /// Override the base URL, e.g. for a staging environment.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Set the per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Add a header sent with every request.
    pub fn header(mut self, name: &str, value: &str) -> Result<Self> {
        let name: HeaderName = name
            .parse()
            .map_err(|_| Error::InvalidHeader(format!("invalid header name: {name}")))?;
        let value: HeaderValue = value
            .parse()
            .map_err(|_| Error::InvalidHeader(format!("invalid header value for {name}")))?;
        self.default_headers.insert(name, value);
        Ok(self)
    }

    /// Append a request interceptor; interceptors run in registration order.
    pub fn request_interceptor(mut self, interceptor: Arc<dyn RequestInterceptor>) -> Self {
        self.request_interceptors.push(interceptor);
        self
    }

    /// Append a response interceptor; interceptors run in registration order.
    pub fn response_interceptor(mut self, interceptor: Arc<dyn ResponseInterceptor>) -> Self {
        self.response_interceptors.push(interceptor);
        self
    }

    /// Append an error interceptor; interceptors run in registration order.
    pub fn error_interceptor(mut self, interceptor: Arc<dyn ErrorInterceptor>) -> Self {
        self.error_interceptors.push(interceptor);
        self
    }

    /// Build the client.
    ///
    /// # Errors
    ///
    /// [`Error::MissingConfig`] without a token or company id;
    /// [`Error::InvalidUrl`] for an unusable base URL.
    pub fn build(self) -> Result<Client> {
        let access_token = self
            .access_token
            .ok_or_else(|| Error::MissingConfig("access token is required".to_string()))?;
        let company_id = self
            .company_id
            .ok_or_else(|| Error::MissingConfig("company id is required".to_string()))?;

        let mut transport = Transport::builder()
            .bearer_token(access_token)
            .default_headers(self.default_headers);
        if let Some(base_url) = self.base_url {
            transport = transport.base_url(base_url);
        }
        if let Some(timeout) = self.timeout {
            transport = transport.timeout(timeout);
        }

        let mut transport = transport.build()?;
        for interceptor in self.request_interceptors {
            transport.add_request_interceptor(interceptor);
        }
        for interceptor in self.response_interceptors {
            transport.add_response_interceptor(interceptor);
        }
        for interceptor in self.error_interceptors {
            transport.add_error_interceptor(interceptor);
        }

        Ok(Client {
            inner: Arc::new(ClientInner {
                transport: Arc::new(transport),
                company_id,
                contacts: OnceLock::new(),
                invoices: OnceLock::new(),
                products: OnceLock::new(),
                payments: OnceLock::new(),
                trackables: OnceLock::new(),
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> Client {
        Client::builder()
            .access_token("tok-123")
            .company(7)
            .build()
            .unwrap()
    }

    #[test]
    fn test_build_requires_token_and_company() {
        let no_token = Client::builder().company(7).build();
        assert!(matches!(no_token, Err(Error::MissingConfig(_))));

        let no_company = Client::builder().access_token("tok").build();
        assert!(matches!(no_company, Err(Error::MissingConfig(_))));
    }

    #[test]
    fn test_default_base_url() {
        let client = client();
        assert_eq!(client.transport().base_url(), "https://api.fiska.io/v2/");
    }

    #[test]
    fn test_clones_share_inner() {
        let client = client();
        let clone = client.clone();
        assert!(Arc::ptr_eq(&client.inner, &clone.inner));
        // Lazy endpoints are initialized once across clones.
        let first = client.contacts() as *const _;
        let second = clone.contacts() as *const _;
        assert_eq!(first, second);
    }

    #[test]
    fn test_from_config_missing_company() {
        let config = ClientConfig::with_access_token("tok");
        assert!(matches!(
            Client::from_config(config),
            Err(Error::MissingConfig(_))
        ));
    }
}
