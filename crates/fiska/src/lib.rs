//! # fiska
//!
//! Typed async client for the Fiska accounting API.
//!
//! The API speaks JSON:API over HTTPS: every resource lives under a
//! company (tenant) scope, list responses paginate with `page[number]`
//! and `page[size]`, related resources are side-loaded via `include`, and
//! long-running operations hand back trackable jobs to poll.
//!
//! ## Quick start
//!
//! ```no_run
//! use fiska::{Client, Query};
//! use fiska::resources::ContactFilter;
//!
//! # async fn run() -> fiska::Result<()> {
//! let client = Client::builder()
//!     .access_token("tok-...")
//!     .company(42)
//!     .build()?;
//!
//! let filter = ContactFilter {
//!     archived: Some(false),
//!     ..Default::default()
//! };
//! let contacts = client
//!     .contacts()
//!     .list_all(Query::new().filter(filter))
//!     .await?;
//! println!("{} active contacts", contacts.len());
//! # Ok(())
//! # }
//! ```
//!
//! ## Layers
//!
//! - [`http`] — transport with request/response/error interceptor chains.
//! - [`jsonapi`] — envelope types, relationship denormalization.
//! - [`query`] — filter/page/include encoding into bracketed query keys.
//! - [`endpoint`] — the generic CRUD + pagination machinery.
//! - [`resources`] — concrete resource definitions.
//! - [`jobs`] — the trackable-job poller.

pub mod client;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod http;
pub mod jobs;
pub mod jsonapi;
pub mod query;
pub mod resources;
pub mod types;

pub use client::{Client, ClientBuilder};
pub use config::ClientConfig;
pub use endpoint::{ApiResource, Endpoint, Pages};
pub use error::{Error, Result};
pub use jobs::{Job, JobOutcome, JobStatus, PollOptions, Trackables};
pub use query::{Page, Query};
pub use types::Money;

/// Crate version, sent in the `user-agent` header.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Production API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.fiska.io/v2";

/// Commonly used items in one import.
pub mod prelude {
    pub use crate::client::{Client, ClientBuilder};
    pub use crate::config::ClientConfig;
    pub use crate::endpoint::{ApiResource, Endpoint};
    pub use crate::error::{Error, Result};
    pub use crate::jobs::{Job, JobStatus, PollOptions};
    pub use crate::jsonapi::{Document, ListDocument, Relationship, Resource};
    pub use crate::query::{Page, Query};
    pub use crate::resources::{Contact, Invoice, Payment, Product};
    pub use crate::types::Money;
}
