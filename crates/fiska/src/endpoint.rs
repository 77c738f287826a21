//! Generic resource endpoint
//!
//! [`Endpoint`] is parametrized over a resource's attribute and filter
//! shapes, so each concrete resource keeps compile-time shape checking
//! while sharing one implementation of CRUD, pagination, and the
//! convenience queries. Optional capabilities (archive, cancel, payments,
//! PDF, e-document) are separate marker traits a resource type may
//! additionally satisfy; the extra operations only exist on endpoints
//! whose resource implements them.

use std::collections::VecDeque;
use std::marker::PhantomData;
use std::sync::Arc;

use futures::Stream;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::Result;
use crate::http::Transport;
use crate::jobs::{Job, job_from_envelope};
use crate::jsonapi::{self, Document, ListDocument, Relationships, Resource};
use crate::query::{Page, Query};
use crate::resources::payments::PaymentAttributes;

/// A concrete resource's static shape: wire type tag, collection path,
/// attribute struct, and filter struct.
pub trait ApiResource: Send + Sync + 'static {
    /// JSON:API type tag, e.g. `"contacts"`.
    const KIND: &'static str;
    /// Collection path segment under the tenant scope, e.g. `"contacts"`.
    const PATH: &'static str;
    /// Attribute shape. All-optional fields keep partial patches partial.
    type Attributes: Serialize + DeserializeOwned + Default + Clone + Send + Sync;
    /// Filter shape, serialized into `filter[...]` query keys.
    type Filter: Serialize + Default + Clone + Send + Sync;
}

/// A typed endpoint for one resource, scoped to one tenant (company).
///
/// Paths are always `companies/{company_id}/{PATH}[/{id}[/{suffix}]]`.
/// Cheap to clone; instances share the transport.
pub struct Endpoint<R: ApiResource> {
    transport: Arc<Transport>,
    company_id: u64,
    _resource: PhantomData<fn() -> R>,
}

impl<R: ApiResource> Clone for Endpoint<R> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            company_id: self.company_id,
            _resource: PhantomData,
        }
    }
}

impl<R: ApiResource> std::fmt::Debug for Endpoint<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Endpoint")
            .field("kind", &R::KIND)
            .field("company_id", &self.company_id)
            .finish()
    }
}

impl<R: ApiResource> Endpoint<R> {
    /// Create an endpoint over the given transport and tenant scope.
    pub fn new(transport: Arc<Transport>, company_id: u64) -> Self {
        Self {
            transport,
            company_id,
            _resource: PhantomData,
        }
    }

    fn collection_path(&self) -> String {
        format!("companies/{}/{}", self.company_id, R::PATH)
    }

    fn item_path(&self, id: &str) -> String {
        format!("{}/{id}", self.collection_path())
    }

    fn suffix_path(&self, id: &str, suffix: &str) -> String {
        format!("{}/{suffix}", self.item_path(id))
    }

    /// List one page of resources.
    pub async fn list(&self, query: &Query<R::Filter>) -> Result<ListDocument<R::Attributes>> {
        let value = self
            .transport
            .get(&self.collection_path(), query.to_pairs()?)
            .await?;
        jsonapi::extract_list(value)
    }

    /// Fetch a single resource by id, optionally side-loading relationships.
    pub async fn get(&self, id: &str, include: &[&str]) -> Result<Document<R::Attributes>> {
        let mut pairs = Vec::new();
        if !include.is_empty() {
            pairs.push(("include".to_string(), include.join(",")));
        }
        let value = self.transport.get(&self.item_path(id), pairs).await?;
        jsonapi::extract_document(value)
    }

    /// Create a resource.
    pub async fn create(
        &self,
        attributes: &R::Attributes,
        relationships: Option<&Relationships>,
    ) -> Result<Document<R::Attributes>> {
        let body = jsonapi::new_resource(R::KIND, attributes, relationships)?;
        let value = self.transport.post(&self.collection_path(), Some(body)).await?;
        jsonapi::extract_document(value)
    }

    /// Update a resource. Attributes are a partial patch: only serialized
    /// keys change server-side, everything else is left untouched.
    pub async fn update(
        &self,
        id: &str,
        attributes: Option<&R::Attributes>,
        relationships: Option<&Relationships>,
    ) -> Result<Document<R::Attributes>> {
        let body = jsonapi::update_resource(id, R::KIND, attributes, relationships)?;
        let value = self.transport.patch(&self.item_path(id), body).await?;
        jsonapi::extract_document(value)
    }

    /// Delete a resource. The server returns no content on success.
    pub async fn delete(&self, id: &str) -> Result<()> {
        self.transport.delete(&self.item_path(id)).await?;
        Ok(())
    }

    /// Lazily iterate over all matching resources, page by page.
    ///
    /// The iterator is restartable: calling `pages` again starts over from
    /// the query's starting page. At most one page fetch is in flight, and
    /// only when the buffered page is exhausted.
    pub fn pages(&self, query: Query<R::Filter>) -> Pages<'_, R> {
        Pages::new(self, query)
    }

    /// Eagerly drain [`Endpoint::pages`] into one ordered collection.
    ///
    /// Intended for bounded datasets; use `page`/`max_pages` on the query
    /// to keep memory in check.
    pub async fn list_all(&self, query: Query<R::Filter>) -> Result<Vec<Resource<R::Attributes>>> {
        let mut pages = self.pages(query);
        let mut all = Vec::new();
        while let Some(resource) = pages.next().await? {
            all.push(resource);
        }
        Ok(all)
    }

    /// Total number of matching resources, from `meta.total_count` of a
    /// `page[size]=1` request; page bodies beyond that are never fetched.
    pub async fn count(&self, filter: Option<R::Filter>) -> Result<u64> {
        let mut query = Query::new().page(1, 1);
        if let Some(filter) = filter {
            query = query.filter(filter);
        }
        Ok(self.list(&query).await?.meta.total_count)
    }

    /// Whether any resource matches the filter.
    pub async fn exists(&self, filter: Option<R::Filter>) -> Result<bool> {
        Ok(self.count(filter).await? > 0)
    }

    /// The first matching resource, or `Ok(None)` for zero matches —
    /// never an error.
    pub async fn first(&self, query: Query<R::Filter>) -> Result<Option<Resource<R::Attributes>>> {
        let query = Query {
            page: Some(Page::new(1, 1)),
            ..query
        };
        Ok(self.list(&query).await?.data.into_iter().next())
    }
}

/// Lazy page-by-page iterator over a list endpoint.
///
/// Stops when a page returns fewer items than the requested page size, or
/// when the query's `max_pages` bound is reached, whichever comes first.
pub struct Pages<'a, R: ApiResource> {
    endpoint: &'a Endpoint<R>,
    query: Query<R::Filter>,
    next_page: u32,
    page_size: u32,
    fetched_pages: u32,
    buffer: VecDeque<Resource<R::Attributes>>,
    exhausted: bool,
}

impl<'a, R: ApiResource> Pages<'a, R> {
    fn new(endpoint: &'a Endpoint<R>, query: Query<R::Filter>) -> Self {
        let start = query.page.unwrap_or_default();
        Self {
            endpoint,
            query,
            next_page: start.number,
            page_size: start.size,
            fetched_pages: 0,
            buffer: VecDeque::new(),
            exhausted: false,
        }
    }

    /// The next resource, fetching the next page only when the buffered
    /// one is exhausted. `Ok(None)` once iteration terminates.
    pub async fn next(&mut self) -> Result<Option<Resource<R::Attributes>>> {
        if self.buffer.is_empty() && !self.exhausted {
            self.fetch_next_page().await?;
        }
        Ok(self.buffer.pop_front())
    }

    async fn fetch_next_page(&mut self) -> Result<()> {
        if let Some(max_pages) = self.query.max_pages
            && self.fetched_pages >= max_pages
        {
            self.exhausted = true;
            return Ok(());
        }

        let page_query = Query {
            filter: self.query.filter.clone(),
            page: Some(Page::new(self.next_page, self.page_size)),
            include: self.query.include.clone(),
            max_pages: None,
        };
        let page = self.endpoint.list(&page_query).await?;

        let fetched = page.data.len() as u32;
        self.buffer.extend(page.data);
        self.fetched_pages += 1;
        self.next_page += 1;
        // A short page is the termination signal.
        if fetched < self.page_size {
            self.exhausted = true;
        }
        Ok(())
    }

    /// Adapt into a `futures::Stream` of individual resources.
    pub fn into_stream(self) -> impl Stream<Item = Result<Resource<R::Attributes>>> + 'a {
        futures::stream::try_unfold(self, |mut pages| async move {
            Ok(pages.next().await?.map(|resource| (resource, pages)))
        })
    }
}

/// Resources that can be archived and unarchived.
pub trait Archivable: ApiResource {}

/// Resources with a cancel operation.
pub trait Cancellable: ApiResource {}

/// Resources that accept payments.
pub trait Payable: ApiResource {}

/// Resources whose PDF rendition is produced by a trackable job.
pub trait HasPdf: ApiResource {}

/// Resources issued as e-documents via a trackable job.
pub trait IssuesEDocument: ApiResource {}

impl<R: Archivable> Endpoint<R> {
    /// Archive the resource.
    pub async fn archive(&self, id: &str) -> Result<Document<R::Attributes>> {
        let value = self
            .transport
            .post(&self.suffix_path(id, "archive"), None)
            .await?;
        jsonapi::extract_document(value)
    }

    /// Restore an archived resource.
    pub async fn unarchive(&self, id: &str) -> Result<Document<R::Attributes>> {
        let value = self
            .transport
            .post(&self.suffix_path(id, "unarchive"), None)
            .await?;
        jsonapi::extract_document(value)
    }
}

impl<R: Cancellable> Endpoint<R> {
    /// Cancel the resource.
    pub async fn cancel(&self, id: &str) -> Result<Document<R::Attributes>> {
        let value = self
            .transport
            .post(&self.suffix_path(id, "cancel"), None)
            .await?;
        jsonapi::extract_document(value)
    }
}

impl<R: Payable> Endpoint<R> {
    /// Register a payment against the resource.
    pub async fn create_payment(
        &self,
        id: &str,
        payment: &PaymentAttributes,
    ) -> Result<Document<PaymentAttributes>> {
        let body = jsonapi::new_resource("payments", payment, None)?;
        let value = self
            .transport
            .post(&self.suffix_path(id, "payments"), Some(body))
            .await?;
        jsonapi::extract_document(value)
    }

    /// List the payments registered against the resource.
    pub async fn payments(&self, id: &str) -> Result<ListDocument<PaymentAttributes>> {
        let value = self
            .transport
            .get(&self.suffix_path(id, "payments"), Vec::new())
            .await?;
        jsonapi::extract_list(value)
    }
}

impl<R: HasPdf> Endpoint<R> {
    /// Request PDF generation; returns the trackable job to poll.
    pub async fn request_pdf(&self, id: &str) -> Result<Job> {
        let value = self.transport.post(&self.suffix_path(id, "pdf"), None).await?;
        job_from_envelope(value)
    }
}

impl<R: IssuesEDocument> Endpoint<R> {
    /// Request e-document issuance; returns the trackable job to poll.
    pub async fn issue_edocument(&self, id: &str) -> Result<Job> {
        let value = self
            .transport
            .post(&self.suffix_path(id, "edocument"), None)
            .await?;
        job_from_envelope(value)
    }
}
