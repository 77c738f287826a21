//! Shared helpers for the wiremock integration tests.

use fiska::Client;
use serde_json::{Value, json};
use wiremock::MockServer;

/// Build a client pointed at the mock server.
#[allow(dead_code)]
pub fn test_client(server: &MockServer, company_id: u64) -> Client {
    Client::builder()
        .access_token("tok-test")
        .company(company_id)
        .base_url(server.uri())
        .build()
        .expect("failed to build client")
}

/// One contact resource object with a deterministic name.
#[allow(dead_code)]
pub fn contact(id: u32) -> Value {
    json!({
        "type": "contacts",
        "id": id.to_string(),
        "attributes": {"name": format!("Contact {id}")}
    })
}

/// A list envelope of `contact` resources for the given id range.
#[allow(dead_code)]
pub fn contact_page(
    ids: std::ops::RangeInclusive<u32>,
    total_count: u64,
    current_page: u32,
    total_pages: u32,
) -> Value {
    json!({
        "data": ids.map(contact).collect::<Vec<_>>(),
        "meta": {
            "total_count": total_count,
            "current_page": current_page,
            "total_pages": total_pages
        }
    })
}

/// A single-job envelope in the given status.
#[allow(dead_code)]
pub fn job_document(id: &str, status: &str, errors: &[&str]) -> Value {
    json!({
        "data": {
            "type": "trackable_jobs",
            "id": id,
            "attributes": {"status": status, "errors": errors}
        }
    })
}
