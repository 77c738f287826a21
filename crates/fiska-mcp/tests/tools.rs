//! Tool dispatch against a mock API server, checking the rendered text
//! and the error surfaces.

use fiska::Client;
use fiska_mcp::Toolbox;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn toolbox(server: &MockServer) -> Toolbox {
    let client = Client::builder()
        .access_token("tok-test")
        .company(42)
        .base_url(server.uri())
        .build()
        .unwrap();
    Toolbox::new(client)
}

fn text_of(result: &impl serde::Serialize) -> (String, bool) {
    let value = serde_json::to_value(result).unwrap();
    let text = value["content"][0]["text"].as_str().unwrap().to_string();
    let is_error = value["isError"].as_bool().unwrap();
    (text, is_error)
}

#[tokio::test]
async fn test_list_contacts_renders_lines() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/companies/42/contacts"))
        .and(query_param("filter[archived]", "false"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                {"type": "contacts", "id": "1", "attributes": {"name": "Acme GmbH", "email": "billing@acme.example"}},
                {"type": "contacts", "id": "2", "attributes": {"name": "Globex"}}
            ],
            "meta": {"total_count": 2, "current_page": 1, "total_pages": 1}
        })))
        .mount(&server)
        .await;

    let result = toolbox(&server)
        .call("list_contacts", &json!({"archived": false}))
        .await;
    let (text, is_error) = text_of(&result);

    assert!(!is_error);
    assert!(text.starts_with("2 of 2 contacts (page 1 of 1):"));
    assert!(text.contains("#1 Acme GmbH <billing@acme.example>"));
    assert!(text.contains("#2 Globex <->"));
}

#[tokio::test]
async fn test_list_contacts_empty_is_not_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/companies/42/contacts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [],
            "meta": {"total_count": 0, "current_page": 1, "total_pages": 0}
        })))
        .mount(&server)
        .await;

    let result = toolbox(&server).call("list_contacts", &json!({})).await;
    let (text, is_error) = text_of(&result);

    assert!(!is_error);
    assert_eq!(text, "No contacts found.");
}

#[tokio::test]
async fn test_get_invoice_resolves_contact_name() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/companies/42/invoices/9"))
        .and(query_param("include", "contact"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "type": "invoices",
                "id": "9",
                "attributes": {
                    "number": "2026-0009",
                    "state": "open",
                    "total_amount": "121.00",
                    "currency": "EUR"
                },
                "relationships": {
                    "contact": {"data": {"type": "contacts", "id": "3"}}
                }
            },
            "included": [
                {"type": "contacts", "id": "3", "attributes": {"name": "Acme GmbH"}}
            ]
        })))
        .mount(&server)
        .await;

    let result = toolbox(&server).call("get_invoice", &json!({"id": "9"})).await;
    let (text, is_error) = text_of(&result);

    assert!(!is_error);
    assert!(text.contains("Invoice #9: 2026-0009"));
    assert!(text.contains("contact: Acme GmbH"));
    assert!(text.contains("total: 121.00 EUR"));
}

#[tokio::test]
async fn test_count_invoices_with_state_filter() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/companies/42/invoices"))
        .and(query_param("filter[state]", "open"))
        .and(query_param("page[size]", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"type": "invoices", "id": "1", "attributes": {}}],
            "meta": {"total_count": 17, "current_page": 1, "total_pages": 17}
        })))
        .mount(&server)
        .await;

    let result = toolbox(&server)
        .call("count_invoices", &json!({"state": "open"}))
        .await;
    let (text, is_error) = text_of(&result);

    assert!(!is_error);
    assert_eq!(text, "17 matching invoices.");
}

#[tokio::test]
async fn test_create_contact_requires_name() {
    let server = MockServer::start().await;
    let result = toolbox(&server)
        .call("create_contact", &json!({"email": "x@y.example"}))
        .await;
    let (text, is_error) = text_of(&result);

    assert!(is_error);
    assert!(text.contains("Invalid arguments"));
}

#[tokio::test]
async fn test_api_failure_surfaces_as_tool_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/companies/42/contacts/999"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "errors": [{"status": "404", "title": "Not found"}]
        })))
        .mount(&server)
        .await;

    let result = toolbox(&server).call("get_contact", &json!({"id": "999"})).await;
    let (text, is_error) = text_of(&result);

    assert!(is_error);
    assert!(text.starts_with("API error:"));
}

#[tokio::test]
async fn test_request_invoice_pdf_waits_for_job() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/companies/42/invoices/9/pdf"))
        .respond_with(ResponseTemplate::new(202).set_body_json(json!({
            "data": {"type": "trackable_jobs", "id": "job-7", "attributes": {"status": "pending"}}
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/companies/42/trackable_jobs/job-7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"type": "trackable_jobs", "id": "job-7", "attributes": {"status": "done"}}
        })))
        .mount(&server)
        .await;

    let result = toolbox(&server)
        .call("request_invoice_pdf", &json!({"id": "9"}))
        .await;
    let (text, is_error) = text_of(&result);

    assert!(!is_error);
    assert_eq!(text, "PDF generation for invoice #9 finished (job job-7).");
}
