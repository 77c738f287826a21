//! Interceptor chain behavior: ordering, body rewriting, and error
//! substitution, exercised against a mock server.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use fiska::Error;
use fiska::http::{
    ErrorInterceptor, HeaderMap, RequestConfig, RequestInterceptor, ResponseInterceptor,
    StatusCode, Transport,
};
use serde_json::{Value, json};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Appends its label to a shared log and tags the request with a header.
struct Labeled {
    label: &'static str,
    log: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl RequestInterceptor for Labeled {
    async fn call(&self, request: RequestConfig) -> fiska::Result<RequestConfig> {
        self.log.lock().unwrap().push(self.label.to_string());
        request.header("x-seen-by", self.label)
    }
}

#[async_trait]
impl ResponseInterceptor for Labeled {
    async fn call(
        &self,
        _status: StatusCode,
        _headers: &HeaderMap,
        body: Value,
    ) -> fiska::Result<Value> {
        self.log.lock().unwrap().push(self.label.to_string());
        Ok(body)
    }
}

fn transport(server: &MockServer) -> Transport {
    Transport::builder()
        .base_url(server.uri())
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_request_interceptors_run_in_registration_order() {
    let server = MockServer::start().await;
    // The later interceptor's header value wins, proving it ran last.
    Mock::given(method("GET"))
        .and(path("/ping"))
        .and(header("x-seen-by", "second"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&server)
        .await;

    let log = Arc::new(Mutex::new(Vec::new()));
    let mut transport = transport(&server);
    transport.add_request_interceptor(Arc::new(Labeled {
        label: "first",
        log: Arc::clone(&log),
    }));
    transport.add_request_interceptor(Arc::new(Labeled {
        label: "second",
        log: Arc::clone(&log),
    }));

    transport.get("ping", Vec::new()).await.unwrap();
    assert_eq!(*log.lock().unwrap(), vec!["first", "second"]);
    server.verify().await;
}

#[tokio::test]
async fn test_response_interceptors_run_in_registration_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ping"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .mount(&server)
        .await;

    let log = Arc::new(Mutex::new(Vec::new()));
    let mut transport = transport(&server);
    transport.add_response_interceptor(Arc::new(Labeled {
        label: "first",
        log: Arc::clone(&log),
    }));
    transport.add_response_interceptor(Arc::new(Labeled {
        label: "second",
        log: Arc::clone(&log),
    }));

    transport.get("ping", Vec::new()).await.unwrap();
    assert_eq!(*log.lock().unwrap(), vec!["first", "second"]);
}

struct Rewriter;

#[async_trait]
impl ResponseInterceptor for Rewriter {
    async fn call(
        &self,
        status: StatusCode,
        _headers: &HeaderMap,
        _body: Value,
    ) -> fiska::Result<Value> {
        Ok(json!({"rewritten": true, "status": status.as_u16()}))
    }
}

#[tokio::test]
async fn test_response_interceptor_can_rewrite_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ping"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"original": true})))
        .mount(&server)
        .await;

    let mut transport = transport(&server);
    transport.add_response_interceptor(Arc::new(Rewriter));

    let body = transport.get("ping", Vec::new()).await.unwrap();
    assert_eq!(body, json!({"rewritten": true, "status": 200}));
}

/// Records observed error statuses and substitutes a fixed error.
struct Substituting {
    seen: Arc<Mutex<Vec<Option<u16>>>>,
}

#[async_trait]
impl ErrorInterceptor for Substituting {
    async fn call(&self, error: Error) -> Error {
        self.seen.lock().unwrap().push(error.status());
        Error::Connection("substituted".to_string())
    }
}

#[tokio::test]
async fn test_error_interceptor_observes_and_substitutes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ping"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let seen = Arc::new(Mutex::new(Vec::new()));
    let mut transport = transport(&server);
    transport.add_error_interceptor(Arc::new(Substituting {
        seen: Arc::clone(&seen),
    }));

    let error = transport.get("ping", Vec::new()).await.unwrap_err();
    assert!(matches!(error, Error::Connection(message) if message == "substituted"));
    assert_eq!(*seen.lock().unwrap(), vec![Some(500)]);
}

struct Rejecting;

#[async_trait]
impl RequestInterceptor for Rejecting {
    async fn call(&self, _request: RequestConfig) -> fiska::Result<RequestConfig> {
        Err(Error::MissingConfig("no credentials".to_string()))
    }
}

#[tokio::test]
async fn test_request_interceptor_failure_aborts_before_sending() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ping"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&server)
        .await;

    let mut transport = transport(&server);
    transport.add_request_interceptor(Arc::new(Rejecting));

    let error = transport.get("ping", Vec::new()).await.unwrap_err();
    assert!(matches!(error, Error::MissingConfig(_)));
    server.verify().await;
}

#[tokio::test]
async fn test_client_builder_registers_interceptors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/companies/7/contacts/1"))
        .and(header("x-seen-by", "builder"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"id": "1", "type": "contacts", "attributes": {}}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let log = Arc::new(Mutex::new(Vec::new()));
    let client = fiska::Client::builder()
        .access_token("tok")
        .company(7)
        .base_url(server.uri())
        .request_interceptor(Arc::new(Labeled {
            label: "builder",
            log: Arc::clone(&log),
        }))
        .build()
        .unwrap();

    client.contacts().get("1", &[]).await.unwrap();
    assert_eq!(*log.lock().unwrap(), vec!["builder"]);
    server.verify().await;
}
