//! Trackable-job polling against a mock server, with millisecond-scale
//! intervals so the tests stay fast.

mod common;

use std::time::Duration;

use fiska::{Error, JobStatus, PollOptions};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const JOB_PATH: &str = "/companies/42/trackable_jobs/job-1";

fn fast_poll() -> PollOptions {
    PollOptions {
        poll_interval: Duration::from_millis(10),
        timeout: Duration::from_millis(500),
    }
}

#[tokio::test]
async fn test_poll_follows_transitions_to_done() {
    let server = MockServer::start().await;
    // Mocks match in mount order; each status is served once, then the
    // mock stops matching and the next one takes over.
    Mock::given(method("GET"))
        .and(path(JOB_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(common::job_document("job-1", "pending", &[])),
        )
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(JOB_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(common::job_document("job-1", "running", &[])),
        )
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(JOB_PATH))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(common::job_document("job-1", "done", &[])),
        )
        .mount(&server)
        .await;

    let client = common::test_client(&server, 42);
    let job = client
        .trackables()
        .poll("job-1", fast_poll())
        .await
        .unwrap();

    assert_eq!(job.status, JobStatus::Done);
    assert_eq!(server.received_requests().await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_poll_timeout_carries_last_observed_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(JOB_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(common::job_document("job-1", "running", &[])),
        )
        .mount(&server)
        .await;

    let client = common::test_client(&server, 42);
    let options = PollOptions {
        poll_interval: Duration::from_millis(10),
        timeout: Duration::from_millis(50),
    };
    let error = client
        .trackables()
        .poll("job-1", options)
        .await
        .unwrap_err();

    match error {
        Error::JobTimeout {
            id,
            last_status,
            elapsed,
        } => {
            assert_eq!(id, "job-1");
            assert_eq!(last_status, JobStatus::Running);
            assert!(elapsed >= Duration::from_millis(50));
        }
        other => panic!("expected Error::JobTimeout, got {other:?}"),
    }
}

#[tokio::test]
async fn test_poll_fails_immediately_with_server_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(JOB_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::job_document(
            "job-1",
            "error",
            &["template missing", "rendering failed"],
        )))
        .expect(1)
        .mount(&server)
        .await;

    let client = common::test_client(&server, 42);
    let error = client
        .trackables()
        .poll("job-1", fast_poll())
        .await
        .unwrap_err();

    match error {
        Error::JobFailed { job } => {
            assert_eq!(job.status, JobStatus::Error);
            assert_eq!(job.errors, ["template missing", "rendering failed"]);
        }
        other => panic!("expected Error::JobFailed, got {other:?}"),
    }
    server.verify().await;
}

#[tokio::test]
async fn test_wait_for_completion_recovers_job_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(JOB_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(common::job_document("job-1", "error", &["boom"])),
        )
        .mount(&server)
        .await;

    let client = common::test_client(&server, 42);
    let outcome = client
        .trackables()
        .wait_for_completion("job-1", fast_poll())
        .await
        .unwrap();

    assert!(!outcome.success);
    assert_eq!(outcome.errors, ["boom"]);
    assert_eq!(outcome.job.status, JobStatus::Error);
}

#[tokio::test]
async fn test_wait_for_completion_propagates_transport_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(JOB_PATH))
        .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
        .mount(&server)
        .await;

    let client = common::test_client(&server, 42);
    let error = client
        .trackables()
        .wait_for_completion("job-1", fast_poll())
        .await
        .unwrap_err();

    assert_eq!(error.status(), Some(503));
}

#[tokio::test]
async fn test_request_pdf_returns_trackable_job() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/companies/42/invoices/9/pdf"))
        .respond_with(
            ResponseTemplate::new(202)
                .set_body_json(common::job_document("job-1", "pending", &[])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = common::test_client(&server, 42);
    let job = client.invoices().request_pdf("9").await.unwrap();

    assert_eq!(job.id, "job-1");
    assert_eq!(job.status, JobStatus::Pending);
    server.verify().await;
}
