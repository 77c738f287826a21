//! Trackable job polling
//!
//! Long-running server-side operations (PDF generation, e-document
//! issuance) return a trackable job id. The poller drives a bounded loop
//! against the job-status endpoint until a terminal state or the deadline.
//! Job transitions are monotonic toward a terminal state; a terminal status
//! is final for the lifetime of a poll call and is never reclassified.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::time::{Instant, sleep};

use crate::error::{Error, Result};
use crate::http::Transport;
use crate::jsonapi::{self, Document};

/// Job lifecycle states. `Done` and `Error` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    /// Queued, not started.
    Pending,
    /// In progress.
    Running,
    /// Finished successfully (terminal).
    Done,
    /// Finished with errors (terminal).
    Error,
}

impl JobStatus {
    /// True for `Done` and `Error`.
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Done | JobStatus::Error)
    }
}

impl Default for JobStatus {
    fn default() -> Self {
        JobStatus::Pending
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            JobStatus::Pending => "pending",
            JobStatus::Running => "running",
            JobStatus::Done => "done",
            JobStatus::Error => "error",
        };
        f.write_str(name)
    }
}

/// Wire attributes of a trackable job resource.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobAttributes {
    /// Current lifecycle state.
    pub status: JobStatus,
    /// Server-reported error messages, populated in the `error` state.
    #[serde(default)]
    pub errors: Vec<String>,
}

/// A trackable job snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    /// Server-assigned job id.
    pub id: String,
    /// Status at fetch time.
    pub status: JobStatus,
    /// Server-reported error messages.
    pub errors: Vec<String>,
}

/// Options for the bounded poll loop.
#[derive(Debug, Clone, Copy)]
pub struct PollOptions {
    /// Sleep between status fetches.
    pub poll_interval: Duration,
    /// Overall deadline; the only cancellation mechanism.
    pub timeout: Duration,
}

impl Default for PollOptions {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(2000),
            timeout: Duration::from_millis(60_000),
        }
    }
}

/// The outcome [`Trackables::wait_for_completion`] reports.
///
/// `success: false` means the job itself failed; transport faults and poll
/// timeouts never produce an outcome, they propagate as errors.
#[derive(Debug, Clone)]
pub struct JobOutcome {
    /// Whether the job reached `done`.
    pub success: bool,
    /// The job in its terminal state.
    pub job: Job,
    /// Server error list (empty on success).
    pub errors: Vec<String>,
}

/// Decode a trackable-job envelope into a [`Job`] snapshot.
pub(crate) fn job_from_envelope(value: serde_json::Value) -> Result<Job> {
    let document: Document<JobAttributes> = jsonapi::extract_document(value)?;
    Ok(Job {
        id: document.data.id,
        status: document.data.attributes.status,
        errors: document.data.attributes.errors,
    })
}

/// Status endpoint client for trackable jobs.
#[derive(Debug, Clone)]
pub struct Trackables {
    transport: Arc<Transport>,
    company_id: u64,
}

impl Trackables {
    pub(crate) fn new(transport: Arc<Transport>, company_id: u64) -> Self {
        Self {
            transport,
            company_id,
        }
    }

    fn path(&self, id: &str) -> String {
        format!("companies/{}/trackable_jobs/{id}", self.company_id)
    }

    /// One-shot status fetch.
    pub async fn get(&self, id: &str) -> Result<Job> {
        let value = self.transport.get(&self.path(id), Vec::new()).await?;
        job_from_envelope(value)
    }

    /// Poll until a terminal state or the deadline.
    ///
    /// `done` returns the job; `error` fails with [`Error::JobFailed`]
    /// carrying the server error list; the deadline elapsing first fails
    /// with [`Error::JobTimeout`] carrying the last observed non-terminal
    /// status.
    pub async fn poll(&self, id: &str, options: PollOptions) -> Result<Job> {
        let started = Instant::now();
        let mut last_status = JobStatus::Pending;

        loop {
            let job = self.get(id).await?;
            match job.status {
                JobStatus::Done => return Ok(job),
                JobStatus::Error => return Err(Error::JobFailed { job }),
                status => last_status = status,
            }

            if started.elapsed() >= options.timeout {
                return Err(Error::JobTimeout {
                    id: id.to_string(),
                    last_status,
                    elapsed: started.elapsed(),
                });
            }
            sleep(options.poll_interval).await;
        }
    }

    /// Poll, converting a job failure into a structured outcome.
    ///
    /// Exactly [`Error::JobFailed`] is recovered; any other error
    /// (transport fault, decode failure, poll timeout) propagates
    /// unchanged so callers can distinguish "the job failed" from
    /// "we could not even ask".
    pub async fn wait_for_completion(&self, id: &str, options: PollOptions) -> Result<JobOutcome> {
        match self.poll(id, options).await {
            Ok(job) => Ok(JobOutcome {
                success: true,
                errors: Vec::new(),
                job,
            }),
            Err(Error::JobFailed { job }) => Ok(JobOutcome {
                success: false,
                errors: job.errors.clone(),
                job,
            }),
            Err(other) => Err(other),
        }
    }
}
