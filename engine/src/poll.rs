use std::{pin::Pin, time::Duration};

use log::{debug, error, info, warn};
use tokio_util::sync::CancellationToken;

use crate::{
    error::{PollError, TransportError},
    fusion_api::{STATUS_DONE, STATUS_FAILED, StatusResponse, status_path},
    job::{GenerationResult, Job, JobState},
    transport::Transport,
};

pub type SleepFuture<'a> = Pin<Box<dyn Future<Output = ()> + Send + 'a>>;

/// Suspends the polling task between two status queries.
pub trait Sleeper {
    fn sleep(&self, duration: Duration) -> SleepFuture<'_>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

impl Sleeper for TokioSleeper {
    fn sleep(&self, duration: Duration) -> SleepFuture<'_> {
        Box::pin(tokio::time::sleep(duration))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
            max_attempts: 10,
        }
    }
}

#[derive(Debug)]
enum Observation {
    Done { images: Vec<String>, censored: bool },
    Failed(String),
    InProgress(String),
}

impl From<StatusResponse> for Observation {
    fn from(resp: StatusResponse) -> Self {
        match resp.status.as_deref() {
            Some(STATUS_DONE) => Observation::Done {
                images: resp.images.unwrap_or_default(),
                censored: resp.censored.unwrap_or(false),
            },
            Some(STATUS_FAILED) => Observation::Failed(
                resp.error_description
                    .unwrap_or_else(|| "no reason given".into()),
            ),
            Some(other) => Observation::InProgress(other.to_string()),
            None => Observation::InProgress("<missing>".into()),
        }
    }
}

async fn query_status<T: Transport + ?Sized>(
    transport: &T,
    path: &str,
) -> Result<Observation, TransportError> {
    let value = transport.get_json(path).await?;
    let resp: StatusResponse = serde_json::from_value(value)?;
    Ok(resp.into())
}

/// Drives `job` until it reaches a terminal state.
///
/// Every status query consumes one attempt, including queries that fail at the
/// transport level, so the loop ends after at most `policy.max_attempts`
/// queries. Cancellation is raced against each query and each wait.
pub async fn poll<T, S>(
    job: &mut Job,
    transport: &T,
    sleeper: &S,
    policy: PollPolicy,
    cancel: &CancellationToken,
) -> Result<GenerationResult, PollError>
where
    T: Transport + ?Sized,
    S: Sleeper + ?Sized,
{
    job.transition(JobState::Pending);
    let path = status_path(job.id());
    let mut transport_failures = 0;
    let mut last_transport_error = None;

    loop {
        if cancel.is_cancelled() {
            return Err(cancelled(job));
        }
        if job.attempt() >= policy.max_attempts {
            break;
        }

        job.count_attempt();
        let observed = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(cancelled(job)),
            observed = query_status(transport, &path) => observed,
        };

        match observed {
            Ok(Observation::Done { images, censored }) => {
                job.transition(JobState::Done);
                if censored {
                    warn!("Job {} for {:?} was flagged as censored", job.id(), job.prompt());
                }
                info!(
                    "Job {} done after {} attempt(s) with {} image(s)",
                    job.id(),
                    job.attempt(),
                    images.len()
                );
                return Ok(GenerationResult {
                    images,
                    source_prompt: job.prompt().to_string(),
                });
            }
            Ok(Observation::Failed(reason)) => {
                job.transition(JobState::Failed);
                error!(
                    "Job {} for {:?} failed on attempt {}: {reason}",
                    job.id(),
                    job.prompt(),
                    job.attempt()
                );
                return Err(PollError::RemoteFailure(reason));
            }
            Ok(Observation::InProgress(status)) => {
                debug!(
                    "Job {} is {status} (attempt {}/{})",
                    job.id(),
                    job.attempt(),
                    policy.max_attempts
                );
            }
            Err(e) => {
                warn!(
                    "Status query for job {} ({:?}) failed on attempt {}/{}: {e}",
                    job.id(),
                    job.prompt(),
                    job.attempt(),
                    policy.max_attempts
                );
                transport_failures += 1;
                last_transport_error = Some(e);
            }
        }

        tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(cancelled(job)),
            _ = sleeper.sleep(policy.interval) => {}
        }
    }

    job.transition(JobState::TimedOut);
    error!(
        "Job {} for {:?} timed out after {} attempts",
        job.id(),
        job.prompt(),
        job.attempt()
    );
    match last_transport_error {
        Some(e) if transport_failures == job.attempt() => Err(PollError::Transport(e)),
        _ => Err(PollError::Timeout {
            attempts: job.attempt(),
        }),
    }
}

fn cancelled(job: &mut Job) -> PollError {
    job.transition(JobState::Cancelled);
    info!(
        "Polling of job {} cancelled after {} attempt(s)",
        job.id(),
        job.attempt()
    );
    PollError::Cancelled
}
