use chrono::{Local, NaiveDateTime};
use log::{error, info, warn};
use tokio_util::sync::CancellationToken;

use crate::{
    Sink,
    error::GenerateError,
    job::GenerationRequest,
    materialize::{Materialized, materialize},
    poll::{PollPolicy, Sleeper, TokioSleeper, poll},
    submit::submit,
    transport::Transport,
};

pub type TransportBox = Box<dyn Transport + Send + Sync>;
pub type SleeperBox = Box<dyn Sleeper + Send + Sync>;

/// Everything needed to turn one prompt into saved images.
pub struct Generator {
    transport: TransportBox,
    sleeper: SleeperBox,
    policy: PollPolicy,
    clock: fn() -> NaiveDateTime,
}

fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

impl Generator {
    pub fn new(transport: impl Transport + Send + Sync + 'static) -> Self {
        Self {
            transport: Box::new(transport),
            sleeper: Box::new(TokioSleeper),
            policy: PollPolicy::default(),
            clock: local_now,
        }
    }

    pub fn with_sleeper(mut self, sleeper: impl Sleeper + Send + Sync + 'static) -> Self {
        self.sleeper = Box::new(sleeper);
        self
    }

    pub fn with_policy(mut self, policy: PollPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_clock(mut self, clock: fn() -> NaiveDateTime) -> Self {
        self.clock = clock;
        self
    }

    pub fn policy(&self) -> PollPolicy {
        self.policy
    }

    /// Submits `prompt`, waits for the job and stores its images in `sink`.
    pub async fn generate(
        &self,
        prompt: &str,
        image_count: u32,
        sink: &mut (dyn Sink + Send),
        cancel: &CancellationToken,
    ) -> Result<Materialized, GenerateError> {
        let request = GenerationRequest::try_new(prompt, image_count)?;

        let mut job = submit(&request, self.transport.as_ref())
            .await
            .inspect_err(|e| error!("Prompt {prompt:?}: {e}"))?;

        let result = match poll(
            &mut job,
            self.transport.as_ref(),
            self.sleeper.as_ref(),
            self.policy,
            cancel,
        )
        .await
        {
            Ok(result) => result,
            Err(e) => {
                error!(
                    "Job {} for {prompt:?} ended {} after {} attempt(s): {e}",
                    job.id(),
                    job.state(),
                    job.attempt()
                );
                return Err(e.into());
            }
        };

        if result.images.len() != request.image_count() as usize {
            warn!(
                "Job {} returned {} image(s), {} requested",
                job.id(),
                result.images.len(),
                request.image_count()
            );
        }

        let materialized = materialize(&result, sink, (self.clock)());
        info!(
            "Job {}: {}/{} image(s) saved",
            job.id(),
            materialized.persisted.len(),
            materialized.requested
        );
        Ok(materialized)
    }
}
