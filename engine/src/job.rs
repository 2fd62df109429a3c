use strum::Display;

use crate::error::GenerateError;

pub const IMAGE_WIDTH: u32 = 1024;
pub const IMAGE_HEIGHT: u32 = 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    prompt: String,
    image_count: u32,
}

impl GenerationRequest {
    pub fn try_new(prompt: impl Into<String>, image_count: u32) -> Result<Self, GenerateError> {
        let prompt = prompt.into();
        if image_count == 0 {
            return Err(GenerateError::InvalidRequest(
                "at least one image must be requested".into(),
            ));
        }
        if prompt.trim().is_empty() {
            return Err(GenerateError::InvalidRequest("prompt is empty".into()));
        }

        Ok(Self {
            prompt,
            image_count,
        })
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn image_count(&self) -> u32 {
        self.image_count
    }

    pub fn width(&self) -> u32 {
        IMAGE_WIDTH
    }

    pub fn height(&self) -> u32 {
        IMAGE_HEIGHT
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum JobState {
    Submitted,
    Pending,
    Done,
    Failed,
    TimedOut,
    Cancelled,
}

impl JobState {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            JobState::Done | JobState::Failed | JobState::TimedOut | JobState::Cancelled
        )
    }

    pub fn can_become(self, next: JobState) -> bool {
        use JobState::*;
        match (self, next) {
            (Submitted, Pending) => true,
            (Submitted | Pending, Done | Failed | TimedOut | Cancelled) => true,
            _ => false,
        }
    }
}

/// One remote generation job, tracked by the id the service assigned to it.
#[derive(Debug, Clone)]
pub struct Job {
    id: String,
    prompt: String,
    state: JobState,
    attempt: u32,
}

impl Job {
    pub(crate) fn submitted(id: String, prompt: String) -> Self {
        Self {
            id,
            prompt,
            state: JobState::Submitted,
            attempt: 0,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn state(&self) -> JobState {
        self.state
    }

    /// Number of status queries spent on this job.
    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    /// Moves to `next` if that is a legal transition. Terminal states are final.
    pub(crate) fn transition(&mut self, next: JobState) -> bool {
        if self.state.can_become(next) {
            self.state = next;
            true
        } else {
            false
        }
    }

    pub(crate) fn count_attempt(&mut self) {
        if self.state == JobState::Pending {
            self.attempt += 1;
        }
    }
}

/// Encoded images of a finished job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationResult {
    pub images: Vec<String>,
    pub source_prompt: String,
}
