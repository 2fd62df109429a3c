use thiserror::Error;

/// Missing or unusable credentials. Fatal at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("API key is empty")]
    MissingApiKey,

    #[error("secret key is empty")]
    MissingSecretKey,
}

/// Errors raised by a [`Transport`](crate::Transport) call.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("http: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error("submission failed: {0}")]
    Failed(String),
}

impl SubmissionError {
    pub(crate) fn failed(reason: impl Into<String>) -> Self {
        Self::Failed(reason.into())
    }
}

impl From<TransportError> for SubmissionError {
    fn from(err: TransportError) -> Self {
        Self::Failed(err.to_string())
    }
}

#[derive(Debug, Error)]
pub enum PollError {
    #[error("generation failed on the remote side: {0}")]
    RemoteFailure(String),

    #[error("job still pending after {attempts} status queries")]
    Timeout { attempts: u32 },

    /// Every status query of the job failed at the transport level.
    #[error("status queries failed: {0}")]
    Transport(#[source] TransportError),

    #[error("polling was cancelled")]
    Cancelled,
}

/// Per-image failure recorded by the materializer.
#[derive(Debug, Error)]
pub enum ImageError {
    #[error("image {index} is not valid base64: {source}")]
    Decode {
        index: usize,
        #[source]
        source: base64::DecodeError,
    },

    #[error("could not persist {name}: {source}")]
    Persist {
        index: usize,
        name: String,
        #[source]
        source: std::io::Error,
    },
}

impl ImageError {
    pub fn index(&self) -> usize {
        match self {
            ImageError::Decode { index, .. } | ImageError::Persist { index, .. } => *index,
        }
    }
}

/// Anything that ends a single prompt without images.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Submission(#[from] SubmissionError),

    #[error(transparent)]
    Poll(#[from] PollError),
}
