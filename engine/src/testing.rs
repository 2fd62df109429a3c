//! In-memory stand-ins for the transport, the sleeper and the sink.

use std::{
    collections::{HashMap, VecDeque},
    io,
    sync::Mutex,
    time::Duration,
};

use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::{
    Sink,
    error::TransportError,
    poll::{SleepFuture, Sleeper},
    transport::{Form, Transport, TransportFuture},
};

#[derive(Debug, Clone)]
pub enum Reply {
    Json(Value),
    Unavailable,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Get(String),
    PostMultipart(String, Form),
    PostJson(String, Value),
}

/// Answers each path from a queue of replies. The last reply of a queue repeats.
#[derive(Default)]
pub struct ScriptedTransport {
    replies: Mutex<HashMap<String, VecDeque<Reply>>>,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, path: impl Into<String>, reply: Reply) -> Self {
        self.replies
            .lock()
            .unwrap()
            .entry(path.into())
            .or_default()
            .push_back(reply);
        self
    }

    pub fn json(self, path: impl Into<String>, value: Value) -> Self {
        self.reply(path, Reply::Json(value))
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn gets_of(&self, path: &str) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, Call::Get(p) if p == path))
            .count()
    }

    fn answer(&self, call: Call, path: &str) -> Result<Value, TransportError> {
        self.calls.lock().unwrap().push(call);
        let mut replies = self.replies.lock().unwrap();
        let queue = replies.get_mut(path);
        let reply = match queue {
            Some(q) if q.len() > 1 => q.pop_front(),
            Some(q) => q.front().cloned(),
            None => None,
        };

        match reply {
            Some(Reply::Json(v)) => Ok(v),
            Some(Reply::Unavailable) => Err(TransportError::Status {
                status: 503,
                body: "service unavailable".into(),
            }),
            None => Err(TransportError::Status {
                status: 404,
                body: format!("no reply scripted for {path}"),
            }),
        }
    }
}

impl Transport for ScriptedTransport {
    fn get_json<'a>(&'a self, path: &'a str) -> TransportFuture<'a> {
        let res = self.answer(Call::Get(path.into()), path);
        Box::pin(async move { res })
    }

    fn post_multipart<'a>(&'a self, path: &'a str, form: Form) -> TransportFuture<'a> {
        let res = self.answer(Call::PostMultipart(path.into(), form), path);
        Box::pin(async move { res })
    }

    fn post_json<'a>(&'a self, path: &'a str, body: &'a Value) -> TransportFuture<'a> {
        let res = self.answer(Call::PostJson(path.into(), body.clone()), path);
        Box::pin(async move { res })
    }
}

/// Never answers.
pub struct HangingTransport;

impl Transport for HangingTransport {
    fn get_json<'a>(&'a self, _path: &'a str) -> TransportFuture<'a> {
        Box::pin(std::future::pending::<Result<Value, TransportError>>())
    }

    fn post_multipart<'a>(&'a self, _path: &'a str, _form: Form) -> TransportFuture<'a> {
        Box::pin(std::future::pending::<Result<Value, TransportError>>())
    }

    fn post_json<'a>(&'a self, _path: &'a str, _body: &'a Value) -> TransportFuture<'a> {
        Box::pin(std::future::pending::<Result<Value, TransportError>>())
    }
}

/// Returns immediately and keeps track of the simulated time.
#[derive(Default)]
pub struct RecordingSleeper {
    slept: Mutex<Vec<Duration>>,
    cancel_after: Option<(usize, CancellationToken)>,
}

impl RecordingSleeper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancels `token` when the `n`-th wait starts.
    pub fn cancelling_after(n: usize, token: CancellationToken) -> Self {
        Self {
            slept: Mutex::default(),
            cancel_after: Some((n, token)),
        }
    }

    pub fn waits(&self) -> usize {
        self.slept.lock().unwrap().len()
    }

    pub fn elapsed(&self) -> Duration {
        self.slept.lock().unwrap().iter().sum()
    }
}

impl Sleeper for RecordingSleeper {
    fn sleep(&self, duration: Duration) -> SleepFuture<'_> {
        let mut slept = self.slept.lock().unwrap();
        slept.push(duration);
        if let Some((n, token)) = &self.cancel_after {
            if slept.len() == *n {
                token.cancel();
                return Box::pin(std::future::pending::<()>());
            }
        }
        Box::pin(async {})
    }
}

/// Keeps persisted images in memory. Names listed in `failing` fail to persist.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub files: Vec<(String, Vec<u8>)>,
    pub failing: Vec<String>,
}

impl Sink for MemorySink {
    fn persist(&mut self, name: &str, bytes: &[u8]) -> io::Result<String> {
        if self.failing.iter().any(|f| f == name) {
            return Err(io::Error::other("disk full"));
        }
        if !self.files.iter().any(|(n, _)| n == name) {
            self.files.push((name.to_string(), bytes.to_vec()));
        }
        Ok(name.to_string())
    }
}
