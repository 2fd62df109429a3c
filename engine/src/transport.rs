use std::pin::Pin;

use serde_json::Value;

use crate::error::TransportError;

pub mod http;
pub use http::HttpTransport;

pub type TransportFuture<'a> =
    Pin<Box<dyn Future<Output = Result<Value, TransportError>> + Send + 'a>>;

/// Authenticated request executor. Paths are relative to the service's base url.
///
/// Implementations attach the credentials to every call and never retry.
pub trait Transport {
    fn get_json<'a>(&'a self, path: &'a str) -> TransportFuture<'a>;
    fn post_multipart<'a>(&'a self, path: &'a str, form: Form) -> TransportFuture<'a>;
    fn post_json<'a>(&'a self, path: &'a str, body: &'a Value) -> TransportFuture<'a>;
}

/// A multipart body made only of text fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Form {
    pub parts: Vec<FormPart>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormPart {
    pub name: String,
    pub value: String,
    pub content_type: Option<String>,
}

impl Form {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parts.push(FormPart {
            name: name.into(),
            value: value.into(),
            content_type: None,
        });
        self
    }

    /// A field whose value is already JSON-encoded.
    pub fn json(mut self, name: impl Into<String>, encoded: impl Into<String>) -> Self {
        self.parts.push(FormPart {
            name: name.into(),
            value: encoded.into(),
            content_type: Some("application/json".into()),
        });
        self
    }

    pub fn get(&self, name: &str) -> Option<&FormPart> {
        self.parts.iter().find(|p| p.name == name)
    }
}
