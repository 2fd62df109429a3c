use std::time::Duration;

use log::debug;
use reqwest::{Client, RequestBuilder, multipart};
use serde_json::Value;

use crate::{
    credentials::Credentials,
    error::TransportError,
    transport::{Form, Transport, TransportFuture},
};

pub const DEFAULT_BASE_URL: &str = "https://api-key.fusionbrain.ai";

#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: String,
    credentials: Credentials,
    timeout: Duration,
}

impl HttpTransport {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

    pub fn new(credentials: Credentials) -> Self {
        Self::with_base_url(credentials, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(credentials: Credentials, base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            credentials,
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .timeout(self.timeout)
            .header("X-Key", self.credentials.key_header())
            .header("X-Secret", self.credentials.secret_header())
    }
}

fn to_multipart(form: Form) -> Result<multipart::Form, TransportError> {
    let mut out = multipart::Form::new();
    for part in form.parts {
        let mut p = multipart::Part::text(part.value);
        if let Some(ct) = &part.content_type {
            p = p.mime_str(ct)?;
        }
        out = out.part(part.name, p);
    }
    Ok(out)
}

async fn execute(builder: RequestBuilder) -> Result<Value, TransportError> {
    let resp = builder.send().await?;
    let status = resp.status();
    let text = resp.text().await?;

    if !status.is_success() {
        return Err(TransportError::Status {
            status: status.as_u16(),
            body: text,
        });
    }

    debug!("Response ({status}): {text}");
    Ok(serde_json::from_str(&text)?)
}

impl Transport for HttpTransport {
    fn get_json<'a>(&'a self, path: &'a str) -> TransportFuture<'a> {
        Box::pin(async move {
            let url = self.url(path);
            debug!("GET {url}");
            execute(self.authorized(self.client.get(url))).await
        })
    }

    fn post_multipart<'a>(&'a self, path: &'a str, form: Form) -> TransportFuture<'a> {
        Box::pin(async move {
            let url = self.url(path);
            debug!("POST {url} (multipart):\n{form:#?}");
            let form = to_multipart(form)?;
            execute(self.authorized(self.client.post(url)).multipart(form)).await
        })
    }

    fn post_json<'a>(&'a self, path: &'a str, body: &'a Value) -> TransportFuture<'a> {
        Box::pin(async move {
            let url = self.url(path);
            debug!("POST {url}: {body}");
            execute(self.authorized(self.client.post(url)).json(body)).await
        })
    }
}
