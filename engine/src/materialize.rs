use std::io;

use base64::{Engine as _, engine::general_purpose::STANDARD};
use chrono::NaiveDateTime;
use log::{error, info};

use crate::{error::ImageError, job::GenerationResult};

pub mod file_sink;
pub use file_sink::FileSink;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// Upper bound in bytes for the prompt part of a file name. Keeps the whole
/// name below the 255 byte limit of common file systems.
pub const MAX_PROMPT_BYTES: usize = 180;

/// Destination for decoded images. Returns an identifier for what it stored.
pub trait Sink {
    fn persist(&mut self, name: &str, bytes: &[u8]) -> io::Result<String>;
}

#[derive(Debug, Default)]
pub struct Materialized {
    /// Number of payloads the job returned.
    pub requested: usize,
    pub persisted: Vec<String>,
    pub failures: Vec<ImageError>,
}

impl Materialized {
    pub fn is_complete(&self) -> bool {
        self.persisted.len() == self.requested
    }

    pub fn is_partial(&self) -> bool {
        !self.persisted.is_empty() && !self.is_complete()
    }
}

/// `<timestamp>_<prompt>.png`, with `_<n>` before the extension for the 2nd image onwards.
///
/// The prompt is cut to [`MAX_PROMPT_BYTES`] on a character boundary.
pub fn image_name(captured_at: NaiveDateTime, prompt: &str, index: usize) -> String {
    let stamp = captured_at.format(TIMESTAMP_FORMAT);
    let prompt = sanitize(prompt);
    if index == 0 {
        format!("{stamp}_{prompt}.png")
    } else {
        format!("{stamp}_{prompt}_{}.png", index + 1)
    }
}

fn sanitize(prompt: &str) -> String {
    let mut out = String::new();
    for c in prompt.trim().chars() {
        let c = match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        };
        if out.len() + c.len_utf8() > MAX_PROMPT_BYTES {
            break;
        }
        out.push(c);
    }
    out.trim_end().to_string()
}

/// Decodes every payload of `result` and hands it to `sink`, in order.
///
/// A payload that fails to decode or persist is recorded in
/// [`Materialized::failures`] and the remaining ones are still processed.
pub fn materialize<K: Sink + ?Sized>(
    result: &GenerationResult,
    sink: &mut K,
    captured_at: NaiveDateTime,
) -> Materialized {
    let mut out = Materialized {
        requested: result.images.len(),
        ..Default::default()
    };

    for (index, payload) in result.images.iter().enumerate() {
        let bytes = match STANDARD.decode(payload.trim()) {
            Ok(bytes) => bytes,
            Err(source) => {
                let err = ImageError::Decode { index, source };
                error!("Prompt {:?}: {err}", result.source_prompt);
                out.failures.push(err);
                continue;
            }
        };

        let name = image_name(captured_at, &result.source_prompt, index);
        match sink.persist(&name, &bytes) {
            Ok(id) => {
                info!("Saved: {id}");
                out.persisted.push(id);
            }
            Err(source) => {
                let err = ImageError::Persist {
                    index,
                    name,
                    source,
                };
                error!("Prompt {:?}: {err}", result.source_prompt);
                out.failures.push(err);
            }
        }
    }

    out
}
