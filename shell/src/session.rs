use std::io;

use color_eyre::{Report, Result};
use fusion_engine::{
    Generator, Materialized, Sink,
    error::{GenerateError, PollError},
};
use log::info;
use tokio_util::sync::CancellationToken;

use crate::{APP_NAME, terminal::Terminal};

/// Prompt inputs that end the session.
pub const EXIT_WORDS: [&str; 3] = ["exit", "quit", "q"];

#[derive(Debug, PartialEq, Eq)]
pub enum Input<'a> {
    Exit,
    Empty,
    Prompt(&'a str),
}

pub fn classify(line: &str) -> Input<'_> {
    let line = line.trim();
    if line.is_empty() {
        Input::Empty
    } else if EXIT_WORDS.iter().any(|w| line.eq_ignore_ascii_case(w)) {
        Input::Exit
    } else {
        Input::Prompt(line)
    }
}

pub struct Session<'a> {
    pub generator: &'a Generator,
    pub sink: &'a mut (dyn Sink + Send),
    pub image_count: u32,
    pub shutdown: CancellationToken,
}

impl Session<'_> {
    /// Runs one job per prompt until the user quits or `shutdown` is cancelled.
    ///
    /// Failed jobs are reported and the loop continues with the next prompt.
    pub async fn run(&mut self, term: &mut dyn Terminal) -> Result<()> {
        term.say(&format!("\n*** {APP_NAME} ***"));
        term.say("Type 'exit' to quit.");

        while !self.shutdown.is_cancelled() {
            let line = match term.read_line("\nDescribe the image") {
                Ok(line) => line,
                Err(e) if is_interrupt(&e) => break,
                Err(e) => return Err(e),
            };
            if self.shutdown.is_cancelled() {
                break;
            }

            let prompt = match classify(&line) {
                Input::Exit => break,
                Input::Empty => {
                    term.say("Please enter a description.");
                    continue;
                }
                Input::Prompt(prompt) => prompt,
            };

            term.busy("Generating, please wait...");
            let outcome = self
                .generator
                .generate(prompt, self.image_count, &mut *self.sink, &self.shutdown)
                .await;
            term.idle();
            report(term, outcome);
        }

        term.say("Goodbye!");
        Ok(())
    }
}

/// Ctrl-C at the prompt surfaces as an interrupted read.
fn is_interrupt(err: &Report) -> bool {
    err.chain().any(|cause| {
        cause
            .downcast_ref::<io::Error>()
            .is_some_and(|e| e.kind() == io::ErrorKind::Interrupted)
    })
}

fn report(term: &mut dyn Terminal, outcome: std::result::Result<Materialized, GenerateError>) {
    match outcome {
        Ok(out) if !out.persisted.is_empty() => {
            term.say(&format!("✅ Generated {} image(s):", out.persisted.len()));
            for id in &out.persisted {
                term.say(&format!("   {id}"));
            }
            if !out.failures.is_empty() {
                term.say(&format!(
                    "⚠ {} of {} image(s) could not be saved.",
                    out.failures.len(),
                    out.requested
                ));
            }
        }
        Ok(out) if out.requested == 0 => term.say("❌ The service returned no images."),
        Ok(out) => term.say(&format!(
            "❌ None of the {} image(s) could be saved.",
            out.requested
        )),
        Err(GenerateError::Poll(PollError::Cancelled)) => {
            info!("Generation cancelled by the user");
            term.say("Cancelled.");
        }
        Err(e) => term.say(&format!("❌ Generation failed: {e}")),
    }
}
