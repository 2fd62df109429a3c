use std::time::Duration;

use color_eyre::Result;
use dialoguer::{Input, Password};
use indicatif::{ProgressBar, ProgressStyle};

/// The console as seen by the session: line input, output and a busy indicator.
pub trait Terminal {
    fn read_line(&mut self, prompt: &str) -> Result<String>;
    fn read_secret(&mut self, prompt: &str) -> Result<String>;
    fn say(&mut self, line: &str);
    fn busy(&mut self, message: &str);
    fn idle(&mut self);
}

#[derive(Default)]
pub struct Console {
    spinner: Option<ProgressBar>,
}

impl Terminal for Console {
    fn read_line(&mut self, prompt: &str) -> Result<String> {
        Ok(Input::<String>::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()?)
    }

    fn read_secret(&mut self, prompt: &str) -> Result<String> {
        Ok(Password::new()
            .with_prompt(prompt)
            .allow_empty_password(true)
            .interact()?)
    }

    fn say(&mut self, line: &str) {
        match &self.spinner {
            Some(spinner) => spinner.println(line),
            None => println!("{line}"),
        }
    }

    fn busy(&mut self, message: &str) {
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner} {msg} {elapsed}") {
            spinner.set_style(style);
        }
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(Duration::from_millis(120));
        self.spinner = Some(spinner);
    }

    fn idle(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
    }
}

#[cfg(test)]
pub mod scripted {
    use std::{collections::VecDeque, io};

    use color_eyre::eyre::eyre;

    use super::*;

    /// Feeds canned input lines and records everything printed. A `"\u{3}"`
    /// line (Ctrl-C) reads as an interrupted io error.
    #[derive(Default)]
    pub struct ScriptedTerminal {
        pub input: VecDeque<String>,
        pub output: Vec<String>,
        pub prompts: Vec<String>,
    }

    impl ScriptedTerminal {
        pub fn with_input(lines: &[&str]) -> Self {
            Self {
                input: lines.iter().map(|l| l.to_string()).collect(),
                ..Default::default()
            }
        }
    }

    impl Terminal for ScriptedTerminal {
        fn read_line(&mut self, prompt: &str) -> Result<String> {
            self.prompts.push(prompt.to_string());
            match self.input.pop_front() {
                Some(line) if line == "\u{3}" => {
                    Err(io::Error::from(io::ErrorKind::Interrupted).into())
                }
                Some(line) => Ok(line),
                None => Err(eyre!("end of input")),
            }
        }

        fn read_secret(&mut self, prompt: &str) -> Result<String> {
            self.read_line(prompt)
        }

        fn say(&mut self, line: &str) {
            self.output.push(line.to_string());
        }

        fn busy(&mut self, _message: &str) {}

        fn idle(&mut self) {}
    }
}
