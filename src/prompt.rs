//! Line-oriented prompts that keep asking until the answer is valid.

use std::fmt::Display;
use std::io::{BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result, bail};

use crate::engine::core::Timecode;
use crate::engine::validate::{check_output_name, ensure_input_file, ensure_output_dir, normalize_dir};

pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Print `question` and read one trimmed line. End of input is an error.
    pub fn ask(&mut self, question: &str) -> Result<String> {
        write!(self.output, "{}", question)?;
        self.output.flush()?;

        let mut line = String::new();
        let read = self.input.read_line(&mut line).context("Failed to read input")?;
        if read == 0 {
            bail!("input closed while waiting for an answer");
        }
        Ok(line.trim().to_string())
    }

    pub fn say(&mut self, message: impl Display) -> Result<()> {
        writeln!(self.output, "{}", message)?;
        Ok(())
    }

    /// Ask until `parse` accepts the answer, showing its error each time
    pub fn ask_until<T, E: Display>(
        &mut self,
        question: &str,
        mut parse: impl FnMut(&str) -> Result<T, E>,
    ) -> Result<T> {
        loop {
            let answer = self.ask(question)?;
            match parse(&answer) {
                Ok(value) => return Ok(value),
                Err(e) => self.say(format_args!("\t{}. Please try again.", e))?,
            }
        }
    }

    /// Like [`ask_until`](Self::ask_until), but an empty answer means "skip"
    pub fn optional<T, E: Display>(
        &mut self,
        question: &str,
        mut parse: impl FnMut(&str) -> Result<T, E>,
    ) -> Result<Option<T>> {
        self.ask_until(question, |answer| {
            if answer.is_empty() {
                Ok(None)
            } else {
                parse(answer).map(Some)
            }
        })
    }

    pub fn existing_file(&mut self, question: &str) -> Result<PathBuf> {
        self.ask_until(question, |answer| {
            let path = PathBuf::from(answer);
            ensure_input_file(&path).map(|_| path)
        })
    }

    pub fn existing_dir(&mut self, question: &str) -> Result<PathBuf> {
        self.ask_until(question, |answer| {
            let path = normalize_dir(answer);
            ensure_output_dir(&path).map(|_| path)
        })
    }

    pub fn output_name(&mut self, question: &str) -> Result<String> {
        self.ask_until(question, |answer| {
            check_output_name(answer).map(|_| answer.to_string())
        })
    }

    pub fn time(&mut self, question: &str) -> Result<Option<Timecode>> {
        self.optional(question, str::parse::<Timecode>)
    }

    /// Pick one of `options` by its label (case-insensitive)
    pub fn choice<T: Copy>(&mut self, question: &str, options: &[(&str, T)]) -> Result<T> {
        let labels: Vec<&str> = options.iter().map(|(label, _)| *label).collect();
        self.ask_until(question, |answer| {
            options
                .iter()
                .find(|(label, _)| label.eq_ignore_ascii_case(answer))
                .map(|(_, value)| *value)
                .ok_or_else(|| format!("'{}' is not one of {}", answer, labels.join(", ")))
        })
    }

    /// y/n question; an empty answer takes `default`
    pub fn yes_no(&mut self, question: &str, default: bool) -> Result<bool> {
        self.ask_until(question, |answer| match answer.to_ascii_lowercase().as_str() {
            "" => Ok(default),
            "y" | "yes" => Ok(true),
            "n" | "no" => Ok(false),
            other => Err(format!("'{}' is not y or n", other)),
        })
    }
}
