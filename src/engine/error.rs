//! Error types shared by every tool.
//!
//! `ValidationError` covers anything detected before an external process is
//! launched. `ProcessError` covers the external tools themselves.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("invalid time '{0}': use hh:mm:ss[.fraction] or seconds (e.g. 120 or 01:30:00)")]
    InvalidTime(String),

    #[error("end time {end} must be after start time {start}")]
    EndNotAfterStart { start: String, end: String },

    #[error("output name '{name}' is not legal: {reason}")]
    IllegalFilename { name: String, reason: &'static str },

    #[error("{field} must be a number, got '{value}'")]
    NotANumber { field: &'static str, value: String },

    #[error("{field} {value} is out of range: expected {expected}")]
    OutOfRange {
        field: &'static str,
        value: String,
        expected: &'static str,
    },

    #[error("invalid aspect ratio '{0}': expected a:b with positive numbers (e.g. 16:9)")]
    InvalidAspect(String),

    #[error("unsupported container '{0}': expected mp4, mov, mkv or webm")]
    UnsupportedContainer(String),

    #[error("input file does not exist: {0}")]
    MissingInput(PathBuf),

    #[error("output directory does not exist: {0}")]
    MissingOutputDir(PathBuf),

    #[error("output {0} would overwrite the input file")]
    OutputIsInput(PathBuf),

    #[error("source media has no usable {0}")]
    MissingSourceInfo(&'static str),

    #[error("audio is shorter than the video: choose 'pad' or 'keep'")]
    ShortAudioModeRequired,

    #[error("a cut needs a start time, an end time or both")]
    EmptyWindow,
}

#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("failed to launch {program}. Is it installed and in PATH?")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} exited with {status}: {detail}")]
    Failed {
        program: String,
        status: String,
        detail: String,
    },

    #[error("unexpected output from {program}: {detail}")]
    Parse { program: String, detail: String },
}

impl ProcessError {
    pub(crate) fn parse(program: &str, detail: impl Into<String>) -> Self {
        Self::Parse {
            program: program.to_string(),
            detail: detail.into(),
        }
    }
}
