//! Lossless cut: stream copy between two timestamps.

use std::path::PathBuf;
use std::process::Command;

use super::ensure_not_input;
use crate::engine::core::{JobPlan, ToolPaths, Trim};
use crate::engine::error::ValidationError;

#[derive(Debug, Clone)]
pub struct CutJob {
    pub input: PathBuf,
    pub output: PathBuf,
    pub trim: Trim,
}

pub fn plan(tools: &ToolPaths, job: &CutJob) -> Result<JobPlan, ValidationError> {
    ensure_not_input(&job.input, &job.output)?;

    let mut cmd = Command::new(&tools.ffmpeg);
    cmd.arg("-i").arg(&job.input);
    if let Some(start) = job.trim.seek_arg() {
        cmd.arg("-ss").arg(start);
    }
    if let Some(duration) = job.trim.duration_arg() {
        cmd.arg("-t").arg(duration);
    }
    cmd.args(["-c", "copy", "-y"]);
    cmd.arg(&job.output);

    let duration = job.trim.duration_arg().and_then(|d| d.parse().ok());
    Ok(JobPlan::new("cut")
        .step(cmd)
        .output(job.output.clone())
        .duration(duration))
}
