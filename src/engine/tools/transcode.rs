//! Codec transformer: re-encode into another codec family and container.

use std::path::PathBuf;

use super::{ensure_not_input, output_in};
use crate::engine::core::{EncodeJobSpec, JobPlan, ToolPaths, Trim, build_encode_cmd};
use crate::engine::error::ValidationError;
use crate::engine::hardware::{Backend, CodecRequest};

#[derive(Debug, Clone)]
pub struct TranscodeJob {
    pub input: PathBuf,
    pub output_dir: PathBuf,
    /// Output base name, without extension
    pub name: String,
    pub codec: CodecRequest,
    pub trim: Option<Trim>,
    pub extra_args: Vec<String>,
}

impl TranscodeJob {
    /// Container the output is written in (`mp4` when the request has none)
    pub fn container(&self) -> &str {
        self.codec.container.as_deref().unwrap_or("mp4")
    }

    pub fn output(&self) -> Result<PathBuf, ValidationError> {
        output_in(&self.output_dir, &self.name, self.container())
    }
}

pub fn plan(tools: &ToolPaths, job: &TranscodeJob, backend: Backend) -> Result<JobPlan, ValidationError> {
    let output = job.output()?;
    ensure_not_input(&job.input, &output)?;

    let mut spec = EncodeJobSpec::new(job.input.clone(), output.clone());
    spec.codec = Some(job.codec.clone());
    spec.trim = job.trim.clone();
    spec.extra_args = job.extra_args.clone();

    let duration = spec
        .trim
        .as_ref()
        .and_then(|t| t.duration_arg())
        .and_then(|d| d.parse().ok());

    Ok(JobPlan::new("transcode")
        .step(build_encode_cmd(&tools.ffmpeg, &spec, backend))
        .output(output)
        .duration(duration))
}
