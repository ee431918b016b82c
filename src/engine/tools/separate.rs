//! Split a video into a silent video and a standalone audio file.

use std::path::{Path, PathBuf};
use std::process::Command;

use super::{ensure_not_input, sibling};
use crate::engine::core::{JobPlan, ToolPaths};
use crate::engine::error::ValidationError;

#[derive(Debug, Clone)]
pub struct SeparateJob {
    pub input: PathBuf,
    pub video_output: PathBuf,
    pub audio_output: PathBuf,
    /// Encoder passed to `-acodec`
    pub audio_codec: String,
}

impl SeparateJob {
    /// `<stem>_no_audio<ext>` and `<stem>.<audio_ext>` next to the input
    pub fn beside(input: &Path, audio_codec: &str, audio_ext: &str) -> Self {
        Self {
            input: input.to_path_buf(),
            video_output: sibling(input, "_no_audio", None),
            audio_output: sibling(input, "", Some(audio_ext)),
            audio_codec: audio_codec.to_string(),
        }
    }
}

pub fn plan(tools: &ToolPaths, job: &SeparateJob) -> Result<JobPlan, ValidationError> {
    ensure_not_input(&job.input, &job.video_output)?;
    ensure_not_input(&job.input, &job.audio_output)?;

    let mut video = Command::new(&tools.ffmpeg);
    video.arg("-i").arg(&job.input);
    video.args(["-an", "-c:v", "copy", "-y"]);
    video.arg(&job.video_output);

    let mut audio = Command::new(&tools.ffmpeg);
    audio.arg("-i").arg(&job.input);
    audio.args(["-vn", "-acodec"]).arg(&job.audio_codec);
    audio.arg("-y").arg(&job.audio_output);

    Ok(JobPlan::new("separate")
        .step(video)
        .step(audio)
        .output(job.video_output.clone())
        .output(job.audio_output.clone()))
}
