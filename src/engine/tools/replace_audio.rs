//! Replace a video's soundtrack with another audio file, fitted to the video's length.

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{ensure_not_input, scratch_path, sibling};
use crate::engine::core::{JobPlan, ToolPaths};
use crate::engine::error::ValidationError;

/// Durations closer than this are treated as equal
const DURATION_EPSILON: f64 = 1e-3;

/// What to do when the new audio is shorter than the video
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShortAudioMode {
    /// Pad with silence up to the video length
    Pad,
    /// Use the audio as it is; the tail of the video is silent
    Keep,
}

impl fmt::Display for ShortAudioMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Pad => "pad",
            Self::Keep => "keep",
        })
    }
}

/// How the audio is prepared before it is muxed in
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AudioPrep {
    AsIs,
    /// Cut to the video duration with a stream copy
    Trim { duration: f64 },
    /// Pad with silence to the video duration, re-encoded to AAC
    Pad { duration: f64 },
}

#[derive(Debug, Clone)]
pub struct ReplaceAudioJob {
    pub video: PathBuf,
    pub audio: PathBuf,
    pub output: PathBuf,
    /// Needed only when the audio turns out to be shorter
    pub short_audio: Option<ShortAudioMode>,
}

impl ReplaceAudioJob {
    pub fn new(video: PathBuf, audio: PathBuf) -> Self {
        let output = default_output(&video);
        Self {
            video,
            audio,
            output,
            short_audio: None,
        }
    }
}

/// `<stem>_with_new_audio<ext>` beside the video
pub fn default_output(video: &Path) -> PathBuf {
    sibling(video, "_with_new_audio", None)
}

pub fn decide(
    video_duration: f64,
    audio_duration: f64,
    mode: Option<ShortAudioMode>,
) -> Result<AudioPrep, ValidationError> {
    if !(video_duration.is_finite() && video_duration > 0.0) {
        return Err(ValidationError::MissingSourceInfo("video duration"));
    }
    if !audio_duration.is_finite() || audio_duration < 0.0 {
        return Err(ValidationError::MissingSourceInfo("audio duration"));
    }

    let diff = audio_duration - video_duration;
    if diff.abs() <= DURATION_EPSILON {
        return Ok(AudioPrep::AsIs);
    }
    if diff > 0.0 {
        return Ok(AudioPrep::Trim {
            duration: video_duration,
        });
    }
    match mode {
        Some(ShortAudioMode::Pad) => Ok(AudioPrep::Pad {
            duration: video_duration,
        }),
        Some(ShortAudioMode::Keep) => Ok(AudioPrep::AsIs),
        None => Err(ValidationError::ShortAudioModeRequired),
    }
}

pub fn plan(
    tools: &ToolPaths,
    job: &ReplaceAudioJob,
    video_duration: f64,
    audio_duration: f64,
) -> Result<JobPlan, ValidationError> {
    ensure_not_input(&job.video, &job.output)?;
    ensure_not_input(&job.audio, &job.output)?;

    let prep = decide(video_duration, audio_duration, job.short_audio)?;
    debug!(video_duration, audio_duration, ?prep, "audio preparation");

    let mut plan = JobPlan::new("replace-audio").duration(Some(video_duration));

    let audio_source = match prep {
        AudioPrep::AsIs => job.audio.clone(),
        AudioPrep::Trim { duration } => {
            let ext = job
                .audio
                .extension()
                .map(|e| e.to_string_lossy().into_owned())
                .unwrap_or_else(|| "aac".to_string());
            let scratch = scratch_path(plan.id, "trimmed_audio", &ext);

            let mut cmd = Command::new(&tools.ffmpeg);
            cmd.arg("-i").arg(&job.audio);
            cmd.arg("-t").arg(duration.to_string());
            cmd.args(["-c", "copy", "-y"]);
            cmd.arg(&scratch);

            plan = plan.step(cmd).scratch(scratch.clone());
            scratch
        }
        AudioPrep::Pad { duration } => {
            let scratch = scratch_path(plan.id, "padded_audio", "aac");

            let mut cmd = Command::new(&tools.ffmpeg);
            cmd.arg("-i").arg(&job.audio);
            cmd.arg("-filter_complex")
                .arg(format!("[0:a]apad=whole_dur={}[out]", duration));
            cmd.args(["-map", "[out]", "-c:a", "aac", "-y"]);
            cmd.arg(&scratch);

            plan = plan.step(cmd).scratch(scratch.clone());
            scratch
        }
    };

    let mut mux = Command::new(&tools.ffmpeg);
    mux.arg("-i").arg(&job.video);
    mux.arg("-i").arg(&audio_source);
    mux.args([
        "-c:v", "copy", "-map", "0:v:0", "-map", "1:a:0", "-shortest", "-y",
    ]);
    mux.arg(&job.output);

    Ok(plan.step(mux).output(job.output.clone()))
}
