//! Playback speed change for video and audio together.

use std::path::{Path, PathBuf};
use std::process::Command;

use super::{ensure_not_input, format_factor, sibling};
use crate::engine::core::{JobPlan, ToolPaths};
use crate::engine::error::ValidationError;
use crate::engine::probe::ProbeReport;

/// Range a single `atempo` stage accepts without degrading
const ATEMPO_MIN: f64 = 0.5;
const ATEMPO_MAX: f64 = 2.0;

#[derive(Debug, Clone)]
pub struct SpeedJob {
    pub input: PathBuf,
    pub output: PathBuf,
    pub factor: f64,
    /// Keep the audio pitch (atempo) instead of resampling
    pub keep_pitch: bool,
}

/// What the planner needs to know about the source
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SpeedSource {
    pub has_audio: bool,
    pub sample_rate: Option<u32>,
    pub duration: Option<f64>,
}

impl SpeedSource {
    pub fn from_report(report: &ProbeReport) -> Self {
        let audio = report.audio();
        Self {
            has_audio: audio.is_some(),
            sample_rate: audio.and_then(|a| a.sample_rate_hz()),
            duration: report.duration(),
        }
    }
}

pub fn default_output(input: &Path, factor: f64) -> PathBuf {
    sibling(input, &format!("_x{}", format_factor(factor)), None)
}

/// Split a tempo factor into `atempo` stages that each stay within [0.5, 2.0].
///
/// The product of the stages equals the factor.
pub fn tempo_chain(factor: f64) -> Vec<f64> {
    let mut stages = Vec::new();
    let mut remainder = factor;
    while remainder > ATEMPO_MAX {
        stages.push(ATEMPO_MAX);
        remainder /= ATEMPO_MAX;
    }
    while remainder < ATEMPO_MIN {
        stages.push(ATEMPO_MIN);
        remainder /= ATEMPO_MIN;
    }
    stages.push(remainder);
    stages
}

fn atempo_filter(factor: f64) -> String {
    tempo_chain(factor)
        .into_iter()
        .map(|stage| format!("atempo={}", format_factor(stage)))
        .collect::<Vec<_>>()
        .join(",")
}

fn audio_filter(job: &SpeedJob, source: &SpeedSource) -> String {
    match (job.keep_pitch, source.sample_rate) {
        (false, Some(rate)) => {
            let shifted = (rate as f64 * job.factor).round() as u64;
            format!("asetrate={},aresample={}", shifted, rate)
        }
        _ => atempo_filter(job.factor),
    }
}

pub fn plan(tools: &ToolPaths, job: &SpeedJob, source: &SpeedSource) -> Result<JobPlan, ValidationError> {
    if !(job.factor.is_finite() && job.factor > 0.0) {
        return Err(ValidationError::OutOfRange {
            field: "speed factor",
            value: job.factor.to_string(),
            expected: "greater than 0",
        });
    }
    ensure_not_input(&job.input, &job.output)?;

    let video = format!("[0:v]setpts={}*PTS[v]", format_factor(1.0 / job.factor));

    let mut cmd = Command::new(&tools.ffmpeg);
    cmd.arg("-i").arg(&job.input);
    if source.has_audio {
        let graph = format!("{};[0:a]{}[a]", video, audio_filter(job, source));
        cmd.arg("-filter_complex").arg(graph);
        cmd.args(["-map", "[v]", "-map", "[a]"]);
    } else {
        cmd.arg("-filter_complex").arg(video);
        cmd.args(["-map", "[v]", "-an"]);
    }
    cmd.arg("-y").arg(&job.output);

    Ok(JobPlan::new("speed")
        .step(cmd)
        .output(job.output.clone())
        .duration(source.duration.map(|d| d / job.factor)))
}
