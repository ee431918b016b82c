//! Aspect-ratio change by stretching (scale) or centred cropping.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{ensure_not_input, even_floor, sibling};
use crate::engine::core::{CropRect, EncodeJobSpec, JobPlan, ToolPaths, VideoFilters, build_encode_cmd};
use crate::engine::error::ValidationError;
use crate::engine::hardware::{Backend, CodecRequest};
use crate::engine::probe::StreamFacts;
use crate::engine::validate::AspectRatio;

/// Software encoder used for every ratio change
pub const RATIO_ENCODER: &str = "libx264";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RatioMode {
    Stretch,
    Crop,
}

impl RatioMode {
    fn file_tag(&self) -> &'static str {
        match self {
            Self::Stretch => "stretched",
            Self::Crop => "cropped",
        }
    }
}

impl fmt::Display for RatioMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Stretch => "stretch",
            Self::Crop => "crop",
        })
    }
}

#[derive(Debug, Clone)]
pub struct RatioJob {
    pub input: PathBuf,
    pub output: PathBuf,
    pub aspect: AspectRatio,
    pub mode: RatioMode,
    pub crf: u8,
    pub preset: String,
}

/// `<stem>_stretched_16_9.mp4` / `<stem>_cropped_16_9.mp4` beside the input
pub fn default_output(input: &Path, aspect: &AspectRatio, mode: RatioMode) -> PathBuf {
    sibling(
        input,
        &format!("_{}_{}", mode.file_tag(), aspect.file_tag()),
        Some("mp4"),
    )
}

/// Largest frame with the target ratio that fits inside the source, centred
pub fn fit_rect(width: u32, height: u32, aspect: &AspectRatio) -> Result<CropRect, ValidationError> {
    if width == 0 || height == 0 {
        return Err(ValidationError::MissingSourceInfo("frame size"));
    }
    let source = width as f64 / height as f64;

    // Multiply before dividing so exact ratios stay exact
    let (w, h) = if source > aspect.ratio() {
        (
            even_floor(height as f64 * aspect.width / aspect.height),
            height - height % 2,
        )
    } else {
        (
            width - width % 2,
            even_floor(width as f64 * aspect.height / aspect.width),
        )
    };
    let (w, h) = (w.min(width).max(2), h.min(height).max(2));

    Ok(CropRect {
        width: w,
        height: h,
        x: width.saturating_sub(w) / 2,
        y: height.saturating_sub(h) / 2,
    })
}

pub fn plan(tools: &ToolPaths, job: &RatioJob, facts: &StreamFacts) -> Result<JobPlan, ValidationError> {
    ensure_not_input(&job.input, &job.output)?;
    let rect = fit_rect(facts.width, facts.height, &job.aspect)?;

    let mut spec = EncodeJobSpec::new(job.input.clone(), job.output.clone());
    spec.codec = Some(CodecRequest::new(RATIO_ENCODER));
    spec.crf = Some(job.crf);
    spec.preset = Some(job.preset.clone());
    spec.filters = match job.mode {
        RatioMode::Stretch => VideoFilters {
            scale: Some((rect.width, rect.height)),
            ..VideoFilters::default()
        },
        RatioMode::Crop => VideoFilters {
            crop: Some(rect),
            ..VideoFilters::default()
        },
    };

    Ok(JobPlan::new("ratio")
        .step(build_encode_cmd(&tools.ffmpeg, &spec, Backend::Cpu))
        .output(job.output.clone()))
}
