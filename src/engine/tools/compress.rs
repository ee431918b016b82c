//! Compression: downscale, re-rate and optionally re-encode a video.

use std::path::PathBuf;

use super::{ensure_not_input, even_floor};
use crate::engine::core::{
    ChromaLayout, EncodeJobSpec, JobPlan, PixelFormat, ToolPaths, VideoFilters, build_encode_cmd,
};
use crate::engine::error::ValidationError;
use crate::engine::hardware::{Backend, CodecRequest};
use crate::engine::probe::StreamFacts;
use crate::engine::validate::Bitrate;

#[derive(Debug, Clone)]
pub struct CompressJob {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Resolution factor in (0, 1)
    pub scale: Option<f64>,
    pub bitrate: Option<Bitrate>,
    /// `None` keeps ffmpeg's default encoder for the container
    pub codec: Option<CodecRequest>,
    pub frame_rate: Option<f64>,
    pub depth: Option<u8>,
    pub chroma: Option<ChromaLayout>,
    pub denoise: bool,
    pub stabilize: bool,
}

impl CompressJob {
    pub fn new(input: PathBuf, output: PathBuf) -> Self {
        Self {
            input,
            output,
            scale: None,
            bitrate: None,
            codec: None,
            frame_rate: None,
            depth: None,
            chroma: None,
            denoise: false,
            stabilize: false,
        }
    }
}

pub fn scaled_size(facts: &StreamFacts, factor: f64) -> Result<(u32, u32), ValidationError> {
    if facts.width == 0 || facts.height == 0 {
        return Err(ValidationError::MissingSourceInfo("frame size"));
    }
    Ok((
        even_floor(facts.width as f64 * factor),
        even_floor(facts.height as f64 * factor),
    ))
}

pub fn plan(
    tools: &ToolPaths,
    job: &CompressJob,
    facts: &StreamFacts,
    backend: Backend,
) -> Result<JobPlan, ValidationError> {
    ensure_not_input(&job.input, &job.output)?;

    let mut spec = EncodeJobSpec::new(job.input.clone(), job.output.clone());
    spec.codec = job.codec.clone();
    spec.bitrate = job.bitrate.clone();
    spec.frame_rate = job.frame_rate;

    let scale = job.scale.map(|f| scaled_size(facts, f)).transpose()?;
    spec.filters = VideoFilters {
        scale,
        crop: None,
        denoise: job.denoise,
        stabilize: job.stabilize,
    };

    let source_format = facts.pix_fmt.as_deref().and_then(PixelFormat::parse_source);
    spec.pixel_format = PixelFormat::merge(job.depth, job.chroma, source_format.as_ref());

    Ok(JobPlan::new("compress")
        .step(build_encode_cmd(&tools.ffmpeg, &spec, backend))
        .output(job.output.clone()))
}
