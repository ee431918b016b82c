//! Animated GIF export.

use std::path::PathBuf;
use std::process::Command;

use crate::engine::core::{JobPlan, ToolPaths, Trim};
use crate::engine::error::ValidationError;

pub const DEFAULT_FPS: f64 = 10.0;
pub const DEFAULT_WIDTH: i32 = 320;

#[derive(Debug, Clone)]
pub struct GifJob {
    pub input: PathBuf,
    pub output: PathBuf,
    pub trim: Option<Trim>,
    pub fps: f64,
    /// `(width, height)`; -1 keeps the aspect ratio. `None` keeps the source size.
    pub size: Option<(i32, i32)>,
    /// Generate a per-clip palette for better colours
    pub palette: bool,
}

impl GifJob {
    pub fn new(input: PathBuf, output: PathBuf) -> Self {
        Self {
            input,
            output,
            trim: None,
            fps: DEFAULT_FPS,
            size: Some((DEFAULT_WIDTH, -1)),
            palette: false,
        }
    }

    fn base_filter(&self) -> String {
        let mut filter = format!("fps={}", self.fps);
        if let Some((w, h)) = self.size {
            filter.push_str(&format!(",scale={}:{}:flags=lanczos", w, h));
        }
        filter
    }
}

pub fn plan(tools: &ToolPaths, job: &GifJob) -> Result<JobPlan, ValidationError> {
    if !(job.fps.is_finite() && job.fps > 0.0) {
        return Err(ValidationError::OutOfRange {
            field: "GIF frame rate",
            value: job.fps.to_string(),
            expected: "greater than 0",
        });
    }
    if let Some((w, h)) = job.size {
        if w == 0 || h == 0 || w < -1 || h < -1 || (w == -1 && h == -1) {
            return Err(ValidationError::OutOfRange {
                field: "GIF size",
                value: format!("{}:{}", w, h),
                expected: "positive width and height, one of them may be -1",
            });
        }
    }
    super::ensure_not_input(&job.input, &job.output)?;

    let mut cmd = Command::new(&tools.ffmpeg);
    // Seeking before the input is fast and frame-accurate enough for GIFs
    if let Some(start) = job.trim.as_ref().and_then(Trim::seek_arg) {
        cmd.arg("-ss").arg(start);
    }
    cmd.arg("-i").arg(&job.input);
    if let Some(duration) = job.trim.as_ref().and_then(Trim::duration_arg) {
        cmd.arg("-t").arg(duration);
    }

    if job.palette {
        let graph = format!(
            "[0:v]{},split[a][b];[a]palettegen[p];[b][p]paletteuse",
            job.base_filter()
        );
        cmd.arg("-filter_complex").arg(graph);
    } else {
        cmd.arg("-vf").arg(job.base_filter());
    }

    cmd.args(["-gifflags", "+transdiff", "-y"]);
    cmd.arg(&job.output);

    Ok(JobPlan::new("gif").step(cmd).output(job.output.clone()))
}
