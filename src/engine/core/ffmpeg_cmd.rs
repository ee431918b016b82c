use std::path::PathBuf;
use std::process::Command;
use std::sync::LazyLock;

use regex::Regex;

use super::timecode::Trim;
use crate::engine::hardware::{Backend, CodecRequest};
use crate::engine::validate::Bitrate;

/// Denoise filter applied by `--denoise`
pub const DENOISE_FILTER: &str = "hqdn3d=1.5:1.5:6.0:6.0";
/// Stabilisation filter applied by `--stabilize`
pub const STABILIZE_FILTER: &str = "deshake";

static SOURCE_PIX_FMT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^yuvj?(420|422|444)p(?:(\d{1,2})(?:le|be))?$").expect("static regex")
});

/// Chroma subsampling layout of a YUV pixel format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChromaLayout {
    Yuv420,
    Yuv422,
    Yuv444,
}

impl ChromaLayout {
    pub fn digits(&self) -> &'static str {
        match self {
            Self::Yuv420 => "420",
            Self::Yuv422 => "422",
            Self::Yuv444 => "444",
        }
    }

    /// Accepts `4:2:0` as well as `420`
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().replace(':', "").as_str() {
            "420" => Some(Self::Yuv420),
            "422" => Some(Self::Yuv422),
            "444" => Some(Self::Yuv444),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelFormat {
    pub chroma: ChromaLayout,
    pub depth: u8,
}

impl PixelFormat {
    pub fn new(chroma: ChromaLayout, depth: u8) -> Self {
        Self { chroma, depth }
    }

    /// `yuv{chroma}p{depth}le`; 8-bit formats have no depth suffix in ffmpeg
    pub fn ffmpeg_name(&self) -> String {
        if self.depth <= 8 {
            format!("yuv{}p", self.chroma.digits())
        } else {
            format!("yuv{}p{}le", self.chroma.digits(), self.depth)
        }
    }

    /// Read a source `pix_fmt` such as `yuv420p10le`
    pub fn parse_source(pix_fmt: &str) -> Option<Self> {
        let caps = SOURCE_PIX_FMT.captures(pix_fmt.trim())?;
        let chroma = ChromaLayout::parse(&caps[1])?;
        let depth = match caps.get(2) {
            Some(d) => d.as_str().parse().ok()?,
            None => 8,
        };
        Some(Self { chroma, depth })
    }

    /// Fill whichever half the user left out from the source format.
    ///
    /// Without a readable source the missing half defaults to 4:2:0 / 8-bit.
    pub fn merge(
        depth: Option<u8>,
        chroma: Option<ChromaLayout>,
        source: Option<&PixelFormat>,
    ) -> Option<Self> {
        if depth.is_none() && chroma.is_none() {
            return None;
        }
        let chroma = chroma
            .or(source.map(|s| s.chroma))
            .unwrap_or(ChromaLayout::Yuv420);
        let depth = depth.or(source.map(|s| s.depth)).unwrap_or(8);
        Some(Self { chroma, depth })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRect {
    pub width: u32,
    pub height: u32,
    pub x: u32,
    pub y: u32,
}

/// Video filters that end up in one `-vf` chain.
///
/// Filters compose in the order scale, crop, denoise, stabilise; none of them
/// replaces another.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VideoFilters {
    pub scale: Option<(u32, u32)>,
    pub crop: Option<CropRect>,
    pub denoise: bool,
    pub stabilize: bool,
}

impl VideoFilters {
    pub fn chain(&self) -> Option<String> {
        let mut parts = Vec::new();
        if let Some((w, h)) = self.scale {
            parts.push(format!("scale={}:{}", w, h));
        }
        if let Some(c) = self.crop {
            parts.push(format!("crop={}:{}:{}:{}", c.width, c.height, c.x, c.y));
        }
        if self.denoise {
            parts.push(DENOISE_FILTER.to_string());
        }
        if self.stabilize {
            parts.push(STABILIZE_FILTER.to_string());
        }
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(","))
        }
    }
}

/// One encode: input, output and every optional knob
#[derive(Debug, Clone, PartialEq)]
pub struct EncodeJobSpec {
    pub input: PathBuf,
    pub output: PathBuf,
    pub codec: Option<CodecRequest>,
    pub trim: Option<Trim>,
    pub filters: VideoFilters,
    pub pixel_format: Option<PixelFormat>,
    pub frame_rate: Option<f64>,
    pub bitrate: Option<Bitrate>,
    pub crf: Option<u8>,
    pub preset: Option<String>,
    pub extra_args: Vec<String>,
}

impl EncodeJobSpec {
    pub fn new(input: PathBuf, output: PathBuf) -> Self {
        Self {
            input,
            output,
            codec: None,
            trim: None,
            filters: VideoFilters::default(),
            pixel_format: None,
            frame_rate: None,
            bitrate: None,
            crf: None,
            preset: None,
            extra_args: Vec::new(),
        }
    }
}

/// Assemble the encode command. Inputs are validated when the `EncodeJobSpec` is built,
/// so this cannot fail.
pub fn build_encode_cmd(ffmpeg: &str, spec: &EncodeJobSpec, backend: Backend) -> Command {
    let mut cmd = Command::new(ffmpeg);
    cmd.arg("-i").arg(&spec.input);

    if let Some(trim) = &spec.trim {
        if let Some(start) = trim.seek_arg() {
            cmd.arg("-ss").arg(start);
        }
        if let Some(duration) = trim.duration_arg() {
            cmd.arg("-t").arg(duration);
        }
    }

    if let Some(codec) = &spec.codec {
        cmd.arg("-c:v").arg(backend.qualify(&codec.family));
    }

    if let Some(chain) = spec.filters.chain() {
        cmd.arg("-vf").arg(chain);
    }
    if let Some(bitrate) = &spec.bitrate {
        cmd.arg("-b:v").arg(bitrate.as_str());
    }
    if let Some(fps) = spec.frame_rate {
        cmd.arg("-r").arg(fps.to_string());
    }
    if let Some(pix_fmt) = &spec.pixel_format {
        cmd.arg("-pix_fmt").arg(pix_fmt.ffmpeg_name());
    }
    if let Some(crf) = spec.crf {
        cmd.arg("-crf").arg(crf.to_string());
    }
    if let Some(preset) = &spec.preset {
        cmd.arg("-preset").arg(preset);
    }

    cmd.args(&spec.extra_args);

    cmd.arg("-y").arg(&spec.output);
    cmd
}

/// Split user-provided ffmpeg arguments shell-style so quoted strings survive
pub fn parse_additional_args(additional_args: &str) -> Vec<String> {
    if additional_args.trim().is_empty() {
        return Vec::new();
    }
    // Unbalanced quotes fall back to a plain whitespace split
    shlex::split(additional_args).unwrap_or_else(|| {
        additional_args
            .split_whitespace()
            .map(str::to_string)
            .collect()
    })
}

/// Arguments of a command as owned strings (program excluded)
pub fn command_args(cmd: &Command) -> Vec<String> {
    cmd.get_args()
        .map(|a| a.to_string_lossy().into_owned())
        .collect()
}

/// Render a command so it can be pasted into a shell
pub fn format_ffmpeg_cmd(cmd: &Command) -> String {
    std::iter::once(cmd.get_program().to_string_lossy().into_owned())
        .chain(command_args(cmd))
        .map(|part| {
            if part.contains(' ') {
                format!("\"{}\"", part)
            } else {
                part
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
