//! Local input validation, run before any external process is launched.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

use super::error::ValidationError;

const RESERVED_NAMES: &[&str] = &[
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
    "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];

const ILLEGAL_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

const MAX_NAME_LEN: usize = 255;

/// Containers the transcode tool writes
pub const CONTAINERS: &[&str] = &["mp4", "mov", "mkv", "webm"];

static BITRATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+(?:\.\d+)?)([kKmM]?)$").expect("static regex"));

/// Check an output file name (without directory) against the portable rule set
pub fn check_output_name(name: &str) -> Result<(), ValidationError> {
    let illegal = |reason| ValidationError::IllegalFilename {
        name: name.to_string(),
        reason,
    };

    if name.is_empty() {
        return Err(illegal("name is empty"));
    }
    if name.contains(ILLEGAL_CHARS) {
        return Err(illegal("contains one of < > : \" / \\ | ? *"));
    }
    if RESERVED_NAMES.contains(&name.to_ascii_uppercase().as_str()) {
        return Err(illegal("reserved device name"));
    }
    if name.ends_with(' ') || name.ends_with('.') {
        return Err(illegal("ends with a space or dot"));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(illegal("longer than 255 characters"));
    }
    Ok(())
}

pub fn is_valid_filename(name: &str) -> bool {
    check_output_name(name).is_ok()
}

/// Video bitrate as handed to `-b:v` (`2500k`, `4M`, `800000`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitrate(String);

impl Bitrate {
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        let s = s.trim();
        let caps = BITRATE.captures(s).ok_or_else(|| ValidationError::NotANumber {
            field: "bitrate",
            value: s.to_string(),
        })?;
        let value: f64 = caps[1].parse().map_err(|_| ValidationError::NotANumber {
            field: "bitrate",
            value: s.to_string(),
        })?;
        if value <= 0.0 {
            return Err(ValidationError::OutOfRange {
                field: "bitrate",
                value: s.to_string(),
                expected: "greater than 0",
            });
        }
        Ok(Self(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Bitrate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn parse_number(field: &'static str, s: &str) -> Result<f64, ValidationError> {
    let s = s.trim();
    s.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ValidationError::NotANumber {
            field,
            value: s.to_string(),
        })
}

/// A finite number strictly greater than zero
pub fn parse_positive(field: &'static str, s: &str) -> Result<f64, ValidationError> {
    let value = parse_number(field, s)?;
    if value <= 0.0 {
        return Err(ValidationError::OutOfRange {
            field,
            value: s.trim().to_string(),
            expected: "greater than 0",
        });
    }
    Ok(value)
}

pub fn parse_frame_rate(s: &str) -> Result<f64, ValidationError> {
    parse_positive("frame rate", s)
}

pub fn parse_speed(s: &str) -> Result<f64, ValidationError> {
    parse_positive("speed factor", s)
}

/// Resolution scale factor for compression: a decimal strictly between 0 and 1
pub fn parse_scale_factor(s: &str) -> Result<f64, ValidationError> {
    let value = parse_number("scale factor", s)?;
    if value <= 0.0 || value >= 1.0 {
        return Err(ValidationError::OutOfRange {
            field: "scale factor",
            value: s.trim().to_string(),
            expected: "a decimal between 0 and 1",
        });
    }
    Ok(value)
}

pub fn parse_container(s: &str) -> Result<String, ValidationError> {
    let ext = s.trim().trim_start_matches('.').to_ascii_lowercase();
    if CONTAINERS.contains(&ext.as_str()) {
        Ok(ext)
    } else {
        Err(ValidationError::UnsupportedContainer(s.to_string()))
    }
}

/// Target display aspect ratio such as 16:9
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AspectRatio {
    pub width: f64,
    pub height: f64,
}

impl AspectRatio {
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        let invalid = || ValidationError::InvalidAspect(s.to_string());
        let (w, h) = s.trim().split_once(':').ok_or_else(invalid)?;
        let width: f64 = w.trim().parse().map_err(|_| invalid())?;
        let height: f64 = h.trim().parse().map_err(|_| invalid())?;
        if !(width.is_finite() && height.is_finite()) || width <= 0.0 || height <= 0.0 {
            return Err(invalid());
        }
        Ok(Self { width, height })
    }

    pub fn ratio(&self) -> f64 {
        self.width / self.height
    }

    /// `16_9`, used in derived file names
    pub fn file_tag(&self) -> String {
        format!("{}_{}", trim_float(self.width), trim_float(self.height))
    }
}

fn trim_float(v: f64) -> String {
    if v.fract() == 0.0 {
        format!("{}", v as i64)
    } else {
        format!("{}", v)
    }
}

pub fn ensure_input_file(path: &Path) -> Result<(), ValidationError> {
    if path.is_file() {
        Ok(())
    } else {
        Err(ValidationError::MissingInput(path.to_path_buf()))
    }
}

/// Accept a directory typed with a trailing separator (`C:\out\`, `out/`)
pub fn normalize_dir(input: &str) -> PathBuf {
    let trimmed = input.trim();
    let stripped = trimmed.trim_end_matches(['\\', '/']);
    if stripped.is_empty() {
        PathBuf::from(trimmed)
    } else {
        PathBuf::from(stripped)
    }
}

pub fn ensure_output_dir(path: &Path) -> Result<(), ValidationError> {
    if path.is_dir() {
        Ok(())
    } else {
        Err(ValidationError::MissingOutputDir(path.to_path_buf()))
    }
}
