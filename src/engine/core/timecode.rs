//! Time values as typed by users: `hh:mm:ss[.fraction]` or plain seconds.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::engine::error::ValidationError;

static HHMMSS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{1,2}):(\d{2}):(\d{2}(?:\.\d+)?)$").expect("static regex")
});
static SECONDS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+(?:\.\d+)?$").expect("static regex"));

/// A validated point in time, kept together with the text the user typed
#[derive(Debug, Clone, PartialEq)]
pub struct Timecode {
    raw: String,
    seconds: f64,
}

impl Timecode {
    pub fn seconds(&self) -> f64 {
        self.seconds
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn is_zero(&self) -> bool {
        self.seconds == 0.0
    }
}

impl FromStr for Timecode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        let seconds = parse_seconds(raw)?;
        Ok(Self {
            raw: raw.to_string(),
            seconds,
        })
    }
}

impl fmt::Display for Timecode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

pub fn is_valid_time_format(s: &str) -> bool {
    parse_seconds(s.trim()).is_ok()
}

/// Normalise a time string to seconds
pub fn parse_seconds(s: &str) -> Result<f64, ValidationError> {
    let invalid = || ValidationError::InvalidTime(s.to_string());

    if let Some(caps) = HHMMSS.captures(s) {
        let hours: f64 = caps[1].parse().map_err(|_| invalid())?;
        let minutes: f64 = caps[2].parse().map_err(|_| invalid())?;
        let secs: f64 = caps[3].parse().map_err(|_| invalid())?;
        if minutes >= 60.0 || secs >= 60.0 {
            return Err(invalid());
        }
        return Ok(hours * 3600.0 + minutes * 60.0 + secs);
    }

    if SECONDS.is_match(s) {
        return s.parse::<f64>().map_err(|_| invalid());
    }

    Err(invalid())
}

/// Elapsed seconds from `start` to `end`, rounded to hundredths
pub fn duration_between(start: &str, end: &str) -> Result<f64, ValidationError> {
    let diff = parse_seconds(end.trim())? - parse_seconds(start.trim())?;
    Ok(round_hundredths(diff))
}

fn round_hundredths(seconds: f64) -> f64 {
    (seconds * 100.0).round() / 100.0
}

/// Seconds as ffmpeg's `-t` expects them: two decimals
pub fn format_seconds(seconds: f64) -> String {
    format!("{:.2}", seconds)
}

/// Start/end window applied to the source
#[derive(Debug, Clone, PartialEq)]
pub struct Trim {
    start: Option<Timecode>,
    end: Option<Timecode>,
}

impl Trim {
    /// Build a window; `None` when neither bound is set. The end must lie
    /// at least a hundredth of a second after the start.
    pub fn new(
        start: Option<Timecode>,
        end: Option<Timecode>,
    ) -> Result<Option<Self>, ValidationError> {
        if let Some(e) = &end {
            let from = start.as_ref().map(Timecode::seconds).unwrap_or(0.0);
            if round_hundredths(e.seconds() - from) <= 0.0 {
                return Err(ValidationError::EndNotAfterStart {
                    start: start.as_ref().map_or_else(|| "0".to_string(), |s| s.to_string()),
                    end: e.to_string(),
                });
            }
        }
        if start.is_none() && end.is_none() {
            return Ok(None);
        }
        Ok(Some(Self { start, end }))
    }

    /// Parse optional strings straight from user input
    pub fn parse(start: Option<&str>, end: Option<&str>) -> Result<Option<Self>, ValidationError> {
        let start = start.map(str::parse::<Timecode>).transpose()?;
        let end = end.map(str::parse::<Timecode>).transpose()?;
        Self::new(start, end)
    }

    pub fn start(&self) -> Option<&Timecode> {
        self.start.as_ref()
    }

    pub fn end(&self) -> Option<&Timecode> {
        self.end.as_ref()
    }

    /// Value for `-ss`, skipped for a zero start
    pub fn seek_arg(&self) -> Option<String> {
        self.start
            .as_ref()
            .filter(|s| !s.is_zero())
            .map(|s| s.to_string())
    }

    /// Value for `-t`: end minus start (a missing start counts as zero)
    pub fn duration_arg(&self) -> Option<String> {
        let end = self.end.as_ref()?;
        let start = self.start.as_ref().map(Timecode::seconds).unwrap_or(0.0);
        Some(format_seconds(round_hundredths(end.seconds() - start)))
    }
}
