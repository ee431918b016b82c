// Input probing using ffprobe

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::process::Command;
use tracing::debug;

use super::error::ProcessError;

/// `-show_format` section of ffprobe JSON output
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProbeFormat {
    #[serde(default)]
    pub format_name: Option<String>,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub bit_rate: Option<String>,
}

/// One entry of `-show_streams`; ffprobe omits fields that do not apply
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProbeStream {
    #[serde(default)]
    pub codec_type: Option<String>,
    #[serde(default)]
    pub codec_name: Option<String>,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub pix_fmt: Option<String>,
    #[serde(default)]
    pub bit_rate: Option<String>,
    #[serde(default)]
    pub bits_per_raw_sample: Option<String>,
    #[serde(default)]
    pub r_frame_rate: Option<String>,
    #[serde(default)]
    pub avg_frame_rate: Option<String>,
    #[serde(default)]
    pub sample_rate: Option<String>,
    #[serde(default)]
    pub channels: Option<u32>,
    #[serde(default)]
    pub channel_layout: Option<String>,
}

impl ProbeStream {
    pub fn is_video(&self) -> bool {
        self.codec_type.as_deref() == Some("video")
    }

    pub fn is_audio(&self) -> bool {
        self.codec_type.as_deref() == Some("audio")
    }

    /// Frame rate from `r_frame_rate`, falling back to `avg_frame_rate`
    pub fn frame_rate(&self) -> Option<f64> {
        self.r_frame_rate
            .as_deref()
            .and_then(parse_fraction)
            .or_else(|| self.avg_frame_rate.as_deref().and_then(parse_fraction))
    }

    pub fn sample_rate_hz(&self) -> Option<u32> {
        self.sample_rate.as_deref()?.parse().ok()
    }
}

/// Full structured probe of a media file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProbeReport {
    #[serde(default)]
    pub format: ProbeFormat,
    #[serde(default)]
    pub streams: Vec<ProbeStream>,
}

impl ProbeReport {
    pub fn video(&self) -> Option<&ProbeStream> {
        self.streams.iter().find(|s| s.is_video())
    }

    pub fn audio(&self) -> Option<&ProbeStream> {
        self.streams.iter().find(|s| s.is_audio())
    }

    pub fn duration(&self) -> Option<f64> {
        self.format.duration.as_deref()?.parse().ok()
    }
}

/// Facts about the first video stream that the compress tool needs
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StreamFacts {
    pub width: u32,
    pub height: u32,
    pub bit_rate: Option<u64>,
    pub codec_name: Option<String>,
    pub pix_fmt: Option<String>,
}

fn run_ffprobe(ffprobe: &str, args: &[&str], path: &Path) -> Result<String, ProcessError> {
    let output = Command::new(ffprobe)
        .args(args)
        .arg(path)
        .output()
        .map_err(|source| ProcessError::Launch {
            program: ffprobe.to_string(),
            source,
        })?;

    if !output.status.success() {
        return Err(ProcessError::Failed {
            program: ffprobe.to_string(),
            status: output.status.to_string(),
            detail: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Container duration in seconds
pub fn probe_duration(ffprobe: &str, path: &Path) -> Result<f64, ProcessError> {
    // `-i` has to be last so the path follows it
    let text = run_ffprobe(
        ffprobe,
        &[
            "-show_entries",
            "format=duration",
            "-v",
            "quiet",
            "-of",
            "csv=p=0",
            "-i",
        ],
        path,
    )?;
    let duration = parse_duration_csv(ffprobe, &text)?;
    debug!(path = %path.display(), duration, "probed duration");
    Ok(duration)
}

/// Parse the single `csv=p=0` value ffprobe prints for `format=duration`
pub fn parse_duration_csv(program: &str, text: &str) -> Result<f64, ProcessError> {
    let value = text
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .ok_or_else(|| ProcessError::parse(program, "no duration reported"))?;
    value
        .parse::<f64>()
        .ok()
        .filter(|d| d.is_finite() && *d >= 0.0)
        .ok_or_else(|| ProcessError::parse(program, format!("duration '{}' is not a number", value)))
}

pub fn probe_stream_facts(ffprobe: &str, path: &Path) -> Result<StreamFacts, ProcessError> {
    let text = run_ffprobe(
        ffprobe,
        &[
            "-v",
            "error",
            "-select_streams",
            "v:0",
            "-show_entries",
            "stream=width,height,bit_rate,codec_name,pix_fmt",
            "-of",
            "json",
        ],
        path,
    )?;
    let facts = parse_stream_facts(ffprobe, &text)?;
    debug!(path = %path.display(), ?facts, "probed video stream");
    Ok(facts)
}

pub fn parse_stream_facts(program: &str, json: &str) -> Result<StreamFacts, ProcessError> {
    let report: ProbeReport = serde_json::from_str(json)
        .map_err(|e| ProcessError::parse(program, format!("invalid JSON: {}", e)))?;
    let stream = report
        .streams
        .into_iter()
        .next()
        .ok_or_else(|| ProcessError::parse(program, "no video stream found"))?;

    let (Some(width), Some(height)) = (stream.width, stream.height) else {
        return Err(ProcessError::parse(program, "video stream has no dimensions"));
    };

    Ok(StreamFacts {
        width,
        height,
        bit_rate: stream.bit_rate.as_deref().and_then(|b| b.parse().ok()),
        codec_name: stream.codec_name,
        pix_fmt: stream.pix_fmt,
    })
}

pub fn probe_report(ffprobe: &str, path: &Path) -> Result<ProbeReport, ProcessError> {
    let text = run_ffprobe(
        ffprobe,
        &["-v", "quiet", "-show_format", "-show_streams", "-of", "json"],
        path,
    )?;
    parse_probe_report(ffprobe, &text)
}

pub fn parse_probe_report(program: &str, json: &str) -> Result<ProbeReport, ProcessError> {
    serde_json::from_str(json)
        .map_err(|e| ProcessError::parse(program, format!("invalid JSON: {}", e)))
}

/// Parse a fraction string like "30000/1001" to f64
pub fn parse_fraction(s: &str) -> Option<f64> {
    let (num, den) = s.split_once('/')?;
    let numerator: f64 = num.trim().parse().ok()?;
    let denominator: f64 = den.trim().parse().ok()?;

    if denominator == 0.0 {
        return None;
    }

    Some(numerator / denominator)
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPORT: &str = r#"{
        "streams": [
            {
                "index": 0,
                "codec_name": "h264",
                "codec_type": "video",
                "width": 1920,
                "height": 1080,
                "pix_fmt": "yuv420p",
                "r_frame_rate": "30000/1001",
                "avg_frame_rate": "30000/1001",
                "bit_rate": "4500000",
                "bits_per_raw_sample": "8"
            },
            {
                "index": 1,
                "codec_name": "aac",
                "codec_type": "audio",
                "sample_rate": "48000",
                "channels": 2,
                "channel_layout": "stereo",
                "r_frame_rate": "0/0"
            }
        ],
        "format": {
            "filename": "clip.mp4",
            "format_name": "mov,mp4,m4a,3gp,3g2,mj2",
            "duration": "30.030000",
            "size": "17338201",
            "bit_rate": "4619000"
        }
    }"#;

    #[test]
    fn test_parse_fraction() {
        assert_eq!(parse_fraction("30/1"), Some(30.0));

        let result_29_97 = parse_fraction("30000/1001").unwrap();
        assert!(
            (result_29_97 - 29.970029970029973).abs() < 1e-10,
            "Expected ~29.97, got {}",
            result_29_97
        );

        assert_eq!(parse_fraction("60/1"), Some(60.0));
        assert_eq!(parse_fraction("invalid"), None);
        assert_eq!(parse_fraction("30/0"), None);
        assert_eq!(parse_fraction("0/0"), None);
    }

    #[test]
    fn test_parse_duration_csv() {
        assert_eq!(parse_duration_csv("ffprobe", "30.030000\n").unwrap(), 30.03);
        assert_eq!(parse_duration_csv("ffprobe", "\n45\n").unwrap(), 45.0);
        assert!(matches!(
            parse_duration_csv("ffprobe", "N/A\n"),
            Err(ProcessError::Parse { .. })
        ));
        assert!(parse_duration_csv("ffprobe", "").is_err());
    }

    #[test]
    fn test_parse_stream_facts() {
        let json = r#"{"programs": [], "streams": [
            {"codec_name": "hevc", "width": 3840, "height": 2160,
             "pix_fmt": "yuv420p10le", "bit_rate": "12000000"}
        ]}"#;
        let facts = parse_stream_facts("ffprobe", json).unwrap();
        assert_eq!(facts.width, 3840);
        assert_eq!(facts.height, 2160);
        assert_eq!(facts.bit_rate, Some(12_000_000));
        assert_eq!(facts.codec_name.as_deref(), Some("hevc"));
        assert_eq!(facts.pix_fmt.as_deref(), Some("yuv420p10le"));
    }

    #[test]
    fn test_stream_facts_require_a_stream() {
        assert!(parse_stream_facts("ffprobe", r#"{"streams": []}"#).is_err());
        assert!(parse_stream_facts("ffprobe", r#"{"streams": [{"codec_name": "mjpeg"}]}"#).is_err());
        assert!(parse_stream_facts("ffprobe", "not json").is_err());
    }

    #[test]
    fn test_parse_probe_report() {
        let report = parse_probe_report("ffprobe", REPORT).unwrap();
        assert_eq!(report.duration(), Some(30.03));

        let video = report.video().unwrap();
        assert_eq!(video.codec_name.as_deref(), Some("h264"));
        assert!((video.frame_rate().unwrap() - 29.97).abs() < 0.01);

        let audio = report.audio().unwrap();
        assert_eq!(audio.sample_rate_hz(), Some(48_000));
        assert_eq!(audio.channel_layout.as_deref(), Some("stereo"));
        assert_eq!(audio.frame_rate(), None);
    }

    #[test]
    fn test_missing_ffprobe_is_launch_error() {
        let err = probe_duration("/nonexistent/ffprobe", Path::new("clip.mp4")).unwrap_err();
        assert!(matches!(err, ProcessError::Launch { .. }));
    }
}
