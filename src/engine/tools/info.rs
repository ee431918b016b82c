//! Media information summary built from a structured probe.

use std::fmt::Write as _;

use serde::Serialize;

use crate::engine::core::PixelFormat;
use crate::engine::probe::ProbeReport;

const UNKNOWN: &str = "Unknown";

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MediaInfo {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub bitrate_kbps: Option<f64>,
    pub video_codec: Option<String>,
    pub color_depth_bits: Option<u32>,
    pub pixel_format: Option<String>,
    pub frame_rate: Option<f64>,
    pub duration_s: Option<f64>,
    pub file_size_mb: Option<f64>,
    pub audio_codec: Option<String>,
    pub sample_rate_khz: Option<f64>,
    pub channels: Option<String>,
}

impl MediaInfo {
    /// `file_size` is the size on disk in bytes, when known
    pub fn from_report(report: &ProbeReport, file_size: Option<u64>) -> Self {
        let video = report.video();
        let audio = report.audio();

        let bit_rate: Option<f64> = report
            .format
            .bit_rate
            .as_deref()
            .or(video.and_then(|v| v.bit_rate.as_deref()))
            .and_then(|b| b.parse().ok());

        let color_depth_bits = video.and_then(|v| {
            v.bits_per_raw_sample
                .as_deref()
                .and_then(|b| b.parse().ok())
                .or_else(|| {
                    v.pix_fmt
                        .as_deref()
                        .and_then(PixelFormat::parse_source)
                        .map(|p| p.depth as u32)
                })
        });

        let size = file_size.or_else(|| report.format.size.as_deref().and_then(|s| s.parse().ok()));

        Self {
            width: video.and_then(|v| v.width),
            height: video.and_then(|v| v.height),
            bitrate_kbps: bit_rate.map(|b| b / 1000.0),
            video_codec: video.and_then(|v| v.codec_name.clone()),
            color_depth_bits,
            pixel_format: video.and_then(|v| v.pix_fmt.clone()),
            frame_rate: video.and_then(|v| v.frame_rate()),
            duration_s: report.duration(),
            file_size_mb: size.map(|s| s as f64 / (1024.0 * 1024.0)),
            audio_codec: audio.and_then(|a| a.codec_name.clone()),
            sample_rate_khz: audio.and_then(|a| a.sample_rate_hz()).map(|r| r as f64 / 1000.0),
            channels: audio.and_then(|a| {
                a.channel_layout
                    .clone()
                    .or_else(|| a.channels.map(|c| format!("{} channels", c)))
            }),
        }
    }

    pub fn resolution(&self) -> Option<String> {
        Some(format!("{}x{}", self.width?, self.height?))
    }

    /// Aligned `label: value` lines, one per fact
    pub fn render(&self) -> String {
        fn or_unknown(v: Option<String>) -> String {
            v.unwrap_or_else(|| UNKNOWN.to_string())
        }

        let rows = [
            ("Resolution", or_unknown(self.resolution())),
            ("Bitrate", or_unknown(self.bitrate_kbps.map(|b| format!("{:.2} kbps", b)))),
            ("Video codec", or_unknown(self.video_codec.clone())),
            ("Color depth", or_unknown(self.color_depth_bits.map(|d| format!("{} bit", d)))),
            ("Pixel format", or_unknown(self.pixel_format.clone())),
            ("Frame rate", or_unknown(self.frame_rate.map(|f| format!("{:.2} fps", f)))),
            ("Duration", or_unknown(self.duration_s.map(|d| format!("{:.2} seconds", d)))),
            ("File size", or_unknown(self.file_size_mb.map(|s| format!("{:.2} MB", s)))),
            ("Audio codec", or_unknown(self.audio_codec.clone())),
            ("Sample rate", or_unknown(self.sample_rate_khz.map(|r| format!("{:.1} kHz", r)))),
            ("Channels", or_unknown(self.channels.clone())),
        ];

        let width = rows.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
        let mut out = String::new();
        for (label, value) in rows {
            let _ = writeln!(out, "{:<width$}  {}", format!("{}:", label), value, width = width + 1);
        }
        out
    }
}
