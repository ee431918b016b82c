use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::process::Command;
use uuid::Uuid;

/// Program names (or absolute paths) of the external tools
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolPaths {
    #[serde(default = "default_ffmpeg")]
    pub ffmpeg: String,

    #[serde(default = "default_ffprobe")]
    pub ffprobe: String,
}

fn default_ffmpeg() -> String {
    "ffmpeg".to_string()
}

fn default_ffprobe() -> String {
    "ffprobe".to_string()
}

impl Default for ToolPaths {
    fn default() -> Self {
        Self {
            ffmpeg: default_ffmpeg(),
            ffprobe: default_ffprobe(),
        }
    }
}

/// Everything one user action will run, in order
#[derive(Debug)]
pub struct JobPlan {
    pub id: Uuid,
    pub label: &'static str,
    pub steps: Vec<Command>,
    /// Files the user asked for
    pub outputs: Vec<PathBuf>,
    /// Intermediate files removed once the plan has run
    pub scratch: Vec<PathBuf>,
    /// Expected media duration, used for progress display
    pub duration_s: Option<f64>,
}

impl JobPlan {
    pub fn new(label: &'static str) -> Self {
        Self::with_id(Uuid::new_v4(), label)
    }

    pub fn with_id(id: Uuid, label: &'static str) -> Self {
        Self {
            id,
            label,
            steps: Vec::new(),
            outputs: Vec::new(),
            scratch: Vec::new(),
            duration_s: None,
        }
    }

    pub fn step(mut self, cmd: Command) -> Self {
        self.steps.push(cmd);
        self
    }

    pub fn output(mut self, path: PathBuf) -> Self {
        self.outputs.push(path);
        self
    }

    pub fn scratch(mut self, path: PathBuf) -> Self {
        self.scratch.push(path);
        self
    }

    pub fn duration(mut self, duration_s: Option<f64>) -> Self {
        self.duration_s = duration_s;
        self
    }
}

/// Outcome of one external process
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessResult {
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessResult {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Parser for ffmpeg progress output (key=value format)
#[derive(Debug, Default, Clone)]
pub struct ProgressParser {
    pub out_time_us: u64,
    pub fps: Option<f64>,
    pub speed: Option<f64>,
    pub bitrate_kbps: Option<f64>,
    pub total_size: Option<u64>,
    pub is_complete: bool,
}

impl ProgressParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a single line of ffmpeg progress output
    pub fn parse_line(&mut self, line: &str) {
        if let Some((key, value)) = line.split_once('=') {
            let value = value.trim();
            match key.trim() {
                "out_time_us" => {
                    if let Ok(us) = value.parse::<u64>() {
                        self.out_time_us = us;
                    }
                }
                "fps" => {
                    if let Ok(f) = value.parse::<f64>() {
                        self.fps = Some(f);
                    }
                }
                "speed" => {
                    if let Ok(s) = value.trim_end_matches('x').parse::<f64>() {
                        self.speed = Some(s);
                    }
                }
                "bitrate" => {
                    if let Ok(b) = value.trim_end_matches("kbits/s").parse::<f64>() {
                        self.bitrate_kbps = Some(b);
                    }
                }
                "total_size" => {
                    if let Ok(size) = value.parse::<u64>() {
                        self.total_size = Some(size);
                    }
                }
                "progress" => {
                    if value == "end" {
                        self.is_complete = true;
                    }
                }
                _ => {}
            }
        }
    }

    pub fn out_time_s(&self) -> f64 {
        self.out_time_us as f64 / 1_000_000.0
    }

    /// Progress percentage given total duration
    pub fn progress_pct(&self, duration_s: Option<f64>) -> f64 {
        if let Some(dur) = duration_s {
            if dur > 0.0 {
                return (self.out_time_s() / dur * 100.0).min(100.0);
            }
        }
        0.0
    }
}
