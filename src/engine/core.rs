mod ffmpeg_cmd;
mod ffmpeg_info;
mod log;
mod runner;
mod timecode;
mod types;

pub use ffmpeg_cmd::{
    ChromaLayout, CropRect, DENOISE_FILTER, EncodeJobSpec, PixelFormat, STABILIZE_FILTER,
    VideoFilters, build_encode_cmd, command_args, format_ffmpeg_cmd, parse_additional_args,
};
pub use ffmpeg_info::{ffmpeg_version, ffprobe_version, tool_version};
pub use log::append_command_log;
pub use runner::{RunOptions, run_command, run_plan, with_progress_reporting};
pub use timecode::{
    Timecode, Trim, duration_between, format_seconds, is_valid_time_format, parse_seconds,
};
pub use types::{JobPlan, ProcessResult, ProgressParser, ToolPaths};
