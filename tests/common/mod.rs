#![allow(dead_code)]

use ffkit::engine::ToolPaths;
use ffkit::engine::probe::StreamFacts;
use std::path::PathBuf;
use std::process::Command;

/// Convert a Command to a string for assertions
pub fn cmd_to_string(cmd: &Command) -> String {
    let program = cmd.get_program().to_string_lossy();
    let args: Vec<String> = cmd
        .get_args()
        .map(|arg| arg.to_string_lossy().to_string())
        .collect();

    format!("{} {}", program, args.join(" "))
}

pub fn args_of(cmd: &Command) -> Vec<String> {
    cmd.get_args()
        .map(|arg| arg.to_string_lossy().to_string())
        .collect()
}

/// Value following `flag`, if the flag is present
pub fn flag_value(cmd: &Command, flag: &str) -> Option<String> {
    let args = args_of(cmd);
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1).cloned())
}

pub fn tools() -> ToolPaths {
    ToolPaths::default()
}

pub fn video(name: &str) -> PathBuf {
    PathBuf::from("/videos").join(name)
}

pub fn facts(width: u32, height: u32, pix_fmt: &str) -> StreamFacts {
    StreamFacts {
        width,
        height,
        bit_rate: Some(8_000_000),
        codec_name: Some("h264".to_string()),
        pix_fmt: Some(pix_fmt.to_string()),
    }
}
