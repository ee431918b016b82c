use anyhow::{Context, Result};
use std::process::Command;

use super::types::ToolPaths;

/// First line of `<program> -version`, e.g. `ffmpeg version 6.1.1 ...`
pub fn tool_version(program: &str) -> Result<String> {
    let output = Command::new(program)
        .arg("-version")
        .output()
        .with_context(|| format!("Failed to execute {}. Is it installed and in PATH?", program))?;

    if !output.status.success() {
        anyhow::bail!("{} -version failed with status: {}", program, output.status);
    }

    Ok(version_line(&String::from_utf8_lossy(&output.stdout)))
}

pub fn ffmpeg_version(tools: &ToolPaths) -> Result<String> {
    tool_version(&tools.ffmpeg)
}

pub fn ffprobe_version(tools: &ToolPaths) -> Result<String> {
    tool_version(&tools.ffprobe)
}

fn version_line(stdout: &str) -> String {
    stdout
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .unwrap_or("Unknown version")
        .to_string()
}
