//! One planner per user-facing tool.
//!
//! Planners are pure: they take validated inputs plus whatever the prober
//! reported and return a [`JobPlan`]. Nothing here launches a process.

pub mod compress;
pub mod cut;
pub mod gif;
pub mod info;
pub mod ratio;
pub mod replace_audio;
pub mod separate;
pub mod speed;
pub mod transcode;

use std::fs;
use std::path::{Path, PathBuf};

use uuid::Uuid;

use super::error::ValidationError;
use super::validate::check_output_name;

/// `<dir>/<name>.<ext>` after checking that `name` is a legal file name
pub fn output_in(dir: &Path, name: &str, ext: &str) -> Result<PathBuf, ValidationError> {
    let name = name.trim();
    check_output_name(name)?;
    Ok(dir.join(format!("{}.{}", name, ext.trim_start_matches('.'))))
}

/// File stem of `input`, or `output` when it has none
pub fn stem_of(input: &Path) -> String {
    input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string())
}

/// Extension of `input` including the dot, or an empty string
pub fn dotted_ext(input: &Path) -> String {
    input
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default()
}

/// `<input dir>/<stem><suffix><ext>`; `ext` defaults to the input's own
pub fn sibling(input: &Path, suffix: &str, ext: Option<&str>) -> PathBuf {
    let ext = match ext {
        Some(e) => format!(".{}", e.trim_start_matches('.')),
        None => dotted_ext(input),
    };
    let file = format!("{}{}{}", stem_of(input), suffix, ext);
    match input.parent() {
        Some(parent) => parent.join(file),
        None => PathBuf::from(file),
    }
}

/// Per-job intermediate file in the system temp directory
pub fn scratch_path(job: Uuid, tag: &str, ext: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "ffkit_{}_{}.{}",
        job.simple(),
        tag,
        ext.trim_start_matches('.')
    ))
}

/// Resolve `path` to an absolute one. A file that does not exist yet is
/// resolved through its parent directory.
fn resolved(path: &Path) -> Option<PathBuf> {
    if let Ok(full) = fs::canonicalize(path) {
        return Some(full);
    }
    let name = path.file_name()?;
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::canonicalize(parent).ok().map(|dir| dir.join(name))
}

pub(crate) fn ensure_not_input(input: &Path, output: &Path) -> Result<(), ValidationError> {
    let same = match (resolved(input), resolved(output)) {
        (Some(a), Some(b)) => a == b,
        _ => input == output,
    };
    if same || input == output {
        return Err(ValidationError::OutputIsInput(output.to_path_buf()));
    }
    Ok(())
}

/// Format a filter factor: up to six decimals, no trailing zeros, at least one decimal
pub fn format_factor(value: f64) -> String {
    let text = format!("{:.6}", value);
    let trimmed = text.trim_end_matches('0');
    if trimmed.ends_with('.') {
        format!("{}0", trimmed)
    } else {
        trimmed.to_string()
    }
}

/// Round down to an even number, the smallest even value being 2
pub fn even_floor(value: f64) -> u32 {
    let v = value.max(0.0).floor() as u32;
    (v - v % 2).max(2)
}
