use std::fs;
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;
use std::process::{Command, Stdio};

use tracing::{debug, info, warn};

use super::ffmpeg_cmd::format_ffmpeg_cmd;
use super::log::append_command_log;
use super::types::{JobPlan, ProcessResult, ProgressParser};
use crate::engine::error::ProcessError;

/// Lines of stderr kept in a failure message
const STDERR_TAIL_LINES: usize = 12;

#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Suppress the console progress line
    pub silent: bool,
    /// Ask ffmpeg for machine-readable progress on stdout
    pub progress: bool,
    /// Append every command line to this file
    pub command_log: Option<PathBuf>,
}

/// Prefix the job's arguments with `-progress pipe:1 -nostats`.
///
/// These are global options, so they must come before the first input.
pub fn with_progress_reporting(cmd: &Command) -> Command {
    let mut out = Command::new(cmd.get_program());
    out.args(["-progress", "pipe:1", "-nostats"]);
    out.args(cmd.get_args());
    out
}

fn tail(text: &str, lines: usize) -> String {
    let all: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
    let start = all.len().saturating_sub(lines);
    all[start..].join("\n")
}

/// Run one command to completion, blocking the caller
pub fn run_command(
    cmd: &Command,
    duration_s: Option<f64>,
    opts: &RunOptions,
) -> Result<ProcessResult, ProcessError> {
    let program = cmd.get_program().to_string_lossy().into_owned();
    let mut cmd = if opts.progress {
        with_progress_reporting(cmd)
    } else {
        let mut plain = Command::new(cmd.get_program());
        plain.args(cmd.get_args());
        plain
    };

    let rendered = format_ffmpeg_cmd(&cmd);
    debug!(command = %rendered, "launching");
    if let Some(log_path) = &opts.command_log {
        if let Err(e) = append_command_log(log_path, &rendered) {
            warn!("could not write command log {}: {:#}", log_path.display(), e);
        }
    }

    cmd.stdin(Stdio::null());
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());

    let mut child = cmd.spawn().map_err(|source| ProcessError::Launch {
        program: program.clone(),
        source,
    })?;

    // Drain stderr on its own thread so a chatty process cannot fill the pipe
    let stderr_thread = child.stderr.take().map(|stderr| {
        std::thread::spawn(move || {
            let mut collected = String::new();
            for line in BufReader::new(stderr).lines().map_while(Result::ok) {
                collected.push_str(&line);
                collected.push('\n');
            }
            collected
        })
    });

    let mut stdout_text = String::new();
    let mut parser = ProgressParser::new();
    if let Some(stdout) = child.stdout.take() {
        for line in BufReader::new(stdout).lines().map_while(Result::ok) {
            if opts.progress {
                parser.parse_line(&line);
                if !opts.silent {
                    print_progress(&parser, duration_s);
                }
            }
            stdout_text.push_str(&line);
            stdout_text.push('\n');
        }
    }

    let status = child.wait().map_err(|source| ProcessError::Launch {
        program: program.clone(),
        source,
    })?;
    if opts.progress && !opts.silent && parser.out_time_us > 0 {
        println!();
    }

    let stderr_text = stderr_thread
        .and_then(|handle| handle.join().ok())
        .unwrap_or_default();

    if !status.success() {
        return Err(ProcessError::Failed {
            program,
            status: status.to_string(),
            detail: tail(&stderr_text, STDERR_TAIL_LINES),
        });
    }

    Ok(ProcessResult {
        exit_code: status.code(),
        stdout: stdout_text,
        stderr: stderr_text,
    })
}

fn print_progress(parser: &ProgressParser, duration_s: Option<f64>) {
    let pct = parser.progress_pct(duration_s);
    if pct > 0.0 {
        print!("\rProgress: {:.1}%", pct);
    } else {
        print!("\rProcessed: {:.1}s", parser.out_time_s());
    }
    if let Some(fps) = parser.fps {
        print!(" | FPS: {:.1}", fps);
    }
    if let Some(speed) = parser.speed {
        print!(" | Speed: {:.2}x", speed);
    }
    std::io::stdout().flush().ok();
}

/// Run every step of a plan in order, stopping at the first failure.
///
/// Scratch files are removed whether or not the plan succeeded. Partial
/// outputs are left where ffmpeg wrote them.
pub fn run_plan(plan: &JobPlan, opts: &RunOptions) -> Result<Vec<ProcessResult>, ProcessError> {
    info!(job = %plan.id, tool = plan.label, steps = plan.steps.len(), "starting job");

    let mut results = Vec::with_capacity(plan.steps.len());
    let mut outcome = Ok(());
    for (idx, step) in plan.steps.iter().enumerate() {
        debug!(job = %plan.id, step = idx + 1, "running step");
        match run_command(step, plan.duration_s, opts) {
            Ok(result) => results.push(result),
            Err(e) => {
                outcome = Err(e);
                break;
            }
        }
    }

    for path in &plan.scratch {
        if path.exists() {
            if let Err(e) = fs::remove_file(path) {
                warn!("could not remove scratch file {}: {}", path.display(), e);
            }
        }
    }

    outcome?;
    info!(job = %plan.id, tool = plan.label, "job finished");
    Ok(results)
}
