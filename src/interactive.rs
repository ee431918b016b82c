//! Prompt-driven front-end: asks for a tool and its options, then runs it
//! through the same handlers as the subcommands.

use std::io::{self, BufRead, Write};

use anyhow::Result;
use ffkit::config::DefaultsConfig;
use ffkit::engine::core::{Timecode, Trim};
use ffkit::engine::{ProcessError, ValidationError};
use ffkit::engine::validate::{self, AspectRatio, Bitrate};
use ffkit::prompt::Prompter;
use tracing::{debug, warn};

use crate::app::{self, Context};
use crate::cli::{
    ChromaArg, CodecArg, Commands, CompressArgs, CutArgs, GifArgs, RatioArgs, RatioModeArg,
    ReplaceAudioArgs, SeparateArgs, ShortAudioArg, SpeedArgs, TranscodeArgs,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tool {
    Transcode,
    Compress,
    Gif,
    Cut,
    Ratio,
    Speed,
    Separate,
    ReplaceAudio,
    Info,
}

const TOOLS: &[(&str, Tool)] = &[
    ("transcode", Tool::Transcode),
    ("compress", Tool::Compress),
    ("gif", Tool::Gif),
    ("cut", Tool::Cut),
    ("ratio", Tool::Ratio),
    ("speed", Tool::Speed),
    ("separate", Tool::Separate),
    ("replace-audio", Tool::ReplaceAudio),
    ("info", Tool::Info),
];

const CODECS: &[(&str, CodecArg)] = &[
    ("h264", CodecArg::H264),
    ("hevc", CodecArg::Hevc),
    ("vp8", CodecArg::Vp8),
    ("vp9", CodecArg::Vp9),
    ("av1", CodecArg::Av1),
    ("prores", CodecArg::Prores),
];

pub fn run(ctx: &Context) -> Result<()> {
    let stdin = io::stdin();
    let mut prompter = Prompter::new(stdin.lock(), io::stdout());
    session(ctx, &mut prompter)
}

fn session<R: BufRead, W: Write>(ctx: &Context, prompter: &mut Prompter<R, W>) -> Result<()> {
    prompter.say("ffkit interactive mode. Press Enter to skip optional questions.")?;
    loop {
        let command = ask_command(prompter, &ctx.config.defaults)?;
        debug!(?command, "interactive command");

        if let Err(e) = app::dispatch(ctx, command) {
            // Bad input and failed ffmpeg/ffprobe runs are reported; I/O errors end the session
            if let Some(validation) = e.downcast_ref::<ValidationError>() {
                prompter.say(format_args!("\t{}.", validation))?;
            } else if e.downcast_ref::<ProcessError>().is_some() {
                warn!("Tool failed: {:#}", e);
                prompter.say(format_args!("\tError: {:#}", e))?;
            } else {
                return Err(e);
            }
        }

        if !prompter.yes_no("Run another tool? [y/N] ", false)? {
            return Ok(());
        }
    }
}

fn codec_menu() -> String {
    let labels: Vec<&str> = CODECS.iter().map(|(label, _)| *label).collect();
    labels.join(", ")
}

fn tool_menu() -> String {
    let labels: Vec<&str> = TOOLS.iter().map(|(label, _)| *label).collect();
    format!("Tool ({}): ", labels.join(", "))
}

fn ask_command<R: BufRead, W: Write>(
    p: &mut Prompter<R, W>,
    defaults: &DefaultsConfig,
) -> Result<Commands> {
    let command = match p.choice(&tool_menu(), TOOLS)? {
        Tool::Transcode => Commands::Transcode(ask_transcode(p)?),
        Tool::Compress => Commands::Compress(ask_compress(p)?),
        Tool::Gif => Commands::Gif(ask_gif(p, defaults)?),
        Tool::Cut => Commands::Cut(ask_cut(p)?),
        Tool::Ratio => Commands::Ratio(ask_ratio(p)?),
        Tool::Speed => Commands::Speed(ask_speed(p)?),
        Tool::Separate => Commands::Separate(SeparateArgs {
            input: p.existing_file("Video file: ")?,
            audio_codec: None,
            audio_ext: None,
        }),
        Tool::ReplaceAudio => Commands::ReplaceAudio(ask_replace_audio(p)?),
        Tool::Info => Commands::Info {
            input: p.existing_file("Media file: ")?,
            json: false,
        },
    };
    Ok(command)
}

/// Start and end times; the end is re-asked while it is not after the start
fn ask_window<R: BufRead, W: Write>(
    p: &mut Prompter<R, W>,
) -> Result<(Option<String>, Option<String>)> {
    let start = p.time("Start time (hh:mm:ss, Enter for beginning): ")?;
    let end = p.optional("End time (hh:mm:ss, Enter for end of file): ", |answer| {
        let end: Timecode = answer.parse()?;
        Trim::new(start.clone(), Some(end.clone())).map(|_| end)
    })?;
    Ok((start.map(|t| t.to_string()), end.map(|t| t.to_string())))
}

fn ask_transcode<R: BufRead, W: Write>(p: &mut Prompter<R, W>) -> Result<TranscodeArgs> {
    let input = p.existing_file("Video file: ")?;
    let codec = p.choice(&format!("Codec ({}): ", codec_menu()), CODECS)?;
    let container = p.ask_until("Container (mp4, mov, mkv, webm): ", validate::parse_container)?;
    let output_dir = p.existing_dir("Output directory: ")?;
    let name = p.output_name("Output name (without extension): ")?;
    let (start, end) = ask_window(p)?;
    let ffmpeg_args = p.optional("Extra ffmpeg arguments: ", |answer| {
        Ok::<_, ValidationError>(answer.to_string())
    })?;

    Ok(TranscodeArgs {
        input,
        codec,
        container,
        name: Some(name),
        output_dir: Some(output_dir),
        start,
        end,
        cpu: false,
        ffmpeg_args,
    })
}

fn ask_compress<R: BufRead, W: Write>(p: &mut Prompter<R, W>) -> Result<CompressArgs> {
    let input = p.existing_file("Video file: ")?;
    let scale = p.optional("Resolution factor (0-1): ", |a| {
        validate::parse_scale_factor(a).map(|_| a.to_string())
    })?;
    let bitrate = p.optional("Bitrate (e.g. 2500k): ", |a| {
        Bitrate::parse(a).map(|b| b.as_str().to_string())
    })?;
    let codec = p.optional(
        &format!("Codec ({}, Enter for the container default): ", codec_menu()),
        |a| {
            CODECS
                .iter()
                .find(|(label, _)| label.eq_ignore_ascii_case(a))
                .map(|(_, codec)| *codec)
                .ok_or_else(|| format!("'{}' is not one of {}", a, codec_menu()))
        },
    )?;
    let fps = p.optional("Frame rate: ", |a| {
        validate::parse_frame_rate(a).map(|_| a.to_string())
    })?;
    let depth = p.optional("Colour depth (8 or 10): ", |a| match a {
        "8" => Ok(8),
        "10" => Ok(10),
        other => Err(format!("'{}' is not 8 or 10", other)),
    })?;
    let chroma = p.optional("Chroma subsampling (420, 422, 444): ", |a| {
        match a.replace(':', "").as_str() {
            "420" => Ok(ChromaArg::Yuv420),
            "422" => Ok(ChromaArg::Yuv422),
            "444" => Ok(ChromaArg::Yuv444),
            _ => Err(format!("'{}' is not 420, 422 or 444", a)),
        }
    })?;
    let denoise = p.yes_no("Denoise? [y/N] ", false)?;
    let stabilize = p.yes_no("Stabilize? [y/N] ", false)?;

    Ok(CompressArgs {
        input,
        output: None,
        scale,
        bitrate,
        codec,
        fps,
        depth,
        chroma,
        denoise,
        stabilize,
        cpu: false,
    })
}

fn ask_gif<R: BufRead, W: Write>(
    p: &mut Prompter<R, W>,
    defaults: &DefaultsConfig,
) -> Result<GifArgs> {
    let input = p.existing_file("Video file: ")?;
    let (start, end) = ask_window(p)?;
    let fps = p.optional(&format!("Frames per second [{}]: ", defaults.gif_fps), |a| {
        validate::parse_frame_rate(a).map(|_| a.to_string())
    })?;
    let width = p.optional(&format!("Width in pixels [{}]: ", defaults.gif_width), |a| {
        a.parse::<i32>()
            .ok()
            .filter(|w| *w > 0 || *w == -1)
            .ok_or_else(|| format!("'{}' is not a positive width", a))
    })?;
    let palette = p.yes_no("Better colours (slower)? [y/N] ", false)?;

    Ok(GifArgs {
        input,
        output: None,
        start,
        end,
        fps,
        width,
        height: -1,
        no_scale: false,
        palette,
    })
}

fn ask_cut<R: BufRead, W: Write>(p: &mut Prompter<R, W>) -> Result<CutArgs> {
    let input = p.existing_file("Video file: ")?;
    let (start, end) = loop {
        let window = ask_window(p)?;
        if window.0.is_some() || window.1.is_some() {
            break window;
        }
        p.say("\tGive a start time, an end time or both.")?;
    };
    let output_dir = p.existing_dir("Output directory: ")?;
    let name = p.output_name("Output name (without extension): ")?;

    Ok(CutArgs {
        input,
        start,
        end,
        name: Some(name),
        output_dir: Some(output_dir),
    })
}

fn ask_ratio<R: BufRead, W: Write>(p: &mut Prompter<R, W>) -> Result<RatioArgs> {
    let input = p.existing_file("Video file: ")?;
    let aspect = p.ask_until("Aspect ratio (e.g. 16:9): ", |a| {
        AspectRatio::parse(a).map(|_| a.to_string())
    })?;
    let mode = p.choice(
        "Mode (stretch, crop): ",
        &[("stretch", RatioModeArg::Stretch), ("crop", RatioModeArg::Crop)],
    )?;

    Ok(RatioArgs {
        input,
        aspect,
        mode,
        output: None,
        crf: None,
        preset: None,
    })
}

fn ask_speed<R: BufRead, W: Write>(p: &mut Prompter<R, W>) -> Result<SpeedArgs> {
    let input = p.existing_file("Video file: ")?;
    let factor = p.ask_until("Speed factor (e.g. 2 or 0.5): ", |a| {
        validate::parse_speed(a).map(|_| a.to_string())
    })?;
    let keep_pitch = p.yes_no("Keep the audio pitch? [Y/n] ", true)?;

    Ok(SpeedArgs {
        input,
        factor,
        no_keep_pitch: !keep_pitch,
        output: None,
    })
}

fn ask_replace_audio<R: BufRead, W: Write>(p: &mut Prompter<R, W>) -> Result<ReplaceAudioArgs> {
    let video = p.existing_file("Video file: ")?;
    let audio = p.existing_file("Audio file: ")?;
    let short_audio = p.choice(
        "If the audio is shorter than the video (pad, keep): ",
        &[("pad", ShortAudioArg::Pad), ("keep", ShortAudioArg::Keep)],
    )?;

    Ok(ReplaceAudioArgs {
        video,
        audio,
        short_audio: Some(short_audio),
        output: None,
    })
}
