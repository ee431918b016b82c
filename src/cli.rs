use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use ffkit::engine::core::ChromaLayout;
use ffkit::engine::hardware::CodecFamily;
use ffkit::engine::tools::ratio::RatioMode;
use ffkit::engine::tools::replace_audio::ShortAudioMode;

#[derive(Parser, Debug)]
#[command(name = "ffkit", version)]
#[command(
    about = "Everyday ffmpeg jobs from the command line",
    long_about = "Everyday ffmpeg jobs from the command line.\n\n\
                  Run without a subcommand for interactive prompts."
)]
pub struct Cli {
    /// More log output (-v info, -vv debug, -vvv trace). FFKIT_LOG overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Print the ffmpeg commands instead of running them
    #[arg(long, global = true)]
    pub dry_run: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Re-encode into another codec and container
    Transcode(TranscodeArgs),

    /// Shrink a video: resolution, bitrate, frame rate, pixel format, filters
    Compress(CompressArgs),

    /// Export a clip as an animated GIF
    Gif(GifArgs),

    /// Cut a section without re-encoding
    Cut(CutArgs),

    /// Change the aspect ratio by stretching or cropping
    Ratio(RatioArgs),

    /// Speed a video up or slow it down
    Speed(SpeedArgs),

    /// Split into a silent video and an audio file
    Separate(SeparateArgs),

    /// Replace the soundtrack with another audio file
    ReplaceAudio(ReplaceAudioArgs),

    /// Show resolution, codecs, bitrate and more for a media file
    Info {
        /// Media file to inspect
        input: PathBuf,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show which encoder each codec resolves to on this machine
    Encoders,

    /// Check if ffmpeg and ffprobe are installed
    CheckFfmpeg,

    /// Prompt for a tool and its options
    Interactive,

    /// Show config status and location, or create default config if missing
    InitConfig,
}

#[derive(Args, Debug, Clone)]
pub struct TranscodeArgs {
    pub input: PathBuf,

    #[arg(long, value_enum)]
    pub codec: CodecArg,

    /// mp4, mov, mkv or webm
    #[arg(long, default_value = "mp4")]
    pub container: String,

    /// Output base name without extension (default: <input stem>_<codec>)
    #[arg(long)]
    pub name: Option<String>,

    /// Output directory (default: the input's directory)
    #[arg(short = 'd', long)]
    pub output_dir: Option<PathBuf>,

    /// Start time, hh:mm:ss[.frac] or seconds
    #[arg(long)]
    pub start: Option<String>,

    /// End time, hh:mm:ss[.frac] or seconds
    #[arg(long)]
    pub end: Option<String>,

    /// Skip hardware encoder detection
    #[arg(long)]
    pub cpu: bool,

    /// Extra ffmpeg arguments, split shell-style
    #[arg(long, allow_hyphen_values = true)]
    pub ffmpeg_args: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct CompressArgs {
    pub input: PathBuf,

    /// Output file (default: <input stem>_compressed<ext>)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Resolution factor between 0 and 1
    #[arg(long)]
    pub scale: Option<String>,

    /// Video bitrate such as 2500k or 4M
    #[arg(long)]
    pub bitrate: Option<String>,

    /// Re-encode with this codec (default: ffmpeg's choice for the container)
    #[arg(long, value_enum)]
    pub codec: Option<CodecArg>,

    /// Output frame rate
    #[arg(long)]
    pub fps: Option<String>,

    /// Colour depth in bits (8 or 10)
    #[arg(long)]
    pub depth: Option<u8>,

    #[arg(long, value_enum)]
    pub chroma: Option<ChromaArg>,

    /// Apply a light hqdn3d denoise
    #[arg(long)]
    pub denoise: bool,

    /// Apply deshake stabilisation
    #[arg(long)]
    pub stabilize: bool,

    /// Skip hardware encoder detection
    #[arg(long)]
    pub cpu: bool,
}

#[derive(Args, Debug, Clone)]
pub struct GifArgs {
    pub input: PathBuf,

    /// Output file (default: <input stem>.gif)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    #[arg(long)]
    pub start: Option<String>,

    #[arg(long)]
    pub end: Option<String>,

    /// Frames per second (default from config, 10)
    #[arg(long)]
    pub fps: Option<String>,

    /// Width in pixels, -1 to follow the height (default from config, 320)
    #[arg(long, allow_negative_numbers = true)]
    pub width: Option<i32>,

    /// Height in pixels, -1 to follow the width
    #[arg(long, allow_negative_numbers = true, default_value_t = -1)]
    pub height: i32,

    /// Keep the source resolution
    #[arg(long, conflicts_with = "width")]
    pub no_scale: bool,

    /// Two-pass palette for better colours
    #[arg(long)]
    pub palette: bool,
}

#[derive(Args, Debug, Clone)]
pub struct CutArgs {
    pub input: PathBuf,

    #[arg(long)]
    pub start: Option<String>,

    #[arg(long)]
    pub end: Option<String>,

    /// Output base name without extension (default: <input stem>_cut)
    #[arg(long)]
    pub name: Option<String>,

    #[arg(short = 'd', long)]
    pub output_dir: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct RatioArgs {
    pub input: PathBuf,

    /// Target ratio a:b, e.g. 16:9
    #[arg(long)]
    pub aspect: String,

    #[arg(long, value_enum, default_value_t = RatioModeArg::Stretch)]
    pub mode: RatioModeArg,

    /// Output file (default: <stem>_stretched_a_b.mp4 or <stem>_cropped_a_b.mp4)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    #[arg(long)]
    pub crf: Option<u8>,

    #[arg(long)]
    pub preset: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct SpeedArgs {
    pub input: PathBuf,

    /// Speed multiplier, e.g. 2 for double speed, 0.5 for half
    #[arg(long)]
    pub factor: String,

    /// Let the pitch follow the speed instead of preserving it
    #[arg(long)]
    pub no_keep_pitch: bool,

    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct SeparateArgs {
    pub input: PathBuf,

    /// Audio encoder (default from config, libmp3lame)
    #[arg(long)]
    pub audio_codec: Option<String>,

    /// Audio file extension (default from config, mp3)
    #[arg(long)]
    pub audio_ext: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct ReplaceAudioArgs {
    pub video: PathBuf,

    pub audio: PathBuf,

    /// What to do if the audio is shorter than the video
    #[arg(long, value_enum)]
    pub short_audio: Option<ShortAudioArg>,

    /// Output file (default: <video stem>_with_new_audio<ext>)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodecArg {
    H264,
    Hevc,
    Vp8,
    Vp9,
    Av1,
    Prores,
}

impl From<CodecArg> for CodecFamily {
    fn from(arg: CodecArg) -> Self {
        match arg {
            CodecArg::H264 => CodecFamily::H264,
            CodecArg::Hevc => CodecFamily::Hevc,
            CodecArg::Vp8 => CodecFamily::Vp8,
            CodecArg::Vp9 => CodecFamily::Vp9,
            CodecArg::Av1 => CodecFamily::Av1,
            CodecArg::Prores => CodecFamily::Prores,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChromaArg {
    #[value(name = "420", alias = "4:2:0")]
    Yuv420,
    #[value(name = "422", alias = "4:2:2")]
    Yuv422,
    #[value(name = "444", alias = "4:4:4")]
    Yuv444,
}

impl From<ChromaArg> for ChromaLayout {
    fn from(arg: ChromaArg) -> Self {
        match arg {
            ChromaArg::Yuv420 => ChromaLayout::Yuv420,
            ChromaArg::Yuv422 => ChromaLayout::Yuv422,
            ChromaArg::Yuv444 => ChromaLayout::Yuv444,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatioModeArg {
    Stretch,
    Crop,
}

impl From<RatioModeArg> for RatioMode {
    fn from(arg: RatioModeArg) -> Self {
        match arg {
            RatioModeArg::Stretch => RatioMode::Stretch,
            RatioModeArg::Crop => RatioMode::Crop,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortAudioArg {
    Pad,
    Keep,
}

impl From<ShortAudioArg> for ShortAudioMode {
    fn from(arg: ShortAudioArg) -> Self {
        match arg {
            ShortAudioArg::Pad => ShortAudioMode::Pad,
            ShortAudioArg::Keep => ShortAudioMode::Keep,
        }
    }
}

pub fn parse() -> Cli {
    Cli::parse()
}
