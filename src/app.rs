use crate::cli::{
    Cli, Commands, CompressArgs, CutArgs, GifArgs, RatioArgs, ReplaceAudioArgs, SeparateArgs,
    SpeedArgs, TranscodeArgs,
};
use crate::interactive;
use anyhow::{Context as _, Result};
use ffkit::config::Config;
use ffkit::engine::hardware::{self, Backend, CodecFamily, CodecRequest, EncoderProbe, OsFamily};
use ffkit::engine::tools::{
    self, compress, cut, gif, info as media_info, ratio, replace_audio, separate, speed, transcode,
};
use ffkit::engine::validate::{self, AspectRatio, Bitrate};
use ffkit::engine::{self, JobPlan, RunOptions, Trim, ValidationError, probe};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Everything a handler needs besides its own arguments
pub struct Context {
    pub config: Config,
    pub dry_run: bool,
    encoders: EncoderProbe,
}

impl Context {
    pub fn new(config: Config, dry_run: bool) -> Self {
        let encoders = EncoderProbe::new(config.tools.ffmpeg.clone(), config.probe.cache_encoders);
        Self {
            config,
            dry_run,
            encoders,
        }
    }

    fn ffprobe(&self) -> &str {
        &self.config.tools.ffprobe
    }

    fn backend_for(&self, request: &CodecRequest, force_cpu: bool) -> Result<Backend> {
        if force_cpu {
            return Ok(Backend::Cpu);
        }
        let backend = self
            .encoders
            .backend_for(request, self.config.probe.use_hardware)?;
        info!(
            "Using encoder {} for {}",
            backend.qualify(&request.family),
            request.family
        );
        Ok(backend)
    }

    fn run_options(&self) -> RunOptions {
        RunOptions {
            silent: false,
            progress: true,
            command_log: self.config.command_log_path(),
        }
    }

    /// Print the plan in dry-run mode, run it otherwise
    fn execute(&self, plan: JobPlan) -> Result<()> {
        if self.dry_run {
            for step in &plan.steps {
                println!("{}", engine::format_ffmpeg_cmd(step));
            }
            return Ok(());
        }

        engine::run_plan(&plan, &self.run_options())?;
        for output in &plan.outputs {
            println!("Saved: {}", output.display());
        }
        Ok(())
    }
}

pub fn run(cli: Cli) -> Result<()> {
    let config = Config::load().unwrap_or_else(|e| {
        warn!("Config missing or invalid, using defaults: {:#}", e);
        Config::default()
    });
    let ctx = Context::new(config, cli.dry_run);

    match cli.command.unwrap_or(Commands::Interactive) {
        Commands::InitConfig => handle_init_config(),
        Commands::Interactive => interactive::run(&ctx),
        command => dispatch(&ctx, command),
    }
}

pub fn dispatch(ctx: &Context, command: Commands) -> Result<()> {
    match command {
        Commands::Transcode(args) => handle_transcode(ctx, args),
        Commands::Compress(args) => handle_compress(ctx, args),
        Commands::Gif(args) => handle_gif(ctx, args),
        Commands::Cut(args) => handle_cut(ctx, args),
        Commands::Ratio(args) => handle_ratio(ctx, args),
        Commands::Speed(args) => handle_speed(ctx, args),
        Commands::Separate(args) => handle_separate(ctx, args),
        Commands::ReplaceAudio(args) => handle_replace_audio(ctx, args),
        Commands::Info { input, json } => handle_info(ctx, &input, json),
        Commands::Encoders => handle_encoders(ctx),
        Commands::CheckFfmpeg => handle_check_ffmpeg(ctx),
        Commands::Interactive => interactive::run(ctx),
        Commands::InitConfig => handle_init_config(),
    }
}

/// Directory the input lives in, `.` for a bare file name
fn input_dir(input: &Path) -> PathBuf {
    match input.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

fn resolve_output_dir(input: &Path, requested: Option<&Path>) -> Result<PathBuf, ValidationError> {
    let dir = match requested {
        Some(d) => validate::normalize_dir(&d.to_string_lossy()),
        None => input_dir(input),
    };
    validate::ensure_output_dir(&dir)?;
    Ok(dir)
}

/// An explicit output file must land in an existing directory
fn check_output_file(output: &Path) -> Result<(), ValidationError> {
    if let Some(name) = output.file_stem() {
        validate::check_output_name(&name.to_string_lossy())?;
    }
    validate::ensure_output_dir(&input_dir(output))
}

fn handle_transcode(ctx: &Context, args: TranscodeArgs) -> Result<()> {
    validate::ensure_input_file(&args.input)?;
    let output_dir = resolve_output_dir(&args.input, args.output_dir.as_deref())?;
    let container = validate::parse_container(&args.container)?;
    let trim = Trim::parse(args.start.as_deref(), args.end.as_deref())?;
    let family = CodecFamily::from(args.codec);

    let name = args
        .name
        .unwrap_or_else(|| format!("{}_{}", tools::stem_of(&args.input), family));
    let codec = CodecRequest::new(family.token()).with_container(container);
    let extra_args = args
        .ffmpeg_args
        .as_deref()
        .map(engine::parse_additional_args)
        .unwrap_or_default();

    let job = transcode::TranscodeJob {
        input: args.input,
        output_dir,
        name,
        codec,
        trim,
        extra_args,
    };
    // Validate the output name before paying for the encoder probe
    job.output()?;

    let backend = ctx.backend_for(&job.codec, args.cpu)?;
    let plan = transcode::plan(&ctx.config.tools, &job, backend)?;
    ctx.execute(plan)
}

fn handle_compress(ctx: &Context, args: CompressArgs) -> Result<()> {
    validate::ensure_input_file(&args.input)?;
    let output = args
        .output
        .unwrap_or_else(|| tools::sibling(&args.input, "_compressed", None));
    check_output_file(&output)?;

    let mut job = compress::CompressJob::new(args.input, output);
    job.scale = args.scale.as_deref().map(validate::parse_scale_factor).transpose()?;
    job.bitrate = args.bitrate.as_deref().map(Bitrate::parse).transpose()?;
    job.frame_rate = args.fps.as_deref().map(validate::parse_frame_rate).transpose()?;
    job.depth = args.depth.map(parse_depth).transpose()?;
    job.chroma = args.chroma.map(Into::into);
    job.codec = args
        .codec
        .map(|c| CodecRequest::new(CodecFamily::from(c).token()));
    job.denoise = args.denoise;
    job.stabilize = args.stabilize;

    let facts = probe::probe_stream_facts(ctx.ffprobe(), &job.input)?;
    let backend = match &job.codec {
        Some(request) => ctx.backend_for(request, args.cpu)?,
        None => Backend::Cpu,
    };
    let plan = compress::plan(&ctx.config.tools, &job, &facts, backend)?;
    ctx.execute(plan)
}

fn parse_depth(depth: u8) -> Result<u8, ValidationError> {
    match depth {
        8 | 10 => Ok(depth),
        other => Err(ValidationError::OutOfRange {
            field: "colour depth",
            value: other.to_string(),
            expected: "8 or 10",
        }),
    }
}

fn handle_gif(ctx: &Context, args: GifArgs) -> Result<()> {
    validate::ensure_input_file(&args.input)?;
    let output = args
        .output
        .unwrap_or_else(|| tools::sibling(&args.input, "", Some("gif")));
    check_output_file(&output)?;

    let defaults = &ctx.config.defaults;
    let mut job = gif::GifJob::new(args.input, output);
    job.trim = Trim::parse(args.start.as_deref(), args.end.as_deref())?;
    job.fps = match args.fps.as_deref() {
        Some(fps) => validate::parse_frame_rate(fps)?,
        None => defaults.gif_fps,
    };
    job.size = if args.no_scale {
        None
    } else {
        Some((args.width.unwrap_or(defaults.gif_width), args.height))
    };
    job.palette = args.palette;

    let plan = gif::plan(&ctx.config.tools, &job)?;
    ctx.execute(plan)
}

fn handle_cut(ctx: &Context, args: CutArgs) -> Result<()> {
    validate::ensure_input_file(&args.input)?;
    let output_dir = resolve_output_dir(&args.input, args.output_dir.as_deref())?;
    let trim = Trim::parse(args.start.as_deref(), args.end.as_deref())?
        .ok_or(ValidationError::EmptyWindow)?;
    let name = args
        .name
        .unwrap_or_else(|| format!("{}_cut", tools::stem_of(&args.input)));
    let output = tools::output_in(&output_dir, &name, &ctx.config.defaults.cut_container)?;

    let job = cut::CutJob {
        input: args.input,
        output,
        trim,
    };
    let plan = cut::plan(&ctx.config.tools, &job)?;
    ctx.execute(plan)
}

fn handle_ratio(ctx: &Context, args: RatioArgs) -> Result<()> {
    validate::ensure_input_file(&args.input)?;
    let aspect = AspectRatio::parse(&args.aspect)?;
    let mode = ratio::RatioMode::from(args.mode);
    let output = args
        .output
        .unwrap_or_else(|| ratio::default_output(&args.input, &aspect, mode));
    check_output_file(&output)?;

    let facts = probe::probe_stream_facts(ctx.ffprobe(), &args.input)?;
    let job = ratio::RatioJob {
        input: args.input,
        output,
        aspect,
        mode,
        crf: args.crf.unwrap_or(ctx.config.defaults.ratio_crf),
        preset: args
            .preset
            .unwrap_or_else(|| ctx.config.defaults.ratio_preset.clone()),
    };
    let plan = ratio::plan(&ctx.config.tools, &job, &facts)?;
    ctx.execute(plan)
}

fn handle_speed(ctx: &Context, args: SpeedArgs) -> Result<()> {
    validate::ensure_input_file(&args.input)?;
    let factor = validate::parse_speed(&args.factor)?;
    let output = args
        .output
        .unwrap_or_else(|| speed::default_output(&args.input, factor));
    check_output_file(&output)?;

    let report = probe::probe_report(ctx.ffprobe(), &args.input)?;
    let source = speed::SpeedSource::from_report(&report);
    let keep_pitch = !args.no_keep_pitch;
    if !keep_pitch && source.has_audio && source.sample_rate.is_none() {
        warn!("Sample rate unknown, keeping pitch with atempo instead");
    }

    let job = speed::SpeedJob {
        input: args.input,
        output,
        factor,
        keep_pitch,
    };
    let plan = speed::plan(&ctx.config.tools, &job, &source)?;
    ctx.execute(plan)
}

fn handle_separate(ctx: &Context, args: SeparateArgs) -> Result<()> {
    validate::ensure_input_file(&args.input)?;
    let defaults = &ctx.config.defaults;
    let codec = args
        .audio_codec
        .unwrap_or_else(|| defaults.separate_audio_codec.clone());
    let ext = args
        .audio_ext
        .unwrap_or_else(|| defaults.separate_audio_ext.clone());
    validate::ensure_output_dir(&input_dir(&args.input))?;

    let job = separate::SeparateJob::beside(&args.input, &codec, &ext);
    let plan = separate::plan(&ctx.config.tools, &job)?;
    ctx.execute(plan)
}

fn handle_replace_audio(ctx: &Context, args: ReplaceAudioArgs) -> Result<()> {
    validate::ensure_input_file(&args.video)?;
    validate::ensure_input_file(&args.audio)?;

    let mut job = replace_audio::ReplaceAudioJob::new(args.video, args.audio);
    if let Some(output) = args.output {
        job.output = output;
    }
    check_output_file(&job.output)?;
    job.short_audio = args.short_audio.map(Into::into);

    let video_duration = probe::probe_duration(ctx.ffprobe(), &job.video)?;
    let audio_duration = probe::probe_duration(ctx.ffprobe(), &job.audio)?;
    info!(video_duration, audio_duration, "probed durations");

    let plan = replace_audio::plan(&ctx.config.tools, &job, video_duration, audio_duration)?;
    ctx.execute(plan)
}

fn handle_info(ctx: &Context, input: &Path, json: bool) -> Result<()> {
    validate::ensure_input_file(input)?;
    let report = probe::probe_report(ctx.ffprobe(), input)?;
    let size = fs::metadata(input).ok().map(|m| m.len());
    let media = media_info::MediaInfo::from_report(&report, size);

    if json {
        let text = serde_json::to_string_pretty(&media).context("Failed to serialize media info")?;
        println!("{}", text);
    } else {
        print!("{}", media.render());
    }
    Ok(())
}

fn handle_encoders(ctx: &Context) -> Result<()> {
    let os = OsFamily::current();
    if !ctx.config.probe.use_hardware {
        println!("Hardware encoders are disabled in the config; every codec uses the CPU encoder.");
        return Ok(());
    }

    let listing = ctx.encoders.encoders()?;
    println!("Platform: {:?}", os);
    for family in CodecFamily::ALL {
        let candidates = hardware::candidate_backends(family.token(), os, &listing);
        let chosen = candidates.first();
        let others: Vec<String> = candidates
            .as_slice()
            .iter()
            .skip(1)
            .map(|b| b.to_string())
            .collect();
        if others.is_empty() {
            println!("  {:<7} -> {}", family.token(), chosen.qualify(family.token()));
        } else {
            println!(
                "  {:<7} -> {} (also: {})",
                family.token(),
                chosen.qualify(family.token()),
                others.join(", ")
            );
        }
    }
    Ok(())
}

fn handle_check_ffmpeg(ctx: &Context) -> Result<()> {
    let version = engine::ffmpeg_version(&ctx.config.tools)?;
    println!("ffmpeg found: {}", version);
    let probe_version = engine::ffprobe_version(&ctx.config.tools)?;
    println!("ffprobe found: {}", probe_version);
    Ok(())
}

fn handle_init_config() -> Result<()> {
    let path = Config::config_path()?;
    if path.exists() {
        let cfg = Config::load_from(&path)?;
        println!("Config loaded successfully from {}", path.display());
        println!("{:#?}", cfg);
    } else {
        println!("Creating default config...");
        Config::default().save_to(&path)?;
        println!("Default config saved to {}", path.display());
    }
    Ok(())
}
