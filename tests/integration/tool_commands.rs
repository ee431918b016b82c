use crate::common::{args_of, facts, flag_value, tools, video};
use ffkit::engine::core::{ChromaLayout, Trim};
use ffkit::engine::hardware::{Backend, CodecRequest};
use ffkit::engine::tools::{compress, cut, gif, ratio, separate, speed, transcode};
use ffkit::engine::validate::{AspectRatio, Bitrate};
use ffkit::engine::ValidationError;
use std::path::PathBuf;

fn transcode_job(name: &str, trim: Option<Trim>) -> transcode::TranscodeJob {
    transcode::TranscodeJob {
        input: video("in.mov"),
        output_dir: PathBuf::from("/videos"),
        name: name.to_string(),
        codec: CodecRequest::new("hevc").with_container("mkv"),
        trim,
        extra_args: Vec::new(),
    }
}

#[test]
fn transcode_uses_resolved_backend_and_container() {
    let job = transcode_job("in_hevc", None);
    let plan = transcode::plan(&tools(), &job, Backend::Nvenc).unwrap();

    assert_eq!(plan.steps.len(), 1);
    assert_eq!(flag_value(&plan.steps[0], "-c:v").as_deref(), Some("hevc_nvenc"));
    assert_eq!(plan.outputs, vec![video("in_hevc.mkv")]);
    assert_eq!(plan.duration_s, None);
}

#[test]
fn transcode_trim_sets_seek_duration_and_progress_length() {
    let trim = Trim::parse(Some("00:01:00"), Some("00:02:30")).unwrap();
    let plan = transcode::plan(&tools(), &transcode_job("part", trim), Backend::Cpu).unwrap();

    let cmd = &plan.steps[0];
    assert_eq!(flag_value(cmd, "-ss").as_deref(), Some("00:01:00"));
    assert_eq!(flag_value(cmd, "-t").as_deref(), Some("90.00"));
    assert_eq!(flag_value(cmd, "-c:v").as_deref(), Some("hevc"));
    assert_eq!(plan.duration_s, Some(90.0));
}

#[test]
fn transcode_rejects_reserved_output_name() {
    let err = transcode::plan(&tools(), &transcode_job("nul", None), Backend::Cpu).unwrap_err();
    assert!(matches!(err, ValidationError::IllegalFilename { .. }));
}

#[test]
fn transcode_refuses_to_overwrite_its_input() {
    let mut job = transcode_job("in", None);
    job.codec = CodecRequest::new("h264").with_container("mov");
    let err = transcode::plan(&tools(), &job, Backend::Cpu).unwrap_err();
    assert!(matches!(err, ValidationError::OutputIsInput(_)));
}

#[test]
fn transcode_extra_args_go_before_output() {
    let mut job = transcode_job("tuned", None);
    job.extra_args = ffkit::engine::parse_additional_args("-tune film -metadata title='My Film'");
    let plan = transcode::plan(&tools(), &job, Backend::Cpu).unwrap();

    let args = args_of(&plan.steps[0]);
    let tail = &args[args.len() - 6..];
    assert_eq!(tail, ["-tune", "film", "-metadata", "title=My Film", "-y", "/videos/tuned.mkv"]);
}

#[test]
fn compress_scales_from_probed_size() {
    let mut job = compress::CompressJob::new(video("big.mov"), video("big_compressed.mov"));
    job.scale = Some(0.5);
    job.bitrate = Some(Bitrate::parse("2M").unwrap());
    job.frame_rate = Some(30.0);

    let plan = compress::plan(&tools(), &job, &facts(1920, 1080, "yuv420p"), Backend::Cpu).unwrap();
    let cmd = &plan.steps[0];
    assert_eq!(flag_value(cmd, "-vf").as_deref(), Some("scale=960:540"));
    assert_eq!(flag_value(cmd, "-b:v").as_deref(), Some("2M"));
    assert_eq!(flag_value(cmd, "-r").as_deref(), Some("30"));
    assert_eq!(flag_value(cmd, "-c:v"), None);
    assert_eq!(flag_value(cmd, "-pix_fmt"), None);
}

#[test]
fn compress_refuses_a_dotted_alias_of_its_input() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.mp4");
    std::fs::write(&input, b"x").unwrap();
    let job = compress::CompressJob::new(input, dir.path().join(".").join("in.mp4"));

    let err = compress::plan(&tools(), &job, &facts(1920, 1080, "yuv420p"), Backend::Cpu)
        .unwrap_err();
    assert!(matches!(err, ValidationError::OutputIsInput(_)));
}

#[test]
fn compress_odd_sizes_round_down_to_even() {
    let mut job = compress::CompressJob::new(video("odd.mp4"), video("odd_small.mp4"));
    job.scale = Some(0.25);
    let plan = compress::plan(&tools(), &job, &facts(1280, 720, "yuv420p"), Backend::Cpu).unwrap();
    assert_eq!(flag_value(&plan.steps[0], "-vf").as_deref(), Some("scale=320:180"));

    assert_eq!(compress::scaled_size(&facts(1001, 777, "yuv420p"), 0.5).unwrap(), (500, 388));
}

#[test]
fn compress_pixel_format_keeps_source_half() {
    let mut job = compress::CompressJob::new(video("hdr.mkv"), video("hdr_small.mkv"));
    job.depth = Some(8);
    let plan =
        compress::plan(&tools(), &job, &facts(3840, 2160, "yuv422p10le"), Backend::Cpu).unwrap();
    assert_eq!(flag_value(&plan.steps[0], "-pix_fmt").as_deref(), Some("yuv422p"));

    job.depth = None;
    job.chroma = Some(ChromaLayout::Yuv444);
    let plan =
        compress::plan(&tools(), &job, &facts(3840, 2160, "yuv422p10le"), Backend::Cpu).unwrap();
    assert_eq!(flag_value(&plan.steps[0], "-pix_fmt").as_deref(), Some("yuv444p10le"));
}

#[test]
fn compress_filters_compose_in_order() {
    let mut job = compress::CompressJob::new(video("shaky.mp4"), video("steady.mp4"));
    job.scale = Some(0.5);
    job.denoise = true;
    job.stabilize = true;
    job.codec = Some(CodecRequest::new("h264"));

    let plan = compress::plan(&tools(), &job, &facts(1920, 1080, "yuv420p"), Backend::Qsv).unwrap();
    let cmd = &plan.steps[0];
    assert_eq!(
        flag_value(cmd, "-vf").as_deref(),
        Some("scale=960:540,hqdn3d=1.5:1.5:6.0:6.0,deshake")
    );
    assert_eq!(flag_value(cmd, "-c:v").as_deref(), Some("h264_qsv"));
}

#[test]
fn gif_without_palette_uses_simple_filter() {
    let mut job = gif::GifJob::new(video("clip.mp4"), video("clip.gif"));
    job.trim = Trim::parse(Some("5"), Some("8")).unwrap();

    let plan = gif::plan(&tools(), &job).unwrap();
    let args = args_of(&plan.steps[0]);
    assert_eq!(&args[..4], ["-ss", "5", "-i", "/videos/clip.mp4"]);
    assert_eq!(flag_value(&plan.steps[0], "-t").as_deref(), Some("3.00"));
    assert_eq!(
        flag_value(&plan.steps[0], "-vf").as_deref(),
        Some("fps=10,scale=320:-1:flags=lanczos")
    );
    assert!(args.iter().all(|a| a != "-filter_complex"));
}

#[test]
fn gif_rejects_bad_size_and_rate() {
    let mut job = gif::GifJob::new(video("clip.mp4"), video("clip.gif"));
    job.size = Some((-1, -1));
    assert!(gif::plan(&tools(), &job).is_err());

    job.size = None;
    job.fps = 0.0;
    assert!(gif::plan(&tools(), &job).is_err());
}

#[test]
fn cut_is_a_stream_copy() {
    let job = cut::CutJob {
        input: video("match.mp4"),
        output: video("match_cut.mp4"),
        trim: Trim::parse(None, Some("00:00:45")).unwrap().unwrap(),
    };
    let plan = cut::plan(&tools(), &job).unwrap();
    let args = args_of(&plan.steps[0]);
    assert_eq!(
        args,
        ["-i", "/videos/match.mp4", "-t", "45.00", "-c", "copy", "-y", "/videos/match_cut.mp4"]
    );
    assert_eq!(plan.duration_s, Some(45.0));
}

#[test]
fn ratio_crop_centres_the_window() {
    let job = ratio::RatioJob {
        input: video("wide.mp4"),
        output: ratio::default_output(
            &video("wide.mp4"),
            &AspectRatio::parse("4:3").unwrap(),
            ratio::RatioMode::Crop,
        ),
        aspect: AspectRatio::parse("4:3").unwrap(),
        mode: ratio::RatioMode::Crop,
        crf: 23,
        preset: "medium".to_string(),
    };
    assert_eq!(job.output, video("wide_cropped_4_3.mp4"));

    let plan = ratio::plan(&tools(), &job, &facts(1920, 1080, "yuv420p")).unwrap();
    let cmd = &plan.steps[0];
    assert_eq!(flag_value(cmd, "-vf").as_deref(), Some("crop=1440:1080:240:0"));
    assert_eq!(flag_value(cmd, "-c:v").as_deref(), Some("libx264"));
    assert_eq!(flag_value(cmd, "-crf").as_deref(), Some("23"));
}

#[test]
fn ratio_stretch_scales_the_frame() {
    let aspect = AspectRatio::parse("16:9").unwrap();
    let rect = ratio::fit_rect(1440, 1080, &aspect).unwrap();
    assert_eq!((rect.width, rect.height), (1440, 810));

    let job = ratio::RatioJob {
        input: video("square.mp4"),
        output: video("square_wide.mp4"),
        aspect,
        mode: ratio::RatioMode::Stretch,
        crf: 20,
        preset: "slow".to_string(),
    };
    let plan = ratio::plan(&tools(), &job, &facts(1440, 1080, "yuv420p")).unwrap();
    assert_eq!(flag_value(&plan.steps[0], "-vf").as_deref(), Some("scale=1440:810"));
}

#[test]
fn ratio_needs_a_frame_size() {
    let aspect = AspectRatio::parse("1:1").unwrap();
    assert!(matches!(
        ratio::fit_rect(0, 1080, &aspect),
        Err(ValidationError::MissingSourceInfo(_))
    ));
}

#[test]
fn speed_with_audio_maps_both_streams() {
    let job = speed::SpeedJob {
        input: video("run.mp4"),
        output: speed::default_output(&video("run.mp4"), 4.5),
        factor: 4.5,
        keep_pitch: true,
    };
    assert_eq!(job.output, video("run_x4.5.mp4"));

    let source = speed::SpeedSource {
        has_audio: true,
        sample_rate: Some(44_100),
        duration: Some(90.0),
    };
    let plan = speed::plan(&tools(), &job, &source).unwrap();
    let cmd = &plan.steps[0];
    assert_eq!(
        flag_value(cmd, "-filter_complex").as_deref(),
        Some("[0:v]setpts=0.222222*PTS[v];[0:a]atempo=2.0,atempo=2.0,atempo=1.125[a]")
    );
    assert_eq!(plan.duration_s, Some(20.0));
}

#[test]
fn speed_without_audio_drops_audio() {
    let job = speed::SpeedJob {
        input: video("silent.mp4"),
        output: video("silent_x0.5.mp4"),
        factor: 0.5,
        keep_pitch: true,
    };
    let plan = speed::plan(&tools(), &job, &speed::SpeedSource::default()).unwrap();
    let args = args_of(&plan.steps[0]);
    assert!(args.contains(&"-an".to_string()));
    assert_eq!(
        flag_value(&plan.steps[0], "-filter_complex").as_deref(),
        Some("[0:v]setpts=2.0*PTS[v]")
    );
}

#[test]
fn speed_pitch_follows_when_asked() {
    let job = speed::SpeedJob {
        input: video("voice.mp4"),
        output: video("voice_fast.mp4"),
        factor: 1.5,
        keep_pitch: false,
    };
    let source = speed::SpeedSource {
        has_audio: true,
        sample_rate: Some(48_000),
        duration: None,
    };
    let plan = speed::plan(&tools(), &job, &source).unwrap();
    let graph = flag_value(&plan.steps[0], "-filter_complex").unwrap();
    assert!(graph.ends_with("[0:a]asetrate=72000,aresample=48000[a]"), "{}", graph);
}

#[test]
fn separate_writes_two_outputs() {
    let job = separate::SeparateJob::beside(&video("talk.mp4"), "libmp3lame", "mp3");
    let plan = separate::plan(&tools(), &job).unwrap();

    assert_eq!(plan.steps.len(), 2);
    assert_eq!(
        args_of(&plan.steps[0]),
        ["-i", "/videos/talk.mp4", "-an", "-c:v", "copy", "-y", "/videos/talk_no_audio.mp4"]
    );
    assert_eq!(
        args_of(&plan.steps[1]),
        ["-i", "/videos/talk.mp4", "-vn", "-acodec", "libmp3lame", "-y", "/videos/talk.mp3"]
    );
    assert_eq!(plan.outputs, vec![video("talk_no_audio.mp4"), video("talk.mp3")]);
}

#[test]
fn separate_audio_cannot_overwrite_input() {
    let job = separate::SeparateJob::beside(&video("song.mp3"), "libmp3lame", "mp3");
    assert!(matches!(
        separate::plan(&tools(), &job),
        Err(ValidationError::OutputIsInput(_))
    ));
}
