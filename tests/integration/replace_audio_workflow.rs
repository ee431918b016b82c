use crate::common::{args_of, tools, video};
use ffkit::engine::ValidationError;
use ffkit::engine::tools::replace_audio::{
    AudioPrep, ReplaceAudioJob, ShortAudioMode, decide, default_output, plan,
};
use std::path::PathBuf;

fn job(mode: Option<ShortAudioMode>) -> ReplaceAudioJob {
    let mut job = ReplaceAudioJob::new(video("holiday.mp4"), PathBuf::from("/music/track.mp3"));
    job.short_audio = mode;
    job
}

#[test]
fn default_output_sits_beside_the_video() {
    assert_eq!(default_output(&video("holiday.mp4")), video("holiday_with_new_audio.mp4"));
    assert_eq!(job(None).output, video("holiday_with_new_audio.mp4"));
}

#[test]
fn longer_audio_is_trimmed_then_muxed() {
    let plan = plan(&tools(), &job(None), 30.0, 45.0).unwrap();
    assert_eq!(plan.steps.len(), 2);
    assert_eq!(plan.scratch.len(), 1);

    let scratch = plan.scratch[0].to_string_lossy().to_string();
    assert!(scratch.ends_with("_trimmed_audio.mp3"), "{}", scratch);
    assert!(plan.scratch[0].starts_with(std::env::temp_dir()));

    assert_eq!(
        args_of(&plan.steps[0]),
        ["-i", "/music/track.mp3", "-t", "30", "-c", "copy", "-y", scratch.as_str()]
    );
    assert_eq!(
        args_of(&plan.steps[1]),
        [
            "-i",
            "/videos/holiday.mp4",
            "-i",
            scratch.as_str(),
            "-c:v",
            "copy",
            "-map",
            "0:v:0",
            "-map",
            "1:a:0",
            "-shortest",
            "-y",
            "/videos/holiday_with_new_audio.mp4",
        ]
    );
    assert_eq!(plan.outputs, vec![video("holiday_with_new_audio.mp4")]);
    assert_eq!(plan.duration_s, Some(30.0));
}

#[test]
fn shorter_audio_needs_a_choice() {
    let err = plan(&tools(), &job(None), 60.0, 45.0).unwrap_err();
    assert!(matches!(err, ValidationError::ShortAudioModeRequired));
}

#[test]
fn shorter_audio_padded_with_silence() {
    let plan = plan(&tools(), &job(Some(ShortAudioMode::Pad)), 30.0, 12.5).unwrap();
    let scratch = plan.scratch[0].to_string_lossy().to_string();
    assert!(scratch.ends_with("_padded_audio.aac"), "{}", scratch);

    let pad = args_of(&plan.steps[0]);
    assert_eq!(
        pad,
        [
            "-i",
            "/music/track.mp3",
            "-filter_complex",
            "[0:a]apad=whole_dur=30[out]",
            "-map",
            "[out]",
            "-c:a",
            "aac",
            "-y",
            scratch.as_str(),
        ]
    );
    assert_eq!(args_of(&plan.steps[1])[3], scratch);
}

#[test]
fn shorter_audio_kept_as_is() {
    let plan = plan(&tools(), &job(Some(ShortAudioMode::Keep)), 30.0, 12.5).unwrap();
    assert_eq!(plan.steps.len(), 1);
    assert!(plan.scratch.is_empty());
    assert_eq!(args_of(&plan.steps[0])[3], "/music/track.mp3");
}

#[test]
fn equal_durations_skip_preparation() {
    assert_eq!(decide(30.0, 30.0004, None).unwrap(), AudioPrep::AsIs);
    assert_eq!(decide(30.0, 29.9995, None).unwrap(), AudioPrep::AsIs);
    assert_eq!(decide(30.0, 31.0, None).unwrap(), AudioPrep::Trim { duration: 30.0 });
}

#[test]
fn zero_length_video_is_rejected() {
    assert!(matches!(
        decide(0.0, 10.0, Some(ShortAudioMode::Pad)),
        Err(ValidationError::MissingSourceInfo(_))
    ));
    assert!(decide(f64::NAN, 10.0, None).is_err());
}

#[test]
fn scratch_names_are_unique_per_job() {
    let a = plan(&tools(), &job(None), 30.0, 45.0).unwrap();
    let b = plan(&tools(), &job(None), 30.0, 45.0).unwrap();
    assert_ne!(a.scratch[0], b.scratch[0]);
}
