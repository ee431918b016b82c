use ffkit::engine::probe::{parse_duration_csv, parse_probe_report, parse_stream_facts};
use ffkit::engine::tools::info::MediaInfo;
use ffkit::engine::tools::speed::SpeedSource;

const SCREEN_RECORDING: &str = r#"{
    "streams": [
        {
            "codec_type": "video",
            "codec_name": "hevc",
            "width": 2560,
            "height": 1440,
            "pix_fmt": "yuv420p10le",
            "r_frame_rate": "60/1",
            "avg_frame_rate": "60/1"
        }
    ],
    "format": {
        "format_name": "matroska,webm",
        "duration": "12.500000",
        "size": "5242880"
    }
}"#;

#[test]
fn silent_recording_has_no_audio_facts() {
    let report = parse_probe_report("ffprobe", SCREEN_RECORDING).unwrap();
    let info = MediaInfo::from_report(&report, None);

    assert_eq!(info.resolution().as_deref(), Some("2560x1440"));
    assert_eq!(info.color_depth_bits, Some(10));
    assert_eq!(info.frame_rate, Some(60.0));
    assert_eq!(info.file_size_mb, Some(5.0));
    assert_eq!(info.bitrate_kbps, None);
    assert_eq!(info.audio_codec, None);

    let text = info.render();
    assert!(text.contains("Audio codec:   Unknown"), "{}", text);
    assert!(text.contains("Duration:      12.50 seconds"), "{}", text);

    let source = SpeedSource::from_report(&report);
    assert!(!source.has_audio);
    assert_eq!(source.duration, Some(12.5));
}

#[test]
fn media_info_serializes_to_json() {
    let report = parse_probe_report("ffprobe", SCREEN_RECORDING).unwrap();
    let info = MediaInfo::from_report(&report, Some(1024 * 1024));
    let value = serde_json::to_value(&info).unwrap();

    assert_eq!(value["width"], 2560);
    assert_eq!(value["video_codec"], "hevc");
    assert_eq!(value["file_size_mb"], 1.0);
    assert!(value["audio_codec"].is_null());
}

#[test]
fn stream_facts_and_duration_from_raw_output() {
    let facts = parse_stream_facts(
        "ffprobe",
        r#"{"programs": [], "streams": [{"width": 720, "height": 576, "codec_name": "mpeg2video"}]}"#,
    )
    .unwrap();
    assert_eq!((facts.width, facts.height), (720, 576));
    assert_eq!(facts.pix_fmt, None);

    assert_eq!(parse_duration_csv("ffprobe", "45.000000\n").unwrap(), 45.0);
}
