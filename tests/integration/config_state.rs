use ffkit::config::Config;
use ffkit::engine::ToolPaths;
use std::fs;

#[test]
fn default_config_roundtrips_through_toml() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("config.toml");

    let mut config = Config::default();
    config.tools.ffmpeg = "/opt/ffmpeg/bin/ffmpeg".to_string();
    config.defaults.gif_width = 480;
    config.probe.use_hardware = false;
    config.save_to(&path).unwrap();

    let loaded = Config::load_from(&path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn partial_config_fills_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(
        &path,
        "[tools]\nffprobe = \"/usr/local/bin/ffprobe\"\n\n[defaults]\nratio_crf = 18\n",
    )
    .unwrap();

    let config = Config::load_from(&path).unwrap();
    assert_eq!(
        config.tools,
        ToolPaths {
            ffmpeg: "ffmpeg".to_string(),
            ffprobe: "/usr/local/bin/ffprobe".to_string(),
        }
    );
    assert_eq!(config.defaults.ratio_crf, 18);
    assert_eq!(config.defaults.ratio_preset, "medium");
    assert_eq!(config.defaults.gif_fps, 10.0);
    assert!(config.probe.cache_encoders);
    assert!(!config.logging.command_log);
}

#[test]
fn broken_config_is_an_error_with_context() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "[defaults]\ngif_fps = \"fast\"\n").unwrap();

    let err = Config::load_from(&path).unwrap_err();
    assert!(format!("{:#}", err).contains("config.toml"), "{:#}", err);
}

#[test]
fn command_log_path_follows_the_flag() {
    let mut config = Config::default();
    assert_eq!(config.command_log_path(), None);

    config.logging.command_log = true;
    if let Some(path) = config.command_log_path() {
        assert!(path.ends_with("ffkit.log"));
    }
}
