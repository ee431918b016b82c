// Global configuration management

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::engine::ToolPaths;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub tools: ToolPaths,

    #[serde(default)]
    pub probe: ProbeConfig,

    #[serde(default)]
    pub defaults: DefaultsConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbeConfig {
    /// Run `ffmpeg -encoders` once per process instead of once per job
    #[serde(default = "default_true_config")]
    pub cache_encoders: bool,

    /// Look for hardware encoders at all; off forces the CPU encoder
    #[serde(default = "default_true_config")]
    pub use_hardware: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefaultsConfig {
    #[serde(default = "default_gif_fps")]
    pub gif_fps: f64,

    #[serde(default = "default_gif_width")]
    pub gif_width: i32,

    #[serde(default = "default_ratio_crf")]
    pub ratio_crf: u8,

    #[serde(default = "default_ratio_preset")]
    pub ratio_preset: String,

    /// Container written by the cut tool
    #[serde(default = "default_cut_container")]
    pub cut_container: String,

    #[serde(default = "default_separate_audio_codec")]
    pub separate_audio_codec: String,

    #[serde(default = "default_separate_audio_ext")]
    pub separate_audio_ext: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Append every executed command to ffkit.log next to the config file
    #[serde(default)]
    pub command_log: bool,
}

fn default_true_config() -> bool {
    true
}

fn default_gif_fps() -> f64 {
    10.0
}

fn default_gif_width() -> i32 {
    320
}

fn default_ratio_crf() -> u8 {
    23
}

fn default_ratio_preset() -> String {
    "medium".to_string()
}

fn default_cut_container() -> String {
    "mp4".to_string()
}

fn default_separate_audio_codec() -> String {
    "libmp3lame".to_string()
}

fn default_separate_audio_ext() -> String {
    "mp3".to_string()
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            cache_encoders: true,
            use_hardware: true,
        }
    }
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            gif_fps: default_gif_fps(),
            gif_width: default_gif_width(),
            ratio_crf: default_ratio_crf(),
            ratio_preset: default_ratio_preset(),
            cut_container: default_cut_container(),
            separate_audio_codec: default_separate_audio_codec(),
            separate_audio_ext: default_separate_audio_ext(),
        }
    }
}

impl Config {
    /// Directory holding config.toml and the command log
    pub fn config_dir() -> Result<PathBuf> {
        let dir = if cfg!(target_os = "macos") {
            dirs::home_dir()
                .context("Could not determine home directory")?
                .join(".config")
                .join("ffkit")
        } else {
            dirs::config_dir()
                .context("Could not determine config directory")?
                .join("ffkit")
        };
        Ok(dir)
    }

    /// Get the path to the config file
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Where executed commands are logged when `logging.command_log` is on
    pub fn command_log_path(&self) -> Option<PathBuf> {
        if !self.logging.command_log {
            return None;
        }
        Self::config_dir().ok().map(|dir| dir.join("ffkit.log"))
    }

    /// Load config from disk, or create default if it doesn't exist
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            let config = Config::default();

            // A read-only config dir is not fatal
            if let Err(e) = config.save() {
                tracing::warn!("Could not create default config file: {:#}", e);
                tracing::warn!(
                    "Using built-in defaults. Run 'ffkit init-config' to create a config file."
                );
            }

            Ok(config)
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Save config to disk
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(path, contents)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Check if config file exists
    pub fn exists() -> bool {
        Self::config_path().map(|p| p.exists()).unwrap_or(false)
    }
}
