//! Configuration for stroke trainer.

use hanzi_quiz::QuizOptions;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub quiz: QuizOptions,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub log: LogConfig,
}

impl Config {
    pub fn load() -> Self {
        Self::config_path()
            .map(|p| Self::load_from(&p))
            .unwrap_or_default()
    }

    /// Read `path`, falling back to defaults when it is missing or invalid.
    pub fn load_from(path: &Path) -> Self {
        std::fs::read_to_string(path)
            .ok()
            .and_then(|s| match toml::from_str(&s) {
                Ok(config) => Some(config),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "ignoring invalid config");
                    None
                }
            })
            .unwrap_or_default()
    }

    pub fn save(&self) -> anyhow::Result<()> {
        if let Some(path) = Self::config_path() {
            self.save_to(&path)?;
        }
        Ok(())
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "stroke-trainer")
            .map(|d| d.config_dir().join("config.toml"))
    }

    pub fn log_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "stroke-trainer")
            .map(|d| d.data_dir().join("stroke-trainer.log"))
    }

    /// Directory searched for `<symbol>.json`; the configured one wins over
    /// the per-user data dir.
    pub fn characters_dir(&self) -> Option<PathBuf> {
        self.data.characters_dir.clone().or_else(|| {
            directories::ProjectDirs::from("", "", "stroke-trainer")
                .map(|d| d.data_dir().join("characters"))
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Padding around the character, in terminal columns.
    #[serde(default = "default_padding")]
    pub padding: f64,
    /// Time each stroke takes in the reveal animation.
    #[serde(default = "default_stroke_reveal_ms")]
    pub stroke_reveal_ms: u64,
    #[serde(default = "default_true")]
    pub show_drawn_strokes: bool,
}

fn default_padding() -> f64 { 2.0 }
fn default_stroke_reveal_ms() -> u64 { 600 }
fn default_true() -> bool { true }

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            padding: 2.0,
            stroke_reveal_ms: 600,
            show_drawn_strokes: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default)]
    pub characters_dir: Option<PathBuf>,
    /// Practice list, in order.
    #[serde(default = "default_characters")]
    pub characters: Vec<String>,
}

fn default_characters() -> Vec<String> {
    ["一", "二", "三", "十", "人", "口"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            characters_dir: None,
            characters: default_characters(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// One of trace, debug, info, warn, error.
    #[serde(default = "default_level")]
    pub level: String,
}

fn default_level() -> String { "info".to_string() }

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: "info".to_string(),
        }
    }
}
