use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::entry::EntryType;

pub const SUPPORTED_LOCALES: &[&str] = &["vi", "en"];
const MIN_TIMEOUT_SECS: u64 = 5;
const MAX_TIMEOUT_SECS: u64 = 120;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_locale")]
    pub locale: String,
    #[serde(default)]
    pub default_entry_type: EntryType,
    #[serde(default = "default_lookup_model")]
    pub lookup_model: String,
    #[serde(default = "default_speech_model")]
    pub speech_model: String,
    #[serde(default = "default_speech_voice")]
    pub speech_voice: String,
    /// Empty means "read GEMINI_API_KEY from the environment".
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_export_dir")]
    pub export_dir: String,
    /// External command that plays a WAV file; empty disables playback.
    #[serde(default)]
    pub audio_player: String,
    /// Ring the terminal bell on a wrong pair or when the clock runs out.
    #[serde(default = "default_sound_effects")]
    pub sound_effects: bool,
}

fn default_theme() -> String {
    "catppuccin-mocha".to_string()
}
fn default_locale() -> String {
    "vi".to_string()
}
fn default_lookup_model() -> String {
    "gemini-3-pro-preview".to_string()
}
fn default_speech_model() -> String {
    "gemini-2.5-flash-preview-tts".to_string()
}
fn default_speech_voice() -> String {
    "Kore".to_string()
}
fn default_api_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}
fn default_request_timeout_secs() -> u64 {
    30
}
fn default_sound_effects() -> bool {
    true
}
fn default_export_dir() -> String {
    dirs::document_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .to_string_lossy()
        .to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            locale: default_locale(),
            default_entry_type: EntryType::default(),
            lookup_model: default_lookup_model(),
            speech_model: default_speech_model(),
            speech_voice: default_speech_voice(),
            api_key: String::new(),
            api_base_url: default_api_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
            export_dir: default_export_dir(),
            audio_player: String::new(),
            sound_effects: default_sound_effects(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = fs::read_to_string(path)?;
            let mut config: Config = toml::from_str(&content)?;
            config.validate();
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("vocabr")
            .join("config.toml")
    }

    /// Clamp numeric settings and reset values that no longer name anything.
    pub fn validate(&mut self) {
        self.request_timeout_secs = self
            .request_timeout_secs
            .clamp(MIN_TIMEOUT_SECS, MAX_TIMEOUT_SECS);
        if !SUPPORTED_LOCALES.contains(&self.locale.as_str()) {
            self.locale = default_locale();
        }
        if self.api_base_url.trim().is_empty() {
            self.api_base_url = default_api_base_url();
        }
        if self.export_dir.trim().is_empty() {
            self.export_dir = default_export_dir();
        }
    }

    pub fn export_path(&self) -> PathBuf {
        PathBuf::from(&self.export_dir)
    }
}
