//! Process configuration.
//!
//! One TOML file, loaded before anything else. Every field has a serde
//! default so an empty file is a valid config; `load_or_init` writes a
//! commented starter file on first run.

use crate::profile::Profile;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Path to config.toml - computed, not serialized
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Optional path to the operator's profile TOML.
    #[serde(default)]
    pub profile_path: Option<String>,

    #[serde(default)]
    pub model: ModelConfig,

    #[serde(default)]
    pub session: SessionConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// When false the router runs fully offline and never escalates.
    #[serde(default)]
    pub enabled: bool,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_temperature")]
    pub temperature: f64,
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".into()
}

fn default_model() -> String {
    "gpt-4o-mini".into()
}

fn default_temperature() -> f64 {
    0.7
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            base_url: default_base_url(),
            api_key: None,
            model: default_model(),
            temperature: default_temperature(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Most recent turns kept per sender.
    #[serde(default = "default_max_turns")]
    pub max_turns: usize,

    /// Turns handed to the model as context.
    #[serde(default = "default_history_window")]
    pub history_window: usize,
}

fn default_max_turns() -> usize {
    crate::sessions::DEFAULT_MAX_TURNS
}

fn default_history_window() -> usize {
    crate::orchestrator::DEFAULT_HISTORY_WINDOW
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_turns: default_max_turns(),
            history_window: default_history_window(),
        }
    }
}

const STARTER_CONFIG: &str = "\
# Valet configuration. All fields are optional.

# profile_path = \"~/.config/valet/profile.toml\"

[model]
enabled = false
base_url = \"https://api.openai.com/v1\"
model = \"gpt-4o-mini\"
temperature = 0.7

[session]
max_turns = 20
history_window = 12
";

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read config at {}", path.display()))?;
        let mut config: Config = toml::from_str(&raw)
            .with_context(|| format!("invalid config at {}", path.display()))?;
        config.config_path = path.to_path_buf();
        config.validate()?;
        Ok(config)
    }

    /// Load the default config path, writing a starter file on first run.
    pub fn load_or_init() -> Result<Self> {
        let dirs = ProjectDirs::from("", "", "valet")
            .context("could not determine a config directory")?;
        let path = dirs.config_dir().join("config.toml");
        if !path.exists() {
            fs::create_dir_all(dirs.config_dir())?;
            fs::write(&path, STARTER_CONFIG)?;
            info!(path = %path.display(), "wrote starter config");
        }
        Self::load(&path)
    }

    fn validate(&self) -> Result<()> {
        if !(0.0..=2.0).contains(&self.model.temperature) {
            anyhow::bail!(
                "model.temperature must be between 0.0 and 2.0, got {}",
                self.model.temperature
            );
        }
        Ok(())
    }

    /// Load the configured profile; no path means the built-in defaults.
    pub fn load_profile(&self) -> Result<Profile> {
        match &self.profile_path {
            Some(path) => Profile::load(Path::new(path)),
            None => Ok(Profile::default()),
        }
    }
}
