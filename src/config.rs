//! # Settings
//!
//! User settings stored in `~/.config/nirisetup/settings.json`.
//!
//! ## Overview
//!
//! [`Settings`] is deserialized from JSON. Every field has a default, so an
//! absent file or a partial file both work. Unknown fields are rejected to
//! catch typos.
//!
//! ```json
//! {
//!   "theme": "Nord",
//!   "packages": ["niri", "waybar", "foot"],
//!   "install_command": ["doas", "pkg", "install", "-y"]
//! }
//! ```
//!
//! The `directories` crate resolves the platform config directory.

use crate::action::RunnerConfig;
use crate::session::DEFAULT_LOG_FILE_NAME;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Persisted user settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    /// Name of a built-in theme.
    #[serde(default = "default_theme_name")]
    pub theme: String,

    /// Packages installed by "Install Niri", in order.
    #[serde(default = "default_packages")]
    pub packages: Vec<String>,

    /// Command prefix used to install one package; the name is appended.
    #[serde(default = "default_install_command")]
    pub install_command: Vec<String>,

    /// Command line of the config validator.
    #[serde(default = "default_validate_command")]
    pub validate_command: Vec<String>,

    /// Config file copied during install. Relative paths resolve against
    /// the working directory.
    #[serde(default = "default_source_config")]
    pub source_config: PathBuf,

    /// Directory name under `~/.config` that receives the config file.
    #[serde(default = "default_config_app")]
    pub config_app: String,

    /// File name of the saved session log under the temp directory.
    #[serde(default = "default_log_file_name")]
    pub log_file_name: String,
}

fn default_theme_name() -> String {
    "Catppuccin Mocha".to_string()
}

fn default_packages() -> Vec<String> {
    [
        "niri",
        "wlroots",
        "xwayland-satellite",
        "seatd",
        "waybar",
        "grim",
        "jq",
        "wofi",
        "alacritty",
        "pam_xdg",
        "fuzzel",
        "swaylock",
        "foot",
        "wlsunset",
        "swaybg",
        "mako",
        "swayidle",
    ]
    .iter()
    .map(|s| (*s).to_string())
    .collect()
}

fn default_install_command() -> Vec<String> {
    vec![
        "sudo".to_string(),
        "pkg".to_string(),
        "install".to_string(),
        "-y".to_string(),
    ]
}

fn default_validate_command() -> Vec<String> {
    vec!["niri".to_string(), "validate".to_string()]
}

fn default_source_config() -> PathBuf {
    PathBuf::from("config.kdl")
}

fn default_config_app() -> String {
    "niri".to_string()
}

fn default_log_file_name() -> String {
    DEFAULT_LOG_FILE_NAME.to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: default_theme_name(),
            packages: default_packages(),
            install_command: default_install_command(),
            validate_command: default_validate_command(),
            source_config: default_source_config(),
            config_app: default_config_app(),
            log_file_name: default_log_file_name(),
        }
    }
}

impl Settings {
    /// Load settings from the default location.
    pub fn load() -> Result<Self> {
        let path = Self::settings_path()?;
        Self::load_from(&path)
    }

    /// Load settings from a specific path. Returns `Settings::default()` if
    /// the file does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("No settings at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file: {}", path.display()))?;
        let settings: Self = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse settings file: {}", path.display()))?;
        settings
            .validate()
            .with_context(|| format!("Invalid settings file: {}", path.display()))?;
        Ok(settings)
    }

    /// Reject settings the runners cannot use.
    pub fn validate(&self) -> Result<()> {
        if self.install_command.is_empty() {
            anyhow::bail!("install_command must not be empty");
        }
        if self.validate_command.is_empty() {
            anyhow::bail!("validate_command must not be empty");
        }
        if self.packages.iter().any(|p| p.trim().is_empty()) {
            anyhow::bail!("packages must not contain empty names");
        }
        if self.config_app.is_empty() || self.config_app.contains('/') {
            anyhow::bail!("config_app must be a single directory name");
        }
        if self.log_file_name.is_empty() || self.log_file_name.contains('/') {
            anyhow::bail!("log_file_name must be a single file name");
        }
        Ok(())
    }

    /// Resolve the paths the runners need.
    pub fn runner_config(&self, working_dir: &Path, home_dir: &Path, temp_dir: &Path) -> RunnerConfig {
        RunnerConfig {
            packages: self.packages.clone(),
            install_command: self.install_command.clone(),
            validate_command: self.validate_command.clone(),
            source_config: working_dir.join(&self.source_config),
            config_dir: home_dir.join(".config").join(&self.config_app),
            log_file: temp_dir.join(&self.log_file_name),
        }
    }

    /// Return the path to the settings file.
    pub fn settings_path() -> Result<PathBuf> {
        let dirs = directories::ProjectDirs::from("", "", "nirisetup")
            .context("Could not determine config directory")?;
        Ok(dirs.config_dir().join("settings.json"))
    }
}
