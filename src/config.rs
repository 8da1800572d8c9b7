use crate::error::ConfigError;
use crate::state::SortOptions;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
#[serde(default)]
pub struct Config {
    pub browser: BrowserConfig,
    pub theme: ThemeConfig,
    pub font: FontConfig,
    pub ui: UiConfig,
    pub icons: IconConfig,
}

/// Where browsing starts
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
#[serde(default)]
pub struct BrowserConfig {
    /// Fixed root; the user's home directory when unset
    pub root: Option<PathBuf>,
}

/// Theme configuration
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(default)]
pub struct ThemeConfig {
    /// "dark" or "light"
    pub mode: String,
}

/// Font and text rendering configuration
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(default)]
pub struct FontConfig {
    /// Size of the entry names (in points)
    pub font_size: f32,
    /// Size of icons (in points)
    pub icon_size: f32,
}

/// Listing behavior configuration
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(default)]
pub struct UiConfig {
    /// Sort field: "name" or "extension"
    pub sort_by: String,
    /// Sort order: "asc" or "desc"
    pub sort_order: String,
    /// Show directories first in sorting
    pub dirs_first: bool,
}

/// Icon glyphs shown next to entries
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(default)]
pub struct IconConfig {
    pub folder: String,
    /// Used when no extension mapping matches
    pub file: String,
    /// Lowercase extension (without the dot) to glyph; "" maps names without one
    pub extensions: BTreeMap<String, String>,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            mode: "dark".to_string(),
        }
    }
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            font_size: 14.0,
            icon_size: 16.0,
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            sort_by: "name".to_string(),
            sort_order: "asc".to_string(),
            dirs_first: true,
        }
    }
}

impl Default for IconConfig {
    fn default() -> Self {
        let groups: &[(&[&str], &str)] = &[
            (&["txt", "md", "log"], "📝"),
            (&["png", "jpg", "jpeg", "gif", "webp", "bmp", "svg"], "🖼"),
            (&["mp4", "mkv", "mov", "avi", "webm"], "🎞"),
            (&["mp3", "wav", "flac", "ogg", "m4a"], "🎵"),
            (&["zip", "tar", "gz", "7z", "rar", "xz", "bz2"], "📦"),
            (&["pdf"], "📕"),
            (&["apk"], "🤖"),
        ];
        let extensions = groups
            .iter()
            .flat_map(|(exts, glyph)| exts.iter().map(move |ext| (ext.to_string(), glyph.to_string())))
            .collect();

        Self {
            folder: "📁".to_string(),
            file: "📄".to_string(),
            extensions,
        }
    }
}

impl UiConfig {
    pub fn sort_options(&self) -> SortOptions {
        SortOptions::parse(&self.sort_by, &self.sort_order, self.dirs_first)
    }
}

impl BrowserConfig {
    /// Configured root, else home, else the working directory.
    pub fn resolve_root(&self) -> PathBuf {
        if let Some(root) = &self.root {
            return root.clone();
        }
        directories::UserDirs::new()
            .map(|ud| ud.home_dir().to_path_buf())
            .or_else(|| env::current_dir().ok())
            .unwrap_or_else(|| PathBuf::from("/"))
    }
}

impl Config {
    /// Get the path to the config file
    pub fn config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "filebrowser")
            .map(|proj_dirs| proj_dirs.config_dir().join("config.toml"))
    }

    /// Load configuration from file, or return defaults if file doesn't exist
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Config::default(),
        }
    }

    pub fn load_from(path: &Path) -> Self {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "failed to read config file, using defaults");
                return Config::default();
            }
        };
        match toml::from_str::<Config>(&contents) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "failed to parse config file, using defaults");
                Config::default()
            }
        }
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::config_path().ok_or(ConfigError::NoConfigDir)?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Create a default config file if it doesn't exist
    pub fn create_default() -> Result<(), ConfigError> {
        if let Some(path) = Self::config_path() {
            if !path.exists() {
                Config::default().save_to(&path)?;
            }
        }
        Ok(())
    }
}
