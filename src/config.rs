//! Generator configuration
//!
//! Settings live in a TOML file. Lookup order is an explicit path, then
//! `<project>/constgen.toml`, then `~/.asset-constgen/config.toml`, then
//! built-in defaults. Every field has a default so partial files are fine.

use crate::error::{ConstGenError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Config file name looked up in the project root
pub const PROJECT_CONFIG_FILE: &str = "constgen.toml";

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Assets root, relative to the project root
    pub assets_dir: PathBuf,
    pub resources: ResourcesConfig,
    pub scenes: ScenesConfig,
    pub mixers: MixersConfig,
    pub watch: WatchConfig,
}

/// Resource key tree settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourcesConfig {
    pub output_path: PathBuf,
    /// Comma-separated extension list, e.g. `"*.prefab,*.asset"`; empty
    /// means every file
    pub file_extensions: String,
    pub include_subfolders: bool,
    pub class_name: String,
    pub auto_generate_on_change: bool,
    /// Report files added under a `Resources` folder while watching
    pub notify_on_file_add: bool,
}

/// Scene name class settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenesConfig {
    pub scenes_dir: PathBuf,
    pub output_path: PathBuf,
    pub class_name: String,
    pub auto_generate_on_change: bool,
}

/// Audio mixer class settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MixersConfig {
    pub mixers_dir: PathBuf,
    pub output_path: PathBuf,
    pub class_name: String,
    pub auto_generate_on_change: bool,
}

/// Watch mode settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchConfig {
    /// Quiet period after the last change before regenerating
    pub debounce_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            assets_dir: PathBuf::from("Assets"),
            resources: ResourcesConfig::default(),
            scenes: ScenesConfig::default(),
            mixers: MixersConfig::default(),
            watch: WatchConfig::default(),
        }
    }
}

impl Default for ResourcesConfig {
    fn default() -> Self {
        Self {
            output_path: PathBuf::from("Assets/Generated/ResourcesKeys.cs"),
            file_extensions: String::new(),
            include_subfolders: true,
            class_name: "ResourcesConstants".to_string(),
            auto_generate_on_change: false,
            notify_on_file_add: true,
        }
    }
}

impl Default for ScenesConfig {
    fn default() -> Self {
        Self {
            scenes_dir: PathBuf::from("Assets/Scenes"),
            output_path: PathBuf::from("Assets/Generated/Scenes.cs"),
            class_name: "Scenes".to_string(),
            auto_generate_on_change: false,
        }
    }
}

impl Default for MixersConfig {
    fn default() -> Self {
        Self {
            mixers_dir: PathBuf::from("Assets/_Project/Source/Audio/Mixers"),
            output_path: PathBuf::from("Assets/Generated/AudioResources.cs"),
            class_name: "AudioResources".to_string(),
            auto_generate_on_change: false,
        }
    }
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self { debounce_ms: 500 }
    }
}

/// Per-user config location, `~/.asset-constgen/config.toml`
pub fn user_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".asset-constgen").join("config.toml"))
}

impl Config {
    /// Parse config text
    pub fn from_toml(text: &str, origin: &Path) -> Result<Self> {
        toml::from_str(text).map_err(|e| ConstGenError::ConfigParse {
            path: origin.to_path_buf(),
            message: e.to_string(),
        })
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Read and parse a config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| ConstGenError::io(path, e))?;
        Self::from_toml(&text, path)
    }

    /// Load configuration for a project.
    ///
    /// An explicit path must exist and parse. Discovered files that fail to
    /// parse are skipped with a warning. Returns the config and the file it
    /// came from, if any.
    pub fn load(explicit: Option<&Path>, project_root: &Path) -> Result<(Self, Option<PathBuf>)> {
        if let Some(path) = explicit {
            let config = Self::from_file(path)?;
            log::debug!("Loaded config from {}", path.display());
            return Ok((config, Some(path.to_path_buf())));
        }

        let candidates = std::iter::once(project_root.join(PROJECT_CONFIG_FILE))
            .chain(user_config_path());

        for candidate in candidates {
            if !candidate.is_file() {
                continue;
            }
            match Self::from_file(&candidate) {
                Ok(config) => {
                    log::debug!("Loaded config from {}", candidate.display());
                    return Ok((config, Some(candidate)));
                }
                Err(e) => log::warn!("Ignoring config {}: {}", candidate.display(), e),
            }
        }

        log::debug!("No config file found, using defaults");
        Ok((Self::default(), None))
    }

    /// Write the config as TOML, creating parent directories
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| ConstGenError::io(parent, e))?;
            }
        }
        let text = self.to_toml()?;
        fs::write(path, text).map_err(|e| ConstGenError::io(path, e))?;
        log::info!("Wrote config to {}", path.display());
        Ok(())
    }
}

/// Resolve a configured path against the project root; absolute paths are
/// returned unchanged
pub fn resolve(project_root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        project_root.join(path)
    }
}
