//! Configuration loading and root folder resolution
//!
//! Root folder priority order:
//! 1. Command-line argument (highest priority)
//! 2. `WARDROBE_ROOT_FOLDER` environment variable
//! 3. `root_folder` key of the TOML config file
//! 4. OS-dependent compiled default (fallback)
//!
//! A missing or unreadable TOML file never stops startup; it is logged and
//! the compiled defaults are used.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::{Error, Result};

/// Environment variable overriding the root folder
pub const ROOT_FOLDER_ENV: &str = "WARDROBE_ROOT_FOLDER";

/// Default HTTP port
pub const DEFAULT_PORT: u16 = 5790;

/// Database file name inside the root folder
pub const DATABASE_FILE: &str = "wardrobe.db";

/// Image bucket directory inside the root folder
pub const MEDIA_DIR: &str = "closet-images";

/// Built-in defaults for the current platform
#[derive(Debug, Clone)]
pub struct CompiledDefaults {
    pub root_folder: PathBuf,
    pub log_level: String,
    pub port: u16,
}

impl CompiledDefaults {
    pub fn for_current_platform() -> Self {
        let root_folder = if cfg!(target_os = "linux") {
            // ~/.local/share/wardrobe (or /var/lib/wardrobe system-wide)
            dirs::data_local_dir()
                .map(|d| d.join("wardrobe"))
                .unwrap_or_else(|| PathBuf::from("/var/lib/wardrobe"))
        } else if cfg!(target_os = "macos") {
            dirs::data_dir()
                .map(|d| d.join("wardrobe"))
                .unwrap_or_else(|| PathBuf::from("/Library/Application Support/wardrobe"))
        } else if cfg!(target_os = "windows") {
            dirs::data_local_dir()
                .map(|d| d.join("wardrobe"))
                .unwrap_or_else(|| PathBuf::from("C:\\ProgramData\\wardrobe"))
        } else {
            PathBuf::from("./wardrobe_data")
        };

        Self {
            root_folder,
            log_level: default_log_level(),
            port: DEFAULT_PORT,
        }
    }
}

/// Bootstrap configuration loaded from TOML
///
/// Only settings needed before the database opens live here.
#[derive(Debug, Clone, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub root_folder: Option<PathBuf>,

    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Prefix for image URLs handed to clients, e.g. `https://cdn.example.com/media`.
    /// When unset, images are served by this process under `/media`.
    #[serde(default)]
    pub public_base_url: Option<String>,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            root_folder: None,
            host: default_host(),
            port: default_port(),
            public_base_url: None,
            logging: LoggingConfig::default(),
        }
    }
}

impl TomlConfig {
    /// Parse a TOML config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
    }

    /// Load the config file if one exists, otherwise fall back to defaults
    pub fn load_or_default(explicit: Option<&Path>) -> Self {
        let path = match explicit.map(Path::to_path_buf).or_else(default_config_path) {
            Some(p) => p,
            None => {
                info!("No config file found, using built-in defaults");
                return Self::default();
            }
        };

        match Self::load(&path) {
            Ok(config) => {
                info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                warn!("Could not load config {} ({}), using defaults", path.display(), e);
                Self::default()
            }
        }
    }
}

/// First existing config file for the platform
fn default_config_path() -> Option<PathBuf> {
    let user_config = dirs::config_dir().map(|d| d.join("wardrobe").join("config.toml"));
    if let Some(path) = user_config {
        if path.exists() {
            return Some(path);
        }
    }

    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc/wardrobe/config.toml");
        if system_config.exists() {
            return Some(system_config);
        }
    }
    None
}

/// Resolves the root folder using the four-tier priority order
#[derive(Debug, Clone)]
pub struct RootFolderResolver {
    module_name: String,
    cli_arg: Option<PathBuf>,
    config: Option<TomlConfig>,
}

impl RootFolderResolver {
    pub fn new(module_name: &str) -> Self {
        Self {
            module_name: module_name.to_string(),
            cli_arg: None,
            config: None,
        }
    }

    pub fn with_cli_arg(mut self, path: Option<PathBuf>) -> Self {
        self.cli_arg = path;
        self
    }

    pub fn with_config(mut self, config: &TomlConfig) -> Self {
        self.config = Some(config.clone());
        self
    }

    pub fn resolve(&self) -> PathBuf {
        if let Some(path) = &self.cli_arg {
            info!("[{}] Root folder from command line: {}", self.module_name, path.display());
            return path.clone();
        }

        if let Ok(path) = std::env::var(ROOT_FOLDER_ENV) {
            if !path.trim().is_empty() {
                info!("[{}] Root folder from {}: {}", self.module_name, ROOT_FOLDER_ENV, path);
                return PathBuf::from(path);
            }
        }

        if let Some(path) = self.config.as_ref().and_then(|c| c.root_folder.clone()) {
            info!("[{}] Root folder from config file: {}", self.module_name, path.display());
            return path;
        }

        let path = CompiledDefaults::for_current_platform().root_folder;
        info!("[{}] Root folder default: {}", self.module_name, path.display());
        path
    }
}

/// Creates the root folder layout and names the files inside it
#[derive(Debug, Clone)]
pub struct RootFolderInitializer {
    root_folder: PathBuf,
}

impl RootFolderInitializer {
    pub fn new(root_folder: PathBuf) -> Self {
        Self { root_folder }
    }

    pub fn root_folder(&self) -> &Path {
        &self.root_folder
    }

    /// Create the root and media directories if missing
    pub fn ensure_directory_exists(&self) -> Result<()> {
        std::fs::create_dir_all(&self.root_folder)?;
        std::fs::create_dir_all(self.media_path())?;
        Ok(())
    }

    pub fn database_path(&self) -> PathBuf {
        self.root_folder.join(DATABASE_FILE)
    }

    pub fn media_path(&self) -> PathBuf {
        self.root_folder.join(MEDIA_DIR)
    }
}
