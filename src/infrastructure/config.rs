//! Configuration management

use crate::error::{IncludeError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Default limit for includes nested inside includes
pub const DEFAULT_MAX_INCLUDE_DEPTH: i64 = 64;

/// How much the processor trusts the document it converts
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum SafeMode {
    /// No restrictions
    Unsafe,
    /// Local includes are confined to the base directory
    Safe,
    Server,
    /// Include directives become links
    #[default]
    Secure,
}

impl SafeMode {
    /// Numeric level, higher is stricter
    pub fn level(self) -> u8 {
        match self {
            SafeMode::Unsafe => 0,
            SafeMode::Safe => 1,
            SafeMode::Server => 10,
            SafeMode::Secure => 20,
        }
    }
}

impl FromStr for SafeMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "unsafe" => Ok(SafeMode::Unsafe),
            "safe" => Ok(SafeMode::Safe),
            "server" => Ok(SafeMode::Server),
            "secure" => Ok(SafeMode::Secure),
            _ => Err(format!(
                "Invalid safe mode: '{}'. Valid safe modes are: unsafe, safe, server, secure",
                s
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub safe_mode: SafeMode,
    pub max_include_depth: i64,
    pub allow_uri_read: bool,
    /// Root that local includes may not escape (safe mode and above)
    pub base_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            safe_mode: SafeMode::default(),
            max_include_depth: DEFAULT_MAX_INCLUDE_DEPTH,
            allow_uri_read: false,
            base_dir: None,
        }
    }
}

impl Config {
    /// Create a new config with default values and the given safe mode
    pub fn new(safe_mode: SafeMode) -> Self {
        Config {
            safe_mode,
            ..Config::default()
        }
    }

    /// Load config from a TOML file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                IncludeError::Config(format!("Config file not found: {}", path.display()))
            } else {
                IncludeError::Io(e)
            }
        })?;

        toml::from_str(&contents).map_err(|e| {
            IncludeError::Config(format!("Failed to parse {}: {}", path.display(), e))
        })
    }

    /// Save config to a TOML file
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;

        Ok(())
    }

    /// Whether include directives may be processed at all
    pub fn includes_enabled(&self) -> bool {
        self.safe_mode < SafeMode::Secure && self.max_include_depth >= 1
    }

    /// Jail root for local includes, if any
    pub fn jail(&self) -> Option<&Path> {
        if self.safe_mode >= SafeMode::Safe {
            self.base_dir.as_deref()
        } else {
            None
        }
    }
}
