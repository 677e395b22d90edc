use color_eyre::{eyre::eyre, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::mirror::DEFAULT_SLOT;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
  /// Custom title for header (defaults to "Users")
  pub title: Option<String>,
  #[serde(default)]
  pub api: ApiConfig,
  #[serde(default)]
  pub mirror: MirrorConfig,
  #[serde(default)]
  pub log: LogConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
  #[serde(default = "default_base_url")]
  pub base_url: String,
  /// Collection path under base_url
  #[serde(default = "default_collection")]
  pub collection: String,
}

impl Default for ApiConfig {
  fn default() -> Self {
    Self {
      base_url: default_base_url(),
      collection: default_collection(),
    }
  }
}

fn default_base_url() -> String {
  "https://jsonplaceholder.typicode.com".to_string()
}

fn default_collection() -> String {
  "users".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct MirrorConfig {
  #[serde(default = "default_true")]
  pub enabled: bool,
  /// SQLite file (default: $XDG_DATA_HOME/u9s/mirror.db)
  pub path: Option<PathBuf>,
  #[serde(default = "default_slot")]
  pub slot: String,
  /// Show the mirror snapshot when listing from the server fails
  #[serde(default = "default_true")]
  pub startup_fallback: bool,
}

impl Default for MirrorConfig {
  fn default() -> Self {
    Self {
      enabled: true,
      path: None,
      slot: default_slot(),
      startup_fallback: true,
    }
  }
}

fn default_true() -> bool {
  true
}

fn default_slot() -> String {
  DEFAULT_SLOT.to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
  /// EnvFilter directive; RUST_LOG takes precedence
  #[serde(default = "default_log_level")]
  pub level: String,
  /// Directory for log files (default: $XDG_DATA_HOME/u9s/logs)
  pub dir: Option<PathBuf>,
}

impl Default for LogConfig {
  fn default() -> Self {
    Self {
      level: default_log_level(),
      dir: None,
    }
  }
}

fn default_log_level() -> String {
  "info".to_string()
}

impl Config {
  /// Load configuration from file.
  ///
  /// Search order:
  /// 1. Explicit path if provided (must exist)
  /// 2. ./u9s.yaml (current directory)
  /// 3. $XDG_CONFIG_HOME/u9s/config.yaml
  ///
  /// Without any file the defaults point at the public JSONPlaceholder API.
  pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
    let path = match explicit_path {
      Some(p) if p.exists() => Some(p.to_path_buf()),
      Some(p) => return Err(eyre!("Config file not found: {}", p.display())),
      None => Self::find_config_file(),
    };

    match path {
      Some(p) => Self::load_from_path(&p),
      None => Ok(Self::default()),
    }
  }

  fn find_config_file() -> Option<PathBuf> {
    // Check current directory
    let local = PathBuf::from("u9s.yaml");
    if local.exists() {
      return Some(local);
    }

    // Check XDG config directory
    dirs::config_dir()
      .map(|dir| dir.join("u9s").join("config.yaml"))
      .filter(|path| path.exists())
  }

  fn load_from_path(path: &Path) -> Result<Self> {
    let contents = std::fs::read_to_string(path)
      .map_err(|e| eyre!("Failed to read config file {}: {}", path.display(), e))?;

    Self::parse(&contents).map_err(|e| eyre!("Failed to parse config file {}: {}", path.display(), e))
  }

  fn parse(contents: &str) -> Result<Self> {
    // An empty file is valid and means all defaults
    if contents.trim().is_empty() {
      return Ok(Self::default());
    }
    Ok(serde_yaml::from_str(contents)?)
  }

  pub fn title(&self) -> &str {
    self.title.as_deref().unwrap_or("Users")
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_defaults() {
    let config = Config::default();
    assert_eq!(config.api.base_url, "https://jsonplaceholder.typicode.com");
    assert_eq!(config.api.collection, "users");
    assert!(config.mirror.enabled);
    assert!(config.mirror.startup_fallback);
    assert_eq!(config.mirror.slot, "users");
    assert_eq!(config.log.level, "info");
    assert_eq!(config.title(), "Users");
  }

  #[test]
  fn test_empty_file_is_default() {
    let config = Config::parse("").unwrap();
    assert_eq!(config.api.collection, "users");
  }

  #[test]
  fn test_partial_sections_fill_defaults() {
    let config = Config::parse(
      r#"
title: Staff
api:
  base_url: http://localhost:3000
mirror:
  startup_fallback: false
"#,
    )
    .unwrap();

    assert_eq!(config.title(), "Staff");
    assert_eq!(config.api.base_url, "http://localhost:3000");
    assert_eq!(config.api.collection, "users");
    assert!(config.mirror.enabled);
    assert!(!config.mirror.startup_fallback);
  }

  #[test]
  fn test_invalid_yaml() {
    assert!(Config::parse("api: [").is_err());
  }

  #[test]
  fn test_missing_explicit_path() {
    let err = Config::load(Some(Path::new("/nonexistent/u9s.yaml"))).unwrap_err();
    assert!(err.to_string().contains("Config file not found"));
  }

  #[test]
  fn test_load_explicit_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    std::fs::write(&path, "mirror:\n  enabled: false\n").unwrap();

    let config = Config::load(Some(&path)).unwrap();
    assert!(!config.mirror.enabled);
  }
}
