//! Configuration for coursemap paths and committer identity.
//!
//! Configuration sources (highest priority first):
//! 1. Environment variables (COURSEMAP_ROOT)
//! 2. Config file (.coursemap/config.yaml)
//! 3. Defaults (~/.coursemap/content)
//!
//! Config file discovery:
//! - Searches current directory and parents for .coursemap/config.yaml
//! - Paths in config file are relative to the config file's project directory

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Global cached configuration (stores Result to handle init errors)
static CONFIG: OnceLock<Result<ResolvedConfig, String>> = OnceLock::new();

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    pub version: String,
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub git: Option<GitConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PathsConfig {
    /// Content root (relative to the config file's project directory)
    pub root: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GitConfig {
    pub user_name: Option<String>,
    pub user_email: Option<String>,
}

/// Resolved configuration with absolute paths
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Absolute path to the content root (index, courses, git repo)
    pub root: PathBuf,

    /// Committer identity for ledger snapshots
    pub git: GitSettings,

    /// Path to config file (if found)
    pub config_file: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct GitSettings {
    pub user_name: String,
    pub user_email: String,
}

impl Default for GitSettings {
    fn default() -> Self {
        Self {
            user_name: "CourseMap".to_string(),
            user_email: "coursemap@local".to_string(),
        }
    }
}

/// Find config file by searching current directory and parents
fn find_config_file() -> Option<PathBuf> {
    let mut current = std::env::current_dir().ok()?;

    loop {
        let config_path = current.join(".coursemap").join("config.yaml");
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            break;
        }
    }

    None
}

/// Load and parse config file
fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Resolve a path that may be relative to the config file's parent
fn resolve_path(base: &Path, path_str: &str) -> PathBuf {
    let path = PathBuf::from(path_str);
    if path.is_absolute() {
        path
    } else {
        base.join(path)
            .canonicalize()
            .unwrap_or_else(|_| base.join(path_str))
    }
}

/// Load configuration from all sources
fn load_config() -> Result<ResolvedConfig> {
    // Default content root
    let default_root = dirs::home_dir()
        .context("Failed to determine home directory")?
        .join(".coursemap")
        .join("content");

    // Check for config file
    let config_file = find_config_file();

    let (root, git) = if let Some(ref config_path) = config_file {
        // Config file found - use it as base
        let config = load_config_file(config_path)?;

        // Base directory is the parent of .coursemap/ (the project root)
        let base_dir = config_path
            .parent() // .coursemap/
            .and_then(|p| p.parent()) // project root
            .unwrap_or(Path::new("."));

        let root = if let Ok(env_root) = std::env::var("COURSEMAP_ROOT") {
            PathBuf::from(env_root)
        } else if let Some(ref root_path) = config.paths.root {
            resolve_path(base_dir, root_path)
        } else {
            default_root.clone()
        };

        let defaults = GitSettings::default();
        let git = GitSettings {
            user_name: config
                .git
                .as_ref()
                .and_then(|g| g.user_name.clone())
                .unwrap_or(defaults.user_name),
            user_email: config
                .git
                .as_ref()
                .and_then(|g| g.user_email.clone())
                .unwrap_or(defaults.user_email),
        };

        (root, git)
    } else {
        // No config file - use env vars or defaults
        let root = std::env::var("COURSEMAP_ROOT")
            .map(PathBuf::from)
            .unwrap_or(default_root);

        (root, GitSettings::default())
    };

    Ok(ResolvedConfig {
        root,
        git,
        config_file,
    })
}

/// Get the global configuration (loads once, then cached)
pub fn config() -> Result<&'static ResolvedConfig> {
    let result = CONFIG.get_or_init(|| load_config().map_err(|e| e.to_string()));

    match result {
        Ok(config) => Ok(config),
        Err(e) => anyhow::bail!("{}", e),
    }
}

/// Force reload configuration (useful for testing)
pub fn reload_config() -> Result<ResolvedConfig> {
    load_config()
}

/// Get the content root directory
pub fn content_root() -> Result<PathBuf> {
    Ok(config()?.root.clone())
}
