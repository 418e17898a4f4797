use fencemark_engine::annotations::AnnotationRules;
use fencemark_engine::io::{IoError, is_content_file, scan_content_files};
use fencemark_engine::render::RenderConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid include pattern '{pattern}': {source}")]
    InvalidGlob {
        pattern: String,
        source: glob::PatternError,
    },

    #[error("Failed to scan content: {0}")]
    ContentScanError(#[from] IoError),
}

/// Site configuration, read from `~/.config/fencemark/config.toml` unless a
/// path is given.
///
/// ```toml
/// content_path = "~/blog/content"
/// include = ["posts/**/*.mdx"]
///
/// [render]
/// line_numbers = true
///
/// [[annotations.rules]]
/// name = "warning"
/// kind = "block"
/// ```
///
/// A `rules` list replaces the built-in rules rather than extending them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub content_path: PathBuf,
    /// Globs relative to `content_path`. Empty means every content file.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub include: Vec<String>,
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub annotations: AnnotationRules,
}

impl Config {
    pub fn new(content_path: impl Into<PathBuf>) -> Self {
        Self {
            content_path: content_path.into(),
            include: Vec::new(),
            render: RenderConfig::default(),
            annotations: AnnotationRules::default(),
        }
    }

    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let mut config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        // Expand shell variables and tilde in the loaded content path
        config.content_path =
            Self::expand_path(&config.content_path).unwrap_or(config.content_path);

        log::debug!(
            "Loaded config from {} with {} annotation rules",
            config_path.display(),
            config.annotations.rules.len()
        );
        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/fencemark");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    /// Content files selected by `include`, sorted and deduplicated.
    pub fn content_files(&self) -> Result<Vec<PathBuf>, ConfigError> {
        if self.include.is_empty() {
            return Ok(scan_content_files(&self.content_path)?);
        }

        let root = glob::Pattern::escape(&self.content_path.to_string_lossy());
        let mut files = Vec::new();
        for pattern in &self.include {
            let full_pattern = format!("{root}/{pattern}");
            let entries =
                glob::glob(&full_pattern).map_err(|source| ConfigError::InvalidGlob {
                    pattern: pattern.clone(),
                    source,
                })?;
            for entry in entries {
                match entry {
                    Ok(path) if path.is_file() && is_content_file(&path) => files.push(path),
                    Ok(_) => {}
                    Err(e) => log::warn!("Skipping unreadable path: {e}"),
                }
            }
        }
        files.sort();
        files.dedup();
        Ok(files)
    }

    fn expand_path(path: &Path) -> Option<PathBuf> {
        let path_str = path.to_string_lossy();
        match shellexpand::full(&path_str) {
            Ok(expanded) => Some(PathBuf::from(expanded.as_ref())),
            Err(_) => None,
        }
    }
}
