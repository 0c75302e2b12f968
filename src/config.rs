//! Configuration management using the prefer crate for discovery.
//!
//! Values come from (lowest to highest precedence) built-in defaults, a
//! TOML/JSON/YAML file, and environment variables.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default Document AI region.
pub const DEFAULT_LOCATION: &str = "us";

/// Largest raw payload sent to the synchronous OCR endpoint (20 MiB).
pub const DEFAULT_MAX_SYNC_BYTES: u64 = 20 * 1024 * 1024;

/// Default interval between batch operation polls.
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 10;

/// Default batch OCR deadline (30 minutes).
pub const DEFAULT_BATCH_TIMEOUT_SECS: u64 = 1800;

pub const DEFAULT_STORAGE_ENDPOINT: &str = "https://storage.googleapis.com";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse {format} config: {message}")]
    Parse {
        format: &'static str,
        message: String,
    },
}

/// Document AI processor settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentAiConfig {
    pub project_id: Option<String>,
    pub location: String,
    pub processor_id: Option<String>,
    /// Override for the regional endpoint.
    pub endpoint: Option<String>,
    pub max_sync_bytes: u64,
}

impl Default for DocumentAiConfig {
    fn default() -> Self {
        Self {
            project_id: None,
            location: DEFAULT_LOCATION.to_string(),
            processor_id: None,
            endpoint: None,
            max_sync_bytes: DEFAULT_MAX_SYNC_BYTES,
        }
    }
}

impl DocumentAiConfig {
    /// Base URL of the Document AI REST API.
    pub fn endpoint(&self) -> String {
        self.endpoint
            .clone()
            .unwrap_or_else(|| format!("https://{}-documentai.googleapis.com", self.location))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub endpoint: String,
    /// Directory for scratch downloads; the system temp dir when unset.
    pub scratch_dir: Option<String>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_STORAGE_ENDPOINT.to_string(),
            scratch_dir: None,
        }
    }
}

impl StorageConfig {
    pub fn scratch_dir(&self) -> Option<PathBuf> {
        self.scratch_dir
            .as_deref()
            .map(|dir| PathBuf::from(shellexpand::tilde(dir).as_ref()))
    }
}

/// Asynchronous (batch) OCR settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Staging bucket; `{project_id}-documentai-temp` when unset.
    pub bucket: Option<String>,
    pub poll_interval_secs: u64,
    pub timeout_secs: u64,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            bucket: None,
            poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
            timeout_secs: DEFAULT_BATCH_TIMEOUT_SECS,
        }
    }
}

/// Ratio thresholds above which the quality scorer deducts points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QualityThresholds {
    pub whitespace_ratio: f64,
    pub special_char_ratio: f64,
    pub line_break_ratio: f64,
}

impl Default for QualityThresholds {
    fn default() -> Self {
        Self {
            whitespace_ratio: 0.3,
            special_char_ratio: 0.1,
            line_break_ratio: 0.1,
        }
    }
}

/// Top-level configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub document_ai: DocumentAiConfig,
    pub storage: StorageConfig,
    pub batch: BatchConfig,
    pub quality: QualityThresholds,
    /// Bearer token for Google APIs; only ever taken from the environment.
    #[serde(skip)]
    pub access_token: Option<String>,
    #[serde(skip)]
    pub source_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration using prefer for file discovery.
    pub async fn load() -> Self {
        match prefer::load("docingest").await {
            Ok(pref_config) => match pref_config.source_path() {
                Some(path) => match Self::load_from_path(path).await {
                    Ok(config) => config,
                    Err(e) => {
                        tracing::warn!("Ignoring unreadable config: {}", e);
                        Self::default_with_env()
                    }
                },
                None => Self::default_with_env(),
            },
            Err(_) => Self::default_with_env(),
        }
    }

    /// Defaults with environment overrides applied.
    pub fn default_with_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Load configuration from a specific file path.
    /// The format follows the file extension (TOML, YAML, otherwise JSON).
    pub async fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })?;

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("json");
        let mut config = Self::parse(&contents, ext)?;
        config.source_path = Some(path.to_path_buf());
        Ok(config.with_env_overrides())
    }

    fn parse(contents: &str, ext: &str) -> Result<Self, ConfigError> {
        match ext {
            "toml" => toml::from_str(contents).map_err(|e| ConfigError::Parse {
                format: "TOML",
                message: e.to_string(),
            }),
            "yaml" | "yml" => serde_yaml::from_str(contents).map_err(|e| ConfigError::Parse {
                format: "YAML",
                message: e.to_string(),
            }),
            _ => serde_json::from_str(contents).map_err(|e| ConfigError::Parse {
                format: "JSON",
                message: e.to_string(),
            }),
        }
    }

    fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(project) = lookup("GOOGLE_CLOUD_PROJECT") {
            self.document_ai.project_id = Some(project);
        }
        if let Some(location) = lookup("DOCUMENT_AI_LOCATION") {
            self.document_ai.location = location;
        }
        if let Some(processor) = lookup("DOCUMENT_AI_PROCESSOR_ID") {
            self.document_ai.processor_id = Some(processor);
        }
        if let Some(bucket) = lookup("DOCINGEST_BATCH_BUCKET") {
            self.batch.bucket = Some(bucket);
        }
        self.access_token = lookup("GOOGLE_ACCESS_TOKEN").filter(|t| !t.is_empty());
        self
    }

    /// Bucket used to stage batch OCR input and output.
    pub fn batch_bucket(&self) -> Option<String> {
        self.batch.bucket.clone().or_else(|| {
            self.document_ai
                .project_id
                .as_ref()
                .map(|p| format!("{}-documentai-temp", p))
        })
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.batch.poll_interval_secs)
    }

    pub fn batch_timeout(&self) -> Duration {
        Duration::from_secs(self.batch.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.document_ai.location, "us");
        assert_eq!(config.batch_timeout(), Duration::from_secs(1800));
        assert_eq!(config.quality.whitespace_ratio, 0.3);
        assert_eq!(
            config.document_ai.endpoint(),
            "https://us-documentai.googleapis.com"
        );
        assert!(config.batch_bucket().is_none());
    }

    #[test]
    fn test_parse_toml_sections() {
        let toml = r#"
[document_ai]
project_id = "acme"
processor_id = "abc123"
location = "eu"

[batch]
poll_interval_secs = 2

[quality]
special_char_ratio = 0.2
"#;
        let config = Config::parse(toml, "toml").unwrap();
        assert_eq!(config.document_ai.project_id.as_deref(), Some("acme"));
        assert_eq!(config.batch_bucket().as_deref(), Some("acme-documentai-temp"));
        assert_eq!(config.poll_interval(), Duration::from_secs(2));
        assert_eq!(config.batch.timeout_secs, DEFAULT_BATCH_TIMEOUT_SECS);
        assert_eq!(config.quality.special_char_ratio, 0.2);
        assert_eq!(config.quality.line_break_ratio, 0.1);
    }

    #[test]
    fn test_parse_json_and_errors() {
        let config = Config::parse(r#"{"batch": {"bucket": "staging"}}"#, "json").unwrap();
        assert_eq!(config.batch_bucket().as_deref(), Some("staging"));

        let err = Config::parse("not = [valid", "toml").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { format: "TOML", .. }));
    }

    #[test]
    fn test_env_overrides() {
        let config = Config::default().with_overrides(|key| match key {
            "GOOGLE_CLOUD_PROJECT" => Some("from-env".to_string()),
            "GOOGLE_ACCESS_TOKEN" => Some("tok".to_string()),
            _ => None,
        });
        assert_eq!(config.document_ai.project_id.as_deref(), Some("from-env"));
        assert_eq!(config.access_token.as_deref(), Some("tok"));
        assert_eq!(config.document_ai.location, "us");
    }

    #[tokio::test]
    async fn test_load_from_path_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("docingest.yaml");
        std::fs::write(&path, "storage:\n  scratch_dir: /var/tmp/ingest\n").unwrap();

        let config = Config::load_from_path(&path).await.unwrap();
        assert_eq!(config.source_path.as_deref(), Some(path.as_path()));
        assert_eq!(
            config.storage.scratch_dir(),
            Some(PathBuf::from("/var/tmp/ingest"))
        );
    }
}
