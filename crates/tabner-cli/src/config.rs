//! Configuration management for the CLI.

use crate::error::{CliError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tabner_model::DEFAULT_CLASSES;
use tabner_retriever::RetrieverConfig;

/// CLI configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Global settings
    #[serde(default)]
    pub settings: Settings,

    /// Service endpoints
    #[serde(default)]
    pub services: Services,

    /// Retrieval behavior
    #[serde(default)]
    pub retrieval: Retrieval,

    /// Entity class inventory used for prompting and scoring
    #[serde(default = "default_classes")]
    pub classes: Vec<String>,
}

/// Global CLI settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Default output format
    #[serde(default = "default_format")]
    pub format: OutputFormat,

    /// Command history size
    #[serde(default = "default_history_size")]
    pub history_size: usize,
}

/// External service endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Services {
    /// Annotation server URL
    #[serde(default = "default_pipeline_url")]
    pub pipeline_url: String,

    /// Ollama API URL
    #[serde(default = "default_ollama_url")]
    pub ollama_url: String,

    /// Ollama model name
    #[serde(default = "default_ollama_model")]
    pub ollama_model: String,

    /// DBpedia Lookup URL
    #[serde(default = "default_dbpedia_url")]
    pub dbpedia_url: String,

    /// DBpedia Lookup language
    #[serde(default = "default_dbpedia_lang")]
    pub dbpedia_lang: String,
}

/// Retrieval behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Retrieval {
    /// Maximum retrieval attempts per record
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Per-call timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Output format.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable reports
    Table,
    /// JSON format
    Json,
    /// Quiet (minimal) format
    Quiet,
}

impl Config {
    /// Get the configuration file path.
    pub fn path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".tabner").join("config.toml"))
    }

    /// Load configuration from the default location or create defaults.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    /// Load configuration from an explicit path.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)?;
            let config: Config = toml::from_str(&contents)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to the default location.
    pub fn save(&self) -> Result<()> {
        let path = Self::path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))?;
        fs::write(&path, contents)?;
        Ok(())
    }
}

impl Retrieval {
    /// Convert into the retriever crate's configuration.
    pub fn to_retriever_config(&self) -> RetrieverConfig {
        RetrieverConfig {
            max_retries: self.max_retries,
            timeout_secs: self.timeout_secs,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            settings: Settings::default(),
            services: Services::default(),
            retrieval: Retrieval::default(),
            classes: default_classes(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Table,
            history_size: 1000,
        }
    }
}

impl Default for Services {
    fn default() -> Self {
        Self {
            pipeline_url: default_pipeline_url(),
            ollama_url: default_ollama_url(),
            ollama_model: default_ollama_model(),
            dbpedia_url: default_dbpedia_url(),
            dbpedia_lang: default_dbpedia_lang(),
        }
    }
}

impl Default for Retrieval {
    fn default() -> Self {
        let config = RetrieverConfig::default();
        Self {
            max_retries: config.max_retries,
            timeout_secs: config.timeout_secs,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_format() -> OutputFormat {
    OutputFormat::Table
}

fn default_history_size() -> usize {
    1000
}

fn default_classes() -> Vec<String> {
    DEFAULT_CLASSES.iter().map(|class| class.to_string()).collect()
}

fn default_pipeline_url() -> String {
    "http://localhost:9000".to_string()
}

fn default_ollama_url() -> String {
    "http://localhost:11434".to_string()
}

fn default_ollama_model() -> String {
    "llama3".to_string()
}

fn default_dbpedia_url() -> String {
    "https://lookup.dbpedia.org/api/search".to_string()
}

fn default_dbpedia_lang() -> String {
    "ru".to_string()
}

fn default_max_retries() -> u32 {
    RetrieverConfig::default().max_retries
}

fn default_timeout_secs() -> u64 {
    RetrieverConfig::default().timeout_secs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.classes, ["LOC", "PER", "MISC", "ORG"]);
        assert_eq!(config.retrieval.max_retries, 5);
        assert!(config.settings.color);
    }

    #[test]
    fn test_toml_round_trip() {
        let config = Config::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();

        assert_eq!(parsed.classes, config.classes);
        assert_eq!(parsed.services.pipeline_url, config.services.pipeline_url);
        assert_eq!(parsed.retrieval.timeout_secs, config.retrieval.timeout_secs);
    }

    #[test]
    fn test_partial_config_gets_defaults() {
        let parsed: Config = toml::from_str(
            r#"
            classes = ["LOC"]

            [services]
            ollama_model = "mistral"
            "#,
        )
        .unwrap();

        assert_eq!(parsed.classes, ["LOC"]);
        assert_eq!(parsed.services.ollama_model, "mistral");
        // Untouched sections fall back to defaults.
        assert_eq!(parsed.services.dbpedia_lang, "ru");
        assert_eq!(parsed.retrieval.max_retries, 5);
        assert_eq!(parsed.settings.history_size, 1000);
    }

    #[test]
    fn test_load_from_missing_path_yields_defaults() {
        let config = Config::load_from(Path::new("/nonexistent/tabner/config.toml")).unwrap();
        assert_eq!(config.classes, Config::default().classes);
    }
}
