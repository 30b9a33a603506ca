use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::graph::Mode;

/// Main configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub kgrag: KgragConfig,
    pub extraction: ExtractionConfig,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
}

/// KGrag-specific configuration
#[derive(Debug, Clone, Deserialize)]
pub struct KgragConfig {
    /// Path to the triples file the relation graph is built from
    /// (TSV `head\trelation\ttail` lines, or a JSON array of {s,p,o}).
    pub triples_path: PathBuf,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Candidate triple extraction configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ExtractionConfig {
    pub provider: String,
    pub model: String,
    pub api_key_env: String,
    pub max_tokens: u32,
    #[serde(default = "default_max_retries")]
    pub max_retries: usize,
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,
}

fn default_max_retries() -> usize {
    3
}

fn default_cache_capacity() -> usize {
    1000
}

/// Neighborhood retrieval configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RetrievalConfig {
    /// Traversal mode used when a query does not specify one.
    #[serde(default = "default_mode")]
    pub default_mode: String,
    /// Relation label applied uniformly to graph-verbalized triples.
    #[serde(default = "default_relation_label")]
    pub relation_label: String,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            default_mode: default_mode(),
            relation_label: default_relation_label(),
        }
    }
}

fn default_mode() -> String {
    "outgoing".to_string()
}

fn default_relation_label() -> String {
    "Is-a-Prerequisite-of".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from file
    ///
    /// Loads environment variables from .env file (if present) before loading config.
    /// Looks for config file in this order:
    /// 1. Path specified in KGRAG_CONFIG environment variable
    /// 2. ./config.toml in current directory
    pub fn load() -> Result<Self> {
        // Load .env file if it exists (ignore errors - file is optional)
        let _ = dotenv::dotenv();

        let config_path = std::env::var("KGRAG_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("config.toml"));

        let config_str = std::fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        let config: Config = toml::from_str(&config_str)
            .context("Failed to parse config.toml")?;

        // Validate configuration
        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    fn validate(&self) -> Result<()> {
        // Validate that the triples file exists and is a file
        if !self.kgrag.triples_path.exists() {
            anyhow::bail!(
                "triples_path does not exist: {}. Set triples_path in config.toml to your triples file.",
                self.kgrag.triples_path.display()
            );
        }

        if !self.kgrag.triples_path.is_file() {
            anyhow::bail!(
                "triples_path must be a file, not a directory: {}",
                self.kgrag.triples_path.display()
            );
        }

        // The default mode string must parse into a traversal mode
        self.retrieval
            .default_mode
            .parse::<Mode>()
            .map_err(|e| anyhow::anyhow!("retrieval.default_mode: {}", e))?;

        // The verbalized line format reserves commas and parentheses
        if self.retrieval.relation_label.is_empty() {
            anyhow::bail!("retrieval.relation_label must not be empty");
        }
        if self
            .retrieval
            .relation_label
            .contains(|c| c == ',' || c == '(' || c == ')')
        {
            anyhow::bail!(
                "retrieval.relation_label must not contain ',', '(' or ')': {}",
                self.retrieval.relation_label
            );
        }

        if self.extraction.max_tokens == 0 {
            anyhow::bail!("extraction.max_tokens must be greater than 0");
        }

        Ok(())
    }

    /// Get the triples file path
    pub fn triples_path(&self) -> &Path {
        &self.kgrag.triples_path
    }

    /// Get the default traversal mode (validated at load time)
    pub fn default_mode(&self) -> Result<Mode> {
        self.retrieval
            .default_mode
            .parse::<Mode>()
            .map_err(|e| anyhow::anyhow!("retrieval.default_mode: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Serialize config tests that mutate process-wide cwd and env so they don't race.
    static CONFIG_TEST_LOCK: Mutex<()> = Mutex::new(());

    fn create_test_config(temp_dir: &TempDir, retrieval_section: &str) -> String {
        let triples_path = temp_dir.path().join("triples.tsv");
        fs::write(&triples_path, "A\tr1\tB\n").unwrap();
        let triples_path = triples_path.canonicalize().unwrap();
        let triples_str = triples_path.to_str().unwrap().replace('\\', "\\\\");
        format!(
            r#"
[kgrag]
triples_path = "{}"
log_level = "debug"

[extraction]
provider = "openai"
model = "gpt-4o-mini"
api_key_env = "OPENAI_API_KEY"
max_tokens = 512

{}
"#,
            triples_str, retrieval_section
        )
    }

    /// Restores cwd when dropped (e.g. on panic).
    struct CwdGuard(std::path::PathBuf);
    impl Drop for CwdGuard {
        fn drop(&mut self) {
            let _ = std::env::set_current_dir(&self.0);
        }
    }

    fn with_config_env(config_path: &std::path::Path, f: impl FnOnce()) {
        let original_config = std::env::var("KGRAG_CONFIG").ok();
        std::env::set_var("KGRAG_CONFIG", config_path.to_str().unwrap());
        f();
        std::env::remove_var("KGRAG_CONFIG");
        if let Some(val) = original_config {
            std::env::set_var("KGRAG_CONFIG", val);
        }
    }

    fn load_with(retrieval_section: &str) -> Result<Config> {
        let temp_dir = TempDir::new().unwrap();
        let config_content = create_test_config(&temp_dir, retrieval_section);
        let config_path = temp_dir.path().join("config.toml");
        fs::write(&config_path, config_content).unwrap();
        let config_path = config_path.canonicalize().unwrap();
        let original_dir = std::env::current_dir().unwrap();
        let _cwd = CwdGuard(original_dir.clone());
        std::env::set_current_dir(temp_dir.path()).unwrap();
        let mut result = Err(anyhow::anyhow!("not run"));
        with_config_env(&config_path, || {
            result = Config::load();
        });
        result
    }

    #[test]
    fn test_config_load_success() {
        let _lock = CONFIG_TEST_LOCK.lock().unwrap();
        let config = load_with("").expect("Config::load() failed");
        assert_eq!(config.kgrag.log_level, "debug");
        assert_eq!(config.extraction.max_tokens, 512);
        // Defaults fill the omitted retrieval section
        assert_eq!(config.retrieval.default_mode, "outgoing");
        assert_eq!(config.retrieval.relation_label, "Is-a-Prerequisite-of");
        assert_eq!(config.extraction.max_retries, 3);
        assert_eq!(config.extraction.cache_capacity, 1000);
        assert_eq!(config.default_mode().unwrap(), Mode::Outgoing);
    }

    #[test]
    fn test_config_custom_retrieval() {
        let _lock = CONFIG_TEST_LOCK.lock().unwrap();
        let config = load_with(
            "[retrieval]\ndefault_mode = \"bidirectional\"\nrelation_label = \"related-to\"\n",
        )
        .unwrap();
        assert_eq!(config.default_mode().unwrap(), Mode::Bidirectional);
        assert_eq!(config.retrieval.relation_label, "related-to");
    }

    #[test]
    fn test_config_invalid_mode() {
        let _lock = CONFIG_TEST_LOCK.lock().unwrap();
        let err = load_with("[retrieval]\ndefault_mode = \"sideways\"\n").unwrap_err();
        assert!(err.to_string().contains("default_mode"));
    }

    #[test]
    fn test_config_relation_label_reserved_chars() {
        let _lock = CONFIG_TEST_LOCK.lock().unwrap();
        let err = load_with("[retrieval]\nrelation_label = \"is,part\"\n").unwrap_err();
        assert!(err.to_string().contains("relation_label"));
    }

    #[test]
    fn test_config_missing_triples_file() {
        let _lock = CONFIG_TEST_LOCK.lock().unwrap();
        let temp_dir = TempDir::new().unwrap();
        let config_content = r#"
[kgrag]
triples_path = "missing.tsv"

[extraction]
provider = "openai"
model = "gpt-4o-mini"
api_key_env = "OPENAI_API_KEY"
max_tokens = 512
"#;
        let config_path = temp_dir.path().join("config.toml");
        fs::write(&config_path, config_content).unwrap();
        let config_path = config_path.canonicalize().unwrap();
        let original_dir = std::env::current_dir().unwrap();
        let _cwd = CwdGuard(original_dir.clone());
        std::env::set_current_dir(temp_dir.path()).unwrap();
        with_config_env(&config_path, || {
            let config = Config::load();
            assert!(config.is_err());
            assert!(config.unwrap_err().to_string().contains("triples_path"));
        });
    }

    #[test]
    fn test_config_invalid_path() {
        let _lock = CONFIG_TEST_LOCK.lock().unwrap();
        let original = std::env::var("KGRAG_CONFIG").ok();
        std::env::set_var("KGRAG_CONFIG", "nonexistent.toml");
        let config = Config::load();
        assert!(config.is_err());
        std::env::remove_var("KGRAG_CONFIG");
        if let Some(v) = original {
            std::env::set_var("KGRAG_CONFIG", v);
        }
    }
}
