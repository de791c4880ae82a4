//! Context engine configuration
//!
//! Loads configuration from ~/.config/boxmind/config.toml, then applies
//! `BOXMIND_*` environment overrides.

use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

use crate::error::{ContextError, Result};
use crate::memory::{CompressionConfig, DEFAULT_RAG_MAX_CHARS, DEFAULT_TOP_K};

pub const ENV_COMPRESSION_THRESHOLD: &str = "BOXMIND_COMPRESSION_THRESHOLD";
pub const ENV_COMPRESSION_KEEP_RECENT: &str = "BOXMIND_COMPRESSION_KEEP_RECENT";
pub const ENV_COMPRESSION_MODEL: &str = "BOXMIND_COMPRESSION_MODEL";
pub const ENV_MAX_SEARCH_RESULTS: &str = "BOXMIND_MAX_SEARCH_RESULTS";

const THRESHOLD_RANGE: RangeInclusive<usize> = 10_000..=500_000;
const KEEP_RECENT_RANGE: RangeInclusive<usize> = 2..=100;
const SEARCH_RESULTS_RANGE: RangeInclusive<usize> = 1..=50;

const DEFAULT_THRESHOLD: usize = 40_000;
const DEFAULT_KEEP_RECENT: usize = 10;
const DEFAULT_COMPRESSION_MODEL: &str = "claude-haiku-4-5-20251001";
const DEFAULT_SUMMARY_MAX_TOKENS: u32 = 4_096;

/// Resolved configuration of the context engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextConfig {
    /// Estimated tokens at which history is compacted
    pub compression_threshold: usize,
    /// Messages kept verbatim by compaction
    pub compression_keep_recent: usize,
    /// Model used for summaries
    pub compression_model: String,
    /// Chunks retrieved per query
    pub max_search_results: usize,
    /// Character budget of the retrieved-context block
    pub rag_max_chars: usize,
    /// Token cap of a generated summary
    pub summary_max_tokens: u32,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            compression_threshold: DEFAULT_THRESHOLD,
            compression_keep_recent: DEFAULT_KEEP_RECENT,
            compression_model: DEFAULT_COMPRESSION_MODEL.to_string(),
            max_search_results: DEFAULT_TOP_K,
            rag_max_chars: DEFAULT_RAG_MAX_CHARS,
            summary_max_tokens: DEFAULT_SUMMARY_MAX_TOKENS,
        }
    }
}

/// Raw config file contents. Every key is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub compression: CompressionSection,
    #[serde(default)]
    pub memory: MemorySection,
}

/// `[compression]` table
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompressionSection {
    pub threshold: Option<usize>,
    pub keep_recent: Option<usize>,
    pub model: Option<String>,
    pub summary_max_tokens: Option<u32>,
}

/// `[memory]` table
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemorySection {
    pub max_search_results: Option<usize>,
    pub rag_max_chars: Option<usize>,
}

impl ConfigFile {
    /// Load a config file. A missing or malformed file yields empty settings.
    pub fn load_from_path(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).unwrap_or_else(|err| {
                tracing::warn!(path = %path.display(), error = %err, "Ignoring malformed config file");
                Self::default()
            }),
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "Failed to read config file");
                Self::default()
            }
        }
    }
}

impl ContextConfig {
    /// Load from the default config file and the process environment.
    pub fn load() -> Self {
        let file = Self::default_path()
            .map(|path| ConfigFile::load_from_path(&path))
            .unwrap_or_default();
        Self::resolve(&file, |key| std::env::var(key).ok())
    }

    /// Load from a specific config file and the process environment.
    pub fn load_from_path(path: &Path) -> Self {
        Self::resolve(&ConfigFile::load_from_path(path), |key| {
            std::env::var(key).ok()
        })
    }

    /// Get the default configuration file path
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("boxmind").join("config.toml"))
    }

    /// Merge environment, file and defaults, in that order of precedence.
    ///
    /// A numeric value outside its accepted range is skipped and the next
    /// source is consulted.
    pub fn resolve(file: &ConfigFile, env: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let compression_threshold = pick_in_range(
            env(ENV_COMPRESSION_THRESHOLD).as_deref(),
            file.compression.threshold,
            &THRESHOLD_RANGE,
        )
        .unwrap_or(defaults.compression_threshold);

        let compression_keep_recent = pick_in_range(
            env(ENV_COMPRESSION_KEEP_RECENT).as_deref(),
            file.compression.keep_recent,
            &KEEP_RECENT_RANGE,
        )
        .unwrap_or(defaults.compression_keep_recent);

        let max_search_results = pick_in_range(
            env(ENV_MAX_SEARCH_RESULTS).as_deref(),
            file.memory.max_search_results,
            &SEARCH_RESULTS_RANGE,
        )
        .unwrap_or(defaults.max_search_results);

        let compression_model = env(ENV_COMPRESSION_MODEL)
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
            .or_else(|| file.compression.model.clone().filter(|m| !m.trim().is_empty()))
            .unwrap_or(defaults.compression_model);

        Self {
            compression_threshold,
            compression_keep_recent,
            compression_model,
            max_search_results,
            rag_max_chars: file.memory.rag_max_chars.unwrap_or(defaults.rag_max_chars),
            summary_max_tokens: file
                .compression
                .summary_max_tokens
                .unwrap_or(defaults.summary_max_tokens),
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<()> {
        if !THRESHOLD_RANGE.contains(&self.compression_threshold) {
            return Err(ContextError::Config(format!(
                "Compression threshold must be between {} and {} tokens",
                THRESHOLD_RANGE.start(),
                THRESHOLD_RANGE.end()
            )));
        }

        if !KEEP_RECENT_RANGE.contains(&self.compression_keep_recent) {
            return Err(ContextError::Config(format!(
                "Keep-recent must be between {} and {} messages",
                KEEP_RECENT_RANGE.start(),
                KEEP_RECENT_RANGE.end()
            )));
        }

        if !SEARCH_RESULTS_RANGE.contains(&self.max_search_results) {
            return Err(ContextError::Config(format!(
                "Max search results must be between {} and {}",
                SEARCH_RESULTS_RANGE.start(),
                SEARCH_RESULTS_RANGE.end()
            )));
        }

        if self.compression_model.trim().is_empty() {
            return Err(ContextError::Config(
                "Compression model must not be empty".to_string(),
            ));
        }

        if self.summary_max_tokens == 0 {
            return Err(ContextError::Config(
                "Summary max tokens must be at least 1".to_string(),
            ));
        }

        Ok(())
    }

    /// Compaction parameters derived from this configuration.
    pub fn compression(&self) -> CompressionConfig {
        CompressionConfig {
            token_threshold: self.compression_threshold,
            keep_recent: self.compression_keep_recent,
            model: self.compression_model.clone(),
            max_summary_tokens: self.summary_max_tokens,
        }
    }
}

fn pick_in_range(
    env_value: Option<&str>,
    file_value: Option<usize>,
    range: &RangeInclusive<usize>,
) -> Option<usize> {
    let from_env = env_value.and_then(|raw| raw.trim().parse::<usize>().ok());
    [from_env, file_value]
        .into_iter()
        .flatten()
        .find(|value| range.contains(value))
}
