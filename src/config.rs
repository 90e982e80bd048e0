//! Configuration for trace analysis.
//!
//! Carries the call-stack attribution rules (depth cap, infrastructure
//! prefixes, proxy markers) and the slow-query threshold. Configurations
//! can be loaded from TOML or JSON files; every field has a default so a
//! partial file works.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Lowest accepted call-stack depth cap.
pub const MIN_STACK_DEPTH: usize = 10;
/// Highest accepted call-stack depth cap.
pub const MAX_STACK_DEPTH: usize = 30;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("unsupported config format: {0} (expected .toml or .json)")]
    UnsupportedFormat(String),
    #[error("failed to parse TOML config: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("failed to parse JSON config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("max_stack_depth {0} out of range {MIN_STACK_DEPTH}..={MAX_STACK_DEPTH}")]
    DepthOutOfRange(usize),
}

/// Configuration file format, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Json,
}

impl ConfigFormat {
    fn from_path(path: &Path) -> Result<Self, ConfigError> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Ok(ConfigFormat::Toml),
            Some("json") => Ok(ConfigFormat::Json),
            other => Err(ConfigError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            )),
        }
    }
}

/// Analysis configuration.
///
/// The prefix lists drive the [`StackFilter`](crate::stack_filter::StackFilter)
/// rule table; defaults reflect a JVM/Spring-style runtime, which is where
/// traces typically originate, but nothing in the filter itself assumes one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Cap on emitted call-stack length. Valid range 10..=30.
    #[serde(default = "default_max_stack_depth")]
    pub max_stack_depth: usize,

    /// Namespaces hidden from call-stack attribution (rule 4).
    #[serde(default = "default_excluded_prefixes")]
    pub excluded_prefixes: Vec<String>,

    /// Substrings of a declaring-type name that force-include an
    /// otherwise-hidden frame (rule 2): dynamic proxies and
    /// compiler-generated subclasses are the actual call sites.
    #[serde(default = "default_proxy_markers")]
    pub proxy_markers: Vec<String>,

    /// Prefixes dropped unconditionally, even when a proxy marker or
    /// include override would apply (rule 1): query-interception,
    /// aspect-weaving and transaction-management infrastructure.
    #[serde(default = "default_hard_excluded_prefixes")]
    pub hard_excluded_prefixes: Vec<String>,

    /// Repository-implementation namespaces kept despite living under an
    /// excluded framework prefix (rule 3).
    #[serde(default = "default_repository_prefixes")]
    pub repository_prefixes: Vec<String>,

    /// Executions at or above this elapsed time are reported as slow.
    #[serde(default = "default_slow_query_threshold")]
    pub slow_query_threshold: Duration,
}

fn default_max_stack_depth() -> usize {
    MIN_STACK_DEPTH
}

fn default_excluded_prefixes() -> Vec<String> {
    [
        "net.ttddyy",
        "org.springframework",
        "org.apache",
        "org.hibernate",
        "java.",
        "javax.",
        "jakarta.",
        "jdk.",
        "sun.",
        "com.sun.",
        "org.eclipse.jetty",
        "com.zaxxer",
        "org.h2",
        "org.junit",
        "junit",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_proxy_markers() -> Vec<String> {
    vec!["$Proxy".to_string(), "$$".to_string()]
}

fn default_hard_excluded_prefixes() -> Vec<String> {
    [
        "net.ttddyy.dsproxy",
        "org.springframework.data.projection",
        "org.springframework.aop",
        "org.springframework.cglib",
        "org.springframework.transaction",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_repository_prefixes() -> Vec<String> {
    vec!["org.springframework.data.jpa.repository.support".to_string()]
}

fn default_slow_query_threshold() -> Duration {
    Duration::from_millis(500)
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            max_stack_depth: default_max_stack_depth(),
            excluded_prefixes: default_excluded_prefixes(),
            proxy_markers: default_proxy_markers(),
            hard_excluded_prefixes: default_hard_excluded_prefixes(),
            repository_prefixes: default_repository_prefixes(),
            slow_query_threshold: default_slow_query_threshold(),
        }
    }
}

impl AnalysisConfig {
    /// Load a configuration from a TOML or JSON file, validated.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let format = ConfigFormat::from_path(path)?;
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;

        let config: AnalysisConfig = match format {
            ConfigFormat::Toml => toml::from_str(&content)?,
            ConfigFormat::Json => serde_json::from_str(&content)?,
        };
        config.validate()?;
        debug!(path = %path.display(), "loaded analysis config");
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_STACK_DEPTH..=MAX_STACK_DEPTH).contains(&self.max_stack_depth) {
            return Err(ConfigError::DepthOutOfRange(self.max_stack_depth));
        }
        Ok(())
    }
}
