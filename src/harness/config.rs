//! The harness's configuration surface: everything the CLI binary and a
//! TOML config file can set. Kept as one `serde`-deserializable struct so
//! the binary can layer `clap` overrides on top of a file-loaded baseline.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::corpus::Tokenization;

/// Upper bound on a single benchmark/stress run, seconds.
pub const DEFAULT_DURATION_SECONDS: u64 = 10;
/// Failures tolerated before the harness aborts the process.
pub const DEFAULT_STRESS_LIMIT: usize = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarnessConfig {
    /// File whose contents seed the corpus.
    pub dataset_path: PathBuf,
    /// How the dataset is split into tokens.
    #[serde(default)]
    pub tokenization: Tokenization,
    /// Upper bound on a single benchmark/stress run.
    #[serde(default = "default_duration")]
    pub duration_seconds: u64,
    /// Whether to compare accelerated vs baseline backends.
    #[serde(default)]
    pub stress_enabled: bool,
    /// Where failure records are written.
    #[serde(default = "default_stress_dir")]
    pub stress_dir: PathBuf,
    /// Failures tolerated before aborting.
    #[serde(default = "default_stress_limit")]
    pub stress_limit: usize,
    /// Regex over backend names to include; `None` means "all".
    #[serde(default)]
    pub filter: Option<String>,
    /// Non-zero value enables deterministic shuffle of tokens.
    #[serde(default)]
    pub seed: u64,
    /// `tracing` log level filter, e.g. `"info"`, `"tapedist=debug"`.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_duration() -> u64 {
    DEFAULT_DURATION_SECONDS
}

fn default_stress_dir() -> PathBuf {
    PathBuf::from("stress-logs")
}

fn default_stress_limit() -> usize {
    DEFAULT_STRESS_LIMIT
}

fn default_log_level() -> String {
    "info".to_string()
}

impl HarnessConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }
}
