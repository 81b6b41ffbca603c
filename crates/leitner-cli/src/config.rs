//! Trainer configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use leitner_core::model::{BoxCascade, DEFAULT_CAPACITIES};
use leitner_core::parser::DEFAULT_REVIEW_SENTINEL;
use leitner_core::scheduler::SchedulerConfig;

/// Top-level leitner configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainerConfig {
    /// Where the cascade is saved between sessions.
    #[serde(default = "default_data_file")]
    pub data_file: PathBuf,
    /// Capacities of every box except the unbounded terminal box.
    #[serde(default = "default_capacities")]
    pub capacities: Vec<usize>,
    /// Most cards reviewed from one full box in a single batch.
    #[serde(default = "default_batch_limit")]
    pub review_batch_limit: usize,
    /// The intake box is reviewed until it holds at most this many cards.
    #[serde(default = "default_resting_size")]
    pub intake_resting_size: usize,
    /// Word that ends card entry and starts the review.
    #[serde(default = "default_sentinel")]
    pub review_sentinel: String,
}

fn default_data_file() -> PathBuf {
    PathBuf::from("cards.json")
}
fn default_capacities() -> Vec<usize> {
    DEFAULT_CAPACITIES.to_vec()
}
fn default_batch_limit() -> usize {
    150
}
fn default_resting_size() -> usize {
    3
}
fn default_sentinel() -> String {
    DEFAULT_REVIEW_SENTINEL.to_string()
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            data_file: default_data_file(),
            capacities: default_capacities(),
            review_batch_limit: default_batch_limit(),
            intake_resting_size: default_resting_size(),
            review_sentinel: default_sentinel(),
        }
    }
}

impl TrainerConfig {
    /// Check the values the scheduler relies on.
    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(
            !self.capacities.is_empty(),
            "capacities must list at least one box"
        );
        anyhow::ensure!(
            self.capacities.iter().all(|&c| c > 0),
            "every box capacity must be at least 1"
        );
        anyhow::ensure!(
            self.review_batch_limit >= 1,
            "review_batch_limit must be at least 1"
        );
        anyhow::ensure!(
            !self.review_sentinel.trim().is_empty(),
            "review_sentinel must not be empty"
        );
        Ok(())
    }

    /// An empty cascade with the configured layout.
    pub fn cascade(&self) -> Result<BoxCascade> {
        BoxCascade::with_capacities(&self.capacities).context("invalid box layout in config")
    }

    pub fn scheduler_config(&self) -> SchedulerConfig {
        SchedulerConfig {
            intake_resting_size: self.intake_resting_size,
            review_batch_limit: self.review_batch_limit,
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    while let Some(start) = result.find("${") {
        if let Some(end) = result[start..].find('}') {
            let var_name = &result[start + 2..start + end];
            let value = std::env::var(var_name).unwrap_or_default();
            result = format!(
                "{}{}{}",
                &result[..start],
                value,
                &result[start + end + 1..]
            );
        } else {
            break;
        }
    }
    result
}

/// Load config from an explicit path, or search the default locations.
///
/// Search order:
/// 1. `leitner.toml` in the current directory
/// 2. `~/.config/leitner/config.toml`
///
/// `LEITNER_DATA_FILE` overrides `data_file`.
pub fn load_config_from(path: Option<&Path>) -> Result<TrainerConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("leitner.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            let config = toml::from_str::<TrainerConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?;
            tracing::debug!("loaded config from {}", path.display());
            config
        }
        None => TrainerConfig::default(),
    };

    if let Ok(data_file) = std::env::var("LEITNER_DATA_FILE") {
        config.data_file = PathBuf::from(data_file);
    }

    let resolved = resolve_env_vars(&config.data_file.to_string_lossy());
    config.data_file = PathBuf::from(resolved);
    config.review_sentinel = config.review_sentinel.trim().to_string();

    config.validate()?;
    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("leitner"))
}
