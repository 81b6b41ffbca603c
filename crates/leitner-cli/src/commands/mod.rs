pub mod add;
pub mod init;
pub mod review;
pub mod status;
pub mod validate;

use std::path::PathBuf;

use anyhow::Result;

use crate::config::{load_config_from, TrainerConfig};

/// Load the config and apply a `--data-file` override.
pub fn load_settings(
    config_path: Option<PathBuf>,
    data_file: Option<PathBuf>,
) -> Result<TrainerConfig> {
    let mut config = load_config_from(config_path.as_deref())?;
    if let Some(path) = data_file {
        config.data_file = path;
    }
    Ok(config)
}
