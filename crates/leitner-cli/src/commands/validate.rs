//! The `leitner validate` command.

use std::path::PathBuf;

use anyhow::Result;

use leitner_core::parser::validate_snapshot;
use leitner_core::store::JsonFileStore;
use leitner_core::traits::{CascadeStore, LoadOutcome};

use super::load_settings;

pub fn execute(config_path: Option<PathBuf>, data_file: Option<PathBuf>) -> Result<()> {
    let config = load_settings(config_path, data_file)?;
    let configured_boxes = config.cascade()?.len();
    let store = JsonFileStore::new(&config.data_file);

    let snapshot = match store.load()? {
        LoadOutcome::Loaded(snapshot) => snapshot,
        LoadOutcome::NotFound => {
            println!("No saved data at {}", config.data_file.display());
            return Ok(());
        }
    };

    println!(
        "Data file: {} ({} card(s) in {} boxes)",
        config.data_file.display(),
        snapshot.total_cards(),
        snapshot.boxes.len()
    );

    let warnings = validate_snapshot(&snapshot, configured_boxes);
    for w in &warnings {
        let prefix = w
            .box_index
            .map(|i| format!("  [box {}]", i + 1))
            .unwrap_or_else(|| "  ".to_string());
        println!("{prefix} WARNING: {}", w.message);
    }

    if warnings.is_empty() {
        println!("Data file valid.");
    } else {
        println!("\n{} warning(s) found.", warnings.len());
    }

    Ok(())
}
