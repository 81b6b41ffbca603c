//! The `leitner status` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use leitner_core::model::BoxCascade;
use leitner_core::store::{restore, JsonFileStore, Restore};

use super::load_settings;

pub fn execute(config_path: Option<PathBuf>, data_file: Option<PathBuf>) -> Result<()> {
    let config = load_settings(config_path, data_file)?;
    let mut cascade = config.cascade()?;
    let store = JsonFileStore::new(&config.data_file);

    match restore(&store, &mut cascade) {
        Restore::Loaded { .. } => {}
        Restore::Fresh => println!("No saved data at {}", config.data_file.display()),
        Restore::Failed(e) => anyhow::bail!(e),
    }

    print_occupancy(&cascade);
    Ok(())
}

/// Print one row per box, numbered from 1.
pub fn print_occupancy(cascade: &BoxCascade) {
    let mut table = Table::new();
    table.set_header(vec!["Box", "Cards", "Capacity", "Full"]);

    for occ in cascade.occupancy() {
        table.add_row(vec![
            Cell::new(occ.index + 1),
            Cell::new(occ.len),
            Cell::new(occ.capacity),
            Cell::new(if occ.is_full { "yes" } else { "" }),
        ]);
    }

    println!("{table}");
    println!(
        "Total: {} card(s) in {} boxes",
        cascade.total_cards(),
        cascade.len()
    );
}
