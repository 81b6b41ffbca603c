//! The `leitner add` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use leitner_core::parser::parse_card;
use leitner_core::store::{restore, CascadeSnapshot, JsonFileStore, Restore};
use leitner_core::traits::CascadeStore;

use super::load_settings;

pub fn execute(
    entries: Vec<String>,
    config_path: Option<PathBuf>,
    data_file: Option<PathBuf>,
) -> Result<()> {
    let config = load_settings(config_path, data_file)?;

    // Parse everything up front so a bad entry changes nothing.
    let cards = entries
        .iter()
        .map(|e| parse_card(e).with_context(|| "invalid entry, use word:meaning"))
        .collect::<Result<Vec<_>>>()?;

    let mut cascade = config.cascade()?;
    let store = JsonFileStore::new(&config.data_file);
    if let Restore::Failed(e) = restore(&store, &mut cascade) {
        return Err(e).context("refusing to overwrite unreadable data file");
    }

    for card in cards {
        println!("Added '{}' to box 1", card.front());
        cascade.add_card(card);
    }

    store.save(&CascadeSnapshot::capture(&cascade))?;
    println!(
        "Box 1 now holds {}/{} card(s)",
        cascade.intake().len(),
        cascade.intake().capacity()
    );
    Ok(())
}
