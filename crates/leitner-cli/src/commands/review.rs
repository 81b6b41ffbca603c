//! The `leitner review` command.

use std::io;
use std::path::PathBuf;

use anyhow::Result;

use leitner_core::scheduler::ReviewScheduler;
use leitner_core::store::{restore, JsonFileStore, Restore};

use super::load_settings;
use super::status::print_occupancy;
use crate::console::{ConsoleDriver, ConsoleReporter};

pub fn execute(config_path: Option<PathBuf>, data_file: Option<PathBuf>) -> Result<()> {
    let config = load_settings(config_path, data_file)?;
    let mut cascade = config.cascade()?;
    let store = JsonFileStore::new(&config.data_file);

    match restore(&store, &mut cascade) {
        Restore::Loaded { cards } => {
            eprintln!("Loaded {cards} card(s) from {}", config.data_file.display());
        }
        Restore::Fresh => {
            eprintln!(
                "No saved data at {}, starting a new deck",
                config.data_file.display()
            );
        }
        Restore::Failed(e) => {
            eprintln!("Failed to load saved data, starting with empty boxes: {e}");
        }
    }

    println!(
        "Enter cards as word:meaning, then '{}' to start reviewing",
        config.review_sentinel
    );

    let scheduler = ReviewScheduler::new(&store, config.scheduler_config());
    let summary = {
        let stdin = io::stdin();
        let stdout = io::stdout();
        let mut driver =
            ConsoleDriver::new(stdin.lock(), stdout.lock(), &config.review_sentinel);
        scheduler.run_session(&mut cascade, &mut driver, &ConsoleReporter)?
    };

    tracing::info!(
        "session done: {} added, {} intake pass(es), {} card(s) reviewed from full boxes",
        summary.entries_added,
        summary.intake.passes,
        summary.overflow.reviewed
    );
    if summary.save_failures > 0 {
        eprintln!(
            "Warning: {} save(s) failed during this session",
            summary.save_failures
        );
    }

    println!("\nBox status:");
    print_occupancy(&cascade);

    Ok(())
}
