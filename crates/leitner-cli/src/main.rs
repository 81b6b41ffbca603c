//! leitner CLI: the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod console;

#[derive(Parser)]
#[command(name = "leitner", version, about = "Leitner-box flashcard trainer")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Where to find settings and saved boxes.
#[derive(Args)]
struct DeckArgs {
    /// Config file path
    #[arg(long)]
    config: Option<PathBuf>,

    /// Saved boxes file (overrides the config)
    #[arg(long)]
    data_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Enter new cards, then review until every box has settled
    Review {
        #[command(flatten)]
        deck: DeckArgs,
    },

    /// Add cards to box 1 without reviewing
    Add {
        /// Entries in word:meaning form
        #[arg(required = true)]
        entries: Vec<String>,

        #[command(flatten)]
        deck: DeckArgs,
    },

    /// Show how many cards each box holds
    Status {
        #[command(flatten)]
        deck: DeckArgs,
    },

    /// Check the saved boxes file for problems
    Validate {
        #[command(flatten)]
        deck: DeckArgs,
    },

    /// Create a starter config
    Init,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("leitner_cli=info,leitner_core=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Review { deck } => commands::review::execute(deck.config, deck.data_file),
        Commands::Add { entries, deck } => {
            commands::add::execute(entries, deck.config, deck.data_file)
        }
        Commands::Status { deck } => commands::status::execute(deck.config, deck.data_file),
        Commands::Validate { deck } => commands::validate::execute(deck.config, deck.data_file),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
