//! The `leitner init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    if std::path::Path::new("leitner.toml").exists() {
        println!("leitner.toml already exists, skipping.");
    } else {
        std::fs::write("leitner.toml", SAMPLE_CONFIG)?;
        println!("Created leitner.toml");
    }

    println!("\nNext steps:");
    println!("  1. Adjust box capacities in leitner.toml if you like");
    println!("  2. Run: leitner add \"word:meaning\"");
    println!("  3. Run: leitner review");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# leitner configuration

# Where boxes are saved between sessions. ${VAR} references are expanded.
data_file = "cards.json"

# Capacities of box 1 onwards; a final unbounded box is always added.
capacities = [100, 5, 6, 7, 8]

# Most cards reviewed from a full box in one go.
review_batch_limit = 150

# Box 1 is reviewed until it holds at most this many cards.
intake_resting_size = 3

# Type this instead of word:meaning to start reviewing.
review_sentinel = "review"
"#;
