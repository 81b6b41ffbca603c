//! Intake entry parsing and saved-state validation.

use std::collections::HashMap;

use crate::error::EntryError;
use crate::model::Card;
use crate::store::CascadeSnapshot;
use crate::traits::Entry;

/// Default word that ends intake and starts review.
pub const DEFAULT_REVIEW_SENTINEL: &str = "review";

/// Parse one line of intake input.
///
/// The line and `sentinel` are both trimmed; a match yields
/// [`Entry::ReviewStart`], anything else must be `word:meaning`. Only the
/// first `:` separates, so meanings may contain colons.
pub fn parse_entry(line: &str, sentinel: &str) -> Result<Entry, EntryError> {
    let line = line.trim();
    if line == sentinel.trim() {
        return Ok(Entry::ReviewStart);
    }
    parse_card(line).map(Entry::Card)
}

/// Parse a `word:meaning` pair into a card.
pub fn parse_card(input: &str) -> Result<Card, EntryError> {
    let input = input.trim();
    let Some((word, meaning)) = input.split_once(':') else {
        return Err(EntryError::MissingSeparator(input.to_string()));
    };
    let word = word.trim();
    if word.is_empty() {
        return Err(EntryError::EmptyWord(input.to_string()));
    }
    Ok(Card::new(word, meaning.trim()))
}

/// A warning from saved-state validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// Box the warning refers to (if applicable).
    pub box_index: Option<usize>,
    /// Warning message.
    pub message: String,
}

/// Check a saved snapshot for common issues.
pub fn validate_snapshot(
    snapshot: &CascadeSnapshot,
    configured_boxes: usize,
) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    if snapshot.boxes.len() > configured_boxes {
        warnings.push(ValidationWarning {
            box_index: None,
            message: format!(
                "file has {} boxes but only {} are configured; extra boxes will be ignored",
                snapshot.boxes.len(),
                configured_boxes
            ),
        });
    }

    // Duplicate cards, wherever they sit
    let mut seen: HashMap<&Card, usize> = HashMap::new();
    for (index, b) in snapshot.boxes.iter().enumerate() {
        for card in &b.cards {
            if let Some(&first) = seen.get(card) {
                warnings.push(ValidationWarning {
                    box_index: Some(index),
                    message: format!("duplicate card '{card}' (also in box {})", first + 1),
                });
            } else {
                seen.insert(card, index);
            }
        }
    }

    for (index, b) in snapshot.boxes.iter().enumerate() {
        for card in &b.cards {
            if card.front().trim().is_empty() {
                warnings.push(ValidationWarning {
                    box_index: Some(index),
                    message: format!("card with empty word (meaning '{}')", card.back()),
                });
            }
        }
    }

    warnings
}
