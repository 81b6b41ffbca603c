//! Core data model: cards, capacity-bounded boxes, and the box cascade.

use std::collections::VecDeque;
use std::fmt;
use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

use crate::error::CascadeError;

/// Bounded capacities of the default cascade, box 0 through box 4.
/// The terminal box is always unbounded.
pub const DEFAULT_CAPACITIES: [usize; 5] = [100, 5, 6, 7, 8];

/// A single flashcard: a word and its meaning.
///
/// Persisted as a two-element `[front, back]` array.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "(String, String)", into = "(String, String)")]
pub struct Card {
    front: String,
    back: String,
}

impl Card {
    pub fn new(front: impl Into<String>, back: impl Into<String>) -> Self {
        Self {
            front: front.into(),
            back: back.into(),
        }
    }

    /// The word shown when the card is reviewed.
    pub fn front(&self) -> &str {
        &self.front
    }

    /// The meaning revealed on request.
    pub fn back(&self) -> &str {
        &self.back
    }
}

impl From<(String, String)> for Card {
    fn from((front, back): (String, String)) -> Self {
        Self { front, back }
    }
}

impl From<Card> for (String, String) {
    fn from(card: Card) -> Self {
        (card.front, card.back)
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.front, self.back)
    }
}

/// How many cards a box may hold before it needs review.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capacity {
    Bounded(usize),
    Unbounded,
}

impl fmt::Display for Capacity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Capacity::Bounded(n) => write!(f, "{n}"),
            Capacity::Unbounded => write!(f, "∞"),
        }
    }
}

/// A FIFO queue of cards with an optional capacity ceiling.
///
/// Appends never enforce the capacity; a box may sit above it until the
/// scheduler gets to it.
#[derive(Debug, Clone)]
pub struct CardBox {
    capacity: Capacity,
    cards: VecDeque<Card>,
}

impl CardBox {
    pub fn new(capacity: Capacity) -> Self {
        Self {
            capacity,
            cards: VecDeque::new(),
        }
    }

    pub fn capacity(&self) -> Capacity {
        self.capacity
    }

    /// Insert a card at the tail.
    pub fn append(&mut self, card: Card) {
        self.cards.push_back(card);
    }

    /// Append every card in order.
    pub fn extend<I: IntoIterator<Item = Card>>(&mut self, cards: I) {
        self.cards.extend(cards);
    }

    /// Put a card back at the head, ahead of everything queued.
    pub fn push_front(&mut self, card: Card) {
        self.cards.push_front(card);
    }

    /// Remove and return the head card.
    ///
    /// `index` is only used to label the error.
    pub fn pop_front(&mut self, index: usize) -> Result<Card, CascadeError> {
        self.cards
            .pop_front()
            .ok_or(CascadeError::EmptyBox { index })
    }

    /// True iff the capacity is bounded and has been reached.
    pub fn is_full(&self) -> bool {
        match self.capacity {
            Capacity::Bounded(limit) => self.cards.len() >= limit,
            Capacity::Unbounded => false,
        }
    }

    pub fn clear(&mut self) {
        self.cards.clear();
    }

    /// Remove every card, returning them in queue order.
    pub fn drain_all(&mut self) -> Vec<Card> {
        self.cards.drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn cards(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }
}

/// Occupancy of one box, for status output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Occupancy {
    pub index: usize,
    pub len: usize,
    pub capacity: Capacity,
    pub is_full: bool,
}

/// The ordered review pipeline. Box 0 is the intake box; the last box is
/// the unbounded terminal box that only ever receives promotions.
#[derive(Debug, Clone)]
pub struct BoxCascade {
    boxes: Vec<CardBox>,
}

impl BoxCascade {
    /// The six-box cascade: capacities 100, 5, 6, 7, 8, unbounded.
    pub fn standard() -> Self {
        Self {
            boxes: DEFAULT_CAPACITIES
                .iter()
                .map(|&c| CardBox::new(Capacity::Bounded(c)))
                .chain(std::iter::once(CardBox::new(Capacity::Unbounded)))
                .collect(),
        }
    }

    /// Build a cascade from the bounded capacities of every box except the
    /// terminal one, which is appended as unbounded.
    pub fn with_capacities(capacities: &[usize]) -> Result<Self, CascadeError> {
        if capacities.is_empty() {
            return Err(CascadeError::InvalidLayout(
                "at least one bounded box is required before the terminal box".into(),
            ));
        }
        if let Some(pos) = capacities.iter().position(|&c| c == 0) {
            return Err(CascadeError::InvalidLayout(format!(
                "box {pos} has zero capacity"
            )));
        }

        let boxes = capacities
            .iter()
            .map(|&c| CardBox::new(Capacity::Bounded(c)))
            .chain(std::iter::once(CardBox::new(Capacity::Unbounded)))
            .collect();
        Ok(Self { boxes })
    }

    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    /// Index of the terminal box.
    pub fn terminal_index(&self) -> usize {
        self.boxes.len() - 1
    }

    pub fn get(&self, index: usize) -> Option<&CardBox> {
        self.boxes.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut CardBox> {
        self.boxes.get_mut(index)
    }

    pub fn boxes(&self) -> &[CardBox] {
        &self.boxes
    }

    /// The intake box.
    pub fn intake(&self) -> &CardBox {
        &self.boxes[0]
    }

    pub fn intake_mut(&mut self) -> &mut CardBox {
        &mut self.boxes[0]
    }

    /// Append a new card to the intake box.
    pub fn add_card(&mut self, card: Card) {
        self.intake_mut().append(card);
    }

    /// Total number of cards across every box.
    pub fn total_cards(&self) -> usize {
        self.boxes.iter().map(CardBox::len).sum()
    }

    pub fn occupancy(&self) -> Vec<Occupancy> {
        self.boxes
            .iter()
            .enumerate()
            .map(|(index, b)| Occupancy {
                index,
                len: b.len(),
                capacity: b.capacity(),
                is_full: b.is_full(),
            })
            .collect()
    }

    /// Replace the contents of each box with the matching list from
    /// `contents`. Lists beyond the configured boxes are ignored; boxes
    /// beyond the supplied lists are left untouched.
    pub fn replace_contents(&mut self, contents: Vec<Vec<Card>>) {
        for (b, cards) in self.boxes.iter_mut().zip(contents) {
            b.clear();
            b.extend(cards);
        }
    }
}

impl Index<usize> for BoxCascade {
    type Output = CardBox;

    fn index(&self, index: usize) -> &CardBox {
        &self.boxes[index]
    }
}

impl IndexMut<usize> for BoxCascade {
    fn index_mut(&mut self, index: usize) -> &mut CardBox {
        &mut self.boxes[index]
    }
}

impl Default for BoxCascade {
    fn default() -> Self {
        Self::standard()
    }
}
