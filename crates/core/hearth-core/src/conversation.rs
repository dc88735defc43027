//! Append-only conversation log

use crate::types::Turn;
use serde::Serialize;

/// Ordered log of turns for one session.
///
/// Turns can only be appended; nothing is ever edited or removed.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct ConversationStore {
    turns: Vec<Turn>,
}

impl ConversationStore {
    /// Create an empty conversation
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a turn and return a reference to it
    pub fn append(&mut self, turn: Turn) -> &Turn {
        self.turns.push(turn);
        &self.turns[self.turns.len() - 1]
    }

    /// Up to `n` most recent turns, oldest first
    pub fn last(&self, n: usize) -> &[Turn] {
        let start = self.turns.len().saturating_sub(n);
        &self.turns[start..]
    }

    /// Every turn, oldest first
    pub fn all(&self) -> &[Turn] {
        &self.turns
    }

    /// Most recent turn
    pub fn latest(&self) -> Option<&Turn> {
        self.turns.last()
    }

    /// Number of turns
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// True when nothing has been said yet
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}
