//! Bounded conversation memory with raw and summary views.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// Default number of retained exchanges (a question/answer pair each).
pub const DEFAULT_MAX_HISTORY: usize = 10;

/// Returned by [`ConversationMemory::summary`] when nothing has been
/// recorded yet.
pub const EMPTY_SUMMARY: &str = "No previous conversation.";

const USER_PREVIEW_CHARS: usize = 150;
const ASSISTANT_PREVIEW_CHARS: usize = 200;
const SUMMARY_EXCHANGES: usize = 2;

/// The speaker of a recorded turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    /// The person asking.
    User,
    /// The model answering.
    Assistant,
}

/// One recorded message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationTurn {
    /// Who spoke.
    pub role: TurnRole,
    /// What was said, verbatim.
    pub content: String,
}

/// An ordered question/answer log, FIFO-capped at `2 × max_history`
/// turns.
///
/// Turns are only ever added as a user/assistant pair by
/// [`append`](ConversationMemory::append); eviction removes the oldest
/// turns first and never reorders.
#[derive(Debug, Clone)]
pub struct ConversationMemory {
    turns: VecDeque<ConversationTurn>,
    max_history: usize,
}

impl Default for ConversationMemory {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversationMemory {
    /// An empty memory retaining [`DEFAULT_MAX_HISTORY`] exchanges.
    pub fn new() -> Self {
        Self::with_max_history(DEFAULT_MAX_HISTORY)
    }

    /// An empty memory retaining `max_history` exchanges.
    pub fn with_max_history(max_history: usize) -> Self {
        Self { turns: VecDeque::new(), max_history }
    }

    /// Record one exchange: a user turn, then an assistant turn. Evicts
    /// the oldest turns once the cap is exceeded.
    pub fn append(&mut self, question: &str, answer: &str) {
        self.turns
            .push_back(ConversationTurn { role: TurnRole::User, content: question.to_string() });
        self.turns
            .push_back(ConversationTurn { role: TurnRole::Assistant, content: answer.to_string() });
        while self.turns.len() > self.max_history * 2 {
            self.turns.pop_front();
        }
    }

    /// Forget everything.
    pub fn clear(&mut self) {
        self.turns.clear();
    }

    /// The last `n_turns` turns verbatim, oldest first.
    pub fn recent(&self, n_turns: usize) -> impl Iterator<Item = &ConversationTurn> {
        self.turns.iter().skip(self.turns.len().saturating_sub(n_turns))
    }

    /// Every recorded turn, oldest first.
    pub fn turns(&self) -> impl Iterator<Item = &ConversationTurn> {
        self.turns.iter()
    }

    /// Number of recorded turns (two per exchange).
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// A plain-text recap of the last two exchanges, for embedding
    /// inside a prompt: `User:` / `Assistant:` labelled lines with each
    /// message cut to a short preview. Returns [`EMPTY_SUMMARY`] when
    /// the log is empty.
    pub fn summary(&self) -> String {
        if self.turns.is_empty() {
            return EMPTY_SUMMARY.to_string();
        }

        let turns: Vec<&ConversationTurn> = self.turns.iter().collect();
        let mut lines = Vec::new();
        let mut i = 0;
        while i + 1 < turns.len() {
            lines.push(format!("User: {}", preview(&turns[i].content, USER_PREVIEW_CHARS)));
            lines.push(format!(
                "Assistant: {}",
                preview(&turns[i + 1].content, ASSISTANT_PREVIEW_CHARS)
            ));
            i += 2;
        }

        let keep = lines.len().saturating_sub(SUMMARY_EXCHANGES * 2);
        lines[keep..].join("\n")
    }
}

/// Cut `text` to at most `max_chars` characters, with an ellipsis when
/// anything was cut.
fn preview(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => format!("{}...", &text[..byte_idx]),
        None => text.to_string(),
    }
}
