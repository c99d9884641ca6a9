//! Conversation memory.
//!
//! Each session keeps an append-only log of turns with a fixed capacity.
//! Only the most recent `window` turns are replayed into the prompt.

use dashmap::DashMap;
use shopdesk_core::types::ConversationTurn;
use std::collections::VecDeque;

/// Bounded, append-only log of one session's turns.
#[derive(Debug, Clone)]
pub struct ConversationMemory {
    turns: VecDeque<ConversationTurn>,
    capacity: usize,
}

impl ConversationMemory {
    /// Create an empty log keeping at most `capacity` turns.
    pub fn new(capacity: usize) -> Self {
        Self {
            turns: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    /// Append a turn, evicting the oldest once full.
    pub fn append(&mut self, turn: ConversationTurn) {
        self.turns.push_back(turn);
        while self.turns.len() > self.capacity {
            self.turns.pop_front();
        }
    }

    /// The most recent `k` turns, oldest first.
    pub fn window(&self, k: usize) -> Vec<ConversationTurn> {
        let skip = self.turns.len().saturating_sub(k);
        self.turns.iter().skip(skip).cloned().collect()
    }

    /// Every retained turn, oldest first.
    pub fn all(&self) -> Vec<ConversationTurn> {
        self.turns.iter().cloned().collect()
    }

    pub fn clear(&mut self) {
        self.turns.clear();
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

/// Conversation memories keyed by session id.
pub struct SessionMemories {
    sessions: DashMap<String, ConversationMemory>,
    capacity: usize,
}

impl SessionMemories {
    pub fn new(capacity: usize) -> Self {
        Self {
            sessions: DashMap::new(),
            capacity,
        }
    }

    /// Full retained transcript of a session. Empty for unknown ids.
    pub fn history(&self, session_id: &str) -> Vec<ConversationTurn> {
        self.sessions
            .get(session_id)
            .map(|memory| memory.all())
            .unwrap_or_default()
    }

    /// The last `k` turns of a session.
    pub fn window(&self, session_id: &str, k: usize) -> Vec<ConversationTurn> {
        self.sessions
            .get(session_id)
            .map(|memory| memory.window(k))
            .unwrap_or_default()
    }

    /// The last `k` turns rendered as `Human:` / `AI:` lines.
    pub fn render_window(&self, session_id: &str, k: usize) -> String {
        self.window(session_id, k)
            .iter()
            .map(ConversationTurn::transcript_line)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Record one user message and the reply it received.
    pub fn append_exchange(&self, session_id: &str, user: &str, assistant: &str) {
        let mut memory = self
            .sessions
            .entry(session_id.to_string())
            .or_insert_with(|| ConversationMemory::new(self.capacity));
        memory.append(ConversationTurn::user(user));
        memory.append(ConversationTurn::assistant(assistant));
    }

    /// Forget a session's transcript.
    pub fn clear(&self, session_id: &str) {
        if let Some(mut memory) = self.sessions.get_mut(session_id) {
            memory.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shopdesk_core::types::Role;

    #[test]
    fn test_window_keeps_most_recent_in_order() {
        let mut memory = ConversationMemory::new(100);
        for i in 0..15 {
            memory.append(ConversationTurn::user(format!("message {}", i)));
        }

        let window = memory.window(10);
        assert_eq!(window.len(), 10);
        assert_eq!(window[0].content, "message 5");
        assert_eq!(window[9].content, "message 14");
        assert_eq!(memory.len(), 15);
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let mut memory = ConversationMemory::new(3);
        for i in 0..5 {
            memory.append(ConversationTurn::user(i.to_string()));
        }
        let contents: Vec<_> = memory.all().into_iter().map(|t| t.content).collect();
        assert_eq!(contents, vec!["2", "3", "4"]);
    }

    #[test]
    fn test_session_memories_render_and_clear() {
        let memories = SessionMemories::new(200);
        memories.append_exchange("s1", "Where is ORD001?", "It has shipped.");
        memories.append_exchange("s2", "Hi", "Hello!");

        assert_eq!(
            memories.render_window("s1", 10),
            "Human: Where is ORD001?\nAI: It has shipped."
        );
        let history = memories.history("s1");
        assert_eq!(history[0].role, Role::User);
        assert_eq!(history[1].role, Role::Assistant);

        memories.clear("s1");
        assert!(memories.history("s1").is_empty());
        assert_eq!(memories.history("s2").len(), 2);
        assert!(memories.history("unknown").is_empty());
    }
}
