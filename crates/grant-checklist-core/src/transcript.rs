//! The chat sidebar's transcript and its send/receive state machine.

use crate::api::ChatRequest;
use crate::state::{ChatMessage, ChatRole};

/// Bot turn appended when the chat endpoint can't produce a reply
pub const FALLBACK_REPLY: &str =
    "Sorry, I couldn't process your request right now. Please try again.";

/// Canned questions the user can drop into the input box
pub const QUICK_REPLIES: [&str; 3] = [
    "What are the requirements?",
    "Tell me about deadlines",
    "How to apply?",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChatState {
    #[default]
    Idle,
    Sending,
}

/// Convert a character index to a byte index for UTF-8 safe string operations
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

#[derive(Debug, Default)]
pub struct Transcript {
    messages: Vec<ChatMessage>,
    input: String,
    cursor: usize, // in chars
    state: ChatState,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn state(&self) -> ChatState {
        self.state
    }

    pub fn is_sending(&self) -> bool {
        self.state == ChatState::Sending
    }

    /// Submit the current input.
    ///
    /// Blank input, or a submit while a reply is outstanding, does nothing and
    /// returns `None`. Otherwise the user turn is appended, the input is
    /// cleared, and the request to send is returned.
    pub fn submit(&mut self) -> Option<ChatRequest> {
        if self.is_sending() {
            return None;
        }

        let trimmed = self.input.trim();
        if trimmed.is_empty() {
            return None;
        }

        let user_message = ChatMessage::user(trimmed);
        let mut history = self.messages.clone();
        history.push(user_message.clone());

        let request = ChatRequest {
            message: user_message.content.clone(),
            history,
        };

        self.messages.push(user_message);
        self.input.clear();
        self.cursor = 0;
        self.state = ChatState::Sending;
        Some(request)
    }

    /// Settle the outstanding request with the endpoint's outcome.
    ///
    /// Appends exactly one bot turn: the reply, or [`FALLBACK_REPLY`] on any
    /// failure. Returns false if nothing was outstanding.
    pub fn complete<E: std::fmt::Display>(&mut self, outcome: Result<String, E>) -> bool {
        if !self.is_sending() {
            return false;
        }

        let content = match outcome {
            Ok(reply) => reply,
            Err(e) => {
                tracing::error!("Chat error: {}", e);
                FALLBACK_REPLY.to_string()
            }
        };

        self.messages.push(ChatMessage::bot(content));
        self.state = ChatState::Idle;
        true
    }

    /// Drop the whole conversation. Refused while a reply is outstanding so
    /// the reply can't land in an empty transcript.
    pub fn clear(&mut self) -> bool {
        if self.is_sending() {
            return false;
        }
        self.messages.clear();
        true
    }

    /// Replace the input with one of the canned questions
    pub fn use_quick_reply(&mut self, idx: usize) -> bool {
        match QUICK_REPLIES.get(idx) {
            Some(text) => {
                self.set_input(text);
                true
            }
            None => false,
        }
    }

    pub fn set_input(&mut self, text: &str) {
        self.input = text.to_string();
        self.cursor = self.input.chars().count();
    }

    pub fn last_role(&self) -> Option<ChatRole> {
        self.messages.last().map(|m| m.role)
    }

    // Input editing

    pub fn insert_char(&mut self, c: char) {
        let byte_pos = char_to_byte_index(&self.input, self.cursor);
        self.input.insert(byte_pos, c);
        self.cursor += 1;
    }

    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let byte_pos = char_to_byte_index(&self.input, self.cursor);
            self.input.remove(byte_pos);
        }
    }

    pub fn delete(&mut self) {
        if self.cursor < self.input.chars().count() {
            let byte_pos = char_to_byte_index(&self.input, self.cursor);
            self.input.remove(byte_pos);
        }
    }

    pub fn cursor_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn cursor_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.input.chars().count());
    }

    pub fn cursor_home(&mut self) {
        self.cursor = 0;
    }

    pub fn cursor_end(&mut self) {
        self.cursor = self.input.chars().count();
    }
}
