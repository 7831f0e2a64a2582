// SPDX-License-Identifier: MPL-2.0
//! History-stack abstraction and the session frame payload.
//!
//! A gallery records its open item as the opaque state of a browser history
//! frame so back/forward navigation restores it. The stack itself sits
//! behind the narrow [`HistoryStack`] trait; [`MemoryHistory`] implements it
//! over a plain vector for tests and headless embedders, while browser-backed
//! adapters live outside the core.
//!
//! Frame attribution is by payload shape and key: a frame state without a
//! `"boxsharp"` member is foreign, and a `boxsharp` payload whose key differs
//! from a gallery's session key belongs to another gallery on the same page.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Member name marking a history frame state as viewer-owned.
pub const PAYLOAD_KEY: &str = "boxsharp";

/// A navigation stack of opaque per-frame states.
///
/// Mirrors the browser history API surface the gallery needs: writing the
/// current depth, adding a depth, reading the current state, and unwinding
/// one step. Restorations travel the other way; the embedder forwards them
/// to `Gallery::handle_restore`.
pub trait HistoryStack {
    /// Adds a frame above the current one and moves to it, discarding any
    /// forward entries.
    fn push(&mut self, state: Value);

    /// Overwrites the current frame's state, keeping the depth.
    fn replace(&mut self, state: Value);

    /// Returns the current frame's state.
    fn current(&self) -> Option<&Value>;

    /// Moves one frame back, as if the user pressed the back button.
    fn back(&mut self);
}

/// The viewer-owned payload carried by one history frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FramePayload {
    /// Session key of the gallery that wrote the frame.
    pub key: String,
    /// The displayed item in its encoded form.
    pub item: String,
}

impl FramePayload {
    /// Creates a payload for one gallery and encoded item.
    #[must_use]
    pub fn new(key: impl Into<String>, item: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            item: item.into(),
        }
    }

    /// Wraps the payload into a frame state: `{"boxsharp": {"key", "item"}}`.
    #[must_use]
    pub fn wrap(&self) -> Value {
        let inner = serde_json::json!({ "key": self.key, "item": self.item });
        let mut state = serde_json::Map::new();
        state.insert(PAYLOAD_KEY.to_owned(), inner);
        Value::Object(state)
    }

    /// Reads a payload back out of a frame state.
    ///
    /// Returns `None` for foreign frames (no `boxsharp` member) and for
    /// payloads that lost their shape, which are logged and treated as
    /// foreign rather than failing the restore path.
    #[must_use]
    pub fn peel(state: &Value) -> Option<Self> {
        let inner = state.get(PAYLOAD_KEY)?;
        match serde_json::from_value(inner.clone()) {
            Ok(payload) => Some(payload),
            Err(error) => {
                tracing::warn!(%error, "malformed history frame payload");
                None
            }
        }
    }
}

/// An in-memory [`HistoryStack`] with browser-like cursor semantics.
///
/// Starts with one null-state frame, the page's own entry. `push` truncates
/// forward entries exactly like the browser history API;
/// [`back`](HistoryStack::back) and [`forward`](Self::forward) move the
/// cursor without dropping frames, so tests can replay a user's back/forward
/// traversal and feed the restored state to `Gallery::handle_restore`.
#[derive(Debug)]
pub struct MemoryHistory {
    frames: Vec<Value>,
    cursor: usize,
}

impl MemoryHistory {
    /// Creates a stack holding only the initial page entry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            frames: vec![Value::Null],
            cursor: 0,
        }
    }

    /// Returns the number of frames including the initial entry.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Returns the current frame position, zero-based from the initial entry.
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Moves one frame forward if the user has somewhere to go.
    pub fn forward(&mut self) {
        if self.cursor + 1 < self.frames.len() {
            self.cursor += 1;
        }
    }
}

impl Default for MemoryHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryStack for MemoryHistory {
    fn push(&mut self, state: Value) {
        self.frames.truncate(self.cursor + 1);
        self.frames.push(state);
        self.cursor += 1;
    }

    fn replace(&mut self, state: Value) {
        self.frames[self.cursor] = state;
    }

    fn current(&self) -> Option<&Value> {
        self.frames.get(self.cursor)
    }

    fn back(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
        } else {
            tracing::debug!("history back ignored at the initial entry");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_and_peel_round_trip() {
        let payload = FramePayload::new("session-1", r#"{"type":"item"}"#);
        let state = payload.wrap();

        assert!(state.get(PAYLOAD_KEY).is_some());
        assert_eq!(FramePayload::peel(&state), Some(payload));
    }

    #[test]
    fn peel_rejects_foreign_and_malformed_states() {
        assert_eq!(FramePayload::peel(&Value::Null), None);
        assert_eq!(FramePayload::peel(&serde_json::json!({"other": 1})), None);
        assert_eq!(
            FramePayload::peel(&serde_json::json!({PAYLOAD_KEY: {"key": 42}})),
            None
        );
    }

    #[test]
    fn new_stack_holds_the_initial_page_entry() {
        let history = MemoryHistory::new();
        assert_eq!(history.depth(), 1);
        assert_eq!(history.cursor(), 0);
        assert_eq!(history.current(), Some(&Value::Null));
    }

    #[test]
    fn push_adds_a_depth_and_replace_keeps_it() {
        let mut history = MemoryHistory::new();
        history.push(serde_json::json!({"a": 1}));
        assert_eq!(history.depth(), 2);
        assert_eq!(history.cursor(), 1);

        history.replace(serde_json::json!({"a": 2}));
        assert_eq!(history.depth(), 2);
        assert_eq!(history.current(), Some(&serde_json::json!({"a": 2})));
    }

    #[test]
    fn back_and_forward_move_the_cursor_over_kept_frames() {
        let mut history = MemoryHistory::new();
        history.push(serde_json::json!({"a": 1}));

        history.back();
        assert_eq!(history.current(), Some(&Value::Null));
        assert_eq!(history.depth(), 2);

        history.forward();
        assert_eq!(history.current(), Some(&serde_json::json!({"a": 1})));
    }

    #[test]
    fn back_at_the_initial_entry_is_a_no_op() {
        let mut history = MemoryHistory::new();
        history.back();
        assert_eq!(history.cursor(), 0);
        assert_eq!(history.depth(), 1);
    }

    #[test]
    fn push_after_back_discards_the_forward_branch() {
        let mut history = MemoryHistory::new();
        history.push(serde_json::json!({"a": 1}));
        history.push(serde_json::json!({"a": 2}));
        history.back();
        history.back();

        history.push(serde_json::json!({"b": 1}));
        assert_eq!(history.depth(), 2);
        assert_eq!(history.current(), Some(&serde_json::json!({"b": 1})));

        // The discarded branch is gone even after moving forward.
        history.forward();
        assert_eq!(history.current(), Some(&serde_json::json!({"b": 1})));
    }
}
