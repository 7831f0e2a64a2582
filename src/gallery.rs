// SPDX-License-Identifier: MPL-2.0
//! The navigable gallery state machine.
//!
//! A gallery owns an ordered list of items in their encoded form, so the
//! live list and the history snapshots share one representation and item
//! identity is a string comparison. It is either closed or open at an
//! index; navigation recomputes the index, re-renders through the viewer
//! handle passed per call, and records each shown item as a history frame
//! keyed by the gallery's session key. Restorations arrive back through
//! [`Gallery::handle_restore`].

use serde_json::Value;
use uuid::Uuid;

use crate::codec;
use crate::error::Result;
use crate::history::{FramePayload, HistoryStack};
use crate::item::Item;
use crate::options::GalleryOptions;
use crate::viewer::{NavigationVisibility, Viewer};

/// Where a gallery currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GalleryState {
    /// Nothing is displayed.
    Closed,
    /// The item at `index` is displayed.
    Open { index: usize },
}

/// A navigation request, as emitted by the viewer's controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationAction {
    First,
    Prev,
    Next,
    Last,
}

/// What to show when opening a gallery.
#[derive(Debug, Clone, Copy)]
pub enum OpenTarget<'a> {
    /// The first item.
    Default,
    /// An explicit position; out of range falls back to the first item.
    Index(usize),
    /// A specific item, located by identity; a miss falls back to the
    /// first item.
    Item(&'a Item),
}

impl Default for OpenTarget<'_> {
    fn default() -> Self {
        OpenTarget::Default
    }
}

/// An ordered, navigable collection of items bound to one session key.
#[derive(Debug)]
pub struct Gallery {
    /// Encoded items, in display order.
    items: Vec<String>,
    options: GalleryOptions,
    state: GalleryState,
    session_key: String,
    epoch: u64,
}

impl Gallery {
    /// Creates an empty gallery with a fresh random session key.
    #[must_use]
    pub fn new(options: GalleryOptions) -> Self {
        Self {
            items: Vec::new(),
            options,
            state: GalleryState::Closed,
            session_key: Uuid::new_v4().to_string(),
            epoch: 0,
        }
    }

    /// Creates a gallery holding the given items in order.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::Error::Codec`] if an item fails to encode.
    pub fn from_items(options: GalleryOptions, items: &[Item]) -> Result<Self> {
        let mut gallery = Self::new(options);
        for item in items {
            gallery.insert(item)?;
        }
        Ok(gallery)
    }

    /// Returns the number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// `true` when the gallery holds no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// `true` while the gallery holds no items and ignores restore events.
    ///
    /// Embedders detach their popstate listener for an idle gallery and
    /// re-attach it after the next insertion.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the current state.
    #[must_use]
    pub fn state(&self) -> GalleryState {
        self.state
    }

    /// Returns the open index, if any.
    #[must_use]
    pub fn index(&self) -> Option<usize> {
        match self.state {
            GalleryState::Closed => None,
            GalleryState::Open { index } => Some(index),
        }
    }

    /// Returns the gallery's behavior switches.
    #[must_use]
    pub fn options(&self) -> GalleryOptions {
        self.options
    }

    /// Returns the session key attributing history frames to this gallery.
    #[must_use]
    pub fn session_key(&self) -> &str {
        &self.session_key
    }

    /// Returns the current load epoch.
    ///
    /// Every render and close bumps the epoch. Embedders snapshot it when
    /// starting an asynchronous load and drop completions whose snapshot no
    /// longer matches, so a stale completion for a superseded item can
    /// never reveal itself.
    #[must_use]
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Decodes and returns the item at `index`.
    #[must_use]
    pub fn item_at(&self, index: usize) -> Option<Item> {
        let encoded = self.items.get(index)?;
        codec::decode(encoded).ok()
    }

    /// Decodes and returns the currently displayed item.
    #[must_use]
    pub fn current_item(&self) -> Option<Item> {
        self.index().and_then(|index| self.item_at(index))
    }

    /// Appends an item; this also re-arms an idle gallery.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::Error::Codec`] if the item fails to encode.
    pub fn insert(&mut self, item: &Item) -> Result<()> {
        let encoded = codec::encode(item)?;
        self.items.push(encoded);
        Ok(())
    }

    /// Removes an item by identity; returns whether it was present.
    ///
    /// The displayed item is never reindexed away by removals elsewhere in
    /// the list. Removing the displayed item itself shifts the position onto
    /// its successor, clamped to the new end, without re-rendering; the
    /// content changes on the next action. Removing the final item puts the
    /// gallery into idle mode until an insertion re-arms it.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::Error::Codec`] if the item fails to encode.
    pub fn remove(&mut self, item: &Item) -> Result<bool> {
        let encoded = codec::encode(item)?;
        let Some(position) = self.items.iter().position(|stored| *stored == encoded) else {
            return Ok(false);
        };
        self.items.remove(position);
        if let GalleryState::Open { index } = self.state {
            if self.items.is_empty() {
                self.state = GalleryState::Closed;
                self.epoch += 1;
            } else if position < index {
                self.state = GalleryState::Open { index: index - 1 };
            } else if position == index {
                let successor = index.min(self.items.len() - 1);
                self.state = GalleryState::Open { index: successor };
            }
        }
        Ok(true)
    }

    /// Opens the gallery at the resolved target and records the history
    /// frame.
    ///
    /// Opening an empty gallery is a no-op: nothing renders, nothing is
    /// written. Otherwise the viewer is reset (or cross-faded when already
    /// visible), the item rendered, and the frame pushed when the current
    /// history frame is not this gallery's, or replaced when it is.
    pub fn open(
        &mut self,
        target: OpenTarget<'_>,
        viewer: &mut dyn Viewer,
        history: &mut dyn HistoryStack,
    ) {
        if self.items.is_empty() {
            tracing::debug!("open ignored on an empty gallery");
            return;
        }
        let index = self.resolve_target(target);
        self.render(index, viewer);
        self.record_frame(history);
    }

    /// Applies a navigation action while open.
    ///
    /// `Prev`/`Next` clamp at the ends, or wrap when looping is enabled;
    /// `First`/`Last` always jump. A move to the current index and any
    /// action while closed are no-ops.
    pub fn navigate(
        &mut self,
        action: NavigationAction,
        viewer: &mut dyn Viewer,
        history: &mut dyn HistoryStack,
    ) {
        let GalleryState::Open { index } = self.state else {
            tracing::debug!(?action, "navigation ignored while closed");
            return;
        };
        let Some(target) = step(index, action, self.items.len(), self.options.looping) else {
            return;
        };
        if target == index {
            return;
        }
        self.render(target, viewer);
        self.record_frame(history);
    }

    /// Closes the gallery.
    ///
    /// When the current history frame belongs to this gallery's open
    /// sequence, the frame is unwound with a back navigation and the
    /// resulting restore event completes the teardown; otherwise the viewer
    /// is reset directly.
    pub fn close(&mut self, viewer: &mut dyn Viewer, history: &mut dyn HistoryStack) {
        if self.state == GalleryState::Closed {
            return;
        }
        self.state = GalleryState::Closed;
        self.epoch += 1;
        if self.owns_current_frame(history) {
            history.back();
        } else {
            viewer.reset();
        }
    }

    /// Handles the viewer reporting that the user dismissed it.
    pub fn handle_viewer_closed(&mut self, viewer: &mut dyn Viewer, history: &mut dyn HistoryStack) {
        self.close(viewer, history);
    }

    /// Handles a browser-driven restoration of a history frame.
    ///
    /// The embedder forwards every popstate state here. A frame without a
    /// `boxsharp` payload means the user navigated back past the viewer and
    /// forces a close. A payload keyed for another gallery is ignored
    /// entirely. This gallery's own payload re-opens the restored item
    /// without writing history, unless it is already showing.
    pub fn handle_restore(&mut self, restored: Option<&Value>, viewer: &mut dyn Viewer) {
        if self.items.is_empty() {
            tracing::debug!("restore ignored by an idle gallery");
            return;
        }
        let Some(payload) = restored.and_then(FramePayload::peel) else {
            tracing::debug!("history left the viewer's frames, closing");
            self.force_close(viewer);
            return;
        };
        if payload.key != self.session_key {
            tracing::debug!("restore for another gallery ignored");
            return;
        }
        if let GalleryState::Open { index } = self.state {
            if viewer.visible() && self.items.get(index) == Some(&payload.item) {
                return;
            }
        }
        let index = self
            .items
            .iter()
            .position(|stored| *stored == payload.item)
            .unwrap_or_else(|| {
                tracing::warn!("restored item no longer in the gallery, showing the first");
                0
            });
        self.render(index, viewer);
    }

    /// Derives which navigation buttons apply to the current position.
    #[must_use]
    pub fn navigation_visibility(&self) -> NavigationVisibility {
        match self.state {
            GalleryState::Closed => NavigationVisibility::default(),
            GalleryState::Open { index } => NavigationVisibility {
                prev: self.options.looping || index > 0,
                next: self.options.looping || index + 1 < self.items.len(),
            },
        }
    }

    fn resolve_target(&self, target: OpenTarget<'_>) -> usize {
        match target {
            OpenTarget::Default => 0,
            OpenTarget::Index(index) => {
                if index < self.items.len() {
                    index
                } else {
                    tracing::debug!(index, "open index out of range, showing the first item");
                    0
                }
            }
            OpenTarget::Item(item) => self.position_of(item).unwrap_or_else(|| {
                tracing::debug!("open item not found by identity, showing the first item");
                0
            }),
        }
    }

    fn position_of(&self, item: &Item) -> Option<usize> {
        let encoded = codec::encode(item).ok()?;
        self.items.iter().position(|stored| *stored == encoded)
    }

    /// Moves to `index` and renders it, bumping the load epoch so pending
    /// completions from the previous item are invalidated.
    fn render(&mut self, index: usize, viewer: &mut dyn Viewer) {
        if viewer.visible() {
            viewer.hide();
        } else {
            viewer.reset();
        }
        self.state = GalleryState::Open { index };
        self.epoch += 1;
        let item = self.decoded(index);
        viewer.open(&item, self.navigation_visibility());
    }

    fn decoded(&self, index: usize) -> Item {
        match codec::decode(&self.items[index]) {
            Ok(item) => item,
            Err(error) => {
                tracing::warn!(%error, index, "stored item failed to decode, showing unavailable");
                Item::default()
            }
        }
    }

    fn record_frame(&self, history: &mut dyn HistoryStack) {
        let GalleryState::Open { index } = self.state else {
            return;
        };
        let payload = FramePayload::new(self.session_key.clone(), self.items[index].clone());
        let state = payload.wrap();
        if self.owns_current_frame(history) {
            history.replace(state);
        } else {
            history.push(state);
        }
    }

    fn owns_current_frame(&self, history: &dyn HistoryStack) -> bool {
        history
            .current()
            .and_then(FramePayload::peel)
            .is_some_and(|payload| payload.key == self.session_key)
    }

    fn force_close(&mut self, viewer: &mut dyn Viewer) {
        if self.state != GalleryState::Closed {
            self.state = GalleryState::Closed;
            self.epoch += 1;
        }
        if viewer.visible() {
            viewer.reset();
        }
    }
}

/// Computes the index a navigation action leads to, or `None` for a
/// clamped boundary. Pure; `len` must be non-zero.
fn step(index: usize, action: NavigationAction, len: usize, looping: bool) -> Option<usize> {
    match action {
        NavigationAction::First => Some(0),
        NavigationAction::Last => Some(len - 1),
        NavigationAction::Prev => {
            if index > 0 {
                Some(index - 1)
            } else if looping {
                Some(len - 1)
            } else {
                None
            }
        }
        NavigationAction::Next => {
            if index + 1 < len {
                Some(index + 1)
            } else if looping {
                Some(0)
            } else {
                None
            }
        }
    }
}
