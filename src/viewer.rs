// SPDX-License-Identifier: MPL-2.0
//! The rendering surface a gallery drives.
//!
//! The pop-up itself (backdrop, container, transitions) lives outside the
//! core; this module defines the narrow handle the gallery calls into. The
//! handle is passed explicitly per call, never looked up globally, so one
//! page-wide surface can serve several galleries and tests can substitute
//! a recording double.

use crate::item::Item;

/// Which navigation buttons the surface should show for the current item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NavigationVisibility {
    /// Show the "previous" control.
    pub prev: bool,
    /// Show the "next" control.
    pub next: bool,
}

/// A rendering surface for the currently selected item.
///
/// Exactly one gallery owns the surface at a time; opening always resets it
/// first, which is what serializes competing opens from coexisting
/// galleries. Load failures are the surface's concern and degrade to an
/// "unavailable" indicator rather than reaching the gallery.
pub trait Viewer {
    /// Clears all viewer state, releasing whatever was displayed.
    fn reset(&mut self);

    /// Clears displayed content but keeps the backdrop up, so the next
    /// `open` cross-fades instead of flashing.
    fn hide(&mut self);

    /// Displays an item with the given navigation controls.
    fn open(&mut self, item: &Item, nav: NavigationVisibility);

    /// `true` while the surface is showing content.
    fn visible(&self) -> bool;
}

/// Every call a [`RecordingViewer`] has observed, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewerCall {
    Reset,
    Hide,
    Open {
        item: Item,
        nav: NavigationVisibility,
    },
}

/// A [`Viewer`] that records its call sequence instead of rendering.
///
/// Backs the gallery and history tests; also usable as a skeleton for
/// headless embedders.
#[derive(Debug, Default)]
pub struct RecordingViewer {
    visible: bool,
    calls: Vec<ViewerCall>,
}

impl RecordingViewer {
    /// Creates an idle surface with an empty call log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the observed calls in order.
    #[must_use]
    pub fn calls(&self) -> &[ViewerCall] {
        &self.calls
    }

    /// Returns the most recently opened item and its controls.
    #[must_use]
    pub fn last_open(&self) -> Option<(&Item, NavigationVisibility)> {
        self.calls.iter().rev().find_map(|call| match call {
            ViewerCall::Open { item, nav } => Some((item, *nav)),
            _ => None,
        })
    }

    /// Returns how many `open` calls have been observed.
    #[must_use]
    pub fn open_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|call| matches!(call, ViewerCall::Open { .. }))
            .count()
    }
}

impl Viewer for RecordingViewer {
    fn reset(&mut self) {
        self.visible = false;
        self.calls.push(ViewerCall::Reset);
    }

    fn hide(&mut self) {
        self.visible = false;
        self.calls.push(ViewerCall::Hide);
    }

    fn open(&mut self, item: &Item, nav: NavigationVisibility) {
        self.visible = true;
        self.calls.push(ViewerCall::Open {
            item: item.clone(),
            nav,
        });
    }

    fn visible(&self) -> bool {
        self.visible
    }
}

/// A [`Viewer`] that renders nothing, tracking only visibility.
///
/// For benchmarks and embedders that want gallery semantics without a
/// surface behind them.
#[derive(Debug, Default)]
pub struct NullViewer {
    visible: bool,
}

impl NullViewer {
    /// Creates an idle surface.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Viewer for NullViewer {
    fn reset(&mut self) {
        self.visible = false;
    }

    fn hide(&mut self) {
        self.visible = false;
    }

    fn open(&mut self, _item: &Item, _nav: NavigationVisibility) {
        self.visible = true;
    }

    fn visible(&self) -> bool {
        self.visible
    }
}
