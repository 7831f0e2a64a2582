// SPDX-License-Identifier: MPL-2.0
//! Media condition evaluation against a viewport.
//!
//! Evaluates the conjunctive subset of media queries that picture sources
//! commonly carry: `(min-width: 600px)`, `(orientation: landscape)` and
//! friends, joined by `and`. Anything outside that subset evaluates to
//! `false`, so an unrecognized condition never selects a source by accident.

/// The viewport a media condition is evaluated against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MediaEnv {
    viewport_width: f32,
    viewport_height: f32,
}

impl MediaEnv {
    /// Creates an environment for a viewport of the given CSS pixel size.
    #[must_use]
    pub fn new(viewport_width: f32, viewport_height: f32) -> Self {
        Self {
            viewport_width,
            viewport_height,
        }
    }

    /// Returns the viewport width in CSS pixels.
    #[must_use]
    pub fn viewport_width(&self) -> f32 {
        self.viewport_width
    }

    /// Returns the viewport height in CSS pixels.
    #[must_use]
    pub fn viewport_height(&self) -> f32 {
        self.viewport_height
    }

    /// `true` when the viewport is wider than it is tall.
    #[must_use]
    pub fn is_landscape(&self) -> bool {
        self.viewport_width > self.viewport_height
    }

    /// Evaluates a media condition against this viewport.
    ///
    /// The supported grammar is a conjunction of parenthesized clauses joined
    /// by `and`: `min-width`, `max-width`, `min-height` and `max-height` with
    /// `px` values, `orientation` with `landscape` or `portrait`, and the
    /// bare keyword `all`. A blank condition matches unconditionally. Any
    /// clause outside the grammar makes the whole condition `false`.
    #[must_use]
    pub fn matches(&self, condition: &str) -> bool {
        let condition = condition.trim();
        if condition.is_empty() {
            return true;
        }
        condition
            .split(" and ")
            .all(|clause| self.matches_clause(clause))
    }

    fn matches_clause(&self, clause: &str) -> bool {
        let clause = clause
            .trim()
            .trim_start_matches('(')
            .trim_end_matches(')')
            .trim();
        let Some((feature, value)) = clause.split_once(':') else {
            // A bare keyword clause; only the universal match is known.
            return clause.eq_ignore_ascii_case("all");
        };
        let feature = feature.trim().to_ascii_lowercase();
        let value = value.trim();
        match feature.as_str() {
            "min-width" => parse_px(value).is_some_and(|v| self.viewport_width >= v),
            "max-width" => parse_px(value).is_some_and(|v| self.viewport_width <= v),
            "min-height" => parse_px(value).is_some_and(|v| self.viewport_height >= v),
            "max-height" => parse_px(value).is_some_and(|v| self.viewport_height <= v),
            "orientation" => match value.to_ascii_lowercase().as_str() {
                "landscape" => self.is_landscape(),
                "portrait" => !self.is_landscape(),
                _ => false,
            },
            _ => false,
        }
    }
}

/// Parses a `px` length; other units are unsupported and yield `None`.
fn parse_px(value: &str) -> Option<f32> {
    value.trim().strip_suffix("px")?.trim_end().parse().ok()
}
