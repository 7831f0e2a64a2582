// SPDX-License-Identifier: MPL-2.0
//! `boxsharp` is the headless core of a pop-up media viewer ("lightbox").
//!
//! It resolves loosely-specified media descriptors into a canonical item
//! model, drives a navigable gallery state machine against an external
//! rendering surface, and keeps browser history in sync so back/forward
//! traversal restores what the viewer showed. Rendering, event wiring, and
//! document scanning stay outside; the crate only decides what to display.

#![doc(html_root_url = "https://docs.rs/boxsharp/0.1.0")]

pub mod codec;
pub mod drag;
pub mod error;
pub mod gallery;
pub mod history;
pub mod item;
pub mod media_query;
pub mod options;
pub mod srcset;
pub mod viewer;

#[cfg(test)]
mod test_utils;
