// SPDX-License-Identifier: MPL-2.0
//! Gallery and viewer options, with a TOML file layer for embedders that
//! persist presentation defaults.
//!
//! # Examples
//!
//! ```no_run
//! use boxsharp::options::{self, Options};
//! use std::path::Path;
//!
//! let mut options = Options::default();
//! options.gallery.looping = true;
//!
//! let path = Path::new("boxsharp.toml");
//! options::save_to_path(&options, path).expect("Failed to save options");
//! let loaded = options::load_from_path(path).expect("Failed to load options");
//! assert!(loaded.gallery.looping);
//! ```

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Loading-indicator delay before content resolves, in milliseconds.
pub const DEFAULT_LOADING_DELAY_MS: u64 = 500;

/// Behavior switches for one gallery.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GalleryOptions {
    /// Wrap around at the ends instead of clamping.
    #[serde(rename = "loop")]
    pub looping: bool,
}

/// Behavior switches for the rendering surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerOptions {
    /// How long to wait before showing the loading indicator. Content that
    /// resolves earlier cancels the indicator entirely.
    pub loading_delay_ms: u64,
}

impl Default for ViewerOptions {
    fn default() -> Self {
        Self {
            loading_delay_ms: DEFAULT_LOADING_DELAY_MS,
        }
    }
}

/// Everything an embedder can configure, grouped by component.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    pub gallery: GalleryOptions,
    pub viewer: ViewerOptions,
}

/// Loads options from a TOML file, falling back to defaults when the file
/// does not exist or its content does not parse.
///
/// # Errors
///
/// Returns [`crate::error::Error::Config`] when an existing file cannot be
/// read.
pub fn load_from_path(path: &Path) -> Result<Options> {
    if !path.exists() {
        return Ok(Options::default());
    }
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content).unwrap_or_default())
}

/// Saves options as TOML, creating parent directories as needed.
///
/// # Errors
///
/// Returns [`crate::error::Error::Config`] when serialization or writing fails.
pub fn save_to_path(options: &Options, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(options)?;
    fs::write(path, content)?;
    Ok(())
}
