//! Watcher configuration
//!
//! Loaded from TOML either as a top-level table or under `[ink]`:
//!
//! ```toml
//! [ink]
//! touch_mode = true
//! enter_delay_ms = 150
//! leave_delay_ms = 450
//! ```

use inkwave_dom::Document;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{InkError, Result};

/// Default hold time between a teardown request and the leave transition
pub const DEFAULT_ENTER_DELAY_MS: u64 = 150;

/// Default fade time between the leave transition and disposal
pub const DEFAULT_LEAVE_DELAY_MS: u64 = 450;

/// Interaction watcher options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct InkConfig {
    /// Listen for touch instead of mouse and keyboard.
    /// `None` uses the document's touch capability.
    pub touch_mode: Option<bool>,
    pub enter_delay_ms: u64,
    pub leave_delay_ms: u64,
}

impl Default for InkConfig {
    fn default() -> Self {
        Self {
            touch_mode: None,
            enter_delay_ms: DEFAULT_ENTER_DELAY_MS,
            leave_delay_ms: DEFAULT_LEAVE_DELAY_MS,
        }
    }
}

impl InkConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Force touch or pointer mode
    pub fn touch_mode(mut self, touch: bool) -> Self {
        self.touch_mode = Some(touch);
        self
    }

    pub fn enter_delay_ms(mut self, ms: u64) -> Self {
        self.enter_delay_ms = ms;
        self
    }

    pub fn leave_delay_ms(mut self, ms: u64) -> Self {
        self.leave_delay_ms = ms;
        self
    }

    /// Whether the watcher should run in touch mode on this document
    pub fn resolve_touch_mode(&self, document: &Document) -> bool {
        self.touch_mode.unwrap_or_else(|| document.touch_capable())
    }

    /// Total time from a teardown request until the ripple is gone
    pub fn teardown_ms(&self) -> u64 {
        self.enter_delay_ms + self.leave_delay_ms
    }

    /// Parse from TOML text. Accepts the options at top level or in an `[ink]` table.
    pub fn from_toml_str(input: &str) -> Result<Self> {
        let mut table: toml::Table = input.parse()?;
        let section = match table.remove("ink") {
            Some(toml::Value::Table(section)) => section,
            Some(other) => {
                return Err(InkError::Config(format!(
                    "`ink` must be a table, found {}",
                    other.type_str()
                )))
            }
            None => table,
        };
        Ok(toml::Value::Table(section).try_into()?)
    }

    /// Load from a TOML file
    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }
}
