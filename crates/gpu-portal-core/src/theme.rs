//! Light/dark colour scheme for the top bar toggle.
//!
//! The choice is kept under [`STORAGE_KEY_THEME`] so it survives reloads.
//! The UI applies it by toggling [`DARK_CLASS`] on the document root.

use crate::error::Result;
use crate::session::SessionStorage;
use serde::{Deserialize, Serialize};
use tracing::warn;

pub const STORAGE_KEY_THEME: &str = "gpu_portal_theme";

/// Class set on the document root while the dark scheme is active.
pub const DARK_CLASS: &str = "dark";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn is_dark(self) -> bool {
        self == Theme::Dark
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }

    /// Label for the button that switches away from this theme.
    pub fn toggle_label(self) -> &'static str {
        match self {
            Theme::Light => "Switch to dark mode",
            Theme::Dark => "Switch to light mode",
        }
    }

    /// Stored theme, or the default when nothing (or garbage) is stored.
    pub fn restore<S: SessionStorage>(storage: &S) -> Result<Self> {
        let Some(raw) = storage.get(STORAGE_KEY_THEME)? else {
            return Ok(Theme::default());
        };
        Ok(Theme::parse(&raw).unwrap_or_else(|| {
            warn!(value = %raw, "ignoring unknown stored theme");
            Theme::default()
        }))
    }

    pub fn save<S: SessionStorage>(self, storage: &mut S) -> Result<()> {
        storage.set(STORAGE_KEY_THEME, self.as_str())
    }
}
