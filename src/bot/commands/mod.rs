//! Discord command implementations organized by category.

#![allow(clippy::too_long_first_doc_paragraph)]

/// General utility commands
pub mod general;

/// Music playback commands
pub mod music;

/// Playlist management commands
pub mod playlist;

/// Per-user and per-guild settings
pub mod settings;

use crate::{bot::BotData, errors::Error};

// Export commands
pub use general::*;
pub use music::*;
pub use playlist::*;
pub use settings::*;

/// Every command the framework registers
#[must_use]
pub fn all() -> Vec<poise::Command<BotData, Error>> {
    vec![
        playlist::playlist(),
        music::play(),
        settings::maxlength(),
        settings::language(),
        general::ping(),
        general::help(),
    ]
}

/// Trimmed argument, `None` when missing or blank
pub(crate) fn non_empty_arg(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
