//! Unified error types for `PlaylistBuddy`.
//!
//! Every fallible operation in the crate returns [`Result`]. User-facing failures
//! (bad input, missing playlist, wrong owner) are answered with a localized reply
//! and never reach this type; what ends up here is unexpected and gets logged by
//! the framework error handler.

use thiserror::Error;

/// Application error type
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid or unreadable configuration
    #[error("Configuration error: {message}")]
    Config {
        /// What was wrong with the configuration
        message: String,
    },

    /// Database operation failed
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Playlist with the given id does not exist
    #[error("Playlist not found: {id}")]
    PlaylistNotFound {
        /// Requested playlist id
        id: String,
    },

    /// The Lavalink node answered with an error or an unexpected payload
    #[error("Audio backend error: {message}")]
    Audio {
        /// Message reported by the node
        message: String,
    },

    /// HTTP transport failure while talking to the Lavalink node
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Joining or driving a voice connection failed
    #[error("Voice error: {0}")]
    Voice(#[from] songbird::error::JoinError),

    /// `update` or `follow_up` was called on a reply session before `acknowledge`
    #[error("Reply was never acknowledged")]
    NotAcknowledged,

    /// Command was used outside of a guild
    #[error("Command requires a guild")]
    GuildOnly,

    /// I/O failure (reading configuration or locale files)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Required environment variable missing
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    /// Formatting into a reply buffer failed
    #[error("Formatting error: {0}")]
    Fmt(#[from] std::fmt::Error),

    /// A configured pattern failed to compile
    #[error("Invalid pattern: {0}")]
    Regex(#[from] regex::Error),

    /// Serenity/Poise framework failure
    #[error("Serenity/Poise framework error: {0}")]
    #[allow(clippy::enum_variant_names)]
    FrameworkError(Box<poise::serenity_prelude::Error>),
}

impl From<poise::serenity_prelude::Error> for Error {
    fn from(value: poise::serenity_prelude::Error) -> Self {
        Self::FrameworkError(Box::new(value))
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
