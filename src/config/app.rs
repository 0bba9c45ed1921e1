//! Application configuration loading from config.toml
//!
//! The bot token is never stored here; it is read from `DISCORD_BOT_TOKEN` right
//! before the client starts. Everything else (prefix, owner, player limits, the
//! Lavalink node) lives in a TOML file whose optional keys fall back to defaults.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// General bot settings
    #[serde(default)]
    pub bot: BotConfig,
    /// Player and playlist limits
    #[serde(default)]
    pub player: PlayerConfig,
    /// Lavalink node connection
    pub lavalink: LavalinkConfig,
    /// Database settings
    #[serde(default)]
    pub database: DatabaseConfig,
}

/// `[bot]` section
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct BotConfig {
    /// Prefix for text commands
    pub prefix: String,
    /// Discord user id allowed to run owner-tier commands
    pub owner_id: Option<u64>,
    /// Fallback locale code when neither the guild nor the user has one
    pub language: String,
    /// Color used for every reply embed
    pub embed_color: u32,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            prefix: "!".to_string(),
            owner_id: None,
            language: "en".to_string(),
            embed_color: 0x002B_2D31,
        }
    }
}

/// `[player]` section
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct PlayerConfig {
    /// Volume a freshly created player starts with
    pub default_volume: u16,
    /// Maximum number of tracks a playlist may hold
    pub limit_track: usize,
    /// Maximum number of playlists a single user may own
    pub limit_playlist: usize,
    /// Render track titles without links
    pub avoid_suspend: bool,
    /// Lavalink search prefix used for plain-text queries (e.g. `ytsearch`)
    pub search_engine: String,
    /// Seed queries for autocomplete when the user has not typed anything yet
    pub autocomplete_search: Vec<String>,
    /// Patterns recognising input that is already a playable link
    pub direct_link_patterns: Vec<String>,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            default_volume: 100,
            limit_track: 50,
            limit_playlist: 10,
            avoid_suspend: false,
            search_engine: "ytsearch".to_string(),
            autocomplete_search: vec![
                "lofi hip hop".to_string(),
                "synthwave".to_string(),
                "jazz piano".to_string(),
            ],
            direct_link_patterns: default_direct_link_patterns(),
        }
    }
}

fn default_direct_link_patterns() -> Vec<String> {
    [
        r"^https?://(?:www\.|music\.|m\.)?youtube\.com/",
        r"^https?://youtu\.be/",
        r"^https?://(?:www\.|m\.)?soundcloud\.com/",
        r"^https?://open\.spotify\.com/",
        r"^https?://(?:www\.)?deezer\.com/",
        r"^https?://music\.apple\.com/",
        r"^https?://(?:www\.)?twitch\.tv/",
        r"^https?://[a-z0-9-]+\.bandcamp\.com/",
        r"^https?://\S+\.(?:mp3|ogg|flac|wav|m4a)$",
    ]
    .into_iter()
    .map(str::to_string)
    .collect()
}

/// `[lavalink]` section
#[derive(Debug, Deserialize, Clone)]
pub struct LavalinkConfig {
    /// Base URL of the node REST API (e.g. `http://localhost:2333`)
    pub url: String,
    /// Node password sent as the `Authorization` header
    pub password: String,
}

/// `[database]` section
#[derive(Debug, Deserialize, Clone, Default)]
pub struct DatabaseConfig {
    /// Connection URL; `DATABASE_URL` overrides it
    pub url: Option<String>,
}

/// Loads the application configuration from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - Required fields are missing
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path_ref = path.as_ref();
    tracing::debug!(path = ?path_ref, "Loading configuration");
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read config file {}: {e}", path_ref.display()),
    })?;

    parse_config(&contents)
}

/// Parses configuration from TOML text
pub fn parse_config(contents: &str) -> Result<AppConfig> {
    toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

/// Loads configuration from `CONFIG_PATH`, or `./config.toml` when unset
pub fn load_default_config() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    load_config(path)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_parse_minimal_config_uses_defaults() {
        let toml_str = r#"
            [lavalink]
            url = "http://localhost:2333"
            password = "youshallnotpass"
        "#;

        let config = parse_config(toml_str).unwrap();
        assert_eq!(config.bot.prefix, "!");
        assert_eq!(config.bot.language, "en");
        assert_eq!(config.player.limit_track, 50);
        assert_eq!(config.player.search_engine, "ytsearch");
        assert!(!config.player.direct_link_patterns.is_empty());
        assert_eq!(config.lavalink.password, "youshallnotpass");
        assert!(config.database.url.is_none());
    }

    #[test]
    fn test_parse_full_config() {
        let toml_str = r#"
            [bot]
            prefix = "?"
            owner_id = 123456789012345678
            language = "vi"
            embed_color = 16711680

            [player]
            limit_track = 5
            avoid_suspend = true
            autocomplete_search = ["chill"]

            [lavalink]
            url = "http://lavalink:2333"
            password = "secret"

            [database]
            url = "sqlite::memory:"
        "#;

        let config = parse_config(toml_str).unwrap();
        assert_eq!(config.bot.prefix, "?");
        assert_eq!(config.bot.owner_id, Some(123_456_789_012_345_678));
        assert_eq!(config.bot.embed_color, 0x00FF_0000);
        assert_eq!(config.player.limit_track, 5);
        // Unset keys in a present section still default
        assert_eq!(config.player.limit_playlist, 10);
        assert!(config.player.avoid_suspend);
        assert_eq!(config.player.autocomplete_search, vec!["chill".to_string()]);
        assert_eq!(config.lavalink.url, "http://lavalink:2333");
        assert_eq!(config.database.url.as_deref(), Some("sqlite::memory:"));
    }

    #[test]
    fn test_missing_lavalink_section_is_an_error() {
        let result = parse_config("[bot]\nprefix = \"!\"\n");
        assert!(matches!(result, Err(Error::Config { .. })));
    }
}
