//! Shared test utilities for `PlaylistBuddy`.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test playlists with sensible defaults.

use crate::{
    audio::{Track, player::tests::track},
    core::playlist,
    entities,
    errors::{Error, Result},
};
use sea_orm::DatabaseConnection;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Creates a test playlist and returns it as stored.
///
/// # Defaults
/// * `name`: "Test Playlist"
/// * `description`: None
/// * `private`: false
pub async fn create_test_playlist(
    db: &DatabaseConnection,
    id: &str,
    owner: &str,
) -> Result<entities::playlist::Model> {
    playlist::create_playlist(db, id, owner, "Test Playlist").await?;
    // Read back so timestamps compare equal with later lookups
    playlist::get_playlist(db, id)
        .await?
        .ok_or_else(|| Error::PlaylistNotFound { id: id.to_string() })
}

/// `count` three-minute tracks titled "Track 0", "Track 1", ...
pub fn test_tracks(count: usize) -> Vec<Track> {
    (0..count)
        .map(|i| track(&format!("Track {i}"), 180_000))
        .collect()
}
