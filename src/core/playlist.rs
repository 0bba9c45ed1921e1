//! Playlist business logic - lookup, creation, track adds, edits and deletion.
//!
//! Every mutation that touches more than one row runs inside a database
//! transaction, so a failure never leaves a playlist half-written.

use crate::{
    audio::Track,
    entities::{Playlist, PlaylistTrack, playlist, playlist_track},
    errors::{Error, Result},
};
use rand::{Rng, distributions::Alphanumeric};
use sea_orm::{
    ActiveModelTrait, PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait, prelude::*,
    sea_query::Expr,
};
use std::sync::LazyLock;
use tracing::{error, info};

/// Characters allowed in a playlist id: ASCII word characters plus `&`, `.` and `-`
static PLAYLIST_ID_PATTERN: LazyLock<regex::Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)] // Literal pattern, covered by tests
    regex::Regex::new(r"^[A-Za-z0-9_&.-]+$").expect("playlist id pattern is valid")
});

const GENERATED_ID_LENGTH: usize = 8;

/// Whether `id` only uses the characters allowed in playlist ids
#[must_use]
pub fn is_valid_playlist_id(id: &str) -> bool {
    PLAYLIST_ID_PATTERN.is_match(id)
}

/// Random alphanumeric id for a new playlist
#[must_use]
pub fn generate_playlist_id() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(GENERATED_ID_LENGTH)
        .map(char::from)
        .collect()
}

/// Finds a playlist by id.
pub async fn get_playlist<C: ConnectionTrait>(
    db: &C,
    id: &str,
) -> Result<Option<playlist::Model>> {
    Playlist::find_by_id(id.to_string())
        .one(db)
        .await
        .map_err(Into::into)
}

/// Tracks of a playlist in playlist order.
pub async fn get_tracks(
    db: &DatabaseConnection,
    playlist_id: &str,
) -> Result<Vec<playlist_track::Model>> {
    PlaylistTrack::find()
        .filter(playlist_track::Column::PlaylistId.eq(playlist_id))
        .order_by_asc(playlist_track::Column::Position)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Number of tracks stored in a playlist.
pub async fn count_tracks<C: ConnectionTrait>(db: &C, playlist_id: &str) -> Result<u64> {
    PlaylistTrack::find()
        .filter(playlist_track::Column::PlaylistId.eq(playlist_id))
        .count(db)
        .await
        .map_err(Into::into)
}

/// Number of playlists owned by `owner`.
pub async fn count_owned(db: &DatabaseConnection, owner: &str) -> Result<u64> {
    Playlist::find()
        .filter(playlist::Column::Owner.eq(owner))
        .count(db)
        .await
        .map_err(Into::into)
}

/// Creates an empty public playlist.
///
/// # Errors
/// Returns an error if the name is empty, the id is malformed, or the insert fails
/// (including a primary key collision).
pub async fn create_playlist(
    db: &DatabaseConnection,
    id: &str,
    owner: &str,
    name: &str,
) -> Result<playlist::Model> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::Config {
            message: "Playlist name cannot be empty".to_string(),
        });
    }
    if !is_valid_playlist_id(id) {
        return Err(Error::Config {
            message: format!("Invalid playlist id: {id}"),
        });
    }

    let playlist = playlist::ActiveModel {
        id: Set(id.to_string()),
        owner: Set(owner.to_string()),
        name: Set(name.to_string()),
        description: Set(None),
        private: Set(false),
        created_at: Set(chrono::Utc::now()),
    };
    let model = playlist.insert(db).await?;
    info!(playlist_id = %model.id, owner, "Created playlist");
    Ok(model)
}

/// Result of adding tracks to a playlist
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    /// Tracks were stored
    Added {
        /// How many tracks were added
        count: usize,
        /// Track count after the add
        total: u64,
    },
    /// No playlist with that id
    NotFound,
    /// The requester does not own the playlist
    NotOwner,
    /// The add would push the playlist past the track limit; nothing was added
    LimitExceeded {
        /// Configured maximum
        limit: usize,
    },
}

/// Appends `tracks` to a playlist owned by `requester`.
///
/// All-or-nothing: if the resulting count would exceed `limit` nothing is added.
pub async fn add_tracks(
    db: &DatabaseConnection,
    playlist_id: &str,
    requester: &str,
    tracks: &[Track],
    limit: usize,
) -> Result<AddOutcome> {
    let txn = db.begin().await?;

    let Some(playlist) = get_playlist(&txn, playlist_id).await? else {
        return Ok(AddOutcome::NotFound);
    };
    if playlist.owner != requester {
        return Ok(AddOutcome::NotOwner);
    }

    let existing = count_tracks(&txn, playlist_id).await?;
    let total = existing + tracks.len() as u64;
    if total > limit as u64 {
        return Ok(AddOutcome::LimitExceeded { limit });
    }

    if !tracks.is_empty() {
        let rows = tracks
            .iter()
            .enumerate()
            .map(|(offset, track)| track_row(playlist_id, existing as usize + offset, track));
        PlaylistTrack::insert_many(rows).exec(&txn).await?;
    }

    txn.commit().await?;
    info!(playlist_id, count = tracks.len(), total, "Added tracks to playlist");

    Ok(AddOutcome::Added {
        count: tracks.len(),
        total,
    })
}

fn track_row(playlist_id: &str, position: usize, track: &Track) -> playlist_track::ActiveModel {
    playlist_track::ActiveModel {
        playlist_id: Set(playlist_id.to_string()),
        position: Set(i32::try_from(position).unwrap_or(i32::MAX)),
        title: Set(track.title.clone()),
        uri: Set(track.uri.clone()),
        length: Set(i64::try_from(track.duration_ms).unwrap_or(i64::MAX)),
        thumbnail: Set(track.artwork_url.clone()),
        author: Set(track.author.clone()),
        requester: Set(track.requester.map(|id| id.to_string())),
        ..Default::default()
    }
}

/// Editable playlist fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistDetails {
    /// Display name
    pub name: String,
    /// Description
    pub description: Option<String>,
    /// Visibility
    pub private: bool,
}

/// Overwrites name, description and visibility of an existing playlist.
pub async fn update_details(
    db: &DatabaseConnection,
    playlist: &playlist::Model,
    details: PlaylistDetails,
) -> Result<playlist::Model> {
    let mut active: playlist::ActiveModel = playlist.clone().into();
    active.name = Set(details.name);
    active.description = Set(details.description);
    active.private = Set(details.private);
    active.update(db).await.map_err(Into::into)
}

/// Moves a playlist to `new_id`, applying `details` on the way.
///
/// The copy under the new id, the track move and the delete of the old id run in
/// one transaction; a failure at any step rolls back and leaves the old record as
/// it was.
pub async fn rename_playlist(
    db: &DatabaseConnection,
    playlist: &playlist::Model,
    new_id: &str,
    details: PlaylistDetails,
) -> Result<playlist::Model> {
    let result = rename_in_transaction(db, playlist, new_id, details).await;
    if let Err(e) = &result {
        error!(
            old_id = %playlist.id,
            new_id,
            error = %e,
            "Playlist rename rolled back"
        );
    }
    result
}

async fn rename_in_transaction(
    db: &DatabaseConnection,
    playlist: &playlist::Model,
    new_id: &str,
    details: PlaylistDetails,
) -> Result<playlist::Model> {
    let txn = db.begin().await?;

    let renamed = playlist::ActiveModel {
        id: Set(new_id.to_string()),
        owner: Set(playlist.owner.clone()),
        name: Set(details.name),
        description: Set(details.description),
        private: Set(details.private),
        created_at: Set(playlist.created_at),
    }
    .insert(&txn)
    .await?;

    PlaylistTrack::update_many()
        .col_expr(
            playlist_track::Column::PlaylistId,
            Expr::value(new_id.to_string()),
        )
        .filter(playlist_track::Column::PlaylistId.eq(playlist.id.as_str()))
        .exec(&txn)
        .await?;

    Playlist::delete_by_id(playlist.id.clone())
        .exec(&txn)
        .await?;

    txn.commit().await?;
    info!(old_id = %playlist.id, new_id, "Renamed playlist");
    Ok(renamed)
}

/// Deletes a playlist together with its tracks.
pub async fn delete_playlist(db: &DatabaseConnection, playlist_id: &str) -> Result<()> {
    let txn = db.begin().await?;

    PlaylistTrack::delete_many()
        .filter(playlist_track::Column::PlaylistId.eq(playlist_id))
        .exec(&txn)
        .await?;
    let result = Playlist::delete_by_id(playlist_id.to_string())
        .exec(&txn)
        .await?;

    if result.rows_affected == 0 {
        return Err(Error::PlaylistNotFound {
            id: playlist_id.to_string(),
        });
    }

    txn.commit().await?;
    info!(playlist_id, "Deleted playlist");
    Ok(())
}
