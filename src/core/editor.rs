//! Ownership-gated playlist editing.
//!
//! An edit runs Lookup -> Ownership -> Collect -> Validate -> Commit, and the
//! caller reports the result. Only Collect differs between front-ends: text
//! commands ask four questions one at a time, slash commands show a single form.
//! Both implement [`AnswerSource`]; everything else is shared.
//!
//! Every field the user leaves empty keeps its current value.

use crate::{
    core::playlist::{self, PlaylistDetails, is_valid_playlist_id},
    entities::playlist::Model as PlaylistModel,
    errors::Error,
};
use sea_orm::DatabaseConnection;
use std::future::Future;
use thiserror::Error;

/// Why an edit did not happen
#[derive(Debug, Error)]
pub enum EditError {
    /// No playlist with the requested id
    #[error("Playlist not found: {0}")]
    NotFound(String),

    /// The requester does not own the playlist
    #[error("Only the playlist owner can edit it")]
    NotOwner,

    /// Visibility answer was neither public nor private
    #[error("Invalid visibility: {0}")]
    InvalidMode(String),

    /// New id uses characters outside `[\w&.-]`
    #[error("Invalid playlist id: {0}")]
    InvalidId(String),

    /// New id already belongs to another playlist
    #[error("Playlist id already in use: {0}")]
    IdTaken(String),

    /// The user never submitted their answers
    #[error("Edit cancelled")]
    Cancelled,

    /// Storage or platform failure
    #[error(transparent)]
    Internal(#[from] Error),
}

impl From<sea_orm::DbErr> for EditError {
    fn from(value: sea_orm::DbErr) -> Self {
        Self::Internal(Error::Database(value))
    }
}

/// Raw answers collected from the user. `None` or blank means "keep".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditAnswers {
    /// New playlist id
    pub id: Option<String>,
    /// New display name
    pub name: Option<String>,
    /// New description
    pub description: Option<String>,
    /// `public`/`true` or `private`/`false`
    pub visibility: Option<String>,
}

impl EditAnswers {
    /// Builds answers from the four prompt replies, in question order.
    #[must_use]
    pub fn from_replies(replies: [String; 4]) -> Self {
        let [id, name, description, visibility] = replies;
        Self {
            id: Some(id),
            name: Some(name),
            description: Some(description),
            visibility: Some(visibility),
        }
    }
}

/// Playlist visibility
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// Listed for everyone
    Public,
    /// Only the owner can see it
    Private,
}

impl Visibility {
    /// Case- and whitespace-insensitive parse of a visibility answer.
    #[must_use]
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_lowercase().as_str() {
            "public" | "true" => Some(Self::Public),
            "private" | "false" => Some(Self::Private),
            _ => None,
        }
    }

    /// Whether this is [`Visibility::Private`]
    #[must_use]
    pub const fn is_private(self) -> bool {
        matches!(self, Self::Private)
    }
}

/// A validated edit, ready to commit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistEdit {
    /// Id to move the playlist to, when it changes
    pub new_id: Option<String>,
    /// Field values after the edit
    pub details: PlaylistDetails,
}

/// Source of edit answers for one invocation.
///
/// Implementations own whatever scratch state they need while asking, so
/// concurrent edits never see each other's answers.
pub trait AnswerSource {
    /// Collects answers for `playlist`.
    ///
    /// # Errors
    /// [`EditError::Cancelled`] when the user never answered at all.
    fn collect(
        &mut self,
        playlist: &PlaylistModel,
    ) -> impl Future<Output = Result<EditAnswers, EditError>> + Send;
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Loads the playlist and checks that `requester` owns it.
pub async fn owned_playlist(
    db: &DatabaseConnection,
    playlist_id: &str,
    requester: &str,
) -> Result<PlaylistModel, EditError> {
    let playlist = playlist::get_playlist(db, playlist_id)
        .await?
        .ok_or_else(|| EditError::NotFound(playlist_id.to_string()))?;
    if playlist.owner != requester {
        return Err(EditError::NotOwner);
    }
    Ok(playlist)
}

/// Checks the answers against the current record and the store.
///
/// Nothing is written here; a rejected answer discards the whole edit.
pub async fn validate(
    db: &DatabaseConnection,
    playlist: &PlaylistModel,
    answers: EditAnswers,
) -> Result<PlaylistEdit, EditError> {
    let private = match non_empty(answers.visibility) {
        Some(mode) => Visibility::parse(&mode)
            .ok_or(EditError::InvalidMode(mode))?
            .is_private(),
        None => playlist.private,
    };

    let new_id = match non_empty(answers.id) {
        Some(id) if id != playlist.id => {
            if !is_valid_playlist_id(&id) {
                return Err(EditError::InvalidId(id));
            }
            if playlist::get_playlist(db, &id).await?.is_some() {
                return Err(EditError::IdTaken(id));
            }
            Some(id)
        }
        _ => None,
    };

    Ok(PlaylistEdit {
        new_id,
        details: PlaylistDetails {
            name: non_empty(answers.name).unwrap_or_else(|| playlist.name.clone()),
            description: non_empty(answers.description).or_else(|| playlist.description.clone()),
            private,
        },
    })
}

/// Writes a validated edit and returns the playlist's effective id.
pub async fn commit(
    db: &DatabaseConnection,
    playlist: &PlaylistModel,
    edit: PlaylistEdit,
) -> Result<String, EditError> {
    let updated = match edit.new_id {
        Some(new_id) => playlist::rename_playlist(db, playlist, &new_id, edit.details).await?,
        None => playlist::update_details(db, playlist, edit.details).await?,
    };
    Ok(updated.id)
}

/// Runs a complete edit for `requester` with answers from `source`.
///
/// Returns the effective playlist id (the new one if it was renamed).
pub async fn run_edit<S: AnswerSource + Send>(
    db: &DatabaseConnection,
    playlist_id: &str,
    requester: &str,
    source: &mut S,
) -> Result<String, EditError> {
    let playlist = owned_playlist(db, playlist_id, requester).await?;
    let answers = source.collect(&playlist).await?;
    let edit = validate(db, &playlist, answers).await?;
    let effective_id = commit(db, &playlist, edit).await?;
    tracing::info!(playlist_id, effective_id, requester, "Playlist edited");
    Ok(effective_id)
}
