//! Playlist track entity - One saved track inside a playlist.
//!
//! Only the metadata needed to show and re-resolve the track is stored; the
//! Lavalink encoded handle is not, since it is node specific.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Playlist track database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "playlist_tracks")]
pub struct Model {
    /// Unique identifier for the row
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Playlist this track belongs to
    pub playlist_id: String,
    /// Zero-based position inside the playlist
    pub position: i32,
    /// Track title
    pub title: String,
    /// Playable URI, when the source exposes one
    pub uri: Option<String>,
    /// Duration in milliseconds
    pub length: i64,
    /// Artwork URL
    pub thumbnail: Option<String>,
    /// Track author / artist
    pub author: String,
    /// Discord user ID of whoever added the track
    pub requester: Option<String>,
}

/// Defines relationships between `PlaylistTrack` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each track belongs to one playlist
    #[sea_orm(
        belongs_to = "super::playlist::Entity",
        from = "Column::PlaylistId",
        to = "super::playlist::Column::Id"
    )]
    Playlist,
}

impl Related<super::playlist::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Playlist.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
