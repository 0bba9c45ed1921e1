//! Playlist entity - A named, user-owned list of saved tracks.
//!
//! The primary key is a short user-visible string id so playlists can be
//! referenced from commands. Tracks live in `playlist_tracks`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Playlist database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "playlists")]
pub struct Model {
    /// User-visible playlist id (matches `^[\w&.-]+$`)
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Discord user ID of the owner; the only user allowed to modify the playlist
    pub owner: String,
    /// Display name
    pub name: String,
    /// Optional free-text description
    pub description: Option<String>,
    /// Private playlists are only shown to their owner
    pub private: bool,
    /// When the playlist was created
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Playlist and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One playlist has many tracks
    #[sea_orm(has_many = "super::playlist_track::Entity")]
    Tracks,
}

impl Related<super::playlist_track::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tracks.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
