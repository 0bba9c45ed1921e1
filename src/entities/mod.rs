//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod guild_language;
pub mod max_length;
pub mod playlist;
pub mod playlist_track;

// Re-export specific types to avoid conflicts
pub use guild_language::{
    Column as GuildLanguageColumn, Entity as GuildLanguage, Model as GuildLanguageModel,
};
pub use max_length::{Column as MaxLengthColumn, Entity as MaxLength, Model as MaxLengthModel};
pub use playlist::{Column as PlaylistColumn, Entity as Playlist, Model as PlaylistModel};
pub use playlist_track::{
    Column as PlaylistTrackColumn, Entity as PlaylistTrack, Model as PlaylistTrackModel,
};
