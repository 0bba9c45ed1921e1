//! Audio layer - searching, queueing and streaming tracks.
//!
//! Queries are resolved by a Lavalink node ([`lavalink::LavalinkNode`]) and the
//! audio is streamed into voice by songbird ([`voice::Playback`]). This module
//! defines the track and search-result types commands work with, plus the
//! [`TrackSearch`] seam that lets the search policy in [`crate::core::search`]
//! run against any backend.

/// Lavalink v4 REST client
pub mod lavalink;
/// Per-guild queue and playback state
pub mod player;
/// Voice connections and streaming
pub mod voice;

use crate::errors::Result;
use poise::serenity_prelude::UserId;
use std::future::Future;

pub use lavalink::LavalinkNode;
pub use player::{AudioOutput, GuildPlayer, PlayerManager, PlayerOptions};
pub use voice::Playback;

/// A playable track as returned by the audio backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    /// Backend-specific handle used to start playback
    pub encoded: String,
    /// Track title
    pub title: String,
    /// Source URI, when the source exposes one
    pub uri: Option<String>,
    /// Duration in milliseconds
    pub duration_ms: u64,
    /// Artwork URL
    pub artwork_url: Option<String>,
    /// Author / artist
    pub author: String,
    /// Live streams have no meaningful duration
    pub is_stream: bool,
    /// Who asked for the track
    pub requester: Option<UserId>,
}

/// Shape of a search result.
///
/// Matched exhaustively wherever the shape changes behavior, so a new kind is a
/// compile error at every decision point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchKind {
    /// The query resolved to exactly one track (a direct link)
    Track,
    /// The query was a text search; results are ranked candidates
    Search,
    /// The query resolved to a playlist; every track belongs to it
    Playlist,
}

/// Result of a search, already tagged with its [`SearchKind`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    /// Result shape
    pub kind: SearchKind,
    /// Tracks in backend order
    pub tracks: Vec<Track>,
    /// Playlist name when `kind` is [`SearchKind::Playlist`]
    pub playlist_name: Option<String>,
}

impl SearchResult {
    /// A search that found nothing
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            kind: SearchKind::Search,
            tracks: Vec::new(),
            playlist_name: None,
        }
    }
}

/// Anything that can turn a user query into tracks
pub trait TrackSearch: Sync {
    /// Searches for `query`, tagging every returned track with `requester`.
    fn search(
        &self,
        query: &str,
        requester: Option<UserId>,
    ) -> impl Future<Output = Result<SearchResult>> + Send;
}
