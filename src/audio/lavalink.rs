//! Lavalink v4 REST client.
//!
//! The node is used as a track resolver: `/v4/loadtracks` turns links and
//! `engine:query` identifiers into track metadata. Audio itself is streamed by
//! [`super::voice`].

use super::{SearchKind, SearchResult, Track, TrackSearch};
use crate::{
    config::LavalinkConfig,
    errors::{Error, Result},
};
use poise::serenity_prelude::UserId;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::Deserialize;
use tracing::instrument;

/// Response of `GET /v4/loadtracks`
#[derive(Debug, Deserialize)]
#[serde(tag = "loadType", content = "data", rename_all = "lowercase")]
pub enum LoadResult {
    /// A direct link to one track
    Track(TrackData),
    /// A playlist link
    Playlist(PlaylistData),
    /// Search results
    Search(Vec<TrackData>),
    /// Nothing matched
    Empty(serde::de::IgnoredAny),
    /// The node failed to load the identifier
    Error(LoadError),
}

/// A track as serialized by the node
#[derive(Debug, Clone, Deserialize)]
pub struct TrackData {
    /// Opaque handle used to play the track
    pub encoded: String,
    /// Track metadata
    pub info: TrackInfo,
}

/// Track metadata
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackInfo {
    /// Uploader or artist
    pub author: String,
    /// Duration in milliseconds
    pub length: u64,
    /// Live streams report a meaningless length
    pub is_stream: bool,
    /// Track title
    pub title: String,
    /// Source URI, absent for some sources
    pub uri: Option<String>,
    /// Artwork URL
    pub artwork_url: Option<String>,
}

impl TrackData {
    /// Converts the wire track into a [`Track`] owned by `requester`
    #[must_use]
    pub fn into_track(self, requester: Option<UserId>) -> Track {
        Track {
            encoded: self.encoded,
            title: self.info.title,
            uri: self.info.uri,
            duration_ms: self.info.length,
            artwork_url: self.info.artwork_url,
            author: self.info.author,
            is_stream: self.info.is_stream,
            requester,
        }
    }
}

/// Playlist payload
#[derive(Debug, Deserialize)]
pub struct PlaylistData {
    /// Playlist metadata
    pub info: PlaylistInfo,
    /// Tracks in playlist order
    pub tracks: Vec<TrackData>,
}

/// Playlist metadata
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistInfo {
    /// Playlist name
    pub name: String,
}

/// Load failure reported by the node
#[derive(Debug, Deserialize)]
pub struct LoadError {
    /// Human readable message
    pub message: Option<String>,
    /// `common`, `suspicious` or `fault`
    pub severity: String,
    /// Underlying cause
    pub cause: String,
}

/// Converts a node load result into a tagged [`SearchResult`].
pub fn into_search_result(result: LoadResult, requester: Option<UserId>) -> Result<SearchResult> {
    let search_result = match result {
        LoadResult::Track(track) => SearchResult {
            kind: SearchKind::Track,
            tracks: vec![track.into_track(requester)],
            playlist_name: None,
        },
        LoadResult::Playlist(playlist) => SearchResult {
            kind: SearchKind::Playlist,
            tracks: playlist
                .tracks
                .into_iter()
                .map(|t| t.into_track(requester))
                .collect(),
            playlist_name: Some(playlist.info.name),
        },
        LoadResult::Search(tracks) => SearchResult {
            kind: SearchKind::Search,
            tracks: tracks.into_iter().map(|t| t.into_track(requester)).collect(),
            playlist_name: None,
        },
        LoadResult::Empty(_) => SearchResult::empty(),
        LoadResult::Error(error) => {
            return Err(Error::Audio {
                message: error.message.unwrap_or(error.cause),
            });
        }
    };
    Ok(search_result)
}

/// Builds the node identifier for a user query: links go through untouched,
/// plain text gets the configured search prefix.
#[must_use]
pub fn search_identifier(query: &str, search_engine: &str) -> String {
    let query = query.trim();
    if query.starts_with("http://") || query.starts_with("https://") {
        query.to_string()
    } else {
        format!("{search_engine}:{query}")
    }
}

/// REST client for a single Lavalink node
#[derive(Debug)]
pub struct LavalinkNode {
    http: reqwest::Client,
    base_url: String,
    search_engine: String,
}

impl LavalinkNode {
    /// Creates a client for the node described by `config`.
    pub fn new(config: &LavalinkConfig, search_engine: impl Into<String>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let auth = HeaderValue::from_str(&config.password).map_err(|e| Error::Config {
            message: format!("Lavalink password is not a valid header value: {e}"),
        })?;
        headers.insert(AUTHORIZATION, auth);

        let http = reqwest::Client::builder().default_headers(headers).build()?;

        Ok(Self {
            http,
            base_url: config.url.trim_end_matches('/').to_string(),
            search_engine: search_engine.into(),
        })
    }

    /// Resolves an identifier (link or `engine:query`) on the node
    #[instrument(skip(self))]
    pub async fn load_tracks(&self, identifier: &str) -> Result<LoadResult> {
        let result = self
            .http
            .get(format!("{}/v4/loadtracks", self.base_url))
            .query(&[("identifier", identifier)])
            .send()
            .await?
            .error_for_status()?
            .json::<LoadResult>()
            .await?;
        Ok(result)
    }
}

impl TrackSearch for LavalinkNode {
    async fn search(&self, query: &str, requester: Option<UserId>) -> Result<SearchResult> {
        let identifier = search_identifier(query, &self.search_engine);
        let result = self.load_tracks(&identifier).await?;
        into_search_result(result, requester)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    const TRACK_INFO: &str = r#"{
        "identifier": "dQw4w9WgXcQ",
        "isSeekable": true,
        "author": "RickAstleyVEVO",
        "length": 212000,
        "isStream": false,
        "position": 0,
        "title": "Never Gonna Give You Up",
        "uri": "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
        "artworkUrl": "https://i.ytimg.com/vi/dQw4w9WgXcQ/maxresdefault.jpg",
        "isrc": null,
        "sourceName": "youtube"
    }"#;

    fn track_json(encoded: &str) -> String {
        format!(r#"{{"encoded": "{encoded}", "info": {TRACK_INFO}, "pluginInfo": {{}}, "userData": {{}}}}"#)
    }

    #[test]
    fn test_parse_track_result() {
        let json = format!(r#"{{"loadType": "track", "data": {}}}"#, track_json("QAAA"));
        let result: LoadResult = serde_json::from_str(&json).unwrap();
        let search = into_search_result(result, Some(UserId::new(42))).unwrap();

        assert_eq!(search.kind, SearchKind::Track);
        assert_eq!(search.tracks.len(), 1);
        let track = &search.tracks[0];
        assert_eq!(track.encoded, "QAAA");
        assert_eq!(track.duration_ms, 212_000);
        assert_eq!(track.requester, Some(UserId::new(42)));
        assert_eq!(
            track.uri.as_deref(),
            Some("https://www.youtube.com/watch?v=dQw4w9WgXcQ")
        );
    }

    #[test]
    fn test_parse_playlist_result() {
        let json = format!(
            r#"{{"loadType": "playlist", "data": {{"info": {{"name": "Mix", "selectedTrack": -1}}, "pluginInfo": {{}}, "tracks": [{}, {}]}}}}"#,
            track_json("A"),
            track_json("B")
        );
        let result: LoadResult = serde_json::from_str(&json).unwrap();
        let search = into_search_result(result, None).unwrap();

        assert_eq!(search.kind, SearchKind::Playlist);
        assert_eq!(search.playlist_name.as_deref(), Some("Mix"));
        assert_eq!(search.tracks.len(), 2);
    }

    #[test]
    fn test_parse_search_result() {
        let json = format!(
            r#"{{"loadType": "search", "data": [{}, {}, {}]}}"#,
            track_json("A"),
            track_json("B"),
            track_json("C")
        );
        let result: LoadResult = serde_json::from_str(&json).unwrap();
        let search = into_search_result(result, None).unwrap();

        assert_eq!(search.kind, SearchKind::Search);
        assert_eq!(search.tracks.len(), 3);
    }

    #[test]
    fn test_parse_empty_result() {
        let result: LoadResult =
            serde_json::from_str(r#"{"loadType": "empty", "data": {}}"#).unwrap();
        let search = into_search_result(result, None).unwrap();
        assert!(search.tracks.is_empty());
    }

    #[test]
    fn test_error_result_becomes_audio_error() {
        let result: LoadResult = serde_json::from_str(
            r#"{"loadType": "error", "data": {"message": "Video unavailable", "severity": "common", "cause": "Unknown"}}"#,
        )
        .unwrap();
        let err = into_search_result(result, None).unwrap_err();
        assert!(matches!(err, Error::Audio { message } if message == "Video unavailable"));
    }

    #[test]
    fn test_search_identifier() {
        assert_eq!(
            search_identifier("  never gonna give you up ", "ytsearch"),
            "ytsearch:never gonna give you up"
        );
        assert_eq!(
            search_identifier("https://youtu.be/dQw4w9WgXcQ", "ytsearch"),
            "https://youtu.be/dQw4w9WgXcQ"
        );
    }

    #[test]
    fn test_node_rejects_unprintable_password() {
        let config = LavalinkConfig {
            url: "http://localhost:2333/".to_string(),
            password: "bad\npassword".to_string(),
        };
        assert!(matches!(
            LavalinkNode::new(&config, "ytsearch"),
            Err(Error::Config { .. })
        ));
    }

    #[test]
    fn test_node_trims_trailing_slash() {
        let config = LavalinkConfig {
            url: "http://localhost:2333/".to_string(),
            password: "youshallnotpass".to_string(),
        };
        let node = LavalinkNode::new(&config, "ytsearch").unwrap();
        assert_eq!(node.base_url, "http://localhost:2333");
    }
}
