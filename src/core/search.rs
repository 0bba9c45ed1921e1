//! Track search policy.
//!
//! Commands never call the audio backend directly for searches; they go through
//! [`search_tracks`], which applies the requester's duration cap. What ends up in
//! the queue is decided by [`tracks_to_enqueue`], and input checks
//! ([`contains_emoji`], [`DirectLinks`]) run before anything is searched.

use crate::{
    audio::{SearchKind, SearchResult, Track, TrackSearch},
    core::duration::format_duration,
    errors::Result,
};
use poise::serenity_prelude::UserId;
use regex::Regex;
use std::sync::LazyLock;

/// Discord limits autocomplete choice names and values to 100 characters
const CHOICE_MAX_CHARS: usize = 100;

/// Autocomplete shows at most this many search results
pub const AUTOCOMPLETE_LIMIT: usize = 10;

static EMOJI_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)] // Literal pattern, covered by tests
    Regex::new(r"<a?:\w+:\d{17,20}>|\p{Extended_Pictographic}").expect("emoji pattern is valid")
});

/// Whether `text` contains a unicode emoji or a Discord custom emote.
/// Such queries are rejected before searching.
#[must_use]
pub fn contains_emoji(text: &str) -> bool {
    EMOJI_PATTERN.is_match(text)
}

/// Patterns recognising input that is already a playable link
#[derive(Debug, Clone)]
pub struct DirectLinks {
    patterns: Vec<Regex>,
}

impl DirectLinks {
    /// Compiles the configured patterns.
    ///
    /// # Errors
    /// Returns an error if any pattern is not a valid regular expression.
    pub fn from_patterns(patterns: &[String]) -> Result<Self> {
        let patterns = patterns
            .iter()
            .map(|p| Regex::new(p))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    /// Whether `input` matches any configured link pattern
    #[must_use]
    pub fn is_direct_link(&self, input: &str) -> bool {
        self.patterns.iter().any(|p| p.is_match(input))
    }
}

/// Keeps only tracks no longer than `max_ms`. `None` means no cap.
#[must_use]
pub fn filter_by_max_length(tracks: Vec<Track>, max_ms: Option<u64>) -> Vec<Track> {
    match max_ms {
        Some(max) => tracks.into_iter().filter(|t| t.duration_ms <= max).collect(),
        None => tracks,
    }
}

/// Searches through `backend` and drops tracks over the requester's cap.
///
/// An empty track list means nothing usable matched; callers answer that with a
/// "no match" reply rather than treating it as a failure.
pub async fn search_tracks<B: TrackSearch>(
    backend: &B,
    query: &str,
    requester: Option<UserId>,
    max_ms: Option<u64>,
) -> Result<SearchResult> {
    let mut result = backend.search(query, requester).await?;
    result.tracks = filter_by_max_length(result.tracks, max_ms);
    Ok(result)
}

/// Tracks that should be queued for a result: the whole playlist, otherwise only
/// the best match.
#[must_use]
pub fn tracks_to_enqueue(kind: SearchKind, tracks: Vec<Track>) -> Vec<Track> {
    match kind {
        SearchKind::Playlist => tracks,
        SearchKind::Track | SearchKind::Search => tracks.into_iter().take(1).collect(),
    }
}

/// Total duration of `tracks` in milliseconds
#[must_use]
pub fn total_duration(tracks: &[Track]) -> u64 {
    tracks.iter().map(|t| t.duration_ms).sum()
}

/// Title shown in replies: a markdown link to the track (or, for playlists, to
/// the query), or the bare title when links are disabled.
#[must_use]
pub fn display_title(kind: SearchKind, first: &Track, query: &str, avoid_suspend: bool) -> String {
    if avoid_suspend {
        return first.title.clone();
    }
    match kind {
        SearchKind::Playlist => format!("[{}]({query})", first.title),
        SearchKind::Track | SearchKind::Search => match &first.uri {
            Some(uri) => format!("[{}]({uri})", first.title),
            None => first.title.clone(),
        },
    }
}

/// One-line description of a track: title, duration and author
#[must_use]
pub fn describe_track(track: &Track) -> String {
    let duration = if track.is_stream {
        "LIVE".to_string()
    } else {
        format_duration(track.duration_ms)
    };
    format!("{} `{duration}` - {}", track.title, track.author)
}

/// Builds autocomplete choices (name, value) from search results.
///
/// Tracks without a usable URI fall back to `fallback` as their value. A value
/// cannot be shortened without breaking it, so a track whose URI and fallback
/// are both too long for a choice is left out.
#[must_use]
pub fn autocomplete_choices(tracks: &[Track], fallback: &str) -> Vec<(String, String)> {
    tracks
        .iter()
        .filter_map(|t| {
            let value = t
                .uri
                .as_deref()
                .filter(|uri| fits_choice(uri))
                .or_else(|| Some(fallback).filter(|f| fits_choice(f)))?;
            let name = if t.title.is_empty() {
                "Unknown track".to_string()
            } else {
                truncate_chars(&t.title, CHOICE_MAX_CHARS)
            };
            Some((name, value.to_string()))
        })
        .take(AUTOCOMPLETE_LIMIT)
        .collect()
}

/// The only choice offered when the input is already a playable link.
///
/// `None` when the link is too long to be a choice value.
#[must_use]
pub fn direct_link_choice(input: &str) -> Option<(String, String)> {
    let link = input.trim();
    fits_choice(link).then(|| (link.to_string(), link.to_string()))
}

fn fits_choice(value: &str) -> bool {
    !value.is_empty() && value.chars().count() <= CHOICE_MAX_CHARS
}

fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::audio::player::tests::track;
    use crate::errors::Error;

    struct FakeBackend {
        result: SearchResult,
    }

    impl TrackSearch for FakeBackend {
        async fn search(&self, _query: &str, requester: Option<UserId>) -> Result<SearchResult> {
            let mut result = self.result.clone();
            for t in &mut result.tracks {
                t.requester = requester;
            }
            Ok(result)
        }
    }

    struct FailingBackend;

    impl TrackSearch for FailingBackend {
        async fn search(&self, _query: &str, _requester: Option<UserId>) -> Result<SearchResult> {
            Err(Error::Audio {
                message: "node down".to_string(),
            })
        }
    }

    fn result(kind: SearchKind, durations: &[u64]) -> SearchResult {
        SearchResult {
            kind,
            tracks: durations
                .iter()
                .enumerate()
                .map(|(i, d)| track(&format!("t{i}"), *d))
                .collect(),
            playlist_name: None,
        }
    }

    #[tokio::test]
    async fn test_search_applies_max_length() {
        let backend = FakeBackend {
            result: result(SearchKind::Search, &[60_000, 300_000, 120_000]),
        };

        let found = search_tracks(&backend, "query", Some(UserId::new(7)), Some(120_000))
            .await
            .unwrap();

        assert_eq!(found.tracks.len(), 2);
        assert!(found.tracks.iter().all(|t| t.duration_ms <= 120_000));
        assert!(found.tracks.iter().all(|t| t.requester == Some(UserId::new(7))));
    }

    #[tokio::test]
    async fn test_search_without_cap_returns_everything() {
        let backend = FakeBackend {
            result: result(SearchKind::Search, &[60_000, 9_000_000]),
        };
        let found = search_tracks(&backend, "query", None, None).await.unwrap();
        assert_eq!(found.tracks.len(), 2);
    }

    #[tokio::test]
    async fn test_everything_filtered_is_empty_not_error() {
        let backend = FakeBackend {
            result: result(SearchKind::Track, &[600_000]),
        };
        let found = search_tracks(&backend, "query", None, Some(1_000))
            .await
            .unwrap();
        assert!(found.tracks.is_empty());
    }

    #[tokio::test]
    async fn test_backend_failure_propagates() {
        let found = search_tracks(&FailingBackend, "query", None, None).await;
        assert!(matches!(found, Err(Error::Audio { .. })));
    }

    #[test]
    fn test_playlist_enqueues_every_track() {
        let found = result(SearchKind::Playlist, &[1, 2, 3]);
        assert_eq!(tracks_to_enqueue(found.kind, found.tracks).len(), 3);
    }

    #[test]
    fn test_search_and_track_enqueue_first_only() {
        for kind in [SearchKind::Search, SearchKind::Track] {
            let found = result(kind, &[1, 2, 3]);
            let queued = tracks_to_enqueue(found.kind, found.tracks);
            assert_eq!(queued.len(), 1);
            assert_eq!(queued[0].title, "t0");
        }
        assert!(tracks_to_enqueue(SearchKind::Search, Vec::new()).is_empty());
    }

    #[test]
    fn test_contains_emoji() {
        assert!(contains_emoji("lofi 🎵"));
        assert!(contains_emoji("play <:pepe:123456789012345678>"));
        assert!(contains_emoji("<a:dance:123456789012345678>"));
        assert!(!contains_emoji("never gonna give you up"));
        assert!(!contains_emoji("https://youtu.be/dQw4w9WgXcQ"));
    }

    #[test]
    fn test_direct_links() {
        let links = DirectLinks::from_patterns(&crate::config::PlayerConfig::default().direct_link_patterns)
            .unwrap();
        assert!(links.is_direct_link("https://www.youtube.com/watch?v=dQw4w9WgXcQ"));
        assert!(links.is_direct_link("https://open.spotify.com/track/abc"));
        assert!(!links.is_direct_link("lofi hip hop"));
    }

    #[test]
    fn test_invalid_direct_link_pattern() {
        let result = DirectLinks::from_patterns(&["(unclosed".to_string()]);
        assert!(matches!(result, Err(Error::Regex(_))));
    }

    #[test]
    fn test_display_title() {
        let first = track("Song", 1);
        assert_eq!(
            display_title(SearchKind::Track, &first, "q", false),
            "[Song](https://example.com/Song)"
        );
        assert_eq!(
            display_title(SearchKind::Playlist, &first, "https://list", false),
            "[Song](https://list)"
        );
        assert_eq!(display_title(SearchKind::Search, &first, "q", true), "Song");
    }

    #[test]
    fn test_autocomplete_choices() {
        let mut tracks: Vec<Track> = (0..12).map(|i| track(&format!("t{i}"), 1)).collect();
        tracks[0].uri = None;
        tracks[1].title = String::new();

        let choices = autocomplete_choices(&tracks, "raw query");

        assert_eq!(choices.len(), AUTOCOMPLETE_LIMIT);
        assert_eq!(choices[0].1, "raw query");
        assert_eq!(choices[1].0, "Unknown track");
    }

    #[test]
    fn test_long_uri_is_never_truncated() {
        let long_uri = format!("https://example.com/{}", "a".repeat(200));
        let mut tracks = vec![track("long", 1), track("short", 1)];
        tracks[0].uri = Some(long_uri.clone());

        let choices = autocomplete_choices(&tracks, "raw query");
        assert_eq!(choices[0], ("long".to_string(), "raw query".to_string()));
        assert_eq!(choices[1].1, "https://example.com/short");

        // Nothing short enough to stand for the track: it is skipped
        let choices = autocomplete_choices(&tracks, &long_uri);
        assert_eq!(choices.len(), 1);
        assert_eq!(choices[0].0, "short");
    }

    #[test]
    fn test_direct_link_choice_is_raw_input() {
        let (name, value) = direct_link_choice(" https://youtu.be/dQw4w9WgXcQ ").unwrap();
        assert_eq!(name, "https://youtu.be/dQw4w9WgXcQ");
        assert_eq!(value, name);

        let long = format!("https://example.com/{}", "a".repeat(200));
        assert!(direct_link_choice(&long).is_none());
    }

    #[test]
    fn test_total_duration() {
        let tracks = vec![track("a", 1_000), track("b", 2_500)];
        assert_eq!(total_duration(&tracks), 3_500);
    }
}
