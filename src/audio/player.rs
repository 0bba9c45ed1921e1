//! Per-guild player state: voice/text channel, volume, queue and current track.
//!
//! The queue lives in the bot process. Audio is handed to an [`AudioOutput`]
//! one track at a time: when something is enqueued into an idle guild, and again
//! each time the output reports that the current track ended. A guild's player
//! sits behind its own mutex so concurrent commands in different guilds never
//! contend.

use super::Track;
use crate::errors::{Error, Result};
use poise::serenity_prelude::{ChannelId, GuildId};
use std::collections::{HashMap, VecDeque};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

/// Where queued tracks are played
pub trait AudioOutput: Sync {
    /// Starts `track` in the guild's voice connection at `volume` percent.
    fn play(
        &self,
        guild_id: GuildId,
        track: &Track,
        volume: u16,
    ) -> impl Future<Output = Result<()>> + Send;
}

/// Parameters for creating a guild player
#[derive(Debug, Clone, Copy)]
pub struct PlayerOptions {
    /// Guild the player belongs to
    pub guild_id: GuildId,
    /// Voice channel the bot plays in
    pub voice_id: ChannelId,
    /// Text channel for player announcements
    pub text_id: ChannelId,
    /// Starting volume
    pub volume: u16,
}

/// Queue and playback state of one guild
#[derive(Debug)]
pub struct GuildPlayer {
    /// Guild the player belongs to
    pub guild_id: GuildId,
    /// Voice channel the bot plays in
    pub voice_id: ChannelId,
    /// Text channel for player announcements
    pub text_id: ChannelId,
    /// Current volume
    pub volume: u16,
    queue: VecDeque<Track>,
    current: Option<Track>,
}

impl GuildPlayer {
    /// Creates an idle player with an empty queue.
    #[must_use]
    pub const fn new(options: PlayerOptions) -> Self {
        Self {
            guild_id: options.guild_id,
            voice_id: options.voice_id,
            text_id: options.text_id,
            volume: options.volume,
            queue: VecDeque::new(),
            current: None,
        }
    }

    /// Whether a track is currently playing
    #[must_use]
    pub const fn is_playing(&self) -> bool {
        self.current.is_some()
    }

    /// The track currently playing
    #[must_use]
    pub const fn current(&self) -> Option<&Track> {
        self.current.as_ref()
    }

    /// Number of tracks waiting after the current one
    #[must_use]
    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    /// Appends tracks to the end of the queue
    pub fn enqueue(&mut self, tracks: impl IntoIterator<Item = Track>) {
        self.queue.extend(tracks);
    }

    /// Moves the next queued track into the current slot and returns it.
    /// Returns `None` (and leaves the player idle) when the queue is empty.
    pub fn advance(&mut self) -> Option<&Track> {
        self.current = self.queue.pop_front();
        self.current.as_ref()
    }

    /// Marks the current track as finished
    pub fn finish_current(&mut self) {
        self.current = None;
    }
}

/// Registry of guild players
#[derive(Debug, Default)]
pub struct PlayerManager {
    players: RwLock<HashMap<GuildId, Arc<Mutex<GuildPlayer>>>>,
}

impl PlayerManager {
    /// Creates an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Player of `guild_id`, if one exists
    pub async fn get(&self, guild_id: GuildId) -> Option<Arc<Mutex<GuildPlayer>>> {
        self.players.read().await.get(&guild_id).cloned()
    }

    /// Returns the guild's player, creating it from `options` if needed
    pub async fn get_or_create(&self, options: PlayerOptions) -> Arc<Mutex<GuildPlayer>> {
        let mut players = self.players.write().await;
        Arc::clone(
            players
                .entry(options.guild_id)
                .or_insert_with(|| Arc::new(Mutex::new(GuildPlayer::new(options)))),
        )
    }

    /// Replaces any player the guild had with a fresh, idle one
    pub async fn replace(&self, options: PlayerOptions) -> Arc<Mutex<GuildPlayer>> {
        let player = Arc::new(Mutex::new(GuildPlayer::new(options)));
        self.players
            .write()
            .await
            .insert(options.guild_id, Arc::clone(&player));
        player
    }

    /// Drops the guild's player
    pub async fn remove(&self, guild_id: GuildId) -> Option<Arc<Mutex<GuildPlayer>>> {
        self.players.write().await.remove(&guild_id)
    }

    /// Appends `tracks` to the guild queue and starts playback if the guild was idle.
    ///
    /// Returns the track that started, or `None` when something was already
    /// playing and keeps playing.
    pub async fn enqueue<O: AudioOutput>(
        &self,
        output: &O,
        guild_id: GuildId,
        tracks: Vec<Track>,
    ) -> Result<Option<Track>> {
        let Some(player) = self.get(guild_id).await else {
            return Err(Error::Audio {
                message: format!("no player for guild {guild_id}"),
            });
        };
        let mut player = player.lock().await;
        player.enqueue(tracks);
        if player.is_playing() {
            return Ok(None);
        }
        start_next(&mut player, output).await
    }

    /// Called when the guild's current track finished (or failed); starts the
    /// next queued track, if any.
    pub async fn track_ended<O: AudioOutput>(
        &self,
        output: &O,
        guild_id: GuildId,
    ) -> Result<Option<Track>> {
        let Some(player) = self.get(guild_id).await else {
            debug!(%guild_id, "Track ended for a guild without a player");
            return Ok(None);
        };
        let mut player = player.lock().await;
        player.finish_current();
        start_next(&mut player, output).await
    }
}

/// Advances the queue until a track starts or the queue runs dry.
///
/// A track the output refuses is skipped so one bad entry cannot stall the rest.
async fn start_next<O: AudioOutput>(
    player: &mut GuildPlayer,
    output: &O,
) -> Result<Option<Track>> {
    while let Some(track) = player.advance().cloned() {
        match output.play(player.guild_id, &track, player.volume).await {
            Ok(()) => {
                info!(guild_id = %player.guild_id, title = %track.title, "Started track");
                return Ok(Some(track));
            }
            Err(e) => {
                warn!(guild_id = %player.guild_id, title = %track.title, error = %e, "Skipping unplayable track");
            }
        }
    }
    player.finish_current();
    debug!(guild_id = %player.guild_id, "Queue finished");
    Ok(None)
}

#[cfg(test)]
pub(crate) mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    pub(crate) fn track(title: &str, duration_ms: u64) -> Track {
        Track {
            encoded: format!("encoded-{title}"),
            title: title.to_string(),
            uri: Some(format!("https://example.com/{title}")),
            duration_ms,
            artwork_url: None,
            author: "Author".to_string(),
            is_stream: false,
            requester: None,
        }
    }

    fn options() -> PlayerOptions {
        PlayerOptions {
            guild_id: GuildId::new(1),
            voice_id: ChannelId::new(2),
            text_id: ChannelId::new(3),
            volume: 100,
        }
    }

    /// Records every track it is asked to play; titles listed in `broken` fail
    #[derive(Default)]
    struct RecordingOutput {
        played: std::sync::Mutex<Vec<String>>,
        broken: Vec<String>,
    }

    impl RecordingOutput {
        fn failing_on(titles: &[&str]) -> Self {
            Self {
                played: std::sync::Mutex::default(),
                broken: titles.iter().map(ToString::to_string).collect(),
            }
        }

        fn played(&self) -> Vec<String> {
            self.played.lock().unwrap().clone()
        }
    }

    impl AudioOutput for RecordingOutput {
        async fn play(&self, _guild_id: GuildId, track: &Track, _volume: u16) -> Result<()> {
            if self.broken.contains(&track.title) {
                return Err(Error::Audio {
                    message: format!("cannot stream {}", track.title),
                });
            }
            self.played.lock().unwrap().push(track.title.clone());
            Ok(())
        }
    }

    async fn manager_with_player() -> PlayerManager {
        let manager = PlayerManager::new();
        manager.get_or_create(options()).await;
        manager
    }

    #[tokio::test]
    async fn test_idle_player_starts_first_track() {
        let manager = manager_with_player().await;
        let output = RecordingOutput::default();

        let started = manager
            .enqueue(&output, GuildId::new(1), vec![track("a", 1), track("b", 2)])
            .await
            .unwrap();

        assert_eq!(started.map(|t| t.title), Some("a".to_string()));
        assert_eq!(output.played(), vec!["a"]);
        let player = manager.get(GuildId::new(1)).await.unwrap();
        assert_eq!(player.lock().await.queue_len(), 1);
    }

    #[tokio::test]
    async fn test_playing_track_is_never_interrupted() {
        let manager = manager_with_player().await;
        let output = RecordingOutput::default();
        manager.enqueue(&output, GuildId::new(1), vec![track("first", 1)]).await.unwrap();

        let started = manager
            .enqueue(&output, GuildId::new(1), vec![track("second", 1)])
            .await
            .unwrap();

        assert!(started.is_none());
        assert_eq!(output.played(), vec!["first"]);
        let player = manager.get(GuildId::new(1)).await.unwrap();
        let player = player.lock().await;
        assert_eq!(player.current().map(|t| t.title.as_str()), Some("first"));
        assert_eq!(player.queue_len(), 1);
    }

    #[tokio::test]
    async fn test_next_track_starts_when_current_ends() {
        let manager = manager_with_player().await;
        let output = RecordingOutput::default();
        manager
            .enqueue(&output, GuildId::new(1), vec![track("a", 1), track("b", 1)])
            .await
            .unwrap();
        manager.enqueue(&output, GuildId::new(1), vec![track("c", 1)]).await.unwrap();

        let next = manager.track_ended(&output, GuildId::new(1)).await.unwrap();
        assert_eq!(next.map(|t| t.title), Some("b".to_string()));

        let next = manager.track_ended(&output, GuildId::new(1)).await.unwrap();
        assert_eq!(next.map(|t| t.title), Some("c".to_string()));
        assert_eq!(output.played(), vec!["a", "b", "c"]);

        // Queue ran dry: the guild goes idle and the next enqueue plays at once
        assert!(manager.track_ended(&output, GuildId::new(1)).await.unwrap().is_none());
        let player = manager.get(GuildId::new(1)).await.unwrap();
        assert!(!player.lock().await.is_playing());

        let started = manager.enqueue(&output, GuildId::new(1), vec![track("d", 1)]).await.unwrap();
        assert_eq!(started.map(|t| t.title), Some("d".to_string()));
    }

    #[tokio::test]
    async fn test_unplayable_track_is_skipped() {
        let manager = manager_with_player().await;
        let output = RecordingOutput::failing_on(&["broken"]);

        let started = manager
            .enqueue(&output, GuildId::new(1), vec![track("broken", 1), track("ok", 1)])
            .await
            .unwrap();

        assert_eq!(started.map(|t| t.title), Some("ok".to_string()));
        assert_eq!(output.played(), vec!["ok"]);
    }

    #[tokio::test]
    async fn test_empty_enqueue_leaves_player_idle() {
        let manager = manager_with_player().await;
        let output = RecordingOutput::default();

        let started = manager.enqueue(&output, GuildId::new(1), Vec::new()).await.unwrap();

        assert!(started.is_none());
        let player = manager.get(GuildId::new(1)).await.unwrap();
        assert!(!player.lock().await.is_playing());
    }

    #[tokio::test]
    async fn test_enqueue_without_player_fails() {
        let manager = PlayerManager::new();
        let output = RecordingOutput::default();
        let result = manager.enqueue(&output, GuildId::new(1), vec![track("a", 1)]).await;
        assert!(matches!(result, Err(Error::Audio { .. })));
        assert!(output.played().is_empty());
    }

    #[tokio::test]
    async fn test_track_end_without_player_is_ignored() {
        let manager = PlayerManager::new();
        let output = RecordingOutput::default();
        assert!(manager.track_ended(&output, GuildId::new(1)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_manager_reuses_existing_player() {
        let manager = PlayerManager::new();
        let first = manager.get_or_create(options()).await;
        first.lock().await.volume = 50;

        let mut other = options();
        other.volume = 80;
        let second = manager.get_or_create(other).await;

        assert_eq!(second.lock().await.volume, 50);
        assert!(manager.get(GuildId::new(1)).await.is_some());

        let fresh = manager.replace(other).await;
        assert_eq!(fresh.lock().await.volume, 80);
        assert!(manager.remove(GuildId::new(1)).await.is_some());
        assert!(manager.get(GuildId::new(1)).await.is_none());
    }
}
