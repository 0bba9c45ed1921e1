//! Voice connections and audio streaming through songbird.
//!
//! [`Playback`] joins the requester's voice channel, streams queued tracks with
//! `yt-dlp` and advances the guild queue whenever songbird reports that a track
//! ended or failed.

use super::{
    Track,
    player::{AudioOutput, GuildPlayer, PlayerManager, PlayerOptions},
};
use crate::errors::{Error, Result};
use poise::serenity_prelude::{GuildId, async_trait};
use songbird::{
    Event, EventContext, EventHandler as VoiceEventHandler, Songbird, TrackEvent,
    input::YoutubeDl,
};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

/// Streams tracks into a guild's songbird call
#[derive(Clone)]
pub struct SongbirdOutput {
    songbird: Arc<Songbird>,
    http: reqwest::Client,
}

impl AudioOutput for SongbirdOutput {
    async fn play(&self, guild_id: GuildId, track: &Track, volume: u16) -> Result<()> {
        let Some(uri) = track.uri.clone() else {
            return Err(Error::Audio {
                message: format!("track {} has no source URI", track.title),
            });
        };
        let Some(call) = self.songbird.get(guild_id) else {
            return Err(Error::Audio {
                message: format!("not connected to voice in guild {guild_id}"),
            });
        };

        let source = songbird::tracks::Track::from(YoutubeDl::new(self.http.clone(), uri))
            .volume(f32::from(volume) / 100.0);
        call.lock().await.play(source);
        Ok(())
    }
}

/// Voice connections plus the per-guild queues that feed them
pub struct Playback {
    songbird: Arc<Songbird>,
    output: SongbirdOutput,
    players: Arc<PlayerManager>,
}

impl Playback {
    /// Creates the playback layer around a songbird manager that is registered
    /// with the gateway client.
    #[must_use]
    pub fn new(songbird: Arc<Songbird>) -> Self {
        let output = SongbirdOutput {
            songbird: Arc::clone(&songbird),
            http: reqwest::Client::new(),
        };
        Self {
            songbird,
            output,
            players: Arc::new(PlayerManager::new()),
        }
    }

    /// The songbird manager, for registering with the gateway client
    #[must_use]
    pub fn songbird(&self) -> Arc<Songbird> {
        Arc::clone(&self.songbird)
    }

    /// Player of a guild whose voice connection is still up.
    ///
    /// A player left behind by a dropped connection is discarded so the next
    /// request can join whatever channel its author is in.
    pub async fn active_player(&self, guild_id: GuildId) -> Option<Arc<Mutex<GuildPlayer>>> {
        let player = self.players.get(guild_id).await?;
        let connected = match self.songbird.get(guild_id) {
            Some(call) => call.lock().await.current_channel().is_some(),
            None => false,
        };
        if connected {
            return Some(player);
        }
        self.players.remove(guild_id).await;
        info!(%guild_id, "Discarded player without a voice connection");
        None
    }

    /// Joins `options.voice_id` and installs a fresh, idle player for the guild.
    pub async fn connect(&self, options: PlayerOptions) -> Result<Arc<Mutex<GuildPlayer>>> {
        let guild_id = options.guild_id;
        let call = self.songbird.join(guild_id, options.voice_id).await?;
        {
            let mut call = call.lock().await;
            call.remove_all_global_events();
            for event in [TrackEvent::End, TrackEvent::Error] {
                call.add_global_event(
                    Event::Track(event),
                    TrackEndNotifier {
                        guild_id,
                        output: self.output.clone(),
                        players: Arc::clone(&self.players),
                    },
                );
            }
        }
        info!(%guild_id, voice_id = %options.voice_id, "Joined voice");
        Ok(self.players.replace(options).await)
    }

    /// Appends `tracks` to the guild queue, starting playback if it was idle.
    pub async fn enqueue(&self, guild_id: GuildId, tracks: Vec<Track>) -> Result<Option<Track>> {
        self.players.enqueue(&self.output, guild_id, tracks).await
    }

    /// Forgets the guild's player after the bot left or was moved out of voice.
    pub async fn disconnected(&self, guild_id: GuildId) {
        if self.players.remove(guild_id).await.is_some() {
            info!(%guild_id, "Bot left voice; player destroyed");
        }
        if self.songbird.get(guild_id).is_none() {
            return;
        }
        if let Err(e) = self.songbird.remove(guild_id).await {
            warn!(%guild_id, error = %e, "Could not drop voice call");
        }
    }
}

/// Moves the guild queue forward when the current track stops
struct TrackEndNotifier {
    guild_id: GuildId,
    output: SongbirdOutput,
    players: Arc<PlayerManager>,
}

#[async_trait]
impl VoiceEventHandler for TrackEndNotifier {
    async fn act(&self, ctx: &EventContext<'_>) -> Option<Event> {
        if let EventContext::Track(_) = ctx {
            if let Err(e) = self.players.track_ended(&self.output, self.guild_id).await {
                error!(guild_id = %self.guild_id, error = %e, "Failed to start next track");
            }
        }
        None
    }
}
