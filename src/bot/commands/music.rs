//! Music Discord commands - search and queue tracks in the author's voice channel.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        audio::{PlayerOptions, SearchKind},
        bot::{
            Context, commands::non_empty_arg, handlers::autocomplete::autocomplete_track,
            session::ReplySession,
        },
        core::{
            duration::format_duration,
            max_length,
            search::{contains_emoji, display_title, search_tracks, total_duration, tracks_to_enqueue},
        },
        errors::{Error, Result},
    };
    use poise::serenity_prelude::{ChannelId, Mentionable};
    use tracing::info;

    /// Voice channel the author is connected to, read from the guild cache
    fn author_voice_channel(ctx: Context<'_>) -> Option<ChannelId> {
        let guild = ctx.guild()?;
        guild.voice_states.get(&ctx.author().id)?.channel_id
    }

    /// Play a song from any source.
    ///
    /// Searches with the author's duration cap applied. A playlist link queues
    /// every track; anything else queues the best match. Playback only starts
    /// when nothing is playing.
    #[poise::command(
        slash_command,
        prefix_command,
        guild_only,
        aliases("p", "pp"),
        category = "Music"
    )]
    pub async fn play(
        ctx: Context<'_>,
        #[description = "The song link or name"]
        #[autocomplete = "autocomplete_track"]
        #[rest]
        search: Option<String>,
    ) -> Result<()> {
        let mut session = ReplySession::start(ctx).await;
        session.acknowledge().await?;

        let data = ctx.data();
        let color = data.color();
        let locale = session.locale().to_string();
        let text = |namespace: &str, key: &str| data.i18n.get(&locale, namespace, key);

        let Some(query) = non_empty_arg(search) else {
            return session.update_embed(text("command.music", "play_arg"), color).await;
        };

        let guild_id = ctx.guild_id().ok_or(Error::GuildOnly)?;
        let Some(voice_id) = author_voice_channel(ctx) else {
            return session.update_embed(text("error", "no_in_voice"), color).await;
        };

        if contains_emoji(&query) {
            return session.update_embed(text("command.music", "play_emoji"), color).await;
        }

        let player = match data.playback.active_player(guild_id).await {
            Some(player) => {
                if player.lock().await.voice_id != voice_id {
                    return session.update_embed(text("error", "no_same_voice"), color).await;
                }
                player
            }
            None => {
                data.playback
                    .connect(PlayerOptions {
                        guild_id,
                        voice_id,
                        text_id: ctx.channel_id(),
                        volume: data.config.player.default_volume,
                    })
                    .await?
            }
        };
        player.lock().await.text_id = ctx.channel_id();

        let author = ctx.author().id;
        let max_ms = max_length::get_max_length(&data.database, &author.to_string()).await?;
        let result = search_tracks(data.lavalink.as_ref(), &query, Some(author), max_ms).await?;

        let Some(first) = result.tracks.first().cloned() else {
            return session.update_embed(text("command.music", "play_match"), color).await;
        };

        let kind = result.kind;
        let queued = tracks_to_enqueue(kind, result.tracks);
        let songs = queued.len().to_string();
        let duration = format_duration(total_duration(&queued));
        let started = data.playback.enqueue(guild_id, queued).await?;

        info!(
            %guild_id,
            ?kind,
            %songs,
            started = started.is_some(),
            elapsed = ?session.elapsed(),
            "Queued tracks"
        );

        let title = display_title(kind, &first, &query, data.config.player.avoid_suspend);
        let request = author.mention().to_string();
        let reply = match kind {
            SearchKind::Playlist => data.i18n.get_with(
                &locale,
                "command.music",
                "play_playlist",
                &[
                    ("title", title.as_str()),
                    ("duration", duration.as_str()),
                    ("songs", songs.as_str()),
                    ("request", request.as_str()),
                ],
            ),
            SearchKind::Track | SearchKind::Search => data.i18n.get_with(
                &locale,
                "command.music",
                "play_track",
                &[
                    ("title", title.as_str()),
                    ("duration", duration.as_str()),
                    ("request", request.as_str()),
                ],
            ),
        };

        session.update_embed(reply, color).await
    }
}

// Re-export all commands
pub use inner::*;
