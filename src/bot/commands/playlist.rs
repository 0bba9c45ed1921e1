//! Playlist Discord commands - create, add tracks, edit, inspect and delete playlists.
//!
//! All mutations are owner-only. Ownership and limits are checked in
//! [`crate::core::playlist`] and [`crate::core::editor`]; this module only turns
//! outcomes into localized replies.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{
            Context,
            commands::non_empty_arg,
            handlers::autocomplete::autocomplete_track,
            prompts::{FormAnswers, PromptAnswers},
            session::{ReplySession, embed_reply},
        },
        core::{
            duration::format_duration,
            editor::{EditError, run_edit},
            max_length,
            playlist::{self, AddOutcome},
            search::{contains_emoji, describe_track, search_tracks, tracks_to_enqueue},
        },
        errors::{Error, Result},
    };
    use poise::{CreateReply, serenity_prelude::CreateEmbed};
    use std::fmt::Write;

    /// Tracks listed by `pl info`
    const INFO_TRACKS: usize = 10;

    /// Manage your playlists
    #[poise::command(
        slash_command,
        prefix_command,
        guild_only,
        rename = "pl",
        aliases("playlist"),
        subcommands("create", "add", "editor", "info", "delete"),
        subcommand_required,
        category = "Playlist"
    )]
    pub async fn playlist(_ctx: Context<'_>) -> Result<()> {
        Ok(())
    }

    /// Create a new playlist
    #[poise::command(slash_command, prefix_command)]
    pub async fn create(
        ctx: Context<'_>,
        #[description = "Name of the playlist"]
        #[rest]
        name: Option<String>,
    ) -> Result<()> {
        let mut session = ReplySession::start(ctx).await;
        session.acknowledge().await?;

        let data = ctx.data();
        let db = &data.database;
        let color = data.color();
        let locale = session.locale().to_string();

        let Some(name) = non_empty_arg(name) else {
            let text = data.i18n.get(&locale, "command.playlist", "create_name");
            return session.update_embed(text, color).await;
        };

        let owner = ctx.author().id.to_string();
        let limit = data.config.player.limit_playlist;
        if playlist::count_owned(db, &owner).await? >= limit as u64 {
            let text = data.i18n.get_with(
                &locale,
                "command.playlist",
                "create_limit",
                &[("limit", limit.to_string().as_str())],
            );
            return session.update_embed(text, color).await;
        }

        let mut id = playlist::generate_playlist_id();
        while playlist::get_playlist(db, &id).await?.is_some() {
            id = playlist::generate_playlist_id();
        }
        let created = playlist::create_playlist(db, &id, &owner, &name).await?;

        let text = data.i18n.get_with(
            &locale,
            "command.playlist",
            "create_success",
            &[("name", created.name.as_str()), ("id", created.id.as_str())],
        );
        session.update_embed(text, color).await
    }

    /// Add songs to one of your playlists
    #[poise::command(slash_command, prefix_command)]
    pub async fn add(
        ctx: Context<'_>,
        #[description = "The id of the playlist"] id: Option<String>,
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
        let text = |key: &str| data.i18n.get(&locale, "command.playlist", key);

        let Some(id) = non_empty_arg(id) else {
            return session.update_embed(text("invalid"), color).await;
        };
        let Some(query) = non_empty_arg(search) else {
            return session.update_embed(text("add_match"), color).await;
        };
        if contains_emoji(&query) {
            let reply = data.i18n.get(&locale, "command.music", "play_emoji");
            return session.update_embed(reply, color).await;
        }

        let author = ctx.author().id;
        let max_ms = max_length::get_max_length(&data.database, &author.to_string()).await?;
        let result = search_tracks(data.lavalink.as_ref(), &query, Some(author), max_ms).await?;
        let Some(first) = result.tracks.first() else {
            return session.update_embed(text("add_match"), color).await;
        };
        session.update_embed(describe_track(first), color).await?;

        let tracks = tracks_to_enqueue(result.kind, result.tracks);
        let outcome = playlist::add_tracks(
            &data.database,
            &id,
            &author.to_string(),
            &tracks,
            data.config.player.limit_track,
        )
        .await?;

        let reply = match outcome {
            AddOutcome::Added { count, .. } => data.i18n.get_with(
                &locale,
                "command.playlist",
                "add_added",
                &[("count", count.to_string().as_str()), ("playlist", id.as_str())],
            ),
            AddOutcome::NotFound => text("invalid"),
            AddOutcome::NotOwner => text("add_owner"),
            AddOutcome::LimitExceeded { limit } => data.i18n.get_with(
                &locale,
                "command.playlist",
                "add_limit_track",
                &[("limit", limit.to_string().as_str())],
            ),
        };
        session.follow_up(embed_reply(reply, color)).await
    }

    /// Edit the id, name, description or visibility of one of your playlists
    #[poise::command(slash_command, prefix_command)]
    pub async fn editor(
        ctx: Context<'_>,
        #[description = "The id of the playlist"] id: Option<String>,
    ) -> Result<()> {
        // No acknowledge here: a slash invocation may still need to open a form,
        // which has to be the first response.
        let mut session = ReplySession::start(ctx).await;

        let data = ctx.data();
        let color = data.color();
        let locale = session.locale().to_string();
        let text = |key: &str| data.i18n.get(&locale, "command.playlist", key);

        let Some(id) = non_empty_arg(id) else {
            return session.send(embed_reply(text("edit_arg"), color)).await;
        };
        let requester = ctx.author().id.to_string();

        let result = match ctx {
            poise::Context::Application(app) => {
                run_edit(&data.database, &id, &requester, &mut FormAnswers::new(app)).await
            }
            poise::Context::Prefix(_) => {
                let mut prompts = PromptAnswers::new(
                    ctx.serenity_context(),
                    ctx.channel_id(),
                    ctx.author().id,
                    &data.i18n,
                    &locale,
                );
                run_edit(&data.database, &id, &requester, &mut prompts).await
            }
        };

        let reply = match result {
            Ok(effective_id) => data.i18n.get_with(
                &locale,
                "command.playlist",
                "edit_success",
                &[("playlistId", effective_id.as_str())],
            ),
            Err(EditError::NotFound(_)) => text("edit_notfound"),
            Err(EditError::NotOwner) => text("edit_playlist_owner"),
            Err(EditError::InvalidMode(_)) => text("edit_invalid_mode"),
            Err(EditError::InvalidId(_)) => text("edit_invalid_id"),
            Err(EditError::IdTaken(taken)) => data.i18n.get_with(
                &locale,
                "command.playlist",
                "edit_id_taken",
                &[("id", taken.as_str())],
            ),
            Err(EditError::Cancelled) => text("edit_cancelled"),
            Err(EditError::Internal(e)) => return Err(e),
        };
        session.send(embed_reply(reply, color)).await
    }

    /// Show a playlist and its first tracks
    #[poise::command(slash_command, prefix_command)]
    pub async fn info(
        ctx: Context<'_>,
        #[description = "The id of the playlist"] id: Option<String>,
    ) -> Result<()> {
        let mut session = ReplySession::start(ctx).await;
        session.acknowledge().await?;

        let data = ctx.data();
        let color = data.color();
        let locale = session.locale().to_string();
        let text = |key: &str| data.i18n.get(&locale, "command.playlist", key);

        let Some(id) = non_empty_arg(id) else {
            return session.update_embed(text("invalid"), color).await;
        };
        let Some(found) = playlist::get_playlist(&data.database, &id).await? else {
            let reply = data.i18n.get_with(
                &locale,
                "command.playlist",
                "notfound",
                &[("id", id.as_str())],
            );
            return session.update_embed(reply, color).await;
        };
        if found.private && found.owner != ctx.author().id.to_string() {
            return session.update_embed(text("info_private"), color).await;
        }

        let tracks = playlist::get_tracks(&data.database, &found.id).await?;
        let mut listing = String::new();
        for (index, track) in tracks.iter().take(INFO_TRACKS).enumerate() {
            let length = u64::try_from(track.length).unwrap_or_default();
            writeln!(listing, "{}. {} `{}`", index + 1, track.title, format_duration(length))?;
        }
        if tracks.len() > INFO_TRACKS {
            let more = (tracks.len() - INFO_TRACKS).to_string();
            listing.push_str(&data.i18n.get_with(
                &locale,
                "command.playlist",
                "info_more",
                &[("count", more.as_str())],
            ));
        }
        if listing.is_empty() {
            listing = text("info_empty");
        }

        let visibility = if found.private { "private" } else { "public" };
        let description = found
            .description
            .clone()
            .unwrap_or_else(|| data.i18n.get(&locale, "global", "none"));
        let tracks_title = data.i18n.get_with(
            &locale,
            "command.playlist",
            "info_tracks",
            &[("count", tracks.len().to_string().as_str())],
        );

        let embed = CreateEmbed::new()
            .title(format!("{} (`{}`)", found.name, found.id))
            .color(color)
            .field(text("info_description"), description, false)
            .field(text("info_owner"), format!("<@{}>", found.owner), true)
            .field(
                text("info_visibility"),
                data.i18n.get(&locale, "global", visibility),
                true,
            )
            .field(tracks_title, listing, false);

        session.update(CreateReply::default().embed(embed)).await
    }

    /// Delete one of your playlists
    #[poise::command(slash_command, prefix_command)]
    pub async fn delete(
        ctx: Context<'_>,
        #[description = "The id of the playlist"] id: Option<String>,
    ) -> Result<()> {
        let mut session = ReplySession::start(ctx).await;
        session.acknowledge().await?;

        let data = ctx.data();
        let color = data.color();
        let locale = session.locale().to_string();
        let text = |key: &str| data.i18n.get(&locale, "command.playlist", key);

        let Some(id) = non_empty_arg(id) else {
            return session.update_embed(text("invalid"), color).await;
        };
        let Some(found) = playlist::get_playlist(&data.database, &id).await? else {
            let reply = data.i18n.get_with(
                &locale,
                "command.playlist",
                "notfound",
                &[("id", id.as_str())],
            );
            return session.update_embed(reply, color).await;
        };
        if found.owner != ctx.author().id.to_string() {
            return session.update_embed(text("delete_owner"), color).await;
        }

        match playlist::delete_playlist(&data.database, &found.id).await {
            // Deleted concurrently by another invocation
            Ok(()) | Err(Error::PlaylistNotFound { .. }) => {}
            Err(e) => return Err(e),
        }

        let reply = data.i18n.get_with(
            &locale,
            "command.playlist",
            "delete_success",
            &[("id", found.id.as_str())],
        );
        session.update_embed(reply, color).await
    }
}

// Re-export all commands
pub use inner::*;
