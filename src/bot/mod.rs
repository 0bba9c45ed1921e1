//! Bot layer - Discord-specific interface and command handlers
//!
//! This module provides the Discord interface for the PlaylistBuddy application,
//! including all commands, autocomplete and gateway handlers, reply sessions and
//! bot context management.

/// Fallible calls that must not abort a command
pub mod best_effort;
/// Discord command implementations (music, playlist, settings, general)
pub mod commands;
/// Discord interaction and gateway handlers
pub mod handlers;
/// Mention parsing and resolution
pub mod mention;
/// Prompt and form front-ends of the playlist editor
pub mod prompts;
/// Command metadata used by `help`
pub mod registry;
/// Reply lifecycle of one invocation
pub mod session;

use crate::{
    audio::{LavalinkNode, Playback},
    bot::best_effort::BestEffort,
    config::AppConfig,
    core::{language, search::DirectLinks},
    errors::{Error, Result},
    i18n::{DEFAULT_LOCALE, I18n},
};
use poise::serenity_prelude::{self as serenity, GuildId, UserId};
use sea_orm::DatabaseConnection;
use songbird::{SerenityInit, Songbird};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

/// Shared data available to all bot commands.
/// This structure holds the database connection, the audio layer and everything
/// else commands need to access.
pub struct BotData {
    /// Database connection for all database operations
    pub database: DatabaseConnection,
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Localized strings
    pub i18n: I18n,
    /// Lavalink node that resolves queries into tracks
    pub lavalink: Arc<LavalinkNode>,
    /// Voice connections and guild queues
    pub playback: Arc<Playback>,
    /// Compiled direct-link patterns for autocomplete
    pub direct_links: DirectLinks,
}

impl BotData {
    /// Bundles the shared state. Fails if a configured link pattern is invalid.
    pub fn new(
        database: DatabaseConnection,
        config: Arc<AppConfig>,
        i18n: I18n,
        lavalink: Arc<LavalinkNode>,
        playback: Arc<Playback>,
    ) -> Result<Self> {
        let direct_links = DirectLinks::from_patterns(&config.player.direct_link_patterns)?;
        Ok(Self {
            database,
            config,
            i18n,
            lavalink,
            playback,
            direct_links,
        })
    }

    /// Embed color from configuration
    #[must_use]
    pub fn color(&self) -> u32 {
        self.config.bot.embed_color
    }
}

/// Poise context used by every command
pub type Context<'a> = poise::Context<'a, BotData, Error>;

/// Locale for replies in `guild_id`: the stored guild preference, otherwise the
/// configured default. Lookup failures are logged and fall back.
pub async fn resolve_locale(data: &BotData, guild_id: Option<GuildId>) -> String {
    let stored = match guild_id {
        Some(guild_id) => language::get_guild_language(&data.database, &guild_id.to_string())
            .await
            .inspect_err(|e| warn!(%guild_id, error = %e, "Failed to read guild language"))
            .ok()
            .flatten(),
        None => None,
    };

    [stored, Some(data.config.bot.language.clone())]
        .into_iter()
        .flatten()
        .find(|code| data.i18n.has_locale(code))
        .unwrap_or_else(|| DEFAULT_LOCALE.to_string())
}

async fn on_error(error: poise::FrameworkError<'_, BotData, Error>) {
    match error {
        poise::FrameworkError::Setup { error, .. } => {
            error!(error = %error, "Failed to start bot");
        }
        poise::FrameworkError::Command { error, ctx, .. } => {
            error!(
                command = %ctx.command().qualified_name,
                invocation_id = ctx.id(),
                error = %error,
                "Command failed"
            );
            let locale = resolve_locale(ctx.data(), ctx.guild_id()).await;
            let text = ctx.data().i18n.get(&locale, "global", "error");
            ctx.say(text).await.best_effort("send error reply");
        }
        error => {
            if let Err(e) = poise::builtins::on_error(error).await {
                error!("Error while handling error: {}", e);
            }
        }
    }
}

/// Builds the framework and runs the client until it stops.
#[instrument(skip(token, config, database, lavalink))]
pub async fn run_bot(
    token: String,
    config: Arc<AppConfig>,
    database: DatabaseConnection,
    lavalink: Arc<LavalinkNode>,
) -> Result<()> {
    let i18n = I18n::load()?;
    let playback = Arc::new(Playback::new(Songbird::serenity()));
    let data = BotData::new(
        database,
        Arc::clone(&config),
        i18n,
        lavalink,
        Arc::clone(&playback),
    )?;

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: commands::all(),
            prefix_options: poise::PrefixFrameworkOptions {
                prefix: Some(config.bot.prefix.clone()),
                ..Default::default()
            },
            owners: config.bot.owner_id.map(UserId::new).into_iter().collect(),
            on_error: |error| Box::pin(on_error(error)),
            event_handler: |ctx, event, framework, data| {
                Box::pin(handlers::events::handle_event(ctx, event, framework, data))
            },
            ..Default::default()
        })
        .setup(|ctx, ready, framework| {
            Box::pin(async move {
                info!("Logged in as {}", ready.user.name);
                info!("Registering commands globally...");
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                Ok(data)
            })
        })
        .build();

    let intents = serenity::GatewayIntents::GUILDS
        | serenity::GatewayIntents::GUILD_VOICE_STATES
        | serenity::GatewayIntents::GUILD_MESSAGES
        | serenity::GatewayIntents::MESSAGE_CONTENT;

    info!("Setting up Serenity client for Poise framework...");
    let mut client = serenity::ClientBuilder::new(&token, intents)
        .framework(framework)
        .register_songbird_with(playback.songbird())
        .await
        .inspect_err(|e| error!("Error creating client: {:?}", e))?;

    info!("Starting bot client...");
    client
        .start()
        .await
        .inspect_err(|e| error!("Client error: {:?}", e))?;
    Ok(())
}
