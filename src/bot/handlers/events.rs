//! Gateway events the bot reacts to outside of commands.
//!
//! Songbird consumes the voice gateway events it needs on its own; this handler
//! only notices when the bot itself drops out of voice so the guild's queue can
//! be discarded.

use crate::{
    bot::BotData,
    errors::{Error, Result},
};
use poise::serenity_prelude::{self as serenity, FullEvent};
use tracing::{debug, info};

/// Handles one gateway event.
pub async fn handle_event(
    ctx: &serenity::Context,
    event: &FullEvent,
    _framework: poise::FrameworkContext<'_, BotData, Error>,
    data: &BotData,
) -> Result<()> {
    match event {
        FullEvent::Ready { data_about_bot } => {
            info!(guilds = data_about_bot.guilds.len(), "Gateway ready");
        }
        FullEvent::VoiceStateUpdate { new, .. } => {
            let bot_id = ctx.cache.current_user().id;
            if new.user_id != bot_id {
                return Ok(());
            }
            let Some(guild_id) = new.guild_id else {
                return Ok(());
            };
            debug!(%guild_id, channel_id = ?new.channel_id, "Bot voice state update");
            if new.channel_id.is_none() {
                data.playback.disconnected(guild_id).await;
            }
        }
        _ => {}
    }
    Ok(())
}
