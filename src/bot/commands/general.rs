//! General Discord commands - ping, help, and other utility commands.
//! This module contains simple commands that don't require database operations
//! and provide basic bot functionality and user assistance.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{Context, registry, resolve_locale},
        errors::Result,
    };

    /// Responds with the gateway latency to test bot connectivity.
    ///
    /// This is a simple health check command that doesn't require any database operations.
    #[poise::command(slash_command, prefix_command, category = "General")]
    pub async fn ping(ctx: Context<'_>) -> Result<()> {
        let data = ctx.data();
        let locale = resolve_locale(data, ctx.guild_id()).await;
        let latency = format!("{}ms", ctx.ping().await.as_millis());
        let text = data.i18n.get_with(
            &locale,
            "command.general",
            "ping",
            &[("latency", latency.as_str())],
        );
        ctx.say(text).await?;
        Ok(())
    }

    /// Displays help information about available commands.
    ///
    /// Lists every command with its aliases, parameters and who may use it.
    #[poise::command(slash_command, prefix_command, category = "General")]
    pub async fn help(ctx: Context<'_>) -> Result<()> {
        let data = ctx.data();
        let locale = resolve_locale(data, ctx.guild_id()).await;
        let entries = registry::entries(&ctx.framework().options().commands);
        let text = registry::render_help(&entries, &data.i18n, &locale, &data.config.bot.prefix)?;

        ctx.say(text).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
