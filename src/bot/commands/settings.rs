//! Settings Discord commands - per-user track length caps and the guild language.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{
            Context,
            commands::non_empty_arg,
            mention::{self, Mention, MentionToken},
            session::ReplySession,
        },
        core::{
            duration::{format_duration, parse_duration},
            language, max_length,
        },
        errors::{Error, Result},
    };
    use poise::serenity_prelude::{Mentionable, UserId};
    use tracing::info;

    /// Whether the author holds Manage Server in the current guild
    async fn author_is_manager(ctx: Context<'_>) -> bool {
        if let poise::Context::Application(app) = ctx {
            if let Some(permissions) = app.interaction.member.as_ref().and_then(|m| m.permissions) {
                return permissions.manage_guild();
            }
        }
        let Some(member) = ctx.author_member().await else {
            return false;
        };
        ctx.guild()
            .is_some_and(|guild| guild.member_permissions(&member).manage_guild())
    }

    /// Limit how long the tracks a user queues can be.
    ///
    /// Without a user the limit applies to yourself. Changing someone else's
    /// limit requires Manage Server.
    #[poise::command(slash_command, prefix_command, guild_only, category = "Settings")]
    pub async fn maxlength(
        ctx: Context<'_>,
        #[description = "Duration like 210, 3:30 or 1:02:03, or off"] duration: Option<String>,
        #[description = "User mention or id (requires Manage Server)"]
        #[rest]
        user: Option<String>,
    ) -> Result<()> {
        let mut session = ReplySession::start(ctx).await;
        session.acknowledge().await?;

        let data = ctx.data();
        let color = data.color();
        let locale = session.locale().to_string();
        let text = |key: &str| data.i18n.get(&locale, "command.settings", key);

        let author = ctx.author().id;
        let target: UserId = match non_empty_arg(user) {
            None => author,
            Some(raw) => {
                let Some(id) = mention::user_target(&raw) else {
                    return session.update_embed(text("maxlength_target"), color).await;
                };
                let resolved =
                    mention::resolve(ctx.serenity_context(), ctx.guild_id(), MentionToken::User(id))
                        .await;
                match resolved {
                    Mention::User(user) => user.id,
                    _ => return session.update_embed(text("maxlength_target"), color).await,
                }
            }
        };

        if target != author && !author_is_manager(ctx).await {
            return session.update_embed(text("maxlength_forbidden"), color).await;
        }

        let Some(duration) = non_empty_arg(duration) else {
            return session.update_embed(text("maxlength_invalid"), color).await;
        };
        let user_key = target.to_string();
        let user_mention = target.mention().to_string();

        if duration.eq_ignore_ascii_case("off") {
            let removed = max_length::clear_max_length(&data.database, &user_key).await?;
            let key = if removed { "maxlength_clear" } else { "maxlength_none" };
            let reply = data.i18n.get_with(
                &locale,
                "command.settings",
                key,
                &[("user", user_mention.as_str())],
            );
            return session.update_embed(reply, color).await;
        }

        let Some(max_ms) = parse_duration(&duration).filter(|ms| *ms > 0) else {
            return session.update_embed(text("maxlength_invalid"), color).await;
        };
        max_length::set_max_length(&data.database, &user_key, max_ms).await?;
        info!(user_id = %target, set_by = %author, max_ms, "Max track length set");

        let reply = data.i18n.get_with(
            &locale,
            "command.settings",
            "maxlength_set",
            &[
                ("user", user_mention.as_str()),
                ("duration", format_duration(max_ms).as_str()),
            ],
        );
        session.update_embed(reply, color).await
    }

    /// Change the language the bot replies in on this server
    #[poise::command(
        slash_command,
        prefix_command,
        guild_only,
        required_permissions = "MANAGE_GUILD",
        category = "Settings"
    )]
    pub async fn language(
        ctx: Context<'_>,
        #[description = "Language code, e.g. en or vi"] code: Option<String>,
    ) -> Result<()> {
        let mut session = ReplySession::start(ctx).await;
        session.acknowledge().await?;

        let data = ctx.data();
        let color = data.color();
        let guild_id = ctx.guild_id().ok_or(Error::GuildOnly)?;

        let requested = non_empty_arg(code).map(|c| c.to_lowercase());
        let Some(code) = requested.filter(|c| data.i18n.has_locale(c)) else {
            let languages = data.i18n.available().join(", ");
            let reply = data.i18n.get_with(
                session.locale(),
                "command.settings",
                "language_invalid",
                &[("languages", languages.as_str())],
            );
            return session.update_embed(reply, color).await;
        };

        language::set_guild_language(&data.database, &guild_id.to_string(), &code).await?;
        info!(%guild_id, language = %code, "Guild language changed");

        // Confirm in the new language
        let reply = data.i18n.get_with(
            &code,
            "command.settings",
            "language_set",
            &[("language", code.as_str())],
        );
        session.update_embed(reply, color).await
    }
}

// Re-export all commands
pub use inner::*;
