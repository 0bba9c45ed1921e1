//! Reply lifecycle for one command invocation.
//!
//! Slash commands and prefix commands answer differently: an interaction is
//! deferred and its deferred response edited later, while a text command gets a
//! "thinking" placeholder message that is edited in place. [`ReplySession`] hides
//! the difference so command bodies only ever call `acknowledge`, `update` and
//! `follow_up`.
//!
//! `update` and `follow_up` need a prior `acknowledge` (or `send`); calling them
//! first is a programming error that is logged and returned as
//! [`Error::NotAcknowledged`].

use crate::{
    bot::{BotData, Context, resolve_locale},
    errors::{Error, Result},
};
use poise::{
    CreateReply,
    serenity_prelude::{ChannelId, CreateEmbed, EditInteractionResponse, GuildId, UserId},
};
use std::{future::Future, time::Instant};
use tracing::{debug, error};

/// Where the invocation came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Slash command interaction
    Interactive,
    /// Prefix command in a text message
    Text,
}

/// The platform calls a session needs
pub trait ReplyTransport: Send {
    /// Defers an interaction response
    fn defer(&mut self) -> impl Future<Output = Result<()>> + Send;
    /// Sends the first visible message and remembers it for later edits
    fn send(&mut self, reply: CreateReply) -> impl Future<Output = Result<()>> + Send;
    /// Edits the deferred response or the remembered message
    fn edit(&mut self, reply: CreateReply) -> impl Future<Output = Result<()>> + Send;
    /// Sends an additional message
    fn follow_up(&mut self, reply: CreateReply) -> impl Future<Output = Result<()>> + Send;
}

/// [`ReplyTransport`] backed by a poise context
pub struct PoiseTransport<'a> {
    ctx: Context<'a>,
    handle: Option<poise::ReplyHandle<'a>>,
}

impl<'a> PoiseTransport<'a> {
    /// Wraps `ctx`
    #[must_use]
    pub const fn new(ctx: Context<'a>) -> Self {
        Self { ctx, handle: None }
    }
}

impl ReplyTransport for PoiseTransport<'_> {
    async fn defer(&mut self) -> Result<()> {
        self.ctx.defer().await?;
        Ok(())
    }

    async fn send(&mut self, reply: CreateReply) -> Result<()> {
        self.handle = Some(self.ctx.send(reply).await?);
        Ok(())
    }

    async fn edit(&mut self, reply: CreateReply) -> Result<()> {
        match (&self.handle, self.ctx) {
            (Some(handle), ctx) => handle.edit(ctx, reply).await?,
            (None, poise::Context::Application(app)) => {
                let mut edit = EditInteractionResponse::new().embeds(reply.embeds);
                if let Some(content) = reply.content {
                    edit = edit.content(content);
                }
                if let Some(components) = reply.components {
                    edit = edit.components(components);
                }
                app.interaction.edit_response(self.ctx.http(), edit).await?;
            }
            (None, poise::Context::Prefix(_)) => return Err(Error::NotAcknowledged),
        }
        Ok(())
    }

    async fn follow_up(&mut self, reply: CreateReply) -> Result<()> {
        self.ctx.send(reply).await?;
        Ok(())
    }
}

/// Invocation details a session carries
#[derive(Debug, Clone)]
pub struct SessionInfo {
    /// Slash or prefix
    pub origin: Origin,
    /// Who invoked the command
    pub actor: UserId,
    /// Guild, when invoked in one
    pub guild_id: Option<GuildId>,
    /// Channel the command was invoked in
    pub channel_id: ChannelId,
    /// Locale for replies
    pub locale: String,
    /// Qualified command name
    pub command: String,
    /// Framework invocation id
    pub invocation_id: u64,
    /// Rendered "thinking" placeholder for text commands
    pub placeholder: String,
}

/// Reply state machine for one invocation
pub struct ReplySession<T> {
    transport: T,
    info: SessionInfo,
    acknowledged: bool,
    created_at: Instant,
}

impl<'a> ReplySession<PoiseTransport<'a>> {
    /// Starts a session for a poise invocation, resolving the guild locale.
    pub async fn start(ctx: Context<'a>) -> Self {
        let data: &BotData = ctx.data();
        let locale = resolve_locale(data, ctx.guild_id()).await;
        let bot_name = ctx.cache().current_user().name.clone();
        let placeholder = data
            .i18n
            .get_with(&locale, "global", "thinking", &[("bot", bot_name.as_str())]);
        let origin = match ctx {
            poise::Context::Application(_) => Origin::Interactive,
            poise::Context::Prefix(_) => Origin::Text,
        };

        Self::new(
            PoiseTransport::new(ctx),
            SessionInfo {
                origin,
                actor: ctx.author().id,
                guild_id: ctx.guild_id(),
                channel_id: ctx.channel_id(),
                locale,
                command: ctx.command().qualified_name.clone(),
                invocation_id: ctx.id(),
                placeholder,
            },
        )
    }
}

impl<T: ReplyTransport> ReplySession<T> {
    /// Creates an unacknowledged session
    pub fn new(transport: T, info: SessionInfo) -> Self {
        Self {
            transport,
            info,
            acknowledged: false,
            created_at: Instant::now(),
        }
    }

    /// Invocation details
    pub const fn info(&self) -> &SessionInfo {
        &self.info
    }

    /// Locale replies should use
    pub fn locale(&self) -> &str {
        &self.info.locale
    }

    /// Whether a first response has been produced
    pub const fn is_acknowledged(&self) -> bool {
        self.acknowledged
    }

    /// Time since the session started
    pub fn elapsed(&self) -> std::time::Duration {
        self.created_at.elapsed()
    }

    /// Produces the first response: a deferral for interactions, the placeholder
    /// message for text commands. A second call does nothing.
    pub async fn acknowledge(&mut self) -> Result<()> {
        if self.acknowledged {
            debug!(
                command = %self.info.command,
                invocation_id = self.info.invocation_id,
                "Reply already acknowledged"
            );
            return Ok(());
        }
        match self.info.origin {
            Origin::Interactive => self.transport.defer().await?,
            Origin::Text => {
                let placeholder = CreateReply::default().content(self.info.placeholder.clone());
                self.transport.send(placeholder).await?;
            }
        }
        self.acknowledged = true;
        Ok(())
    }

    /// Sends a first response directly, without deferring.
    pub async fn send(&mut self, reply: CreateReply) -> Result<()> {
        self.transport.send(reply).await?;
        self.acknowledged = true;
        Ok(())
    }

    /// Replaces the acknowledged response with `reply`.
    ///
    /// For text commands an embed-only reply clears the placeholder text.
    pub async fn update(&mut self, mut reply: CreateReply) -> Result<()> {
        self.ensure_acknowledged("update")?;
        if self.info.origin == Origin::Text && reply.content.is_none() && !reply.embeds.is_empty() {
            reply.content = Some(String::new());
        }
        self.transport.edit(reply).await
    }

    /// Sends an additional message after the acknowledged response.
    pub async fn follow_up(&mut self, reply: CreateReply) -> Result<()> {
        self.ensure_acknowledged("follow_up")?;
        self.transport.follow_up(reply).await
    }

    /// [`Self::update`] with a single embed carrying `text`
    pub async fn update_embed(&mut self, text: impl Into<String>, color: u32) -> Result<()> {
        self.update(embed_reply(text, color)).await
    }

    fn ensure_acknowledged(&self, operation: &str) -> Result<()> {
        if self.acknowledged {
            return Ok(());
        }
        error!(
            operation,
            command = %self.info.command,
            invocation_id = self.info.invocation_id,
            "Reply used before acknowledge"
        );
        Err(Error::NotAcknowledged)
    }
}

/// A reply holding one embed with `text` as its description
#[must_use]
pub fn embed_reply(text: impl Into<String>, color: u32) -> CreateReply {
    CreateReply::default().embed(CreateEmbed::new().description(text).color(color))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Call {
        Defer,
        Send(Option<String>),
        Edit(Option<String>, usize),
        FollowUp(Option<String>),
    }

    #[derive(Default)]
    struct Recording {
        calls: Vec<Call>,
    }

    impl ReplyTransport for &mut Recording {
        async fn defer(&mut self) -> Result<()> {
            self.calls.push(Call::Defer);
            Ok(())
        }

        async fn send(&mut self, reply: CreateReply) -> Result<()> {
            self.calls.push(Call::Send(reply.content));
            Ok(())
        }

        async fn edit(&mut self, reply: CreateReply) -> Result<()> {
            self.calls.push(Call::Edit(reply.content, reply.embeds.len()));
            Ok(())
        }

        async fn follow_up(&mut self, reply: CreateReply) -> Result<()> {
            self.calls.push(Call::FollowUp(reply.content));
            Ok(())
        }
    }

    fn info(origin: Origin) -> SessionInfo {
        SessionInfo {
            origin,
            actor: UserId::new(1),
            guild_id: Some(GuildId::new(2)),
            channel_id: ChannelId::new(3),
            locale: "en".to_string(),
            command: "play".to_string(),
            invocation_id: 42,
            placeholder: "**Buddy** is thinking...".to_string(),
        }
    }

    #[tokio::test]
    async fn test_update_before_acknowledge_fails() {
        let mut recording = Recording::default();
        let mut session = ReplySession::new(&mut recording, info(Origin::Interactive));

        let result = session.update(CreateReply::default().content("hi")).await;
        assert!(matches!(result, Err(Error::NotAcknowledged)));
        let result = session.follow_up(CreateReply::default().content("hi")).await;
        assert!(matches!(result, Err(Error::NotAcknowledged)));

        drop(session);
        assert!(recording.calls.is_empty());
    }

    #[tokio::test]
    async fn test_interactive_defers_once() {
        let mut recording = Recording::default();
        let mut session = ReplySession::new(&mut recording, info(Origin::Interactive));

        session.acknowledge().await.unwrap();
        session.acknowledge().await.unwrap();
        assert!(session.is_acknowledged());
        session.update(CreateReply::default().content("done")).await.unwrap();

        drop(session);
        assert_eq!(
            recording.calls,
            vec![Call::Defer, Call::Edit(Some("done".to_string()), 0)]
        );
    }

    #[tokio::test]
    async fn test_text_sends_placeholder() {
        let mut recording = Recording::default();
        let mut session = ReplySession::new(&mut recording, info(Origin::Text));

        session.acknowledge().await.unwrap();

        drop(session);
        assert_eq!(
            recording.calls,
            vec![Call::Send(Some("**Buddy** is thinking...".to_string()))]
        );
    }

    #[tokio::test]
    async fn test_text_embed_update_clears_placeholder() {
        let mut recording = Recording::default();
        let mut session = ReplySession::new(&mut recording, info(Origin::Text));

        session.acknowledge().await.unwrap();
        session.update_embed("Queued", 0).await.unwrap();

        drop(session);
        assert_eq!(recording.calls[1], Call::Edit(Some(String::new()), 1));
    }

    #[tokio::test]
    async fn test_interactive_embed_update_keeps_content_unset() {
        let mut recording = Recording::default();
        let mut session = ReplySession::new(&mut recording, info(Origin::Interactive));

        session.acknowledge().await.unwrap();
        session.update_embed("Queued", 0).await.unwrap();

        drop(session);
        assert_eq!(recording.calls[1], Call::Edit(None, 1));
    }

    #[tokio::test]
    async fn test_send_counts_as_acknowledged() {
        let mut recording = Recording::default();
        let mut session = ReplySession::new(&mut recording, info(Origin::Interactive));

        session.send(CreateReply::default().content("first")).await.unwrap();
        session.follow_up(CreateReply::default().content("second")).await.unwrap();

        drop(session);
        assert_eq!(
            recording.calls,
            vec![
                Call::Send(Some("first".to_string())),
                Call::FollowUp(Some("second".to_string())),
            ]
        );
    }
}
