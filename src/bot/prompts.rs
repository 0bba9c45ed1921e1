//! Editor front-ends.
//!
//! Both collect [`EditAnswers`] for [`crate::core::editor::run_edit`]. Text
//! commands ask four questions in the channel and read the author's next
//! message for each. Slash commands open a modal form instead.

use crate::{
    bot::{BotData, best_effort::BestEffort},
    core::editor::{AnswerSource, EditAnswers, EditError},
    entities::playlist::Model as PlaylistModel,
    errors::Error,
    i18n::I18n,
};
use poise::serenity_prelude::{self as serenity, ChannelId, UserId};
use std::{future::Future, time::Duration};
use tracing::debug;

/// How long each text question waits for an answer
pub const PROMPT_TIMEOUT: Duration = Duration::from_secs(30);

/// How long the modal form stays open
pub const FORM_TIMEOUT: Duration = Duration::from_secs(60);

const QUESTION_KEYS: [&str; 4] = [
    "edit_playlist_id_label",
    "edit_playlist_name_label",
    "edit_playlist_des_label",
    "edit_playlist_private_label",
];

/// One question/answer exchange with the invoking user
pub trait QuestionTransport: Send {
    /// Asks `question` and waits for the answer; `None` when none arrives in time.
    fn ask(&mut self, question: &str) -> impl Future<Output = Result<Option<String>, Error>> + Send;
}

/// Asks in a text channel and reads the author's next message.
///
/// Both the question and the answer are deleted afterwards, best-effort.
pub struct ChannelQuestions<'a> {
    ctx: &'a serenity::Context,
    channel_id: ChannelId,
    author_id: UserId,
}

impl QuestionTransport for ChannelQuestions<'_> {
    async fn ask(&mut self, question: &str) -> Result<Option<String>, Error> {
        let asked = self.channel_id.say(self.ctx, question).await?;

        let answer = self
            .channel_id
            .await_reply(self.ctx)
            .author_id(self.author_id)
            .timeout(PROMPT_TIMEOUT)
            .await;

        let content = match answer {
            Some(message) => {
                message.delete(self.ctx).await.best_effort("delete answer");
                Some(message.content)
            }
            None => None,
        };
        asked.delete(self.ctx).await.best_effort("delete question");
        Ok(content)
    }
}

/// Asks the editor questions one by one.
///
/// An unanswered question counts as an empty answer.
pub struct PromptAnswers<T> {
    transport: T,
    questions: [String; 4],
}

impl<'a> PromptAnswers<ChannelQuestions<'a>> {
    /// Prepares localized questions for `author_id` in `channel_id`
    #[must_use]
    pub fn new(
        ctx: &'a serenity::Context,
        channel_id: ChannelId,
        author_id: UserId,
        i18n: &I18n,
        locale: &str,
    ) -> Self {
        Self::with_transport(
            ChannelQuestions {
                ctx,
                channel_id,
                author_id,
            },
            QUESTION_KEYS.map(|key| i18n.get(locale, "command.playlist", key)),
        )
    }
}

impl<T: QuestionTransport> PromptAnswers<T> {
    /// Asks `questions` (id, name, description, visibility) over `transport`
    #[must_use]
    pub const fn with_transport(transport: T, questions: [String; 4]) -> Self {
        Self {
            transport,
            questions,
        }
    }
}

impl<T: QuestionTransport> AnswerSource for PromptAnswers<T> {
    async fn collect(&mut self, playlist: &PlaylistModel) -> Result<EditAnswers, EditError> {
        let mut replies: [String; 4] = Default::default();

        for (question, reply) in self.questions.iter().zip(replies.iter_mut()) {
            match self.transport.ask(question).await? {
                Some(answer) => *reply = answer,
                None => debug!(playlist_id = %playlist.id, %question, "Editor question timed out"),
            }
        }

        Ok(EditAnswers::from_replies(replies))
    }
}

#[derive(Debug, poise::Modal)]
#[name = "Playlist editor"]
struct PlaylistEditorModal {
    #[name = "Playlist ID"]
    #[max_length = 100]
    id: Option<String>,
    #[name = "Playlist name"]
    #[max_length = 100]
    name: Option<String>,
    #[name = "Playlist description"]
    #[paragraph]
    #[max_length = 1000]
    description: Option<String>,
    #[name = "public / private"]
    #[max_length = 10]
    visibility: Option<String>,
}

/// Shows the editor as a single modal form, prefilled with current values.
///
/// A form that is never submitted cancels the edit.
pub struct FormAnswers<'a> {
    ctx: poise::ApplicationContext<'a, BotData, Error>,
}

impl<'a> FormAnswers<'a> {
    /// Form for the slash invocation `ctx`
    #[must_use]
    pub const fn new(ctx: poise::ApplicationContext<'a, BotData, Error>) -> Self {
        Self { ctx }
    }
}

impl AnswerSource for FormAnswers<'_> {
    async fn collect(&mut self, playlist: &PlaylistModel) -> Result<EditAnswers, EditError> {
        let defaults = PlaylistEditorModal {
            id: Some(playlist.id.clone()),
            name: Some(playlist.name.clone()),
            description: playlist.description.clone(),
            visibility: Some(if playlist.private { "private" } else { "public" }.to_string()),
        };

        let submitted = poise::execute_modal(self.ctx, Some(defaults), Some(FORM_TIMEOUT))
            .await
            .map_err(Error::from)?;

        let Some(form) = submitted else {
            debug!(playlist_id = %playlist.id, "Editor form timed out");
            return Err(EditError::Cancelled);
        };

        Ok(EditAnswers {
            id: form.id,
            name: form.name,
            description: form.description,
            visibility: form.visibility,
        })
    }
}
