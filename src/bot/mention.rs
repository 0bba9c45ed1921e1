//! Mention parsing.
//!
//! Text is checked for mention syntax in a fixed order: user, channel, role,
//! then `@everyone`/`@here`. The first kind that appears anywhere in the text
//! wins. Parsing is pure; [`resolve`] turns the token into platform objects.

use poise::serenity_prelude::{self as serenity, CacheHttp, ChannelId, GuildId, RoleId, UserId};
use regex::Regex;
use std::sync::LazyLock;

#[allow(clippy::expect_used)] // Literal patterns, covered by tests
static USER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<@!?(\d{17,19})>").expect("user mention pattern is valid"));
#[allow(clippy::expect_used)]
static CHANNEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<#(\d{17,19})>").expect("channel mention pattern is valid"));
#[allow(clippy::expect_used)]
static ROLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<@&(\d{17,19})>").expect("role mention pattern is valid"));
#[allow(clippy::expect_used)]
static EVERYONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@(everyone|here)").expect("broadcast pattern is valid"));

/// Mention syntax found in text, before any lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MentionToken {
    /// `<@id>` or `<@!id>`
    User(UserId),
    /// `<#id>`
    Channel(ChannelId),
    /// `<@&id>`
    Role(RoleId),
    /// `@everyone` (`here == false`) or `@here`
    Everyone {
        /// Whether the marker was `@here`
        here: bool,
    },
}

fn capture_id(pattern: &Regex, text: &str) -> Option<u64> {
    pattern
        .captures(text)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
        // Ids are never zero; the typed id constructors would panic on it
        .filter(|id| *id != 0)
}

impl MentionToken {
    /// Finds the highest-priority mention in `text`.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        if let Some(id) = capture_id(&USER, text) {
            return Some(Self::User(UserId::new(id)));
        }
        if let Some(id) = capture_id(&CHANNEL, text) {
            return Some(Self::Channel(ChannelId::new(id)));
        }
        if let Some(id) = capture_id(&ROLE, text) {
            return Some(Self::Role(RoleId::new(id)));
        }
        EVERYONE
            .captures(text)
            .and_then(|c| c.get(1))
            .map(|m| Self::Everyone {
                here: m.as_str() == "here",
            })
    }
}

/// User a command argument points at: a user mention or a bare user id.
///
/// Other mention kinds are not users and yield `None`.
#[must_use]
pub fn user_target(text: &str) -> Option<UserId> {
    let text = text.trim();
    if let Ok(id) = text.parse::<u64>() {
        return (id != 0).then(|| UserId::new(id));
    }
    match MentionToken::parse(text)? {
        MentionToken::User(id) => Some(id),
        _ => None,
    }
}

/// A mention resolved against the platform
#[derive(Debug, Clone)]
pub enum Mention {
    /// A user
    User(Box<serenity::User>),
    /// A channel
    Channel(Box<serenity::Channel>),
    /// A guild role
    Role(Box<serenity::Role>),
    /// `@everyone` / `@here`
    Everyone {
        /// Whether the marker was `@here`
        here: bool,
    },
    /// The syntax matched but the target could not be fetched
    Unresolved(MentionToken),
}

/// Fetches the object a token refers to.
///
/// Lookups that fail (unknown id, missing access, role outside a guild) yield
/// [`Mention::Unresolved`] rather than an error.
pub async fn resolve(
    cache_http: impl CacheHttp,
    guild_id: Option<GuildId>,
    token: MentionToken,
) -> Mention {
    let resolved = match token {
        MentionToken::User(id) => id
            .to_user(&cache_http)
            .await
            .ok()
            .map(|user| Mention::User(Box::new(user))),
        MentionToken::Channel(id) => id
            .to_channel(&cache_http)
            .await
            .ok()
            .map(|channel| Mention::Channel(Box::new(channel))),
        MentionToken::Role(id) => match guild_id {
            Some(guild_id) => guild_id
                .roles(cache_http.http())
                .await
                .ok()
                .and_then(|mut roles| roles.remove(&id))
                .map(|role| Mention::Role(Box::new(role))),
            None => None,
        },
        MentionToken::Everyone { here } => Some(Mention::Everyone { here }),
    };
    resolved.unwrap_or(Mention::Unresolved(token))
}

#[cfg(test)]
mod tests {
    use super::*;

    const USER_ID: u64 = 123_456_789_012_345_678;
    const OTHER_ID: u64 = 876_543_210_987_654_321;

    #[test]
    fn test_user_mentions() {
        assert_eq!(
            MentionToken::parse("<@123456789012345678>"),
            Some(MentionToken::User(UserId::new(USER_ID)))
        );
        assert_eq!(
            MentionToken::parse("hey <@!123456789012345678> there"),
            Some(MentionToken::User(UserId::new(USER_ID)))
        );
    }

    #[test]
    fn test_role_is_not_a_user() {
        assert_eq!(
            MentionToken::parse("<@&123456789012345678>"),
            Some(MentionToken::Role(RoleId::new(USER_ID)))
        );
    }

    #[test]
    fn test_priority_order() {
        // User beats channel even when the channel comes first
        assert_eq!(
            MentionToken::parse("<#876543210987654321> <@123456789012345678>"),
            Some(MentionToken::User(UserId::new(USER_ID)))
        );
        assert_eq!(
            MentionToken::parse("<@&123456789012345678> <#876543210987654321>"),
            Some(MentionToken::Channel(ChannelId::new(OTHER_ID)))
        );
        assert_eq!(
            MentionToken::parse("@everyone <@&123456789012345678>"),
            Some(MentionToken::Role(RoleId::new(USER_ID)))
        );
    }

    #[test]
    fn test_broadcast_markers() {
        assert_eq!(
            MentionToken::parse("@here listen"),
            Some(MentionToken::Everyone { here: true })
        );
        assert_eq!(
            MentionToken::parse("@everyone"),
            Some(MentionToken::Everyone { here: false })
        );
    }

    #[test]
    fn test_user_target() {
        assert_eq!(
            user_target("<@!123456789012345678>"),
            Some(UserId::new(USER_ID))
        );
        assert_eq!(user_target(" 123456789012345678 "), Some(UserId::new(USER_ID)));
        assert_eq!(user_target("<#123456789012345678>"), None);
        assert_eq!(user_target("@everyone"), None);
        assert_eq!(user_target("0"), None);
        assert_eq!(user_target("someone"), None);
    }

    #[test]
    fn test_no_mention() {
        assert_eq!(MentionToken::parse("just text"), None);
        // Too short to be a snowflake
        assert_eq!(MentionToken::parse("<@1234>"), None);
    }
}
