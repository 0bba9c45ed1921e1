//! Command metadata for `help`.
//!
//! Names, aliases and parameters come straight from the registered poise
//! commands; the permission tier is derived from the checks poise enforces.

use crate::{bot::BotData, errors::Error, i18n::I18n};
use poise::Command;
use std::fmt::Write;

/// Who may run a command
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Tier {
    /// Anyone
    Member,
    /// Members with Manage Server
    Manager,
    /// Bot owners only
    Owner,
}

impl Tier {
    /// Tier enforced for `command`
    #[must_use]
    pub fn of(command: &Command<BotData, Error>) -> Self {
        if command.owners_only {
            Self::Owner
        } else if command.required_permissions.is_empty() {
            Self::Member
        } else {
            Self::Manager
        }
    }

    const fn key(self) -> &'static str {
        match self {
            Self::Member => "tier_member",
            Self::Manager => "tier_manager",
            Self::Owner => "tier_owner",
        }
    }
}

/// One invocable command (subcommands are listed separately)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandEntry {
    /// Full name, e.g. `pl add`
    pub name: String,
    /// Prefix aliases
    pub aliases: Vec<String>,
    /// Parameters, `<required>` and `[optional]`
    pub usage: String,
    /// Permission tier
    pub tier: Tier,
    /// Short description
    pub description: String,
}

fn usage(command: &Command<BotData, Error>) -> String {
    command
        .parameters
        .iter()
        .map(|p| {
            if p.required {
                format!("<{}>", p.name)
            } else {
                format!("[{}]", p.name)
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn collect(command: &Command<BotData, Error>, parent: Option<&str>, out: &mut Vec<CommandEntry>) {
    let name = match parent {
        Some(parent) => format!("{parent} {}", command.name),
        None => command.name.clone(),
    };
    if command.subcommands.is_empty() {
        out.push(CommandEntry {
            aliases: command.aliases.clone(),
            usage: usage(command),
            tier: Tier::of(command),
            description: command.description.clone().unwrap_or_default(),
            name,
        });
    } else {
        for sub in &command.subcommands {
            collect(sub, Some(&name), out);
        }
    }
}

/// Flattens commands and their subcommands into entries
#[must_use]
pub fn entries(commands: &[Command<BotData, Error>]) -> Vec<CommandEntry> {
    let mut out = Vec::new();
    for command in commands {
        collect(command, None, &mut out);
    }
    out
}

/// Localized help text
pub fn render_help(
    entries: &[CommandEntry],
    i18n: &I18n,
    locale: &str,
    prefix: &str,
) -> Result<String, std::fmt::Error> {
    let aliases_label = i18n.get(locale, "command.general", "help_aliases");
    let mut text = format!("**{}**\n", i18n.get(locale, "command.general", "help_title"));

    for entry in entries {
        write!(text, "`{prefix}{}", entry.name)?;
        if !entry.usage.is_empty() {
            write!(text, " {}", entry.usage)?;
        }
        write!(text, "` - {}", entry.description)?;
        if entry.tier != Tier::Member {
            write!(text, " ({})", i18n.get(locale, "command.general", entry.tier.key()))?;
        }
        if !entry.aliases.is_empty() {
            write!(text, " [{aliases_label}: {}]", entry.aliases.join(", "))?;
        }
        text.push('\n');
    }

    write!(
        text,
        "\n{}",
        i18n.get_with(locale, "command.general", "help_footer", &[("prefix", prefix)])
    )?;
    Ok(text)
}
