//! Guild locale preference.

use crate::{
    entities::{GuildLanguage, guild_language},
    errors::Result,
};
use sea_orm::{ActiveModelTrait, Set, prelude::*};

/// Locale chosen for the guild, if any.
pub async fn get_guild_language(db: &DatabaseConnection, guild_id: &str) -> Result<Option<String>> {
    let record = GuildLanguage::find_by_id(guild_id.to_string()).one(db).await?;
    Ok(record.map(|r| r.language))
}

/// Stores the guild's locale, replacing any previous choice.
pub async fn set_guild_language(db: &DatabaseConnection, guild_id: &str, language: &str) -> Result<()> {
    match GuildLanguage::find_by_id(guild_id.to_string()).one(db).await? {
        Some(existing) => {
            let mut active: guild_language::ActiveModel = existing.into();
            active.language = Set(language.to_string());
            active.update(db).await?;
        }
        None => {
            guild_language::ActiveModel {
                guild_id: Set(guild_id.to_string()),
                language: Set(language.to_string()),
            }
            .insert(db)
            .await?;
        }
    }
    Ok(())
}
