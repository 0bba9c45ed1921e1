//! Per-user maximum track duration.
//!
//! A user without a stored cap gets unfiltered search results.

use crate::{
    entities::{MaxLength, max_length},
    errors::Result,
};
use sea_orm::{ActiveModelTrait, Set, prelude::*};

/// The user's cap in milliseconds, or `None` when unlimited.
pub async fn get_max_length(db: &DatabaseConnection, user_id: &str) -> Result<Option<u64>> {
    let record = MaxLength::find_by_id(user_id.to_string()).one(db).await?;
    Ok(record.map(|r| u64::try_from(r.max_ms).unwrap_or(0)))
}

/// Stores (or replaces) the user's cap.
pub async fn set_max_length(db: &DatabaseConnection, user_id: &str, max_ms: u64) -> Result<()> {
    let max_ms = i64::try_from(max_ms).unwrap_or(i64::MAX);
    match MaxLength::find_by_id(user_id.to_string()).one(db).await? {
        Some(existing) => {
            let mut active: max_length::ActiveModel = existing.into();
            active.max_ms = Set(max_ms);
            active.update(db).await?;
        }
        None => {
            max_length::ActiveModel {
                user_id: Set(user_id.to_string()),
                max_ms: Set(max_ms),
            }
            .insert(db)
            .await?;
        }
    }
    Ok(())
}

/// Removes the user's cap. Returns whether one existed.
pub async fn clear_max_length(db: &DatabaseConnection, user_id: &str) -> Result<bool> {
    let result = MaxLength::delete_by_id(user_id.to_string()).exec(db).await?;
    Ok(result.rows_affected > 0)
}
