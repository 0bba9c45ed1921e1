//! Guild language entity - Locale chosen by a guild's managers.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Guild language database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "guild_languages")]
pub struct Model {
    /// Discord guild ID
    #[sea_orm(primary_key, auto_increment = false)]
    pub guild_id: String,
    /// Locale code, one of the shipped locale files
    pub language: String,
}

/// No relations
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
