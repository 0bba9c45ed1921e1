//! Max length entity - Per-user cap on the duration of searched tracks.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Max length database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "max_lengths")]
pub struct Model {
    /// Discord user ID the cap applies to
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: String,
    /// Longest accepted track duration in milliseconds
    pub max_ms: i64,
}

/// No relations
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
