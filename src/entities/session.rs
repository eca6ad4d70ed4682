//! Session entity - maps an opaque cookie key to a logged-in user.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Session database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "sessions")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Random key carried in the `session` cookie
    #[sea_orm(unique)]
    pub key: String,
    /// Authenticated user
    pub user_id: i64,
    /// When the session was opened
    pub created_at: DateTime,
    /// After this instant the key no longer resolves
    pub expires_at: DateTime,
}

/// Defines relationships between Session and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Owning user
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
