//! User entity - the root of every account.
//!
//! A user owns at most one Student or Teacher profile, chosen by `role`.
//! Email, username and contact are each unique across the table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Account role selected at registration
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum Role {
    /// Enrolled student, gets a Student profile
    #[sea_orm(string_value = "Student")]
    Student,
    /// Teaching staff, gets a Teacher profile
    #[sea_orm(string_value = "Teacher")]
    Teacher,
    /// The single administrator
    #[sea_orm(string_value = "Admin")]
    Admin,
}

impl Role {
    /// Parses the value submitted by the registration form.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "Student" => Some(Self::Student),
            "Teacher" => Some(Self::Teacher),
            "Admin" => Some(Self::Admin),
            _ => None,
        }
    }

    /// Display label, identical to the stored value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Student => "Student",
            Self::Teacher => "Teacher",
            Self::Admin => "Admin",
        }
    }
}

/// User database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// Unique identifier for the user
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Login email
    #[sea_orm(unique)]
    pub email: String,
    /// Display name
    #[sea_orm(unique)]
    pub username: String,
    /// Phone number, 10 to 15 characters
    #[sea_orm(unique)]
    pub contact: String,
    /// Postal address
    pub address: String,
    /// Argon2 PHC string
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Account role
    pub role: Role,
    /// Mirrors `role == Admin`
    pub is_admin: bool,
    /// Verified by an admin (false until verified)
    pub status: bool,
    /// When the account was registered
    pub created_at: DateTime,
}

/// Defines relationships between User and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Optional student profile
    #[sea_orm(has_one = "super::student::Entity")]
    Student,
    /// Optional teacher profile
    #[sea_orm(has_one = "super::teacher::Entity")]
    Teacher,
    /// Active login sessions
    #[sea_orm(has_many = "super::session::Entity")]
    Sessions,
}

impl Related<super::student::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl Related<super::teacher::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Teacher.def()
    }
}

impl Related<super::session::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sessions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
