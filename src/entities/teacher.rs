//! Teacher entity - the profile of a user registered with the Teacher role.
//!
//! The speciality starts empty and is assigned later from the admin console.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Teaching speciality
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(2))")]
pub enum Speciality {
    /// Computer Science
    #[sea_orm(string_value = "CS")]
    Cs,
    /// Network Security
    #[sea_orm(string_value = "NS")]
    Ns,
    /// Artificial Intelligence
    #[sea_orm(string_value = "AI")]
    Ai,
    /// Electrical Engineering
    #[sea_orm(string_value = "EE")]
    Ee,
    /// Management
    #[sea_orm(string_value = "MG")]
    Mg,
    /// Mathematics
    #[sea_orm(string_value = "MT")]
    Mt,
}

impl Speciality {
    /// Parses a two-letter code, case-insensitively.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "CS" => Some(Self::Cs),
            "NS" => Some(Self::Ns),
            "AI" => Some(Self::Ai),
            "EE" => Some(Self::Ee),
            "MG" => Some(Self::Mg),
            "MT" => Some(Self::Mt),
            _ => None,
        }
    }

    /// The stored two-letter code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Cs => "CS",
            Self::Ns => "NS",
            Self::Ai => "AI",
            Self::Ee => "EE",
            Self::Mg => "MG",
            Self::Mt => "MT",
        }
    }

    /// Full speciality title.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Cs => "Computer Science",
            Self::Ns => "Network Security",
            Self::Ai => "Artificial Intelligence",
            Self::Ee => "Electrical Engineering",
            Self::Mg => "Management",
            Self::Mt => "Mathematics",
        }
    }
}

/// Teacher database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "teachers")]
pub struct Model {
    /// Unique identifier for the teacher
    #[sea_orm(primary_key)]
    pub teacher_id: i64,
    /// Owning user (one-to-one)
    #[sea_orm(unique)]
    pub user_id: i64,
    /// Assigned speciality, `None` until an admin sets it
    pub speciality: Option<Speciality>,
}

/// Defines relationships between Teacher and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each teacher belongs to one user
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
    /// One teacher teaches many courses
    #[sea_orm(has_many = "super::course::Entity")]
    Courses,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::course::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Courses.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
