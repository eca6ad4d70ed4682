//! Department entity - the fixed set of academic departments.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Department names allowed by the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(2))")]
pub enum DepartmentName {
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

impl DepartmentName {
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

    /// Full department title.
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

/// Department database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "departments")]
pub struct Model {
    /// Unique identifier for the department
    #[sea_orm(primary_key)]
    pub dep_id: i64,
    /// Department code, unique
    #[sea_orm(unique)]
    pub dep_name: DepartmentName,
}

/// Defines relationships between Department and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One department has many students
    #[sea_orm(has_many = "super::student::Entity")]
    Students,
}

impl Related<super::student::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Students.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
