//! Grade entity - the final mark for one enrollment.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Letter grade scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(2))")]
pub enum Letter {
    /// F
    #[sea_orm(string_value = "F")]
    F,
    /// D-
    #[sea_orm(string_value = "D-")]
    DMinus,
    /// D
    #[sea_orm(string_value = "D")]
    D,
    /// D+
    #[sea_orm(string_value = "D+")]
    DPlus,
    /// C-
    #[sea_orm(string_value = "C-")]
    CMinus,
    /// C
    #[sea_orm(string_value = "C")]
    C,
    /// C+
    #[sea_orm(string_value = "C+")]
    CPlus,
    /// B-
    #[sea_orm(string_value = "B-")]
    BMinus,
    /// B
    #[sea_orm(string_value = "B")]
    B,
    /// B+
    #[sea_orm(string_value = "B+")]
    BPlus,
    /// A-
    #[sea_orm(string_value = "A-")]
    AMinus,
    /// A
    #[sea_orm(string_value = "A")]
    A,
    /// A+
    #[sea_orm(string_value = "A+")]
    APlus,
}

impl Letter {
    /// Parses a letter grade as written on a transcript ("B+", "a-", ...).
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        let grade = match value.trim().to_ascii_uppercase().as_str() {
            "F" => Self::F,
            "D-" => Self::DMinus,
            "D" => Self::D,
            "D+" => Self::DPlus,
            "C-" => Self::CMinus,
            "C" => Self::C,
            "C+" => Self::CPlus,
            "B-" => Self::BMinus,
            "B" => Self::B,
            "B+" => Self::BPlus,
            "A-" => Self::AMinus,
            "A" => Self::A,
            "A+" => Self::APlus,
            _ => return None,
        };
        Some(grade)
    }

    /// The letter as displayed.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::F => "F",
            Self::DMinus => "D-",
            Self::D => "D",
            Self::DPlus => "D+",
            Self::CMinus => "C-",
            Self::C => "C",
            Self::CPlus => "C+",
            Self::BMinus => "B-",
            Self::B => "B",
            Self::BPlus => "B+",
            Self::AMinus => "A-",
            Self::A => "A",
            Self::APlus => "A+",
        }
    }
}

/// Grade database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "grades")]
pub struct Model {
    /// Unique identifier for the grade
    #[sea_orm(primary_key)]
    pub grade_id: i64,
    /// Graded enrollment (one grade per enrollment)
    #[sea_orm(unique)]
    pub enrollment_id: i64,
    /// Marks out of 100
    pub marks: i32,
    /// Letter grade
    pub letter: Letter,
}

/// Defines relationships between Grade and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Graded enrollment
    #[sea_orm(
        belongs_to = "super::enrollment::Entity",
        from = "Column::EnrollmentId",
        to = "super::enrollment::Column::EnrollmentId"
    )]
    Enrollment,
}

impl Related<super::enrollment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Enrollment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
