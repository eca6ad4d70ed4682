//! Attendance entity - one presence mark per enrollment per day.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Presence mark
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(1))")]
pub enum AttendanceStatus {
    /// Present
    #[sea_orm(string_value = "P")]
    Present,
    /// Absent
    #[sea_orm(string_value = "A")]
    Absent,
    /// Late
    #[sea_orm(string_value = "L")]
    Late,
}

impl AttendanceStatus {
    /// Parses the single-letter code `P`, `A` or `L`.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "P" => Some(Self::Present),
            "A" => Some(Self::Absent),
            "L" => Some(Self::Late),
            _ => None,
        }
    }

    /// The stored single-letter code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Present => "P",
            Self::Absent => "A",
            Self::Late => "L",
        }
    }
}

/// Attendance database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "attendance")]
pub struct Model {
    /// Unique identifier for the mark
    #[sea_orm(primary_key)]
    pub attendance_id: i64,
    /// Enrollment the mark belongs to
    pub enrollment_id: i64,
    /// Class day
    pub date: Date,
    /// Present, absent or late
    pub status: AttendanceStatus,
}

/// Defines relationships between Attendance and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Marked enrollment
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
