//! Fee entity - a charge against a student for a course.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Payment status of a fee
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(10))")]
pub enum FeeStatus {
    /// Settled
    #[sea_orm(string_value = "Paid")]
    Paid,
    /// Outstanding
    #[sea_orm(string_value = "Pending")]
    Pending,
}

impl FeeStatus {
    /// The stored value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Paid => "Paid",
            Self::Pending => "Pending",
        }
    }
}

/// Fee database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "fees")]
pub struct Model {
    /// Unique identifier for the fee
    #[sea_orm(primary_key)]
    pub fee_id: i64,
    /// Charged student's roll number
    pub student_id: i64,
    /// Course the fee is for
    pub course_id: i64,
    /// Amount due
    pub amount: f64,
    /// Paid or pending
    pub fee_status: FeeStatus,
}

/// Defines relationships between Fee and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each fee belongs to one student
    #[sea_orm(
        belongs_to = "super::student::Entity",
        from = "Column::StudentId",
        to = "super::student::Column::RollNo"
    )]
    Student,
    /// Each fee refers to one course
    #[sea_orm(
        belongs_to = "super::course::Entity",
        from = "Column::CourseId",
        to = "super::course::Column::CourseId"
    )]
    Course,
}

impl Related<super::student::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl Related<super::course::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Course.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
