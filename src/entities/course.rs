//! Course entity - a catalog course taught by at most one teacher.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Course database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "courses")]
pub struct Model {
    /// Unique identifier for the course
    #[sea_orm(primary_key)]
    pub course_id: i64,
    /// Course name, unique
    #[sea_orm(unique)]
    pub name: String,
    /// Credit hours, 1 to 3
    pub credits: i32,
    /// Teacher in charge, if any
    pub teacher_id: Option<i64>,
}

/// Defines relationships between Course and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each course is taught by one teacher
    #[sea_orm(
        belongs_to = "super::teacher::Entity",
        from = "Column::TeacherId",
        to = "super::teacher::Column::TeacherId"
    )]
    Teacher,
    /// One course has many enrollments
    #[sea_orm(has_many = "super::enrollment::Entity")]
    Enrollments,
    /// One course has many fees
    #[sea_orm(has_many = "super::fee::Entity")]
    Fees,
}

impl Related<super::teacher::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Teacher.def()
    }
}

impl Related<super::enrollment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Enrollments.def()
    }
}

impl Related<super::fee::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Fees.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
