//! Enrollment entity - links one student to one course.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Enrollment database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "enrollments")]
pub struct Model {
    /// Unique identifier for the enrollment
    #[sea_orm(primary_key)]
    pub enrollment_id: i64,
    /// Enrolled student's roll number
    pub student_id: i64,
    /// Course the student is enrolled in
    pub course_id: i64,
}

/// Defines relationships between Enrollment and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each enrollment belongs to one student
    #[sea_orm(
        belongs_to = "super::student::Entity",
        from = "Column::StudentId",
        to = "super::student::Column::RollNo"
    )]
    Student,
    /// Each enrollment belongs to one course
    #[sea_orm(
        belongs_to = "super::course::Entity",
        from = "Column::CourseId",
        to = "super::course::Column::CourseId"
    )]
    Course,
    /// Grade awarded for this enrollment
    #[sea_orm(has_one = "super::grade::Entity")]
    Grade,
    /// Attendance marks for this enrollment
    #[sea_orm(has_many = "super::attendance::Entity")]
    Attendance,
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

impl Related<super::grade::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Grade.def()
    }
}

impl Related<super::attendance::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Attendance.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
