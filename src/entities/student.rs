//! Student entity - the profile of a user registered with the Student role.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Student database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "students")]
pub struct Model {
    /// Roll number, the student's primary key
    #[sea_orm(primary_key)]
    pub roll_no: i64,
    /// Owning user (one-to-one)
    #[sea_orm(unique)]
    pub user_id: i64,
    /// Department the student belongs to, if assigned
    pub department_id: Option<i64>,
}

/// Defines relationships between Student and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each student belongs to one user
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
    /// Each student may belong to one department
    #[sea_orm(
        belongs_to = "super::department::Entity",
        from = "Column::DepartmentId",
        to = "super::department::Column::DepId"
    )]
    Department,
    /// One student has many enrollments
    #[sea_orm(has_many = "super::enrollment::Entity")]
    Enrollments,
    /// One student has many fees
    #[sea_orm(has_many = "super::fee::Entity")]
    Fees,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::department::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Department.def()
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
