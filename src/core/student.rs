//! Student profile management.
//!
//! Admins assign a student's department or remove the student entirely;
//! removal takes the owning user account with it.

use crate::{
    core::user as user_core,
    entities::{Department, Student, User, student, user},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::info;

/// Retrieves all students with their user accounts, ordered by roll number.
pub async fn list_students(
    db: &DatabaseConnection,
) -> Result<Vec<(student::Model, Option<user::Model>)>> {
    Student::find()
        .find_also_related(User)
        .order_by_asc(student::Column::RollNo)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds a student by roll number.
pub async fn get_student_by_id(
    db: &DatabaseConnection,
    roll_no: i64,
) -> Result<Option<student::Model>> {
    Student::find_by_id(roll_no)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds the student profile owned by a user.
pub async fn get_student_by_user(
    db: &DatabaseConnection,
    user_id: i64,
) -> Result<Option<student::Model>> {
    Student::find()
        .filter(student::Column::UserId.eq(user_id))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Assigns a student to a department, or clears the assignment with `None`.
///
/// # Errors
/// - [`Error::NotFound`] if the student does not exist
/// - [`Error::Validation`] if the department does not exist
pub async fn set_department(
    db: &DatabaseConnection,
    roll_no: i64,
    department_id: Option<i64>,
) -> Result<student::Model> {
    let existing = get_student_by_id(db, roll_no)
        .await?
        .ok_or(Error::NotFound {
            entity: "Student",
            id: roll_no,
        })?;

    if let Some(dep_id) = department_id {
        if Department::find_by_id(dep_id).one(db).await?.is_none() {
            return Err(Error::validation("department_id", "Invalid Department ID!"));
        }
    }

    let mut active: student::ActiveModel = existing.into();
    active.department_id = Set(department_id);
    let updated = active.update(db).await?;
    info!(roll_no, ?department_id, "Student department updated");
    Ok(updated)
}

/// Deletes a student together with its user, enrollments and fees.
pub async fn delete_student(db: &DatabaseConnection, roll_no: i64) -> Result<()> {
    let existing = get_student_by_id(db, roll_no)
        .await?
        .ok_or(Error::NotFound {
            entity: "Student",
            id: roll_no,
        })?;
    user_core::delete_user(db, existing.user_id).await
}
