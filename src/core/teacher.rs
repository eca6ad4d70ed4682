//! Teacher profile management.
//!
//! A teacher that still teaches courses cannot be deleted; the admin has to
//! reassign or delete those courses first. Deleting a teacher without
//! courses also removes the owning user account.

use crate::{
    core::user as user_core,
    entities::{Speciality, Teacher, User, teacher, user},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::info;

/// Retrieves all teachers with their user accounts, ordered by id.
pub async fn list_teachers(
    db: &DatabaseConnection,
) -> Result<Vec<(teacher::Model, Option<user::Model>)>> {
    Teacher::find()
        .find_also_related(User)
        .order_by_asc(teacher::Column::TeacherId)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds a teacher by its unique ID.
pub async fn get_teacher_by_id(
    db: &DatabaseConnection,
    teacher_id: i64,
) -> Result<Option<teacher::Model>> {
    Teacher::find_by_id(teacher_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds the teacher profile owned by a user.
pub async fn get_teacher_by_user(
    db: &DatabaseConnection,
    user_id: i64,
) -> Result<Option<teacher::Model>> {
    Teacher::find()
        .filter(teacher::Column::UserId.eq(user_id))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Sets a teacher's speciality from its two-letter code.
///
/// # Errors
/// - [`Error::Validation`] if the code is not one of CS, NS, AI, EE, MG, MT
/// - [`Error::NotFound`] if the teacher does not exist
pub async fn set_speciality(
    db: &DatabaseConnection,
    teacher_id: i64,
    code: &str,
) -> Result<teacher::Model> {
    let speciality = Speciality::parse(code)
        .ok_or_else(|| Error::validation("speciality", "Invalid speciality."))?;

    let existing = get_teacher_by_id(db, teacher_id)
        .await?
        .ok_or(Error::NotFound {
            entity: "Teacher",
            id: teacher_id,
        })?;

    let mut active: teacher::ActiveModel = existing.into();
    active.speciality = Set(Some(speciality));
    let updated = active.update(db).await?;
    info!(
        teacher_id,
        speciality = speciality.code(),
        "Teacher speciality updated"
    );
    Ok(updated)
}

/// Deletes a teacher and its user account.
///
/// # Errors
/// - [`Error::NotFound`] if the teacher does not exist
/// - [`Error::TeacherHasCourses`] if courses are still assigned
pub async fn delete_teacher(db: &DatabaseConnection, teacher_id: i64) -> Result<()> {
    let existing = get_teacher_by_id(db, teacher_id)
        .await?
        .ok_or(Error::NotFound {
            entity: "Teacher",
            id: teacher_id,
        })?;
    user_core::delete_user(db, existing.user_id).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::course::{self, CourseInput};
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_set_speciality() -> Result<()> {
        let (db, teacher) = setup_with_teacher().await?;
        assert_eq!(teacher.speciality, None);

        let updated = set_speciality(&db, teacher.teacher_id, "ai").await?;
        assert_eq!(updated.speciality, Some(Speciality::Ai));

        let bad = set_speciality(&db, teacher.teacher_id, "History").await;
        assert!(matches!(
            bad,
            Err(Error::Validation {
                field: "speciality",
                ..
            })
        ));

        let missing = set_speciality(&db, 999, "CS").await;
        assert!(matches!(missing, Err(Error::NotFound { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_teacher_with_courses_fails() -> Result<()> {
        let (db, teacher) = setup_with_teacher().await?;
        let physics = course::create_course(
            &db,
            CourseInput {
                name: "Physics".to_string(),
                credits: 2,
                teacher_id: Some(teacher.teacher_id),
            },
        )
        .await?;

        let result = delete_teacher(&db, teacher.teacher_id).await;
        assert!(matches!(
            result,
            Err(Error::TeacherHasCourses { courses: 1, .. })
        ));
        // Nothing was removed
        assert!(get_teacher_by_id(&db, teacher.teacher_id).await?.is_some());
        assert!(User::find_by_id(teacher.user_id).one(&db).await?.is_some());

        course::delete_course(&db, physics.course_id).await?;
        delete_teacher(&db, teacher.teacher_id).await?;

        assert!(get_teacher_by_id(&db, teacher.teacher_id).await?.is_none());
        assert!(User::find_by_id(teacher.user_id).one(&db).await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_get_teacher_by_user() -> Result<()> {
        let (db, teacher) = setup_with_teacher().await?;
        let found = get_teacher_by_user(&db, teacher.user_id).await?;
        assert_eq!(found, Some(teacher));
        assert_eq!(list_teachers(&db).await?.len(), 1);
        Ok(())
    }
}
