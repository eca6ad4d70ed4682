//! User directory - lookups, verification and account removal.
//!
//! Removing a user is the root of every cascade: sessions go first, then the
//! role profile with everything it owns, then the user row itself. A teacher
//! who still teaches courses cannot be removed.

use crate::{
    core::{enrollment, session},
    entities::{
        Course, Fee, Student, Teacher, User, course, enrollment as enrollment_entity, fee,
        student, teacher, user,
    },
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use tracing::info;

/// Head counts shown on the admin dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DirectoryCounts {
    /// All accounts
    pub users: u64,
    /// Student profiles
    pub students: u64,
    /// Teacher profiles
    pub teachers: u64,
    /// Catalog courses
    pub courses: u64,
    /// Accounts awaiting verification
    pub unverified: u64,
}

/// Finds a user by its unique ID.
pub async fn get_user_by_id(db: &DatabaseConnection, user_id: i64) -> Result<Option<user::Model>> {
    User::find_by_id(user_id).one(db).await.map_err(Into::into)
}

/// Finds a user by login email.
pub async fn get_user_by_email(
    db: &DatabaseConnection,
    email: &str,
) -> Result<Option<user::Model>> {
    User::find()
        .filter(user::Column::Email.eq(email.trim()))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Lists every user ordered by id.
pub async fn list_users(db: &DatabaseConnection) -> Result<Vec<user::Model>> {
    User::find()
        .order_by_asc(user::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Lists users still waiting for an admin to verify them.
pub async fn list_unverified_users(db: &DatabaseConnection) -> Result<Vec<user::Model>> {
    User::find()
        .filter(user::Column::Status.eq(false))
        .order_by_asc(user::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Marks a user as verified.
///
/// Verifying an already verified user succeeds without writing anything.
pub async fn verify_user(db: &DatabaseConnection, user_id: i64) -> Result<user::Model> {
    let existing = get_user_by_id(db, user_id).await?.ok_or(Error::NotFound {
        entity: "User",
        id: user_id,
    })?;

    if existing.status {
        return Ok(existing);
    }

    let mut active: user::ActiveModel = existing.into();
    active.status = Set(true);
    let verified = active.update(db).await?;
    info!(user_id, "User verified");
    Ok(verified)
}

/// Collects the dashboard counts.
pub async fn directory_counts(db: &DatabaseConnection) -> Result<DirectoryCounts> {
    Ok(DirectoryCounts {
        users: User::find().count(db).await?,
        students: Student::find().count(db).await?,
        teachers: Teacher::find().count(db).await?,
        courses: Course::find().count(db).await?,
        unverified: User::find()
            .filter(user::Column::Status.eq(false))
            .count(db)
            .await?,
    })
}

/// Removes a student profile with its enrollments and fees.
async fn delete_student_profile<C>(conn: &C, roll_no: i64) -> Result<()>
where
    C: ConnectionTrait,
{
    let ids =
        enrollment::enrollment_ids_where(conn, enrollment_entity::Column::StudentId, roll_no)
            .await?;
    enrollment::delete_enrollments_cascade(conn, ids).await?;
    Fee::delete_many()
        .filter(fee::Column::StudentId.eq(roll_no))
        .exec(conn)
        .await?;
    Student::delete_by_id(roll_no).exec(conn).await?;
    Ok(())
}

/// Removes a teacher profile, refusing while courses still point at it.
async fn delete_teacher_profile<C>(conn: &C, teacher_id: i64) -> Result<()>
where
    C: ConnectionTrait,
{
    let courses = Course::find()
        .filter(course::Column::TeacherId.eq(teacher_id))
        .count(conn)
        .await?;
    if courses > 0 {
        return Err(Error::TeacherHasCourses {
            teacher_id,
            courses,
        });
    }
    Teacher::delete_by_id(teacher_id).exec(conn).await?;
    Ok(())
}

/// Deletes a user with its sessions and role profile inside `conn`.
pub(crate) async fn delete_user_cascade<C>(conn: &C, user_id: i64) -> Result<()>
where
    C: ConnectionTrait,
{
    session::close_user_sessions(conn, user_id).await?;

    if let Some(profile) = Student::find()
        .filter(student::Column::UserId.eq(user_id))
        .one(conn)
        .await?
    {
        delete_student_profile(conn, profile.roll_no).await?;
    }

    if let Some(profile) = Teacher::find()
        .filter(teacher::Column::UserId.eq(user_id))
        .one(conn)
        .await?
    {
        delete_teacher_profile(conn, profile.teacher_id).await?;
    }

    User::delete_by_id(user_id).exec(conn).await?;
    Ok(())
}

/// Deletes a user and everything the user owns.
///
/// # Errors
/// - [`Error::NotFound`] if the user does not exist
/// - [`Error::TeacherHasCourses`] if the user is a teacher who still teaches
pub async fn delete_user(db: &DatabaseConnection, user_id: i64) -> Result<()> {
    if get_user_by_id(db, user_id).await?.is_none() {
        return Err(Error::NotFound {
            entity: "User",
            id: user_id,
        });
    }

    let txn = db.begin().await?;
    delete_user_cascade(&txn, user_id).await?;
    txn.commit().await?;

    info!(user_id, "User deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::{auth, enrollment::enroll, fee::create_fee};
    use crate::entities::{Enrollment, Role, Session};
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_verify_user_is_idempotent() -> Result<()> {
        let db = setup_test_db().await?;
        let user = create_test_user(&db, "ada@school.edu", Role::Student).await?;
        assert!(!user.status);
        assert_eq!(list_unverified_users(&db).await?.len(), 1);

        let verified = verify_user(&db, user.id).await?;
        assert!(verified.status);

        let again = verify_user(&db, user.id).await?;
        assert!(again.status);
        assert_eq!(again, verified);
        assert!(list_unverified_users(&db).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_verify_missing_user() -> Result<()> {
        let db = setup_test_db().await?;
        let result = verify_user(&db, 404).await;
        assert!(matches!(
            result,
            Err(Error::NotFound {
                entity: "User",
                id: 404
            })
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_student_user_cascades() -> Result<()> {
        let (db, student, course) = setup_with_student_and_course().await?;
        enroll(&db, student.roll_no, course.course_id).await?;
        create_fee(&db, student.roll_no, course.course_id, 90.0).await?;
        crate::core::session::open_session(&db, student.user_id).await?;

        delete_user(&db, student.user_id).await?;

        assert!(get_user_by_id(&db, student.user_id).await?.is_none());
        assert_eq!(Student::find().count(&db).await?, 0);
        assert_eq!(Enrollment::find().count(&db).await?, 0);
        assert_eq!(Fee::find().count(&db).await?, 0);
        assert_eq!(Session::find().count(&db).await?, 0);
        // The course itself is untouched
        assert_eq!(Course::find().count(&db).await?, 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_directory_counts() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_user(&db, "root@school.edu", Role::Admin).await?;
        create_test_user(&db, "s@school.edu", Role::Student).await?;
        let t = create_test_user(&db, "t@school.edu", Role::Teacher).await?;
        verify_user(&db, t.id).await?;

        let counts = directory_counts(&db).await?;
        assert_eq!(
            counts,
            DirectoryCounts {
                users: 3,
                students: 1,
                teachers: 1,
                courses: 0,
                unverified: 2,
            }
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_get_user_by_email() -> Result<()> {
        let db = setup_test_db().await?;
        let form = registration_form("find@school.edu", "finder", "0311111111", "Teacher");
        let (user, _) = auth::register(&db, &form).await?;

        let found = get_user_by_email(&db, " find@school.edu ").await?.unwrap();
        assert_eq!(found.id, user.id);
        assert!(get_user_by_email(&db, "lost@school.edu").await?.is_none());
        Ok(())
    }
}
