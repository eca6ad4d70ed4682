//! Enrollment business logic - links students to courses.
//!
//! Deleting an enrollment also deletes its grade and attendance marks; the
//! same cascade is reused when a student or course goes away.

use crate::{
    entities::{Attendance, Course, Enrollment, Grade, Student, attendance, enrollment, grade},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use tracing::info;

/// Retrieves all enrollments ordered by id.
pub async fn list_enrollments(db: &DatabaseConnection) -> Result<Vec<enrollment::Model>> {
    Enrollment::find()
        .order_by_asc(enrollment::Column::EnrollmentId)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves the enrollments of one student.
pub async fn enrollments_for_student(
    db: &DatabaseConnection,
    student_id: i64,
) -> Result<Vec<enrollment::Model>> {
    Enrollment::find()
        .filter(enrollment::Column::StudentId.eq(student_id))
        .order_by_asc(enrollment::Column::CourseId)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds an enrollment by its unique ID.
pub async fn get_enrollment_by_id(
    db: &DatabaseConnection,
    enrollment_id: i64,
) -> Result<Option<enrollment::Model>> {
    Enrollment::find_by_id(enrollment_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Enrolls a student in a course.
///
/// # Errors
/// - [`Error::NotFound`] if the student or the course does not exist
/// - [`Error::AlreadyEnrolled`] if the pair already exists
pub async fn enroll(
    db: &DatabaseConnection,
    student_id: i64,
    course_id: i64,
) -> Result<enrollment::Model> {
    if Student::find_by_id(student_id).one(db).await?.is_none() {
        return Err(Error::NotFound {
            entity: "Student",
            id: student_id,
        });
    }
    if Course::find_by_id(course_id).one(db).await?.is_none() {
        return Err(Error::NotFound {
            entity: "Course",
            id: course_id,
        });
    }

    let existing = Enrollment::find()
        .filter(enrollment::Column::StudentId.eq(student_id))
        .filter(enrollment::Column::CourseId.eq(course_id))
        .count(db)
        .await?;
    if existing > 0 {
        return Err(Error::AlreadyEnrolled {
            student_id,
            course_id,
        });
    }

    let model = enrollment::ActiveModel {
        student_id: Set(student_id),
        course_id: Set(course_id),
        ..Default::default()
    };
    let created = model.insert(db).await.map_err(|e| match e.sql_err() {
        // A concurrent submit won the unique (student, course) index
        Some(sea_orm::SqlErr::UniqueConstraintViolation(_)) => Error::AlreadyEnrolled {
            student_id,
            course_id,
        },
        _ => Error::Database(e),
    })?;
    info!(
        enrollment_id = created.enrollment_id,
        student_id, course_id, "Student enrolled"
    );
    Ok(created)
}

/// Deletes the given enrollments together with their grades and attendance.
///
/// Returns the number of enrollments removed.
pub(crate) async fn delete_enrollments_cascade<C>(conn: &C, ids: Vec<i64>) -> Result<u64>
where
    C: ConnectionTrait,
{
    if ids.is_empty() {
        return Ok(0);
    }

    Grade::delete_many()
        .filter(grade::Column::EnrollmentId.is_in(ids.clone()))
        .exec(conn)
        .await?;
    Attendance::delete_many()
        .filter(attendance::Column::EnrollmentId.is_in(ids.clone()))
        .exec(conn)
        .await?;
    let result = Enrollment::delete_many()
        .filter(enrollment::Column::EnrollmentId.is_in(ids))
        .exec(conn)
        .await?;
    Ok(result.rows_affected)
}

/// Ids of every enrollment whose `column` equals `value`.
pub(crate) async fn enrollment_ids_where<C>(
    conn: &C,
    column: enrollment::Column,
    value: i64,
) -> Result<Vec<i64>>
where
    C: ConnectionTrait,
{
    Ok(Enrollment::find()
        .filter(column.eq(value))
        .all(conn)
        .await?
        .into_iter()
        .map(|e| e.enrollment_id)
        .collect())
}

/// Deletes one enrollment with its grade and attendance marks.
pub async fn delete_enrollment(db: &DatabaseConnection, enrollment_id: i64) -> Result<()> {
    if Enrollment::find_by_id(enrollment_id).one(db).await?.is_none() {
        return Err(Error::NotFound {
            entity: "Enrollment",
            id: enrollment_id,
        });
    }

    let txn = db.begin().await?;
    delete_enrollments_cascade(&txn, vec![enrollment_id]).await?;
    txn.commit().await?;

    info!(enrollment_id, "Enrollment deleted");
    Ok(())
}
