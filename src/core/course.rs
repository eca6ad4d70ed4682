//! Course business logic - the admin-managed catalog.
//!
//! A course has a unique name, 1 to 3 credits and an optional teacher that
//! must exist. Deleting a course removes its enrollments (with their grades
//! and attendance) and its fees.

use crate::{
    core::enrollment,
    entities::{Course, Fee, Teacher, course, enrollment as enrollment_entity, fee},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use tracing::info;

/// Accepted credit range.
pub const CREDITS_RANGE: std::ops::RangeInclusive<i32> = 1..=3;

/// Values accepted by the add and edit course forms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseInput {
    /// Course name
    pub name: String,
    /// Credit hours
    pub credits: i32,
    /// Teacher in charge
    pub teacher_id: Option<i64>,
}

/// Checks the parts of a course that need no database access.
pub fn validate_course(input: &CourseInput) -> Result<()> {
    if input.name.trim().is_empty() {
        return Err(Error::validation("name", "Course name cannot be empty."));
    }
    if !CREDITS_RANGE.contains(&input.credits) {
        return Err(Error::validation(
            "credits",
            "Credits must be between 1 and 3.",
        ));
    }
    Ok(())
}

async fn ensure_teacher_exists(db: &DatabaseConnection, teacher_id: Option<i64>) -> Result<()> {
    if let Some(id) = teacher_id {
        if Teacher::find_by_id(id).one(db).await?.is_none() {
            return Err(Error::validation("teacher_id", "Invalid Teacher ID!"));
        }
    }
    Ok(())
}

async fn ensure_name_free(
    db: &DatabaseConnection,
    name: &str,
    except_id: Option<i64>,
) -> Result<()> {
    let mut query = Course::find().filter(course::Column::Name.eq(name));
    if let Some(id) = except_id {
        query = query.filter(course::Column::CourseId.ne(id));
    }
    if query.count(db).await? > 0 {
        return Err(Error::duplicate("name", "Course name already exists."));
    }
    Ok(())
}

/// Retrieves all courses ordered alphabetically by name.
pub async fn list_courses(db: &DatabaseConnection) -> Result<Vec<course::Model>> {
    Course::find()
        .order_by_asc(course::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves the courses taught by one teacher.
pub async fn courses_for_teacher(
    db: &DatabaseConnection,
    teacher_id: i64,
) -> Result<Vec<course::Model>> {
    Course::find()
        .filter(course::Column::TeacherId.eq(teacher_id))
        .order_by_asc(course::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds a course by its unique ID.
pub async fn get_course_by_id(
    db: &DatabaseConnection,
    course_id: i64,
) -> Result<Option<course::Model>> {
    Course::find_by_id(course_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Creates a new course.
///
/// # Errors
/// - [`Error::Validation`] for an empty name, credits outside 1..=3 or an unknown teacher
/// - [`Error::Duplicate`] if the name is already taken
pub async fn create_course(db: &DatabaseConnection, input: CourseInput) -> Result<course::Model> {
    validate_course(&input)?;
    let name = input.name.trim().to_string();
    ensure_teacher_exists(db, input.teacher_id).await?;
    ensure_name_free(db, &name, None).await?;

    let created = course::ActiveModel {
        name: Set(name),
        credits: Set(input.credits),
        teacher_id: Set(input.teacher_id),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(|e| Error::from_db_unique(e, "name", "Course name already exists."))?;

    info!(course_id = created.course_id, name = %created.name, "Course created");
    Ok(created)
}

/// Replaces the name, credits and teacher of an existing course.
pub async fn update_course(
    db: &DatabaseConnection,
    course_id: i64,
    input: CourseInput,
) -> Result<course::Model> {
    validate_course(&input)?;
    let existing = get_course_by_id(db, course_id)
        .await?
        .ok_or(Error::NotFound {
            entity: "Course",
            id: course_id,
        })?;

    let name = input.name.trim().to_string();
    ensure_teacher_exists(db, input.teacher_id).await?;
    ensure_name_free(db, &name, Some(course_id)).await?;

    let mut active: course::ActiveModel = existing.into();
    active.name = Set(name);
    active.credits = Set(input.credits);
    active.teacher_id = Set(input.teacher_id);
    active
        .update(db)
        .await
        .map_err(|e| Error::from_db_unique(e, "name", "Course name already exists."))
}

/// Deletes a course with its enrollments and fees.
pub async fn delete_course(db: &DatabaseConnection, course_id: i64) -> Result<()> {
    if get_course_by_id(db, course_id).await?.is_none() {
        return Err(Error::NotFound {
            entity: "Course",
            id: course_id,
        });
    }

    let txn = db.begin().await?;
    let ids =
        enrollment::enrollment_ids_where(&txn, enrollment_entity::Column::CourseId, course_id)
            .await?;
    let removed = enrollment::delete_enrollments_cascade(&txn, ids).await?;
    Fee::delete_many()
        .filter(fee::Column::CourseId.eq(course_id))
        .exec(&txn)
        .await?;
    Course::delete_by_id(course_id).exec(&txn).await?;
    txn.commit().await?;

    info!(course_id, enrollments = removed, "Course deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::{enrollment::enroll, fee::create_fee};
    use crate::entities::Enrollment;
    use crate::test_utils::*;

    fn input(name: &str, credits: i32, teacher_id: Option<i64>) -> CourseInput {
        CourseInput {
            name: name.to_string(),
            credits,
            teacher_id,
        }
    }

    #[tokio::test]
    async fn test_credits_out_of_range_rejected() -> Result<()> {
        let db = setup_test_db().await?;

        for credits in [0, 4, -1] {
            let result = create_course(&db, input("Algebra", credits, None)).await;
            assert!(matches!(
                result,
                Err(Error::Validation {
                    field: "credits",
                    ..
                })
            ));
        }

        let result = create_course(&db, input("   ", 2, None)).await;
        assert!(matches!(
            result,
            Err(Error::Validation { field: "name", .. })
        ));
        assert_eq!(Course::find().count(&db).await?, 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_credits_in_range_accepted() -> Result<()> {
        let (db, teacher) = setup_with_teacher().await?;

        for credits in 1..=3 {
            let name = format!("Course {credits}");
            let created = create_course(&db, input(&name, credits, Some(teacher.teacher_id))).await?;
            assert_eq!(created.credits, credits);
            assert_eq!(created.teacher_id, Some(teacher.teacher_id));
        }
        assert_eq!(list_courses(&db).await?.len(), 3);
        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_teacher_rejected() -> Result<()> {
        let db = setup_test_db().await?;
        let result = create_course(&db, input("Physics", 2, Some(77))).await;
        assert!(matches!(
            result,
            Err(Error::Validation {
                field: "teacher_id",
                ..
            })
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_duplicate_name_rejected() -> Result<()> {
        let db = setup_test_db().await?;
        create_course(&db, input("Physics", 2, None)).await?;

        let result = create_course(&db, input("  Physics ", 3, None)).await;
        assert!(matches!(result, Err(Error::Duplicate { field: "name", .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_update_course() -> Result<()> {
        let (db, teacher) = setup_with_teacher().await?;
        let physics = create_course(&db, input("Physics", 2, None)).await?;
        create_course(&db, input("Chemistry", 2, None)).await?;

        // Keeping its own name is fine
        let updated = update_course(
            &db,
            physics.course_id,
            input("Physics", 3, Some(teacher.teacher_id)),
        )
        .await?;
        assert_eq!(updated.credits, 3);
        assert_eq!(updated.teacher_id, Some(teacher.teacher_id));

        // Taking another course's name is not
        let clash = update_course(&db, physics.course_id, input("Chemistry", 3, None)).await;
        assert!(matches!(clash, Err(Error::Duplicate { .. })));

        let missing = update_course(&db, 999, input("Biology", 1, None)).await;
        assert!(matches!(missing, Err(Error::NotFound { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_course_cascades() -> Result<()> {
        let (db, student, course) = setup_with_student_and_course().await?;
        enroll(&db, student.roll_no, course.course_id).await?;
        create_fee(&db, student.roll_no, course.course_id, 150.0).await?;

        delete_course(&db, course.course_id).await?;

        assert!(get_course_by_id(&db, course.course_id).await?.is_none());
        assert_eq!(Enrollment::find().count(&db).await?, 0);
        assert_eq!(Fee::find().count(&db).await?, 0);
        Ok(())
    }
}
