//! Grade business logic - one final mark per enrollment.

use crate::{
    entities::{Enrollment, Grade, Letter, grade},
    errors::{Error, Result},
};
use sea_orm::{Set, prelude::*};

/// Accepted marks range.
pub const MARKS_RANGE: std::ops::RangeInclusive<i32> = 1..=100;

/// Finds the grade recorded for an enrollment, if any.
pub async fn get_grade_for_enrollment(
    db: &DatabaseConnection,
    enrollment_id: i64,
) -> Result<Option<grade::Model>> {
    Grade::find()
        .filter(grade::Column::EnrollmentId.eq(enrollment_id))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Records the grade for an enrollment, replacing any previous one.
///
/// # Errors
/// - [`Error::Validation`] when marks fall outside 1..=100 or the letter is unknown
/// - [`Error::NotFound`] when the enrollment does not exist
pub async fn record_grade(
    db: &DatabaseConnection,
    enrollment_id: i64,
    marks: i32,
    letter: &str,
) -> Result<grade::Model> {
    if !MARKS_RANGE.contains(&marks) {
        return Err(Error::validation("marks", "Marks must be between 1 and 100."));
    }
    let letter =
        Letter::parse(letter).ok_or_else(|| Error::validation("grade", "Invalid grade letter."))?;

    if Enrollment::find_by_id(enrollment_id).one(db).await?.is_none() {
        return Err(Error::NotFound {
            entity: "Enrollment",
            id: enrollment_id,
        });
    }

    if let Some(existing) = get_grade_for_enrollment(db, enrollment_id).await? {
        let mut active: grade::ActiveModel = existing.into();
        active.marks = Set(marks);
        active.letter = Set(letter);
        return active.update(db).await.map_err(Into::into);
    }

    grade::ActiveModel {
        enrollment_id: Set(enrollment_id),
        marks: Set(marks),
        letter: Set(letter),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_marks_out_of_range() -> Result<()> {
        let (db, enrollment) = setup_with_enrollment().await?;

        for marks in [0, 101, -5] {
            let result = record_grade(&db, enrollment.enrollment_id, marks, "A").await;
            assert!(matches!(
                result,
                Err(Error::Validation { field: "marks", .. })
            ));
        }
        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_letter() -> Result<()> {
        let (db, enrollment) = setup_with_enrollment().await?;
        let result = record_grade(&db, enrollment.enrollment_id, 50, "E").await;
        assert!(matches!(
            result,
            Err(Error::Validation { field: "grade", .. })
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_record_replaces_previous_grade() -> Result<()> {
        let (db, enrollment) = setup_with_enrollment().await?;

        let first = record_grade(&db, enrollment.enrollment_id, 72, "c+").await?;
        assert_eq!(first.letter, Letter::CPlus);

        let second = record_grade(&db, enrollment.enrollment_id, 95, "A+").await?;
        assert_eq!(second.grade_id, first.grade_id);
        assert_eq!(second.marks, 95);
        assert_eq!(Grade::find().count(&db).await?, 1);

        let stored = get_grade_for_enrollment(&db, enrollment.enrollment_id)
            .await?
            .unwrap();
        assert_eq!(stored.letter, Letter::APlus);
        Ok(())
    }

    #[tokio::test]
    async fn test_grade_for_missing_enrollment() -> Result<()> {
        let db = setup_test_db().await?;
        let result = record_grade(&db, 42, 80, "B").await;
        assert!(matches!(result, Err(Error::NotFound { .. })));
        Ok(())
    }
}
