//! Attendance business logic - daily presence marks per enrollment.

use crate::{
    entities::{Attendance, AttendanceStatus, Enrollment, attendance},
    errors::{Error, Result},
};
use chrono::NaiveDate;
use sea_orm::{QueryOrder, Set, SqlErr, prelude::*};

/// Lists the attendance marks of an enrollment, oldest first.
pub async fn attendance_for_enrollment(
    db: &DatabaseConnection,
    enrollment_id: i64,
) -> Result<Vec<attendance::Model>> {
    Attendance::find()
        .filter(attendance::Column::EnrollmentId.eq(enrollment_id))
        .order_by_asc(attendance::Column::Date)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Records attendance for an enrollment on `date`.
///
/// A second mark for the same day overwrites the first.
pub async fn record_attendance(
    db: &DatabaseConnection,
    enrollment_id: i64,
    date: NaiveDate,
    status: &str,
) -> Result<attendance::Model> {
    let status = AttendanceStatus::parse(status)
        .ok_or_else(|| Error::validation("status", "Attendance status must be P, A or L."))?;

    if Enrollment::find_by_id(enrollment_id).one(db).await?.is_none() {
        return Err(Error::NotFound {
            entity: "Enrollment",
            id: enrollment_id,
        });
    }

    let existing = Attendance::find()
        .filter(attendance::Column::EnrollmentId.eq(enrollment_id))
        .filter(attendance::Column::Date.eq(date))
        .one(db)
        .await?;

    if let Some(existing) = existing {
        let mut active: attendance::ActiveModel = existing.into();
        active.status = Set(status);
        return active.update(db).await.map_err(Into::into);
    }

    let inserted = attendance::ActiveModel {
        enrollment_id: Set(enrollment_id),
        date: Set(date),
        status: Set(status),
        ..Default::default()
    }
    .insert(db)
    .await;

    match inserted {
        Ok(mark) => Ok(mark),
        // Another request recorded the same day first: overwrite its mark
        Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
            overwrite_mark(db, enrollment_id, date, status).await
        }
        Err(e) => Err(e.into()),
    }
}

async fn overwrite_mark(
    db: &DatabaseConnection,
    enrollment_id: i64,
    date: NaiveDate,
    status: AttendanceStatus,
) -> Result<attendance::Model> {
    let existing = Attendance::find()
        .filter(attendance::Column::EnrollmentId.eq(enrollment_id))
        .filter(attendance::Column::Date.eq(date))
        .one(db)
        .await?
        .ok_or(Error::NotFound {
            entity: "Attendance",
            id: enrollment_id,
        })?;
    let mut active: attendance::ActiveModel = existing.into();
    active.status = Set(status);
    active.update(db).await.map_err(Into::into)
}

/// Parses a `YYYY-MM-DD` form value.
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| Error::validation("date", "Date must be written as YYYY-MM-DD."))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_invalid_status_rejected() -> Result<()> {
        let (db, enrollment) = setup_with_enrollment().await?;
        let result = record_attendance(&db, enrollment.enrollment_id, test_date(), "X").await;
        assert!(matches!(
            result,
            Err(Error::Validation { field: "status", .. })
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_same_day_overwrites() -> Result<()> {
        let (db, enrollment) = setup_with_enrollment().await?;

        record_attendance(&db, enrollment.enrollment_id, test_date(), "A").await?;
        let updated = record_attendance(&db, enrollment.enrollment_id, test_date(), "l").await?;
        assert_eq!(updated.status, AttendanceStatus::Late);

        let next_day = test_date().succ_opt().unwrap();
        record_attendance(&db, enrollment.enrollment_id, next_day, "P").await?;

        let marks = attendance_for_enrollment(&db, enrollment.enrollment_id).await?;
        assert_eq!(marks.len(), 2);
        assert_eq!(marks[0].date, test_date());
        assert_eq!(marks[1].status, AttendanceStatus::Present);
        Ok(())
    }

    #[tokio::test]
    async fn test_concurrent_marks_keep_one_row() -> Result<()> {
        let (db, enrollment) = setup_with_enrollment().await?;
        let id = enrollment.enrollment_id;

        let (a, b) = tokio::join!(
            record_attendance(&db, id, test_date(), "P"),
            record_attendance(&db, id, test_date(), "L")
        );
        assert!(a.is_ok());
        assert!(b.is_ok());

        let marks = attendance_for_enrollment(&db, id).await?;
        assert_eq!(marks.len(), 1);
        Ok(())
    }

    #[test]
    fn test_parse_date() {
        assert!(parse_date("2026-10-19").is_ok());
        assert!(matches!(
            parse_date("19/10/2026"),
            Err(Error::Validation { field: "date", .. })
        ));
    }
}
