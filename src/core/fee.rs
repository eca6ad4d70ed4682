//! Fee business logic - charges per student and course.
//!
//! Fees start out pending and are settled by an admin. The summary gives the
//! overall standing of one student: paid only when nothing is outstanding.

use crate::{
    entities::{Course, Fee, FeeStatus, Student, fee},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::info;

/// Totals of all fees charged to one student.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeeSummary {
    /// Sum of every fee
    pub total: f64,
    /// Sum of pending fees
    pub pending: f64,
    /// `Paid` when `pending` is zero
    pub status: FeeStatus,
}

/// Retrieves all fees ordered by id.
pub async fn list_fees(db: &DatabaseConnection) -> Result<Vec<fee::Model>> {
    Fee::find()
        .order_by_asc(fee::Column::FeeId)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves the fees charged to one student.
pub async fn fees_for_student(db: &DatabaseConnection, student_id: i64) -> Result<Vec<fee::Model>> {
    Fee::find()
        .filter(fee::Column::StudentId.eq(student_id))
        .order_by_asc(fee::Column::FeeId)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Charges a student for a course. New fees are pending.
///
/// # Errors
/// - [`Error::Validation`] if the amount is negative or not finite
/// - [`Error::NotFound`] if the student or course does not exist
pub async fn create_fee(
    db: &DatabaseConnection,
    student_id: i64,
    course_id: i64,
    amount: f64,
) -> Result<fee::Model> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(Error::validation(
            "amount",
            "Amount must be a non-negative number.",
        ));
    }
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

    let created = fee::ActiveModel {
        student_id: Set(student_id),
        course_id: Set(course_id),
        amount: Set(amount),
        fee_status: Set(FeeStatus::Pending),
        ..Default::default()
    }
    .insert(db)
    .await?;

    info!(fee_id = created.fee_id, student_id, amount, "Fee created");
    Ok(created)
}

/// Marks a fee as paid. Paying a paid fee changes nothing.
pub async fn mark_paid(db: &DatabaseConnection, fee_id: i64) -> Result<fee::Model> {
    let existing = Fee::find_by_id(fee_id)
        .one(db)
        .await?
        .ok_or(Error::NotFound {
            entity: "Fee",
            id: fee_id,
        })?;

    if existing.fee_status == FeeStatus::Paid {
        return Ok(existing);
    }

    let mut active: fee::ActiveModel = existing.into();
    active.fee_status = Set(FeeStatus::Paid);
    active.update(db).await.map_err(Into::into)
}

/// Deletes one fee.
pub async fn delete_fee(db: &DatabaseConnection, fee_id: i64) -> Result<()> {
    let result = Fee::delete_by_id(fee_id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::NotFound {
            entity: "Fee",
            id: fee_id,
        });
    }
    Ok(())
}

/// Adds up the fees of one student.
#[must_use]
pub fn summarize(fees: &[fee::Model]) -> FeeSummary {
    let total = fees.iter().map(|f| f.amount).sum();
    let pending: f64 = fees
        .iter()
        .filter(|f| f.fee_status == FeeStatus::Pending)
        .map(|f| f.amount)
        .sum();
    let any_pending = fees.iter().any(|f| f.fee_status == FeeStatus::Pending);
    FeeSummary {
        total,
        pending,
        status: if any_pending {
            FeeStatus::Pending
        } else {
            FeeStatus::Paid
        },
    }
}

/// Fee summary for one student.
pub async fn fee_summary(db: &DatabaseConnection, student_id: i64) -> Result<FeeSummary> {
    let fees = fees_for_student(db, student_id).await?;
    Ok(summarize(&fees))
}
