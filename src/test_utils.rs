//! Shared test utilities for Registrar.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test entities with sensible defaults.

use crate::{
    core::{
        auth::{self, Profile, RegistrationForm},
        course::{self, CourseInput},
        enrollment,
    },
    entities::{self, Role},
    errors::{Error, Result},
};
use chrono::NaiveDate;
use sea_orm::DatabaseConnection;
use std::sync::atomic::{AtomicU64, Ordering};

/// Password used by every account created through these helpers.
pub const TEST_PASSWORD: &str = "correct horse battery";

static CONTACT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Builds a registration form with matching passwords and a fixed address.
#[must_use]
pub fn registration_form(email: &str, username: &str, contact: &str, role: &str) -> RegistrationForm {
    RegistrationForm {
        email: email.to_string(),
        username: username.to_string(),
        contact: contact.to_string(),
        address: "1 College Road".to_string(),
        role: role.to_string(),
        password: TEST_PASSWORD.to_string(),
        confirm_password: TEST_PASSWORD.to_string(),
    }
}

/// Registers a user with the given role.
///
/// # Defaults
/// * `username`: the local part of `email`
/// * `contact`: a fresh 10-digit number
/// * `password`: [`TEST_PASSWORD`]
pub async fn create_test_user(
    db: &DatabaseConnection,
    email: &str,
    role: Role,
) -> Result<entities::user::Model> {
    let username = email.split('@').next().unwrap_or(email);
    let contact = format!("03{:08}", CONTACT_SEQ.fetch_add(1, Ordering::Relaxed));
    let form = registration_form(email, username, &contact, role.as_str());
    let (user, _) = auth::register(db, &form).await?;
    Ok(user)
}

/// Registers a student and returns its profile.
pub async fn create_test_student(
    db: &DatabaseConnection,
    email: &str,
) -> Result<entities::student::Model> {
    let username = email.split('@').next().unwrap_or(email);
    let contact = format!("04{:08}", CONTACT_SEQ.fetch_add(1, Ordering::Relaxed));
    let form = registration_form(email, username, &contact, "Student");
    match auth::register(db, &form).await? {
        (_, Profile::Student(student)) => Ok(student),
        _ => Err(Error::Config {
            message: "registration did not create a student profile".to_string(),
        }),
    }
}

/// Registers a teacher and returns its profile.
pub async fn create_test_teacher(
    db: &DatabaseConnection,
    email: &str,
) -> Result<entities::teacher::Model> {
    let username = email.split('@').next().unwrap_or(email);
    let contact = format!("05{:08}", CONTACT_SEQ.fetch_add(1, Ordering::Relaxed));
    let form = registration_form(email, username, &contact, "Teacher");
    match auth::register(db, &form).await? {
        (_, Profile::Teacher(teacher)) => Ok(teacher),
        _ => Err(Error::Config {
            message: "registration did not create a teacher profile".to_string(),
        }),
    }
}

/// Creates a 2-credit course with no teacher.
pub async fn create_test_course(
    db: &DatabaseConnection,
    name: &str,
) -> Result<entities::course::Model> {
    course::create_course(
        db,
        CourseInput {
            name: name.to_string(),
            credits: 2,
            teacher_id: None,
        },
    )
    .await
}

/// A fixed class day for attendance tests.
#[must_use]
pub fn test_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 19).unwrap_or_default()
}

/// Sets up a test environment with one student.
pub async fn setup_with_student() -> Result<(DatabaseConnection, entities::student::Model)> {
    let db = setup_test_db().await?;
    let student = create_test_student(&db, "student@school.edu").await?;
    Ok((db, student))
}

/// Sets up a test environment with one teacher.
pub async fn setup_with_teacher() -> Result<(DatabaseConnection, entities::teacher::Model)> {
    let db = setup_test_db().await?;
    let teacher = create_test_teacher(&db, "teacher@school.edu").await?;
    Ok((db, teacher))
}

/// Sets up a student and a course, not yet enrolled.
/// Returns (db, student, course) for enrollment and fee tests.
pub async fn setup_with_student_and_course() -> Result<(
    DatabaseConnection,
    entities::student::Model,
    entities::course::Model,
)> {
    let (db, student) = setup_with_student().await?;
    let course = create_test_course(&db, "Linear Algebra").await?;
    Ok((db, student, course))
}

/// Sets up a student enrolled in one course.
pub async fn setup_with_enrollment() -> Result<(DatabaseConnection, entities::enrollment::Model)> {
    let (db, student, course) = setup_with_student_and_course().await?;
    let enrollment = enrollment::enroll(&db, student.roll_no, course.course_id).await?;
    Ok((db, enrollment))
}
