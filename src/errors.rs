//! Unified error type for Registrar.
//!
//! Every core operation returns [`Result`]; the web layer decides how each
//! variant is presented (form message, redirect, or status code).

use thiserror::Error;

/// All errors produced by the application.
#[derive(Debug, Error)]
pub enum Error {
    /// A form field is missing or malformed.
    #[error("{message}")]
    Validation {
        /// Name of the offending form field
        field: &'static str,
        /// Human-readable message shown next to the form
        message: String,
    },

    /// A unique value (email, username, contact, course name, ...) is taken.
    #[error("{message}")]
    Duplicate {
        /// Name of the field whose uniqueness was violated
        field: &'static str,
        /// Human-readable message shown next to the form
        message: String,
    },

    /// A referenced row does not exist.
    #[error("{entity} {id} not found")]
    NotFound {
        /// Entity kind, e.g. "Course"
        entity: &'static str,
        /// Primary key that was looked up
        id: i64,
    },

    /// An Admin account already exists; only one is allowed.
    #[error("An admin account already exists")]
    AdminExists,

    /// The teacher still teaches courses and cannot be deleted.
    #[error("Teacher {teacher_id} still teaches {courses} course(s)")]
    TeacherHasCourses {
        /// Teacher primary key
        teacher_id: i64,
        /// Number of courses still assigned
        courses: u64,
    },

    /// The student is already enrolled in the course.
    #[error("Student {student_id} is already enrolled in course {course_id}")]
    AlreadyEnrolled {
        /// Student roll number
        student_id: i64,
        /// Course primary key
        course_id: i64,
    },

    /// Email unknown or password mismatch.
    #[error("Invalid email or password!")]
    InvalidCredentials,

    /// The request carries no valid session.
    #[error("Authentication required")]
    Unauthenticated,

    /// The principal is not allowed to perform the action.
    #[error("Forbidden")]
    Forbidden,

    /// Password hashing or hash parsing failed.
    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    /// Configuration could not be loaded.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of what went wrong
        message: String,
    },

    /// Any database error not mapped to a more specific variant.
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// I/O error (binding the listener, reading files).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Shorthand for a [`Error::Validation`] on `field`.
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    /// Shorthand for a [`Error::Duplicate`] on `field`.
    pub fn duplicate(field: &'static str, message: impl Into<String>) -> Self {
        Self::Duplicate {
            field,
            message: message.into(),
        }
    }

    /// Maps a raw unique-constraint violation to [`Error::Duplicate`] on
    /// `field`, leaving every other database error untouched.
    #[must_use]
    pub fn from_db_unique(err: sea_orm::DbErr, field: &'static str, message: &str) -> Self {
        match err.sql_err() {
            Some(sea_orm::SqlErr::UniqueConstraintViolation(_)) => {
                Self::duplicate(field, message)
            }
            _ => Self::Database(err),
        }
    }

    /// Whether this error should be shown to the user on the submitted form.
    #[must_use]
    pub const fn is_form_error(&self) -> bool {
        matches!(
            self,
            Self::Validation { .. }
                | Self::Duplicate { .. }
                | Self::NotFound { .. }
                | Self::AdminExists
                | Self::TeacherHasCourses { .. }
                | Self::AlreadyEnrolled { .. }
        )
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
