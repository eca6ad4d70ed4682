//! Submitted form bodies.
//!
//! Every field arrives as a string so that a malformed number is reported as a
//! [`Error::Validation`] on the form instead of a generic rejection.

use crate::errors::{Error, Result};
use serde::Deserialize;

/// Login form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginForm {
    /// Login email
    #[serde(default)]
    pub email: String,
    /// Password
    #[serde(default)]
    pub password: String,
}

/// Course add/edit form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CourseForm {
    /// Course name
    #[serde(default)]
    pub name: String,
    /// Credit hours
    #[serde(default)]
    pub credits: String,
    /// Teacher id, blank for none
    #[serde(default)]
    pub teacher_id: String,
}

/// Student edit form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StudentForm {
    /// Department id, blank to clear
    #[serde(default)]
    pub department_id: String,
}

/// Teacher edit form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TeacherForm {
    /// Speciality code
    #[serde(default)]
    pub speciality: String,
}

/// Department add form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DepartmentForm {
    /// Department code
    #[serde(default)]
    pub dep_name: String,
}

/// Enrollment add form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EnrollmentForm {
    /// Student roll number
    #[serde(default)]
    pub student_id: String,
    /// Course id
    #[serde(default)]
    pub course_id: String,
}

/// Fee add form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeeForm {
    /// Student roll number
    #[serde(default)]
    pub student_id: String,
    /// Course id
    #[serde(default)]
    pub course_id: String,
    /// Amount due
    #[serde(default)]
    pub amount: String,
}

/// Grade form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GradeForm {
    /// Enrollment id
    #[serde(default)]
    pub enrollment_id: String,
    /// Marks out of 100
    #[serde(default)]
    pub marks: String,
    /// Letter grade
    #[serde(default)]
    pub grade: String,
}

/// Attendance form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AttendanceForm {
    /// Enrollment id
    #[serde(default)]
    pub enrollment_id: String,
    /// Day, `YYYY-MM-DD`
    #[serde(default)]
    pub date: String,
    /// P, A or L
    #[serde(default)]
    pub status: String,
}

/// `?notice=` query carried across redirects.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NoticeQuery {
    /// Notice code
    pub notice: Option<String>,
}

impl NoticeQuery {
    /// The message for the carried notice code, if it is a known one.
    #[must_use]
    pub fn message(&self) -> Option<&'static str> {
        notice_text(self.notice.as_deref()?)
    }
}

/// Maps a notice code to its message.
#[must_use]
pub fn notice_text(code: &str) -> Option<&'static str> {
    let text = match code {
        "registered" => "Registration successful! Please log in.",
        "logged_out" => "You have been logged out.",
        "course_added" => "Course added successfully!",
        "course_updated" => "Course updated successfully!",
        "course_deleted" => "Course deleted successfully!",
        "student_updated" => "Student updated successfully!",
        "student_deleted" => "Student deleted successfully!",
        "teacher_updated" => "Teacher updated successfully!",
        "teacher_deleted" => "Teacher deleted successfully!",
        "department_added" => "Department added successfully!",
        "department_deleted" => "Department deleted successfully!",
        "enrolled" => "Student enrolled successfully!",
        "enrollment_deleted" => "Enrollment deleted successfully!",
        "fee_added" => "Fee added successfully!",
        "fee_paid" => "Fee marked as paid.",
        "fee_deleted" => "Fee deleted successfully!",
        "grade_recorded" => "Grade recorded successfully!",
        "attendance_recorded" => "Attendance recorded successfully!",
        "user_verified" => "User verified successfully!",
        "user_deleted" => "User deleted successfully!",
        _ => return None,
    };
    Some(text)
}

/// Parses a required integer field.
pub fn parse_int<T: std::str::FromStr>(field: &'static str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| Error::validation(field, format!("{field} must be a whole number.")))
}

/// Parses an optional id field; blank means `None`.
pub fn parse_optional_id(field: &'static str, value: &str) -> Result<Option<i64>> {
    if value.trim().is_empty() {
        Ok(None)
    } else {
        parse_int(field, value).map(Some)
    }
}

/// Parses a money amount.
pub fn parse_amount(value: &str) -> Result<f64> {
    value
        .trim()
        .parse()
        .map_err(|_| Error::validation("amount", "Amount must be a number."))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_int() {
        assert_eq!(parse_int::<i32>("credits", " 3 ").ok(), Some(3));
        assert!(matches!(
            parse_int::<i32>("credits", "three"),
            Err(Error::Validation {
                field: "credits",
                ..
            })
        ));
    }

    #[test]
    fn test_parse_optional_id() {
        assert_eq!(parse_optional_id("teacher_id", "").ok(), Some(None));
        assert_eq!(parse_optional_id("teacher_id", "  ").ok(), Some(None));
        assert_eq!(parse_optional_id("teacher_id", "7").ok(), Some(Some(7)));
        assert!(parse_optional_id("teacher_id", "x").is_err());
    }

    #[test]
    fn test_notice_text() {
        let query = NoticeQuery {
            notice: Some("registered".to_string()),
        };
        assert_eq!(
            query.message(),
            Some("Registration successful! Please log in.")
        );
        assert_eq!(notice_text("<script>"), None);
        assert_eq!(NoticeQuery::default().message(), None);
    }
}
