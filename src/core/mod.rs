//! Core business logic - framework-agnostic operations on the school records.
//!
//! Every function takes a database connection and returns [`crate::errors::Result`].
//! Delete cascades are spelled out here rather than left to the database.

/// Attendance marks per enrollment
pub mod attendance;
/// Registration, password hashing and login
pub mod auth;
/// Course catalog
pub mod course;
/// Departments
pub mod department;
/// Student to course enrollments
pub mod enrollment;
/// Fees and fee summaries
pub mod fee;
/// Grades per enrollment
pub mod grade;
/// Login sessions and the request principal
pub mod session;
/// Student profiles
pub mod student;
/// Teacher profiles
pub mod teacher;
/// User directory, verification and account removal
pub mod user;
