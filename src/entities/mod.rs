//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Relationships are declared for navigation only; delete behaviour lives in `core`.

pub mod attendance;
pub mod course;
pub mod department;
pub mod enrollment;
pub mod fee;
pub mod grade;
pub mod session;
pub mod student;
pub mod teacher;
pub mod user;

// Re-export specific types to avoid conflicts
pub use attendance::{AttendanceStatus, Entity as Attendance, Model as AttendanceModel};
pub use course::{Column as CourseColumn, Entity as Course, Model as CourseModel};
pub use department::{
    Column as DepartmentColumn, DepartmentName, Entity as Department, Model as DepartmentModel,
};
pub use enrollment::{
    Column as EnrollmentColumn, Entity as Enrollment, Model as EnrollmentModel,
};
pub use fee::{Column as FeeColumn, Entity as Fee, FeeStatus, Model as FeeModel};
pub use grade::{Entity as Grade, Letter, Model as GradeModel};
pub use session::{Entity as Session, Model as SessionModel};
pub use student::{Column as StudentColumn, Entity as Student, Model as StudentModel};
pub use teacher::{Column as TeacherColumn, Entity as Teacher, Model as TeacherModel, Speciality};
pub use user::{Column as UserColumn, Entity as User, Model as UserModel, Role};
