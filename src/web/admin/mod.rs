//! Admin console.
//!
//! Every route here sits behind the [`AdminPrincipal`] gate installed by
//! [`routes`]; handlers also take the principal to render the navigation.

mod courses;
mod people;
mod records;

use crate::{
    core::{session::Principal, user},
    errors::Result,
    web::{
        AppState,
        forms::NoticeQuery,
        principal::AdminPrincipal,
        render::{self, Field},
    },
};
use axum::{
    Router,
    extract::{Query, State},
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
};

/// Builds the `/admin` router. Callers nest it under `/admin`.
pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(dashboard))
        // Courses
        .route("/courses", get(courses::list))
        .route("/courses/add", get(courses::add_form).post(courses::add_submit))
        .route(
            "/courses/edit/:id",
            get(courses::edit_form).post(courses::edit_submit),
        )
        .route("/courses/delete/:id", get(courses::delete).post(courses::delete))
        // Students and teachers
        .route("/students", get(people::list_students))
        .route(
            "/students/edit/:id",
            get(people::edit_student_form).post(people::edit_student_submit),
        )
        .route(
            "/students/delete/:id",
            get(people::delete_student).post(people::delete_student),
        )
        .route("/teachers", get(people::list_teachers))
        .route(
            "/teachers/edit/:id",
            get(people::edit_teacher_form).post(people::edit_teacher_submit),
        )
        .route(
            "/teachers/delete/:id",
            get(people::delete_teacher).post(people::delete_teacher),
        )
        // Accounts
        .route("/unverified_users", get(people::unverified_users))
        .route(
            "/unverified_users/verify_user/:id",
            get(people::verify_user).post(people::verify_user),
        )
        .route(
            "/users/delete/:id",
            get(people::delete_user).post(people::delete_user),
        )
        // Departments
        .route("/departments", get(records::list_departments))
        .route(
            "/departments/add",
            get(records::add_department_form).post(records::add_department_submit),
        )
        .route(
            "/departments/delete/:id",
            get(records::delete_department).post(records::delete_department),
        )
        // Enrollments
        .route("/enrollments", get(records::list_enrollments))
        .route(
            "/enrollments/add",
            get(records::add_enrollment_form).post(records::add_enrollment_submit),
        )
        .route(
            "/enrollments/delete/:id",
            get(records::delete_enrollment).post(records::delete_enrollment),
        )
        // Fees
        .route("/fees", get(records::list_fees))
        .route(
            "/fees/add",
            get(records::add_fee_form).post(records::add_fee_submit),
        )
        .route("/fees/pay/:id", get(records::pay_fee).post(records::pay_fee))
        .route(
            "/fees/delete/:id",
            get(records::delete_fee).post(records::delete_fee),
        )
        // Academic records
        .route(
            "/grades/add",
            get(records::add_grade_form).post(records::add_grade_submit),
        )
        .route(
            "/attendance/add",
            get(records::add_attendance_form).post(records::add_attendance_submit),
        )
        .route_layer(axum::middleware::from_extractor_with_state::<
            AdminPrincipal,
            AppState,
        >(state))
}

/// Redirects to `path` carrying a notice code.
fn done(path: &str, notice: &str) -> Response {
    Redirect::to(&format!("{path}?notice={notice}")).into_response()
}

/// Renders a titled admin form page.
fn form_page(
    principal: &Principal,
    title: &str,
    action: &str,
    fields: &[Field<'_>],
    error: Option<&str>,
) -> Html<String> {
    render::page(
        title,
        Some(principal),
        &render::form(action, fields, "Save", error),
    )
}

/// Turns owned option pairs into the borrowed form `render` expects.
fn borrow_options(options: &[(String, String)]) -> Vec<(&str, &str)> {
    options
        .iter()
        .map(|(value, label)| (value.as_str(), label.as_str()))
        .collect()
}

/// `GET /admin/dashboard`
async fn dashboard(
    State(state): State<AppState>,
    AdminPrincipal(principal): AdminPrincipal,
    Query(query): Query<NoticeQuery>,
) -> Result<Html<String>> {
    let counts = user::directory_counts(&state.db).await?;
    let rows = vec![
        (vec!["Users".to_string(), counts.users.to_string()], None),
        (vec!["Students".to_string(), counts.students.to_string()], None),
        (vec!["Teachers".to_string(), counts.teachers.to_string()], None),
        (vec!["Courses".to_string(), counts.courses.to_string()], None),
        (
            vec!["Unverified users".to_string(), counts.unverified.to_string()],
            Some(render::link("/admin/unverified_users", "Review")),
        ),
    ];
    let body = format!(
        "{}{}",
        render::notice(query.message()),
        render::table(&["", "Count"], &rows)
    );
    Ok(render::page("Admin Dashboard", Some(&principal), &body))
}
