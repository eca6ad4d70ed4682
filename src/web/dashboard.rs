//! Dashboard for students and teachers, plus the health check.

use crate::{
    core::{course, enrollment, fee, grade, student, teacher},
    entities::Role,
    errors::Result,
    web::{AppState, principal::Authenticated, render},
};
use axum::{
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
};

async fn student_section(state: &AppState, user_id: i64) -> Result<String> {
    let Some(profile) = student::get_student_by_user(&state.db, user_id).await? else {
        return Ok(String::new());
    };

    let mut rows = Vec::new();
    for e in enrollment::enrollments_for_student(&state.db, profile.roll_no).await? {
        let name = course::get_course_by_id(&state.db, e.course_id)
            .await?
            .map_or_else(|| e.course_id.to_string(), |c| c.name);
        let grade = grade::get_grade_for_enrollment(&state.db, e.enrollment_id)
            .await?
            .map_or_else(|| "-".to_string(), |g| format!("{} ({})", g.letter.as_str(), g.marks));
        rows.push((vec![e.enrollment_id.to_string(), name, grade], None));
    }

    let summary = fee::fee_summary(&state.db, profile.roll_no).await?;
    Ok(format!(
        "<p>Roll number: {}</p>\n<h2>Enrollments</h2>\n{}\n<h2>Fees</h2>\n\
         <p>Total: {:.2} | Pending: {:.2} | Status: {}</p>",
        profile.roll_no,
        render::table(&["Enrollment", "Course", "Grade"], &rows),
        summary.total,
        summary.pending,
        summary.status.as_str(),
    ))
}

async fn teacher_section(state: &AppState, user_id: i64) -> Result<String> {
    let Some(profile) = teacher::get_teacher_by_user(&state.db, user_id).await? else {
        return Ok(String::new());
    };

    let rows: Vec<_> = course::courses_for_teacher(&state.db, profile.teacher_id)
        .await?
        .into_iter()
        .map(|c| {
            (
                vec![c.course_id.to_string(), c.name, c.credits.to_string()],
                None,
            )
        })
        .collect();

    Ok(format!(
        "<p>Speciality: {}</p>\n<h2>Courses</h2>\n{}",
        profile.speciality.map_or("-", |s| s.code()),
        render::table(&["ID", "Name", "Credits"], &rows),
    ))
}

/// `GET /dashboard`
pub async fn dashboard(
    State(state): State<AppState>,
    Authenticated(principal): Authenticated,
) -> Result<Response> {
    if principal.is_admin {
        return Ok(Redirect::to("/admin/dashboard").into_response());
    }

    let Some(user) = crate::core::user::get_user_by_id(&state.db, principal.user_id).await? else {
        return Err(crate::errors::Error::Unauthenticated);
    };

    let section = match principal.role {
        Role::Student => student_section(&state, user.id).await?,
        Role::Teacher => teacher_section(&state, user.id).await?,
        Role::Admin => String::new(),
    };

    let body = format!(
        "<p>Welcome, {}!</p>\n<p>Role: {} | Status: {}</p>\n{}",
        render::escape(&user.username),
        user.role.as_str(),
        if user.status { "Verified" } else { "Unverified" },
        section,
    );
    Ok(render::page("Dashboard", Some(&principal), &body).into_response())
}

/// `GET /health`
pub async fn health() -> Html<&'static str> {
    Html("ok")
}
