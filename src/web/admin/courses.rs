//! Course catalog screens.

use super::{done, form_page};
use crate::{
    core::{
        course::{self, CourseInput},
        session::Principal,
    },
    errors::{Error, Result},
    web::{
        AppState,
        forms::{CourseForm, NoticeQuery, parse_int, parse_optional_id},
        principal::AdminPrincipal,
        render::{self, Field},
        rerender,
    },
};
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{Html, Response},
};

fn course_input(form: &CourseForm) -> Result<CourseInput> {
    Ok(CourseInput {
        name: form.name.clone(),
        credits: parse_int("credits", &form.credits)?,
        teacher_id: parse_optional_id("teacher_id", &form.teacher_id)?,
    })
}

fn course_form(
    principal: &Principal,
    title: &str,
    action: &str,
    form: &CourseForm,
    error: Option<&str>,
) -> Html<String> {
    form_page(
        principal,
        title,
        action,
        &[
            Field::text("name", "Name", &form.name),
            Field::number("credits", "Credits (1-3)", &form.credits),
            Field::number("teacher_id", "Teacher ID (optional)", &form.teacher_id),
        ],
        error,
    )
}

/// `GET /admin/courses`
pub async fn list(
    State(state): State<AppState>,
    AdminPrincipal(principal): AdminPrincipal,
    Query(query): Query<NoticeQuery>,
) -> Result<Html<String>> {
    let rows: Vec<_> = course::list_courses(&state.db)
        .await?
        .into_iter()
        .map(|c| {
            let actions = format!(
                "{} {}",
                render::link(&format!("/admin/courses/edit/{}", c.course_id), "Edit"),
                render::link(&format!("/admin/courses/delete/{}", c.course_id), "Delete"),
            );
            (
                vec![
                    c.course_id.to_string(),
                    c.name,
                    c.credits.to_string(),
                    c.teacher_id.map_or_else(|| "-".to_string(), |t| t.to_string()),
                ],
                Some(actions),
            )
        })
        .collect();

    let body = format!(
        "{}<p>{}</p>{}",
        render::notice(query.message()),
        render::link("/admin/courses/add", "Add course"),
        render::table(&["ID", "Name", "Credits", "Teacher", ""], &rows)
    );
    Ok(render::page("Courses", Some(&principal), &body))
}

/// `GET /admin/courses/add`
pub async fn add_form(AdminPrincipal(principal): AdminPrincipal) -> Html<String> {
    course_form(
        &principal,
        "Add Course",
        "/admin/courses/add",
        &CourseForm::default(),
        None,
    )
}

/// `POST /admin/courses/add`
pub async fn add_submit(
    State(state): State<AppState>,
    AdminPrincipal(principal): AdminPrincipal,
    Form(form): Form<CourseForm>,
) -> Result<Response> {
    let result = match course_input(&form) {
        Ok(input) => course::create_course(&state.db, input).await,
        Err(e) => Err(e),
    };
    match result {
        Ok(_) => Ok(done("/admin/courses", "course_added")),
        Err(e) => rerender(e, |message| {
            course_form(
                &principal,
                "Add Course",
                "/admin/courses/add",
                &form,
                Some(message),
            )
        }),
    }
}

/// `GET /admin/courses/edit/:id`
pub async fn edit_form(
    State(state): State<AppState>,
    AdminPrincipal(principal): AdminPrincipal,
    Path(course_id): Path<i64>,
) -> Result<Html<String>> {
    let existing = course::get_course_by_id(&state.db, course_id)
        .await?
        .ok_or(Error::NotFound {
            entity: "Course",
            id: course_id,
        })?;
    let form = CourseForm {
        name: existing.name,
        credits: existing.credits.to_string(),
        teacher_id: existing.teacher_id.map(|t| t.to_string()).unwrap_or_default(),
    };
    Ok(course_form(
        &principal,
        "Edit Course",
        &format!("/admin/courses/edit/{course_id}"),
        &form,
        None,
    ))
}

/// `POST /admin/courses/edit/:id`
pub async fn edit_submit(
    State(state): State<AppState>,
    AdminPrincipal(principal): AdminPrincipal,
    Path(course_id): Path<i64>,
    Form(form): Form<CourseForm>,
) -> Result<Response> {
    let result = match course_input(&form) {
        Ok(input) => course::update_course(&state.db, course_id, input).await,
        Err(e) => Err(e),
    };
    match result {
        Ok(_) => Ok(done("/admin/courses", "course_updated")),
        Err(e @ Error::NotFound { entity: "Course", .. }) => Err(e),
        Err(e) => rerender(e, |message| {
            course_form(
                &principal,
                "Edit Course",
                &format!("/admin/courses/edit/{course_id}"),
                &form,
                Some(message),
            )
        }),
    }
}

/// `GET|POST /admin/courses/delete/:id`
pub async fn delete(State(state): State<AppState>, Path(course_id): Path<i64>) -> Result<Response> {
    course::delete_course(&state.db, course_id).await?;
    Ok(done("/admin/courses", "course_deleted"))
}
