//! Student, teacher and account screens.

use super::{borrow_options, done, form_page};
use crate::{
    core::{department, student, teacher, user},
    entities::Speciality,
    errors::{Error, Result},
    web::{
        AppState,
        forms::{NoticeQuery, StudentForm, TeacherForm, parse_optional_id},
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
use sea_orm::Iterable;
use tracing::warn;

fn name_and_email(account: Option<&crate::entities::UserModel>) -> (String, String) {
    account.map_or_else(
        || ("-".to_string(), "-".to_string()),
        |u| (u.username.clone(), u.email.clone()),
    )
}

/// `GET /admin/students`
pub async fn list_students(
    State(state): State<AppState>,
    AdminPrincipal(principal): AdminPrincipal,
    Query(query): Query<NoticeQuery>,
) -> Result<Html<String>> {
    let rows: Vec<_> = student::list_students(&state.db)
        .await?
        .into_iter()
        .map(|(s, account)| {
            let (name, email) = name_and_email(account.as_ref());
            let actions = format!(
                "{} {}",
                render::link(&format!("/admin/students/edit/{}", s.roll_no), "Edit"),
                render::link(&format!("/admin/students/delete/{}", s.roll_no), "Delete"),
            );
            (
                vec![
                    s.roll_no.to_string(),
                    name,
                    email,
                    s.department_id
                        .map_or_else(|| "-".to_string(), |d| d.to_string()),
                ],
                Some(actions),
            )
        })
        .collect();

    let body = format!(
        "{}{}",
        render::notice(query.message()),
        render::table(&["Roll no", "Username", "Email", "Department", ""], &rows)
    );
    Ok(render::page("Students", Some(&principal), &body))
}

async fn student_form(
    state: &AppState,
    principal: &crate::core::session::Principal,
    roll_no: i64,
    current: &str,
    error: Option<&str>,
) -> Result<Html<String>> {
    let mut options = vec![(String::new(), "None".to_string())];
    for dep in department::list_departments(&state.db).await? {
        options.push((dep.dep_id.to_string(), dep.dep_name.title().to_string()));
    }
    let options = borrow_options(&options);
    Ok(form_page(
        principal,
        "Edit Student",
        &format!("/admin/students/edit/{roll_no}"),
        &[Field::select(
            "department_id",
            "Department",
            &options,
            current,
        )],
        error,
    ))
}

/// `GET /admin/students/edit/:id`
pub async fn edit_student_form(
    State(state): State<AppState>,
    AdminPrincipal(principal): AdminPrincipal,
    Path(roll_no): Path<i64>,
) -> Result<Html<String>> {
    let existing = student::get_student_by_id(&state.db, roll_no)
        .await?
        .ok_or(Error::NotFound {
            entity: "Student",
            id: roll_no,
        })?;
    let current = existing
        .department_id
        .map(|d| d.to_string())
        .unwrap_or_default();
    student_form(&state, &principal, roll_no, &current, None).await
}

/// `POST /admin/students/edit/:id`
pub async fn edit_student_submit(
    State(state): State<AppState>,
    AdminPrincipal(principal): AdminPrincipal,
    Path(roll_no): Path<i64>,
    Form(form): Form<StudentForm>,
) -> Result<Response> {
    let result = match parse_optional_id("department_id", &form.department_id) {
        Ok(department_id) => student::set_department(&state.db, roll_no, department_id).await,
        Err(e) => Err(e),
    };
    match result {
        Ok(_) => Ok(done("/admin/students", "student_updated")),
        Err(e @ Error::NotFound { .. }) => Err(e),
        Err(e) if e.is_form_error() => {
            let page = student_form(
                &state,
                &principal,
                roll_no,
                &form.department_id,
                Some(&e.to_string()),
            )
            .await?;
            rerender(e, |_| page)
        }
        Err(e) => Err(e),
    }
}

/// `GET|POST /admin/students/delete/:id`
pub async fn delete_student(
    State(state): State<AppState>,
    Path(roll_no): Path<i64>,
) -> Result<Response> {
    student::delete_student(&state.db, roll_no).await?;
    Ok(done("/admin/students", "student_deleted"))
}

/// `GET /admin/teachers`
pub async fn list_teachers(
    State(state): State<AppState>,
    AdminPrincipal(principal): AdminPrincipal,
    Query(query): Query<NoticeQuery>,
) -> Result<Html<String>> {
    let rows: Vec<_> = teacher::list_teachers(&state.db)
        .await?
        .into_iter()
        .map(|(t, account)| {
            let (name, email) = name_and_email(account.as_ref());
            let actions = format!(
                "{} {}",
                render::link(&format!("/admin/teachers/edit/{}", t.teacher_id), "Edit"),
                render::link(&format!("/admin/teachers/delete/{}", t.teacher_id), "Delete"),
            );
            (
                vec![
                    t.teacher_id.to_string(),
                    name,
                    email,
                    t.speciality.map_or("-", Speciality::code).to_string(),
                ],
                Some(actions),
            )
        })
        .collect();

    let body = format!(
        "{}{}",
        render::notice(query.message()),
        render::table(&["ID", "Username", "Email", "Speciality", ""], &rows)
    );
    Ok(render::page("Teachers", Some(&principal), &body))
}

fn teacher_form(
    principal: &crate::core::session::Principal,
    teacher_id: i64,
    current: &str,
    error: Option<&str>,
) -> Html<String> {
    let options: Vec<_> = Speciality::iter().map(|s| (s.code(), s.title())).collect();
    form_page(
        principal,
        "Edit Teacher",
        &format!("/admin/teachers/edit/{teacher_id}"),
        &[Field::select("speciality", "Speciality", &options, current)],
        error,
    )
}

/// `GET /admin/teachers/edit/:id`
pub async fn edit_teacher_form(
    State(state): State<AppState>,
    AdminPrincipal(principal): AdminPrincipal,
    Path(teacher_id): Path<i64>,
) -> Result<Html<String>> {
    let existing = teacher::get_teacher_by_id(&state.db, teacher_id)
        .await?
        .ok_or(Error::NotFound {
            entity: "Teacher",
            id: teacher_id,
        })?;
    let current = existing.speciality.map_or("", Speciality::code);
    Ok(teacher_form(&principal, teacher_id, current, None))
}

/// `POST /admin/teachers/edit/:id`
pub async fn edit_teacher_submit(
    State(state): State<AppState>,
    AdminPrincipal(principal): AdminPrincipal,
    Path(teacher_id): Path<i64>,
    Form(form): Form<TeacherForm>,
) -> Result<Response> {
    match teacher::set_speciality(&state.db, teacher_id, &form.speciality).await {
        Ok(_) => Ok(done("/admin/teachers", "teacher_updated")),
        Err(e @ Error::NotFound { .. }) => Err(e),
        Err(e) => rerender(e, |message| {
            teacher_form(&principal, teacher_id, &form.speciality, Some(message))
        }),
    }
}

/// `GET|POST /admin/teachers/delete/:id`
///
/// Refused with 422 while the teacher still teaches courses.
pub async fn delete_teacher(
    State(state): State<AppState>,
    Path(teacher_id): Path<i64>,
) -> Result<Response> {
    teacher::delete_teacher(&state.db, teacher_id).await?;
    Ok(done("/admin/teachers", "teacher_deleted"))
}

/// `GET /admin/unverified_users`
pub async fn unverified_users(
    State(state): State<AppState>,
    AdminPrincipal(principal): AdminPrincipal,
    Query(query): Query<NoticeQuery>,
) -> Result<Html<String>> {
    let rows: Vec<_> = user::list_unverified_users(&state.db)
        .await?
        .into_iter()
        .map(|u| {
            let actions = format!(
                "{} {}",
                render::link(
                    &format!("/admin/unverified_users/verify_user/{}", u.id),
                    "Verify"
                ),
                render::link(&format!("/admin/users/delete/{}", u.id), "Delete"),
            );
            (
                vec![
                    u.id.to_string(),
                    u.username,
                    u.email,
                    u.role.as_str().to_string(),
                ],
                Some(actions),
            )
        })
        .collect();

    let body = format!(
        "{}{}",
        render::notice(query.message()),
        render::table(&["ID", "Username", "Email", "Role", ""], &rows)
    );
    Ok(render::page("Unverified Users", Some(&principal), &body))
}

/// `GET|POST /admin/unverified_users/verify_user/:id`
pub async fn verify_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Response> {
    user::verify_user(&state.db, user_id).await?;
    Ok(done("/admin/unverified_users", "user_verified"))
}

/// `GET|POST /admin/users/delete/:id`
///
/// Admins cannot delete their own account.
pub async fn delete_user(
    State(state): State<AppState>,
    AdminPrincipal(principal): AdminPrincipal,
    Path(user_id): Path<i64>,
) -> Result<Response> {
    if user_id == principal.user_id {
        warn!(user_id, "Admin attempted to delete their own account");
        return Err(Error::validation(
            "id",
            "You cannot delete your own account.",
        ));
    }
    user::delete_user(&state.db, user_id).await?;
    Ok(done("/admin/unverified_users", "user_deleted"))
}
